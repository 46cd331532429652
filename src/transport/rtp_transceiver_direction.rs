use std::fmt;

/// RTCRtpTransceiverDirection indicates which way media flows on a send-path
/// created for a track.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCRtpTransceiverDirection {
    #[default]
    Unspecified,

    /// Sendrecv indicates the transceiver will offer to send and receive.
    Sendrecv,

    /// Sendonly indicates the transceiver will only offer to send. Published
    /// local tracks always use this direction.
    Sendonly,

    /// Recvonly indicates the transceiver will only offer to receive.
    Recvonly,

    /// Inactive indicates the transceiver neither sends nor receives.
    Inactive,
}

const RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR: &str = "sendrecv";
const RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR: &str = "sendonly";
const RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR: &str = "recvonly";
const RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR: &str = "inactive";

impl From<&str> for RTCRtpTransceiverDirection {
    fn from(raw: &str) -> Self {
        match raw {
            RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR => RTCRtpTransceiverDirection::Sendrecv,
            RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR => RTCRtpTransceiverDirection::Sendonly,
            RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR => RTCRtpTransceiverDirection::Recvonly,
            RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR => RTCRtpTransceiverDirection::Inactive,
            _ => RTCRtpTransceiverDirection::Unspecified,
        }
    }
}

impl fmt::Display for RTCRtpTransceiverDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCRtpTransceiverDirection::Sendrecv => RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR,
            RTCRtpTransceiverDirection::Sendonly => RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR,
            RTCRtpTransceiverDirection::Recvonly => RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR,
            RTCRtpTransceiverDirection::Inactive => RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR,
            RTCRtpTransceiverDirection::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

impl RTCRtpTransceiverDirection {
    pub fn has_send(&self) -> bool {
        matches!(self, Self::Sendrecv | Self::Sendonly)
    }

    pub fn has_recv(&self) -> bool {
        matches!(self, Self::Sendrecv | Self::Recvonly)
    }
}
