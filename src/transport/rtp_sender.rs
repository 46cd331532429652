use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::RTCRtpCodecCapability;
use crate::error::Result;
use crate::simulcast::RTCRtpEncodingParameters;
use crate::track::MediaTrack;

/// RTCRtpSendParameters contains the encodings a sender currently produces.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RTCRtpSendParameters {
    pub encodings: Vec<RTCRtpEncodingParameters>,
}

/// RtpSender is the send-path binding one local track to the transport. It
/// controls how the track is encoded and which codec is negotiated for it.
#[async_trait]
pub trait RtpSender: Send + Sync {
    fn id(&self) -> &str;

    /// track returns the track currently bound to this sender, if any
    async fn track(&self) -> Option<Arc<dyn MediaTrack>>;

    /// replace_track swaps the source of this sender without renegotiation.
    /// The new track must be of the same kind as the one the sender was
    /// created for.
    async fn replace_track(&self, track: Option<Arc<dyn MediaTrack>>) -> Result<()>;

    async fn get_parameters(&self) -> RTCRtpSendParameters;

    async fn set_parameters(&self, parameters: RTCRtpSendParameters) -> Result<()>;

    /// set_codec_preferences restricts negotiation of this sender to `codecs`,
    /// in order of preference.
    async fn set_codec_preferences(&self, codecs: Vec<RTCRtpCodecCapability>) -> Result<()>;
}
