#[cfg(test)]
mod codec_test;

use serde::{Deserialize, Serialize};
use unicase::UniCase;

use crate::track::TrackKind;

pub const MIME_TYPE_H264: &str = "video/H264";
pub const MIME_TYPE_H265: &str = "video/H265";
pub const MIME_TYPE_OPUS: &str = "audio/opus";
pub const MIME_TYPE_VP8: &str = "video/VP8";
pub const MIME_TYPE_VP9: &str = "video/VP9";
pub const MIME_TYPE_AV1: &str = "video/AV1";
pub const MIME_TYPE_G722: &str = "audio/G722";
pub const MIME_TYPE_PCMU: &str = "audio/PCMU";
pub const MIME_TYPE_PCMA: &str = "audio/PCMA";

/// RTCRtpCodecCapability provides information about codec capabilities.
/// <https://w3c.github.io/webrtc-pc/#dictionary-rtcrtpcodeccapability-members>
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtpCodecCapability {
    pub mime_type: String,
    pub clock_rate: u32,
    #[serde(default)]
    pub channels: u16,
    #[serde(default)]
    pub sdp_fmtp_line: String,
}

impl RTCRtpCodecCapability {
    /// is_mime_type compares the mime type case-insensitively
    pub fn is_mime_type(&self, mime_type: &str) -> bool {
        UniCase::new(self.mime_type.as_str()) == UniCase::new(mime_type)
    }
}

/// mime_type_for builds the mime type of `codec` for the given track kind,
/// e.g. `video/vp8`.
pub fn mime_type_for(kind: TrackKind, codec: &str) -> String {
    format!("{kind}/{codec}")
}

/// select_codec picks the single codec a sender should be restricted to out of
/// the capabilities the platform advertises for `kind`.
///
/// Audio takes the first entry matching the configured codec or Opus. Video
/// takes the first entry of the configured codec; when `profile` is given the
/// first entry of that codec whose fmtp line mentions the profile wins, falling
/// back to the first entry of the codec. `None` means no preference applies and
/// negotiation keeps the platform defaults.
pub fn select_codec(
    kind: TrackKind,
    capabilities: &[RTCRtpCodecCapability],
    codec: &str,
    profile: Option<&str>,
) -> Option<RTCRtpCodecCapability> {
    let mime_type = mime_type_for(kind, codec);

    match kind {
        TrackKind::Audio => capabilities
            .iter()
            .find(|c| c.is_mime_type(&mime_type) || c.is_mime_type(MIME_TYPE_OPUS))
            .cloned(),
        TrackKind::Video => {
            let mut family = capabilities.iter().filter(|c| c.is_mime_type(&mime_type));
            match profile {
                None => family.next().cloned(),
                Some(profile) => {
                    let family: Vec<&RTCRtpCodecCapability> = family.collect();
                    family
                        .iter()
                        .find(|c| c.sdp_fmtp_line.contains(profile))
                        .or_else(|| family.first())
                        .map(|c| (*c).clone())
                }
            }
        }
        TrackKind::Unspecified => None,
    }
}
