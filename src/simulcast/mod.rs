
pub mod resolution_tier;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use resolution_tier::ResolutionTier;

/// RID_FULL tags the full resolution layer
pub const RID_FULL: &str = "f";
/// RID_HALF tags the layer scaled down by two
pub const RID_HALF: &str = "h";
/// RID_QUARTER tags the layer scaled down by four
pub const RID_QUARTER: &str = "q";

/// The ladder never grows beyond f/h/q.
pub const MAX_SIMULCAST_LAYERS: usize = 3;

const LADDER: [(&str, f64); MAX_SIMULCAST_LAYERS] =
    [(RID_FULL, 1.0), (RID_HALF, 2.0), (RID_QUARTER, 4.0)];

/// RTCRtpEncodingParameters describes one physical encoding produced by a
/// sender.
/// <https://w3c.github.io/webrtc-pc/#dom-rtcrtpencodingparameters>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtpEncodingParameters {
    #[serde(default, skip_serializing_if = "SmolStr::is_empty")]
    pub rid: SmolStr,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_resolution_down_by: Option<f64>,
    /// max_bitrate in bits per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_framerate: Option<f64>,
}

fn default_active() -> bool {
    true
}

impl Default for RTCRtpEncodingParameters {
    fn default() -> Self {
        RTCRtpEncodingParameters {
            rid: SmolStr::default(),
            active: true,
            scale_resolution_down_by: None,
            max_bitrate: None,
            max_framerate: None,
        }
    }
}

impl RTCRtpEncodingParameters {
    /// apply merges every field set in `update` into these parameters
    pub fn apply(&mut self, update: &EncodingUpdate) {
        if let Some(active) = update.active {
            self.active = active;
        }
        if let Some(scale) = update.scale_resolution_down_by {
            self.scale_resolution_down_by = Some(scale);
        }
        if let Some(max_bitrate) = update.max_bitrate {
            self.max_bitrate = Some(max_bitrate);
        }
        if let Some(max_framerate) = update.max_framerate {
            self.max_framerate = Some(max_framerate);
        }
    }
}

/// EncodingUpdate is a partial set of encoding fields merged into an existing
/// encoding entry; unset fields are left untouched.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct EncodingUpdate {
    pub active: Option<bool>,
    pub scale_resolution_down_by: Option<f64>,
    pub max_bitrate: Option<u64>,
    pub max_framerate: Option<f64>,
}

impl EncodingUpdate {
    pub fn active(active: bool) -> Self {
        EncodingUpdate {
            active: Some(active),
            ..Default::default()
        }
    }
}

/// plan_encodings computes the encoding ladder for a video track captured at
/// `tier`.
///
/// Without simulcast this is a single full resolution encoding. With simulcast
/// the full layer is followed by a half and a quarter layer for as many tiers
/// as exist below `tier`, each using the budget of the tier it scales down to.
pub fn plan_encodings(tier: ResolutionTier, simulcast: bool) -> Vec<RTCRtpEncodingParameters> {
    if !simulcast {
        let profile = tier.profile();
        return vec![RTCRtpEncodingParameters {
            rid: SmolStr::new_inline(RID_FULL),
            max_bitrate: Some(profile.max_bitrate),
            max_framerate: Some(profile.max_framerate),
            ..Default::default()
        }];
    }

    LADDER
        .iter()
        .enumerate()
        .map_while(|(steps, (rid, scale))| {
            let profile = tier.lower(steps)?.profile();
            Some(RTCRtpEncodingParameters {
                rid: SmolStr::new_inline(rid),
                scale_resolution_down_by: Some(*scale),
                max_bitrate: Some(profile.max_bitrate),
                max_framerate: Some(profile.max_framerate),
                ..Default::default()
            })
        })
        .collect()
}
