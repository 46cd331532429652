use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::Dimensions;
use crate::simulcast::resolution_tier::ResolutionTier;
use crate::track::TrackKind;

const DEFAULT_CODEC: &str = "vp8";

/// TrackConstraints narrows down what to capture for one kind. Only the device
/// id is interpreted here, every other capture flag is passed through to the
/// platform untouched.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// CaptureRequest is either a plain on/off switch or a set of constraints for
/// the capture of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptureRequest {
    Enabled(bool),
    Constraints(TrackConstraints),
}

impl Default for CaptureRequest {
    fn default() -> Self {
        CaptureRequest::Enabled(true)
    }
}

impl CaptureRequest {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, CaptureRequest::Enabled(false))
    }

    pub fn device_id(&self) -> Option<&str> {
        match self {
            CaptureRequest::Constraints(c) => c.device_id.as_deref(),
            CaptureRequest::Enabled(_) => None,
        }
    }

    /// with_device_id merges `device_id` into the request, keeping every other
    /// constraint
    pub fn with_device_id(&self, device_id: &str) -> CaptureRequest {
        let mut constraints = match self {
            CaptureRequest::Constraints(c) => c.clone(),
            CaptureRequest::Enabled(_) => TrackConstraints::default(),
        };
        constraints.device_id = Some(device_id.to_owned());
        CaptureRequest::Constraints(constraints)
    }
}

/// StreamConstraints configures a local stream: what to capture, at which
/// resolution, and how to encode and mute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamConstraints {
    pub resolution: ResolutionTier,
    /// codec is the short video codec name, e.g. `vp8` or `h264`
    pub codec: String,
    pub simulcast: bool,
    /// send_empty_on_mute keeps send-paths alive across a mute by swapping in
    /// an inert placeholder track
    pub send_empty_on_mute: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_codec_profile: Option<String>,
    pub audio: CaptureRequest,
    pub video: CaptureRequest,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        StreamConstraints {
            resolution: ResolutionTier::default(),
            codec: DEFAULT_CODEC.to_owned(),
            simulcast: false,
            send_empty_on_mute: false,
            preferred_codec_profile: None,
            audio: CaptureRequest::default(),
            video: CaptureRequest::default(),
        }
    }
}

impl StreamConstraints {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// capture returns the capture request for `kind`
    pub fn capture(&self, kind: TrackKind) -> Option<&CaptureRequest> {
        match kind {
            TrackKind::Audio => Some(&self.audio),
            TrackKind::Video => Some(&self.video),
            TrackKind::Unspecified => None,
        }
    }

    /// set_device_id persists `device_id` as the capture device for `kind` and
    /// returns the merged request
    pub(crate) fn set_device_id(
        &mut self,
        kind: TrackKind,
        device_id: &str,
    ) -> Option<CaptureRequest> {
        let request = match kind {
            TrackKind::Audio => &mut self.audio,
            TrackKind::Video => &mut self.video,
            TrackKind::Unspecified => return None,
        };
        *request = request.with_device_id(device_id);
        Some(request.clone())
    }

    /// placeholder_dimensions is the size of the blank video sent while muted
    pub fn placeholder_dimensions(&self) -> Dimensions {
        let profile = self.resolution.profile();
        Dimensions {
            width: profile.width,
            height: profile.height,
        }
    }
}
