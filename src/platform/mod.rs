use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::RTCRtpCodecCapability;
use crate::error::Result;
use crate::stream::stream_constraints::CaptureRequest;
use crate::track::{MediaTrack, TrackKind};

/// Dimensions of a synthesized video placeholder.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// MediaPlatform is everything a stream needs from the host environment:
/// capture devices, inert placeholder tracks and the codec capabilities of
/// the local encoder.
#[async_trait]
pub trait MediaPlatform: Send + Sync {
    /// acquire opens a capture track of `kind` honouring `request`. Failures are
    /// reported as `Error::ErrCaptureFailed`.
    async fn acquire(&self, kind: TrackKind, request: &CaptureRequest)
        -> Result<Arc<dyn MediaTrack>>;

    /// synthesize_placeholder manufactures a track that carries no real signal,
    /// silence for audio and a blank canvas of `dimensions` for video.
    async fn synthesize_placeholder(
        &self,
        kind: TrackKind,
        dimensions: Dimensions,
    ) -> Result<Arc<dyn MediaTrack>>;

    /// codec_capabilities lists the codecs the platform can send for `kind`.
    /// `None` means the platform cannot be queried.
    async fn codec_capabilities(&self, kind: TrackKind) -> Option<Vec<RTCRtpCodecCapability>>;
}
