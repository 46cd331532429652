use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portable_atomic::AtomicBool;

use super::lock;
use crate::codec::RTCRtpCodecCapability;
use crate::error::{Error, Result};
use crate::platform::{Dimensions, MediaPlatform};
use crate::stream::stream_constraints::CaptureRequest;
use crate::track::local_track::LocalTrack;
use crate::track::{MediaTrack, TrackKind};

/// MockPlatform hands out `LocalTrack`s and advertises whatever codec
/// capabilities it was configured with.
#[derive(Default)]
pub struct MockPlatform {
    capabilities: HashMap<TrackKind, Vec<RTCRtpCodecCapability>>,
    fail_acquire: AtomicBool,
    fail_placeholder: AtomicBool,
    requests: Mutex<Vec<(TrackKind, CaptureRequest)>>,
    placeholders: Mutex<Vec<(TrackKind, Dimensions)>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        MockPlatform::default()
    }

    /// with_codec_capabilities makes `codec_capabilities(kind)` answer with
    /// `capabilities`; kinds without capabilities answer `None`
    pub fn with_codec_capabilities(
        mut self,
        kind: TrackKind,
        capabilities: Vec<RTCRtpCodecCapability>,
    ) -> Self {
        self.capabilities.insert(kind, capabilities);
        self
    }

    pub fn set_fail_acquire(&self, fail: bool) {
        self.fail_acquire.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_placeholder(&self, fail: bool) {
        self.fail_placeholder.store(fail, Ordering::SeqCst);
    }

    /// requests returns every capture request received, in order
    pub fn requests(&self) -> Vec<(TrackKind, CaptureRequest)> {
        lock(&self.requests).clone()
    }

    /// placeholders returns every placeholder synthesized, in order
    pub fn placeholders(&self) -> Vec<(TrackKind, Dimensions)> {
        lock(&self.placeholders).clone()
    }
}

#[async_trait]
impl MediaPlatform for MockPlatform {
    async fn acquire(
        &self,
        kind: TrackKind,
        request: &CaptureRequest,
    ) -> Result<Arc<dyn MediaTrack>> {
        lock(&self.requests).push((kind, request.clone()));

        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(Error::ErrCaptureFailed {
                kind,
                reason: "permission denied".to_owned(),
            });
        }

        let device_id = request.device_id().map(str::to_owned);
        Ok(Arc::new(LocalTrack::new(kind, device_id)))
    }

    async fn synthesize_placeholder(
        &self,
        kind: TrackKind,
        dimensions: Dimensions,
    ) -> Result<Arc<dyn MediaTrack>> {
        lock(&self.placeholders).push((kind, dimensions));

        if self.fail_placeholder.load(Ordering::SeqCst) {
            return Err(Error::ErrPlaceholderFailed(kind));
        }

        Ok(Arc::new(LocalTrack::placeholder(kind)))
    }

    async fn codec_capabilities(&self, kind: TrackKind) -> Option<Vec<RTCRtpCodecCapability>> {
        self.capabilities.get(&kind).cloned()
    }
}
