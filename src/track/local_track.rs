use std::any::Any;
use std::sync::atomic::Ordering;

use portable_atomic::{AtomicBool, AtomicU8};

use super::{MediaTrack, TrackKind, TrackState};

/// LocalTrack is a MediaTrack whose lifecycle is tracked entirely in memory.
///
/// Platform integrations wrap their capture handles around it, and it doubles
/// as the placeholder track produced while a stream is muted.
#[derive(Debug)]
pub struct LocalTrack {
    id: String,
    kind: TrackKind,
    device_id: Option<String>,
    enabled: AtomicBool,
    ready_state: AtomicU8,
}

impl LocalTrack {
    pub fn new(kind: TrackKind, device_id: Option<String>) -> Self {
        LocalTrack::with_id(crate::generate_random_id(), kind, device_id)
    }

    pub fn with_id(id: String, kind: TrackKind, device_id: Option<String>) -> Self {
        LocalTrack {
            id,
            kind,
            device_id,
            enabled: AtomicBool::new(true),
            ready_state: AtomicU8::new(TrackState::Live as u8),
        }
    }

    /// placeholder creates an inert, disabled track of the given kind
    pub fn placeholder(kind: TrackKind) -> Self {
        let track = LocalTrack::new(kind, None);
        track.set_enabled(false);
        track
    }

    /// device_id returns the capture device this track was opened on, if any
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }
}

impl MediaTrack for LocalTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn ready_state(&self) -> TrackState {
        self.ready_state.load(Ordering::SeqCst).into()
    }

    fn stop(&self) {
        let prev = self
            .ready_state
            .swap(TrackState::Ended as u8, Ordering::SeqCst);
        if prev != TrackState::Ended as u8 {
            log::trace!("track {} ({}) stopped", self.id, self.kind);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
