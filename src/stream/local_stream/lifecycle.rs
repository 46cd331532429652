use std::sync::Arc;

use super::LocalStream;
use crate::error::{Error, Result};
use crate::stream::stream_constraints::CaptureRequest;
use crate::track::{MediaTrack, TrackKind};

impl LocalStream {
    /// switch_device captures `kind` from `device_id` instead of the current
    /// device. The device is remembered in the constraints, and the current
    /// track is stopped before the new one is acquired since some platforms
    /// refuse to capture from two devices at once.
    ///
    /// If the acquisition fails the previous track stays stopped.
    pub async fn switch_device(&self, kind: TrackKind, device_id: &str) -> Result<()> {
        let request = {
            let mut constraints = self.constraints.lock().await;
            constraints.set_device_id(kind, device_id)
        }
        .ok_or(Error::ErrUnspecifiedTrackKind)?;

        let prev = self.active_track(kind).await;
        if let Some(prev) = &prev {
            prev.stop();
        }

        let next = self.platform.acquire(kind, &request).await?;
        log::debug!("stream {} switched {kind} to device {device_id}", self.id);
        self.update_track(next, prev).await
    }

    /// update_track puts `next` in place of `prev`. `next` joins the track set
    /// before `prev` leaves it and is stopped. A send-path already publishing
    /// the kind is rebound to `next`. Without one, a new send-path is created
    /// only when `next` is the first track of its kind and the stream is
    /// published; a replacement never re-publishes an unpublished stream.
    pub async fn update_track(
        &self,
        next: Arc<dyn MediaTrack>,
        prev: Option<Arc<dyn MediaTrack>>,
    ) -> Result<()> {
        let kind = next.kind();

        let prev = {
            let mut tracks = self.tracks.lock().await;
            tracks.push(Arc::clone(&next));

            let prev = prev.or_else(|| {
                let existing = tracks
                    .iter()
                    .find(|t| t.kind() == kind && t.id() != next.id())
                    .cloned();
                if let Some(existing) = &existing {
                    log::warn!(
                        "stream {} already holds {kind} track {}, replacing it",
                        self.id,
                        existing.id()
                    );
                }
                existing
            });
            if let Some(prev) = &prev {
                tracks.retain(|t| t.id() != prev.id());
            }
            prev
        };
        if let Some(prev) = &prev {
            prev.stop();
        }

        let send_path = self.send_path(kind).await;
        match send_path {
            Some(sender) => {
                if let Some(replaced) = sender.track().await {
                    if replaced.id() != next.id() {
                        replaced.stop();
                    }
                }
                log::trace!("sender {} now carries {}", sender.id(), next.id());
                sender.replace_track(Some(next)).await
            }
            // only a first track of its kind may create a send-path
            None if prev.is_none() => self.publish_track(next).await,
            None => {
                log::trace!(
                    "stream {} has no {kind} send-path, {} kept local",
                    self.id,
                    next.id()
                );
                Ok(())
            }
        }
    }

    /// mute stops sending real content for `kind`. With `send_empty_on_mute`
    /// a disabled placeholder takes the place of the active track and keeps
    /// the send-path alive; otherwise the active track is stopped and leaves
    /// the stream.
    pub async fn mute(&self, kind: TrackKind) -> Result<()> {
        let active = match self.active_track(kind).await {
            Some(active) => active,
            None => {
                log::trace!("stream {} has no {kind} track to mute", self.id);
                return Ok(());
            }
        };

        let (send_empty_on_mute, dimensions) = {
            let constraints = self.constraints.lock().await;
            (
                constraints.send_empty_on_mute,
                constraints.placeholder_dimensions(),
            )
        };

        if send_empty_on_mute {
            let placeholder = self.platform.synthesize_placeholder(kind, dimensions).await?;
            placeholder.set_enabled(false);
            self.update_track(placeholder, Some(active)).await
        } else {
            active.stop();
            let mut tracks = self.tracks.lock().await;
            tracks.retain(|t| t.id() != active.id());
            Ok(())
        }
    }

    /// unmute captures a new track for `kind` and puts it in place of the
    /// placeholder, if any.
    pub async fn unmute(&self, kind: TrackKind) -> Result<()> {
        let request = {
            let constraints = self.constraints.lock().await;
            constraints.capture(kind).cloned()
        }
        .ok_or(Error::ErrUnspecifiedTrackKind)?;

        let request = if request.is_enabled() {
            request
        } else {
            log::debug!("{kind} capture disabled in constraints, unmute asks for any device");
            CaptureRequest::default()
        };

        let prev = self.active_track(kind).await;
        let next = self.platform.acquire(kind, &request).await?;
        self.update_track(next, prev).await
    }
}
