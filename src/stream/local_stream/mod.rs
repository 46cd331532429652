
mod lifecycle;
mod publisher;

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::stream_constraints::StreamConstraints;
use super::TrackContainer;
use crate::error::Result;
use crate::platform::MediaPlatform;
use crate::simulcast::RTCRtpEncodingParameters;
use crate::track::{MediaTrack, TrackKind};
use crate::transport::rtp_sender::RtpSender;
use crate::transport::TransportBinding;

/// PublishBinding is what `publish` leaves behind: the transport, the caller's
/// encoding override and the send-path created for each kind.
pub(crate) struct PublishBinding {
    pub(crate) transport: Arc<TransportBinding>,
    pub(crate) encodings: Option<Vec<RTCRtpEncodingParameters>>,
    pub(crate) send_paths: Mutex<HashMap<TrackKind, Arc<dyn RtpSender>>>,
}

/// LocalStream is a set of locally captured tracks, at most one per kind,
/// together with the constraints they were captured with and the send-paths
/// publishing them.
///
/// A stream can exist before it is published. Until then every publishing
/// operation is a no-op.
pub struct LocalStream {
    id: String,
    constraints: Mutex<StreamConstraints>,
    tracks: Mutex<Vec<Arc<dyn MediaTrack>>>,
    binding: ArcSwapOption<PublishBinding>,
    platform: Arc<dyn MediaPlatform>,
}

impl LocalStream {
    pub fn new(constraints: StreamConstraints, platform: Arc<dyn MediaPlatform>) -> Self {
        LocalStream::with_id(crate::generate_random_id(), constraints, platform)
    }

    pub fn with_id(
        id: String,
        constraints: StreamConstraints,
        platform: Arc<dyn MediaPlatform>,
    ) -> Self {
        LocalStream {
            id,
            constraints: Mutex::new(constraints),
            tracks: Mutex::new(vec![]),
            binding: ArcSwapOption::empty(),
            platform,
        }
    }

    /// constraints returns a snapshot of the current constraints, including
    /// the devices selected so far
    pub async fn constraints(&self) -> StreamConstraints {
        self.constraints.lock().await.clone()
    }

    /// active_track returns the track currently carrying `kind`, which may be
    /// a muted placeholder
    pub async fn active_track(&self, kind: TrackKind) -> Option<Arc<dyn MediaTrack>> {
        let tracks = self.tracks.lock().await;
        tracks.iter().find(|t| t.kind() == kind).cloned()
    }

    /// is_published reports whether `publish` has been called
    pub fn is_published(&self) -> bool {
        self.binding.load().is_some()
    }

    /// send_path returns the send-path publishing `kind`, if any
    pub async fn send_path(&self, kind: TrackKind) -> Option<Arc<dyn RtpSender>> {
        let binding = self.binding.load_full()?;
        let send_paths = binding.send_paths.lock().await;
        send_paths.get(&kind).cloned()
    }

    /// start captures a first track for every kind the constraints ask for
    pub async fn start(&self) -> Result<()> {
        let requests = {
            let constraints = self.constraints.lock().await;
            [TrackKind::Audio, TrackKind::Video]
                .into_iter()
                .filter_map(|kind| {
                    constraints
                        .capture(kind)
                        .filter(|request| request.is_enabled())
                        .map(|request| (kind, request.clone()))
                })
                .collect::<Vec<_>>()
        };

        for (kind, request) in requests {
            if self.active_track(kind).await.is_some() {
                continue;
            }
            let track = self.platform.acquire(kind, &request).await?;
            log::debug!("stream {} captured {kind} track {}", self.id, track.id());
            self.update_track(track, None).await?;
        }

        Ok(())
    }

    /// stop stops every track of the stream. Send-paths stay bound to the
    /// ended tracks until the stream is unpublished.
    pub async fn stop(&self) {
        let tracks = self.tracks.lock().await;
        for track in tracks.iter() {
            track.stop();
        }
    }
}

#[async_trait]
impl TrackContainer for LocalStream {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get_tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.tracks.lock().await.clone()
    }
}
