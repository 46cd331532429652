pub mod local_stream;
pub mod remote_stream;
pub mod stream_constraints;

use std::sync::Arc;

use async_trait::async_trait;

use crate::track::{MediaTrack, TrackKind};

/// TrackContainer is the part of a media stream shared by local and remote
/// streams: an id and a set of tracks.
#[async_trait]
pub trait TrackContainer: Send + Sync {
    fn id(&self) -> &str;

    async fn get_tracks(&self) -> Vec<Arc<dyn MediaTrack>>;

    async fn get_tracks_by_kind(&self, kind: TrackKind) -> Vec<Arc<dyn MediaTrack>> {
        self.get_tracks()
            .await
            .into_iter()
            .filter(|t| t.kind() == kind)
            .collect()
    }

    async fn has_track(&self, id: &str) -> bool {
        self.get_tracks().await.iter().any(|t| t.id() == id)
    }
}
