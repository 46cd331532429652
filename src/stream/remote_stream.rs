use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::TrackContainer;
use crate::error::Result;
use crate::layer_control::message::{ControlMessage, Layer};
use crate::layer_control::remote_layer_controller::RemoteLayerController;
use crate::track::MediaTrack;
use crate::transport::TransportBinding;

/// RemoteStream is a stream received from a peer. Preferences about what to
/// receive go through its controller.
pub struct RemoteStream {
    id: String,
    tracks: Mutex<Vec<Arc<dyn MediaTrack>>>,
    controller: RemoteLayerController,
    available_layers: Mutex<Vec<Layer>>,
}

impl RemoteStream {
    pub fn new(id: String, transport: &TransportBinding) -> Self {
        let control = transport.control().cloned();
        RemoteStream {
            controller: RemoteLayerController::new(id.clone(), control),
            id,
            tracks: Mutex::new(vec![]),
            available_layers: Mutex::new(vec![]),
        }
    }

    pub fn controller(&self) -> &RemoteLayerController {
        &self.controller
    }

    pub async fn add_track(&self, track: Arc<dyn MediaTrack>) {
        let mut tracks = self.tracks.lock().await;
        if !tracks.iter().any(|t| t.id() == track.id()) {
            tracks.push(track);
        }
    }

    /// remove_track drops the track with `id`, returning whether it was there
    pub async fn remove_track(&self, id: &str) -> bool {
        let mut tracks = self.tracks.lock().await;
        let before = tracks.len();
        tracks.retain(|t| t.id() != id);
        tracks.len() != before
    }

    /// available_layers returns the layers the publisher last announced as
    /// enabled; empty until an announcement arrives
    pub async fn available_layers(&self) -> Vec<Layer> {
        self.available_layers.lock().await.clone()
    }

    /// handle_control_message records a publisher's layer announcement for
    /// this stream. Other messages are ignored.
    pub async fn handle_control_message(&self, raw: &str) -> Result<()> {
        match ControlMessage::parse(raw)? {
            ControlMessage::LayerSelection(selection) if selection.stream_id == self.id => {
                log::debug!("stream {} announced layers {:?}", self.id, selection.layers);
                *self.available_layers.lock().await = selection.layers;
            }
            message => log::trace!(
                "remote stream {} ignores control message for {}",
                self.id,
                message.stream_id()
            ),
        }
        Ok(())
    }
}

#[async_trait]
impl TrackContainer for RemoteStream {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get_tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.tracks.lock().await.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layer_control::message::VideoPreference;
    use crate::mock::mock_data_channel::MockDataChannel;
    use crate::mock::mock_transport::MockTransport;
    use crate::track::local_track::LocalTrack;
    use crate::track::TrackKind;

    async fn binding() -> (Arc<MockDataChannel>, Arc<TransportBinding>) {
        let dc = Arc::new(MockDataChannel::new("layers"));
        let transport = Arc::new(MockTransport::with_data_channel(Arc::clone(&dc)));
        (dc, TransportBinding::new(transport).await)
    }

    #[tokio::test]
    async fn test_remote_stream_records_announced_layers() -> Result<()> {
        let (_, binding) = binding().await;
        let stream = RemoteStream::new("s1".to_owned(), &binding);
        assert!(stream.available_layers().await.is_empty());

        stream
            .handle_control_message(r#"{"streamId":"s1","layers":["high","low"]}"#)
            .await?;
        assert_eq!(stream.available_layers().await, vec![Layer::High, Layer::Low]);

        // other streams and selections leave the record untouched
        stream
            .handle_control_message(r#"{"streamId":"s2","layers":[]}"#)
            .await?;
        stream
            .handle_control_message(
                r#"{"streamId":"s1","video":"none","audio":true,"framerate":"high"}"#,
            )
            .await?;
        assert_eq!(stream.available_layers().await, vec![Layer::High, Layer::Low]);

        assert!(stream.handle_control_message("not json").await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_remote_stream_tracks() -> Result<()> {
        let (_, binding) = binding().await;
        let stream = RemoteStream::new("s1".to_owned(), &binding);

        let audio: Arc<dyn MediaTrack> = Arc::new(LocalTrack::with_id(
            "a".to_owned(),
            TrackKind::Audio,
            None,
        ));
        stream.add_track(Arc::clone(&audio)).await;
        stream.add_track(audio).await;
        assert_eq!(stream.get_tracks().await.len(), 1);
        assert!(stream.has_track("a").await);
        assert_eq!(stream.get_tracks_by_kind(TrackKind::Video).await.len(), 0);

        assert!(stream.remove_track("a").await);
        assert!(!stream.remove_track("a").await);

        Ok(())
    }

    #[tokio::test]
    async fn test_remote_stream_controller_sends_over_shared_channel() -> Result<()> {
        let (dc, binding) = binding().await;
        let stream = RemoteStream::new("s1".to_owned(), &binding);
        assert_eq!(stream.controller().stream_id(), "s1");

        dc.open().await;
        stream.controller().prefer_layer(Layer::Medium).await?;

        assert_eq!(stream.controller().state().await.video, VideoPreference::Medium);
        assert_eq!(
            dc.sent_messages(),
            vec![r#"{"streamId":"s1","video":"medium","audio":true,"framerate":"high"}"#.to_owned()]
        );

        Ok(())
    }
}
