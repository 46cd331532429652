#[cfg(test)]
mod remote_layer_controller_test;

use std::sync::Arc;

use tokio::sync::Mutex;

use super::message::{ControlMessage, Layer, RemoteSelectionMessage, VideoPreference};
use super::LayerControlChannel;
use crate::error::Result;
use crate::track::TrackKind;

/// RemoteLayerState is what a receiver wants from one remote stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RemoteLayerState {
    pub video: VideoPreference,
    pub audio: bool,
    pub framerate: Layer,
    /// video_pre_mute remembers the video preference in force before video was
    /// muted, restored on unmute
    pub video_pre_mute: VideoPreference,
}

impl Default for RemoteLayerState {
    fn default() -> Self {
        RemoteLayerState {
            video: VideoPreference::None,
            audio: true,
            framerate: Layer::High,
            video_pre_mute: VideoPreference::High,
        }
    }
}

/// RemoteLayerController tracks the preferred layer, framerate and mute state
/// of a remote stream and tells the publisher about every change.
///
/// Its transition methods are the only way to change the state. Each of them
/// emits the complete resulting selection.
pub struct RemoteLayerController {
    stream_id: String,
    state: Mutex<RemoteLayerState>,
    control: Option<Arc<LayerControlChannel>>,
}

impl RemoteLayerController {
    pub fn new(stream_id: String, control: Option<Arc<LayerControlChannel>>) -> Self {
        RemoteLayerController {
            stream_id,
            state: Mutex::new(RemoteLayerState::default()),
            control,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub async fn state(&self) -> RemoteLayerState {
        *self.state.lock().await
    }

    /// selection_message builds the message describing the current state
    pub async fn selection_message(&self) -> RemoteSelectionMessage {
        let state = self.state.lock().await;
        self.message_for(&state)
    }

    pub async fn prefer_layer(&self, layer: impl Into<VideoPreference>) -> Result<()> {
        let video = layer.into();
        self.transition(|state| state.video = video).await
    }

    pub async fn prefer_framerate(&self, framerate: Layer) -> Result<()> {
        self.transition(|state| state.framerate = framerate).await
    }

    pub async fn mute(&self, kind: TrackKind) -> Result<()> {
        match kind {
            TrackKind::Audio => self.transition(|state| state.audio = false).await,
            TrackKind::Video => {
                self.transition(|state| {
                    state.video_pre_mute = state.video;
                    state.video = VideoPreference::None;
                })
                .await
            }
            TrackKind::Unspecified => Ok(()),
        }
    }

    pub async fn unmute(&self, kind: TrackKind) -> Result<()> {
        match kind {
            TrackKind::Audio => self.transition(|state| state.audio = true).await,
            TrackKind::Video => {
                self.transition(|state| state.video = state.video_pre_mute)
                    .await
            }
            TrackKind::Unspecified => Ok(()),
        }
    }

    async fn transition(&self, f: impl FnOnce(&mut RemoteLayerState)) -> Result<()> {
        // held across the send so messages leave in the order of the changes
        let mut state = self.state.lock().await;
        f(&mut state);
        let message = self.message_for(&state);

        match &self.control {
            Some(control) => control.send(&ControlMessage::from(message)).await,
            None => {
                log::trace!(
                    "no control channel for stream {}, selection kept locally",
                    self.stream_id
                );
                Ok(())
            }
        }
    }

    fn message_for(&self, state: &RemoteLayerState) -> RemoteSelectionMessage {
        RemoteSelectionMessage {
            stream_id: self.stream_id.clone(),
            video: state.video,
            audio: state.audio,
            framerate: state.framerate,
        }
    }
}
