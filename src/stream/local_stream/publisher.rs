use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use waitgroup::WaitGroup;

use super::{LocalStream, PublishBinding};
use crate::codec::select_codec;
use crate::error::{flatten_errs, Result};
use crate::layer_control::message::{
    ControlMessage, Layer, LayerSelectionMessage, RemoteSelectionMessage,
};
use crate::simulcast::{plan_encodings, EncodingUpdate, RTCRtpEncodingParameters};
use crate::stream::TrackContainer;
use crate::track::{MediaTrack, TrackKind};
use crate::transport::rtp_sender::RtpSender;
use crate::transport::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use crate::transport::{RTCRtpTransceiverInit, TransportBinding};

/// EncodingTarget picks the encoding entry an update is merged into: the one
/// tagged with a rid, or the first one.
type EncodingTarget = Option<&'static str>;

impl LocalStream {
    /// publish binds the stream to `transport` and creates a send-path for
    /// every track it holds. `encodings`, when given, is used verbatim for
    /// video send-paths instead of the planned ladder.
    pub async fn publish(
        &self,
        transport: Arc<TransportBinding>,
        encodings: Option<Vec<RTCRtpEncodingParameters>>,
    ) -> Result<()> {
        if self.is_published() {
            log::debug!("stream {} is published again, send-paths are rebound", self.id);
        }

        self.binding.store(Some(Arc::new(PublishBinding {
            transport,
            encodings,
            send_paths: Mutex::new(HashMap::new()),
        })));

        for track in self.get_tracks().await {
            self.publish_track(track).await?;
        }

        Ok(())
    }

    /// publish_track creates a send-only send-path carrying `track`. It is a
    /// no-op until the stream is published.
    pub async fn publish_track(&self, track: Arc<dyn MediaTrack>) -> Result<()> {
        let binding = match self.binding.load_full() {
            Some(binding) => binding,
            None => {
                log::trace!("stream {} is not published, {} kept local", self.id, track.id());
                return Ok(());
            }
        };

        let kind = track.kind();
        let send_encodings = if kind == TrackKind::Video {
            match &binding.encodings {
                Some(encodings) => encodings.clone(),
                None => {
                    let constraints = self.constraints.lock().await;
                    plan_encodings(constraints.resolution, constraints.simulcast)
                }
            }
        } else {
            vec![]
        };

        let init = RTCRtpTransceiverInit {
            direction: RTCRtpTransceiverDirection::Sendonly,
            send_encodings,
            streams: vec![self.id.clone()],
        };
        let sender = binding
            .transport
            .transport()
            .add_transceiver_from_track(track, init)
            .await?;
        log::debug!("stream {} publishes {kind} on sender {}", self.id, sender.id());

        {
            let mut send_paths = binding.send_paths.lock().await;
            send_paths.insert(kind, Arc::clone(&sender));
        }

        self.apply_codec_preferences(kind, &sender).await
    }

    /// unpublish removes every send-path carrying a track of this stream from
    /// the transport. Every removal is attempted before errors are reported.
    pub async fn unpublish(&self) -> Result<()> {
        let binding = match self.binding.load_full() {
            Some(binding) => binding,
            None => return Ok(()),
        };

        let owned = self.owned_senders().await;
        let mut errs = vec![];
        for sender in &owned {
            if let Err(err) = binding.transport.transport().remove_track(sender).await {
                log::warn!("failed to remove sender {} of stream {}: {err}", sender.id(), self.id);
                errs.push(err);
            }
        }

        binding.send_paths.lock().await.clear();
        flatten_errs(errs)
    }

    /// update_media_encoding_params merges `params` into one encoding of every
    /// send-path of the stream: the encoding of `layer` when simulcast is
    /// active, the first one otherwise. Send-paths lacking that encoding are
    /// skipped.
    pub async fn update_media_encoding_params(
        &self,
        params: EncodingUpdate,
        layer: Option<Layer>,
    ) -> Result<()> {
        let target = if self.simulcast_active().await {
            layer.map(|l| l.rid())
        } else {
            None
        };

        let senders = self.owned_senders().await;
        commit_encoding_updates(senders, vec![(target, params)]).await;
        Ok(())
    }

    /// enable_layers announces `layers` over the layer control channel, then
    /// activates exactly those layers on the stream's video send-paths.
    ///
    /// Without simulcast the single encoding stands for every layer: it is
    /// active when `layers` holds any layer and inactive when it is empty.
    pub async fn enable_layers(&self, layers: &[Layer]) -> Result<()> {
        let binding = match self.binding.load_full() {
            Some(binding) => binding,
            None => return Ok(()),
        };

        if let Some(control) = binding.transport.control() {
            let message = LayerSelectionMessage {
                stream_id: self.id.clone(),
                layers: layers.to_vec(),
            };
            if let Err(err) = control.send(&ControlMessage::from(message)).await {
                log::warn!("failed to announce layers of stream {}: {err}", self.id);
            }
        }

        let updates = self.layer_updates(|layer| layers.contains(&layer)).await;
        let senders = self.owned_senders_of_kind(TrackKind::Video).await;
        commit_encoding_updates(senders, updates).await;
        Ok(())
    }

    /// handle_control_message applies a receiver's selection for this stream
    /// to the local send-paths. Other messages are ignored.
    pub async fn handle_control_message(&self, raw: &str) -> Result<()> {
        match ControlMessage::parse(raw)? {
            ControlMessage::RemoteSelection(selection) if selection.stream_id == self.id => {
                self.apply_remote_selection(&selection).await
            }
            message => {
                log::trace!(
                    "stream {} ignores control message for {}",
                    self.id,
                    message.stream_id()
                );
                Ok(())
            }
        }
    }

    async fn apply_remote_selection(&self, selection: &RemoteSelectionMessage) -> Result<()> {
        log::debug!(
            "stream {} selected as video={} audio={} framerate={}",
            self.id,
            selection.video,
            selection.audio,
            selection.framerate
        );

        let wanted = selection.video.layer();
        let video_updates = self.layer_updates(|layer| Some(layer) == wanted).await;
        let video = self.owned_senders_of_kind(TrackKind::Video).await;
        commit_encoding_updates(video, video_updates).await;

        let audio = self.owned_senders_of_kind(TrackKind::Audio).await;
        commit_encoding_updates(audio, vec![(None, EncodingUpdate::active(selection.audio))])
            .await;

        Ok(())
    }

    /// layer_updates turns a per-layer on/off decision into encoding updates.
    /// Without simulcast the single encoding is active when any layer is.
    async fn layer_updates(
        &self,
        enabled: impl Fn(Layer) -> bool,
    ) -> Vec<(EncodingTarget, EncodingUpdate)> {
        if self.simulcast_active().await {
            Layer::ALL
                .iter()
                .map(|layer| (Some(layer.rid()), EncodingUpdate::active(enabled(*layer))))
                .collect()
        } else {
            let any = Layer::ALL.iter().any(|layer| enabled(*layer));
            vec![(None, EncodingUpdate::active(any))]
        }
    }

    /// simulcast_active reports whether video send-paths carry a ladder: an
    /// explicit encoding override decides by its size, the constraints
    /// otherwise.
    pub(crate) async fn simulcast_active(&self) -> bool {
        if let Some(binding) = self.binding.load_full() {
            if let Some(encodings) = &binding.encodings {
                return encodings.len() > 1;
            }
        }
        self.constraints.lock().await.simulcast
    }

    async fn apply_codec_preferences(
        &self,
        kind: TrackKind,
        sender: &Arc<dyn RtpSender>,
    ) -> Result<()> {
        let capabilities = match self.platform.codec_capabilities(kind).await {
            Some(capabilities) => capabilities,
            None => {
                log::trace!("no {kind} codec capabilities, keeping negotiation defaults");
                return Ok(());
            }
        };

        let (codec, profile) = {
            let constraints = self.constraints.lock().await;
            (
                constraints.codec.clone(),
                constraints.preferred_codec_profile.clone(),
            )
        };

        match select_codec(kind, &capabilities, &codec, profile.as_deref()) {
            Some(capability) => {
                log::debug!(
                    "sender {} restricted to {} {}",
                    sender.id(),
                    capability.mime_type,
                    capability.sdp_fmtp_line
                );
                sender.set_codec_preferences(vec![capability]).await
            }
            None => {
                log::debug!("no {kind} capability matches codec {codec}, keeping defaults");
                Ok(())
            }
        }
    }

    /// owned_senders returns the transport's send-paths created by this stream
    /// or carrying one of its tracks
    pub(crate) async fn owned_senders(&self) -> Vec<Arc<dyn RtpSender>> {
        let binding = match self.binding.load_full() {
            Some(binding) => binding,
            None => return vec![],
        };

        let tracks = self.get_tracks().await;
        let send_paths: Vec<Arc<dyn RtpSender>> =
            binding.send_paths.lock().await.values().cloned().collect();

        let mut owned = vec![];
        for sender in binding.transport.transport().get_senders().await {
            let created = send_paths.iter().any(|s| s.id() == sender.id());
            let carries = match sender.track().await {
                Some(track) => tracks.iter().any(|t| t.id() == track.id()),
                None => false,
            };
            if created || carries {
                owned.push(sender);
            }
        }
        owned
    }

    async fn owned_senders_of_kind(&self, kind: TrackKind) -> Vec<Arc<dyn RtpSender>> {
        let send_path = self.send_path(kind).await;

        let mut senders = vec![];
        for sender in self.owned_senders().await {
            let created_for_kind = send_path.as_ref().map(|s| s.id()) == Some(sender.id());
            let carries_kind = sender.track().await.map(|t| t.kind()) == Some(kind);
            if created_for_kind || carries_kind {
                senders.push(sender);
            }
        }
        senders
    }
}

/// commit_encoding_updates merges `updates` into the parameters of every
/// sender and commits them, one task per sender. A sender whose parameters
/// cannot be committed is skipped.
async fn commit_encoding_updates(
    senders: Vec<Arc<dyn RtpSender>>,
    updates: Vec<(EncodingTarget, EncodingUpdate)>,
) {
    if senders.is_empty() {
        return;
    }

    let wg = WaitGroup::new();
    for sender in senders {
        let w = wg.worker();
        let updates = updates.clone();
        tokio::spawn(async move {
            let _d = w;

            let mut parameters = sender.get_parameters().await;
            if parameters.encodings.is_empty() {
                parameters.encodings.push(RTCRtpEncodingParameters::default());
            }

            for (target, update) in &updates {
                let encoding = match target {
                    Some(rid) => parameters.encodings.iter_mut().find(|e| e.rid == *rid),
                    None => parameters.encodings.first_mut(),
                };
                match encoding {
                    Some(encoding) => encoding.apply(update),
                    None => log::trace!(
                        "sender {} has no encoding {}, update skipped",
                        sender.id(),
                        target.unwrap_or_default()
                    ),
                }
            }

            if let Err(err) = sender.set_parameters(parameters).await {
                log::warn!("failed to commit parameters of sender {}: {err}", sender.id());
            }
        });
    }
    wg.wait().await;
}
