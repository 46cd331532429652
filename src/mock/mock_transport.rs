use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portable_atomic::{AtomicBool, AtomicUsize};

use super::lock;
use super::mock_data_channel::MockDataChannel;
use crate::codec::RTCRtpCodecCapability;
use crate::error::{Error, Result};
use crate::track::{MediaTrack, TrackKind};
use crate::transport::data_channel::DataChannel;
use crate::transport::rtp_sender::{RTCRtpSendParameters, RtpSender};
use crate::transport::{RTCRtpTransceiverInit, Transport};

/// MockRtpSender stores whatever it is told and remembers how it was created.
pub struct MockRtpSender {
    id: String,
    kind: TrackKind,
    init: RTCRtpTransceiverInit,
    track: Mutex<Option<Arc<dyn MediaTrack>>>,
    parameters: Mutex<RTCRtpSendParameters>,
    codec_preferences: Mutex<Vec<RTCRtpCodecCapability>>,
    fail_set_parameters: AtomicBool,
    parameter_commits: AtomicUsize,
}

impl MockRtpSender {
    pub fn new(track: Arc<dyn MediaTrack>, init: RTCRtpTransceiverInit) -> Self {
        MockRtpSender {
            id: crate::generate_random_id(),
            kind: track.kind(),
            parameters: Mutex::new(RTCRtpSendParameters {
                encodings: init.send_encodings.clone(),
            }),
            init,
            track: Mutex::new(Some(track)),
            codec_preferences: Mutex::new(vec![]),
            fail_set_parameters: AtomicBool::new(false),
            parameter_commits: AtomicUsize::new(0),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    /// init returns the transceiver init the sender was created with
    pub fn init(&self) -> &RTCRtpTransceiverInit {
        &self.init
    }

    /// current_track returns the bound track without going through the trait
    pub fn current_track(&self) -> Option<Arc<dyn MediaTrack>> {
        lock(&self.track).clone()
    }

    pub fn parameters(&self) -> RTCRtpSendParameters {
        lock(&self.parameters).clone()
    }

    pub fn codec_preferences(&self) -> Vec<RTCRtpCodecCapability> {
        lock(&self.codec_preferences).clone()
    }

    /// parameter_commits counts successful `set_parameters` calls
    pub fn parameter_commits(&self) -> usize {
        self.parameter_commits.load(Ordering::SeqCst)
    }

    pub fn set_fail_set_parameters(&self, fail: bool) {
        self.fail_set_parameters.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RtpSender for MockRtpSender {
    fn id(&self) -> &str {
        &self.id
    }

    async fn track(&self) -> Option<Arc<dyn MediaTrack>> {
        self.current_track()
    }

    async fn replace_track(&self, track: Option<Arc<dyn MediaTrack>>) -> Result<()> {
        if let Some(t) = &track {
            if t.kind() != self.kind {
                return Err(Error::ErrRTPSenderNewTrackHasIncorrectKind);
            }
        }

        *lock(&self.track) = track;
        Ok(())
    }

    async fn get_parameters(&self) -> RTCRtpSendParameters {
        self.parameters()
    }

    async fn set_parameters(&self, parameters: RTCRtpSendParameters) -> Result<()> {
        if self.fail_set_parameters.load(Ordering::SeqCst) {
            return Err(Error::new("mock set_parameters failure".to_owned()));
        }

        *lock(&self.parameters) = parameters;
        self.parameter_commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_codec_preferences(&self, codecs: Vec<RTCRtpCodecCapability>) -> Result<()> {
        *lock(&self.codec_preferences) = codecs;
        Ok(())
    }
}

/// MockTransport creates `MockRtpSender`s and optionally exposes a
/// `MockDataChannel` as its side channel.
#[derive(Default)]
pub struct MockTransport {
    senders: Mutex<Vec<Arc<MockRtpSender>>>,
    removed: Mutex<Vec<String>>,
    data_channel: Option<Arc<MockDataChannel>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport::default()
    }

    pub fn with_data_channel(data_channel: Arc<MockDataChannel>) -> Self {
        MockTransport {
            data_channel: Some(data_channel),
            ..Default::default()
        }
    }

    /// mock_senders returns the senders still attached, in creation order
    pub fn mock_senders(&self) -> Vec<Arc<MockRtpSender>> {
        lock(&self.senders).clone()
    }

    /// mock_senders_of_kind returns the attached senders created for `kind`
    pub fn mock_senders_of_kind(&self, kind: TrackKind) -> Vec<Arc<MockRtpSender>> {
        self.mock_senders()
            .into_iter()
            .filter(|s| s.kind() == kind)
            .collect()
    }

    /// removed_senders returns the ids of the senders removed so far
    pub fn removed_senders(&self) -> Vec<String> {
        lock(&self.removed).clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn add_transceiver_from_track(
        &self,
        track: Arc<dyn MediaTrack>,
        init: RTCRtpTransceiverInit,
    ) -> Result<Arc<dyn RtpSender>> {
        if !init.direction.has_send() {
            return Err(Error::new(format!(
                "cannot send {} track with direction {}",
                track.kind(),
                init.direction
            )));
        }

        let sender = Arc::new(MockRtpSender::new(track, init));
        lock(&self.senders).push(Arc::clone(&sender));
        Ok(sender as Arc<dyn RtpSender>)
    }

    async fn get_senders(&self) -> Vec<Arc<dyn RtpSender>> {
        self.mock_senders()
            .into_iter()
            .map(|s| s as Arc<dyn RtpSender>)
            .collect()
    }

    async fn remove_track(&self, sender: &Arc<dyn RtpSender>) -> Result<()> {
        let removed = {
            let mut senders = lock(&self.senders);
            let index = senders
                .iter()
                .position(|s| s.id() == sender.id())
                .ok_or(Error::ErrRTPSenderNotExisted)?;
            senders.remove(index)
        };

        removed.replace_track(None).await?;
        lock(&self.removed).push(removed.id().to_owned());
        Ok(())
    }

    async fn data_channel(&self) -> Option<Arc<dyn DataChannel>> {
        self.data_channel
            .as_ref()
            .map(|dc| Arc::clone(dc) as Arc<dyn DataChannel>)
    }
}
