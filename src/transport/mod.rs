pub mod data_channel;
pub mod rtp_sender;
pub mod rtp_transceiver_direction;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::layer_control::LayerControlChannel;
use crate::simulcast::RTCRtpEncodingParameters;
use crate::track::MediaTrack;
use data_channel::DataChannel;
use rtp_sender::RtpSender;
use rtp_transceiver_direction::RTCRtpTransceiverDirection;

/// RTCRtpTransceiverInit is used when creating a send-path for a track.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RTCRtpTransceiverInit {
    pub direction: RTCRtpTransceiverDirection,
    /// send_encodings determines how many physical encodings the send-path
    /// produces. Empty leaves the choice to the transport.
    pub send_encodings: Vec<RTCRtpEncodingParameters>,
    /// streams are the ids of the media streams the track is announced in
    pub streams: Vec<String>,
}

/// Transport is an established media connection: a factory for send-paths plus
/// the side channel used for layer signaling.
#[async_trait]
pub trait Transport: Send + Sync {
    /// add_transceiver_from_track creates a new send-path carrying `track`
    async fn add_transceiver_from_track(
        &self,
        track: Arc<dyn MediaTrack>,
        init: RTCRtpTransceiverInit,
    ) -> Result<Arc<dyn RtpSender>>;

    /// get_senders returns every send-path of the transport, regardless of the
    /// stream it belongs to
    async fn get_senders(&self) -> Vec<Arc<dyn RtpSender>>;

    /// remove_track stops sending the track of `sender` and detaches it
    async fn remove_track(&self, sender: &Arc<dyn RtpSender>) -> Result<()>;

    /// data_channel returns the side channel, if one was negotiated
    async fn data_channel(&self) -> Option<Arc<dyn DataChannel>>;
}

/// TransportBinding pairs a transport with the layer control channel running
/// over its side channel. Every stream published on or received from the same
/// transport shares one binding, so all of them share the channel's single
/// open handler.
pub struct TransportBinding {
    transport: Arc<dyn Transport>,
    control: Option<Arc<LayerControlChannel>>,
}

impl TransportBinding {
    pub async fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        let control = transport
            .data_channel()
            .await
            .map(|dc| Arc::new(LayerControlChannel::new(dc)));
        if control.is_none() {
            log::debug!("transport has no side channel, layer signaling disabled");
        }

        Arc::new(TransportBinding { transport, control })
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// control returns the layer control channel, if the transport has a side
    /// channel
    pub fn control(&self) -> Option<&Arc<LayerControlChannel>> {
        self.control.as_ref()
    }
}
