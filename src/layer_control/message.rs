use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::simulcast::{RID_FULL, RID_HALF, RID_QUARTER};

/// Layer is a simulcast quality layer as named on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Low,
    Medium,
    High,
}

const LAYER_LOW_STR: &str = "low";
const LAYER_MEDIUM_STR: &str = "medium";
const LAYER_HIGH_STR: &str = "high";
const VIDEO_PREFERENCE_NONE_STR: &str = "none";

impl Layer {
    /// ALL lists the layers from the highest quality down, the order in which
    /// they are gated on a sender.
    pub const ALL: [Layer; 3] = [Layer::High, Layer::Medium, Layer::Low];

    /// rid maps the layer to the encoding carrying it: high is the full
    /// resolution encoding, medium the half, low the quarter.
    pub fn rid(&self) -> &'static str {
        match *self {
            Layer::High => RID_FULL,
            Layer::Medium => RID_HALF,
            Layer::Low => RID_QUARTER,
        }
    }
}

impl FromStr for Layer {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            LAYER_LOW_STR => Ok(Layer::Low),
            LAYER_MEDIUM_STR => Ok(Layer::Medium),
            LAYER_HIGH_STR => Ok(Layer::High),
            _ => Err(Error::ErrInvalidLayer(raw.to_owned())),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Layer::Low => LAYER_LOW_STR,
            Layer::Medium => LAYER_MEDIUM_STR,
            Layer::High => LAYER_HIGH_STR,
        };
        write!(f, "{s}")
    }
}

/// VideoPreference is the video layer a receiver asks for, `None` meaning no
/// video at all.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoPreference {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl VideoPreference {
    pub fn layer(&self) -> Option<Layer> {
        match *self {
            VideoPreference::None => None,
            VideoPreference::Low => Some(Layer::Low),
            VideoPreference::Medium => Some(Layer::Medium),
            VideoPreference::High => Some(Layer::High),
        }
    }
}

impl From<Layer> for VideoPreference {
    fn from(layer: Layer) -> Self {
        match layer {
            Layer::Low => VideoPreference::Low,
            Layer::Medium => VideoPreference::Medium,
            Layer::High => VideoPreference::High,
        }
    }
}

impl fmt::Display for VideoPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layer() {
            Some(layer) => write!(f, "{layer}"),
            None => write!(f, "{VIDEO_PREFERENCE_NONE_STR}"),
        }
    }
}

/// LayerSelectionMessage announces which simulcast layers a publisher has
/// enabled for a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSelectionMessage {
    pub stream_id: String,
    pub layers: Vec<Layer>,
}

/// RemoteSelectionMessage carries a receiver's complete preference for a
/// stream it consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSelectionMessage {
    pub stream_id: String,
    pub video: VideoPreference,
    pub audio: bool,
    pub framerate: Layer,
}

/// ControlMessage is any message travelling over the layer control channel.
/// Both shapes are plain JSON objects without a type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlMessage {
    RemoteSelection(RemoteSelectionMessage),
    LayerSelection(LayerSelectionMessage),
}

impl ControlMessage {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn stream_id(&self) -> &str {
        match self {
            ControlMessage::RemoteSelection(m) => &m.stream_id,
            ControlMessage::LayerSelection(m) => &m.stream_id,
        }
    }

    /// coalesce_key identifies messages that supersede each other: a newer
    /// message of the same shape for the same stream carries the full state
    pub(crate) fn coalesce_key(&self) -> (&'static str, &str) {
        let shape = match self {
            ControlMessage::RemoteSelection(_) => "selection",
            ControlMessage::LayerSelection(_) => "layers",
        };
        (shape, self.stream_id())
    }
}

impl From<LayerSelectionMessage> for ControlMessage {
    fn from(m: LayerSelectionMessage) -> Self {
        ControlMessage::LayerSelection(m)
    }
}

impl From<RemoteSelectionMessage> for ControlMessage {
    fn from(m: RemoteSelectionMessage) -> Self {
        ControlMessage::RemoteSelection(m)
    }
}
