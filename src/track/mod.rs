
pub mod local_track;

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// TrackKind determines whether a track carries audio or video
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[default]
    Unspecified = 0,

    /// TrackKind::Audio indicates this is an audio track
    Audio = 1,

    /// TrackKind::Video indicates this is a video track
    Video = 2,
}

const TRACK_KIND_AUDIO_STR: &str = "audio";
const TRACK_KIND_VIDEO_STR: &str = "video";

impl From<&str> for TrackKind {
    fn from(raw: &str) -> Self {
        match raw {
            TRACK_KIND_AUDIO_STR => TrackKind::Audio,
            TRACK_KIND_VIDEO_STR => TrackKind::Video,
            _ => TrackKind::Unspecified,
        }
    }
}

impl From<u8> for TrackKind {
    fn from(v: u8) -> Self {
        match v {
            1 => TrackKind::Audio,
            2 => TrackKind::Video,
            _ => TrackKind::Unspecified,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            TrackKind::Audio => TRACK_KIND_AUDIO_STR,
            TrackKind::Video => TRACK_KIND_VIDEO_STR,
            TrackKind::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// TrackState mirrors the readyState of a MediaStreamTrack.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackState {
    Unspecified = 0,

    /// TrackState::Live indicates the source is still producing media
    #[default]
    Live,

    /// TrackState::Ended indicates the track has been stopped and will never
    /// produce media again
    Ended,
}

impl From<u8> for TrackState {
    fn from(v: u8) -> Self {
        match v {
            1 => TrackState::Live,
            2 => TrackState::Ended,
            _ => TrackState::Unspecified,
        }
    }
}

impl fmt::Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            TrackState::Live => "live",
            TrackState::Ended => "ended",
            TrackState::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// MediaTrack is a single source of audio or video handed out by the media
/// platform, either a real capture or a synthesized placeholder.
///
/// Implementations must make `stop` idempotent: stopping an ended track does
/// nothing.
pub trait MediaTrack: fmt::Debug + Send + Sync {
    /// id is the unique identifier for this track
    fn id(&self) -> &str;

    /// kind controls if this track is audio or video
    fn kind(&self) -> TrackKind;

    /// enabled reports whether the track is actively producing signal. A
    /// disabled video track renders black frames, a disabled audio track
    /// renders silence.
    fn enabled(&self) -> bool;

    fn set_enabled(&self, enabled: bool);

    fn ready_state(&self) -> TrackState;

    /// stop releases the underlying source and moves the track to
    /// `TrackState::Ended`
    fn stop(&self);

    fn as_any(&self) -> &dyn Any;
}
