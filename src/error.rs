use thiserror::Error;

use crate::track::TrackKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// ErrCaptureFailed indicates that the platform could not hand out a
    /// capture track for the requested kind, e.g. the device is busy or access
    /// was denied.
    #[error("failed to acquire {kind} track: {reason}")]
    ErrCaptureFailed { kind: TrackKind, reason: String },

    /// ErrPlaceholderFailed indicates that an inert placeholder track could not
    /// be synthesized for a mute.
    #[error("failed to synthesize placeholder {0} track")]
    ErrPlaceholderFailed(TrackKind),

    /// ErrRTPSenderNotExisted indicates that the RtpSender is no longer owned by
    /// its transport.
    #[error("RtpSender not exist")]
    ErrRTPSenderNotExisted,

    /// ErrRTPSenderNewTrackHasIncorrectKind indicates that a replacement track
    /// has a different kind than the one the sender was created for.
    #[error("new track must be of the same kind as previous")]
    ErrRTPSenderNewTrackHasIncorrectKind,

    /// ErrDataChannelNotOpen indicates an operation executed when the data
    /// channel is not (yet) open.
    #[error("data channel not open")]
    ErrDataChannelNotOpen,

    /// ErrUnspecifiedTrackKind indicates a per-kind operation was asked for a
    /// kind that is neither audio nor video.
    #[error("track kind must be audio or video")]
    ErrUnspecifiedTrackKind,

    #[error("invalid resolution tier: {0}")]
    ErrInvalidResolutionTier(String),

    #[error("invalid layer: {0}")]
    ErrInvalidLayer(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[allow(non_camel_case_types)]
    #[error("{0}")]
    new(String),
}

/// flatten_errs flattens multiple errors into one
pub fn flatten_errs(errs: Vec<impl Into<Error>>) -> Result<()> {
    if errs.is_empty() {
        Ok(())
    } else {
        let errs_strs: Vec<String> = errs.into_iter().map(|e| e.into().to_string()).collect();
        Err(Error::new(errs_strs.join("\n")))
    }
}
