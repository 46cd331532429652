use std::fmt;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::Result;

pub type OnOpenHdlrFn =
    Box<dyn (FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync>;

/// RTCDataChannelState indicates the state of a data channel.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCDataChannelState {
    #[default]
    Unspecified = 0,

    /// Connecting indicates that the data channel is being established. This
    /// is the initial state of a channel.
    Connecting,

    /// Open indicates that the underlying data transport is established and
    /// communication is possible.
    Open,

    /// Closing indicates that the procedure to close down the underlying data
    /// transport has started.
    Closing,

    /// Closed indicates that the underlying data transport has been closed or
    /// could not be established.
    Closed,
}

const DATA_CHANNEL_STATE_CONNECTING_STR: &str = "connecting";
const DATA_CHANNEL_STATE_OPEN_STR: &str = "open";
const DATA_CHANNEL_STATE_CLOSING_STR: &str = "closing";
const DATA_CHANNEL_STATE_CLOSED_STR: &str = "closed";

impl From<u8> for RTCDataChannelState {
    fn from(v: u8) -> Self {
        match v {
            1 => RTCDataChannelState::Connecting,
            2 => RTCDataChannelState::Open,
            3 => RTCDataChannelState::Closing,
            4 => RTCDataChannelState::Closed,
            _ => RTCDataChannelState::Unspecified,
        }
    }
}

impl From<&str> for RTCDataChannelState {
    fn from(raw: &str) -> Self {
        match raw {
            DATA_CHANNEL_STATE_CONNECTING_STR => RTCDataChannelState::Connecting,
            DATA_CHANNEL_STATE_OPEN_STR => RTCDataChannelState::Open,
            DATA_CHANNEL_STATE_CLOSING_STR => RTCDataChannelState::Closing,
            DATA_CHANNEL_STATE_CLOSED_STR => RTCDataChannelState::Closed,
            _ => RTCDataChannelState::Unspecified,
        }
    }
}

impl fmt::Display for RTCDataChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCDataChannelState::Connecting => DATA_CHANNEL_STATE_CONNECTING_STR,
            RTCDataChannelState::Open => DATA_CHANNEL_STATE_OPEN_STR,
            RTCDataChannelState::Closing => DATA_CHANNEL_STATE_CLOSING_STR,
            RTCDataChannelState::Closed => DATA_CHANNEL_STATE_CLOSED_STR,
            RTCDataChannelState::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// DataChannel is the ordered, reliable side channel that travels with the
/// media transport.
#[async_trait]
pub trait DataChannel: Send + Sync {
    fn label(&self) -> &str;

    fn ready_state(&self) -> RTCDataChannelState;

    /// send_text sends a text message to the remote peer. Returns
    /// `Error::ErrDataChannelNotOpen` unless the channel is open.
    async fn send_text(&self, text: String) -> Result<usize>;

    /// on_open sets the event handler invoked once the channel becomes open.
    /// There is a single handler slot: setting a new handler replaces a
    /// pending one. If the channel is already open the handler runs right away.
    fn on_open(&self, f: OnOpenHdlrFn);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_data_channel_state() {
        let tests = vec![
            (crate::UNSPECIFIED_STR, RTCDataChannelState::Unspecified),
            ("connecting", RTCDataChannelState::Connecting),
            ("open", RTCDataChannelState::Open),
            ("closing", RTCDataChannelState::Closing),
            ("closed", RTCDataChannelState::Closed),
        ];

        for (state_string, expected_state) in tests {
            assert_eq!(
                expected_state,
                RTCDataChannelState::from(state_string),
                "testCase: {expected_state}",
            );
            assert_eq!(state_string, expected_state.to_string());
            assert_eq!(expected_state, RTCDataChannelState::from(expected_state as u8));
        }
    }
}
