use std::sync::atomic::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use portable_atomic::{AtomicBool, AtomicU8};

use super::lock;
use crate::error::{Error, Result};
use crate::transport::data_channel::{DataChannel, OnOpenHdlrFn, RTCDataChannelState};

/// MockDataChannel is an in-memory side channel. It starts connecting and only
/// opens when the test calls `open`.
pub struct MockDataChannel {
    label: String,
    ready_state: AtomicU8,
    fail_sends: AtomicBool,
    sent: Mutex<Vec<String>>,
    on_open_handler: Mutex<Option<OnOpenHdlrFn>>,
    on_open_calls: Mutex<usize>,
}

impl MockDataChannel {
    pub fn new(label: &str) -> Self {
        MockDataChannel {
            label: label.to_owned(),
            ready_state: AtomicU8::new(RTCDataChannelState::Connecting as u8),
            fail_sends: AtomicBool::new(false),
            sent: Mutex::new(vec![]),
            on_open_handler: Mutex::new(None),
            on_open_calls: Mutex::new(0),
        }
    }

    /// open moves the channel to open and runs the pending open handler to
    /// completion before returning
    pub async fn open(&self) {
        self.set_ready_state(RTCDataChannelState::Open);
        let handler = lock(&self.on_open_handler).take();
        if let Some(f) = handler {
            f().await;
        }
    }

    pub fn close(&self) {
        self.set_ready_state(RTCDataChannelState::Closed);
    }

    /// set_fail_sends makes every following send fail
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// sent_messages returns every text delivered so far, in order
    pub fn sent_messages(&self) -> Vec<String> {
        lock(&self.sent).clone()
    }

    /// on_open_calls counts how many times a handler was installed
    pub fn on_open_calls(&self) -> usize {
        *lock(&self.on_open_calls)
    }

    pub fn has_open_handler(&self) -> bool {
        lock(&self.on_open_handler).is_some()
    }

    fn set_ready_state(&self, state: RTCDataChannelState) {
        self.ready_state.store(state as u8, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataChannel for MockDataChannel {
    fn label(&self) -> &str {
        &self.label
    }

    fn ready_state(&self) -> RTCDataChannelState {
        self.ready_state.load(Ordering::SeqCst).into()
    }

    async fn send_text(&self, text: String) -> Result<usize> {
        if self.ready_state() != RTCDataChannelState::Open {
            return Err(Error::ErrDataChannelNotOpen);
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Error::new("mock send failure".to_owned()));
        }

        let n = text.len();
        lock(&self.sent).push(text);
        Ok(n)
    }

    fn on_open(&self, f: OnOpenHdlrFn) {
        *lock(&self.on_open_calls) += 1;
        let _ = lock(&self.on_open_handler).replace(f);

        if self.ready_state() == RTCDataChannelState::Open {
            if let Some(f) = lock(&self.on_open_handler).take() {
                tokio::spawn(async move {
                    f().await;
                });
            }
        }
    }
}
