
pub mod message;
pub mod remote_layer_controller;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use portable_atomic::AtomicBool;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::transport::data_channel::{DataChannel, RTCDataChannelState};
use message::ControlMessage;

struct PendingSend {
    key: (&'static str, String),
    payload: String,
}

/// LayerControlChannel sends layer control messages over the side channel of
/// a transport.
///
/// Messages sent while the channel is still connecting are held back and
/// flushed, in the order they were first queued, once it opens. A message
/// supersedes a held back message of the same shape for the same stream, so
/// the peer always ends up with the final state of every stream. A single
/// open handler is installed for all of them. Messages that fail to send stay
/// held back until the next flush.
pub struct LayerControlChannel {
    data_channel: Arc<dyn DataChannel>,
    pending: Arc<Mutex<Vec<PendingSend>>>,
    open_handler_set: Arc<AtomicBool>,
}

impl LayerControlChannel {
    pub fn new(data_channel: Arc<dyn DataChannel>) -> Self {
        LayerControlChannel {
            data_channel,
            pending: Arc::new(Mutex::new(vec![])),
            open_handler_set: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn data_channel(&self) -> &Arc<dyn DataChannel> {
        &self.data_channel
    }

    /// send serializes `message` and delivers it now if the channel is open,
    /// otherwise once it opens.
    pub async fn send(&self, message: &ControlMessage) -> Result<()> {
        let payload = serde_json::to_string(message)?;

        let mut pending = self.pending.lock().await;
        let (shape, stream_id) = message.coalesce_key();
        match pending
            .iter_mut()
            .find(|p| p.key.0 == shape && p.key.1 == stream_id)
        {
            Some(p) => {
                log::trace!(
                    "superseding pending {shape} message for stream {stream_id} on {}",
                    self.data_channel.label()
                );
                p.payload = payload;
            }
            None => pending.push(PendingSend {
                key: (shape, stream_id.to_owned()),
                payload,
            }),
        }

        if self.data_channel.ready_state() == RTCDataChannelState::Open {
            // anything still held back is older than this message
            return flush(self.data_channel.as_ref(), &mut pending).await;
        }
        drop(pending);

        if !self.open_handler_set.swap(true, Ordering::SeqCst) {
            let data_channel = Arc::clone(&self.data_channel);
            let pending = Arc::clone(&self.pending);
            let open_handler_set = Arc::clone(&self.open_handler_set);
            self.data_channel.on_open(Box::new(move || {
                Box::pin(async move {
                    let mut pending = pending.lock().await;
                    open_handler_set.store(false, Ordering::SeqCst);
                    if let Err(err) = flush(data_channel.as_ref(), &mut pending).await {
                        log::warn!(
                            "failed to flush layer control messages on {}: {err}",
                            data_channel.label()
                        );
                    }
                })
            }));
        }

        Ok(())
    }

    /// pending_len returns how many messages wait to be sent
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }
}

/// flush sends the pending payloads in order. A payload leaves the list only
/// once it has been sent, so a failure keeps it and everything after it for
/// the next flush.
async fn flush(data_channel: &dyn DataChannel, pending: &mut Vec<PendingSend>) -> Result<()> {
    while let Some(p) = pending.first() {
        data_channel.send_text(p.payload.clone()).await?;
        pending.remove(0);
    }
    Ok(())
}
