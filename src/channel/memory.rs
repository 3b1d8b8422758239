//! In-memory channel for tests, demos and offline use.

use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use super::error::{ChannelError, ChannelResult};
use super::id::{RequestId, RequestIdGenerator};
use super::Channel;

type Responder = Box<dyn Fn(RequestId, &str) -> Option<String> + Send + Sync>;

/// A channel whose responses are scripted by the caller.
///
/// Responses can be queued up front with [`MemoryChannel::push_response`]
/// or produced on every send by a responder closure. Closing the channel
/// makes `receive` return `None` once the queued responses are drained.
///
/// # Example
///
/// ```ignore
/// use grnbind::channel::MemoryChannel;
///
/// let channel = MemoryChannel::starting_at(7);
/// channel.push_response(5, "[[[0],[]]]");
/// channel.push_response(7, "[[[1],[[\"_id\",\"UInt32\"]],[1]]]");
/// ```
pub struct MemoryChannel {
    ids: RequestIdGenerator,
    inbox_tx: StdMutex<Option<mpsc::UnboundedSender<(RequestId, String)>>>,
    inbox_rx: Mutex<mpsc::UnboundedReceiver<(RequestId, String)>>,
    sent: StdMutex<Vec<(RequestId, String)>>,
    responder: Option<Responder>,
}

impl MemoryChannel {
    /// Create a channel whose first request id is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a channel whose first request id is `start`.
    pub fn starting_at(start: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            ids: RequestIdGenerator::starting_at(start),
            inbox_tx: StdMutex::new(Some(tx)),
            inbox_rx: Mutex::new(rx),
            sent: StdMutex::new(Vec::new()),
            responder: None,
        }
    }

    /// Answer every sent command with the closure's payload, if any.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(RequestId, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Queue a response. Ignored once the channel is closed.
    pub fn push_response(&self, id: impl Into<RequestId>, payload: impl Into<String>) {
        let guard = self.inbox_tx.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(tx) = guard.as_ref() {
            let _ = tx.send((id.into(), payload.into()));
        }
    }

    /// Close the channel. Already queued responses can still be received.
    pub fn close(&self) {
        let mut guard = self.inbox_tx.lock().unwrap_or_else(|e| e.into_inner());
        guard.take();
    }

    /// Commands sent so far, in send order.
    pub fn sent_commands(&self) -> Vec<String> {
        let sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        sent.iter().map(|(_, command)| command.clone()).collect()
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for MemoryChannel {
    async fn send(&self, command: &str) -> ChannelResult<RequestId> {
        if self
            .inbox_tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
        {
            return Err(ChannelError::Closed);
        }

        let id = self.ids.next_id();
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, command.to_string()));

        if let Some(responder) = &self.responder {
            if let Some(payload) = responder(id, command) {
                self.push_response(id, payload);
            }
        }
        Ok(id)
    }

    async fn receive(&self) -> ChannelResult<Option<(RequestId, String)>> {
        let mut rx = self.inbox_rx.lock().await;
        Ok(rx.recv().await)
    }
}
