//! Response dispatcher for inbound frames.

use crate::{ChannelResult, InboundEvent};
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the consumer event channel.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Events emitted by the channel client.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// Channel established.
    Connected,
    /// Channel lost, with an optional reason.
    Disconnected(Option<String>),
    /// Decoded inbound frame.
    Response(InboundEvent),
}

/// Decodes inbound frames and republishes them as typed events.
///
/// Purely reactive; holds no state beyond the event sender. Consumers
/// subscribe via [`ResponseDispatcher::subscribe`] and receive events in the
/// order the frames arrived.
#[derive(Clone)]
pub struct ResponseDispatcher {
    event_tx: broadcast::Sender<ChannelEvent>,
}

impl ResponseDispatcher {
    /// Create a new dispatcher.
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { event_tx }
    }

    /// Subscribe to channel events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.event_tx.subscribe()
    }

    /// Decode a text frame and publish it as a response event.
    ///
    /// Returns a decode error for frames that are not valid JSON; the caller
    /// logs and drops the frame, and the channel stays open.
    pub fn dispatch(&self, frame: &str) -> ChannelResult<()> {
        let payload: serde_json::Value = serde_json::from_str(frame)?;

        let event = InboundEvent {
            payload,
            received_at: Utc::now(),
        };

        debug!("Dispatching inbound event");
        let _ = self.event_tx.send(ChannelEvent::Response(event));
        Ok(())
    }

    /// Publish a lifecycle event.
    pub(crate) fn emit(&self, event: ChannelEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl Default for ResponseDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
