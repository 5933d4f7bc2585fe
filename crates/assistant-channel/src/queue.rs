//! Delivery queue for messages submitted while offline.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::debug;

/// A message waiting for the channel to come up.
#[derive(Debug, Clone)]
pub struct PendingMessage {
    /// Raw message text as passed to `send()`.
    pub payload: String,
    /// When the message was queued.
    pub enqueued_at: DateTime<Utc>,
}

/// Strict FIFO holding area for outbound messages.
///
/// Unbounded; insertion order equals send order. A message leaves the queue
/// only when it is popped for delivery, so nothing is dropped silently. The
/// queue is drained only while the channel is connected; a message is popped
/// before its send is attempted, which makes the in-flight message
/// at-most-once per drain attempt.
pub struct DeliveryQueue {
    pending: Mutex<VecDeque<PendingMessage>>,
}

impl DeliveryQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Append a message to the back of the queue.
    pub async fn enqueue(&self, payload: &str) {
        let message = PendingMessage {
            payload: payload.to_string(),
            enqueued_at: Utc::now(),
        };

        let mut pending = self.pending.lock().await;
        pending.push_back(message);
        debug!(queued = pending.len(), "Enqueued message");
    }

    /// Remove and return the front message, if any.
    pub async fn pop(&self) -> Option<PendingMessage> {
        self.pending.lock().await.pop_front()
    }

    /// Get the number of queued messages.
    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Check if the queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }
}

impl Default for DeliveryQueue {
    fn default() -> Self {
        Self::new()
    }
}
