//! Persistent bidirectional message channel for the assistant client.
//!
//! This crate provides:
//! - ChannelClient: WebSocket connection manager with automatic reconnection
//! - DeliveryQueue: FIFO buffer for messages submitted while offline
//! - ResponseDispatcher: decodes inbound frames and republishes them as events

mod client;
mod dispatcher;
mod error;
mod messages;
mod queue;

pub use client::{ChannelClient, ChannelConfig, ConnectionState};
pub use dispatcher::{ChannelEvent, ResponseDispatcher};
pub use error::{ChannelError, ChannelResult};
pub use messages::{InboundEvent, OutboundFrame};
pub use queue::{DeliveryQueue, PendingMessage};
