//! WebSocket channel client.

use crate::{
    ChannelError, ChannelEvent, ChannelResult, DeliveryQueue, OutboundFrame, ResponseDispatcher,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

/// Write half of the channel socket.
type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Channel client configuration.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Channel endpoint URL (e.g., wss://assistant.example.com/ws).
    pub channel_url: String,
    /// Delay before a reconnection attempt, in milliseconds.
    pub retry_delay_ms: u64,
    /// Maximum outbound message length, in characters.
    pub max_message_length: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_url: assistant_core::DEFAULT_CHANNEL_URL.to_string(),
            retry_delay_ms: assistant_core::DEFAULT_RETRY_DELAY_MS,
            max_message_length: assistant_core::DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }
}

impl From<&assistant_core::Config> for ChannelConfig {
    fn from(config: &assistant_core::Config) -> Self {
        Self {
            channel_url: config.channel_url.clone(),
            retry_delay_ms: config.retry_delay_ms,
            max_message_length: config.max_message_length,
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Handle to the spawned connection driver.
struct Driver {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// WebSocket channel client with automatic reconnection.
///
/// Messages submitted while the channel is down are queued and drained in
/// FIFO order once it comes back up. Reconnection is unconditional with a
/// fixed delay; it stops only on [`ChannelClient::disconnect`].
#[derive(Clone)]
pub struct ChannelClient {
    config: ChannelConfig,
    state: Arc<RwLock<ConnectionState>>,
    queue: Arc<DeliveryQueue>,
    sink: Arc<Mutex<Option<WsSink>>>,
    dispatcher: ResponseDispatcher,
    driver: Arc<Mutex<Option<Driver>>>,
}

impl ChannelClient {
    /// Create a new channel client with the given configuration.
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            queue: Arc::new(DeliveryQueue::new()),
            sink: Arc::new(Mutex::new(None)),
            dispatcher: ResponseDispatcher::new(),
            driver: Arc::new(Mutex::new(None)),
        }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ChannelConfig::default())
    }

    /// Subscribe to channel events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.dispatcher.subscribe()
    }

    /// Get the current connection state.
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Check if connected.
    pub async fn is_connected(&self) -> bool {
        *self.state.read().await == ConnectionState::Connected
    }

    /// Get the number of messages waiting in the delivery queue.
    pub async fn queued_len(&self) -> usize {
        self.queue.len().await
    }

    /// Open the channel and keep it open.
    ///
    /// Spawns the connection driver; returns immediately. No-op if the
    /// driver is already running. Transport errors while establishing the
    /// channel are logged and recovered via the retry loop, never returned.
    pub async fn connect(&self) {
        let mut driver = self.driver.lock().await;
        if driver.is_some() {
            debug!("Already connecting or connected");
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let client = self.clone();
        let handle = tokio::spawn(async move { client.run(shutdown_rx).await });

        *driver = Some(Driver {
            handle,
            shutdown: shutdown_tx,
        });
    }

    /// Send a message over the channel.
    ///
    /// While not connected the message is queued for later delivery, which
    /// is not an error. While connected the message is wrapped in an
    /// [`OutboundFrame`] and forwarded immediately; transmit failures are
    /// returned to the caller.
    pub async fn send(&self, message: &str) -> ChannelResult<()> {
        let length = message.chars().count();
        if length > self.config.max_message_length {
            return Err(ChannelError::MessageTooLong {
                length,
                max: self.config.max_message_length,
            });
        }

        if self.state().await != ConnectionState::Connected {
            self.queue.enqueue(message).await;
            return Ok(());
        }

        self.forward(OutboundFrame::new(message)).await
    }

    /// Close the channel and stop reconnecting.
    ///
    /// Cancels a pending reconnection timer, closes the socket, and waits
    /// for the driver to terminate. Idempotent.
    pub async fn disconnect(&self) {
        let driver = self.driver.lock().await.take();
        let Some(driver) = driver else {
            debug!("Not connected");
            return;
        };

        let _ = driver.shutdown.send(true);

        if let Some(mut sink) = self.sink.lock().await.take() {
            let _ = sink.close().await;
        }

        let _ = driver.handle.await;
        info!("Channel disconnected");
    }

    /// Connection driver: connect, pump frames, retry on loss.
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            self.set_state(ConnectionState::Connecting).await;
            info!(url = %self.config.channel_url, "Connecting to channel");

            let stream = tokio::select! {
                _ = shutdown.changed() => break,
                result = connect_async(self.config.channel_url.as_str()) => match result {
                    Ok((stream, _)) => Some(stream),
                    Err(e) => {
                        error!(error = %e, "Channel connect failed");
                        None
                    }
                },
            };

            let Some(stream) = stream else {
                // Failure to open takes the same path as a close: back to
                // Disconnected, then a scheduled retry.
                self.set_state(ConnectionState::Disconnected).await;
                self.dispatcher.emit(ChannelEvent::Disconnected(None));
                if self.wait_retry(&mut shutdown).await {
                    continue;
                } else {
                    break;
                }
            };

            let (write, mut read) = stream.split();
            *self.sink.lock().await = Some(write);
            self.set_state(ConnectionState::Connected).await;
            info!("Channel connected");
            self.dispatcher.emit(ChannelEvent::Connected);

            self.drain().await;

            let mut reason = None;
            loop {
                tokio::select! {
                    _ = shutdown.changed() => {
                        reason = Some("client shutdown".to_string());
                        break;
                    }
                    frame = read.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            if let Err(e) = self.dispatcher.dispatch(&text) {
                                warn!(error = %e, "Dropping undecodable inbound frame");
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let mut sink = self.sink.lock().await;
                            if let Some(sink) = sink.as_mut() {
                                let _ = sink.send(Message::Pong(data)).await;
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!("Channel closed by remote");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            error!(error = %e, "Channel transport error");
                            reason = Some(e.to_string());
                            break;
                        }
                        None => {
                            info!("Channel stream ended");
                            break;
                        }
                    }
                }
            }

            // Release the socket before deciding whether to retry.
            if let Some(mut sink) = self.sink.lock().await.take() {
                let _ = sink.close().await;
            }
            self.set_state(ConnectionState::Disconnected).await;
            self.dispatcher.emit(ChannelEvent::Disconnected(reason));

            if *shutdown.borrow() {
                break;
            }
            if !self.wait_retry(&mut shutdown).await {
                break;
            }
        }

        self.set_state(ConnectionState::Disconnected).await;
    }

    /// Forward queued messages in FIFO order after a transition into
    /// Connected.
    ///
    /// A message is removed from the queue before its send is attempted, so
    /// delivery is at-most-once per drain attempt: if the channel drops
    /// mid-drain the in-flight message is lost, and the rest stay queued
    /// for the next session.
    async fn drain(&self) {
        let mut sent = 0usize;
        while self.state().await == ConnectionState::Connected {
            let Some(pending) = self.queue.pop().await else {
                break;
            };

            if let Err(e) = self.forward(OutboundFrame::new(&pending.payload)).await {
                let remaining = self.queue.len().await;
                warn!(
                    error = %e,
                    remaining = remaining,
                    "Drain interrupted, remaining messages stay queued"
                );
                return;
            }
            sent += 1;
        }

        if sent > 0 {
            debug!(count = sent, "Drained queued messages");
        }
    }

    /// Serialize a frame and write it to the open socket.
    async fn forward(&self, frame: OutboundFrame) -> ChannelResult<()> {
        let json = frame.to_json()?;

        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or(ChannelError::NotConnected)?;

        sink.send(Message::Text(json.into()))
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }

    /// Sleep for the configured retry delay.
    ///
    /// Returns false if shutdown was requested while waiting, cancelling
    /// the pending reconnection.
    async fn wait_retry(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        info!(delay_ms = self.config.retry_delay_ms, "Scheduling reconnect");

        tokio::select! {
            _ = shutdown.changed() => false,
            _ = tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)) => true,
        }
    }

    async fn set_state(&self, state: ConnectionState) {
        *self.state.write().await = state;
    }
}
