//! WebSocket relay server.
//!
//! Architecture:
//! ```text
//! Client A ── conn task ──┐                 ┌── outbound A ── Client A
//!                         ├── hub (Relay) ──┤
//! Client B ── conn task ──┘                 └── outbound B ── Client B
//! ```
//!
//! Each connection task decodes frames and forwards them to a single hub
//! task over an mpsc channel. The hub owns the `Relay` tables outright and
//! handles one event at a time in arrival order, so routing is FIFO per
//! room without any locking. Every connection has a bounded outbound
//! queue; when it is full or closed the message is dropped, never retried.

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, log, warn, Level};
use rustc_hash::FxHashMap;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_tungstenite::tungstenite::Message;

use super::protocol::{ClientMessage, ProtocolError, ServerMessage};
use super::registry::{ConnectionId, Envelope, Relay, RelayStats};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: String,
    /// Outbound queue length per connection. A message for a full queue is
    /// dropped; a dropped state update leaves that peer on an older state
    /// until the next update reaches it.
    pub outbound_capacity: usize,
    /// Deliver game chat only to rooms with the same name
    pub room_scoped_game_chat: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9090".to_string(),
            outbound_capacity: 256,
            room_scoped_game_chat: false,
        }
    }
}

impl ServerConfig {
    pub fn with_bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    pub fn with_outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = capacity.max(1);
        self
    }

    pub fn with_room_scoped_game_chat(mut self, scoped: bool) -> Self {
        self.room_scoped_game_chat = scoped;
        self
    }
}

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("relay hub stopped")]
    HubClosed,
}

/// Events from connection tasks to the hub.
#[derive(Debug)]
enum HubEvent {
    Connected {
        outbound: mpsc::Sender<Vec<u8>>,
        reply: oneshot::Sender<ConnectionId>,
    },
    Message {
        conn: ConnectionId,
        message: ClientMessage,
    },
    Disconnected(ConnectionId),
}

/// The relay server.
pub struct RelayServer {
    config: ServerConfig,
    stats_tx: watch::Sender<RelayStats>,
}

impl RelayServer {
    pub fn new(config: ServerConfig) -> Self {
        let (stats_tx, _) = watch::channel(RelayStats::default());
        Self { config, stats_tx }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }

    pub fn bind_addr(&self) -> &str {
        &self.config.bind_addr
    }

    /// Latest relay statistics, updated after every hub event.
    pub fn stats(&self) -> RelayStats {
        self.stats_tx.borrow().clone()
    }

    /// Subscribe to statistics updates.
    pub fn watch_stats(&self) -> watch::Receiver<RelayStats> {
        self.stats_tx.subscribe()
    }

    /// Bind and serve until the listener fails.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Relay listening on {}", self.config.bind_addr);
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let capacity = self.config.outbound_capacity.max(1);
        let relay = Relay::new().with_room_scoped_game_chat(self.config.room_scoped_game_chat);
        let (hub_tx, hub_rx) = mpsc::channel(capacity);
        tokio::spawn(run_hub(relay, hub_rx, self.stats_tx.clone()));

        loop {
            let (stream, addr) = listener.accept().await?;
            debug!("New TCP connection from {addr}");

            let hub = hub_tx.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, addr, hub, capacity).await {
                    error!("Connection error from {addr}: {e}");
                }
            });
        }
    }
}

/// Own the relay tables and process hub events one at a time.
async fn run_hub(mut relay: Relay, mut events: mpsc::Receiver<HubEvent>, stats: watch::Sender<RelayStats>) {
    let mut outbound: FxHashMap<ConnectionId, mpsc::Sender<Vec<u8>>> = FxHashMap::default();

    while let Some(event) = events.recv().await {
        let envelopes = match event {
            HubEvent::Connected { outbound: tx, reply } => {
                let conn = relay.connect();
                outbound.insert(conn, tx);
                if reply.send(conn).is_err() {
                    // Connection task went away before it learned its id.
                    outbound.remove(&conn);
                    relay.disconnect(conn)
                } else {
                    vec![]
                }
            }
            HubEvent::Message { conn, message } => relay.handle(conn, message),
            HubEvent::Disconnected(conn) => {
                outbound.remove(&conn);
                relay.disconnect(conn)
            }
        };

        let dropped = deliver(&outbound, envelopes);
        if dropped > 0 {
            relay.note_dropped(dropped);
        }
        stats.send_replace(relay.stats());
    }
    info!("Relay hub stopped");
}

/// Queue envelopes on their connections' outbound channels. Returns how
/// many could not be queued.
fn deliver(outbound: &FxHashMap<ConnectionId, mpsc::Sender<Vec<u8>>>, envelopes: Vec<Envelope>) -> u64 {
    let mut dropped = 0;
    for Envelope { to, message } in envelopes {
        let level = drop_level(&message);
        let bytes = match message.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode message for {to}: {e}");
                dropped += 1;
                continue;
            }
        };
        let queued = outbound.get(&to).is_some_and(|tx| tx.try_send(bytes).is_ok());
        if !queued {
            log!(level, "Dropped {} for {to}", message.kind());
            dropped += 1;
        }
    }
    dropped
}

/// Losing a state update desynchronizes a room, other drops are repaired by
/// the next broadcast.
fn drop_level(message: &ServerMessage) -> Level {
    match message {
        ServerMessage::GameStateUpdate { .. } => Level::Warn,
        _ => Level::Debug,
    }
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    hub: mpsc::Sender<HubEvent>,
    capacity: usize,
) -> Result<(), ServerError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (out_tx, out_rx) = mpsc::channel(capacity);
    let (reply_tx, reply_rx) = oneshot::channel();
    hub.send(HubEvent::Connected { outbound: out_tx, reply: reply_tx })
        .await
        .map_err(|_| ServerError::HubClosed)?;
    let conn = reply_rx.await.map_err(|_| ServerError::HubClosed)?;
    info!("WebSocket connection established from {addr} as {conn}");

    let result = pump(ws_stream, conn, &hub, out_rx).await;

    // Always clean up, whatever ended the pump.
    let _ = hub.send(HubEvent::Disconnected(conn)).await;
    info!("Connection closed from {addr} ({conn})");
    result
}

/// Move frames between the socket and the hub until either side closes.
async fn pump(
    ws_stream: tokio_tungstenite::WebSocketStream<TcpStream>,
    conn: ConnectionId,
    hub: &mpsc::Sender<HubEvent>,
    mut out_rx: mpsc::Receiver<Vec<u8>>,
) -> Result<(), ServerError> {
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    loop {
        tokio::select! {
            // Incoming WebSocket message
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Binary(data))) => match ClientMessage::decode(&data) {
                        Ok(message) => {
                            hub.send(HubEvent::Message { conn, message })
                                .await
                                .map_err(|_| ServerError::HubClosed)?;
                        }
                        Err(ProtocolError::Codec(e)) => {
                            warn!("Failed to decode message from {conn}: {e}");
                        }
                        Err(e) => warn!("Unexpected protocol error from {conn}: {e}"),
                    },
                    Some(Ok(Message::Ping(data))) => {
                        ws_sender.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!("WebSocket error from {conn}: {e}");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }

            // Outgoing relayed message
            bytes = out_rx.recv() => {
                match bytes {
                    Some(bytes) => ws_sender.send(Message::Binary(bytes.into())).await?,
                    None => break,
                }
            }
        }
    }
    Ok(())
}
