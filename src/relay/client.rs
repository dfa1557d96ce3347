//! WebSocket client for the relay.
//!
//! `RelayClient::connect` spawns a writer task fed by an outgoing channel
//! and a reader task that decodes server frames into a `ServerMessage`
//! channel for the application.

use futures_util::{SinkExt, StreamExt};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use super::protocol::{ClientMessage, ProtocolError, ServerMessage};

const CHANNEL_CAPACITY: usize = 256;

/// Connection to a relay server.
#[derive(Debug, Clone)]
pub struct RelayClient {
    outgoing: mpsc::Sender<Vec<u8>>,
}

impl RelayClient {
    /// Connect to `url` (`ws://host:port`). Returns the client and the
    /// stream of messages the relay delivers to it.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<ServerMessage>), ProtocolError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(url).await?;
        let (mut ws_writer, mut ws_reader) = ws_stream.split();

        let (out_tx, mut out_rx) = mpsc::channel::<Vec<u8>>(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);

        // Writer task: forward outgoing channel to WebSocket
        tokio::spawn(async move {
            while let Some(data) = out_rx.recv().await {
                if ws_writer.send(Message::Binary(data.into())).await.is_err() {
                    break;
                }
            }
            let _ = ws_writer.close().await;
        });

        // Reader task: decode relayed messages
        tokio::spawn(async move {
            while let Some(frame) = ws_reader.next().await {
                match frame {
                    Ok(Message::Binary(data)) => match ServerMessage::decode(&data) {
                        Ok(message) => {
                            if event_tx.send(message).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Failed to decode relay message: {e}"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        debug!("Relay connection error: {e}");
                        break;
                    }
                }
            }
        });

        Ok((Self { outgoing: out_tx }, event_rx))
    }

    /// Send one message to the relay.
    pub async fn send(&self, message: &ClientMessage) -> Result<(), ProtocolError> {
        let encoded = message.encode()?;
        self.outgoing.send(encoded).await.map_err(|_| ProtocolError::Closed)
    }

    /// Whether the writer task is still running.
    pub fn is_open(&self) -> bool {
        !self.outgoing.is_closed()
    }
}
