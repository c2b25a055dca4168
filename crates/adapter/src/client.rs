//! WebSocket client for the game server
//!
//! One text frame carries exactly one protocol message. Inbound frames are
//! decoded and pushed into a bounded channel; outbound messages arrive on an
//! unbounded channel and are encoded as they are written.

use anyhow::Context as _;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::protocol::{encode_outbound, parse_inbound};
use crate::types::{InboundMessage, OutboundMessage};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket URL of the game server
    pub url: String,
    /// Capacity of the inbound queue; the reader waits when it is full
    pub max_pending: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:9700".to_string(),
            max_pending: 64,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let url = env::var("TETRECS_SERVER_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.url);
        let max_pending = env::var("TETRECS_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending);

        Self { url, max_pending }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Run one connection until either side closes.
///
/// `ready_tx` fires once the WebSocket handshake completed. Malformed server
/// messages are logged and dropped; the connection stays up.
pub async fn run_client(
    config: ClientConfig,
    inbound_tx: mpsc::Sender<InboundMessage>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: oneshot::Sender<()>,
) -> anyhow::Result<()> {
    let (ws, _response) = connect_async(config.url.as_str())
        .await
        .with_context(|| format!("connecting to {}", config.url))?;
    info!(url = %config.url, "connected to game server");
    let _ = ready_tx.send(());

    let (mut write, mut read) = ws.split();
    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => match parse_inbound(text.as_str()) {
                    Ok(message) => {
                        debug!(verb = message.verb(), "received");
                        if inbound_tx.send(message).await.is_err() {
                            debug!("inbound receiver dropped, closing");
                            break;
                        }
                    }
                    Err(err) => warn!(%err, "dropping malformed server message"),
                },
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "server closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("reading from game server"),
                None => {
                    info!("server stream ended");
                    break;
                }
            },
            outbound = out_rx.recv() => match outbound {
                Some(message) => {
                    let line = encode_outbound(&message);
                    debug!(%line, "sending");
                    write
                        .send(Message::text(line))
                        .await
                        .context("writing to game server")?;
                }
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
            },
        }
    }
    Ok(())
}
