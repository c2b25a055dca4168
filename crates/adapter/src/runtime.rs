//! Communicator runtime integration.
//!
//! Bridges the sync game loop with the async WebSocket client.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::error;

use crate::client::{run_client, ClientConfig};
use crate::types::{InboundMessage, OutboundMessage};

/// Handle to a running server connection.
pub struct Communicator {
    inbound_rx: mpsc::Receiver<InboundMessage>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl Communicator {
    /// Connect and wait for the WebSocket handshake.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn connect(config: ClientConfig) -> anyhow::Result<Self> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let mut comm = Self::spawn_task(config, ready_tx);
        if ready_rx.await.is_ok() {
            return Ok(comm);
        }
        // The task ended before the handshake; surface its error
        match (&mut comm.task).await {
            Ok(Err(err)) => Err(err),
            Ok(Ok(())) => Err(anyhow::anyhow!("connection closed during handshake")),
            Err(join) => Err(join.into()),
        }
    }

    fn spawn_task(config: ClientConfig, ready_tx: oneshot::Sender<()>) -> Self {
        let max_pending = config.max_pending.max(1);
        let (inbound_tx, inbound_rx) = mpsc::channel::<InboundMessage>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let task = tokio::spawn(async move {
            let result = run_client(config, inbound_tx, out_rx, ready_tx).await;
            if let Err(err) = &result {
                error!(error = %format!("{err:#}"), "connection failed");
            }
            result
        });

        Self {
            inbound_rx,
            out_tx,
            task,
        }
    }

    pub fn try_recv(&mut self) -> Option<InboundMessage> {
        self.inbound_rx.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<InboundMessage> {
        self.inbound_rx.recv().await
    }

    /// Queue a message; false once the connection is gone.
    pub fn send(&self, message: OutboundMessage) -> bool {
        self.out_tx.send(message).is_ok()
    }

    /// Sender for other tasks (the session forwards engine output here).
    pub fn sender(&self) -> mpsc::UnboundedSender<OutboundMessage> {
        self.out_tx.clone()
    }

    pub fn is_connected(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Communicator {
    fn drop(&mut self) {
        self.task.abort();
    }
}
