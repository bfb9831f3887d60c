//! UDP receive loop
//!
//! Owns the OSC socket and drives datagrams through decode → channel match →
//! fusion → snapshot publication on a dedicated background task. The socket
//! is bound at construction so a tracker is never handed out half-built.
//!
//! Cancellation is cooperative: the receive await is raced against a watch
//! channel inside `tokio::select!`, and `stop()` resolves only after the
//! task has fully exited, so no snapshot write can land after it returns.
//!
//! Error policy:
//! - per-datagram decode failures are logged and discarded, the loop goes on
//! - a socket receive failure is fatal: logged, loop exits, no reconnection

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::channel::decode_channel;
use crate::error::Result;
use crate::fusion::FusionEngine;
use crate::osc::decode_packet;
use crate::snapshot::SnapshotStore;

/// Well-known OSC parameter port
pub const DEFAULT_OSC_PORT: u16 = 9000;

/// Receive buffer; comfortably above any OSC datagram the senders emit
const RECV_BUFFER_SIZE: usize = 4096;

/// A bound-but-not-yet-running receive loop
pub struct Listener {
    socket: UdpSocket,
    local_addr: SocketAddr,
    store: Arc<SnapshotStore>,
    fusion: FusionEngine,
}

impl Listener {
    /// Bind the OSC socket on all interfaces.
    ///
    /// Failure here is the one construction failure the tracker factory
    /// surfaces as an absent tracker.
    pub async fn bind(port: u16, store: Arc<SnapshotStore>, fusion: FusionEngine) -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port)).await?;
        let local_addr = socket.local_addr()?;
        info!("OSC listener bound on {}", local_addr);
        Ok(Self {
            socket,
            local_addr,
            store,
            fusion,
        })
    }

    /// Address the socket actually bound to (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the receive loop.
    ///
    /// Spawns a background task that processes datagrams until stopped.
    /// Returns immediately; the handle joins the task on `stop()`.
    pub fn spawn(self) -> ListenerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            info!("OSC listener started");
            self.receive_loop(shutdown_rx).await;
            info!("OSC listener stopped");
        });
        ListenerHandle { shutdown_tx, task }
    }

    async fn receive_loop(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    debug!("listener shutdown requested");
                    break;
                }
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok((len, peer)) => self.handle_datagram(&buf[..len], peer),
                    Err(e) => {
                        // Transport failure ends listening for this tracker
                        // instance; consumers just see the gaze go stale.
                        error!("socket receive failed, listener exiting: {}", e);
                        break;
                    }
                }
            }
        }
    }

    fn handle_datagram(&mut self, datagram: &[u8], peer: SocketAddr) {
        let messages = match decode_packet(datagram) {
            Ok(messages) => messages,
            Err(e) => {
                warn!("discarding malformed packet from {}: {}", peer, e);
                return;
            }
        };

        for message in &messages {
            match decode_channel(message) {
                Ok(Some(reading)) => {
                    trace!("{:?} = {}", reading.channel, reading.value);
                    if let Some(gaze) = self.fusion.ingest(reading) {
                        debug!("fused gaze ({:.3}, {:.3}, {:.3})", gaze.x, gaze.y, gaze.z);
                        self.store.publish(gaze, Instant::now());
                    }
                }
                // Somebody else's parameter traffic; not ours to judge
                Ok(None) => {}
                Err(e) => warn!("discarding message from {}: {}", peer, e),
            }
        }
    }
}

/// Handle to a running receive loop
pub struct ListenerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Request cancellation and wait for the task to fully terminate.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!("listener task join failed: {}", e);
        }
    }
}
