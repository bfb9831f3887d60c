//! Public tracker facade
//!
//! `EyeTracker` is the seam the host tracking session talks to; `EtvrTracker`
//! is the OSC-fed implementation built here. The factory binds the socket up
//! front and yields an absent tracker on failure, so callers never hold a
//! partially constructed instance.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::warn;

use crate::config::Config;
use crate::fusion::{FusionEngine, GazeVector};
use crate::listener::{Listener, ListenerHandle};
use crate::snapshot::SnapshotStore;

/// Constant identifier for a tracker implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerType {
    /// OSC-fed external eye tracker
    Etvr,
}

/// Opaque handle to the host tracking session passed into `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle(pub u64);

/// Interface the host tracking session drives
///
/// `start`/`stop` bound the receive loop's lifetime; the read methods are
/// callable at arbitrary times from any thread and never fail; they only
/// ever report availability.
#[async_trait]
pub trait EyeTracker: Send {
    /// Begin listening; returns as soon as the receive loop is spawned
    async fn start(&mut self, session: SessionHandle);

    /// Cancel the receive loop and wait for it to fully terminate
    async fn stop(&mut self);

    /// True iff a gaze fused less than one second before `now` exists
    fn is_gaze_available(&self, now: Instant) -> bool;

    /// The latest fused unit vector, if fresh at `now`
    fn gaze(&self, now: Instant) -> Option<GazeVector>;

    /// Which tracker implementation this is
    fn tracker_type(&self) -> TrackerType;
}

/// OSC gaze tracker
///
/// Holds the bound listener until `start`, the running handle afterwards.
pub struct EtvrTracker {
    store: Arc<SnapshotStore>,
    local_addr: SocketAddr,
    listener: Option<Listener>,
    running: Option<ListenerHandle>,
}

impl EtvrTracker {
    /// Address the OSC socket bound to (resolves a port-0 configuration)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[async_trait]
impl EyeTracker for EtvrTracker {
    async fn start(&mut self, _session: SessionHandle) {
        // The session handle carries nothing this tracker needs; gaze is
        // fused from the wire alone.
        match self.listener.take() {
            Some(listener) => self.running = Some(listener.spawn()),
            None => warn!("start() called on an already-started tracker"),
        }
    }

    async fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.stop().await;
        }
    }

    fn is_gaze_available(&self, now: Instant) -> bool {
        self.store.is_available(now)
    }

    fn gaze(&self, now: Instant) -> Option<GazeVector> {
        self.store.gaze(now)
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Etvr
    }
}

/// Build an OSC gaze tracker, or nothing if the socket cannot be bound.
///
/// The bind failure is logged here; callers only observe the absence.
pub async fn create_etvr_tracker(config: &Config) -> Option<EtvrTracker> {
    let store = Arc::new(SnapshotStore::new());
    let fusion = FusionEngine::new(config.latch_eyes_y);

    match Listener::bind(config.port, Arc::clone(&store), fusion).await {
        Ok(listener) => Some(EtvrTracker {
            store,
            local_addr: listener.local_addr(),
            listener: Some(listener),
            running: None,
        }),
        Err(e) => {
            warn!("failed to create OSC gaze tracker: {}", e);
            None
        }
    }
}
