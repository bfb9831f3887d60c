//! Latest-gaze snapshot store
//!
//! Thread-safe holder of the most recent fused gaze vector. Written only by
//! the listener task; read by any number of consumer threads. Reads are
//! staleness-checked: a snapshot older than one second reports unavailable.
//!
//! Uses a std RwLock (single writer, many readers) held only for a timestamp
//! comparison and a copy of the vector; no I/O happens under the lock.

use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::fusion::GazeVector;

/// Window beyond which a fused snapshot is reported unavailable
pub const STALENESS_WINDOW: Duration = Duration::from_secs(1);

/// A fused gaze vector together with its capture time
#[derive(Debug, Clone, Copy)]
pub struct GazeSnapshot {
    pub vector: GazeVector,
    pub captured_at: Instant,
}

impl GazeSnapshot {
    /// True while the snapshot is younger than the staleness window at `now`
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.captured_at) < STALENESS_WINDOW
    }
}

/// Shared store of the last fused snapshot
///
/// `None` until the first fuse; overwritten in place on each subsequent fuse.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: RwLock<Option<GazeSnapshot>>,
}

impl SnapshotStore {
    /// Create an empty store (no gaze available yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a freshly fused vector; called only from the listener task
    pub fn publish(&self, vector: GazeVector, captured_at: Instant) {
        let mut latest = self
            .latest
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *latest = Some(GazeSnapshot {
            vector,
            captured_at,
        });
    }

    /// True iff a snapshot exists and is fresh at `now`
    pub fn is_available(&self, now: Instant) -> bool {
        let latest = *self.latest.read().unwrap_or_else(PoisonError::into_inner);
        latest.is_some_and(|snapshot| snapshot.is_fresh(now))
    }

    /// The latest vector, if fresh at `now`
    pub fn gaze(&self, now: Instant) -> Option<GazeVector> {
        let latest = *self.latest.read().unwrap_or_else(PoisonError::into_inner);
        latest
            .filter(|snapshot| snapshot.is_fresh(now))
            .map(|snapshot| snapshot.vector)
    }
}
