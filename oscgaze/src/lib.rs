//! # oscgaze
//!
//! Gaze-fusion tracker fed by OSC over UDP.
//!
//! **Purpose:** Receive independently-timed eye parameter readings on three
//! recognized OSC addresses, fuse them into a unit gaze vector, and expose a
//! thread-safe, staleness-aware "latest known gaze" snapshot to polling
//! consumers.
//!
//! **Architecture:** A dedicated tokio task owns the UDP socket and drives
//! datagram → OSC decode → channel match → fusion → snapshot publication.
//! Consumers poll the snapshot store from any thread; a snapshot older than
//! one second reports unavailable. `start`/`stop` bound the receive loop's
//! lifetime with a cooperative cancel and a deterministic join.

pub mod channel;
pub mod config;
pub mod error;
pub mod fusion;
pub mod listener;
pub mod osc;
pub mod snapshot;
pub mod tracker;

pub use config::Config;
pub use error::{Error, Result};
pub use fusion::GazeVector;
pub use listener::DEFAULT_OSC_PORT;
pub use snapshot::STALENESS_WINDOW;
pub use tracker::{create_etvr_tracker, EtvrTracker, EyeTracker, SessionHandle, TrackerType};
