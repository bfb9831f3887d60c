//! Error types for oscgaze
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for the oscgaze crate
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// OSC packet decode errors (malformed framing, bad padding, unknown tags)
    #[error("Protocol decode error: {0}")]
    Protocol(String),

    /// Recognized channel address carrying an unusable argument list
    #[error("Channel decode error: {0}")]
    Channel(String),

    /// Socket and file I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the oscgaze Error
pub type Result<T> = std::result::Result<T, Error>;
