//! Error types for the posture capture library.
//!
//! The per-frame engine never fails: missing people, missing landmarks and
//! failed detections all degrade to feedback. Errors only come from the
//! boundaries (configuration files, replay files, malformed frame input).

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Recorded session could not be read or replayed
    #[error("Replay error: {0}")]
    ReplayError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
