//! Crate-level error type

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while building a queue
#[derive(Error, Debug)]
pub enum QueueError {
    /// The queue configuration was rejected
    #[error("Queue configuration error: {0}")]
    Config(#[from] ConfigError),
}
