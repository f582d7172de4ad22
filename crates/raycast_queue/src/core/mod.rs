//! # Core Module
//!
//! Shared abstractions the queue subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: queue, aging and contention configuration

pub mod config;

pub use config::{AgingConfig, ContentionConfig, RayCastQueueConfig};
pub use crate::config::{Config, ConfigError};
