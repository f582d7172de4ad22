//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the queue:
//! - Math types used by ray-cast requests
//! - Generation-checked collections
//! - Frame clock and timestamps
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
