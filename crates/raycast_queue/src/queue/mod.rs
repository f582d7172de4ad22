//! Request queues
//!
//! Ordering containers the scheduler drains each tick.

pub mod age_priority;

pub use age_priority::{AgePriorityQueue, by_descending_priority};
