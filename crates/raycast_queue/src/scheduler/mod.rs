//! # Scheduler
//!
//! Deferred admission of actions to a shared executor under a per-tick quota.

pub mod executor;
pub mod deferred_queue;

pub use executor::{ActionExecutor, Dispatch};
pub use deferred_queue::{DeferredActionQueue, ResultCallback, SubmitCallback};

#[cfg(test)]
mod tests;
