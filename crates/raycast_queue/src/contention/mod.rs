//! Contention policies
//!
//! A contention policy owns the quota and throughput counters of a deferred
//! queue and, optionally, a per-request lifecycle history for debugging.
//!
//! ## Implementations
//!
//! - [`NullStatsPolicy`]: counters only, every history hook returns at once
//! - [`DebugStatsPolicy`]: counters plus pending map and completed ring
//!
//! History hooks never fail. A transition for an id the policy does not know
//! (gathering was off when it was queued, or it was already canceled) is a
//! no-op.

pub mod stats;
pub mod default;
pub mod null_stats;
pub mod debug_stats;

pub use stats::{ContentionStats, RequestDebugInfo, RequestState};
pub use default::{DefaultContention, TickCounts};
pub use null_stats::NullStatsPolicy;
pub use debug_stats::DebugStatsPolicy;

use crate::core::config::ContentionConfig;
use crate::foundation::time::FrameStamp;
use crate::request::{Priority, QueuedId, RequesterDebugInfo};

/// Admission statistics and lifecycle tracking for a deferred queue
pub trait ContentionPolicy {
    /// Counter block
    fn counters(&self) -> &DefaultContention;

    /// Mutable counter block
    fn counters_mut(&mut self) -> &mut DefaultContention;

    /// Whether per-request history is being recorded
    fn is_gathering_extended_stats(&self) -> bool;

    /// Turn per-request history on or off
    ///
    /// Turning it off drops all pending and completed records.
    fn enable_gathering_extended_stats(&mut self, enable: bool);

    /// A request entered the queue
    fn queued(
        &mut self,
        requester: &RequesterDebugInfo,
        queued_id: QueuedId,
        priority: Priority,
        stamp: FrameStamp,
    );

    /// A queued request was handed to the executor by a tick
    fn performed_deferred(&mut self, queued_id: QueuedId, stamp: FrameStamp);

    /// A request bypassed the backlog and was handed to the executor from `queue`
    fn performed_immediate(&mut self, queued_id: QueuedId, stamp: FrameStamp);

    /// The result of a request was delivered
    fn completed_deferred(&mut self, queued_id: QueuedId, stamp: FrameStamp);

    /// A request was canceled before its result was delivered
    fn canceled(&mut self, queued_id: QueuedId);

    /// Snapshot the statistics, draining the completed history
    fn contention_stats(&mut self) -> ContentionStats;

    /// Clear history and throughput counters; the backlog size is kept
    fn reset_contention_stats(&mut self);

    /// Submissions allowed per tick
    fn quota(&self) -> usize {
        self.counters().quota()
    }

    /// Record the current backlog
    fn set_queue_size(&mut self, queue_size: usize) {
        self.counters_mut().set_queue_size(queue_size);
    }

    /// Record the submissions of a finished tick
    fn record_tick(&mut self, counts: TickCounts) {
        self.counters_mut().record_tick(counts);
    }
}

/// Build the policy a queue configuration asks for
pub fn policy_for(quota: usize, config: &ContentionConfig) -> Box<dyn ContentionPolicy> {
    if config.extended_stats {
        Box::new(DebugStatsPolicy::new(
            quota,
            config.average_window,
            config.completed_history_capacity,
            config.gather_on_start,
        ))
    } else {
        Box::new(NullStatsPolicy::new(quota, config.average_window))
    }
}
