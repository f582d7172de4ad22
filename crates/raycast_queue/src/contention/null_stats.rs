//! Counters-only policy

use log::debug;

use super::{ContentionPolicy, ContentionStats, DefaultContention};
use crate::foundation::time::FrameStamp;
use crate::request::{Priority, QueuedId, RequesterDebugInfo};

/// Policy that keeps throughput counters and no per-request history
#[derive(Debug, Clone)]
pub struct NullStatsPolicy {
    counters: DefaultContention,
}

impl NullStatsPolicy {
    /// Create the policy for a queue with the given quota
    pub fn new(quota: usize, average_window: usize) -> Self {
        Self {
            counters: DefaultContention::new(quota, average_window),
        }
    }
}

impl ContentionPolicy for NullStatsPolicy {
    fn counters(&self) -> &DefaultContention {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut DefaultContention {
        &mut self.counters
    }

    fn is_gathering_extended_stats(&self) -> bool {
        false
    }

    fn enable_gathering_extended_stats(&mut self, enable: bool) {
        if enable {
            debug!("Extended contention stats are not available with the counters-only policy");
        }
    }

    fn queued(&mut self, _: &RequesterDebugInfo, _: QueuedId, _: Priority, _: FrameStamp) {}

    fn performed_deferred(&mut self, _: QueuedId, _: FrameStamp) {}

    fn performed_immediate(&mut self, _: QueuedId, _: FrameStamp) {}

    fn completed_deferred(&mut self, _: QueuedId, _: FrameStamp) {}

    fn canceled(&mut self, _: QueuedId) {}

    fn contention_stats(&mut self) -> ContentionStats {
        self.counters.snapshot()
    }

    fn reset_contention_stats(&mut self) {
        self.counters.reset();
    }
}
