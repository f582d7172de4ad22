//! Policy with per-request lifecycle history

use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace};

use super::{ContentionPolicy, ContentionStats, DefaultContention, RequestDebugInfo, RequestState};
use crate::foundation::time::FrameStamp;
use crate::request::{Priority, QueuedId, RequesterDebugInfo};

/// Policy that records every request's lifecycle while enabled
///
/// Pending records are keyed by id; completed records go to a bounded ring
/// that each [`ContentionPolicy::contention_stats`] call drains. When the ring
/// is full the oldest record is dropped.
#[derive(Debug, Clone)]
pub struct DebugStatsPolicy {
    counters: DefaultContention,
    enabled: bool,
    pending: BTreeMap<QueuedId, RequestDebugInfo>,
    completed: VecDeque<RequestDebugInfo>,
    completed_capacity: usize,
    dropped_completed: u64,
}

impl DebugStatsPolicy {
    /// Create the policy
    ///
    /// `completed_capacity` bounds the completed ring (zero is treated as
    /// one); `enabled` is the initial gathering state.
    pub fn new(quota: usize, average_window: usize, completed_capacity: usize, enabled: bool) -> Self {
        let completed_capacity = completed_capacity.max(1);
        Self {
            counters: DefaultContention::new(quota, average_window),
            enabled,
            pending: BTreeMap::new(),
            completed: VecDeque::with_capacity(completed_capacity),
            completed_capacity,
            dropped_completed: 0,
        }
    }

    /// Number of records currently pending
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of completed records waiting for the next snapshot
    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    /// Completed records evicted from a full ring since construction or reset
    pub fn dropped_completed(&self) -> u64 {
        self.dropped_completed
    }

    /// Look at a pending record
    pub fn pending_request(&self, queued_id: QueuedId) -> Option<&RequestDebugInfo> {
        self.pending.get(&queued_id)
    }

    fn mark_submitted(&mut self, queued_id: QueuedId, stamp: FrameStamp, immediate: bool) {
        if let Some(info) = self.pending.get_mut(&queued_id) {
            info.state = RequestState::Submitted;
            info.immediate = immediate;
            info.submitted_time = Some(stamp.time);
            info.submitted_frame = Some(stamp.frame);
        }
    }

    fn clear_history(&mut self) {
        self.pending.clear();
        self.completed.clear();
    }
}

impl ContentionPolicy for DebugStatsPolicy {
    fn counters(&self) -> &DefaultContention {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut DefaultContention {
        &mut self.counters
    }

    fn is_gathering_extended_stats(&self) -> bool {
        self.enabled
    }

    fn enable_gathering_extended_stats(&mut self, enable: bool) {
        if self.enabled != enable {
            debug!("Extended contention stats {}", if enable { "enabled" } else { "disabled" });
        }
        self.enabled = enable;
        if !enable {
            self.clear_history();
        }
    }

    fn queued(
        &mut self,
        requester: &RequesterDebugInfo,
        queued_id: QueuedId,
        priority: Priority,
        stamp: FrameStamp,
    ) {
        if !self.enabled {
            return;
        }
        self.pending.insert(
            queued_id,
            RequestDebugInfo::queued(requester, queued_id, priority, stamp),
        );
    }

    fn performed_deferred(&mut self, queued_id: QueuedId, stamp: FrameStamp) {
        self.mark_submitted(queued_id, stamp, false);
    }

    fn performed_immediate(&mut self, queued_id: QueuedId, stamp: FrameStamp) {
        self.mark_submitted(queued_id, stamp, true);
    }

    fn completed_deferred(&mut self, queued_id: QueuedId, stamp: FrameStamp) {
        let Some(mut info) = self.pending.remove(&queued_id) else {
            return;
        };

        info.state = RequestState::Completed;
        info.completed_time = Some(stamp.time);
        info.completed_frame = Some(stamp.frame);

        if self.completed.len() == self.completed_capacity {
            self.completed.pop_front();
            self.dropped_completed += 1;
            trace!("Completed history full, dropped oldest record");
        }
        self.completed.push_back(info);
    }

    fn canceled(&mut self, queued_id: QueuedId) {
        self.pending.remove(&queued_id);
    }

    fn contention_stats(&mut self) -> ContentionStats {
        let mut stats = self.counters.snapshot();
        stats.pending_requests = self.pending.values().cloned().collect();
        stats.recently_completed_requests = self.completed.drain(..).collect();
        stats
    }

    fn reset_contention_stats(&mut self) {
        self.clear_history();
        self.counters.reset();
        self.dropped_completed = 0;
    }
}
