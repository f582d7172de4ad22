//! Counter block shared by every contention policy

use std::collections::VecDeque;

use super::stats::ContentionStats;

/// Submissions made during one tick window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounts {
    /// Requests run synchronously from `queue`
    pub immediate: usize,
    /// Requests drained from the backlog by `update`
    pub deferred: usize,
}

impl TickCounts {
    /// Total submissions in the window
    pub const fn total(self) -> usize {
        self.immediate + self.deferred
    }
}

/// Quota, queue depth and throughput counters
#[derive(Debug, Clone)]
pub struct DefaultContention {
    quota: usize,
    queue_size: usize,
    peak_queue_size: usize,
    last_tick: TickCounts,
    peak_immediate_count: usize,
    peak_deferred_count: usize,
    recent_ticks: VecDeque<TickCounts>,
    average_window: usize,
}

impl DefaultContention {
    /// Create counters for a queue with the given per-tick quota
    ///
    /// `average_window` is the number of ticks the averages cover; zero is
    /// treated as one.
    pub fn new(quota: usize, average_window: usize) -> Self {
        let average_window = average_window.max(1);
        Self {
            quota,
            queue_size: 0,
            peak_queue_size: 0,
            last_tick: TickCounts::default(),
            peak_immediate_count: 0,
            peak_deferred_count: 0,
            recent_ticks: VecDeque::with_capacity(average_window),
            average_window,
        }
    }

    /// Submissions allowed per tick
    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Current backlog
    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    /// Record the current backlog
    pub fn set_queue_size(&mut self, queue_size: usize) {
        self.queue_size = queue_size;
        self.peak_queue_size = self.peak_queue_size.max(queue_size);
    }

    /// Record the submissions of a finished tick
    pub fn record_tick(&mut self, counts: TickCounts) {
        self.last_tick = counts;
        self.peak_immediate_count = self.peak_immediate_count.max(counts.immediate);
        self.peak_deferred_count = self.peak_deferred_count.max(counts.deferred);

        if self.recent_ticks.len() == self.average_window {
            self.recent_ticks.pop_front();
        }
        self.recent_ticks.push_back(counts);
    }

    /// Mean immediate submissions per tick over the window
    pub fn immediate_average(&self) -> f32 {
        self.average_of(|counts| counts.immediate)
    }

    /// Mean deferred submissions per tick over the window
    pub fn deferred_average(&self) -> f32 {
        self.average_of(|counts| counts.deferred)
    }

    /// Zero the throughput counters
    ///
    /// The quota and the live backlog size are kept, and the backlog becomes
    /// the new peak.
    pub fn reset(&mut self) {
        let queue_size = self.queue_size;
        *self = Self::new(self.quota, self.average_window);
        self.queue_size = queue_size;
        self.peak_queue_size = queue_size;
    }

    /// Snapshot of the counters with empty request lists
    pub fn snapshot(&self) -> ContentionStats {
        ContentionStats {
            quota: self.quota,
            queue_size: self.queue_size,
            peak_queue_size: self.peak_queue_size,
            immediate_count: self.last_tick.immediate,
            peak_immediate_count: self.peak_immediate_count,
            deferred_count: self.last_tick.deferred,
            peak_deferred_count: self.peak_deferred_count,
            immediate_average: self.immediate_average(),
            deferred_average: self.deferred_average(),
            pending_requests: Vec::new(),
            recently_completed_requests: Vec::new(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn average_of(&self, field: impl Fn(&TickCounts) -> usize) -> f32 {
        if self.recent_ticks.is_empty() {
            return 0.0;
        }
        let sum: usize = self.recent_ticks.iter().map(field).sum();
        sum as f32 / self.recent_ticks.len() as f32
    }
}
