//! Read-only reporting structures assembled from contention policy state

use serde::{Deserialize, Serialize};

use crate::foundation::time::FrameStamp;
use crate::request::{EntityId, Priority, QueuedId, RequesterDebugInfo};

/// Lifecycle state of a tracked request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    /// Waiting in the queue
    Queued,
    /// Handed to the executor, result outstanding
    Submitted,
    /// Result delivered
    Completed,
}

/// Lifecycle record of one request, kept while extended stats are gathered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDebugInfo {
    /// Submission id
    pub queued_id: QueuedId,
    /// Requesting system, from [`RequesterDebugInfo`]
    pub requester: String,
    /// Free-form context, from [`RequesterDebugInfo`]
    pub custom: String,
    /// Requesting entity, if any
    pub entity_id: Option<EntityId>,
    /// Scheduling class at submission
    pub priority: Priority,
    /// Current lifecycle state
    pub state: RequestState,
    /// Whether the request skipped the queue and ran in the tick it arrived
    pub immediate: bool,
    /// Simulation time the request was queued
    pub queued_time: f64,
    /// Simulation time the request was handed to the executor
    pub submitted_time: Option<f64>,
    /// Simulation time the result was delivered
    pub completed_time: Option<f64>,
    /// Frame the request was queued
    pub queued_frame: u64,
    /// Frame the request was handed to the executor
    pub submitted_frame: Option<u64>,
    /// Frame the result was delivered
    pub completed_frame: Option<u64>,
}

impl RequestDebugInfo {
    /// New record in the `Queued` state
    pub fn queued(
        requester: &RequesterDebugInfo,
        queued_id: QueuedId,
        priority: Priority,
        stamp: FrameStamp,
    ) -> Self {
        Self {
            queued_id,
            requester: requester.requester.clone(),
            custom: requester.custom.clone(),
            entity_id: requester.entity_id,
            priority,
            state: RequestState::Queued,
            immediate: false,
            queued_time: stamp.time,
            submitted_time: None,
            completed_time: None,
            queued_frame: stamp.frame,
            submitted_frame: None,
            completed_frame: None,
        }
    }

    /// Frames spent between queueing and completion
    pub fn latency_frames(&self) -> Option<u64> {
        self.completed_frame
            .map(|frame| frame.saturating_sub(self.queued_frame))
    }

    /// Frames spent waiting before being handed to the executor
    pub fn wait_frames(&self) -> Option<u64> {
        self.submitted_frame
            .map(|frame| frame.saturating_sub(self.queued_frame))
    }
}

/// Point-in-time snapshot of contention counters and request history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentionStats {
    /// Submissions allowed per tick
    pub quota: usize,
    /// Requests currently waiting
    pub queue_size: usize,
    /// Largest backlog seen since construction or reset
    pub peak_queue_size: usize,
    /// Immediate submissions during the last finished tick
    pub immediate_count: usize,
    /// Largest per-tick immediate count
    pub peak_immediate_count: usize,
    /// Deferred submissions during the last finished tick
    pub deferred_count: usize,
    /// Largest per-tick deferred count
    pub peak_deferred_count: usize,
    /// Mean immediate submissions per tick over the averaging window
    pub immediate_average: f32,
    /// Mean deferred submissions per tick over the averaging window
    pub deferred_average: f32,
    /// Requests queued or submitted, ordered by id
    pub pending_requests: Vec<RequestDebugInfo>,
    /// Requests completed since the previous snapshot, oldest first
    pub recently_completed_requests: Vec<RequestDebugInfo>,
}

impl ContentionStats {
    /// Fraction of the quota used by the last finished tick
    #[allow(clippy::cast_precision_loss)]
    pub fn utilization(&self) -> f32 {
        if self.quota == 0 {
            return 0.0;
        }
        (self.immediate_count + self.deferred_count) as f32 / self.quota as f32
    }
}
