//! Scenario tests for the deferred queue
//!
//! Driven through a recording executor over plain `u32` actions so the
//! assertions can talk about submission order directly.

mod cancellation;
mod contention;
mod properties;

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::config::RayCastQueueConfig;
use crate::request::QueuedId;
use crate::scheduler::{ActionExecutor, DeferredActionQueue, Dispatch};

pub(super) const TICK: f32 = 1.0 / 60.0;

/// Executor that answers with the action itself and remembers every call
#[derive(Debug, Default)]
pub(super) struct RecordingExecutor {
    pub executed: Vec<QueuedId>,
    pub actions: Vec<u32>,
    pub canceled: Vec<QueuedId>,
    /// Answer through `drain_completed` instead of during `execute`
    pub deferred: bool,
    waiting: Vec<(QueuedId, u32)>,
}

impl RecordingExecutor {
    pub fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }
}

impl ActionExecutor for RecordingExecutor {
    type Action = u32;
    type Outcome = u32;

    fn execute(&mut self, queued_id: QueuedId, action: &u32) -> Dispatch<u32> {
        self.executed.push(queued_id);
        self.actions.push(*action);
        if self.deferred {
            self.waiting.push((queued_id, *action));
            Dispatch::Pending
        } else {
            Dispatch::Completed(*action)
        }
    }

    fn drain_completed(&mut self, completed: &mut Vec<(QueuedId, u32)>) {
        completed.append(&mut self.waiting);
    }

    fn cancel(&mut self, queued_id: QueuedId) {
        self.canceled.push(queued_id);
        self.waiting.retain(|(id, _)| *id != queued_id);
    }
}

pub(super) type Delivered = Rc<RefCell<Vec<(QueuedId, u32)>>>;

pub(super) fn delivered() -> Delivered {
    Rc::new(RefCell::new(Vec::new()))
}

/// Result callback that appends to `log`
pub(super) fn record(log: &Delivered) -> impl FnOnce(QueuedId, u32) + 'static {
    let log = Rc::clone(log);
    move |id, outcome| log.borrow_mut().push((id, outcome))
}

pub(super) fn config(quota: usize) -> RayCastQueueConfig {
    RayCastQueueConfig::new(quota).with_extended_stats(true, true)
}

pub(super) fn recording_queue(quota: usize) -> DeferredActionQueue<RecordingExecutor> {
    DeferredActionQueue::new(config(quota), RecordingExecutor::default()).unwrap()
}
