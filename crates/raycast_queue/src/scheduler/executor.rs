//! Executor boundary of the deferred queue
//!
//! The queue never runs actions itself. Each submitted action is handed to an
//! [`ActionExecutor`], which either answers at once or reports the outcome
//! later through [`ActionExecutor::drain_completed`]. The queue polls for late
//! outcomes at the start of every tick, so completions always arrive on the
//! tick thread.

use crate::request::QueuedId;

/// What an executor did with a submitted action
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch<O> {
    /// The action finished during `execute`
    Completed(O),
    /// The outcome will be reported by a later `drain_completed`
    Pending,
}

/// Shared resource the queue admits actions to
pub trait ActionExecutor {
    /// Work item submitted by callers
    type Action;
    /// Result handed back to callers
    type Outcome;

    /// Run or start `action` on behalf of submission `queued_id`
    fn execute(&mut self, queued_id: QueuedId, action: &Self::Action) -> Dispatch<Self::Outcome>;

    /// Move outcomes of previously pending actions into `completed`
    fn drain_completed(&mut self, completed: &mut Vec<(QueuedId, Self::Outcome)>) {
        let _ = completed;
    }

    /// Forget a pending action; its outcome must not be reported
    fn cancel(&mut self, queued_id: QueuedId) {
        let _ = queued_id;
    }
}
