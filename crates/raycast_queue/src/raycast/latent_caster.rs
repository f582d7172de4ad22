//! Asynchronous caster adapter
//!
//! Wraps a synchronous executor and holds each outcome back for a fixed
//! number of ticks, the way a job-based physics backend answers a few frames
//! after submission.

use std::collections::HashMap;

use log::trace;

use crate::foundation::collections::{Handle, HandleMap};
use crate::request::QueuedId;
use crate::scheduler::{ActionExecutor, Dispatch};

#[derive(Debug)]
struct LatentJob<O> {
    queued_id: QueuedId,
    outcome: O,
    remaining_ticks: u32,
}

/// Executor that reports outcomes `latency_ticks` polls after submission
pub struct LatentCaster<E: ActionExecutor> {
    inner: E,
    latency_ticks: u32,
    in_flight: HandleMap<LatentJob<E::Outcome>>,
    handles: HashMap<QueuedId, Handle>,
}

impl<E: ActionExecutor> LatentCaster<E> {
    /// Wrap `inner`, delaying each outcome by `latency_ticks` polls
    ///
    /// A latency of zero passes outcomes straight through.
    pub fn new(inner: E, latency_ticks: u32) -> Self {
        Self {
            inner,
            latency_ticks,
            in_flight: HandleMap::new(),
            handles: HashMap::new(),
        }
    }

    /// Number of outcomes being held back
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Configured latency
    pub fn latency_ticks(&self) -> u32 {
        self.latency_ticks
    }

    /// Wrapped executor
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Mutable wrapped executor
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }
}

impl<E: ActionExecutor> ActionExecutor for LatentCaster<E> {
    type Action = E::Action;
    type Outcome = E::Outcome;

    fn execute(&mut self, queued_id: QueuedId, action: &E::Action) -> Dispatch<E::Outcome> {
        match self.inner.execute(queued_id, action) {
            Dispatch::Completed(outcome) if self.latency_ticks == 0 => Dispatch::Completed(outcome),
            Dispatch::Completed(outcome) => {
                let handle = self.in_flight.insert(LatentJob {
                    queued_id,
                    outcome,
                    remaining_ticks: self.latency_ticks,
                });
                self.handles.insert(queued_id, handle);
                Dispatch::Pending
            }
            Dispatch::Pending => Dispatch::Pending,
        }
    }

    fn drain_completed(&mut self, completed: &mut Vec<(QueuedId, E::Outcome)>) {
        self.inner.drain_completed(completed);

        let mut ready: Vec<(QueuedId, Handle)> = Vec::new();
        for (handle, job) in &mut self.in_flight {
            job.remaining_ticks = job.remaining_ticks.saturating_sub(1);
            if job.remaining_ticks == 0 {
                ready.push((job.queued_id, handle));
            }
        }

        // Report in submission order
        ready.sort_by_key(|(queued_id, _)| *queued_id);
        for (queued_id, handle) in ready {
            self.handles.remove(&queued_id);
            if let Some(job) = self.in_flight.remove(handle) {
                trace!("Latent outcome for {} released", queued_id);
                completed.push((queued_id, job.outcome));
            }
        }
    }

    fn cancel(&mut self, queued_id: QueuedId) {
        if let Some(handle) = self.handles.remove(&queued_id) {
            self.in_flight.remove(handle);
        }
        self.inner.cancel(queued_id);
    }
}
