//! Tick-driven deferred action queue
//!
//! Callers submit prioritized actions at any time; each [`DeferredActionQueue::update`]
//! hands at most `quota` of them to the executor, highest priority first,
//! oldest first within a priority. Anything beyond the quota waits for a later
//! tick. There is no backlog limit.

use std::collections::HashMap;

use log::{debug, info, trace};

use super::executor::{ActionExecutor, Dispatch};
use crate::contention::{self, ContentionPolicy, ContentionStats, TickCounts};
use crate::config::ConfigError;
use crate::core::config::{AgingConfig, RayCastQueueConfig};
use crate::error::QueueError;
use crate::foundation::collections::SlotId;
use crate::foundation::time::FrameClock;
use crate::queue::{by_descending_priority, AgePriorityQueue};
use crate::request::{Priority, QueuedId, RequesterDebugInfo};

/// Called once with the outcome of a request; never called for canceled requests
pub type ResultCallback<O> = Box<dyn FnOnce(QueuedId, O)>;

/// Called right before a request is handed to the executor; may rewrite it
pub type SubmitCallback<A> = Box<dyn FnOnce(QueuedId, &mut A)>;

struct PendingAction<A, O> {
    queued_id: QueuedId,
    priority: Priority,
    action: A,
    on_result: ResultCallback<O>,
    on_submit: Option<SubmitCallback<A>>,
}

/// Bounded-admission queue in front of a shared executor
pub struct DeferredActionQueue<E: ActionExecutor> {
    executor: E,
    policy: Box<dyn ContentionPolicy>,
    queue: AgePriorityQueue<PendingAction<E::Action, E::Outcome>>,
    slots: HashMap<QueuedId, SlotId>,
    in_flight: HashMap<QueuedId, ResultCallback<E::Outcome>>,
    completions: Vec<(QueuedId, E::Outcome)>,
    next_id: QueuedId,
    clock: FrameClock,
    quota: usize,
    immediate_execution: bool,
    aging: AgingConfig,
    tick_immediate: usize,
}

impl<E: ActionExecutor> DeferredActionQueue<E> {
    /// Create a queue, choosing the contention policy from the configuration
    pub fn new(config: RayCastQueueConfig, executor: E) -> Result<Self, QueueError> {
        config.validate()?;
        let policy = contention::policy_for(config.quota, &config.contention);
        Ok(Self::build(&config, executor, policy))
    }

    /// Create a queue with a caller-provided contention policy
    ///
    /// The policy reports the quota in stats, so it must have been built with
    /// `config.quota`.
    pub fn with_policy(
        config: RayCastQueueConfig,
        executor: E,
        policy: Box<dyn ContentionPolicy>,
    ) -> Result<Self, QueueError> {
        config.validate()?;
        if policy.quota() != config.quota {
            return Err(ConfigError::Invalid(format!(
                "Contention policy quota {} does not match queue quota {}",
                policy.quota(),
                config.quota
            ))
            .into());
        }
        Ok(Self::build(&config, executor, policy))
    }

    fn build(config: &RayCastQueueConfig, executor: E, policy: Box<dyn ContentionPolicy>) -> Self {
        info!(
            "Deferred queue created (quota {}, immediate execution {}, extended stats {})",
            config.quota,
            config.immediate_execution,
            policy.is_gathering_extended_stats()
        );

        Self {
            executor,
            policy,
            queue: AgePriorityQueue::with_capacity(config.quota),
            slots: HashMap::new(),
            in_flight: HashMap::new(),
            completions: Vec::new(),
            next_id: QueuedId::FIRST,
            clock: FrameClock::new(),
            quota: config.quota,
            immediate_execution: config.immediate_execution,
            aging: config.aging.clone(),
            tick_immediate: 0,
        }
    }

    /// Submit an action with no submit callback and no requester label
    pub fn queue(
        &mut self,
        priority: Priority,
        action: E::Action,
        on_result: impl FnOnce(QueuedId, E::Outcome) + 'static,
    ) -> QueuedId {
        self.queue_with(priority, action, on_result, None, &RequesterDebugInfo::default())
    }

    /// Submit an action
    ///
    /// With immediate execution enabled, an empty backlog and budget left in
    /// the current tick, the action runs before this call returns; a
    /// synchronous executor then invokes `on_result` before the id is
    /// returned.
    pub fn queue_with(
        &mut self,
        priority: Priority,
        action: E::Action,
        on_result: impl FnOnce(QueuedId, E::Outcome) + 'static,
        on_submit: Option<SubmitCallback<E::Action>>,
        requester: &RequesterDebugInfo,
    ) -> QueuedId {
        let queued_id = self.next_id;
        self.next_id = queued_id.next();

        self.policy.queued(requester, queued_id, priority, self.clock.stamp());

        let pending = PendingAction {
            queued_id,
            priority,
            action,
            on_result: Box::new(on_result),
            on_submit,
        };

        if self.immediate_execution && self.queue.is_empty() && self.tick_immediate < self.quota {
            self.tick_immediate += 1;
            trace!("Request {} ({:?}) submitted immediately", queued_id, priority);
            self.submit(pending, true);
        } else {
            let slot = self.queue.push_back(pending);
            self.slots.insert(queued_id, slot);
            self.policy.set_queue_size(self.queue.len());
            trace!("Request {} ({:?}) queued, backlog {}", queued_id, priority, self.queue.len());
        }

        queued_id
    }

    /// Cancel a queued or in-flight request
    ///
    /// No callback of a canceled request is invoked. Returns `false` when the
    /// id is unknown, already completed, or already canceled.
    pub fn cancel(&mut self, queued_id: QueuedId) -> bool {
        if let Some(slot) = self.slots.remove(&queued_id) {
            let removed = self.queue.erase(slot);
            debug_assert!(removed.is_some(), "slot index out of sync with queue");
            self.policy.canceled(queued_id);
            self.policy.set_queue_size(self.queue.len());
            debug!("Canceled queued request {}", queued_id);
            return true;
        }

        if self.in_flight.remove(&queued_id).is_some() {
            self.executor.cancel(queued_id);
            self.policy.canceled(queued_id);
            debug!("Canceled in-flight request {}", queued_id);
            return true;
        }

        false
    }

    /// Cancel every queued and in-flight request, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let ids: Vec<QueuedId> = self.slots.keys().chain(self.in_flight.keys()).copied().collect();
        ids.into_iter().filter(|&id| self.cancel(id)).count()
    }

    /// Run one scheduling tick
    ///
    /// Collects late outcomes from the executor, ages and reorders the
    /// backlog, then submits up to the budget left after this tick window's
    /// immediate submissions.
    pub fn update(&mut self, delta_time: f32) {
        self.clock.advance(delta_time);
        self.collect_completions();

        let budget = self.quota.saturating_sub(self.tick_immediate);
        let aging = self.clock.delta_time();
        let rates = &self.aging;
        let reprioritize =
            |age: f32, pending: &PendingAction<E::Action, E::Outcome>| rates.priority_for(pending.priority, age);

        if self.queue.len() > budget {
            self.queue.partial_update(budget, aging, reprioritize, by_descending_priority);
        } else {
            self.queue.update_by_priority(aging, reprioritize);
        }

        let drained = self.queue.drain_front(budget);
        let deferred = drained.len();
        for (_, pending) in drained {
            self.slots.remove(&pending.queued_id);
            self.submit(pending, false);
        }

        let counts = TickCounts {
            immediate: self.tick_immediate,
            deferred,
        };
        self.policy.record_tick(counts);
        self.policy.set_queue_size(self.queue.len());
        self.tick_immediate = 0;

        if counts.total() > 0 || !self.queue.is_empty() {
            trace!(
                "Tick {}: {} immediate, {} deferred, {} waiting, {} in flight",
                self.clock.frame_count(),
                counts.immediate,
                counts.deferred,
                self.queue.len(),
                self.in_flight.len()
            );
        }
    }

    fn submit(&mut self, pending: PendingAction<E::Action, E::Outcome>, immediate: bool) {
        let PendingAction {
            queued_id,
            mut action,
            on_result,
            on_submit,
            ..
        } = pending;

        if let Some(on_submit) = on_submit {
            on_submit(queued_id, &mut action);
        }

        let stamp = self.clock.stamp();
        if immediate {
            self.policy.performed_immediate(queued_id, stamp);
        } else {
            self.policy.performed_deferred(queued_id, stamp);
        }

        match self.executor.execute(queued_id, &action) {
            Dispatch::Completed(outcome) => self.complete(queued_id, on_result, outcome),
            Dispatch::Pending => {
                self.in_flight.insert(queued_id, on_result);
            }
        }
    }

    fn complete(&mut self, queued_id: QueuedId, on_result: ResultCallback<E::Outcome>, outcome: E::Outcome) {
        self.policy.completed_deferred(queued_id, self.clock.stamp());
        on_result(queued_id, outcome);
    }

    fn collect_completions(&mut self) {
        let mut completions = std::mem::take(&mut self.completions);
        self.executor.drain_completed(&mut completions);

        for (queued_id, outcome) in completions.drain(..) {
            match self.in_flight.remove(&queued_id) {
                Some(on_result) => self.complete(queued_id, on_result, outcome),
                None => trace!("Dropping outcome for unknown or canceled request {}", queued_id),
            }
        }

        self.completions = completions;
    }

    /// Submissions allowed per tick
    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Requests waiting in the backlog
    pub fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// Requests handed to the executor whose outcome has not arrived
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether a request is still waiting or in flight
    pub fn is_pending(&self, queued_id: QueuedId) -> bool {
        self.slots.contains_key(&queued_id) || self.in_flight.contains_key(&queued_id)
    }

    /// Whether a request is still waiting in the backlog
    pub fn is_queued(&self, queued_id: QueuedId) -> bool {
        self.slots.contains_key(&queued_id)
    }

    /// Current frame of the queue's clock
    pub fn frame_id(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Simulation time of the queue's clock
    pub fn time(&self) -> f64 {
        self.clock.total_time()
    }

    /// Underlying executor
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Mutable underlying executor
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Whether per-request history is being recorded
    pub fn is_gathering_extended_stats(&self) -> bool {
        self.policy.is_gathering_extended_stats()
    }

    /// Turn per-request history on or off
    pub fn enable_gathering_extended_stats(&mut self, enable: bool) {
        self.policy.enable_gathering_extended_stats(enable);
    }

    /// Snapshot contention statistics, draining the completed history
    pub fn contention_stats(&mut self) -> ContentionStats {
        self.policy.contention_stats()
    }

    /// Clear statistics and history; queued requests are unaffected
    pub fn reset_contention_stats(&mut self) {
        self.policy.reset_contention_stats();
        debug!("Contention stats reset");
    }
}

impl<E> DeferredActionQueue<E>
where
    E: ActionExecutor,
    E::Action: Default,
{
    /// Submit a request whose payload is produced by `on_submit`
    ///
    /// The action starts as `Default::default()` and is filled in right
    /// before it reaches the executor.
    pub fn queue_request_less(
        &mut self,
        priority: Priority,
        on_result: impl FnOnce(QueuedId, E::Outcome) + 'static,
        on_submit: impl FnOnce(QueuedId, &mut E::Action) + 'static,
    ) -> QueuedId {
        self.queue_with(
            priority,
            E::Action::default(),
            on_result,
            Some(Box::new(on_submit)),
            &RequesterDebugInfo::default(),
        )
    }
}
