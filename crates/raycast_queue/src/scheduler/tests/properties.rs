//! Ordering and quota properties over random workloads

use proptest::prelude::*;

use super::*;
use crate::request::Priority;

/// Class indices into `Priority::ALL`, lowest first
fn classes(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0usize..Priority::ALL.len(), 0..max_len)
}

fn queue_for(quota: usize, immediate: bool, aging_rate: f32) -> DeferredActionQueue<RecordingExecutor> {
    let config = config(quota)
        .with_immediate_execution(immediate)
        .with_aging_rate(aging_rate);
    DeferredActionQueue::new(config, RecordingExecutor::default()).unwrap()
}

/// Submits each batch before one tick, then ticks until the backlog is empty
///
/// Returns every submitted id with its class index, in submission order, and
/// the number of executions in each tick window.
fn run_batches(
    queue: &mut DeferredActionQueue<RecordingExecutor>,
    batches: &[Vec<usize>],
) -> (Vec<(QueuedId, usize)>, Vec<usize>) {
    let mut submitted = Vec::new();
    let mut per_tick = Vec::new();
    let mut seen = 0;
    let mut action = 0;

    let mut tick = |queue: &mut DeferredActionQueue<RecordingExecutor>, per_tick: &mut Vec<usize>| {
        queue.update(TICK);
        let executed = queue.executor().executed.len();
        per_tick.push(executed - seen);
        seen = executed;
    };

    for batch in batches {
        for &class in batch {
            let id = queue.queue(Priority::ALL[class], action, |_, _| {});
            submitted.push((id, class));
            action += 1;
        }
        tick(queue, &mut per_tick);
    }
    while queue.queue_size() > 0 {
        tick(queue, &mut per_tick);
    }

    (submitted, per_tick)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Requests of one class reach the executor in submission order
    #[test]
    fn fifo_within_each_class(
        quota in 1usize..6,
        immediate in any::<bool>(),
        batches in proptest::collection::vec(classes(24), 1..6),
    ) {
        let mut queue = queue_for(quota, immediate, 1.0);
        let (submitted, _) = run_batches(&mut queue, &batches);
        let executed = &queue.executor().executed;
        prop_assert_eq!(executed.len(), submitted.len());

        for class in 0..Priority::ALL.len() {
            let expected: Vec<QueuedId> =
                submitted.iter().filter(|(_, c)| *c == class).map(|(id, _)| *id).collect();
            let actual: Vec<QueuedId> = executed
                .iter()
                .filter(|id| expected.contains(id))
                .copied()
                .collect();
            prop_assert_eq!(actual, expected, "class {} out of order", class);
        }
    }

    /// Without aging a backlog drains strictly by class, highest first
    #[test]
    fn higher_class_drains_first_without_aging(
        quota in 1usize..6,
        batch in classes(48),
    ) {
        let mut queue = queue_for(quota, false, 0.0);
        let (mut submitted, _) = run_batches(&mut queue, &[batch]);

        // Stable, so FIFO order within a class survives
        submitted.sort_by(|(_, a), (_, b)| b.cmp(a));
        let expected: Vec<QueuedId> = submitted.into_iter().map(|(id, _)| id).collect();
        prop_assert_eq!(&queue.executor().executed, &expected);
    }

    /// No tick window hands more than the quota to the executor
    #[test]
    fn tick_window_never_exceeds_quota(
        quota in 1usize..6,
        immediate in any::<bool>(),
        aging_rate in 0.0f32..5.0,
        batches in proptest::collection::vec(classes(16), 1..10),
    ) {
        let mut queue = queue_for(quota, immediate, aging_rate);
        let (submitted, per_tick) = run_batches(&mut queue, &batches);

        for (tick, count) in per_tick.iter().enumerate() {
            prop_assert!(*count <= quota, "tick {} executed {} with quota {}", tick, count, quota);
        }
        prop_assert_eq!(per_tick.iter().sum::<usize>(), submitted.len());
    }
}
