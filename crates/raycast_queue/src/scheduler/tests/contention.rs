use approx::assert_relative_eq;

use super::*;
use crate::contention::{ContentionPolicy, NullStatsPolicy, RequestState};
use crate::request::{EntityId, Priority, RequesterDebugInfo};

fn labelled(queue: &mut DeferredActionQueue<RecordingExecutor>, priority: Priority, action: u32) -> QueuedId {
    let requester = RequesterDebugInfo::new("Perception")
        .with_custom(format!("sight check {action}"))
        .with_entity(EntityId(action));
    queue.queue_with(priority, action, |_, _| {}, None, &requester)
}

#[test]
fn test_stats_after_quota_limited_tick() {
    let mut queue = recording_queue(2);
    for (action, priority) in (1..).zip([
        Priority::Low,
        Priority::High,
        Priority::Medium,
        Priority::High,
        Priority::Low,
    ]) {
        labelled(&mut queue, priority, action);
    }

    queue.update(TICK);
    let stats = queue.contention_stats();

    assert_eq!(stats.quota, 2);
    assert_eq!(stats.queue_size, 3);
    assert_eq!(stats.peak_queue_size, 5);
    assert_eq!(stats.deferred_count, 2);
    assert_eq!(stats.immediate_count, 0);
    assert_relative_eq!(stats.utilization(), 1.0);

    let waiting: Vec<QueuedId> = stats.pending_requests.iter().map(|info| info.queued_id).collect();
    assert_eq!(waiting, vec![QueuedId::new(1), QueuedId::new(3), QueuedId::new(5)]);
    assert!(stats.pending_requests.iter().all(|info| info.state == RequestState::Queued));

    let done = &stats.recently_completed_requests;
    assert_eq!(done.len(), 2);
    assert_eq!(done[0].requester, "Perception");
    assert_eq!(done[0].custom, "sight check 2");
    assert_eq!(done[0].entity_id, Some(EntityId(2)));
    assert_eq!(done[0].priority, Priority::High);
    assert_eq!(done[0].queued_frame, 0);
    assert_eq!(done[0].completed_frame, Some(1));
    assert!(!done[0].immediate);
}

#[test]
fn test_second_snapshot_has_no_completed_records() {
    let mut queue = recording_queue(4);
    for action in 0..3 {
        queue.queue(Priority::Medium, action, |_, _| {});
    }
    queue.update(TICK);

    let first = queue.contention_stats();
    let second = queue.contention_stats();

    assert_eq!(first.recently_completed_requests.len(), 3);
    assert!(second.recently_completed_requests.is_empty());
    assert_eq!(first.deferred_count, second.deferred_count);
    assert_eq!(first.peak_queue_size, second.peak_queue_size);
}

#[test]
fn test_toggling_gathering_clears_history() {
    let mut queue = recording_queue(1);
    let before = queue.queue(Priority::Medium, 1, |_, _| {});
    queue.queue(Priority::Medium, 2, |_, _| {});
    queue.update(TICK);
    assert!(queue.is_gathering_extended_stats());

    queue.enable_gathering_extended_stats(false);
    assert!(!queue.is_gathering_extended_stats());
    let stats = queue.contention_stats();
    assert!(stats.pending_requests.is_empty());
    assert!(stats.recently_completed_requests.is_empty());

    queue.enable_gathering_extended_stats(true);
    let after = queue.queue(Priority::Medium, 3, |_, _| {});
    queue.update(TICK);
    queue.update(TICK);

    // Request 2 completed while untracked and left no record
    let stats = queue.contention_stats();
    let completed: Vec<QueuedId> = stats
        .recently_completed_requests
        .iter()
        .map(|info| info.queued_id)
        .collect();
    assert_eq!(completed, vec![after]);
    assert_ne!(completed[0], before);
}

#[test]
fn test_reset_keeps_backlog() {
    let mut queue = recording_queue(1);
    for action in 0..4 {
        queue.queue(Priority::Low, action, |_, _| {});
    }
    queue.update(TICK);

    queue.reset_contention_stats();
    let stats = queue.contention_stats();
    assert_eq!(stats.queue_size, 3);
    assert_eq!(stats.peak_queue_size, 3);
    assert_eq!(stats.peak_deferred_count, 0);
    assert!(stats.pending_requests.is_empty());
    assert_eq!(queue.queue_size(), 3);

    queue.update(TICK);
    let stats = queue.contention_stats();
    assert_eq!(stats.queue_size, 2);
    assert_eq!(stats.peak_queue_size, 3);
    assert_eq!(stats.deferred_count, 1);
    assert_eq!(queue.executor().executed.len(), 2);
}

#[test]
fn test_averages_follow_window() {
    let config = config(2).with_average_window(4);
    let mut queue = DeferredActionQueue::new(config, RecordingExecutor::default()).unwrap();

    // 2, 2, 1, 0 deferred submissions over four ticks
    for action in 0..5 {
        queue.queue(Priority::Medium, action, |_, _| {});
    }
    for _ in 0..4 {
        queue.update(TICK);
    }

    let stats = queue.contention_stats();
    assert_relative_eq!(stats.deferred_average, 1.25);
    assert_relative_eq!(stats.immediate_average, 0.0);
    assert_eq!(stats.peak_deferred_count, 2);
}

#[test]
fn test_counters_only_policy() {
    let config = config(2).with_extended_stats(false, false);
    let mut queue = DeferredActionQueue::new(config, RecordingExecutor::default()).unwrap();

    queue.enable_gathering_extended_stats(true);
    assert!(!queue.is_gathering_extended_stats());

    for action in 0..3 {
        queue.queue(Priority::High, action, |_, _| {});
    }
    queue.update(TICK);

    let stats = queue.contention_stats();
    assert_eq!(stats.deferred_count, 2);
    assert_eq!(stats.queue_size, 1);
    assert!(stats.pending_requests.is_empty());
    assert!(stats.recently_completed_requests.is_empty());
}

#[test]
fn test_custom_policy_is_used() {
    let policy: Box<dyn ContentionPolicy> = Box::new(NullStatsPolicy::new(3, 8));
    let mut queue = DeferredActionQueue::with_policy(config(3), RecordingExecutor::default(), policy).unwrap();

    queue.queue(Priority::Low, 1, |_, _| {});
    queue.update(TICK);

    assert!(!queue.is_gathering_extended_stats());
    let stats = queue.contention_stats();
    assert_eq!(stats.deferred_count, 1);
    assert_eq!(stats.quota, queue.quota());
}

#[test]
fn test_custom_policy_with_other_quota_is_rejected() {
    let policy: Box<dyn ContentionPolicy> = Box::new(NullStatsPolicy::new(64, 8));
    let result = DeferredActionQueue::with_policy(config(2), RecordingExecutor::default(), policy);
    assert!(matches!(
        result,
        Err(crate::QueueError::Config(crate::config::ConfigError::Invalid(_)))
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = DeferredActionQueue::new(config(0), RecordingExecutor::default());
    assert!(matches!(result, Err(crate::QueueError::Config(_))));
}
