use super::*;
use crate::request::Priority;

#[test]
fn test_cancel_queued_request() {
    let mut queue = recording_queue(1);
    let log = delivered();

    let first = queue.queue(Priority::Medium, 1, record(&log));
    let second = queue.queue(Priority::Medium, 2, record(&log));

    assert!(queue.cancel(first));
    assert!(!queue.cancel(first));
    assert!(!queue.is_pending(first));
    assert_eq!(queue.queue_size(), 1);

    queue.update(TICK);
    queue.update(TICK);

    assert_eq!(queue.executor().executed, vec![second]);
    assert_eq!(*log.borrow(), vec![(second, 2)]);
}

#[test]
fn test_cancel_unknown_or_finished_id() {
    let mut queue = recording_queue(4);
    assert!(!queue.cancel(QueuedId::new(999)));

    let id = queue.queue(Priority::High, 1, |_, _| {});
    queue.update(TICK);
    assert!(!queue.is_pending(id));
    assert!(!queue.cancel(id));
}

#[test]
fn test_cancel_in_flight_request() {
    let mut queue = DeferredActionQueue::new(config(4), RecordingExecutor::deferred()).unwrap();
    let log = delivered();

    let kept = queue.queue(Priority::Medium, 1, record(&log));
    let dropped = queue.queue(Priority::Medium, 2, record(&log));

    queue.update(TICK);
    assert_eq!(queue.in_flight_count(), 2);
    assert!(queue.is_pending(dropped));
    assert!(!queue.is_queued(dropped));

    assert!(queue.cancel(dropped));
    assert_eq!(queue.executor().canceled, vec![dropped]);
    assert!(!queue.cancel(dropped));

    queue.update(TICK);
    assert_eq!(*log.borrow(), vec![(kept, 1)]);
    assert_eq!(queue.in_flight_count(), 0);
}

#[test]
fn test_stale_id_does_not_hit_reused_slot() {
    let mut queue = recording_queue(1);
    let log = delivered();

    let old = queue.queue(Priority::Low, 1, record(&log));
    assert!(queue.cancel(old));

    // Reuses the freed queue slot
    let new = queue.queue(Priority::Low, 2, record(&log));
    assert!(!queue.cancel(old));
    assert!(queue.is_pending(new));

    queue.update(TICK);
    assert_eq!(*log.borrow(), vec![(new, 2)]);
}

#[test]
fn test_cancel_all() {
    let mut queue = DeferredActionQueue::new(config(2), RecordingExecutor::deferred()).unwrap();
    let log = delivered();

    for action in 0..5 {
        queue.queue(Priority::Medium, action, record(&log));
    }
    queue.update(TICK);
    assert_eq!(queue.in_flight_count(), 2);
    assert_eq!(queue.queue_size(), 3);

    assert_eq!(queue.cancel_all(), 5);
    assert_eq!(queue.cancel_all(), 0);

    queue.update(TICK);
    assert!(log.borrow().is_empty());
    assert_eq!(queue.executor().executed.len(), 2);
}

#[test]
fn test_canceled_request_leaves_no_history() {
    let mut queue = recording_queue(4);
    let canceled = queue.queue(Priority::High, 1, |_, _| {});
    let kept = queue.queue(Priority::High, 2, |_, _| {});

    assert!(queue.cancel(canceled));
    queue.update(TICK);

    let stats = queue.contention_stats();
    assert!(stats.pending_requests.is_empty());
    let completed: Vec<QueuedId> = stats
        .recently_completed_requests
        .iter()
        .map(|info| info.queued_id)
        .collect();
    assert_eq!(completed, vec![kept]);
}
