//! Invariants of the bounded work queue's channel-first, spillover-on-
//! backpressure behavior (spec.md §4.4/§9).

use parawalk::engine::{CancellationToken, InFlight, WorkQueue};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn enqueued_paths_are_all_received_in_the_common_case() {
    let inflight = Arc::new(InFlight::new());
    let queue = WorkQueue::new(4, Arc::clone(&inflight));

    for i in 0..10 {
        queue.enqueue(PathBuf::from(format!("/tmp/{i}")));
    }

    let receiver = queue.receiver();
    let mut received = 0;
    while let Ok(_path) = receiver.recv_timeout(Duration::from_millis(50)) {
        received += 1;
        if received == 10 {
            break;
        }
    }
    assert_eq!(received, 10);
    assert_eq!(queue.spillover_len(), 0);
}

#[test]
fn backpressure_spills_over_and_the_flusher_drains_it_back() {
    // A capacity-4096 channel with nobody draining it forces every entry
    // past the 4096th into the spillover list.
    let inflight = Arc::new(InFlight::new());
    let queue = Arc::new(WorkQueue::new(1, Arc::clone(&inflight)));

    const TOTAL: usize = 4096 + 500;
    for i in 0..TOTAL {
        queue.enqueue(PathBuf::from(format!("/tmp/{i}")));
    }
    assert!(queue.spillover_len() > 0, "expected some entries to have spilled over");

    let cancel = CancellationToken::new();
    let flusher_queue = Arc::clone(&queue);
    let flusher_cancel = cancel.clone();
    let flusher = std::thread::spawn(move || flusher_queue.run_flusher(&flusher_cancel));

    let receiver = queue.receiver();
    let mut received = 0;
    while received < TOTAL {
        match receiver.recv_timeout(Duration::from_millis(200)) {
            Ok(_path) => received += 1,
            Err(_) => break,
        }
    }

    cancel.cancel();
    let _ = flusher.join();

    assert_eq!(received, TOTAL);
    assert_eq!(queue.spillover_len(), 0);
}

#[test]
fn enqueue_increments_the_inflight_counter() {
    let inflight = Arc::new(InFlight::new());
    let queue = WorkQueue::new(4, Arc::clone(&inflight));

    queue.enqueue(PathBuf::from("/tmp/a"));
    queue.enqueue(PathBuf::from("/tmp/b"));
    assert_eq!(inflight.current(), 2);

    inflight.decrement();
    assert_eq!(inflight.current(), 1);
}
