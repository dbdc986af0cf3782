//! The in-flight directory counter that drives quiescence detection.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Condvar, Mutex};

/// Tracks outstanding directory jobs: incremented on enqueue, decremented
/// when a worker finishes a directory. Reaching zero is the termination
/// signal for the dispatcher.
///
/// A single atomic counter is used rather than closing channels from
/// producers, because producers are also consumers of the same queue —
/// closing it from either side would race.
pub struct InFlight {
    count: AtomicI64,
    zero_lock: Mutex<()>,
    zero_cond: Condvar,
    complete: std::sync::atomic::AtomicBool,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: AtomicI64::new(0),
            zero_lock: Mutex::new(()),
            zero_cond: Condvar::new(),
            complete: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Marks traversal as quiescent for good: the dispatcher calls this
    /// once [`Self::wait_for_zero`] returns, and the result pipeline's
    /// aggregator polls it to know no further batches will arrive.
    pub fn mark_complete(&self) {
        self.complete.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::SeqCst)
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrements the counter; wakes any waiter if it reaches zero.
    pub fn decrement(&self) {
        let previous = self.count.fetch_sub(1, Ordering::SeqCst);
        if previous == 1 {
            let _guard = self.zero_lock.lock().unwrap();
            self.zero_cond.notify_all();
        }
    }

    #[must_use]
    pub fn current(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }

    /// Blocks until the counter reaches zero.
    pub fn wait_for_zero(&self) {
        let mut guard = self.zero_lock.lock().unwrap();
        while self.count.load(Ordering::SeqCst) > 0 {
            let (next_guard, _timeout) =
                self.zero_cond.wait_timeout(guard, std::time::Duration::from_millis(10)).unwrap();
            guard = next_guard;
        }
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}
