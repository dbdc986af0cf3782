//! Bounded work channel with an unbounded spillover store and a
//! periodic flusher.
//!
//! Enqueueing never blocks: the channel is tried first, and only on
//! backpressure does a path spill into the mutex-guarded overflow list.
//! A dedicated flusher thread drains spillover back into the channel on
//! a flush request or a 10 ms timer, whichever comes first. This keeps
//! the hot path wait-free for workers that themselves must dequeue to
//! make progress (spilling the other direction would deadlock them).

use crate::engine::cancellation::CancellationToken;
use crate::engine::inflight::InFlight;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const FLUSH_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct WorkQueue {
    sender: Sender<PathBuf>,
    receiver: Receiver<PathBuf>,
    spillover: Mutex<Vec<PathBuf>>,
    flush_request: Sender<()>,
    flush_signal: Receiver<()>,
    threads: usize,
    inflight: Arc<InFlight>,
}

impl WorkQueue {
    #[must_use]
    pub fn new(threads: usize, inflight: Arc<InFlight>) -> Self {
        let capacity = threads.max(4096);
        let (sender, receiver) = bounded(capacity);
        let (flush_request, flush_signal) = bounded(1);
        Self {
            sender,
            receiver,
            spillover: Mutex::new(Vec::new()),
            flush_request,
            flush_signal,
            threads,
            inflight,
        }
    }

    #[must_use]
    pub fn receiver(&self) -> Receiver<PathBuf> {
        self.receiver.clone()
    }

    /// Enqueues `path`, incrementing the in-flight counter first.
    pub fn enqueue(&self, path: PathBuf) {
        self.inflight.increment();
        match self.sender.try_send(path) {
            Ok(()) => {}
            Err(TrySendError::Full(path)) => {
                let spill_len = {
                    let mut spillover = self.spillover.lock().unwrap();
                    spillover.push(path);
                    spillover.len()
                };
                if self.inflight.current() - spill_len as i64 < self.threads as i64 {
                    let _ = self.flush_request.try_send(());
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                // The channel only closes once every worker has exited;
                // a late enqueue attempt has no consumer left to matter to.
            }
        }
    }

    /// Runs the flusher loop until `cancel` fires or the channel is dropped.
    pub fn run_flusher(&self, cancel: &CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                return;
            }
            match self.flush_signal.recv_timeout(FLUSH_POLL_INTERVAL) {
                Ok(()) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
            self.drain_spillover();
        }
    }

    fn drain_spillover(&self) {
        loop {
            let path = {
                let mut spillover = self.spillover.lock().unwrap();
                match spillover.pop() {
                    Some(path) => path,
                    None => return,
                }
            };
            match self.sender.try_send(path) {
                Ok(()) => {}
                Err(TrySendError::Full(path)) => {
                    self.spillover.lock().unwrap().push(path);
                    return;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    #[must_use]
    pub fn spillover_len(&self) -> usize {
        self.spillover.lock().unwrap().len()
    }
}
