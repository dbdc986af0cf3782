//! The result pipeline: a global batch list, an aggregator thread, and
//! a bounded pool of writer threads that format records into a shared
//! output buffer (spec.md §4.6).

use crate::engine::inflight::InFlight;
use crate::result::record::{RecordFields, ResultBatch};
use crossbeam_channel::bounded;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Output is flushed to stdout once the shared buffer grows past this.
const FLUSH_THRESHOLD: usize = 4 * 1024;
const POLL_INTERVAL: Duration = Duration::from_micros(10);

/// The "global batch list" of spec.md §4.6: a mutex-guarded queue that
/// workers push completed batches into and the aggregator drains.
pub struct BatchList {
    queue: Mutex<VecDeque<ResultBatch>>,
    cond: Condvar,
}

impl Default for BatchList {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchList {
    #[must_use]
    pub fn new() -> Self {
        Self { queue: Mutex::new(VecDeque::new()), cond: Condvar::new() }
    }

    /// Drains every currently-queued batch; used by tests that drive a
    /// traversal synchronously and then inspect what was emitted.
    #[must_use]
    pub fn drain_all(&self) -> Vec<ResultBatch> {
        self.queue.lock().unwrap().drain(..).collect()
    }

    /// Submits a batch and wakes the aggregator.
    pub fn push(&self, batch: ResultBatch) {
        self.queue.lock().unwrap().push_back(batch);
        self.cond.notify_one();
    }

    fn pop(&self) -> Option<ResultBatch> {
        self.queue.lock().unwrap().pop_front()
    }

    fn wait(&self) {
        let guard = self.queue.lock().unwrap();
        let _ = self.cond.wait_timeout(guard, POLL_INTERVAL).unwrap();
    }

    /// Wakes a waiting aggregator without pushing a batch; used once the
    /// quiescence controller marks traversal complete, so the aggregator
    /// doesn't sit through the full poll interval before noticing.
    pub fn notify(&self) {
        self.cond.notify_all();
    }
}

/// A running result pipeline: submit batches to `batches`, then call
/// [`PipelineHandle::join`] once no more batches will arrive.
pub struct Pipeline {
    pub batches: Arc<BatchList>,
}

/// Join handle returned by [`spawn`]; waits for the aggregator and every
/// writer it started, then flushes whatever remains buffered.
pub struct PipelineHandle {
    aggregator: JoinHandle<()>,
}

impl PipelineHandle {
    /// Blocks until the aggregator and all writers have finished and the
    /// output buffer has been flushed.
    pub fn join(self) {
        let _ = self.aggregator.join();
    }
}

/// Starts the aggregator thread and wires up the writer-pool semaphore.
///
/// `inflight` is consulted so the aggregator knows when traversal has
/// gone quiescent: its exit condition is "quiescent and batch list empty"
/// (spec.md §4.7), never just "list empty", since a momentarily empty
/// list mid-traversal is routine.
#[must_use]
pub fn spawn(fields: RecordFields, result_jobs: usize, inflight: &Arc<InFlight>) -> (Pipeline, PipelineHandle) {
    let batches = Arc::new(BatchList::new());
    let result_jobs = result_jobs.max(1);
    let inflight_marker = Arc::clone(inflight);

    let output: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::with_capacity(FLUSH_THRESHOLD * 2)));

    let (token_tx, token_rx) = bounded::<()>(result_jobs);
    for _ in 0..result_jobs {
        token_tx.send(()).unwrap();
    }

    let aggregator_batches = Arc::clone(&batches);
    let aggregator = std::thread::spawn(move || {
        let mut writers: Vec<JoinHandle<()>> = Vec::new();

        loop {
            match aggregator_batches.pop() {
                Some(batch) => {
                    // Acquire a writer slot (token-channel semaphore).
                    token_rx.recv().unwrap();
                    let output = Arc::clone(&output);
                    let release = token_tx.clone();
                    writers.push(std::thread::spawn(move || {
                        write_batch(&batch, fields, &output);
                        let _ = release.send(());
                    }));
                }
                None => {
                    if inflight_marker.is_complete() {
                        // Re-check after the complete flag to avoid a race
                        // against a batch pushed the instant before it flipped.
                        if let Some(batch) = aggregator_batches.pop() {
                            token_rx.recv().unwrap();
                            let output = Arc::clone(&output);
                            let release = token_tx.clone();
                            writers.push(std::thread::spawn(move || {
                                write_batch(&batch, fields, &output);
                                let _ = release.send(());
                            }));
                            continue;
                        }
                        break;
                    }
                    aggregator_batches.wait();
                }
            }
        }

        for writer in writers {
            let _ = writer.join();
        }
        flush(&output, true);
    });

    (Pipeline { batches }, PipelineHandle { aggregator })
}

fn write_batch(batch: &ResultBatch, fields: RecordFields, output: &Mutex<Vec<u8>>) {
    let mut local = Vec::new();
    for record in batch.iter() {
        record.format_into(fields, &mut local);
        local.push(b'\n');
    }

    let mut guard = output.lock().unwrap();
    guard.extend_from_slice(&local);
    if guard.len() >= FLUSH_THRESHOLD {
        flush_locked(&mut guard);
    }
}

fn flush_locked(buf: &mut Vec<u8>) {
    if buf.is_empty() {
        return;
    }
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = lock.write_all(buf);
    let _ = lock.flush();
    buf.clear();
}

fn flush(output: &Mutex<Vec<u8>>, force: bool) {
    let mut guard = output.lock().unwrap();
    if force || guard.len() >= FLUSH_THRESHOLD {
        flush_locked(&mut guard);
    }
}
