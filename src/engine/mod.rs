//! The concurrent traversal engine: work queue, worker pool, quiescence
//! controller, and cancellation, wired together behind [`Engine::run`].

pub mod cancellation;
pub mod inflight;
pub mod queue;
pub mod worker;

pub use cancellation::{install_sigint_handler, CancellationToken};
pub use inflight::InFlight;
pub use queue::WorkQueue;

use crate::config::TraversalConfig;
use crate::filter::Filters;
use crate::result;
use std::path::PathBuf;
use std::sync::Arc;

/// Owns a validated [`TraversalConfig`] and [`Filters`] set and drives one
/// traversal run end to end.
pub struct Engine {
    config: Arc<TraversalConfig>,
    filters: Arc<Filters>,
}

impl Engine {
    #[must_use]
    pub fn new(config: TraversalConfig, filters: Filters) -> Self {
        Self { config: Arc::new(config), filters: Arc::new(filters) }
    }

    /// Runs the traversal to completion, seeding the work queue with
    /// `roots`, and returns the process exit code (spec.md §6.2): `0` on
    /// clean completion, `130` if a `SIGINT` cancelled the run.
    #[must_use]
    pub fn run(self, roots: Vec<PathBuf>) -> i32 {
        let cancel = CancellationToken::new();
        install_sigint_handler(cancel.clone());

        let inflight = Arc::new(InFlight::new());
        let queue = Arc::new(WorkQueue::new(self.config.jobs.max(1), Arc::clone(&inflight)));

        let flusher_queue = Arc::clone(&queue);
        let flusher_cancel = cancel.clone();
        std::thread::spawn(move || flusher_queue.run_flusher(&flusher_cancel));

        let (pipeline, handle) = result::spawn(self.config.fields, self.config.result_jobs, &inflight);

        for root in roots {
            queue.enqueue(root);
        }

        worker::run_dispatcher(&queue, &inflight, &cancel, &self.filters, &self.config, &pipeline.batches);

        handle.join();

        if cancel.is_cancelled() {
            130
        } else {
            0
        }
    }
}
