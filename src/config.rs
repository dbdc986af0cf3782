//! [`TraversalConfig`]: the validated, user-facing traversal options that
//! the engine runs with, built by `cli.rs` from parsed `clap` arguments
//! (grounded in the teacher's `SearchConfig`/`FinderBuilder` split).

use crate::error::ConfigError;
use crate::result::RecordFields;
use std::path::PathBuf;
use std::time::Duration;

/// Default per-syscall deadline (spec.md §6: `--timeout`, default 5m).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// Default traversal worker count (spec.md §6: `-j/--jobs`).
pub const DEFAULT_JOBS: usize = 128;
/// Default result-writer count (spec.md §6: `--result-jobs`).
pub const DEFAULT_RESULT_JOBS: usize = 128;

/// Everything the traversal engine needs that isn't a per-entry filter:
/// concurrency, deadlines, output fields, and delete mode.
///
/// Filters (glob includes/excludes, type selection, time windows) live
/// in [`crate::filter::Filters`] instead, since they're consumed by a
/// different seam (the worker's per-entry checks) than these scalars.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Seed directories to traverse (spec.md §6: positional `DIR...`).
    pub roots: Vec<PathBuf>,
    /// Traversal worker concurrency (`-j/--jobs`).
    pub jobs: usize,
    /// Result writer concurrency (`--result-jobs`).
    pub result_jobs: usize,
    /// Per-syscall deadline (`--timeout`).
    pub timeout: Duration,
    /// Resilient mode (default) logs and skips; `--stop-on-error` disables it.
    pub resilient: bool,
    /// Suppresses non-fatal diagnostics on stderr (`-q/--quiet`).
    pub quiet: bool,
    /// Echoes extra per-directory diagnostics to stderr (`-v/--verbose`).
    pub verbose: bool,
    /// `--delete`: remove each matched entry (non-recursive).
    pub delete: bool,
    /// `--delete-all`: remove each matched entry recursively.
    pub delete_all: bool,
    /// Which fields are appended to each output record.
    pub fields: RecordFields,
}

impl TraversalConfig {
    /// Checks that every seed directory actually exists and is a directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotADirectory`] for the first root that
    /// isn't a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for root in &self.roots {
            if !root.is_dir() {
                return Err(ConfigError::NotADirectory(root.clone()));
            }
        }
        Ok(())
    }
}
