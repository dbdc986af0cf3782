//! Entry filtering: name/path globs, type selection, and time windows.

pub mod path;
pub mod time_window;

pub use path::GlobFilter;
pub use time_window::TimeWindow;

use crate::filetype::TypeSet;

/// Bundles every per-entry predicate the worker applies before emitting
/// a result record.
///
/// The time-window predicate is evaluated by the worker directly against
/// a `StatInfo` it already fetched for the record's size/time fields
/// (see `engine::worker::process_directory`), rather than through a
/// method here that would re-stat the path.
#[derive(Debug)]
pub struct Filters {
    pub glob: GlobFilter,
    pub types: TypeSet,
    pub time_window: TimeWindow,
    pub needs_stat: bool,
}

impl Filters {
    #[must_use]
    pub fn new(glob: GlobFilter, types: TypeSet, time_window: TimeWindow, needs_stat: bool) -> Self {
        let needs_stat = needs_stat || time_window.is_active();
        Self { glob, types, time_window, needs_stat }
    }

    /// Applies the name/path glob filter only (used for the emit-filter,
    /// independent of whether the entry is enqueued for recursion).
    #[must_use]
    pub fn admits_path(&self, path: &[u8]) -> bool {
        self.glob.admits(path)
    }
}
