//! `--delete` / `--delete-all` side effects.
//!
//! A delete is attempted once an entry has already passed every other
//! filter; failures never abort traversal (spec.md §4.6/§7), they only
//! flip the record's status and print a diagnostic.

use crate::dirent::syscall;
use crate::result::record::DeleteStatus;
use std::path::Path;

/// Removes `path` per `recursive`, logging the outcome unless `quiet`.
///
/// A non-recursive delete of a non-empty directory fails (spec.md §8
/// scenario 6); `recursive` removes the full subtree instead.
#[must_use]
pub fn perform_delete(path: &Path, is_dir: bool, recursive: bool, quiet: bool) -> DeleteStatus {
    let outcome =
        if recursive { syscall::remove_recursive(path, is_dir) } else { syscall::remove_single(path, is_dir) };

    match outcome {
        Ok(()) => {
            // spec.md §9 leaves the success-diagnostic stream as an open
            // question; this follows the same stderr channel as every
            // other diagnostic so `stdout` stays exclusively the record stream.
            if !quiet {
                eprintln!("parawalk: deleted {}", path.display());
            }
            DeleteStatus::Success
        }
        Err(source) => {
            if !quiet {
                eprintln!("parawalk: delete failed: {}: {source}", path.display());
            }
            DeleteStatus::Failed
        }
    }
}
