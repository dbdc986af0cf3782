//! Deadline-bounded syscall wrappers.
//!
//! Each wrapper spawns a helper thread, races it against a timer, and
//! returns a timeout sentinel if the timer wins. The helper is never
//! cancelled or joined on timeout: on a network filesystem a stuck
//! `open`/`getdents64` call may block the underlying OS thread forever,
//! and leaking that one thread is preferable to hanging the traversal.
//! Callers bound the rate of helper creation by routing every call
//! through the worker pool's own concurrency limit.

use crate::error::{DeadlineOp, EngineError};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Races `f` against `timeout`, returning `f`'s result or a timeout error.
///
/// `f` must be `'static` and its result `Send`, since it runs on a
/// detached helper thread that may outlive this call.
fn race<T, F>(op: DeadlineOp, path: &Path, timeout: Duration, f: F) -> Result<T, EngineError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = bounded(1);
    std::thread::spawn(move || {
        let result = f();
        // A full/disconnected channel means the deadline already fired
        // and nobody is listening; that's fine, the send is a no-op.
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(value) => Ok(value),
        Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
            Err(EngineError::Timeout { op, path: path.to_path_buf() })
        }
    }
}

/// Opens a directory with a deadline.
///
/// # Errors
/// Returns [`EngineError::Timeout`] if the open doesn't complete within
/// `timeout`, or [`EngineError::OpenFailure`] if it fails outright.
pub fn open_with_deadline(
    path: &Path,
    timeout: Duration,
) -> Result<crate::dirent::syscall::DirHandle, EngineError> {
    let owned: PathBuf = path.to_path_buf();
    let owned_for_err = owned.clone();
    let result = race(DeadlineOp::Open, path, timeout, move || {
        crate::dirent::syscall::open_dir(&owned)
    })?;
    result.map_err(|source| EngineError::OpenFailure { path: owned_for_err, source })
}

/// Reads one chunk of directory entries with a deadline.
///
/// # Safety
/// `buf` must point to at least `buf_len` writable bytes, valid for the
/// duration of this call (and, in the timeout case, indefinitely after,
/// since the helper thread may still be writing to it when it returns).
///
/// # Errors
/// Returns [`EngineError::Timeout`] if the read doesn't complete within
/// `timeout`, or [`EngineError::ReadFailure`] if it fails outright.
pub unsafe fn read_entries_with_deadline(
    path: &Path,
    handle: &crate::dirent::syscall::DirHandle,
    buf: *mut u8,
    buf_len: usize,
    timeout: Duration,
) -> Result<usize, EngineError> {
    let fd = handle.raw();
    let owned_for_err = path.to_path_buf();
    // The raw pointer is carried across the thread boundary as a usize:
    // `*mut u8` isn't `Send`, but the caller's safety contract already
    // guarantees the memory stays valid for the call (and, on timeout,
    // for as long as the leaked helper keeps running).
    let buf_addr = buf as usize;
    let result = race(DeadlineOp::ReadDir, path, timeout, move || {
        let ptr = buf_addr as *mut u8;
        // SAFETY: see function-level safety comment; buf_addr recovers the
        // same pointer passed in, reconstructed only to satisfy Send.
        unsafe { crate::dirent::syscall::read_entries_raw(fd, ptr, buf_len) }
    })?;
    result.map_err(|source| EngineError::ReadFailure { path: owned_for_err, source })
}
