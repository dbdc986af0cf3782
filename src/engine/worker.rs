//! The traversal dispatcher and per-directory worker logic (spec.md §4.5).

use crate::config::TraversalConfig;
use crate::dirent::{
    join_path, new_decode_buffer, open_with_deadline, read_entries_with_deadline, BUFFER_SIZE, EntryDecoder,
};
use crate::engine::cancellation::CancellationToken;
use crate::engine::inflight::InFlight;
use crate::engine::queue::WorkQueue;
use crate::error::EngineError;
use crate::filter::Filters;
use crate::result::{perform_delete, BatchList, DeleteStatus, ResultBatch, ResultRecord};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Poll interval for the dispatcher's channel receive: short enough that
/// cancellation and quiescence are noticed promptly, long enough to stay
/// off the CPU between directories (spec.md §5 suspension points).
const DISPATCH_POLL: Duration = Duration::from_millis(10);

/// Runs the dispatcher loop on the calling thread until traversal goes
/// quiescent or is cancelled, then marks `inflight` complete.
///
/// Spawns one worker thread per dequeued directory, bounded by a
/// token-channel semaphore of capacity `config.jobs` (spec.md §4.5).
pub fn run_dispatcher(
    queue: &Arc<WorkQueue>,
    inflight: &Arc<InFlight>,
    cancel: &CancellationToken,
    filters: &Arc<Filters>,
    config: &Arc<TraversalConfig>,
    batches: &Arc<BatchList>,
) {
    let (token_tx, token_rx) = bounded::<()>(config.jobs.max(1));
    for _ in 0..config.jobs.max(1) {
        token_tx.send(()).unwrap();
    }

    let receiver = queue.receiver();

    loop {
        if cancel.is_cancelled() {
            // Drain whatever is already queued into no-ops: the counter
            // still needs to reach zero for the pipeline to terminate.
            while let Ok(_path) = receiver.try_recv() {
                inflight.decrement();
            }
            break;
        }

        match receiver.recv_timeout(DISPATCH_POLL) {
            Ok(path) => {
                token_rx.recv().unwrap();
                let queue = Arc::clone(queue);
                let inflight = Arc::clone(inflight);
                let cancel = cancel.clone();
                let filters = Arc::clone(filters);
                let config = Arc::clone(config);
                let batches = Arc::clone(batches);
                let release = token_tx.clone();

                std::thread::spawn(move || {
                    if let Err(err) = process_directory(&path, &queue, &filters, &config, &cancel, &batches) {
                        report_error(&config, &err);
                    }
                    inflight.decrement();
                    let _ = release.send(());
                });
            }
            Err(RecvTimeoutError::Timeout) => {
                if inflight.current() == 0 {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Every decrement above happens at the very end of a worker's
    // processing, so observing zero here means no directory job is
    // queued, spilled, or executing (spec.md §3 work-queue invariant).
    inflight.wait_for_zero();
    inflight.mark_complete();
    batches.notify();
}

fn report_error(config: &TraversalConfig, err: &EngineError) {
    let fatal = !config.resilient && !err.always_non_fatal();
    // A fatal error is about to end the process, so it's always printed;
    // `-q/--quiet` only suppresses the non-fatal diagnostics that resilient
    // mode would otherwise log and continue past.
    if fatal || !config.quiet {
        eprintln!("parawalk: {err}");
    }
    if fatal {
        std::process::exit(1);
    }
}

/// Processes one directory: opens it, decodes entries in a deadline loop,
/// enqueues subdirectories, filters and emits matching results.
fn process_directory(
    dir: &Path,
    queue: &WorkQueue,
    filters: &Filters,
    config: &TraversalConfig,
    cancel: &CancellationToken,
    batches: &BatchList,
) -> Result<(), EngineError> {
    if cancel.is_cancelled() {
        return Ok(());
    }

    let handle = open_with_deadline(dir, config.timeout)?;
    let mut buffer = new_decode_buffer();
    let mut batch = ResultBatch::new();

    'directory: loop {
        if cancel.is_cancelled() {
            break;
        }

        // SAFETY: buffer owns BUFFER_SIZE writable bytes for the duration
        // of this call. On timeout the leaked helper may still be writing
        // to it once this function returns, so the buffer itself is leaked
        // below rather than let it get freed out from under that thread.
        let n = match unsafe {
            read_entries_with_deadline(dir, &handle, buffer.as_mut_ptr(), BUFFER_SIZE, config.timeout)
        } {
            Ok(n) => n,
            Err(err) => {
                if matches!(err, EngineError::Timeout { .. }) {
                    let _ = Box::leak(buffer);
                }
                return Err(err);
            }
        };
        if n == 0 {
            break;
        }

        for decoded in EntryDecoder::new(buffer.as_slice(n), n, dir) {
            if cancel.is_cancelled() {
                break 'directory;
            }

            let entry = match decoded {
                Ok(entry) => entry,
                Err(err) => {
                    if config.resilient {
                        if !config.quiet {
                            eprintln!("parawalk: {err}");
                        }
                        // A malformed record means the rest of this
                        // directory can't be trusted: skip the directory
                        // entirely rather than keep reading further chunks
                        // from it (spec.md §4.2/§7).
                        break 'directory;
                    }
                    return Err(err);
                }
            };

            let full_path = join_path(dir, entry.name);
            let is_dir = entry.file_type.is_traversible();

            // Enqueue before the emit-filter: recursion must not be
            // suppressed by an include pattern (spec.md §4.3/§4.5).
            if is_dir {
                queue.enqueue(full_path.clone());
            }

            if !filters.admits_path(full_path.as_os_str().as_bytes()) {
                continue;
            }

            if !filters.types.admits(entry.file_type) {
                if config.verbose && !config.quiet {
                    eprintln!("parawalk: skip (type {}): {}", entry.file_type, full_path.display());
                }
                continue;
            }

            let now = SystemTime::now();
            let stat = if filters.needs_stat {
                match crate::dirent::lstat(&full_path) {
                    Ok(stat) => Some(stat),
                    Err(source) => {
                        let err = EngineError::StatFailure { path: full_path.clone(), source };
                        if !config.quiet {
                            eprintln!("parawalk: {err}");
                        }
                        continue;
                    }
                }
            } else {
                None
            };

            if filters.time_window.is_active() {
                match stat {
                    Some(stat) if filters.time_window.matches(stat, now) => {}
                    _ => continue,
                }
            }

            let mut record = ResultRecord {
                path: full_path.clone(),
                is_dir,
                inode: entry.inode,
                size: stat.map(|stat| stat.size),
                atime: stat.map(|stat| stat.atime),
                mtime: stat.map(|stat| stat.mtime),
                ctime: stat.map(|stat| stat.ctime),
                delete_status: None,
            };

            if config.delete || config.delete_all {
                record.delete_status =
                    Some(perform_delete(&full_path, is_dir, config.delete_all, config.quiet));
            }

            batch.push(record);
            if batch.is_full() {
                batches.push(std::mem::replace(&mut batch, ResultBatch::new()));
            }
        }
    }

    if !batch.is_empty() {
        batches.push(batch);
    }

    Ok(())
}
