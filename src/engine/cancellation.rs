//! Cooperative cancellation and `SIGINT` handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A single flag observed at the top of each worker iteration and each
/// entry-loop iteration. Once set, workers stop enqueuing further
/// directories and return promptly; the dispatcher drains pending work
/// into no-ops; the aggregator still flushes already-collected results.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

static SIGINT_TOKEN: std::sync::OnceLock<CancellationToken> = std::sync::OnceLock::new();

extern "C" fn handle_sigint(_signum: libc::c_int) {
    if let Some(token) = SIGINT_TOKEN.get() {
        token.cancel();
    }
}

/// Installs a `SIGINT` handler that sets `token` and, after a 100 ms
/// grace window to let in-flight work flush, force-exits with code 130.
pub fn install_sigint_handler(token: CancellationToken) {
    let _ = SIGINT_TOKEN.set(token.clone());
    // SAFETY: handle_sigint is a valid extern "C" fn with the signal handler
    // signature; installing it is the documented use of libc::signal.
    unsafe {
        libc::signal(libc::SIGINT, handle_sigint as usize as libc::sighandler_t);
    }

    std::thread::spawn(move || loop {
        std::thread::sleep(Duration::from_millis(20));
        if token.is_cancelled() {
            std::thread::sleep(Duration::from_millis(100));
            std::process::exit(130);
        }
    });
}
