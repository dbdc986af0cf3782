//! Hand-rolled error types for the traversal engine.
//!
//! Follows the crate's own idiom of plain enums with manual `Display`
//! impls rather than pulling in an error-derive crate.

use std::fmt;
use std::path::PathBuf;

/// An operation that can time out under a deadline-bounded syscall wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineOp {
    Open,
    ReadDir,
}

impl fmt::Display for DeadlineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::ReadDir => write!(f, "readdir"),
        }
    }
}

/// Errors raised while traversing a single directory or entry.
///
/// Resilient mode logs these and skips the offending unit; non-resilient
/// mode treats `OpenFailure`, `ReadFailure`, and `DecodeError` as fatal.
/// `StatFailure` and `DeleteFailure` are always non-fatal per-entry.
#[derive(Debug)]
pub enum EngineError {
    OpenFailure { path: PathBuf, source: std::io::Error },
    ReadFailure { path: PathBuf, source: std::io::Error },
    Timeout { op: DeadlineOp, path: PathBuf },
    StatFailure { path: PathBuf, source: std::io::Error },
    DecodeError { path: PathBuf, reason: &'static str },
    DeleteFailure { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailure { path, source } => {
                write!(f, "open failed: {}: {source}", path.display())
            }
            Self::ReadFailure { path, source } => {
                write!(f, "readdir failed: {}: {source}", path.display())
            }
            Self::Timeout { op, path } => {
                write!(f, "{op}: timed out: {}", path.display())
            }
            Self::StatFailure { path, source } => {
                write!(f, "stat failed: {}: {source}", path.display())
            }
            Self::DecodeError { path, reason } => {
                write!(f, "malformed directory entry in {}: {reason}", path.display())
            }
            Self::DeleteFailure { path, source } => {
                write!(f, "delete failed: {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Whether this error kind is always non-fatal, regardless of resilient mode.
    #[must_use]
    pub const fn always_non_fatal(&self) -> bool {
        matches!(self, Self::StatFailure { .. } | Self::DeleteFailure { .. })
    }
}

/// Errors raised while validating and building a [`crate::config::TraversalConfig`].
#[derive(Debug)]
pub enum ConfigError {
    NotADirectory(PathBuf),
    InvalidGlob { pattern: String, reason: crate::glob::Error },
    InvalidDuration(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory(path) => write!(f, "{} is not a directory", path.display()),
            Self::InvalidGlob { pattern, reason } => {
                write!(f, "invalid glob pattern {pattern:?}: {reason}")
            }
            Self::InvalidDuration(s) => write!(f, "invalid duration: {s:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
