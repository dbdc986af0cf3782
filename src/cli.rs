//! The command-line surface (spec.md §6), an external collaborator that
//! translates parsed arguments into a [`TraversalConfig`] and a
//! [`Filters`] set before handing off to the engine.

use crate::config::{TraversalConfig, DEFAULT_JOBS, DEFAULT_RESULT_JOBS, DEFAULT_TIMEOUT};
use crate::error::ConfigError;
use crate::filetype::TypeSet;
use crate::filter::{Filters, GlobFilter, TimeWindow};
use crate::result::RecordFields;
use crate::time::DurationParser;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "parawalk",
    version,
    about = "A highly parallel directory-traversal engine for very large trees on high-latency filesystems"
)]
pub struct Args {
    /// Seed directories to traverse (default: current directory).
    #[arg(default_value = ".")]
    pub dirs: Vec<PathBuf>,

    /// Non-resilient mode: the first error is fatal.
    #[arg(long = "stop-on-error")]
    pub stop_on_error: bool,

    /// Deprecated no-op, retained for compatibility (spec.md §9).
    #[arg(long = "resilient", hide = true)]
    pub resilient_noop: bool,

    /// Append the decimal inode number to each record.
    #[arg(long = "inodes")]
    pub inodes: bool,

    /// Append the hexadecimal inode number to each record.
    #[arg(long = "inodes-hex")]
    pub inodes_hex: bool,

    /// Escape each path as a quoted string literal.
    #[arg(long = "raw")]
    pub raw: bool,

    /// Traversal worker concurrency.
    #[arg(short = 'j', long = "jobs", default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Result writer concurrency.
    #[arg(long = "result-jobs", default_value_t = DEFAULT_RESULT_JOBS)]
    pub result_jobs: usize,

    /// Append each entry's `lstat` size.
    #[arg(long = "with-size")]
    pub with_size: bool,

    /// Append unix atime, mtime, and ctime.
    #[arg(long = "with-times")]
    pub with_times: bool,

    #[arg(long = "atime-older", value_parser = DurationParser)]
    pub atime_older: Option<Duration>,
    #[arg(long = "atime-newer", value_parser = DurationParser)]
    pub atime_newer: Option<Duration>,
    #[arg(long = "mtime-older", value_parser = DurationParser)]
    pub mtime_older: Option<Duration>,
    #[arg(long = "mtime-newer", value_parser = DurationParser)]
    pub mtime_newer: Option<Duration>,
    #[arg(long = "ctime-older", value_parser = DurationParser)]
    pub ctime_older: Option<Duration>,
    #[arg(long = "ctime-newer", value_parser = DurationParser)]
    pub ctime_newer: Option<Duration>,

    /// Remove each matched entry (fails on non-empty directories).
    #[arg(long = "delete", conflicts_with = "delete_all")]
    pub delete: bool,

    /// Remove each matched entry and, if it's a directory, its contents.
    #[arg(long = "delete-all")]
    pub delete_all: bool,

    /// Exclude glob (repeatable); any match rejects a path.
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Include glob (repeatable); a configured set requires at least one match.
    #[arg(short = 'f', long = "filter")]
    pub filter: Vec<String>,

    /// Type filter (repeatable): file, dir, link, socket, all.
    #[arg(short = 't', long = "type")]
    pub r#type: Vec<String>,

    /// Per-syscall deadline.
    #[arg(long = "timeout", value_parser = DurationParser, default_value = "5m")]
    pub timeout: Duration,

    /// Emit a shell-completion script instead of running.
    #[arg(long = "generate-completions", value_enum)]
    pub generate_completions: Option<clap_complete::aot::Shell>,

    /// Suppress non-fatal diagnostics on stderr.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Echo extra per-directory diagnostics to stderr.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Resolves parsed arguments into a [`TraversalConfig`] and a
    /// [`Filters`] set, expanding `~` in seed paths and compiling globs.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidGlob`] if any `-f`/`-x` pattern fails
    /// to compile.
    pub fn resolve(self) -> Result<(TraversalConfig, Filters), ConfigError> {
        let roots = self.dirs.iter().map(|dir| expand_home(dir)).collect();

        let glob = GlobFilter::new(&self.filter, &self.exclude)?;
        let types = TypeSet::from_flags(&self.r#type);
        let time_window = TimeWindow {
            atime_older: self.atime_older,
            atime_newer: self.atime_newer,
            mtime_older: self.mtime_older,
            mtime_newer: self.mtime_newer,
            ctime_older: self.ctime_older,
            ctime_newer: self.ctime_newer,
        };
        let filters = Filters::new(glob, types, time_window, self.with_times || self.with_size);

        let fields = RecordFields {
            inodes: self.inodes,
            inodes_hex: self.inodes_hex,
            raw: self.raw,
            with_size: self.with_size,
            with_times: self.with_times,
        };

        let config = TraversalConfig {
            roots,
            jobs: self.jobs,
            result_jobs: self.result_jobs,
            timeout: if self.timeout == Duration::ZERO { DEFAULT_TIMEOUT } else { self.timeout },
            resilient: !self.stop_on_error,
            quiet: self.quiet,
            verbose: self.verbose,
            delete: self.delete,
            delete_all: self.delete_all,
            fields,
        };

        Ok((config, filters))
    }
}

/// Expands a leading `~` to `$HOME`, following the teacher's own
/// plain-`env`-var idiom rather than pulling in a `dirs`/`home` crate.
fn expand_home(path: &std::path::Path) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(stripped),
        Err(_) => path.to_path_buf(),
    }
}
