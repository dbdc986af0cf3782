//! `parawalk`: a highly parallel directory-traversal engine for very
//! large trees on high-latency filesystems.
//!
//! The crate is organized around the pipeline described in spec.md §2:
//! a bounded work queue feeds a traversal worker pool, which recursively
//! schedules subdirectories and emits matching entries into a result
//! pipeline that formats and writes them out.

#![allow(clippy::inline_always)]

pub mod cli;
pub mod config;
pub mod dirent;
pub mod engine;
pub mod error;
pub mod filetype;
pub mod filter;
pub mod glob;
pub mod result;
pub mod time;

pub use config::TraversalConfig;
pub use engine::Engine;
pub use error::{ConfigError, EngineError};
pub use filetype::FileType;
pub use filter::Filters;

#[cfg(all(feature = "mimalloc", any(target_os = "linux", target_os = "macos", target_os = "android")))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
