//! Time-window predicates over atime/mtime/ctime.

use crate::dirent::StatInfo;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// One of the six `--{a,m,c}time-{older,newer}` predicates. A zero
/// duration means the predicate is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindow {
    pub atime_older: Option<Duration>,
    pub atime_newer: Option<Duration>,
    pub mtime_older: Option<Duration>,
    pub mtime_newer: Option<Duration>,
    pub ctime_older: Option<Duration>,
    pub ctime_newer: Option<Duration>,
}

impl TimeWindow {
    /// Whether any predicate is enabled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.atime_older.is_some()
            || self.atime_newer.is_some()
            || self.mtime_older.is_some()
            || self.mtime_newer.is_some()
            || self.ctime_older.is_some()
            || self.ctime_newer.is_some()
    }

    /// Evaluates every enabled predicate against `stat`, relative to `now`.
    ///
    /// An entry passes iff every enabled predicate passes. `older` requires
    /// the timestamp at or before `now - duration`; `newer` requires at or
    /// after (the boundary itself passes either check).
    #[must_use]
    pub fn matches(&self, stat: StatInfo, now: SystemTime) -> bool {
        let checks = [
            (self.atime_older, self.atime_newer, stat.atime),
            (self.mtime_older, self.mtime_newer, stat.mtime),
            (self.ctime_older, self.ctime_newer, stat.ctime),
        ];

        checks.into_iter().all(|(older, newer, unix_secs)| {
            let file_time = unix_time(unix_secs);
            let older_ok = older.is_none_or(|duration| {
                now.checked_sub(duration).is_some_and(|cutoff| file_time <= cutoff)
            });
            let newer_ok = newer.is_none_or(|duration| {
                now.checked_sub(duration).is_some_and(|cutoff| file_time >= cutoff)
            });
            older_ok && newer_ok
        })
    }
}

fn unix_time(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs((-secs) as u64)
    }
}
