//! Integration tests for glob/type/time filtering as a combined `Filters`.

use filetime::{set_file_mtime, FileTime};
use parawalk::filter::{Filters, GlobFilter, TimeWindow};
use parawalk::filetype::{FileType, TypeSet};
use std::time::{Duration, SystemTime};

#[test]
fn glob_include_and_exclude_combine_as_expected() {
    let glob = GlobFilter::new(&["*.rs".to_owned()], &["mod.rs".to_owned()]).unwrap();
    let filters = Filters::new(glob, TypeSet::from_flags(&["all".to_owned()]), TimeWindow::default(), false);

    assert!(filters.admits_path(b"main.rs"));
    assert!(!filters.admits_path(b"mod.rs"));
    assert!(!filters.admits_path(b"main.txt"));
}

#[test]
fn type_set_all_admits_everything_regardless_of_other_flags() {
    let types = TypeSet::from_flags(&["all".to_owned(), "file".to_owned()]);
    assert!(types.admits(FileType::Directory));
    assert!(types.admits(FileType::Symlink));
    assert!(types.admits(FileType::Socket));
}

#[test]
fn type_set_empty_flags_defaults_to_all() {
    let types = TypeSet::from_flags(&[]);
    assert!(types.admits(FileType::Directory));
    assert!(types.admits(FileType::RegularFile));
}

#[test]
fn needs_stat_is_set_by_time_window_or_with_times_flag() {
    let glob = GlobFilter::new(&[], &[]).unwrap();
    let no_stat = Filters::new(GlobFilter::default(), TypeSet::default(), TimeWindow::default(), false);
    assert!(!no_stat.needs_stat);

    let window = TimeWindow { mtime_older: Some(Duration::from_secs(60)), ..Default::default() };
    let stat_for_window = Filters::new(glob, TypeSet::default(), window, false);
    assert!(stat_for_window.needs_stat);
}

#[test]
fn mtime_older_predicate_rejects_a_freshly_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh");
    std::fs::write(&path, b"x").unwrap();

    let window = TimeWindow { mtime_older: Some(Duration::from_secs(72 * 3600)), ..Default::default() };
    let stat = parawalk::dirent::lstat(&path).unwrap();
    assert!(!window.matches(stat, SystemTime::now()));
}

#[test]
fn mtime_newer_predicate_admits_a_freshly_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh");
    std::fs::write(&path, b"x").unwrap();

    let window = TimeWindow { mtime_newer: Some(Duration::from_secs(60)), ..Default::default() };
    let stat = parawalk::dirent::lstat(&path).unwrap();
    assert!(window.matches(stat, SystemTime::now()));
}

#[test]
fn mtime_older_predicate_admits_a_file_explicitly_aged_past_the_cutoff() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old");
    std::fs::write(&path, b"x").unwrap();

    let now = SystemTime::now();
    let aged = now - Duration::from_secs(10 * 24 * 3600);
    set_file_mtime(&path, FileTime::from_system_time(aged)).unwrap();

    let window = TimeWindow { mtime_older: Some(Duration::from_secs(72 * 3600)), ..Default::default() };
    let stat = parawalk::dirent::lstat(&path).unwrap();
    assert!(window.matches(stat, now));
}
