//! End-to-end traversal scenarios (spec.md §8) against the built binary.
//!
//! Each test spawns the real `parawalk` binary via
//! `env!("CARGO_BIN_EXE_parawalk")` (Cargo's own mechanism for locating
//! a sibling `[[bin]]` artifact from an integration test) with stdout
//! piped, so output capture never touches the test harness's own file
//! descriptors and stays safe under parallel test execution.

use std::fs;
use std::process::{Command, Stdio};

fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_parawalk"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

fn sorted_lines(out: &str) -> Vec<&str> {
    let mut lines: Vec<_> = out.lines().collect();
    lines.sort_unstable();
    lines
}

#[test]
fn scenario_type_file_over_a_small_tree() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("d");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a"), b"").unwrap();
    fs::write(root.join("b"), b"").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/c"), b"").unwrap();

    let (code, out, _err) = run(&[root.to_str().unwrap(), "-t", "file"]);
    assert_eq!(code, 0);

    assert_eq!(
        sorted_lines(&out),
        vec![
            root.join("a").to_str().unwrap(),
            root.join("b").to_str().unwrap(),
            root.join("sub/c").to_str().unwrap(),
        ]
    );
}

#[test]
fn scenario_type_dir_emits_trailing_separators() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("d");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a"), b"").unwrap();
    fs::create_dir(root.join("sub")).unwrap();

    let (code, out, _err) = run(&[root.to_str().unwrap(), "-t", "dir"]);
    assert_eq!(code, 0);
    assert_eq!(sorted_lines(&out), vec![format!("{}/", root.join("sub").to_str().unwrap())]);
}

#[test]
fn include_filter_does_not_suppress_recursion_into_non_matching_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("d");
    fs::create_dir_all(root.join("sub/deep")).unwrap();
    fs::write(root.join("a"), b"").unwrap();
    fs::write(root.join("sub/deep/a"), b"").unwrap();
    fs::write(root.join("sub/deep/b"), b"").unwrap();

    let (code, out, _err) = run(&[root.to_str().unwrap(), "-t", "file", "-f", "**/a"]);
    assert_eq!(code, 0);
    assert_eq!(
        sorted_lines(&out),
        vec![root.join("a").to_str().unwrap(), root.join("sub/deep/a").to_str().unwrap()]
    );
}

#[test]
fn exclude_filter_takes_precedence_over_include() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("d");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("keep.log"), b"").unwrap();
    fs::write(root.join("secret.log"), b"").unwrap();

    let (code, out, _err) = run(&[root.to_str().unwrap(), "-t", "file", "-f", "*.log", "-x", "secret.log"]);
    assert_eq!(code, 0);
    assert_eq!(sorted_lines(&out), vec![root.join("keep.log").to_str().unwrap()]);
}

#[test]
fn delete_on_non_empty_directory_fails_and_leaves_it_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("d");
    fs::create_dir(&root).unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/x"), b"").unwrap();

    let (code, out, _err) = run(&[root.to_str().unwrap(), "-t", "dir", "--delete"]);
    assert_eq!(code, 0);
    assert!(out.contains("[delete_failed]"), "expected a delete_failed marker, got: {out:?}");
    assert!(root.join("sub").is_dir(), "non-empty directory must survive a failed delete");
}

#[test]
fn quiet_suppresses_the_delete_failed_diagnostic_but_not_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("d");
    fs::create_dir(&root).unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/x"), b"").unwrap();

    let (code, out, err) = run(&[root.to_str().unwrap(), "-t", "dir", "--delete", "-q"]);
    assert_eq!(code, 0);
    assert!(out.contains("[delete_failed]"), "the record marker is not a diagnostic, quiet must not touch it");
    assert!(err.is_empty(), "expected no stderr diagnostics under -q, got: {err:?}");
}

#[test]
fn delete_all_removes_a_non_empty_directory_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("d");
    fs::create_dir(&root).unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/x"), b"").unwrap();

    let (code, out, _err) = run(&[root.to_str().unwrap(), "-t", "dir", "--delete-all"]);
    assert_eq!(code, 0);
    assert!(out.contains("[delete_success]"), "expected a delete_success marker, got: {out:?}");
    assert!(!root.join("sub").exists(), "directory should have been removed");
}

#[test]
fn multiple_roots_are_all_traversed() {
    let dir1 = tempfile::tempdir().unwrap();
    let dir2 = tempfile::tempdir().unwrap();
    fs::write(dir1.path().join("one"), b"").unwrap();
    fs::write(dir2.path().join("two"), b"").unwrap();

    let (code, out, _err) =
        run(&[dir1.path().to_str().unwrap(), dir2.path().to_str().unwrap(), "-t", "file"]);
    assert_eq!(code, 0);

    let mut expected = vec![
        dir1.path().join("one").to_str().unwrap().to_owned(),
        dir2.path().join("two").to_str().unwrap().to_owned(),
    ];
    expected.sort_unstable();
    assert_eq!(sorted_lines(&out), expected);
}

#[test]
fn with_size_reports_the_actual_file_size_not_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("d");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a"), b"hello world").unwrap();

    let (code, out, _err) = run(&[root.to_str().unwrap(), "-t", "file", "--with-size"]);
    assert_eq!(code, 0);
    let line = out.lines().next().unwrap();
    assert_eq!(line, format!("{} 11", root.join("a").to_str().unwrap()));
}

#[test]
fn a_nonexistent_root_is_rejected_before_traversal_starts() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let (code, out, err) = run(&[missing.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(out.is_empty());
    assert!(err.contains("not a directory"), "expected a not-a-directory diagnostic, got: {err:?}");
}
