//! Integration tests for raw `dirent64` decoding against real directories.

use parawalk::dirent::{join_path, new_decode_buffer, open_dir, read_entries_raw, EntryDecoder, BUFFER_SIZE};
use parawalk::filetype::FileType;
use std::collections::BTreeSet;
use std::fs;

fn read_all_names(dir: &std::path::Path) -> BTreeSet<Vec<u8>> {
    let handle = open_dir(dir).unwrap();
    let mut buffer = new_decode_buffer();
    let mut names = BTreeSet::new();

    loop {
        let n = unsafe { read_entries_raw(handle.raw(), buffer.as_mut_ptr(), BUFFER_SIZE) }.unwrap();
        if n == 0 {
            break;
        }
        for decoded in EntryDecoder::new(buffer.as_slice(n), n, dir) {
            let entry = decoded.unwrap();
            names.insert(entry.name.to_vec());
        }
    }

    names
}

#[test]
fn decodes_every_entry_and_skips_dot_entries() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a"), b"").unwrap();
    fs::write(dir.path().join("b"), b"").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();

    let names = read_all_names(dir.path());
    let expected: BTreeSet<Vec<u8>> = [b"a".to_vec(), b"b".to_vec(), b"sub".to_vec()].into_iter().collect();
    assert_eq!(names, expected);
}

#[test]
fn empty_directory_yields_no_entries() {
    let dir = tempfile::tempdir().unwrap();
    let names = read_all_names(dir.path());
    assert!(names.is_empty());
}

#[test]
fn join_path_builds_child_paths_from_raw_names() {
    let dir = std::path::Path::new("/var/log");
    let joined = join_path(dir, b"syslog");
    assert_eq!(joined, std::path::PathBuf::from("/var/log/syslog"));
}

const HEADER_LEN: usize = 19;

fn round_up_8(n: usize) -> usize {
    (n + 7) & !7
}

/// Packs one synthetic `dirent64` record with an explicit `d_type` byte,
/// matching the layout `EntryDecoder` expects.
fn push_record(buf: &mut Vec<u8>, ino: u64, d_type: u8, name: &str) {
    let reclen = round_up_8(HEADER_LEN + name.len() + 1);
    buf.extend_from_slice(&ino.to_ne_bytes());
    buf.extend_from_slice(&0u64.to_ne_bytes());
    buf.extend_from_slice(&(reclen as u16).to_ne_bytes());
    buf.push(d_type);
    buf.extend_from_slice(name.as_bytes());
    buf.push(0);
    buf.resize(buf.len() + (reclen - HEADER_LEN - name.len() - 1), 0);
}

/// A filesystem that leaves every `d_type` as `DT_UNKNOWN` (0) must still
/// be classified correctly, via an `lstat` fallback (spec.md §4.2's
/// entry-type tag still has to come from somewhere when the kernel won't
/// supply it — common on FUSE and some network filesystems).
#[test]
fn dt_unknown_falls_back_to_an_lstat_classification() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("plain-file"), b"").unwrap();
    fs::create_dir(dir.path().join("plain-dir")).unwrap();

    let mut buf = Vec::new();
    push_record(&mut buf, 1, 0, "plain-file");
    push_record(&mut buf, 2, 0, "plain-dir");
    let len = buf.len();

    let mut kinds = std::collections::BTreeMap::new();
    for decoded in EntryDecoder::new(&buf, len, dir.path()) {
        let entry = decoded.unwrap();
        kinds.insert(entry.name.to_vec(), entry.file_type);
    }

    assert_eq!(kinds[b"plain-file".as_slice()], FileType::RegularFile);
    assert_eq!(kinds[b"plain-dir".as_slice()], FileType::Directory);
}

#[test]
fn handles_a_directory_wider_than_one_getdents_chunk() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..4000 {
        fs::write(dir.path().join(format!("file-{i:05}")), b"").unwrap();
    }

    let names = read_all_names(dir.path());
    assert_eq!(names.len(), 4000);
    assert!(names.contains(&b"file-00000".to_vec()));
    assert!(names.contains(&b"file-03999".to_vec()));
}

/// A malformed record must end the iterator after one `Err`, never yield
/// the same error forever from an offset that never advances.
#[test]
fn a_truncated_header_yields_exactly_one_error_then_stops() {
    let dir = tempfile::tempdir().unwrap();
    let buf = vec![0u8; HEADER_LEN - 1];
    let len = buf.len();

    let mut decoder = EntryDecoder::new(&buf, len, dir.path());
    assert!(decoder.next().unwrap().is_err());
    assert!(decoder.next().is_none(), "decoder must not keep yielding the same error");
}

/// A `d_reclen` that claims more bytes than remain in the buffer must also
/// end the iterator after one `Err`.
#[test]
fn an_oversized_reclen_yields_exactly_one_error_then_stops() {
    let dir = tempfile::tempdir().unwrap();
    let mut buf = Vec::new();
    push_record(&mut buf, 1, libc::DT_REG, "x");
    // Corrupt the just-written d_reclen to claim far more than the buffer holds.
    buf[16..18].copy_from_slice(&0xffffu16.to_ne_bytes());
    let len = buf.len();

    let mut decoder = EntryDecoder::new(&buf, len, dir.path());
    assert!(decoder.next().unwrap().is_err());
    assert!(decoder.next().is_none(), "decoder must not keep yielding the same error");
}
