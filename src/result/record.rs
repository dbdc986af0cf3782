//! A single formatted output line, and the batches workers submit them in.

use std::path::PathBuf;

/// Result records accumulate into batches of this many before a worker
/// submits the batch and starts a fresh one (spec.md §3).
pub const BATCH_CAPACITY: usize = 1024;

/// An ordered run of result records, single-writer until submitted to
/// the result pipeline and single-reader afterward.
#[derive(Debug, Default)]
pub struct ResultBatch(Vec<ResultRecord>);

impl ResultBatch {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::with_capacity(BATCH_CAPACITY))
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.0.push(record);
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.len() >= BATCH_CAPACITY
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.0.iter()
    }
}

/// Which fields a record carries, mirroring the CLI flags that enabled
/// them (spec §6/§4.6): only the enabled fields are rendered, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFields {
    pub inodes: bool,
    pub inodes_hex: bool,
    pub raw: bool,
    pub with_size: bool,
    pub with_times: bool,
}

/// The outcome of a `--delete`/`--delete-all` side effect on one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    Success,
    Failed,
}

/// One traversal result: a path plus whatever metadata the CLI requested.
#[derive(Debug)]
pub struct ResultRecord {
    pub path: PathBuf,
    pub is_dir: bool,
    pub inode: u64,
    pub size: Option<i64>,
    pub atime: Option<i64>,
    pub mtime: Option<i64>,
    pub ctime: Option<i64>,
    pub delete_status: Option<DeleteStatus>,
}

impl ResultRecord {
    /// Renders this record as one output line (without the trailing `\n`).
    pub fn format_into(&self, fields: RecordFields, out: &mut Vec<u8>) {
        if fields.raw {
            write_escaped_path(&self.path, self.is_dir, out);
        } else {
            write_plain_path(&self.path, self.is_dir, out);
        }

        if fields.inodes {
            out.extend_from_slice(format!(" {}", self.inode).as_bytes());
        }
        if fields.inodes_hex {
            out.extend_from_slice(format!(" 0x{:x}", self.inode).as_bytes());
        }
        if fields.with_size {
            out.extend_from_slice(format!(" {}", self.size.unwrap_or_default()).as_bytes());
        }
        if fields.with_times {
            out.extend_from_slice(
                format!(
                    " {} {} {}",
                    self.atime.unwrap_or_default(),
                    self.mtime.unwrap_or_default(),
                    self.ctime.unwrap_or_default()
                )
                .as_bytes(),
            );
        }
        if let Some(status) = self.delete_status {
            match status {
                DeleteStatus::Success => out.extend_from_slice(b" [delete_success]"),
                DeleteStatus::Failed => out.extend_from_slice(b" [delete_failed]"),
            }
        }
    }
}

fn write_plain_path(path: &std::path::Path, is_dir: bool, out: &mut Vec<u8>) {
    use std::os::unix::ffi::OsStrExt;
    out.extend_from_slice(path.as_os_str().as_bytes());
    if is_dir && !path.as_os_str().as_bytes().ends_with(b"/") {
        out.push(b'/');
    }
}

fn write_escaped_path(path: &std::path::Path, is_dir: bool, out: &mut Vec<u8>) {
    use std::os::unix::ffi::OsStrExt;
    let mut bytes = path.as_os_str().as_bytes().to_vec();
    if is_dir && !bytes.ends_with(b"/") {
        bytes.push(b'/');
    }
    out.push(b'"');
    for &b in &bytes {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(b),
        }
    }
    out.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_gets_trailing_separator() {
        let record = ResultRecord {
            path: PathBuf::from("d/sub"),
            is_dir: true,
            inode: 0,
            size: None,
            atime: None,
            mtime: None,
            ctime: None,
            delete_status: None,
        };
        let mut out = Vec::new();
        record.format_into(RecordFields::default(), &mut out);
        assert_eq!(out, b"d/sub/");
    }

    #[test]
    fn file_has_no_trailing_separator() {
        let record = ResultRecord {
            path: PathBuf::from("d/a"),
            is_dir: false,
            inode: 0,
            size: None,
            atime: None,
            mtime: None,
            ctime: None,
            delete_status: None,
        };
        let mut out = Vec::new();
        record.format_into(RecordFields::default(), &mut out);
        assert_eq!(out, b"d/a");
    }

    #[test]
    fn fields_appear_in_order() {
        let record = ResultRecord {
            path: PathBuf::from("d/a"),
            is_dir: false,
            inode: 42,
            size: Some(10),
            atime: Some(1),
            mtime: Some(2),
            ctime: Some(3),
            delete_status: Some(DeleteStatus::Failed),
        };
        let fields = RecordFields { inodes: true, inodes_hex: true, raw: false, with_size: true, with_times: true };
        let mut out = Vec::new();
        record.format_into(fields, &mut out);
        assert_eq!(out, b"d/a 42 0x2a 10 1 2 3 [delete_failed]");
    }
}
