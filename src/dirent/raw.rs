//! Decoding of raw `dirent64` records returned by `getdents64`.

use crate::error::EngineError;
use crate::filetype::FileType;
use std::ffi::CStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// One decoded directory entry: borrowed name, inode, and type tag.
///
/// Borrows from the decode buffer that produced it; callers must copy
/// whatever they need to keep before the buffer is reused.
pub struct RawEntry<'buf> {
    pub name: &'buf [u8],
    pub inode: u64,
    pub file_type: FileType,
}

/// Iterates the fixed-layout `dirent64` records in `buf[..len]`.
///
/// `.` and `..` are skipped transparently. Never reads past `len` bytes;
/// never interprets a name longer than the record's declared length.
pub struct EntryDecoder<'buf> {
    buf: &'buf [u8],
    offset: usize,
    len: usize,
    path: &'buf Path,
}

impl<'buf> EntryDecoder<'buf> {
    #[must_use]
    pub const fn new(buf: &'buf [u8], len: usize, path: &'buf Path) -> Self {
        Self { buf, offset: 0, len, path }
    }
}

impl<'buf> Iterator for EntryDecoder<'buf> {
    type Item = Result<RawEntry<'buf>, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.offset >= self.len {
                return None;
            }

            let record = &self.buf[self.offset..self.len];
            // d_ino(8) + d_off(8) + d_reclen(2) + d_type(1) = 19 bytes header on linux.
            const HEADER_LEN: usize = 19;
            if record.len() < HEADER_LEN {
                // A malformed record means the rest of the buffer can't be
                // trusted either: stop yielding so the caller can't spin on
                // the same offset forever (spec.md §4.2's "directory is
                // skipped" means skipped, not retried at the same byte).
                self.offset = self.len;
                return Some(Err(EngineError::DecodeError {
                    path: self.path.to_path_buf(),
                    reason: "truncated dirent64 header",
                }));
            }

            let d_ino = u64::from_ne_bytes(record[0..8].try_into().unwrap());
            let d_reclen = u16::from_ne_bytes(record[16..18].try_into().unwrap()) as usize;
            let d_type = record[18];

            if d_reclen == 0 || d_reclen > record.len() {
                self.offset = self.len;
                return Some(Err(EngineError::DecodeError {
                    path: self.path.to_path_buf(),
                    reason: "dirent64 record length exceeds remaining buffer",
                }));
            }

            let name_bytes = &record[HEADER_LEN..d_reclen];
            let name = match CStr::from_bytes_until_nul(name_bytes) {
                Ok(cstr) => cstr.to_bytes(),
                Err(_) => {
                    self.offset = self.len;
                    return Some(Err(EngineError::DecodeError {
                        path: self.path.to_path_buf(),
                        reason: "dirent64 name is not NUL-terminated within its record",
                    }));
                }
            };

            self.offset += d_reclen;

            if name == b"." || name == b".." {
                continue;
            }

            // Some filesystems (FUSE mounts, some network filesystems —
            // exactly the high-latency case this engine targets) never
            // populate d_type, leaving every entry DT_UNKNOWN; fall back to
            // an lstat-derived classification rather than emitting every
            // entry as Unknown and failing every `-t` selector but `all`.
            let file_type = match FileType::from_dtype(d_type) {
                FileType::Unknown => {
                    crate::dirent::syscall::lstat_file_type(&join_path(self.path, name))
                }
                known => known,
            };

            return Some(Ok(RawEntry { name, inode: d_ino, file_type }));
        }
    }
}

/// Joins a directory path and an entry name, as `OsStr` bytes.
#[must_use]
pub fn join_path(dir: &Path, name: &[u8]) -> std::path::PathBuf {
    let name_os = std::ffi::OsStr::from_bytes(name);
    dir.join(name_os)
}
