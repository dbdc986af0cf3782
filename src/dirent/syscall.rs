//! Thin wrappers around the raw `open`/`getdents64`/`stat` syscalls.
//!
//! Portable libc fallback only; no architecture-specific inline assembly.

use crate::filetype::FileType;
use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

/// An owned directory file descriptor, closed on drop.
pub struct DirHandle(RawFd);

impl DirHandle {
    #[must_use]
    pub const fn raw(&self) -> RawFd {
        self.0
    }
}

impl Drop for DirHandle {
    fn drop(&mut self) {
        // SAFETY: self.0 is a valid fd owned exclusively by this handle.
        unsafe {
            libc::close(self.0);
        }
    }
}

fn path_to_cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"))
}

/// Opens `path` as a directory, non-blocking as far as the kernel allows.
///
/// # Errors
/// Returns the underlying `io::Error` if `open` fails.
pub fn open_dir(path: &Path) -> io::Result<DirHandle> {
    let c_path = path_to_cstring(path)?;
    // SAFETY: c_path is a valid NUL-terminated C string for the lifetime of the call.
    let fd = unsafe { libc::open(c_path.as_ptr(), libc::O_RDONLY | libc::O_DIRECTORY) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(DirHandle(fd))
}

/// Reads one chunk of raw `dirent64` records into `buf`, returning the
/// number of bytes filled (`0` signals end-of-directory).
///
/// # Safety
/// `buf` must point to at least `buf_len` writable bytes.
///
/// # Errors
/// Returns the underlying `io::Error` if the syscall fails.
pub unsafe fn read_entries_raw(fd: RawFd, buf: *mut u8, buf_len: usize) -> io::Result<usize> {
    // SAFETY: caller guarantees buf/buf_len describe a writable region;
    // fd is a caller-supplied open directory descriptor.
    let n = unsafe { libc::syscall(libc::SYS_getdents64, fd, buf.cast::<libc::c_void>(), buf_len) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(n as usize)
}

/// Reads one chunk of raw `dirent64` records into `buf` via an owned handle.
///
/// # Errors
/// Returns the underlying `io::Error` if the syscall fails.
pub fn read_entries(handle: &DirHandle, buf: *mut u8, buf_len: usize) -> io::Result<usize> {
    // SAFETY: buf/buf_len describe a writable region owned by the caller;
    // handle.raw() is a valid open directory fd for the duration of the call.
    unsafe { read_entries_raw(handle.raw(), buf, buf_len) }
}

/// The subset of `stat` fields the engine cares about.
#[derive(Debug, Clone, Copy)]
pub struct StatInfo {
    pub size: i64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
}

/// `lstat`s `path` (never follows a trailing symlink).
///
/// # Errors
/// Returns the underlying `io::Error` if `lstat` fails.
pub fn lstat(path: &Path) -> io::Result<StatInfo> {
    let c_path = path_to_cstring(path)?;
    // SAFETY: stat_buf is zero-initialized and fully written by a successful lstat call.
    let mut stat_buf: libc::stat = unsafe { std::mem::zeroed() };
    // SAFETY: c_path is valid for the call, stat_buf is a valid writable libc::stat.
    let rc = unsafe { libc::lstat(c_path.as_ptr(), &raw mut stat_buf) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(StatInfo {
        size: stat_buf.st_size,
        atime: stat_buf.st_atime,
        mtime: stat_buf.st_mtime,
        ctime: stat_buf.st_ctime,
    })
}

/// Classifies `path` via `lstat`'s `st_mode`, for filesystems that leave
/// every `dirent64` record's `d_type` as `DT_UNKNOWN` (common on FUSE
/// mounts and some network filesystems — exactly the high-latency case
/// this engine targets). Returns [`FileType::Unknown`] if `lstat` fails,
/// rather than propagating the error: this is a best-effort fallback for
/// classification, not a correctness-critical read.
#[must_use]
pub fn lstat_file_type(path: &Path) -> FileType {
    let Ok(c_path) = path_to_cstring(path) else {
        return FileType::Unknown;
    };
    // SAFETY: stat_buf is zero-initialized and fully written by a successful lstat call.
    let mut stat_buf: libc::stat = unsafe { std::mem::zeroed() };
    // SAFETY: c_path is valid for the call, stat_buf is a valid writable libc::stat.
    let rc = unsafe { libc::lstat(c_path.as_ptr(), &raw mut stat_buf) };
    if rc != 0 {
        return FileType::Unknown;
    }
    FileType::from_mode(stat_buf.st_mode)
}

/// Removes a single file or empty directory.
///
/// # Errors
/// Returns the underlying `io::Error` if the removal fails (e.g. the
/// directory is not empty).
pub fn remove_single(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Removes a path and, if it is a directory, its full contents.
///
/// # Errors
/// Returns the underlying `io::Error` if any removal step fails.
pub fn remove_recursive(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}
