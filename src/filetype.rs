//! Directory entry type classification.
#![allow(clippy::inline_always)]

use libc::{
    mode_t, DT_BLK, DT_CHR, DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, S_IFBLK, S_IFCHR, S_IFDIR,
    S_IFIFO, S_IFLNK, S_IFMT, S_IFREG, S_IFSOCK,
};

/// The type of a directory entry, as reported by `d_type` (or a `stat`
/// fallback when the filesystem leaves `d_type` as `DT_UNKNOWN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    Directory,
    RegularFile,
    Symlink,
    Socket,
    CharDevice,
    BlockDevice,
    Fifo,
    Unknown,
}

impl FileType {
    /// Converts a raw `d_type` byte from a `dirent64` record.
    #[must_use]
    #[inline(always)]
    pub const fn from_dtype(d_type: u8) -> Self {
        match d_type {
            DT_DIR => Self::Directory,
            DT_REG => Self::RegularFile,
            DT_LNK => Self::Symlink,
            DT_SOCK => Self::Socket,
            DT_CHR => Self::CharDevice,
            DT_BLK => Self::BlockDevice,
            DT_FIFO => Self::Fifo,
            _ => Self::Unknown,
        }
    }

    /// Converts a `st_mode` field (from `stat`/`lstat`) to a `FileType`.
    ///
    /// Used as the fallback when a filesystem reports `DT_UNKNOWN` for
    /// every entry (common on FUSE mounts and some network filesystems).
    #[must_use]
    #[inline(always)]
    pub const fn from_mode(mode: mode_t) -> Self {
        match mode & S_IFMT {
            S_IFREG => Self::RegularFile,
            S_IFDIR => Self::Directory,
            S_IFLNK => Self::Symlink,
            S_IFSOCK => Self::Socket,
            S_IFCHR => Self::CharDevice,
            S_IFBLK => Self::BlockDevice,
            S_IFIFO => Self::Fifo,
            _ => Self::Unknown,
        }
    }

    /// Whether this type is ever recursed into by the traversal worker.
    ///
    /// Only plain directories are traversible: symlinks are classified
    /// but never followed (a permanent Non-goal, not a runtime option).
    #[must_use]
    pub const fn is_traversible(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::RegularFile => write!(f, "regular file"),
            Self::Symlink => write!(f, "symlink"),
            Self::Socket => write!(f, "socket"),
            Self::CharDevice => write!(f, "character device"),
            Self::BlockDevice => write!(f, "block device"),
            Self::Fifo => write!(f, "fifo"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The `-t/--type` selector set from the CLI (spec.md §6: file, dir,
/// link, socket, all).
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSet {
    file: bool,
    dir: bool,
    link: bool,
    socket: bool,
    all: bool,
}

impl TypeSet {
    #[must_use]
    pub fn from_flags(flags: &[String]) -> Self {
        let mut set = Self::default();
        for flag in flags {
            match flag.as_str() {
                "file" => set.file = true,
                "dir" => set.dir = true,
                "link" => set.link = true,
                "socket" => set.socket = true,
                "all" => set.all = true,
                _ => {}
            }
        }
        if flags.is_empty() {
            // No -t given: every type is admitted (spec.md §6 default).
            set.all = true;
        }
        set
    }

    /// Whether `ty` is admitted by this selector set.
    ///
    /// spec.md §4.5: character devices and other unrecognised types are
    /// only emitted when `all` is enabled.
    #[must_use]
    pub const fn admits(&self, ty: FileType) -> bool {
        if self.all {
            return true;
        }
        match ty {
            FileType::RegularFile => self.file,
            FileType::Directory => self.dir,
            FileType::Symlink => self.link,
            FileType::Socket => self.socket,
            _ => false,
        }
    }
}
