//! Raw directory reading: deadline-bounded syscalls, buffer pooling, and
//! the `dirent64` record decoder.

pub mod buffer;
pub mod deadline;
pub mod raw;
pub mod syscall;

pub use buffer::{new_decode_buffer, DecodeBuffer, BUFFER_SIZE};
pub use raw::{join_path, EntryDecoder, RawEntry};
pub use syscall::{
    lstat, lstat_file_type, open_dir, read_entries_raw, remove_recursive, remove_single, DirHandle, StatInfo,
};
pub use deadline::{open_with_deadline, read_entries_with_deadline};
