pub mod entry;
pub mod error;
pub mod ops;
pub mod snapshot;

pub use entry::{Entry, EntryKind, resolve_symlink};
pub use error::FsError;
pub use snapshot::{DirSnapshot, read_listing};
