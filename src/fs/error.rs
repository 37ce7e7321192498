use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures surfaced by directory loads, symlink resolution and bulk file
/// operations. Load errors attach to the pane that asked for them; bulk-op
/// errors abort the remaining batch and name the offending path.
#[derive(Debug, Error)]
pub enum FsError {
  #[error("not found: {}", .path.display())]
  NotFound { path: PathBuf },
  #[error("permission denied: {}", .path.display())]
  PermissionDenied { path: PathBuf },
  #[error("broken symlink: {}", .path.display())]
  BrokenLink { path: PathBuf },
  #[error("symlink loop: {}", .path.display())]
  SymlinkLoop { path: PathBuf },
  #[error("invalid destination: {}", .path.display())]
  InvalidDestination { path: PathBuf },
  #[error("{}: {source}", .path.display())]
  Io { path: PathBuf, source: io::Error },
}

impl FsError {
  /// Classify an io error against the path that produced it.
  pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
    let path = path.into();
    match err.kind() {
      io::ErrorKind::NotFound => FsError::NotFound { path },
      io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path },
      _ => FsError::Io { path, source: err },
    }
  }

  pub fn path(&self) -> &Path {
    match self {
      FsError::NotFound { path }
      | FsError::PermissionDenied { path }
      | FsError::BrokenLink { path }
      | FsError::SymlinkLoop { path }
      | FsError::InvalidDestination { path }
      | FsError::Io { path, .. } => path,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_io_classifies_not_found() {
    let err = FsError::from_io("/nope", io::Error::from(io::ErrorKind::NotFound));
    assert!(matches!(err, FsError::NotFound { .. }));
    assert_eq!(err.path(), Path::new("/nope"));
  }

  #[test]
  fn test_from_io_classifies_permission_denied() {
    let err = FsError::from_io("/sys/secret", io::Error::from(io::ErrorKind::PermissionDenied));
    assert!(matches!(err, FsError::PermissionDenied { .. }));
  }

  #[test]
  fn test_from_io_other_keeps_source() {
    let err = FsError::from_io("/dev/full", io::Error::other("boom"));
    assert!(matches!(err, FsError::Io { .. }));
    assert!(err.to_string().contains("boom"));
  }

  #[test]
  fn test_display_includes_path() {
    let err = FsError::SymlinkLoop { path: PathBuf::from("/tmp/a") };
    assert_eq!(err.to_string(), "symlink loop: /tmp/a");
  }
}
