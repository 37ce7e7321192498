use std::fs::FileType;
use std::io;
use std::path::{Path, PathBuf};

use super::error::FsError;

/// Symlink chains longer than this resolve to `SymlinkLoop`. Matches the
/// usual kernel ELOOP limit, but has to be enforced here as well since a
/// cyclic chain never terminates on its own.
const MAX_SYMLINK_HOPS: usize = 40;

/// Raw (non-following) type of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
  File,
  Dir,
  Symlink,
  Other,
}

impl EntryKind {
  fn from_file_type(ft: FileType) -> Self {
    if ft.is_symlink() {
      EntryKind::Symlink
    } else if ft.is_dir() {
      EntryKind::Dir
    } else if ft.is_file() {
      EntryKind::File
    } else {
      EntryKind::Other
    }
  }
}

/// One row in a directory listing. `is_dir` follows symlinks so a link to a
/// directory groups and navigates as a directory, while `kind` keeps the
/// raw type for resolution and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  pub name: String,
  pub parent: PathBuf,
  pub kind: EntryKind,
  pub is_dir: bool,
}

impl Entry {
  pub fn from_dir_entry(parent: &Path, item: &std::fs::DirEntry) -> Self {
    let name = item.file_name().to_string_lossy().to_string();
    let kind = item.file_type().map(EntryKind::from_file_type).unwrap_or(EntryKind::Other);
    let is_dir = match kind {
      EntryKind::Dir => true,
      // Only links need the extra stat to learn what they point at.
      EntryKind::Symlink => item.path().metadata().is_ok_and(|m| m.is_dir()),
      _ => false,
    };
    Self { name, parent: parent.to_path_buf(), kind, is_dir }
  }

  pub fn from_path(path: &Path) -> Self {
    let kind = path
      .symlink_metadata()
      .map(|m| EntryKind::from_file_type(m.file_type()))
      .unwrap_or(EntryKind::Other);
    let is_dir = path.metadata().is_ok_and(|m| m.is_dir());
    let (parent, name) = split_path(path);
    Self { name, parent, kind, is_dir }
  }

  pub fn path(&self) -> PathBuf {
    self.parent.join(&self.name)
  }

  pub fn is_hidden(&self) -> bool {
    self.name.starts_with('.')
  }
}

fn split_path(path: &Path) -> (PathBuf, String) {
  match (path.parent(), path.file_name()) {
    (Some(parent), Some(name)) => (parent.to_path_buf(), name.to_string_lossy().to_string()),
    // The filesystem root has neither; joining an absolute name onto an
    // empty parent reproduces it.
    _ => (PathBuf::new(), path.to_string_lossy().to_string()),
  }
}

/// Follow a symlink chain to its final target. Non-symlinks come back
/// unchanged. A missing hop is `BrokenLink`, a chain longer than
/// `MAX_SYMLINK_HOPS` is `SymlinkLoop`.
pub fn resolve_symlink(entry: &Entry) -> Result<Entry, FsError> {
  let mut current = entry.clone();
  for _ in 0..MAX_SYMLINK_HOPS {
    if current.kind != EntryKind::Symlink {
      return Ok(current);
    }
    let link_path = current.path();
    let target = std::fs::read_link(&link_path).map_err(|e| match e.kind() {
      io::ErrorKind::NotFound => FsError::BrokenLink { path: link_path.clone() },
      _ => FsError::from_io(link_path.clone(), e),
    })?;
    let target = if target.is_absolute() {
      target
    } else {
      current.parent.join(target)
    };
    current = entry_at(&target)?;
  }
  Err(FsError::SymlinkLoop { path: entry.path() })
}

fn entry_at(path: &Path) -> Result<Entry, FsError> {
  let meta = path.symlink_metadata().map_err(|e| match e.kind() {
    io::ErrorKind::NotFound => FsError::BrokenLink { path: path.to_path_buf() },
    _ => FsError::from_io(path, e),
  })?;
  let kind = EntryKind::from_file_type(meta.file_type());
  let is_dir = match kind {
    EntryKind::Symlink => path.metadata().is_ok_and(|m| m.is_dir()),
    _ => meta.is_dir(),
  };
  let (parent, name) = split_path(path);
  Ok(Entry { name, parent, kind, is_dir })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::sync::atomic::{AtomicU32, Ordering};

  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn test_dir(prefix: &str) -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("triptych_entry_{prefix}_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn test_from_path_file() {
    let dir = test_dir("file");
    let file = dir.join("notes.txt");
    fs::write(&file, "hello").unwrap();

    let entry = Entry::from_path(&file);
    assert_eq!(entry.name, "notes.txt");
    assert_eq!(entry.parent, dir);
    assert_eq!(entry.kind, EntryKind::File);
    assert!(!entry.is_dir);
    assert_eq!(entry.path(), file);

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_from_path_dir() {
    let dir = test_dir("dir");
    let entry = Entry::from_path(&dir);
    assert_eq!(entry.kind, EntryKind::Dir);
    assert!(entry.is_dir);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_root_round_trips() {
    let entry = Entry::from_path(Path::new("/"));
    assert_eq!(entry.path(), PathBuf::from("/"));
    assert!(entry.is_dir);
  }

  #[test]
  fn test_is_hidden() {
    let entry = Entry {
      name: ".gitignore".to_string(),
      parent: PathBuf::from("/tmp"),
      kind: EntryKind::File,
      is_dir: false,
    };
    assert!(entry.is_hidden());

    let entry = Entry { name: "README.md".to_string(), ..entry };
    assert!(!entry.is_hidden());
  }

  #[test]
  fn test_resolve_non_symlink_unchanged() {
    let dir = test_dir("plain");
    let file = dir.join("plain.txt");
    fs::write(&file, "x").unwrap();

    let entry = Entry::from_path(&file);
    let resolved = resolve_symlink(&entry).unwrap();
    assert_eq!(resolved, entry);

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_resolve_chain_to_directory() {
    let dir = test_dir("chain");
    let target = dir.join("real_dir");
    fs::create_dir_all(&target).unwrap();
    std::os::unix::fs::symlink(&target, dir.join("b")).unwrap();
    std::os::unix::fs::symlink(dir.join("b"), dir.join("a")).unwrap();

    let entry = Entry::from_path(&dir.join("a"));
    assert_eq!(entry.kind, EntryKind::Symlink);
    assert!(entry.is_dir);

    let resolved = resolve_symlink(&entry).unwrap();
    assert_eq!(resolved.kind, EntryKind::Dir);
    assert_eq!(resolved.path(), target);

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_resolve_relative_target() {
    let dir = test_dir("rel");
    fs::write(dir.join("real.txt"), "x").unwrap();
    std::os::unix::fs::symlink("real.txt", dir.join("link")).unwrap();

    let entry = Entry::from_path(&dir.join("link"));
    let resolved = resolve_symlink(&entry).unwrap();
    assert_eq!(resolved.path(), dir.join("real.txt"));
    assert_eq!(resolved.kind, EntryKind::File);

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_resolve_broken_link() {
    let dir = test_dir("broken");
    std::os::unix::fs::symlink(dir.join("missing"), dir.join("dangling")).unwrap();

    let entry = Entry::from_path(&dir.join("dangling"));
    let err = resolve_symlink(&entry).unwrap_err();
    assert!(matches!(err, FsError::BrokenLink { .. }));

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_resolve_loop() {
    let dir = test_dir("cycle");
    std::os::unix::fs::symlink(dir.join("b"), dir.join("a")).unwrap();
    std::os::unix::fs::symlink(dir.join("a"), dir.join("b")).unwrap();

    let entry = Entry::from_path(&dir.join("a"));
    let err = resolve_symlink(&entry).unwrap_err();
    assert!(matches!(err, FsError::SymlinkLoop { .. }));

    let _ = fs::remove_dir_all(&dir);
  }
}
