use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use super::error::FsError;
use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOp {
  Delete,
  Move,
  Copy,
}

impl BulkOp {
  pub fn name(self) -> &'static str {
    match self {
      BulkOp::Delete => "Delete",
      BulkOp::Move => "Move",
      BulkOp::Copy => "Copy",
    }
  }

  pub fn verb(self) -> &'static str {
    match self {
      BulkOp::Delete => "Deleted",
      BulkOp::Move => "Moved",
      BulkOp::Copy => "Copied",
    }
  }
}

/// What a finished bulk operation reports back into the event stream.
#[derive(Debug)]
pub struct OpsOutcome {
  pub op: BulkOp,
  pub attempted: usize,
  pub result: Result<(), FsError>,
}

/// Run one batch on a worker thread and deliver exactly one completion
/// message back to the event loop. The batch itself is sequential.
pub fn spawn_bulk(tx: mpsc::Sender<Event>, op: BulkOp, paths: Vec<PathBuf>, dest: PathBuf) {
  thread::spawn(move || {
    let attempted = dedup_paths(&paths).len();
    let result = match op {
      BulkOp::Delete => delete_all(&paths),
      BulkOp::Move => move_all(&paths, &dest),
      BulkOp::Copy => copy_all(&paths, &dest),
    };
    let _ = tx.send(Event::OpsDone(OpsOutcome { op, attempted, result }));
  });
}

/// Drop repeated paths, keeping the first occurrence of each so nothing in
/// a batch is processed twice.
fn dedup_paths(paths: &[PathBuf]) -> Vec<&PathBuf> {
  let mut seen: Vec<&PathBuf> = Vec::with_capacity(paths.len());
  for path in paths {
    if !seen.contains(&path) {
      seen.push(path);
    }
  }
  seen
}

/// Delete every path in the batch. The first failure aborts the remainder;
/// earlier deletions stay done.
pub fn delete_all(paths: &[PathBuf]) -> Result<(), FsError> {
  for path in dedup_paths(paths) {
    delete_path(path).map_err(|e| FsError::from_io(path.clone(), e))?;
  }
  Ok(())
}

/// Move every path into `dest_dir`, renaming on collision. Moving a path
/// onto itself is skipped. The first failure aborts the remainder.
pub fn move_all(paths: &[PathBuf], dest_dir: &Path) -> Result<(), FsError> {
  if !dest_dir.is_dir() {
    return Err(FsError::InvalidDestination { path: dest_dir.to_path_buf() });
  }
  for source in dedup_paths(paths) {
    let Some(file_name) = source.file_name() else {
      return Err(FsError::InvalidDestination { path: source.clone() });
    };
    let raw_dest = dest_dir.join(file_name);
    if raw_dest == *source {
      continue;
    }
    let dest = unique_dest_path(&raw_dest);
    move_path(source, &dest).map_err(|e| FsError::from_io(source.clone(), e))?;
  }
  Ok(())
}

/// Copy every path into `dest_dir`, renaming on collision so the copy never
/// overwrites an existing entry (copying something onto itself yields a
/// `_copy` sibling). The first failure aborts the remainder.
pub fn copy_all(paths: &[PathBuf], dest_dir: &Path) -> Result<(), FsError> {
  if !dest_dir.is_dir() {
    return Err(FsError::InvalidDestination { path: dest_dir.to_path_buf() });
  }
  for source in dedup_paths(paths) {
    let Some(file_name) = source.file_name() else {
      return Err(FsError::InvalidDestination { path: source.clone() });
    };
    let dest = unique_dest_path(&dest_dir.join(file_name));
    copy_path(source, &dest).map_err(|e| FsError::from_io(source.clone(), e))?;
  }
  Ok(())
}

/// Delete a file, symlink or directory tree. Deliberately stats without
/// following so a symlink to a directory deletes the link, not the target.
pub fn delete_path(path: &Path) -> io::Result<()> {
  let is_dir = path.symlink_metadata().map(|m| m.is_dir())?;
  if is_dir {
    std::fs::remove_dir_all(path)
  } else {
    std::fs::remove_file(path)
  }
}

fn move_path(source: &Path, dest: &Path) -> io::Result<()> {
  // Rename when possible; copy+delete across filesystems.
  if std::fs::rename(source, dest).is_ok() {
    return Ok(());
  }
  copy_path(source, dest)?;
  delete_path(source)
}

/// Returns a collision-free sibling of `dest` by appending `_copy`,
/// `_copy2`, ... before the extension.
pub fn unique_dest_path(dest: &Path) -> PathBuf {
  if !dest.exists() {
    return dest.to_path_buf();
  }

  let stem = dest
    .file_stem()
    .map(|s| s.to_string_lossy().to_string())
    .unwrap_or_default();
  let ext = dest.extension().map(|e| e.to_string_lossy().to_string());
  let parent = dest.parent().unwrap_or(Path::new("."));

  let mut n = 1u32;
  loop {
    let suffix = if n == 1 { "_copy".to_string() } else { format!("_copy{n}") };
    let candidate = match &ext {
      Some(e) => parent.join(format!("{stem}{suffix}.{e}")),
      None => parent.join(format!("{stem}{suffix}")),
    };
    if !candidate.exists() {
      return candidate;
    }
    n += 1;
  }
}

/// Copy a file or directory to `dest`. Directories copy depth-first; on
/// failure midway the partial destination subtree is removed before the
/// error is returned.
pub fn copy_path(source: &Path, dest: &Path) -> io::Result<()> {
  if source.is_dir() {
    if let Err(e) = copy_dir_recursive(source, dest) {
      let _ = std::fs::remove_dir_all(dest);
      return Err(e);
    }
    Ok(())
  } else {
    std::fs::copy(source, dest)?;
    Ok(())
  }
}

fn copy_dir_recursive(source: &Path, dest: &Path) -> io::Result<()> {
  std::fs::create_dir_all(dest)?;
  for item in std::fs::read_dir(source)? {
    let item = item?;
    let src_path = item.path();
    let dst_path = dest.join(item.file_name());
    if src_path.is_dir() {
      copy_dir_recursive(&src_path, &dst_path)?;
    } else {
      std::fs::copy(&src_path, &dst_path)?;
    }
  }
  Ok(())
}
