use std::path::{Path, PathBuf};

use super::entry::Entry;
use super::error::FsError;
use crate::collate::EntrySorter;

/// One directory's contents as read at a single point in time. Entries are
/// sorted at construction and never change afterwards; cursor and scroll
/// state live in the pane, not here.
#[derive(Debug, Clone)]
pub struct DirSnapshot {
  pub path: PathBuf,
  pub entries: Vec<Entry>,
  pub file_count: usize,
  pub dir_count: usize,
}

/// List the immediate children of `path`, unsorted and unfiltered. This is
/// the only piece that touches the filesystem, so it is what load worker
/// threads run; sorting happens when a fresh response is applied.
pub fn read_listing(path: &Path) -> Result<Vec<Entry>, FsError> {
  let read_dir = std::fs::read_dir(path).map_err(|e| FsError::from_io(path, e))?;
  let mut entries = Vec::new();
  for item in read_dir {
    let item = item.map_err(|e| FsError::from_io(path, e))?;
    entries.push(Entry::from_dir_entry(path, &item));
  }
  Ok(entries)
}

impl DirSnapshot {
  pub fn build(
    path: PathBuf,
    mut entries: Vec<Entry>,
    sorter: &EntrySorter,
    show_hidden: bool,
  ) -> Self {
    if !show_hidden {
      entries.retain(|e| !e.is_hidden());
    }
    sorter.sort(&mut entries);
    let dir_count = entries.iter().filter(|e| e.is_dir).count();
    let file_count = entries.len() - dir_count;
    Self { path, entries, file_count, dir_count }
  }

  pub fn read(path: &Path, sorter: &EntrySorter, show_hidden: bool) -> Result<Self, FsError> {
    let raw = read_listing(path)?;
    Ok(Self::build(path.to_path_buf(), raw, sorter, show_hidden))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn position_of(&self, name: &str) -> Option<usize> {
    self.entries.iter().position(|e| e.name == name)
  }
}
