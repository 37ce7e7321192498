use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Paths marked for the next bulk operation. Independent of any one pane: a
/// path stays selected while the panes move elsewhere, and is only cleared
/// explicitly or after a batch succeeds.
#[derive(Debug, Default)]
pub struct Selection {
  paths: HashSet<PathBuf>,
}

impl Selection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn select(&mut self, path: PathBuf) {
    self.paths.insert(path);
  }

  pub fn deselect(&mut self, path: &Path) {
    self.paths.remove(path);
  }

  /// Flip membership; returns the new state.
  pub fn toggle(&mut self, path: PathBuf) -> bool {
    if self.paths.remove(&path) {
      false
    } else {
      self.paths.insert(path);
      true
    }
  }

  pub fn is_selected(&self, path: &Path) -> bool {
    self.paths.contains(path)
  }

  pub fn clear(&mut self) {
    self.paths.clear();
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  pub fn paths(&self) -> Vec<PathBuf> {
    self.paths.iter().cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_toggle_returns_new_membership() {
    let mut selection = Selection::new();
    let path = PathBuf::from("/tmp/a");

    assert!(selection.toggle(path.clone()));
    assert!(selection.is_selected(&path));

    assert!(!selection.toggle(path.clone()));
    assert!(!selection.is_selected(&path));
  }

  #[test]
  fn test_select_deselect() {
    let mut selection = Selection::new();
    selection.select(PathBuf::from("/tmp/a"));
    selection.select(PathBuf::from("/tmp/b"));
    assert_eq!(selection.len(), 2);

    selection.deselect(Path::new("/tmp/a"));
    assert_eq!(selection.len(), 1);
    assert!(!selection.is_selected(Path::new("/tmp/a")));
    assert!(selection.is_selected(Path::new("/tmp/b")));
  }

  #[test]
  fn test_select_twice_is_one_entry() {
    let mut selection = Selection::new();
    selection.select(PathBuf::from("/tmp/a"));
    selection.select(PathBuf::from("/tmp/a"));
    assert_eq!(selection.len(), 1);
  }

  #[test]
  fn test_clear() {
    let mut selection = Selection::new();
    selection.select(PathBuf::from("/tmp/a"));
    selection.select(PathBuf::from("/tmp/b"));
    selection.clear();
    assert!(selection.is_empty());
    assert!(selection.paths().is_empty());
  }

  #[test]
  fn test_paths_returns_everything() {
    let mut selection = Selection::new();
    selection.select(PathBuf::from("/tmp/a"));
    selection.select(PathBuf::from("/tmp/b"));

    let mut paths = selection.paths();
    paths.sort();
    assert_eq!(paths, vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]);
  }
}
