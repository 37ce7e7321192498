use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::collate::EntrySorter;
use crate::config::Config;
use crate::event::Event;
use crate::fs::ops::{self, BulkOp, OpsOutcome};
use crate::fs::{DirSnapshot, EntryKind, resolve_symlink};
use crate::loader::{self, LoadRequest, LoadResponse, PaneKind};
use crate::pane::{Pane, PaneMemory};
use crate::preview::{self, FilePreview, PreviewResponse};
use crate::selection::Selection;

/// What rightward navigation decided to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RightNav {
  /// The child pane was promoted to working.
  Entered,
  /// The cursor entry is a regular file; hand it to the external opener.
  OpenFile(PathBuf),
  /// No usable target: empty pane, unresolvable entry, or a child pane
  /// that has not (successfully) loaded.
  Blocked,
}

/// Owns the three panes and sequences every load. All mutation happens on
/// the event-loop thread; worker threads only ever send tagged messages
/// back through `tx`. Out-of-order completion is the one hazard, and the
/// per-kind request ids are the one defense: a response is applied only if
/// its id matches the newest issued for its kind.
pub struct Browser {
  panes: [Pane; 3],
  issued: [u64; 3],
  loading: [bool; 3],
  target: [Option<PathBuf>; 3],
  memory: HashMap<PathBuf, PaneMemory>,
  pub selection: Selection,
  sorter: EntrySorter,
  tx: mpsc::Sender<Event>,
  pub show_hidden: bool,
  preview: Option<FilePreview>,
  preview_issued: u64,
  preview_inflight: usize,
  ops_running: bool,
}

impl Browser {
  pub fn new(start: PathBuf, config: &Config, tx: mpsc::Sender<Event>) -> Self {
    let margin = config.scroll_margin;
    let mut browser = Self {
      panes: [Pane::new(margin), Pane::new(margin), Pane::new(margin)],
      issued: [0; 3],
      loading: [false; 3],
      target: [None, None, None],
      memory: HashMap::new(),
      selection: Selection::new(),
      sorter: EntrySorter::from_env(),
      tx,
      show_hidden: config.show_hidden,
      preview: None,
      preview_issued: 0,
      preview_inflight: 0,
      ops_running: false,
    };
    browser.change_directory(start);
    browser
  }

  fn pane(&self, kind: PaneKind) -> &Pane {
    &self.panes[kind.index()]
  }

  fn pane_mut(&mut self, kind: PaneKind) -> &mut Pane {
    &mut self.panes[kind.index()]
  }

  pub fn parent_pane(&self) -> &Pane {
    self.pane(PaneKind::Parent)
  }

  pub fn working(&self) -> &Pane {
    self.pane(PaneKind::Working)
  }

  pub fn child_pane(&self) -> &Pane {
    self.pane(PaneKind::Child)
  }

  pub fn working_path(&self) -> Option<&Path> {
    self.target[PaneKind::Working.index()].as_deref()
  }

  pub fn preview(&self) -> Option<&FilePreview> {
    self.preview.as_ref()
  }

  pub fn ops_running(&self) -> bool {
    self.ops_running
  }

  /// True while any load, preview or bulk operation is still in flight.
  pub fn is_busy(&self) -> bool {
    self.loading.iter().any(|&l| l) || self.preview_inflight > 0 || self.ops_running
  }

  pub fn set_bounds(&mut self, rows: usize) {
    for pane in &mut self.panes {
      pane.set_bounds(rows);
    }
  }

  /// Point the working pane at `path`. The parent and child panes follow
  /// from the cascade once the load lands.
  pub fn change_directory(&mut self, path: PathBuf) {
    for kind in PaneKind::ALL {
      self.save_memory(kind);
    }
    self.preview = None;
    self.preview_issued += 1;
    self.invalidate(PaneKind::Parent);
    self.invalidate(PaneKind::Child);
    self.target[PaneKind::Working.index()] = Some(path.clone());
    self.issue_load(PaneKind::Working, path);
  }

  /// Re-read the working directory; the cascade refreshes the other panes.
  pub fn reload(&mut self) {
    if let Some(path) = self.target[PaneKind::Working.index()].clone() {
      self.issue_load(PaneKind::Working, path);
    }
  }

  pub fn toggle_hidden(&mut self) {
    self.show_hidden = !self.show_hidden;
    self.reload();
  }

  pub fn move_cursor(&mut self, delta: isize) {
    let before = self.working().cursor();
    self.pane_mut(PaneKind::Working).move_cursor(delta);
    if self.working().cursor() != before {
      self.refresh_child();
    }
  }

  pub fn move_to_top(&mut self) {
    let before = self.working().cursor();
    self.pane_mut(PaneKind::Working).move_to(0);
    if self.working().cursor() != before {
      self.refresh_child();
    }
  }

  pub fn move_to_bottom(&mut self) {
    let before = self.working().cursor();
    let last = self.working().len().saturating_sub(1);
    self.pane_mut(PaneKind::Working).move_to(last);
    if self.working().cursor() != before {
      self.refresh_child();
    }
  }

  /// Promote parent to working and working to child. A no-op when the
  /// parent pane is not focusable, which includes the placeholder above
  /// the filesystem root.
  pub fn move_left(&mut self) {
    let Some(working_path) = self.target[PaneKind::Working.index()].clone() else {
      return;
    };
    let Some(parent_path) = working_path.parent().map(Path::to_path_buf) else {
      return;
    };
    // Only a parent pane with a fresh successful load of the right
    // directory can be promoted.
    let parent_ready = self.pane(PaneKind::Parent).is_focusable()
      && !self.loading[PaneKind::Parent.index()]
      && self.pane(PaneKind::Parent).path.as_deref() == Some(parent_path.as_path());
    if !parent_ready {
      return;
    }

    // The child's directory leaves the window; remember its view.
    self.save_memory(PaneKind::Child);
    self.preview = None;
    self.preview_issued += 1;

    // Role rotation is data movement: parent -> working -> child.
    self.panes.swap(1, 2);
    self.panes.swap(0, 1);
    self.target[PaneKind::Child.index()] = Some(working_path.clone());
    self.target[PaneKind::Working.index()] = Some(parent_path.clone());
    self.invalidate(PaneKind::Working);
    self.invalidate(PaneKind::Child);

    // The promoted pane's cursor should rest on the directory we came
    // from; when it cannot (the name is filtered out), fall back to a
    // normal child refresh for whatever is under the cursor.
    let name = working_path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default();
    self.pane_mut(PaneKind::Working).select_by_name(&name);
    let on_old_dir = self
      .working()
      .current_entry()
      .is_some_and(|e| e.path() == working_path);
    if !on_old_dir {
      self.refresh_child();
    }

    match parent_path.parent() {
      Some(grandparent) => {
        let grandparent = grandparent.to_path_buf();
        self.target[PaneKind::Parent.index()] = Some(grandparent.clone());
        self.pane_mut(PaneKind::Parent).set_empty();
        self.issue_load(PaneKind::Parent, grandparent);
      }
      None => {
        // Working is now the filesystem root; the slot above it stays a
        // permanent placeholder.
        self.target[PaneKind::Parent.index()] = None;
        self.invalidate(PaneKind::Parent);
        self.pane_mut(PaneKind::Parent).set_empty();
      }
    }
  }

  /// Promote working to parent and child to working, or delegate a regular
  /// file to the caller. Blocked until the child pane has a fresh
  /// successful load of the cursor entry's directory.
  pub fn move_right(&mut self) -> RightNav {
    let Some(entry) = self.working().current_entry().cloned() else {
      return RightNav::Blocked;
    };
    let resolved = match resolve_symlink(&entry) {
      Ok(resolved) => resolved,
      Err(_) => return RightNav::Blocked,
    };
    if !resolved.is_dir {
      if resolved.kind == EntryKind::File {
        return RightNav::OpenFile(entry.path());
      }
      return RightNav::Blocked;
    }

    let child_path = resolved.path();
    let child_ready = self.pane(PaneKind::Child).is_focusable()
      && !self.loading[PaneKind::Child.index()]
      && self.target[PaneKind::Child.index()].as_deref() == Some(child_path.as_path());
    if !child_ready {
      return RightNav::Blocked;
    }
    let Some(working_path) = self.target[PaneKind::Working.index()].clone() else {
      return RightNav::Blocked;
    };

    // The parent's directory leaves the window; remember its view.
    self.save_memory(PaneKind::Parent);
    self.preview = None;
    self.preview_issued += 1;

    self.panes.swap(0, 1);
    self.panes.swap(1, 2);
    self.target[PaneKind::Parent.index()] = Some(working_path);
    self.target[PaneKind::Working.index()] = Some(child_path);
    self.invalidate(PaneKind::Parent);
    self.invalidate(PaneKind::Working);
    self.pane_mut(PaneKind::Child).set_empty();

    self.refresh_child();
    RightNav::Entered
  }

  /// Flip the selection on the cursor entry; returns the path and its new
  /// state so the caller can report it.
  pub fn toggle_select(&mut self) -> Option<(PathBuf, bool)> {
    let entry = self.working().current_entry()?;
    let path = entry.path();
    let selected = self.selection.toggle(path.clone());
    Some((path, selected))
  }

  /// Kick off one bulk batch against the current selection, delivering a
  /// single completion message later. Refused while another batch runs.
  pub fn start_bulk(&mut self, op: BulkOp) -> bool {
    if self.ops_running || self.selection.is_empty() {
      return false;
    }
    let Some(dest) = self.target[PaneKind::Working.index()].clone() else {
      return false;
    };
    self.ops_running = true;
    ops::spawn_bulk(self.tx.clone(), op, self.selection.paths(), dest);
    true
  }

  /// The batch finished: clear the selection only on success (failure
  /// leaves it for a retry), then force a reload of what we show.
  pub fn finish_bulk(&mut self, outcome: &OpsOutcome) {
    self.ops_running = false;
    if outcome.result.is_ok() {
      self.selection.clear();
    }
    self.reload();
  }

  /// Apply one directory-read result. Anything but the newest request id
  /// for its kind is stale and dropped without side effects.
  pub fn handle_load(&mut self, response: LoadResponse) {
    let idx = response.kind.index();
    if response.id != self.issued[idx] {
      return;
    }
    self.loading[idx] = false;
    match response.result {
      Ok(raw) => {
        let snapshot =
          DirSnapshot::build(response.path.clone(), raw, &self.sorter, self.show_hidden);
        let memory = self.memory.get(&response.path).cloned();
        self.pane_mut(response.kind).show(snapshot, memory.as_ref());
        match response.kind {
          PaneKind::Working => self.cascade_from_working(&response.path),
          PaneKind::Parent => self.point_parent_at_working(),
          PaneKind::Child => {}
        }
      }
      Err(err) => {
        self.pane_mut(response.kind).set_error(response.path, err);
      }
    }
  }

  pub fn handle_preview(&mut self, response: PreviewResponse) {
    self.preview_inflight = self.preview_inflight.saturating_sub(1);
    if response.id != self.preview_issued {
      return;
    }
    self.preview = Some(response.preview);
  }

  /// A fresh working directory just landed: load its parent (or park the
  /// placeholder at the root) and refresh whatever the cursor points at.
  fn cascade_from_working(&mut self, path: &Path) {
    match path.parent() {
      Some(parent) => {
        let parent = parent.to_path_buf();
        self.target[PaneKind::Parent.index()] = Some(parent.clone());
        self.issue_load(PaneKind::Parent, parent);
      }
      None => {
        self.target[PaneKind::Parent.index()] = None;
        self.invalidate(PaneKind::Parent);
        self.save_memory(PaneKind::Parent);
        self.pane_mut(PaneKind::Parent).set_empty();
      }
    }
    self.refresh_child();
  }

  /// The parent pane's cursor always rests on the working directory's
  /// name; the connective chrome between the panes depends on it.
  fn point_parent_at_working(&mut self) {
    if let Some(name) = self.target[PaneKind::Working.index()]
      .as_ref()
      .and_then(|p| p.file_name())
      .map(|n| n.to_string_lossy().to_string())
    {
      self.pane_mut(PaneKind::Parent).select_by_name(&name);
    }
  }

  /// Re-derive the child slot from the working cursor: a directory (after
  /// symlink resolution) loads, a file previews, anything else blanks.
  fn refresh_child(&mut self) {
    self.preview = None;
    self.preview_issued += 1;
    let Some(entry) = self.working().current_entry().cloned() else {
      self.set_child_empty();
      return;
    };
    match resolve_symlink(&entry) {
      Ok(resolved) => {
        if resolved.is_dir {
          let path = resolved.path();
          self.target[PaneKind::Child.index()] = Some(path.clone());
          self.issue_load(PaneKind::Child, path);
        } else if resolved.kind == EntryKind::File {
          self.set_child_empty();
          self.preview_inflight += 1;
          preview::spawn_preview(self.tx.clone(), self.preview_issued, resolved.path());
        } else {
          self.set_child_empty();
        }
      }
      Err(err) => {
        self.invalidate(PaneKind::Child);
        self.target[PaneKind::Child.index()] = None;
        self.save_memory(PaneKind::Child);
        self.pane_mut(PaneKind::Child).set_error(entry.path(), err);
      }
    }
  }

  fn set_child_empty(&mut self) {
    self.invalidate(PaneKind::Child);
    self.target[PaneKind::Child.index()] = None;
    self.save_memory(PaneKind::Child);
    self.pane_mut(PaneKind::Child).set_empty();
  }

  /// Issue the next load for this pane kind. Whatever the pane showed is
  /// written back to the per-path cache first, so coming back restores it.
  fn issue_load(&mut self, kind: PaneKind, path: PathBuf) {
    self.save_memory(kind);
    let idx = kind.index();
    self.issued[idx] += 1;
    self.loading[idx] = true;
    let request = LoadRequest { id: self.issued[idx], kind, path };
    loader::spawn_load(self.tx.clone(), request);
  }

  /// Retire a kind's outstanding request without a replacement; any
  /// response still in flight for it will fail the id check.
  fn invalidate(&mut self, kind: PaneKind) {
    let idx = kind.index();
    self.issued[idx] += 1;
    self.loading[idx] = false;
  }

  fn save_memory(&mut self, kind: PaneKind) {
    let pane = self.pane(kind);
    if let (Some(path), Some(memory)) = (pane.path.clone(), pane.memory()) {
      self.memory.insert(path, memory);
    }
  }
}
