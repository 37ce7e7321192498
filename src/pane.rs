use std::path::PathBuf;

use crate::fs::{DirSnapshot, Entry, FsError};

/// Rows kept between the cursor and the nearest viewport edge while moving
/// inside the list.
pub const DEFAULT_SCROLL_MARGIN: usize = 2;

/// What a pane currently shows. A pane with an in-flight load keeps its
/// previous view; the browser tracks request ids separately.
#[derive(Debug)]
pub enum PaneView {
  /// Nothing to show: the placeholder above the filesystem root, or the
  /// child slot while the cursor rests on a file.
  Empty,
  Loaded(DirSnapshot),
  Errored(FsError),
}

/// Cursor and scroll state remembered per directory, so revisiting a
/// directory restores the previous view.
#[derive(Debug, Clone)]
pub struct PaneMemory {
  pub cursor: usize,
  pub scroll: usize,
  pub entry_name: String,
}

/// One of the three directory views. Owns cursor and scroll arithmetic over
/// its snapshot; does no I/O of its own.
#[derive(Debug)]
pub struct Pane {
  pub path: Option<PathBuf>,
  view: PaneView,
  cursor: usize,
  scroll: usize,
  rows: usize,
  margin: usize,
}

impl Pane {
  pub fn new(margin: usize) -> Self {
    Self {
      path: None,
      view: PaneView::Empty,
      cursor: 0,
      scroll: 0,
      rows: 20,
      margin,
    }
  }

  pub fn view(&self) -> &PaneView {
    &self.view
  }

  pub fn entries(&self) -> &[Entry] {
    match &self.view {
      PaneView::Loaded(snapshot) => &snapshot.entries,
      _ => &[],
    }
  }

  pub fn snapshot(&self) -> Option<&DirSnapshot> {
    match &self.view {
      PaneView::Loaded(snapshot) => Some(snapshot),
      _ => None,
    }
  }

  pub fn len(&self) -> usize {
    self.entries().len()
  }

  /// A pane can be focused (navigated into or promoted) only when its most
  /// recent load succeeded.
  pub fn is_focusable(&self) -> bool {
    matches!(self.view, PaneView::Loaded(_))
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn scroll(&self) -> usize {
    self.scroll
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  /// Cursor row relative to the viewport, for drawing chrome between panes.
  pub fn selected_row(&self) -> usize {
    self.cursor.saturating_sub(self.scroll)
  }

  pub fn current_entry(&self) -> Option<&Entry> {
    self.entries().get(self.cursor)
  }

  /// The viewport window over the sorted entries.
  pub fn visible(&self) -> &[Entry] {
    let entries = self.entries();
    let start = self.scroll.min(entries.len());
    let end = (start + self.rows).min(entries.len());
    &entries[start..end]
  }

  pub fn set_empty(&mut self) {
    self.path = None;
    self.view = PaneView::Empty;
    self.cursor = 0;
    self.scroll = 0;
  }

  pub fn set_error(&mut self, path: PathBuf, err: FsError) {
    self.path = Some(path);
    self.view = PaneView::Errored(err);
    self.cursor = 0;
    self.scroll = 0;
  }

  /// Apply a fresh snapshot, restoring remembered state when given. An
  /// exact restore needs the remembered row to still hold the same entry;
  /// otherwise the name is looked up again and the top is the fallback.
  pub fn show(&mut self, snapshot: DirSnapshot, memory: Option<&PaneMemory>) {
    self.path = Some(snapshot.path.clone());
    self.view = PaneView::Loaded(snapshot);
    self.cursor = 0;
    self.scroll = 0;
    if let Some(memory) = memory {
      self.restore(memory);
    }
  }

  fn restore(&mut self, memory: &PaneMemory) {
    if self.len() == 0 {
      return;
    }
    let unchanged = self
      .entries()
      .get(memory.cursor)
      .is_some_and(|e| e.name == memory.entry_name);
    if unchanged {
      self.cursor = memory.cursor;
      self.scroll = memory.scroll.min(self.max_scroll());
      self.adjust_scroll();
    } else {
      self.select_by_name(&memory.entry_name);
    }
  }

  /// Current state for the orchestrator's per-path cache; panes with
  /// nothing under the cursor have nothing worth remembering.
  pub fn memory(&self) -> Option<PaneMemory> {
    let entry = self.current_entry()?;
    Some(PaneMemory {
      cursor: self.cursor,
      scroll: self.scroll,
      entry_name: entry.name.clone(),
    })
  }

  /// Move the cursor by `delta`, wrapping at either end: down from the last
  /// entry lands on the first, up from the first lands on the last with the
  /// final page visible.
  pub fn move_cursor(&mut self, delta: isize) {
    let len = self.len();
    if len == 0 {
      return;
    }
    if delta > 0 && self.cursor == len - 1 {
      self.cursor = 0;
      self.scroll = 0;
      return;
    }
    if delta < 0 && self.cursor == 0 {
      self.cursor = len - 1;
      self.scroll = self.max_scroll();
      return;
    }
    if delta > 0 {
      self.cursor = (self.cursor + delta as usize).min(len - 1);
    } else {
      self.cursor = self.cursor.saturating_sub(delta.unsigned_abs());
    }
    self.adjust_scroll();
  }

  /// Jump to an absolute index (clamped) and recenter.
  pub fn move_to(&mut self, index: usize) {
    let len = self.len();
    if len == 0 {
      return;
    }
    self.cursor = index.min(len - 1);
    self.center_viewport();
  }

  /// Put the cursor on the entry with this name, centering the viewport on
  /// it; an absent name selects the top.
  pub fn select_by_name(&mut self, name: &str) {
    match self.entries().iter().position(|e| e.name == name) {
      Some(index) => {
        self.cursor = index;
        self.center_viewport();
      }
      None => {
        self.cursor = 0;
        self.scroll = 0;
      }
    }
  }

  /// Resize the visible window; re-clamps the cursor and recomputes the
  /// viewport from scratch. Idempotent.
  pub fn set_bounds(&mut self, rows: usize) {
    self.rows = rows.max(1);
    let len = self.len();
    if len == 0 {
      self.cursor = 0;
      self.scroll = 0;
      return;
    }
    self.cursor = self.cursor.min(len - 1);
    self.center_viewport();
  }

  fn max_scroll(&self) -> usize {
    self.len().saturating_sub(self.rows)
  }

  fn center_viewport(&mut self) {
    self.scroll = self.cursor.saturating_sub(self.rows / 2).min(self.max_scroll());
    self.adjust_scroll();
  }

  /// Keep the margin between cursor and viewport edges: scrolling by
  /// exactly the overshoot, clamped to the valid range.
  fn adjust_scroll(&mut self) {
    let margin = self.margin.min(self.rows.saturating_sub(1) / 2);
    if self.cursor < self.scroll + margin {
      self.scroll = self.cursor.saturating_sub(margin);
    } else if self.cursor + margin + 1 > self.scroll + self.rows {
      self.scroll = (self.cursor + margin + 1).saturating_sub(self.rows);
    }
    self.scroll = self.scroll.min(self.max_scroll());
  }
}
