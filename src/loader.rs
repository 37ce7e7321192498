use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::event::Event;
use crate::fs::{self, Entry, FsError};

/// Which of the three panes a load belongs to. Each kind owns an
/// independent request-id sequence; a response whose id is not the newest
/// issued for its kind is discarded by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
  Parent,
  Working,
  Child,
}

impl PaneKind {
  pub const ALL: [PaneKind; 3] = [PaneKind::Parent, PaneKind::Working, PaneKind::Child];

  pub fn index(self) -> usize {
    self as usize
  }
}

/// One issued directory read. Ids are handed out by the browser, one
/// monotonically increasing sequence per pane kind.
#[derive(Debug, Clone)]
pub struct LoadRequest {
  pub id: u64,
  pub kind: PaneKind,
  pub path: PathBuf,
}

/// Result of one directory read, tagged with the request that asked for it.
/// Carries the raw unsorted listing so that discarding a stale response
/// wastes nothing beyond the read itself.
#[derive(Debug)]
pub struct LoadResponse {
  pub id: u64,
  pub kind: PaneKind,
  pub path: PathBuf,
  pub result: Result<Vec<Entry>, FsError>,
}

/// Read a directory on a worker thread and deliver exactly one response
/// back into the main event stream.
pub fn spawn_load(tx: mpsc::Sender<Event>, request: LoadRequest) {
  thread::spawn(move || {
    let LoadRequest { id, kind, path } = request;
    let result = fs::read_listing(&path);
    let _ = tx.send(Event::Loaded(LoadResponse { id, kind, path, result }));
  });
}
