use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Result;

use crate::action::Action;
use crate::browser::{Browser, RightNav};
use crate::config::Config;
use crate::event::{Event, InputMode};
use crate::fs::ops::{BulkOp, OpsOutcome};

/// Ticks a status message stays visible before the main loop clears it.
const STATUS_TICKS: u8 = 30;

/// Everything above the browser engine: input mode, transient status, and
/// the quit flag the main loop polls.
pub struct App {
  pub browser: Browser,
  pub input_mode: InputMode,
  pub status_message: Option<String>,
  pub status_ticks: u8,
  pub should_quit: bool,
}

impl App {
  pub fn new(root: PathBuf, config: &Config, tx: mpsc::Sender<Event>) -> Self {
    Self {
      browser: Browser::new(root, config, tx),
      input_mode: InputMode::Normal,
      status_message: None,
      status_ticks: 0,
      should_quit: false,
    }
  }

  pub fn update(&mut self, action: Action) -> Result<()> {
    match action {
      Action::Quit => self.should_quit = true,
      Action::MoveUp => self.browser.move_cursor(-1),
      Action::MoveDown => self.browser.move_cursor(1),
      Action::MoveLeft => self.browser.move_left(),
      Action::MoveRight => self.move_right(),
      Action::GoToTop => self.browser.move_to_top(),
      Action::GoToBottom => self.browser.move_to_bottom(),
      Action::GoHome => {
        if let Some(home) = dirs::home_dir() {
          self.browser.change_directory(home);
        }
      }
      Action::ToggleSelect => {
        if let Some((path, selected)) = self.browser.toggle_select() {
          let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
          if selected {
            self.set_status(format!("Selected {name}"));
          } else {
            self.set_status(format!("Deselected {name}"));
          }
          self.browser.move_cursor(1);
        }
      }
      Action::ClearSelection => {
        let count = self.browser.selection.len();
        self.browser.selection.clear();
        self.set_status(format!("Cleared {count} selected"));
      }
      Action::CopyHere => self.start_bulk(BulkOp::Copy),
      Action::MoveHere => self.start_bulk(BulkOp::Move),
      Action::DeleteSelection => {
        let count = self.browser.selection.len();
        if count == 0 {
          self.set_status("Nothing selected".to_string());
        } else {
          self.input_mode = InputMode::ConfirmDelete;
          self.set_status(format!("Delete {count} selected? (y/N)"));
        }
      }
      Action::PromptInput(c) => {
        self.input_mode = InputMode::Normal;
        if c == 'y' && self.browser.start_bulk(BulkOp::Delete) {
          self.set_status("Deleting...".to_string());
        } else {
          self.set_status("Delete cancelled".to_string());
        }
      }
      Action::PromptCancel => {
        self.input_mode = InputMode::Normal;
        self.set_status("Delete cancelled".to_string());
      }
      Action::ToggleHidden => self.browser.toggle_hidden(),
      Action::Reload => self.browser.reload(),
      Action::Resize(_, h) => {
        // Header, status bar and pane borders.
        self.browser.set_bounds(h.saturating_sub(4) as usize);
      }
      Action::Tick => {}
      Action::None => {}
    }
    Ok(())
  }

  fn move_right(&mut self) {
    match self.browser.move_right() {
      RightNav::Entered | RightNav::Blocked => {}
      RightNav::OpenFile(path) => {
        if let Err(e) = open::that_detached(&path) {
          self.set_status(format!("Open failed: {e}"));
        }
      }
    }
  }

  fn start_bulk(&mut self, op: BulkOp) {
    if self.browser.selection.is_empty() {
      self.set_status("Nothing selected".to_string());
    } else if !self.browser.start_bulk(op) {
      self.set_status("An operation is already running".to_string());
    }
  }

  /// A bulk batch finished on its worker thread; settle the browser and
  /// tell the user what happened.
  pub fn finish_ops(&mut self, outcome: OpsOutcome) {
    self.browser.finish_bulk(&outcome);
    match &outcome.result {
      Ok(()) => {
        let noun = if outcome.attempted == 1 { "entry" } else { "entries" };
        self.set_status(format!("{} {} {noun}", outcome.op.verb(), outcome.attempted));
      }
      Err(e) => self.set_status(format!("{} failed: {e}", outcome.op.name())),
    }
  }

  pub fn set_status(&mut self, message: String) {
    self.status_message = Some(message);
    self.status_ticks = STATUS_TICKS;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::path::Path;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::time::Duration;

  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn fixture() -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("triptych_app_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("inner")).unwrap();
    fs::write(dir.join("doomed.txt"), "bye").unwrap();
    dir
  }

  fn new_app(root: &Path) -> (App, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel();
    let app = App::new(root.to_path_buf(), &Config::default(), tx);
    (app, rx)
  }

  fn pump(app: &mut App, rx: &mpsc::Receiver<Event>) {
    while app.browser.is_busy() {
      match rx.recv_timeout(Duration::from_secs(5)).expect("worker went quiet") {
        Event::Loaded(response) => app.browser.handle_load(response),
        Event::Preview(response) => app.browser.handle_preview(response),
        Event::OpsDone(outcome) => app.finish_ops(outcome),
        _ => {}
      }
    }
  }

  #[test]
  fn test_delete_without_selection_reports() {
    let dir = fixture();
    let (mut app, rx) = new_app(&dir);
    pump(&mut app, &rx);

    app.update(Action::DeleteSelection).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message.as_deref(), Some("Nothing selected"));

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_delete_confirm_flow() {
    let dir = fixture();
    let doomed = dir.join("doomed.txt");
    let (mut app, rx) = new_app(&dir);
    pump(&mut app, &rx);

    app.browser.selection.select(doomed.clone());

    app.update(Action::DeleteSelection).unwrap();
    assert_eq!(app.input_mode, InputMode::ConfirmDelete);
    assert_eq!(app.status_message.as_deref(), Some("Delete 1 selected? (y/N)"));

    // Declining leaves everything in place.
    app.update(Action::PromptInput('n')).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(doomed.exists());
    assert!(app.browser.selection.is_selected(&doomed));

    // Confirming runs the batch.
    app.update(Action::DeleteSelection).unwrap();
    app.update(Action::PromptInput('y')).unwrap();
    pump(&mut app, &rx);

    assert!(!doomed.exists());
    assert!(app.browser.selection.is_empty());
    assert_eq!(app.status_message.as_deref(), Some("Deleted 1 entry"));

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_prompt_escape_cancels() {
    let dir = fixture();
    let (mut app, rx) = new_app(&dir);
    pump(&mut app, &rx);

    app.browser.selection.select(dir.join("doomed.txt"));
    app.update(Action::DeleteSelection).unwrap();
    app.update(Action::PromptCancel).unwrap();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(dir.join("doomed.txt").exists());

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_toggle_select_advances_cursor() {
    let dir = fixture();
    let (mut app, rx) = new_app(&dir);
    pump(&mut app, &rx);

    assert_eq!(app.browser.working().cursor(), 0);
    app.update(Action::ToggleSelect).unwrap();
    pump(&mut app, &rx);

    assert_eq!(app.browser.working().cursor(), 1);
    assert!(app.browser.selection.is_selected(&dir.join("inner")));

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_copy_here_duplicates_file() {
    let dir = fixture();
    let (mut app, rx) = new_app(&dir);
    pump(&mut app, &rx);

    app.browser.selection.select(dir.join("doomed.txt"));
    app.update(Action::CopyHere).unwrap();
    pump(&mut app, &rx);

    assert!(dir.join("doomed_copy.txt").exists());
    assert_eq!(app.status_message.as_deref(), Some("Copied 1 entry"));

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_resize_sets_pane_bounds() {
    let dir = fixture();
    let (mut app, rx) = new_app(&dir);
    pump(&mut app, &rx);

    app.update(Action::Resize(80, 30)).unwrap();
    assert_eq!(app.browser.working().rows(), 26);

    let _ = fs::remove_dir_all(&dir);
  }
}
