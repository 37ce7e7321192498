use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent};

use crate::action::Action;
use crate::config::{Config, normalize_key_event};
use crate::fs::ops::OpsOutcome;
use crate::loader::LoadResponse;
use crate::preview::PreviewResponse;

/// Everything the main loop reacts to. Terminal input, load results,
/// preview results and bulk-op completions all funnel through one channel,
/// so every state mutation happens on the same control flow.
pub enum Event {
  Key(KeyEvent),
  Resize(u16, u16),
  Tick,
  Loaded(LoadResponse),
  Preview(PreviewResponse),
  OpsDone(OpsOutcome),
}

pub struct EventLoop {
  tx: mpsc::Sender<Event>,
  rx: mpsc::Receiver<Event>,
}

impl EventLoop {
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::channel();
    let input_tx = tx.clone();

    thread::spawn(move || loop {
      if event::poll(tick_rate).unwrap_or(false) {
        match event::read() {
          Ok(CrosstermEvent::Key(key)) => {
            if input_tx.send(Event::Key(key)).is_err() {
              break;
            }
          }
          Ok(CrosstermEvent::Resize(w, h)) => {
            if input_tx.send(Event::Resize(w, h)).is_err() {
              break;
            }
          }
          _ => {}
        }
      } else if input_tx.send(Event::Tick).is_err() {
        break;
      }
    });

    Self { tx, rx }
  }

  /// Sender handed to worker threads so their results join the same
  /// sequential stream as input.
  pub fn sender(&self) -> mpsc::Sender<Event> {
    self.tx.clone()
  }

  pub fn next(&self) -> Result<Event> {
    Ok(self.rx.recv()?)
  }
}

/// Whether keys feed navigation or the delete-confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
  Normal,
  ConfirmDelete,
}

pub fn map_key(key: KeyEvent, mode: InputMode, config: &Config) -> Action {
  match mode {
    InputMode::ConfirmDelete => match key.code {
      KeyCode::Esc => Action::PromptCancel,
      KeyCode::Char(c) => Action::PromptInput(c),
      _ => Action::None,
    },
    InputMode::Normal => {
      let kb = normalize_key_event(key);
      config.normal_keys.get(&kb).copied().unwrap_or(Action::None)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
      code,
      modifiers: KeyModifiers::NONE,
      kind: KeyEventKind::Press,
      state: KeyEventState::NONE,
    }
  }

  fn key_with_mod(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
      code,
      modifiers,
      kind: KeyEventKind::Press,
      state: KeyEventState::NONE,
    }
  }

  fn cfg() -> Config {
    Config::default()
  }

  #[test]
  fn test_normal_mode_navigation() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('j')), InputMode::Normal, &c), Action::MoveDown);
    assert_eq!(map_key(key(KeyCode::Char('k')), InputMode::Normal, &c), Action::MoveUp);
    assert_eq!(map_key(key(KeyCode::Char('h')), InputMode::Normal, &c), Action::MoveLeft);
    assert_eq!(map_key(key(KeyCode::Char('l')), InputMode::Normal, &c), Action::MoveRight);
    assert_eq!(map_key(key(KeyCode::Down), InputMode::Normal, &c), Action::MoveDown);
    assert_eq!(map_key(key(KeyCode::Up), InputMode::Normal, &c), Action::MoveUp);
  }

  #[test]
  fn test_normal_mode_selection_and_ops() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char(' ')), InputMode::Normal, &c), Action::ToggleSelect);
    assert_eq!(map_key(key(KeyCode::Char('u')), InputMode::Normal, &c), Action::ClearSelection);
    assert_eq!(map_key(key(KeyCode::Char('p')), InputMode::Normal, &c), Action::CopyHere);
    assert_eq!(map_key(key(KeyCode::Char('v')), InputMode::Normal, &c), Action::MoveHere);
    assert_eq!(map_key(key(KeyCode::Char('D')), InputMode::Normal, &c), Action::DeleteSelection);
  }

  #[test]
  fn test_quit_bindings() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Normal, &c), Action::Quit);
    assert_eq!(
      map_key(key_with_mod(KeyCode::Char('c'), KeyModifiers::CONTROL), InputMode::Normal, &c),
      Action::Quit
    );
  }

  #[test]
  fn test_unbound_key_is_none() {
    let c = cfg();
    assert_eq!(map_key(key(KeyCode::Char('z')), InputMode::Normal, &c), Action::None);
  }

  #[test]
  fn test_confirm_mode_passes_chars_through() {
    let c = cfg();
    assert_eq!(
      map_key(key(KeyCode::Char('y')), InputMode::ConfirmDelete, &c),
      Action::PromptInput('y')
    );
    assert_eq!(
      map_key(key(KeyCode::Char('n')), InputMode::ConfirmDelete, &c),
      Action::PromptInput('n')
    );
    assert_eq!(map_key(key(KeyCode::Esc), InputMode::ConfirmDelete, &c), Action::PromptCancel);
    assert_eq!(map_key(key(KeyCode::Enter), InputMode::ConfirmDelete, &c), Action::None);
  }

  #[test]
  fn test_custom_config_remaps_key() {
    let mut c = cfg();
    let kb = crate::config::KeyBinding {
      code: KeyCode::Char('j'),
      modifiers: KeyModifiers::NONE,
    };
    c.normal_keys.insert(kb, Action::Quit);
    assert_eq!(map_key(key(KeyCode::Char('j')), InputMode::Normal, &c), Action::Quit);
  }
}
