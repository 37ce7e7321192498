use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::action::Action;
use crate::pane::DEFAULT_SCROLL_MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
  pub code: KeyCode,
  pub modifiers: KeyModifiers,
}

pub struct Config {
  pub tick_rate_ms: u64,
  pub scroll_margin: usize,
  pub show_hidden: bool,
  pub normal_keys: HashMap<KeyBinding, Action>,
}

#[derive(Deserialize, Default)]
struct TomlConfig {
  general: Option<GeneralConfig>,
  keys: Option<KeysConfig>,
}

#[derive(Deserialize, Default)]
struct GeneralConfig {
  tick_rate_ms: Option<u64>,
  scroll_margin: Option<usize>,
  show_hidden: Option<bool>,
}

#[derive(Deserialize, Default)]
struct KeysConfig {
  normal: Option<HashMap<String, String>>,
}

pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
  if s.is_empty() {
    return None;
  }

  let parts: Vec<&str> = s.split('+').collect();

  if parts.len() == 1 {
    let key = parts[0];
    if let Some(code) = named_key(key) {
      return Some(KeyBinding { code, modifiers: KeyModifiers::NONE });
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() == 1 {
      return Some(KeyBinding { code: KeyCode::Char(chars[0]), modifiers: KeyModifiers::NONE });
    }
    return None;
  }

  if parts.len() == 2 {
    let modifier_str = parts[0].to_lowercase();
    let key_str = parts[1];

    let modifiers = match modifier_str.as_str() {
      "ctrl" => KeyModifiers::CONTROL,
      "alt" => KeyModifiers::ALT,
      "shift" => {
        // Shifted letters arrive as their uppercase char without the
        // modifier bit after normalization.
        let chars: Vec<char> = key_str.chars().collect();
        if chars.len() == 1 {
          let c = chars[0].to_uppercase().next().unwrap_or(chars[0]);
          return Some(KeyBinding { code: KeyCode::Char(c), modifiers: KeyModifiers::NONE });
        }
        if let Some(code) = named_key(key_str) {
          return Some(KeyBinding { code, modifiers: KeyModifiers::SHIFT });
        }
        return None;
      }
      _ => return None,
    };

    if let Some(code) = named_key(key_str) {
      return Some(KeyBinding { code, modifiers });
    }
    let chars: Vec<char> = key_str.chars().collect();
    if chars.len() == 1 {
      return Some(KeyBinding { code: KeyCode::Char(chars[0]), modifiers });
    }
    return None;
  }

  None
}

fn named_key(s: &str) -> Option<KeyCode> {
  match s.to_lowercase().as_str() {
    "enter" => Some(KeyCode::Enter),
    "space" => Some(KeyCode::Char(' ')),
    "esc" => Some(KeyCode::Esc),
    "up" => Some(KeyCode::Up),
    "down" => Some(KeyCode::Down),
    "left" => Some(KeyCode::Left),
    "right" => Some(KeyCode::Right),
    "backspace" => Some(KeyCode::Backspace),
    "delete" => Some(KeyCode::Delete),
    "tab" => Some(KeyCode::Tab),
    "pageup" => Some(KeyCode::PageUp),
    "pagedown" => Some(KeyCode::PageDown),
    _ => None,
  }
}

pub fn normalize_key_event(key: KeyEvent) -> KeyBinding {
  let mut modifiers = key.modifiers;
  if let KeyCode::Char(c) = key.code
    && c.is_uppercase()
  {
    modifiers -= KeyModifiers::SHIFT;
  }
  KeyBinding { code: key.code, modifiers }
}

impl Default for Config {
  fn default() -> Self {
    let mut config = Config::empty();
    let mut errors = Vec::new();
    config.apply_toml_str(Config::default_toml(), &mut errors);
    config
  }
}

impl Config {
  fn empty() -> Self {
    Config {
      tick_rate_ms: 100,
      scroll_margin: DEFAULT_SCROLL_MARGIN,
      show_hidden: false,
      normal_keys: HashMap::new(),
    }
  }

  fn apply_toml_str(&mut self, s: &str, errors: &mut Vec<String>) {
    let toml_config: TomlConfig = match toml::from_str(s) {
      Ok(c) => c,
      Err(e) => {
        errors.push(format!("failed to parse config.toml: {e}"));
        return;
      }
    };

    if let Some(general) = toml_config.general {
      if let Some(tick) = general.tick_rate_ms {
        self.tick_rate_ms = tick;
      }
      if let Some(margin) = general.scroll_margin {
        self.scroll_margin = margin;
      }
      if let Some(hidden) = general.show_hidden {
        self.show_hidden = hidden;
      }
    }

    if let Some(keys) = toml_config.keys
      && let Some(normal) = keys.normal
    {
      self.normal_keys.clear();
      for (key_str, action_str) in &normal {
        let Some(kb) = parse_key_binding(key_str) else {
          errors.push(format!("invalid key binding: {key_str:?}"));
          continue;
        };
        let Some(action) = Action::from_name(action_str) else {
          errors.push(format!("invalid action: {action_str:?}"));
          continue;
        };
        self.normal_keys.insert(kb, action);
      }
    }
  }

  pub fn default_toml() -> &'static str {
    r#"[general]
tick_rate_ms = 100    # event loop tick rate in ms
scroll_margin = 2     # rows kept between cursor and viewport edge
show_hidden = false

[keys.normal]
j = "move_down"
k = "move_up"
h = "move_left"
l = "move_right"
down = "move_down"
up = "move_up"
left = "move_left"
right = "move_right"
enter = "move_right"
g = "go_to_top"
"shift+g" = "go_to_bottom"
"~" = "go_home"
space = "toggle_select"
u = "clear_selection"
p = "copy_here"
v = "move_here"
"shift+d" = "delete_selection"
delete = "delete_selection"
"." = "toggle_hidden"
r = "reload"
q = "quit"
esc = "quit"
"ctrl+c" = "quit"
"#
  }

  pub fn config_path() -> Result<std::path::PathBuf, String> {
    dirs::config_dir()
      .map(|d| d.join("triptych").join("config.toml"))
      .ok_or_else(|| "could not determine config directory".to_string())
  }

  pub fn dump_default_config(path: &std::path::Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }
    std::fs::write(path, Self::default_toml())
      .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(())
  }

  /// Compiled-in defaults overlaid with the user's config file when one
  /// exists. Problems come back as messages, never as a failure to start.
  pub fn load() -> (Config, Vec<String>) {
    let mut config = Config::default();
    let mut errors = Vec::new();

    if let Ok(path) = Self::config_path()
      && path.exists()
    {
      match std::fs::read_to_string(&path) {
        Ok(contents) => config.apply_toml_str(&contents, &mut errors),
        Err(e) => errors.push(format!("failed to read {}: {e}", path.display())),
      }
    }

    (config, errors)
  }
}
