mod action;
mod app;
mod browser;
mod collate;
mod config;
mod event;
mod fs;
mod loader;
mod pane;
mod preview;
mod selection;
mod ui;

use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
  EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::App;
use crate::event::{Event, EventLoop, InputMode, map_key};

fn main() -> Result<()> {
  let args: Vec<String> = std::env::args().skip(1).collect();

  let mut show_help = false;
  let mut show_version = false;
  let mut show_init = false;
  let mut show_hidden = false;
  let mut path_arg: Option<String> = None;

  for arg in &args {
    match arg.as_str() {
      "--help" | "-h" => show_help = true,
      "--version" | "-V" => show_version = true,
      "--init" => show_init = true,
      "--all" | "-a" => show_hidden = true,
      a if !a.starts_with('-') => path_arg = Some(a.to_string()),
      _ => {
        eprintln!("triptych: unknown option '{arg}'");
        std::process::exit(1);
      }
    }
  }

  if show_help {
    println!(
      "\
triptych - three-pane terminal file browser

Usage: triptych [options] [path]

Options:
  -a, --all                Show hidden files
  --init                   Write the default config to ~/.config/triptych/
  -h, --help               Print this help message
  -V, --version            Print version

If no path is given, opens the current directory."
    );
    return Ok(());
  }

  if show_version {
    println!("triptych {}", env!("CARGO_PKG_VERSION"));
    return Ok(());
  }

  if show_init {
    let config_path = match config::Config::config_path() {
      Ok(p) => p,
      Err(e) => {
        eprintln!("triptych: {e}");
        std::process::exit(1);
      }
    };
    if config_path.exists() {
      eprintln!("triptych: {} already exists", config_path.display());
      std::process::exit(1);
    }
    if let Err(e) = config::Config::dump_default_config(&config_path) {
      eprintln!("triptych: {e}");
      std::process::exit(1);
    }
    println!("Wrote {}", config_path.display());
    return Ok(());
  }

  let (config, config_errors) = config::Config::load();

  // Restore the terminal before any panic output hits the screen.
  let original_hook = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    let _ = restore_terminal();
    original_hook(info);
  }));

  let root = path_arg
    .map(PathBuf::from)
    .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
  let root = std::fs::canonicalize(root)?;

  setup_terminal()?;
  let backend = CrosstermBackend::new(io::stdout());
  let mut terminal = Terminal::new(backend)?;

  let events = EventLoop::new(Duration::from_millis(config.tick_rate_ms));
  let mut app = App::new(root, &config, events.sender());
  if show_hidden && !app.browser.show_hidden {
    app.browser.toggle_hidden();
  }
  if let Some(first) = config_errors.first() {
    app.set_status(format!("config: {first}"));
  }

  loop {
    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    match events.next()? {
      Event::Key(key) => {
        let action = map_key(key, app.input_mode, &config);
        app.update(action)?;
      }
      Event::Resize(w, h) => {
        app.update(crate::action::Action::Resize(w, h))?;
      }
      Event::Tick => {
        app.update(crate::action::Action::Tick)?;
        // Let status messages fade after a few ticks.
        if app.input_mode == InputMode::Normal {
          if app.status_ticks > 0 {
            app.status_ticks -= 1;
          } else {
            app.status_message = None;
          }
        }
      }
      Event::Loaded(response) => app.browser.handle_load(response),
      Event::Preview(response) => app.browser.handle_preview(response),
      Event::OpsDone(outcome) => app.finish_ops(outcome),
    }

    if app.should_quit {
      break;
    }
  }

  restore_terminal()?;
  Ok(())
}

fn setup_terminal() -> Result<()> {
  enable_raw_mode()?;
  execute!(io::stdout(), EnterAlternateScreen)?;
  Ok(())
}

fn restore_terminal() -> Result<()> {
  disable_raw_mode()?;
  execute!(io::stdout(), LeaveAlternateScreen)?;
  Ok(())
}
