use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::fs::{Entry, EntryKind};
use crate::pane::{Pane, PaneView};
use crate::selection::Selection;

pub fn render_pane(pane: &Pane, selection: &Selection, area: Rect, buf: &mut Buffer, active: bool) {
  let border_color = if active { Color::Indexed(75) } else { Color::Indexed(238) };
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border_color));
  let inner = block.inner(area);
  block.render(area, buf);

  match pane.view() {
    PaneView::Empty => {}
    PaneView::Errored(err) => {
      Paragraph::new(Line::from(Span::styled(
        format!(" {err}"),
        Style::default().fg(Color::Indexed(203)),
      )))
      .render(inner, buf);
    }
    PaneView::Loaded(snapshot) => {
      if snapshot.is_empty() {
        Paragraph::new(Line::from(Span::styled(
          " empty",
          Style::default().fg(Color::DarkGray),
        )))
        .render(inner, buf);
        return;
      }

      let cursor_row = pane.selected_row();
      let mut lines: Vec<Line> = Vec::with_capacity(inner.height as usize);
      for (row, entry) in pane.visible().iter().enumerate() {
        lines.push(entry_line(
          entry,
          selection.is_selected(&entry.path()),
          row == cursor_row,
          active,
          inner.width as usize,
        ));
      }
      Paragraph::new(lines).render(inner, buf);
    }
  }
}

fn entry_line(
  entry: &Entry,
  selected: bool,
  under_cursor: bool,
  active: bool,
  width: usize,
) -> Line<'static> {
  let marker = if selected { "▎" } else { " " };
  let suffix = match entry.kind {
    EntryKind::Symlink => "@",
    _ if entry.is_dir => "/",
    _ => "",
  };
  let name_width = width.saturating_sub(marker.width() + suffix.width() + 1);
  let name = truncate_name(&entry.name, name_width);

  let base = if entry.is_dir {
    Style::default().fg(Color::Indexed(75)).add_modifier(Modifier::BOLD)
  } else if entry.kind == EntryKind::Symlink {
    Style::default().fg(Color::Indexed(87))
  } else {
    Style::default().fg(Color::Indexed(252))
  };
  let style = if under_cursor && active {
    Style::default()
      .fg(Color::Indexed(234))
      .bg(Color::Indexed(75))
      .add_modifier(Modifier::BOLD)
  } else if under_cursor {
    Style::default().fg(Color::Indexed(252)).bg(Color::Indexed(240))
  } else {
    base
  };
  let marker_style = if selected {
    Style::default().fg(Color::Indexed(214))
  } else {
    style
  };

  Line::from(vec![
    Span::styled(marker.to_string(), marker_style),
    Span::styled(format!("{name}{suffix}"), style),
  ])
}

/// Cut a name down to `max_width` terminal cells, ellipsized. Width-aware
/// so double-width characters never overflow the pane.
pub fn truncate_name(name: &str, max_width: usize) -> String {
  if name.width() <= max_width {
    return name.to_string();
  }
  if max_width == 0 {
    return String::new();
  }
  let mut out = String::new();
  let mut used = 0;
  for c in name.chars() {
    let w = c.width().unwrap_or(0);
    if used + w > max_width.saturating_sub(1) {
      break;
    }
    out.push(c);
    used += w;
  }
  out.push('…');
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_name_unchanged() {
    assert_eq!(truncate_name("short.txt", 20), "short.txt");
  }

  #[test]
  fn test_truncate_long_name_ellipsized() {
    let out = truncate_name("a_very_long_file_name.txt", 10);
    assert!(out.ends_with('…'));
    assert!(out.width() <= 10);
  }

  #[test]
  fn test_truncate_wide_chars_respects_cells() {
    let out = truncate_name("日本語のファイル名.txt", 8);
    assert!(out.width() <= 8);
  }

  #[test]
  fn test_truncate_zero_width() {
    assert_eq!(truncate_name("anything", 0), "");
  }
}
