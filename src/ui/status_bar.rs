use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::App;
use crate::event::InputMode;

pub fn render_status_bar(app: &App, area: Rect, buf: &mut Buffer) {
  let line = if app.input_mode == InputMode::ConfirmDelete {
    Line::from(Span::styled(
      format!(" {}", app.status_message.as_deref().unwrap_or("(y/N)")),
      Style::default().fg(Color::Indexed(203)).add_modifier(Modifier::BOLD),
    ))
  } else if let Some(ref msg) = app.status_message {
    Line::from(Span::styled(
      format!(" {msg}"),
      Style::default().fg(Color::Indexed(150)),
    ))
  } else if let Some(snapshot) = app.browser.working().snapshot() {
    let mut spans = Vec::new();
    if let Some(entry) = app.browser.working().current_entry() {
      spans.push(Span::styled(
        format!(" {}", entry.name),
        Style::default().fg(Color::Indexed(252)).add_modifier(Modifier::BOLD),
      ));
    }
    spans.push(Span::styled(
      format!(
        " | {} dirs, {} files",
        snapshot.dir_count, snapshot.file_count
      ),
      Style::default().fg(Color::DarkGray),
    ));
    if !snapshot.is_empty() {
      spans.push(Span::styled(
        format!(
          " | {}/{}",
          app.browser.working().cursor() + 1,
          snapshot.len()
        ),
        Style::default().fg(Color::DarkGray),
      ));
    }
    Line::from(spans)
  } else {
    Line::from(Span::styled(" loading…", Style::default().fg(Color::DarkGray)))
  };

  Paragraph::new(line).render(area, buf);
}
