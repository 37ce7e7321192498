pub mod pane;
pub mod status_bar;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App) {
  let area = frame.area();

  // Vertical layout: header, panes, status bar
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(3),    // panes
      Constraint::Length(1), // status bar
    ])
    .split(area);

  render_header(app, chunks[0], frame.buffer_mut());

  let columns = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage(20),
      Constraint::Percentage(40),
      Constraint::Percentage(40),
    ])
    .split(chunks[1]);

  // Keep viewport arithmetic in step with the real terminal size.
  app.browser.set_bounds(columns[1].height.saturating_sub(2) as usize);

  pane::render_pane(app.browser.parent_pane(), &app.browser.selection, columns[0], frame.buffer_mut(), false);
  pane::render_pane(app.browser.working(), &app.browser.selection, columns[1], frame.buffer_mut(), true);

  if let Some(preview) = app.browser.preview() {
    render_preview(preview, columns[2], frame.buffer_mut());
  } else {
    pane::render_pane(app.browser.child_pane(), &app.browser.selection, columns[2], frame.buffer_mut(), false);
  }

  status_bar::render_status_bar(app, chunks[2], frame.buffer_mut());
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
  let path_str = app
    .browser
    .working_path()
    .map(|p| p.to_string_lossy().to_string())
    .unwrap_or_default();

  let mut spans = vec![
    Span::styled(" ", Style::default()),
    Span::styled(
      path_str,
      Style::default().fg(Color::Indexed(252)).add_modifier(Modifier::BOLD),
    ),
  ];
  let selected = app.browser.selection.len();
  if selected > 0 {
    spans.push(Span::styled(
      format!("  [{selected} selected]"),
      Style::default().fg(Color::Indexed(214)),
    ));
  }
  if app.browser.is_busy() {
    spans.push(Span::styled("  …", Style::default().fg(Color::DarkGray)));
  }

  Paragraph::new(Line::from(spans)).render(area, buf);
}

fn render_preview(preview: &crate::preview::FilePreview, area: Rect, buf: &mut Buffer) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Indexed(238)));
  let inner = block.inner(area);
  block.render(area, buf);

  if preview.binary {
    Paragraph::new(Line::from(Span::styled(
      " binary file",
      Style::default().fg(Color::DarkGray),
    )))
    .render(inner, buf);
    return;
  }

  let lines: Vec<Line> = preview
    .lines
    .iter()
    .take(inner.height as usize)
    .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(Color::Indexed(250)))))
    .collect();
  Paragraph::new(lines).render(inner, buf);
}
