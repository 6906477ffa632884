use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::store::label;

use super::app::{AppState, LoadPicker, Mode, StatusKind};

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_SELECTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);
const COLOR_BORDER_DONE: Color = Color::Rgb(180, 156, 92);

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_title(frame, chunks[0]);
    render_input(frame, app, chunks[1]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[2]);
    render_pending(frame, app, panes[0]);
    render_completed(frame, app, panes[1]);

    render_footer(frame, app, chunks[3]);

    if app.mode == Mode::LoadPicker {
        render_load_modal(frame, area, &app.picker);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "\u{2714} TO-DO LIST",
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, app: &AppState, area: Rect) {
    let editing = app.mode == Mode::Input;
    let line = if editing {
        Line::from(vec![
            Span::styled(app.input.clone(), Style::default().fg(COLOR_TEXT)),
            Span::styled("_", Style::default().fg(COLOR_INFO)),
        ])
    } else {
        Line::from(Span::styled(
            "press a to add a task",
            Style::default().fg(COLOR_MUTED_DARK),
        ))
    };
    let border = if editing { COLOR_INFO } else { COLOR_MUTED_DARK };
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Enter Task")
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(widget, area);
}

fn render_pending(frame: &mut Frame, app: &AppState, area: Rect) {
    let pending = app.store.pending();
    let content_width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;
    let selected = app.store.selected();

    let mut lines = Vec::new();
    if pending.is_empty() {
        lines.push(Line::from(Span::styled(
            "No tasks",
            Style::default().fg(COLOR_MUTED),
        )));
    } else {
        let (start, end) = list_window(pending.len(), Some(selected), height);
        for (idx, task) in pending.iter().enumerate().take(end).skip(start) {
            let text = truncate_text(&label(idx, task), content_width.saturating_sub(2));
            let line = if idx == selected {
                Line::from(vec![
                    Span::styled("> ", Style::default().fg(COLOR_ACCENT)),
                    Span::styled(
                        text,
                        Style::default()
                            .fg(COLOR_TEXT)
                            .bg(COLOR_BG_SELECTED)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(text, Style::default().fg(COLOR_TEXT)),
                ])
            };
            lines.push(line);
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Tasks-to-complete ({})", pending.len()))
            .border_style(Style::default().fg(COLOR_BORDER_LIST)),
    );
    frame.render_widget(widget, area);
}

fn render_completed(frame: &mut Frame, app: &AppState, area: Rect) {
    let labels = app.store.completed_labels();
    let content_width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;

    let mut lines = Vec::new();
    if labels.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing completed yet",
            Style::default().fg(COLOR_MUTED),
        )));
    } else {
        let (start, end) = list_window(labels.len(), None, height);
        for text in &labels[start..end] {
            lines.push(Line::from(Span::styled(
                truncate_text(text, content_width),
                Style::default().fg(COLOR_SUCCESS),
            )));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Completed Tasks ({})", labels.len()))
            .border_style(Style::default().fg(COLOR_BORDER_DONE)),
    );
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status.to_string(), status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.count_summary(),
        Style::default().fg(COLOR_ACCENT),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        );
    frame.render_widget(widget, area);
}

fn render_load_modal(frame: &mut Frame, area: Rect, picker: &LoadPicker) {
    let content_width = area.width.saturating_sub(8).min(48);
    let list_height = picker.files.len().min(12) as u16;
    let modal = centered_rect(content_width, list_height + 4, area);
    frame.render_widget(Clear, modal);

    let inner_width = (content_width as usize).saturating_sub(4);
    let (start, end) = list_window(
        picker.files.len(),
        Some(picker.selected),
        modal.height.saturating_sub(4) as usize,
    );
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, file) in picker.files.iter().enumerate().take(end).skip(start) {
        let text = truncate_text(file, inner_width);
        if idx == picker.selected {
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(COLOR_ACCENT)),
                Span::styled(
                    text,
                    Style::default()
                        .fg(COLOR_TEXT)
                        .bg(COLOR_BG_SELECTED)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(text, Style::default().fg(COLOR_TEXT)),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter load  esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Load Tasks"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Visible `[start, end)` slice of a list that keeps `selected` in view.
fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}
