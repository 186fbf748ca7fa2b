use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Screen};
use crate::clock::Clock;
use crate::engine::{Payload, Status, Summary};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match (self.screen(), self.summary()) {
            (Screen::Summary, Some(summary)) => render_summary(summary, area, buf),
            _ => render_typing(self.view(), area, buf),
        }
    }
}

/// Target text styled against the typed text, one `Line` per target line.
pub fn prompt_lines(target: &str, typed: &str) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let correct = bold.fg(Color::Green);
    let incorrect = bold.fg(Color::Red);
    let pending = bold.add_modifier(Modifier::DIM);
    let cursor = pending.add_modifier(Modifier::UNDERLINED);

    let typed: Vec<char> = typed.chars().collect();
    let mut lines = Vec::new();
    let mut spans = Vec::new();

    for (idx, expected) in target.chars().enumerate() {
        let got = typed.get(idx).copied();
        let style = match got {
            Some(t) if t == expected => correct,
            Some(_) => incorrect,
            None if idx == typed.len() => cursor,
            None => pending,
        };
        let shown = match (expected, got) {
            ('\n', _) => "⏎".to_string(),
            (_, Some(t)) if t != expected && t == ' ' => "·".to_string(),
            (_, Some(t)) if t != expected => t.to_string(),
            (c, _) => c.to_string(),
        };
        spans.push(Span::styled(shown, style));

        if expected == '\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    lines.push(Line::from(spans));
    lines
}

pub fn metrics_line(view: &Payload) -> String {
    let m = &view.metrics;
    format!(
        "{:.1}s   {} wpm   {}% acc   {} err",
        m.elapsed_seconds, m.wpm, m.accuracy, m.errors
    )
}

fn render_typing(view: &Payload, area: Rect, buf: &mut Buffer) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let lines = prompt_lines(&view.target_text, &view.typed_text);
    let prompt_height: u16 = view
        .target_text
        .split('\n')
        .map(|l| ((l.width() as f64 / max_chars_per_line as f64).ceil() as u16).max(1))
        .sum();
    let single_line = lines.len() == 1 && view.target_text.width() <= max_chars_per_line as usize;

    let padding = area.height.saturating_sub(prompt_height + 4) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(1), // bank progress
            Constraint::Length(1),
            Constraint::Length(prompt_height),
            Constraint::Length(1),
            Constraint::Length(1), // metrics
            Constraint::Min(0),
            Constraint::Length(1), // help
        ])
        .split(area);

    let progress = view.bank_progress;
    Paragraph::new(Span::styled(
        format!("text {} / {}", progress.position, progress.total),
        dim,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Text::from(lines))
        .alignment(if single_line {
            // short prompts sit centered
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false })
        .render(chunks[3], buf);

    let metrics_style = match view.metrics.status {
        Status::Completed => Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        _ => dim,
    };
    Paragraph::new(Span::styled(metrics_line(view), metrics_style))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    let help = match (view.metrics.status, progress.has_next) {
        (Status::Completed, true) => "(enter) next   (←) repeat   (ctrl-r) restart   (esc) quit",
        (Status::Completed, false) => "(enter) summary   (←) repeat   (ctrl-r) restart   (esc) quit",
        _ => "(←) repeat   (→) skip   (ctrl-r) restart   (esc) quit",
    };
    Paragraph::new(Span::styled(help, italic))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
}

fn render_summary(summary: &Summary, area: Rect, buf: &mut Buffer) {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let footer_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let header = Row::new(vec!["#", "WPM", "Accuracy", "Errors", "Time"]).style(header_style);

    let mut rows: Vec<Row> = summary
        .results
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(format!("#{}", r.index)),
                Cell::from(r.wpm.to_string()),
                Cell::from(format!("{}%", r.accuracy)),
                Cell::from(r.errors.to_string()),
                Cell::from(format!("{:.2}s", r.time)),
            ])
        })
        .collect();

    let avg = summary.averages;
    rows.push(
        Row::new(vec![
            Cell::from("avg"),
            Cell::from(format!("{:.0}", avg.wpm)),
            Cell::from(format!("{:.0}%", avg.accuracy)),
            Cell::from(format!("{:.0}", avg.errors)),
            Cell::from("-"),
        ])
        .style(footer_style),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(format!(
        "Summary: {} of {} texts",
        summary.completed, summary.total
    )));
    table.render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "(enter) new session   (b)ack   (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);
}
