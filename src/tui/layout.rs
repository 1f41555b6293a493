//! Panel layout.
//!
//! ```text
//! ┌─ 🧭 Roadmap Generator ──────────────────────┐
//! │                                              │
//! │  (the one visible panel)                     │
//! │                                              │
//! └──────────────────────────────────────────────┘
//!  status / key hints
//! ```
//!
//! The results panel stacks a header, a tab bar and the active view.

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::tree_lines::tree_lines;
use super::TuiState;
use crate::app::export::ExportControl;
use crate::app::{App, InputFocus};
use crate::diagram::DiagramSurface;
use crate::roadmap::Level;
use crate::view::{Panel, Tab};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Dark background for fixed-width blocks (diagram, JSON).
const BLOCK_BG: Color = Color::Rgb(30, 30, 36);

pub fn draw(f: &mut Frame, app: &App, ui: &mut TuiState, now: Instant) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let frame = Block::default()
        .title(" 🧭 Roadmap Generator ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = frame.inner(outer[0]);
    f.render_widget(frame, outer[0]);

    match app.active_panel() {
        Panel::Input => draw_input(f, app, inner),
        Panel::Loading => draw_loading(f, ui, inner),
        Panel::Error => draw_error(f, app, inner),
        Panel::Results => draw_results(f, app, ui, inner, now),
    }
    draw_status(f, app, ui, outer[1]);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // prompt
            Constraint::Length(3), // domain field
            Constraint::Length(1), // inline error
            Constraint::Length(1), // spacer
            Constraint::Length(3), // level selector
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new("What do you want to learn? Enter an engineering domain and pick a level."),
        rows[0],
    );

    let focused = |focus| {
        if app.focus() == focus {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let domain_block = Block::default()
        .title(" Domain ")
        .borders(Borders::ALL)
        .border_style(focused(InputFocus::Domain));
    let domain_inner = domain_block.inner(rows[1]);
    f.render_widget(domain_block, rows[1]);
    if app.domain.content().is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "e.g. Backend Engineering",
                Style::default().fg(Color::DarkGray),
            )),
            domain_inner,
        );
    } else {
        f.render_widget(Paragraph::new(app.domain.content().to_string()), domain_inner);
    }
    if app.focus() == InputFocus::Domain {
        let before: String = app.domain.content().chars().take(app.domain.cursor()).collect();
        let cx = (before.width() as u16).min(domain_inner.width.saturating_sub(1));
        f.set_cursor_position(Position::new(domain_inner.x + cx, domain_inner.y));
    }

    if let Some(message) = app.input_error() {
        f.render_widget(
            Paragraph::new(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
            rows[2],
        );
    }

    let level_block = Block::default()
        .title(" Level ")
        .borders(Borders::ALL)
        .border_style(focused(InputFocus::Level));
    let level_inner = level_block.inner(rows[4]);
    f.render_widget(level_block, rows[4]);
    let spans: Vec<Span> = Level::ALL
        .iter()
        .flat_map(|level| {
            let style = if *level == app.level {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {level} "), style), Span::raw(" ")]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), level_inner);
}

fn draw_loading(f: &mut Frame, ui: &TuiState, area: Rect) {
    let frame = SPINNER[ui.spinner % SPINNER.len()];
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{frame} Generating your roadmap..."),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "This can take a little while.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(text).centered(), area);
}

fn draw_error(f: &mut Frame, app: &App, area: Rect) {
    let message = app.error_message().unwrap_or_default();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("❌ {message}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[r] ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Try again   "),
            Span::styled("[n] ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("New roadmap"),
        ]),
    ];
    f.render_widget(
        Paragraph::new(text).centered().wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_results(f: &mut Frame, app: &App, ui: &mut TuiState, area: Rect, now: Instant) {
    let Some(results) = app.results() else {
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // level + weeks
            Constraint::Length(1), // tab bar
            Constraint::Min(3),    // content
            Constraint::Length(1), // export controls
        ])
        .split(area);

    let header = &results.header;
    f.render_widget(
        Paragraph::new(Span::styled(
            header.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", header.level),
                Style::default().fg(Color::Black).bg(Color::Magenta),
            ),
            Span::raw("  "),
            Span::styled(header.weeks.clone(), Style::default().fg(Color::Cyan)),
        ])),
        rows[1],
    );
    draw_tab_bar(f, app.view().tabs.active(), rows[2]);

    let content = rows[3];
    ui.viewport = content.height;
    let body: Vec<Line> = match app.view().tabs.active() {
        Tab::Tree => {
            let selected = ui.selected_topic(app);
            let out = tree_lines(results.tree.markup(), selected);
            if let Some(row) = selected.and_then(|id| out.row_of(id)) {
                ui.follow(row as u16);
            }
            out.lines
        }
        Tab::Diagram => match app.diagram() {
            DiagramSurface::Rendered(text) => text.lines().map(|l| Line::from(l.to_string())).collect(),
            DiagramSurface::Fallback(message) => vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))],
            DiagramSurface::Empty => vec![Line::from(Span::styled(
                "No diagram",
                Style::default().fg(Color::DarkGray),
            ))],
        },
        Tab::Raw => results
            .raw
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect(),
    };
    let style = match app.view().tabs.active() {
        Tab::Tree => Style::default(),
        Tab::Diagram | Tab::Raw => Style::default().bg(BLOCK_BG),
    };
    f.render_widget(
        Paragraph::new(body).style(style).scroll((ui.scroll, 0)),
        content,
    );

    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[d] ", key),
            Span::raw(app.export_label(ExportControl::Download, now)),
            Span::raw("   "),
            Span::styled("[c] ", key),
            Span::raw(app.export_label(ExportControl::Copy, now)),
            Span::raw("   "),
            Span::styled("[n] ", key),
            Span::raw("New roadmap"),
        ])),
        rows[4],
    );
}

fn draw_tab_bar(f: &mut Frame, active: Tab, area: Rect) {
    let spans: Vec<Span> = Tab::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, tab)| {
            let style = if *tab == active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::raw(" "), Span::styled(format!("[{} {}]", i + 1, tab.label()), style)]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status(f: &mut Frame, app: &App, ui: &TuiState, area: Rect) {
    let hints = match app.active_panel() {
        Panel::Input => "Enter: generate  Tab: field  ↑/↓: level  Esc: clear/quit",
        Panel::Loading => "Ctrl+C: quit",
        Panel::Error => "r: retry  n: new  q: quit",
        Panel::Results => "1/2/3: view  ↑/↓: topic  Space: expand/collapse  PgUp/PgDn: scroll  q: quit",
    };
    let line = match &ui.status {
        Some(status) => Line::from(vec![
            Span::styled(status.clone(), Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled(hints, Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(line), area);
}
