//! Key binding dispatch.
//!
//! Ctrl+C quits from anywhere. The rest depends on the visible panel:
//!
//! - Input: type the domain, Tab switches field, Up/Down (or Left/Right on
//!   the level field) picks the level, Enter generates, Esc clears or quits.
//! - Loading: nothing but quit.
//! - Error: r/Enter retries, n starts over, q quits.
//! - Results: 1/2/3 or Tab picks the view, Up/Down moves the topic
//!   highlight (scrolls on the other views), Space/Enter toggles the topic,
//!   d downloads, c copies, n starts over, PgUp/PgDn/Home scroll, q quits.
//!
//! A key that starts a request returns its ticket; the runner spawns it.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::TuiState;
use crate::app::{App, GenerateTicket, InputFocus};
use crate::view::{Panel, Tab};

const PAGE: i32 = 10;

/// Handle a key press. Returns a ticket when a generation should start.
pub fn handle_key(app: &mut App, ui: &mut TuiState, key: KeyEvent, now: Instant) -> Option<GenerateTicket> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        ui.should_quit = true;
        return None;
    }

    match app.active_panel() {
        Panel::Input => input_panel(app, ui, key),
        Panel::Loading => {
            if key.code == KeyCode::Esc {
                ui.should_quit = true;
            }
            None
        }
        Panel::Error => error_panel(app, ui, key),
        Panel::Results => {
            results_panel(app, ui, key, now);
            None
        }
    }
}

/// Bracketed paste goes straight into the domain field.
pub fn handle_paste(app: &mut App, text: &str) {
    if app.active_panel() == Panel::Input {
        app.set_focus(InputFocus::Domain);
        app.domain.insert_str(text);
    }
}

fn input_panel(app: &mut App, ui: &mut TuiState, key: KeyEvent) -> Option<GenerateTicket> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => return start(app, ui),
        KeyCode::Tab | KeyCode::BackTab => app.set_focus(app.focus().toggle()),
        KeyCode::Esc => {
            if app.domain.content().is_empty() {
                ui.should_quit = true;
            } else {
                app.domain.clear();
            }
        }
        KeyCode::Up => app.level = app.level.prev(),
        KeyCode::Down => app.level = app.level.next(),
        _ if app.focus() == InputFocus::Level => match key.code {
            KeyCode::Left => app.level = app.level.prev(),
            KeyCode::Right | KeyCode::Char(' ') => app.level = app.level.next(),
            _ => {}
        },
        KeyCode::Char('v') if ctrl => match ui.clipboard.get_text() {
            Ok(text) => app.domain.insert_str(&text),
            Err(e) => tracing::debug!(error = %e, "paste unavailable"),
        },
        KeyCode::Char('w') if ctrl => app.domain.delete_word_back(),
        KeyCode::Backspace if ctrl => app.domain.delete_word_back(),
        KeyCode::Char(ch) if !ctrl => app.domain.insert_char(ch),
        KeyCode::Backspace => app.domain.delete_back(),
        KeyCode::Delete => app.domain.delete_forward(),
        KeyCode::Left => app.domain.move_left(),
        KeyCode::Right => app.domain.move_right(),
        KeyCode::Home => app.domain.move_home(),
        KeyCode::End => app.domain.move_end(),
        _ => {}
    }
    None
}

fn error_panel(app: &mut App, ui: &mut TuiState, key: KeyEvent) -> Option<GenerateTicket> {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => start(app, ui),
        KeyCode::Char('n') => {
            app.start_new();
            ui.reset_results();
            None
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            ui.should_quit = true;
            None
        }
        _ => None,
    }
}

fn results_panel(app: &mut App, ui: &mut TuiState, key: KeyEvent, now: Instant) {
    let tab = app.view().tabs.active();
    match key.code {
        KeyCode::Char('1') => show_tab(app, ui, Tab::Tree),
        KeyCode::Char('2') => show_tab(app, ui, Tab::Diagram),
        KeyCode::Char('3') => show_tab(app, ui, Tab::Raw),
        KeyCode::Tab => show_tab(app, ui, tab.next()),
        KeyCode::Up | KeyCode::Char('k') => {
            if tab == Tab::Tree {
                ui.selected = ui.selected.saturating_sub(1);
            } else {
                ui.scroll_by(-1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if tab == Tab::Tree {
                let count = app.results().map_or(0, |r| r.tree.topic_ids().len());
                ui.selected = (ui.selected + 1).min(count.saturating_sub(1));
            } else {
                ui.scroll_by(1);
            }
        }
        KeyCode::Char(' ') | KeyCode::Enter if tab == Tab::Tree => {
            if let Some(id) = ui.selected_topic(app) {
                app.toggle_topic(id);
            }
        }
        KeyCode::PageUp => ui.scroll_by(-PAGE),
        KeyCode::PageDown => ui.scroll_by(PAGE),
        KeyCode::Home => ui.scroll = 0,
        KeyCode::Char('d') => {
            ui.status = app
                .download(now)
                .map(|path| format!("Saved to {}", path.display()));
        }
        KeyCode::Char('c') => {
            app.copy(now);
        }
        KeyCode::Char('n') => {
            app.start_new();
            ui.reset_results();
        }
        KeyCode::Char('q') | KeyCode::Esc => ui.should_quit = true,
        _ => {}
    }
}

fn show_tab(app: &mut App, ui: &mut TuiState, tab: Tab) {
    app.switch_tab(tab);
    ui.scroll = 0;
}

fn start(app: &mut App, ui: &mut TuiState) -> Option<GenerateTicket> {
    match app.begin_generate() {
        Ok(ticket) => {
            ui.reset_results();
            Some(ticket)
        }
        Err(e) => {
            tracing::debug!(error = %e, "generation not started");
            None
        }
    }
}
