//! Terminal surface for the roadmap viewer.
//!
//! The library core (`app`, `view`, `render`) knows nothing about the
//! terminal. This module binds it to ratatui/crossterm: `runner` owns the
//! event loop, `input` maps keys to orchestrator calls, `layout` draws the
//! visible panel, `tree_lines` turns the markup tree into styled lines.
//!
//! Everything here is per-frame state that the core has no use for:
//! which topic row is highlighted, scroll offset, spinner phase.

pub mod input;
pub mod layout;
pub mod runner;
pub mod tree_lines;

use crate::app::export::SystemClipboard;
use crate::app::App;
use crate::render::tree::TopicId;

/// Surface-only state kept across frames.
#[derive(Default)]
pub struct TuiState {
    /// Index into the tree's topic ids.
    pub selected: usize,
    /// Vertical scroll of the results content.
    pub scroll: u16,
    /// Rows available to the results content on the last frame.
    pub viewport: u16,
    pub spinner: usize,
    /// One-line note in the status bar (e.g. where a download landed).
    pub status: Option<String>,
    pub should_quit: bool,
    pub clipboard: SystemClipboard,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Topic under the highlight, if results are showing.
    pub fn selected_topic(&self, app: &App) -> Option<TopicId> {
        app.results()?.tree.topic_ids().get(self.selected).copied()
    }

    /// Called when a fresh roadmap (or none) replaces the old one.
    pub fn reset_results(&mut self) {
        self.selected = 0;
        self.scroll = 0;
        self.status = None;
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.scroll) + delta;
        self.scroll = next.clamp(0, i32::from(u16::MAX)) as u16;
    }

    /// Keep `row` inside the viewport.
    pub fn follow(&mut self, row: u16) {
        if row < self.scroll {
            self.scroll = row;
        } else if self.viewport > 0 && row >= self.scroll + self.viewport {
            self.scroll = row + 1 - self.viewport;
        }
    }
}
