//! View state: which top-level panel is visible, which results tab is active.
//!
//! Panels are mutually exclusive. Storing the active panel as a single enum
//! value makes "exactly one visible" hold by construction; `is_visible`
//! is the per-panel flag a surface asks for.

use std::fmt;

/// Top-level UI region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Panel {
    #[default]
    Input,
    Loading,
    Error,
    Results,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Input, Panel::Loading, Panel::Error, Panel::Results];
}

/// Presentation of a roadmap inside the results panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Tree,
    Diagram,
    Raw,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Tree, Tab::Diagram, Tab::Raw];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Tree => "Tree",
            Tab::Diagram => "Diagram",
            Tab::Raw => "JSON",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Tree => Tab::Diagram,
            Tab::Diagram => Tab::Raw,
            Tab::Raw => Tab::Tree,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelController {
    active: Panel,
}

impl PanelController {
    /// Show `panel`, hide the rest. Idempotent.
    pub fn show(&mut self, panel: Panel) {
        if self.active != panel {
            tracing::debug!(from = ?self.active, to = ?panel, "panel switch");
        }
        self.active = panel;
    }

    pub fn active(&self) -> Panel {
        self.active
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.active == panel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    /// Activate `tab`; its content region is the only one shown.
    /// Legal in any panel; only visible while Results is.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }
}

/// Combined view state owned by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub panels: PanelController,
    pub tabs: TabController,
}

impl ViewState {
    pub fn active_panel(&self) -> Panel {
        self.panels.active()
    }

    /// Active tab, meaningful only while Results is showing.
    pub fn visible_tab(&self) -> Option<Tab> {
        self.panels
            .is_visible(Panel::Results)
            .then(|| self.tabs.active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_panel_visible() {
        let mut panels = PanelController::default();
        for target in Panel::ALL {
            panels.show(target);
            let visible: Vec<Panel> = Panel::ALL
                .into_iter()
                .filter(|p| panels.is_visible(*p))
                .collect();
            assert_eq!(visible, vec![target]);
        }
    }

    #[test]
    fn show_is_idempotent() {
        let mut panels = PanelController::default();
        panels.show(Panel::Error);
        let once = panels;
        panels.show(Panel::Error);
        assert_eq!(panels, once);
    }

    #[test]
    fn starts_on_input_and_tree() {
        let state = ViewState::default();
        assert_eq!(state.active_panel(), Panel::Input);
        assert_eq!(state.tabs.active(), Tab::Tree);
        assert_eq!(state.visible_tab(), None);
    }

    #[test]
    fn tab_switch_outside_results_is_deferred() {
        let mut state = ViewState::default();
        state.tabs.switch_tab(Tab::Raw);
        assert_eq!(state.visible_tab(), None);
        state.panels.show(Panel::Results);
        assert_eq!(state.visible_tab(), Some(Tab::Raw));
    }

    #[test]
    fn only_one_tab_active() {
        let mut tabs = TabController::default();
        tabs.switch_tab(Tab::Diagram);
        let active: Vec<Tab> = Tab::ALL.into_iter().filter(|t| tabs.is_active(*t)).collect();
        assert_eq!(active, vec![Tab::Diagram]);
    }

    #[test]
    fn tab_cycle() {
        assert_eq!(Tab::Tree.next(), Tab::Diagram);
        assert_eq!(Tab::Raw.next(), Tab::Tree);
        assert_eq!(Tab::Raw.to_string(), "JSON");
    }
}
