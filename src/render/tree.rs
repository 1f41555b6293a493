//! Roadmap → collapsible tree markup.
//!
//! ```text
//! div.roadmap-tree
//! ├─ div.phase-card            (one per phase)
//! │  ├─ div.phase-header       weeks · name · description?
//! │  └─ div.phase-content
//! │     └─ div.topic-card      data-topic="topic-{p}-{t}"
//! │        ├─ div.topic-header icon · name · toggle#toggle-topic-{p}-{t}
//! │        └─ div.topic-content#topic-{p}-{t}
//! │           └─ div.subtopic-card  name · items-list > span.item-tag*
//! └─ div.flow-arrow            (between phases, never after the last)
//! ```
//!
//! Topic identity is positional. Expand/collapse state is presentational
//! and starts over on every render.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::markup::Element;
use crate::roadmap::{Phase, RoadmapDocument, Subtopic, Topic};

pub const EXPANDED_INDICATOR: &str = "▼";
pub const COLLAPSED_INDICATOR: &str = "▶";
pub const PHASE_CONNECTOR: &str = "⬇️";

/// Positional topic identifier, rendered as `topic-{phase}-{topic}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopicId {
    pub phase: usize,
    pub topic: usize,
}

impl TopicId {
    pub fn new(phase: usize, topic: usize) -> Self {
        Self { phase, topic }
    }

    fn toggle_id(&self) -> String {
        format!("toggle-{self}")
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "topic-{}-{}", self.phase, self.topic)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("not a topic id: '{0}'")]
pub struct BadTopicId(String);

impl FromStr for TopicId {
    type Err = BadTopicId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BadTopicId(s.to_string());
        let rest = s.strip_prefix("topic-").ok_or_else(bad)?;
        let (p, t) = rest.split_once('-').ok_or_else(bad)?;
        Ok(Self {
            phase: p.parse().map_err(|_| bad())?,
            topic: t.parse().map_err(|_| bad())?,
        })
    }
}

/// Rendered tree plus its disclosure map.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeView {
    root: Element,
    expanded: BTreeMap<TopicId, bool>,
}

impl TreeView {
    pub fn markup(&self) -> &Element {
        &self.root
    }

    /// Topic ids in document order.
    pub fn topic_ids(&self) -> Vec<TopicId> {
        self.expanded.keys().copied().collect()
    }

    pub fn is_expanded(&self, id: TopicId) -> Option<bool> {
        self.expanded.get(&id).copied()
    }

    /// Disclosure indicator currently shown for a topic.
    pub fn indicator(&self, id: TopicId) -> Option<String> {
        self.root.find_by_id(&id.toggle_id()).map(Element::text)
    }

    /// Flip a topic between expanded and collapsed.
    ///
    /// Returns the new state, or `None` for an id this render never emitted.
    pub fn toggle_topic(&mut self, id: TopicId) -> Option<bool> {
        let state = self.expanded.get_mut(&id)?;
        *state = !*state;
        let expanded = *state;

        if let Some(content) = self.root.find_by_id_mut(&id.to_string()) {
            if expanded {
                content.remove_attr("hidden");
            } else {
                content.set_attr("hidden", "hidden");
            }
        }
        if let Some(toggle) = self.root.find_by_id_mut(&id.toggle_id()) {
            set_indicator(toggle, expanded);
        }
        tracing::debug!(topic = %id, expanded, "topic toggled");
        Some(expanded)
    }

    pub fn to_html(&self) -> String {
        self.root.to_html()
    }
}

/// Render a roadmap document. Pure: same input, same tree.
pub fn render(doc: &RoadmapDocument) -> TreeView {
    let mut root = Element::div("roadmap-tree");
    let mut expanded = BTreeMap::new();
    let last = doc.phases.len().saturating_sub(1);

    for (p, phase) in doc.phases.iter().enumerate() {
        root.push(phase_card(p, phase, &mut expanded));
        if p < last {
            root.push(Element::div("flow-arrow").with_text(PHASE_CONNECTOR));
        }
    }

    TreeView { root, expanded }
}

fn phase_card(p: usize, phase: &Phase, expanded: &mut BTreeMap<TopicId, bool>) -> Element {
    let mut header = Element::div("phase-header")
        .with_child(Element::span("phase-weeks", format!("📅 {}", phase.weeks)))
        .with_child(Element::span("phase-name", phase.name.clone()));
    if let Some(desc) = phase.description.as_deref().filter(|d| !d.is_empty()) {
        header.push(Element::span("phase-description", desc));
    }

    let mut content = Element::div("phase-content");
    for (t, topic) in phase.topics.iter().enumerate() {
        let id = TopicId::new(p, t);
        expanded.insert(id, true);
        content.push(topic_card(id, topic));
    }

    Element::div("phase-card")
        .with_attr("data-phase", p.to_string())
        .with_child(header)
        .with_child(content)
}

fn topic_card(id: TopicId, topic: &Topic) -> Element {
    let mut toggle = Element::new("button")
        .with_class("topic-toggle")
        .with_attr("id", id.toggle_id());
    set_indicator(&mut toggle, true);

    let header = Element::div("topic-header")
        .with_attr("data-topic", id.to_string())
        .with_child(Element::span("topic-icon", "📚"))
        .with_child(Element::span("topic-name", topic.name.clone()))
        .with_child(toggle);

    let mut content = Element::div("topic-content").with_attr("id", id.to_string());
    for subtopic in &topic.subtopics {
        content.push(subtopic_card(subtopic));
    }

    Element::div("topic-card")
        .with_attr("data-topic", id.to_string())
        .with_child(header)
        .with_child(content)
}

fn subtopic_card(subtopic: &Subtopic) -> Element {
    let mut items = Element::div("items-list");
    for item in &subtopic.items {
        items.push(Element::span("item-tag", item.clone()));
    }
    Element::div("subtopic-card")
        .with_child(Element::div("subtopic-name").with_text(subtopic.name.clone()))
        .with_child(items)
}

fn set_indicator(toggle: &mut Element, expanded: bool) {
    if expanded {
        toggle.set_text(EXPANDED_INDICATOR);
        toggle.set_attr("data-state", "expanded");
    } else {
        toggle.set_text(COLLAPSED_INDICATOR);
        toggle.set_attr("data-state", "collapsed");
    }
}
