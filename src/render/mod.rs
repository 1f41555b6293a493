//! Roadmap renderers.
//!
//! - `tree`: collapsible markup tree (the results view)
//! - `outline`: box-drawing text outline
//! - `mermaid`: flowchart source for the diagram view
//!
//! All three are pure functions of the document.

pub mod markup;
pub mod mermaid;
pub mod outline;
pub mod tree;

use crate::roadmap::RoadmapDocument;

/// Results header: title, level badge, duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapHeader {
    pub title: String,
    pub level: String,
    pub weeks: String,
}

impl RoadmapHeader {
    pub fn from_doc(doc: &RoadmapDocument) -> Self {
        Self {
            title: doc.title(),
            level: doc.level.to_string(),
            weeks: format!("{} Weeks", doc.weeks_or_default()),
        }
    }
}

/// Full HTML page for the tree view (used by `--format html`).
pub fn html_document(doc: &RoadmapDocument) -> String {
    let header = RoadmapHeader::from_doc(doc);
    let tree = tree::render(doc);
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1 class=\"roadmap-title\">{title}</h1>\n<span class=\"roadmap-level\">{level}</span> <span class=\"total-weeks\">{weeks}</span>\n{tree}\n</body></html>\n",
        title = markup::escape_html(&header.title),
        level = markup::escape_html(&header.level),
        weeks = markup::escape_html(&header.weeks),
        tree = tree.to_html(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::fixtures::sample;

    #[test]
    fn header_from_doc() {
        let header = RoadmapHeader::from_doc(&sample());
        assert_eq!(header.title, "🧭 Backend Engineering Roadmap");
        assert_eq!(header.level, "Beginner");
        assert_eq!(header.weeks, "12 Weeks");
    }

    #[test]
    fn html_document_escapes_title() {
        let mut doc = sample();
        doc.domain = "<b>Evil</b>".into();
        let html = html_document(&doc);
        assert!(html.contains("🧭 &lt;b&gt;Evil&lt;/b&gt; Roadmap"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("class=\"roadmap-tree\""));
    }
}
