//! Markup tree → styled terminal lines.
//!
//! Walks the element classes the tree renderer emits. Collapsed topic
//! content (the `hidden` attribute) is skipped, so the terminal view
//! follows the same disclosure state as the HTML view.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::render::markup::Element;
use crate::render::tree::TopicId;

/// Lines plus the row each topic header landed on.
#[derive(Debug, Default)]
pub struct TreeLines {
    pub lines: Vec<Line<'static>>,
    pub topic_rows: Vec<(TopicId, usize)>,
}

impl TreeLines {
    pub fn row_of(&self, id: TopicId) -> Option<usize> {
        self.topic_rows
            .iter()
            .find(|(t, _)| *t == id)
            .map(|(_, row)| *row)
    }
}

pub fn tree_lines(root: &Element, selected: Option<TopicId>) -> TreeLines {
    let mut out = TreeLines::default();
    for child in root.child_elements() {
        match child.class {
            Some("phase-card") => phase(child, selected, &mut out),
            Some("flow-arrow") => out.lines.push(Line::from(Span::styled(
                format!("  {}", child.text()),
                Style::default().fg(Color::DarkGray),
            ))),
            _ => {}
        }
    }
    out
}

fn phase(card: &Element, selected: Option<TopicId>, out: &mut TreeLines) {
    if let Some(header) = card.child_with_class("phase-header") {
        let text_of = |class| header.child_with_class(class).map(Element::text);
        let mut spans = Vec::new();
        if let Some(weeks) = text_of("phase-weeks") {
            spans.push(Span::styled(
                weeks,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw("  "));
        }
        if let Some(name) = text_of("phase-name") {
            spans.push(Span::styled(name, Style::default().add_modifier(Modifier::BOLD)));
        }
        out.lines.push(Line::from(spans));
        if let Some(desc) = text_of("phase-description") {
            out.lines.push(Line::from(Span::styled(
                format!("   {desc}"),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }

    let Some(content) = card.child_with_class("phase-content") else {
        return;
    };
    for topic_card in content.child_elements() {
        topic(topic_card, selected, out);
    }
}

fn topic(card: &Element, selected: Option<TopicId>, out: &mut TreeLines) {
    let id = card.attr("data-topic").and_then(|s| s.parse::<TopicId>().ok());
    let Some(header) = card.child_with_class("topic-header") else {
        return;
    };
    let text_of = |class| {
        header
            .child_with_class(class)
            .map(Element::text)
            .unwrap_or_default()
    };

    let is_selected = id.is_some() && id == selected;
    let base = if is_selected {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    };
    let marker = if is_selected { "› " } else { "  " };
    if let Some(id) = id {
        out.topic_rows.push((id, out.lines.len()));
    }
    out.lines.push(Line::from(vec![
        Span::styled(format!("{marker}{} ", text_of("topic-toggle")), base),
        Span::styled(format!("{} ", text_of("topic-icon")), base),
        Span::styled(text_of("topic-name"), base.add_modifier(Modifier::BOLD)),
    ]));

    let Some(content) = card.child_with_class("topic-content") else {
        return;
    };
    if content.has_attr("hidden") {
        return;
    }
    for sub in content.child_elements() {
        subtopic(sub, out);
    }
}

fn subtopic(card: &Element, out: &mut TreeLines) {
    if let Some(name) = card.child_with_class("subtopic-name") {
        out.lines.push(Line::from(Span::styled(
            format!("      📌 {}", name.text()),
            Style::default().fg(Color::Yellow),
        )));
    }
    let Some(items) = card.child_with_class("items-list") else {
        return;
    };
    let mut spans = vec![Span::raw("         ")];
    for item in items.child_elements() {
        spans.push(Span::styled(
            format!(" {} ", item.text()),
            Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 36)),
        ));
        spans.push(Span::raw(" "));
    }
    if spans.len() > 1 {
        out.lines.push(Line::from(spans));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tree::render;
    use crate::roadmap::fixtures::sample;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn expanded_tree_lists_everything() {
        let view = render(&sample());
        let out = tree_lines(view.markup(), None);
        let text = plain(&out.lines);

        assert_eq!(text[0], "📅 Week 1-3  Foundations");
        assert_eq!(text[1], "   Core basics");
        assert_eq!(text[2], "  ▼ 📚 HTTP");
        assert_eq!(text[3], "      📌 Methods");
        assert_eq!(text[4], "          GET   POST  ");
        assert_eq!(text.iter().filter(|l| l.contains("⬇️")).count(), 1);
        assert_eq!(out.topic_rows.len(), 3);
    }

    #[test]
    fn collapsed_topic_hides_subtopics() {
        let mut view = render(&sample());
        view.toggle_topic(TopicId::new(0, 0));
        let text = plain(&tree_lines(view.markup(), None).lines);

        assert_eq!(text[2], "  ▶ 📚 HTTP");
        assert!(!text.iter().any(|l| l.contains("Methods")));
        assert!(text.iter().any(|l| l.contains("SQL")));
    }

    #[test]
    fn selection_marks_row() {
        let view = render(&sample());
        let id = TopicId::new(0, 1);
        let out = tree_lines(view.markup(), Some(id));
        let row = out.row_of(id).unwrap();
        let text = plain(&out.lines);
        assert!(text[row].starts_with("› ▼ 📚 Databases"));
        assert_eq!(text.iter().filter(|l| l.starts_with('›')).count(), 1);
    }
}
