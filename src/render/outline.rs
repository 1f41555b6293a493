//! Roadmap → plain-text outline with box-drawing connectors.
//!
//! Printed by `generate`/`render --format outline`.
//!
//! ```text
//! 🧭 Rust Roadmap (Beginner) - 12 Weeks
//! ======================================================================
//!
//! 📅 Week 1-3 | Foundations
//!    └─ Core basics
//!
//!    ├─ 📚 Syntax
//!    │  └─ 📌 Ownership
//!    │     ├─ Borrowing
//!    │     └─ Lifetimes
//!    └─ 📚 Tooling
//!       └─ 📌 Cargo
//!          └─ Workspaces
//!
//!          ⬇️
//! ```

use crate::roadmap::RoadmapDocument;

const RULE_WIDTH: usize = 70;

fn branch(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}

/// Render the whole document as outline text (no trailing newline).
pub fn render_outline(doc: &RoadmapDocument) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        "🧭 {} Roadmap ({}) - {} Weeks",
        doc.domain,
        doc.level,
        doc.weeks_or_default()
    ));
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(String::new());

    let phase_count = doc.phases.len();
    for (p, phase) in doc.phases.iter().enumerate() {
        lines.push(format!("📅 {} | {}", phase.weeks, phase.name));
        if let Some(desc) = phase.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("   └─ {desc}"));
        }
        lines.push(String::new());

        let topic_count = phase.topics.len();
        for (t, topic) in phase.topics.iter().enumerate() {
            let last_topic = t + 1 == topic_count;
            let topic_rail = if last_topic { "   " } else { "   │" };
            lines.push(format!("   {} 📚 {}", branch(last_topic), topic.name));

            let sub_count = topic.subtopics.len();
            for (s, subtopic) in topic.subtopics.iter().enumerate() {
                let last_sub = s + 1 == sub_count;
                // Pad the rail to the subtopic column.
                let sub_indent = format!("{topic_rail:<6}");
                lines.push(format!("{sub_indent}{} 📌 {}", branch(last_sub), subtopic.name));

                let item_indent = if last_sub {
                    format!("{sub_indent}   ")
                } else {
                    format!("{sub_indent}│  ")
                };
                let item_count = subtopic.items.len();
                for (i, item) in subtopic.items.iter().enumerate() {
                    lines.push(format!("{item_indent}{} {item}", branch(i + 1 == item_count)));
                }
            }
        }

        lines.push(String::new());
        if p + 1 < phase_count {
            lines.push("         ⬇️".into());
            lines.push(String::new());
        }
    }

    lines.join("\n")
}
