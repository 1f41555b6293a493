//! Roadmap → Mermaid flowchart source.
//!
//! The generator service normally ships this text alongside the roadmap.
//! We build it locally for offline rendering and when a response carries
//! a blank `mermaid` field. Output is fenced (```` ```mermaid ````) like the
//! service's; the diagram bridge strips the fence.

use crate::roadmap::RoadmapDocument;

/// Items per subtopic kept in the diagram.
const MAX_ITEMS: usize = 3;
const MAX_ID_CHARS: usize = 30;
const MAX_ITEM_CHARS: usize = 40;

const ROOT_STYLE: &str = "fill:#6366f1,stroke:#4f46e5,color:#fff";
const PHASE_STYLE: &str = "fill:#fbbf24,stroke:#f59e0b,color:#000";
const TOPIC_STYLE: &str = "fill:#fef3c7,stroke:#fcd34d,color:#000";

/// Make text safe inside a `["..."]` label.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '<' && *c != '>')
        .map(|c| match c {
            '"' => '\'',
            '[' => '(',
            ']' => ')',
            other => other,
        })
        .collect()
}

/// Node id fragment derived from a name.
fn make_id(text: &str) -> String {
    let mut id = String::new();
    for c in text.chars() {
        match c {
            ' ' | '-' | '/' => id.push('_'),
            '&' => id.push_str("and"),
            c if c.is_alphanumeric() || c == '_' => id.push(c),
            _ => {}
        }
    }
    id.chars().take(MAX_ID_CHARS).collect()
}

/// Build fenced Mermaid source for the document.
pub fn render_mermaid(doc: &RoadmapDocument) -> String {
    let mut lines = vec!["```mermaid".to_string(), "flowchart TB".to_string()];

    lines.push(format!(
        "    ROOT[\"{}<br/>{} • {} Weeks\"]",
        sanitize(&doc.domain),
        doc.level,
        doc.weeks_or_default()
    ));
    lines.push(format!("    style ROOT {ROOT_STYLE}"));

    let mut prev_phase = "ROOT".to_string();
    for (p, phase) in doc.phases.iter().enumerate() {
        let phase_id = format!("P{p}_{}", make_id(&phase.name));
        lines.push(format!(
            "    {phase_id}[\"{}<br/>{}\"]",
            sanitize(&phase.weeks),
            sanitize(&phase.name)
        ));
        lines.push(format!("    style {phase_id} {PHASE_STYLE}"));
        lines.push(format!("    {prev_phase} --> {phase_id}"));

        for (t, topic) in phase.topics.iter().enumerate() {
            let topic_id = format!("{phase_id}_T{t}_{}", make_id(&topic.name));
            lines.push(format!("    {topic_id}[\"{}\"]", sanitize(&topic.name)));
            lines.push(format!("    style {topic_id} {TOPIC_STYLE}"));
            lines.push(format!("    {phase_id} --> {topic_id}"));

            for (s, subtopic) in topic.subtopics.iter().enumerate() {
                let sub_id = format!("{topic_id}_S{s}");
                lines.push(format!("    {sub_id}[\"{}\"]", sanitize(&subtopic.name)));
                lines.push(format!("    {topic_id} --> {sub_id}"));

                for (i, item) in subtopic.items.iter().take(MAX_ITEMS).enumerate() {
                    let item_id = format!("{sub_id}_I{i}");
                    let label: String = sanitize(item).chars().take(MAX_ITEM_CHARS).collect();
                    lines.push(format!("    {item_id}[\"{label}\"]"));
                    lines.push(format!("    {sub_id} --> {item_id}"));
                }
            }
        }

        prev_phase = phase_id;
    }

    lines.push("```".into());
    lines.join("\n")
}
