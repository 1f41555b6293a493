//! Built-in diagram engine: flowchart graph → box-drawing outline.
//!
//! Roots (nodes without incoming edges) are boxed; everything reachable
//! hangs below them as a tree. A node reached a second time is printed
//! once more with `↺` and not expanded again, so cycles terminate.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::box_drawing::{boxed, strip_vs16};
use super::parser::{parse_flowchart, Edge, EdgeStyle, Flowchart};
use super::{DiagramEngine, DiagramError};

/// Renders Mermaid flowchart source as terminal text.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlowchartEngine;

#[async_trait]
impl DiagramEngine for FlowchartEngine {
    async fn render(&self, source: &str) -> Result<String, DiagramError> {
        let chart = parse_flowchart(source)?;
        Ok(render_chart(&chart))
    }
}

fn arrow(style: EdgeStyle) -> &'static str {
    match style {
        EdgeStyle::Arrow => "─▶",
        EdgeStyle::Thick => "━▶",
        EdgeStyle::Dotted => "┄▶",
        EdgeStyle::Open => "──",
    }
}

struct Walker<'a> {
    chart: &'a Flowchart,
    outgoing: HashMap<&'a str, Vec<&'a Edge>>,
    visited: HashSet<&'a str>,
    lines: Vec<String>,
}

impl<'a> Walker<'a> {
    fn label(&self, id: &str) -> String {
        let label = self.chart.node(id).map(|n| n.label.as_str()).unwrap_or(id);
        strip_vs16(label)
    }

    fn walk(&mut self, id: &'a str, prefix: &str) {
        let edges = self.outgoing.get(id).cloned().unwrap_or_default();
        let count = edges.len();
        for (k, edge) in edges.into_iter().enumerate() {
            let last = k + 1 == count;
            let branch = if last { "└─" } else { "├─" };
            let edge_label = edge
                .label
                .as_deref()
                .map(|l| format!("[{l}] "))
                .unwrap_or_default();
            let target = edge.to.as_str();
            let seen = !self.visited.insert(target);
            let mut line = format!(
                "{prefix}{branch}{} {edge_label}{}",
                arrow(edge.style),
                self.label(target)
            );
            if seen {
                line.push_str(" ↺");
                self.lines.push(line);
                continue;
            }
            self.lines.push(line);
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            self.walk(target, &child_prefix);
        }
    }
}

/// Render a parsed chart as outline text (no trailing newline).
pub fn render_chart(chart: &Flowchart) -> String {
    let mut outgoing: HashMap<&str, Vec<&Edge>> = HashMap::new();
    let mut has_incoming: HashSet<&str> = HashSet::new();
    for edge in &chart.edges {
        outgoing.entry(edge.from.as_str()).or_default().push(edge);
        has_incoming.insert(edge.to.as_str());
    }

    // Declared roots first, then whatever a cycle left unreached.
    let order: Vec<&str> = chart
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| !has_incoming.contains(id))
        .chain(chart.nodes.iter().map(|n| n.id.as_str()))
        .collect();

    let mut walker = Walker {
        chart,
        outgoing,
        visited: HashSet::new(),
        lines: Vec::new(),
    };

    for id in order {
        if !walker.visited.insert(id) {
            continue;
        }
        if !walker.lines.is_empty() {
            walker.lines.push(String::new());
        }
        let boxed_label = boxed(&walker.label(id));
        walker.lines.extend(boxed_label);
        walker.walk(id, "");
    }

    walker.lines.join("\n")
}
