//! Mermaid flowchart text → graph IR.
//!
//! Handles the subset the roadmap generator emits: a `graph`/`flowchart`
//! header, node declarations (`A`, `A[label]`, `A["label"]`, `A(label)`,
//! `A{label}`), edge chains with `-->`, `---`, `==>`, `-.->` and optional
//! `|label|`, and `;` separators. Styling and grouping statements are skipped.

use super::DiagramError;

/// Node shapes, by bracket kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rectangle,
    Rounded,
    Diamond,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    Arrow,  // -->
    Open,   // ---
    Thick,  // ==>
    Dotted, // -.->
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

/// Parsed flowchart.
#[derive(Debug, Clone, PartialEq)]
pub struct Flowchart {
    pub direction: Direction,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Flowchart {
    fn ensure_node(&mut self, id: &str) {
        if !self.nodes.iter().any(|n| n.id == id) {
            self.nodes.push(Node {
                id: id.to_string(),
                label: id.to_string(),
                shape: Shape::Rectangle,
            });
        }
    }

    fn declare(&mut self, node: NodeRef) {
        self.ensure_node(&node.id);
        if let Some((label, shape)) = node.label {
            if let Some(n) = self.nodes.iter_mut().find(|n| n.id == node.id) {
                n.label = label;
                n.shape = shape;
            }
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Edge operators, longest first so `-.->` wins over `-->`.
const EDGE_OPS: [(&str, EdgeStyle); 4] = [
    ("-.->", EdgeStyle::Dotted),
    ("-->", EdgeStyle::Arrow),
    ("---", EdgeStyle::Open),
    ("==>", EdgeStyle::Thick),
];

/// Statements that carry no graph structure.
const SKIPPED_KEYWORDS: [&str; 8] = [
    "style", "classDef", "class", "linkStyle", "click", "subgraph", "end", "direction",
];

/// A node reference inside a statement, with an optional label declaration.
#[derive(Debug)]
struct NodeRef {
    id: String,
    label: Option<(String, Shape)>,
}

/// Split on `;` outside brackets and quotes.
fn split_statements(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut start = 0;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '[' | '(' | '{' if !in_quotes => depth += 1,
            ']' | ')' | '}' if !in_quotes => depth = depth.saturating_sub(1),
            ';' if depth == 0 && !in_quotes => {
                parts.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&line[start..]);
    parts
}

fn parse_header(stmt: &str) -> Option<Direction> {
    let mut words = stmt.split_whitespace();
    match words.next()? {
        "graph" | "flowchart" => {}
        _ => return None,
    }
    let direction = match words.next() {
        Some("BT") => Direction::BottomTop,
        Some("LR") => Direction::LeftRight,
        Some("RL") => Direction::RightLeft,
        _ => Direction::TopBottom,
    };
    Some(direction)
}

fn is_skipped(stmt: &str) -> bool {
    let first = stmt.split_whitespace().next().unwrap_or("");
    SKIPPED_KEYWORDS.contains(&first)
}

/// Display form of a label: unquoted, `<br/>` folded to ` · `.
fn clean_label(raw: &str) -> String {
    let s = raw.trim();
    let s = if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    };
    s.replace("<br/>", " · ").replace("<br>", " · ")
}

fn parse_node_ref(segment: &str) -> Result<NodeRef, DiagramError> {
    let segment = segment.trim();
    let open = segment.find(['[', '(', '{']);
    let Some(open) = open else {
        if segment.is_empty() || segment.contains(char::is_whitespace) {
            return Err(DiagramError::Syntax(format!("bad node reference '{segment}'")));
        }
        return Ok(NodeRef {
            id: segment.to_string(),
            label: None,
        });
    };

    let id = segment[..open].trim();
    if id.is_empty() {
        return Err(DiagramError::Syntax(format!("node without id: '{segment}'")));
    }
    let (shape, close) = match segment.as_bytes()[open] {
        b'(' => (Shape::Rounded, ')'),
        b'{' => (Shape::Diamond, '}'),
        _ => (Shape::Rectangle, ']'),
    };
    let inner = segment[open + 1..]
        .strip_suffix(close)
        .ok_or_else(|| DiagramError::Syntax(format!("unclosed label in '{segment}'")))?;
    Ok(NodeRef {
        id: id.to_string(),
        label: Some((clean_label(inner), shape)),
    })
}

/// Split an edge chain into node segments and the operators between them.
fn split_chain(stmt: &str) -> (Vec<&str>, Vec<(EdgeStyle, Option<String>)>) {
    let mut segments = Vec::new();
    let mut ops = Vec::new();
    let bytes = stmt.as_bytes();
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' => in_quotes = !in_quotes,
            b'[' | b'(' | b'{' if !in_quotes => depth += 1,
            b']' | b')' | b'}' if !in_quotes => depth = depth.saturating_sub(1),
            _ if depth == 0 && !in_quotes => {
                let found = EDGE_OPS
                    .iter()
                    .find(|(op, _)| bytes[i..].starts_with(op.as_bytes()));
                if let Some((op, style)) = found {
                    segments.push(&stmt[start..i]);
                    i += op.len();
                    // Optional |label| right after the operator.
                    let rest = &stmt[i..];
                    let trimmed = rest.trim_start();
                    let mut label = None;
                    if let Some(after_bar) = trimmed.strip_prefix('|') {
                        if let Some(end) = after_bar.find('|') {
                            label = Some(clean_label(&after_bar[..end]));
                            i += (rest.len() - trimmed.len()) + 1 + end + 1;
                        }
                    }
                    ops.push((*style, label));
                    start = i;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&stmt[start..]);
    (segments, ops)
}

fn parse_statement(chart: &mut Flowchart, stmt: &str) -> Result<(), DiagramError> {
    let (segments, ops) = split_chain(stmt);
    let refs = segments
        .into_iter()
        .map(parse_node_ref)
        .collect::<Result<Vec<_>, _>>()?;

    let ids: Vec<String> = refs.iter().map(|r| r.id.clone()).collect();
    for node in refs {
        chart.declare(node);
    }
    for (pair, (style, label)) in ids.windows(2).zip(ops) {
        chart.edges.push(Edge {
            from: pair[0].clone(),
            to: pair[1].clone(),
            label,
            style,
        });
    }
    Ok(())
}

/// Parse flowchart source (already stripped of code fences).
pub fn parse_flowchart(source: &str) -> Result<Flowchart, DiagramError> {
    let statements: Vec<&str> = source
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("%%"))
        .flat_map(split_statements)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let (header, body) = statements.split_first().ok_or(DiagramError::Empty)?;
    let direction = parse_header(header).ok_or_else(|| {
        DiagramError::Syntax(format!("expected 'graph' or 'flowchart' header, found '{header}'"))
    })?;

    let mut chart = Flowchart {
        direction,
        nodes: Vec::new(),
        edges: Vec::new(),
    };
    for stmt in body {
        if is_skipped(stmt) {
            continue;
        }
        parse_statement(&mut chart, stmt)?;
    }

    if chart.nodes.is_empty() {
        return Err(DiagramError::Empty);
    }
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_with_semicolons() {
        let chart = parse_flowchart("graph TD;A-->B;").unwrap();
        assert_eq!(chart.direction, Direction::TopBottom);
        assert_eq!(chart.nodes.len(), 2);
        assert_eq!(chart.edges.len(), 1);
        assert_eq!(chart.edges[0].from, "A");
        assert_eq!(chart.edges[0].to, "B");
    }

    #[test]
    fn declarations_and_labels() {
        let src = "flowchart LR\n    ROOT[\"Rust<br/>Beginner\"]\n    P0(Basics)\n    Q{Ready?}\n    ROOT --> P0\n";
        let chart = parse_flowchart(src).unwrap();
        assert_eq!(chart.direction, Direction::LeftRight);
        let root = chart.node("ROOT").unwrap();
        assert_eq!(root.label, "Rust · Beginner");
        assert_eq!(root.shape, Shape::Rectangle);
        assert_eq!(chart.node("P0").unwrap().shape, Shape::Rounded);
        assert_eq!(chart.node("Q").unwrap().label, "Ready?");
        assert_eq!(chart.node("Q").unwrap().shape, Shape::Diamond);
    }

    #[test]
    fn chains_and_edge_labels() {
        let chart = parse_flowchart("graph TB\nA -->|next| B ==> C -.-> D --- E").unwrap();
        let styles: Vec<EdgeStyle> = chart.edges.iter().map(|e| e.style).collect();
        assert_eq!(
            styles,
            vec![EdgeStyle::Arrow, EdgeStyle::Thick, EdgeStyle::Dotted, EdgeStyle::Open]
        );
        assert_eq!(chart.edges[0].label.as_deref(), Some("next"));
        assert_eq!(chart.edges[1].from, "B");
        assert_eq!(chart.edges[3].to, "E");
    }

    #[test]
    fn inline_declaration_in_edge() {
        let chart = parse_flowchart("graph TD\nA[\"Start - here\"] --> B[\"a --> b\"]").unwrap();
        assert_eq!(chart.edges.len(), 1);
        assert_eq!(chart.node("A").unwrap().label, "Start - here");
        assert_eq!(chart.node("B").unwrap().label, "a --> b");
    }

    #[test]
    fn style_lines_and_comments_skipped() {
        let src = "flowchart TB\n%% comment\nA[\"x\"]\nstyle A fill:#fff,stroke:#000\nclassDef big font-size:20px\nA --> B";
        let chart = parse_flowchart(src).unwrap();
        assert_eq!(chart.nodes.len(), 2);
        assert_eq!(chart.edges.len(), 1);
    }

    #[test]
    fn empty_source() {
        assert!(matches!(parse_flowchart(""), Err(DiagramError::Empty)));
        assert!(matches!(parse_flowchart("  \n "), Err(DiagramError::Empty)));
        assert!(matches!(parse_flowchart("graph TD;"), Err(DiagramError::Empty)));
    }

    #[test]
    fn missing_header() {
        let err = parse_flowchart("A --> B").unwrap_err();
        assert!(matches!(err, DiagramError::Syntax(_)));
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn unclosed_label() {
        assert!(matches!(
            parse_flowchart("graph TD\nA[oops --> B"),
            Err(DiagramError::Syntax(_))
        ));
    }

    #[test]
    fn later_declaration_updates_label() {
        let chart = parse_flowchart("graph TD\nA --> B\nB[\"Bee\"]").unwrap();
        assert_eq!(chart.node("B").unwrap().label, "Bee");
        assert_eq!(chart.nodes.len(), 2);
    }
}
