//! Structural checks on a roadmap document.
//!
//! Rendering never requires these: missing collections render as empty.
//! The orchestrator logs issues as warnings; `render --strict` rejects.

use std::fmt;

use super::RoadmapDocument;

/// Where in the document an issue was found (zero-based indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Document,
    Phase(usize),
    Topic(usize, usize),
    Subtopic(usize, usize, usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Location::Document => f.write_str("roadmap"),
            Location::Phase(p) => write!(f, "phase {}", p + 1),
            Location::Topic(p, t) => write!(f, "phase {} topic {}", p + 1, t + 1),
            Location::Subtopic(p, t, s) => {
                write!(f, "phase {} topic {} subtopic {}", p + 1, t + 1, s + 1)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    BlankDomain,
    NoPhases,
    BlankName,
    BlankWeeks,
    NoTopics,
    NoSubtopics,
    NoItems,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapIssue {
    pub location: Location,
    pub kind: IssueKind,
}

impl fmt::Display for RoadmapIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            IssueKind::BlankDomain => "domain is blank",
            IssueKind::NoPhases => "must have at least one phase",
            IssueKind::BlankName => "name is blank",
            IssueKind::BlankWeeks => "weeks label is blank",
            IssueKind::NoTopics => "must have at least one topic",
            IssueKind::NoSubtopics => "must have at least one subtopic",
            IssueKind::NoItems => "must have at least one item",
        };
        write!(f, "{}: {what}", self.location)
    }
}

/// All issues found in one document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("roadmap failed validation ({} issue(s)): {}", .issues.len(), join(.issues))]
pub struct ValidationReport {
    pub issues: Vec<RoadmapIssue>,
}

fn join(issues: &[RoadmapIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Walk the whole document and collect every issue.
pub fn validate(doc: &RoadmapDocument) -> Result<(), ValidationReport> {
    let mut issues = Vec::new();
    let mut push = |location, kind| issues.push(RoadmapIssue { location, kind });

    if doc.domain.trim().is_empty() {
        push(Location::Document, IssueKind::BlankDomain);
    }
    if doc.phases.is_empty() {
        push(Location::Document, IssueKind::NoPhases);
    }

    for (p, phase) in doc.phases.iter().enumerate() {
        if phase.name.trim().is_empty() {
            push(Location::Phase(p), IssueKind::BlankName);
        }
        if phase.weeks.trim().is_empty() {
            push(Location::Phase(p), IssueKind::BlankWeeks);
        }
        if phase.topics.is_empty() {
            push(Location::Phase(p), IssueKind::NoTopics);
        }
        for (t, topic) in phase.topics.iter().enumerate() {
            if topic.name.trim().is_empty() {
                push(Location::Topic(p, t), IssueKind::BlankName);
            }
            if topic.subtopics.is_empty() {
                push(Location::Topic(p, t), IssueKind::NoSubtopics);
            }
            for (s, subtopic) in topic.subtopics.iter().enumerate() {
                if subtopic.name.trim().is_empty() {
                    push(Location::Subtopic(p, t, s), IssueKind::BlankName);
                }
                if subtopic.items.is_empty() {
                    push(Location::Subtopic(p, t, s), IssueKind::NoItems);
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport { issues })
    }
}
