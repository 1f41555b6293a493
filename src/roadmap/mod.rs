//! Roadmap document: the structured learning plan returned by the generator.
//!
//! Serde-serializable in the generator's wire shape. Optional collections
//! (`phases`, `topics`, `subtopics`, `items`) read as empty when missing or
//! `null`, so a partially filled document still renders.

pub mod validate;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Weeks shown when the document does not carry `total_weeks`.
pub const DEFAULT_TOTAL_WEEKS: u32 = 16;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Target expertise level.
///
/// Serialized in canonical case; read case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    /// Next level, wrapping around (level selector cycling).
    pub fn next(self) -> Self {
        match self {
            Level::Beginner => Level::Intermediate,
            Level::Intermediate => Level::Advanced,
            Level::Advanced => Level::Beginner,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Level::Beginner => Level::Advanced,
            Level::Intermediate => Level::Beginner,
            Level::Advanced => Level::Intermediate,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown level '{0}' (expected Beginner, Intermediate or Advanced)")]
pub struct UnknownLevel(pub String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = UnknownLevel;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// `null` and a missing key both read as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The full roadmap for one domain and level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapDocument {
    pub domain: String,
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weeks: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    /// Free-form range label, e.g. "Week 1-3".
    pub weeks: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subtopics: Vec<Subtopic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtopic {
    pub name: String,
    /// Flat tags, no further structure.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<String>,
}

impl RoadmapDocument {
    /// `total_weeks`, or the 16-week default.
    pub fn weeks_or_default(&self) -> u32 {
        self.total_weeks.unwrap_or(DEFAULT_TOTAL_WEEKS)
    }

    /// Display title: `🧭 {domain} Roadmap`.
    pub fn title(&self) -> String {
        format!("🧭 {} Roadmap", self.domain)
    }

    /// Indented JSON, two-space indent. Shown in the raw view and exported.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export file name: `backend engineering` → `backend_engineering_roadmap.json`.
    pub fn export_filename(&self) -> String {
        format!("{}_roadmap.json", domain_slug(&self.domain))
    }

    pub fn topic_count(&self) -> usize {
        self.phases.iter().map(|p| p.topics.len()).sum()
    }
}

/// Lowercase the domain and collapse every whitespace run into `_`.
pub fn domain_slug(domain: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&domain.to_lowercase(), "_")
        .into_owned()
}
