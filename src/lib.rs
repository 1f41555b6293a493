//! Roadmap viewer: client for an AI learning-roadmap generator.
//!
//! Sends a domain and experience level to the generator API and presents the
//! returned roadmap three ways: a collapsible tree, a flowchart diagram and
//! the raw JSON. Roadmaps can be saved to disk or copied to the clipboard.
//!
//! The core is surface-independent:
//!
//! - `roadmap`: document model and structural validation
//! - `render`: markup tree, text outline, Mermaid source
//! - `diagram`: diagram bridge and the built-in flowchart engine
//! - `api`: generator endpoint client
//! - `view`: panel and tab state
//! - `app`: request orchestrator and export utilities
//!
//! `tui` binds all of it to a terminal.

pub mod api;
pub mod app;
pub mod diagram;
pub mod render;
pub mod roadmap;
pub mod tui;
pub mod view;
