//! Diagram bridge: forwards diagram source to a rendering engine.
//!
//! Generators wrap the source in a fenced code block (```` ```mermaid ````).
//! The bridge strips the fence, hands bare source to the engine, and puts
//! the result on its surface. Engine failures (errors or panics) never
//! leave the bridge: the surface shows a fallback message instead.

pub mod box_drawing;
pub mod flowchart;
pub mod parser;

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use futures_util::FutureExt;
use regex::Regex;

pub use flowchart::FlowchartEngine;

/// Shown on the surface when the engine rejects the source.
pub const FALLBACK_MESSAGE: &str = "Failed to render diagram";

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:mermaid)?\n?").expect("static regex"));

#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("diagram source is empty")]
    Empty,

    #[error("diagram syntax error: {0}")]
    Syntax(String),

    #[error("diagram engine failed: {0}")]
    Engine(String),
}

/// "Compile diagram source to visual output."
#[async_trait]
pub trait DiagramEngine: Send + Sync {
    async fn render(&self, source: &str) -> Result<String, DiagramError>;
}

/// What the diagram view currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DiagramSurface {
    #[default]
    Empty,
    Rendered(String),
    Fallback(String),
}

/// Remove code-fence markers and surrounding whitespace.
pub fn strip_fences(source: &str) -> String {
    FENCE.replace_all(source, "").trim().to_string()
}

pub struct DiagramBridge {
    engine: Arc<dyn DiagramEngine>,
    surface: DiagramSurface,
    source: Option<String>,
}

impl DiagramBridge {
    pub fn new(engine: Arc<dyn DiagramEngine>) -> Self {
        Self {
            engine,
            surface: DiagramSurface::Empty,
            source: None,
        }
    }

    pub fn surface(&self) -> &DiagramSurface {
        &self.surface
    }

    /// Bare source last handed to the engine.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Strip, render, and replace the surface. Never fails.
    pub async fn render_diagram(&mut self, source: &str) {
        let code = strip_fences(source);
        self.surface = DiagramSurface::Empty;

        let outcome = AssertUnwindSafe(self.engine.render(&code))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(DiagramError::Engine("engine panicked".into())));

        self.surface = match outcome {
            Ok(output) => DiagramSurface::Rendered(output),
            Err(e) => {
                tracing::error!(error = %e, "diagram render failed");
                DiagramSurface::Fallback(FALLBACK_MESSAGE.into())
            }
        };
        self.source = Some(code);
    }

    /// Drop the current diagram (new generation, back to input).
    pub fn clear(&mut self) {
        self.surface = DiagramSurface::Empty;
        self.source = None;
    }
}

impl std::fmt::Debug for DiagramBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramBridge")
            .field("surface", &self.surface)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
