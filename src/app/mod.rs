//! Request orchestrator.
//!
//! Owns the input form, the view state and the current roadmap. A generation
//! is split in two halves so the terminal loop never blocks on HTTP:
//!
//! ```text
//! begin_generate()  ──▶ GenerateTicket ──▶ (spawned) RoadmapApi::generate
//!                                                   │
//! complete_generate(ticket, outcome) ◀──────────────┘
//! ```
//!
//! Each ticket carries a sequence number. `start_new` and every new
//! `begin_generate` bump it, so an outcome for a superseded request is
//! dropped instead of overwriting the screen.

pub mod export;
pub mod field;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{ApiError, GenerateRequest, GenerateResponse, RoadmapApi};
use crate::diagram::{DiagramBridge, DiagramEngine, DiagramSurface};
use crate::render::mermaid::render_mermaid;
use crate::render::tree::{self, TopicId, TreeView};
use crate::render::RoadmapHeader;
use crate::roadmap::validate::validate;
use crate::roadmap::{Level, RoadmapDocument};
use crate::view::{Panel, Tab, ViewState};

use export::{ExportControl, Exporter};
use field::TextField;

/// Inline message for a blank domain.
pub const EMPTY_DOMAIN_MESSAGE: &str = "Please enter an engineering domain";

/// Lifecycle of the current generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Validating,
    Loading,
    Success,
    Failed,
}

/// Which input control has focus on the input panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFocus {
    #[default]
    Domain,
    Level,
}

impl InputFocus {
    pub fn toggle(self) -> Self {
        match self {
            InputFocus::Domain => InputFocus::Level,
            InputFocus::Level => InputFocus::Domain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BeginError {
    #[error("Please enter an engineering domain")]
    EmptyDomain,

    #[error("a roadmap request is already in flight")]
    InFlight,
}

/// Proof that a request was started; hand it back with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateTicket {
    seq: u64,
    pub request: GenerateRequest,
}

impl GenerateTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Everything derived from one successful response.
#[derive(Debug, Clone)]
pub struct RoadmapResults {
    pub document: RoadmapDocument,
    pub header: RoadmapHeader,
    pub tree: TreeView,
    /// Pretty-printed JSON, two-space indent.
    pub raw: String,
}

impl RoadmapResults {
    fn build(document: RoadmapDocument) -> Self {
        let raw = document.to_pretty_json().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to pretty-print roadmap");
            String::new()
        });
        Self {
            header: RoadmapHeader::from_doc(&document),
            tree: tree::render(&document),
            raw,
            document,
        }
    }
}

pub struct App {
    pub domain: TextField,
    pub level: Level,
    focus: InputFocus,
    view: ViewState,
    state: RequestState,
    input_error: Option<String>,
    error_message: Option<String>,
    results: Option<RoadmapResults>,
    diagram: DiagramBridge,
    exporter: Exporter,
    seq: u64,
}

impl App {
    pub fn new(engine: Arc<dyn DiagramEngine>, exporter: Exporter, level: Level) -> Self {
        Self {
            domain: TextField::new(),
            level,
            focus: InputFocus::Domain,
            view: ViewState::default(),
            state: RequestState::Idle,
            input_error: None,
            error_message: None,
            results: None,
            diagram: DiagramBridge::new(engine),
            exporter,
            seq: 0,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn active_panel(&self) -> Panel {
        self.view.active_panel()
    }

    pub fn request_state(&self) -> RequestState {
        self.state
    }

    pub fn focus(&self) -> InputFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: InputFocus) {
        self.focus = focus;
    }

    /// Inline validation message under the domain field.
    pub fn input_error(&self) -> Option<&str> {
        self.input_error.as_deref()
    }

    /// Message on the error panel.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn results(&self) -> Option<&RoadmapResults> {
        self.results.as_ref()
    }

    pub fn roadmap(&self) -> Option<&RoadmapDocument> {
        self.results.as_ref().map(|r| &r.document)
    }

    pub fn diagram(&self) -> &DiagramSurface {
        self.diagram.surface()
    }

    /// Validate the form and start a request.
    ///
    /// On success the loading panel is showing and the previous roadmap is
    /// gone. A blank domain leaves the input panel up with an inline error.
    pub fn begin_generate(&mut self) -> Result<GenerateTicket, BeginError> {
        if self.state == RequestState::Loading {
            tracing::debug!(seq = self.seq, "generate ignored, request in flight");
            return Err(BeginError::InFlight);
        }
        self.state = RequestState::Validating;

        let domain = self.domain.trimmed().to_string();
        if domain.is_empty() {
            self.state = RequestState::Failed;
            self.input_error = Some(EMPTY_DOMAIN_MESSAGE.to_string());
            self.focus = InputFocus::Domain;
            return Err(BeginError::EmptyDomain);
        }

        self.input_error = None;
        self.error_message = None;
        self.discard_roadmap();
        self.seq += 1;
        self.state = RequestState::Loading;
        self.view.panels.show(Panel::Loading);
        tracing::debug!(seq = self.seq, %domain, level = %self.level, "generation started");

        Ok(GenerateTicket {
            seq: self.seq,
            request: GenerateRequest {
                domain,
                level: self.level,
            },
        })
    }

    /// Same flow as a fresh submit, with whatever the form holds now.
    pub fn retry(&mut self) -> Result<GenerateTicket, BeginError> {
        self.begin_generate()
    }

    /// Apply a request outcome. Returns false if the ticket was superseded.
    pub async fn complete_generate(
        &mut self,
        ticket: GenerateTicket,
        outcome: Result<GenerateResponse, ApiError>,
    ) -> bool {
        if ticket.seq != self.seq || self.state != RequestState::Loading {
            tracing::debug!(ticket = ticket.seq, current = self.seq, "discarding stale outcome");
            return false;
        }
        match outcome {
            Ok(response) => self.show_roadmap(response).await,
            Err(e) => self.show_failure(&e),
        }
        true
    }

    /// Run a whole generation inline. Used where no event loop needs to
    /// stay responsive.
    pub async fn generate(&mut self, api: &dyn RoadmapApi) -> Result<bool, BeginError> {
        let ticket = self.begin_generate()?;
        let outcome = api.generate(&ticket.request).await;
        Ok(self.complete_generate(ticket, outcome).await)
    }

    /// Back to an empty input panel. Any in-flight request is orphaned.
    pub fn start_new(&mut self) {
        self.seq += 1;
        self.state = RequestState::Idle;
        self.domain.clear();
        self.focus = InputFocus::Domain;
        self.input_error = None;
        self.error_message = None;
        self.discard_roadmap();
        self.view.panels.show(Panel::Input);
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.view.tabs.switch_tab(tab);
    }

    /// Flip a topic in the tree view. `None` without results or for an
    /// unknown id.
    pub fn toggle_topic(&mut self, id: TopicId) -> Option<bool> {
        self.results.as_mut()?.tree.toggle_topic(id)
    }

    pub fn download(&mut self, now: Instant) -> Option<PathBuf> {
        let doc = self.results.as_ref().map(|r| &r.document);
        self.exporter.download(doc, now)
    }

    pub fn copy(&mut self, now: Instant) -> bool {
        let doc = self.results.as_ref().map(|r| &r.document);
        self.exporter.copy(doc, now)
    }

    pub fn export_label(&self, control: ExportControl, now: Instant) -> &'static str {
        self.exporter.label(control, now)
    }

    /// Expire transient labels. True if anything changed on screen.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.exporter.tick(now)
    }

    async fn show_roadmap(&mut self, response: GenerateResponse) {
        let GenerateResponse { roadmap, mermaid } = response;
        if let Err(report) = validate(&roadmap) {
            tracing::warn!(%report, "roadmap has structural issues");
        }

        let results = RoadmapResults::build(roadmap);
        let source = if mermaid.trim().is_empty() {
            tracing::debug!("response has no diagram source, generating locally");
            render_mermaid(&results.document)
        } else {
            mermaid
        };
        self.diagram.render_diagram(&source).await;

        tracing::info!(
            domain = %results.document.domain,
            phases = results.document.phases.len(),
            topics = results.document.topic_count(),
            "roadmap ready"
        );
        self.results = Some(results);
        self.state = RequestState::Success;
        self.view.panels.show(Panel::Results);
        self.view.tabs.switch_tab(Tab::Tree);
    }

    fn show_failure(&mut self, error: &ApiError) {
        tracing::warn!(error = %error, "roadmap generation failed");
        self.error_message = Some(error.user_message().to_string());
        self.state = RequestState::Failed;
        self.view.panels.show(Panel::Error);
    }

    fn discard_roadmap(&mut self) {
        self.results = None;
        self.diagram.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::export::testing::{MemoryClipboard, MemorySink};
    use super::*;
    use crate::api::{HealthStatus, GENERIC_FAILURE};
    use crate::diagram::testing::RecordingEngine;
    use crate::roadmap::fixtures::sample;

    enum Script {
        Respond(GenerateResponse),
        Status(u16, &'static str),
        Garbage,
    }

    struct FakeApi {
        script: Script,
        calls: Mutex<Vec<GenerateRequest>>,
    }

    impl FakeApi {
        fn new(script: Script) -> Self {
            Self {
                script,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<GenerateRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RoadmapApi for FakeApi {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
            self.calls.lock().unwrap().push(request.clone());
            match &self.script {
                Script::Respond(r) => Ok(r.clone()),
                Script::Status(status, message) => Err(ApiError::Api {
                    status: *status,
                    message: message.to_string(),
                }),
                Script::Garbage => Err(ApiError::InvalidResponse("not json".into())),
            }
        }

        async fn health(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus {
                status: "ok".into(),
                provider: None,
            })
        }
    }

    fn respond(mermaid: &str) -> Script {
        Script::Respond(GenerateResponse {
            roadmap: sample(),
            mermaid: mermaid.into(),
        })
    }

    struct Harness {
        app: App,
        engine: Arc<RecordingEngine>,
        sink: MemorySink,
        clipboard: MemoryClipboard,
    }

    fn harness() -> Harness {
        let engine = Arc::new(RecordingEngine::default());
        let sink = MemorySink::default();
        let clipboard = MemoryClipboard::default();
        let exporter = Exporter::new(
            Box::new(clipboard.clone()),
            Box::new(sink.clone()),
            Duration::from_secs(2),
        );
        Harness {
            app: App::new(engine.clone(), exporter, Level::Beginner),
            engine,
            sink,
            clipboard,
        }
    }

    #[tokio::test]
    async fn blank_domain_stays_on_input() {
        let mut h = harness();
        let api = FakeApi::new(respond(""));
        for text in ["", "   ", "\t "] {
            h.app.domain.set_content(text);
            let err = h.app.generate(&api).await.unwrap_err();
            assert_eq!(err, BeginError::EmptyDomain);
            assert_eq!(h.app.active_panel(), Panel::Input);
            assert_eq!(h.app.input_error(), Some(EMPTY_DOMAIN_MESSAGE));
            assert_eq!(h.app.focus(), InputFocus::Domain);
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_generation_shows_tree() {
        let mut h = harness();
        let api = FakeApi::new(respond("```mermaid\ngraph TD;A-->B;```"));
        h.app.domain.set_content("  Backend Engineering ");
        h.app.level = Level::Advanced;

        assert!(h.app.generate(&api).await.unwrap());

        assert_eq!(
            api.calls(),
            vec![GenerateRequest {
                domain: "Backend Engineering".into(),
                level: Level::Advanced,
            }]
        );
        let results = h.app.results().unwrap();
        assert_eq!(results.header.title, "🧭 Backend Engineering Roadmap");
        assert_eq!(*h.engine.received.lock().unwrap(), vec!["graph TD;A-->B;".to_string()]);
        assert_eq!(h.app.active_panel(), Panel::Results);
        assert_eq!(h.app.view().visible_tab(), Some(Tab::Tree));
        assert_eq!(h.app.request_state(), RequestState::Success);
        assert!(matches!(h.app.diagram(), DiagramSurface::Rendered(_)));
    }

    #[tokio::test]
    async fn raw_view_round_trips() {
        let mut h = harness();
        let api = FakeApi::new(respond("graph TD;A-->B;"));
        h.app.domain.set_content("Backend Engineering");
        h.app.generate(&api).await.unwrap();

        let raw = &h.app.results().unwrap().raw;
        let back: RoadmapDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(back, sample());
        assert!(raw.contains("\n  \"domain\""));
    }

    #[tokio::test]
    async fn server_error_shows_error_panel() {
        let mut h = harness();
        let api = FakeApi::new(Script::Status(500, "model unavailable"));
        h.app.domain.set_content("Backend Engineering");
        assert!(h.app.generate(&api).await.unwrap());

        assert_eq!(h.app.active_panel(), Panel::Error);
        assert_eq!(h.app.error_message(), Some("model unavailable"));
        assert_eq!(h.app.request_state(), RequestState::Failed);
        assert!(h.app.results().is_none());
    }

    #[tokio::test]
    async fn unreadable_response_uses_generic_message() {
        let mut h = harness();
        let api = FakeApi::new(Script::Garbage);
        h.app.domain.set_content("Data Engineering");
        h.app.generate(&api).await.unwrap();
        assert_eq!(h.app.error_message(), Some(GENERIC_FAILURE));
    }

    #[tokio::test]
    async fn retry_reissues_with_current_input() {
        let mut h = harness();
        let failing = FakeApi::new(Script::Status(503, "busy"));
        h.app.domain.set_content("Backend Engineering");
        h.app.generate(&failing).await.unwrap();

        let ticket = h.app.retry().unwrap();
        assert_eq!(h.app.active_panel(), Panel::Loading);
        assert_eq!(ticket.request.domain, "Backend Engineering");
        assert!(h.app.error_message().is_none());

        let response = GenerateResponse {
            roadmap: sample(),
            mermaid: "graph TD;A-->B;".into(),
        };
        assert!(h.app.complete_generate(ticket, Ok(response)).await);
        assert_eq!(h.app.active_panel(), Panel::Results);
    }

    #[tokio::test]
    async fn second_submit_while_loading_is_refused() {
        let mut h = harness();
        h.app.domain.set_content("Backend Engineering");
        let first = h.app.begin_generate().unwrap();
        assert_eq!(h.app.begin_generate().unwrap_err(), BeginError::InFlight);
        assert_eq!(h.app.request_state(), RequestState::Loading);
        assert_eq!(first.seq(), 1);
    }

    #[tokio::test]
    async fn outcome_after_start_new_is_discarded() {
        let mut h = harness();
        h.app.domain.set_content("Backend Engineering");
        let ticket = h.app.begin_generate().unwrap();
        h.app.start_new();

        let applied = h
            .app
            .complete_generate(ticket, Ok(GenerateResponse {
                roadmap: sample(),
                mermaid: String::new(),
            }))
            .await;
        assert!(!applied);
        assert_eq!(h.app.active_panel(), Panel::Input);
        assert!(h.app.results().is_none());
        assert!(h.engine.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_diagram_source_generated_locally() {
        let mut h = harness();
        let api = FakeApi::new(respond("  "));
        h.app.domain.set_content("Backend Engineering");
        h.app.generate(&api).await.unwrap();

        let received = h.engine.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].starts_with("flowchart TB"));
        assert!(!received[0].contains("```"));
    }

    #[tokio::test]
    async fn new_generation_discards_previous_roadmap() {
        let mut h = harness();
        let api = FakeApi::new(respond("graph TD;A-->B;"));
        h.app.domain.set_content("Backend Engineering");
        h.app.generate(&api).await.unwrap();
        assert!(h.app.roadmap().is_some());

        h.app.begin_generate().unwrap();
        assert!(h.app.roadmap().is_none());
        assert_eq!(h.app.diagram(), &DiagramSurface::Empty);
    }

    #[tokio::test]
    async fn start_new_resets_form_and_view() {
        let mut h = harness();
        let api = FakeApi::new(respond("graph TD;A-->B;"));
        h.app.domain.set_content("Backend Engineering");
        h.app.generate(&api).await.unwrap();
        h.app.switch_tab(Tab::Raw);

        h.app.start_new();
        assert_eq!(h.app.domain.content(), "");
        assert_eq!(h.app.active_panel(), Panel::Input);
        assert_eq!(h.app.request_state(), RequestState::Idle);
        assert!(h.app.roadmap().is_none());
        assert_eq!(h.app.diagram(), &DiagramSurface::Empty);
        assert_eq!(h.app.view().visible_tab(), None);
    }

    #[tokio::test]
    async fn toggle_and_tabs_on_results() {
        let mut h = harness();
        let api = FakeApi::new(respond("graph TD;A-->B;"));
        h.app.domain.set_content("Backend Engineering");
        h.app.generate(&api).await.unwrap();

        let id = TopicId::new(0, 1);
        assert_eq!(h.app.toggle_topic(id), Some(false));
        assert_eq!(h.app.toggle_topic(id), Some(true));
        assert_eq!(h.app.toggle_topic(TopicId::new(9, 9)), None);

        h.app.switch_tab(Tab::Diagram);
        assert_eq!(h.app.view().visible_tab(), Some(Tab::Diagram));

        // A fresh result always lands on the tree.
        h.app.generate(&api).await.unwrap();
        assert_eq!(h.app.view().visible_tab(), Some(Tab::Tree));
        assert_eq!(h.app.results().unwrap().tree.is_expanded(id), Some(true));
    }

    #[tokio::test]
    async fn exports_use_current_roadmap() {
        let mut h = harness();
        let now = Instant::now();
        assert!(h.app.download(now).is_none());
        assert!(!h.app.copy(now));

        let mut doc = sample();
        doc.domain = "Cloud Infra".into();
        let api = FakeApi::new(Script::Respond(GenerateResponse {
            roadmap: doc,
            mermaid: "graph TD;A-->B;".into(),
        }));
        h.app.domain.set_content("Cloud Infra");
        h.app.generate(&api).await.unwrap();

        let path = h.app.download(now).unwrap();
        assert_eq!(path, PathBuf::from("cloud_infra_roadmap.json"));
        assert_eq!(h.sink.saved.lock().unwrap()[0].0, "cloud_infra_roadmap.json");
        assert_eq!(h.app.export_label(ExportControl::Download, now), "✅ Downloaded!");

        assert!(h.app.copy(now));
        assert!(h.clipboard.contents.lock().unwrap().is_some());
        assert!(h.app.tick(now + Duration::from_secs(3)));
        assert_eq!(
            h.app.export_label(ExportControl::Copy, now + Duration::from_secs(3)),
            ExportControl::Copy.label()
        );
    }
}
