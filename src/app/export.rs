//! Export utilities: save the roadmap as a JSON file, copy it to the clipboard.
//!
//! Both actions report through a transient label on their control
//! ("✅ Copied!", "❌ Failed") that reverts after the feedback window.
//! Failures are logged and shown, never returned to the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::roadmap::RoadmapDocument;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize roadmap: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// System clipboard capability.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Destination for downloaded files.
pub trait DownloadSink {
    /// Persist `contents` under `filename`; returns where it landed.
    fn save(&mut self, filename: &str, contents: &str) -> Result<PathBuf, ExportError>;
}

/// `arboard`-backed clipboard, opened on first use.
///
/// The handle is kept alive: on X11 the selection is owned by it.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ExportError> {
        if self.inner.is_none() {
            let clip = arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
            self.inner = Some(clip);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ExportError::Clipboard("not initialized".into()))
    }

    /// Read clipboard text (input paste).
    pub fn get_text(&mut self) -> Result<String, ExportError> {
        self.handle()?
            .get_text()
            .map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.handle()?
            .set_text(text.to_string())
            .map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

/// Writes downloads into a directory, creating it as needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, filename: &str, contents: &str) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(filename);
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        std::fs::write(&path, contents).map_err(io_err)?;
        Ok(path)
    }
}

/// The two export controls on the results panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportControl {
    Download,
    Copy,
}

impl ExportControl {
    /// Resting label.
    pub fn label(self) -> &'static str {
        match self {
            ExportControl::Download => "💾 Download JSON",
            ExportControl::Copy => "📋 Copy JSON",
        }
    }

    fn success_label(self) -> &'static str {
        match self {
            ExportControl::Download => "✅ Downloaded!",
            ExportControl::Copy => "✅ Copied!",
        }
    }
}

pub const FAILURE_LABEL: &str = "❌ Failed";

#[derive(Debug)]
struct Feedback {
    text: &'static str,
    until: Instant,
}

pub struct Exporter {
    clipboard: Box<dyn Clipboard>,
    sink: Box<dyn DownloadSink>,
    window: Duration,
    feedback: HashMap<ExportControl, Feedback>,
}

impl Exporter {
    pub fn new(clipboard: Box<dyn Clipboard>, sink: Box<dyn DownloadSink>, window: Duration) -> Self {
        Self {
            clipboard,
            sink,
            window,
            feedback: HashMap::new(),
        }
    }

    /// Save the roadmap as `{domain_slug}_roadmap.json`. No-op without a roadmap.
    pub fn download(&mut self, doc: Option<&RoadmapDocument>, now: Instant) -> Option<PathBuf> {
        let doc = doc?;
        let result = doc
            .to_pretty_json()
            .map_err(ExportError::from)
            .and_then(|json| self.sink.save(&doc.export_filename(), &json));
        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "roadmap downloaded");
                self.flash(ExportControl::Download, ExportControl::Download.success_label(), now);
                Some(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "roadmap download failed");
                self.flash(ExportControl::Download, FAILURE_LABEL, now);
                None
            }
        }
    }

    /// Put the roadmap JSON on the clipboard. No-op without a roadmap.
    pub fn copy(&mut self, doc: Option<&RoadmapDocument>, now: Instant) -> bool {
        let Some(doc) = doc else {
            return false;
        };
        let result = doc
            .to_pretty_json()
            .map_err(ExportError::from)
            .and_then(|json| self.clipboard.set_text(&json));
        match result {
            Ok(()) => {
                tracing::info!("roadmap copied to clipboard");
                self.flash(ExportControl::Copy, ExportControl::Copy.success_label(), now);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                self.flash(ExportControl::Copy, FAILURE_LABEL, now);
                false
            }
        }
    }

    /// Label to draw for `control` at `now`.
    pub fn label(&self, control: ExportControl, now: Instant) -> &'static str {
        match self.feedback.get(&control) {
            Some(f) if now < f.until => f.text,
            _ => control.label(),
        }
    }

    /// Drop expired feedback. Returns true if any label reverted.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.feedback.len();
        self.feedback.retain(|_, f| now < f.until);
        self.feedback.len() != before
    }

    fn flash(&mut self, control: ExportControl, text: &'static str, now: Instant) {
        self.feedback.insert(
            control,
            Feedback {
                text,
                until: now + self.window,
            },
        );
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{MemoryClipboard, MemorySink};
    use super::*;
    use crate::roadmap::fixtures::sample;

    const WINDOW: Duration = Duration::from_secs(2);

    fn exporter(clip: MemoryClipboard, sink: MemorySink) -> Exporter {
        Exporter::new(Box::new(clip), Box::new(sink), WINDOW)
    }

    #[test]
    fn download_names_file_from_domain() {
        let sink = MemorySink::default();
        let mut ex = exporter(MemoryClipboard::default(), sink.clone());
        let mut doc = sample();
        doc.domain = "Cloud Infra".into();

        let path = ex.download(Some(&doc), Instant::now()).unwrap();
        assert_eq!(path, PathBuf::from("cloud_infra_roadmap.json"));

        let saved = sink.saved.lock().unwrap();
        let back: RoadmapDocument = serde_json::from_str(&saved[0].1).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn download_without_roadmap_is_noop() {
        let sink = MemorySink::default();
        let mut ex = exporter(MemoryClipboard::default(), sink.clone());
        let now = Instant::now();
        assert!(ex.download(None, now).is_none());
        assert!(sink.saved.lock().unwrap().is_empty());
        assert_eq!(ex.label(ExportControl::Download, now), ExportControl::Download.label());
    }

    #[test]
    fn feedback_reverts_after_window() {
        let mut ex = exporter(MemoryClipboard::default(), MemorySink::default());
        let t0 = Instant::now();
        assert!(ex.copy(Some(&sample()), t0));
        assert_eq!(ex.label(ExportControl::Copy, t0), "✅ Copied!");
        assert_eq!(ex.label(ExportControl::Download, t0), ExportControl::Download.label());
        assert_eq!(ex.label(ExportControl::Copy, t0 + Duration::from_millis(1999)), "✅ Copied!");
        assert_eq!(ex.label(ExportControl::Copy, t0 + WINDOW), ExportControl::Copy.label());

        assert!(!ex.tick(t0 + Duration::from_secs(1)));
        assert!(ex.tick(t0 + WINDOW));
        assert!(!ex.tick(t0 + WINDOW));
    }

    #[test]
    fn clipboard_denial_shows_failure() {
        let clip = MemoryClipboard {
            deny: true,
            ..Default::default()
        };
        let mut ex = exporter(clip, MemorySink::default());
        let now = Instant::now();
        assert!(!ex.copy(Some(&sample()), now));
        assert_eq!(ex.label(ExportControl::Copy, now), FAILURE_LABEL);
        assert_eq!(ex.label(ExportControl::Copy, now + WINDOW), ExportControl::Copy.label());
    }

    #[test]
    fn copy_writes_pretty_json() {
        let clip = MemoryClipboard::default();
        let mut ex = exporter(clip.clone(), MemorySink::default());
        ex.copy(Some(&sample()), Instant::now());
        let text = clip.contents.lock().unwrap().clone().unwrap();
        assert_eq!(text, sample().to_pretty_json().unwrap());
    }

    #[test]
    fn repeat_click_keeps_resting_label() {
        let mut ex = exporter(MemoryClipboard::default(), MemorySink::default());
        let t0 = Instant::now();
        ex.copy(Some(&sample()), t0);
        ex.copy(Some(&sample()), t0 + Duration::from_millis(500));
        // Second flash extends the window; the resting label is unchanged.
        assert_eq!(ex.label(ExportControl::Copy, t0 + WINDOW), "✅ Copied!");
        assert_eq!(
            ex.label(ExportControl::Copy, t0 + WINDOW + Duration::from_millis(500)),
            ExportControl::Copy.label()
        );
    }

    #[test]
    fn directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("nested"));
        let path = sink.save("rust_roadmap.json", "{}").unwrap();
        assert_eq!(path, dir.path().join("nested").join("rust_roadmap.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }

    #[test]
    fn directory_sink_failure_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        // A regular file where the directory should be.
        let mut ex = Exporter::new(
            Box::new(MemoryClipboard::default()),
            Box::new(DirectorySink::new(&blocker)),
            WINDOW,
        );
        let now = Instant::now();
        assert!(ex.download(Some(&sample()), now).is_none());
        assert_eq!(ex.label(ExportControl::Download, now), FAILURE_LABEL);
    }
}
