use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use roadmap_config::ViewerConfig;
use roadmap_viewer::api::{GenerateRequest, GeneratorClient, RoadmapApi};
use roadmap_viewer::app::export::{DirectorySink, DownloadSink, Exporter, SystemClipboard};
use roadmap_viewer::app::App;
use roadmap_viewer::diagram::{strip_fences, DiagramEngine, FlowchartEngine};
use roadmap_viewer::render::{self, mermaid::render_mermaid, outline::render_outline};
use roadmap_viewer::roadmap::validate::validate;
use roadmap_viewer::roadmap::{Level, RoadmapDocument};
use roadmap_viewer::tui;

#[derive(Parser)]
#[command(name = "roadmap-viewer", version, about = "Generate and browse learning roadmaps")]
struct Cli {
    /// Config file (default: ./roadmap-viewer.yaml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Generator API base URL, overrides config and ROADMAP_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal UI (default)
    Tui,
    /// Request one roadmap and print it
    Generate {
        domain: String,
        #[arg(long)]
        level: Option<Level>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Outline)]
        format: OutputFormat,
        /// Also write {domain}_roadmap.json to the export directory
        #[arg(long)]
        save: bool,
    },
    /// Render a saved roadmap JSON file
    Render {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Outline)]
        format: OutputFormat,
        /// Fail on structural problems instead of rendering them
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Outline,
    Json,
    Mermaid,
    Diagram,
    Html,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ViewerConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    config.apply_env_override(cli.api_url.clone());

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            init_file_logging(&config.log_path())?;
            run_tui(&config).await
        }
        Command::Generate {
            domain,
            level,
            format,
            save,
        } => {
            init_stderr_logging();
            let level = level.unwrap_or_else(|| default_level(&config));
            run_generate(&config, domain, level, format, save).await
        }
        Command::Render {
            file,
            format,
            strict,
        } => {
            init_stderr_logging();
            run_render(&file, format, strict).await
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}

/// The terminal belongs to the UI; logs go to a file.
fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory '{}'", parent.display()))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn default_level(config: &ViewerConfig) -> Level {
    config.ui.default_level.parse().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "bad default level in config, using Beginner");
        Level::Beginner
    })
}

async fn run_tui(config: &ViewerConfig) -> Result<()> {
    tracing::info!(api = %config.api.base_url, "starting terminal UI");
    let api: Arc<dyn RoadmapApi> = Arc::new(GeneratorClient::new(config.api.base_url.clone()));
    let exporter = Exporter::new(
        Box::new(SystemClipboard::default()),
        Box::new(DirectorySink::new(config.export.output_dir.clone())),
        config.ui.feedback_duration(),
    );
    let mut app = App::new(Arc::new(FlowchartEngine), exporter, default_level(config));
    tui::runner::run(&mut app, api, config.ui.tick_interval()).await
}

async fn run_generate(
    config: &ViewerConfig,
    domain: String,
    level: Level,
    format: OutputFormat,
    save: bool,
) -> Result<()> {
    let domain = domain.trim().to_string();
    anyhow::ensure!(!domain.is_empty(), "Please enter an engineering domain");

    let client = GeneratorClient::new(config.api.base_url.clone());
    let request = GenerateRequest { domain, level };
    let response = client
        .generate(&request)
        .await
        .with_context(|| format!("failed to generate roadmap for '{}'", request.domain))?;

    if let Err(report) = validate(&response.roadmap) {
        tracing::warn!(%report, "roadmap has structural issues");
    }
    if save {
        let json = response.roadmap.to_pretty_json()?;
        let path = DirectorySink::new(config.export.output_dir.clone())
            .save(&response.roadmap.export_filename(), &json)?;
        eprintln!("Saved to {}", path.display());
    }

    let mermaid = (!response.mermaid.trim().is_empty()).then_some(response.mermaid.as_str());
    println!("{}", print_as(&response.roadmap, mermaid, format).await?);
    Ok(())
}

async fn run_render(file: &Path, format: OutputFormat, strict: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;
    let doc: RoadmapDocument = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not a roadmap document", file.display()))?;
    if strict {
        validate(&doc)?;
    }
    println!("{}", print_as(&doc, None, format).await?);
    Ok(())
}

/// Render `doc` in `format`. `mermaid` is server-supplied diagram source.
async fn print_as(doc: &RoadmapDocument, mermaid: Option<&str>, format: OutputFormat) -> Result<String> {
    let source = || mermaid.map_or_else(|| render_mermaid(doc), str::to_string);
    Ok(match format {
        OutputFormat::Outline => render_outline(doc),
        OutputFormat::Json => doc.to_pretty_json()?,
        OutputFormat::Mermaid => source(),
        OutputFormat::Diagram => FlowchartEngine.render(&strip_fences(&source())).await?,
        OutputFormat::Html => render::html_document(doc),
    })
}
