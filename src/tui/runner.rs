//! Terminal event loop.
//!
//! One task owns the `App` and multiplexes three sources with `select!`:
//! crossterm key/paste events, a redraw tick (spinner, feedback expiry),
//! and generation outcomes arriving from spawned HTTP tasks. The spawned
//! tasks never touch the `App`; they only send `(ticket, outcome)` back.

use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use super::{input, layout, TuiState};
use crate::api::{log_health, ApiError, GenerateResponse, RoadmapApi};
use crate::app::{App, GenerateTicket};

type Outcome = (GenerateTicket, Result<GenerateResponse, ApiError>);

const OUTCOME_CHANNEL_CAPACITY: usize = 4;

/// Take over the terminal, run until the user quits, restore it.
pub async fn run(app: &mut App, api: Arc<dyn RoadmapApi>, tick: Duration) -> anyhow::Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("failed to enter alternate screen")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")?;

    let result = event_loop(&mut terminal, app, api, tick).await;
    let restored = restore_terminal(
        disable_raw_mode(),
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste),
        terminal.show_cursor(),
    );

    result.and(restored)
}

/// Every teardown step has already run; report the first failure.
fn restore_terminal(
    raw_mode: std::io::Result<()>,
    screen: std::io::Result<()>,
    cursor: std::io::Result<()>,
) -> anyhow::Result<()> {
    raw_mode.context("failed to disable raw mode")?;
    screen.context("failed to leave alternate screen")?;
    cursor.context("failed to show cursor")?;
    Ok(())
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    api: Arc<dyn RoadmapApi>,
    tick: Duration,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Outcome>(OUTCOME_CHANNEL_CAPACITY);
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(tick);
    let mut ui = TuiState::new();

    let health_api = api.clone();
    tokio::spawn(async move { log_health(health_api.as_ref()).await });

    loop {
        terminal
            .draw(|f| layout::draw(f, app, &mut ui, Instant::now()))
            .context("failed to draw frame")?;
        if ui.should_quit {
            break;
        }

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(ticket) = input::handle_key(app, &mut ui, key, Instant::now()) {
                        spawn_request(api.clone(), ticket, tx.clone());
                    }
                }
                Some(Ok(Event::Paste(text))) => input::handle_paste(app, &text),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("terminal event stream failed"),
                None => break,
            },
            Some((ticket, outcome)) = rx.recv() => {
                if app.complete_generate(ticket, outcome).await {
                    ui.reset_results();
                }
            }
            _ = ticker.tick() => {
                app.tick(Instant::now());
                ui.spinner = ui.spinner.wrapping_add(1);
            }
        }
    }
    tracing::info!("terminal UI closed");
    Ok(())
}

fn spawn_request(api: Arc<dyn RoadmapApi>, ticket: GenerateTicket, tx: mpsc::Sender<Outcome>) {
    tokio::spawn(async move {
        let outcome = api.generate(&ticket.request).await;
        if tx.send((ticket, outcome)).await.is_err() {
            tracing::debug!("UI gone before roadmap outcome arrived");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error;

    fn fail(msg: &str) -> std::io::Result<()> {
        Err(Error::other(msg.to_string()))
    }

    #[test]
    fn restore_reports_first_failure() {
        let err = restore_terminal(fail("raw"), fail("screen"), Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "failed to disable raw mode");

        let err = restore_terminal(Ok(()), Ok(()), fail("cursor")).unwrap_err();
        assert_eq!(err.to_string(), "failed to show cursor");

        assert!(restore_terminal(Ok(()), Ok(()), Ok(())).is_ok());
    }
}
