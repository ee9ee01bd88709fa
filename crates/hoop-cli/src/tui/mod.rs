//! Interactive terminal wizard: six intake steps, generation, and the plan view.

pub mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use hoop_core::loading::{LoadingTicker, MESSAGE_INTERVAL};
use hoop_core::{GenerateError, PlanRequest, Planner};

use app::{Action, App};

/// A generation running in the background while the UI keeps drawing.
struct Generation {
    handle: JoinHandle<Result<Value, GenerateError>>,
    ticker: LoadingTicker,
    messages: watch::Receiver<&'static str>,
}

impl Generation {
    fn start(planner: Arc<dyn Planner>, request: PlanRequest) -> Self {
        let (tx, messages) = watch::channel("");
        let ticker = LoadingTicker::spawn(MESSAGE_INTERVAL, tx);
        let handle = tokio::spawn(async move { planner.plan(&request).await });
        Self {
            handle,
            ticker,
            messages,
        }
    }

    async fn finish(self) -> Result<Value, String> {
        self.ticker.stop().await;
        match self.handle.await {
            Ok(outcome) => outcome.map_err(|e| e.to_string()),
            Err(e) => Err(format!("generation task failed: {e}")),
        }
    }

    fn abort(self) {
        self.ticker.cancel();
        self.handle.abort();
    }
}

/// Launch the wizard. Exported plans are written to `export_dir`.
pub async fn run_wizard(planner: Arc<dyn Planner>, export_dir: PathBuf) -> Result<()> {
    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(export_dir);

    let result = run_event_loop(&mut terminal, &mut app, planner).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    planner: Arc<dyn Planner>,
) -> Result<()> {
    let tick_rate = app.tick_rate;
    let mut generation: Option<Generation> = None;

    loop {
        if let Some(running) = &generation {
            app.loading_message = *running.messages.borrow();
            if running.handle.is_finished() {
                if let Some(done) = generation.take() {
                    let outcome = done.finish().await;
                    app.finish_generation(outcome);
                }
            }
        }

        // Render.
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with a timeout matching the tick rate.
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // Clear status message on any keypress.
                app.status_message = None;

                if let Action::Submit(request) = app.handle_key(key) {
                    tracing::debug!(days = request.available_days.len(), "submitting plan request");
                    generation = Some(Generation::start(Arc::clone(&planner), request));
                }
            }
        } else {
            app.on_tick();
        }

        if app.should_quit {
            if let Some(running) = generation.take() {
                running.abort();
            }
            return Ok(());
        }
    }
}
