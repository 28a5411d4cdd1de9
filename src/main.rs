//! Stepform - terminal front-end for schema-driven multi-step forms
//!
//! Usage: `stepform [schema.json]`. Progress is saved as a draft on every
//! Next and on Submit, and restored on the next start.

mod app;
mod config;
mod ui;

use anyhow::{Context, Result};
use app::App;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use stepform::{load_schema_str, DraftStore, FileDraftStore, FormEngine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = AppConfig::load()?;
    let schema_path = config
        .resolve_schema_path(std::env::args_os().nth(1).map(PathBuf::from))
        .context("No schema given: pass a path or set schema_path in config.json")?;
    let raw = fs::read_to_string(&schema_path)
        .with_context(|| format!("Failed to read schema {}", schema_path.display()))?;
    let schema = load_schema_str(&raw)
        .with_context(|| format!("Invalid schema {}", schema_path.display()))?;

    let draft_path = config
        .resolve_draft_path()
        .context("Could not determine where to keep the draft; set draft_path in config.json")?;
    let store = FileDraftStore::new(draft_path);
    tracing::info!("Using draft {}", store.path().display());

    let engine = FormEngine::with_options(schema, store, config.engine_options());
    let mut app = App::new(engine);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    if app.engine.is_submitted() {
        println!("Form submitted.");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: DraftStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
