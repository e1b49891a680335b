mod app;
mod input;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tasklist::client::{Remote, ScriptClient};
use tasklist::config::Config;
use tasklist::controller::{Effect, Outcome};
use tasklist::runtime;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "tasklist-tui", about = "tasklist terminal client")]
struct Args {
    /// Task endpoint URL (overrides config and TASKLIST_ENDPOINT).
    #[arg(long)]
    endpoint: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/tasklist/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file. The terminal itself never gets log output.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = Config::load(args.config.as_deref())?.with_endpoint_override(args.endpoint)?;
    let client = ScriptClient::new(&config)?;
    tracing::info!(endpoint = %client.endpoint(), "starting");
    let remote: Arc<dyn Remote> = Arc::new(client);

    let mut app = App::new();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, remote).await;

    // Restore terminal
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklist=info,tasklist_tui=info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    remote: Arc<dyn Remote>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let dispatch = |effect: Effect| {
        runtime::spawn(remote.clone(), effect, tx.clone());
    };

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            // Keyboard
            poll_result = tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(50))) => {
                if let Ok(Ok(true)) = poll_result
                    && let Ok(Event::Key(key)) = event::read()
                    && key.kind == KeyEventKind::Press
                    && let Some(effect) = input::handle_key(app, key)
                {
                    dispatch(effect);
                }
            }

            // Finished remote calls
            Some(outcome) = rx.recv() => {
                for effect in app.controller.apply(outcome) {
                    dispatch(effect);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
