mod app;
mod backend;
mod global_prefs;
mod handlers;
mod logging;
mod model;
mod services;
mod state;
mod ui;

use std::{error::Error, io, path::PathBuf, sync::Arc, time::Duration};

use app::App;
use backend::{Backend, BackendEvent, BackendRequest, InMemoryBackend};
use clap::Parser;
use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use global_prefs::LocalPrefs;
use ratatui::{backend::CrosstermBackend, Terminal};
use state::AppConfig;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Terminal client for HackMate.
#[derive(Debug, Parser)]
#[command(name = "hackmate", version, about)]
struct Cli {
    /// Callsign of the signed-in operative in the demo data set.
    #[arg(long)]
    user: Option<String>,

    /// File that receives log output.
    #[arg(long, default_value = "hackmate.log")]
    log_file: PathBuf,

    /// Default log filter when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seconds between background snapshot refreshes.
    #[arg(long, default_value_t = 15)]
    refresh_secs: u64,
}

/// Application events
enum AppEvent {
    Terminal(CEvent),
    Backend(BackendEvent),
    Tick,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_file, &cli.log_level)?;
    let prefs = global_prefs::init_local_prefs(LocalPrefs::config_path());

    let config = AppConfig {
        refresh_interval: Duration::from_secs(cli.refresh_secs.max(1)),
        ..AppConfig::default()
    };
    info!(user = ?cli.user, refresh = ?config.refresh_interval, "starting hackmate");

    // Backend worker
    let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::seeded(cli.user.as_deref()));
    let (tx_to_backend, rx_from_ui) = mpsc::unbounded_channel::<BackendRequest>();
    let (tx_to_ui, mut rx_from_backend) = mpsc::unbounded_channel::<BackendEvent>();
    tokio::spawn(backend::run_worker(backend, rx_from_ui, tx_to_ui, config.refresh_interval));

    let tick_rate = config.tick_rate;
    let mut app = App::new(tx_to_backend, config, &prefs);
    app.send(BackendRequest::Refresh);

    // Enable terminal raw mode
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    // Terminal input and ticks
    let event_tx_clone = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_rate);
        loop {
            interval.tick().await;
            // Drain everything that is already waiting, without blocking.
            while event::poll(Duration::from_millis(0)).unwrap_or(false) {
                match event::read() {
                    Ok(event) => {
                        if event_tx_clone.send(AppEvent::Terminal(event)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read terminal event");
                        break;
                    }
                }
            }
            if event_tx_clone.send(AppEvent::Tick).is_err() {
                return;
            }
        }
    });

    // Backend events
    tokio::spawn(async move {
        while let Some(event) = rx_from_backend.recv().await {
            if event_tx.send(AppEvent::Backend(event)).is_err() {
                break;
            }
        }
    });

    let result = run_app(&mut app, &mut terminal, &mut event_rx).await;

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "ui loop ended with an error");
    }
    info!("hackmate stopped");
    result
}

async fn run_app(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<(), Box<dyn Error>> {
    while !app.ui.should_quit {
        terminal.draw(|f| ui::ui(f, app))?;

        let Some(event) = events.recv().await else { break };
        match event {
            AppEvent::Terminal(CEvent::Key(key)) => handlers::handle_key_event(key, app),
            AppEvent::Terminal(_) => {}
            AppEvent::Backend(event) => app.handle_backend_event(event),
            AppEvent::Tick => app.on_tick(),
        }
    }
    Ok(())
}
