//! userdesk binary entry point.
//!
//! Reads settings, starts file logging, puts the terminal in raw mode, runs
//! the TUI event loop on a single-threaded runtime and restores the terminal
//! on exit.
//!
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use userdesk::api::ApiClient;
use userdesk::app::keymap::Keymap;
use userdesk::app::settings::{SETTINGS_FILE, Settings, config_file_path};
use userdesk::app::{self, AppState, Theme};
use userdesk::error::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "userdesk", version, about = "TUI client for a user administration backend")]
struct Cli {
    /// Backend address, e.g. http://192.168.1.89:5000
    #[arg(long, env = "USERDESK_BASE_URL")]
    base_url: Option<String>,

    /// Settings file (default: <config dir>/userdesk.conf)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: <config dir>/userdesk.log)
    #[arg(long, env = "USERDESK_LOG")]
    log_file: Option<PathBuf>,
}

/// Log to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path, default_filter: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.config.clone().unwrap_or_else(|| config_file_path(SETTINGS_FILE));
    let settings = Settings::load_or_init(&settings_path)?.with_base_url(cli.base_url);
    let log_path = cli.log_file.unwrap_or_else(|| config_file_path("userdesk.log"));
    init_logging(&log_path, &settings.log_filter)?;
    tracing::info!(config = %settings_path.display(), base_url = %settings.base_url, "settings loaded");

    let api = ApiClient::new(settings.base_url.clone());
    let theme = Theme::load_or_init(&config_file_path("theme.conf"));
    let keymap = Keymap::load_or_init(&config_file_path("keybinds.conf"));
    let mut state = AppState::new(theme, keymap, settings.base_url);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {e}"))?;

    let res = app::run(&mut terminal, &mut state, &api).await;

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
