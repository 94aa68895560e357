//! Exposure Dash - a terminal dashboard for AEGL exposure analysis.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use exposure_dash::api::{AnalysisMode, HttpClient};
use exposure_dash::app::App;
use exposure_dash::config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use exposure_dash::error::DashError;
use exposure_dash::grid::GroupedFigures;
use exposure_dash::ui;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "exposure-dash", version)]
#[command(about = "A terminal dashboard for chemical exposure (AEGL) analysis", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Base URL of the analysis API
    #[arg(long, env = "EXPOSURE_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Initial analysis mode (gaseous or aqueous)
    #[arg(long, default_value = "gaseous")]
    mode: AnalysisMode,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tier/duration grouping of a saved analysis response
    Grid {
        /// JSON file holding an /analyze response or a bare figure grid
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Exposure Dash");
    }

    if let Some(Command::Grid { file }) = &args.command {
        if let Err(err) = print_grid(file) {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
        return Ok(());
    }

    // Validate configuration before touching the terminal
    let config = match ApiConfig::new(&args.base_url) {
        Ok(config) => config.with_timeout(Duration::from_secs(args.timeout)),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        },
    };
    tracing::info!(base_url = config.base_url(), timeout = args.timeout, "API configured");
    let client = HttpClient::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let app = App::new(Arc::new(client), args.mode);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("Exposure Dash exited");
    }

    Ok(())
}

fn print_grid(path: &Path) -> exposure_dash::Result<()> {
    let raw =
        std::fs::read_to_string(path).map_err(|e| DashError::file_open(path.to_path_buf(), e))?;
    let document: serde_json::Value = serde_json::from_str(&raw)?;
    let grouped = GroupedFigures::from_document(&document)?;

    if grouped.is_empty() {
        println!("No AEGL figure groups");
    }
    for (prefix, set) in grouped.iter() {
        let figures: Vec<&str> = set.present().into_iter().map(|f| f.key()).collect();
        println!("{}: {}", prefix, figures.join(", "));
    }
    for ignored in grouped.ignored() {
        println!("ignored {}: {}", ignored.key, ignored.reason);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key) {
                    return Ok(());
                }
            },
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {},
        }
    }
}
