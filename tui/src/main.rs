//! Reisebot TUI Entry Point
//!
//! Launches the terminal chat widget for the Reisebot travel assistant.
//!
//! Usage:
//!   reisebot-tui [OPTIONS]
//!
//! Options:
//!   --base-url <URL>   Chat server (default: http://localhost:5000)
//!   --config <PATH>    Config file (default: ~/.config/reisebot/widget.toml)
//!   --log-file <PATH>  Write logs to a file (the terminal is busy drawing)

use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reisebot_tui::App;
use widget_core::config::default_config_path;
use widget_core::{
    load_config_with_overrides, ChatController, ConfigOverrides, HttpChatApi, WidgetConfig,
};

/// Terminal chat widget for the Reisebot travel assistant
#[derive(Debug, Parser)]
#[command(name = "reisebot-tui", version, about)]
struct Cli {
    /// Base URL of the chat server
    #[arg(long)]
    base_url: Option<String>,

    /// Path to the widget config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn build_config(cli: &Cli) -> anyhow::Result<WidgetConfig> {
    let path = cli.config.clone().or_else(default_config_path);

    let mut overrides = ConfigOverrides::new();
    if let Some(ref base_url) = cli.base_url {
        overrides = overrides.with_base_url(base_url.clone());
    }
    if let Some(ref log_file) = cli.log_file {
        overrides = overrides.with_log_file(log_file.clone());
    }

    Ok(load_config_with_overrides(path, &overrides)?)
}

/// Logs go to a file or nowhere; stdout belongs to the terminal UI
fn init_logging(config: &WidgetConfig) -> anyhow::Result<()> {
    let Some(ref path) = config.log_file else {
        return Ok(());
    };

    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    init_logging(&config)?;

    tracing::info!(
        base_url = %config.base_url,
        source = %config.source(),
        config_file = ?config.config_file_path,
        "Starting reisebot-tui"
    );

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: reisebot-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    let api = HttpChatApi::new(&config)?;
    let controller = ChatController::new(api, config);

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = terminal.size()?;
    let mut app = App::new(controller, (size.width, size.height));
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}
