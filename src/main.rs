use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use connect_four_arena::ai::{AiMoveClient, Algorithm, HttpAiClient};
use connect_four_arena::config::AppConfig;
use connect_four_arena::logging;
use connect_four_arena::session::MatchStateMachine;
use connect_four_arena::ui::App;

/// Play Connect Four against a remote search AI.
#[derive(Parser)]
#[command(name = "connect_four_arena", about = "Play Connect Four against a remote AI")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the AI service base URL
    #[arg(long)]
    server: Option<String>,

    /// Override the search algorithm: minimax, minimax_alpha_beta or expectiminimax
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// Override the search depth (2-8)
    #[arg(long)]
    depth: Option<u8>,

    /// Check that the AI service is reachable, then exit
    #[arg(long)]
    check: bool,

    /// Print the default configuration as TOML, then exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    // Load configuration; validated once the CLI overrides are in
    if !cli.config.exists() {
        eprintln!(
            "Warning: config file '{}' not found, using defaults",
            cli.config.display()
        );
    }
    let mut config = AppConfig::read_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }
    if let Some(algorithm) = cli.algorithm {
        config.game.algorithm = algorithm;
    }
    if let Some(depth) = cli.depth {
        config.game.depth = depth;
    }
    config.validate().context("invalid settings")?;

    logging::init(&config.logging)
        .with_context(|| format!("opening log file {}", config.logging.file.display()))?;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let client = HttpAiClient::new(config.server.base_url.clone());

    if cli.check {
        if runtime.block_on(client.health_check()) {
            println!("AI service at {} is up", client.base_url());
            return Ok(());
        }
        bail!("AI service at {} is not reachable", client.base_url());
    }

    info!(
        server = client.base_url(),
        algorithm = %config.game.algorithm,
        depth = config.game.depth,
        "starting"
    );
    let machine = MatchStateMachine::new(client, config.ai_settings(), config.ingestor())
        .context("invalid AI settings")?;
    let mut app = App::new(machine, runtime.handle().clone())
        .with_score_cross_check(config.game.cross_check_score);

    run_tui(&mut app).context("terminal UI failed")
}

fn run_tui(app: &mut App<HttpAiClient>) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore the terminal even when the app failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
