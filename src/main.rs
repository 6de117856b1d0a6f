use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use grid_snake::app::App;
use grid_snake::config::{EngineConfig, GridSize};
use grid_snake::game::GameEngine;
use grid_snake::input::InputHandler;
use grid_snake::renderer;
use grid_snake::score::{HighScore, ScoreStore};
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use log::{info, warn};

/// Longest wait for input between redraws.
const FRAME_BUDGET: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about = "Snake on a fixed grid, in the terminal")]
struct Cli {
    /// Side length of a square grid.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    grid: Option<u16>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Initial tick interval in milliseconds.
    #[arg(long)]
    speed: Option<u64>,

    /// Wrap around the edges instead of dying on them.
    #[arg(long)]
    wrap: bool,

    /// Seed food placement for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file (defaults to the per-user config when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// High score file.
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Write logs here; filter with RUST_LOG.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::load_default()?,
        };

        if let Some(dimension) = self.grid {
            config.grid = GridSize::square(dimension);
        }
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(initial_ms) = self.speed {
            config.speed.initial_ms = initial_ms;
        }
        if self.wrap {
            config.wrap_walls = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = cli.engine_config().context("invalid game configuration")?;
    let engine = match cli.seed {
        Some(seed) => GameEngine::new_with_seed(config, seed)?,
        None => GameEngine::new(config)?,
    };

    let store = cli.scores.clone().map_or_else(ScoreStore::default, ScoreStore::new);
    let high_score = match HighScore::load(store.clone()) {
        Ok(high_score) => high_score,
        Err(error) => {
            // Still on the normal screen, so the user sees this.
            eprintln!("Warning: {error}; starting from a high score of 0");
            warn!("high score load failed: {error}");
            HighScore::empty(store)
        }
    };

    install_panic_hook();
    run(App::new(engine, high_score, Instant::now()))
}

fn run(mut app: App) -> anyhow::Result<()> {
    let mut session = TerminalSession::enter().context("failed to set up terminal")?;
    let mut input = InputHandler::new();
    info!("starting with tick interval {:?}", app.tick_interval());

    loop {
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &app))?;

        let wait = app.time_until_tick(Instant::now()).min(FRAME_BUDGET);
        if let Some(game_input) = input.poll_input(wait)? {
            app.handle_input(game_input, Instant::now());
        }

        if app.should_quit() {
            break;
        }

        let _ = app.update(Instant::now());
    }

    info!("quit with high score {}", app.high_score());
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    // Raw mode owns stderr, so nothing is logged unless asked for.
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
