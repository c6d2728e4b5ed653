use anyhow::{Context, Result, bail};
use clap::Parser;
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::modes::HumanMode;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic snake on a square grid, in the terminal")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square board
    #[arg(long)]
    board_size: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log (the terminal is taken by the game)
    #[arg(long, default_value = "grid_snake.log")]
    log_file: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(board_size) = self.board_size {
            config.board_size = board_size;
            // A fixed food cell that no longer fits falls back to random placement.
            config.initial_food = config.initial_food.filter(|food| food.is_within(board_size));
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }

        if let Err(message) = config.validate() {
            bail!("Invalid game configuration: {}", message);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("starting with {:?}", config);

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    // Ticks and key events are handled on one thread, one at a time.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(async {
        let mut human_mode = HumanMode::new(engine);
        human_mode.run().await
    })
}
