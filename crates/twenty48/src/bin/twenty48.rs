//! # TWENTY48 Terminal
//!
//! Plays the game on stdin/stdout, one command per line.
//!
//! ```bash
//! twenty48                              # resume ~/gamestate.json
//! twenty48 --seed 7 --state /tmp/g.json # reproducible game elsewhere
//! RUST_LOG=debug twenty48               # verbose logs on stderr
//! ```
//!
//! Commands: `w a s d`, `h j k l` or arrow names to move, `n` for a new
//! game, `debug` to toggle the debug controls, then `win` / `lose` to force an
//! ending, `q` to save and quit. End of input also saves.

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use twenty48::{parse_command, GameConfig, GameDriver, JsonFileStore, TextRenderer};

#[derive(Parser, Debug)]
#[command(name = "twenty48", version, about = "Slide tiles, merge pairs, reach 2048")]
struct Args {
    /// TOML settings file; a missing file means defaults
    #[arg(short, long, value_name = "FILE", default_value = "twenty48.toml")]
    config: PathBuf,

    /// Seed for reproducible tile spawns
    #[arg(long)]
    seed: Option<u64>,

    /// Saved-game file (defaults to ~/gamestate.json)
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Skip waiting for tile pulses between commands
    #[arg(long)]
    no_animation: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let mut config = match GameConfig::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.state.is_some() {
        config.save_path = args.state;
    }

    let store = JsonFileStore::new(config.state_path());
    tracing::info!("saved game: {}", store.path().display());

    let renderer = TextRenderer::new(std::io::stdout());
    let mut driver = match GameDriver::new(&config, store, renderer) {
        Ok(driver) => driver,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match driver.start() {
        Ok(outcome) => tracing::info!("start-up: {outcome:?}"),
        Err(err) => tracing::warn!("could not draw the board: {err}"),
    }

    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!("stdin closed: {err}");
                break;
            }
        };
        let Some(command) = parse_command(&line) else {
            tracing::debug!("ignoring input {line:?}");
            continue;
        };

        match driver.submit(command) {
            Ok(true) => {}
            Ok(false) => return ExitCode::SUCCESS,
            Err(err) => tracing::warn!("could not draw the board: {err}"),
        }
        if !args.no_animation {
            driver.animate(std::thread::sleep);
        }
    }

    if let Err(err) = driver.shutdown() {
        tracing::warn!("could not save on exit: {err}");
    }
    ExitCode::SUCCESS
}
