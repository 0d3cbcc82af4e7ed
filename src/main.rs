use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sdf_worms::{SimulationError, WormsConfig};

/// Raymarched worms simulated on the GPU.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON settings file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of worms
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Seed for the initial positions and headings
    #[arg(short, long)]
    seed: Option<u64>,
}

fn load(cli: &Cli) -> Result<WormsConfig, SimulationError> {
    let mut config = match &cli.config {
        Some(path) => WormsConfig::load(path)?,
        None => WormsConfig::default(),
    };
    if let Some(count) = cli.count {
        config = config.with_agent_count(count);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match load(&cli).and_then(sdf_worms::window::run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
