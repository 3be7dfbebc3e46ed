//! formfind CLI — relaxation runs, topology statistics, config validation.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "formfind")]
#[command(version, about = "formfind — particle-spring form-finding engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relax a grid and print ΣF·L per frame.
    Run {
        /// Path to run config (TOML). Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<String>,

        /// Connectivity pattern (grid, bracing, random_diagonal, centroid).
        #[arg(short, long)]
        pattern: Option<String>,

        /// Vertices per side.
        #[arg(short, long)]
        resolution: Option<usize>,

        /// Number of frames to run.
        #[arg(short, long)]
        frames: Option<u32>,

        /// Seed for the random_diagonal pattern.
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },

    /// Print vertex, edge, and anchor counts for a pattern.
    Topology {
        /// Connectivity pattern (grid, bracing, random_diagonal, centroid, all).
        #[arg(short, long, default_value = "all")]
        pattern: String,

        /// Vertices per side.
        #[arg(short, long, default_value_t = formfind_types::constants::DEFAULT_RESOLUTION)]
        resolution: usize,

        /// Seed for the random_diagonal pattern.
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },

    /// Validate a run config.
    Validate {
        /// Path to config file (TOML).
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            pattern,
            resolution,
            frames,
            seed,
        } => commands::run(&commands::RunOverrides {
            config,
            pattern,
            resolution,
            frames,
            seed,
        }),
        Commands::Topology {
            pattern,
            resolution,
            seed,
        } => commands::topology(&pattern, resolution, seed),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
