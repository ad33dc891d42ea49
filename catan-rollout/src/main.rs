//! Drive Catan episodes against a running game server.

use anyhow::{Context, Result};
use catan_core::{action_space, ObservationSchema, RandomPolicy};
use catan_env::EpisodeController;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

mod rollout;
mod settings;

use rollout::{run_episode, RunSummary};
use settings::Settings;

#[derive(Parser)]
#[command(name = "catan-rollout")]
#[command(about = "Run Catan episodes against a game server")]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// JSON settings file: {"env": {...}, "server": {...}}
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play episodes with a uniform random policy
    Run {
        /// Number of episodes
        #[arg(short, long, default_value_t = 1)]
        episodes: usize,

        /// Policy seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,

        /// WebSocket endpoint path
        #[arg(long)]
        path: Option<String>,

        /// Step cap per episode
        #[arg(long)]
        max_steps: Option<u64>,
    },

    /// Print the observation and action spaces as JSON
    Spaces,
}

#[derive(Serialize)]
struct SlotInfo {
    name: String,
    cardinality: u32,
}

#[derive(Serialize)]
struct Spaces {
    observation: Vec<SlotInfo>,
    action: Vec<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = std::str::FromStr::from_str(&cli.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    // Try ensuring .env is loaded if present
    let _ = dotenvy::dotenv();

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_env()?;

    match cli.command {
        Commands::Run {
            episodes,
            seed,
            host,
            port,
            path,
            max_steps,
        } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(path) = path {
                settings.server.path = path;
            }
            if let Some(max_steps) = max_steps {
                settings.env.max_episode_steps = max_steps;
            }
            run(settings, episodes, seed)
        }
        Commands::Spaces => print_spaces(&settings),
    }
}

fn run(settings: Settings, episodes: usize, seed: u64) -> Result<()> {
    log::info!(
        "Running {} episode(s) against {} (seed {})",
        episodes,
        settings.server.url(),
        seed
    );

    let mut env = EpisodeController::connect(settings.server, settings.env);
    let mut policy = RandomPolicy::new(seed);
    let mut results = Vec::with_capacity(episodes);

    for episode in 0..episodes {
        let summary = run_episode(&mut env, &mut policy)
            .with_context(|| format!("episode {episode} failed"))?;
        log::info!(
            "Episode {} | reward {:+.3} | steps {} | invalid {} | rejected {}{}",
            episode,
            summary.reward,
            summary.steps,
            summary.invalid,
            summary.rejected,
            if summary.capped { " | capped" } else { "" }
        );
        results.push(summary);
    }

    let run = RunSummary::from_episodes(&results);
    println!("{}", serde_json::to_string_pretty(&run)?);
    Ok(())
}

fn print_spaces(settings: &Settings) -> Result<()> {
    let schema = ObservationSchema::new(settings.env.topology);
    let spaces = Spaces {
        observation: schema
            .slots()
            .iter()
            .map(|slot| SlotInfo {
                name: slot.name(),
                cardinality: slot.cardinality(),
            })
            .collect(),
        action: action_space().nvec,
    };
    println!("{}", serde_json::to_string_pretty(&spaces)?);
    Ok(())
}
