//! CLI entry point for the tripgraph analytics engine.
//!
//! Loads a graph snapshot, runs one query and writes the JSON result to
//! stdout. Logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use tripgraph_analytics::{load, AnalyticsEngine};
use tripgraph_core::{AnalyticsConfig, PathPolicy};

#[derive(Parser)]
#[command(name = "tripgraph")]
#[command(about = "BFS path search and PageRank over a location graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Graph snapshot (JSON) produced by the loader.
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Config file prefix (default: tripgraph).
    #[arg(short, long, default_value = "tripgraph", global = true)]
    config: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Shortest-hop path between two locations.
    Path {
        /// Start location name.
        #[arg(long)]
        start: String,
        /// End location name.
        #[arg(long)]
        end: String,
        /// Report every shortest path instead of the first one found.
        #[arg(long)]
        all_shortest: bool,
    },
    /// PageRank over trips; reports the highest and lowest ranked locations.
    Rank {
        /// Iteration cap (default: from config).
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Trip property used as the edge weight (default: from config).
        #[arg(long)]
        weight_property: Option<String>,
        /// Print the full ranking instead of the top and bottom locations.
        #[arg(long)]
        all: bool,
    },
    /// Location and trip counts of the snapshot.
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.log_json {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).json().init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    let mut config = AnalyticsConfig::load(&cli.config)?;
    if let Command::Path {
        all_shortest: true, ..
    } = cli.command
    {
        config.path_policy = PathPolicy::AllShortest;
    }

    let store = load::load_store(&cli.snapshot)?;
    let default_iterations = config.default_max_iterations;
    let default_weight_property = config.path_weight_property.clone();
    let engine = AnalyticsEngine::new(store).with_config(config)?;

    match cli.command {
        Command::Path { ref start, ref end, .. } => {
            let result = engine.find_path(start, end)?;
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Rank {
            max_iterations,
            ref weight_property,
            all,
        } => {
            let max_iterations = max_iterations.unwrap_or(default_iterations);
            let weight_property = weight_property.as_deref().unwrap_or(&default_weight_property);
            if all {
                let ranking = engine.rank_all(max_iterations, weight_property)?;
                println!("{}", serde_json::to_string(&ranking)?);
            } else {
                let result = engine.rank_nodes(max_iterations, weight_property)?;
                println!("{}", serde_json::to_string(&result)?);
            }
        }
        Command::Stats => {
            println!("{}", serde_json::to_string(&engine.stats())?);
        }
    }

    Ok(())
}
