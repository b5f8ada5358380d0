//! Strata CLI entry point

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strata_core::StrategyKind;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::Overrides;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Layer dependency graphs and trace per-layer renaming", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./strata.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

/// Graph source and run parameters shared by the subcommands.
#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Load the graph from a JSON snapshot instead of generating one
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Number of nodes to generate
    #[arg(short, long)]
    nodes: Option<usize>,

    /// Edge probability between any two generated nodes
    #[arg(short, long)]
    density: Option<f64>,

    /// Seed for reproducible runs
    #[arg(short, long, env = "STRATA_SEED")]
    seed: Option<u64>,

    /// Layering strategy: duplicate | kahn
    #[arg(long)]
    strategy: Option<StrategyKind>,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            nodes: self.nodes,
            edge_density: self.density,
            seed: self.seed,
            strategy: self.strategy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Layer the graph, transform every layer and print full histories
    Run {
        #[command(flatten)]
        args: RunArgs,

        /// Write the transformed graph to this snapshot file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the lineage report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a random graph snapshot
    Generate {
        #[command(flatten)]
        args: RunArgs,

        /// Snapshot file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the layer report only
    Layers {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Print graph metrics, cycle groups and optionally a dependency path
    Analyze {
        #[command(flatten)]
        args: RunArgs,

        /// Path start (canonical id)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Path end (canonical id)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins when set
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strata={log_level},strata_core={log_level}")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Strata v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Run { args, output, json } => {
            let config = commands::resolve_config(config_path, &args.overrides(), args.input.is_none())?;
            commands::run(&config, args.input.as_deref(), output.as_deref(), json)
        }
        Commands::Generate { args, output } => {
            let config = commands::resolve_config(config_path, &args.overrides(), true)?;
            commands::generate(&config, output.as_deref())
        }
        Commands::Layers { args } => {
            let config = commands::resolve_config(config_path, &args.overrides(), args.input.is_none())?;
            commands::layers(&config, args.input.as_deref())
        }
        Commands::Analyze { args, from, to } => {
            let config = commands::resolve_config(config_path, &args.overrides(), args.input.is_none())?;
            commands::analyze(&config, args.input.as_deref(), from.zip(to))
        }
        Commands::Version => {
            println!("Strata v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
