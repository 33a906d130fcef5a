use anyhow::Result;
use checkpointer::commands::{inspect, run};
use checkpointer::logging::init_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "checkpointer")]
#[command(about = "Periodic checkpointing for long-running work on unstable hosts", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a resumable epoch loop with autosave
    Run {
        /// TOML config file (CLI flags take precedence)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Snapshot path (.json or .yaml)
        #[arg(short = 's', long)]
        save_to: Option<PathBuf>,

        /// Seconds between autosave cycles
        #[arg(short, long)]
        period: Option<f64>,

        /// Stop after this many epochs
        #[arg(short, long, default_value_t = 10)]
        epochs: u64,

        /// Simulated duration of one epoch in milliseconds
        #[arg(long, default_value_t = 1000)]
        epoch_ms: u64,

        /// Ignore any existing snapshot
        #[arg(long)]
        force_restart: bool,

        /// Only save at the end (or on Ctrl-C)
        #[arg(long)]
        no_autosave: bool,
    },

    /// Print the fields stored in a snapshot
    Inspect {
        /// Path to the snapshot file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            save_to,
            period,
            epochs,
            epoch_ms,
            force_restart,
            no_autosave,
        } => run::execute(run::RunOptions {
            config,
            save_to,
            period_secs: period,
            epochs,
            epoch_ms,
            force_restart,
            no_autosave,
        }),
        Commands::Inspect { path } => inspect::execute(&path),
    }
}
