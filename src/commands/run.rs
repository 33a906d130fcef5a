//! Run command - a resumable epoch loop with periodic checkpointing
//!
//! Each simulated epoch advances the `epoch` field and records a `loss`.
//! Killing the process and running it again resumes from the last saved
//! epoch. Ctrl-C stops autosave and writes a final checkpoint.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::checkpoint::CheckpointState;
use crate::config::CheckpointConfig;

const DEFAULT_SAVE_PATH: &str = "checkpoint.json";

/// Options for the run command, mapped from CLI flags
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// TOML config file; CLI flags override its values
    pub config: Option<PathBuf>,
    pub save_to: Option<PathBuf>,
    pub period_secs: Option<f64>,
    pub epochs: u64,
    pub epoch_ms: u64,
    pub force_restart: bool,
    pub no_autosave: bool,
}

/// Execute the run command, installing a Ctrl-C handler
pub fn execute(options: RunOptions) -> Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("Failed to install Ctrl-C handler")?;

    run_epochs(&options, &interrupted).map(|_| ())
}

/// Build the checkpoint config from the optional file and CLI overrides.
pub fn build_config(options: &RunOptions) -> Result<CheckpointConfig> {
    let mut config = match &options.config {
        Some(path) => CheckpointConfig::from_toml_file(path)?,
        None => CheckpointConfig::new(DEFAULT_SAVE_PATH),
    };

    if let Some(path) = &options.save_to {
        config.save_path = path.clone();
    }
    if let Some(secs) = options.period_secs {
        config.autosave_period =
            Duration::try_from_secs_f64(secs).context("Invalid autosave period")?;
    }
    if options.force_restart {
        config.force_restart = true;
    }
    if options.no_autosave {
        config.autosave_enabled = false;
    }
    config.fields.entry("epoch".to_string()).or_insert(json!(0));
    config.validate()?;
    Ok(config)
}

/// Run epochs until `options.epochs` is reached or `interrupted` is set.
///
/// Returns the epoch reached. The final checkpoint is always written.
pub fn run_epochs(options: &RunOptions, interrupted: &AtomicBool) -> Result<u64> {
    let config = build_config(options)?;
    let save_path = config.save_path.clone();
    let state = CheckpointState::create(config).context("Failed to set up checkpoint state")?;

    let mut epoch: u64 = state.get_as("epoch")?;
    println!(
        "{} Starting at epoch {}/{} (checkpoint: {})",
        "→".cyan().bold(),
        epoch,
        options.epochs,
        save_path.display()
    );

    while epoch < options.epochs {
        if interrupted.load(Ordering::SeqCst) {
            println!("{} Interrupted at epoch {}", "!".yellow().bold(), epoch);
            break;
        }
        thread::sleep(Duration::from_millis(options.epoch_ms));

        let loss = 1.0 / (epoch as f64 + 2.0);
        state.set("loss", &loss)?;
        epoch = state.update("epoch", |e: u64| e + 1)?;
        println!("Epoch [{}/{}], Loss: {:.4}", epoch, options.epochs, loss);
    }

    if state.autosave_enabled() {
        state.interrupt();
    }
    state.save().context("Final checkpoint save failed")?;
    println!(
        "{} Saved epoch {} to {}",
        "✓".green().bold(),
        epoch,
        state.save_path().display()
    );
    Ok(epoch)
}
