//! Inspect command - prints the fields stored in a snapshot

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::fields::Fields;
use crate::persist::{FileEngine, PersistenceEngine, SnapshotFormat};

/// Execute the inspect command for the snapshot at `path`
pub fn execute(path: &Path) -> Result<()> {
    let fields = FileEngine::default()
        .read(path)
        .with_context(|| format!("Failed to read checkpoint: {}", path.display()))?
        .ok_or_else(|| anyhow!("No checkpoint found at {}", path.display()))?;

    let modified: DateTime<Local> = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("Failed to stat checkpoint: {}", path.display()))?
        .into();

    println!(
        "{} {} ({}, saved {})",
        "Checkpoint".bold(),
        path.display(),
        SnapshotFormat::from_path(path),
        modified.format("%Y-%m-%d %H:%M:%S")
    );
    for line in render_fields(&fields) {
        println!("{line}");
    }
    Ok(())
}

fn render_fields(fields: &Fields) -> Vec<String> {
    if fields.is_empty() {
        return vec![format!("  {}", "(no fields)".dimmed())];
    }
    fields
        .iter()
        .map(|(name, value)| format!("  {} = {}", name.cyan(), value))
        .collect()
}
