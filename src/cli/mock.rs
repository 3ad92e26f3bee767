//! `statusctl mock` — write a deterministic sample data dump.
//!
//! The dump is a JSON array of raw records, loadable with `--input` on
//! every other command. Same seed, same output.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, NaiveTime};
use colored::Colorize;

use crate::mock::MockGenerator;

pub fn run_mock(out: &Path, count: usize, seed: u64) -> Result<()> {
    // Dates are generated against today's midnight, not the current
    // instant, so reruns with the same seed on the same day are identical.
    let now = NaiveDateTime::new(Local::now().date_naive(), NaiveTime::MIN);
    let records = MockGenerator::new(seed, now).generate(count);

    let json = serde_json::to_string_pretty(&records)
        .context("Failed to serialize sample records")?;
    std::fs::write(out, json)
        .with_context(|| format!("Failed to write sample data: {}", out.display()))?;

    println!();
    println!(
        "  {} Wrote {} sample records to {}",
        "✓".green().bold(),
        records.len().to_string().bold(),
        out.display().to_string().cyan()
    );
    println!(
        "  {} Try: {}",
        "→".blue(),
        format!("statusctl weekly --input {}", out.display()).dimmed()
    );
    println!();

    Ok(())
}
