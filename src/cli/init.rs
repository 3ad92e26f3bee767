//! `statusctl init` — generate a starter configuration file.
//!
//! Creates a `.statusctl.yaml` in the current directory with commented
//! defaults. Designed to be the very first thing a new user runs.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{starter_yaml, CONFIG_FILE_NAME};

pub fn run_init(force: bool, output: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let output_file = output
        .map(PathBuf::from)
        .unwrap_or_else(|| cwd.join(CONFIG_FILE_NAME));

    if output_file.exists() && !force {
        println!(
            "{} A config file already exists at {}",
            "⚠".yellow(),
            output_file.display()
        );
        println!("  Use --force to overwrite it, or edit it directly.");
        return Ok(());
    }

    std::fs::write(&output_file, starter_yaml())
        .with_context(|| format!("Failed to write config file: {}", output_file.display()))?;

    println!();
    println!(
        "  {} Created {}",
        "✓".green().bold(),
        output_file.display().to_string().bold()
    );
    println!();
    println!("  {} The API token and database id are read from the", "ℹ".blue());
    println!("    environment, so they never live in the file:");
    println!("    {}", "export STATUSCTL_TOKEN=<integration token>".dimmed());
    println!("    {}", "export STATUSCTL_DATABASE_ID=<database id>".dimmed());
    println!();
    println!("  {} Next steps:", "→".blue());
    println!(
        "    1. Review the config: {}",
        format!("cat {}", output_file.display()).dimmed()
    );
    println!(
        "    2. Build this week's report: {}",
        "statusctl weekly".dimmed()
    );
    println!("    3. Check system health: {}", "statusctl status".dimmed());
    println!();

    Ok(())
}
