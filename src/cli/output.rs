//! Report output: JSON files in the configured directory plus the shared
//! terminal summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use colored::Colorize;
use serde::Serialize;

use crate::report::{Report, ReportPeriod};

/// Timestamp suffix for report filenames.
pub fn timestamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Write `value` as pretty JSON under `dir`, creating the directory if
/// needed. Returns the full path written.
pub fn save_json<T: Serialize>(dir: &Path, filename: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(filename);
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    fs::write(&path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(path)
}

pub fn print_saved(label: &str, path: &Path) {
    println!(
        "  {} {} saved to {}",
        "✓".green().bold(),
        label,
        path.display().to_string().cyan()
    );
}

/// Human summary of a report: headline counts, team and platform
/// breakdowns, top transitions.
pub fn print_report_summary(report: &Report) {
    let title = match &report.period {
        ReportPeriod::Weekly { .. } => "Weekly Status Report".to_string(),
        ReportPeriod::Monthly {
            month_name, year, ..
        } => format!("Monthly Status Report - {} {}", month_name, year),
    };

    println!();
    println!("  {}", title.bold());
    println!(
        "  {}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".dimmed()
    );
    println!();
    println!(
        "  Period:          {} to {}",
        report.period.start().format("%Y-%m-%d"),
        report.period.end().format("%Y-%m-%d")
    );
    println!(
        "  Total changes:   {}",
        report.summary.total_changes.to_string().bold()
    );
    println!("  Active projects: {}", report.summary.unique_projects);
    println!("  Active teams:    {}", report.summary.active_teams);

    if !report.by_team.is_empty() {
        println!();
        println!("  {}", "By team:".dimmed());
        for (team, slice) in &report.by_team {
            let label = if team.is_empty() {
                "(unassigned)"
            } else {
                team.as_str()
            };
            println!(
                "    {}: {} changes across {} projects",
                label.cyan(),
                slice.count,
                slice.projects.len()
            );
        }
    }

    if !report.by_platform.is_empty() {
        let parts: Vec<String> = report
            .by_platform
            .iter()
            .map(|(platform, slice)| {
                let label = if platform.is_empty() {
                    "(none)"
                } else {
                    platform.as_str()
                };
                format!("{}: {}", label, slice.count)
            })
            .collect();
        println!();
        println!("  Platforms:       {}", parts.join(" | "));
    }

    if !report.by_status.is_empty() {
        println!();
        println!("  {}", "Top transitions:".dimmed());
        for (transition, count) in report.by_status.iter().take(5) {
            println!("    {}  {}", transition, count.to_string().bold());
        }
    }

    println!();
}
