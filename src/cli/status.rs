//! `statusctl status` — database and retention health at a glance.

use std::path::Path;

use anyhow::Result;
use chrono::{Duration, Local};
use colored::Colorize;

use crate::cli::{open_store, output};
use crate::config::Config;
use crate::record::{normalize, LogEntry};
use crate::report::calculate_statistics;
use crate::retention::RetentionEngine;
use crate::store::{RecordFilter, RecordStore};

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub async fn run_status(input: Option<&Path>) -> Result<()> {
    let config = Config::load(None)?;
    let store = open_store(&config, input)?;
    let now = Local::now().naive_local();
    let engine = RetentionEngine::new();

    println!();
    println!("  {}", "System status".bold());
    println!("  {}", DIVIDER.dimmed());
    println!();

    // An unreachable database is a reported state, not a command failure.
    let raw = match store.fetch(&RecordFilter::all()).await {
        Ok(raw) => raw,
        Err(e) => {
            println!("  {} Database: unreachable ({})", "✗".red().bold(), e);
            let status = serde_json::json!({
                "timestamp": now,
                "database": { "accessible": false, "error": e.to_string() },
            });
            let filename = format!("system_status_{}.json", output::timestamp(now));
            let path = output::save_json(&config.output_dir(), &filename, &status)?;
            println!();
            output::print_saved("Status report", &path);
            println!();
            return Ok(());
        }
    };

    let entries: Vec<LogEntry> = raw.iter().map(normalize).collect();
    let week_ago = now - Duration::days(7);
    let recent: Vec<LogEntry> = entries
        .iter()
        .filter(|e| e.date.map(|d| d >= week_ago).unwrap_or(false))
        .cloned()
        .collect();

    let stats = calculate_statistics(&recent);
    let validation = engine.validate(&entries, now)?;
    let schedule = engine.schedule(now)?;

    println!(
        "  {} Database: {} total records",
        "✓".green(),
        entries.len().to_string().bold()
    );
    println!(
        "  {} Recent: {} changes in last 7 days",
        "✓".green(),
        recent.len().to_string().bold()
    );
    if validation.violation_count == 0 {
        println!(
            "  {} Retention: {:.1}% compliant",
            "✓".green(),
            validation.compliance_rate
        );
    } else {
        println!(
            "  {} Retention: {:.1}% compliant ({} violations)",
            "⚠".yellow(),
            validation.compliance_rate,
            validation.violation_count
        );
    }
    println!(
        "  {} Next cleanup: {} ({} days)",
        "✓".green(),
        schedule.next_cleanup_date.format("%Y-%m-%d"),
        schedule.days_until_cleanup
    );

    if !recent.is_empty() {
        println!();
        println!("  {}", "Last 7 days:".dimmed());
        let teams: Vec<&str> = stats.by_team.keys().collect();
        if !teams.is_empty() {
            println!("  Teams:     {}", teams.join(", ").cyan());
        }
        let platforms: Vec<&str> = stats.by_platform.keys().collect();
        if !platforms.is_empty() {
            println!("  Platforms: {}", platforms.join(", ").cyan());
        }
        let top: Vec<&str> = stats.most_active_projects.keys().take(3).collect();
        if !top.is_empty() {
            println!("  Top projects: {}", top.join(", "));
        }
    }

    let status = serde_json::json!({
        "timestamp": now,
        "database": {
            "accessible": true,
            "total_records": entries.len(),
            "recent_7_days": recent.len(),
        },
        "retention": {
            "compliant": validation.violation_count == 0,
            "violations": validation.violation_count,
            "compliance_rate": validation.compliance_rate,
        },
        "recent_activity": {
            "last_7_days": {
                "total_changes": recent.len(),
                "active_teams": stats.by_team.len(),
                "active_platforms": stats.by_platform.keys().collect::<Vec<_>>(),
                "top_projects": stats.most_active_projects.keys().take(3).collect::<Vec<_>>(),
            },
        },
        "next_cleanup": {
            "date": schedule.next_cleanup_date.format("%Y-%m-%d").to_string(),
            "days_until": schedule.days_until_cleanup,
        },
    });
    let filename = format!("system_status_{}.json", output::timestamp(now));
    let path = output::save_json(&config.output_dir(), &filename, &status)?;
    println!();
    output::print_saved("Status report", &path);
    println!();

    Ok(())
}
