//! `statusctl cleanup` — plan or run the monthly retention cleanup.

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use crate::cli::{open_store, output};
use crate::config::Config;
use crate::retention::{cutoff_for, PlanOutcome, RetentionEngine};
use crate::store::{fetch_entries, RecordFilter};

pub async fn run_cleanup(execute: bool, confirm: bool, input: Option<&Path>) -> Result<()> {
    let config = Config::load(None)?;
    let store = open_store(&config, input)?;
    let now = Local::now().naive_local();

    // --execute always wins; otherwise the config decides (dry-run by default).
    let dry_run = if execute { false } else { config.retention.dry_run };
    let engine = if dry_run {
        RetentionEngine::new()
    } else {
        RetentionEngine::live()
    };

    let cutoff = cutoff_for(now)?;

    println!();
    println!("  {}", "Retention cleanup".bold());
    println!(
        "  Cutoff: records older than {}",
        cutoff.format("%Y-%m-%d").to_string().cyan()
    );
    if engine.is_dry_run() {
        println!(
            "  Mode:   {} (no records will be archived)",
            "dry-run".yellow()
        );
    } else {
        println!("  Mode:   {}", "live".red().bold());
    }

    let filter = RecordFilter::older_than(cutoff);
    let entries = fetch_entries(store.as_ref(), &filter).await;
    let plan = engine
        .evaluate_and_plan(&entries, now, confirm, store.as_ref())
        .await?;

    println!();
    println!(
        "  {} Found {} records to delete",
        "✓".green(),
        plan.candidate_count.to_string().bold()
    );
    if let (Some(oldest), Some(newest)) = (plan.oldest, plan.newest) {
        println!(
            "  {} Date range: {} to {}",
            "✓".green(),
            oldest.format("%Y-%m-%d"),
            newest.format("%Y-%m-%d")
        );
    }
    if !plan.per_team_count.is_empty() {
        println!("  {} By team:", "✓".green());
        for (team, count) in &plan.per_team_count {
            let label = if team.is_empty() {
                "(unassigned)"
            } else {
                team.as_str()
            };
            println!("    - {}: {}", label, count);
        }
    }

    println!();
    match &plan.outcome {
        PlanOutcome::Success => {
            println!("  {} No expired records found", "✓".green().bold());
        }
        PlanOutcome::NotConfirmed => {
            println!(
                "  {} Cleanup not confirmed. Use --confirm to proceed.",
                "⚠".yellow()
            );
        }
        PlanOutcome::DryRun => {
            println!(
                "  {} DRY RUN: would delete {} records",
                "ℹ".blue(),
                plan.candidate_count
            );
            println!(
                "  {}",
                "Re-run with --execute --confirm to archive them.".dimmed()
            );
        }
        PlanOutcome::Completed { deleted_ids, failed } => {
            println!(
                "  {} Deleted {} records",
                "✓".green().bold(),
                deleted_ids.len().to_string().bold()
            );
            if !failed.is_empty() {
                println!("  {} {} deletions failed:", "⚠".yellow(), failed.len());
                for failure in failed {
                    println!("    - {}: {}", failure.id, failure.error);
                }
            }
        }
    }

    // The plan is saved even for dry runs so there is a paper trail of
    // every cleanup decision.
    let filename = format!("retention_report_{}.json", output::timestamp(now));
    let path = output::save_json(&config.output_dir(), &filename, &plan)?;
    println!();
    output::print_saved("Report", &path);
    println!();

    Ok(())
}
