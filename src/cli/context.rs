//! `statusctl context` — build an AI-ready context bundle from recent
//! activity.

use std::path::Path;

use anyhow::Result;
use chrono::{Duration, Local};
use colored::Colorize;

use crate::cli::{open_store, output};
use crate::config::Config;
use crate::feed::build_context;
use crate::store::{fetch_entries, RecordFilter};

pub async fn run_context(
    days: Option<u32>,
    max_records: Option<usize>,
    input: Option<&Path>,
    no_save: bool,
) -> Result<()> {
    let config = Config::load(None)?;
    let store = open_store(&config, input)?;
    let now = Local::now().naive_local();

    let days = days.unwrap_or(config.feed.default_days);
    let max_records = max_records.unwrap_or(config.feed.max_records);
    let start = now - Duration::days(i64::from(days));

    let filter = RecordFilter::between(start, now);
    let entries = fetch_entries(store.as_ref(), &filter).await;
    let bundle = build_context(entries, start, now, now, max_records);

    println!();
    println!(
        "  {} Processed {} records from the last {} days",
        "✓".green().bold(),
        bundle.metadata.record_count.to_string().bold(),
        days
    );
    println!(
        "  {} Generated {} key insights",
        "✓".green().bold(),
        bundle.key_insights.len()
    );
    for insight in &bundle.key_insights {
        println!("    • {}", insight);
    }
    println!();
    println!("  {}", "Summary:".dimmed());
    println!("  {}", bundle.natural_language_summary);
    println!();

    if !no_save {
        // The saved bundle omits the raw records and the searchable index;
        // consumers that need those read from the store directly.
        let slim = serde_json::json!({
            "metadata": bundle.metadata,
            "summary": bundle.summary,
            "key_insights": bundle.key_insights,
            "natural_language_summary": bundle.natural_language_summary,
        });
        let filename = format!("ai_context_{}.json", output::timestamp(now));
        let path = output::save_json(&config.output_dir(), &filename, &slim)?;
        output::print_saved("Context", &path);
        println!();
    }

    Ok(())
}
