//! `statusctl weekly` — build the weekly status report.

use std::path::Path;

use anyhow::Result;
use chrono::Local;

use crate::cli::{open_store, output};
use crate::config::Config;
use crate::report::{build_report, ReportPeriod};
use crate::store::{fetch_entries, RecordFilter};

pub async fn run_weekly(weeks: u32, input: Option<&Path>, no_save: bool) -> Result<()> {
    let config = Config::load(None)?;
    let store = open_store(&config, input)?;
    let now = Local::now().naive_local();

    let period = ReportPeriod::weekly(weeks, now);
    let filter = RecordFilter::between(period.start(), period.end());
    let entries = fetch_entries(store.as_ref(), &filter).await;

    let report = build_report(entries, period);
    output::print_report_summary(&report);

    if !no_save {
        let filename = format!("weekly_report_{}.json", output::timestamp(now));
        let path = output::save_json(&config.output_dir(), &filename, &report)?;
        output::print_saved("Report", &path);
        println!();
    }

    Ok(())
}
