//! `statusctl monthly` — build a calendar-month status report.

use std::path::Path;

use anyhow::Result;
use chrono::{Datelike, Local};

use crate::cli::{open_store, output};
use crate::config::Config;
use crate::report::{build_report, ReportPeriod};
use crate::store::{fetch_entries, RecordFilter};

pub async fn run_monthly(
    month: Option<u32>,
    year: Option<i32>,
    input: Option<&Path>,
    no_save: bool,
) -> Result<()> {
    let config = Config::load(None)?;
    let store = open_store(&config, input)?;
    let now = Local::now().naive_local();

    let month = month.unwrap_or(now.month());
    let year = year.unwrap_or(now.year());

    let period = ReportPeriod::monthly(Some(month), Some(year), now)?;
    let filter = RecordFilter::between(period.start(), period.end());
    let entries = fetch_entries(store.as_ref(), &filter).await;

    let report = build_report(entries, period);
    output::print_report_summary(&report);

    if !no_save {
        let filename = format!("monthly_report_{}_{:02}.json", year, month);
        let path = output::save_json(&config.output_dir(), &filename, &report)?;
        output::print_saved("Report", &path);
        println!();
    }

    Ok(())
}
