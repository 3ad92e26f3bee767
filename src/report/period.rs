//! Report window arithmetic — weekly and monthly periods.
//!
//! Windows are inclusive on both ends. Monthly windows are computed from
//! calendar arithmetic (first instant of the month to one second before the
//! first instant of the next), so month lengths and year rollovers never
//! need special-casing.

use anyhow::{anyhow, bail, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A reporting window. Serializes with the period metadata reports carry:
/// the window type, ISO start/end, and weekly/monthly specifics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportPeriod {
    Weekly {
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        weeks: u32,
    },
    Monthly {
        month: u32,
        year: i32,
        month_name: String,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    },
}

impl ReportPeriod {
    /// The window covering the past `weeks_back` weeks ending at `now`.
    pub fn weekly(weeks_back: u32, now: NaiveDateTime) -> Self {
        ReportPeriod::Weekly {
            start_date: now - Duration::weeks(i64::from(weeks_back)),
            end_date: now,
            weeks: weeks_back,
        }
    }

    /// The window covering exactly one calendar month. `month`/`year`
    /// default to `now`'s. December rolls the end bound into January of
    /// the following year.
    pub fn monthly(month: Option<u32>, year: Option<i32>, now: NaiveDateTime) -> Result<Self> {
        let month = month.unwrap_or_else(|| now.month());
        let year = year.unwrap_or_else(|| now.year());

        if !(1..=12).contains(&month) {
            bail!("month must be between 1 and 12, got {}", month);
        }

        let start = first_instant(year, month)?;
        let end = if month == 12 {
            first_instant(year + 1, 1)?
        } else {
            first_instant(year, month + 1)?
        } - Duration::seconds(1);

        Ok(ReportPeriod::Monthly {
            month,
            year,
            month_name: start.format("%B").to_string(),
            start_date: start,
            end_date: end,
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        match self {
            ReportPeriod::Weekly { start_date, .. } => *start_date,
            ReportPeriod::Monthly { start_date, .. } => *start_date,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        match self {
            ReportPeriod::Weekly { end_date, .. } => *end_date,
            ReportPeriod::Monthly { end_date, .. } => *end_date,
        }
    }

    /// Whether the instant falls inside the window, both ends inclusive.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start() <= instant && instant <= self.end()
    }

    pub fn is_monthly(&self) -> bool {
        matches!(self, ReportPeriod::Monthly { .. })
    }
}

/// Midnight on the first day of the given month.
pub fn first_instant(year: i32, month: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("no such month: {}-{:02}", year, month))
}
