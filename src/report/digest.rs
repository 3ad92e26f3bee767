//! Periodic report assembly.
//!
//! A report is the aggregation of one window's entries: headline summary,
//! team/platform groupings, transition ranking, per-project status paths,
//! and the full entry list. Monthly windows additionally carry a by-week
//! breakdown.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::LogEntry;
use crate::report::aggregate::{self, GroupSlice};
use crate::report::counter::RankedCounts;
use crate::report::paths::{self, PathStep};
use crate::report::period::ReportPeriod;

/// Headline numbers for a report window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_changes: u64,
    pub unique_projects: u64,
    pub active_teams: u64,
}

/// A fully assembled periodic report, serializable as the report artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub period: ReportPeriod,
    pub summary: ReportSummary,
    pub by_team: BTreeMap<String, GroupSlice>,
    pub by_platform: BTreeMap<String, GroupSlice>,
    pub by_status: RankedCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_week: Option<BTreeMap<String, Vec<LogEntry>>>,
    pub status_paths: BTreeMap<String, Vec<PathStep>>,
    pub detailed_changes: Vec<LogEntry>,
}

/// Aggregate one window's entries into a report.
///
/// Callers fetch and normalize the window's records first; this is a pure
/// transform. The by-week breakdown is only built for monthly windows.
pub fn build_report(entries: Vec<LogEntry>, period: ReportPeriod) -> Report {
    let by_week = period.is_monthly().then(|| aggregate::group_by_week(&entries));
    Report {
        summary: summarize(&entries),
        by_team: aggregate::group_by_team(&entries),
        by_platform: aggregate::group_by_platform(&entries),
        by_status: aggregate::rank_transitions(&entries),
        by_week,
        status_paths: paths::build_all_project_paths(&entries),
        period,
        detailed_changes: entries,
    }
}

fn summarize(entries: &[LogEntry]) -> ReportSummary {
    let mut projects = HashSet::new();
    let mut teams = HashSet::new();
    for entry in entries {
        if !entry.project_name.is_empty() {
            projects.insert(entry.project_name.as_str());
        }
        if !entry.team.is_empty() {
            teams.insert(entry.team.as_str());
        }
    }
    ReportSummary {
        total_changes: entries.len() as u64,
        unique_projects: projects.len() as u64,
        active_teams: teams.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_instant;

    fn entry(project: &str, team: &str, date: &str) -> LogEntry {
        LogEntry {
            project_name: project.to_string(),
            team: team.to_string(),
            date: parse_instant(date),
            previous_status: "QA".to_string(),
            new_status: "LIVE".to_string(),
            ..LogEntry::default()
        }
    }

    #[test]
    fn test_weekly_report_has_no_week_breakdown() {
        let now = parse_instant("2025-03-20T12:00:00").unwrap();
        let entries = vec![
            entry("Game A", "Tools Team", "2025-03-18T09:00:00"),
            entry("Game B", "Tools Team", "2025-03-19T09:00:00"),
        ];
        let report = build_report(entries, ReportPeriod::weekly(1, now));

        assert_eq!(report.summary.total_changes, 2);
        assert_eq!(report.summary.unique_projects, 2);
        assert_eq!(report.summary.active_teams, 1);
        assert!(report.by_week.is_none());

        // The serialized artifact omits the key entirely.
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("by_week").is_none());
        assert_eq!(value["period"]["type"], "weekly");
    }

    #[test]
    fn test_monthly_report_breaks_out_weeks() {
        let now = parse_instant("2025-03-31T00:00:00").unwrap();
        let period = ReportPeriod::monthly(Some(3), Some(2025), now).unwrap();
        let entries = vec![
            entry("Game A", "Tools Team", "2025-03-04T09:00:00"),
            entry("Game A", "Tools Team", "2025-03-12T09:00:00"),
        ];
        let report = build_report(entries, period);

        let weeks = report.by_week.as_ref().unwrap();
        assert_eq!(weeks.len(), 2);
        assert!(weeks.contains_key("2025-03-03"));
        assert!(weeks.contains_key("2025-03-10"));
    }

    #[test]
    fn test_summary_counts_distinct_non_empty_values() {
        let now = parse_instant("2025-03-20T12:00:00").unwrap();
        let entries = vec![
            entry("Game A", "Tools Team", "2025-03-18T09:00:00"),
            entry("Game A", "", "2025-03-18T10:00:00"),
            entry("", "AMZ Growth Team", "2025-03-18T11:00:00"),
        ];
        let report = build_report(entries, ReportPeriod::weekly(1, now));
        assert_eq!(report.summary.total_changes, 3);
        assert_eq!(report.summary.unique_projects, 1);
        assert_eq!(report.summary.active_teams, 2);
    }

    #[test]
    fn test_empty_input_yields_zeroed_report() {
        let now = parse_instant("2025-03-20T12:00:00").unwrap();
        let report = build_report(Vec::new(), ReportPeriod::weekly(1, now));
        assert_eq!(report.summary, ReportSummary::default());
        assert!(report.by_team.is_empty());
        assert!(report.by_status.is_empty());
        assert!(report.status_paths.is_empty());
        assert!(report.detailed_changes.is_empty());
    }

    #[test]
    fn test_detailed_changes_preserve_input_order() {
        let now = parse_instant("2025-03-20T12:00:00").unwrap();
        let entries = vec![
            entry("Later", "T", "2025-03-19T09:00:00"),
            entry("Earlier", "T", "2025-03-18T09:00:00"),
        ];
        let report = build_report(entries, ReportPeriod::weekly(1, now));
        assert_eq!(report.detailed_changes[0].project_name, "Later");
        assert_eq!(report.detailed_changes[1].project_name, "Earlier");
    }
}
