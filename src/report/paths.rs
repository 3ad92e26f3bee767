//! Per-project chronological status paths.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::record::LogEntry;
use crate::report::period::ReportPeriod;

/// One step of a project's status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub date: Option<NaiveDateTime>,
    pub from_status: String,
    pub to_status: String,
    pub version: String,
    pub changed_by: Vec<String>,
    pub whats_new: String,
}

impl PathStep {
    fn from_entry(entry: &LogEntry) -> Self {
        PathStep {
            date: entry.date,
            from_status: entry.previous_status.clone(),
            to_status: entry.new_status.clone(),
            version: entry.version.clone(),
            changed_by: entry.changed_by.clone(),
            whats_new: entry.whats_new.clone(),
        }
    }
}

/// Chronological transitions for one project inside a window.
///
/// Only dated entries can fall inside a window, so undated ones drop out
/// here. Repeated identical transitions all appear.
pub fn project_status_path(
    entries: &[LogEntry],
    project_name: &str,
    window: &ReportPeriod,
) -> Vec<PathStep> {
    let mut in_window: Vec<&LogEntry> = entries
        .iter()
        .filter(|e| e.project_name == project_name)
        .filter(|e| e.date.map(|d| window.contains(d)).unwrap_or(false))
        .collect();
    in_window.sort_by_key(|e| e.date);
    in_window.into_iter().map(PathStep::from_entry).collect()
}

/// Status paths for every project in the batch.
///
/// No window filtering happens here; callers pre-filter. Undated entries
/// sort ahead of dated ones, and entries without a project name are
/// skipped entirely.
pub fn build_all_project_paths(entries: &[LogEntry]) -> BTreeMap<String, Vec<PathStep>> {
    let mut grouped: BTreeMap<String, Vec<&LogEntry>> = BTreeMap::new();
    for entry in entries {
        if !entry.project_name.is_empty() {
            grouped
                .entry(entry.project_name.clone())
                .or_default()
                .push(entry);
        }
    }
    grouped
        .into_iter()
        .map(|(project, mut project_entries)| {
            project_entries.sort_by_key(|e| e.date);
            let steps = project_entries.into_iter().map(PathStep::from_entry).collect();
            (project, steps)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_instant;

    fn entry(project: &str, date: &str, prev: &str, new: &str) -> LogEntry {
        LogEntry {
            project_name: project.to_string(),
            date: parse_instant(date),
            previous_status: prev.to_string(),
            new_status: new.to_string(),
            ..LogEntry::default()
        }
    }

    fn march_2025() -> ReportPeriod {
        let now = parse_instant("2025-03-31T23:59:59").unwrap();
        ReportPeriod::monthly(Some(3), Some(2025), now).unwrap()
    }

    #[test]
    fn test_project_path_filters_and_sorts() {
        let entries = vec![
            entry("Game", "2025-03-20T10:00:00", "QA", "LIVE"),
            entry("Game", "2025-03-05T10:00:00", "BACKLOG", "QA"),
            entry("Other", "2025-03-10T10:00:00", "QA", "LIVE"),
            entry("Game", "2025-02-28T10:00:00", "BACKLOG", "DEVELOPMENT"),
            entry("Game", "", "QA", "LIVE"),
        ];
        let path = project_status_path(&entries, "Game", &march_2025());
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].from_status, "BACKLOG");
        assert_eq!(path[0].to_status, "QA");
        assert_eq!(path[1].to_status, "LIVE");
    }

    #[test]
    fn test_project_path_window_is_inclusive() {
        let entries = vec![
            entry("Game", "2025-03-01T00:00:00", "BACKLOG", "QA"),
            entry("Game", "2025-03-31T23:59:59", "QA", "LIVE"),
        ];
        let path = project_status_path(&entries, "Game", &march_2025());
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_project_path_keeps_repeated_transitions() {
        let entries = vec![
            entry("Game", "2025-03-05T10:00:00", "QA", "LIVE"),
            entry("Game", "2025-03-06T10:00:00", "QA", "LIVE"),
        ];
        let path = project_status_path(&entries, "Game", &march_2025());
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].to_status, path[1].to_status);
    }

    #[test]
    fn test_project_path_is_idempotent() {
        let entries = vec![
            entry("Game", "2025-03-20T10:00:00", "QA", "LIVE"),
            entry("Game", "2025-03-05T10:00:00", "BACKLOG", "QA"),
        ];
        let first = project_status_path(&entries, "Game", &march_2025());
        let second = project_status_path(&entries, "Game", &march_2025());
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_paths_sort_undated_first() {
        let entries = vec![
            entry("Game", "2025-03-05T10:00:00", "BACKLOG", "QA"),
            entry("Game", "", "GD CTR TEST", "CTR TEST"),
            entry("", "2025-03-06T10:00:00", "QA", "LIVE"),
        ];
        let paths = build_all_project_paths(&entries);
        assert_eq!(paths.len(), 1);
        let steps = &paths["Game"];
        assert_eq!(steps.len(), 2);
        assert!(steps[0].date.is_none());
        assert_eq!(steps[1].to_status, "QA");
    }
}
