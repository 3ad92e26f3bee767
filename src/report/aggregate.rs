//! Grouping, ranking, and distribution statistics over normalized entries.
//!
//! Every operation here is a total function: the empty input produces a
//! fully populated structure with zeroed counts. Grouping output uses
//! ordered maps so serialized reports are stable across runs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};

use crate::record::LogEntry;
use crate::report::counter::{Counter, RankedCounts};

/// How many entries the "most active" project and user rankings keep.
pub const RANKING_LIMIT: usize = 10;

/// Progress bucket a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    ToDo,
    InProgress,
    Complete,
}

/// Closed-set lookup from a status name to its bucket. Statuses outside
/// the table belong to no bucket and are left out of the distribution.
pub fn classify_status(status: &str) -> Option<StatusBucket> {
    match status {
        "BACKLOG" => Some(StatusBucket::ToDo),

        "GD CTR TEST" | "CTR TEST" | "CTR TEST DONE" | "CTR ARCHIVE" | "WAITING FOR DEV"
        | "DEVELOPMENT" | "QA" | "WAITING RELEASE" | "RELEASE POOL" => {
            Some(StatusBucket::InProgress)
        }

        "CREO PRODUCTION" | "CREO DONE" | "UA TOP SPENDERS" | "LIVE" | "UA TEST" | "UA BOOST"
        | "UA SETUP" | "UA" | "AUTO UA" | "PAUSED" | "UA PAUSED" | "SHADOW BAN" | "BLOCKED"
        | "ARCHIVE" | "SUSPENDED" | "REJECTED" | "Complete" => Some(StatusBucket::Complete),

        _ => None,
    }
}

/// Three-way bucket counts over `new_status` values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub to_do: u64,
    pub in_progress: u64,
    pub complete: u64,
}

impl StatusDistribution {
    pub fn record(&mut self, status: &str) {
        match classify_status(status) {
            Some(StatusBucket::ToDo) => self.to_do += 1,
            Some(StatusBucket::InProgress) => self.in_progress += 1,
            Some(StatusBucket::Complete) => self.complete += 1,
            None => {}
        }
    }

    pub fn total(&self) -> u64 {
        self.to_do + self.in_progress + self.complete
    }
}

/// One slice of a grouped dimension: change count plus the distinct
/// projects touched, sorted for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSlice {
    pub count: u64,
    pub projects: Vec<String>,
}

/// Group entries by team. Entries with an empty team group under the
/// empty-string key rather than being dropped.
pub fn group_by_team(entries: &[LogEntry]) -> BTreeMap<String, GroupSlice> {
    group_by(entries, |e| e.team.as_str())
}

/// Group entries by platform, same conventions as [`group_by_team`].
pub fn group_by_platform(entries: &[LogEntry]) -> BTreeMap<String, GroupSlice> {
    group_by(entries, |e| e.platform.as_str())
}

fn group_by(
    entries: &[LogEntry],
    key: impl Fn(&LogEntry) -> &str,
) -> BTreeMap<String, GroupSlice> {
    let mut grouped: BTreeMap<String, (u64, BTreeSet<String>)> = BTreeMap::new();
    for entry in entries {
        let slot = grouped.entry(key(entry).to_string()).or_default();
        slot.0 += 1;
        if !entry.project_name.is_empty() {
            slot.1.insert(entry.project_name.clone());
        }
    }
    grouped
        .into_iter()
        .map(|(key, (count, projects))| {
            let slice = GroupSlice {
                count,
                projects: projects.into_iter().collect(),
            };
            (key, slice)
        })
        .collect()
}

/// Occurrence counts per `"{previous} → {new}"` transition, ranked
/// descending. Ties keep the order transitions were first seen in.
pub fn rank_transitions(entries: &[LogEntry]) -> RankedCounts {
    let mut transitions = Counter::new();
    for entry in entries {
        transitions.bump(&entry.transition());
    }
    transitions.into_ranked()
}

/// Single-pass statistical summary of a batch of entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_changes: u64,
    pub by_status_transition: RankedCounts,
    pub by_team: RankedCounts,
    pub by_platform: RankedCounts,
    pub by_release_type: RankedCounts,
    pub most_active_projects: RankedCounts,
    pub most_active_users: RankedCounts,
    pub status_distribution: StatusDistribution,
}

/// Compute the full statistics block for a batch of entries.
///
/// Empty team/platform/release-type/project values are skipped from their
/// rankings; every name in `changed_by` is counted, once per entry it
/// appears in. Transitions are always counted, even between empty
/// statuses.
pub fn calculate_statistics(entries: &[LogEntry]) -> Stats {
    let mut transitions = Counter::new();
    let mut teams = Counter::new();
    let mut platforms = Counter::new();
    let mut release_types = Counter::new();
    let mut projects = Counter::new();
    let mut users = Counter::new();
    let mut distribution = StatusDistribution::default();

    for entry in entries {
        transitions.bump(&entry.transition());

        if !entry.team.is_empty() {
            teams.bump(&entry.team);
        }
        if !entry.platform.is_empty() {
            platforms.bump(&entry.platform);
        }
        if !entry.release_type.is_empty() {
            release_types.bump(&entry.release_type);
        }
        if !entry.project_name.is_empty() {
            projects.bump(&entry.project_name);
        }
        for user in &entry.changed_by {
            users.bump(user);
        }

        distribution.record(&entry.new_status);
    }

    Stats {
        total_changes: entries.len() as u64,
        by_status_transition: transitions.into_ranked(),
        by_team: teams.into_ranked(),
        by_platform: platforms.into_ranked(),
        by_release_type: release_types.into_ranked(),
        most_active_projects: projects.into_top(RANKING_LIMIT),
        most_active_users: users.into_top(RANKING_LIMIT),
        status_distribution: distribution,
    }
}

/// Bucket dated entries by the Monday of their ISO week, keyed by that
/// Monday's calendar date. Undated entries are excluded.
pub fn group_by_week(entries: &[LogEntry]) -> BTreeMap<String, Vec<LogEntry>> {
    let mut weeks: BTreeMap<String, Vec<LogEntry>> = BTreeMap::new();
    for entry in entries {
        if let Some(date) = entry.date {
            let offset = i64::from(date.weekday().num_days_from_monday());
            let monday = date.date() - Duration::days(offset);
            weeks
                .entry(monday.format("%Y-%m-%d").to_string())
                .or_default()
                .push(entry.clone());
        }
    }
    weeks
}
