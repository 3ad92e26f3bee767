//! AI-consumable context bundles.
//!
//! A bundle packages one window's entries with everything a downstream
//! agent needs to reason about them without re-querying: headline summary,
//! key insights, a searchable id index, a narrative rendering, and the raw
//! entries themselves.

pub mod index;
pub mod insights;
pub mod summary;

pub use index::{build_index, SearchIndex};
pub use insights::key_insights;
pub use summary::natural_language_summary;

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::record::LogEntry;
use crate::report::{calculate_statistics, StatusDistribution};

/// Bundle of everything an agent needs about one window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBundle {
    pub metadata: ContextMetadata,
    pub summary: ContextSummary,
    pub key_insights: Vec<String>,
    pub searchable_index: SearchIndex,
    pub natural_language_summary: String,
    pub raw_data: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextMetadata {
    pub period: ContextPeriod,
    pub record_count: u64,
    pub generated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSummary {
    pub total_changes: u64,
    pub unique_projects: u64,
    pub active_teams: u64,
    pub platforms: Vec<String>,
    pub status_distribution: StatusDistribution,
}

/// Build the context bundle for a window.
///
/// Entries beyond `max_records` are dropped before any computation, so
/// every derived figure describes the truncated set.
pub fn build_context(
    mut entries: Vec<LogEntry>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    now: NaiveDateTime,
    max_records: usize,
) -> ContextBundle {
    entries.truncate(max_records);
    let stats = calculate_statistics(&entries);

    let mut projects = BTreeSet::new();
    let mut teams = BTreeSet::new();
    let mut platforms = BTreeSet::new();
    for entry in &entries {
        if !entry.project_name.is_empty() {
            projects.insert(entry.project_name.as_str());
        }
        if !entry.team.is_empty() {
            teams.insert(entry.team.as_str());
        }
        if !entry.platform.is_empty() {
            platforms.insert(entry.platform.as_str());
        }
    }

    ContextBundle {
        metadata: ContextMetadata {
            period: ContextPeriod {
                start,
                end,
                days: (end - start).num_days(),
            },
            record_count: entries.len() as u64,
            generated_at: now,
        },
        summary: ContextSummary {
            total_changes: entries.len() as u64,
            unique_projects: projects.len() as u64,
            active_teams: teams.len() as u64,
            platforms: platforms.into_iter().map(String::from).collect(),
            status_distribution: stats.status_distribution.clone(),
        },
        key_insights: key_insights(&entries, &stats),
        searchable_index: build_index(&entries),
        natural_language_summary: natural_language_summary(&entries, &stats),
        raw_data: entries,
    }
}
