//! Searchable record-id index over a batch of entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::LogEntry;

/// Record ids grouped along the dimensions downstream consumers query by.
/// Ids within each bucket keep input order; keys serialize sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub by_project: BTreeMap<String, Vec<String>>,
    pub by_team: BTreeMap<String, Vec<String>>,
    pub by_platform: BTreeMap<String, Vec<String>>,
    pub by_status: BTreeMap<String, Vec<String>>,
    pub by_date: BTreeMap<String, Vec<String>>,
    pub by_user: BTreeMap<String, Vec<String>>,
    pub status_transitions: BTreeMap<String, Vec<String>>,
}

/// Build the index for a batch. Empty dimension values are not indexed;
/// the transition family requires both sides of the transition.
pub fn build_index(entries: &[LogEntry]) -> SearchIndex {
    let mut index = SearchIndex::default();

    for entry in entries {
        if !entry.project_name.is_empty() {
            push(&mut index.by_project, &entry.project_name, &entry.id);
        }
        if !entry.team.is_empty() {
            push(&mut index.by_team, &entry.team, &entry.id);
        }
        if !entry.platform.is_empty() {
            push(&mut index.by_platform, &entry.platform, &entry.id);
        }
        if !entry.new_status.is_empty() {
            push(&mut index.by_status, &entry.new_status, &entry.id);
        }
        if let Some(date) = entry.date {
            push(&mut index.by_date, &date.format("%Y-%m-%d").to_string(), &entry.id);
        }
        for user in &entry.changed_by {
            push(&mut index.by_user, user, &entry.id);
        }
        if !entry.previous_status.is_empty() && !entry.new_status.is_empty() {
            let transition = format!("{}→{}", entry.previous_status, entry.new_status);
            push(&mut index.status_transitions, &transition, &entry.id);
        }
    }

    index
}

fn push(family: &mut BTreeMap<String, Vec<String>>, key: &str, id: &str) {
    family
        .entry(key.to_string())
        .or_default()
        .push(id.to_string());
}
