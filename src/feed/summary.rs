//! Deterministic plain-language rendering of a window's statistics.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::record::LogEntry;
use crate::report::Stats;

/// Assemble the narrative summary sentence by sentence. Every sentence is
/// derived from the stats, so identical input yields identical text.
pub fn natural_language_summary(entries: &[LogEntry], stats: &Stats) -> String {
    if entries.is_empty() {
        return "No status changes found in the specified period.".to_string();
    }

    let dated: Vec<NaiveDateTime> = entries.iter().filter_map(|e| e.date).collect();
    let date_range = match (dated.iter().min(), dated.iter().max()) {
        (Some(earliest), Some(latest)) => format!(
            "from {} to {}",
            earliest.format("%Y-%m-%d"),
            latest.format("%Y-%m-%d")
        ),
        _ => "in the specified period".to_string(),
    };

    let unique_projects = entries
        .iter()
        .filter(|e| !e.project_name.is_empty())
        .map(|e| e.project_name.as_str())
        .collect::<HashSet<_>>()
        .len();

    let mut parts = vec![format!(
        "During the period {date_range}, there were {} status changes across {unique_projects} projects.",
        entries.len()
    )];

    let top_teams: Vec<String> = stats
        .by_team
        .iter()
        .take(3)
        .map(|(team, count)| format!("{team} ({count} changes)"))
        .collect();
    if !top_teams.is_empty() {
        parts.push(format!(
            "The most active teams were: {}.",
            top_teams.join(", ")
        ));
    }

    let platform_spread: Vec<String> = stats
        .by_platform
        .iter()
        .map(|(platform, count)| format!("{count} on {platform}"))
        .collect();
    if !platform_spread.is_empty() {
        parts.push(format!(
            "Changes were distributed across platforms: {}.",
            platform_spread.join(", ")
        ));
    }

    let dist = &stats.status_distribution;
    parts.push(format!(
        "Status distribution shows {} projects in To-Do, {} In Progress, and {} Complete.",
        dist.to_do, dist.in_progress, dist.complete
    ));

    let top_transitions: Vec<String> = stats
        .by_status_transition
        .iter()
        .take(3)
        .map(|(transition, count)| format!("{transition} ({count} times)"))
        .collect();
    if !top_transitions.is_empty() {
        parts.push(format!(
            "The most common status transitions were: {}.",
            top_transitions.join(", ")
        ));
    }

    let top_projects: Vec<String> = stats
        .most_active_projects
        .iter()
        .take(3)
        .map(|(project, count)| format!("{project} ({count} changes)"))
        .collect();
    if !top_projects.is_empty() {
        parts.push(format!(
            "The most active projects were: {}.",
            top_projects.join(", ")
        ));
    }

    parts.join(" ")
}
