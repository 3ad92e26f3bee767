//! Headline insights derived from a window's statistics.

use chrono::NaiveDateTime;

use crate::record::LogEntry;
use crate::report::Stats;

/// One sentence per notable signal in the data. Sentences are emitted in a
/// fixed order; signals without data are skipped rather than zero-filled.
pub fn key_insights(entries: &[LogEntry], stats: &Stats) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some((team, count)) = stats.by_team.first() {
        insights.push(format!(
            "{team} is the most active team with {count} status changes"
        ));
    }

    let bucketed = stats.status_distribution.total();
    if bucketed > 0 && stats.status_distribution.complete > 0 {
        let rate = stats.status_distribution.complete as f64 / bucketed as f64 * 100.0;
        insights.push(format!(
            "{rate:.1}% of projects have reached completion status"
        ));
    }

    if let Some((transition, count)) = stats.by_status_transition.first() {
        insights.push(format!(
            "Most common transition: {transition} ({count} occurrences)"
        ));
    }

    if stats.by_platform.len() > 1 {
        let platforms: Vec<&str> = stats.by_platform.keys().collect();
        insights.push(format!(
            "Development is active across {} platforms: {}",
            platforms.len(),
            platforms.join(", ")
        ));
    }

    // Velocity over the dated entries only; a single dated entry spans one day.
    let dated: Vec<NaiveDateTime> = entries.iter().filter_map(|e| e.date).collect();
    if let (Some(earliest), Some(latest)) = (dated.iter().min(), dated.iter().max()) {
        let span_days = (*latest - *earliest).num_days() + 1;
        let per_day = dated.len() as f64 / span_days as f64;
        insights.push(format!("Average of {per_day:.1} status changes per day"));
    }

    insights
}
