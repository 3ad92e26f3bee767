//! Retention policy engine.
//!
//! Policy: keep the current month and the previous calendar month, nothing
//! older. The cutoff is recomputed from `now` on every call, so independent
//! invocations within the same month agree on it. Deletion is opt-in twice:
//! the engine defaults to dry-run, and even a live engine does nothing
//! without the caller's `confirm`.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Datelike, NaiveDateTime};

use crate::record::LogEntry;
use crate::report::first_instant;
use crate::retention::types::{
    CleanupSchedule, DeletionPlan, FailedDeletion, PlanOutcome, RetentionValidation, Violation,
};
use crate::store::RecordStore;

/// How many violations a validation report lists in full.
pub const VIOLATION_PREVIEW_LIMIT: usize = 10;

/// First day of the previous calendar month relative to `now`. A January
/// evaluation rolls back to December of the prior year.
pub fn cutoff_for(now: NaiveDateTime) -> Result<NaiveDateTime> {
    if now.month() == 1 {
        first_instant(now.year() - 1, 12)
    } else {
        first_instant(now.year(), now.month() - 1)
    }
}

/// Entries dated strictly before the cutoff. Undated entries are never
/// considered expired.
pub fn identify_expired(entries: &[LogEntry], cutoff: NaiveDateTime) -> Vec<&LogEntry> {
    entries
        .iter()
        .filter(|e| e.date.map(|d| d < cutoff).unwrap_or(false))
        .collect()
}

pub struct RetentionEngine {
    dry_run: bool,
}

impl Default for RetentionEngine {
    fn default() -> Self {
        RetentionEngine::new()
    }
}

impl RetentionEngine {
    /// Engine in dry-run mode. Nothing is archived until the caller opts
    /// out with [`RetentionEngine::live`].
    pub fn new() -> Self {
        RetentionEngine { dry_run: true }
    }

    /// Engine that archives for real once the caller confirms.
    pub fn live() -> Self {
        RetentionEngine { dry_run: false }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Evaluate the policy over `entries` and build a deletion plan. Only a
    /// live engine with `confirm` set archives candidates through `store`;
    /// a failed archive is recorded in the plan and the batch continues.
    pub async fn evaluate_and_plan(
        &self,
        entries: &[LogEntry],
        now: NaiveDateTime,
        confirm: bool,
        store: &dyn RecordStore,
    ) -> Result<DeletionPlan> {
        let cutoff = cutoff_for(now)?;
        let expired = identify_expired(entries, cutoff);

        if expired.is_empty() {
            return Ok(DeletionPlan {
                planned_at: now,
                cutoff,
                candidate_count: 0,
                candidate_ids: Vec::new(),
                per_team_count: BTreeMap::new(),
                per_platform_count: BTreeMap::new(),
                oldest: None,
                newest: None,
                outcome: PlanOutcome::Success,
            });
        }

        let mut per_team_count: BTreeMap<String, u64> = BTreeMap::new();
        let mut per_platform_count: BTreeMap<String, u64> = BTreeMap::new();
        let mut oldest: Option<NaiveDateTime> = None;
        let mut newest: Option<NaiveDateTime> = None;
        for entry in &expired {
            *per_team_count.entry(entry.team.clone()).or_insert(0) += 1;
            *per_platform_count.entry(entry.platform.clone()).or_insert(0) += 1;
            if let Some(date) = entry.date {
                oldest = Some(oldest.map_or(date, |d| d.min(date)));
                newest = Some(newest.map_or(date, |d| d.max(date)));
            }
        }

        let candidate_ids: Vec<String> = expired.iter().map(|e| e.id.clone()).collect();

        let outcome = if !confirm {
            PlanOutcome::NotConfirmed
        } else if self.dry_run {
            PlanOutcome::DryRun
        } else {
            let mut deleted_ids = Vec::new();
            let mut failed = Vec::new();
            for id in &candidate_ids {
                match store.archive(id).await {
                    Ok(()) => deleted_ids.push(id.clone()),
                    Err(e) => {
                        tracing::warn!("Failed to archive record {}: {}", id, e);
                        failed.push(FailedDeletion {
                            id: id.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
            PlanOutcome::Completed {
                deleted_ids,
                failed,
            }
        };

        Ok(DeletionPlan {
            planned_at: now,
            cutoff,
            candidate_count: expired.len() as u64,
            candidate_ids,
            per_team_count,
            per_platform_count,
            oldest,
            newest,
            outcome,
        })
    }

    /// Check every entry against the cutoff without touching anything.
    /// Undated entries count toward the total but are neither compliant nor
    /// violations, and do not dilute the compliance rate.
    pub fn validate(
        &self,
        entries: &[LogEntry],
        now: NaiveDateTime,
    ) -> Result<RetentionValidation> {
        let cutoff = cutoff_for(now)?;

        let mut violations = Vec::new();
        let mut compliant = 0u64;
        for entry in entries {
            let date = match entry.date {
                Some(d) => d,
                None => continue,
            };
            if date < cutoff {
                violations.push(Violation {
                    id: entry.id.clone(),
                    project_name: entry.project_name.clone(),
                    date,
                    days_over_retention: (cutoff - date).num_days(),
                });
            } else {
                compliant += 1;
            }
        }

        let violation_count = violations.len() as u64;
        let dated = compliant + violation_count;
        let compliance_rate = if dated == 0 {
            100.0
        } else {
            compliant as f64 / dated as f64 * 100.0
        };
        let recommendation = if violation_count > 0 {
            "Run cleanup immediately"
        } else {
            "System is compliant"
        };
        violations.truncate(VIOLATION_PREVIEW_LIMIT);

        Ok(RetentionValidation {
            checked_at: now,
            cutoff,
            total_records: entries.len() as u64,
            compliant_records: compliant,
            violation_count,
            compliance_rate,
            violations,
            recommendation: recommendation.to_string(),
        })
    }

    /// When the next cleanup should run and the cutoff it would apply.
    pub fn schedule(&self, now: NaiveDateTime) -> Result<CleanupSchedule> {
        let next_cleanup_date = if now.month() == 12 {
            first_instant(now.year() + 1, 1)?
        } else {
            first_instant(now.year(), now.month() + 1)?
        };

        Ok(CleanupSchedule {
            current_date: now,
            next_cleanup_date,
            days_until_cleanup: (next_cleanup_date - now).num_days(),
            frequency: "monthly".to_string(),
            day_of_month: 1,
            recommended_time: "02:00 UTC".to_string(),
            cutoff_date: cutoff_for(now)?,
            minimum_days: 30,
            maximum_days: 62,
            cron_expression: "0 2 1 * *".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse_instant, RawField, RawRecord};
    use crate::store::FileStore;

    fn dt(s: &str) -> NaiveDateTime {
        parse_instant(s).unwrap()
    }

    fn entry(id: &str, project: &str, team: &str, platform: &str, date: Option<&str>) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            project_name: project.to_string(),
            team: team.to_string(),
            platform: platform.to_string(),
            date: date.and_then(parse_instant),
            ..LogEntry::default()
        }
    }

    fn raw(id: &str, project: &str, date: &str) -> RawRecord {
        let mut properties = std::collections::BTreeMap::new();
        properties.insert("Project Name".to_string(), RawField::rich_text(project));
        properties.insert("Date".to_string(), RawField::date(date));
        RawRecord {
            id: id.to_string(),
            created_time: String::new(),
            last_edited_time: String::new(),
            properties,
        }
    }

    #[test]
    fn test_cutoff_is_first_day_of_previous_month() {
        let cutoff = cutoff_for(dt("2025-03-15T12:30:00")).unwrap();
        assert_eq!(cutoff, dt("2025-02-01T00:00:00"));
    }

    #[test]
    fn test_cutoff_in_january_rolls_to_previous_december() {
        let cutoff = cutoff_for(dt("2025-01-20T10:00:00")).unwrap();
        assert_eq!(cutoff, dt("2024-12-01T00:00:00"));
    }

    #[test]
    fn test_identify_expired_keeps_only_older_records() {
        let entries = vec![
            entry("e1", "Alpha", "Tools Team", "GP", Some("2025-01-15T10:00:00")),
            entry("e2", "Beta", "Tools Team", "GP", Some("2024-11-01T09:00:00")),
            entry("e3", "Gamma", "Tools Team", "GP", None),
        ];
        let cutoff = cutoff_for(dt("2025-01-20T00:00:00")).unwrap();

        let expired = identify_expired(&entries, cutoff);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, "e2");
    }

    #[tokio::test]
    async fn test_plan_with_no_candidates_is_success() {
        let entries = vec![entry("e1", "Alpha", "Tools Team", "GP", Some("2025-01-15T10:00:00"))];
        let store = FileStore::from_records(vec![]);

        let plan = RetentionEngine::new()
            .evaluate_and_plan(&entries, dt("2025-01-20T00:00:00"), true, &store)
            .await
            .unwrap();

        assert_eq!(plan.outcome, PlanOutcome::Success);
        assert_eq!(plan.candidate_count, 0);
        assert!(plan.candidate_ids.is_empty());
        assert!(plan.oldest.is_none());
        assert!(plan.newest.is_none());
    }

    #[tokio::test]
    async fn test_unconfirmed_plan_touches_nothing() {
        let entries = vec![
            entry("e1", "Alpha", "Tools Team", "GP", Some("2024-11-01T09:00:00")),
            entry("e2", "Beta", "", "AMZ", Some("2024-10-05T09:00:00")),
        ];
        let store = FileStore::from_records(vec![
            raw("e1", "Alpha", "2024-11-01T09:00:00"),
            raw("e2", "Beta", "2024-10-05T09:00:00"),
        ]);

        let plan = RetentionEngine::live()
            .evaluate_and_plan(&entries, dt("2025-01-20T00:00:00"), false, &store)
            .await
            .unwrap();

        assert_eq!(plan.outcome, PlanOutcome::NotConfirmed);
        assert_eq!(plan.candidate_count, 2);
        assert_eq!(plan.per_team_count.get("Tools Team"), Some(&1));
        assert_eq!(plan.per_team_count.get(""), Some(&1));
        assert_eq!(plan.oldest, Some(dt("2024-10-05T09:00:00")));
        assert_eq!(plan.newest, Some(dt("2024-11-01T09:00:00")));
        assert!(store.archived_ids().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_dry_run_does_not_archive() {
        let entries = vec![entry("e1", "Alpha", "Tools Team", "GP", Some("2024-11-01T09:00:00"))];
        let store = FileStore::from_records(vec![raw("e1", "Alpha", "2024-11-01T09:00:00")]);

        let plan = RetentionEngine::new()
            .evaluate_and_plan(&entries, dt("2025-01-20T00:00:00"), true, &store)
            .await
            .unwrap();

        assert_eq!(plan.outcome, PlanOutcome::DryRun);
        assert!(store.archived_ids().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_live_run_archives_every_candidate() {
        let entries = vec![
            entry("e1", "Alpha", "Tools Team", "GP", Some("2024-11-01T09:00:00")),
            entry("e2", "Beta", "Tools Team", "GP", Some("2024-10-05T09:00:00")),
        ];
        let store = FileStore::from_records(vec![
            raw("e1", "Alpha", "2024-11-01T09:00:00"),
            raw("e2", "Beta", "2024-10-05T09:00:00"),
        ]);

        let plan = RetentionEngine::live()
            .evaluate_and_plan(&entries, dt("2025-01-20T00:00:00"), true, &store)
            .await
            .unwrap();

        match &plan.outcome {
            PlanOutcome::Completed {
                deleted_ids,
                failed,
            } => {
                assert_eq!(deleted_ids, &vec!["e1".to_string(), "e2".to_string()]);
                assert!(failed.is_empty());
            }
            other => panic!("expected completed outcome, got {:?}", other),
        }
        assert_eq!(store.archived_ids(), vec!["e1".to_string(), "e2".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_archive_is_recorded_and_batch_continues() {
        // The store only knows e1; archiving the stale e9 fails with a 404.
        let entries = vec![
            entry("e9", "Ghost", "Tools Team", "GP", Some("2024-09-01T09:00:00")),
            entry("e1", "Alpha", "Tools Team", "GP", Some("2024-11-01T09:00:00")),
        ];
        let store = FileStore::from_records(vec![raw("e1", "Alpha", "2024-11-01T09:00:00")]);

        let plan = RetentionEngine::live()
            .evaluate_and_plan(&entries, dt("2025-01-20T00:00:00"), true, &store)
            .await
            .unwrap();

        match &plan.outcome {
            PlanOutcome::Completed {
                deleted_ids,
                failed,
            } => {
                assert_eq!(deleted_ids, &vec!["e1".to_string()]);
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].id, "e9");
                assert!(failed[0].error.contains("404"));
            }
            other => panic!("expected completed outcome, got {:?}", other),
        }
        assert_eq!(store.archived_ids(), vec!["e1".to_string()]);
    }

    #[test]
    fn test_validation_on_compliant_set_is_fully_compliant() {
        // The undated entry counts in the total but cannot dilute the rate.
        let entries = vec![
            entry("e1", "Alpha", "Tools Team", "GP", Some("2025-01-15T10:00:00")),
            entry("e2", "Beta", "Tools Team", "GP", None),
        ];

        let validation = RetentionEngine::new()
            .validate(&entries, dt("2025-01-20T00:00:00"))
            .unwrap();

        assert_eq!(validation.total_records, 2);
        assert_eq!(validation.compliant_records, 1);
        assert_eq!(validation.violation_count, 0);
        assert_eq!(validation.compliance_rate, 100.0);
        assert_eq!(validation.recommendation, "System is compliant");
    }

    #[test]
    fn test_validation_rate_and_days_over_retention() {
        let entries = vec![
            entry("e1", "Alpha", "Tools Team", "GP", Some("2025-01-15T10:00:00")),
            entry("e2", "Beta", "Tools Team", "GP", Some("2025-01-02T10:00:00")),
            entry("e3", "Gamma", "Tools Team", "GP", Some("2024-12-20T10:00:00")),
            entry("e4", "Delta", "Tools Team", "GP", Some("2024-11-01T00:00:00")),
        ];

        let validation = RetentionEngine::new()
            .validate(&entries, dt("2025-01-20T00:00:00"))
            .unwrap();

        assert_eq!(validation.cutoff, dt("2024-12-01T00:00:00"));
        assert_eq!(validation.compliant_records, 3);
        assert_eq!(validation.violation_count, 1);
        assert_eq!(validation.compliance_rate, 75.0);
        assert_eq!(validation.violations[0].id, "e4");
        assert_eq!(validation.violations[0].days_over_retention, 30);
        assert_eq!(validation.recommendation, "Run cleanup immediately");
    }

    #[test]
    fn test_validation_caps_listed_violations_at_ten() {
        let mut entries = Vec::new();
        for i in 0..12 {
            entries.push(entry(
                &format!("e{}", i),
                "Alpha",
                "Tools Team",
                "GP",
                Some("2024-10-01T09:00:00"),
            ));
        }

        let validation = RetentionEngine::new()
            .validate(&entries, dt("2025-01-20T00:00:00"))
            .unwrap();

        assert_eq!(validation.violation_count, 12);
        assert_eq!(validation.violations.len(), VIOLATION_PREVIEW_LIMIT);
    }

    #[test]
    fn test_schedule_points_at_first_of_next_month() {
        let schedule = RetentionEngine::new()
            .schedule(dt("2025-01-20T00:00:00"))
            .unwrap();

        assert_eq!(schedule.next_cleanup_date, dt("2025-02-01T00:00:00"));
        assert_eq!(schedule.days_until_cleanup, 12);
        assert_eq!(schedule.cutoff_date, dt("2024-12-01T00:00:00"));
        assert_eq!(schedule.frequency, "monthly");
        assert_eq!(schedule.day_of_month, 1);
        assert_eq!(schedule.recommended_time, "02:00 UTC");
        assert_eq!(schedule.minimum_days, 30);
        assert_eq!(schedule.maximum_days, 62);
        assert_eq!(schedule.cron_expression, "0 2 1 * *");
    }

    #[test]
    fn test_schedule_december_rolls_to_next_january() {
        let schedule = RetentionEngine::new()
            .schedule(dt("2025-12-15T08:00:00"))
            .unwrap();

        assert_eq!(schedule.next_cleanup_date, dt("2026-01-01T00:00:00"));
        assert_eq!(schedule.cutoff_date, dt("2025-11-01T00:00:00"));
    }

    #[test]
    fn test_engine_defaults_to_dry_run() {
        assert!(RetentionEngine::new().is_dry_run());
        assert!(RetentionEngine::default().is_dry_run());
        assert!(!RetentionEngine::live().is_dry_run());
    }
}
