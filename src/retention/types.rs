//! Shapes produced by the retention policy engine.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Terminal state of one cleanup evaluation. The two caller booleans
/// (`confirm`, engine `dry_run`) collapse into a single tag so that a plan
/// cannot claim to have deleted anything while also being a dry run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Nothing to clean up; no candidates existed at evaluation time.
    Success,
    /// Candidates exist but the caller did not confirm; nothing was touched.
    NotConfirmed,
    /// Candidates listed, external deletion skipped.
    DryRun,
    /// Deletion was attempted once per candidate. Failures are recorded
    /// next to the successes; one bad record never aborts the batch.
    Completed {
        deleted_ids: Vec<String>,
        failed: Vec<FailedDeletion>,
    },
}

/// One candidate that could not be archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedDeletion {
    pub id: String,
    pub error: String,
}

/// Everything one `evaluate_and_plan` call decided, serialized flat: the
/// outcome tag and its fields sit beside the candidate breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionPlan {
    pub planned_at: NaiveDateTime,
    /// Records dated strictly before this instant are eligible for deletion.
    pub cutoff: NaiveDateTime,
    pub candidate_count: u64,
    pub candidate_ids: Vec<String>,
    /// Candidate counts per team. Entries without a team count under `""`.
    pub per_team_count: BTreeMap<String, u64>,
    pub per_platform_count: BTreeMap<String, u64>,
    pub oldest: Option<NaiveDateTime>,
    pub newest: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub outcome: PlanOutcome,
}

impl DeletionPlan {
    /// Number of records actually archived, zero unless the plan completed.
    pub fn deleted_count(&self) -> usize {
        match &self.outcome {
            PlanOutcome::Completed { deleted_ids, .. } => deleted_ids.len(),
            _ => 0,
        }
    }

    pub fn failed_count(&self) -> usize {
        match &self.outcome {
            PlanOutcome::Completed { failed, .. } => failed.len(),
            _ => 0,
        }
    }
}

/// One entry still present past the retention cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub project_name: String,
    pub date: NaiveDateTime,
    pub days_over_retention: i64,
}

/// Read-only compliance check over the full record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionValidation {
    pub checked_at: NaiveDateTime,
    pub cutoff: NaiveDateTime,
    /// Every record seen, dated or not.
    pub total_records: u64,
    /// Dated records on or after the cutoff. Undated records are neither
    /// compliant nor violations.
    pub compliant_records: u64,
    pub violation_count: u64,
    /// Percentage of dated records that comply. 100.0 when there are no
    /// dated records to judge.
    pub compliance_rate: f64,
    /// First violations found, capped for readability; `violation_count`
    /// carries the real total.
    pub violations: Vec<Violation>,
    pub recommendation: String,
}

/// Descriptive scheduling metadata for the monthly cleanup. Nothing here is
/// enforced by the engine; it exists for operators and automation configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupSchedule {
    pub current_date: NaiveDateTime,
    pub next_cleanup_date: NaiveDateTime,
    pub days_until_cleanup: i64,
    pub frequency: String,
    pub day_of_month: u32,
    pub recommended_time: String,
    pub cutoff_date: NaiveDateTime,
    /// Narrowest possible retention window in days (February + cleanup day).
    pub minimum_days: u32,
    /// Widest possible window, two 31-day months back to back.
    pub maximum_days: u32,
    pub cron_expression: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_as_flat_mode_tag() {
        let plan = DeletionPlan {
            planned_at: chrono::NaiveDate::from_ymd_opt(2025, 1, 20)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            cutoff: chrono::NaiveDate::from_ymd_opt(2024, 12, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            candidate_count: 1,
            candidate_ids: vec!["r1".to_string()],
            per_team_count: BTreeMap::new(),
            per_platform_count: BTreeMap::new(),
            oldest: None,
            newest: None,
            outcome: PlanOutcome::Completed {
                deleted_ids: vec!["r1".to_string()],
                failed: vec![],
            },
        };

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["mode"], "completed");
        assert_eq!(value["deleted_ids"][0], "r1");
        assert_eq!(value["failed"].as_array().unwrap().len(), 0);
        assert_eq!(value["cutoff"], "2024-12-01T00:00:00");
    }

    #[test]
    fn test_non_completed_outcomes_have_no_deletion_fields() {
        let value = serde_json::to_value(PlanOutcome::DryRun).unwrap();
        assert_eq!(value["mode"], "dry_run");
        assert!(value.get("deleted_ids").is_none());

        let value = serde_json::to_value(PlanOutcome::NotConfirmed).unwrap();
        assert_eq!(value["mode"], "not_confirmed");
    }

    #[test]
    fn test_deleted_count_reads_through_outcome() {
        let outcome = PlanOutcome::Completed {
            deleted_ids: vec!["a".to_string(), "b".to_string()],
            failed: vec![FailedDeletion {
                id: "c".to_string(),
                error: "boom".to_string(),
            }],
        };
        let plan = DeletionPlan {
            planned_at: chrono::NaiveDate::from_ymd_opt(2025, 1, 20)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            cutoff: chrono::NaiveDate::from_ymd_opt(2024, 12, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            candidate_count: 3,
            candidate_ids: vec![],
            per_team_count: BTreeMap::new(),
            per_platform_count: BTreeMap::new(),
            oldest: None,
            newest: None,
            outcome,
        };
        assert_eq!(plan.deleted_count(), 2);
        assert_eq!(plan.failed_count(), 1);
    }
}
