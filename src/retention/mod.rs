//! Monthly data-retention policy: cutoff arithmetic, compliance
//! validation, and the dry-run-safe deletion plan.

pub mod engine;
pub mod types;

pub use engine::{cutoff_for, identify_expired, RetentionEngine, VIOLATION_PREVIEW_LIMIT};
pub use types::{
    CleanupSchedule, DeletionPlan, FailedDeletion, PlanOutcome, RetentionValidation, Violation,
};
