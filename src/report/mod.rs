pub mod aggregate;
pub mod counter;
pub mod digest;
pub mod paths;
pub mod period;

pub use aggregate::{
    calculate_statistics, classify_status, group_by_platform, group_by_team, group_by_week,
    rank_transitions, GroupSlice, Stats, StatusBucket, StatusDistribution, RANKING_LIMIT,
};
pub use counter::{Counter, RankedCounts};
pub use digest::{build_report, Report, ReportSummary};
pub use paths::{build_all_project_paths, project_status_path, PathStep};
pub use period::{first_instant, ReportPeriod};
