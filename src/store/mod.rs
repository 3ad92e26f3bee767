//! Record store seam.
//!
//! Everything upstream of the engine talks to a `RecordStore`: fetch raw
//! records matching a filter, archive a record (the backing API archives
//! rather than deletes), and restore one. Two implementations exist: an
//! HTTP client for the live document database and a JSON-file store for
//! offline runs and tests.

pub mod file;
pub mod http;

pub use file::FileStore;
pub use http::HttpStore;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::record::{normalize, LogEntry, RawRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database id is not configured")]
    MissingDatabaseId,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to decode records: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Server-side record filter. All conditions are optional and conjunctive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Date lower bound, inclusive.
    pub on_or_after: Option<NaiveDateTime>,
    /// Date upper bound, inclusive.
    pub on_or_before: Option<NaiveDateTime>,
    /// Strict date upper bound, used for retention cleanup.
    pub before: Option<NaiveDateTime>,
    /// Exact team name.
    pub team: Option<String>,
    /// Exact platform name.
    pub platform: Option<String>,
    /// Substring of the project name.
    pub project: Option<String>,
}

impl RecordFilter {
    /// Everything in the database.
    pub fn all() -> Self {
        RecordFilter::default()
    }

    /// Records dated inside `[start, end]`.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        RecordFilter {
            on_or_after: Some(start),
            on_or_before: Some(end),
            ..RecordFilter::default()
        }
    }

    /// Records dated strictly before `cutoff` (retention candidates).
    pub fn older_than(cutoff: NaiveDateTime) -> Self {
        RecordFilter {
            before: Some(cutoff),
            ..RecordFilter::default()
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == RecordFilter::default()
    }
}

/// The external document-database capability.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every record matching the filter. Implementations paginate
    /// internally; there is no fixed upper bound.
    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<RawRecord>, StoreError>;

    /// Archive one record. The backing API archives rather than deletes.
    async fn archive(&self, id: &str) -> Result<(), StoreError>;

    /// Undo an archive.
    async fn restore(&self, id: &str) -> Result<(), StoreError>;
}

/// Fetch and normalize in one step. A fetch failure is logged and surfaced
/// as an empty list so report building degrades to zeroed output instead
/// of aborting.
pub async fn fetch_entries(store: &dyn RecordStore, filter: &RecordFilter) -> Vec<LogEntry> {
    match store.fetch(filter).await {
        Ok(records) => records.iter().map(normalize).collect(),
        Err(e) => {
            tracing::error!("failed to fetch records: {}", e);
            Vec::new()
        }
    }
}
