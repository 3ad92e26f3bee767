//! JSON-file record store for offline runs and tests.
//!
//! Reads a dump produced by `statusctl mock` (or exported from the live
//! database): a JSON array of raw records. Filtering happens in memory with
//! the same semantics the HTTP store pushes to the server. Archival is
//! tracked in-process so cleanup against a file input is observable.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::record::{normalize, LogEntry, RawRecord};
use crate::store::{RecordFilter, RecordStore, StoreError};

#[derive(Debug)]
pub struct FileStore {
    records: Vec<RawRecord>,
    archived: Mutex<HashSet<String>>,
}

impl FileStore {
    /// Load a dump file (JSON array of raw records).
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records: Vec<RawRecord> = serde_json::from_str(&content)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<RawRecord>) -> Self {
        FileStore {
            records,
            archived: Mutex::new(HashSet::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids archived during this process, sorted.
    pub fn archived_ids(&self) -> Vec<String> {
        let archived = self.archived.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = archived.iter().cloned().collect();
        ids.sort();
        ids
    }

    fn matches(entry: &LogEntry, filter: &RecordFilter) -> bool {
        if let Some(bound) = filter.on_or_after {
            if !entry.date.map(|d| d >= bound).unwrap_or(false) {
                return false;
            }
        }
        if let Some(bound) = filter.on_or_before {
            if !entry.date.map(|d| d <= bound).unwrap_or(false) {
                return false;
            }
        }
        if let Some(bound) = filter.before {
            if !entry.date.map(|d| d < bound).unwrap_or(false) {
                return false;
            }
        }
        if let Some(team) = &filter.team {
            if entry.team != *team {
                return false;
            }
        }
        if let Some(platform) = &filter.platform {
            if entry.platform != *platform {
                return false;
            }
        }
        if let Some(project) = &filter.project {
            if !entry.project_name.contains(project.as_str()) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<RawRecord>, StoreError> {
        let archived = {
            let guard = self.archived.lock().unwrap_or_else(|e| e.into_inner());
            guard.clone()
        };

        let mut matched: Vec<(Option<chrono::NaiveDateTime>, &RawRecord)> = self
            .records
            .iter()
            .filter(|record| !archived.contains(&record.id))
            .filter_map(|record| {
                let entry = normalize(record);
                Self::matches(&entry, filter).then_some((entry.date, record))
            })
            .collect();

        // Newest first, undated records at the end, as the live API sorts.
        matched.sort_by_key(|(date, _)| Reverse(*date));
        Ok(matched.into_iter().map(|(_, record)| record.clone()).collect())
    }

    async fn archive(&self, id: &str) -> Result<(), StoreError> {
        if !self.records.iter().any(|record| record.id == id) {
            return Err(StoreError::Api {
                status: 404,
                body: format!("no record with id {id}"),
            });
        }
        let mut archived = self.archived.lock().unwrap_or_else(|e| e.into_inner());
        archived.insert(id.to_string());
        Ok(())
    }

    async fn restore(&self, id: &str) -> Result<(), StoreError> {
        if !self.records.iter().any(|record| record.id == id) {
            return Err(StoreError::Api {
                status: 404,
                body: format!("no record with id {id}"),
            });
        }
        let mut archived = self.archived.lock().unwrap_or_else(|e| e.into_inner());
        archived.remove(id);
        Ok(())
    }
}
