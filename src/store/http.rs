//! HTTP record store for the live document database.
//!
//! Speaks the Notion-compatible REST surface: `POST /databases/{id}/query`
//! with a filter body and cursor pagination, `PATCH /pages/{id}` to archive
//! or restore. The server enforces a 100-record page size; fetch loops until
//! `has_more` clears.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ApiConfig;
use crate::record::RawRecord;
use crate::store::{RecordFilter, RecordStore, StoreError};

use async_trait::async_trait;

const PAGE_SIZE: u32 = 100;

pub struct HttpStore {
    client: Client,
    base_url: String,
    token: String,
    api_version: String,
    database_id: String,
}

impl HttpStore {
    /// Build a store from API configuration. A missing database id is a
    /// construction-time error; a missing token only fails once the server
    /// rejects the request.
    pub fn new(api: &ApiConfig) -> Result<Self, StoreError> {
        if api.database_id.is_empty() {
            return Err(StoreError::MissingDatabaseId);
        }
        Ok(HttpStore {
            client: Client::new(),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token: api.token.clone(),
            api_version: api.version.clone(),
            database_id: api.database_id.clone(),
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn set_archived(&self, id: &str, archived: bool) -> Result<(), StoreError> {
        let url = format!("{}/pages/{}", self.base_url, id);
        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.api_version)
            .json(&json!({ "archived": archived }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    results: Vec<RawRecord>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Render a filter as the query endpoint's condition JSON. Multiple
/// conditions are conjoined with `and`; no conditions means no filter key.
fn filter_json(filter: &RecordFilter) -> Option<Value> {
    let mut conditions = Vec::new();

    if let Some(bound) = filter.on_or_after {
        conditions.push(json!({
            "property": "Date",
            "date": { "on_or_after": bound.format("%Y-%m-%dT%H:%M:%S").to_string() }
        }));
    }
    if let Some(bound) = filter.on_or_before {
        conditions.push(json!({
            "property": "Date",
            "date": { "on_or_before": bound.format("%Y-%m-%dT%H:%M:%S").to_string() }
        }));
    }
    if let Some(bound) = filter.before {
        conditions.push(json!({
            "property": "Date",
            "date": { "before": bound.format("%Y-%m-%dT%H:%M:%S").to_string() }
        }));
    }
    if let Some(team) = &filter.team {
        conditions.push(json!({
            "property": "Team",
            "select": { "equals": team }
        }));
    }
    if let Some(platform) = &filter.platform {
        conditions.push(json!({
            "property": "Platform",
            "select": { "equals": platform }
        }));
    }
    if let Some(project) = &filter.project {
        conditions.push(json!({
            "property": "Project Name",
            "rich_text": { "contains": project }
        }));
    }

    match conditions.len() {
        0 => None,
        1 => Some(conditions.remove(0)),
        _ => Some(json!({ "and": conditions })),
    }
}

#[async_trait]
impl RecordStore for HttpStore {
    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<RawRecord>, StoreError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);
        let condition = filter_json(filter);

        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({
                "page_size": PAGE_SIZE,
                "sorts": [{ "property": "Date", "direction": "descending" }],
            });
            if let Some(condition) = &condition {
                body["filter"] = condition.clone();
            }
            if let Some(cursor) = &cursor {
                body["start_cursor"] = Value::String(cursor.clone());
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.token)
                .header("Notion-Version", &self.api_version)
                .json(&body)
                .send()
                .await?;
            let page: QueryPage = Self::decode(response).await?;

            results.extend(page.results);
            if !page.has_more {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(results)
    }

    async fn archive(&self, id: &str) -> Result<(), StoreError> {
        self.set_archived(id, true).await
    }

    async fn restore(&self, id: &str) -> Result<(), StoreError> {
        self.set_archived(id, false).await
    }
}
