//! HTTP client for the Rockset query and document APIs

use anyhow::{Context, Result};
use mergebase_core::{DuplicateGroup, MergeBaseRecord, MergeBaseStore};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::queries::{self, Row, DUP_MERGE_BASE_QUERY, FAILED_TEST_SHAS_QUERY};

pub const DEFAULT_API_SERVER: &str = "https://api.usw2a1.rockset.com";

/// Connection settings for the remote store
#[derive(Debug, Clone)]
pub struct RocksetConfig {
    /// API server base URL
    pub api_server: String,
    /// API key, sent as `Authorization: ApiKey <key>`
    pub api_key: String,
    pub workspace: String,
    pub collection: String,
}

impl RocksetConfig {
    pub fn new(api_server: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_server: api_server.into(),
            api_key: api_key.into(),
            workspace: "commons".to_string(),
            collection: "merge_bases".to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/orgs/self/{}", self.api_server.trim_end_matches('/'), path)
    }

    fn docs_url(&self) -> String {
        self.url(&format!(
            "ws/{}/collections/{}/docs",
            self.workspace, self.collection
        ))
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Row>,
}

/// Remote merge-base store
pub struct RocksetStore {
    config: RocksetConfig,
    agent: ureq::Agent,
}

impl RocksetStore {
    pub fn new(config: RocksetConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("merge-base-info/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { config, agent }
    }

    fn authorization(&self) -> String {
        format!("ApiKey {}", self.config.api_key)
    }

    /// Runs a SQL query and returns its result rows
    pub fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let body = json!({ "sql": { "query": sql } });
        let response: QueryResponse = self
            .agent
            .post(&self.config.url("queries"))
            .set("Authorization", &self.authorization())
            .send_json(body)
            .map_err(describe)
            .context("Rockset query failed")?
            .into_json()
            .context("Failed to decode Rockset query response")?;
        Ok(response.results)
    }

    fn send_docs(&self, method: &str, data: Vec<Value>) -> Result<()> {
        self.agent
            .request(method, &self.config.docs_url())
            .set("Authorization", &self.authorization())
            .send_json(json!({ "data": data }))
            .map_err(describe)
            .with_context(|| {
                format!(
                    "Rockset {} on {}.{} failed",
                    method, self.config.workspace, self.config.collection
                )
            })?;
        Ok(())
    }
}

/// Keeps the response body of HTTP status errors in the message
fn describe(err: ureq::Error) -> anyhow::Error {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            anyhow::anyhow!("HTTP {}: {}", code, body.trim())
        }
        other => anyhow::Error::new(other),
    }
}

impl MergeBaseStore for RocksetStore {
    fn duplicate_groups(&self) -> Result<Vec<DuplicateGroup>> {
        self.query(DUP_MERGE_BASE_QUERY)?
            .iter()
            .map(queries::duplicate_group)
            .collect()
    }

    fn remove_merge_bases(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        log::debug!("Removing {} records from {}", ids.len(), self.config.collection);
        let data = ids.iter().map(|id| json!({ "_id": id })).collect();
        self.send_docs("DELETE", data)
    }

    fn shas_missing_merge_base(&self) -> Result<Vec<String>> {
        self.query(FAILED_TEST_SHAS_QUERY)?
            .iter()
            .map(queries::head_sha)
            .collect()
    }

    fn upload_merge_bases(&self, records: &[MergeBaseRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let data = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to serialize merge-base records")?;
        log::debug!("Uploading {} records to {}", records.len(), self.config.collection);
        self.send_docs("POST", data)
    }
}
