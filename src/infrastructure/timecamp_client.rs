use crate::domain::models::{CurrentUser, TaskNode};
use crate::infrastructure::entry_mapper::{TimeCampEntry, TimeCampTask, TimeCampUser};
use crate::infrastructure::error::SyncError;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_ADDRESS: &str = "https://app.timecamp.com/third_party/api/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[async_trait]
pub trait TimeCampClient: Send + Sync {
    async fn list_entries(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeCampEntry>, SyncError>;

    async fn create_entry(&self, entry: &TimeCampEntry) -> Result<(), SyncError>;

    async fn delete_entry(&self, entry: &TimeCampEntry) -> Result<(), SyncError>;

    async fn current_user(&self) -> Result<CurrentUser, SyncError>;

    async fn list_tasks(&self) -> Result<Vec<TaskNode>, SyncError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTimeCampClient {
    client: Client,
    base_url: Url,
    auth_token: String,
}

impl ReqwestTimeCampClient {
    pub fn new(
        base_address: &str,
        auth_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let auth_token = auth_token.into();
        Self::ensure_non_empty(&auth_token, "auth token")?;

        let base_url = Self::parse_base_url(base_address)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|error| SyncError::Api(format!("failed to build http client: {error}")))?;

        Ok(Self {
            client,
            base_url,
            auth_token,
        })
    }

    fn ensure_non_empty(value: &str, field: &str) -> Result<(), SyncError> {
        if value.trim().is_empty() {
            return Err(SyncError::Api(format!("{field} must not be empty")));
        }
        Ok(())
    }

    // Relative joins drop the last path segment unless the base ends in '/'.
    fn parse_base_url(base_address: &str) -> Result<Url, SyncError> {
        let trimmed = base_address.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let url = Url::parse(&normalized)
            .map_err(|error| SyncError::InvalidConfig(format!("invalid TimeCamp base address: {error}")))?;
        if url.cannot_be_a_base() {
            return Err(SyncError::InvalidConfig(
                "TimeCamp base address cannot be a base".to_string(),
            ));
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SyncError> {
        self.base_url
            .join(path)
            .map_err(|error| SyncError::Api(format!("invalid endpoint '{path}': {error}")))
    }

    fn http_error(status: StatusCode, body: &str) -> SyncError {
        let message = if body.trim().is_empty() {
            format!("http {}", status.as_u16())
        } else {
            format!("http {}; body={body}", status.as_u16())
        };
        SyncError::Api(message)
    }

    async fn read_body(
        response: reqwest::Response,
        action: &str,
    ) -> Result<String, SyncError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| SyncError::Api(format!("failed reading {action} response: {error}")))?;

        if !status.is_success() {
            return Err(Self::http_error(status, &body));
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, action: &str) -> Result<T, SyncError> {
        let response = self
            .client
            .get(self.endpoint(path)?)
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .map_err(|error| SyncError::Api(format!("network error while {action}: {error}")))?;

        let body = Self::read_body(response, action).await?;
        serde_json::from_str(&body)
            .map_err(|error| SyncError::Api(format!("invalid {action} payload: {error}; body={body}")))
    }
}

#[async_trait]
impl TimeCampClient for ReqwestTimeCampClient {
    async fn list_entries(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeCampEntry>, SyncError> {
        let response = self
            .client
            .get(self.endpoint("entries")?)
            .bearer_auth(&self.auth_token)
            .query(&[
                ("from", from.format(DATE_FORMAT).to_string()),
                ("to", to.format(DATE_FORMAT).to_string()),
            ])
            .send()
            .await
            .map_err(|error| SyncError::Api(format!("network error while listing entries: {error}")))?;

        let body = Self::read_body(response, "entries list").await?;
        let entries: Vec<TimeCampEntry> = serde_json::from_str(&body).map_err(|error| {
            SyncError::Api(format!("invalid entries list payload: {error}; body={body}"))
        })?;
        debug!(count = entries.len(), %from, %to, "listed TimeCamp entries");
        Ok(entries)
    }

    async fn create_entry(&self, entry: &TimeCampEntry) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.endpoint("entries")?)
            .bearer_auth(&self.auth_token)
            .json(entry)
            .send()
            .await
            .map_err(|error| SyncError::Api(format!("network error while creating entry: {error}")))?;

        Self::read_body(response, "entry create").await?;
        debug!(date = %entry.date, task_id = %entry.task_id, "created TimeCamp entry");
        Ok(())
    }

    async fn delete_entry(&self, entry: &TimeCampEntry) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.endpoint("entries")?)
            .bearer_auth(&self.auth_token)
            .json(entry)
            .send()
            .await
            .map_err(|error| SyncError::Api(format!("network error while deleting entry: {error}")))?;

        Self::read_body(response, "entry delete").await?;
        debug!(id = ?entry.id, date = %entry.date, "deleted TimeCamp entry");
        Ok(())
    }

    async fn current_user(&self) -> Result<CurrentUser, SyncError> {
        let user: TimeCampUser = self.get_json("me", "reading current user").await?;
        Ok(user.into())
    }

    async fn list_tasks(&self) -> Result<Vec<TaskNode>, SyncError> {
        let tasks: HashMap<String, TimeCampTask> = self.get_json("tasks", "listing tasks").await?;
        debug!(count = tasks.len(), "listed TimeCamp tasks");
        Ok(tasks.into_values().map(TaskNode::from).collect())
    }
}
