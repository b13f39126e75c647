use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::model::{CreateTaskInput, NewTask, Task};

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// A failed call, reported with one generic message per operation.
/// The underlying cause is kept as the source for logging.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to fetch tasks")]
    FetchAll(#[source] Cause),
    #[error("Failed to fetch task")]
    FetchOne(#[source] Cause),
    #[error("Failed to create task")]
    Create(#[source] Cause),
}

#[derive(Debug, thiserror::Error)]
pub enum Cause {
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the `/tasks` resource.
#[derive(Debug, Clone)]
pub struct TaskClient {
    client: Client,
    base: Url,
}

impl TaskClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid API URL '{base_url}'"))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            bail!("invalid API URL '{base_url}': must be an http or https URL");
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/tasks`, or `{base}/tasks/{id}` with the id encoded as one path segment.
    fn endpoint(&self, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("tasks");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, Cause> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Cause::Status(status));
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint(None);
        debug!("GET {url}");
        Self::send(self.client.get(url)).await.map_err(|cause| {
            warn!("listing tasks failed: {cause}");
            ApiError::FetchAll(cause)
        })
    }

    /// Fetch one task. A successful `null` body means the backend has no such task.
    pub async fn get(&self, id: &str) -> Result<Option<Task>, ApiError> {
        let url = self.endpoint(Some(id));
        debug!("GET {url}");
        Self::send(self.client.get(url)).await.map_err(|cause| {
            warn!("fetching task '{id}' failed: {cause}");
            ApiError::FetchOne(cause)
        })
    }

    pub async fn create(&self, input: &CreateTaskInput) -> Result<Task, ApiError> {
        let url = self.endpoint(None);
        let body = NewTask::new(input, Utc::now());
        debug!("POST {url}");
        Self::send(self.client.post(url).json(&body))
            .await
            .map_err(|cause| {
                warn!("creating task '{}' failed: {cause}", input.title);
                ApiError::Create(cause)
            })
    }
}
