use super::{decode, ensure_success, network_error};
use crate::errors::ApiResult;
use crate::models::{NewTask, Task, TaskPatch};

/// Client for the `/tasks` collection.
///
/// Stateless: every call is a fresh round-trip, and no quadrant or completion
/// validation happens here. The quadrant travels as whatever string the caller
/// supplied; the typed check lives in the state containers.
#[derive(Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaskClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<Task>> {
        let resp = self
            .http
            .get(format!("{}/tasks", self.base_url))
            .send()
            .await
            .map_err(|e| network_error("failed to load tasks", &e))?;
        let resp = ensure_success(resp, "failed to load tasks").await?;
        decode(resp).await
    }

    pub async fn create(&self, title: &str, quadrant: &str) -> ApiResult<Task> {
        let body = NewTask {
            title: title.to_string(),
            quadrant: quadrant.to_string(),
        };
        let resp = self
            .http
            .post(format!("{}/tasks", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error("failed to create task", &e))?;
        let resp = ensure_success(resp, "failed to create task").await?;
        decode(resp).await
    }

    pub async fn update(&self, id: &str, patch: &TaskPatch) -> ApiResult<Task> {
        let resp = self
            .http
            .put(self.task_url(id))
            .json(patch)
            .send()
            .await
            .map_err(|e| network_error("failed to update task", &e))?;
        let resp = ensure_success(resp, "failed to update task").await?;
        decode(resp).await
    }

    /// Delete a task. The backend echoes the removed record; like every caller
    /// of this operation, we have no use for it, so the body is discarded.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let resp = self
            .http
            .delete(self.task_url(id))
            .send()
            .await
            .map_err(|e| network_error("failed to delete task", &e))?;
        ensure_success(resp, "failed to delete task").await?;
        Ok(())
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/tasks/{}", self.base_url, urlencoding::encode(id))
    }
}
