//! REST API client for the remote task store.
//!
//! Wraps the task store HTTP API (batch listings, reports, task listings,
//! assignment, workflow actions, upload, export) using [`reqwest`]. The
//! [`TaskStore`] trait is the seam the rest of the console programs
//! against; tests substitute scripted implementations.

use async_trait::async_trait;
use serde::Deserialize;

use folio_core::export::BatchExportResponse;
use folio_core::upload::BatchUploadRequest;
use folio_core::{AssignedTask, Batch, BatchReport, BatchTask, TaskState};

use crate::error::StoreError;

/// Acknowledgement returned by task action endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Remote task store operations used by the console.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// List every batch visible to the console.
    async fn list_batches(&self) -> Result<Vec<Batch>, StoreError>;

    /// Fetch the per-state count report for one batch.
    async fn get_batch_report(&self, batch_id: &str) -> Result<BatchReport, StoreError>;

    /// List the tasks of one batch, optionally filtered to one state.
    async fn get_batch_tasks(
        &self,
        batch_id: &str,
        state: Option<TaskState>,
    ) -> Result<Vec<BatchTask>, StoreError>;

    /// Fetch the task currently assigned to `user_id`, if any.
    async fn get_assigned_task(&self, user_id: &str) -> Result<Option<AssignedTask>, StoreError>;

    /// Submit a workflow decision for an assigned task. `submit` is true
    /// for submit/approve and false for reject.
    async fn submit_task(
        &self,
        task_id: &str,
        user_id: &str,
        transcript: &str,
        submit: bool,
    ) -> Result<TaskActionResponse, StoreError>;

    /// Move a task to the trash.
    async fn trash_task(
        &self,
        task_id: &str,
        username: &str,
    ) -> Result<TaskActionResponse, StoreError>;

    /// Return a trashed task to the pending pool.
    async fn restore_task(&self, task_id: &str) -> Result<(), StoreError>;

    /// Create a new batch of tasks.
    async fn upload_batch(&self, request: &BatchUploadRequest) -> Result<(), StoreError>;

    /// Fetch the full export payload for one batch.
    async fn export_batch(&self, batch_id: &str) -> Result<BatchExportResponse, StoreError>;

    /// Permanently delete a task.
    async fn delete_task(&self, task_id: &str) -> Result<TaskActionResponse, StoreError>;
}

/// HTTP implementation of [`TaskStore`] against a single task store
/// deployment.
pub struct HttpTaskStore {
    client: reqwest::Client,
    base_url: String,
    app_slug: String,
}

impl HttpTaskStore {
    /// Create a new client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://host:3000`.
    /// * `app_slug` - Application namespace in task-scoped routes.
    pub fn new(base_url: String, app_slug: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            app_slug,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful
    /// for connection pooling and for injecting timeouts).
    pub fn with_client(client: reqwest::Client, base_url: String, app_slug: String) -> Self {
        Self {
            client,
            base_url,
            app_slug,
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`StoreError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), StoreError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    /// Sends a `GET /batch/` request.
    async fn list_batches(&self) -> Result<Vec<Batch>, StoreError> {
        let response = self
            .client
            .get(format!("{}/batch/", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends a `GET /batch/{id}/report` request.
    async fn get_batch_report(&self, batch_id: &str) -> Result<BatchReport, StoreError> {
        let response = self
            .client
            .get(format!("{}/batch/{}/report", self.base_url, batch_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends a `GET /batch/{id}/tasks` request. The `state` query
    /// parameter is omitted for the unfiltered listing.
    async fn get_batch_tasks(
        &self,
        batch_id: &str,
        state: Option<TaskState>,
    ) -> Result<Vec<BatchTask>, StoreError> {
        let mut request = self
            .client
            .get(format!("{}/batch/{}/tasks", self.base_url, batch_id));
        if let Some(state) = state {
            request = request.query(&[("state", state.as_str())]);
        }
        let response = request.send().await?;

        Self::parse_response(response).await
    }

    /// Sends a `GET /tasks/{app}/assigned/{user}` request. A 404 or a
    /// `null` body both mean the user has no assigned task.
    async fn get_assigned_task(&self, user_id: &str) -> Result<Option<AssignedTask>, StoreError> {
        let response = self
            .client
            .get(format!(
                "{}/tasks/{}/assigned/{}",
                self.base_url, self.app_slug, user_id
            ))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::parse_response(response).await
    }

    /// Sends a `POST /tasks/{app}/submit/{task}` request.
    async fn submit_task(
        &self,
        task_id: &str,
        user_id: &str,
        transcript: &str,
        submit: bool,
    ) -> Result<TaskActionResponse, StoreError> {
        tracing::info!(task_id = %task_id, submit, "Submitting task decision");

        let body = serde_json::json!({
            "user_id": user_id,
            "transcript": transcript,
            "submit": submit,
        });

        let response = self
            .client
            .post(format!(
                "{}/tasks/{}/submit/{}",
                self.base_url, self.app_slug, task_id
            ))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends a `POST /tasks/submit/{task}` request flagged as a trash
    /// action. Trashing never carries a transcript.
    async fn trash_task(
        &self,
        task_id: &str,
        username: &str,
    ) -> Result<TaskActionResponse, StoreError> {
        tracing::info!(task_id = %task_id, "Trashing task");

        let body = serde_json::json!({
            "username": username,
            "submit": false,
        });

        let response = self
            .client
            .post(format!("{}/tasks/submit/{}", self.base_url, task_id))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends a `POST /tasks/{task}/restore` request.
    async fn restore_task(&self, task_id: &str) -> Result<(), StoreError> {
        tracing::info!(task_id = %task_id, "Restoring trashed task");

        let response = self
            .client
            .post(format!("{}/tasks/{}/restore", self.base_url, task_id))
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Sends a `POST /tasks/{app}/` request with the upload payload.
    async fn upload_batch(&self, request: &BatchUploadRequest) -> Result<(), StoreError> {
        tracing::info!(
            batch_name = %request.batch_name,
            task_count = request.tasks.len(),
            "Uploading batch"
        );

        let response = self
            .client
            .post(format!("{}/tasks/{}/", self.base_url, self.app_slug))
            .json(request)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Sends a `GET /batch/{app}/{id}/export` request.
    async fn export_batch(&self, batch_id: &str) -> Result<BatchExportResponse, StoreError> {
        let response = self
            .client
            .get(format!(
                "{}/batch/{}/{}/export",
                self.base_url, self.app_slug, batch_id
            ))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Sends a `DELETE /tasks/{task}` request.
    async fn delete_task(&self, task_id: &str) -> Result<TaskActionResponse, StoreError> {
        tracing::info!(task_id = %task_id, "Deleting task");

        let response = self
            .client
            .delete(format!("{}/tasks/{}", self.base_url, task_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
