//! Cached read facade over the task store, pairing mutations with the
//! cache invalidations that keep the read side honest.
//!
//! Reads go through [`QueryCache`]; every mutation goes straight to the
//! store and then drops the cached queries its success made stale. The
//! assigned-task query is deliberately never served from cache: whether a
//! user has work is the one question the console always asks the store.

use std::sync::Arc;
use std::time::Duration;

use folio_core::export::BatchExportResponse;
use folio_core::upload::BatchUploadRequest;
use folio_core::{AssignedTask, Batch, BatchReport, BatchTask, TaskState};

use crate::api::{TaskActionResponse, TaskStore};
use crate::cache::QueryCache;
use crate::error::StoreError;
use crate::keys::{batch_keys, workspace_keys};

/// Batch listings go stale after five minutes.
pub const BATCH_LIST_STALE: Duration = Duration::from_secs(300);

/// Batch reports and task listings go stale after two minutes.
pub const BATCH_DETAIL_STALE: Duration = Duration::from_secs(120);

/// Cached task store facade.
pub struct TaskFetcher {
    store: Arc<dyn TaskStore>,
    cache: QueryCache,
}

impl TaskFetcher {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            cache: QueryCache::new(),
        }
    }

    // ---- cached reads ----

    /// The batch listing.
    pub async fn batches(&self) -> Result<Vec<Batch>, StoreError> {
        self.cache
            .get_with(&batch_keys::lists(), BATCH_LIST_STALE, || async {
                self.store.list_batches().await
            })
            .await
    }

    /// The per-state count report for one batch.
    pub async fn report(&self, batch_id: &str) -> Result<BatchReport, StoreError> {
        let report: BatchReport = self
            .cache
            .get_with(&batch_keys::report(batch_id), BATCH_DETAIL_STALE, || async {
                self.store.get_batch_report(batch_id).await
            })
            .await?;
        if !report.is_consistent() {
            tracing::warn!(
                batch_id = %batch_id,
                total_tasks = report.total_tasks,
                "Batch report counts do not sum to the reported total"
            );
        }
        Ok(report)
    }

    /// The task listing for one batch under one state filter.
    pub async fn tasks(
        &self,
        batch_id: &str,
        state: Option<TaskState>,
    ) -> Result<Vec<BatchTask>, StoreError> {
        self.cache
            .get_with(
                &batch_keys::tasks(batch_id, state),
                BATCH_DETAIL_STALE,
                || async { self.store.get_batch_tasks(batch_id, state).await },
            )
            .await
    }

    /// The task currently assigned to `user_id`. Always refetched.
    pub async fn assigned_task(&self, user_id: &str) -> Result<Option<AssignedTask>, StoreError> {
        self.cache
            .get_with(
                &workspace_keys::assigned_task(user_id),
                Duration::ZERO,
                || async { self.store.get_assigned_task(user_id).await },
            )
            .await
    }

    /// The export payload for one batch. Exports are one-shot downloads
    /// and bypass the cache entirely.
    pub async fn export(&self, batch_id: &str) -> Result<BatchExportResponse, StoreError> {
        self.store.export_batch(batch_id).await
    }

    // ---- mutations ----

    /// Submit an annotation transcript.
    pub async fn submit(
        &self,
        task_id: &str,
        user_id: &str,
        transcript: &str,
    ) -> Result<TaskActionResponse, StoreError> {
        let response = self
            .store
            .submit_task(task_id, user_id, transcript, true)
            .await?;
        self.cache
            .invalidate(&workspace_keys::assigned_task(user_id))
            .await;
        Ok(response)
    }

    /// Approve a task at the review or final review stage.
    pub async fn approve(
        &self,
        task_id: &str,
        user_id: &str,
        transcript: &str,
    ) -> Result<TaskActionResponse, StoreError> {
        let response = self
            .store
            .submit_task(task_id, user_id, transcript, true)
            .await?;
        self.cache
            .invalidate(&workspace_keys::assigned_task(user_id))
            .await;
        Ok(response)
    }

    /// Reject a task back one workflow stage.
    pub async fn reject(
        &self,
        task_id: &str,
        user_id: &str,
        transcript: &str,
    ) -> Result<TaskActionResponse, StoreError> {
        let response = self
            .store
            .submit_task(task_id, user_id, transcript, false)
            .await?;
        self.cache
            .invalidate(&workspace_keys::assigned_task(user_id))
            .await;
        Ok(response)
    }

    /// Trash a task. Drops the whole workspace query family so every
    /// assignment view refetches.
    pub async fn trash(
        &self,
        task_id: &str,
        username: &str,
    ) -> Result<TaskActionResponse, StoreError> {
        let response = self.store.trash_task(task_id, username).await?;
        self.cache.invalidate_prefix(&workspace_keys::all()).await;
        Ok(response)
    }

    /// Restore a trashed task to pending.
    pub async fn restore(&self, task_id: &str, batch_id: &str) -> Result<(), StoreError> {
        self.store.restore_task(task_id).await?;
        self.cache
            .invalidate(&batch_keys::tasks(batch_id, Some(TaskState::Trashed)))
            .await;
        self.cache.invalidate(&batch_keys::report(batch_id)).await;
        Ok(())
    }

    /// Upload a new batch. Drops the whole batch query family.
    pub async fn upload(&self, request: &BatchUploadRequest) -> Result<(), StoreError> {
        self.store.upload_batch(request).await?;
        self.cache.invalidate_prefix(&batch_keys::all()).await;
        Ok(())
    }

    /// Permanently delete a task. Drops every task listing.
    pub async fn delete_task(&self, task_id: &str) -> Result<TaskActionResponse, StoreError> {
        let response = self.store.delete_task(task_id).await?;
        self.cache.invalidate_prefix(&batch_keys::all_tasks()).await;
        Ok(response)
    }
}
