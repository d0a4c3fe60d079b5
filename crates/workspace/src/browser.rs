//! The admin batch-task browser.
//!
//! [`BatchBrowser`] drives the batch detail view: a filterable task listing
//! with its progress report, deterministic selection with bounded
//! previous/next navigation, and the admin-only operations (restore, batch
//! upload, CSV export, hard delete). Report and listing load concurrently
//! through the query cache; snapshots belonging to a superseded batch or
//! filter change are dropped by sequence check.

use std::sync::Arc;

use folio_client::TaskFetcher;
use folio_core::export;
use folio_core::selection;
use folio_core::upload::BatchUploadRequest;
use folio_core::workflow;
use folio_core::{BatchReport, BatchTask, CoreError, Role, TaskState, WorkflowAction};
use tokio::sync::Mutex;

use crate::error::WorkspaceError;
use crate::notify::{Notice, Notifier};
use crate::session::SessionUser;

struct BrowserState {
    batch_id: String,
    filter: Option<TaskState>,
    /// Task id the user navigated to; selection falls back to the first
    /// task when it is absent from the listing.
    requested_task_id: Option<String>,
    tasks: Vec<BatchTask>,
    report: Option<BatchReport>,
    load_seq: u64,
    restoring: bool,
}

/// The batch detail view engine.
pub struct BatchBrowser {
    fetcher: Arc<TaskFetcher>,
    notifier: Arc<Notifier>,
    user: SessionUser,
    state: Mutex<BrowserState>,
}

impl BatchBrowser {
    pub fn new(
        fetcher: Arc<TaskFetcher>,
        notifier: Arc<Notifier>,
        user: SessionUser,
        batch_id: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            user,
            state: Mutex::new(BrowserState {
                batch_id: batch_id.into(),
                filter: None,
                requested_task_id: None,
                tasks: Vec::new(),
                report: None,
                load_seq: 0,
                restoring: false,
            }),
        }
    }

    // ---- loading ----

    /// Fetch the batch report and the filtered task listing concurrently.
    ///
    /// Loads are sequenced: only the snapshot belonging to the newest load
    /// may apply, so a slow response never overwrites a later filter or
    /// batch change.
    pub async fn load(&self) -> Result<(), WorkspaceError> {
        let (seq, batch_id, filter) = {
            let mut state = self.state.lock().await;
            state.load_seq += 1;
            (state.load_seq, state.batch_id.clone(), state.filter)
        };

        let (report, tasks) = futures::join!(
            self.fetcher.report(&batch_id),
            self.fetcher.tasks(&batch_id, filter)
        );
        let (report, tasks) = match (report, tasks) {
            (Ok(report), Ok(tasks)) => (report, tasks),
            (Err(e), _) | (_, Err(e)) => {
                self.notifier
                    .publish(Notice::error("Failed to load batch").with_detail(e.to_string()));
                return Err(e.into());
            }
        };

        let mut state = self.state.lock().await;
        if state.load_seq != seq {
            tracing::debug!(batch_id = %batch_id, "Dropping superseded batch snapshot");
            return Ok(());
        }
        tracing::debug!(
            batch_id = %batch_id,
            filter = filter.map(|f| f.as_str()).unwrap_or("all"),
            task_count = tasks.len(),
            "Batch snapshot applied"
        );
        state.report = Some(report);
        state.tasks = tasks;
        Ok(())
    }

    /// Change the state filter and reload.
    ///
    /// Resets the requested task id so selection falls back to the first
    /// task of the newly filtered listing.
    pub async fn set_filter(&self, filter: Option<TaskState>) -> Result<(), WorkspaceError> {
        {
            let mut state = self.state.lock().await;
            state.filter = filter;
            state.requested_task_id = None;
        }
        self.load().await
    }

    /// Point the browser at a different batch and reload.
    pub async fn set_batch(&self, batch_id: &str) -> Result<(), WorkspaceError> {
        {
            let mut state = self.state.lock().await;
            state.batch_id = batch_id.to_string();
            state.filter = None;
            state.requested_task_id = None;
            state.tasks.clear();
            state.report = None;
        }
        self.load().await
    }

    // ---- selection ----

    /// Point the selection at a specific task id.
    pub async fn select(&self, task_id: &str) {
        let mut state = self.state.lock().await;
        state.requested_task_id = Some(task_id.to_string());
    }

    /// The task the browser shows: the requested id when present in the
    /// listing, else the first task.
    pub async fn selected(&self) -> Option<BatchTask> {
        let state = self.state.lock().await;
        selection::resolve_selection(&state.tasks, state.requested_task_id.as_deref()).cloned()
    }

    /// Move the selection one task towards the start of the listing.
    pub async fn go_previous(&self) {
        let mut state = self.state.lock().await;
        if let Some(previous) = selected_index_of(&state).and_then(selection::previous_index) {
            state.requested_task_id = Some(state.tasks[previous].task_id.clone());
        }
    }

    /// Move the selection one task towards the end of the listing.
    pub async fn go_next(&self) {
        let mut state = self.state.lock().await;
        let len = state.tasks.len();
        if let Some(next) =
            selected_index_of(&state).and_then(|index| selection::next_index(index, len))
        {
            state.requested_task_id = Some(state.tasks[next].task_id.clone());
        }
    }

    /// One-based `"n / total"` header label for the selection.
    pub async fn position_label(&self) -> String {
        let state = self.state.lock().await;
        selection::position_label(selected_index_of(&state), state.tasks.len())
    }

    // ---- snapshots ----

    pub async fn tasks(&self) -> Vec<BatchTask> {
        self.state.lock().await.tasks.clone()
    }

    pub async fn report(&self) -> Option<BatchReport> {
        self.state.lock().await.report.clone()
    }

    pub async fn filter(&self) -> Option<TaskState> {
        self.state.lock().await.filter
    }

    pub async fn batch_id(&self) -> String {
        self.state.lock().await.batch_id.clone()
    }

    pub async fn is_restoring(&self) -> bool {
        self.state.lock().await.restoring
    }

    /// Per-filter task counts from the report, in tab display order with
    /// the unfiltered total first. Empty until a report has loaded.
    pub async fn filter_counts(&self) -> Vec<(Option<TaskState>, u32)> {
        let state = self.state.lock().await;
        let Some(report) = &state.report else {
            return Vec::new();
        };
        let mut counts = vec![(None, report.total_tasks)];
        counts.extend(
            folio_core::state::ALL_TASK_STATES
                .iter()
                .map(|s| (Some(*s), report.state_count(*s))),
        );
        counts
    }

    // ---- admin operations ----

    /// Restore the selected trashed task to the pending queue.
    pub async fn restore(&self) -> Result<(), WorkspaceError> {
        let (task_id, batch_id) = {
            let mut state = self.state.lock().await;
            if state.restoring {
                return Err(WorkspaceError::Busy);
            }
            let selected =
                selection::resolve_selection(&state.tasks, state.requested_task_id.as_deref())
                    .ok_or(WorkspaceError::NoSelection)?;
            if selected.state != TaskState::Trashed {
                return Err(
                    CoreError::Validation("Only trashed tasks can be restored".to_string()).into(),
                );
            }
            workflow::authorize(TaskState::Trashed, WorkflowAction::Restore, self.user.role)?;
            let task_id = selected.task_id.clone();
            let batch_id = state.batch_id.clone();
            state.restoring = true;
            (task_id, batch_id)
        };

        let outcome = self.fetcher.restore(&task_id, &batch_id).await;
        self.state.lock().await.restoring = false;
        match outcome {
            Ok(()) => {
                tracing::info!(task_id = %task_id, batch_id = %batch_id, "Task restored");
                self.notifier.publish(Notice::success("Task restored"));
                self.load().await
            }
            Err(e) => {
                self.notifier
                    .publish(Notice::error("Failed to restore task").with_detail(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Validate and upload a new batch of tasks.
    ///
    /// Nothing is sent when client-side validation fails; the collected
    /// messages surface as one error notice.
    pub async fn upload(&self, request: &BatchUploadRequest) -> Result<(), WorkspaceError> {
        self.require_admin("upload batches")?;
        let errors = request.validate();
        if !errors.is_empty() {
            let detail = errors.join("; ");
            self.notifier
                .publish(Notice::error("Batch validation failed").with_detail(detail.clone()));
            return Err(CoreError::Validation(detail).into());
        }
        match self.fetcher.upload(request).await {
            Ok(()) => {
                tracing::info!(
                    batch_name = %request.batch_name,
                    task_count = request.tasks.len(),
                    "Batch uploaded"
                );
                self.notifier.publish(Notice::success("Batch uploaded"));
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .publish(Notice::error("Failed to upload batch").with_detail(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Fetch the export payload and render it as a CSV document.
    ///
    /// Returns the download filename and the document, or `None` when the
    /// batch has no tasks.
    pub async fn export_csv(&self) -> Result<Option<(String, String)>, WorkspaceError> {
        self.require_admin("export batches")?;
        let batch_id = self.state.lock().await.batch_id.clone();
        let response = match self.fetcher.export(&batch_id).await {
            Ok(response) => response,
            Err(e) => {
                self.notifier
                    .publish(Notice::error("Failed to export batch").with_detail(e.to_string()));
                return Err(e.into());
            }
        };
        if response.tasks.is_empty() {
            self.notifier
                .publish(Notice::info("Batch has no tasks to export"));
            return Ok(None);
        }
        let filename = export::export_filename(&response.batch_name);
        let document = export::csv_document(&response.tasks);
        tracing::info!(
            batch_id = %batch_id,
            filename = %filename,
            rows = response.tasks.len(),
            "Batch exported"
        );
        Ok(Some((filename, document)))
    }

    /// Permanently delete a task and reload the listing.
    pub async fn delete_task(&self, task_id: &str) -> Result<(), WorkspaceError> {
        self.require_admin("delete tasks")?;
        match self.fetcher.delete_task(task_id).await {
            Ok(_) => {
                tracing::info!(task_id = %task_id, "Task deleted");
                self.notifier.publish(Notice::success("Task deleted"));
                self.load().await
            }
            Err(e) => {
                self.notifier
                    .publish(Notice::error("Failed to delete task").with_detail(e.to_string()));
                Err(e.into())
            }
        }
    }

    // ---- private helpers ----

    fn require_admin(&self, capability: &str) -> Result<(), WorkspaceError> {
        if self.user.role != Role::Admin {
            return Err(CoreError::Forbidden(format!(
                "{} may not {capability}",
                self.user.role.label()
            ))
            .into());
        }
        Ok(())
    }
}

/// Index of the resolved selection in the listing.
fn selected_index_of(state: &BrowserState) -> Option<usize> {
    let selected = selection::resolve_selection(&state.tasks, state.requested_task_id.as_deref())?;
    selection::selected_index(&state.tasks, &selected.task_id)
}
