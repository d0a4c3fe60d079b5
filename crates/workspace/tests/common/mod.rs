//! Shared test fixtures: a scripted in-memory task store whose calls are
//! recorded for assertion, plus tracing and notification helpers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use folio_client::{StoreError, TaskActionResponse, TaskStore};
use folio_core::export::BatchExportResponse;
use folio_core::upload::BatchUploadRequest;
use folio_core::{AssignedTask, Batch, BatchReport, BatchTask, TaskState};
use folio_workspace::Notice;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ScriptedStore
// ---------------------------------------------------------------------------

/// A [`TaskStore`] whose responses are scripted up front.
///
/// Reads serve from the scripted fields; mutations are recorded and answer
/// success unless `fail_mutations` is set. `read_delay` / `mutation_delay`
/// park the corresponding endpoints on the (paused) clock so tests can pin
/// down in-flight windows.
#[derive(Default)]
pub struct ScriptedStore {
    /// Assigned-task responses, consumed front to back; the last entry
    /// repeats once the script runs out.
    pub assigned_script: Mutex<Vec<Option<AssignedTask>>>,
    pub report: Mutex<Option<BatchReport>>,
    pub tasks: Mutex<Vec<BatchTask>>,
    pub export: Mutex<Option<BatchExportResponse>>,
    /// When set, every mutation endpoint answers a scripted 500.
    pub fail_mutations: AtomicBool,
    pub read_delay: Mutex<Option<Duration>>,
    pub mutation_delay: Mutex<Option<Duration>>,

    pub assigned_calls: AtomicUsize,
    pub report_calls: AtomicUsize,
    pub tasks_calls: AtomicUsize,
    /// Recorded `(task_id, transcript, submit)` triples.
    pub submit_calls: Mutex<Vec<(String, String, bool)>>,
    /// Recorded `(task_id, username)` pairs.
    pub trash_calls: Mutex<Vec<(String, String)>>,
    pub restore_calls: Mutex<Vec<String>>,
    pub upload_calls: Mutex<Vec<BatchUploadRequest>>,
    pub delete_calls: Mutex<Vec<String>>,
}

impl ScriptedStore {
    async fn read_gate(&self) {
        let delay = *self.read_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn mutation_gate(&self) -> Result<(), StoreError> {
        let delay = *self.mutation_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 500,
                body: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

fn ok_response() -> TaskActionResponse {
    TaskActionResponse {
        success: true,
        message: None,
    }
}

#[async_trait]
impl TaskStore for ScriptedStore {
    async fn list_batches(&self) -> Result<Vec<Batch>, StoreError> {
        Ok(Vec::new())
    }

    async fn get_batch_report(&self, batch_id: &str) -> Result<BatchReport, StoreError> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        self.read_gate().await;
        self.report
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| StoreError::Api {
                status: 404,
                body: format!("no report scripted for {batch_id}"),
            })
    }

    async fn get_batch_tasks(
        &self,
        _batch_id: &str,
        state: Option<TaskState>,
    ) -> Result<Vec<BatchTask>, StoreError> {
        self.tasks_calls.fetch_add(1, Ordering::SeqCst);
        self.read_gate().await;
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .iter()
            .filter(|task| state.map_or(true, |s| task.state == s))
            .cloned()
            .collect())
    }

    async fn get_assigned_task(&self, _user_id: &str) -> Result<Option<AssignedTask>, StoreError> {
        self.assigned_calls.fetch_add(1, Ordering::SeqCst);
        self.read_gate().await;
        let mut script = self.assigned_script.lock().unwrap();
        if script.len() > 1 {
            Ok(script.remove(0))
        } else {
            Ok(script.first().cloned().flatten())
        }
    }

    async fn submit_task(
        &self,
        task_id: &str,
        _user_id: &str,
        transcript: &str,
        submit: bool,
    ) -> Result<TaskActionResponse, StoreError> {
        self.submit_calls.lock().unwrap().push((
            task_id.to_string(),
            transcript.to_string(),
            submit,
        ));
        self.mutation_gate().await?;
        Ok(ok_response())
    }

    async fn trash_task(
        &self,
        task_id: &str,
        username: &str,
    ) -> Result<TaskActionResponse, StoreError> {
        self.trash_calls
            .lock()
            .unwrap()
            .push((task_id.to_string(), username.to_string()));
        self.mutation_gate().await?;
        Ok(ok_response())
    }

    async fn restore_task(&self, task_id: &str) -> Result<(), StoreError> {
        self.restore_calls.lock().unwrap().push(task_id.to_string());
        self.mutation_gate().await?;
        Ok(())
    }

    async fn upload_batch(&self, request: &BatchUploadRequest) -> Result<(), StoreError> {
        self.upload_calls.lock().unwrap().push(request.clone());
        self.mutation_gate().await?;
        Ok(())
    }

    async fn export_batch(&self, batch_id: &str) -> Result<BatchExportResponse, StoreError> {
        self.read_gate().await;
        self.export
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| StoreError::Api {
                status: 404,
                body: format!("no export scripted for {batch_id}"),
            })
    }

    async fn delete_task(&self, task_id: &str) -> Result<TaskActionResponse, StoreError> {
        self.delete_calls.lock().unwrap().push(task_id.to_string());
        self.mutation_gate().await?;
        Ok(ok_response())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Install a tracing subscriber once per test binary. Repeat calls no-op.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_workspace=debug,folio_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Drain every notice currently buffered on `rx`.
pub fn drain_notices(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}
