//! The annotator/reviewer editing session.
//!
//! [`EditorSession`] owns the transcript buffer for the user's single
//! assigned task and funnels every workflow action through the transition
//! authority in `folio_core::workflow`. Session state sits behind a
//! `tokio::sync::Mutex` so overlapping operations (a refresh racing a
//! submit, a stale fetch landing after a task switch) serialize cleanly,
//! and a fetch sequence number keeps superseded refresh responses from
//! clobbering newer state.

use std::sync::Arc;
use std::time::Duration;

use folio_client::{StoreError, TaskActionResponse, TaskFetcher};
use folio_core::workflow;
use folio_core::{AssignedTask, CoreError, Role, WorkflowAction};
use folio_drafts::{Draft, DraftAutosave, DraftStore};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::WorkspaceError;
use crate::notify::{Notice, Notifier};

// ---------------------------------------------------------------------------
// SessionUser
// ---------------------------------------------------------------------------

/// The authenticated user driving a session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// Remote user id, sent with transcript submissions.
    pub id: String,
    /// Login name, sent with trash requests.
    pub username: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// EditorSession
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SessionState {
    task: Option<AssignedTask>,
    buffer: String,
    /// Server transcript at activation, kept for `restore_original` and
    /// unsaved-change detection.
    original_text: String,
    busy: bool,
    trash_requested: bool,
    refresh_seq: u64,
}

/// The editing surface for one user's assigned task.
pub struct EditorSession {
    fetcher: Arc<TaskFetcher>,
    drafts: Arc<dyn DraftStore>,
    autosave: DraftAutosave,
    notifier: Arc<Notifier>,
    user: SessionUser,
    session_id: Uuid,
    state: Mutex<SessionState>,
}

impl EditorSession {
    /// Create a session for `user`, spawning its draft autosave engine.
    pub fn new(
        fetcher: Arc<TaskFetcher>,
        drafts: Arc<dyn DraftStore>,
        notifier: Arc<Notifier>,
        user: SessionUser,
        autosave_delay: Duration,
    ) -> Self {
        let autosave = DraftAutosave::spawn(drafts.clone(), autosave_delay);
        let session_id = Uuid::new_v4();
        tracing::info!(
            session_id = %session_id,
            username = %user.username,
            role = user.role.as_str(),
            "Editor session started"
        );
        Self {
            fetcher,
            drafts,
            autosave,
            notifier,
            user,
            session_id,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    // ---- assigned task ----

    /// Fetch the user's assigned task and apply it to the session.
    ///
    /// Refreshes are sequenced: only the response belonging to the newest
    /// refresh may apply, stale responses are dropped on arrival.
    pub async fn refresh(&self) -> Result<(), WorkspaceError> {
        let (seq, previous_id) = {
            let mut state = self.state.lock().await;
            state.refresh_seq += 1;
            (
                state.refresh_seq,
                state.task.as_ref().map(|task| task.task_id.clone()),
            )
        };

        let fetched = match self.fetcher.assigned_task(&self.user.id).await {
            Ok(fetched) => fetched,
            Err(e) => {
                self.notifier.publish(
                    Notice::error("Failed to load assigned task").with_detail(e.to_string()),
                );
                return Err(e.into());
            }
        };

        // Load the draft before re-locking, the store is async.
        let draft = match &fetched {
            Some(task) if previous_id.as_deref() != Some(task.task_id.as_str()) => {
                self.drafts.load(&task.task_id).await
            }
            _ => None,
        };

        let mut state = self.state.lock().await;
        if state.refresh_seq != seq {
            tracing::debug!(
                session_id = %self.session_id,
                "Dropping superseded assigned-task response"
            );
            return Ok(());
        }
        self.apply_fetched(&mut state, fetched, draft);
        Ok(())
    }

    fn apply_fetched(
        &self,
        state: &mut SessionState,
        fetched: Option<AssignedTask>,
        draft: Option<Draft>,
    ) {
        let Some(task) = fetched else {
            if state.task.take().is_some() {
                tracing::info!(session_id = %self.session_id, "Assignment queue is empty");
            }
            state.buffer.clear();
            state.original_text.clear();
            state.trash_requested = false;
            self.autosave.activate(None);
            return;
        };

        let same_task = state
            .task
            .as_ref()
            .is_some_and(|current| current.task_id == task.task_id);
        if same_task {
            // Same assignment refetched; the buffer may hold local edits.
            state.task = Some(task);
            return;
        }

        let transcript = task.task_transcript.clone().unwrap_or_default();
        state.buffer = match draft {
            Some(draft) => draft.text,
            None => transcript.clone(),
        };
        state.original_text = transcript;
        state.trash_requested = false;
        self.autosave.activate(Some(&task.task_id));
        // The engine treats this first notification as the baseline echo.
        self.autosave.edit(&state.buffer);
        tracing::info!(
            session_id = %self.session_id,
            task_id = %task.task_id,
            phase = task.phase.as_str(),
            "Assigned task activated"
        );
        state.task = Some(task);
    }

    // ---- buffer ----

    /// Replace the buffer text and notify the autosave engine.
    ///
    /// Refused while no task is assigned, while the user's role does not
    /// own the task's phase, and while a mutation is in flight.
    pub async fn edit(&self, text: &str) -> Result<(), WorkspaceError> {
        let mut state = self.state.lock().await;
        let task = state.task.as_ref().ok_or(WorkspaceError::NoTask)?;
        if !workflow::can_edit(task.phase, self.user.role) {
            return Err(WorkspaceError::NotEditable);
        }
        if state.busy {
            return Err(WorkspaceError::Busy);
        }
        state.buffer = text.to_string();
        self.autosave.edit(text);
        Ok(())
    }

    /// Empty the buffer.
    pub async fn clear_buffer(&self) -> Result<(), WorkspaceError> {
        self.edit("").await
    }

    /// Reset the buffer to the transcript the task activated with.
    pub async fn restore_original(&self) -> Result<(), WorkspaceError> {
        let original = self.state.lock().await.original_text.clone();
        self.edit(&original).await
    }

    /// Whether the buffer differs from the activation transcript.
    pub async fn has_unsaved_changes(&self) -> bool {
        let state = self.state.lock().await;
        state.task.is_some() && state.buffer != state.original_text
    }

    // ---- snapshots ----

    pub async fn assigned_task(&self) -> Option<AssignedTask> {
        self.state.lock().await.task.clone()
    }

    pub async fn buffer(&self) -> String {
        self.state.lock().await.buffer.clone()
    }

    /// Whether a mutation is in flight (the disabled-surface window).
    pub async fn is_busy(&self) -> bool {
        self.state.lock().await.busy
    }

    /// Whether a trash confirmation is pending.
    pub async fn is_trash_requested(&self) -> bool {
        self.state.lock().await.trash_requested
    }

    /// The action buttons for the assigned task, in display order.
    pub async fn available_actions(&self) -> &'static [WorkflowAction] {
        let state = self.state.lock().await;
        match &state.task {
            Some(task) => workflow::assigned_actions(task.phase, self.user.role),
            None => &[],
        }
    }

    // ---- workflow actions ----

    /// Submit the buffer as the annotation transcript.
    pub async fn submit(&self) -> Result<(), WorkspaceError> {
        let (task_id, transcript) = self.begin_action(WorkflowAction::Submit).await?;
        let outcome = self
            .fetcher
            .submit(&task_id, &self.user.id, &transcript)
            .await;
        self.finish_action(WorkflowAction::Submit, &task_id, outcome)
            .await
    }

    /// Approve the task with the buffer as the stage transcript.
    pub async fn approve(&self) -> Result<(), WorkspaceError> {
        let (task_id, transcript) = self.begin_action(WorkflowAction::Approve).await?;
        let outcome = self
            .fetcher
            .approve(&task_id, &self.user.id, &transcript)
            .await;
        self.finish_action(WorkflowAction::Approve, &task_id, outcome)
            .await
    }

    /// Reject the task back one workflow stage.
    pub async fn reject(&self) -> Result<(), WorkspaceError> {
        let (task_id, transcript) = self.begin_action(WorkflowAction::Reject).await?;
        let outcome = self
            .fetcher
            .reject(&task_id, &self.user.id, &transcript)
            .await;
        self.finish_action(WorkflowAction::Reject, &task_id, outcome)
            .await
    }

    /// Ask for trash confirmation. The remote call happens in
    /// [`confirm_trash`](EditorSession::confirm_trash).
    pub async fn request_trash(&self) -> Result<(), WorkspaceError> {
        let mut state = self.state.lock().await;
        let task = state.task.as_ref().ok_or(WorkspaceError::NoTask)?;
        if state.busy {
            return Err(WorkspaceError::Busy);
        }
        workflow::authorize(
            workflow::state_for_phase(task.phase),
            WorkflowAction::Trash,
            self.user.role,
        )?;
        state.trash_requested = true;
        Ok(())
    }

    /// Dismiss a pending trash confirmation.
    pub async fn cancel_trash(&self) {
        self.state.lock().await.trash_requested = false;
    }

    /// Trash the assigned task after a confirmation.
    pub async fn confirm_trash(&self) -> Result<(), WorkspaceError> {
        let task_id = {
            let mut state = self.state.lock().await;
            if !state.trash_requested {
                return Err(WorkspaceError::NoTrashRequested);
            }
            let task = state.task.as_ref().ok_or(WorkspaceError::NoTask)?;
            if state.busy {
                return Err(WorkspaceError::Busy);
            }
            let task_id = task.task_id.clone();
            state.busy = true;
            task_id
        };

        let outcome = self.fetcher.trash(&task_id, &self.user.username).await;
        self.finish_action(WorkflowAction::Trash, &task_id, outcome)
            .await
    }

    /// Flush any settling draft write and stop the autosave engine.
    pub async fn shutdown(self) {
        tracing::info!(session_id = %self.session_id, "Editor session closed");
        self.autosave.shutdown().await;
    }

    // ---- private helpers ----

    /// Validate and reserve a workflow action: checks assignment, busy
    /// exclusivity, and the transition authority, then flags the session
    /// busy and returns the task id and transcript snapshot to send.
    async fn begin_action(
        &self,
        action: WorkflowAction,
    ) -> Result<(String, String), WorkspaceError> {
        let mut state = self.state.lock().await;
        let task = state.task.as_ref().ok_or(WorkspaceError::NoTask)?;
        if state.busy {
            return Err(WorkspaceError::Busy);
        }
        workflow::authorize(
            workflow::state_for_phase(task.phase),
            action,
            self.user.role,
        )?;
        if action == WorkflowAction::Submit && state.buffer.trim().is_empty() {
            return Err(CoreError::Validation("Transcript cannot be empty".to_string()).into());
        }
        let task_id = task.task_id.clone();
        let transcript = state.buffer.clone();
        state.busy = true;
        Ok((task_id, transcript))
    }

    /// Settle a finished remote action: clear the draft and notify on
    /// success, surface the error on failure, release the busy flag either
    /// way.
    async fn finish_action(
        &self,
        action: WorkflowAction,
        task_id: &str,
        outcome: Result<TaskActionResponse, StoreError>,
    ) -> Result<(), WorkspaceError> {
        match outcome {
            Ok(response) => {
                if !response.success {
                    tracing::warn!(
                        session_id = %self.session_id,
                        task_id = %task_id,
                        message = response.message.as_deref().unwrap_or(""),
                        "Store reported failure inside a success response"
                    );
                }
                self.autosave.clear(task_id).await;
                {
                    let mut state = self.state.lock().await;
                    state.busy = false;
                    state.trash_requested = false;
                }
                tracing::info!(
                    session_id = %self.session_id,
                    task_id = %task_id,
                    action = action.as_str(),
                    "Task action completed"
                );
                self.notifier.publish(Notice::success(success_title(action)));
                self.refresh().await
            }
            Err(e) => {
                self.state.lock().await.busy = false;
                tracing::warn!(
                    session_id = %self.session_id,
                    task_id = %task_id,
                    action = action.as_str(),
                    error = %e,
                    "Task action failed"
                );
                self.notifier
                    .publish(Notice::error(failure_title(action)).with_detail(e.to_string()));
                Err(e.into())
            }
        }
    }
}

fn success_title(action: WorkflowAction) -> &'static str {
    match action {
        WorkflowAction::Submit => "Task submitted",
        WorkflowAction::Approve => "Task approved",
        WorkflowAction::Reject => "Task rejected",
        WorkflowAction::Trash => "Task moved to trash",
        WorkflowAction::Restore => "Task restored",
    }
}

fn failure_title(action: WorkflowAction) -> &'static str {
    match action {
        WorkflowAction::Submit => "Failed to submit task",
        WorkflowAction::Approve => "Failed to approve task",
        WorkflowAction::Reject => "Failed to reject task",
        WorkflowAction::Trash => "Failed to trash task",
        WorkflowAction::Restore => "Failed to restore task",
    }
}
