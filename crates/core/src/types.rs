//! Wire types shared across the console.
//!
//! All ids are opaque strings assigned by the remote task store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Orientation, TaskState, WorkPhase, WORKFLOW_STATES};

/// Opaque identifier assigned by the remote task store.
pub type RemoteId = String;

/// UTC timestamp as serialised by the remote task store.
pub type Timestamp = DateTime<Utc>;

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// Summary of one batch of tasks, as returned by the batch listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: RemoteId,
    pub name: String,
    pub created: Timestamp,
    pub group_id: RemoteId,
    pub group_name: String,
}

/// A batch together with its per-state task counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(flatten)]
    pub batch: Batch,
    pub total_tasks: u32,
    pub pending: u32,
    pub annotated: u32,
    pub reviewed: u32,
    pub finalised: u32,
    pub trashed: u32,
}

impl BatchReport {
    /// The count column for one task state.
    pub fn state_count(&self, state: TaskState) -> u32 {
        match state {
            TaskState::Pending => self.pending,
            TaskState::Annotated => self.annotated,
            TaskState::Reviewed => self.reviewed,
            TaskState::Finalised => self.finalised,
            TaskState::Trashed => self.trashed,
        }
    }

    /// Sum of the four forward workflow state counts.
    pub fn workflow_total(&self) -> u32 {
        WORKFLOW_STATES
            .iter()
            .map(|state| self.state_count(*state))
            .sum()
    }

    /// Whether the per-state counts add up to the reported total.
    pub fn is_consistent(&self) -> bool {
        self.workflow_total() + self.trashed == self.total_tasks
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// One task row in a batch detail listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTask {
    pub task_id: RemoteId,
    pub task_name: String,
    pub task_url: String,
    pub task_transcript: Option<String>,
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Username of whoever last worked the task, when the store knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// The task currently assigned to a workflow user, as returned by the
/// assignment endpoint. The wire field `state` carries the work phase for
/// assigned tasks, not a [`TaskState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedTask {
    pub task_id: RemoteId,
    pub task_name: String,
    pub task_url: String,
    pub task_transcript: Option<String>,
    #[serde(rename = "state")]
    pub phase: WorkPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
