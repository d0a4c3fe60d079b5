//! Task workflow states, queue work phases, and image orientation.
//!
//! The string constants must match the values the remote task store
//! serialises. `finalised` keeps its British spelling because that is the
//! wire format.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Task has not been annotated yet.
pub const STATE_PENDING: &str = "pending";
/// An annotator has submitted a transcript.
pub const STATE_ANNOTATED: &str = "annotated";
/// A reviewer has approved the annotation.
pub const STATE_REVIEWED: &str = "reviewed";
/// A final reviewer has signed the task off.
pub const STATE_FINALISED: &str = "finalised";
/// Task was removed from the forward workflow.
pub const STATE_TRASHED: &str = "trashed";

/// All valid task state strings.
pub const VALID_TASK_STATES: &[&str] = &[
    STATE_PENDING,
    STATE_ANNOTATED,
    STATE_REVIEWED,
    STATE_FINALISED,
    STATE_TRASHED,
];

/// Work phase strings carried by an assigned task while it sits in a
/// role's queue.
pub const PHASE_ANNOTATING: &str = "annotating";
pub const PHASE_REVIEWING: &str = "reviewing";
pub const PHASE_FINALISING: &str = "finalising";

/// All valid work phase strings.
pub const VALID_WORK_PHASES: &[&str] = &[PHASE_ANNOTATING, PHASE_REVIEWING, PHASE_FINALISING];

/// All valid image orientation strings.
pub const VALID_ORIENTATIONS: &[&str] = &["landscape", "portrait"];

// ---------------------------------------------------------------------------
// TaskState
// ---------------------------------------------------------------------------

/// Lifecycle state of a task inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Annotated,
    Reviewed,
    Finalised,
    Trashed,
}

/// Canonical display order: the four forward states, then trashed last.
pub const ALL_TASK_STATES: &[TaskState] = &[
    TaskState::Pending,
    TaskState::Annotated,
    TaskState::Reviewed,
    TaskState::Finalised,
    TaskState::Trashed,
];

/// The forward workflow states (everything except trashed).
pub const WORKFLOW_STATES: &[TaskState] = &[
    TaskState::Pending,
    TaskState::Annotated,
    TaskState::Reviewed,
    TaskState::Finalised,
];

impl TaskState {
    /// Convert from the wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATE_PENDING => Ok(Self::Pending),
            STATE_ANNOTATED => Ok(Self::Annotated),
            STATE_REVIEWED => Ok(Self::Reviewed),
            STATE_FINALISED => Ok(Self::Finalised),
            STATE_TRASHED => Ok(Self::Trashed),
            _ => Err(format!(
                "Invalid task state '{s}'. Must be one of: {}",
                VALID_TASK_STATES.join(", ")
            )),
        }
    }

    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATE_PENDING,
            Self::Annotated => STATE_ANNOTATED,
            Self::Reviewed => STATE_REVIEWED,
            Self::Finalised => STATE_FINALISED,
            Self::Trashed => STATE_TRASHED,
        }
    }

    /// Whether the state has no forward workflow progression.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalised | Self::Trashed)
    }

    /// Display configuration for this state.
    pub fn config(&self) -> StateConfig {
        match self {
            Self::Pending => StateConfig {
                label: "Pending",
                badge_color: "bg-slate-100 text-slate-700",
                bar_color: "bg-slate-200",
                text_color: "text-slate-700",
                order: 0,
                hatched: false,
            },
            Self::Annotated => StateConfig {
                label: "Annotated",
                badge_color: "bg-blue-100 text-blue-700",
                bar_color: "bg-indigo-500",
                text_color: "text-white",
                order: 1,
                hatched: false,
            },
            Self::Reviewed => StateConfig {
                label: "Reviewed",
                badge_color: "bg-amber-100 text-amber-700",
                bar_color: "bg-cyan-500",
                text_color: "text-white",
                order: 2,
                hatched: false,
            },
            Self::Finalised => StateConfig {
                label: "Finalised",
                badge_color: "bg-emerald-100 text-emerald-700",
                bar_color: "bg-emerald-500",
                text_color: "text-white",
                order: 3,
                hatched: false,
            },
            Self::Trashed => StateConfig {
                label: "Trashed",
                badge_color: "bg-red-100 text-red-700",
                bar_color: "bg-rose-500",
                text_color: "text-white",
                order: 4,
                hatched: true,
            },
        }
    }
}

/// Display configuration for one task state: legend label, color tokens,
/// canonical ordering, and the hatch marker for trashed segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateConfig {
    pub label: &'static str,
    pub badge_color: &'static str,
    pub bar_color: &'static str,
    pub text_color: &'static str,
    pub order: u8,
    pub hatched: bool,
}

// ---------------------------------------------------------------------------
// WorkPhase
// ---------------------------------------------------------------------------

/// The phase label the remote store puts on a task while it is queued for
/// a particular role. Distinct from [`TaskState`]: a phase describes who
/// is working the task, a state describes where it is in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPhase {
    Annotating,
    Reviewing,
    Finalising,
}

impl WorkPhase {
    /// Convert from the wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            PHASE_ANNOTATING => Ok(Self::Annotating),
            PHASE_REVIEWING => Ok(Self::Reviewing),
            PHASE_FINALISING => Ok(Self::Finalising),
            _ => Err(format!(
                "Invalid work phase '{s}'. Must be one of: {}",
                VALID_WORK_PHASES.join(", ")
            )),
        }
    }

    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annotating => PHASE_ANNOTATING,
            Self::Reviewing => PHASE_REVIEWING,
            Self::Finalising => PHASE_FINALISING,
        }
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Page orientation of a task image, when the store knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Convert from the wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            _ => Err(format!(
                "Invalid orientation '{s}'. Must be one of: {}",
                VALID_ORIENTATIONS.join(", ")
            )),
        }
    }

    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
