//! Workflow transition rules.
//!
//! Every state change in the console funnels through [`transition_target`].
//! Callers never hand-roll state comparisons; they ask this module whether
//! a (state, action, role) triple is legal and what it produces.
//!
//! The forward path is pending -> annotated -> reviewed -> finalised, one
//! stage per role. Reject demotes a task exactly one stage. Trash removes
//! a non-terminal task from the forward path and is allowed for the role
//! that owns the task's current stage, or an admin. Restore returns a
//! trashed task to pending and is admin-only.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::state::{TaskState, WorkPhase};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ACTION_SUBMIT: &str = "submit";
pub const ACTION_APPROVE: &str = "approve";
pub const ACTION_REJECT: &str = "reject";
pub const ACTION_TRASH: &str = "trash";
pub const ACTION_RESTORE: &str = "restore";

/// All valid workflow action strings.
pub const VALID_ACTIONS: &[&str] = &[
    ACTION_SUBMIT,
    ACTION_APPROVE,
    ACTION_REJECT,
    ACTION_TRASH,
    ACTION_RESTORE,
];

// ---------------------------------------------------------------------------
// WorkflowAction
// ---------------------------------------------------------------------------

/// An action a user can take against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Submit,
    Approve,
    Reject,
    Trash,
    Restore,
}

/// All workflow actions in display order.
pub const ALL_ACTIONS: &[WorkflowAction] = &[
    WorkflowAction::Submit,
    WorkflowAction::Approve,
    WorkflowAction::Reject,
    WorkflowAction::Trash,
    WorkflowAction::Restore,
];

impl WorkflowAction {
    /// Convert from the wire string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ACTION_SUBMIT => Ok(Self::Submit),
            ACTION_APPROVE => Ok(Self::Approve),
            ACTION_REJECT => Ok(Self::Reject),
            ACTION_TRASH => Ok(Self::Trash),
            ACTION_RESTORE => Ok(Self::Restore),
            _ => Err(format!(
                "Invalid workflow action '{s}'. Must be one of: {}",
                VALID_ACTIONS.join(", ")
            )),
        }
    }

    /// Convert to the wire string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => ACTION_SUBMIT,
            Self::Approve => ACTION_APPROVE,
            Self::Reject => ACTION_REJECT,
            Self::Trash => ACTION_TRASH,
            Self::Restore => ACTION_RESTORE,
        }
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// The state a task moves to when `role` performs `action` on a task in
/// `from`, or `None` when the triple is not allowed.
pub fn transition_target(from: TaskState, action: WorkflowAction, role: Role) -> Option<TaskState> {
    use Role::*;
    use TaskState::*;
    use WorkflowAction::*;

    match (from, action, role) {
        (Pending, Submit, Annotator) => Some(Annotated),
        (Annotated, Approve, Reviewer) => Some(Reviewed),
        (Reviewed, Approve, FinalReviewer) => Some(Finalised),

        // Reject demotes exactly one stage.
        (Annotated, Reject, Reviewer) => Some(Pending),
        (Reviewed, Reject, FinalReviewer) => Some(Annotated),

        // Trashing is for the stage owner or an admin. Finalised tasks are
        // never trashable.
        (Pending, Trash, Annotator | Admin) => Some(Trashed),
        (Annotated, Trash, Reviewer | Admin) => Some(Trashed),
        (Reviewed, Trash, FinalReviewer | Admin) => Some(Trashed),

        (Trashed, Restore, Admin) => Some(Pending),

        _ => None,
    }
}

/// Authorize `role` performing `action` on a task in `from`, returning
/// the resulting state.
pub fn authorize(from: TaskState, action: WorkflowAction, role: Role) -> Result<TaskState, CoreError> {
    transition_target(from, action, role).ok_or_else(|| {
        CoreError::Forbidden(format!(
            "{} may not {} a {} task",
            role.label(),
            action.as_str(),
            from.as_str()
        ))
    })
}

/// Whether some action by `role` moves a task from `from` to `to`.
pub fn can_transition(from: TaskState, to: TaskState, role: Role) -> bool {
    ALL_ACTIONS
        .iter()
        .any(|action| transition_target(from, *action, role) == Some(to))
}

/// Every action `role` may take against a task in `state`.
pub fn allowed_actions(state: TaskState, role: Role) -> Vec<WorkflowAction> {
    ALL_ACTIONS
        .iter()
        .copied()
        .filter(|action| transition_target(state, *action, role).is_some())
        .collect()
}

// ---------------------------------------------------------------------------
// Assignment queues
// ---------------------------------------------------------------------------

/// The work phase whose queue `role` draws from. Admins do not draw
/// assigned tasks.
pub fn phase_for_role(role: Role) -> Option<WorkPhase> {
    match role {
        Role::Admin => None,
        Role::Annotator => Some(WorkPhase::Annotating),
        Role::Reviewer => Some(WorkPhase::Reviewing),
        Role::FinalReviewer => Some(WorkPhase::Finalising),
    }
}

/// The workflow state of a task sitting in the `phase` queue.
pub fn state_for_phase(phase: WorkPhase) -> TaskState {
    match phase {
        WorkPhase::Annotating => TaskState::Pending,
        WorkPhase::Reviewing => TaskState::Annotated,
        WorkPhase::Finalising => TaskState::Reviewed,
    }
}

/// Whether `role` may edit the transcript of a task assigned in `phase`.
pub fn can_edit(phase: WorkPhase, role: Role) -> bool {
    phase_for_role(role) == Some(phase)
}

/// The action buttons shown for an assigned task in `phase`, in display
/// order. Empty when `role` does not own the phase.
pub fn assigned_actions(phase: WorkPhase, role: Role) -> &'static [WorkflowAction] {
    if !can_edit(phase, role) {
        return &[];
    }
    match phase {
        WorkPhase::Annotating => &[WorkflowAction::Submit, WorkflowAction::Trash],
        WorkPhase::Reviewing | WorkPhase::Finalising => {
            &[WorkflowAction::Approve, WorkflowAction::Reject]
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::state::ALL_TASK_STATES;

    const ALL_ROLES: &[Role] = &[
        Role::Admin,
        Role::Annotator,
        Role::Reviewer,
        Role::FinalReviewer,
    ];

    // -- Forward path ---------------------------------------------------------

    #[test]
    fn forward_path_advances_one_stage_per_role() {
        assert_eq!(
            transition_target(TaskState::Pending, WorkflowAction::Submit, Role::Annotator),
            Some(TaskState::Annotated)
        );
        assert_eq!(
            transition_target(TaskState::Annotated, WorkflowAction::Approve, Role::Reviewer),
            Some(TaskState::Reviewed)
        );
        assert_eq!(
            transition_target(
                TaskState::Reviewed,
                WorkflowAction::Approve,
                Role::FinalReviewer
            ),
            Some(TaskState::Finalised)
        );
    }

    #[test]
    fn forward_actions_are_role_gated() {
        // Wrong role never advances a task, not even an admin.
        assert_eq!(
            transition_target(TaskState::Pending, WorkflowAction::Submit, Role::Reviewer),
            None
        );
        assert_eq!(
            transition_target(TaskState::Pending, WorkflowAction::Submit, Role::Admin),
            None
        );
        assert_eq!(
            transition_target(
                TaskState::Annotated,
                WorkflowAction::Approve,
                Role::FinalReviewer
            ),
            None
        );
        assert_eq!(
            transition_target(TaskState::Reviewed, WorkflowAction::Approve, Role::Reviewer),
            None
        );
    }

    #[test]
    fn no_stage_skipping() {
        for role in ALL_ROLES {
            assert!(!can_transition(TaskState::Pending, TaskState::Reviewed, *role));
            assert!(!can_transition(TaskState::Pending, TaskState::Finalised, *role));
            assert!(!can_transition(TaskState::Annotated, TaskState::Finalised, *role));
        }
    }

    // -- Reject ---------------------------------------------------------------

    #[test]
    fn reject_demotes_exactly_one_stage() {
        assert_eq!(
            transition_target(TaskState::Annotated, WorkflowAction::Reject, Role::Reviewer),
            Some(TaskState::Pending)
        );
        assert_eq!(
            transition_target(
                TaskState::Reviewed,
                WorkflowAction::Reject,
                Role::FinalReviewer
            ),
            Some(TaskState::Annotated)
        );
    }

    #[test]
    fn reject_unavailable_at_the_edges() {
        for role in ALL_ROLES {
            assert_eq!(
                transition_target(TaskState::Pending, WorkflowAction::Reject, *role),
                None
            );
            assert_eq!(
                transition_target(TaskState::Finalised, WorkflowAction::Reject, *role),
                None
            );
        }
    }

    // -- Trash and restore ----------------------------------------------------

    #[test]
    fn trash_allowed_for_stage_owner_and_admin() {
        assert_eq!(
            transition_target(TaskState::Pending, WorkflowAction::Trash, Role::Annotator),
            Some(TaskState::Trashed)
        );
        assert_eq!(
            transition_target(TaskState::Annotated, WorkflowAction::Trash, Role::Reviewer),
            Some(TaskState::Trashed)
        );
        assert_eq!(
            transition_target(
                TaskState::Reviewed,
                WorkflowAction::Trash,
                Role::FinalReviewer
            ),
            Some(TaskState::Trashed)
        );
        for state in &[TaskState::Pending, TaskState::Annotated, TaskState::Reviewed] {
            assert_eq!(
                transition_target(*state, WorkflowAction::Trash, Role::Admin),
                Some(TaskState::Trashed)
            );
        }
    }

    #[test]
    fn trash_denied_outside_the_owned_stage() {
        assert_eq!(
            transition_target(TaskState::Pending, WorkflowAction::Trash, Role::Reviewer),
            None
        );
        assert_eq!(
            transition_target(TaskState::Annotated, WorkflowAction::Trash, Role::Annotator),
            None
        );
    }

    #[test]
    fn terminal_states_cannot_be_trashed() {
        for role in ALL_ROLES {
            assert_eq!(
                transition_target(TaskState::Finalised, WorkflowAction::Trash, *role),
                None
            );
            assert_eq!(
                transition_target(TaskState::Trashed, WorkflowAction::Trash, *role),
                None
            );
        }
    }

    #[test]
    fn restore_is_admin_only_and_returns_to_pending() {
        assert_eq!(
            transition_target(TaskState::Trashed, WorkflowAction::Restore, Role::Admin),
            Some(TaskState::Pending)
        );
        for role in &[Role::Annotator, Role::Reviewer, Role::FinalReviewer] {
            assert_eq!(
                transition_target(TaskState::Trashed, WorkflowAction::Restore, *role),
                None
            );
        }
    }

    #[test]
    fn restore_only_applies_to_trashed_tasks() {
        for state in &[
            TaskState::Pending,
            TaskState::Annotated,
            TaskState::Reviewed,
            TaskState::Finalised,
        ] {
            assert_eq!(
                transition_target(*state, WorkflowAction::Restore, Role::Admin),
                None
            );
        }
    }

    #[test]
    fn finalised_is_a_dead_end() {
        for role in ALL_ROLES {
            for action in ALL_ACTIONS {
                assert_eq!(transition_target(TaskState::Finalised, *action, *role), None);
            }
        }
    }

    // -- Derived queries ------------------------------------------------------

    #[test]
    fn authorize_names_the_refused_triple() {
        assert_eq!(
            authorize(TaskState::Trashed, WorkflowAction::Restore, Role::Admin).unwrap(),
            TaskState::Pending
        );
        let err = authorize(TaskState::Trashed, WorkflowAction::Restore, Role::Reviewer)
            .unwrap_err();
        assert_matches!(err, CoreError::Forbidden(_));
        assert!(err
            .to_string()
            .contains("Reviewer may not restore a trashed task"));
    }

    #[test]
    fn allowed_actions_for_reviewer_on_annotated() {
        let actions = allowed_actions(TaskState::Annotated, Role::Reviewer);
        assert_eq!(
            actions,
            vec![
                WorkflowAction::Approve,
                WorkflowAction::Reject,
                WorkflowAction::Trash
            ]
        );
    }

    #[test]
    fn admin_has_no_forward_actions() {
        for state in ALL_TASK_STATES {
            let actions = allowed_actions(*state, Role::Admin);
            assert!(!actions.contains(&WorkflowAction::Submit));
            assert!(!actions.contains(&WorkflowAction::Approve));
            assert!(!actions.contains(&WorkflowAction::Reject));
        }
    }

    // -- Assignment queues ----------------------------------------------------

    #[test]
    fn each_workflow_role_owns_one_phase() {
        assert_eq!(phase_for_role(Role::Annotator), Some(WorkPhase::Annotating));
        assert_eq!(phase_for_role(Role::Reviewer), Some(WorkPhase::Reviewing));
        assert_eq!(
            phase_for_role(Role::FinalReviewer),
            Some(WorkPhase::Finalising)
        );
        assert_eq!(phase_for_role(Role::Admin), None);
    }

    #[test]
    fn phase_queues_hold_the_expected_states() {
        assert_eq!(state_for_phase(WorkPhase::Annotating), TaskState::Pending);
        assert_eq!(state_for_phase(WorkPhase::Reviewing), TaskState::Annotated);
        assert_eq!(state_for_phase(WorkPhase::Finalising), TaskState::Reviewed);

        // Every owned queue lets its owner act on the state it holds.
        for role in &[Role::Annotator, Role::Reviewer, Role::FinalReviewer] {
            let phase = phase_for_role(*role).unwrap();
            let state = state_for_phase(phase);
            let first = assigned_actions(phase, *role)[0];
            assert!(authorize(state, first, *role).is_ok());
        }
    }

    #[test]
    fn editing_requires_owning_the_phase() {
        assert!(can_edit(WorkPhase::Annotating, Role::Annotator));
        assert!(can_edit(WorkPhase::Reviewing, Role::Reviewer));
        assert!(can_edit(WorkPhase::Finalising, Role::FinalReviewer));
        assert!(!can_edit(WorkPhase::Annotating, Role::Reviewer));
        assert!(!can_edit(WorkPhase::Reviewing, Role::Admin));
    }

    #[test]
    fn assigned_actions_per_phase() {
        assert_eq!(
            assigned_actions(WorkPhase::Annotating, Role::Annotator),
            &[WorkflowAction::Submit, WorkflowAction::Trash]
        );
        assert_eq!(
            assigned_actions(WorkPhase::Reviewing, Role::Reviewer),
            &[WorkflowAction::Approve, WorkflowAction::Reject]
        );
        assert_eq!(
            assigned_actions(WorkPhase::Finalising, Role::FinalReviewer),
            &[WorkflowAction::Approve, WorkflowAction::Reject]
        );
        assert!(assigned_actions(WorkPhase::Annotating, Role::Admin).is_empty());
        assert!(assigned_actions(WorkPhase::Finalising, Role::Reviewer).is_empty());
    }
}
