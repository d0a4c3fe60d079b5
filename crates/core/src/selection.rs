//! Task selection and ordered navigation inside a batch listing.

use crate::types::BatchTask;

/// Pick the task to show: the requested id when it exists in the listing,
/// otherwise the first task, otherwise nothing.
pub fn resolve_selection<'a>(
    tasks: &'a [BatchTask],
    requested_id: Option<&str>,
) -> Option<&'a BatchTask> {
    if let Some(id) = requested_id {
        if let Some(task) = tasks.iter().find(|task| task.task_id == id) {
            return Some(task);
        }
    }
    tasks.first()
}

/// Index of `task_id` in the listing.
pub fn selected_index(tasks: &[BatchTask], task_id: &str) -> Option<usize> {
    tasks.iter().position(|task| task.task_id == task_id)
}

/// The index before `current`, or `None` at the start of the listing.
pub fn previous_index(current: usize) -> Option<usize> {
    current.checked_sub(1)
}

/// The index after `current`, or `None` at the end of the listing.
pub fn next_index(current: usize, len: usize) -> Option<usize> {
    if current + 1 < len {
        Some(current + 1)
    } else {
        None
    }
}

/// One-based position label for the selection header, `"- / -"` when
/// nothing is selected.
pub fn position_label(index: Option<usize>, len: usize) -> String {
    match index {
        Some(i) => format!("{} / {}", i + 1, len),
        None => "- / -".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TaskState;

    fn task(id: &str) -> BatchTask {
        BatchTask {
            task_id: id.to_string(),
            task_name: format!("{id}.jpg"),
            task_url: format!("https://images.example.com/{id}.jpg"),
            task_transcript: None,
            state: TaskState::Pending,
            orientation: None,
            username: None,
        }
    }

    #[test]
    fn requested_task_wins_when_present() {
        let tasks = vec![task("t1"), task("t2"), task("t3")];
        let selected = resolve_selection(&tasks, Some("t2")).unwrap();
        assert_eq!(selected.task_id, "t2");
    }

    #[test]
    fn unknown_request_falls_back_to_first() {
        let tasks = vec![task("t1"), task("t2")];
        let selected = resolve_selection(&tasks, Some("gone")).unwrap();
        assert_eq!(selected.task_id, "t1");
    }

    #[test]
    fn no_request_selects_first() {
        let tasks = vec![task("t1"), task("t2")];
        assert_eq!(resolve_selection(&tasks, None).unwrap().task_id, "t1");
    }

    #[test]
    fn empty_listing_selects_nothing() {
        assert!(resolve_selection(&[], Some("t1")).is_none());
        assert!(resolve_selection(&[], None).is_none());
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        assert_eq!(previous_index(0), None);
        assert_eq!(previous_index(2), Some(1));
        assert_eq!(next_index(0, 3), Some(1));
        assert_eq!(next_index(2, 3), None);
        assert_eq!(next_index(0, 1), None);
    }

    #[test]
    fn position_labels() {
        assert_eq!(position_label(Some(2), 10), "3 / 10");
        assert_eq!(position_label(None, 0), "- / -");
    }
}
