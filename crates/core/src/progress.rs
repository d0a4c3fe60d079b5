//! Progress bar segment computation for batch reports.
//!
//! Two read models over the same counts:
//!
//! * [`combined_segments`] renders every state, trashed included, against
//!   the full task total in one bar.
//! * [`workflow_segments`] and [`trashed_segment`] split the view: the
//!   workflow bar excludes trashed tasks from its denominator so the four
//!   forward states always sum to 100 percent of the live work, and the
//!   trashed strip reports attrition against the full total.

use serde::Serialize;

use crate::state::{TaskState, WORKFLOW_STATES};
use crate::types::BatchReport;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Segments at or below this percentage render without an inline label.
pub const DEFAULT_LABEL_THRESHOLD: u8 = 2;

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// One colored span of a batch progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSegment {
    pub status: TaskState,
    pub count: u32,
    pub percentage: u8,
    pub label: &'static str,
    pub bar_color: &'static str,
    pub text_color: &'static str,
    pub hatched: bool,
}

impl ProgressSegment {
    fn new(status: TaskState, count: u32, denominator: u32) -> Self {
        let config = status.config();
        Self {
            status,
            count,
            percentage: percentage(count, denominator),
            label: config.label,
            bar_color: config.bar_color,
            text_color: config.text_color,
            hatched: config.hatched,
        }
    }
}

/// Integer percentage of `count` over `total`, rounded half up. Zero when
/// `total` is zero.
pub fn percentage(count: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u8
}

/// Whether a segment at `pct` is wide enough to carry an inline label.
pub fn show_label(pct: u8, threshold: u8) -> bool {
    pct > threshold
}

/// Segments for the single-bar view: every state with a non-zero count, in
/// canonical order with trashed last, percentages over the full task total.
/// Empty when the batch has no tasks.
pub fn combined_segments(report: &BatchReport) -> Vec<ProgressSegment> {
    let total = report.total_tasks;
    if total == 0 {
        return Vec::new();
    }
    let mut segments: Vec<ProgressSegment> = WORKFLOW_STATES
        .iter()
        .map(|state| (*state, report.state_count(*state)))
        .chain([(TaskState::Trashed, report.trashed)])
        .filter(|(_, count)| *count > 0)
        .map(|(state, count)| ProgressSegment::new(state, count, total))
        .collect();
    segments.sort_by_key(|segment| segment.status.config().order);
    segments
}

/// Segments for the workflow bar of the split view: the four forward
/// states with non-zero counts, percentages over the non-trashed total.
/// Empty when every task is trashed or the batch has no tasks.
pub fn workflow_segments(report: &BatchReport) -> Vec<ProgressSegment> {
    let denominator = report.total_tasks.saturating_sub(report.trashed);
    if denominator == 0 {
        return Vec::new();
    }
    WORKFLOW_STATES
        .iter()
        .map(|state| (*state, report.state_count(*state)))
        .filter(|(_, count)| *count > 0)
        .map(|(state, count)| ProgressSegment::new(state, count, denominator))
        .collect()
}

/// The trashed strip of the split view, measured against the full task
/// total. `None` when nothing is trashed.
pub fn trashed_segment(report: &BatchReport) -> Option<ProgressSegment> {
    if report.trashed == 0 || report.total_tasks == 0 {
        return None;
    }
    Some(ProgressSegment::new(
        TaskState::Trashed,
        report.trashed,
        report.total_tasks,
    ))
}

/// Share of the live (non-trashed) work that has been finalised. Zero when
/// every task is trashed or the batch has no tasks.
pub fn finalized_percentage(report: &BatchReport) -> u8 {
    percentage(
        report.finalised,
        report.total_tasks.saturating_sub(report.trashed),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Batch;

    fn report(
        total: u32,
        pending: u32,
        annotated: u32,
        reviewed: u32,
        finalised: u32,
        trashed: u32,
    ) -> BatchReport {
        BatchReport {
            batch: Batch {
                id: "b1".to_string(),
                name: "Volume 12".to_string(),
                created: "2026-03-01T09:00:00Z".parse().unwrap(),
                group_id: "g1".to_string(),
                group_name: "Scriptorium".to_string(),
            },
            total_tasks: total,
            pending,
            annotated,
            reviewed,
            finalised,
            trashed,
        }
    }

    // -- Percentage -----------------------------------------------------------

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
    }

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn label_threshold() {
        assert!(!show_label(0, DEFAULT_LABEL_THRESHOLD));
        assert!(!show_label(2, DEFAULT_LABEL_THRESHOLD));
        assert!(show_label(3, DEFAULT_LABEL_THRESHOLD));
    }

    // -- Combined view --------------------------------------------------------

    #[test]
    fn combined_includes_trashed_against_full_total() {
        let segments = combined_segments(&report(10, 2, 3, 1, 3, 1));
        let summary: Vec<(TaskState, u32, u8)> = segments
            .iter()
            .map(|s| (s.status, s.count, s.percentage))
            .collect();
        assert_eq!(
            summary,
            vec![
                (TaskState::Pending, 2, 20),
                (TaskState::Annotated, 3, 30),
                (TaskState::Reviewed, 1, 10),
                (TaskState::Finalised, 3, 30),
                (TaskState::Trashed, 1, 10),
            ]
        );
    }

    #[test]
    fn combined_skips_zero_count_states() {
        let segments = combined_segments(&report(5, 5, 0, 0, 0, 0));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].status, TaskState::Pending);
        assert_eq!(segments[0].percentage, 100);
    }

    #[test]
    fn combined_counts_cover_the_total() {
        let segments = combined_segments(&report(10, 2, 3, 1, 3, 1));
        let counted: u32 = segments.iter().map(|s| s.count).sum();
        assert_eq!(counted, 10);
    }

    #[test]
    fn combined_empty_batch_has_no_segments() {
        assert!(combined_segments(&report(0, 0, 0, 0, 0, 0)).is_empty());
    }

    #[test]
    fn only_the_trashed_segment_is_hatched() {
        let segments = combined_segments(&report(10, 2, 3, 1, 3, 1));
        for segment in &segments {
            assert_eq!(segment.hatched, segment.status == TaskState::Trashed);
        }
    }

    // -- Split view -----------------------------------------------------------

    #[test]
    fn workflow_bar_excludes_trashed_from_denominator() {
        let segments = workflow_segments(&report(10, 2, 3, 1, 3, 1));
        let summary: Vec<(TaskState, u8)> =
            segments.iter().map(|s| (s.status, s.percentage)).collect();
        assert_eq!(
            summary,
            vec![
                (TaskState::Pending, 22),
                (TaskState::Annotated, 33),
                (TaskState::Reviewed, 11),
                (TaskState::Finalised, 33),
            ]
        );
    }

    #[test]
    fn workflow_bar_empty_when_everything_is_trashed() {
        assert!(workflow_segments(&report(4, 0, 0, 0, 0, 4)).is_empty());
        assert!(workflow_segments(&report(0, 0, 0, 0, 0, 0)).is_empty());
    }

    #[test]
    fn trashed_strip_uses_full_total() {
        let segment = trashed_segment(&report(10, 2, 3, 1, 3, 1)).unwrap();
        assert_eq!(segment.count, 1);
        assert_eq!(segment.percentage, 10);
        assert!(segment.hatched);
    }

    #[test]
    fn trashed_strip_absent_without_trashed_tasks() {
        assert!(trashed_segment(&report(10, 4, 3, 1, 2, 0)).is_none());
        assert!(trashed_segment(&report(0, 0, 0, 0, 0, 0)).is_none());
    }

    #[test]
    fn finalized_percentage_over_live_tasks() {
        assert_eq!(finalized_percentage(&report(10, 2, 3, 1, 3, 1)), 33);
        assert_eq!(finalized_percentage(&report(4, 0, 0, 0, 0, 4)), 0);
        assert_eq!(finalized_percentage(&report(0, 0, 0, 0, 0, 0)), 0);
    }
}
