//! Batch export rows and CSV rendering.
//!
//! The export endpoint returns one row per task with the full audit trail
//! of the workflow: who touched the task at each stage, the transcript each
//! stage produced, and the character-level edit counts between stages. CSV
//! rendering quotes every field so transcripts can carry commas, quotes,
//! and line breaks.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::state::TaskState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Column headers, in the exact column order of [`csv_row`].
pub const CSV_HEADERS: &[&str] = &[
    "File Number",
    "Image URL",
    "Initial Transcription",
    "Status",
    "Annotator",
    "Annotation Transcript",
    "Annotator Char Count",
    "Annotation Rejection Count",
    "Reviewer",
    "Review Transcript",
    "Reviewer Added Char",
    "Reviewer Deleted Char",
    "Review Rejection Count",
    "Final Reviewer",
    "Final Transcript",
    "Final Reviewer Added Char",
    "Final Reviewer Deleted Char",
    "Trashed By",
];

/// Filename used when sanitizing leaves nothing of the batch name.
pub const FALLBACK_EXPORT_STEM: &str = "batch-export";

/// Characters that are unsafe in a download filename.
static UNSAFE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\?%*:|"<>]"#).expect("valid regex"));

// ---------------------------------------------------------------------------
// Export types
// ---------------------------------------------------------------------------

/// One exported task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchExportTask {
    pub file_number: String,
    pub image_url: String,
    pub initial_transcription: Option<String>,
    pub status: TaskState,
    pub annotator_username: Option<String>,
    pub annotation_transcript: Option<String>,
    pub annotator_char_count: Option<i64>,
    pub annotation_rejection_count: Option<i64>,
    pub reviewer_username: Option<String>,
    pub review_transcript: Option<String>,
    pub reviewer_added_char: Option<i64>,
    pub reviewer_deleted_char: Option<i64>,
    pub review_rejection_count: Option<i64>,
    pub final_reviewer_username: Option<String>,
    pub final_transcript: Option<String>,
    pub final_reviewer_added_char: Option<i64>,
    pub final_reviewer_deleted_char: Option<i64>,
    pub trashed_by: Option<String>,
}

/// The export payload for one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchExportResponse {
    pub batch_name: String,
    pub tasks: Vec<BatchExportTask>,
}

// ---------------------------------------------------------------------------
// CSV rendering
// ---------------------------------------------------------------------------

/// Quote one CSV field. Every field is quoted; embedded quotes double.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn optional_text(value: &Option<String>) -> String {
    csv_field(value.as_deref().unwrap_or(""))
}

fn optional_count(value: Option<i64>) -> String {
    match value {
        Some(n) => csv_field(&n.to_string()),
        None => csv_field(""),
    }
}

/// Render one task as a CSV line, columns ordered as [`CSV_HEADERS`].
pub fn csv_row(task: &BatchExportTask) -> String {
    [
        csv_field(&task.file_number),
        csv_field(&task.image_url),
        optional_text(&task.initial_transcription),
        csv_field(task.status.as_str()),
        optional_text(&task.annotator_username),
        optional_text(&task.annotation_transcript),
        optional_count(task.annotator_char_count),
        optional_count(task.annotation_rejection_count),
        optional_text(&task.reviewer_username),
        optional_text(&task.review_transcript),
        optional_count(task.reviewer_added_char),
        optional_count(task.reviewer_deleted_char),
        optional_count(task.review_rejection_count),
        optional_text(&task.final_reviewer_username),
        optional_text(&task.final_transcript),
        optional_count(task.final_reviewer_added_char),
        optional_count(task.final_reviewer_deleted_char),
        optional_text(&task.trashed_by),
    ]
    .join(",")
}

/// Render the full CSV document: header line plus one line per task,
/// newline-separated with no trailing newline.
pub fn csv_document(tasks: &[BatchExportTask]) -> String {
    let header = CSV_HEADERS
        .iter()
        .map(|h| csv_field(h))
        .collect::<Vec<_>>()
        .join(",");
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(header);
    lines.extend(tasks.iter().map(csv_row));
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Filenames
// ---------------------------------------------------------------------------

/// Strip filesystem-unsafe characters from a batch name. Falls back to
/// [`FALLBACK_EXPORT_STEM`] when nothing printable remains.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = UNSAFE_FILENAME_RE.replace_all(name, "-");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        FALLBACK_EXPORT_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Download filename for a batch export.
pub fn export_filename(batch_name: &str) -> String {
    format!("{}.csv", sanitize_filename(batch_name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn task_row() -> BatchExportTask {
        BatchExportTask {
            file_number: "0001".to_string(),
            image_url: "https://images.example.com/page-001.jpg".to_string(),
            initial_transcription: Some("initial".to_string()),
            status: TaskState::Finalised,
            annotator_username: Some("ann".to_string()),
            annotation_transcript: Some("annotated text".to_string()),
            annotator_char_count: Some(14),
            annotation_rejection_count: Some(0),
            reviewer_username: Some("rev".to_string()),
            review_transcript: Some("reviewed text".to_string()),
            reviewer_added_char: Some(3),
            reviewer_deleted_char: Some(4),
            review_rejection_count: Some(1),
            final_reviewer_username: Some("fin".to_string()),
            final_transcript: Some("final text".to_string()),
            final_reviewer_added_char: Some(0),
            final_reviewer_deleted_char: Some(3),
            trashed_by: None,
        }
    }

    // -- Field quoting --------------------------------------------------------

    #[test]
    fn every_field_is_quoted() {
        assert_eq!(csv_field("plain"), "\"plain\"");
        assert_eq!(csv_field(""), "\"\"");
    }

    #[test]
    fn embedded_quotes_double() {
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn commas_and_newlines_stay_inside_the_field() {
        let mut task = task_row();
        task.annotation_transcript = Some("line one,\nline two".to_string());
        let row = csv_row(&task);
        assert!(row.contains("\"line one,\nline two\""));
    }

    // -- Rows and documents ---------------------------------------------------

    #[test]
    fn row_has_one_column_per_header() {
        // Quoting every field makes the comma count reliable.
        let task = task_row();
        let row = csv_row(&task);
        assert_eq!(row.split("\",\"").count(), CSV_HEADERS.len());
    }

    #[test]
    fn null_columns_render_empty() {
        let mut task = task_row();
        task.trashed_by = None;
        task.annotator_char_count = None;
        let row = csv_row(&task);
        assert!(row.ends_with(",\"\""));
    }

    #[test]
    fn status_uses_wire_strings() {
        let row = csv_row(&task_row());
        assert!(row.contains("\"finalised\""));
    }

    #[test]
    fn document_layout() {
        let doc = csv_document(&[task_row(), task_row()]);
        let lines: Vec<&str> = doc.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"File Number\",\"Image URL\""));
        assert!(lines[0].ends_with("\"Trashed By\""));
        assert!(!doc.ends_with('\n'));
    }

    // -- Filenames ------------------------------------------------------------

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("vol 12: part/2"), "vol 12- part-2");
        assert_eq!(sanitize_filename("a\\b?c%d*e|f\"g<h>i"), "a-b-c-d-e-f-g-h-i");
    }

    #[test]
    fn sanitize_falls_back_when_nothing_remains() {
        assert_eq!(sanitize_filename("   "), "batch-export");
        assert_eq!(sanitize_filename(""), "batch-export");
    }

    #[test]
    fn export_filename_appends_csv() {
        assert_eq!(export_filename("Volume 12"), "Volume 12.csv");
        assert_eq!(export_filename(""), "batch-export.csv");
    }
}
