//! Batch upload request definition and validation.
//!
//! Uploads arrive as a JSON array of task entries plus batch metadata
//! chosen in the console. Validation returns human-readable errors; task
//! errors are prefixed with the task's zero-based index so a bad row in a
//! large file can be found (`0.url: Invalid URL format`).

use serde::{Deserialize, Serialize};
use validator::ValidateUrl;

use crate::state::Orientation;
use crate::types::RemoteId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_BATCH_NAME_LENGTH: usize = 2;
pub const MAX_BATCH_NAME_LENGTH: usize = 100;

/// Validation stops reporting after this many errors.
pub const MAX_REPORTED_ERRORS: usize = 5;

// ---------------------------------------------------------------------------
// Upload types
// ---------------------------------------------------------------------------

/// One task entry in an uploaded tasks file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUploadTask {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
}

impl BatchUploadTask {
    /// Field errors as `field: message` lines.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name: Task name cannot be empty".to_string());
        }

        if !self.url.validate_url() {
            errors.push("url: Invalid URL format".to_string());
        }

        errors
    }
}

/// A complete batch upload: metadata plus the parsed task entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUploadRequest {
    pub batch_name: String,
    pub group_id: RemoteId,
    pub tasks: Vec<BatchUploadTask>,
}

impl BatchUploadRequest {
    /// Validate the whole upload.
    ///
    /// Returns an empty `Vec` if valid; otherwise a list of human-readable
    /// errors, capped at [`MAX_REPORTED_ERRORS`].
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let name_len = self.batch_name.chars().count();
        if name_len < MIN_BATCH_NAME_LENGTH {
            errors.push(format!(
                "Batch name must be at least {MIN_BATCH_NAME_LENGTH} characters"
            ));
        }
        if name_len > MAX_BATCH_NAME_LENGTH {
            errors.push(format!(
                "Batch name must be less than {MAX_BATCH_NAME_LENGTH} characters"
            ));
        }

        if self.group_id.is_empty() {
            errors.push("Please select a group".to_string());
        }

        if self.tasks.is_empty() {
            errors.push("At least one task is required".to_string());
        }

        for (index, task) in self.tasks.iter().enumerate() {
            for error in task.validate() {
                errors.push(format!("{index}.{error}"));
            }
        }

        errors.truncate(MAX_REPORTED_ERRORS);
        errors
    }
}

// ---------------------------------------------------------------------------
// Tasks file parsing
// ---------------------------------------------------------------------------

/// Parse an uploaded tasks file into task entries.
///
/// The file must carry a `.json` extension and contain a JSON array of
/// task objects. Returns the parsed entries, or the validation errors
/// (capped at [`MAX_REPORTED_ERRORS`]).
pub fn parse_tasks_file(filename: &str, content: &str) -> Result<Vec<BatchUploadTask>, Vec<String>> {
    if !filename.to_lowercase().ends_with(".json") {
        return Err(vec!["File must be a JSON file (.json)".to_string()]);
    }

    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|_| vec!["Invalid JSON format. Please check your file syntax.".to_string()])?;

    let tasks: Vec<BatchUploadTask> =
        serde_json::from_value(value).map_err(|e| vec![format!("Invalid tasks file: {e}")])?;

    if tasks.is_empty() {
        return Err(vec!["At least one task is required".to_string()]);
    }

    let mut errors = Vec::new();
    for (index, task) in tasks.iter().enumerate() {
        for error in task.validate() {
            errors.push(format!("{index}.{error}"));
        }
    }

    if errors.is_empty() {
        Ok(tasks)
    } else {
        errors.truncate(MAX_REPORTED_ERRORS);
        Err(errors)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
