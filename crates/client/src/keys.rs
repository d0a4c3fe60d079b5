//! Hierarchical cache keys for task store queries.
//!
//! Keys are ordered segment lists. A key is invalidated by any prefix of
//! itself, so invalidating `batches` drops every batch list, report, and
//! task listing in one sweep while leaving workspace keys alone.

use std::fmt;

use folio_core::TaskState;

/// Cache key for one task store query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Build a key from ordered segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The ordered segments of this key.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` is a segment-wise prefix of this key. Every key
    /// is a prefix of itself.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Key builders for batch-scoped queries.
pub mod batch_keys {
    use super::{QueryKey, TaskState};

    /// Root of every batch-scoped key.
    pub fn all() -> QueryKey {
        QueryKey::new(["batches"])
    }

    /// The batch listing.
    pub fn lists() -> QueryKey {
        QueryKey::new(["batches", "list"])
    }

    /// Root of every batch report key.
    pub fn reports() -> QueryKey {
        QueryKey::new(["batches", "report"])
    }

    /// The report for one batch.
    pub fn report(batch_id: &str) -> QueryKey {
        QueryKey::new(["batches", "report", batch_id])
    }

    /// Root of every task listing, across batches.
    pub fn all_tasks() -> QueryKey {
        QueryKey::new(["batches", "tasks"])
    }

    /// Root of every task listing for one batch, across state filters.
    pub fn tasks_root(batch_id: &str) -> QueryKey {
        QueryKey::new(["batches", "tasks", batch_id])
    }

    /// The task listing for one batch under one state filter. `None`
    /// keys the unfiltered listing.
    pub fn tasks(batch_id: &str, state: Option<TaskState>) -> QueryKey {
        QueryKey::new([
            "batches",
            "tasks",
            batch_id,
            state.map_or("all", |s| s.as_str()),
        ])
    }
}

/// Key builders for the signed-in user's workspace queries.
pub mod workspace_keys {
    use super::QueryKey;

    /// Root of every workspace-scoped key.
    pub fn all() -> QueryKey {
        QueryKey::new(["workspace"])
    }

    /// The task currently assigned to one user.
    pub fn assigned_task(user_id: &str) -> QueryKey {
        QueryKey::new(["workspace", "assigned-task", user_id])
    }
}
