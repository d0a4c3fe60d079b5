//! In-process notification feed backed by a `tokio::sync::broadcast` channel.
//!
//! [`Notifier`] is the central publish/subscribe hub for [`Notice`]s raised by
//! the session and browser layers. It is designed to be shared via
//! `Arc<Notifier>` across the console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// A user-facing notification raised by a console operation.
///
/// Constructed via [`Notice::success`], [`Notice::info`], or
/// [`Notice::error`] and enriched with
/// [`with_detail`](Notice::with_detail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    /// Severity, which drives the presentation of the notice.
    pub kind: NoticeKind,

    /// Short headline, e.g. `"Task submitted"`.
    pub title: String,

    /// Optional longer explanation, e.g. a remote error body.
    pub detail: Option<String>,

    /// When the notice was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    /// Create a new notice with the given severity and headline.
    pub fn new(kind: NoticeKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            detail: None,
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for a [`NoticeKind::Success`] notice.
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title)
    }

    /// Shorthand for a [`NoticeKind::Info`] notice.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title)
    }

    /// Shorthand for a [`NoticeKind::Error`] notice.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title)
    }

    /// Attach a longer explanation to the notice.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out notification feed.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`Notice`].
///
/// # Usage
///
/// ```rust
/// use folio_workspace::notify::{Notice, Notifier};
///
/// let feed = Notifier::default();
/// let mut rx = feed.subscribe();
///
/// feed.publish(Notice::success("Task submitted"));
/// ```
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Notifier {
    /// Create a feed with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed notices are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notice to all current subscribers.
    ///
    /// If there are no active subscribers the notice is silently dropped.
    pub fn publish(&self, notice: Notice) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(notice);
    }

    /// Subscribe to all notices published on this feed.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
