//! Session orchestration for the annotation console.
//!
//! Ties the domain rules, the cached task store client, and the draft
//! engine together into the two surfaces users actually drive: the
//! [`EditorSession`] for workflow users working their assigned task, and
//! the [`BatchBrowser`] for admins managing batches. Also carries the
//! console's configuration, notification bus, and UI preferences.

pub mod browser;
pub mod config;
pub mod error;
pub mod notify;
pub mod prefs;
pub mod session;

pub use browser::BatchBrowser;
pub use config::ConsoleConfig;
pub use error::WorkspaceError;
pub use notify::{Notice, NoticeKind, Notifier};
pub use prefs::{PrefsStore, Theme, UiPrefs};
pub use session::{EditorSession, SessionUser};
