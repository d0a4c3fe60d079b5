//! Local transcript draft persistence.
//!
//! Keeps unsent transcript edits on the local machine so a crash, a
//! refresh, or an accidental navigation does not lose typed work. Provides
//! the [`DraftStore`] backends and the debounced [`DraftAutosave`] engine
//! that decides when a buffer snapshot is worth writing.

pub mod autosave;
pub mod store;

pub use autosave::{DraftAutosave, DEFAULT_AUTOSAVE_DELAY};
pub use store::{Draft, DraftStore, FsDraftStore, MemoryDraftStore};
