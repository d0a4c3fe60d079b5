//! Domain logic for the folio annotation console.
//!
//! This crate is pure computation over data passed in by the caller; it
//! performs no I/O. It provides:
//!
//! - [`state`] / [`roles`]: task states, work phases, and user roles with
//!   their wire-format string conversions and display configuration.
//! - [`workflow`]: the single transition authority every state change
//!   consults.
//! - [`progress`]: percentage/segment breakdowns of a batch report under
//!   both denominator policies.
//! - [`selection`]: deterministic active-task resolution and clamped list
//!   navigation.
//! - [`upload`]: client-side validation of batch upload payloads.
//! - [`export`]: CSV rendering of batch export data.

pub mod error;
pub mod export;
pub mod progress;
pub mod roles;
pub mod selection;
pub mod state;
pub mod types;
pub mod upload;
pub mod workflow;

pub use error::CoreError;
pub use roles::Role;
pub use state::{Orientation, TaskState, WorkPhase};
pub use types::{AssignedTask, Batch, BatchReport, BatchTask};
pub use workflow::WorkflowAction;
