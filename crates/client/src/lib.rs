//! HTTP client and caching read layer for the remote task store.
//!
//! Provides the [`TaskStore`] trait and its HTTP implementation, the
//! hierarchical query-key scheme, a staleness-aware response cache with
//! request deduplication, and the [`TaskFetcher`] facade that ties cached
//! reads to cache-invalidating mutations.

pub mod api;
pub mod cache;
pub mod error;
pub mod fetcher;
pub mod keys;

pub use api::{HttpTaskStore, TaskActionResponse, TaskStore};
pub use error::StoreError;
pub use fetcher::TaskFetcher;
pub use keys::QueryKey;
