//! Repository stats
//!
//! # Overview
//!
//! The LazyCLI website shows the star count and the most active contributors of its GitHub repository.
//! Library fetches repository metadata and the contributor list from the upstream API and merges them into a single `RepoStats` snapshot.
//! Contributors are kept in upstream order and capped at 12.
//! Any upstream failure (unreachable API, non-success status, unexpected body) yields a zeroed snapshot carrying `error` and `message` instead of an error, so callers always get the same shape.

#[cfg(feature = "api")]
pub mod api;

#[cfg(feature = "aggregator")]
pub mod aggregator;

#[cfg(feature = "aggregator")]
pub use aggregator::{RepoStats, StatsAggregator, FAILURE_LABEL, MAX_CONTRIBUTORS};
