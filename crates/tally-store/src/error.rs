//! Store error types.

use thiserror::Error;

/// Error surfaced by a [`LedgerStore`](crate::LedgerStore) implementation.
///
/// These are infrastructure errors (missing records, guarded updates that
/// lost a race, connectivity) as opposed to the engine's domain errors
/// (unbalanced entries, malformed arguments).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A conditional update observed a state that forbids it — a void
    /// guard that found the journal already voided, or a duplicate insert.
    #[error("conditional update failed: {0}")]
    Conflict(String),

    /// The caller handed the store an inconsistent batch (lines that do
    /// not belong to the journal being written).
    #[error("invalid write batch: {0}")]
    Invalid(String),

    /// The backend cannot be reached or timed out. Surfaced to the caller
    /// as-is; the engine never retries a write that could double-post.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
