//! Engine error types.

use tally_core::{AmountError, JournalId};
use tally_store::StoreError;
use thiserror::Error;

/// Error returned by the engine's caller-facing operations.
///
/// Every variant maps to a stable machine-readable code via
/// [`code`](Self::code); the `Display` form carries the human-readable
/// message. No operation partially mutates visible state on failure —
/// validation happens before any write.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A commit was attempted whose lines do not sum to zero. Nothing was
    /// persisted; the caller must rebuild the entry with corrected amounts.
    #[error("invalid journal: {0}")]
    InvalidJournal(String),

    /// Malformed arguments: a negative line amount, a bad account path, a
    /// missing debit or credit side, or an out-of-range page request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The targeted journal does not exist in this book.
    #[error("journal {0} not found")]
    DocumentNotFound(JournalId),

    /// The targeted journal is already voided; voided is terminal.
    #[error("journal {0} is already voided")]
    AlreadyVoided(JournalId),

    /// Minor-unit conversion or aggregation left the representable range.
    #[error("amount arithmetic failed: {0}")]
    Amount(#[from] AmountError),

    /// The store failed; surfaced as-is, never retried internally. At most
    /// one atomic write is attempted per commit or void, so a caller
    /// retrying after this error should first check whether the journal
    /// already exists.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidJournal(_) => "INVALID_JOURNAL",
            Self::InvalidInput(_) | Self::Amount(_) => "INVALID_INPUT",
            Self::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::AlreadyVoided(_) => "ALREADY_VOIDED",
            Self::Store(_) => "STORE_UNAVAILABLE",
        }
    }
}
