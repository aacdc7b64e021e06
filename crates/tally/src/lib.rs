//! Store-backed double-entry bookkeeping engine.
//!
//! tally records financial movements as balanced journal entries, computes
//! account balances and paginated histories, and corrects mistakes by
//! posting reversals — history is append-only and never deleted.
//!
//! The pieces:
//!
//! - [`Book`] - one named ledger partition; the facade every operation
//!   goes through
//! - [`Entry`] - the chainable debit/credit builder with an atomic,
//!   zero-sum-checked [`commit`](Entry::commit)
//! - [`Query`] - the shared filter vocabulary of [`Book::balance`] and
//!   [`Book::ledger`]
//! - [`LedgerStore`] / [`MemoryStore`] - the storage boundary and its
//!   in-memory reference implementation
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tally::{Book, MemoryStore, Query};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), tally::LedgerError> {
//! let book = Book::new(Arc::new(MemoryStore::new()), "main");
//!
//! // Record rent coming due: the receivable goes up, income is earned.
//! let journal = book
//!     .entry("march rent")
//!     .debit("Assets:Receivable", 500)
//!     .credit("Income:Rent", 500)
//!     .commit()
//!     .await?;
//!
//! // Roll up everything under Assets (debits are negative).
//! let assets = book.balance(Query::new().account("Assets")).await?;
//! assert_eq!(assets.balance.to_string(), "-500.00");
//! assert_eq!(assets.notes, 1);
//!
//! // Mistake? Void it — the books return to their prior state, and both
//! // the original and its reversal stay on record.
//! let reversal = book.void(journal.id, "wrong tenant").await?;
//! assert_eq!(reversal.reverses, Some(journal.id));
//! let assets = book.balance(Query::new().account("Assets")).await?;
//! assert!(assets.balance.is_zero());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod book;
pub mod config;
pub mod entry;
pub mod error;
pub mod query;

pub use book::{Balance, Book, LedgerPage};
pub use config::BookConfig;
pub use entry::Entry;
pub use error::LedgerError;
pub use query::Query;

// Re-export the storage boundary and core value types so callers need a
// single dependency.
pub use tally_core::{
    AccountPath, DateTime, Decimal, Journal, JournalId, Meta, MetaValue, MinorUnits, Side,
    TransactionId, TransactionRecord, Utc,
};
pub use tally_store::{
    ApprovalFilter, LedgerStore, MemoryStore, Page, StoreError, TransactionFilter,
    TransactionPage, TransactionQuery,
};
