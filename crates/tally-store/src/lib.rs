//! Storage boundary for tally.
//!
//! The engine talks to its persistent store through the [`LedgerStore`]
//! trait: a small set of operations any document or relational database can
//! provide — an atomic multi-record insert, guarded flag transitions for
//! approval and voiding, an indexed filtered query with a slice-independent
//! total, and a distinct-account listing.
//!
//! [`MemoryStore`] is the reference implementation, used by tests and
//! development. It holds everything behind one lock, which trivially gives
//! the atomicity the trait demands; a database-backed implementation would
//! use its native transactions instead.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use filter::{ApprovalFilter, Page, TransactionFilter, TransactionPage, TransactionQuery};
pub use memory::MemoryStore;
pub use store::LedgerStore;
