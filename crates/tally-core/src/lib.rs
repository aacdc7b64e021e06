//! Core types for tally
//!
//! This crate provides the fundamental types used throughout the tally project:
//!
//! - [`MinorUnits`] - An exact signed quantity in integer minor units
//! - [`AccountPath`] - A hierarchical, colon-delimited account name
//! - [`Meta`] / [`MetaValue`] - Open key-value attributes attached to transactions
//! - [`Journal`] - One balanced logical event owning two or more transactions
//! - [`TransactionRecord`] - One signed movement against one account
//!
//! # Example
//!
//! ```
//! use tally_core::{AccountPath, MinorUnits};
//! use rust_decimal_macros::dec;
//!
//! // Amounts are held as integer minor units, so fractional debits and
//! // credits that cancel on paper cancel exactly here too.
//! let credit = MinorUnits::from_decimal(dec!(1005), 2).unwrap();
//! let debit_a = MinorUnits::from_decimal(dec!(-994.95), 2).unwrap();
//! let debit_b = MinorUnits::from_decimal(dec!(-10.05), 2).unwrap();
//! let net = credit.checked_add(debit_a).and_then(|n| n.checked_add(debit_b));
//! assert_eq!(net, Some(MinorUnits::ZERO));
//!
//! // Account paths roll up by segment prefix, not by substring.
//! let assets: AccountPath = "Assets".parse().unwrap();
//! let receivable: AccountPath = "Assets:Receivable".parse().unwrap();
//! assert!(assets.is_prefix_of(&receivable));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod amount;
pub mod meta;
pub mod record;

pub use account::{AccountError, AccountPath};
pub use amount::{AmountError, MinorUnits};
pub use meta::{Meta, MetaValue};
pub use record::{Journal, JournalId, Side, TransactionId, TransactionRecord};

// Re-export commonly used external types
pub use chrono::{DateTime, Utc};
pub use rust_decimal::Decimal;
