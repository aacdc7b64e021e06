//! Persisted journal and transaction records.
//!
//! A [`Journal`] is one balanced logical event; it exclusively owns two or
//! more [`TransactionRecord`]s whose signed minor-unit amounts sum to zero.
//! Records are append-only: after commit, only the `approved` and `voided`
//! flags ever change. Corrections happen by writing a reversing journal,
//! never by editing history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::account::AccountPath;
use crate::amount::MinorUnits;
use crate::meta::Meta;

/// Journal identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JournalId(Uuid);

impl JournalId {
    /// Mint a fresh, time-ordered identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for JournalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Transaction identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Mint a fresh, time-ordered identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Which side of the books a line falls on.
///
/// The engine's sign convention is credit-positive: at a precision of 2, a
/// credit of 500 is stored as `+50000` minor units, a debit of 500 as
/// `-50000`. Balances are plain signed sums under that convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit: recorded with a negative sign.
    Debit,
    /// Credit: recorded with a positive sign.
    Credit,
}

impl Side {
    /// Apply the side's sign to an unsigned magnitude.
    #[must_use]
    pub fn signed(self, magnitude: MinorUnits) -> MinorUnits {
        match self {
            Self::Debit => magnitude.negated(),
            Self::Credit => magnitude,
        }
    }
}

/// One signed movement against one account within one journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Record identifier.
    pub id: TransactionId,
    /// The owning journal (relation, not ownership).
    pub journal_id: JournalId,
    /// The ledger namespace this transaction belongs to.
    pub book: String,
    /// The account moved against (immutable after creation).
    pub account_path: AccountPath,
    /// Signed minor-unit amount; credit positive, debit negative.
    pub amount: MinorUnits,
    /// Caller-defined attributes, filterable by exact match.
    pub meta: Meta,
    /// False while the owning journal is a draft.
    pub approved: bool,
    /// True once the owning journal has been reversed.
    pub voided: bool,
    /// Effective date of the movement (may be backdated).
    pub datetime: DateTime<Utc>,
    /// Write time.
    pub created_at: DateTime<Utc>,
}

/// One balanced logical event owning a set of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Record identifier.
    pub id: JournalId,
    /// The ledger namespace this journal belongs to.
    pub book: String,
    /// Free-text description.
    pub memo: String,
    /// Effective date shared with the owned transactions.
    pub datetime: DateTime<Utc>,
    /// Write time.
    pub created_at: DateTime<Utc>,
    /// Source of truth for the owned transactions' approval.
    pub approved: bool,
    /// True once reversed; terminal.
    pub voided: bool,
    /// Free text explaining a void.
    pub void_reason: Option<String>,
    /// Back-reference set on a reversing journal.
    pub reverses: Option<JournalId>,
    /// Owned transactions, insertion order = commit order.
    pub transaction_ids: Vec<TransactionId>,
}

impl Journal {
    /// A journal that is neither posted nor voided.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        !self.approved && !self.voided
    }
}
