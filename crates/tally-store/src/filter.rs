//! The filter vocabulary shared by balance and ledger queries.
//!
//! A [`TransactionFilter`] is always scoped to one book; queries never
//! cross books implicitly. Every other field narrows the match set:
//! account paths (prefix containment against ANY of the given paths),
//! approval state, voided state, metadata equality, and an inclusive
//! datetime range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{AccountPath, Meta, TransactionRecord};

/// Which approval states a query counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalFilter {
    /// Only approved (posted) transactions. The default.
    #[default]
    ApprovedOnly,
    /// Only draft transactions.
    PendingOnly,
    /// Both.
    Any,
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number, starting at 1.
    pub page: u64,
    /// Matches per page.
    pub per_page: u64,
}

impl Page {
    /// Create a page request.
    #[must_use]
    pub const fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Offset of the first match in this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Filter over the transactions of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// The book to search. Required.
    pub book: String,
    /// Account subtrees to match; a transaction matches when ANY of these
    /// paths is a segment-prefix of its account path. Empty = all accounts.
    pub accounts: Vec<AccountPath>,
    /// Approval state to count.
    pub approval: ApprovalFilter,
    /// When false (the default), voided transactions are excluded.
    pub include_voided: bool,
    /// Exact-match metadata constraints; all entries must match.
    pub meta: Meta,
    /// Inclusive lower bound on the effective datetime.
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the effective datetime.
    pub until: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// A filter with defaults: every approved, non-voided transaction of
    /// the book.
    #[must_use]
    pub fn for_book(book: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            accounts: Vec::new(),
            approval: ApprovalFilter::default(),
            include_voided: false,
            meta: Meta::new(),
            since: None,
            until: None,
        }
    }

    /// Whether one transaction satisfies every constraint.
    #[must_use]
    pub fn matches(&self, tx: &TransactionRecord) -> bool {
        if tx.book != self.book {
            return false;
        }
        if !self.accounts.is_empty()
            && !self.accounts.iter().any(|a| a.is_prefix_of(&tx.account_path))
        {
            return false;
        }
        match self.approval {
            ApprovalFilter::ApprovedOnly if !tx.approved => return false,
            ApprovalFilter::PendingOnly if tx.approved => return false,
            _ => {}
        }
        if !self.include_voided && tx.voided {
            return false;
        }
        if let Some(since) = self.since {
            if tx.datetime < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if tx.datetime > until {
                return false;
            }
        }
        self.meta
            .iter()
            .all(|(key, value)| tx.meta.get(key) == Some(value))
    }
}

/// A filter plus an optional page slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// The match constraints.
    pub filter: TransactionFilter,
    /// Optional slice of the matching set, taken after the fixed sort
    /// (datetime ascending, commit order on ties).
    pub page: Option<Page>,
}

impl TransactionQuery {
    /// Query every match of `filter`, unsliced.
    #[must_use]
    pub const fn unpaged(filter: TransactionFilter) -> Self {
        Self { filter, page: None }
    }
}

/// One page of matching transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    /// The matches inside the requested slice, datetime ascending.
    pub results: Vec<TransactionRecord>,
    /// Total matches irrespective of the slice.
    pub total: u64,
}
