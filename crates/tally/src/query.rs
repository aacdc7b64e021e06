//! Caller-facing query builder.

use chrono::{DateTime, Utc};
use tally_core::{AccountPath, Meta, MetaValue};
use tally_store::{ApprovalFilter, Page, TransactionFilter, TransactionQuery};

use crate::error::LedgerError;

/// Filter builder shared by [`Book::balance`](crate::Book::balance) and
/// [`Book::ledger`](crate::Book::ledger).
///
/// Defaults match what an auditor expects to count: approved, non-voided
/// transactions of the whole book, unpaginated.
///
/// # Examples
///
/// ```
/// use tally::Query;
///
/// let query = Query::new()
///     .account("Assets")
///     .meta("clientId", "12345")
///     .page(1, 25);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    accounts: Vec<String>,
    approval: ApprovalFilter,
    include_voided: bool,
    meta: Meta,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    page: Option<Page>,
}

impl Query {
    /// A query matching every approved, non-voided transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one account subtree. May be called repeatedly; a
    /// transaction matches when ANY of the given paths contains it.
    #[must_use]
    pub fn account(mut self, path: impl Into<String>) -> Self {
        self.accounts.push(path.into());
        self
    }

    /// Require exact equality on one metadata key.
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Inclusive lower bound on the effective datetime.
    #[must_use]
    pub const fn since(mut self, datetime: DateTime<Utc>) -> Self {
        self.since = Some(datetime);
        self
    }

    /// Inclusive upper bound on the effective datetime.
    #[must_use]
    pub const fn until(mut self, datetime: DateTime<Utc>) -> Self {
        self.until = Some(datetime);
        self
    }

    /// Count only draft transactions instead of approved ones.
    #[must_use]
    pub const fn pending(mut self) -> Self {
        self.approval = ApprovalFilter::PendingOnly;
        self
    }

    /// Count drafts and approved transactions alike.
    #[must_use]
    pub const fn any_approval(mut self) -> Self {
        self.approval = ApprovalFilter::Any;
        self
    }

    /// Also count voided transactions (the full audit trail).
    #[must_use]
    pub const fn include_voided(mut self) -> Self {
        self.include_voided = true;
        self
    }

    /// Restrict to the given 1-based page of the matching set, ordered by
    /// effective datetime. For `balance` this aggregates over the dated
    /// slice rather than the whole match set.
    #[must_use]
    pub const fn page(mut self, page: u64, per_page: u64) -> Self {
        self.page = Some(Page::new(page, per_page));
        self
    }

    /// Resolve into the store's filter vocabulary, scoped to `book`.
    pub(crate) fn resolve(self, book: &str) -> Result<TransactionQuery, LedgerError> {
        let accounts = self
            .accounts
            .iter()
            .map(|raw| {
                raw.parse::<AccountPath>()
                    .map_err(|e| LedgerError::InvalidInput(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(page) = self.page {
            if page.page == 0 || page.per_page == 0 {
                return Err(LedgerError::InvalidInput(
                    "page and perPage must be at least 1".to_owned(),
                ));
            }
        }

        Ok(TransactionQuery {
            filter: TransactionFilter {
                book: book.to_owned(),
                accounts,
                approval: self.approval,
                include_voided: self.include_voided,
                meta: self.meta,
                since: self.since,
                until: self.until,
            },
            page: self.page,
        })
    }
}
