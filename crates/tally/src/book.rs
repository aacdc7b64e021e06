//! The book facade: commits, balances, ledgers, approvals, voids.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tally_core::{
    AccountPath, AmountError, Journal, JournalId, MinorUnits, TransactionId, TransactionRecord,
};
use tally_store::{LedgerStore, StoreError};
use tracing::{debug, info};

use crate::config::BookConfig;
use crate::entry::Entry;
use crate::error::LedgerError;
use crate::query::Query;

/// Result of a balance query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    /// Signed sum of every counted transaction (credit positive).
    pub balance: Decimal,
    /// Number of transactions counted.
    pub notes: u64,
}

/// Result of a ledger query: the raw audit-trail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPage {
    /// Matching transactions, effective datetime ascending, ties in commit
    /// order, sliced to the requested page.
    pub results: Vec<TransactionRecord>,
    /// Full match count irrespective of the page slice.
    pub total: u64,
}

/// One named partition of the ledger.
///
/// All operations are scoped to this book; nothing here ever reads or
/// writes another book's records. The book holds no state of its own —
/// it is a handle over the store plus a precision, so cloning is cheap
/// and concurrent use is safe.
#[derive(Clone)]
pub struct Book {
    store: Arc<dyn LedgerStore>,
    name: String,
    config: BookConfig,
}

impl std::fmt::Debug for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Book")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Book {
    /// Open a book with the default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, name: impl Into<String>) -> Self {
        Self::with_config(store, name, BookConfig::default())
    }

    /// Open a book with an explicit configuration.
    #[must_use]
    pub fn with_config(
        store: Arc<dyn LedgerStore>,
        name: impl Into<String>,
        config: BookConfig,
    ) -> Self {
        Self {
            store,
            name: name.into(),
            config,
        }
    }

    /// The book's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The decimal precision amounts are kept to.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.config.precision
    }

    /// Start a new uncommitted entry. Its effective datetime defaults to
    /// now; override with [`Entry::datetime`].
    #[must_use]
    pub fn entry(&self, memo: impl Into<String>) -> Entry {
        Entry::new(
            Arc::clone(&self.store),
            self.name.clone(),
            self.config.precision,
            memo.into(),
            Utc::now(),
        )
    }

    /// Signed sum and count of the transactions matching `query`.
    ///
    /// With pagination set, aggregation is restricted to the dated slice
    /// `[(page-1)*perPage, page*perPage)` of the matching set ordered by
    /// effective datetime — the balance contribution of that window, not
    /// of the whole history. `notes` counts the transactions actually
    /// aggregated. No matches is a zero balance, never an error.
    pub async fn balance(&self, query: Query) -> Result<Balance, LedgerError> {
        let resolved = query.resolve(&self.name)?;
        let page = self.store.find_transactions(&resolved).await?;

        let mut net = MinorUnits::ZERO;
        for tx in &page.results {
            net = net
                .checked_add(tx.amount)
                .ok_or(LedgerError::Amount(AmountError::Overflow))?;
        }
        let balance = net.to_decimal(self.config.precision)?;
        debug!(book = %self.name, balance = %balance, notes = page.results.len(), "balance query");
        Ok(Balance {
            balance,
            notes: page.results.len() as u64,
        })
    }

    /// The raw transactions matching `query`: effective datetime
    /// ascending, ties in commit order, sliced to the requested page.
    /// `total` counts every match regardless of the slice.
    pub async fn ledger(&self, query: Query) -> Result<LedgerPage, LedgerError> {
        let resolved = query.resolve(&self.name)?;
        let page = self.store.find_transactions(&resolved).await?;
        debug!(book = %self.name, results = page.results.len(), total = page.total, "ledger query");
        Ok(LedgerPage {
            results: page.results,
            total: page.total,
        })
    }

    /// Fetch one journal of this book.
    pub async fn journal(&self, id: JournalId) -> Result<Option<Journal>, LedgerError> {
        Ok(self
            .store
            .find_journal(id)
            .await?
            .filter(|journal| journal.book == self.name))
    }

    /// Approve a draft journal: flips `approved` on the journal and every
    /// owned transaction, so balance and ledger queries start counting it.
    /// Idempotent on an already-posted journal; a voided journal is
    /// terminal and fails with `ALREADY_VOIDED`.
    pub async fn approve(&self, id: JournalId) -> Result<Journal, LedgerError> {
        let journal = self
            .journal(id)
            .await?
            .ok_or(LedgerError::DocumentNotFound(id))?;
        if journal.voided {
            return Err(LedgerError::AlreadyVoided(id));
        }
        if journal.approved {
            return Ok(journal);
        }
        let journal = self.store.approve_journal(id).await.map_err(|e| match e {
            StoreError::NotFound(_) => LedgerError::DocumentNotFound(id),
            StoreError::Conflict(_) => LedgerError::AlreadyVoided(id),
            other => LedgerError::Store(other),
        })?;
        info!(book = %self.name, journal = %id, "approved journal");
        Ok(journal)
    }

    /// Void a journal and post its reversal; returns the reversing journal.
    ///
    /// The original journal and its transactions are marked voided (with
    /// `reason` recorded) and a reversing journal — mirrored account paths
    /// and metadata, every sign flipped, memo derived from the reason,
    /// back-reference to the original — is written in the same atomic
    /// unit. History is never erased: the original stays retrievable, and
    /// the net effect on every account it touched returns to its pre-entry
    /// value once the reversal posts.
    ///
    /// Of two concurrent voids of the same journal, exactly one succeeds;
    /// the other fails with `ALREADY_VOIDED`.
    pub async fn void(&self, id: JournalId, reason: impl Into<String>) -> Result<Journal, LedgerError> {
        let original = self
            .journal(id)
            .await?
            .ok_or(LedgerError::DocumentNotFound(id))?;
        if original.voided {
            return Err(LedgerError::AlreadyVoided(id));
        }

        // Empty reason: derive one from the original memo.
        let mut reason = reason.into();
        if reason.is_empty() {
            reason = format!("[VOID] {}", original.memo);
        }

        let lines = self.store.find_journal_transactions(id).await?;
        let now = Utc::now();
        let reversal_id = JournalId::new();
        let reversal_lines: Vec<TransactionRecord> = lines
            .into_iter()
            .map(|tx| TransactionRecord {
                id: TransactionId::new(),
                journal_id: reversal_id,
                book: tx.book,
                account_path: tx.account_path,
                amount: tx.amount.negated(),
                meta: tx.meta,
                // Inherit approval: a voided draft's reversal stays a draft.
                approved: original.approved,
                voided: false,
                datetime: now,
                created_at: now,
            })
            .collect();
        let reversal = Journal {
            id: reversal_id,
            book: self.name.clone(),
            memo: reason.clone(),
            datetime: now,
            created_at: now,
            approved: original.approved,
            voided: false,
            void_reason: None,
            reverses: Some(id),
            transaction_ids: reversal_lines.iter().map(|tx| tx.id).collect(),
        };

        self.store
            .void_journal(id, &reason, &reversal, &reversal_lines)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => LedgerError::DocumentNotFound(id),
                StoreError::Conflict(_) => LedgerError::AlreadyVoided(id),
                other => LedgerError::Store(other),
            })?;
        info!(
            book = %self.name,
            journal = %id,
            reversal = %reversal.id,
            "voided journal"
        );
        Ok(reversal)
    }

    /// Distinct account paths ever used in this book, sorted — including
    /// accounts only touched by voided or draft journals.
    pub async fn accounts(&self) -> Result<Vec<AccountPath>, LedgerError> {
        Ok(self.store.list_accounts(&self.name).await?)
    }
}
