//! In-memory reference store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use tally_core::{AccountPath, Journal, JournalId, TransactionRecord};

use crate::error::StoreError;
use crate::filter::{TransactionPage, TransactionQuery};
use crate::store::LedgerStore;

#[derive(Debug, Default)]
struct Inner {
    journals: HashMap<JournalId, Journal>,
    /// Insertion order = commit order; the sort in `find_transactions` is
    /// stable, which is what gives ties their commit-order tiebreak.
    transactions: Vec<TransactionRecord>,
}

/// In-memory [`LedgerStore`].
///
/// Intended for tests and development. A single lock over all records makes
/// every write trivially atomic; not optimized for large books.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_batch(journal: &Journal, lines: &[TransactionRecord]) -> Result<(), StoreError> {
        for (idx, line) in lines.iter().enumerate() {
            if line.journal_id != journal.id {
                return Err(StoreError::Invalid(format!(
                    "line {idx} does not belong to journal {}",
                    journal.id
                )));
            }
            if line.book != journal.book {
                return Err(StoreError::Invalid(format!(
                    "line {idx} belongs to book {:?}, journal to {:?}",
                    line.book, journal.book
                )));
            }
        }
        Ok(())
    }

    fn insert_locked(
        inner: &mut Inner,
        journal: &Journal,
        lines: &[TransactionRecord],
    ) -> Result<(), StoreError> {
        Self::check_batch(journal, lines)?;
        if inner.journals.contains_key(&journal.id) {
            return Err(StoreError::Conflict(format!(
                "journal {} already exists",
                journal.id
            )));
        }
        inner.journals.insert(journal.id, journal.clone());
        inner.transactions.extend_from_slice(lines);
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_journal(
        &self,
        journal: &Journal,
        lines: &[TransactionRecord],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        Self::insert_locked(&mut inner, journal, lines)
    }

    async fn find_journal(&self, id: JournalId) -> Result<Option<Journal>, StoreError> {
        Ok(self.inner.read().journals.get(&id).cloned())
    }

    async fn find_journal_transactions(
        &self,
        id: JournalId,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .transactions
            .iter()
            .filter(|tx| tx.journal_id == id)
            .cloned()
            .collect())
    }

    async fn approve_journal(&self, id: JournalId) -> Result<Journal, StoreError> {
        let mut inner = self.inner.write();
        let journal = inner
            .journals
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("journal {id}")))?;
        if journal.voided {
            return Err(StoreError::Conflict(format!("journal {id} is voided")));
        }
        journal.approved = true;
        let journal = journal.clone();
        for tx in inner.transactions.iter_mut().filter(|tx| tx.journal_id == id) {
            tx.approved = true;
        }
        Ok(journal)
    }

    async fn void_journal(
        &self,
        id: JournalId,
        reason: &str,
        reversal: &Journal,
        reversal_lines: &[TransactionRecord],
    ) -> Result<Journal, StoreError> {
        let mut inner = self.inner.write();
        // Validate everything before mutating: a rejected reversal must not
        // leave the original half-voided.
        Self::check_batch(reversal, reversal_lines)?;
        if inner.journals.contains_key(&reversal.id) {
            return Err(StoreError::Conflict(format!(
                "journal {} already exists",
                reversal.id
            )));
        }
        {
            let journal = inner
                .journals
                .get_mut(&id)
                .ok_or_else(|| StoreError::NotFound(format!("journal {id}")))?;
            // The guard: only a transition from voided = false wins.
            if journal.voided {
                return Err(StoreError::Conflict(format!("journal {id} is already voided")));
            }
            journal.voided = true;
            journal.void_reason = Some(reason.to_owned());
        }
        for tx in inner.transactions.iter_mut().filter(|tx| tx.journal_id == id) {
            tx.voided = true;
        }
        inner.journals.insert(reversal.id, reversal.clone());
        inner.transactions.extend_from_slice(reversal_lines);
        Ok(inner.journals[&id].clone())
    }

    async fn find_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<TransactionPage, StoreError> {
        let inner = self.inner.read();
        let mut matches: Vec<&TransactionRecord> = inner
            .transactions
            .iter()
            .filter(|tx| query.filter.matches(tx))
            .collect();
        matches.sort_by_key(|tx| tx.datetime);

        let total = matches.len() as u64;
        let results = match query.page {
            Some(page) => matches
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(page.per_page).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matches.into_iter().cloned().collect(),
        };
        Ok(TransactionPage { results, total })
    }

    async fn list_accounts(&self, book: &str) -> Result<Vec<AccountPath>, StoreError> {
        let inner = self.inner.read();
        let accounts: BTreeSet<AccountPath> = inner
            .transactions
            .iter()
            .filter(|tx| tx.book == book)
            .map(|tx| tx.account_path.clone())
            .collect();
        Ok(accounts.into_iter().collect())
    }
}
