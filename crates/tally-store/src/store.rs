//! The `LedgerStore` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tally_core::{AccountPath, Journal, JournalId, TransactionRecord};

use crate::error::StoreError;
use crate::filter::{TransactionPage, TransactionQuery};

/// The set of operations the engine requires from its persistent store.
///
/// ## Atomicity
///
/// Three operations write multiple records; each must be applied as a
/// single atomic unit — all records visible together or none:
///
/// - [`insert_journal`](Self::insert_journal): a journal plus its owned
///   transactions. A reader observing a debit line without its matching
///   credit would see the zero-sum invariant broken.
/// - [`void_journal`](Self::void_journal): the void marks on the original
///   journal and its transactions, plus the reversing journal's records.
/// - [`approve_journal`](Self::approve_journal): the approval flag on the
///   journal and every owned transaction.
///
/// ## Guarded transitions
///
/// `void_journal` must check-and-set the `voided` flag atomically with
/// respect to other voids of the same journal: of two concurrent voids,
/// exactly one wins and the other gets [`StoreError::Conflict`]. The same
/// guard protects `approve_journal` from racing a void.
///
/// ## Consistency
///
/// Reads may observe any consistent snapshot; they never observe a
/// half-applied write. No operation blocks indefinitely — backends surface
/// their own timeout policy as [`StoreError::Unavailable`], and the engine
/// passes it through rather than retrying.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Write a journal and its owned transactions as one atomic unit.
    async fn insert_journal(
        &self,
        journal: &Journal,
        lines: &[TransactionRecord],
    ) -> Result<(), StoreError>;

    /// Point lookup of a journal.
    async fn find_journal(&self, id: JournalId) -> Result<Option<Journal>, StoreError>;

    /// The transactions owned by a journal, in commit order, regardless of
    /// their approval or voided state.
    async fn find_journal_transactions(
        &self,
        id: JournalId,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Flip `approved` to true on a journal and all its transactions.
    ///
    /// Idempotent on an already-approved journal. Fails with
    /// [`StoreError::Conflict`] if the journal is voided and
    /// [`StoreError::NotFound`] if it does not exist.
    async fn approve_journal(&self, id: JournalId) -> Result<Journal, StoreError>;

    /// Mark a journal and its transactions voided and insert the reversing
    /// journal, all in one atomic unit.
    ///
    /// The void mark is guarded by the previous `voided` value: if the
    /// journal is already voided the call fails with
    /// [`StoreError::Conflict`] and writes nothing. Returns the updated
    /// original journal.
    async fn void_journal(
        &self,
        id: JournalId,
        reason: &str,
        reversal: &Journal,
        reversal_lines: &[TransactionRecord],
    ) -> Result<Journal, StoreError>;

    /// Filtered, sorted, sliced transaction query.
    ///
    /// Results are ordered by effective datetime ascending with ties broken
    /// by commit order; `total` counts every match irrespective of the
    /// requested slice.
    async fn find_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<TransactionPage, StoreError>;

    /// Distinct account paths ever used in a book, sorted.
    async fn list_accounts(&self, book: &str) -> Result<Vec<AccountPath>, StoreError>;
}

#[async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn insert_journal(
        &self,
        journal: &Journal,
        lines: &[TransactionRecord],
    ) -> Result<(), StoreError> {
        (**self).insert_journal(journal, lines).await
    }

    async fn find_journal(&self, id: JournalId) -> Result<Option<Journal>, StoreError> {
        (**self).find_journal(id).await
    }

    async fn find_journal_transactions(
        &self,
        id: JournalId,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        (**self).find_journal_transactions(id).await
    }

    async fn approve_journal(&self, id: JournalId) -> Result<Journal, StoreError> {
        (**self).approve_journal(id).await
    }

    async fn void_journal(
        &self,
        id: JournalId,
        reason: &str,
        reversal: &Journal,
        reversal_lines: &[TransactionRecord],
    ) -> Result<Journal, StoreError> {
        (**self).void_journal(id, reason, reversal, reversal_lines).await
    }

    async fn find_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<TransactionPage, StoreError> {
        (**self).find_transactions(query).await
    }

    async fn list_accounts(&self, book: &str) -> Result<Vec<AccountPath>, StoreError> {
        (**self).list_accounts(book).await
    }
}
