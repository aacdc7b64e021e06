//! The entry builder and commit protocol.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tally_core::{
    AccountPath, AmountError, Journal, JournalId, Meta, MinorUnits, Side, TransactionId,
    TransactionRecord,
};
use tally_store::LedgerStore;
use tracing::{debug, warn};

use crate::error::LedgerError;

struct Line {
    side: Side,
    account: AccountPath,
    magnitude: MinorUnits,
    meta: Meta,
}

/// One uncommitted logical event: an accumulating set of debit and credit
/// lines scoped to one book.
///
/// Line methods chain and never fail in place; the first malformed
/// argument (negative amount, bad account path, non-finite number) is
/// remembered and reported by [`commit`](Self::commit) before anything is
/// validated or written.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use tally::{Book, MemoryStore};
/// # #[tokio::main]
/// # async fn main() -> Result<(), tally::LedgerError> {
/// # let book = Book::new(Arc::new(MemoryStore::new()), "main");
/// let journal = book
///     .entry("rent for March")
///     .debit("Assets:Receivable", 500)
///     .credit("Income:Rent", 500)
///     .commit()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Entry {
    store: Arc<dyn LedgerStore>,
    book: String,
    precision: u32,
    memo: String,
    datetime: DateTime<Utc>,
    approved: bool,
    lines: Vec<Line>,
    defect: Option<LedgerError>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("book", &self.book)
            .field("memo", &self.memo)
            .field("datetime", &self.datetime)
            .field("approved", &self.approved)
            .field("lines", &self.lines.len())
            .finish_non_exhaustive()
    }
}

impl Entry {
    pub(crate) fn new(
        store: Arc<dyn LedgerStore>,
        book: String,
        precision: u32,
        memo: String,
        datetime: DateTime<Utc>,
    ) -> Self {
        Self {
            store,
            book,
            precision,
            memo,
            datetime,
            approved: true,
            lines: Vec::new(),
            defect: None,
        }
    }

    /// Override the effective date of the event (defaults to the clock
    /// reading when the builder was created; backdating is allowed).
    #[must_use]
    pub fn datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = datetime;
        self
    }

    /// Mark the eventual journal as a draft (`false`) or final (`true`,
    /// the default). Drafts contribute nothing to balances until approved.
    #[must_use]
    pub const fn approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    /// Append a debit line.
    #[must_use]
    pub fn debit<A>(self, path: impl AsRef<str>, amount: A) -> Self
    where
        A: TryInto<Decimal>,
        A::Error: fmt::Display,
    {
        self.line(Side::Debit, path.as_ref(), amount, Meta::new())
    }

    /// Append a debit line with metadata.
    #[must_use]
    pub fn debit_with_meta<A>(self, path: impl AsRef<str>, amount: A, meta: Meta) -> Self
    where
        A: TryInto<Decimal>,
        A::Error: fmt::Display,
    {
        self.line(Side::Debit, path.as_ref(), amount, meta)
    }

    /// Append a credit line.
    #[must_use]
    pub fn credit<A>(self, path: impl AsRef<str>, amount: A) -> Self
    where
        A: TryInto<Decimal>,
        A::Error: fmt::Display,
    {
        self.line(Side::Credit, path.as_ref(), amount, Meta::new())
    }

    /// Append a credit line with metadata.
    #[must_use]
    pub fn credit_with_meta<A>(self, path: impl AsRef<str>, amount: A, meta: Meta) -> Self
    where
        A: TryInto<Decimal>,
        A::Error: fmt::Display,
    {
        self.line(Side::Credit, path.as_ref(), amount, meta)
    }

    fn line<A>(mut self, side: Side, path: &str, amount: A, meta: Meta) -> Self
    where
        A: TryInto<Decimal>,
        A::Error: fmt::Display,
    {
        if self.defect.is_some() {
            return self;
        }
        let account = match path.parse::<AccountPath>() {
            Ok(account) => account,
            Err(e) => {
                self.defect = Some(LedgerError::InvalidInput(e.to_string()));
                return self;
            }
        };
        let decimal = match amount.try_into() {
            Ok(decimal) => decimal,
            Err(e) => {
                self.defect = Some(LedgerError::InvalidInput(format!(
                    "line amount for {account} is not a finite number: {e}"
                )));
                return self;
            }
        };
        if decimal.is_sign_negative() && !decimal.is_zero() {
            self.defect = Some(LedgerError::InvalidInput(format!(
                "line amount for {account} must be non-negative, got {decimal}"
            )));
            return self;
        }
        let magnitude = match MinorUnits::from_decimal(decimal, self.precision) {
            Ok(magnitude) => magnitude,
            Err(e) => {
                self.defect = Some(LedgerError::Amount(e));
                return self;
            }
        };
        self.lines.push(Line {
            side,
            account,
            magnitude,
            meta,
        });
        self
    }

    /// Validate and persist the entry as a journal plus its transactions,
    /// written as one atomic unit.
    ///
    /// Fails with `INVALID_INPUT` on a recorded argument defect or a
    /// missing debit/credit side, and with `INVALID_JOURNAL` when the
    /// signed line amounts do not sum to exactly zero in minor units.
    /// Nothing is persisted on failure.
    pub async fn commit(self) -> Result<Journal, LedgerError> {
        if let Some(defect) = self.defect {
            return Err(defect);
        }
        let debits = self.lines.iter().filter(|l| matches!(l.side, Side::Debit)).count();
        if debits == 0 || debits == self.lines.len() {
            return Err(LedgerError::InvalidInput(
                "entry requires at least one debit and one credit line".to_owned(),
            ));
        }

        let mut net = MinorUnits::ZERO;
        for line in &self.lines {
            net = net
                .checked_add(line.side.signed(line.magnitude))
                .ok_or(LedgerError::Amount(AmountError::Overflow))?;
        }
        if !net.is_zero() {
            warn!(
                book = %self.book,
                memo = %self.memo,
                net = %net,
                "rejected unbalanced entry"
            );
            return Err(LedgerError::InvalidJournal(
                "can't commit non zero total".to_owned(),
            ));
        }

        let created_at = Utc::now();
        let journal_id = JournalId::new();
        let lines: Vec<TransactionRecord> = self
            .lines
            .into_iter()
            .map(|line| TransactionRecord {
                id: TransactionId::new(),
                journal_id,
                book: self.book.clone(),
                account_path: line.account,
                amount: line.side.signed(line.magnitude),
                meta: line.meta,
                approved: self.approved,
                voided: false,
                datetime: self.datetime,
                created_at,
            })
            .collect();
        let journal = Journal {
            id: journal_id,
            book: self.book.clone(),
            memo: self.memo,
            datetime: self.datetime,
            created_at,
            approved: self.approved,
            voided: false,
            void_reason: None,
            reverses: None,
            transaction_ids: lines.iter().map(|tx| tx.id).collect(),
        };

        self.store.insert_journal(&journal, &lines).await?;
        debug!(
            book = %self.book,
            journal = %journal.id,
            lines = lines.len(),
            approved = journal.approved,
            "committed journal"
        );
        Ok(journal)
    }
}
