//! Contract tests for the in-memory store.
//!
//! These exercise the `LedgerStore` guarantees the engine relies on:
//! atomic batches, guarded void/approve transitions, the fixed sort, and
//! slice-independent totals.

use chrono::{DateTime, Duration, Utc};
use tally_core::{
    Journal, JournalId, Meta, MinorUnits, Side, TransactionId, TransactionRecord,
};
use tally_store::{
    ApprovalFilter, LedgerStore, MemoryStore, Page, StoreError, TransactionFilter,
    TransactionQuery,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn journal(book: &str, memo: &str, at: DateTime<Utc>) -> Journal {
    Journal {
        id: JournalId::new(),
        book: book.to_owned(),
        memo: memo.to_owned(),
        datetime: at,
        created_at: Utc::now(),
        approved: true,
        voided: false,
        void_reason: None,
        reverses: None,
        transaction_ids: Vec::new(),
    }
}

fn line(journal: &Journal, path: &str, side: Side, units: i64) -> TransactionRecord {
    let magnitude = MinorUnits::from_decimal(units.into(), 2).unwrap();
    TransactionRecord {
        id: TransactionId::new(),
        journal_id: journal.id,
        book: journal.book.clone(),
        account_path: path.parse().unwrap(),
        amount: side.signed(magnitude),
        meta: Meta::new(),
        approved: journal.approved,
        voided: false,
        datetime: journal.datetime,
        created_at: journal.created_at,
    }
}

/// A balanced two-line journal: debit `from`, credit `to`.
async fn post(
    store: &MemoryStore,
    book: &str,
    from: &str,
    to: &str,
    units: i64,
    at: DateTime<Utc>,
) -> Journal {
    let mut j = journal(book, "test entry", at);
    let debit = line(&j, from, Side::Debit, units);
    let credit = line(&j, to, Side::Credit, units);
    j.transaction_ids = vec![debit.id, credit.id];
    store.insert_journal(&j, &[debit, credit]).await.unwrap();
    j
}

fn all_of(book: &str) -> TransactionQuery {
    TransactionQuery::unpaged(TransactionFilter::for_book(book))
}

// ============================================================================
// Insert / lookup
// ============================================================================

#[tokio::test]
async fn insert_then_find() {
    let store = MemoryStore::new();
    let j = post(&store, "main", "Assets:Cash", "Income:Sales", 100, Utc::now()).await;

    let found = store.find_journal(j.id).await.unwrap().unwrap();
    assert_eq!(found.memo, "test entry");

    let lines = store.find_journal_transactions(j.id).await.unwrap();
    assert_eq!(lines.len(), 2);
    // Commit order is preserved: debit first.
    assert!(lines[0].amount.is_negative());
}

#[tokio::test]
async fn duplicate_journal_id_conflicts() {
    let store = MemoryStore::new();
    let j = journal("main", "dup", Utc::now());
    store.insert_journal(&j, &[]).await.unwrap();
    let err = store.insert_journal(&j, &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn inconsistent_batch_rejected() {
    let store = MemoryStore::new();
    let j = journal("main", "bad batch", Utc::now());
    let other = journal("main", "other", Utc::now());
    let stray = line(&other, "Assets", Side::Debit, 1);

    let err = store.insert_journal(&j, &[stray]).await.unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
    // Nothing was persisted.
    assert!(store.find_journal(j.id).await.unwrap().is_none());
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn prefix_match_is_segment_wise() {
    let store = MemoryStore::new();
    post(&store, "main", "Assets:Cash", "Income", 5, Utc::now()).await;
    post(&store, "main", "AssetsOther", "Income", 7, Utc::now()).await;

    let mut filter = TransactionFilter::for_book("main");
    filter.accounts = vec!["Assets".parse().unwrap()];
    let page = store
        .find_transactions(&TransactionQuery::unpaged(filter))
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.results[0].account_path.to_string(), "Assets:Cash");
}

#[tokio::test]
async fn default_filter_excludes_pending() {
    let store = MemoryStore::new();
    let mut j = journal("main", "draft", Utc::now());
    j.approved = false;
    let debit = line(&j, "Assets", Side::Debit, 10);
    let credit = line(&j, "Income", Side::Credit, 10);
    j.transaction_ids = vec![debit.id, credit.id];
    store.insert_journal(&j, &[debit, credit]).await.unwrap();

    let page = store.find_transactions(&all_of("main")).await.unwrap();
    assert_eq!(page.total, 0);

    let mut filter = TransactionFilter::for_book("main");
    filter.approval = ApprovalFilter::PendingOnly;
    let pending = store
        .find_transactions(&TransactionQuery::unpaged(filter))
        .await
        .unwrap();
    assert_eq!(pending.total, 2);
}

#[tokio::test]
async fn queries_do_not_cross_books() {
    let store = MemoryStore::new();
    post(&store, "main", "Assets", "Income", 10, Utc::now()).await;
    post(&store, "side", "Assets", "Income", 99, Utc::now()).await;

    let page = store.find_transactions(&all_of("main")).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.results.iter().all(|tx| tx.book == "main"));

    let accounts = store.list_accounts("side").await.unwrap();
    assert_eq!(accounts.len(), 2);
}

// ============================================================================
// Sort and pagination
// ============================================================================

#[tokio::test]
async fn sorted_by_datetime_with_commit_order_ties() {
    let store = MemoryStore::new();
    let base = Utc::now();

    // Committed out of datetime order on purpose.
    let late = post(&store, "main", "A", "B", 3, base + Duration::days(2)).await;
    let early = post(&store, "main", "A", "B", 1, base).await;
    let tie_first = post(&store, "main", "A", "B", 2, base + Duration::days(1)).await;
    let tie_second = post(&store, "main", "A", "B", 4, base + Duration::days(1)).await;

    let page = store.find_transactions(&all_of("main")).await.unwrap();
    let journals: Vec<_> = page.results.iter().map(|tx| tx.journal_id).collect();
    assert_eq!(
        journals,
        vec![
            early.id, early.id,
            tie_first.id, tie_first.id,
            tie_second.id, tie_second.id,
            late.id, late.id,
        ]
    );
}

#[tokio::test]
async fn total_ignores_the_slice() {
    let store = MemoryStore::new();
    let base = Utc::now();
    for i in 0..5 {
        post(&store, "main", "A", "B", i + 1, base + Duration::minutes(i)).await;
    }

    let mut query = all_of("main");
    query.page = Some(Page::new(2, 4));
    let page = store.find_transactions(&query).await.unwrap();
    assert_eq!(page.total, 10);
    assert_eq!(page.results.len(), 4);

    // A page past the end is empty, same total.
    query.page = Some(Page::new(4, 4));
    let past = store.find_transactions(&query).await.unwrap();
    assert_eq!(past.total, 10);
    assert!(past.results.is_empty());
}

// ============================================================================
// Void / approve guards
// ============================================================================

#[tokio::test]
async fn void_marks_and_inserts_reversal_atomically() {
    let store = MemoryStore::new();
    let j = post(&store, "main", "Assets", "Income", 50, Utc::now()).await;

    let mut reversal = journal("main", "correction", Utc::now());
    reversal.reverses = Some(j.id);
    let credit = line(&reversal, "Assets", Side::Credit, 50);
    let debit = line(&reversal, "Income", Side::Debit, 50);
    reversal.transaction_ids = vec![credit.id, debit.id];

    let voided = store
        .void_journal(j.id, "fat finger", &reversal, &[credit, debit])
        .await
        .unwrap();
    assert!(voided.voided);
    assert_eq!(voided.void_reason.as_deref(), Some("fat finger"));

    // Original lines are out of default aggregation; reversal lines are in.
    let page = store.find_transactions(&all_of("main")).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.results.iter().all(|tx| tx.journal_id == reversal.id));

    // Second void loses the guard.
    let err = store
        .void_journal(j.id, "again", &journal("main", "x", Utc::now()), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn approve_flips_journal_and_lines() {
    let store = MemoryStore::new();
    let mut j = journal("main", "draft", Utc::now());
    j.approved = false;
    let debit = line(&j, "Assets", Side::Debit, 10);
    let credit = line(&j, "Income", Side::Credit, 10);
    j.transaction_ids = vec![debit.id, credit.id];
    store.insert_journal(&j, &[debit, credit]).await.unwrap();

    let approved = store.approve_journal(j.id).await.unwrap();
    assert!(approved.approved);

    let lines = store.find_journal_transactions(j.id).await.unwrap();
    assert!(lines.iter().all(|tx| tx.approved));

    // Idempotent.
    store.approve_journal(j.id).await.unwrap();

    // Missing id is NotFound.
    let err = store.approve_journal(JournalId::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn approve_refuses_voided_journal() {
    let store = MemoryStore::new();
    let j = post(&store, "main", "Assets", "Income", 10, Utc::now()).await;
    store
        .void_journal(j.id, "gone", &journal("main", "rev", Utc::now()), &[])
        .await
        .unwrap();

    let err = store.approve_journal(j.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

// ============================================================================
// Account listing
// ============================================================================

#[tokio::test]
async fn list_accounts_is_distinct_and_sorted() {
    let store = MemoryStore::new();
    let now = Utc::now();
    post(&store, "main", "Income:Rent", "Assets:Receivable", 500, now).await;
    post(&store, "main", "Assets:Receivable", "Assets:Cash", 200, now).await;

    let accounts = store.list_accounts("main").await.unwrap();
    let names: Vec<String> = accounts.iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["Assets:Cash", "Assets:Receivable", "Income:Rent"]);
}
