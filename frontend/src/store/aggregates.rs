//! Derived values computed from the in-memory collections. No I/O happens here.

use shared::{Transaction, TransactionKind};

/// Number of entries shown in the dashboard's recent history
pub const RECENT_HISTORY_LEN: usize = 3;

/// One row of the merged income/expense history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry<'a> {
    pub kind: TransactionKind,
    pub transaction: &'a Transaction,
}

/// Sum of `amount` over a collection, 0 when empty
pub fn sum_amounts(transactions: &[Transaction]) -> f64 {
    transactions.iter().fold(0.0, |total, t| total + t.amount)
}

/// Merge both collections, newest first, keeping at most `limit` entries.
/// Entries sharing a timestamp come out in no particular order.
pub fn merge_history<'a>(
    incomes: &'a [Transaction],
    expenses: &'a [Transaction],
    limit: usize,
) -> Vec<HistoryEntry<'a>> {
    let tagged = |kind: TransactionKind| {
        move |transaction: &'a Transaction| HistoryEntry { kind, transaction }
    };

    let mut history: Vec<HistoryEntry<'a>> = incomes
        .iter()
        .map(tagged(TransactionKind::Income))
        .chain(expenses.iter().map(tagged(TransactionKind::Expense)))
        .collect();

    history.sort_unstable_by(|a, b| b.transaction.created_at.cmp(&a.transaction.created_at));
    history.truncate(limit);
    history
}
