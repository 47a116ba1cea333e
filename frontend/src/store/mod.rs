pub mod aggregates;
pub mod finance_store;

pub use aggregates::{HistoryEntry, RECENT_HISTORY_LEN};
pub use finance_store::FinanceStore;
