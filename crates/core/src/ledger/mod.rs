//! Double-entry ledger primitives.
//!
//! This module implements the shared building blocks every report uses:
//! - Input records (accounts, journal entries, journal lines)
//! - Account classification (normal side, statement group, cash flow role)
//! - Calendar date parsing and period membership
//! - Resolved ledger view joining lines to their entries
//! - Per-account debit/credit aggregation and running balances
//! - Error types for unresolvable snapshots

pub mod balance;
pub mod classifier;
pub mod error;
pub mod period;
pub mod types;
pub mod view;

pub use balance::{
    AccountTotals, BalanceAggregator, BalanceMap, PARALLEL_THRESHOLD, RunningBalance,
    signed_balance,
};
pub use classifier::{
    AccountSubtype, AccountType, CashFlowCategory, CashFlowClassification, CashFlowRole,
    ClassificationSource, ClassifiedAccount, NormalSide, StatementGroup, cash_account_source,
    classify_cash_flow, is_depreciation_expense, is_equity_draw,
};
pub use error::LedgerError;
pub use period::{PeriodFilter, calendar_date, parse_calendar_date};
pub use types::{Account, JournalEntry, JournalEntryLine};
pub use view::{DatedLine, LedgerView};
