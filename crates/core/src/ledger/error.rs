//! Ledger error types.
//!
//! Every variant here is a configuration problem in the supplied snapshot:
//! the engine refuses to build a report rather than guess.

use chrono::NaiveDate;
use folio_shared::types::{AccountId, JournalEntryId, JournalLineId};
use thiserror::Error;

/// Errors raised while resolving a ledger snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Classification Errors ==========
    /// Account type string is not one of the five account types.
    #[error("Account {account_id} has unknown account type '{value}'")]
    UnknownAccountType {
        /// The offending account.
        account_id: AccountId,
        /// The raw type string.
        value: String,
    },

    /// Account carries a cash-flow category tag that is not recognised.
    #[error("Account {account_id} has unknown cash flow category '{value}'")]
    UnknownCashFlowCategory {
        /// The offending account.
        account_id: AccountId,
        /// The raw category string.
        value: String,
    },

    /// Two accounts share one id.
    #[error("Duplicate account id: {0}")]
    DuplicateAccount(AccountId),

    // ========== Reference Errors ==========
    /// A journal line points at an account that is not in the chart.
    #[error("Journal line {line_id} references unknown account {account_id}")]
    AccountNotFound {
        /// The dangling line.
        line_id: JournalLineId,
        /// The missing account.
        account_id: AccountId,
    },

    /// A journal line points at a journal entry that is not in the snapshot.
    #[error("Journal line {line_id} references unknown journal entry {entry_id}")]
    JournalEntryNotFound {
        /// The dangling line.
        line_id: JournalLineId,
        /// The missing entry.
        entry_id: JournalEntryId,
    },

    // ========== Date Errors ==========
    /// A date string could not be decomposed into year, month, and day.
    #[error("Invalid calendar date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Range start falls after range end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}
