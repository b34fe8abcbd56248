//! Read-only input snapshot.

use serde::{Deserialize, Serialize};

use crate::ledger::{Account, JournalEntry, JournalEntryLine, LedgerError, LedgerView};
use crate::reports::aging::{Counterparty, Document};

/// Everything one report run reads, as supplied by the data layer.
///
/// Every collection defaults to empty so partial snapshots (e.g., aging
/// only) deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Chart of accounts.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Journal entry headers.
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    /// Journal entry lines.
    #[serde(default)]
    pub journal_lines: Vec<JournalEntryLine>,
    /// Customer invoices.
    #[serde(default)]
    pub invoices: Vec<Document>,
    /// Vendor bills.
    #[serde(default)]
    pub bills: Vec<Document>,
    /// Customers.
    #[serde(default)]
    pub customers: Vec<Counterparty>,
    /// Vendors.
    #[serde(default)]
    pub vendors: Vec<Counterparty>,
}

impl LedgerSnapshot {
    /// Resolves the chart and joins lines to entries.
    pub fn view(&self) -> Result<LedgerView<'_>, LedgerError> {
        LedgerView::new(&self.accounts, &self.journal_entries, &self.journal_lines)
    }
}
