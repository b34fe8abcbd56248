//! Ledger input records.
//!
//! These mirror what the data layer hands over: classification values are
//! still raw strings here and are resolved by
//! [`ClassifiedAccount::resolve`](super::classifier::ClassifiedAccount::resolve).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::{AccountId, JournalEntryId, JournalLineId};

use super::period::calendar_date;

/// Chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Optional account code (e.g., "1000").
    #[serde(default)]
    pub code: Option<String>,
    /// Display name.
    pub name: String,
    /// Account type (asset, liability, equity, revenue, expense).
    #[serde(rename = "type")]
    pub account_type: String,
    /// Optional subtype (bank, accounts_receivable, fixed_asset, ...).
    #[serde(default)]
    pub subtype: Option<String>,
    /// Optional cash flow tag (operating, investing, financing).
    #[serde(default)]
    pub cash_flow_category: Option<String>,
}

/// One balanced accounting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Transaction date (calendar day).
    #[serde(with = "calendar_date")]
    pub transaction_date: NaiveDate,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Optional reference (e.g., invoice or cheque number).
    #[serde(default)]
    pub reference: Option<String>,
}

/// One debit or credit against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryLine {
    /// Line ID.
    pub id: JournalLineId,
    /// Owning journal entry.
    pub journal_entry_id: JournalEntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Debit amount (zero when this is a credit line).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (zero when this is a debit line).
    #[serde(default)]
    pub credit: Decimal,
    /// Optional line memo.
    #[serde(default)]
    pub description: Option<String>,
}
