//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Trial Balance
//! - Balance Sheet
//! - Profit and Loss
//! - Statement of Cash Flows (indirect method)
//! - General Ledger
//! - Receivables and Payables Aging

pub mod aging;
pub mod balance_sheet;
pub mod cash_flow;
pub mod error;
pub mod general_ledger;
pub mod profit_and_loss;
pub mod service;
pub mod trial_balance;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use aging::{
    AgingAmounts, AgingBucket, AgingKind, AgingReport, AgingRow, Counterparty, Document,
    DocumentStatus, build_aging,
};
pub use balance_sheet::{BalanceSheetReport, BalanceSheetSection, build_balance_sheet};
pub use cash_flow::{CashFlowItem, CashFlowReport, CashFlowSection, build_cash_flow};
pub use error::ReportError;
pub use general_ledger::{
    GeneralLedgerFilter, GeneralLedgerReport, GeneralLedgerRow, build_general_ledger,
};
pub use profit_and_loss::{ProfitAndLossReport, build_profit_and_loss};
pub use service::{Report, ReportRequest, ReportService};
pub use trial_balance::{TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals, build_trial_balance};
pub use types::*;
