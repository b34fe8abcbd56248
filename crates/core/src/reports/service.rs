//! Report request dispatch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use folio_shared::types::{AccountId, CounterpartyId};

use crate::ledger::{AccountType, calendar_date};
use crate::snapshot::LedgerSnapshot;

use super::aging::{AgingKind, AgingReport, build_aging};
use super::balance_sheet::{BalanceSheetReport, build_balance_sheet};
use super::cash_flow::{CashFlowReport, build_cash_flow};
use super::error::ReportError;
use super::general_ledger::{GeneralLedgerFilter, GeneralLedgerReport, build_general_ledger};
use super::profit_and_loss::{ProfitAndLossReport, build_profit_and_loss};
use super::trial_balance::{TrialBalanceReport, build_trial_balance};
use super::types::ReportContext;

/// A request for one report.
///
/// ```json
/// {"report": "profit_and_loss", "start": "2024-01-01", "end": "2024-12-31"}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum ReportRequest {
    /// Trial balance as of a date.
    TrialBalance {
        /// Cutoff date.
        #[serde(with = "calendar_date")]
        as_of: NaiveDate,
    },
    /// Balance sheet as of a date.
    BalanceSheet {
        /// Cutoff date.
        #[serde(with = "calendar_date")]
        as_of: NaiveDate,
    },
    /// Profit and loss for a period.
    ProfitAndLoss {
        /// First day.
        #[serde(with = "calendar_date")]
        start: NaiveDate,
        /// Last day.
        #[serde(with = "calendar_date")]
        end: NaiveDate,
    },
    /// Statement of cash flows for a period.
    CashFlow {
        /// First day.
        #[serde(with = "calendar_date")]
        start: NaiveDate,
        /// Last day.
        #[serde(with = "calendar_date")]
        end: NaiveDate,
    },
    /// General ledger for a period.
    GeneralLedger {
        /// First day.
        #[serde(with = "calendar_date")]
        start: NaiveDate,
        /// Last day.
        #[serde(with = "calendar_date")]
        end: NaiveDate,
        /// Single account.
        #[serde(default)]
        account_id: Option<AccountId>,
        /// Account type.
        #[serde(default)]
        account_type: Option<AccountType>,
    },
    /// Receivables aging as of a date.
    ReceivablesAging {
        /// Aging date.
        #[serde(with = "calendar_date")]
        as_of: NaiveDate,
        /// Single counterparty.
        #[serde(default)]
        counterparty_id: Option<CounterpartyId>,
    },
    /// Payables aging as of a date.
    PayablesAging {
        /// Aging date.
        #[serde(with = "calendar_date")]
        as_of: NaiveDate,
        /// Single counterparty.
        #[serde(default)]
        counterparty_id: Option<CounterpartyId>,
    },
}

impl ReportRequest {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TrialBalance { .. } => "trial_balance",
            Self::BalanceSheet { .. } => "balance_sheet",
            Self::ProfitAndLoss { .. } => "profit_and_loss",
            Self::CashFlow { .. } => "cash_flow",
            Self::GeneralLedger { .. } => "general_ledger",
            Self::ReceivablesAging { .. } => "receivables_aging",
            Self::PayablesAging { .. } => "payables_aging",
        }
    }
}

/// A generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    /// Trial balance.
    TrialBalance(TrialBalanceReport),
    /// Balance sheet.
    BalanceSheet(BalanceSheetReport),
    /// Profit and loss.
    ProfitAndLoss(ProfitAndLossReport),
    /// Statement of cash flows.
    CashFlow(CashFlowReport),
    /// General ledger.
    GeneralLedger(GeneralLedgerReport),
    /// Receivables aging.
    ReceivablesAging(AgingReport),
    /// Payables aging.
    PayablesAging(AgingReport),
}

impl Report {
    /// Number of presentation rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self {
            Self::TrialBalance(r) => r.rows.len(),
            Self::BalanceSheet(r) => r.rows.len(),
            Self::ProfitAndLoss(r) => r.rows.len(),
            Self::CashFlow(r) => r.rows.len(),
            Self::GeneralLedger(r) => r.rows.len(),
            Self::ReceivablesAging(r) | Self::PayablesAging(r) => r.rows.len(),
        }
    }

    /// Data-quality warning, if an invariant check failed.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::TrialBalance(r) => r.warning.as_deref(),
            Self::BalanceSheet(r) => r.check.warning.as_deref(),
            Self::CashFlow(r) => r.reconciliation.warning.as_deref(),
            Self::ProfitAndLoss(_)
            | Self::GeneralLedger(_)
            | Self::ReceivablesAging(_)
            | Self::PayablesAging(_) => None,
        }
    }
}

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates the requested report from a snapshot.
    ///
    /// Ledger reports resolve the chart of accounts first and fail on any
    /// configuration problem; aging reports never touch the journal.
    pub fn generate(
        request: &ReportRequest,
        snapshot: &LedgerSnapshot,
        ctx: &ReportContext,
    ) -> Result<Report, ReportError> {
        let report = match *request {
            ReportRequest::TrialBalance { as_of } => {
                Report::TrialBalance(build_trial_balance(&snapshot.view()?, as_of, ctx))
            }
            ReportRequest::BalanceSheet { as_of } => {
                Report::BalanceSheet(build_balance_sheet(&snapshot.view()?, as_of, ctx))
            }
            ReportRequest::ProfitAndLoss { start, end } => Report::ProfitAndLoss(
                build_profit_and_loss(&snapshot.view()?, start, end, ctx)?,
            ),
            ReportRequest::CashFlow { start, end } => {
                Report::CashFlow(build_cash_flow(&snapshot.view()?, start, end, ctx)?)
            }
            ReportRequest::GeneralLedger {
                start,
                end,
                account_id,
                account_type,
            } => {
                let filter = GeneralLedgerFilter {
                    account_id,
                    account_type,
                };
                Report::GeneralLedger(build_general_ledger(
                    &snapshot.view()?,
                    start,
                    end,
                    filter,
                    ctx,
                )?)
            }
            ReportRequest::ReceivablesAging {
                as_of,
                counterparty_id,
            } => Report::ReceivablesAging(build_aging(
                AgingKind::Receivables,
                &snapshot.invoices,
                &snapshot.customers,
                as_of,
                counterparty_id,
                ctx,
            )),
            ReportRequest::PayablesAging {
                as_of,
                counterparty_id,
            } => Report::PayablesAging(build_aging(
                AgingKind::Payables,
                &snapshot.bills,
                &snapshot.vendors,
                as_of,
                counterparty_id,
                ctx,
            )),
        };

        if let Some(warning) = report.warning() {
            warn!(report = request.name(), warning, "Report invariant check failed");
        }
        debug!(
            report = request.name(),
            rows = report.row_count(),
            "Report generated"
        );

        Ok(report)
    }
}
