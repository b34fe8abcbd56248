//! Trial balance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::{AccountId, is_negligible};

use crate::ledger::{AccountType, BalanceAggregator, LedgerView, NormalSide};

use super::types::{BalanceCheck, ReportContext, ReportHeader, ReportPeriod, RowKind, account_order};

/// One trial balance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Row role.
    pub kind: RowKind,
    /// Indent level.
    pub indent: u8,
    /// Account, for line rows.
    pub account_id: Option<AccountId>,
    /// Account code.
    pub code: Option<String>,
    /// Account name or row label.
    pub name: String,
    /// Account type, for line rows.
    pub account_type: Option<AccountType>,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance column totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Debits minus credits.
    pub difference: Decimal,
    /// Whether debits equal credits within tolerance.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report header.
    pub header: ReportHeader,
    /// Account rows with a non-negligible balance, followed by a total row.
    pub rows: Vec<TrialBalanceRow>,
    /// Column totals.
    pub totals: TrialBalanceTotals,
    /// Set when the columns disagree.
    pub warning: Option<String>,
}

/// Places a net balance into the debit or credit column.
///
/// A debit-normal account with a credit balance lands in the credit column,
/// and vice versa.
#[must_use]
pub fn columns(side: NormalSide, debit_total: Decimal, credit_total: Decimal) -> (Decimal, Decimal) {
    let balance = side.signed_balance(debit_total, credit_total);
    match (side, balance >= Decimal::ZERO) {
        (NormalSide::Debit, true) => (balance, Decimal::ZERO),
        (NormalSide::Debit, false) => (Decimal::ZERO, -balance),
        (NormalSide::Credit, true) => (Decimal::ZERO, balance),
        (NormalSide::Credit, false) => (-balance, Decimal::ZERO),
    }
}

/// Builds the trial balance as of `as_of`, cumulative over all prior activity.
#[must_use]
pub fn build_trial_balance(
    view: &LedgerView<'_>,
    as_of: NaiveDate,
    ctx: &ReportContext,
) -> TrialBalanceReport {
    let balances = BalanceAggregator::new(view).cumulative(as_of);

    let mut accounts: Vec<_> = view
        .accounts()
        .filter_map(|account| {
            let totals = balances.get(&account.id)?;
            (!totals.is_empty()).then_some((account, *totals))
        })
        .collect();
    accounts.sort_by(|(a, _), (b, _)| account_order(a, b));

    let mut rows = Vec::with_capacity(accounts.len() + 1);
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    // Sub-cent balances still count toward the column totals.
    for (account, totals) in accounts {
        let (debit, credit) = columns(account.normal_side(), totals.debit_total, totals.credit_total);
        total_debit += debit;
        total_credit += credit;
        if is_negligible(totals.net_debit()) {
            continue;
        }
        rows.push(TrialBalanceRow {
            kind: RowKind::Line,
            indent: 0,
            account_id: Some(account.id),
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: Some(account.account_type),
            debit,
            credit,
        });
    }

    if !rows.is_empty() {
        rows.push(TrialBalanceRow {
            kind: RowKind::Total,
            indent: 0,
            account_id: None,
            code: None,
            name: "Total".to_string(),
            account_type: None,
            debit: total_debit,
            credit: total_credit,
        });
    }

    let check = BalanceCheck::compare(total_debit, total_credit, |difference| {
        format!(
            "Trial balance is out of balance by {difference}: debits {total_debit}, credits {total_credit}"
        )
    });

    TrialBalanceReport {
        header: ctx.header("Trial Balance", ReportPeriod::AsOf { as_of }),
        rows,
        totals: TrialBalanceTotals {
            total_debit,
            total_credit,
            difference: check.difference,
            is_balanced: check.is_balanced,
        },
        warning: check.warning,
    }
}
