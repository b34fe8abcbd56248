//! Profit and loss (income statement).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::is_negligible;

use crate::ledger::{
    AccountSubtype, AccountType, BalanceAggregator, BalanceMap, LedgerView, PeriodFilter,
    signed_balance,
};

use super::error::ReportError;
use super::types::{AmountRow, ReportContext, ReportHeader, ReportPeriod, StatementSection};

/// Profit and loss report for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLossReport {
    /// Report header.
    pub header: ReportHeader,
    /// Presentation rows.
    pub rows: Vec<AmountRow>,
    /// Revenue accounts (credit minus debit).
    pub revenue: StatementSection,
    /// Cost of goods sold accounts.
    pub cost_of_goods_sold: StatementSection,
    /// Revenue minus cost of goods sold.
    pub gross_profit: Decimal,
    /// Expense accounts other than cost of goods sold.
    pub operating_expenses: StatementSection,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// All expenses, cost of goods sold included.
    pub total_expenses: Decimal,
    /// Total revenue minus total expenses.
    pub net_income: Decimal,
}

/// Income statement sections for one set of period balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeStatementTotals {
    /// Revenue section.
    pub revenue: StatementSection,
    /// COGS section.
    pub cost_of_goods_sold: StatementSection,
    /// Other expenses section.
    pub operating_expenses: StatementSection,
}

impl IncomeStatementTotals {
    /// Splits period balances into revenue, COGS, and other expenses.
    #[must_use]
    pub fn from_balances(view: &LedgerView<'_>, balances: &BalanceMap) -> Self {
        let mut totals = Self::default();
        for account in view.accounts() {
            let balance = signed_balance(balances, account);
            match account.account_type {
                AccountType::Revenue => totals.revenue.add(account, balance),
                AccountType::Expense
                    if account.subtype == Some(AccountSubtype::CostOfGoodsSold) =>
                {
                    totals.cost_of_goods_sold.add(account, balance);
                }
                AccountType::Expense => totals.operating_expenses.add(account, balance),
                AccountType::Asset | AccountType::Liability | AccountType::Equity => {}
            }
        }
        totals.revenue.sort();
        totals.cost_of_goods_sold.sort();
        totals.operating_expenses.sort();
        totals
    }

    /// Expenses including COGS.
    #[must_use]
    pub fn total_expenses(&self) -> Decimal {
        self.cost_of_goods_sold.total + self.operating_expenses.total
    }

    /// Revenue minus all expenses.
    #[must_use]
    pub fn net_income(&self) -> Decimal {
        self.revenue.total - self.total_expenses()
    }
}

/// Builds the profit and loss statement for `[start, end]`.
pub fn build_profit_and_loss(
    view: &LedgerView<'_>,
    start: NaiveDate,
    end: NaiveDate,
    ctx: &ReportContext,
) -> Result<ProfitAndLossReport, ReportError> {
    let filter = PeriodFilter::between(start, end)?;
    let balances = BalanceAggregator::new(view)
        .aggregate(&filter, |account| account.account_type.is_income_statement());
    let totals = IncomeStatementTotals::from_balances(view, &balances);
    let total_expenses = totals.total_expenses();
    let net_income = totals.net_income();
    let IncomeStatementTotals {
        revenue,
        cost_of_goods_sold,
        operating_expenses,
    } = totals;

    let total_revenue = revenue.total;
    let gross_profit = total_revenue - cost_of_goods_sold.total;

    let mut rows = Vec::new();
    let has_activity = !(revenue.is_empty()
        && cost_of_goods_sold.is_empty()
        && operating_expenses.is_empty()
        && is_negligible(net_income));
    if has_activity {
        rows.push(AmountRow::header(0, "Revenue"));
        revenue.push_rows(&mut rows, 1);
        rows.push(AmountRow::subtotal(0, "Total Revenue", total_revenue));

        if !cost_of_goods_sold.is_empty() || !is_negligible(cost_of_goods_sold.total) {
            rows.push(AmountRow::header(0, "Cost of Goods Sold"));
            cost_of_goods_sold.push_rows(&mut rows, 1);
            rows.push(AmountRow::subtotal(
                0,
                "Total Cost of Goods Sold",
                cost_of_goods_sold.total,
            ));
            rows.push(AmountRow::subtotal(0, "Gross Profit", gross_profit));
        }

        rows.push(AmountRow::header(0, "Expenses"));
        operating_expenses.push_rows(&mut rows, 1);
        rows.push(AmountRow::subtotal(0, "Total Expenses", total_expenses));
        rows.push(AmountRow::total(0, "Net Income", net_income));
    }

    Ok(ProfitAndLossReport {
        header: ctx.header("Profit and Loss", ReportPeriod::Range { start, end }),
        rows,
        revenue,
        cost_of_goods_sold,
        gross_profit,
        operating_expenses,
        total_revenue,
        total_expenses,
        net_income,
    })
}
