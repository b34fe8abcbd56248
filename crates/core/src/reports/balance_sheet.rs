//! Balance sheet.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::is_negligible;

use crate::ledger::{
    AccountSubtype, AccountType, BalanceAggregator, BalanceMap, ClassifiedAccount, LedgerView,
    signed_balance,
};

use super::types::{
    AmountRow, BalanceCheck, ReportContext, ReportHeader, ReportPeriod, StatementSection,
    account_order,
};

/// A named group of accounts within a balance sheet section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSubsection {
    /// Subsection name (e.g., "Current Assets").
    pub name: String,
    /// Lines and total.
    #[serde(flatten)]
    pub section: StatementSection,
}

/// Assets, liabilities, or equity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Subsections with at least one account.
    pub subsections: Vec<BalanceSheetSubsection>,
}

impl BalanceSheetSection {
    fn add(&mut self, subsection: &str, account: &ClassifiedAccount, balance: Decimal) {
        self.total += balance;
        let index = match self.subsections.iter().position(|s| s.name == subsection) {
            Some(index) => index,
            None => {
                self.subsections.push(BalanceSheetSubsection {
                    name: subsection.to_string(),
                    section: StatementSection::default(),
                });
                self.subsections.len() - 1
            }
        };
        self.subsections[index].section.add(account, balance);
    }

    fn sort(&mut self) {
        self.subsections.sort_by_key(|s| {
            SUBSECTION_ORDER
                .iter()
                .position(|name| *name == s.name)
                .unwrap_or(SUBSECTION_ORDER.len())
        });
    }

    fn has_lines(&self) -> bool {
        self.subsections.iter().any(|s| !s.section.is_empty())
    }

    fn push_rows(&self, rows: &mut Vec<AmountRow>, title: &str) {
        rows.push(AmountRow::header(0, title));
        for subsection in self.subsections.iter().filter(|s| !s.section.is_empty()) {
            rows.push(AmountRow::header(1, subsection.name.clone()));
            subsection.section.push_rows(rows, 2);
            rows.push(AmountRow::subtotal(
                1,
                format!("Total {}", subsection.name),
                subsection.section.total,
            ));
        }
    }
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report header.
    pub header: ReportHeader,
    /// Presentation rows.
    pub rows: Vec<AmountRow>,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section, excluding retained earnings.
    pub equity: BalanceSheetSection,
    /// Cumulative net income to date.
    pub retained_earnings: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total of equity accounts.
    pub total_equity: Decimal,
    /// Liabilities plus equity plus retained earnings.
    pub liabilities_and_equity: Decimal,
    /// Accounting equation check (assets minus liabilities and equity).
    pub check: BalanceCheck,
}

/// Presentation order of subsections.
const SUBSECTION_ORDER: [&str; 6] = [
    "Current Assets",
    "Fixed Assets",
    "Other Assets",
    "Current Liabilities",
    "Long-term Liabilities",
    "Equity",
];

/// Subsection an asset or liability is reported under.
fn subsection_for(account: &ClassifiedAccount) -> &'static str {
    use AccountSubtype as S;

    match (account.account_type, account.subtype.as_ref()) {
        (
            AccountType::Asset,
            Some(
                S::Cash | S::Bank | S::AccountsReceivable | S::Inventory | S::Prepaid | S::CurrentAsset,
            ),
        ) => "Current Assets",
        (AccountType::Asset, Some(S::FixedAsset | S::AccumulatedDepreciation)) => "Fixed Assets",
        (AccountType::Asset, _) => "Other Assets",
        (AccountType::Liability, Some(S::LongTermDebt)) => "Long-term Liabilities",
        (AccountType::Liability, _) => "Current Liabilities",
        (AccountType::Equity | AccountType::Revenue | AccountType::Expense, _) => "Equity",
    }
}

/// Cumulative revenue minus cumulative expenses.
fn retained_earnings(view: &LedgerView<'_>, balances: &BalanceMap) -> Decimal {
    view.accounts()
        .filter(|account| account.account_type.is_income_statement())
        .map(|account| {
            let balance = signed_balance(balances, account);
            if account.account_type == AccountType::Revenue {
                balance
            } else {
                -balance
            }
        })
        .sum()
}

/// Builds the balance sheet as of `as_of`.
#[must_use]
pub fn build_balance_sheet(
    view: &LedgerView<'_>,
    as_of: NaiveDate,
    ctx: &ReportContext,
) -> BalanceSheetReport {
    let balances = BalanceAggregator::new(view).cumulative(as_of);

    let mut accounts: Vec<_> = view
        .accounts()
        .filter(|account| !account.account_type.is_income_statement())
        .collect();
    accounts.sort_by(|a, b| account_order(a, b));

    let mut assets = BalanceSheetSection::default();
    let mut liabilities = BalanceSheetSection::default();
    let mut equity = BalanceSheetSection::default();

    for account in accounts {
        let balance = signed_balance(&balances, account);
        let subsection = subsection_for(account);
        match account.account_type {
            AccountType::Asset => assets.add(subsection, account, balance),
            AccountType::Liability => liabilities.add(subsection, account, balance),
            AccountType::Equity => equity.add(subsection, account, balance),
            AccountType::Revenue | AccountType::Expense => {}
        }
    }

    assets.sort();
    liabilities.sort();

    let retained_earnings = retained_earnings(view, &balances);
    let total_assets = assets.total;
    let total_liabilities = liabilities.total;
    let total_equity = equity.total;
    let liabilities_and_equity = total_liabilities + total_equity + retained_earnings;

    let check = BalanceCheck::compare(total_assets, liabilities_and_equity, |difference| {
        format!(
            "Balance sheet does not balance: assets {total_assets} differ from liabilities and equity {liabilities_and_equity} by {difference}"
        )
    });

    let mut rows = Vec::new();
    if assets.has_lines()
        || liabilities.has_lines()
        || equity.has_lines()
        || !is_negligible(retained_earnings)
    {
        assets.push_rows(&mut rows, "Assets");
        rows.push(AmountRow::total(0, "Total Assets", total_assets));

        liabilities.push_rows(&mut rows, "Liabilities");
        rows.push(AmountRow::subtotal(0, "Total Liabilities", total_liabilities));

        rows.push(AmountRow::header(0, "Equity"));
        for subsection in &equity.subsections {
            subsection.section.push_rows(&mut rows, 1);
        }
        if !is_negligible(retained_earnings) {
            rows.push(AmountRow::line(1, "Retained Earnings", None, retained_earnings));
        }
        rows.push(AmountRow::subtotal(
            0,
            "Total Equity",
            total_equity + retained_earnings,
        ));
        rows.push(AmountRow::total(
            0,
            "Total Liabilities and Equity",
            liabilities_and_equity,
        ));
    }

    BalanceSheetReport {
        header: ctx.header("Balance Sheet", ReportPeriod::AsOf { as_of }),
        rows,
        assets,
        liabilities,
        equity,
        retained_earnings,
        total_assets,
        total_liabilities,
        total_equity,
        liabilities_and_equity,
        check,
    }
}
