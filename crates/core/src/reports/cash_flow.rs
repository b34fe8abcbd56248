//! Statement of cash flows (indirect method).
//!
//! Starts from net income, adds back depreciation, then converts each
//! balance sheet account's period change into a cash impact:
//!
//! | Account        | Cash impact         |
//! |----------------|---------------------|
//! | Asset          | `-change`           |
//! | Liability      | `+change`           |
//! | Equity         | `+change`           |
//! | Equity draws   | `-abs(change)`      |
//!
//! The computed net change is reconciled against the actual movement of the
//! cash accounts. A mismatch is reported, never raised.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::{AccountId, is_negligible};

use crate::ledger::{
    AccountType, BalanceAggregator, CashFlowCategory, CashFlowRole, ClassificationSource,
    ClassifiedAccount, LedgerView, PeriodFilter, classify_cash_flow, is_depreciation_expense,
    is_equity_draw, signed_balance,
};

use super::error::ReportError;
use super::profit_and_loss::IncomeStatementTotals;
use super::types::{
    AmountRow, BalanceCheck, ReportContext, ReportHeader, ReportPeriod, account_order,
};

/// One balance sheet movement reported under an activity section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowItem {
    /// Account behind the movement.
    pub account_id: AccountId,
    /// Row label (e.g., "Increase in Accounts Receivable").
    pub label: String,
    /// Change in the account's normal-signed balance.
    pub change: Decimal,
    /// Effect on cash.
    pub cash_impact: Decimal,
    /// How the account was classified.
    pub source: ClassificationSource,
}

/// Operating, investing, or financing activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSection {
    /// Activity category.
    pub category: CashFlowCategory,
    /// Items, largest absolute impact first.
    pub items: Vec<CashFlowItem>,
    /// Sum of item impacts.
    pub total: Decimal,
}

impl CashFlowSection {
    fn new(category: CashFlowCategory) -> Self {
        Self {
            category,
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    fn push(&mut self, item: CashFlowItem) {
        self.total += item.cash_impact;
        self.items.push(item);
    }

    fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            b.cash_impact
                .abs()
                .cmp(&a.cash_impact.abs())
                .then_with(|| a.label.cmp(&b.label))
        });
    }

    fn push_rows(&self, rows: &mut Vec<AmountRow>) {
        rows.extend(self.items.iter().map(|item| {
            AmountRow::line(1, item.label.clone(), Some(item.account_id), item.cash_impact)
        }));
    }
}

/// A balance sheet account that moved but has no cash flow classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnclassifiedMovement {
    /// Account ID.
    pub account_id: AccountId,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Change in the normal-signed balance.
    pub change: Decimal,
    /// Cash impact the movement would have had if classified.
    pub cash_impact: Decimal,
}

/// Opening and closing balance of one cash account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account name.
    pub name: String,
    /// Balance strictly before the period start.
    pub beginning: Decimal,
    /// Balance at the period end.
    pub ending: Decimal,
    /// How the account was recognised as cash.
    pub source: ClassificationSource,
}

/// Statement of cash flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// Report header.
    pub header: ReportHeader,
    /// Presentation rows.
    pub rows: Vec<AmountRow>,
    /// Net income for the period.
    pub net_income: Decimal,
    /// Depreciation and amortization added back.
    pub depreciation_adjustment: Decimal,
    /// Operating working-capital movements.
    pub operating: CashFlowSection,
    /// Investing movements.
    pub investing: CashFlowSection,
    /// Financing movements.
    pub financing: CashFlowSection,
    /// Net income plus depreciation plus operating movements.
    pub net_operating_cash_flow: Decimal,
    /// Investing total.
    pub net_investing_cash_flow: Decimal,
    /// Financing total.
    pub net_financing_cash_flow: Decimal,
    /// Sum of the three activity totals.
    pub net_cash_change: Decimal,
    /// Cash strictly before the period start.
    pub beginning_cash: Decimal,
    /// Cash at the period end.
    pub ending_cash: Decimal,
    /// Ending cash minus beginning cash.
    pub actual_cash_change: Decimal,
    /// Accounts treated as cash.
    pub cash_accounts: Vec<CashAccountBalance>,
    /// Accounts whose movement could not be placed in any section.
    pub unclassified: Vec<UnclassifiedMovement>,
    /// Computed change versus actual change.
    pub reconciliation: BalanceCheck,
}

/// Cash effect of a change in a balance sheet account.
#[must_use]
pub fn cash_impact(account: &ClassifiedAccount, change: Decimal) -> Decimal {
    match account.account_type {
        AccountType::Asset => -change,
        AccountType::Equity if is_equity_draw(account) => -change.abs(),
        AccountType::Liability | AccountType::Equity => change,
        AccountType::Revenue | AccountType::Expense => Decimal::ZERO,
    }
}

fn item_label(account: &ClassifiedAccount, category: CashFlowCategory, change: Decimal) -> String {
    let increased = change > Decimal::ZERO;
    let name = &account.name;
    match (category, account.account_type) {
        (CashFlowCategory::Investing, AccountType::Asset) if increased => {
            format!("Purchase of {name}")
        }
        (CashFlowCategory::Investing, AccountType::Asset) => format!("Sale of {name}"),
        (CashFlowCategory::Financing, AccountType::Liability) if increased => {
            format!("Proceeds from {name}")
        }
        (CashFlowCategory::Financing, AccountType::Liability) => format!("Repayment of {name}"),
        (CashFlowCategory::Financing, AccountType::Equity) if is_equity_draw(account) => {
            format!("Distributions: {name}")
        }
        (CashFlowCategory::Financing, AccountType::Equity) if increased => {
            format!("Contributions to {name}")
        }
        (CashFlowCategory::Financing, AccountType::Equity) => format!("Withdrawals from {name}"),
        _ if increased => format!("Increase in {name}"),
        _ => format!("Decrease in {name}"),
    }
}

fn reconciliation_warning(
    discrepancy: Decimal,
    net_cash_change: Decimal,
    actual_cash_change: Decimal,
    unclassified: &[UnclassifiedMovement],
) -> String {
    let cause = if unclassified.is_empty() {
        "a transaction may touch cash through an account the statement cannot place".to_string()
    } else {
        let names: Vec<_> = unclassified.iter().map(|m| m.name.as_str()).collect();
        format!("assign a cash flow category to: {}", names.join(", "))
    };
    format!(
        "Cash flow does not reconcile: computed net change {net_cash_change} differs from actual cash change {actual_cash_change} by {discrepancy}; {cause}"
    )
}

/// Builds the statement of cash flows for `[start, end]`.
pub fn build_cash_flow(
    view: &LedgerView<'_>,
    start: NaiveDate,
    end: NaiveDate,
    ctx: &ReportContext,
) -> Result<CashFlowReport, ReportError> {
    let period = PeriodFilter::between(start, end)?;
    let aggregator = BalanceAggregator::new(view);
    let opening = aggregator.opening(start);
    let closing = aggregator.cumulative(end);
    let activity = aggregator.period(&period);

    let net_income = IncomeStatementTotals::from_balances(view, &activity).net_income();
    let depreciation_adjustment: Decimal = view
        .accounts()
        .filter(|account| is_depreciation_expense(account))
        .filter_map(|account| activity.get(&account.id))
        .map(|totals| totals.debit_total)
        .sum();

    let mut accounts: Vec<_> = view.accounts().collect();
    accounts.sort_by(|a, b| account_order(a, b));

    let mut operating = CashFlowSection::new(CashFlowCategory::Operating);
    let mut investing = CashFlowSection::new(CashFlowCategory::Investing);
    let mut financing = CashFlowSection::new(CashFlowCategory::Financing);
    let mut cash_accounts = Vec::new();
    let mut unclassified = Vec::new();
    let mut beginning_cash = Decimal::ZERO;
    let mut ending_cash = Decimal::ZERO;

    for account in accounts {
        let classification = classify_cash_flow(account);
        let beginning = signed_balance(&opening, account);
        let ending = signed_balance(&closing, account);
        let change = ending - beginning;

        match (classification.role, classification.source) {
            (CashFlowRole::Cash, Some(source)) => {
                beginning_cash += beginning;
                ending_cash += ending;
                cash_accounts.push(CashAccountBalance {
                    account_id: account.id,
                    name: account.name.clone(),
                    beginning,
                    ending,
                    source,
                });
            }
            (CashFlowRole::Activity(category), Some(source)) if !is_negligible(change) => {
                let item = CashFlowItem {
                    account_id: account.id,
                    label: item_label(account, category, change),
                    change,
                    cash_impact: cash_impact(account, change),
                    source,
                };
                match category {
                    CashFlowCategory::Operating => operating.push(item),
                    CashFlowCategory::Investing => investing.push(item),
                    CashFlowCategory::Financing => financing.push(item),
                }
            }
            (CashFlowRole::Unclassified, _) if !is_negligible(change) => {
                unclassified.push(UnclassifiedMovement {
                    account_id: account.id,
                    name: account.name.clone(),
                    account_type: account.account_type,
                    change,
                    cash_impact: cash_impact(account, change),
                });
            }
            _ => {}
        }
    }

    operating.sort();
    investing.sort();
    financing.sort();

    let net_operating_cash_flow = net_income + depreciation_adjustment + operating.total;
    let net_investing_cash_flow = investing.total;
    let net_financing_cash_flow = financing.total;
    let net_cash_change = net_operating_cash_flow + net_investing_cash_flow + net_financing_cash_flow;
    let actual_cash_change = ending_cash - beginning_cash;

    let reconciliation = BalanceCheck::compare(net_cash_change, actual_cash_change, |discrepancy| {
        reconciliation_warning(discrepancy, net_cash_change, actual_cash_change, &unclassified)
    });

    let is_empty = operating.items.is_empty()
        && investing.items.is_empty()
        && financing.items.is_empty()
        && unclassified.is_empty()
        && [net_income, depreciation_adjustment, beginning_cash, ending_cash]
            .into_iter()
            .all(is_negligible);

    let mut rows = Vec::new();
    if !is_empty {
        rows.push(AmountRow::header(0, CashFlowCategory::Operating.label()));
        rows.push(AmountRow::line(1, "Net Income", None, net_income));
        if !is_negligible(depreciation_adjustment) {
            rows.push(AmountRow::line(
                1,
                "Depreciation and Amortization",
                None,
                depreciation_adjustment,
            ));
        }
        operating.push_rows(&mut rows);
        rows.push(AmountRow::subtotal(
            0,
            "Net Cash from Operating Activities",
            net_operating_cash_flow,
        ));

        rows.push(AmountRow::header(0, CashFlowCategory::Investing.label()));
        investing.push_rows(&mut rows);
        rows.push(AmountRow::subtotal(
            0,
            "Net Cash from Investing Activities",
            net_investing_cash_flow,
        ));

        rows.push(AmountRow::header(0, CashFlowCategory::Financing.label()));
        financing.push_rows(&mut rows);
        rows.push(AmountRow::subtotal(
            0,
            "Net Cash from Financing Activities",
            net_financing_cash_flow,
        ));

        rows.push(AmountRow::total(0, "Net Change in Cash", net_cash_change));
        rows.push(AmountRow::line(0, "Cash at Beginning of Period", None, beginning_cash));
        rows.push(AmountRow::total(0, "Cash at End of Period", ending_cash));
    }

    Ok(CashFlowReport {
        header: ctx.header("Statement of Cash Flows", ReportPeriod::Range { start, end }),
        rows,
        net_income,
        depreciation_adjustment,
        operating,
        investing,
        financing,
        net_operating_cash_flow,
        net_investing_cash_flow,
        net_financing_cash_flow,
        net_cash_change,
        beginning_cash,
        ending_cash,
        actual_cash_change,
        cash_accounts,
        unclassified,
        reconciliation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::{Books, context, date};
    use rust_decimal_macros::dec;

    struct Company {
        books: Books,
        cash: AccountId,
        escrow: AccountId,
    }

    /// A small business: capital before the period, then a loan, an
    /// equipment purchase, credit sales partly collected, and depreciation.
    fn company() -> Company {
        let mut books = Books::new();
        let cash = books.account_with("Operating Account", "asset", Some("bank"), None);
        let receivables = books.account_with(
            "Accounts Receivable",
            "asset",
            Some("accounts_receivable"),
            None,
        );
        let equipment = books.account_with("Equipment", "asset", Some("fixed_asset"), None);
        let accumulated = books.account_with(
            "Accumulated Depreciation",
            "asset",
            Some("accumulated_depreciation"),
            None,
        );
        let escrow = books.account("Escrow Holding", "asset");
        let loan = books.account_with("Bank Loan", "liability", Some("long_term_debt"), None);
        let capital = books.account("Owner Capital", "equity");
        let sales = books.account("Sales", "revenue");
        let depreciation =
            books.account_with("Depreciation Expense", "expense", Some("depreciation"), None);

        books.transfer(date(2023, 12, 31), cash, capital, dec!(10000));
        books.transfer(date(2024, 1, 5), cash, loan, dec!(5000));
        books.transfer(date(2024, 2, 1), equipment, cash, dec!(3000));
        books.transfer(date(2024, 3, 1), receivables, sales, dec!(2000));
        books.transfer(date(2024, 3, 15), cash, receivables, dec!(1500));
        books.transfer(date(2024, 12, 31), depreciation, accumulated, dec!(600));

        Company {
            books,
            cash,
            escrow,
        }
    }

    fn run(books: &Books) -> CashFlowReport {
        build_cash_flow(&books.view(), date(2024, 1, 1), date(2024, 12, 31), &context()).unwrap()
    }

    #[test]
    fn test_fully_classified_books_reconcile() {
        let company = company();
        let report = run(&company.books);

        assert_eq!(report.net_income, dec!(1400));
        assert_eq!(report.depreciation_adjustment, dec!(600));
        assert_eq!(report.net_operating_cash_flow, dec!(1500));
        assert_eq!(report.net_investing_cash_flow, dec!(-3000));
        assert_eq!(report.net_financing_cash_flow, dec!(5000));
        assert_eq!(report.net_cash_change, dec!(3500));
        assert_eq!(report.beginning_cash, dec!(10000));
        assert_eq!(report.ending_cash, dec!(13500));
        assert!(report.reconciliation.is_balanced);
        assert!(report.unclassified.is_empty());
    }

    #[test]
    fn test_item_labels_and_sources() {
        let company = company();
        let report = run(&company.books);

        let operating = &report.operating.items[0];
        assert_eq!(operating.label, "Increase in Accounts Receivable");
        assert_eq!(operating.cash_impact, dec!(-500));
        assert_eq!(operating.source, ClassificationSource::Inferred);

        assert_eq!(report.investing.items[0].label, "Purchase of Equipment");
        assert_eq!(report.financing.items[0].label, "Proceeds from Bank Loan");
    }

    #[test]
    fn test_section_items_sorted_by_absolute_impact() {
        let mut books = Books::new();
        let cash = books.account_with("Cash", "asset", Some("cash"), None);
        let receivables = books.account_with(
            "Accounts Receivable",
            "asset",
            Some("accounts_receivable"),
            None,
        );
        let inventory = books.account_with("Inventory", "asset", Some("inventory"), None);
        let payable =
            books.account_with("Accounts Payable", "liability", Some("accounts_payable"), None);
        let accrued =
            books.account_with("Accrued Wages", "liability", Some("accrued_liability"), None);
        let sales = books.account("Sales", "revenue");
        let wages = books.account("Wages", "expense");

        books.transfer(date(2024, 2, 1), receivables, sales, dec!(500));
        books.post(
            date(2024, 3, 1),
            None,
            &[
                (inventory, dec!(1200), dec!(0)),
                (payable, dec!(0), dec!(800)),
                (cash, dec!(0), dec!(400)),
            ],
        );
        books.transfer(date(2024, 4, 30), wages, accrued, dec!(500));

        let report = run(&books);

        let order: Vec<_> = report
            .operating
            .items
            .iter()
            .map(|item| (item.label.as_str(), item.cash_impact))
            .collect();
        assert_eq!(
            order,
            [
                ("Increase in Inventory", dec!(-1200)),
                ("Increase in Accounts Payable", dec!(800)),
                ("Increase in Accounts Receivable", dec!(-500)),
                ("Increase in Accrued Wages", dec!(500)),
            ]
        );
        assert_eq!(report.operating.total, dec!(-400));
        assert!(report.reconciliation.is_balanced);
    }

    #[test]
    fn test_unclassified_account_explains_discrepancy() {
        let mut company = company();
        company
            .books
            .transfer(date(2024, 6, 1), company.escrow, company.cash, dec!(700));

        let report = run(&company.books);

        assert!(!report.reconciliation.is_balanced);
        assert_eq!(report.reconciliation.difference.abs(), dec!(700));
        assert_eq!(report.unclassified.len(), 1);
        assert_eq!(report.unclassified[0].change, dec!(700));
        assert_eq!(report.unclassified[0].cash_impact, dec!(-700));
        let warning = report.reconciliation.warning.unwrap();
        assert!(warning.contains("Escrow Holding"));
    }

    #[test]
    fn test_tag_moves_account_into_section() {
        let mut books = Books::new();
        let cash = books.account_with("Cash", "asset", Some("cash"), None);
        let escrow = books.account_with("Escrow Holding", "asset", None, Some("Investing"));
        books.transfer(date(2024, 1, 1), escrow, cash, dec!(250));

        let report = run(&books);

        assert!(report.reconciliation.is_balanced);
        let item = &report.investing.items[0];
        assert_eq!(item.cash_impact, dec!(-250));
        assert_eq!(item.source, ClassificationSource::Tagged);
    }

    #[test]
    fn test_heuristic_classification_is_flagged() {
        let mut books = Books::new();
        let cash = books.account_with("Cash", "asset", Some("cash"), None);
        let truck = books.account("Delivery Vehicle", "asset");
        books.transfer(date(2024, 4, 1), truck, cash, dec!(8000));

        let report = run(&books);

        let item = &report.investing.items[0];
        assert_eq!(item.source, ClassificationSource::Heuristic);
        assert!(report.reconciliation.is_balanced);
    }

    #[test]
    fn test_owner_draws_reduce_cash() {
        let mut books = Books::new();
        let cash = books.account_with("Cash", "asset", Some("cash"), None);
        let capital = books.account("Owner Capital", "equity");
        let draws = books.account("Owner Draws", "equity");
        books.transfer(date(2023, 6, 1), cash, capital, dec!(1000));
        books.transfer(date(2024, 2, 1), draws, cash, dec!(200));

        let report = run(&books);

        let item = &report.financing.items[0];
        assert_eq!(item.label, "Distributions: Owner Draws");
        assert_eq!(item.cash_impact, dec!(-200));
        assert_eq!(report.net_cash_change, dec!(-200));
        assert!(report.reconciliation.is_balanced);
    }

    #[test]
    fn test_operating_liability_increase_adds_cash() {
        let mut books = Books::new();
        let cash = books.account_with("Cash", "asset", Some("cash"), None);
        let payable =
            books.account_with("Accounts Payable", "liability", Some("accounts_payable"), None);
        let supplies = books.account("Supplies Expense", "expense");
        books.transfer(date(2024, 3, 1), supplies, payable, dec!(300));
        books.transfer(date(2024, 3, 20), payable, cash, dec!(100));

        let report = run(&books);

        assert_eq!(report.net_income, dec!(-300));
        assert_eq!(report.operating.items[0].cash_impact, dec!(200));
        assert_eq!(report.net_cash_change, dec!(-100));
        assert!(report.reconciliation.is_balanced);
    }

    #[test]
    fn test_beginning_cash_excludes_start_day() {
        let mut books = Books::new();
        let cash = books.account_with("Cash", "asset", Some("cash"), None);
        let capital = books.account("Capital", "equity");
        books.transfer(date(2023, 12, 31), cash, capital, dec!(100));
        books.transfer(date(2024, 1, 1), cash, capital, dec!(50));

        let report = run(&books);

        assert_eq!(report.beginning_cash, dec!(100));
        assert_eq!(report.ending_cash, dec!(150));
        assert_eq!(report.net_financing_cash_flow, dec!(50));
    }

    #[test]
    fn test_empty_books() {
        let report = run(&Books::new());

        assert!(report.rows.is_empty());
        assert_eq!(report.net_cash_change, Decimal::ZERO);
        assert!(report.reconciliation.is_balanced);
    }
}
