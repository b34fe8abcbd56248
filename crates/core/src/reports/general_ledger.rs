//! General ledger with running balances.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::{AccountId, JournalEntryId, JournalLineId, is_negligible};

use crate::ledger::{
    AccountType, BalanceAggregator, ClassifiedAccount, DatedLine, LedgerView, PeriodFilter,
    RunningBalance, signed_balance,
};

use super::error::ReportError;
use super::types::{ReportContext, ReportHeader, ReportPeriod, RowKind};

/// Which accounts to include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedgerFilter {
    /// A single account.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Every account of one type.
    #[serde(default)]
    pub account_type: Option<AccountType>,
}

impl GeneralLedgerFilter {
    fn matches(&self, account: &ClassifiedAccount) -> bool {
        self.account_id.is_none_or(|id| id == account.id)
            && self.account_type.is_none_or(|t| t == account.account_type)
    }
}

/// One general ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedgerRow {
    /// Row role.
    pub kind: RowKind,
    /// Indent level.
    pub indent: u8,
    /// Account the row belongs to.
    pub account_id: AccountId,
    /// Transaction date; the period start on the opening row.
    pub date: Option<NaiveDate>,
    /// Source journal entry.
    pub entry_id: Option<JournalEntryId>,
    /// Source journal line.
    pub line_id: Option<JournalLineId>,
    /// Entry reference.
    pub reference: Option<String>,
    /// Description or label.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this row.
    pub balance: Decimal,
}

/// Per-account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedgerSummary {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Balance strictly before the period start.
    pub beginning_balance: Decimal,
    /// Period debits.
    pub total_debit: Decimal,
    /// Period credits.
    pub total_credit: Decimal,
    /// Balance at the period end.
    pub ending_balance: Decimal,
    /// Number of period lines.
    pub line_count: usize,
}

/// General ledger report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedgerReport {
    /// Report header.
    pub header: ReportHeader,
    /// Rows for every included account, one block per account.
    pub rows: Vec<GeneralLedgerRow>,
    /// One summary per included account.
    pub accounts: Vec<AccountLedgerSummary>,
}

/// Chronological order: date, then reference, then entry id, then line id.
fn chronological(a: &DatedLine<'_>, b: &DatedLine<'_>) -> std::cmp::Ordering {
    a.entry
        .transaction_date
        .cmp(&b.entry.transaction_date)
        .then_with(|| {
            a.entry
                .reference
                .as_deref()
                .unwrap_or_default()
                .cmp(b.entry.reference.as_deref().unwrap_or_default())
        })
        .then_with(|| a.entry.id.cmp(&b.entry.id))
        .then_with(|| a.line.id.cmp(&b.line.id))
}

/// Builds the general ledger for `[start, end]`.
pub fn build_general_ledger(
    view: &LedgerView<'_>,
    start: NaiveDate,
    end: NaiveDate,
    filter: GeneralLedgerFilter,
    ctx: &ReportContext,
) -> Result<GeneralLedgerReport, ReportError> {
    let period = PeriodFilter::between(start, end)?;
    if let Some(account_id) = filter.account_id
        && view.account(account_id).is_none()
    {
        return Err(ReportError::AccountNotFound(account_id));
    }

    let opening = BalanceAggregator::new(view).opening(start);

    let mut period_lines: BTreeMap<AccountId, Vec<DatedLine<'_>>> = BTreeMap::new();
    for dated in view.lines() {
        if period.contains(dated.entry.transaction_date) {
            period_lines.entry(dated.line.account_id).or_default().push(*dated);
        }
    }

    let mut accounts: Vec<_> = view.accounts().filter(|a| filter.matches(a)).collect();
    accounts.sort_by(|a, b| {
        a.account_type
            .cmp(&b.account_type)
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut rows = Vec::new();
    let mut summaries = Vec::new();

    for account in accounts {
        let beginning_balance = signed_balance(&opening, account);
        let mut lines = period_lines.remove(&account.id).unwrap_or_default();
        if lines.is_empty() && is_negligible(beginning_balance) {
            continue;
        }
        lines.sort_by(chronological);

        let row = |kind, date, description: &str| GeneralLedgerRow {
            kind,
            indent: 0,
            account_id: account.id,
            date,
            entry_id: None,
            line_id: None,
            reference: None,
            description: description.to_string(),
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            balance: Decimal::ZERO,
        };

        rows.push(row(RowKind::Header, None, &account.display_name()));
        rows.push(GeneralLedgerRow {
            indent: 1,
            balance: beginning_balance,
            ..row(RowKind::Line, Some(start), "Beginning Balance")
        });

        let mut running = RunningBalance::opening(beginning_balance);
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        for dated in &lines {
            let line = dated.line;
            running = running.next(account.signed_balance(line.debit, line.credit));
            total_debit += line.debit;
            total_credit += line.credit;
            rows.push(GeneralLedgerRow {
                kind: RowKind::Line,
                indent: 1,
                account_id: account.id,
                date: Some(dated.entry.transaction_date),
                entry_id: Some(dated.entry.id),
                line_id: Some(line.id),
                reference: dated.entry.reference.clone(),
                description: line
                    .description
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| dated.entry.description.clone()),
                debit: line.debit,
                credit: line.credit,
                balance: running.current_balance,
            });
        }

        let ending_balance = running.current_balance;
        rows.push(GeneralLedgerRow {
            indent: 1,
            debit: total_debit,
            credit: total_credit,
            balance: ending_balance,
            ..row(RowKind::Subtotal, Some(end), "Totals and Ending Balance")
        });

        summaries.push(AccountLedgerSummary {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            beginning_balance,
            total_debit,
            total_credit,
            ending_balance,
            line_count: lines.len(),
        });
    }

    Ok(GeneralLedgerReport {
        header: ctx.header("General Ledger", ReportPeriod::Range { start, end }),
        rows,
        accounts: summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::{Books, context, date};
    use rust_decimal_macros::dec;

    fn run(books: &Books, filter: GeneralLedgerFilter) -> GeneralLedgerReport {
        build_general_ledger(
            &books.view(),
            date(2024, 1, 1),
            date(2024, 1, 31),
            filter,
            &context(),
        )
        .unwrap()
    }

    #[test]
    fn test_running_balance_walk() {
        let mut books = Books::new();
        let cash = books.account("Cash", "asset");
        let sales = books.account("Sales", "revenue");
        let rent = books.account("Rent", "expense");
        books.transfer(date(2023, 12, 20), cash, sales, dec!(100));
        books.transfer(date(2024, 1, 5), cash, sales, dec!(50));
        books.transfer(date(2024, 1, 9), rent, cash, dec!(30));

        let report = run(
            &books,
            GeneralLedgerFilter {
                account_id: Some(cash),
                account_type: None,
            },
        );

        let balances: Vec<_> = report.rows.iter().map(|row| (row.kind, row.balance)).collect();
        assert_eq!(
            balances,
            [
                (RowKind::Header, dec!(0)),
                (RowKind::Line, dec!(100)),
                (RowKind::Line, dec!(150)),
                (RowKind::Line, dec!(120)),
                (RowKind::Subtotal, dec!(120)),
            ]
        );
        let summary = &report.accounts[0];
        assert_eq!(summary.beginning_balance, dec!(100));
        assert_eq!(summary.total_debit, dec!(50));
        assert_eq!(summary.total_credit, dec!(30));
        assert_eq!(summary.ending_balance, dec!(120));
    }

    #[test]
    fn test_same_day_lines_order_by_reference() {
        let mut books = Books::new();
        let cash = books.account("Cash", "asset");
        let sales = books.account("Sales", "revenue");
        let zero = Decimal::ZERO;
        for (reference, amount) in [("INV-002", dec!(2)), ("INV-001", dec!(1))] {
            books.post(
                date(2024, 1, 3),
                Some(reference),
                &[(cash, amount, zero), (sales, zero, amount)],
            );
        }

        let report = run(
            &books,
            GeneralLedgerFilter {
                account_id: Some(cash),
                account_type: None,
            },
        );

        let references: Vec<_> = report
            .rows
            .iter()
            .filter_map(|row| row.reference.as_deref())
            .collect();
        assert_eq!(references, ["INV-001", "INV-002"]);
    }

    #[test]
    fn test_credit_normal_account_balance() {
        let mut books = Books::new();
        let cash = books.account("Cash", "asset");
        let sales = books.account("Sales", "revenue");
        books.transfer(date(2024, 1, 2), cash, sales, dec!(75));

        let report = run(
            &books,
            GeneralLedgerFilter {
                account_id: None,
                account_type: Some(AccountType::Revenue),
            },
        );

        assert_eq!(report.accounts.len(), 1);
        assert_eq!(report.accounts[0].ending_balance, dec!(75));
    }

    #[test]
    fn test_idle_accounts_are_omitted() {
        let mut books = Books::new();
        let cash = books.account("Cash", "asset");
        let sales = books.account("Sales", "revenue");
        books.account("Unused", "expense");
        books.transfer(date(2024, 1, 2), cash, sales, dec!(10));

        let report = run(&books, GeneralLedgerFilter::default());

        let names: Vec<_> = report.accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Cash", "Sales"]);
    }

    #[test]
    fn test_opening_balance_only_account_is_kept() {
        let mut books = Books::new();
        let cash = books.account("Cash", "asset");
        let capital = books.account("Capital", "equity");
        books.transfer(date(2023, 6, 1), cash, capital, dec!(500));

        let report = run(&books, GeneralLedgerFilter::default());

        assert_eq!(report.accounts.len(), 2);
        assert_eq!(report.accounts[0].line_count, 0);
        assert_eq!(report.accounts[0].ending_balance, dec!(500));
    }

    #[test]
    fn test_unknown_account_is_rejected() {
        let books = Books::new();
        let missing = AccountId::new();
        let err = build_general_ledger(
            &books.view(),
            date(2024, 1, 1),
            date(2024, 1, 31),
            GeneralLedgerFilter {
                account_id: Some(missing),
                account_type: None,
            },
            &context(),
        )
        .unwrap_err();
        assert_eq!(err, ReportError::AccountNotFound(missing));
    }

    #[test]
    fn test_empty_books() {
        let report = run(&Books::new(), GeneralLedgerFilter::default());
        assert!(report.rows.is_empty());
        assert!(report.accounts.is_empty());
    }
}
