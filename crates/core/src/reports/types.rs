//! Report data types shared by every statement.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::{AccountId, Currency, is_negligible};

use crate::ledger::ClassifiedAccount;

/// Presentation role of a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Section heading, no amounts.
    Header,
    /// Ordinary line item.
    Line,
    /// Section subtotal.
    Subtotal,
    /// Grand total.
    Total,
}

/// Date coverage of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportPeriod {
    /// Cumulative state up to a cutoff.
    AsOf {
        /// Cutoff date (inclusive).
        as_of: NaiveDate,
    },
    /// Activity within a range.
    Range {
        /// First day (inclusive).
        start: NaiveDate,
        /// Last day (inclusive).
        end: NaiveDate,
    },
}

/// Labels printed above every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    /// Report title.
    pub title: String,
    /// Company name.
    pub company_name: String,
    /// Currency code.
    pub currency: Currency,
    /// Dates covered.
    pub period: ReportPeriod,
    /// "Generated on" stamp, injected by the caller.
    pub generated_at: NaiveDateTime,
}

/// Caller-supplied context for one report run.
///
/// The engine never reads the clock: `generated_at` is whatever the caller
/// passes, so identical inputs always produce identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportContext {
    /// Timestamp stamped on the report header.
    pub generated_at: NaiveDateTime,
    /// Currency label.
    #[serde(default)]
    pub currency: Currency,
    /// Company label.
    #[serde(default)]
    pub company_name: String,
}

impl ReportContext {
    /// Creates a context with default labels.
    #[must_use]
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at,
            currency: Currency::default(),
            company_name: String::new(),
        }
    }

    /// Sets the currency label.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the company label.
    #[must_use]
    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = company_name.into();
        self
    }

    /// Builds a report header.
    #[must_use]
    pub fn header(&self, title: &str, period: ReportPeriod) -> ReportHeader {
        ReportHeader {
            title: title.to_string(),
            company_name: self.company_name.clone(),
            currency: self.currency,
            period,
            generated_at: self.generated_at,
        }
    }
}

/// A single-amount presentation row (balance sheet, P&L, cash flow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRow {
    /// Row role.
    pub kind: RowKind,
    /// Indent level, 0 for top-level.
    pub indent: u8,
    /// Label.
    pub label: String,
    /// Account behind the row, for line items.
    pub account_id: Option<AccountId>,
    /// Amount; zero on headers.
    pub amount: Decimal,
}

impl AmountRow {
    /// Section heading.
    #[must_use]
    pub fn header(indent: u8, label: impl Into<String>) -> Self {
        Self {
            kind: RowKind::Header,
            indent,
            label: label.into(),
            account_id: None,
            amount: Decimal::ZERO,
        }
    }

    /// Line item, optionally tied to an account.
    #[must_use]
    pub fn line(
        indent: u8,
        label: impl Into<String>,
        account_id: Option<AccountId>,
        amount: Decimal,
    ) -> Self {
        Self {
            kind: RowKind::Line,
            indent,
            label: label.into(),
            account_id,
            amount,
        }
    }

    /// Subtotal row.
    #[must_use]
    pub fn subtotal(indent: u8, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            kind: RowKind::Subtotal,
            indent,
            label: label.into(),
            account_id: None,
            amount,
        }
    }

    /// Grand total row.
    #[must_use]
    pub fn total(indent: u8, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            kind: RowKind::Total,
            indent,
            label: label.into(),
            account_id: None,
            amount,
        }
    }
}

/// One account's signed balance inside a statement section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: String,
    /// Balance on the account's normal side.
    pub balance: Decimal,
}

impl AccountLine {
    /// Creates a line for a resolved account.
    #[must_use]
    pub fn new(account: &ClassifiedAccount, balance: Decimal) -> Self {
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            balance,
        }
    }

    /// Label used on report rows.
    #[must_use]
    pub fn label(&self) -> String {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => format!("{code} - {}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// A statement section: lines plus their total.
///
/// The total includes every account, even those whose balance rounds to
/// zero and are therefore left out of `accounts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section, ordered by name.
    pub accounts: Vec<AccountLine>,
}

impl StatementSection {
    /// Adds an account's balance; only non-negligible balances get a line.
    pub fn add(&mut self, account: &ClassifiedAccount, balance: Decimal) {
        self.total += balance;
        if !is_negligible(balance) {
            self.accounts.push(AccountLine::new(account, balance));
        }
    }

    /// Orders lines by name, then code, then id.
    pub fn sort(&mut self) {
        self.accounts.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.code.cmp(&b.code))
                .then_with(|| a.account_id.cmp(&b.account_id))
        });
    }

    /// Returns true if there are no lines to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Appends one row per account at `indent`.
    pub fn push_rows(&self, rows: &mut Vec<AmountRow>, indent: u8) {
        rows.extend(self.accounts.iter().map(|line| {
            AmountRow::line(indent, line.label(), Some(line.account_id), line.balance)
        }));
    }
}

/// Result of checking a ledger invariant.
///
/// Out-of-balance books are an expected operational state, so a failed
/// check is data on the report, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// Whether both sides agree within tolerance.
    pub is_balanced: bool,
    /// Left side minus right side.
    pub difference: Decimal,
    /// Human-readable warning when unbalanced.
    pub warning: Option<String>,
}

impl BalanceCheck {
    /// Compares two sides, attaching `describe(difference)` as the warning
    /// when they differ beyond tolerance.
    pub fn compare(
        left: Decimal,
        right: Decimal,
        describe: impl FnOnce(Decimal) -> String,
    ) -> Self {
        let difference = left - right;
        let is_balanced = is_negligible(difference);
        Self {
            is_balanced,
            difference,
            warning: (!is_balanced).then(|| describe(difference)),
        }
    }
}

/// Standard account ordering: statement group, then name, then code, then id.
#[must_use]
pub fn account_order(a: &ClassifiedAccount, b: &ClassifiedAccount) -> Ordering {
    a.account_type
        .cmp(&b.account_type)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.code.cmp(&b.code))
        .then_with(|| a.id.cmp(&b.id))
}
