//! Account classification.
//!
//! Resolves the free-form classification strings supplied with each account
//! into typed values, and answers the questions the statement builders ask:
//! which side is normal, which statement section the account belongs to, and
//! how it participates in the indirect cash flow statement.
//!
//! Cash flow classification is two-tier. An explicit `CashFlowCategory` tag
//! or a recognised subtype is authoritative; name keyword matching is a
//! best-effort fallback and is reported as [`ClassificationSource::Heuristic`]
//! so callers can flag it for review.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::AccountId;

use super::error::LedgerError;
use super::types::Account;

/// The five account types of double-entry bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owners' residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// All types in statement precedence order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Parses a case-insensitive type name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Side on which this type's balance is conventionally positive.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalSide::Credit,
        }
    }

    /// Statement section this type is reported under.
    #[must_use]
    pub const fn statement_group(self) -> StatementGroup {
        match self {
            Self::Asset => StatementGroup::Assets,
            Self::Liability => StatementGroup::Liabilities,
            Self::Equity => StatementGroup::Equity,
            Self::Revenue => StatementGroup::Revenue,
            Self::Expense => StatementGroup::Expenses,
        }
    }

    /// Returns true for temporary (income statement) accounts.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset => write!(f, "asset"),
            Self::Liability => write!(f, "liability"),
            Self::Equity => write!(f, "equity"),
            Self::Revenue => write!(f, "revenue"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown account type: {s}"))
    }
}

/// Normal balance side.
///
/// - Debit-normal (Asset, Expense): balance = debit - credit
/// - Credit-normal (Liability, Equity, Revenue): balance = credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl NormalSide {
    /// Signed balance of raw totals, positive on the normal side.
    #[must_use]
    pub fn signed_balance(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Statement section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementGroup {
    /// Balance sheet assets.
    Assets,
    /// Balance sheet liabilities.
    Liabilities,
    /// Balance sheet equity.
    Equity,
    /// Income statement revenue.
    Revenue,
    /// Income statement expenses.
    Expenses,
}

impl StatementGroup {
    /// Section heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Liabilities => "Liabilities",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expenses => "Expenses",
        }
    }
}

/// Recognised account subtypes.
///
/// Subtypes are advisory, so unrecognised values are kept as [`Self::Other`]
/// instead of failing the report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountSubtype {
    /// Cash on hand.
    Cash,
    /// Bank account.
    Bank,
    /// Trade receivables.
    AccountsReceivable,
    /// Stock held for sale.
    Inventory,
    /// Prepaid expenses.
    Prepaid,
    /// Any other current asset.
    CurrentAsset,
    /// Property, plant, and equipment.
    FixedAsset,
    /// Contra asset for depreciation or amortization.
    AccumulatedDepreciation,
    /// Long-term investments.
    Investment,
    /// Other non-current asset.
    OtherAsset,
    /// Trade payables.
    AccountsPayable,
    /// Credit card balances.
    CreditCard,
    /// Accrued liabilities.
    AccruedLiability,
    /// Any other current liability.
    CurrentLiability,
    /// Short-term borrowing.
    ShortTermDebt,
    /// Long-term notes, loans, and mortgages.
    LongTermDebt,
    /// Other liability.
    OtherLiability,
    /// Owner capital or contributed equity.
    OwnerEquity,
    /// Owner draws, distributions, or dividends.
    OwnerDraw,
    /// Accumulated earnings.
    RetainedEarnings,
    /// Operating revenue.
    OperatingRevenue,
    /// Non-operating revenue.
    OtherRevenue,
    /// Cost of goods sold.
    CostOfGoodsSold,
    /// Operating expense.
    OperatingExpense,
    /// Depreciation or amortization expense.
    Depreciation,
    /// Other expense.
    OtherExpense,
    /// Unrecognised subtype, kept verbatim.
    Other(String),
}

impl AccountSubtype {
    /// Parses a subtype, normalising case, spaces, and dashes.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "cash" | "petty_cash" => Self::Cash,
            "bank" | "checking" | "savings" => Self::Bank,
            "accounts_receivable" | "receivable" => Self::AccountsReceivable,
            "inventory" => Self::Inventory,
            "prepaid" | "prepaid_expense" => Self::Prepaid,
            "current_asset" | "other_current_asset" => Self::CurrentAsset,
            "fixed_asset" | "property_plant_equipment" => Self::FixedAsset,
            "accumulated_depreciation" | "accumulated_amortization" => {
                Self::AccumulatedDepreciation
            }
            "investment" => Self::Investment,
            "other_asset" => Self::OtherAsset,
            "accounts_payable" | "payable" => Self::AccountsPayable,
            "credit_card" => Self::CreditCard,
            "accrued_liability" => Self::AccruedLiability,
            "current_liability" | "other_current_liability" => Self::CurrentLiability,
            "short_term_debt" => Self::ShortTermDebt,
            "long_term_debt" | "long_term_liability" => Self::LongTermDebt,
            "other_liability" => Self::OtherLiability,
            "owner_equity" | "capital" | "common_stock" => Self::OwnerEquity,
            "owner_draw" | "distribution" | "dividend" => Self::OwnerDraw,
            "retained_earnings" => Self::RetainedEarnings,
            "operating_revenue" => Self::OperatingRevenue,
            "other_revenue" | "other_income" => Self::OtherRevenue,
            "cost_of_goods_sold" | "cogs" => Self::CostOfGoodsSold,
            "operating_expense" => Self::OperatingExpense,
            "depreciation" | "amortization" => Self::Depreciation,
            "other_expense" => Self::OtherExpense,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

/// Cash flow statement activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowCategory {
    /// Working capital movements.
    Operating,
    /// Purchases and sales of long-lived assets.
    Investing,
    /// Borrowing, repayments, and owner transactions.
    Financing,
}

impl CashFlowCategory {
    /// Parses a case-insensitive category tag.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "operating" => Some(Self::Operating),
            "investing" => Some(Self::Investing),
            "financing" => Some(Self::Financing),
            _ => None,
        }
    }

    /// Section heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Operating => "Operating Activities",
            Self::Investing => "Investing Activities",
            Self::Financing => "Financing Activities",
        }
    }
}

/// An account with its classification strings resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedAccount {
    /// Account ID.
    pub id: AccountId,
    /// Optional account code.
    pub code: Option<String>,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional subtype.
    pub subtype: Option<AccountSubtype>,
    /// Explicit cash flow tag.
    pub cash_flow_category: Option<CashFlowCategory>,
}

impl ClassifiedAccount {
    /// Resolves a raw account record.
    ///
    /// Unknown type strings and unknown cash flow tags are fatal; blank cash
    /// flow tags count as absent.
    pub fn resolve(account: &Account) -> Result<Self, LedgerError> {
        let account_type =
            AccountType::parse(&account.account_type).ok_or_else(|| {
                LedgerError::UnknownAccountType {
                    account_id: account.id,
                    value: account.account_type.clone(),
                }
            })?;

        let cash_flow_category = match account.cash_flow_category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(CashFlowCategory::parse(raw).ok_or_else(|| {
                LedgerError::UnknownCashFlowCategory {
                    account_id: account.id,
                    value: raw.to_string(),
                }
            })?),
        };

        let subtype = account
            .subtype
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(AccountSubtype::parse);

        Ok(Self {
            id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type,
            subtype,
            cash_flow_category,
        })
    }

    /// Normal balance side of the account's type.
    #[must_use]
    pub const fn normal_side(&self) -> NormalSide {
        self.account_type.normal_side()
    }

    /// Signed balance of raw totals on this account's normal side.
    #[must_use]
    pub fn signed_balance(&self, debit: Decimal, credit: Decimal) -> Decimal {
        self.normal_side().signed_balance(debit, credit)
    }

    /// Label used on report rows: `code - name` when a code exists.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => format!("{code} - {}", self.name),
            _ => self.name.clone(),
        }
    }

    fn subtype_is(&self, subtype: &AccountSubtype) -> bool {
        self.subtype.as_ref() == Some(subtype)
    }

    fn name_contains_any(&self, keywords: &[&str]) -> bool {
        let name = self.name.to_lowercase();
        keywords.iter().any(|keyword| name.contains(keyword))
    }
}

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    /// Explicit `CashFlowCategory` tag.
    Tagged,
    /// Derived from account type and subtype.
    Inferred,
    /// Derived from keywords in the account name. Needs review.
    Heuristic,
}

/// How an account participates in the indirect cash flow statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlowRole {
    /// A cash or bank account; its movement is what the statement explains.
    Cash,
    /// Revenue or expense; captured through net income.
    IncomeStatement,
    /// Balance change reported under an activity section.
    Activity(CashFlowCategory),
    /// Accumulated depreciation contra; captured through the depreciation add-back.
    DepreciationContra,
    /// Retained earnings; captured through net income.
    RetainedEarnings,
    /// Nothing matched. Movement here breaks reconciliation.
    Unclassified,
}

/// Result of [`classify_cash_flow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashFlowClassification {
    /// Role of the account.
    pub role: CashFlowRole,
    /// Source of the decision; `None` when unclassified.
    pub source: Option<ClassificationSource>,
}

impl CashFlowClassification {
    const fn new(role: CashFlowRole, source: ClassificationSource) -> Self {
        Self {
            role,
            source: Some(source),
        }
    }

    const fn unclassified() -> Self {
        Self {
            role: CashFlowRole::Unclassified,
            source: None,
        }
    }
}

const CASH_KEYWORDS: &[&str] = &["cash", "checking", "savings"];
const CONTRA_KEYWORDS: &[&str] = &["accumulated depreciation", "accumulated amortization"];
const RETAINED_EARNINGS_KEYWORDS: &[&str] = &["retained earnings"];
const DEPRECIATION_KEYWORDS: &[&str] = &["depreciation", "amortization"];
const DRAW_KEYWORDS: &[&str] = &["draw", "distribution", "dividend"];

const OPERATING_ASSET_KEYWORDS: &[&str] = &["receivable", "inventory", "prepaid", "deposit"];
const OPERATING_LIABILITY_KEYWORDS: &[&str] = &[
    "accounts payable",
    "accrued",
    "credit card",
    "unearned",
    "deferred revenue",
    "sales tax",
    "payroll",
];
const INVESTING_KEYWORDS: &[&str] = &[
    "equipment",
    "vehicle",
    "property",
    "building",
    "furniture",
    "machinery",
    "land",
    "investment",
];
const FINANCING_KEYWORDS: &[&str] = &["loan", "note", "mortgage", "line of credit", "bond"];

/// Classifies an account for the indirect cash flow statement.
///
/// Order of checks: income statement accounts, depreciation contras,
/// retained earnings, cash accounts, explicit tag, subtype inference, name
/// keywords (Operating, then Investing, then Financing), equity fallback.
#[must_use]
pub fn classify_cash_flow(account: &ClassifiedAccount) -> CashFlowClassification {
    use ClassificationSource::{Heuristic, Inferred, Tagged};

    if account.account_type.is_income_statement() {
        return CashFlowClassification::new(CashFlowRole::IncomeStatement, Inferred);
    }

    if account.subtype_is(&AccountSubtype::AccumulatedDepreciation) {
        return CashFlowClassification::new(CashFlowRole::DepreciationContra, Inferred);
    }
    if account.name_contains_any(CONTRA_KEYWORDS) {
        return CashFlowClassification::new(CashFlowRole::DepreciationContra, Heuristic);
    }

    if account.account_type == AccountType::Equity {
        if account.subtype_is(&AccountSubtype::RetainedEarnings) {
            return CashFlowClassification::new(CashFlowRole::RetainedEarnings, Inferred);
        }
        if account.name_contains_any(RETAINED_EARNINGS_KEYWORDS) {
            return CashFlowClassification::new(CashFlowRole::RetainedEarnings, Heuristic);
        }
    }

    if let Some(source) = cash_account_source(account) {
        return CashFlowClassification::new(CashFlowRole::Cash, source);
    }

    if let Some(category) = account.cash_flow_category {
        return CashFlowClassification::new(CashFlowRole::Activity(category), Tagged);
    }

    if let Some(category) = infer_from_subtype(account) {
        return CashFlowClassification::new(CashFlowRole::Activity(category), Inferred);
    }

    if let Some(category) = infer_from_name(account) {
        return CashFlowClassification::new(CashFlowRole::Activity(category), Heuristic);
    }

    if account.account_type == AccountType::Equity {
        return CashFlowClassification::new(
            CashFlowRole::Activity(CashFlowCategory::Financing),
            Inferred,
        );
    }

    CashFlowClassification::unclassified()
}

/// Returns the source that makes this a cash account, if it is one.
#[must_use]
pub fn cash_account_source(account: &ClassifiedAccount) -> Option<ClassificationSource> {
    if account.account_type != AccountType::Asset {
        return None;
    }
    if matches!(
        account.subtype,
        Some(AccountSubtype::Cash | AccountSubtype::Bank)
    ) {
        return Some(ClassificationSource::Inferred);
    }
    if account.cash_flow_category.is_none() && account.name_contains_any(CASH_KEYWORDS) {
        return Some(ClassificationSource::Heuristic);
    }
    None
}

/// Returns true for depreciation or amortization expense accounts.
#[must_use]
pub fn is_depreciation_expense(account: &ClassifiedAccount) -> bool {
    account.account_type == AccountType::Expense
        && (account.subtype_is(&AccountSubtype::Depreciation)
            || account.name_contains_any(DEPRECIATION_KEYWORDS))
}

/// Returns true for owner draw, distribution, or dividend equity accounts.
#[must_use]
pub fn is_equity_draw(account: &ClassifiedAccount) -> bool {
    account.account_type == AccountType::Equity
        && (account.subtype_is(&AccountSubtype::OwnerDraw)
            || account.name_contains_any(DRAW_KEYWORDS))
}

fn infer_from_subtype(account: &ClassifiedAccount) -> Option<CashFlowCategory> {
    use AccountSubtype as S;

    match (account.account_type, account.subtype.as_ref()?) {
        (
            AccountType::Asset,
            S::AccountsReceivable | S::Inventory | S::Prepaid | S::CurrentAsset,
        )
        | (
            AccountType::Liability,
            S::AccountsPayable | S::CreditCard | S::AccruedLiability | S::CurrentLiability,
        ) => Some(CashFlowCategory::Operating),
        (AccountType::Asset, S::FixedAsset | S::Investment) => Some(CashFlowCategory::Investing),
        (AccountType::Liability, S::ShortTermDebt | S::LongTermDebt)
        | (AccountType::Equity, S::OwnerEquity | S::OwnerDraw) => {
            Some(CashFlowCategory::Financing)
        }
        _ => None,
    }
}

fn infer_from_name(account: &ClassifiedAccount) -> Option<CashFlowCategory> {
    match account.account_type {
        AccountType::Asset => {
            if account.name_contains_any(OPERATING_ASSET_KEYWORDS) {
                Some(CashFlowCategory::Operating)
            } else if account.name_contains_any(INVESTING_KEYWORDS) {
                Some(CashFlowCategory::Investing)
            } else {
                None
            }
        }
        AccountType::Liability => {
            if account.name_contains_any(OPERATING_LIABILITY_KEYWORDS) {
                Some(CashFlowCategory::Operating)
            } else if account.name_contains_any(FINANCING_KEYWORDS) {
                Some(CashFlowCategory::Financing)
            } else {
                None
            }
        }
        AccountType::Equity | AccountType::Revenue | AccountType::Expense => None,
    }
}
