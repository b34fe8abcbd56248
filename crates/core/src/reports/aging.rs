//! Receivables and payables aging.
//!
//! Independent of the journal: works directly on open invoices or bills.
//!
//! | Days past due | Bucket   |
//! |---------------|----------|
//! | <= 0          | Current  |
//! | 1-30          | 1-30     |
//! | 31-60         | 31-60    |
//! | 61-90         | 61-90    |
//! | > 90          | 90+      |

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use folio_shared::types::{CounterpartyId, DocumentId, is_negligible};

use crate::ledger::calendar_date;

use super::types::{ReportContext, ReportHeader, ReportPeriod, RowKind};

/// Lifecycle status of an invoice or bill.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    /// Not yet sent.
    Draft,
    /// Sent or received, unpaid.
    Sent,
    /// Partially paid.
    Partial,
    /// Past due.
    Overdue,
    /// Fully paid.
    Paid,
    /// Cancelled.
    Cancelled,
    /// Voided.
    Voided,
    /// Any other status, kept verbatim.
    Other(String),
}

impl DocumentStatus {
    /// Parses a case-insensitive status.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "draft" => Self::Draft,
            "sent" | "open" | "received" => Self::Sent,
            "partial" | "partially_paid" => Self::Partial,
            "overdue" => Self::Overdue,
            "paid" => Self::Paid,
            "cancelled" | "canceled" => Self::Cancelled,
            "voided" | "void" => Self::Voided,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Partial => "partial",
            Self::Overdue => "overdue",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Voided => "voided",
            Self::Other(raw) => raw,
        }
    }

    /// Returns true unless the document is paid, cancelled, or voided.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        !matches!(self, Self::Paid | Self::Cancelled | Self::Voided)
    }
}

impl Serialize for DocumentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// An invoice (receivable) or bill (payable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID.
    pub id: DocumentId,
    /// Customer or vendor.
    pub counterparty_id: CounterpartyId,
    /// Invoice or bill number.
    #[serde(default)]
    pub number: Option<String>,
    /// Issue date.
    #[serde(with = "calendar_date")]
    pub issue_date: NaiveDate,
    /// Due date.
    #[serde(with = "calendar_date")]
    pub due_date: NaiveDate,
    /// Document total.
    pub total: Decimal,
    /// Amount still owed; the full total when absent.
    #[serde(default)]
    pub balance_due: Option<Decimal>,
    /// Status.
    pub status: DocumentStatus,
}

impl Document {
    /// Amount still owed.
    #[must_use]
    pub fn outstanding_amount(&self) -> Decimal {
        self.balance_due.unwrap_or(self.total)
    }
}

/// A customer or vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    /// Counterparty ID.
    pub id: CounterpartyId,
    /// Display name.
    pub name: String,
}

/// Receivables or payables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingKind {
    /// Customer invoices.
    Receivables,
    /// Vendor bills.
    Payables,
}

impl AgingKind {
    const fn title(self) -> &'static str {
        match self {
            Self::Receivables => "Accounts Receivable Aging Summary",
            Self::Payables => "Accounts Payable Aging Summary",
        }
    }
}

/// Days-past-due bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// Not yet due.
    Current,
    /// 1 to 30 days past due.
    Days1To30,
    /// 31 to 60 days past due.
    Days31To60,
    /// 61 to 90 days past due.
    Days61To90,
    /// More than 90 days past due.
    Over90,
}

impl AgingBucket {
    /// Bucket for a number of days past due.
    #[must_use]
    pub const fn for_days(days_past_due: i64) -> Self {
        match days_past_due {
            i64::MIN..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }

    /// Column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Days1To30 => "1-30",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Over90 => "90+",
        }
    }
}

/// Amounts per bucket plus their total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingAmounts {
    /// Not yet due.
    pub current: Decimal,
    /// 1-30 days.
    pub days_1_30: Decimal,
    /// 31-60 days.
    pub days_31_60: Decimal,
    /// 61-90 days.
    pub days_61_90: Decimal,
    /// Over 90 days.
    pub over_90: Decimal,
    /// Sum of all buckets.
    pub total: Decimal,
}

impl AgingAmounts {
    /// Adds an amount to one bucket.
    pub fn add(&mut self, bucket: AgingBucket, amount: Decimal) {
        let slot = match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Days1To30 => &mut self.days_1_30,
            AgingBucket::Days31To60 => &mut self.days_31_60,
            AgingBucket::Days61To90 => &mut self.days_61_90,
            AgingBucket::Over90 => &mut self.over_90,
        };
        *slot += amount;
        self.total += amount;
    }

    /// Amount in one bucket.
    #[must_use]
    pub const fn get(&self, bucket: AgingBucket) -> Decimal {
        match bucket {
            AgingBucket::Current => self.current,
            AgingBucket::Days1To30 => self.days_1_30,
            AgingBucket::Days31To60 => self.days_31_60,
            AgingBucket::Days61To90 => self.days_61_90,
            AgingBucket::Over90 => self.over_90,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.current += other.current;
        self.days_1_30 += other.days_1_30;
        self.days_31_60 += other.days_31_60;
        self.days_61_90 += other.days_61_90;
        self.over_90 += other.over_90;
        self.total += other.total;
    }
}

/// One aging row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingRow {
    /// Row role.
    pub kind: RowKind,
    /// Indent level.
    pub indent: u8,
    /// Counterparty, absent on the total row and the unknown group.
    pub counterparty_id: Option<CounterpartyId>,
    /// Counterparty name or row label.
    pub name: String,
    /// Bucket amounts.
    #[serde(flatten)]
    pub amounts: AgingAmounts,
}

/// Aging summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingReport {
    /// Report header.
    pub header: ReportHeader,
    /// Receivables or payables.
    pub kind: AgingKind,
    /// One row per counterparty, then a total row.
    pub rows: Vec<AgingRow>,
    /// Grand totals.
    pub totals: AgingAmounts,
    /// Number of outstanding documents behind the counterparty rows.
    pub document_count: usize,
}

/// Name shown for documents whose counterparty is not in the list.
pub const UNKNOWN_COUNTERPARTY: &str = "Unknown";

/// Builds an aging summary as of `as_of`.
///
/// When `counterparty_id` is set only that counterparty's documents are aged.
#[must_use]
pub fn build_aging(
    kind: AgingKind,
    documents: &[Document],
    counterparties: &[Counterparty],
    as_of: NaiveDate,
    counterparty_id: Option<CounterpartyId>,
    ctx: &ReportContext,
) -> AgingReport {
    let names: HashMap<CounterpartyId, &str> = counterparties
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut groups: BTreeMap<Option<CounterpartyId>, (AgingAmounts, usize)> = BTreeMap::new();

    let selected = documents.iter().filter(|d| {
        d.status.is_outstanding() && counterparty_id.is_none_or(|id| d.counterparty_id == id)
    });
    for document in selected {
        let days_past_due = (as_of - document.due_date).num_days();
        let bucket = AgingBucket::for_days(days_past_due);
        let key = if names.contains_key(&document.counterparty_id) {
            Some(document.counterparty_id)
        } else {
            warn!(
                document_id = %document.id,
                counterparty_id = %document.counterparty_id,
                "Aging document references unknown counterparty"
            );
            None
        };
        let (amounts, count) = groups.entry(key).or_default();
        amounts.add(bucket, document.outstanding_amount());
        *count += 1;
    }

    // Counterparties with nothing left to collect or pay are dropped along
    // with their documents.
    let mut document_count = 0;
    let mut rows: Vec<AgingRow> = groups
        .into_iter()
        .filter(|(_, (amounts, _))| !is_negligible(amounts.total))
        .map(|(counterparty_id, (amounts, count))| {
            document_count += count;
            AgingRow {
                kind: RowKind::Line,
                indent: 0,
                counterparty_id,
                name: counterparty_id
                    .and_then(|id| names.get(&id).copied())
                    .unwrap_or(UNKNOWN_COUNTERPARTY)
                    .to_string(),
                amounts,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.counterparty_id.cmp(&b.counterparty_id))
    });

    let mut totals = AgingAmounts::default();
    for row in &rows {
        totals.merge(&row.amounts);
    }

    if !rows.is_empty() {
        rows.push(AgingRow {
            kind: RowKind::Total,
            indent: 0,
            counterparty_id: None,
            name: "Total".to_string(),
            amounts: totals,
        });
    }

    AgingReport {
        header: ctx.header(kind.title(), ReportPeriod::AsOf { as_of }),
        kind,
        rows,
        totals,
        document_count,
    }
}
