//! Command-line arguments.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};

use folio_core::ledger::{AccountType, parse_calendar_date};
use folio_core::reports::ReportRequest;
use folio_shared::types::{AccountId, CounterpartyId};

/// Generate financial statements from a ledger snapshot.
#[derive(Debug, Parser)]
#[clap(version, long_about = None)]
pub struct Cli {
    /// Ledger snapshot in JSON form, or `-` for stdin.
    #[clap(short, long, env = "FOLIO_SNAPSHOT", value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Timestamp stamped on the report header instead of the local clock.
    #[clap(long, value_name = "YYYY-MM-DDTHH:MM:SS", value_parser = parse_timestamp)]
    pub now: Option<NaiveDateTime>,

    /// Pretty-print the JSON output.
    #[clap(long)]
    pub pretty: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// Report to generate.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Trial balance as of a date.
    TrialBalance(AsOfArgs),
    /// Balance sheet as of a date.
    BalanceSheet(AsOfArgs),
    /// Profit and loss for a period.
    ProfitAndLoss(PeriodArgs),
    /// Statement of cash flows for a period.
    CashFlow(PeriodArgs),
    /// General ledger for a period.
    GeneralLedger {
        #[clap(flatten)]
        period: PeriodArgs,
        /// Only this account.
        #[clap(long, value_name = "ID")]
        account: Option<AccountId>,
        /// Only accounts of this type.
        #[clap(long, value_name = "TYPE")]
        account_type: Option<AccountType>,
    },
    /// Accounts receivable aging.
    ArAging(AgingArgs),
    /// Accounts payable aging.
    ApAging(AgingArgs),
    /// Run a JSON report request.
    Run {
        /// Request file, e.g. `{"report": "trial_balance", "as_of": "2024-12-31"}`.
        #[clap(short, long, value_name = "FILE")]
        request: PathBuf,
    },
}

/// Point-in-time report arguments.
#[derive(Debug, Args)]
pub struct AsOfArgs {
    /// Cutoff date, inclusive.
    #[clap(long, value_name = "DATE", value_parser = parse_calendar_date)]
    pub as_of: NaiveDate,
}

/// Aging report arguments.
#[derive(Debug, Args)]
pub struct AgingArgs {
    /// Aging date.
    #[clap(long, value_name = "DATE", value_parser = parse_calendar_date)]
    pub as_of: NaiveDate,
    /// Only this customer or vendor.
    #[clap(long, value_name = "ID")]
    pub counterparty: Option<CounterpartyId>,
}

/// Period report arguments.
#[derive(Debug, Args)]
pub struct PeriodArgs {
    /// First day of the period.
    #[clap(long, value_name = "DATE", value_parser = parse_calendar_date)]
    pub start: NaiveDate,
    /// Last day of the period.
    #[clap(long, value_name = "DATE", value_parser = parse_calendar_date)]
    pub end: NaiveDate,
}

/// Where the report request comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum RequestSource {
    /// Built from command-line arguments.
    Inline(ReportRequest),
    /// Read from a JSON file.
    File(PathBuf),
}

impl Command {
    /// Converts the subcommand into a report request.
    pub fn into_request(self) -> RequestSource {
        let request = match self {
            Self::TrialBalance(AsOfArgs { as_of }) => ReportRequest::TrialBalance { as_of },
            Self::BalanceSheet(AsOfArgs { as_of }) => ReportRequest::BalanceSheet { as_of },
            Self::ProfitAndLoss(PeriodArgs { start, end }) => {
                ReportRequest::ProfitAndLoss { start, end }
            }
            Self::CashFlow(PeriodArgs { start, end }) => ReportRequest::CashFlow { start, end },
            Self::GeneralLedger {
                period,
                account,
                account_type,
            } => ReportRequest::GeneralLedger {
                start: period.start,
                end: period.end,
                account_id: account,
                account_type,
            },
            Self::ArAging(AgingArgs {
                as_of,
                counterparty,
            }) => ReportRequest::ReceivablesAging {
                as_of,
                counterparty_id: counterparty,
            },
            Self::ApAging(AgingArgs {
                as_of,
                counterparty,
            }) => ReportRequest::PayablesAging {
                as_of,
                counterparty_id: counterparty,
            },
            Self::Run { request } => return RequestSource::File(request),
        };
        RequestSource::Inline(request)
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S")
}
