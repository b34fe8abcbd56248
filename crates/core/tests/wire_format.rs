//! End-to-end tests over the JSON snapshot format.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;

use folio_core::LedgerSnapshot;
use folio_core::reports::{Report, ReportContext, ReportRequest, ReportService};

const CASH: &str = "00000000-0000-7000-8000-000000000001";
const SALES: &str = "00000000-0000-7000-8000-000000000002";
const CUSTOMER: &str = "00000000-0000-7000-8000-0000000000c1";

fn snapshot() -> LedgerSnapshot {
    let value = json!({
        "accounts": [
            {"id": CASH, "code": "1000", "name": "Cash", "type": "Asset", "subtype": "Bank"},
            {"id": SALES, "code": "4000", "name": "Sales", "type": "REVENUE", "cash_flow_category": ""}
        ],
        "journal_entries": [
            {"id": "00000000-0000-7000-8000-0000000000e1", "transaction_date": "2024-12-31T23:30:00-05:00", "description": "Late sale"},
            {"id": "00000000-0000-7000-8000-0000000000e2", "transaction_date": "2025-01-01T00:00:00Z", "description": "New year sale"}
        ],
        "journal_lines": [
            {"id": "00000000-0000-7000-8000-0000000000a1", "journal_entry_id": "00000000-0000-7000-8000-0000000000e1", "account_id": CASH, "debit": "100.00"},
            {"id": "00000000-0000-7000-8000-0000000000a2", "journal_entry_id": "00000000-0000-7000-8000-0000000000e1", "account_id": SALES, "credit": "100.00"},
            {"id": "00000000-0000-7000-8000-0000000000a3", "journal_entry_id": "00000000-0000-7000-8000-0000000000e2", "account_id": CASH, "debit": "40.00"},
            {"id": "00000000-0000-7000-8000-0000000000a4", "journal_entry_id": "00000000-0000-7000-8000-0000000000e2", "account_id": SALES, "credit": "40.00"}
        ],
        "invoices": [
            {"id": "00000000-0000-7000-8000-0000000000d1", "counterparty_id": CUSTOMER, "number": "INV-1",
             "issue_date": "2024-11-01", "due_date": "2024-12-01", "total": "300", "balance_due": "120", "status": "Partial"},
            {"id": "00000000-0000-7000-8000-0000000000d2", "counterparty_id": CUSTOMER, "number": "INV-2",
             "issue_date": "2024-11-15", "due_date": "2024-12-15", "total": "50", "status": "Paid"}
        ],
        "customers": [
            {"id": CUSTOMER, "name": "Globex"}
        ]
    });
    serde_json::from_value(value).unwrap()
}

fn context() -> ReportContext {
    let generated_at = NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    ReportContext::new(generated_at)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_local_midnight_edge_stays_in_its_year() {
    let request: ReportRequest = serde_json::from_value(json!({
        "report": "profit_and_loss",
        "start": "2024-01-01",
        "end": "2024-12-31"
    }))
    .unwrap();

    let report = ReportService::generate(&request, &snapshot(), &context()).unwrap();

    let Report::ProfitAndLoss(pnl) = report else {
        panic!("expected profit and loss");
    };
    assert_eq!(pnl.total_revenue, dec!(100.00));
    assert_eq!(pnl.net_income, dec!(100.00));
}

#[test]
fn test_trial_balance_output_shape() {
    let request = ReportRequest::TrialBalance {
        as_of: date(2025, 1, 1),
    };

    let report = ReportService::generate(&request, &snapshot(), &context()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["report"], "trial_balance");
    assert_eq!(json["header"]["period"]["kind"], "as_of");
    assert_eq!(json["header"]["period"]["as_of"], "2025-01-01");
    assert_eq!(json["rows"][0]["kind"], "line");
    assert_eq!(json["rows"][0]["debit"], "140.00");
    assert_eq!(json["rows"][2]["kind"], "total");
    assert_eq!(json["totals"]["is_balanced"], true);
}

#[test]
fn test_receivables_aging_from_wire() {
    let request: ReportRequest = serde_json::from_value(json!({
        "report": "receivables_aging",
        "as_of": "2024-12-31"
    }))
    .unwrap();

    let report = ReportService::generate(&request, &snapshot(), &context()).unwrap();

    let Report::ReceivablesAging(aging) = report else {
        panic!("expected receivables aging");
    };
    assert_eq!(aging.rows[0].name, "Globex");
    assert_eq!(aging.rows[0].amounts.days_1_30, dec!(120));
    assert_eq!(aging.totals.total, dec!(120));
    assert_eq!(aging.document_count, 1);
}

#[test]
fn test_aging_counterparty_filter_from_wire() {
    let request = |counterparty_id: &str| -> ReportRequest {
        serde_json::from_value(json!({
            "report": "receivables_aging",
            "as_of": "2024-12-31",
            "counterparty_id": counterparty_id
        }))
        .unwrap()
    };

    let selected = ReportService::generate(&request(CUSTOMER), &snapshot(), &context()).unwrap();
    let other = ReportService::generate(
        &request("00000000-0000-7000-8000-0000000000c2"),
        &snapshot(),
        &context(),
    )
    .unwrap();

    let Report::ReceivablesAging(selected) = selected else {
        panic!("expected receivables aging");
    };
    assert_eq!(selected.rows[0].name, "Globex");
    assert_eq!(selected.totals.total, dec!(120));
    assert_eq!(other.row_count(), 0);
}

#[test]
fn test_unknown_account_type_fails_report() {
    let mut snapshot = snapshot();
    snapshot.accounts[1].account_type = "income".to_string();

    let err = ReportService::generate(
        &ReportRequest::BalanceSheet {
            as_of: date(2024, 12, 31),
        },
        &snapshot,
        &context(),
    )
    .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("unknown account type 'income'"));
}

#[test]
fn test_output_is_stable() {
    let request = ReportRequest::GeneralLedger {
        start: date(2024, 12, 1),
        end: date(2025, 1, 31),
        account_id: None,
        account_type: None,
    };
    let snapshot = snapshot();

    let render = || {
        let report = ReportService::generate(&request, &snapshot, &context()).unwrap();
        serde_json::to_string(&report).unwrap()
    };
    let first = render();
    let second = render();

    assert_eq!(first, second);
}
