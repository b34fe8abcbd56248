//! Test fixtures for building small sets of books.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use folio_shared::types::{AccountId, JournalEntryId, JournalLineId};

use crate::ledger::{Account, JournalEntry, JournalEntryLine, LedgerView};
use crate::snapshot::LedgerSnapshot;

use super::types::ReportContext;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn context() -> ReportContext {
    let generated_at: NaiveDateTime = date(2025, 1, 15).and_hms_opt(9, 30, 0).unwrap();
    ReportContext::new(generated_at).with_company_name("Acme Ltd")
}

#[derive(Debug, Default, Clone)]
pub struct Books {
    pub accounts: Vec<Account>,
    pub entries: Vec<JournalEntry>,
    pub lines: Vec<JournalEntryLine>,
}

impl Books {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&mut self, name: &str, account_type: &str) -> AccountId {
        self.account_with(name, account_type, None, None)
    }

    pub fn account_with(
        &mut self,
        name: &str,
        account_type: &str,
        subtype: Option<&str>,
        cash_flow_category: Option<&str>,
    ) -> AccountId {
        let id = AccountId::new();
        self.accounts.push(Account {
            id,
            code: None,
            name: name.to_string(),
            account_type: account_type.to_string(),
            subtype: subtype.map(str::to_string),
            cash_flow_category: cash_flow_category.map(str::to_string),
        });
        id
    }

    pub fn post(
        &mut self,
        on: NaiveDate,
        reference: Option<&str>,
        legs: &[(AccountId, Decimal, Decimal)],
    ) -> JournalEntryId {
        let entry = JournalEntry {
            id: JournalEntryId::new(),
            transaction_date: on,
            description: format!("Entry {}", self.entries.len() + 1),
            reference: reference.map(str::to_string),
        };
        for (account_id, debit, credit) in legs {
            self.lines.push(JournalEntryLine {
                id: JournalLineId::new(),
                journal_entry_id: entry.id,
                account_id: *account_id,
                debit: *debit,
                credit: *credit,
                description: None,
            });
        }
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Debits one account and credits another.
    pub fn transfer(
        &mut self,
        on: NaiveDate,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: Decimal,
    ) -> JournalEntryId {
        self.post(
            on,
            None,
            &[
                (debit_account, amount, Decimal::ZERO),
                (credit_account, Decimal::ZERO, amount),
            ],
        )
    }

    pub fn view(&self) -> LedgerView<'_> {
        LedgerView::new(&self.accounts, &self.entries, &self.lines).unwrap()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            accounts: self.accounts.clone(),
            journal_entries: self.entries.clone(),
            journal_lines: self.lines.clone(),
            ..LedgerSnapshot::default()
        }
    }
}
