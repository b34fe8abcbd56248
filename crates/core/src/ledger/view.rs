//! Resolved, indexed view over a ledger snapshot.

use std::collections::{BTreeMap, HashMap};

use folio_shared::types::{AccountId, JournalEntryId};

use super::classifier::ClassifiedAccount;
use super::error::LedgerError;
use super::types::{Account, JournalEntry, JournalEntryLine};

/// A journal line paired with its owning entry.
#[derive(Debug, Clone, Copy)]
pub struct DatedLine<'a> {
    /// The line.
    pub line: &'a JournalEntryLine,
    /// The entry the line belongs to.
    pub entry: &'a JournalEntry,
}

/// Chart of accounts with every classification resolved, plus every line
/// joined to its entry.
///
/// Building the view is where configuration errors surface: an unknown
/// account type, an unknown cash flow tag, or a line pointing at a missing
/// account or entry fails the whole report.
#[derive(Debug, Clone)]
pub struct LedgerView<'a> {
    accounts: BTreeMap<AccountId, ClassifiedAccount>,
    lines: Vec<DatedLine<'a>>,
}

impl<'a> LedgerView<'a> {
    /// Resolves accounts and joins lines to entries.
    pub fn new(
        accounts: &[Account],
        entries: &'a [JournalEntry],
        lines: &'a [JournalEntryLine],
    ) -> Result<Self, LedgerError> {
        let mut chart = BTreeMap::new();
        for account in accounts {
            let classified = ClassifiedAccount::resolve(account)?;
            if chart.insert(account.id, classified).is_some() {
                return Err(LedgerError::DuplicateAccount(account.id));
            }
        }

        let entries_by_id: HashMap<JournalEntryId, &'a JournalEntry> =
            entries.iter().map(|entry| (entry.id, entry)).collect();

        let lines = lines
            .iter()
            .map(|line| {
                if !chart.contains_key(&line.account_id) {
                    return Err(LedgerError::AccountNotFound {
                        line_id: line.id,
                        account_id: line.account_id,
                    });
                }
                let entry = entries_by_id
                    .get(&line.journal_entry_id)
                    .copied()
                    .ok_or(LedgerError::JournalEntryNotFound {
                        line_id: line.id,
                        entry_id: line.journal_entry_id,
                    })?;
                Ok(DatedLine { line, entry })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            accounts: chart,
            lines,
        })
    }

    /// Looks up a resolved account.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&ClassifiedAccount> {
        self.accounts.get(&id)
    }

    /// All resolved accounts, in id order.
    pub fn accounts(&self) -> impl Iterator<Item = &ClassifiedAccount> {
        self.accounts.values()
    }

    /// All lines, in input order.
    #[must_use]
    pub fn lines(&self) -> &[DatedLine<'a>] {
        &self.lines
    }
}
