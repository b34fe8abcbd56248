//! Account balance aggregation.
//!
//! Raw debits and raw credits are always accumulated separately; netting and
//! sign convention are left to the statement builders.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_shared::types::AccountId;

use super::classifier::{ClassifiedAccount, NormalSide};
use super::period::PeriodFilter;
use super::types::JournalEntryLine;
use super::view::{DatedLine, LedgerView};

/// Raw debit and credit totals for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
}

impl AccountTotals {
    /// Creates totals from raw sums.
    #[must_use]
    pub const fn new(debit_total: Decimal, credit_total: Decimal) -> Self {
        Self {
            debit_total,
            credit_total,
        }
    }

    /// Adds a debit amount.
    pub fn add_debit(&mut self, amount: Decimal) {
        self.debit_total += amount;
    }

    /// Adds a credit amount.
    pub fn add_credit(&mut self, amount: Decimal) {
        self.credit_total += amount;
    }

    /// Adds both sides of a journal line.
    pub fn add_line(&mut self, line: &JournalEntryLine) {
        self.add_debit(line.debit);
        self.add_credit(line.credit);
    }

    /// Folds another set of totals into this one.
    pub fn merge(&mut self, other: &Self) {
        self.debit_total += other.debit_total;
        self.credit_total += other.credit_total;
    }

    /// Debit minus credit.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.debit_total - self.credit_total
    }

    /// Balance signed positive on the given normal side.
    #[must_use]
    pub fn signed(&self, side: NormalSide) -> Decimal {
        side.signed_balance(self.debit_total, self.credit_total)
    }

    /// Returns true if no amount has been accumulated on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.debit_total.is_zero() && self.credit_total.is_zero()
    }
}

/// Per-account totals, keyed in account id order.
pub type BalanceMap = BTreeMap<AccountId, AccountTotals>;

/// Looks up an account's signed balance, zero if it had no activity.
#[must_use]
pub fn signed_balance(balances: &BalanceMap, account: &ClassifiedAccount) -> Decimal {
    balances
        .get(&account.id)
        .map_or(Decimal::ZERO, |totals| totals.signed(account.normal_side()))
}

/// Line count at which the cumulative, opening, and period totals switch to
/// [`BalanceAggregator::par_aggregate`].
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Folds journal lines into per-account totals.
#[derive(Debug, Clone, Copy)]
pub struct BalanceAggregator<'v, 'a> {
    view: &'v LedgerView<'a>,
}

impl<'v, 'a> BalanceAggregator<'v, 'a> {
    /// Creates an aggregator over a resolved ledger.
    #[must_use]
    pub const fn new(view: &'v LedgerView<'a>) -> Self {
        Self { view }
    }

    /// Totals for lines whose entry date passes `period` and whose account
    /// passes `account_filter`.
    pub fn aggregate<F>(&self, period: &PeriodFilter, account_filter: F) -> BalanceMap
    where
        F: Fn(&ClassifiedAccount) -> bool,
    {
        self.view
            .lines()
            .iter()
            .filter(|dated| self.selects(dated, period, &account_filter))
            .fold(BalanceMap::new(), |mut balances, dated| {
                balances
                    .entry(dated.line.account_id)
                    .or_default()
                    .add_line(dated.line);
                balances
            })
    }

    /// Same result as [`Self::aggregate`], computed over partitions of the
    /// line set in parallel and merged.
    pub fn par_aggregate<F>(&self, period: &PeriodFilter, account_filter: F) -> BalanceMap
    where
        F: Fn(&ClassifiedAccount) -> bool + Sync,
    {
        self.view
            .lines()
            .par_iter()
            .filter(|dated| self.selects(dated, period, &account_filter))
            .fold(BalanceMap::new, |mut balances, dated| {
                balances
                    .entry(dated.line.account_id)
                    .or_default()
                    .add_line(dated.line);
                balances
            })
            .reduce(BalanceMap::new, merge_balances)
    }

    /// All activity up to and including `as_of`.
    #[must_use]
    pub fn cumulative(&self, as_of: chrono::NaiveDate) -> BalanceMap {
        self.all_accounts(&PeriodFilter::as_of(as_of))
    }

    /// All activity strictly before `start`.
    #[must_use]
    pub fn opening(&self, start: chrono::NaiveDate) -> BalanceMap {
        self.all_accounts(&PeriodFilter::before(start))
    }

    /// Activity inside `period` only.
    #[must_use]
    pub fn period(&self, period: &PeriodFilter) -> BalanceMap {
        self.all_accounts(period)
    }

    /// Returns true when the line set is large enough to aggregate in parallel.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.view.lines().len() >= PARALLEL_THRESHOLD
    }

    fn all_accounts(&self, period: &PeriodFilter) -> BalanceMap {
        if self.is_parallel() {
            self.par_aggregate(period, |_| true)
        } else {
            self.aggregate(period, |_| true)
        }
    }

    fn selects<F>(&self, dated: &DatedLine<'a>, period: &PeriodFilter, account_filter: &F) -> bool
    where
        F: Fn(&ClassifiedAccount) -> bool,
    {
        period.contains(dated.entry.transaction_date)
            && self
                .view
                .account(dated.line.account_id)
                .is_some_and(account_filter)
    }
}

/// Merges two partial aggregations.
#[must_use]
pub fn merge_balances(mut left: BalanceMap, right: BalanceMap) -> BalanceMap {
    for (account_id, totals) in right {
        left.entry(account_id).or_default().merge(&totals);
    }
    left
}

/// Running balance for one line of an account ledger.
///
/// - `previous_balance`: balance before this line
/// - `current_balance`: balance after this line
/// - `sequence`: 1-based position within the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Position of the line within the walk.
    pub sequence: u64,
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts a walk from an opening balance.
    #[must_use]
    pub const fn opening(balance: Decimal) -> Self {
        Self {
            sequence: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Advances the walk by one line.
    ///
    /// `current[N] = current[N-1] + change` and `previous[N] = current[N-1]`.
    #[must_use]
    pub fn next(&self, change: Decimal) -> Self {
        Self {
            sequence: self.sequence + 1,
            previous_balance: self.current_balance,
            current_balance: self.current_balance + change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{Account, JournalEntry};
    use chrono::NaiveDate;
    use folio_shared::types::{JournalEntryId, JournalLineId};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        accounts: Vec<Account>,
        entries: Vec<JournalEntry>,
        lines: Vec<JournalEntryLine>,
    }

    impl Fixture {
        fn new() -> Self {
            let account = |name: &str, account_type: &str| Account {
                id: AccountId::new(),
                code: None,
                name: name.to_string(),
                account_type: account_type.to_string(),
                subtype: None,
                cash_flow_category: None,
            };
            Self {
                accounts: vec![account("Cash", "asset"), account("Sales", "revenue")],
                entries: Vec::new(),
                lines: Vec::new(),
            }
        }

        fn post(&mut self, on: NaiveDate, amount: Decimal) {
            let entry = JournalEntry {
                id: JournalEntryId::new(),
                transaction_date: on,
                description: "Sale".to_string(),
                reference: None,
            };
            for (account, debit, credit) in [
                (self.accounts[0].id, amount, Decimal::ZERO),
                (self.accounts[1].id, Decimal::ZERO, amount),
            ] {
                self.lines.push(JournalEntryLine {
                    id: JournalLineId::new(),
                    journal_entry_id: entry.id,
                    account_id: account,
                    debit,
                    credit,
                    description: None,
                });
            }
            self.entries.push(entry);
        }

        fn view(&self) -> LedgerView<'_> {
            LedgerView::new(&self.accounts, &self.entries, &self.lines).unwrap()
        }
    }

    #[test]
    fn test_totals_keep_sides_separate() {
        let mut totals = AccountTotals::default();
        totals.add_debit(dec!(100));
        totals.add_credit(dec!(30));
        assert_eq!(totals.debit_total, dec!(100));
        assert_eq!(totals.credit_total, dec!(30));
        assert_eq!(totals.net_debit(), dec!(70));
        assert_eq!(totals.signed(NormalSide::Credit), dec!(-70));
    }

    #[test]
    fn test_cumulative_includes_cutoff_day() {
        let mut fixture = Fixture::new();
        fixture.post(date(2024, 1, 31), dec!(100));
        fixture.post(date(2024, 2, 1), dec!(50));
        let view = fixture.view();
        let balances = BalanceAggregator::new(&view).cumulative(date(2024, 1, 31));

        let cash = balances[&fixture.accounts[0].id];
        assert_eq!(cash, AccountTotals::new(dec!(100), Decimal::ZERO));
    }

    #[test]
    fn test_opening_excludes_start_day() {
        let mut fixture = Fixture::new();
        fixture.post(date(2023, 12, 31), dec!(10));
        fixture.post(date(2024, 1, 1), dec!(20));
        let view = fixture.view();
        let balances = BalanceAggregator::new(&view).opening(date(2024, 1, 1));

        assert_eq!(balances[&fixture.accounts[1].id].credit_total, dec!(10));
    }

    #[test]
    fn test_period_spans_year_boundary() {
        let mut fixture = Fixture::new();
        fixture.post(date(2024, 12, 30), dec!(1));
        fixture.post(date(2024, 12, 31), dec!(2));
        fixture.post(date(2025, 1, 1), dec!(4));
        let view = fixture.view();
        let period = PeriodFilter::between(date(2024, 12, 31), date(2025, 1, 1)).unwrap();
        let balances = BalanceAggregator::new(&view).period(&period);

        assert_eq!(balances[&fixture.accounts[0].id].debit_total, dec!(6));
    }

    #[test]
    fn test_account_filter_limits_accounts() {
        let mut fixture = Fixture::new();
        fixture.post(date(2024, 1, 1), dec!(5));
        let view = fixture.view();
        let balances = BalanceAggregator::new(&view)
            .aggregate(&PeriodFilter::all(), |account| account.name == "Sales");

        assert_eq!(balances.len(), 1);
        assert!(balances.contains_key(&fixture.accounts[1].id));
    }

    #[test]
    fn test_empty_ledger_aggregates_to_nothing() {
        let fixture = Fixture::new();
        let view = fixture.view();
        assert!(BalanceAggregator::new(&view).cumulative(date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_running_balance_chain() {
        let opening = RunningBalance::opening(dec!(100));
        let first = opening.next(dec!(-40));
        let second = first.next(dec!(15.50));
        assert_eq!(first.previous_balance, dec!(100));
        assert_eq!(first.current_balance, dec!(60));
        assert_eq!(second.previous_balance, first.current_balance);
        assert_eq!(second.current_balance, dec!(75.50));
        assert_eq!(second.sequence, 2);
    }

    #[test]
    fn test_large_ledgers_aggregate_in_parallel() {
        let mut fixture = Fixture::new();
        for day in 0..PARALLEL_THRESHOLD / 2 {
            let offset = u64::try_from(day % 365).unwrap();
            fixture.post(date(2024, 1, 1) + chrono::Days::new(offset), dec!(1.25));
        }
        let view = fixture.view();
        let aggregator = BalanceAggregator::new(&view);
        let period = PeriodFilter::between(date(2024, 3, 1), date(2024, 6, 30)).unwrap();

        assert!(aggregator.is_parallel());
        assert_eq!(aggregator.period(&period), aggregator.aggregate(&period, |_| true));

        let cash = aggregator.cumulative(date(2024, 12, 31))[&fixture.accounts[0].id];
        assert_eq!(cash.debit_total, dec!(6250.00));
    }

    #[test]
    fn test_small_ledgers_stay_sequential() {
        let mut fixture = Fixture::new();
        fixture.post(date(2024, 1, 1), dec!(5));
        let view = fixture.view();
        assert!(!BalanceAggregator::new(&view).is_parallel());
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Parallel and sequential aggregation agree for any posting set.
        #[test]
        fn prop_par_aggregate_matches_sequential(
            postings in prop::collection::vec((0u32..60, amount_strategy()), 0..200),
        ) {
            let mut fixture = Fixture::new();
            for (offset, amount) in postings {
                fixture.post(date(2024, 1, 1) + chrono::Days::new(u64::from(offset)), amount);
            }
            let view = fixture.view();
            let aggregator = BalanceAggregator::new(&view);
            let period = PeriodFilter::between(date(2024, 1, 10), date(2024, 2, 10)).unwrap();

            prop_assert_eq!(
                aggregator.aggregate(&period, |_| true),
                aggregator.par_aggregate(&period, |_| true)
            );
        }

        /// Folding order never changes the totals.
        #[test]
        fn prop_aggregation_is_order_independent(
            amounts in prop::collection::vec(amount_strategy(), 1..50),
        ) {
            let mut forward = Fixture::new();
            let mut reversed = Fixture::new();
            reversed.accounts = forward.accounts.clone();
            for amount in &amounts {
                forward.post(date(2024, 3, 1), *amount);
            }
            for amount in amounts.iter().rev() {
                reversed.post(date(2024, 3, 1), *amount);
            }
            let forward_view = forward.view();
            let reversed_view = reversed.view();

            prop_assert_eq!(
                BalanceAggregator::new(&forward_view).cumulative(date(2024, 3, 1)),
                BalanceAggregator::new(&reversed_view).cumulative(date(2024, 3, 1))
            );
        }

        /// The final running balance equals opening plus every change.
        #[test]
        fn prop_running_balance_sums_changes(
            opening in amount_strategy(),
            changes in prop::collection::vec(amount_strategy(), 0..30),
        ) {
            let mut running = RunningBalance::opening(opening);
            for change in &changes {
                running = running.next(*change);
            }
            let expected: Decimal = opening + changes.iter().copied().sum::<Decimal>();
            prop_assert_eq!(running.current_balance, expected);
            prop_assert_eq!(running.sequence, changes.len() as u64);
        }
    }
}
