//! Calendar date parsing and period membership.
//!
//! Dates are always handled as naive calendar days. Wire strings are
//! decomposed into year, month, and day from their leading `YYYY-MM-DD`
//! component; any time or offset suffix is ignored rather than converted, so a
//! line recorded late on the 31st never drifts into the 1st.

use std::ops::{Bound, RangeBounds};

use chrono::{NaiveDate, NaiveDateTime};

use super::error::LedgerError;

/// Parses a `YYYY-MM-DD` calendar date, ignoring any `T...` or ` ...` suffix.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    let invalid = || LedgerError::InvalidDate(raw.to_string());
    let trimmed = raw.trim();

    let head = trimmed.get(..10).ok_or_else(invalid)?;
    if let Some(separator) = trimmed.as_bytes().get(10)
        && !matches!(separator, b'T' | b't' | b' ')
    {
        return Err(invalid());
    }

    let mut parts = head.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(invalid());
    }
    if ![year, month, day]
        .iter()
        .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Serde adapter for calendar dates on the wire.
///
/// Use with `#[serde(with = "calendar_date")]`.
pub mod calendar_date {
    use std::borrow::Cow;

    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Writes the date as `YYYY-MM-DD`.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    /// Reads a date by explicit decomposition.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = Cow::<str>::deserialize(deserializer)?;
        super::parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Inclusive calendar-day membership predicate.
///
/// The start bound is midnight of the start date and the end bound is the
/// last instant (23:59:59.999) of the end date, so a line dated on the end
/// date is always included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodFilter {
    start: Bound<NaiveDate>,
    end: Bound<NaiveDate>,
}

impl PeriodFilter {
    /// Matches every date.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// Cumulative filter: every date up to and including `end`.
    #[must_use]
    pub const fn as_of(end: NaiveDate) -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Included(end),
        }
    }

    /// Every date strictly before `start`. Used for opening balances.
    #[must_use]
    pub const fn before(start: NaiveDate) -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Excluded(start),
        }
    }

    /// Period filter over `[start, end]`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end });
        }
        Ok(Self {
            start: Bound::Included(start),
            end: Bound::Included(end),
        })
    }

    /// Returns true if the calendar date falls inside the filter.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        RangeBounds::contains(self, &date)
    }

    /// Returns true if the instant falls inside the filter.
    ///
    /// Equivalent to `[start 00:00:00.000, end 23:59:59.999]`.
    #[must_use]
    pub fn contains_instant(&self, instant: NaiveDateTime) -> bool {
        self.contains(instant.date())
    }
}

impl RangeBounds<NaiveDate> for PeriodFilter {
    fn start_bound(&self) -> Bound<&NaiveDate> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&NaiveDate> {
        self.end.as_ref()
    }
}
