//! Day-granular timestamps.
//!
//! Gaps are measured in whole hours on top of a per-day calendar, so a
//! point in time is a calendar date plus an hour mark into that date's
//! workable hours. An hour mark is not a clock hour: `hour = 3` on a day
//! with 8 workable hours means "after the first 3 workable hours".
//!
//! # Open ends
//! The last gap of a queue has no end. [`EndTime::Unbounded`] models it
//! explicitly and sorts after every bounded end. Whenever an algorithm has
//! to walk an unbounded interval day by day, it walks up to a
//! [`ScanHorizon`] instead.

use std::fmt;
use std::iter::FusedIterator;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A (calendar date, hour mark) pair.
///
/// Ordered lexicographically by date, then hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateAndHour {
    date: NaiveDate,
    hour: u32,
}

impl DateAndHour {
    /// Creates a timestamp at `hour` workable hours into `date`.
    pub fn new(date: NaiveDate, hour: u32) -> Self {
        Self { date, hour }
    }

    /// Calendar date.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Hour mark within the date.
    #[inline]
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Days from this timestamp's date up to `to`'s date, both inclusive.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use u_gaps::models::DateAndHour;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
    /// let from = DateAndHour::new(d(4), 5);
    /// let to = DateAndHour::new(d(6), 0);
    /// assert_eq!(from.days_until(&to).collect::<Vec<_>>(), vec![d(4), d(5), d(6)]);
    /// ```
    pub fn days_until(&self, to: &DateAndHour) -> Days {
        Days::inclusive(self.date, to.date)
    }

    /// Days from this timestamp's date up to `end`.
    ///
    /// A bounded end behaves like [`days_until`](Self::days_until). An
    /// unbounded end stops on the last day before `horizon`'s limit.
    pub fn days_until_end(&self, end: &EndTime, horizon: &ScanHorizon) -> Days {
        match end {
            EndTime::Bounded(to) => self.days_until(to),
            EndTime::Unbounded => Days::exclusive(self.date, horizon.limit_from(self.date)),
        }
    }
}

impl From<NaiveDate> for DateAndHour {
    /// Hour 0 of `date`.
    fn from(date: NaiveDate) -> Self {
        Self::new(date, 0)
    }
}

impl fmt::Display for DateAndHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.date, self.hour)
    }
}

/// End of an interval: a timestamp, or open towards the future.
///
/// Variant order matters: the derived ordering puts every `Bounded` end
/// before `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EndTime {
    /// Ends at the given timestamp (exclusive).
    Bounded(DateAndHour),
    /// Never ends.
    Unbounded,
}

impl EndTime {
    /// Whether the interval is open-ended.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, EndTime::Unbounded)
    }

    /// The end timestamp, if bounded.
    #[inline]
    pub fn bounded(&self) -> Option<DateAndHour> {
        match self {
            EndTime::Bounded(t) => Some(*t),
            EndTime::Unbounded => None,
        }
    }

    /// The end date, if bounded.
    #[inline]
    pub fn date(&self) -> Option<NaiveDate> {
        self.bounded().map(|t| t.date())
    }
}

impl From<DateAndHour> for EndTime {
    fn from(t: DateAndHour) -> Self {
        EndTime::Bounded(t)
    }
}

impl From<Option<DateAndHour>> for EndTime {
    fn from(t: Option<DateAndHour>) -> Self {
        t.map_or(EndTime::Unbounded, EndTime::Bounded)
    }
}

/// Finite stand-in for "forever" when walking open-ended intervals.
///
/// The limit is exclusive and counted from the first walked date.
/// Defaults to 10 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanHorizon {
    /// Horizon length in calendar years.
    pub years: u32,
}

impl ScanHorizon {
    /// Horizon of the given number of years.
    pub fn years(years: u32) -> Self {
        Self { years }
    }

    /// First date no longer scanned when starting at `start`.
    ///
    /// Month arithmetic clamps to the end of the month, so Feb 29 plus one
    /// year lands on Feb 28.
    pub fn limit_from(&self, start: NaiveDate) -> NaiveDate {
        start
            .checked_add_months(Months::new(self.years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Default for ScanHorizon {
    fn default() -> Self {
        Self::years(10)
    }
}

/// Lazy sequence of consecutive calendar days.
///
/// Cloning restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    last: Option<NaiveDate>,
}

impl Days {
    /// Days in `[first, last]`. Empty when `last < first`.
    pub fn inclusive(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            next: Some(first),
            last: Some(last),
        }
    }

    /// Days in `[first, limit)`. Empty when `limit <= first`.
    pub fn exclusive(first: NaiveDate, limit: NaiveDate) -> Self {
        Self {
            next: Some(first),
            last: limit.pred_opt(),
        }
    }

    fn remaining(&self) -> usize {
        match (self.next, self.last) {
            (Some(next), Some(last)) if next <= last => {
                (last.signed_duration_since(next).num_days() + 1) as usize
            }
            _ => 0,
        }
    }
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        match self.last {
            Some(last) if current <= last => {
                self.next = current.succ_opt();
                Some(current)
            }
            _ => {
                self.next = None;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Days {}

impl FusedIterator for Days {}
