//! Resource capacity calendars.
//!
//! A calendar answers one question: how many workable hours does a
//! resource offer on a given date. Everything above it (gaps, fit tests,
//! splitting) is built on that single query plus its range sum.
//!
//! # Capacity Model
//! Capacity is a whole number of hours per calendar date. A date with
//! capacity 0 is a non-working day (weekend, holiday, shutdown).
//!
//! # Precedence
//! Exceptions override the weekly pattern. When several exceptions cover
//! the same date, the one added last wins.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::Days;

/// Source of per-day workable hours for a resource.
///
/// Implementations are expected to be consistent: `workable_hours` over a
/// range equals the sum of `capacity_at` over its days. The default
/// `workable_hours` relies on that.
pub trait CapacityCalendar {
    /// Workable hours on `date`.
    fn capacity_at(&self, date: NaiveDate) -> u32;

    /// Total workable hours in `[first, last]`. Zero when `last < first`.
    fn workable_hours(&self, first: NaiveDate, last: NaiveDate) -> u32 {
        Days::inclusive(first, last)
            .map(|day| self.capacity_at(day))
            .fold(0, u32::saturating_add)
    }
}

impl<C: CapacityCalendar + ?Sized> CapacityCalendar for &C {
    fn capacity_at(&self, date: NaiveDate) -> u32 {
        (**self).capacity_at(date)
    }

    fn workable_hours(&self, first: NaiveDate, last: NaiveDate) -> u32 {
        (**self).workable_hours(first, last)
    }
}

/// A date range `[start, end]` with overridden capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarException {
    /// First affected date (inclusive).
    pub start: NaiveDate,
    /// Last affected date (inclusive).
    pub end: NaiveDate,
    /// Workable hours on every affected date.
    pub hours: u32,
}

impl CalendarException {
    /// Creates an exception covering `[start, end]`.
    pub fn new(start: NaiveDate, end: NaiveDate, hours: u32) -> Self {
        Self { start, end, hours }
    }

    /// Whether `date` is covered.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Weekly capacity pattern with dated exceptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    /// Calendar identifier.
    pub id: String,
    /// Hours per weekday, Monday first.
    pub weekly_hours: [u32; 7],
    /// Dated overrides (holidays, overtime, shutdowns).
    pub exceptions: Vec<CalendarException>,
}

impl Calendar {
    /// Creates a calendar with the same capacity on every day of the week.
    pub fn uniform(id: impl Into<String>, hours: u32) -> Self {
        Self {
            id: id.into(),
            weekly_hours: [hours; 7],
            exceptions: Vec::new(),
        }
    }

    /// Creates a Monday–Friday calendar with `hours` per working day.
    pub fn working_week(id: impl Into<String>, hours: u32) -> Self {
        Self {
            id: id.into(),
            weekly_hours: [hours, hours, hours, hours, hours, 0, 0],
            exceptions: Vec::new(),
        }
    }

    /// Sets the capacity of one weekday.
    pub fn with_weekday(mut self, weekday: Weekday, hours: u32) -> Self {
        self.weekly_hours[weekday.num_days_from_monday() as usize] = hours;
        self
    }

    /// Overrides the capacity of a single date.
    pub fn with_exception(self, date: NaiveDate, hours: u32) -> Self {
        self.with_exception_range(date, date, hours)
    }

    /// Overrides the capacity of every date in `[start, end]`.
    pub fn with_exception_range(mut self, start: NaiveDate, end: NaiveDate, hours: u32) -> Self {
        self.exceptions
            .push(CalendarException::new(start, end, hours));
        self
    }

    /// Marks a date as non-working.
    pub fn with_holiday(self, date: NaiveDate) -> Self {
        self.with_exception(date, 0)
    }

    /// Whether any work can happen on `date`.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.capacity_at(date) > 0
    }
}

impl CapacityCalendar for Calendar {
    fn capacity_at(&self, date: NaiveDate) -> u32 {
        // Last added exception wins
        if let Some(exception) = self.exceptions.iter().rev().find(|e| e.contains(date)) {
            return exception.hours;
        }
        self.weekly_hours[date.weekday().num_days_from_monday() as usize]
    }
}
