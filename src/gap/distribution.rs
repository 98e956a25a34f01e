//! Day-by-day hour distribution inside a gap.
//!
//! # Algorithm
//!
//! 1. Walk the days from the real start's date to the gap end's date
//!    (or to the scan horizon when the gap is unbounded).
//! 2. Hours available on each day depend on its position in the walk:
//!    - first and last: `min(end.hour - start.hour, capacity)`
//!    - first only: `capacity - start.hour`
//!    - last only: `min(end.hour, capacity)`
//!    - otherwise: `capacity`
//! 3. With a positive budget, each day takes `min(available, remaining)`.
//!    Once the budget is spent the walk keeps going (uncapped) until it
//!    reaches the allocation end, so a task finishing mid-day still
//!    reserves the days up to its nominal end.
//! 4. With a zero budget nothing is capped and the whole walk is emitted.
//!
//! # Complexity
//! O(d) calendar lookups, d = days walked.

use chrono::NaiveDate;
use tracing::trace;

use super::Gap;
use crate::error::{GapError, GapResult};
use crate::models::{CapacityCalendar, DateAndHour, EndTime, ScanHorizon};

impl Gap {
    /// Hours to place on each day when allocating from `real_start`.
    ///
    /// Walks from `real_start` towards the gap end, distributing `total`
    /// hours (`0` = no cap). Uses the default [`ScanHorizon`] for
    /// unbounded gaps.
    ///
    /// # Errors
    /// - [`GapError::AllocationEndAfterGapEnd`] if `allocation_end` is after
    ///   a bounded gap end.
    /// - [`GapError::RealStartBeforeGapStart`] if `real_start` is before the
    ///   gap start.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use u_gaps::gap::Gap;
    /// use u_gaps::models::{Calendar, DateAndHour};
    ///
    /// let cal = Calendar::uniform("u", 8);
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    /// let gap = Gap::with_calendar("R1", &cal, DateAndHour::new(day, 0), DateAndHour::new(day, 8)).unwrap();
    ///
    /// let start = DateAndHour::new(day, 2);
    /// let hours = gap.hours_until_allocating_and_going_to_the_end(&cal, start, start, 0).unwrap();
    /// assert_eq!(hours, vec![6]);
    /// ```
    pub fn hours_until_allocating_and_going_to_the_end<C: CapacityCalendar + ?Sized>(
        &self,
        calendar: &C,
        real_start: DateAndHour,
        allocation_end: DateAndHour,
        total: u32,
    ) -> GapResult<Vec<u32>> {
        self.hours_until_allocating_with_horizon(
            calendar,
            real_start,
            allocation_end,
            total,
            &ScanHorizon::default(),
        )
    }

    /// Same as
    /// [`hours_until_allocating_and_going_to_the_end`](Self::hours_until_allocating_and_going_to_the_end)
    /// with an explicit horizon for unbounded gaps.
    pub fn hours_until_allocating_with_horizon<C: CapacityCalendar + ?Sized>(
        &self,
        calendar: &C,
        real_start: DateAndHour,
        allocation_end: DateAndHour,
        total: u32,
        horizon: &ScanHorizon,
    ) -> GapResult<Vec<u32>> {
        if let EndTime::Bounded(gap_end) = self.end_time {
            if allocation_end > gap_end {
                return Err(GapError::AllocationEndAfterGapEnd {
                    allocation_end,
                    gap_end,
                });
            }
        }
        if real_start < self.start_time {
            return Err(GapError::RealStartBeforeGapStart {
                real_start,
                gap_start: self.start_time,
            });
        }

        let capped = total > 0;
        let mut remaining = total;
        let mut days = real_start.days_until_end(&self.end_time, horizon).peekable();
        let mut result = Vec::with_capacity(days.len());
        let mut is_first = true;

        while let Some(day) = days.next() {
            let is_last = days.peek().is_none();
            let hours_at_day = self.hours_at_day(day, calendar, real_start, is_first, is_last);
            let hours = if remaining > 0 {
                let hours = hours_at_day.min(remaining);
                remaining -= hours;
                hours
            } else {
                hours_at_day
            };
            is_first = false;
            result.push(hours);

            if capped && remaining == 0 && DateAndHour::from(day) >= allocation_end {
                trace!(%day, "budget spent at allocation end");
                break;
            }
        }

        Ok(result)
    }

    fn hours_at_day<C: CapacityCalendar + ?Sized>(
        &self,
        day: NaiveDate,
        calendar: &C,
        real_start: DateAndHour,
        is_first: bool,
        is_last: bool,
    ) -> u32 {
        let capacity = calendar.capacity_at(day);
        // The last horizon day of an unbounded gap is an ordinary day.
        let end_hour = match self.end_time {
            EndTime::Bounded(end) if is_last => Some(end.hour()),
            _ => None,
        };
        match (is_first, end_hour) {
            (true, Some(end)) => end.saturating_sub(real_start.hour()).min(capacity),
            (true, None) => capacity.saturating_sub(real_start.hour()),
            (false, Some(end)) => end.min(capacity),
            (false, None) => capacity,
        }
    }
}
