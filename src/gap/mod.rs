//! Gaps: free, workable intervals on a resource's calendar.
//!
//! A [`Gap`] is an interval `[start, end)` of unallocated time on one
//! resource. Its workable-hour capacity is computed once, at construction,
//! from the resource's [`CapacityCalendar`], and never changes: every
//! operation that reshapes a gap returns new gaps.
//!
//! # Operations
//!
//! - **Fit test** ([`Gap::can_fit`]): can a candidate be placed here at all?
//! - **Criteria splitting** ([`Gap::split_into_gaps_satisfying_criteria`]):
//!   cut a gap where the resource's capabilities change.
//! - **Hour distribution**
//!   ([`Gap::hours_until_allocating_and_going_to_the_end`]): how many hours
//!   go on each day when work is placed in the gap.
//! - **Queue provenance** ([`GapOnQueue`]): keep track of the queue a gap
//!   came from while splitting it.
//!
//! # Capacity Rules
//! For a bounded gap starting at `(ds, hs)` and ending at `(de, he)`:
//! - same day: `capacity(ds) - max(hs, he)`
//! - otherwise: `(capacity(ds) - hs) + workable(ds+1 ..= de-1) + he`
//!
//! An unbounded gap has [`GapCapacity::Unbounded`], which is sufficient for
//! any request.

mod distribution;
mod on_queue;
mod split;

pub use on_queue::GapOnQueue;
pub use split::CriteriaRun;

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GapError, GapResult};
use crate::models::{Candidate, CapacityCalendar, DateAndHour, EndTime, Resource};

/// Workable hours available in a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GapCapacity {
    /// A finite number of hours.
    Hours(u32),
    /// Open-ended gap; always sufficient.
    Unbounded,
}

impl GapCapacity {
    /// Whether `hours` fit in this capacity.
    #[inline]
    pub fn is_sufficient_for(&self, hours: u32) -> bool {
        match self {
            GapCapacity::Hours(available) => *available >= hours,
            GapCapacity::Unbounded => true,
        }
    }

    /// Finite hours, or `None` for an unbounded gap.
    #[inline]
    pub fn hours(&self) -> Option<u32> {
        match self {
            GapCapacity::Hours(h) => Some(*h),
            GapCapacity::Unbounded => None,
        }
    }

    /// Hours as a plain integer, `u32::MAX` standing in for unbounded.
    #[inline]
    pub fn as_hours(&self) -> u32 {
        self.hours().unwrap_or(u32::MAX)
    }
}

/// A free interval `[start_time, end_time)` on one resource.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_gaps::gap::Gap;
/// use u_gaps::models::{DateAndHour, QueueElement, Resource};
///
/// // 2024-01-08 is a Monday; the default calendar has 8 hours Mon–Fri.
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// let wednesday = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let resource = Resource::new("W1");
///
/// let gap = Gap::create(
///     &resource,
///     DateAndHour::new(monday, 2),
///     DateAndHour::new(wednesday, 4),
/// ).unwrap();
/// assert_eq!(gap.hours_in_gap(), 6 + 8 + 4);
///
/// let task = QueueElement::new("E1", monday, 16);
/// assert!(gap.can_fit(&task));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Gap {
    resource_id: String,
    start_time: DateAndHour,
    end_time: EndTime,
    capacity: GapCapacity,
}

impl Gap {
    /// Creates a gap on `resource`, computing its capacity from the
    /// resource's calendar.
    ///
    /// # Errors
    /// [`GapError::InvalidInterval`] if `end` is before `start`.
    pub fn create(
        resource: &Resource,
        start: DateAndHour,
        end: impl Into<EndTime>,
    ) -> GapResult<Self> {
        Self::with_calendar(resource.id.as_str(), resource.calendar(), start, end)
    }

    /// Creates a gap using an arbitrary capacity calendar.
    ///
    /// # Errors
    /// [`GapError::InvalidInterval`] if `end` is before `start`.
    pub fn with_calendar<C: CapacityCalendar + ?Sized>(
        resource_id: impl Into<String>,
        calendar: &C,
        start: DateAndHour,
        end: impl Into<EndTime>,
    ) -> GapResult<Self> {
        let end = end.into();
        if end < EndTime::Bounded(start) {
            return Err(GapError::InvalidInterval { start, end });
        }
        Ok(Self::build(resource_id.into(), calendar, start, end))
    }

    /// Builds a gap whose bounds are already known to be ordered.
    pub(crate) fn build<C: CapacityCalendar + ?Sized>(
        resource_id: String,
        calendar: &C,
        start_time: DateAndHour,
        end_time: EndTime,
    ) -> Self {
        debug_assert!(EndTime::Bounded(start_time) <= end_time);
        Self {
            capacity: calculate_hours_in_gap(calendar, start_time, end_time),
            resource_id,
            start_time,
            end_time,
        }
    }

    /// Identifier of the resource owning this gap.
    #[inline]
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Gap start (inclusive).
    #[inline]
    pub fn start_time(&self) -> DateAndHour {
        self.start_time
    }

    /// Gap end (exclusive), possibly unbounded.
    #[inline]
    pub fn end_time(&self) -> EndTime {
        self.end_time
    }

    /// Whether the gap is open towards the future.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.end_time.is_unbounded()
    }

    /// Workable hours in the gap.
    #[inline]
    pub fn capacity(&self) -> GapCapacity {
        self.capacity
    }

    /// Workable hours in the gap, `u32::MAX` for an unbounded gap.
    ///
    /// Prefer [`capacity`](Self::capacity) when doing arithmetic.
    #[inline]
    pub fn hours_in_gap(&self) -> u32 {
        self.capacity.as_hours()
    }

    /// Whether `candidate` may be placed in this gap.
    ///
    /// True iff the candidate may already start on the gap's start date,
    /// may already end by the gap's end date (always, if unbounded), and
    /// needs no more hours than the gap offers.
    pub fn can_fit<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        self.can_satisfy_start_constraint(candidate.earliest_start_because_of_precedence())
            && self.can_satisfy_end_constraint(candidate.earliest_end_because_of_precedence())
            && self.capacity.is_sufficient_for(candidate.total_hours_needed())
    }

    fn can_satisfy_start_constraint(&self, starts_after: NaiveDate) -> bool {
        starts_after <= self.start_time.date()
    }

    fn can_satisfy_end_constraint(&self, ends_after: NaiveDate) -> bool {
        self.end_time.date().map_or(true, |end| ends_after <= end)
    }

    /// Orders gaps by start time.
    pub fn cmp_by_start(&self, other: &Gap) -> Ordering {
        self.start_time.cmp(&other.start_time)
    }

    /// Whether this gap starts before `other`.
    pub fn is_before(&self, other: &Gap) -> bool {
        self.cmp_by_start(other) == Ordering::Less
    }

    /// Whether `other` lies within this gap.
    pub fn contains(&self, other: &Gap) -> bool {
        other.start_time >= self.start_time && other.end_time <= self.end_time
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start_time)?;
        if let EndTime::Bounded(end) = self.end_time {
            write!(f, "; {end}")?;
        }
        Ok(())
    }
}

fn calculate_hours_in_gap<C: CapacityCalendar + ?Sized>(
    calendar: &C,
    start: DateAndHour,
    end: EndTime,
) -> GapCapacity {
    let Some(end) = end.bounded() else {
        return GapCapacity::Unbounded;
    };
    let (start_date, end_date) = (start.date(), end.date());

    if start_date == end_date {
        // Hours left after the later of both marks.
        let capacity = calendar.capacity_at(start_date);
        return GapCapacity::Hours(capacity.saturating_sub(start.hour().max(end.hour())));
    }

    let hours_at_start = calendar
        .capacity_at(start_date)
        .saturating_sub(start.hour());
    let hours_in_between = match (start_date.succ_opt(), end_date.pred_opt()) {
        (Some(first), Some(last)) => calendar.workable_hours(first, last),
        _ => 0,
    };
    GapCapacity::Hours(
        hours_at_start
            .saturating_add(hours_in_between)
            .saturating_add(end.hour()),
    )
}
