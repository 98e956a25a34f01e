//! First-fit gap search on a limiting resource queue.
//!
//! # Algorithm
//!
//! 1. Walk the queue's gaps in order.
//! 2. Skip gaps that cannot fit the candidate ([`Gap::can_fit`](crate::gap::Gap::can_fit)).
//! 3. If the candidate requires criteria, split the gap and keep the
//!    stretches where the resource satisfies all of them and that still
//!    fit the candidate.
//! 4. Allocate into the first surviving gap: start at its start, nominal
//!    end at the candidate's earliest end, hours distributed day by day.
//!
//! # Complexity
//! O(g * d) where g = gaps in the queue, d = days per gap (bounded by the
//! scan horizon for the open-ended last gap).

use tracing::debug;

use crate::error::GapResult;
use crate::gap::GapOnQueue;
use crate::models::{
    Candidate, CompoundCriterion, Criterion, CriterionCompounder, DateAndHour,
    LimitingResourceQueue, ScanHorizon,
};

/// Where and how a candidate would be placed.
#[derive(Debug, Clone)]
pub struct GapAllocation<'q> {
    /// Gap receiving the candidate.
    pub gap: GapOnQueue<'q>,
    /// First hour of work.
    pub start: DateAndHour,
    /// Nominal end of the allocation.
    pub end: DateAndHour,
    /// Hours per day, starting at `start`'s date.
    pub hours_per_day: Vec<u32>,
}

impl GapAllocation<'_> {
    /// Sum of allocated hours.
    pub fn total_hours(&self) -> u32 {
        self.hours_per_day.iter().fold(0, |acc, h| acc.saturating_add(*h))
    }

    /// Number of days touched.
    pub fn day_count(&self) -> usize {
        self.hours_per_day.len()
    }
}

/// First-fit search over a queue's gaps.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_gaps::models::{DateAndHour, LimitingResourceQueue, QueueElement, Resource};
/// use u_gaps::scheduler::GapFinder;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// let queue = LimitingResourceQueue::new("Q1", Resource::new("W1"))
///     .with_open_gap_from(DateAndHour::from(monday));
///
/// let task = QueueElement::new("E1", monday, 20);
/// let allocation = GapFinder::new().find(&queue, &task, &[]).unwrap().unwrap();
/// assert_eq!(allocation.hours_per_day, vec![8, 8, 4]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GapFinder {
    horizon: ScanHorizon,
}

impl GapFinder {
    /// Creates a finder with the default scan horizon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scan horizon used for unbounded gaps.
    pub fn with_horizon(mut self, horizon: ScanHorizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// The scan horizon in use.
    pub fn horizon(&self) -> &ScanHorizon {
        &self.horizon
    }

    /// Every gap (or criteria-satisfying stretch of a gap) able to host
    /// `candidate`, in queue order.
    pub fn fitting_gaps<'q, C: Candidate + ?Sized>(
        &self,
        queue: &'q LimitingResourceQueue,
        candidate: &C,
        criteria: &[Criterion],
    ) -> Vec<GapOnQueue<'q>> {
        let requirement = requirement_for(criteria);
        queue
            .gaps_on_queue()
            .into_iter()
            .flat_map(|gap| self.fits_in(gap, candidate, requirement.as_ref()))
            .collect()
    }

    /// Allocates `candidate` into the first gap able to host it.
    ///
    /// Returns `Ok(None)` when no gap fits.
    ///
    /// # Errors
    /// Propagates [`GapError`](crate::error::GapError) from the hour
    /// distribution.
    pub fn find<'q, C: Candidate + ?Sized>(
        &self,
        queue: &'q LimitingResourceQueue,
        candidate: &C,
        criteria: &[Criterion],
    ) -> GapResult<Option<GapAllocation<'q>>> {
        let requirement = requirement_for(criteria);
        for gap in queue.gaps_on_queue() {
            if let Some(first) = self
                .fits_in(gap, candidate, requirement.as_ref())
                .into_iter()
                .next()
            {
                let allocation = self.allocate(first, candidate)?;
                debug!(
                    queue = %queue.id,
                    gap = %allocation.gap.gap(),
                    hours = allocation.total_hours(),
                    days = allocation.day_count(),
                    "found gap"
                );
                return Ok(Some(allocation));
            }
        }
        debug!(queue = %queue.id, gaps = queue.len(), "no gap fits");
        Ok(None)
    }

    /// Places `candidate` at the start of `gap`.
    ///
    /// The nominal end is the later of the gap start and hour 0 of the
    /// candidate's earliest end date. A candidate needing no hours gets an
    /// empty day list.
    ///
    /// # Errors
    /// Propagates [`GapError`](crate::error::GapError) when `gap` cannot
    /// host the candidate's nominal end.
    pub fn allocate<'q, C: Candidate + ?Sized>(
        &self,
        gap: GapOnQueue<'q>,
        candidate: &C,
    ) -> GapResult<GapAllocation<'q>> {
        let start = gap.gap().start_time();
        let end = DateAndHour::from(candidate.earliest_end_because_of_precedence()).max(start);
        let hours = candidate.total_hours_needed();

        let hours_per_day = if hours == 0 {
            Vec::new()
        } else {
            gap.gap().hours_until_allocating_with_horizon(
                gap.origin_queue().resource().calendar(),
                start,
                end,
                hours,
                &self.horizon,
            )?
        };

        Ok(GapAllocation {
            gap,
            start,
            end,
            hours_per_day,
        })
    }

    fn fits_in<'q, C: Candidate + ?Sized>(
        &self,
        gap: GapOnQueue<'q>,
        candidate: &C,
        requirement: Option<&CompoundCriterion>,
    ) -> Vec<GapOnQueue<'q>> {
        if !gap.gap().can_fit(candidate) {
            return Vec::new();
        }
        match requirement {
            None => vec![gap],
            Some(predicate) => gap
                .satisfying_gaps_by(predicate, &self.horizon)
                .into_iter()
                .filter(|part| part.gap().can_fit(candidate))
                .collect(),
        }
    }
}

fn requirement_for(criteria: &[Criterion]) -> Option<CompoundCriterion> {
    let compounder = CriterionCompounder::build_and(criteria);
    (!compounder.is_empty()).then(|| compounder.result())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GapError;
    use crate::gap::Gap;
    use crate::models::{Calendar, EndTime, QueueElement, Resource};
    use chrono::NaiveDate;

    // 2024-01-01 is a Monday.
    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateAndHour {
        DateAndHour::new(d(day), hour)
    }

    fn welding() -> Criterion {
        Criterion::skill("welding")
    }

    /// Gaps: [Mon 1, Tue 2) 8h, [Thu 4, Mon 8) 16h, [Wed 10, ...)
    fn queue(resource: Resource) -> LimitingResourceQueue {
        let g1 = Gap::create(&resource, at(1, 0), at(2, 0)).unwrap();
        let g2 = Gap::create(&resource, at(4, 0), at(8, 0)).unwrap();
        let g3 = Gap::create(&resource, at(10, 0), EndTime::Unbounded).unwrap();
        LimitingResourceQueue::new("Q1", resource)
            .with_gap(g1)
            .with_gap(g2)
            .with_gap(g3)
    }

    fn worker() -> Resource {
        Resource::new("W1").with_calendar(Calendar::working_week("std", 8))
    }

    #[test]
    fn test_first_gap_when_it_fits() {
        let q = queue(worker());
        let task = QueueElement::new("E1", d(1), 6);
        let a = GapFinder::new().find(&q, &task, &[]).unwrap().unwrap();
        assert_eq!(a.gap.gap().start_time(), at(1, 0));
        assert_eq!(a.hours_per_day, vec![6]);
        assert_eq!(a.total_hours(), 6);
    }

    #[test]
    fn test_skips_gaps_too_small() {
        let q = queue(worker());
        let task = QueueElement::new("E1", d(1), 12);
        let a = GapFinder::new().find(&q, &task, &[]).unwrap().unwrap();
        assert_eq!(a.gap.gap().start_time(), at(4, 0));
        // Thu 8, Fri 4
        assert_eq!(a.hours_per_day, vec![8, 4]);
    }

    #[test]
    fn test_start_constraint_pushes_to_later_gap() {
        let q = queue(worker());
        let task = QueueElement::new("E1", d(5), 4);
        let a = GapFinder::new().find(&q, &task, &[]).unwrap().unwrap();
        assert!(a.gap.gap().is_unbounded());
        assert_eq!(a.start, at(10, 0));
    }

    #[test]
    fn test_walks_until_nominal_end() {
        let q = queue(worker());
        let task = QueueElement::new("E1", d(4), 4).with_earliest_end(d(5));
        let a = GapFinder::new().find(&q, &task, &[]).unwrap().unwrap();
        assert_eq!(a.end, at(5, 0));
        // Work done Thursday; Friday still reserved up to the nominal end.
        assert_eq!(a.hours_per_day, vec![4, 8]);
    }

    #[test]
    fn test_criteria_pick_satisfying_stretch() {
        let r = worker().with_satisfaction(welding(), d(5), None);
        let q = queue(r);
        let task = QueueElement::new("E1", d(1), 8).with_criterion(welding());

        let fitting = GapFinder::new().fitting_gaps(&q, &task, &task.criteria);
        let starts: Vec<_> = fitting.iter().map(|g| g.gap().start_time()).collect();
        // Friday alone has 8h in gap two; the open gap qualifies from Wednesday.
        assert_eq!(starts, vec![at(5, 0), at(10, 0)]);

        let a = GapFinder::new().find(&q, &task, &task.criteria).unwrap().unwrap();
        assert_eq!(a.start, at(5, 0));
        assert_eq!(a.hours_per_day, vec![8]);
    }

    #[test]
    fn test_no_fit() {
        let r = worker();
        let only = Gap::create(&r, at(1, 0), at(3, 0)).unwrap();
        let q = LimitingResourceQueue::new("Q1", r).with_gap(only);
        let task = QueueElement::new("E1", d(1), 40);
        assert!(GapFinder::new().find(&q, &task, &[]).unwrap().is_none());
        assert!(GapFinder::new().fitting_gaps(&q, &task, &[]).is_empty());
    }

    #[test]
    fn test_zero_hour_candidate() {
        let q = queue(worker());
        let task = QueueElement::new("E1", d(1), 0);
        let a = GapFinder::new().find(&q, &task, &[]).unwrap().unwrap();
        assert_eq!(a.day_count(), 0);
        assert_eq!(a.start, at(1, 0));
    }

    #[test]
    fn test_allocate_into_wrong_gap_fails() {
        let q = queue(worker());
        let first = q.gaps_on_queue().into_iter().next().unwrap();
        // Earliest end is after the gap: the nominal end would leave it.
        let task = QueueElement::new("E1", d(1), 4).with_earliest_end(d(3));
        let err = GapFinder::new().allocate(first, &task).unwrap_err();
        assert!(matches!(err, GapError::AllocationEndAfterGapEnd { .. }));
    }

    #[test]
    fn test_types_are_send_sync() {
        fn check<T: Send + Sync>() {}
        check::<Gap>();
        check::<LimitingResourceQueue>();
        check::<GapAllocation<'static>>();
    }

    #[test]
    fn test_custom_horizon() {
        let finder = GapFinder::new().with_horizon(ScanHorizon::years(2));
        assert_eq!(finder.horizon().years, 2);
    }
}
