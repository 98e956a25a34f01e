//! Splitting gaps where a resource's capabilities change.
//!
//! # Algorithm
//!
//! 1. AND-compose the requested criteria into one predicate.
//! 2. Seed the run state with the predicate on the gap's start date.
//! 3. Walk the gap day by day, skipping days without capacity. Each time
//!    the predicate flips on a workable day, close the current run at
//!    hour 0 of that day and open the next one there.
//! 4. Close the last run at the original gap end, bounded or not.
//!
//! The runs partition the gap: together they cover it from start to end
//! with no overlap, and each run carries the predicate value that held
//! over it.
//!
//! # Open-ended gaps
//! An unbounded gap is scanned up to a [`ScanHorizon`]. The horizon only
//! limits the scan; the last run still ends [`EndTime::Unbounded`].

use chrono::NaiveDate;
use tracing::{debug, trace};

use super::Gap;
use crate::models::{
    CapacityCalendar, Criterion, CriterionCompounder, DateAndHour, Days, EndTime, Resource,
    ResourcePredicate, ScanHorizon,
};

/// A stretch of a split gap over which the predicate did not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaRun {
    /// The sub-gap.
    pub gap: Gap,
    /// Predicate value over the sub-gap.
    pub satisfied: bool,
}

impl Gap {
    /// Splits this gap wherever `resource` starts or stops satisfying all of
    /// `criteria`.
    ///
    /// Returns the full partition; see [`satisfying_gaps_by`](Self::satisfying_gaps_by)
    /// to keep only the stretches where the criteria hold.
    ///
    /// # Example
    /// ```
    /// use chrono::NaiveDate;
    /// use u_gaps::gap::Gap;
    /// use u_gaps::models::{Calendar, Criterion, DateAndHour, Resource};
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
    /// let welding = Criterion::skill("welding");
    /// let resource = Resource::new("W1")
    ///     .with_calendar(Calendar::uniform("u", 8))
    ///     .with_satisfaction(welding.clone(), d(2), Some(d(4)));
    ///
    /// let gap = Gap::create(&resource, d(1).into(), DateAndHour::from(d(6))).unwrap();
    /// let parts = gap.split_into_gaps_satisfying_criteria(&resource, &[welding]);
    ///
    /// let starts: Vec<_> = parts.iter().map(|g| g.start_time().date()).collect();
    /// assert_eq!(starts, vec![d(1), d(2), d(4)]);
    /// ```
    pub fn split_into_gaps_satisfying_criteria(
        &self,
        resource: &Resource,
        criteria: &[Criterion],
    ) -> Vec<Gap> {
        let predicate = CriterionCompounder::build_and(criteria).result();
        self.split_by(resource, &predicate, &ScanHorizon::default())
    }

    /// Splits this gap wherever `predicate` flips.
    pub fn split_by<P: ResourcePredicate + ?Sized>(
        &self,
        resource: &Resource,
        predicate: &P,
        horizon: &ScanHorizon,
    ) -> Vec<Gap> {
        self.runs_by(resource, predicate, horizon)
            .into_iter()
            .map(|run| run.gap)
            .collect()
    }

    /// The stretches of this gap over which `predicate` holds.
    pub fn satisfying_gaps_by<P: ResourcePredicate + ?Sized>(
        &self,
        resource: &Resource,
        predicate: &P,
        horizon: &ScanHorizon,
    ) -> Vec<Gap> {
        self.runs_by(resource, predicate, horizon)
            .into_iter()
            .filter(|run| run.satisfied)
            .map(|run| run.gap)
            .collect()
    }

    /// Partitions this gap into runs of constant `predicate` value.
    pub fn runs_by<P: ResourcePredicate + ?Sized>(
        &self,
        resource: &Resource,
        predicate: &P,
        horizon: &ScanHorizon,
    ) -> Vec<CriteriaRun> {
        let calendar = resource.calendar();
        let start_date = self.start_time.date();
        let scan_limit = match self.end_time {
            EndTime::Bounded(end) => end.date().succ_opt().unwrap_or(NaiveDate::MAX),
            EndTime::Unbounded => horizon.limit_from(start_date),
        };

        let mut open = predicate.is_satisfied_by(resource, start_date);
        let mut run_start = self.start_time;
        let mut runs = Vec::new();

        for day in Days::exclusive(start_date, scan_limit) {
            let boundary = DateAndHour::from(day);
            // A gap ending at hour 0 does not include its end date.
            if EndTime::Bounded(boundary) >= self.end_time {
                break;
            }
            if calendar.capacity_at(day) == 0 {
                continue;
            }
            let holds = predicate.is_satisfied_by(resource, day);
            if holds != open {
                trace!(%day, satisfied = holds, "criteria changed");
                runs.push(CriteriaRun {
                    gap: Gap::build(
                        self.resource_id.clone(),
                        calendar,
                        run_start,
                        EndTime::Bounded(boundary),
                    ),
                    satisfied: open,
                });
                run_start = boundary;
                open = holds;
            }
        }

        runs.push(CriteriaRun {
            gap: Gap::build(self.resource_id.clone(), calendar, run_start, self.end_time),
            satisfied: open,
        });

        debug!(
            resource = %resource.id,
            gap = %self,
            runs = runs.len(),
            satisfying = runs.iter().filter(|r| r.satisfied).count(),
            "split gap by criteria"
        );
        runs
    }
}
