//! Queue elements waiting for a gap.
//!
//! Gap fitting only reads three things from a candidate: the earliest
//! start and end dates imposed by its predecessors, and the hours it
//! needs. [`Candidate`] is that read-only view; [`QueueElement`] is the
//! in-crate carrier for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Criterion;

/// Read-only view of a task awaiting placement.
pub trait Candidate {
    /// Earliest date the candidate may start, derived from its predecessors.
    fn earliest_start_because_of_precedence(&self) -> NaiveDate;

    /// Earliest date the candidate may end, derived from its predecessors.
    fn earliest_end_because_of_precedence(&self) -> NaiveDate;

    /// Total workable hours the candidate needs.
    fn total_hours_needed(&self) -> u32;
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn earliest_start_because_of_precedence(&self) -> NaiveDate {
        (**self).earliest_start_because_of_precedence()
    }

    fn earliest_end_because_of_precedence(&self) -> NaiveDate {
        (**self).earliest_end_because_of_precedence()
    }

    fn total_hours_needed(&self) -> u32 {
        (**self).total_hours_needed()
    }
}

/// A task queued for a limiting resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueElement {
    /// Unique element identifier.
    pub id: String,
    /// Earliest start date allowed by predecessors.
    pub earliest_start: NaiveDate,
    /// Earliest end date allowed by predecessors.
    pub earliest_end: NaiveDate,
    /// Workable hours required.
    pub hours: u32,
    /// Criteria the allocated resource must satisfy, AND-composed.
    pub criteria: Vec<Criterion>,
}

impl QueueElement {
    /// Creates an element that may start and end on `earliest_start`.
    pub fn new(id: impl Into<String>, earliest_start: NaiveDate, hours: u32) -> Self {
        Self {
            id: id.into(),
            earliest_start,
            earliest_end: earliest_start,
            hours,
            criteria: Vec::new(),
        }
    }

    /// Sets the earliest end date.
    pub fn with_earliest_end(mut self, earliest_end: NaiveDate) -> Self {
        self.earliest_end = earliest_end;
        self
    }

    /// Adds a required criterion.
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }
}

impl Candidate for QueueElement {
    fn earliest_start_because_of_precedence(&self) -> NaiveDate {
        self.earliest_start
    }

    fn earliest_end_because_of_precedence(&self) -> NaiveDate {
        self.earliest_end
    }

    fn total_hours_needed(&self) -> u32 {
        self.hours
    }
}
