//! Gap-finding domain models.
//!
//! Provides the value types gaps are built from and the collaborator
//! interfaces they consume: capacity calendars, capability predicates,
//! and the candidates waiting for a gap.
//!
//! # Domain Mappings
//!
//! | u-gaps | Manufacturing | Shipyard | Maintenance |
//! |--------|---------------|----------|-------------|
//! | Resource | Machine/Worker | Crane/Welder | Technician |
//! | Criterion | Skill | Certification | License |
//! | QueueElement | Operation | Block assembly | Work order |
//! | LimitingResourceQueue | Machine agenda | Crane schedule | Technician roster |

mod calendar;
mod candidate;
mod criterion;
mod date_and_hour;
mod queue;
mod resource;

pub use calendar::{Calendar, CalendarException, CapacityCalendar};
pub use candidate::{Candidate, QueueElement};
pub use criterion::{
    CompoundCriterion, Criterion, CriterionCompounder, CriterionSatisfaction, CriterionType,
    PredicateFn, ResourcePredicate,
};
pub use date_and_hour::{DateAndHour, Days, EndTime, ScanHorizon};
pub use queue::LimitingResourceQueue;
pub use resource::{Resource, ResourceType};
