//! Gap search for queue elements.
//!
//! Provides a first-fit search that combines the gap fit test, criteria
//! splitting and day-by-day hour distribution into one query.
//!
//! # Algorithm
//!
//! `GapFinder` walks a queue's gaps in order and allocates the candidate
//! into the first gap (or criteria-satisfying stretch of a gap) that can
//! host it. It is not an optimizer: it reports where the candidate would
//! go, and the queue-maintenance layer decides whether to commit it via
//! `LimitingResourceQueue::replace_gap`.

mod finder;

pub use finder::{GapAllocation, GapFinder};
