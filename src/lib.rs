//! Gap finding for limiting resources in the U-Engine ecosystem.
//!
//! A limiting resource works on one queue element at a time, so its free
//! time is a ledger of gaps. This crate computes gap capacities on a
//! per-day calendar, decides whether a candidate fits a gap, splits gaps
//! where the resource's capabilities change, and distributes a candidate's
//! hours over the days of a gap.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `DateAndHour`, `EndTime`, `Calendar`,
//!   `Resource`, `Criterion`, `QueueElement`, `LimitingResourceQueue`
//! - **`gap`**: The `Gap` value type: capacity, fit test, criteria
//!   splitting, hour distribution, queue provenance
//! - **`scheduler`**: First-fit gap search (`GapFinder`)
//! - **`validation`**: Queue ledger integrity checks
//! - **`error`**: `GapError`
//!
//! # Architecture
//!
//! Everything here is synchronous and pure over its inputs. Calendars and
//! criteria are consulted through the `CapacityCalendar` and
//! `ResourcePredicate` traits, so external services can stand in for the
//! in-crate implementations.

pub mod error;
pub mod gap;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{GapError, GapResult};
