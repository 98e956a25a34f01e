//! Error type for gap operations.

use crate::models::{DateAndHour, EndTime};

/// Errors raised when a gap operation's preconditions do not hold.
///
/// Every variant is a caller contract violation; nothing is clamped or
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GapError {
    /// A gap would end before it starts.
    #[error("gap ends before it starts: {start} .. {end:?}")]
    InvalidInterval {
        /// Requested start.
        start: DateAndHour,
        /// Requested end.
        end: EndTime,
    },

    /// Allocation was asked to end after the gap does.
    #[error("allocation end {allocation_end} is after gap end {gap_end}")]
    AllocationEndAfterGapEnd {
        /// Requested allocation end.
        allocation_end: DateAndHour,
        /// End of the gap.
        gap_end: DateAndHour,
    },

    /// Allocation was asked to start before the gap does.
    #[error("real start {real_start} is before gap start {gap_start}")]
    RealStartBeforeGapStart {
        /// Requested start.
        real_start: DateAndHour,
        /// Start of the gap.
        gap_start: DateAndHour,
    },

    /// No gap at the given queue position.
    #[error("no gap at index {index} (queue has {len})")]
    GapIndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of gaps in the queue.
        len: usize,
    },

    /// A gap belongs to another resource.
    #[error("gap belongs to resource '{found}', expected '{expected}'")]
    ForeignGap {
        /// Resource of the queue.
        expected: String,
        /// Resource of the offending gap.
        found: String,
    },

    /// A replacement gap is not contained in the gap it replaces.
    #[error("successor gap {successor} lies outside replaced gap {replaced}")]
    SuccessorOutsideGap {
        /// Display form of the replaced gap.
        replaced: String,
        /// Display form of the offending successor.
        successor: String,
    },

    /// Two replacement gaps overlap.
    #[error("successor gaps overlap: {first} and {second}")]
    OverlappingSuccessors {
        /// Display form of the earlier successor.
        first: String,
        /// Display form of the later successor.
        second: String,
    },
}

/// Result alias for gap operations.
pub type GapResult<T> = Result<T, GapError>;
