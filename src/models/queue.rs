//! Limiting resource queues.
//!
//! A queue is the free-time ledger of one resource: its gaps, ordered by
//! start. Gaps are values; when an allocation or a split reshapes one, the
//! queue swaps it for its successors in a single step.

use serde::{Deserialize, Serialize};

use super::{DateAndHour, EndTime, Resource};
use crate::error::{GapError, GapResult};
use crate::gap::{Gap, GapOnQueue};

/// The ordered gaps of one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "QueueRecord")]
pub struct LimitingResourceQueue {
    /// Queue identifier.
    pub id: String,
    resource: Resource,
    gaps: Vec<Gap>,
}

impl LimitingResourceQueue {
    /// Creates a queue with no gaps.
    pub fn new(id: impl Into<String>, resource: Resource) -> Self {
        Self {
            id: id.into(),
            resource,
            gaps: Vec::new(),
        }
    }

    /// Appends a gap.
    ///
    /// No ordering or ownership checks; see
    /// [`validate_queue`](crate::validation::validate_queue).
    pub fn with_gap(mut self, gap: Gap) -> Self {
        self.gaps.push(gap);
        self
    }

    /// Appends an unbounded gap starting at `start`.
    pub fn with_open_gap_from(mut self, start: DateAndHour) -> Self {
        let gap = Gap::build(
            self.resource.id.clone(),
            self.resource.calendar(),
            start,
            EndTime::Unbounded,
        );
        self.gaps.push(gap);
        self
    }

    /// The queue's resource.
    #[inline]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Gaps in queue order.
    #[inline]
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    /// Number of gaps.
    #[inline]
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    /// Whether the queue has no gaps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Every gap tagged with this queue.
    pub fn gaps_on_queue(&self) -> Vec<GapOnQueue<'_>> {
        GapOnQueue::on_queue(self, self.gaps.iter().cloned())
    }

    /// Replaces the gap at `index` with `successors`, returning it.
    ///
    /// Successors are sorted by start. Either every successor is inserted or
    /// the queue is left untouched.
    ///
    /// # Errors
    /// - [`GapError::GapIndexOutOfRange`] if there is no gap at `index`.
    /// - [`GapError::ForeignGap`] if a successor is on another resource.
    /// - [`GapError::SuccessorOutsideGap`] if a successor is not contained
    ///   in the replaced gap.
    /// - [`GapError::OverlappingSuccessors`] if two successors overlap.
    pub fn replace_gap<I>(&mut self, index: usize, successors: I) -> GapResult<Gap>
    where
        I: IntoIterator<Item = Gap>,
    {
        let len = self.gaps.len();
        let replaced = self
            .gaps
            .get(index)
            .ok_or(GapError::GapIndexOutOfRange { index, len })?;

        let mut successors: Vec<Gap> = successors.into_iter().collect();
        for successor in &successors {
            if successor.resource_id() != self.resource.id {
                return Err(GapError::ForeignGap {
                    expected: self.resource.id.clone(),
                    found: successor.resource_id().to_string(),
                });
            }
            if !replaced.contains(successor) {
                return Err(GapError::SuccessorOutsideGap {
                    replaced: replaced.to_string(),
                    successor: successor.to_string(),
                });
            }
        }
        successors.sort_by(Gap::cmp_by_start);
        check_disjoint(&successors)?;

        tracing::debug!(
            queue = %self.id,
            index,
            successors = successors.len(),
            "replacing gap"
        );
        self.gaps
            .splice(index..=index, successors)
            .next()
            .ok_or(GapError::GapIndexOutOfRange { index, len })
    }
}

/// Successors sorted by start must not overlap.
fn check_disjoint(sorted: &[Gap]) -> GapResult<()> {
    for pair in sorted.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let overlaps = match prev.end_time() {
            EndTime::Unbounded => true,
            EndTime::Bounded(end) => next.start_time() < end,
        };
        if overlaps {
            return Err(GapError::OverlappingSuccessors {
                first: prev.to_string(),
                second: next.to_string(),
            });
        }
    }
    Ok(())
}

/// Serialized form of a queue. Gap capacities are not trusted: every gap is
/// rebuilt against the resource's calendar.
#[derive(Deserialize)]
struct QueueRecord {
    id: String,
    resource: Resource,
    gaps: Vec<GapRecord>,
}

#[derive(Deserialize)]
struct GapRecord {
    resource_id: String,
    start_time: DateAndHour,
    end_time: EndTime,
}

impl TryFrom<QueueRecord> for LimitingResourceQueue {
    type Error = GapError;

    fn try_from(record: QueueRecord) -> GapResult<Self> {
        let QueueRecord { id, resource, gaps } = record;
        let gaps = gaps
            .into_iter()
            .map(|gap| {
                if gap.resource_id != resource.id {
                    return Err(GapError::ForeignGap {
                        expected: resource.id.clone(),
                        found: gap.resource_id,
                    });
                }
                Gap::with_calendar(
                    gap.resource_id,
                    resource.calendar(),
                    gap.start_time,
                    gap.end_time,
                )
            })
            .collect::<GapResult<Vec<_>>>()?;
        Ok(Self { id, resource, gaps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Calendar;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> DateAndHour {
        DateAndHour::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), hour)
    }

    fn queue() -> LimitingResourceQueue {
        let resource = Resource::new("W1").with_calendar(Calendar::uniform("u", 8));
        LimitingResourceQueue::new("Q1", resource).with_open_gap_from(at(1, 0))
    }

    #[test]
    fn test_open_gap() {
        let q = queue();
        assert_eq!(q.len(), 1);
        assert!(q.gaps()[0].is_unbounded());
        assert_eq!(q.gaps()[0].resource_id(), "W1");
    }

    #[test]
    fn test_replace_with_successors() {
        let mut q = queue();
        let r = q.resource().clone();
        // Allocation over [day 3, day 5) leaves two gaps.
        let after = Gap::create(&r, at(5, 0), EndTime::Unbounded).unwrap();
        let before = Gap::create(&r, at(1, 0), at(3, 0)).unwrap();

        let replaced = q.replace_gap(0, vec![after.clone(), before.clone()]).unwrap();
        assert!(replaced.is_unbounded());
        assert_eq!(q.gaps(), &[before, after]);
    }

    #[test]
    fn test_replace_with_nothing_removes() {
        let mut q = queue();
        q.replace_gap(0, Vec::new()).unwrap();
        assert!(q.is_empty());
    }

    #[test]
    fn test_replace_rejects_bad_successors() {
        let mut q = queue();
        let foreign = Gap::create(&Resource::new("W2"), at(2, 0), at(3, 0)).unwrap();
        let err = q.replace_gap(0, vec![foreign]).unwrap_err();
        assert!(matches!(err, GapError::ForeignGap { .. }));

        let mut bounded = LimitingResourceQueue::new("Q2", q.resource().clone());
        let r = bounded.resource().clone();
        bounded = bounded.with_gap(Gap::create(&r, at(2, 0), at(4, 0)).unwrap());
        let outside = Gap::create(&r, at(3, 0), at(5, 0)).unwrap();
        let err = bounded.replace_gap(0, vec![outside]).unwrap_err();
        assert!(matches!(err, GapError::SuccessorOutsideGap { .. }));
        assert_eq!(bounded.len(), 1);

        let err = bounded.replace_gap(3, Vec::new()).unwrap_err();
        assert_eq!(err, GapError::GapIndexOutOfRange { index: 3, len: 1 });
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_replace_rejects_overlapping_successors() {
        let mut q = queue();
        let r = q.resource().clone();
        let early = Gap::create(&r, at(1, 0), at(5, 0)).unwrap();
        let late = Gap::create(&r, at(3, 0), EndTime::Unbounded).unwrap();

        let err = q.replace_gap(0, vec![late, early]).unwrap_err();
        assert!(matches!(err, GapError::OverlappingSuccessors { .. }));
        assert_eq!(q.len(), 1);
        assert!(q.gaps()[0].is_unbounded());
        assert!(crate::validation::validate_queue(&q).is_ok());
    }

    #[test]
    fn test_replace_accepts_touching_successors() {
        let mut q = queue();
        let r = q.resource().clone();
        let first = Gap::create(&r, at(1, 0), at(3, 4)).unwrap();
        let second = Gap::create(&r, at(3, 4), EndTime::Unbounded).unwrap();

        q.replace_gap(0, vec![first, second]).unwrap();
        assert_eq!(q.len(), 2);
        assert!(crate::validation::validate_queue(&q).is_ok());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut q = queue();
        let r = q.resource().clone();
        q.replace_gap(0, vec![Gap::create(&r, at(2, 0), at(4, 0)).unwrap()])
            .unwrap();

        let json = serde_json::to_string(&q).unwrap();
        let back: LimitingResourceQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, q.id);
        assert_eq!(back.gaps(), q.gaps());
    }

    #[test]
    fn test_deserialize_recomputes_capacity() {
        let r = Resource::new("W1").with_calendar(Calendar::uniform("u", 8));
        let gap = Gap::create(&r, at(1, 0), at(3, 0)).unwrap();
        let q = LimitingResourceQueue::new("Q1", r).with_gap(gap);

        let mut value = serde_json::to_value(&q).unwrap();
        value["gaps"][0]["capacity"] = serde_json::json!({ "Hours": 999 });
        let back: LimitingResourceQueue = serde_json::from_value(value).unwrap();
        assert_eq!(back.gaps()[0].hours_in_gap(), 16);
    }

    #[test]
    fn test_deserialize_rejects_reversed_gap() {
        let r = Resource::new("W1").with_calendar(Calendar::uniform("u", 8));
        let gap = Gap::create(&r, at(5, 0), at(6, 0)).unwrap();
        let q = LimitingResourceQueue::new("Q1", r).with_gap(gap);

        let mut value = serde_json::to_value(&q).unwrap();
        value["gaps"][0]["end_time"] =
            serde_json::json!({ "Bounded": { "date": "2024-01-01", "hour": 0 } });
        let result = serde_json::from_value::<LimitingResourceQueue>(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_foreign_gap() {
        let q = queue();
        let mut value = serde_json::to_value(&q).unwrap();
        value["gaps"][0]["resource_id"] = serde_json::json!("W2");
        let err = serde_json::from_value::<LimitingResourceQueue>(value).unwrap_err();
        assert!(err.to_string().contains("W2"));
    }
}
