//! Gaps tagged with the queue they came from.

use super::Gap;
use crate::models::{Criterion, LimitingResourceQueue, ResourcePredicate, ScanHorizon};

/// A gap together with its origin queue.
///
/// Borrows the queue; splitting keeps the same origin on every result.
#[derive(Debug, Clone)]
pub struct GapOnQueue<'q> {
    origin_queue: &'q LimitingResourceQueue,
    gap: Gap,
}

impl<'q> GapOnQueue<'q> {
    /// Tags every gap in `gaps` with `queue`.
    pub fn on_queue<I>(queue: &'q LimitingResourceQueue, gaps: I) -> Vec<Self>
    where
        I: IntoIterator<Item = Gap>,
    {
        gaps.into_iter().map(|gap| gap.on_queue(queue)).collect()
    }

    /// Queue the gap belongs to.
    #[inline]
    pub fn origin_queue(&self) -> &'q LimitingResourceQueue {
        self.origin_queue
    }

    /// The gap.
    #[inline]
    pub fn gap(&self) -> &Gap {
        &self.gap
    }

    /// Drops the queue tag.
    pub fn into_gap(self) -> Gap {
        self.gap
    }

    /// Splits the gap by `criteria` on the origin queue's resource.
    pub fn split_into_gaps_satisfying_criteria(&self, criteria: &[Criterion]) -> Vec<Self> {
        Self::on_queue(
            self.origin_queue,
            self.gap
                .split_into_gaps_satisfying_criteria(self.origin_queue.resource(), criteria),
        )
    }

    /// Stretches of the gap where `predicate` holds on the origin queue's
    /// resource.
    pub fn satisfying_gaps_by<P: ResourcePredicate + ?Sized>(
        &self,
        predicate: &P,
        horizon: &ScanHorizon,
    ) -> Vec<Self> {
        Self::on_queue(
            self.origin_queue,
            self.gap
                .satisfying_gaps_by(self.origin_queue.resource(), predicate, horizon),
        )
    }
}

impl Gap {
    /// Tags this gap with `queue`.
    pub fn on_queue(self, queue: &LimitingResourceQueue) -> GapOnQueue<'_> {
        GapOnQueue {
            origin_queue: queue,
            gap: self,
        }
    }
}
