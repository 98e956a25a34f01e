//! Resource capability criteria.
//!
//! A criterion is a named capability ("welder", "night shift", "certified
//! crane operator") that a resource holds during dated satisfaction
//! periods. Gap splitting only needs a yes/no answer per (resource, date),
//! so everything here is expressed through [`ResourcePredicate`].
//!
//! # Composition
//! Predicates compose into [`CompoundCriterion`] trees (all / any / not).
//! [`CriterionCompounder`] builds the AND of a set of criteria, which is
//! what a queue element's requirements mean. External evaluation services
//! plug in by implementing [`ResourcePredicate`] or wrapping a closure in
//! [`PredicateFn`].

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Resource;

/// A boolean capability test over (resource, date).
pub trait ResourcePredicate: Send + Sync + fmt::Debug {
    /// Whether `resource` satisfies this predicate on `date`.
    fn is_satisfied_by(&self, resource: &Resource, date: NaiveDate) -> bool;
}

impl<P: ResourcePredicate + ?Sized> ResourcePredicate for Arc<P> {
    fn is_satisfied_by(&self, resource: &Resource, date: NaiveDate) -> bool {
        (**self).is_satisfied_by(resource, date)
    }
}

/// Criterion classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriterionType {
    /// Trade or skill (e.g., "welding").
    Skill,
    /// Organizational grouping (e.g., "team A").
    Group,
    /// Legal or safety certification.
    Certification,
    /// Domain-specific type.
    Custom(String),
}

/// A named capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criterion {
    /// Criterion classification.
    pub criterion_type: CriterionType,
    /// Criterion name, unique within its type.
    pub name: String,
}

impl Criterion {
    /// Creates a criterion.
    pub fn new(criterion_type: CriterionType, name: impl Into<String>) -> Self {
        Self {
            criterion_type,
            name: name.into(),
        }
    }

    /// Creates a skill criterion.
    pub fn skill(name: impl Into<String>) -> Self {
        Self::new(CriterionType::Skill, name)
    }
}

impl ResourcePredicate for Criterion {
    fn is_satisfied_by(&self, resource: &Resource, date: NaiveDate) -> bool {
        resource.satisfies(self, date)
    }
}

/// A period during which a resource holds a criterion.
///
/// Half-open: `[start, end)`. `end = None` means still held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionSatisfaction {
    /// Held criterion.
    pub criterion: Criterion,
    /// First date held.
    pub start: NaiveDate,
    /// First date no longer held.
    pub end: Option<NaiveDate>,
}

impl CriterionSatisfaction {
    /// Creates a satisfaction period.
    pub fn new(criterion: Criterion, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            criterion,
            start,
            end,
        }
    }

    /// Whether the period covers `date`.
    #[inline]
    pub fn is_active_at(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.map_or(true, |end| date < end)
    }
}

/// A composed predicate.
#[derive(Debug, Clone)]
pub enum CompoundCriterion {
    /// Holds when every member holds. Empty = always holds.
    All(Vec<Arc<dyn ResourcePredicate>>),
    /// Holds when at least one member holds. Empty = never holds.
    Any(Vec<Arc<dyn ResourcePredicate>>),
    /// Holds when the inner predicate does not.
    Not(Arc<dyn ResourcePredicate>),
}

impl CompoundCriterion {
    /// A predicate that always holds.
    pub fn always() -> Self {
        CompoundCriterion::All(Vec::new())
    }

    /// Negates a predicate.
    pub fn negate<P: ResourcePredicate + 'static>(predicate: P) -> Self {
        CompoundCriterion::Not(Arc::new(predicate))
    }

    /// OR of the given criteria.
    pub fn any_of(criteria: impl IntoIterator<Item = Criterion>) -> Self {
        CompoundCriterion::Any(
            criteria
                .into_iter()
                .map(|c| Arc::new(c) as Arc<dyn ResourcePredicate>)
                .collect(),
        )
    }
}

impl ResourcePredicate for CompoundCriterion {
    fn is_satisfied_by(&self, resource: &Resource, date: NaiveDate) -> bool {
        match self {
            CompoundCriterion::All(members) => {
                members.iter().all(|p| p.is_satisfied_by(resource, date))
            }
            CompoundCriterion::Any(members) => {
                members.iter().any(|p| p.is_satisfied_by(resource, date))
            }
            CompoundCriterion::Not(inner) => !inner.is_satisfied_by(resource, date),
        }
    }
}

/// Builds the AND of several predicates.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_gaps::models::{Criterion, CriterionCompounder, Resource, ResourcePredicate};
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// let welder = Criterion::skill("welding");
/// let resource = Resource::new("R1").with_satisfaction(welder.clone(), day, None);
///
/// let requirement = CriterionCompounder::build_and([welder]).result();
/// assert!(requirement.is_satisfied_by(&resource, day));
/// assert!(!requirement.is_satisfied_by(&resource, day.pred_opt().unwrap()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CriterionCompounder {
    members: Vec<Arc<dyn ResourcePredicate>>,
}

impl CriterionCompounder {
    /// Creates an empty compounder (its result always holds).
    pub fn new() -> Self {
        Self::default()
    }

    /// AND of every criterion in `criteria`.
    pub fn build_and<I>(criteria: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<Criterion>,
    {
        criteria
            .into_iter()
            .fold(Self::new(), |acc, c| acc.and(Criterion::clone(c.borrow())))
    }

    /// Adds another predicate to the conjunction.
    pub fn and<P: ResourcePredicate + 'static>(mut self, predicate: P) -> Self {
        self.members.push(Arc::new(predicate));
        self
    }

    /// Number of combined predicates.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing has been combined.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The composed predicate.
    pub fn result(self) -> CompoundCriterion {
        CompoundCriterion::All(self.members)
    }
}

/// Adapts a closure into a [`ResourcePredicate`].
///
/// Useful to bridge an external criterion-evaluation service.
pub struct PredicateFn<F> {
    name: &'static str,
    f: F,
}

impl<F> PredicateFn<F>
where
    F: Fn(&Resource, NaiveDate) -> bool + Send + Sync,
{
    /// Wraps `f`; `name` only shows up in debug output.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> fmt::Debug for PredicateFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFn").field("name", &self.name).finish()
    }
}

impl<F> ResourcePredicate for PredicateFn<F>
where
    F: Fn(&Resource, NaiveDate) -> bool + Send + Sync,
{
    fn is_satisfied_by(&self, resource: &Resource, date: NaiveDate) -> bool {
        (self.f)(resource, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn welder() -> Criterion {
        Criterion::skill("welding")
    }

    fn crane() -> Criterion {
        Criterion::new(CriterionType::Certification, "crane")
    }

    #[test]
    fn test_satisfaction_period_half_open() {
        let s = CriterionSatisfaction::new(welder(), d(2), Some(d(4)));
        assert!(!s.is_active_at(d(1)));
        assert!(s.is_active_at(d(2)));
        assert!(s.is_active_at(d(3)));
        assert!(!s.is_active_at(d(4)));

        let open = CriterionSatisfaction::new(welder(), d(2), None);
        assert!(open.is_active_at(NaiveDate::MAX));
    }

    #[test]
    fn test_and_composition() {
        let r = Resource::new("R1")
            .with_satisfaction(welder(), d(1), None)
            .with_satisfaction(crane(), d(5), Some(d(8)));

        let both = CriterionCompounder::build_and(&[welder(), crane()]).result();
        assert!(!both.is_satisfied_by(&r, d(4)));
        assert!(both.is_satisfied_by(&r, d(5)));
        assert!(!both.is_satisfied_by(&r, d(8)));
    }

    #[test]
    fn test_empty_and_always_holds() {
        let r = Resource::new("R1");
        let none = CriterionCompounder::build_and(Vec::<Criterion>::new());
        assert!(none.is_empty());
        assert!(none.result().is_satisfied_by(&r, d(1)));
        assert!(CompoundCriterion::always().is_satisfied_by(&r, d(1)));
    }

    #[test]
    fn test_any_and_not() {
        let r = Resource::new("R1").with_satisfaction(crane(), d(3), None);
        let either = CompoundCriterion::any_of([welder(), crane()]);
        assert!(!either.is_satisfied_by(&r, d(2)));
        assert!(either.is_satisfied_by(&r, d(3)));

        let not_crane = CompoundCriterion::negate(crane());
        assert!(not_crane.is_satisfied_by(&r, d(2)));
        assert!(!not_crane.is_satisfied_by(&r, d(3)));
    }

    #[test]
    fn test_predicate_fn_mixes_with_criteria() {
        let r = Resource::new("R1").with_satisfaction(welder(), d(1), None);
        let even_days = PredicateFn::new("even", |_: &Resource, date: NaiveDate| {
            chrono::Datelike::day(&date) % 2 == 0
        });
        let p = CriterionCompounder::new().and(welder()).and(even_days).result();
        assert!(p.is_satisfied_by(&r, d(2)));
        assert!(!p.is_satisfied_by(&r, d(3)));
        assert!(format!("{p:?}").contains("even"));
    }
}
