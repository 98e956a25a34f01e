//! Limiting resource model.
//!
//! A limiting resource can work on one queue element at a time, so its
//! free time is a ledger of gaps. Each resource carries its own capacity
//! calendar and the criteria it satisfies over time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Calendar, CapacityCalendar, Criterion, CriterionSatisfaction};

/// A resource whose time is allocated through gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Resource classification.
    pub resource_type: ResourceType,
    /// Workable hours per day.
    pub calendar: Calendar,
    /// Criteria held by the resource, with validity periods.
    pub satisfactions: Vec<CriterionSatisfaction>,
    /// Domain-specific metadata.
    pub attributes: HashMap<String, String>,
}

/// Resource type classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    /// A person.
    Worker,
    /// A machine or piece of equipment.
    Machine,
    /// Domain-specific type.
    Custom(String),
}

impl Resource {
    /// Creates a worker on an 8-hour Monday–Friday calendar.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_type(id, ResourceType::Worker)
    }

    /// Creates a resource of the given type on an 8-hour Monday–Friday calendar.
    pub fn with_type(id: impl Into<String>, resource_type: ResourceType) -> Self {
        let id = id.into();
        Self {
            calendar: Calendar::working_week(format!("{id}-calendar"), 8),
            id,
            name: String::new(),
            resource_type,
            satisfactions: Vec::new(),
            attributes: HashMap::new(),
        }
    }

    /// Creates a machine resource.
    pub fn machine(id: impl Into<String>) -> Self {
        Self::with_type(id, ResourceType::Machine)
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the capacity calendar.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Records that the resource holds `criterion` in `[start, end)`.
    pub fn with_satisfaction(
        mut self,
        criterion: Criterion,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Self {
        self.satisfactions
            .push(CriterionSatisfaction::new(criterion, start, end));
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The resource's capacity calendar.
    #[inline]
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Whether the resource holds `criterion` on `date`.
    pub fn satisfies(&self, criterion: &Criterion, date: NaiveDate) -> bool {
        self.satisfactions
            .iter()
            .any(|s| s.criterion == *criterion && s.is_active_at(date))
    }

    /// Workable hours on `date`.
    pub fn capacity_at(&self, date: NaiveDate) -> u32 {
        self.calendar.capacity_at(date)
    }
}
