//! Structural validation for limiting resource queues.
//!
//! Queues are assembled by external gap-discovery code, so nothing stops a
//! caller from building one that breaks the ledger's invariants. Detects:
//! - Gaps belonging to another resource
//! - Gaps out of start order
//! - Overlapping gaps
//! - Unbounded gaps anywhere but last

use crate::models::{EndTime, LimitingResourceQueue};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A gap is on a different resource than its queue.
    ForeignGap,
    /// A gap starts before the one preceding it.
    Unordered,
    /// A gap starts before the preceding one ends.
    Overlap,
    /// An unbounded gap is followed by another gap.
    UnboundedNotLast,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a queue's gap ledger.
///
/// Checks:
/// 1. Every gap belongs to the queue's resource
/// 2. Gaps are sorted by start time
/// 3. No gap starts before its predecessor ends
/// 4. Only the last gap may be unbounded
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_queue(queue: &LimitingResourceQueue) -> ValidationResult {
    let mut errors = Vec::new();
    let resource_id = queue.resource().id.as_str();

    for (i, gap) in queue.gaps().iter().enumerate() {
        if gap.resource_id() != resource_id {
            errors.push(ValidationError::new(
                ValidationErrorKind::ForeignGap,
                format!(
                    "Gap {i} ({gap}) belongs to resource '{}', queue '{}' serves '{resource_id}'",
                    gap.resource_id(),
                    queue.id
                ),
            ));
        }
    }

    for (i, pair) in queue.gaps().windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);

        if next.is_before(prev) {
            errors.push(ValidationError::new(
                ValidationErrorKind::Unordered,
                format!("Gap {} ({next}) starts before gap {i} ({prev})", i + 1),
            ));
            continue;
        }

        match prev.end_time() {
            EndTime::Unbounded => errors.push(ValidationError::new(
                ValidationErrorKind::UnboundedNotLast,
                format!("Unbounded gap {i} ({prev}) is followed by gap {}", i + 1),
            )),
            EndTime::Bounded(end) if next.start_time() < end => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::Overlap,
                    format!("Gap {} ({next}) overlaps gap {i} ({prev})", i + 1),
                ));
            }
            EndTime::Bounded(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gap::Gap;
    use crate::models::{DateAndHour, Resource};
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> DateAndHour {
        DateAndHour::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), hour)
    }

    fn resource() -> Resource {
        Resource::new("W1")
    }

    fn gap(start: DateAndHour, end: impl Into<EndTime>) -> Gap {
        Gap::create(&resource(), start, end).unwrap()
    }

    #[test]
    fn test_valid_queue() {
        let q = LimitingResourceQueue::new("Q1", resource())
            .with_gap(gap(at(1, 0), at(2, 4)))
            .with_gap(gap(at(2, 4), at(5, 0)))
            .with_gap(gap(at(8, 0), EndTime::Unbounded));
        assert!(validate_queue(&q).is_ok());
    }

    #[test]
    fn test_empty_queue_is_valid() {
        let q = LimitingResourceQueue::new("Q1", resource());
        assert!(validate_queue(&q).is_ok());
    }

    #[test]
    fn test_foreign_gap() {
        let other = Gap::create(&Resource::new("W2"), at(1, 0), at(2, 0)).unwrap();
        let q = LimitingResourceQueue::new("Q1", resource()).with_gap(other);

        let errors = validate_queue(&q).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ForeignGap);
        assert!(errors[0].message.contains("W2"));
    }

    #[test]
    fn test_unordered() {
        let q = LimitingResourceQueue::new("Q1", resource())
            .with_gap(gap(at(5, 0), at(6, 0)))
            .with_gap(gap(at(1, 0), at(2, 0)));

        let errors = validate_queue(&q).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::Unordered));
    }

    #[test]
    fn test_overlap() {
        let q = LimitingResourceQueue::new("Q1", resource())
            .with_gap(gap(at(1, 0), at(3, 2)))
            .with_gap(gap(at(3, 1), at(4, 0)));

        let errors = validate_queue(&q).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::Overlap));
    }

    #[test]
    fn test_unbounded_not_last() {
        let q = LimitingResourceQueue::new("Q1", resource())
            .with_gap(gap(at(1, 0), EndTime::Unbounded))
            .with_gap(gap(at(3, 0), at(4, 0)));

        let errors = validate_queue(&q).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnboundedNotLast));
    }

    #[test]
    fn test_multiple_errors() {
        let other = Gap::create(&Resource::new("W2"), at(9, 0), at(10, 0)).unwrap();
        let q = LimitingResourceQueue::new("Q1", resource())
            .with_gap(gap(at(1, 0), at(3, 2)))
            .with_gap(gap(at(3, 1), at(4, 0)))
            .with_gap(other);

        let errors = validate_queue(&q).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
