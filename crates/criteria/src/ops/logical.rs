//! Logical connectives.
//!
//! List variants decorate only the first element: composite builders already
//! connect their own tail, so the caller's connective belongs at the front.

use crate::criterion::{Criterion, LogicalOperator};
use crate::error::{CriteriaError, CriteriaResult};

pub fn and(criterion: Criterion) -> Criterion {
    criterion.with_logical(LogicalOperator::And)
}

pub fn or(criterion: Criterion) -> Criterion {
    criterion.with_logical(LogicalOperator::Or)
}

/// Connect a composite list with `and`.
pub fn and_all(criteria: Vec<Criterion>) -> CriteriaResult<Vec<Criterion>> {
    front_load(criteria, LogicalOperator::And)
}

/// Connect a composite list with `or`.
pub fn or_all(criteria: Vec<Criterion>) -> CriteriaResult<Vec<Criterion>> {
    front_load(criteria, LogicalOperator::Or)
}

fn front_load(
    mut criteria: Vec<Criterion>,
    logical: LogicalOperator,
) -> CriteriaResult<Vec<Criterion>> {
    let Some(first) = criteria.first_mut() else {
        return Err(CriteriaError::invalid(
            "logical operator applied to an empty criteria list",
        ));
    };
    *first = std::mem::take(first).with_logical(logical);
    Ok(criteria)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ops::comparison;

    #[test]
    fn single_criterion() {
        assert_eq!(
            and(comparison::eq("a", 1)).logical(),
            LogicalOperator::And
        );
        assert_eq!(or(comparison::eq("a", 1)).logical(), LogicalOperator::Or);
    }

    #[test]
    fn list_sets_first_element_only() {
        let list = or_all(comparison::between("age", 1, 9)).unwrap();
        assert_eq!(list[0].logical(), LogicalOperator::Or);
        assert_eq!(list[1].logical(), LogicalOperator::And);
    }

    #[test]
    fn empty_list_fails() {
        assert!(matches!(
            and_all(Vec::new()),
            Err(CriteriaError::InvalidArgument(_))
        ));
    }
}
