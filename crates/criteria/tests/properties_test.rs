#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests over generated restriction sequences.

use proptest::prelude::*;
use sift_criteria::prelude::*;
use sift_criteria::{Criterion, DirectoryCriteria};
use sift_test_utils::{assert, group_mapping, relational};

#[derive(Debug, Clone)]
enum Step {
    Compare(u8, String, i64),
    Unary(u8, String),
    In(String, Vec<i64>),
    Between(String, i64, i64),
}

impl Step {
    fn criteria(&self) -> Vec<Criterion> {
        match self {
            Step::Compare(op, operand, value) => vec![match op % 8 {
                0 => eq(operand.as_str(), *value),
                1 => ne(operand.as_str(), *value),
                2 => gt(operand.as_str(), *value),
                3 => ge(operand.as_str(), *value),
                4 => lt(operand.as_str(), *value),
                5 => le(operand.as_str(), *value),
                6 => like(operand.as_str(), value.to_string()),
                _ => not_like(operand.as_str(), value.to_string()),
            }],
            Step::Unary(op, operand) => vec![match op % 4 {
                0 => is_null(operand.as_str()),
                1 => is_not_null(operand.as_str()),
                2 => is_empty(operand.as_str()),
                _ => is_not_empty(operand.as_str()),
            }],
            Step::In(operand, values) => is_in(operand.as_str(), values.iter().copied()).unwrap(),
            Step::Between(operand, low, high) => between(operand.as_str(), *low, *high),
        }
    }

    fn bindings(&self) -> usize {
        match self {
            Step::Compare(..) => 1,
            Step::Unary(..) => 0,
            Step::In(_, values) => values.len(),
            Step::Between(..) => 2,
        }
    }
}

fn operand() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["city", "state", "zip", "street.name"]).prop_map(str::to_string)
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (any::<u8>(), operand(), any::<i64>()).prop_map(|(op, o, v)| Step::Compare(op, o, v)),
        (any::<u8>(), operand()).prop_map(|(op, o)| Step::Unary(op, o)),
        (operand(), prop::collection::vec(any::<i64>(), 1..5)).prop_map(|(o, v)| Step::In(o, v)),
        (operand(), any::<i64>(), any::<i64>()).prop_map(|(o, l, h)| Step::Between(o, l, h)),
    ]
}

/// Flatten steps into one sequence, joining every step after the first with
/// `and` or `or`.
fn sequence(steps: &[(Step, bool)]) -> Vec<Criterion> {
    let mut out = Vec::new();
    for (i, (step, use_or)) in steps.iter().enumerate() {
        let criteria = step.criteria();
        if i == 0 {
            out.extend(criteria);
        } else if *use_or {
            out.extend(or_all(criteria).unwrap());
        } else {
            out.extend(and_all(criteria).unwrap());
        }
    }
    out
}

proptest! {
    #[test]
    fn relational_compile_is_deterministic(
        steps in prop::collection::vec((step(), any::<bool>()), 0..10)
    ) {
        let criteria = sequence(&steps);
        let mut first = relational("Address");
        let mut second = relational("Address");
        first.add_all(criteria.clone()).unwrap();
        second.add_all(criteria).unwrap();
        prop_assert_eq!(first.compile().unwrap(), second.compile().unwrap());
    }

    #[test]
    fn parameters_are_gapless_and_counted(
        steps in prop::collection::vec((step(), any::<bool>()), 0..10)
    ) {
        let mut criteria = relational("Address");
        criteria.add_all(sequence(&steps)).unwrap();
        let query = criteria.compile().unwrap();

        let expected: usize = steps.iter().map(|(s, _)| s.bindings()).sum();
        prop_assert_eq!(query.parameters.len(), expected);
        assert::gapless_parameters(&query.ql, &query.parameters);
        assert::balanced(&query.ql);
        prop_assert_eq!(criteria.restriction_exists(), !steps.is_empty());
        prop_assert_eq!(query.ql.contains(" where "), !steps.is_empty());
    }

    #[test]
    fn directory_filter_balanced(
        names in prop::collection::vec(("[a-z()*\\\\]{1,8}", any::<bool>()), 1..8)
    ) {
        let mut criteria = DirectoryCriteria::new(&group_mapping()).unwrap();
        for (i, (name, use_or)) in names.iter().enumerate() {
            let criterion = eq("name", name.as_str());
            let criterion = match (i, use_or) {
                (0, _) => criterion,
                (_, true) => or(criterion),
                (_, false) => and(criterion),
            };
            criteria.add(criterion).unwrap();
        }
        let filter = criteria.compile().unwrap().filter;
        assert::balanced(&filter);
        prop_assert_eq!(filter.matches("(cn=").count(), names.len());
    }
}
