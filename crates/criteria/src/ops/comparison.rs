//! Comparison builders.
//!
//! Composite builders return a `Vec<Criterion>` whose first element carries no
//! logical operator, so wrapping the whole list in [`logical::and_all`] or
//! [`logical::or_all`](super::logical::or_all) connects it to whatever came
//! before.
//!
//! [`logical::and_all`]: super::logical::and_all

use crate::criterion::{ComparisonOperator, Criterion, LogicalOperator, Value};
use crate::error::{CriteriaError, CriteriaResult};

use super::enclosure;

fn binary(
    operand: impl Into<String>,
    op: ComparisonOperator,
    value: impl Into<Value>,
) -> Criterion {
    Criterion::restriction(operand, op, Some(value.into()))
}

fn unary(operand: impl Into<String>, op: ComparisonOperator) -> Criterion {
    Criterion::restriction(operand, op, None)
}

/// `operand = value`
pub fn eq(operand: impl Into<String>, value: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::Equal, value)
}

/// `operand <> value`
pub fn ne(operand: impl Into<String>, value: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::NotEqual, value)
}

/// `operand > value`
pub fn gt(operand: impl Into<String>, value: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::GreaterThan, value)
}

/// `operand >= value`
pub fn ge(operand: impl Into<String>, value: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::GreaterThanOrEqual, value)
}

/// `operand < value`
pub fn lt(operand: impl Into<String>, value: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::LessThan, value)
}

/// `operand <= value`
pub fn le(operand: impl Into<String>, value: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::LessThanOrEqual, value)
}

/// `operand like pattern`
pub fn like(operand: impl Into<String>, pattern: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::Like, pattern)
}

/// `operand not like pattern`
pub fn not_like(operand: impl Into<String>, pattern: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::NotLike, pattern)
}

pub fn is_null(operand: impl Into<String>) -> Criterion {
    unary(operand, ComparisonOperator::IsNull)
}

pub fn is_not_null(operand: impl Into<String>) -> Criterion {
    unary(operand, ComparisonOperator::IsNotNull)
}

/// Collection-valued `operand` has no elements.
pub fn is_empty(operand: impl Into<String>) -> Criterion {
    unary(operand, ComparisonOperator::IsEmpty)
}

pub fn is_not_empty(operand: impl Into<String>) -> Criterion {
    unary(operand, ComparisonOperator::IsNotEmpty)
}

/// `value` is an element of the collection-valued `operand`.
pub fn member_of(operand: impl Into<String>, value: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::MemberOf, value)
}

pub fn not_member_of(operand: impl Into<String>, value: impl Into<Value>) -> Criterion {
    binary(operand, ComparisonOperator::NotMemberOf, value)
}

/// `operand >= low and operand <= high`
pub fn between(
    operand: impl Into<String>,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> Vec<Criterion> {
    let operand = operand.into();
    vec![
        ge(operand.clone(), low),
        le(operand, high).with_logical(LogicalOperator::And),
    ]
}

/// `operand < low or operand > high`
pub fn not_between(
    operand: impl Into<String>,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> Vec<Criterion> {
    let operand = operand.into();
    vec![
        lt(operand.clone(), low),
        gt(operand, high).with_logical(LogicalOperator::Or),
    ]
}

/// `operand` equals any of `values`.
///
/// A single value collapses to one `eq`. Several values become an
/// or-joined disjunction between enclosure markers.
pub fn is_in<V: Into<Value>>(
    operand: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> CriteriaResult<Vec<Criterion>> {
    expand(
        operand.into(),
        values,
        ComparisonOperator::Equal,
        LogicalOperator::Or,
        "is_in",
    )
}

/// `operand` differs from every one of `values`.
pub fn is_not_in<V: Into<Value>>(
    operand: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> CriteriaResult<Vec<Criterion>> {
    expand(
        operand.into(),
        values,
        ComparisonOperator::NotEqual,
        LogicalOperator::And,
        "is_not_in",
    )
}

fn expand<V: Into<Value>>(
    operand: String,
    values: impl IntoIterator<Item = V>,
    op: ComparisonOperator,
    connective: LogicalOperator,
    name: &str,
) -> CriteriaResult<Vec<Criterion>> {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    match values.len() {
        0 => Err(CriteriaError::invalid(format!(
            "{name} on {operand:?} requires at least one value"
        ))),
        1 => Ok(values
            .into_iter()
            .map(|v| binary(operand.clone(), op, v))
            .collect()),
        n => {
            let mut criteria = Vec::with_capacity(n + 2);
            criteria.push(enclosure::begin());
            for (i, value) in values.into_iter().enumerate() {
                let c = binary(operand.clone(), op, value);
                criteria.push(if i == 0 { c } else { c.with_logical(connective) });
            }
            criteria.push(enclosure::end());
            Ok(criteria)
        }
    }
}
