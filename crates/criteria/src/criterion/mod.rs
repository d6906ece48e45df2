//! The criterion token model.
//!
//! A [`Criterion`] is one immutable token in a restriction, join, order or
//! grouping sequence. Builders in [`crate::ops`] create them; accumulators
//! consume them.

mod operators;
mod value;

use serde::{Deserialize, Serialize};

use crate::error::{CriteriaError, CriteriaResult};

pub use operators::{
    ComparisonOperator, ComparisonShape, EnclosureOperator, JoinOperator, LogicalOperator,
    OrderDirection,
};
pub use value::{EntityRef, Value};

/// One token of a criteria sequence.
///
/// Decorators take `self` and return the updated token, so a value handed to
/// an accumulator can no longer change underneath it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,

    #[serde(default, skip_serializing_if = "is_default")]
    comparison: ComparisonOperator,

    #[serde(default, skip_serializing_if = "is_default")]
    logical: LogicalOperator,

    #[serde(default, skip_serializing_if = "is_default")]
    enclosure: EnclosureOperator,

    #[serde(default, skip_serializing_if = "is_default")]
    join: JoinOperator,

    #[serde(default, skip_serializing_if = "is_default")]
    order: OrderDirection,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// The part a criterion plays once it reaches an accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Comparison, optionally opening or closing a group.
    Restriction,
    /// Bare `(` or `)` marker.
    Enclosure,
    Join,
    Order,
}

impl Criterion {
    /// A restriction comparing `operand` with an optional value.
    pub fn restriction(
        operand: impl Into<String>,
        comparison: impl Into<Option<ComparisonOperator>>,
        value: Option<Value>,
    ) -> Self {
        Self {
            operand: Some(operand.into()),
            value,
            comparison: comparison.into().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// A bare enclosure marker carrying no comparison.
    pub fn marker(enclosure: impl Into<Option<EnclosureOperator>>) -> Self {
        Self {
            enclosure: enclosure.into().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// A join over the relation named by `operand`.
    pub fn join(operand: impl Into<String>, join: impl Into<Option<JoinOperator>>) -> Self {
        Self {
            operand: Some(operand.into()),
            join: join.into().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// An ordering on `operand`.
    pub fn order(operand: impl Into<String>, order: impl Into<Option<OrderDirection>>) -> Self {
        Self {
            operand: Some(operand.into()),
            order: order.into().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Replace the logical operator. `None` stores `Undefined`.
    pub fn with_logical(mut self, logical: impl Into<Option<LogicalOperator>>) -> Self {
        self.logical = logical.into().unwrap_or_default();
        self
    }

    /// Replace the enclosure marker. `None` stores `Undefined`.
    pub fn with_enclosure(mut self, enclosure: impl Into<Option<EnclosureOperator>>) -> Self {
        self.enclosure = enclosure.into().unwrap_or_default();
        self
    }

    pub fn operand(&self) -> Option<&str> {
        self.operand.as_deref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn comparison(&self) -> ComparisonOperator {
        self.comparison
    }

    pub fn logical(&self) -> LogicalOperator {
        self.logical
    }

    pub fn enclosure(&self) -> EnclosureOperator {
        self.enclosure
    }

    pub fn join_operator(&self) -> JoinOperator {
        self.join
    }

    pub fn order_direction(&self) -> OrderDirection {
        self.order
    }

    /// Classify this criterion, rejecting tokens that play no role or more
    /// than one.
    pub fn role(&self) -> CriteriaResult<Role> {
        let roles = [
            self.comparison.is_defined(),
            self.join.is_defined(),
            self.order.is_defined(),
        ];
        match roles {
            [true, false, false] => Ok(Role::Restriction),
            [false, true, false] => Ok(Role::Join),
            [false, false, true] => Ok(Role::Order),
            [false, false, false] if self.enclosure.is_defined() => Ok(Role::Enclosure),
            [false, false, false] => Err(CriteriaError::invalid(
                "criterion carries no comparison, join, order or enclosure",
            )),
            _ => Err(CriteriaError::invalid(format!(
                "criterion on {:?} mixes comparison, join and order roles",
                self.operand.as_deref().unwrap_or_default()
            ))),
        }
    }

    /// Operand, or an error naming what needed it.
    pub(crate) fn require_operand(&self, purpose: &str) -> CriteriaResult<&str> {
        match self.operand.as_deref() {
            Some(operand) if !operand.trim().is_empty() => Ok(operand),
            _ => Err(CriteriaError::invalid(format!("{purpose} requires an operand"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn absent_operators_store_undefined() {
        let c = Criterion::restriction("city", None, None)
            .with_logical(None)
            .with_enclosure(None);
        assert_eq!(c.comparison(), ComparisonOperator::Undefined);
        assert_eq!(c.logical(), LogicalOperator::Undefined);
        assert_eq!(c.enclosure(), EnclosureOperator::Undefined);
        assert_eq!(c.join_operator(), JoinOperator::Undefined);
        assert_eq!(c.order_direction(), OrderDirection::Undefined);
    }

    #[test]
    fn roles() {
        let eq = Criterion::restriction("city", ComparisonOperator::Equal, Some("x".into()));
        assert_eq!(eq.role().unwrap(), Role::Restriction);

        let grouped = eq.clone().with_enclosure(EnclosureOperator::Begin);
        assert_eq!(grouped.role().unwrap(), Role::Restriction);

        assert_eq!(
            Criterion::marker(EnclosureOperator::End).role().unwrap(),
            Role::Enclosure
        );
        assert_eq!(
            Criterion::join("departments", JoinOperator::Join)
                .role()
                .unwrap(),
            Role::Join
        );
        assert_eq!(
            Criterion::order("name", OrderDirection::Asc).role().unwrap(),
            Role::Order
        );
    }

    #[test]
    fn empty_criterion_has_no_role() {
        let err = Criterion::default().role().unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidArgument(_)));
    }

    #[test]
    fn mixed_roles_rejected() {
        let json = r#"{"operand": "name", "comparison": "equal", "order": "asc", "value": "x"}"#;
        let c: Criterion = serde_json::from_str(json).unwrap();
        assert!(matches!(c.role(), Err(CriteriaError::InvalidArgument(_))));
    }

    #[test]
    fn serialization_omits_undefined_fields() {
        let c = Criterion::restriction("state", ComparisonOperator::Equal, Some("AZ".into()))
            .with_logical(LogicalOperator::And);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(
            json,
            r#"{"operand":"state","value":"AZ","comparison":"equal","logical":"and"}"#
        );

        let parsed: Criterion = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, c);
    }
}
