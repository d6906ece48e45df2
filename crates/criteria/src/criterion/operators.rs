//! Operator enumerations carried by a [`Criterion`](super::Criterion).
//!
//! Every enum has an explicit `Undefined` variant which is also its default,
//! so an unused role is always representable and every match is exhaustive.

use serde::{Deserialize, Serialize};

/// Comparison applied by a restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
    MemberOf,
    NotMemberOf,
    #[default]
    Undefined,
}

/// How a comparison consumes its operand and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonShape {
    /// `operand <op> value`
    Binary,
    /// `operand is ...`, no value.
    Unary,
    /// `value [not] member of operand`
    Membership,
    /// No comparison at all.
    None,
}

impl ComparisonOperator {
    pub fn is_defined(self) -> bool {
        self != ComparisonOperator::Undefined
    }

    pub fn shape(self) -> ComparisonShape {
        match self {
            ComparisonOperator::Equal
            | ComparisonOperator::NotEqual
            | ComparisonOperator::GreaterThan
            | ComparisonOperator::GreaterThanOrEqual
            | ComparisonOperator::LessThan
            | ComparisonOperator::LessThanOrEqual
            | ComparisonOperator::Like
            | ComparisonOperator::NotLike => ComparisonShape::Binary,
            ComparisonOperator::IsNull
            | ComparisonOperator::IsNotNull
            | ComparisonOperator::IsEmpty
            | ComparisonOperator::IsNotEmpty => ComparisonShape::Unary,
            ComparisonOperator::MemberOf | ComparisonOperator::NotMemberOf => {
                ComparisonShape::Membership
            }
            ComparisonOperator::Undefined => ComparisonShape::None,
        }
    }
}

/// Connective joining a restriction to the ones before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    And,
    Or,
    #[default]
    Undefined,
}

impl LogicalOperator {
    pub fn is_defined(self) -> bool {
        self != LogicalOperator::Undefined
    }
}

/// Parenthesization marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnclosureOperator {
    Begin,
    End,
    #[default]
    Undefined,
}

impl EnclosureOperator {
    pub fn is_defined(self) -> bool {
        self != EnclosureOperator::Undefined
    }
}

/// Relationship traversal (relational backend only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOperator {
    Join,
    JoinFetch,
    LeftJoin,
    LeftJoinFetch,
    #[default]
    Undefined,
}

impl JoinOperator {
    pub fn is_defined(self) -> bool {
        self != JoinOperator::Undefined
    }

    /// Query-language keyword, `None` when undefined.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            JoinOperator::Join => Some("join"),
            JoinOperator::JoinFetch => Some("join fetch"),
            JoinOperator::LeftJoin => Some("left join"),
            JoinOperator::LeftJoinFetch => Some("left join fetch"),
            JoinOperator::Undefined => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    Desc,
    #[default]
    Undefined,
}

impl OrderDirection {
    pub fn is_defined(self) -> bool {
        self != OrderDirection::Undefined
    }

    pub fn keyword(self) -> Option<&'static str> {
        match self {
            OrderDirection::Asc => Some("asc"),
            OrderDirection::Desc => Some("desc"),
            OrderDirection::Undefined => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_undefined() {
        assert_eq!(ComparisonOperator::default(), ComparisonOperator::Undefined);
        assert_eq!(LogicalOperator::default(), LogicalOperator::Undefined);
        assert_eq!(EnclosureOperator::default(), EnclosureOperator::Undefined);
        assert_eq!(JoinOperator::default(), JoinOperator::Undefined);
        assert_eq!(OrderDirection::default(), OrderDirection::Undefined);
    }

    #[test]
    fn comparison_shapes() {
        assert_eq!(ComparisonOperator::Like.shape(), ComparisonShape::Binary);
        assert_eq!(ComparisonOperator::IsEmpty.shape(), ComparisonShape::Unary);
        assert_eq!(
            ComparisonOperator::NotMemberOf.shape(),
            ComparisonShape::Membership
        );
        assert_eq!(ComparisonOperator::Undefined.shape(), ComparisonShape::None);
    }

    #[test]
    fn operator_serialization() {
        let json = serde_json::to_string(&ComparisonOperator::GreaterThanOrEqual).unwrap();
        assert_eq!(json, "\"greater_than_or_equal\"");

        let parsed: JoinOperator = serde_json::from_str("\"left_join_fetch\"").unwrap();
        assert_eq!(parsed, JoinOperator::LeftJoinFetch);
        assert_eq!(parsed.keyword(), Some("left join fetch"));
    }
}
