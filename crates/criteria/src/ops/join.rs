//! Relation joins (relational backend only).

use crate::criterion::{Criterion, JoinOperator};

pub fn join(operand: impl Into<String>) -> Criterion {
    Criterion::join(operand, JoinOperator::Join)
}

pub fn join_fetch(operand: impl Into<String>) -> Criterion {
    Criterion::join(operand, JoinOperator::JoinFetch)
}

pub fn left_join(operand: impl Into<String>) -> Criterion {
    Criterion::join(operand, JoinOperator::LeftJoin)
}

pub fn left_join_fetch(operand: impl Into<String>) -> Criterion {
    Criterion::join(operand, JoinOperator::LeftJoinFetch)
}
