//! Sort orders.

use crate::criterion::{Criterion, OrderDirection};

pub fn asc(operand: impl Into<String>) -> Criterion {
    Criterion::order(operand, OrderDirection::Asc)
}

pub fn desc(operand: impl Into<String>) -> Criterion {
    Criterion::order(operand, OrderDirection::Desc)
}
