//! Grouping markers.

use crate::criterion::{Criterion, EnclosureOperator};

/// A bare `(` marker.
pub fn begin() -> Criterion {
    Criterion::marker(EnclosureOperator::Begin)
}

/// A bare `)` marker.
pub fn end() -> Criterion {
    Criterion::marker(EnclosureOperator::End)
}

/// Open a group in front of `criterion`.
pub fn begin_with(criterion: Criterion) -> Criterion {
    criterion.with_enclosure(EnclosureOperator::Begin)
}

/// Close a group after `criterion`.
pub fn end_with(criterion: Criterion) -> Criterion {
    criterion.with_enclosure(EnclosureOperator::End)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::ComparisonOperator;
    use crate::ops::comparison;

    #[test]
    fn markers_carry_no_comparison() {
        assert_eq!(begin().comparison(), ComparisonOperator::Undefined);
        assert_eq!(begin().operand(), None);
        assert_eq!(end().enclosure(), EnclosureOperator::End);
    }

    #[test]
    fn decorating_keeps_the_comparison() {
        let c = begin_with(comparison::eq("city", "Mesa"));
        assert_eq!(c.enclosure(), EnclosureOperator::Begin);
        assert_eq!(c.comparison(), ComparisonOperator::Equal);
    }
}
