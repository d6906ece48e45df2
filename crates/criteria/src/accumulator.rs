//! The accumulator interface shared by every backend.

use crate::criterion::Criterion;
use crate::error::CriteriaResult;

/// Backend-specific builder that renders a criterion stream into a query.
///
/// Calls are order dependent: the first restriction, the running parameter
/// count and open groups all affect what later calls emit. An accumulator is
/// owned by one caller for its whole build-then-compile lifetime.
pub trait Accumulator: Clone {
    /// Compiled representation handed to the executor.
    type Output;

    /// Append one restriction or enclosure marker.
    fn add(&mut self, criterion: Criterion) -> CriteriaResult<&mut Self>;

    /// Append a sort order.
    fn add_order(&mut self, criterion: Criterion) -> CriteriaResult<&mut Self>;

    fn restriction_exists(&self) -> bool;

    fn order_exists(&self) -> bool;

    /// Serialize the accumulated state.
    fn compile(&self) -> CriteriaResult<Self::Output>;

    /// Append every criterion in order. Either all of them are applied or,
    /// on the first error, none are.
    fn add_all(
        &mut self,
        criteria: impl IntoIterator<Item = Criterion>,
    ) -> CriteriaResult<&mut Self> {
        let mut staged = self.clone();
        for criterion in criteria {
            staged.add(criterion)?;
        }
        *self = staged;
        Ok(self)
    }

    /// Append every order, all or nothing.
    fn add_orders(
        &mut self,
        criteria: impl IntoIterator<Item = Criterion>,
    ) -> CriteriaResult<&mut Self> {
        let mut staged = self.clone();
        for criterion in criteria {
            staged.add_order(criterion)?;
        }
        *self = staged;
        Ok(self)
    }
}
