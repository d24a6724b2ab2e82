//! Depth-first backtracking search for witnesses.
//!
//! # How it works
//!
//! The engine starts from an initial [`Position`] (nothing linearized) and an
//! empty [`Linearization`]:
//!
//! 1. If the position is at its end, the current linearization is a witness.
//! 2. Otherwise it draws `(next position, extended linearization)` candidates
//!    from the [`LinearizationExtender`] and recurses on each in turn.
//! 3. The first successful branch wins; the remaining candidates are never
//!    computed. When all candidates fail the branch fails.
//!
//! The weak search additionally threads a [`Visibility`]. For every
//! linearization step it computes the newly committed invocations (those in
//! the extended linearization but not in the previous one), draws every
//! candidate visibility for them from the [`VisibilityExtender`] and recurses
//! on each.
//!
//! Every step commits at least one invocation, so the recursion depth is
//! bounded by the number of invocations and the search always terminates.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::history::types::InvocationId;

pub mod extension;
pub mod linearization;
pub mod position;
pub mod validation;
pub mod visibility;
pub mod witness;

pub use extension::{
    ExhaustiveLinearizationExtender, FullVisibilityExtender, JustInTimeLinearizationExtender,
    LinearizationExtender, MinimalVisibilityExtender, VisibilityExtender,
};
pub use linearization::Linearization;
pub use position::{HistoryPosition, Position};
pub use validation::{StrictValidator, TrivialValidator, Validator};
pub use visibility::Visibility;
pub use witness::Witness;

/// Backtracking search over the strategies it is built with.
pub struct SearchEngine<'e, P> {
    linearizations: Box<dyn LinearizationExtender<P> + 'e>,
    visibilities: Box<dyn VisibilityExtender<P> + 'e>,
}

impl<'e, P> SearchEngine<'e, P>
where
    P: Position,
{
    #[must_use]
    pub fn new(
        linearizations: Box<dyn LinearizationExtender<P> + 'e>,
        visibilities: Box<dyn VisibilityExtender<P> + 'e>,
    ) -> Self {
        Self {
            linearizations,
            visibilities,
        }
    }

    /// Searches for a complete linearization reachable from `start`.
    #[must_use]
    pub fn find_linearization(&self, start: &P) -> Option<Linearization> {
        let found = self.linearize(start, &Linearization::empty());
        tracing::debug!(found = found.is_some(), "linearization search finished");
        found
    }

    #[must_use]
    pub fn is_linearizable(&self, start: &P) -> bool {
        self.find_linearization(start).is_some()
    }

    /// Searches for a complete linearization together with a visibility
    /// relation reachable from `start`.
    #[must_use]
    pub fn find_consistent(&self, start: &P) -> Option<Witness> {
        let found = self.explore(start, &Linearization::empty(), &Visibility::empty());
        tracing::debug!(found = found.is_some(), "consistency search finished");
        found
    }

    #[must_use]
    pub fn is_consistent(&self, start: &P) -> bool {
        self.find_consistent(start).is_some()
    }

    fn linearize(&self, position: &P, linearization: &Linearization) -> Option<Linearization> {
        if position.is_at_end() {
            return Some(linearization.clone());
        }
        let found = self
            .linearizations
            .extensions(position, linearization)
            .find_map(|(next, extended)| {
                tracing::trace!(depth = extended.len(), linearization = %extended, "step");
                self.linearize(&next, &extended)
            });
        found
    }

    fn explore(
        &self,
        position: &P,
        linearization: &Linearization,
        visibility: &Visibility,
    ) -> Option<Witness> {
        if position.is_at_end() {
            return Some(Witness::Consistent {
                linearization: linearization.clone(),
                visibility: visibility.clone(),
            });
        }
        let found = self
            .linearizations
            .extensions(position, linearization)
            .find_map(|(next, extended)| {
                let committed: Vec<InvocationId> = extended
                    .sequence()
                    .iter()
                    .copied()
                    .filter(|op| !linearization.contains(*op))
                    .collect();
                tracing::trace!(depth = extended.len(), committed = committed.len(), "step");

                let found = self
                    .visibilities
                    .extensions(&next, &extended, visibility, &committed)
                    .find_map(|widened| self.explore(&next, &extended, &widened));
                found
            });
        found
    }
}
