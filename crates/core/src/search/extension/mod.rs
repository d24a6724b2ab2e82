//! Strategies proposing the next steps of the search.
//!
//! A [`LinearizationExtender`] proposes which invocations to linearize next;
//! a [`VisibilityExtender`] proposes what the newly linearized invocations
//! observe. Both hand out candidates lazily, so the engine stops computing
//! them once a branch succeeds.
//!
//! | strategy                             | proposes                              |
//! |--------------------------------------|---------------------------------------|
//! | [`ExhaustiveLinearizationExtender`]  | every accepted eligible invocation    |
//! | [`JustInTimeLinearizationExtender`]  | the same, plus the forced run after it |
//! | [`FullVisibilityExtender`]           | every accepted observed set           |
//! | [`MinimalVisibilityExtender`]        | the smallest accepted observed set    |
//!
//! Within each pair the variants reach the same verdict.

use alloc::boxed::Box;

use crate::history::types::InvocationId;
use crate::search::linearization::Linearization;
use crate::search::position::Position;
use crate::search::visibility::Visibility;

pub mod linearization;
pub mod visibility;

pub use linearization::{ExhaustiveLinearizationExtender, JustInTimeLinearizationExtender};
pub use visibility::{FullVisibilityExtender, MinimalVisibilityExtender};

/// Lazily enumerated `(next position, extended linearization)` candidates.
pub type Extensions<'a, P> = Box<dyn Iterator<Item = (P, Linearization)> + 'a>;

pub trait LinearizationExtender<P: Position> {
    /// Candidate successors of `position`, whose linearized prefix is
    /// `linearization`. Every candidate commits at least one invocation.
    fn extensions<'a>(
        &'a self,
        position: &'a P,
        linearization: &'a Linearization,
    ) -> Extensions<'a, P>;
}

pub trait VisibilityExtender<P: Position> {
    /// Candidate widenings of `visibility` giving every invocation of
    /// `committed` an observed set. `position` and `linearization` already
    /// include the committed invocations.
    fn extensions<'a>(
        &'a self,
        position: &'a P,
        linearization: &'a Linearization,
        visibility: &'a Visibility,
        committed: &'a [InvocationId],
    ) -> Box<dyn Iterator<Item = Visibility> + 'a>;
}
