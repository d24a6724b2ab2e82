use alloc::boxed::Box;

use crate::history::types::InvocationId;
use crate::search::extension::{Extensions, LinearizationExtender};
use crate::search::linearization::Linearization;
use crate::search::position::Position;
use crate::search::validation::Validator;

/// Proposes one candidate per eligible invocation the validator accepts
/// after the current prefix.
#[derive(Debug, Clone, Copy)]
pub struct ExhaustiveLinearizationExtender<V> {
    validator: V,
}

impl<V> ExhaustiveLinearizationExtender<V> {
    #[must_use]
    pub const fn new(validator: V) -> Self {
        Self { validator }
    }
}

impl<P, V> LinearizationExtender<P> for ExhaustiveLinearizationExtender<V>
where
    P: Position,
    V: Validator<P::Value>,
{
    fn extensions<'a>(
        &'a self,
        position: &'a P,
        linearization: &'a Linearization,
    ) -> Extensions<'a, P> {
        Box::new(position.eligible().into_iter().filter_map(move |op| {
            self.validator
                .is_valid(position.reader(), linearization.sequence(), op)
                .then(|| (position.advance(op), linearization.append(op)))
        }))
    }
}

/// Like [`ExhaustiveLinearizationExtender`], but after committing an
/// invocation keeps committing while exactly one invocation is eligible.
///
/// A lone eligible invocation has to come next in every completion of the
/// prefix, so the forced run is yielded as a single step. A run containing
/// a rejected invocation is dropped.
#[derive(Debug, Clone, Copy)]
pub struct JustInTimeLinearizationExtender<V> {
    validator: V,
}

impl<V> JustInTimeLinearizationExtender<V> {
    #[must_use]
    pub const fn new(validator: V) -> Self {
        Self { validator }
    }

    fn commit<P>(
        &self,
        position: &P,
        linearization: &Linearization,
        op: InvocationId,
    ) -> Option<(P, Linearization)>
    where
        P: Position,
        V: Validator<P::Value>,
    {
        if !self
            .validator
            .is_valid(position.reader(), linearization.sequence(), op)
        {
            return None;
        }
        let mut position = position.advance(op);
        let mut linearization = linearization.append(op);

        loop {
            let eligible = position.eligible();
            let [forced] = eligible.as_slice() else {
                break;
            };
            if !self
                .validator
                .is_valid(position.reader(), linearization.sequence(), *forced)
            {
                tracing::trace!(%op, %forced, "forced run rejected");
                return None;
            }
            position = position.advance(*forced);
            linearization = linearization.append(*forced);
        }

        Some((position, linearization))
    }
}

impl<P, V> LinearizationExtender<P> for JustInTimeLinearizationExtender<V>
where
    P: Position,
    V: Validator<P::Value>,
{
    fn extensions<'a>(
        &'a self,
        position: &'a P,
        linearization: &'a Linearization,
    ) -> Extensions<'a, P> {
        Box::new(
            position
                .eligible()
                .into_iter()
                .filter_map(move |op| self.commit(position, linearization, op)),
        )
    }
}
