//! Visibility extenders.
//!
//! An observed set for invocation `op` is *admissible* when it is a subset of
//! the invocations before `op` in the linearization and contains every
//! program-order ancestor of `op`. Candidate sets are tried in order of
//! increasing size, starting from the ancestors alone.
//!
//! Whether one invocation accepts an observed set never depends on the sets
//! chosen for other invocations. Taking the first accepted set per invocation
//! ([`MinimalVisibilityExtender`]) therefore fails exactly when enumerating
//! all of them ([`FullVisibilityExtender`]) yields nothing.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::iter;

use crate::history::types::InvocationId;
use crate::search::extension::VisibilityExtender;
use crate::search::linearization::Linearization;
use crate::search::position::Position;
use crate::search::validation::Validator;
use crate::search::visibility::Visibility;

/// Subsets of `items`, smallest first, each size in lexicographic order of
/// positions.
#[derive(Debug)]
struct SubsetsBySize {
    items: Vec<InvocationId>,
    positions: Vec<usize>,
    exhausted: bool,
}

impl SubsetsBySize {
    const fn new(items: Vec<InvocationId>) -> Self {
        Self {
            items,
            positions: Vec::new(),
            exhausted: false,
        }
    }

    fn step(&mut self) {
        let n = self.items.len();
        let k = self.positions.len();
        for i in (0..k).rev() {
            if self.positions[i] < n - k + i {
                self.positions[i] += 1;
                for j in i + 1..k {
                    self.positions[j] = self.positions[j - 1] + 1;
                }
                return;
            }
        }
        if k == n {
            self.exhausted = true;
        } else {
            self.positions = (0..=k).collect();
        }
    }
}

impl Iterator for SubsetsBySize {
    type Item = Vec<InvocationId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let subset = self.positions.iter().map(|&i| self.items[i]).collect();
        self.step();
        Some(subset)
    }
}

/// Admissible observed sets of `op` the validator accepts, smallest first.
fn accepted_sets<'a, P, V>(
    validator: &'a V,
    position: &'a P,
    linearization: &'a Linearization,
    op: InvocationId,
) -> impl Iterator<Item = BTreeSet<InvocationId>> + 'a
where
    P: Position,
    V: Validator<P::Value>,
{
    let before = linearization
        .before(op)
        .expect("committed invocations are linearized");
    let ancestors = position.reader().order().ancestors(op);
    let optional = before
        .iter()
        .copied()
        .filter(|id| !ancestors.contains(id))
        .collect();

    SubsetsBySize::new(optional).filter_map(move |extra| {
        let observed: Vec<InvocationId> = before
            .iter()
            .copied()
            .filter(|id| ancestors.contains(id) || extra.contains(id))
            .collect();
        validator
            .is_valid(position.reader(), &observed, op)
            .then(|| observed.into_iter().collect())
    })
}

/// Yields every combination of accepted observed sets for the committed
/// invocations.
#[derive(Debug, Clone, Copy)]
pub struct FullVisibilityExtender<V> {
    validator: V,
}

impl<V> FullVisibilityExtender<V> {
    #[must_use]
    pub const fn new(validator: V) -> Self {
        Self { validator }
    }
}

impl<P, V> VisibilityExtender<P> for FullVisibilityExtender<V>
where
    P: Position,
    V: Validator<P::Value>,
{
    fn extensions<'a>(
        &'a self,
        position: &'a P,
        linearization: &'a Linearization,
        visibility: &'a Visibility,
        committed: &'a [InvocationId],
    ) -> Box<dyn Iterator<Item = Visibility> + 'a> {
        product(&self.validator, position, linearization, visibility.clone(), committed)
    }
}

/// Cartesian product over the accepted sets of `committed`, first invocation
/// outermost. Inner sets are enumerated afresh under each outer choice, so
/// nothing is validated before it is needed.
fn product<'a, P, V>(
    validator: &'a V,
    position: &'a P,
    linearization: &'a Linearization,
    base: Visibility,
    committed: &'a [InvocationId],
) -> Box<dyn Iterator<Item = Visibility> + 'a>
where
    P: Position,
    V: Validator<P::Value>,
{
    let Some((&op, rest)) = committed.split_first() else {
        return Box::new(iter::once(base));
    };
    Box::new(
        accepted_sets(validator, position, linearization, op).flat_map(move |observed| {
            product(
                validator,
                position,
                linearization,
                base.extend(op, observed),
                rest,
            )
        }),
    )
}

/// Yields at most one extension: the smallest accepted observed set for
/// each committed invocation.
#[derive(Debug, Clone, Copy)]
pub struct MinimalVisibilityExtender<V> {
    validator: V,
}

impl<V> MinimalVisibilityExtender<V> {
    #[must_use]
    pub const fn new(validator: V) -> Self {
        Self { validator }
    }
}

impl<P, V> VisibilityExtender<P> for MinimalVisibilityExtender<V>
where
    P: Position,
    V: Validator<P::Value>,
{
    fn extensions<'a>(
        &'a self,
        position: &'a P,
        linearization: &'a Linearization,
        visibility: &'a Visibility,
        committed: &'a [InvocationId],
    ) -> Box<dyn Iterator<Item = Visibility> + 'a> {
        let mut extended = visibility.clone();
        for &op in committed {
            let Some(observed) =
                accepted_sets(&self.validator, position, linearization, op).next()
            else {
                tracing::trace!(%op, "no acceptable observed set");
                return Box::new(iter::empty());
            };
            extended = extended.extend(op, observed);
        }
        Box::new(iter::once(extended))
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::executor::objects::Register;
    use crate::history::reader::HistoryReader;
    use crate::history::types::{Invocation, Method, Schema, Sequence};
    use crate::search::position::HistoryPosition;
    use crate::search::validation::{StrictValidator, TrivialValidator};

    fn set(raw: &[usize]) -> BTreeSet<InvocationId> {
        raw.iter().copied().map(InvocationId).collect()
    }

    #[test]
    fn test_subsets_by_size() {
        let subsets: Vec<Vec<usize>> =
            SubsetsBySize::new(vec![InvocationId(0), InvocationId(1), InvocationId(2)])
                .map(|subset| subset.into_iter().map(|id| id.0).collect())
                .collect();
        assert_eq!(
            subsets,
            vec![
                vec![],
                vec![0],
                vec![1],
                vec![2],
                vec![0, 1],
                vec![0, 2],
                vec![1, 2],
                vec![0, 1, 2],
            ]
        );
        assert_eq!(SubsetsBySize::new(Vec::new()).count(), 1);
    }

    // { write(1) } || { write(2) } || { read() => 1 }
    fn reader() -> HistoryReader<i64> {
        let write = Method::new("write").void();
        let schema = Schema::new(
            "Register",
            vec![
                Sequence::new(1, vec![Invocation::new(write.clone(), vec![1], None)]),
                Sequence::new(2, vec![Invocation::new(write, vec![2], None)]),
                Sequence::new(
                    3,
                    vec![Invocation::new(Method::new("read"), vec![], Some(1))],
                ),
            ],
        );
        HistoryReader::try_from(&schema).unwrap()
    }

    fn linearized(reader: &HistoryReader<i64>) -> (HistoryPosition<'_, i64>, Linearization) {
        let order = [InvocationId(0), InvocationId(1), InvocationId(2)];
        let mut position = HistoryPosition::initial(reader);
        let mut linearization = Linearization::empty();
        for op in order {
            position = position.advance(op);
            linearization = linearization.append(op);
        }
        (position, linearization)
    }

    #[test]
    fn test_full_enumerates_accepted_sets() {
        let reader = reader();
        let (position, linearization) = linearized(&reader);
        let extender = FullVisibilityExtender::new(StrictValidator::new(&Register));
        let base = Visibility::empty();
        let committed = [InvocationId(2)];

        let widened: Vec<Visibility> = extender
            .extensions(&position, &linearization, &base, &committed)
            .collect();
        // read() => 1 must see write(1) without a later write(2)
        assert_eq!(widened.len(), 1);
        assert_eq!(widened[0].observed(InvocationId(2)), Some(&set(&[0])));
        assert!(base.is_empty());
    }

    #[test]
    fn test_full_product_over_committed() {
        let reader = reader();
        let (position, linearization) = linearized(&reader);
        let extender = FullVisibilityExtender::new(TrivialValidator);
        let committed = [InvocationId(1), InvocationId(2)];

        let count = extender
            .extensions(&position, &linearization, &Visibility::empty(), &committed)
            .count();
        // write(2) may see {} or {0}; read() may see any subset of {0, 1}
        assert_eq!(count, 2 * 4);
    }

    /// Accepts what [`TrivialValidator`] accepts and counts its calls.
    #[derive(Default)]
    struct Counting(Cell<usize>);

    impl<Value> Validator<Value> for Counting {
        fn is_valid(
            &self,
            reader: &HistoryReader<Value>,
            observed: &[InvocationId],
            op: InvocationId,
        ) -> bool {
            self.0.set(self.0.get() + 1);
            TrivialValidator.is_valid(reader, observed, op)
        }
    }

    #[test]
    fn test_full_validates_on_demand() {
        let reader = reader();
        let (position, linearization) = linearized(&reader);
        let extender = FullVisibilityExtender::new(Counting::default());
        let base = Visibility::empty();
        let committed = [InvocationId(1), InvocationId(2)];

        let mut extensions = extender.extensions(&position, &linearization, &base, &committed);
        let first = extensions.next().expect("empty sets are accepted");
        assert_eq!(first.observed(InvocationId(1)), Some(&BTreeSet::new()));
        assert_eq!(first.observed(InvocationId(2)), Some(&BTreeSet::new()));
        // one set per committed invocation, nothing further
        assert_eq!(extender.validator.0.get(), 2);

        assert_eq!(extensions.count(), 2 * 4 - 1);
    }

    #[test]
    fn test_minimal_takes_smallest() {
        let reader = reader();
        let (position, linearization) = linearized(&reader);
        let extender = MinimalVisibilityExtender::new(TrivialValidator);
        let committed = [InvocationId(0), InvocationId(1), InvocationId(2)];

        let widened: Vec<Visibility> = extender
            .extensions(&position, &linearization, &Visibility::empty(), &committed)
            .collect();
        assert_eq!(widened.len(), 1);
        for op in committed {
            assert_eq!(widened[0].observed(op), Some(&BTreeSet::new()));
        }
    }

    #[test]
    fn test_minimal_fails_when_nothing_is_accepted() {
        let schema = Schema::new(
            "Register",
            vec![Sequence::new(
                1,
                vec![Invocation::new(Method::new("read"), vec![], Some(7))],
            )],
        );
        let reader = HistoryReader::try_from(&schema).unwrap();
        let position = HistoryPosition::initial(&reader).advance(InvocationId(0));
        let linearization = Linearization::empty().append(InvocationId(0));
        let extender = MinimalVisibilityExtender::new(StrictValidator::new(&Register));

        assert_eq!(
            extender
                .extensions(&position, &linearization, &Visibility::empty(), &[InvocationId(0)])
                .count(),
            0
        );
    }
}
