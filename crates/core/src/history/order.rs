//! Program order: the partial order a linearization must respect.
//!
//! Program order is derived once from a [`Schema`]:
//!
//! - every invocation is a node, identified by its flat [`InvocationId`];
//! - consecutive invocations of the same sequence are ordered;
//! - every explicit `(i1, i2)` pair orders the last invocation of sequence
//!   `i1` before the first invocation of sequence `i2`.
//!
//! ```text
//!   S1:  #0 ──> #1 ──> #2
//!                       │   explicit (1, 2)
//!                       v
//!   S2:                #3 ──> #4
//! ```
//!
//! Invocations of different sequences are never ordered unless explicit
//! pairs connect those sequences, directly or through empty sequences. A cycle is a configuration error reported
//! while building, never a search failure.

use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;

use crate::graph::digraph::DiGraph;
use crate::history::error::Error;
use crate::history::types::{InvocationId, Schema};

/// Acyclic precedence relation over the invocations of a history.
///
/// Predecessor and ancestor tables are computed at construction; the
/// structure is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramOrder {
    graph: DiGraph<InvocationId>,
    predecessors: Vec<Vec<InvocationId>>,
    ancestors: Vec<BTreeSet<InvocationId>>,
}

impl ProgramOrder {
    /// Builds the order over `len` invocations `0..len` from a list of
    /// precedence edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicOrder`] if the edges contain a cycle.
    pub fn from_edges(
        len: usize,
        edges: impl IntoIterator<Item = (InvocationId, InvocationId)>,
    ) -> Result<Self, Error> {
        let mut graph = DiGraph::default();
        for id in (0..len).map(InvocationId) {
            graph.add_vertex(id);
        }
        for (before, after) in edges {
            graph.add_edge(before, after);
        }

        let Some(topological) = graph.topological_sort() else {
            let (a, b) = graph
                .find_cycle_edge()
                .expect("a graph without topological order has a cycle edge");
            return Err(Error::CyclicOrder { a, b });
        };

        let mut predecessors = vec![Vec::new(); len];
        for (source, targets) in &graph.adj_map {
            for target in targets {
                predecessors[target.0].push(*source);
            }
        }
        for parents in &mut predecessors {
            parents.sort_unstable();
        }

        let mut ancestors = vec![BTreeSet::new(); len];
        for id in topological {
            let mut above = BTreeSet::new();
            for parent in &predecessors[id.0] {
                above.insert(*parent);
                above.extend(ancestors[parent.0].iter().copied());
            }
            ancestors[id.0] = above;
        }

        Ok(Self {
            graph,
            predecessors,
            ancestors,
        })
    }

    /// Number of invocations in the order.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Returns `true` if `before` is a direct program-order predecessor of
    /// `after`.
    #[must_use]
    pub fn precedes(&self, before: InvocationId, after: InvocationId) -> bool {
        self.graph.has_edge(&before, &after)
    }

    /// Direct predecessors of `id`, ascending.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an invocation of this order.
    #[must_use]
    pub fn predecessors(&self, id: InvocationId) -> &[InvocationId] {
        &self.predecessors[id.0]
    }

    /// All transitive predecessors of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an invocation of this order.
    #[must_use]
    pub fn ancestors(&self, id: InvocationId) -> &BTreeSet<InvocationId> {
        &self.ancestors[id.0]
    }

    /// The invocations not yet in `linearized` whose every predecessor is,
    /// ascending.
    #[must_use]
    pub fn eligible(&self, linearized: &BTreeSet<InvocationId>) -> Vec<InvocationId> {
        (0..self.len())
            .map(InvocationId)
            .filter(|id| !linearized.contains(id))
            .filter(|id| {
                self.predecessors(*id)
                    .iter()
                    .all(|parent| linearized.contains(parent))
            })
            .collect()
    }

    /// Returns `true` once every invocation is in `linearized`.
    #[must_use]
    pub fn is_complete(&self, linearized: &BTreeSet<InvocationId>) -> bool {
        (0..self.len()).all(|id| linearized.contains(&InvocationId(id)))
    }
}

impl<Value> Schema<Value> {
    /// Derives the program order of this history.
    ///
    /// Invocation identities are flat positions, matching the indices
    /// [`index_invocations`](Self::index_invocations) assigns, whether or not
    /// the history has been indexed.
    ///
    /// Explicit pairs pass through empty sequences: with pairs `(1, 2)` and
    /// `(2, 3)` and sequence 2 empty, sequence 1 still precedes sequence 3.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownSequence`] if an explicit pair names a sequence index
    ///   that does not exist.
    /// - [`Error::CyclicOrder`] if the explicit pairs make the order cyclic.
    pub fn program_order(&self) -> Result<ProgramOrder, Error> {
        let mut edges = Vec::new();
        let mut bounds = Vec::with_capacity(self.sequences.len());

        let mut next = 0;
        for sequence in &self.sequences {
            let first = next;
            next += sequence.invocations.len();
            for id in first + 1..next {
                edges.push((InvocationId(id - 1), InvocationId(id)));
            }
            bounds.push((sequence.index, first..next));
        }

        let span = |index: u64| {
            bounds
                .iter()
                .find(|(i, _)| *i == index)
                .map(|(_, range)| range.clone())
                .ok_or(Error::UnknownSequence { index })
        };
        for &(before, after) in &self.order {
            span(before)?;
            span(after)?;
        }

        // A constraint into an empty sequence carries on to whatever that
        // sequence is ordered before.
        let successors = |index: u64| {
            self.order
                .iter()
                .filter(move |(before, _)| *before == index)
                .map(|&(_, after)| after)
        };
        for &(before, after) in &self.order {
            let from = span(before)?;
            if from.is_empty() {
                continue;
            }
            let mut pending = vec![after];
            let mut visited = BTreeSet::new();
            while let Some(index) = pending.pop() {
                if !visited.insert(index) {
                    continue;
                }
                let to = span(index)?;
                if to.is_empty() {
                    pending.extend(successors(index));
                } else {
                    edges.push((InvocationId(from.end - 1), InvocationId(to.start)));
                }
            }
        }

        let order = ProgramOrder::from_edges(next, edges)?;
        tracing::trace!(
            invocations = order.len(),
            explicit = self.order.len(),
            "built program order"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<InvocationId> {
        raw.iter().copied().map(InvocationId).collect()
    }

    #[test]
    fn test_chain_tables() {
        let order = ProgramOrder::from_edges(
            3,
            [
                (InvocationId(0), InvocationId(1)),
                (InvocationId(1), InvocationId(2)),
            ],
        )
        .unwrap();

        assert_eq!(order.len(), 3);
        assert!(order.precedes(InvocationId(0), InvocationId(1)));
        assert!(!order.precedes(InvocationId(0), InvocationId(2)));
        assert_eq!(order.predecessors(InvocationId(2)), ids(&[1]).as_slice());
        assert_eq!(
            order.ancestors(InvocationId(2)).iter().copied().collect::<Vec<_>>(),
            ids(&[0, 1])
        );
        assert!(order.ancestors(InvocationId(0)).is_empty());
    }

    #[test]
    fn test_eligible_and_complete() {
        let order = ProgramOrder::from_edges(
            3,
            [
                (InvocationId(0), InvocationId(2)),
                (InvocationId(1), InvocationId(2)),
            ],
        )
        .unwrap();

        let mut linearized = BTreeSet::new();
        assert_eq!(order.eligible(&linearized), ids(&[0, 1]));
        linearized.insert(InvocationId(0));
        assert_eq!(order.eligible(&linearized), ids(&[1]));
        linearized.insert(InvocationId(1));
        assert_eq!(order.eligible(&linearized), ids(&[2]));
        assert!(!order.is_complete(&linearized));
        linearized.insert(InvocationId(2));
        assert!(order.eligible(&linearized).is_empty());
        assert!(order.is_complete(&linearized));
    }

    #[test]
    fn test_empty_order() {
        let order = ProgramOrder::from_edges(0, Vec::new()).unwrap();
        assert!(order.is_empty());
        assert!(order.is_complete(&BTreeSet::new()));
        assert!(order.eligible(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_cycle_is_rejected() {
        let err = ProgramOrder::from_edges(
            2,
            [
                (InvocationId(0), InvocationId(1)),
                (InvocationId(1), InvocationId(0)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::CyclicOrder { .. }));
    }
}
