use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

/// Directed graph backed by an adjacency map.
///
/// Each vertex of type `T` maps to the set of its direct successors.
/// Vertices are registered explicitly via [`add_vertex`](Self::add_vertex) or
/// implicitly when they appear in an edge. Self-loops are permitted (and are
/// reported as cycles).
///
/// Program order is stored as a `DiGraph<InvocationId>`; an edge `(a, b)`
/// means invocation `a` must be linearized before invocation `b`.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct DiGraph<T>
where
    T: Hash + Eq + Clone + Debug,
{
    /// Maps each vertex to the set of vertices it has edges to.
    pub adj_map: HashMap<T, HashSet<T>>,
}

impl<T> DiGraph<T>
where
    T: Hash + Eq + Clone + Debug,
{
    /// Registers a vertex with no outgoing edges (if not already present).
    pub fn add_vertex(&mut self, vertex: T) {
        self.adj_map.entry(vertex).or_default();
    }

    /// Inserts a directed edge from `source` to `target`.
    ///
    /// Both vertices are registered if not already present.
    pub fn add_edge(&mut self, source: T, target: T) {
        self.adj_map
            .entry(source)
            .or_default()
            .insert(target.clone());
        self.adj_map.entry(target).or_default();
    }

    /// Returns `true` if an edge from `source` to `target` exists.
    pub fn has_edge(&self, source: &T, target: &T) -> bool {
        self.adj_map
            .get(source)
            .is_some_and(|neighbors| neighbors.contains(target))
    }

    /// Returns a topological ordering of the vertices if the graph is
    /// acyclic, or `None` if it contains a cycle.
    ///
    /// Kahn's algorithm, O(V+E).
    #[must_use]
    pub fn topological_sort(&self) -> Option<Vec<T>> {
        let order = self.kahn();
        (order.len() == self.adj_map.len()).then_some(order)
    }

    /// Returns an edge `(a, b)` lying on a cycle, or `None` if acyclic.
    ///
    /// Every vertex Kahn's algorithm cannot order has a predecessor it cannot
    /// order either. Walking such predecessors must revisit a vertex, and the
    /// edge into the first revisited vertex closes a cycle.
    #[must_use]
    pub fn find_cycle_edge(&self) -> Option<(T, T)> {
        let order = self.kahn();
        let removed: HashSet<&T> = order.iter().collect();

        let mut parent: HashMap<&T, &T> = HashMap::new();
        for (source, targets) in &self.adj_map {
            if removed.contains(source) {
                continue;
            }
            for target in targets.iter().filter(|target| !removed.contains(target)) {
                parent.entry(target).or_insert(source);
            }
        }

        let mut current = *parent.keys().next()?;
        let mut seen = HashSet::new();
        while seen.insert(current) {
            current = *parent.get(current)?;
        }
        let source = *parent.get(current)?;
        Some((source.clone(), current.clone()))
    }

    /// Runs Kahn's algorithm, returning the vertices it could order.
    fn kahn(&self) -> Vec<T> {
        let mut in_degree: HashMap<T, usize> = self
            .adj_map
            .keys()
            .map(|vertex| (vertex.clone(), 0))
            .collect();

        for targets in self.adj_map.values() {
            for target in targets {
                *in_degree.entry(target.clone()).or_insert(0) += 1;
            }
        }

        let mut queue: Vec<T> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(vertex, _)| vertex.clone())
            .collect();

        let mut order = Vec::with_capacity(self.adj_map.len());

        while let Some(vertex) = queue.pop() {
            if let Some(targets) = self.adj_map.get(&vertex) {
                for target in targets {
                    if let Some(degree) = in_degree.get_mut(target) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push(target.clone());
                        }
                    }
                }
            }
            order.push(vertex);
        }

        order
    }
}
