use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::history::types::InvocationId;

/// Which invocations each committed invocation observes.
///
/// Like [`Linearization`](super::linearization::Linearization), values are
/// persistent: [`extend`](Self::extend) returns a new relation.
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Visibility(BTreeMap<InvocationId, BTreeSet<InvocationId>>);

impl Visibility {
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// A copy of `self` in which `op` additionally observes `ids`.
    ///
    /// The entry for `op` is created even when `ids` is empty, so `op`
    /// becomes queryable.
    #[must_use]
    pub fn extend(&self, op: InvocationId, ids: impl IntoIterator<Item = InvocationId>) -> Self {
        let mut relation = self.0.clone();
        relation.entry(op).or_default().extend(ids);
        Self(relation)
    }

    /// Returns `true` if `op` observes `other`.
    ///
    /// # Panics
    ///
    /// Panics if `op` has no entry yet.
    #[must_use]
    pub fn observes(&self, op: InvocationId, other: InvocationId) -> bool {
        self.0
            .get(&op)
            .unwrap_or_else(|| panic!("no visibility recorded for {op}"))
            .contains(&other)
    }

    /// The set `op` observes, or `None` if `op` has no entry.
    #[must_use]
    pub fn observed(&self, op: InvocationId) -> Option<&BTreeSet<InvocationId>> {
        self.0.get(&op)
    }

    /// Number of invocations with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InvocationId, &BTreeSet<InvocationId>)> {
        self.0.iter().map(|(op, observed)| (*op, observed))
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, (op, observed)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{{", op.0)?;
            for (j, other) in observed.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", other.0)?;
            }
            write!(f, "}}")?;
        }
        Ok(())
    }
}
