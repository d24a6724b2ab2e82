use alloc::vec::Vec;
use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::history::types::InvocationId;

/// A totally ordered prefix of the invocations of a history.
///
/// Values are persistent: [`append`](Self::append) returns a new
/// linearization and leaves `self` untouched, so sibling branches of the
/// search can share a common ancestor.
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Linearization(Vec<InvocationId>);

impl Linearization {
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// A copy of `self` with `op` placed last.
    #[must_use]
    pub fn append(&self, op: InvocationId) -> Self {
        let mut sequence = Vec::with_capacity(self.0.len() + 1);
        sequence.extend_from_slice(&self.0);
        sequence.push(op);
        Self(sequence)
    }

    /// The invocations in linearization order.
    #[must_use]
    pub fn sequence(&self) -> &[InvocationId] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, op: InvocationId) -> bool {
        self.0.contains(&op)
    }

    /// The invocations placed before `op`, or `None` if `op` is not placed.
    #[must_use]
    pub fn before(&self, op: InvocationId) -> Option<&[InvocationId]> {
        self.0
            .iter()
            .position(|placed| *placed == op)
            .map(|at| &self.0[..at])
    }
}

impl Display for Linearization {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[")?;
        for (i, op) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{op}")?;
        }
        write!(f, "]")
    }
}
