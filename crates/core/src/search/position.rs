use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::history::reader::HistoryReader;
use crate::history::types::InvocationId;

/// A point in the search: the history plus the invocations linearized so far.
///
/// Positions are transient. The engine never mutates one; it asks for the
/// [`advance`](Self::advance)d successor instead.
pub trait Position: Sized {
    type Value;

    fn reader(&self) -> &HistoryReader<Self::Value>;

    /// Invocations that may be linearized next: not yet linearized, with
    /// every program-order predecessor linearized.
    fn eligible(&self) -> Vec<InvocationId>;

    /// Returns `true` once every invocation is linearized.
    fn is_at_end(&self) -> bool;

    /// The position after additionally linearizing `op`.
    #[must_use]
    fn advance(&self, op: InvocationId) -> Self;
}

/// [`Position`] over a [`HistoryReader`], tracking the linearized set.
#[derive(Debug)]
pub struct HistoryPosition<'r, Value> {
    reader: &'r HistoryReader<Value>,
    linearized: BTreeSet<InvocationId>,
}

// Manual impl: a derive would require `Value: Clone`.
impl<Value> Clone for HistoryPosition<'_, Value> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader,
            linearized: self.linearized.clone(),
        }
    }
}

impl<'r, Value> HistoryPosition<'r, Value> {
    /// The start of the search: nothing linearized.
    #[must_use]
    pub const fn initial(reader: &'r HistoryReader<Value>) -> Self {
        Self {
            reader,
            linearized: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn linearized(&self) -> &BTreeSet<InvocationId> {
        &self.linearized
    }
}

impl<Value> Position for HistoryPosition<'_, Value> {
    type Value = Value;

    fn reader(&self) -> &HistoryReader<Value> {
        self.reader
    }

    fn eligible(&self) -> Vec<InvocationId> {
        self.reader.order().eligible(&self.linearized)
    }

    fn is_at_end(&self) -> bool {
        self.reader.order().is_complete(&self.linearized)
    }

    fn advance(&self, op: InvocationId) -> Self {
        let mut linearized = self.linearized.clone();
        linearized.insert(op);
        Self {
            reader: self.reader,
            linearized,
        }
    }
}
