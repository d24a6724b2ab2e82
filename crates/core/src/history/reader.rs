use alloc::string::String;
use alloc::vec::Vec;

use crate::history::error::Error;
use crate::history::order::ProgramOrder;
use crate::history::types::{Invocation, InvocationId, Schema};

/// An indexed, validated snapshot of a history, ready to be searched.
///
/// Built from a [`Schema`] via `TryFrom`, which indexes a copy of every
/// invocation and derives the [`ProgramOrder`]. The source schema is not
/// modified.
#[derive(Debug, Clone)]
pub struct HistoryReader<Value> {
    class: String,
    invocations: Vec<Invocation<Value>>,
    order: ProgramOrder,
}

impl<Value> TryFrom<&Schema<Value>> for HistoryReader<Value>
where
    Value: Clone,
{
    type Error = Error;

    fn try_from(schema: &Schema<Value>) -> Result<Self, Self::Error> {
        let order = schema.program_order()?;

        let mut indexed = schema.clone();
        indexed.index_invocations();
        let invocations: Vec<Invocation<Value>> = indexed
            .sequences
            .into_iter()
            .flat_map(|sequence| sequence.invocations)
            .collect();

        tracing::debug!(
            class = %schema.class,
            sequences = schema.sequences.len(),
            invocations = invocations.len(),
            "loaded history"
        );

        Ok(Self {
            class: schema.class.clone(),
            invocations,
            order,
        })
    }
}

impl<Value> HistoryReader<Value> {
    /// Class name of the object under test.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[must_use]
    pub const fn order(&self) -> &ProgramOrder {
        &self.order
    }

    /// The invocation with identity `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this history.
    #[must_use]
    pub fn invocation(&self, id: InvocationId) -> &Invocation<Value> {
        &self.invocations[id.0]
    }

    /// All invocations, in identity order.
    pub fn invocations(&self) -> impl Iterator<Item = (InvocationId, &Invocation<Value>)> {
        self.invocations
            .iter()
            .enumerate()
            .map(|(i, invocation)| (InvocationId(i), invocation))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }
}
