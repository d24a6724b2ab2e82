use alloc::string::String;

use crate::history::types::InvocationId;

/// Error building or rendering a history.
///
/// Every variant is a mismatch between the recorded trace and its
/// configuration; none of them is a consistency violation.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An invocation names a method the method specification does not define.
    UnknownMethod { class: String, name: String },
    /// An explicit ordering pair names a sequence index that does not exist.
    UnknownSequence { index: u64 },
    /// The explicit ordering makes program order cyclic.
    /// `a -> b` is one program-order edge on the cycle.
    CyclicOrder { a: InvocationId, b: InvocationId },
    /// The compact notation cannot express explicit cross-sequence ordering.
    ExplicitOrder { pairs: usize },
}
