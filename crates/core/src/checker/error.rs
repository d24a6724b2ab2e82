use alloc::string::String;

use derive_more::From;

use crate::history::error::Error as HistoryError;

/// Error returned when a history cannot be checked at all.
///
/// A history that is checked but not explained by the model is not an error;
/// it is the verdict `false`.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Error {
    /// The history is malformed (unknown sequence, cyclic order, ...).
    History(HistoryError),
    /// The executor has no semantics for a method the history invokes.
    #[from(skip)]
    UnsupportedMethod { name: String },
}
