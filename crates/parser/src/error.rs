use derive_more::From;
use histcheck_core::history::error::Error as HistoryError;

use crate::parser::ParseError;

/// Error loading a history from the compact notation.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Error {
    /// The text does not conform to the grammar.
    Syntax(ParseError),
    /// The text parses but does not describe a valid history.
    History(HistoryError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Syntax(e) => write!(f, "{e}"),
            Self::History(HistoryError::UnknownMethod { class, name }) => {
                write!(f, "unknown method `{name}` for class `{class}`")
            }
            Self::History(e) => write!(f, "invalid history: {e:?}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            Self::History(_) => None,
        }
    }
}
