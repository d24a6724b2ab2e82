use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::search::linearization::Linearization;
use crate::search::visibility::Visibility;

/// Evidence that a history is explained by the checked consistency model.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Witness {
    /// A total order respecting program order in which every invocation
    /// reproduces its recorded result.
    Linearization(Linearization),
    /// A total order plus, for every invocation, the set of invocations it
    /// observes.
    Consistent {
        linearization: Linearization,
        visibility: Visibility,
    },
}

impl Witness {
    #[must_use]
    pub const fn linearization(&self) -> &Linearization {
        match self {
            Self::Linearization(linearization) | Self::Consistent { linearization, .. } => {
                linearization
            }
        }
    }

    #[must_use]
    pub const fn visibility(&self) -> Option<&Visibility> {
        match self {
            Self::Linearization(_) => None,
            Self::Consistent { visibility, .. } => Some(visibility),
        }
    }
}

impl Display for Witness {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Linearization(linearization) => write!(f, "{linearization}"),
            Self::Consistent {
                linearization,
                visibility,
            } => write!(f, "{linearization} with visibility {visibility}"),
        }
    }
}
