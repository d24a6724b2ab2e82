//! The checker facade: configuration in, verdict out.
//!
//! [`ConsistencyChecker`] is the only place where configuration flags are
//! mapped onto concrete search strategies:
//!
//! | flag   | off                                   | on                                   |
//! |--------|---------------------------------------|--------------------------------------|
//! | `weak` | strict validator, linearization search | trivial validator, consistency search |
//! | `jit`  | exhaustive linearization extender     | just-in-time linearization extender  |
//! | `min`  | full visibility extender              | minimal visibility extender          |
//!
//! Visibility steps always replay the proposed observed set through the
//! executor. `jit` and `min` never change the verdict, only the amount of
//! work done to reach it.

use alloc::boxed::Box;

pub use self::error::Error;
use crate::executor::Executor;
use crate::history::reader::HistoryReader;
use crate::history::types::Schema;
use crate::search::{
    ExhaustiveLinearizationExtender, FullVisibilityExtender, HistoryPosition,
    JustInTimeLinearizationExtender, LinearizationExtender, MinimalVisibilityExtender,
    SearchEngine, StrictValidator, TrivialValidator, VisibilityExtender, Witness,
};

pub mod error;

/// Which consistency model to check, and which search shortcuts to take.
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckerConfig {
    /// Check weak (visibility-based) consistency instead of linearizability.
    pub weak: bool,
    /// Commit forced runs of invocations in a single step.
    pub jit: bool,
    /// Propose only the smallest acceptable observed set per invocation.
    pub min: bool,
}

/// Checks histories against a [`CheckerConfig`] using the sequential
/// semantics of an [`Executor`].
///
/// The checker never modifies the histories it is given and can be reused.
#[derive(Debug, Clone)]
pub struct ConsistencyChecker<E> {
    config: CheckerConfig,
    executor: E,
}

impl<E> ConsistencyChecker<E> {
    #[must_use]
    pub const fn new(config: CheckerConfig, executor: E) -> Self {
        Self { config, executor }
    }

    #[must_use]
    pub const fn config(&self) -> CheckerConfig {
        self.config
    }

    /// Returns `true` if `schema` is explained by the configured model.
    ///
    /// # Errors
    ///
    /// See [`witness`](Self::witness).
    pub fn check<Value>(&self, schema: &Schema<Value>) -> Result<bool, Error>
    where
        Value: Clone + PartialEq,
        E: Executor<Value>,
    {
        self.witness(schema).map(|witness| witness.is_some())
    }

    /// Returns the first witness found for `schema`, or `None` if the history
    /// is not explained by the configured model.
    ///
    /// # Errors
    ///
    /// - [`Error::History`] if the program order cannot be built.
    /// - [`Error::UnsupportedMethod`] if the executor does not support a
    ///   method invoked in the history.
    pub fn witness<Value>(&self, schema: &Schema<Value>) -> Result<Option<Witness>, Error>
    where
        Value: Clone + PartialEq,
        E: Executor<Value>,
    {
        let reader = HistoryReader::try_from(schema)?;
        if let Some((_, invocation)) = reader
            .invocations()
            .find(|(_, invocation)| !self.executor.supports(&invocation.method))
        {
            return Err(Error::UnsupportedMethod {
                name: invocation.method.name.clone(),
            });
        }

        let CheckerConfig { weak, jit, min } = self.config;
        tracing::debug!(class = reader.class(), weak, jit, min, "checking history");

        let strict = StrictValidator::new(&self.executor);
        let linearizations: Box<dyn LinearizationExtender<HistoryPosition<'_, Value>> + '_> =
            match (weak, jit) {
                (false, false) => Box::new(ExhaustiveLinearizationExtender::new(strict)),
                (false, true) => Box::new(JustInTimeLinearizationExtender::new(strict)),
                (true, false) => Box::new(ExhaustiveLinearizationExtender::new(TrivialValidator)),
                (true, true) => Box::new(JustInTimeLinearizationExtender::new(TrivialValidator)),
            };
        let visibilities: Box<dyn VisibilityExtender<HistoryPosition<'_, Value>> + '_> = if min {
            Box::new(MinimalVisibilityExtender::new(strict))
        } else {
            Box::new(FullVisibilityExtender::new(strict))
        };

        let engine = SearchEngine::new(linearizations, visibilities);
        let start = HistoryPosition::initial(&reader);
        let witness = if weak {
            engine.find_consistent(&start)
        } else {
            engine.find_linearization(&start).map(Witness::Linearization)
        };

        tracing::debug!(class = reader.class(), accepted = witness.is_some(), "verdict");
        Ok(witness)
    }
}
