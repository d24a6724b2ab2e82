//! Per-step admissibility checks.
//!
//! A [`Validator`] decides whether invocation `op` may be committed given the
//! invocations it observes. The linearization step of a strict search
//! passes the whole linearized prefix as `observed`; visibility steps pass
//! the proposed observed set.

use crate::executor::Executor;
use crate::history::reader::HistoryReader;
use crate::history::types::InvocationId;

pub trait Validator<Value> {
    /// Returns `true` if `op` is admissible after `observed`, which is listed
    /// in linearization order.
    fn is_valid(
        &self,
        reader: &HistoryReader<Value>,
        observed: &[InvocationId],
        op: InvocationId,
    ) -> bool;
}

/// Accepts every structurally well-formed invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrivialValidator;

impl<Value> Validator<Value> for TrivialValidator {
    fn is_valid(
        &self,
        reader: &HistoryReader<Value>,
        _observed: &[InvocationId],
        op: InvocationId,
    ) -> bool {
        reader.invocation(op).is_well_formed()
    }
}

/// Replays the observed invocations against the reference object and
/// accepts `op` iff it reproduces the recorded result.
///
/// The results of `void` methods are never compared.
#[derive(Debug)]
pub struct StrictValidator<'e, E> {
    executor: &'e E,
}

impl<E> Clone for StrictValidator<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for StrictValidator<'_, E> {}

impl<'e, E> StrictValidator<'e, E> {
    #[must_use]
    pub const fn new(executor: &'e E) -> Self {
        Self { executor }
    }
}

impl<Value, E> Validator<Value> for StrictValidator<'_, E>
where
    Value: PartialEq,
    E: Executor<Value>,
{
    fn is_valid(
        &self,
        reader: &HistoryReader<Value>,
        observed: &[InvocationId],
        op: InvocationId,
    ) -> bool {
        let invocation = reader.invocation(op);
        if !invocation.is_well_formed() {
            return false;
        }

        let mut state = self.executor.initial();
        for id in observed {
            let _ = self.executor.apply(&mut state, reader.invocation(*id));
        }
        let produced = self.executor.apply(&mut state, invocation);

        let accepted = invocation.method.void || produced == invocation.result;
        tracing::trace!(%op, observed = observed.len(), accepted, "validated step");
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::objects::Register;
    use crate::history::types::{Invocation, Method, Schema, Sequence};

    fn reader() -> HistoryReader<i64> {
        let write = Method::new("write").with_parameters(["int"]).void();
        let read = Method::new("read").with_parameters::<&str>([]);
        let schema = Schema::new(
            "Register",
            vec![
                Sequence::new(1, vec![Invocation::new(write.clone(), vec![1], None)]),
                Sequence::new(2, vec![Invocation::new(read, vec![], Some(1))]),
                Sequence::new(3, vec![Invocation::new(write, vec![], None)]),
            ],
        );
        HistoryReader::try_from(&schema).unwrap()
    }

    #[test]
    fn test_trivial_checks_structure_only() {
        let reader = reader();
        assert!(TrivialValidator.is_valid(&reader, &[], InvocationId(1)));
        assert!(!TrivialValidator.is_valid(&reader, &[], InvocationId(2)));
    }

    #[test]
    fn test_strict_replays_observed() {
        let reader = reader();
        let validator = StrictValidator::new(&Register);
        assert!(validator.is_valid(&reader, &[InvocationId(0)], InvocationId(1)));
        assert!(!validator.is_valid(&reader, &[], InvocationId(1)));
        assert!(validator.is_valid(&reader, &[], InvocationId(0)));
        assert!(!validator.is_valid(&reader, &[], InvocationId(2)));
    }
}
