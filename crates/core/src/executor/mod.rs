//! Sequential reference semantics of the object under test.
//!
//! An [`Executor`] replays invocations one at a time against a fresh
//! reference object and reports what each would have returned. Validators use
//! it to judge whether a recorded result is explained by a candidate order.
//!
//! [`objects`] provides reference executors for common shared objects.

pub mod objects;

use crate::history::types::{Invocation, Method};

/// Sequential specification of an object.
pub trait Executor<Value> {
    /// State of the reference object.
    type State;

    /// State of a freshly constructed object.
    fn initial(&self) -> Self::State;

    /// Returns `true` if the executor knows how to apply `method`.
    ///
    /// Histories invoking an unsupported method are rejected before any
    /// search starts.
    fn supports(&self, method: &Method) -> bool;

    /// Applies `invocation` to `state` and returns what it produces, `None`
    /// meaning it produces nothing.
    fn apply(&self, state: &mut Self::State, invocation: &Invocation<Value>) -> Option<Value>;
}
