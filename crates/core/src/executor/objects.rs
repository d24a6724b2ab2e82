//! Reference executors for common shared objects.
//!
//! | object          | mutators                     | observers        |
//! |-----------------|------------------------------|------------------|
//! | [`Register`]    | `write(v)`                   | `read()`         |
//! | [`Queue`]       | `offer(v)`, `poll()`         | `peek()`         |
//! | [`Stack`]       | `push(v)`, `pop()`           | `peek()`         |
//! | [`KeyValueMap`] | `put(k, v)`, `remove(k)`     | `get(k)`         |
//!
//! Reading an unwritten register, polling an empty queue, or looking up an
//! absent key produces nothing (`None`). `put` and `remove` produce the
//! previous value of the key.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::executor::Executor;
use crate::history::types::{Invocation, Method};

/// A single-value read/write register, initially unwritten.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Register;

impl<Value> Executor<Value> for Register
where
    Value: Clone,
{
    type State = Option<Value>;

    fn initial(&self) -> Self::State {
        None
    }

    fn supports(&self, method: &Method) -> bool {
        matches!(method.name.as_str(), "read" | "write")
    }

    fn apply(&self, state: &mut Self::State, invocation: &Invocation<Value>) -> Option<Value> {
        match invocation.method.name.as_str() {
            "write" => {
                if let Some(value) = invocation.arguments.first() {
                    *state = Some(value.clone());
                }
                None
            }
            "read" => state.clone(),
            _ => None,
        }
    }
}

/// A FIFO queue, initially empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Queue;

impl<Value> Executor<Value> for Queue
where
    Value: Clone,
{
    type State = VecDeque<Value>;

    fn initial(&self) -> Self::State {
        VecDeque::new()
    }

    fn supports(&self, method: &Method) -> bool {
        matches!(method.name.as_str(), "offer" | "poll" | "peek")
    }

    fn apply(&self, state: &mut Self::State, invocation: &Invocation<Value>) -> Option<Value> {
        match invocation.method.name.as_str() {
            "offer" => {
                state.extend(invocation.arguments.first().cloned());
                None
            }
            "poll" => state.pop_front(),
            "peek" => state.front().cloned(),
            _ => None,
        }
    }
}

/// A LIFO stack, initially empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stack;

impl<Value> Executor<Value> for Stack
where
    Value: Clone,
{
    type State = Vec<Value>;

    fn initial(&self) -> Self::State {
        Vec::new()
    }

    fn supports(&self, method: &Method) -> bool {
        matches!(method.name.as_str(), "push" | "pop" | "peek")
    }

    fn apply(&self, state: &mut Self::State, invocation: &Invocation<Value>) -> Option<Value> {
        match invocation.method.name.as_str() {
            "push" => {
                state.extend(invocation.arguments.first().cloned());
                None
            }
            "pop" => state.pop(),
            "peek" => state.last().cloned(),
            _ => None,
        }
    }
}

/// A key-value map, initially empty.
///
/// Keys are compared with `PartialEq` only, so any argument type works.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyValueMap;

impl<Value> Executor<Value> for KeyValueMap
where
    Value: Clone + PartialEq,
{
    type State = Vec<(Value, Value)>;

    fn initial(&self) -> Self::State {
        Vec::new()
    }

    fn supports(&self, method: &Method) -> bool {
        matches!(method.name.as_str(), "put" | "get" | "remove")
    }

    fn apply(&self, state: &mut Self::State, invocation: &Invocation<Value>) -> Option<Value> {
        let key = invocation.arguments.first()?;
        let slot = state.iter().position(|(k, _)| k == key);
        match invocation.method.name.as_str() {
            "put" => {
                let value = invocation.arguments.get(1)?.clone();
                match slot {
                    Some(i) => Some(core::mem::replace(&mut state[i].1, value)),
                    None => {
                        state.push((key.clone(), value));
                        None
                    }
                }
            }
            "get" => slot.map(|i| state[i].1.clone()),
            "remove" => slot.map(|i| state.remove(i).1),
            _ => None,
        }
    }
}
