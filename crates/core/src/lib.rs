//! Search-based consistency checking for concurrent object histories.
//!
//! `histcheck_core` decides whether a recorded history of invocations on a
//! shared object can be explained by a consistency model. Two models are
//! supported:
//!
//! 1. **Linearizability** -- there is a total order of all invocations that
//!    respects program order and in which every invocation returns what a
//!    sequential execution of its predecessors would return.
//! 2. **Weak (visibility-based) consistency** -- there is a total order that
//!    respects program order, together with a visibility relation choosing,
//!    for every invocation, which earlier invocations it observes. Every
//!    invocation must observe its program-order ancestors, and must return
//!    what a sequential execution of the invocations it observes would return.
//!
//! Both are decided by the same depth-first backtracking engine in
//! [`search`], parameterized by pluggable strategies: a [`Position`] that
//! knows which invocations may go next, extenders that propose the next
//! steps, and validators that judge them against an [`Executor`].
//!
//! # Entry point
//!
//! The main entry point is [`ConsistencyChecker`], which maps a
//! [`CheckerConfig`] onto concrete strategies and returns a boolean verdict:
//!
//! ```rust,ignore
//! use histcheck_core::{CheckerConfig, ConsistencyChecker};
//! use histcheck_core::executor::objects::Register;
//!
//! let checker = ConsistencyChecker::new(CheckerConfig::default(), Register);
//! let linearizable = checker.check(&schema)?;
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- enables `Serialize`/`Deserialize` derives on the history
//!   model, configuration and witnesses.
//! - **`schemars`** -- enables `JsonSchema` derives on the history model.
//!
//! This crate is `no_std` compatible (requires `alloc`). The compact notation
//! parser lives in the separate `histcheck_parser` crate.
//!
//! [`Position`]: search::position::Position
//! [`Executor`]: executor::Executor

#![cfg_attr(not(any(test, feature = "schemars")), no_std)]
extern crate alloc;

pub mod checker;
pub mod executor;
pub mod graph;
pub mod history;
pub mod search;

pub use checker::{CheckerConfig, ConsistencyChecker};
