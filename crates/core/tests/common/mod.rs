/// DSL macros for building test histories.
///
/// Produces `Schema<i64>`, with sequences indexed from 1 in textual order.
///
/// # Syntax
///
/// ```ignore
/// history!("Register":
///     { write(1); read() => 1 }
///  || { read() }                 // no `=>` means the invocation returned nothing
///  || { }                        // empty sequence
/// )
/// ```
///
/// Method descriptors only carry the name; arity and `void` are not declared.
///
/// Build a single Invocation.
#[macro_export]
macro_rules! inv {
    ($name:ident($($arg:expr),*) => $ret:expr) => {
        histcheck_core::history::types::Invocation::<i64>::new(
            histcheck_core::history::types::Method::new(stringify!($name)),
            vec![$($arg as i64),*],
            Some($ret as i64),
        )
    };
    ($name:ident($($arg:expr),*)) => {
        histcheck_core::history::types::Invocation::<i64>::new(
            histcheck_core::history::types::Method::new(stringify!($name)),
            vec![$($arg as i64),*],
            None,
        )
    };
}

/// Build a Schema from `||`-separated sequences.
#[macro_export]
macro_rules! history {
    ($class:literal: $({ $($name:ident($($arg:expr),*) $(=> $ret:expr)?);* $(;)? })||*) => {{
        let sequences: Vec<Vec<histcheck_core::history::types::Invocation<i64>>> =
            vec![$(vec![$($crate::inv!($name($($arg),*) $(=> $ret)?)),*]),*];
        histcheck_core::history::types::Schema::new(
            $class,
            sequences
                .into_iter()
                .zip(1u64..)
                .map(|(invocations, index)| {
                    histcheck_core::history::types::Sequence::new(index, invocations)
                })
                .collect(),
        )
    }};
}
