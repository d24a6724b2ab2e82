use alloc::string::String;
use core::fmt::{Display, Write};

use crate::history::error::Error;
use crate::history::types::{Invocation, Schema};

/// Format a history in the compact notation.
///
/// Each sequence is rendered as `{ inv; inv }` and sequences are joined by
/// `||`. An invocation is `name(arg, arg)`, followed by `=> result` when it
/// recorded one. The output round-trips through the compact notation parser
/// given the same method specification.
///
/// # Errors
///
/// Returns [`Error::ExplicitOrder`] if the history carries explicit
/// cross-sequence ordering, which the notation cannot express.
pub fn format_schema<Value>(schema: &Schema<Value>) -> Result<String, Error>
where
    Value: Display,
{
    if !schema.order.is_empty() {
        return Err(Error::ExplicitOrder {
            pairs: schema.order.len(),
        });
    }

    let mut output = String::new();
    for (i, sequence) in schema.sequences.iter().enumerate() {
        if i > 0 {
            output.push_str(" || ");
        }
        output.push('{');
        for (j, invocation) in sequence.invocations.iter().enumerate() {
            output.push_str(if j > 0 { "; " } else { " " });
            write_invocation(&mut output, invocation);
        }
        output.push_str(" }");
    }
    Ok(output)
}

fn write_invocation<Value>(output: &mut String, invocation: &Invocation<Value>)
where
    Value: Display,
{
    let _ = write!(output, "{}(", invocation.method.name);
    for (i, argument) in invocation.arguments.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        let _ = write!(output, "{argument}");
    }
    output.push(')');
    if let Some(result) = &invocation.result {
        let _ = write!(output, " => {result}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::types::{Method, Sequence};

    fn call(name: &str, arguments: Vec<i64>, result: Option<i64>) -> Invocation<i64> {
        Invocation::new(Method::new(name), arguments, result)
    }

    #[test]
    fn test_format_single_sequence() {
        let schema = Schema::new(
            "Queue",
            vec![Sequence::new(
                1,
                vec![call("offer", vec![1], None), call("poll", vec![], Some(1))],
            )],
        );
        assert_eq!(
            format_schema(&schema).unwrap(),
            "{ offer(1); poll() => 1 }"
        );
    }

    #[test]
    fn test_format_parallel_sequences() {
        let schema = Schema::new(
            "Map",
            vec![
                Sequence::new(1, vec![call("put", vec![1, 2], None)]),
                Sequence::new(2, vec![call("get", vec![1], Some(2))]),
            ],
        );
        assert_eq!(
            format_schema(&schema).unwrap(),
            "{ put(1, 2) } || { get(1) => 2 }"
        );
    }

    #[test]
    fn test_format_empty() {
        let schema: Schema<i64> = Schema::new("Queue", vec![]);
        assert_eq!(format_schema(&schema).unwrap(), "");

        let schema: Schema<i64> = Schema::new("Queue", vec![Sequence::new(1, vec![])]);
        assert_eq!(format_schema(&schema).unwrap(), "{ }");
    }

    #[test]
    fn test_format_rejects_explicit_order() {
        let schema = Schema::new(
            "Queue",
            vec![
                Sequence::new(1, vec![call("offer", vec![1], None)]),
                Sequence::new(2, vec![call("poll", vec![], Some(1))]),
            ],
        )
        .with_order(vec![(1, 2)]);
        assert_eq!(
            format_schema(&schema),
            Err(Error::ExplicitOrder { pairs: 1 })
        );
    }
}
