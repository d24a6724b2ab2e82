//! Winnow-based parser for the compact history notation.
//!
//! Grammar:
//! ```text
//! schema     = (sequence ("||" sequence)*)?
//! sequence   = "{" (invocation (";" invocation)* ";"?)? "}"
//! invocation = name "(" (literal ("," literal)*)? ")" ("=>" literal)?
//! name       = [A-Za-z_] [A-Za-z0-9_]*
//! literal    = JSON value: number | string | true | false | null
//!            | array | object
//! ```
//!
//! Whitespace, including newlines, is allowed between all tokens. Sequences
//! are indexed from 1 in textual order. A `=> null` result is the same as no
//! result.

use histcheck_core::history::types::{Invocation, Method, MethodSpec, Schema, Sequence};
use serde_json::Value;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated, terminated};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_while};
use winnow::ModalResult;

use crate::error::Error;

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// A parse error with human-readable location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Parse the compact notation into a history whose methods are resolved
/// against `spec`.
///
/// # Errors
///
/// - [`Error::Syntax`] with line/column information when the input does not
///   conform to the grammar.
/// - [`Error::History`] when an invocation names a method `spec` does not
///   define.
pub fn parse_schema(input: &str, spec: &MethodSpec) -> Result<Schema<Value>, Error> {
    let sequences = parse_sequences(input)?;
    let mut schema = Schema::new(spec.class.clone(), sequences);
    schema.resolve_methods(spec)?;
    Ok(schema)
}

/// Parse the compact notation without resolving methods.
///
/// Every invocation gets a bare [`Method`] carrying only its name.
///
/// # Errors
///
/// Returns a [`ParseError`] with line/column information when the input does
/// not conform to the grammar.
pub fn parse_sequences(input: &str) -> Result<Vec<Sequence<Value>>, ParseError> {
    let sequences = schema_parser.parse(input).map_err(|e| {
        let (line, column) = offset_to_line_col(input, e.offset());
        let message = e.inner().to_string();
        ParseError {
            message: if message.is_empty() {
                "unexpected input".into()
            } else {
                message
            },
            line,
            column,
        }
    })?;

    Ok(sequences
        .into_iter()
        .zip(1u64..)
        .map(|(invocations, index)| Sequence::new(index, invocations))
        .collect())
}

// ---------------------------------------------------------------------------
// Line/column helper
// ---------------------------------------------------------------------------

/// Convert a byte offset into the original input to 1-based (line, column).
fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let prefix = &input[..offset.min(input.len())];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = prefix
        .rfind('\n')
        .map_or_else(
            || prefix.chars().count() + 1,
            |pos| prefix[pos + 1..].chars().count() + 1,
        );
    (line, column)
}

// ---------------------------------------------------------------------------
// Leaf parsers
// ---------------------------------------------------------------------------

/// Optional whitespace, newlines included.
fn ws(input: &mut &str) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

/// A method name.
fn name(input: &mut &str) -> ModalResult<String> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .map(str::to_string)
        .context(StrContext::Label("method name"))
        .parse_next(input)
}

/// A double-quoted JSON string, escapes included, returned unparsed.
fn string_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        '"',
        repeat::<_, _, (), _, _>(
            0..,
            alt((preceded('\\', any).void(), none_of(['"', '\\']).void())),
        ),
        '"',
    )
        .take()
        .parse_next(input)
}

/// A JSON number, returned unparsed.
fn number_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt('-'),
        take_while(1.., |c: char| {
            c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
        }),
    )
        .take()
        .parse_next(input)
}

/// A JSON array or object with balanced brackets, returned unparsed.
///
/// Brackets inside strings do not count.
fn compound_text<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((('[', compound_body, ']'), ('{', compound_body, '}')))
        .take()
        .parse_next(input)
}

fn compound_body(input: &mut &str) -> ModalResult<()> {
    repeat(
        0..,
        alt((
            string_text.void(),
            compound_text.void(),
            none_of(['[', ']', '{', '}', '"']).void(),
        )),
    )
    .parse_next(input)
}

/// A JSON value.
fn literal(input: &mut &str) -> ModalResult<Value> {
    alt((
        compound_text,
        string_text,
        number_text,
        "null",
        "true",
        "false",
    ))
    .try_map(serde_json::from_str::<Value>)
    .context(StrContext::Label("literal"))
    .parse_next(input)
}

// ---------------------------------------------------------------------------
// Structural parsers
// ---------------------------------------------------------------------------

/// `name "(" args ")" ("=>" literal)?`
fn invocation(input: &mut &str) -> ModalResult<Invocation<Value>> {
    let name = name.parse_next(input)?;
    ws.parse_next(input)?;
    let arguments: Vec<Value> = delimited(
        ('(', ws),
        separated(0.., terminated(literal, ws), (',', ws)),
        cut_err(')').context(StrContext::Expected(StrContextValue::CharLiteral(')'))),
    )
    .parse_next(input)?;
    let result = opt(preceded((ws, "=>", ws), cut_err(literal))).parse_next(input)?;

    Ok(Invocation::new(
        Method::new(name),
        arguments,
        result.filter(|value| !value.is_null()),
    ))
}

/// `"{" invocations "}"`, with an optional trailing `;`.
fn sequence(input: &mut &str) -> ModalResult<Vec<Invocation<Value>>> {
    delimited(
        ('{', ws),
        terminated(
            separated(0.., terminated(invocation, ws), (';', ws)),
            opt((';', ws)),
        ),
        cut_err('}').context(StrContext::Expected(StrContextValue::CharLiteral('}'))),
    )
    .parse_next(input)
}

/// The top-level history: sequences separated by `||`.
fn schema_parser(input: &mut &str) -> ModalResult<Vec<Vec<Invocation<Value>>>> {
    delimited(
        ws,
        separated(0.., terminated(sequence, ws), ("||", ws)),
        ws,
    )
    .parse_next(input)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
