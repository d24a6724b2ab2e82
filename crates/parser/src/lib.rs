pub mod error;
pub mod parser;

pub use error::Error;
pub use parser::{parse_schema, parse_sequences, ParseError};
