//! The recorded history of an object under test.
//!
//! A [`Schema`](types::Schema) holds sequences of invocations, one sequence
//! per process or client, plus explicit cross-sequence ordering. From it are
//! derived the [`ProgramOrder`](order::ProgramOrder) and the indexed
//! [`HistoryReader`](reader::HistoryReader) that the search runs on.

pub mod display;
pub mod error;
pub mod order;
pub mod reader;
pub mod types;
