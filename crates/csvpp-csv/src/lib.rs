//! # csvpp-csv
//!
//! CSV output writer for compiled csvpp templates.

mod error;
mod options;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvWriteOptions, LineTerminator};
pub use writer::CsvWriter;
