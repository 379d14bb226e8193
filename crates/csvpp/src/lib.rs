//! # csvpp
//!
//! A compiler for the csv++ spreadsheet-templating language.
//!
//! A csvpp source file is a CSV grid with an optional code section in
//! front of it, separated by a `---` line. The code section defines
//! variables and functions; grid fields starting with `=` are formulas
//! that can reference them. Compiling resolves every reference and
//! produces a plain grid ready to write out as CSV.
//!
//! ## Example
//!
//! ```rust
//! use csvpp::prelude::*;
//!
//! let source = "\
//! fees := 0.50
//! def net(price) $$price - $$fees
//! ---
//! Item,Net
//! widget,=$$net(B1)
//! ";
//!
//! let template = compile(source).unwrap();
//! assert_eq!(template.cell_at(1, 1).unwrap().to_string(), "=(B1 - 0.5)");
//!
//! let mut out = Vec::new();
//! CsvWriter::write(&template, &mut out, &CsvWriteOptions::default()).unwrap();
//! ```

pub mod compiler;
pub mod prelude;
pub mod runtime;

// Re-export compiler entry points
pub use compiler::{compile, compile_with_options, CompileOptions};
pub use runtime::{Runtime, StagingBuffer};

// Re-export core types
pub use csvpp_core::{
    Cell,
    Entity,
    // Error types
    Error,
    Expand,
    Modifier,
    Number,
    Position,
    Result,
    Row,
    RuntimeResolver,
    SourceLocation,
    // Grid types
    Template,

    // Constants
    DEFAULT_FILENAME,
    MAX_ROWS,
};

// Re-export language types
pub use csvpp_lang::{
    parse_cell_value, parse_code_section, parse_row_modifier, CodeSection, LangError, LangResult,
    Scope,
};

// Re-export I/O types
pub use csvpp_csv::{CsvError, CsvWriteOptions, CsvWriter, LineTerminator};
