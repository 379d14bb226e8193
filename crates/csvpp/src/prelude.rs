//! Prelude module - common imports for csvpp users
//!
//! ```rust
//! use csvpp::prelude::*;
//! ```

pub use crate::{
    // Compiler entry points
    compile,
    compile_with_options,
    parse_cell_value,
    parse_code_section,

    Cell,
    CompileOptions,

    // I/O types
    CsvWriteOptions,
    CsvWriter,

    // AST types
    Entity,
    // Error types
    Error,
    Number,
    Position,
    Result,
    Row,
    // Runtime types
    Runtime,
    Scope,
    SourceLocation,
    // Grid types
    Template,
};
