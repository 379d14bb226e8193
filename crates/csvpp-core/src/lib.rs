//! # csvpp-core
//!
//! Core data structures for the csvpp template compiler.
//!
//! This crate provides the fundamental types used throughout csvpp:
//! - [`Entity`] - AST nodes for formulas and code-section definitions
//! - [`Cell`], [`Row`], [`Template`] - the grid model
//! - [`Position`] and [`SourceLocation`] - grid/source coordinates
//! - [`Error`] - the compile-level error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use csvpp_core::{Cell, Entity, Row, Template};
//!
//! let cell = Cell::with_ast(0, 0, "=$$foo", Entity::variable("foo"));
//! let template = Template::new(vec![Row::new(0, vec![cell])]);
//! assert_eq!(template.cell_at(0, 0).unwrap().to_string(), "=$$foo");
//! ```

pub mod cell;
pub mod entity;
pub mod error;
pub mod modifier;
pub mod position;
pub mod row;
pub mod template;

// Re-exports for convenience
pub use cell::Cell;
pub use entity::{Entity, Number, RuntimeResolver};
pub use error::{Error, Result};
pub use modifier::{Expand, Modifier};
pub use position::{Position, SourceLocation};
pub use row::Row;
pub use template::Template;

/// Maximum number of rows a template may expand to
pub const MAX_ROWS: usize = 1000;

/// Filename used when compiling from an in-memory string
pub const DEFAULT_FILENAME: &str = "(stdin)";
