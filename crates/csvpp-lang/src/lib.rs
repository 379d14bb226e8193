//! The csvpp template language: tokenizer, grammars, and resolution
//!
//! Two small grammars share one tokenizer: the code section (`foo := 1`,
//! `def profit(price) ...`) and `=`-prefixed cell formulas. Parsed
//! definitions land in a [`CodeSection`], which a [`Scope`] finalizes and
//! resolves cell ASTs against, one grid position at a time.

pub mod builtins;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod modifier;
pub mod references;
pub mod scope;
pub mod tokenizer;

pub use error::{LangError, LangResult};
pub use grammar::cell_value::parse_cell_value;
pub use grammar::code_section::parse_code_section;
pub use modifier::parse_row_modifier;
pub use references::References;
pub use scope::{CodeSection, Scope};
