//! Language error types
//!
//! These carry no file position: the tokenizer and grammars only see a slice
//! of input. The compiler maps them into located `csvpp_core::Error` values
//! using the runtime's current line/row/cell.

use thiserror::Error;

/// Result type for tokenizing, parsing, and resolution
pub type LangResult<T> = std::result::Result<T, LangError>;

/// Errors raised by the tokenizer, grammars, and resolver
#[derive(Debug, Error, PartialEq)]
pub enum LangError {
    /// Unrecognized input or a grammar-level parse rejection
    ///
    /// `line` is a 0-based offset into the parsed slice, used by the
    /// compiler to point at the original source line.
    #[error("syntax error in {subject}: {message}")]
    Syntax {
        subject: &'static str,
        message: String,
        line: usize,
    },

    /// Malformed modifier content
    #[error("invalid modifier: {0}")]
    ModifierSyntax(String),

    /// Reference to an id that is neither user-defined nor builtin
    #[error("undefined reference: {}", ids.join(", "))]
    UndefinedReference { ids: Vec<String> },

    /// The static variable dependency graph contains a cycle
    #[error("cyclic variable dependency: {}", ids.join(", "))]
    CyclicReference { ids: Vec<String> },

    /// A builtin was called with an unusable argument
    #[error("invalid argument to {function}: {message}")]
    Argument { function: String, message: String },

    /// A builtin was called with the wrong number of arguments
    #[error("wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },
}

impl LangError {
    /// Shorthand for a syntax error on the first line of the parsed slice
    pub fn syntax<S: Into<String>>(subject: &'static str, message: S) -> Self {
        LangError::Syntax {
            subject,
            message: message.into(),
            line: 0,
        }
    }
}
