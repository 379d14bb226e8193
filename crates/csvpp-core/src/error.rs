//! Error types for csvpp-core
//!
//! These are the compile-level errors, each pinned to a [`SourceLocation`]
//! so the CLI can render `filename:line[row,cell] message`. The language
//! crate has its own location-free error type; the compiler attaches
//! positions when it maps those upward.

use crate::position::SourceLocation;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a compile
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Unrecognized input or a grammar-level parse rejection
    #[error("{location} {message}")]
    Syntax {
        location: SourceLocation,
        message: String,
    },

    /// A variable or function id referenced but never defined
    #[error("{location} undefined reference: {}", ids.join(", "))]
    UndefinedReference {
        location: SourceLocation,
        ids: Vec<String>,
    },

    /// The static variable dependency graph contains a cycle
    #[error("{location} cyclic variable dependency: {}", ids.join(", "))]
    CyclicReference {
        location: SourceLocation,
        ids: Vec<String>,
    },

    /// Malformed modifier attached to a row or cell
    #[error("{location} invalid modifier: {message}")]
    ModifierSyntax {
        location: SourceLocation,
        message: String,
    },

    /// A modifier parsed but its directives conflict or exceed limits
    #[error("{location} invalid modifier value: {message}")]
    ModifierValidation {
        location: SourceLocation,
        message: String,
    },

    /// Opaque failure from an output writer
    #[error("writer error: {0}")]
    Writer(String),
}

impl Error {
    /// The location this error points at, if it carries one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Error::Syntax { location, .. }
            | Error::UndefinedReference { location, .. }
            | Error::CyclicReference { location, .. }
            | Error::ModifierSyntax { location, .. }
            | Error::ModifierValidation { location, .. } => Some(location),
            Error::Writer(_) => None,
        }
    }
}
