//! Row modifier types
//!
//! Only the expand directive is modeled here; style/format modifiers are the
//! concern of an output collaborator and never reach the compiler core.

/// A row expand directive (`![[expand]]` or `![[expand=N]]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expand {
    /// How many rows this row repeats into; `None` means "fill the grid"
    pub amount: Option<usize>,
}

impl Expand {
    /// A finite expand of `amount` rows
    pub fn amount(amount: usize) -> Self {
        Self {
            amount: Some(amount),
        }
    }

    /// An infinite expand that fills the remaining grid
    pub fn infinite() -> Self {
        Self { amount: None }
    }

    pub fn is_infinite(&self) -> bool {
        self.amount.is_none()
    }
}

/// Modifier state attached to a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifier {
    /// Expand directive, if the row carried one
    pub expand: Option<Expand>,
}

impl Modifier {
    pub fn with_expand(expand: Expand) -> Self {
        Self {
            expand: Some(expand),
        }
    }
}
