//! Cell types

use crate::entity::{Entity, Number};
use std::fmt;

/// One grid cell
///
/// `value` holds the raw field text with any modifier prefix stripped; `ast`
/// is only present for `=`-prefixed formula fields and is replaced in place
/// when the cell is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Row index (0-based), reassigned when rows are expanded
    pub row_index: usize,
    /// Cell index within the row (0-based)
    pub index: usize,
    /// Raw field text
    pub value: String,
    /// Parsed formula, if the field started with `=`
    pub ast: Option<Entity>,
}

impl Cell {
    /// Create a literal (non-formula) cell
    pub fn new<S: Into<String>>(row_index: usize, index: usize, value: S) -> Self {
        Self {
            row_index,
            index,
            value: value.into(),
            ast: None,
        }
    }

    /// Create a formula cell
    pub fn with_ast<S: Into<String>>(row_index: usize, index: usize, value: S, ast: Entity) -> Self {
        Self {
            row_index,
            index,
            value: value.into(),
            ast: Some(ast),
        }
    }

    /// The cell's value as an entity: the resolved AST for formula cells, a
    /// detected literal otherwise
    pub fn resolved_value(&self) -> Entity {
        match &self.ast {
            Some(ast) => ast.clone(),
            None => detect_literal(&self.value),
        }
    }

    /// The field text to persist: `=` + rendered AST for formulas, the raw
    /// text for literals
    pub fn output_field(&self) -> String {
        match &self.ast {
            Some(ast) => format!("={}", ast),
            None => self.value.clone(),
        }
    }

    /// Is this a formula cell?
    pub fn has_formula(&self) -> bool {
        self.ast.is_some()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.output_field())
    }
}

/// Detect the literal type of a non-formula field
fn detect_literal(text: &str) -> Entity {
    let trimmed = text.trim();

    if let Some(b) = Entity::boolean(trimmed) {
        return b;
    }

    if let Ok(n) = trimmed.parse::<Number>() {
        return Entity::Number(n);
    }

    Entity::String(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_literal() {
        assert_eq!(detect_literal("true"), Entity::Boolean(true));
        assert_eq!(detect_literal(" 42 "), Entity::Number(Number::Integer(42)));
        assert_eq!(detect_literal("-1.5"), Entity::Number(Number::Float(-1.5)));
        assert_eq!(detect_literal("baz"), Entity::String("baz".into()));
    }

    #[test]
    fn test_output_field() {
        let literal = Cell::new(0, 0, "hello");
        assert_eq!(literal.output_field(), "hello");
        assert!(!literal.has_formula());

        let formula = Cell::with_ast(
            0,
            1,
            "=SUM(1, 2)",
            Entity::function_call(
                "sum",
                vec![
                    Entity::Number(Number::Integer(1)),
                    Entity::Number(Number::Integer(2)),
                ],
            ),
        );
        assert_eq!(formula.output_field(), "=SUM(1, 2)");
        assert!(formula.has_formula());
    }

    #[test]
    fn test_resolved_value_prefers_ast() {
        let cell = Cell::with_ast(0, 0, "=1", Entity::Number(Number::Integer(1)));
        assert_eq!(cell.resolved_value(), Entity::Number(Number::Integer(1)));

        let cell = Cell::new(0, 0, "baz");
        assert_eq!(cell.resolved_value(), Entity::String("baz".into()));
    }
}
