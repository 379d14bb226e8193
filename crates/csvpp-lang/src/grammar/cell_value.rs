//! Cell-value grammar
//!
//! Parses a single formula expression. Only fields whose trimmed text
//! starts with `=` are formulas; anything else is a literal handled at the
//! cell level and never reaches this grammar.

use super::parse_expression;
use crate::error::LangResult;
use crate::tokenizer::TokenKind;
use csvpp_core::entity::Entity;

/// Parse a cell field into a formula AST
///
/// Returns `Ok(None)` for non-formula fields.
///
/// # Example
/// ```rust
/// use csvpp_lang::parse_cell_value;
///
/// let ast = parse_cell_value("=SUM(A1, $$foo)").unwrap();
/// assert!(ast.is_some());
///
/// assert_eq!(parse_cell_value("just text").unwrap(), None);
/// ```
pub fn parse_cell_value(input: &str) -> LangResult<Option<Entity>> {
    let Some(mut lexer) = super::cell_value_lexer(input)? else {
        return Ok(None);
    };

    let entity = parse_expression(&mut lexer)?;

    // Anything left before the synthetic end-of-line marker is trailing
    // garbage
    lexer.expect(TokenKind::Eol)?;

    Ok(Some(entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvpp_core::entity::Number;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Entity {
        parse_cell_value(input).unwrap().unwrap()
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("=42"), Entity::Number(Number::Integer(42)));
        assert_eq!(parse("=-7"), Entity::Number(Number::Integer(-7)));
        assert_eq!(parse("=3.25"), Entity::Number(Number::Float(3.25)));
        assert_eq!(parse("=TRUE"), Entity::Boolean(true));
        assert_eq!(parse("=\"hi\""), Entity::String("hi".into()));
    }

    #[test]
    fn test_non_formula_fields_are_skipped() {
        assert_eq!(parse_cell_value("hello").unwrap(), None);
        assert_eq!(parse_cell_value("42").unwrap(), None);
        assert_eq!(parse_cell_value("").unwrap(), None);
    }

    #[test]
    fn test_references() {
        assert_eq!(parse("=$$foo"), Entity::variable("foo"));
        assert_eq!(parse("=A1"), Entity::CellReference("A1".into()));
        assert_eq!(parse("=$B$2"), Entity::CellReference("$B$2".into()));
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(
            parse("=SUM(A1, 2)"),
            Entity::function_call(
                "sum",
                vec![
                    Entity::CellReference("A1".into()),
                    Entity::Number(Number::Integer(2)),
                ],
            )
        );

        // Nested calls
        assert_eq!(
            parse("=IF(A1, SUM(B1, 1), 0)"),
            Entity::function_call(
                "if",
                vec![
                    Entity::CellReference("A1".into()),
                    Entity::function_call(
                        "sum",
                        vec![
                            Entity::CellReference("B1".into()),
                            Entity::Number(Number::Integer(1)),
                        ],
                    ),
                    Entity::Number(Number::Integer(0)),
                ],
            )
        );

        // Zero arguments
        assert_eq!(parse("=NOW()"), Entity::function_call("now", vec![]));
    }

    #[test]
    fn test_variable_call_syntax() {
        assert_eq!(
            parse("=$$foo(2)"),
            Entity::function_call("foo", vec![Entity::Number(Number::Integer(2))])
        );
    }

    #[test]
    fn test_infix_is_flat_left_associative() {
        // ((1 + 2) * 3), not 1 + (2 * 3)
        assert_eq!(
            parse("=1 + 2 * 3"),
            Entity::infix_call(
                "*",
                Entity::infix_call(
                    "+",
                    Entity::Number(Number::Integer(1)),
                    Entity::Number(Number::Integer(2)),
                ),
                Entity::Number(Number::Integer(3)),
            )
        );
    }

    #[test]
    fn test_parenthesized_grouping() {
        assert_eq!(
            parse("=1 + (2 * 3)"),
            Entity::infix_call(
                "+",
                Entity::Number(Number::Integer(1)),
                Entity::infix_call(
                    "*",
                    Entity::Number(Number::Integer(2)),
                    Entity::Number(Number::Integer(3)),
                ),
            )
        );
    }

    #[test]
    fn test_comparison_operators() {
        for op in ["=", "<", ">", "<=", ">=", "<>", "&", "^"] {
            let ast = parse(&format!("=A1 {} B1", op));
            assert_eq!(
                ast,
                Entity::infix_call(
                    op,
                    Entity::CellReference("A1".into()),
                    Entity::CellReference("B1".into()),
                )
            );
        }
    }

    #[test]
    fn test_round_trip_display() {
        for formula in [
            "=42",
            "=TRUE",
            "=\"hi\"",
            "=$$foo",
            "=SUM(1, A1)",
            "=IF(A1, SUM(B1, 1), 0)",
            "=(1 + 2)",
            "=((1 + 2) * 3)",
        ] {
            let ast = parse(formula);
            let rendered = format!("={}", ast);
            let reparsed = parse(&rendered);
            assert_eq!(ast, reparsed, "round-trip failed for {}", formula);
        }
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let err = parse_cell_value("=1 2").unwrap_err();
        assert!(err.to_string().contains("expected end of line"));
    }

    #[test]
    fn test_unbalanced_parens_rejected() {
        assert!(parse_cell_value("=SUM(1, 2").is_err());
        assert!(parse_cell_value("=(1 + 2").is_err());
    }

    #[test]
    fn test_function_name_looking_like_cell_reference() {
        // LOG10 lexes as a cell reference but a following '(' makes it a call
        assert_eq!(
            parse("=LOG10(100)"),
            Entity::function_call("log10", vec![Entity::Number(Number::Integer(100))])
        );
    }

    #[test]
    fn test_column_only_reference() {
        assert_eq!(parse("=C"), Entity::CellReference("C".into()));
    }
}
