//! Code-section grammar
//!
//! `code := (fn_def | var_def)*`, one definition per line, terminated by
//! the end-of-code marker or end of input:
//!
//! ```text
//! fees := 0.50
//! def profit(price) ($$price - $$fees) * $$qty
//! ```

use super::{parse_expression, parse_term_name};
use crate::error::LangResult;
use crate::lexer::Lexer;
use crate::scope::CodeSection;
use crate::tokenizer::TokenKind;
use csvpp_core::entity::Entity;

/// Parse a code section's text into its variable and function tables
pub fn parse_code_section(input: &str) -> LangResult<CodeSection> {
    let mut lexer = super::code_section_lexer(input)?;
    let mut code_section = CodeSection::default();

    loop {
        while lexer.next_is(TokenKind::Eol) {
            lexer.consume();
        }

        match lexer.peek().kind {
            TokenKind::Eof | TokenKind::EndOfCode => break,
            TokenKind::FnDef => {
                let function = parse_fn_def(&mut lexer)?;
                code_section.define_function(function);
            }
            _ => {
                let variable = parse_var_def(&mut lexer)?;
                code_section.define_variable(variable.0, variable.1);
            }
        }

        if !lexer.next_is(TokenKind::Eof) && !lexer.next_is(TokenKind::EndOfCode) {
            lexer.expect(TokenKind::Eol)?;
        }
    }

    Ok(code_section)
}

/// `fn_def := 'def' NAME ('(' params? ')')? exp`
fn parse_fn_def(lexer: &mut Lexer) -> LangResult<Entity> {
    lexer.expect(TokenKind::FnDef)?;
    let name = parse_term_name(lexer, "function name")?;

    let mut params = Vec::new();
    if lexer.next_is(TokenKind::OpenParen) {
        lexer.consume();
        if !lexer.next_is(TokenKind::CloseParen) {
            params.push(parse_term_name(lexer, "parameter name")?);
            while lexer.next_is(TokenKind::Comma) {
                lexer.consume();
                params.push(parse_term_name(lexer, "parameter name")?);
            }
        }
        lexer.expect(TokenKind::CloseParen)?;
    }

    let body = parse_expression(lexer)?;
    Ok(Entity::function(name, params, body))
}

/// `var_def := NAME ':=' exp`
fn parse_var_def(lexer: &mut Lexer) -> LangResult<(String, Entity)> {
    let name = parse_term_name(lexer, "variable name")?;
    lexer.expect(TokenKind::VarAssign)?;
    let value = parse_expression(lexer)?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvpp_core::entity::Number;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_variable_definitions() {
        let cs = parse_code_section("foo := 1\nbar := $$foo\n").unwrap();

        assert_eq!(
            cs.variable("foo"),
            Some(&Entity::Number(Number::Integer(1)))
        );
        assert_eq!(cs.variable("bar"), Some(&Entity::variable("foo")));
        assert_eq!(cs.variable("baz"), None);
    }

    #[test]
    fn test_parse_function_definition() {
        let cs = parse_code_section("def profit(price) $$price - $$fees").unwrap();

        let expected = Entity::function(
            "profit",
            vec!["price".into()],
            Entity::infix_call("-", Entity::variable("price"), Entity::variable("fees")),
        );
        assert_eq!(cs.function("profit"), Some(&expected));
    }

    #[test]
    fn test_function_without_parens() {
        let cs = parse_code_section("def pi 3.14").unwrap();

        let expected = Entity::function("pi", vec![], Entity::Number(Number::Float(3.14)));
        assert_eq!(cs.function("pi"), Some(&expected));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let cs = parse_code_section("# a comment\n\nfoo := 1\n# trailing\n").unwrap();
        assert!(cs.variable("foo").is_some());
    }

    #[test]
    fn test_stops_at_end_of_code_marker() {
        let cs = parse_code_section("foo := 1\n---\ngarbage here").unwrap();
        assert!(cs.variable("foo").is_some());
        assert_eq!(cs.variables().count(), 1);
    }

    #[test]
    fn test_definition_with_call_and_references() {
        let cs = parse_code_section("bar := ADD($$foo, 2)").unwrap();

        let expected = Entity::function_call(
            "add",
            vec![Entity::variable("foo"), Entity::Number(Number::Integer(2))],
        );
        assert_eq!(cs.variable("bar"), Some(&expected));
    }

    #[test]
    fn test_garbage_is_a_syntax_error() {
        let err = parse_code_section("foo := := 1").unwrap_err();
        assert!(err.to_string().contains("syntax error in code section"));
    }

    #[test]
    fn test_error_carries_line_offset() {
        let err = parse_code_section("foo := 1\nbar := := 2").unwrap_err();
        match err {
            crate::error::LangError::Syntax { line, .. } => assert_eq!(line, 1),
            other => panic!("Expected Syntax, got {:?}", other),
        }
    }
}
