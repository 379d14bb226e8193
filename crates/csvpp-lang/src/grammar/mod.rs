//! The two csvpp grammars
//!
//! Both grammars share the tokenizer rule tables and expression productions
//! defined here; only the top-level production differs. The code-section
//! grammar adds definition forms (`def`, `:=`) and line structure, the
//! cell-value grammar parses a single `=`-prefixed formula expression.
//!
//! Infix operators are one flat left-associative tier: `1 + 2 * 3` parses
//! as `((1 + 2) * 3)`. Parenthesization is the only grouping.

pub mod cell_value;
pub mod code_section;

use crate::error::LangResult;
use crate::lexer::{describe, Lexer, CELL_VALUE, CODE_SECTION};
use crate::tokenizer::{TokenKind, TokenMatcher};
use csvpp_core::entity::{Entity, Number};
use lazy_regex::{regex, regex_is_match};
use once_cell::sync::Lazy;

/// Strip the surrounding quotes and unescape `\"` / `\\`
fn unquote(text: &str) -> String {
    text[1..text.len() - 1]
        .replace("\\\"", "\"")
        .replace("\\\\", "\\")
}

/// Strip the `$$` sigil off a variable reference
fn unsigil(text: &str) -> String {
    text[2..].to_string()
}

/// Expression-level token rules, shared by both grammars.
///
/// Order is load-bearing: `TRUE`/`FALSE` must precede the cell-reference
/// and identifier rules, and the cell-reference rule must precede the
/// identifier rule so `A1` never lexes as an identifier.
fn expression_rules(rules: &mut Vec<TokenMatcher>) {
    rules.push(TokenMatcher::with_alter(
        TokenKind::VariableRef,
        regex!(r"\$\$[A-Za-z_]\w*"),
        unsigil,
    ));
    rules.push(TokenMatcher::new(
        TokenKind::Boolean,
        regex!(r"(?i)(?:true|false)\b"),
    ));
    rules.push(TokenMatcher::with_alter(
        TokenKind::DoubleQuotedString,
        regex!(r#""(?:[^"\\]|\\.)*""#),
        unquote,
    ));
    rules.push(TokenMatcher::new(
        TokenKind::Number,
        regex!(r"\d+(?:\.\d+)?"),
    ));
    rules.push(TokenMatcher::new(
        TokenKind::CellReference,
        regex!(r"\$?[A-Za-z]{1,3}\$?\d+\b"),
    ));
    rules.push(TokenMatcher::new(
        TokenKind::InfixOperator,
        regex!(r"<=|>=|<>|[-+*/^&=<>]"),
    ));
    rules.push(TokenMatcher::new(
        TokenKind::Identifier,
        regex!(r"[A-Za-z_]\w*"),
    ));
}

static CODE_SECTION_RULES: Lazy<Vec<TokenMatcher>> = Lazy::new(|| {
    let mut rules = vec![
        TokenMatcher::new(TokenKind::FnDef, regex!(r"def\b")),
        TokenMatcher::new(TokenKind::VarAssign, regex!(r":=")),
        TokenMatcher::new(TokenKind::Eol, regex!(r"\r?\n")),
    ];
    expression_rules(&mut rules);
    rules
});

static CELL_VALUE_RULES: Lazy<Vec<TokenMatcher>> = Lazy::new(|| {
    let mut rules = Vec::new();
    expression_rules(&mut rules);
    rules
});

/// Build the code-section lexer. Comments (`# ...`) and horizontal
/// whitespace are skipped; a `---` line stops the scan with an end-of-code
/// token.
pub(crate) fn code_section_lexer(input: &str) -> LangResult<Lexer> {
    Lexer::new(
        input,
        CODE_SECTION,
        &CODE_SECTION_RULES,
        Some(regex!(r"[(),]")),
        regex!(r"(?:[ \t\r]+|#[^\n]*)"),
        Some((regex!(r"-{3,}"), TokenKind::EndOfCode)),
    )
}

/// Build the cell-value lexer, or `None` when the field is not a formula
/// (does not start with `=`) and is not worth tokenizing.
pub(crate) fn cell_value_lexer(input: &str) -> LangResult<Option<Lexer>> {
    let trimmed = input.trim();
    let Some(formula) = trimmed.strip_prefix('=') else {
        return Ok(None);
    };

    Lexer::new(
        formula,
        CELL_VALUE,
        &CELL_VALUE_RULES,
        Some(regex!(r"[(),]")),
        regex!(r"[ \t\r\n]+"),
        None,
    )
    .map(Some)
}

/// `exp := term (INFIX_OP term)*`, flat and left-associative
pub(crate) fn parse_expression(lexer: &mut Lexer) -> LangResult<Entity> {
    let mut left = parse_term(lexer)?;

    while lexer.next_is(TokenKind::InfixOperator) {
        let op = lexer.consume();
        let right = parse_term(lexer)?;
        left = Entity::infix_call(op.text, left, right);
    }

    Ok(left)
}

fn parse_term(lexer: &mut Lexer) -> LangResult<Entity> {
    let token = lexer.consume();

    match token.kind {
        TokenKind::Boolean => Entity::boolean(&token.text)
            .ok_or_else(|| lexer.syntax_error(format!("invalid boolean '{}'", token.text))),

        TokenKind::Number => parse_number(lexer, &token.text),

        TokenKind::DoubleQuotedString => Ok(Entity::String(token.text)),

        TokenKind::VariableRef => {
            if lexer.next_is(TokenKind::OpenParen) {
                parse_call(lexer, &token.text)
            } else {
                Ok(Entity::variable(token.text))
            }
        }

        // A reference token followed by '(' is really a function call whose
        // name happens to look like a reference (e.g. LOG10)
        TokenKind::CellReference => {
            if lexer.next_is(TokenKind::OpenParen) {
                parse_call(lexer, &token.text)
            } else {
                Ok(Entity::CellReference(token.text))
            }
        }

        TokenKind::Identifier => {
            if lexer.next_is(TokenKind::OpenParen) {
                parse_call(lexer, &token.text)
            } else if regex_is_match!(r"^\$?[A-Za-z]{1,3}$", &token.text) {
                // A column-only A1 reference (`C`, `AA`)
                Ok(Entity::CellReference(token.text))
            } else {
                Err(lexer.syntax_error(format!("unexpected identifier '{}'", token.text)))
            }
        }

        TokenKind::OpenParen => {
            let inner = parse_expression(lexer)?;
            lexer.expect(TokenKind::CloseParen)?;
            Ok(inner)
        }

        // Unary minus is only valid in front of a numeric literal
        TokenKind::InfixOperator if token.text == "-" => {
            let number = lexer.expect(TokenKind::Number)?;
            parse_number(lexer, &format!("-{}", number.text))
        }

        _ => Err(lexer.syntax_error(format!("unexpected {}", describe(&token)))),
    }
}

fn parse_number(lexer: &Lexer, text: &str) -> LangResult<Entity> {
    text.parse::<Number>()
        .map(Entity::Number)
        .map_err(|_| lexer.syntax_error(format!("invalid numeric literal '{}'", text)))
}

/// A definition or parameter name. Short names lex as cell-reference
/// tokens, so both kinds are accepted here.
pub(crate) fn parse_term_name(lexer: &mut Lexer, what: &str) -> LangResult<String> {
    let token = lexer.consume();
    match token.kind {
        TokenKind::Identifier | TokenKind::CellReference => Ok(token.text.to_lowercase()),
        _ => Err(lexer.syntax_error(format!("expected {}, got {}", what, describe(&token)))),
    }
}

/// `call := NAME '(' (exp (',' exp)*)? ')'`
fn parse_call(lexer: &mut Lexer, id: &str) -> LangResult<Entity> {
    lexer.expect(TokenKind::OpenParen)?;

    let mut args = Vec::new();
    if !lexer.next_is(TokenKind::CloseParen) {
        args.push(parse_expression(lexer)?);
        while lexer.next_is(TokenKind::Comma) {
            lexer.consume();
            args.push(parse_expression(lexer)?);
        }
    }

    lexer.expect(TokenKind::CloseParen)?;
    Ok(Entity::function_call(id, args))
}
