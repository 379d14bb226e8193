//! Lexer adapter
//!
//! Drives a [`Tokenizer`] to exhaustion and queues the tokens for the
//! grammar drivers, which consume them one at a time. Each lexer carries a
//! subject label ("code section", "cell value", "modifier") used to word
//! its errors; modifier-subject failures surface as the modifier-specific
//! error variant.

use crate::error::{LangError, LangResult};
use crate::tokenizer::{Token, TokenKind, TokenMatcher, Tokenizer};
use regex::Regex;
use std::collections::VecDeque;

/// Subject label for the code-section grammar
pub const CODE_SECTION: &str = "code section";
/// Subject label for the cell-value grammar
pub const CELL_VALUE: &str = "cell value";
/// Subject label for modifier content
pub const MODIFIER: &str = "modifier";

/// A FIFO of scanned tokens consumed by a grammar driver
pub struct Lexer {
    tokens: VecDeque<Token>,
    subject: &'static str,
    eof: Token,
}

impl Lexer {
    /// Tokenize `input` up front. A synthetic end-of-line marker is
    /// appended after the last real token.
    pub fn new(
        input: &str,
        subject: &'static str,
        rules: &[TokenMatcher],
        catchall: Option<&'static Regex>,
        ignore: &'static Regex,
        stop: Option<(&'static Regex, TokenKind)>,
    ) -> LangResult<Self> {
        let mut tokenizer = Tokenizer::new(input, subject, rules, catchall, ignore, stop);

        let mut tokens = VecDeque::new();
        let mut last_line = 0;
        loop {
            match tokenizer.next_token() {
                Ok(Some(token)) => {
                    last_line = token.line;
                    tokens.push_back(token);
                }
                Ok(None) => break,
                Err(err) => return Err(subject_error(subject, err)),
            }
        }

        tokens.push_back(Token::new(TokenKind::Eol, "\n", last_line));

        Ok(Self {
            tokens,
            subject,
            eof: Token::new(TokenKind::Eof, "", last_line),
        })
    }

    /// The next token without consuming it
    pub fn peek(&self) -> &Token {
        self.tokens.front().unwrap_or(&self.eof)
    }

    /// Look `n` tokens ahead (0 is the same as `peek`)
    pub fn peek_nth(&self, n: usize) -> &Token {
        self.tokens.get(n).unwrap_or(&self.eof)
    }

    /// Consume and return the next token
    pub fn consume(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or_else(|| self.eof.clone())
    }

    /// Consume the next token, failing unless it has the expected kind
    pub fn expect(&mut self, kind: TokenKind) -> LangResult<Token> {
        if self.peek().kind == kind {
            Ok(self.consume())
        } else {
            Err(self.syntax_error(format!(
                "expected {}, got {}",
                kind,
                describe(self.peek())
            )))
        }
    }

    /// Is the next token one of `kinds`?
    pub fn next_is(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// A syntax error at the current token, worded for this lexer's subject
    pub fn syntax_error<S: Into<String>>(&self, message: S) -> LangError {
        subject_error(
            self.subject,
            LangError::Syntax {
                subject: self.subject,
                message: message.into(),
                line: self.peek().line,
            },
        )
    }
}

/// Modifier-subject failures raise the modifier-specific variant
fn subject_error(subject: &'static str, err: LangError) -> LangError {
    match err {
        LangError::Syntax { message, .. } if subject == MODIFIER => {
            LangError::ModifierSyntax(message)
        }
        other => other,
    }
}

/// Render a token for an error message
pub(crate) fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof | TokenKind::Eol => token.kind.to_string(),
        _ => format!("{} '{}'", token.kind, token.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;
    use pretty_assertions::assert_eq;

    fn code_lexer(input: &str) -> Lexer {
        grammar::code_section_lexer(input).unwrap()
    }

    #[test]
    fn test_queue_and_synthetic_eol() {
        let mut lexer = code_lexer("foo := 1");

        assert_eq!(lexer.consume().kind, TokenKind::Identifier);
        assert_eq!(lexer.consume().kind, TokenKind::VarAssign);
        assert_eq!(lexer.consume().kind, TokenKind::Number);
        // Synthetic end-of-line marker, then Eof forever after
        assert_eq!(lexer.consume().kind, TokenKind::Eol);
        assert_eq!(lexer.consume().kind, TokenKind::Eof);
        assert_eq!(lexer.consume().kind, TokenKind::Eof);
    }

    #[test]
    fn test_peek_nth() {
        let lexer = code_lexer("foo := 1");
        assert_eq!(lexer.peek().kind, TokenKind::Identifier);
        assert_eq!(lexer.peek_nth(1).kind, TokenKind::VarAssign);
        assert_eq!(lexer.peek_nth(99).kind, TokenKind::Eof);
    }

    #[test]
    fn test_expect_failure_names_subject() {
        let mut lexer = code_lexer("foo");
        let err = lexer.expect(TokenKind::Number).unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error in code section: expected number, got identifier 'foo'"
        );
    }

    #[test]
    fn test_token_lines_tracked() {
        let mut lexer = code_lexer("a := 1\nb := 2");
        // a := 1
        assert_eq!(lexer.consume().line, 0);
        assert_eq!(lexer.consume().line, 0);
        assert_eq!(lexer.consume().line, 0);
        assert_eq!(lexer.consume().kind, TokenKind::Eol);
        // b := 2 sits on the second line
        let b = lexer.consume();
        assert_eq!((b.kind, b.line), (TokenKind::Identifier, 1));
    }
}
