//! Regex-driven tokenizer
//!
//! Both grammars share this scanner and differ only in the rule tables they
//! hand it. Rules are tried in declared order and the first match wins, so
//! keyword-like patterns must be listed before the general identifier
//! pattern; the rule tables in [`crate::grammar`] depend on that ordering.

use crate::error::{LangError, LangResult};
use regex::Regex;

/// How much of the remaining input to quote in error messages
const PEEK_LEN: usize = 10;

/// Token kinds shared by the code-section and cell-value grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Boolean,
    CellReference,
    CloseParen,
    Comma,
    DoubleQuotedString,
    EndOfCode,
    Eof,
    Eol,
    FnDef,
    Identifier,
    InfixOperator,
    Number,
    OpenParen,
    VarAssign,
    VariableRef,
}

impl std::fmt::Display for TokenKind {
    /// Human label used in "expected X, got Y" messages
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TokenKind::Boolean => "boolean",
            TokenKind::CellReference => "cell reference",
            TokenKind::CloseParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::DoubleQuotedString => "string",
            TokenKind::EndOfCode => "end of code section",
            TokenKind::Eof => "end of input",
            TokenKind::Eol => "end of line",
            TokenKind::FnDef => "'def'",
            TokenKind::Identifier => "identifier",
            TokenKind::InfixOperator => "operator",
            TokenKind::Number => "number",
            TokenKind::OpenParen => "'('",
            TokenKind::VarAssign => "':='",
            TokenKind::VariableRef => "variable reference",
        };
        write!(f, "{}", label)
    }
}

/// A scanned token: kind, (possibly altered) matched text, and the 0-based
/// line offset within the scanned slice where it started
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }
}

/// Post-processes a matched token's text before it is recorded
/// (quote-stripping, `$$` removal)
pub type AlterFn = fn(&str) -> String;

/// One `(pattern, kind)` tokenizing rule
pub struct TokenMatcher {
    pub kind: TokenKind,
    pub regex: &'static Regex,
    pub alter: Option<AlterFn>,
}

impl TokenMatcher {
    pub fn new(kind: TokenKind, regex: &'static Regex) -> Self {
        Self {
            kind,
            regex,
            alter: None,
        }
    }

    pub fn with_alter(kind: TokenKind, regex: &'static Regex, alter: AlterFn) -> Self {
        Self {
            kind,
            regex,
            alter: Some(alter),
        }
    }
}

/// The scanner itself
///
/// Holds a cursor into the input plus the grammar's rule tables: ordered
/// token rules, a catchall for literal punctuation, an ignore pattern, and
/// an optional stop pattern that records a designated end token.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    subject: &'static str,
    rules: &'a [TokenMatcher],
    catchall: Option<&'static Regex>,
    ignore: &'static Regex,
    stop: Option<(&'static Regex, TokenKind)>,
    stopped: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(
        input: &'a str,
        subject: &'static str,
        rules: &'a [TokenMatcher],
        catchall: Option<&'static Regex>,
        ignore: &'static Regex,
        stop: Option<(&'static Regex, TokenKind)>,
    ) -> Self {
        Self {
            input,
            pos: 0,
            line: 0,
            subject,
            rules,
            catchall,
            ignore,
            stop,
            stopped: false,
        }
    }

    /// Scan the next token. `Ok(None)` means the input is exhausted (or the
    /// stop pattern already fired); an unmatchable sequence is a syntax
    /// error quoting the offending input.
    pub fn next_token(&mut self) -> LangResult<Option<Token>> {
        if self.stopped {
            return Ok(None);
        }

        self.skip_ignored();

        if self.exhausted() {
            return Ok(None);
        }

        if let Some((stop_regex, end_kind)) = self.stop {
            if let Some(m) = anchored_match(stop_regex, self.rest()) {
                let line = self.line;
                let text = m.to_string();
                self.advance(m.len());
                self.stopped = true;
                return Ok(Some(Token::new(end_kind, text, line)));
            }
        }

        for rule in self.rules {
            if let Some(m) = anchored_match(rule.regex, self.rest()) {
                let line = self.line;
                let text = match rule.alter {
                    Some(alter) => alter(m),
                    None => m.to_string(),
                };
                self.advance(m.len());
                return Ok(Some(Token::new(rule.kind, text, line)));
            }
        }

        if let Some(catchall) = self.catchall {
            if let Some(m) = anchored_match(catchall, self.rest()) {
                if let Some(kind) = punctuation_kind(m) {
                    let line = self.line;
                    let text = m.to_string();
                    self.advance(m.len());
                    return Ok(Some(Token::new(kind, text, line)));
                }
            }
        }

        Err(LangError::Syntax {
            subject: self.subject,
            message: format!("unrecognized token starting at '{}'", self.peek()),
            line: self.line,
        })
    }

    /// A bounded preview of the remaining input, for error messages
    pub fn peek(&self) -> String {
        self.rest().chars().take(PEEK_LEN).collect()
    }

    /// All remaining untokenized input
    pub fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    /// Has the scan cursor consumed all input?
    pub fn exhausted(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ignored(&mut self) {
        while let Some(m) = anchored_match(self.ignore, self.rest()) {
            let len = m.len();
            if len == 0 {
                break;
            }
            self.advance(len);
        }
    }

    fn advance(&mut self, len: usize) {
        self.line += self.input[self.pos..self.pos + len]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        self.pos += len;
    }
}

/// Match `regex` only at the very start of `input`
fn anchored_match<'t>(regex: &Regex, input: &'t str) -> Option<&'t str> {
    regex
        .find(input)
        .filter(|m| m.start() == 0)
        .map(|m| m.as_str())
}

/// The catchall records literal punctuation as its own token kind
fn punctuation_kind(text: &str) -> Option<TokenKind> {
    match text {
        "(" => Some(TokenKind::OpenParen),
        ")" => Some(TokenKind::CloseParen),
        "," => Some(TokenKind::Comma),
        _ => None,
    }
}
