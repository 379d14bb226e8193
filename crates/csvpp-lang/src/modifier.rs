//! Row modifier recognition
//!
//! A row modifier rides in front of the first cell's content:
//!
//! ```text
//! ![[expand=3]]Item,Price,Total
//! ```
//!
//! The recognizer peels the `![[...]]` prefix off and hands back the
//! remaining cell text untouched. `expand` without an amount marks the
//! row infinite (it fills the rest of the template).

use crate::error::{LangError, LangResult};
use csvpp_core::modifier::{Expand, Modifier};
use lazy_regex::{regex_captures, regex_is_match};

/// Split a first-cell field into its row modifier and remaining content
pub fn parse_row_modifier(input: &str) -> LangResult<(Modifier, &str)> {
    let Some((prefix, content)) = regex_captures!(r"^!\[\[([^\]]*)\]\]", input) else {
        if regex_is_match!(r"^!\[\[", input) {
            return Err(LangError::ModifierSyntax(
                "unterminated modifier, expected ']]'".to_string(),
            ));
        }
        return Ok((Modifier::default(), input));
    };

    let modifier = parse_modifier_content(content.trim())?;
    Ok((modifier, &input[prefix.len()..]))
}

fn parse_modifier_content(content: &str) -> LangResult<Modifier> {
    let Some((_, amount)) = regex_captures!(r"^expand(?:=(\d+))?$", content) else {
        return Err(LangError::ModifierSyntax(format!(
            "unknown modifier '{}'",
            content
        )));
    };

    let expand = if amount.is_empty() {
        Expand::infinite()
    } else {
        let amount: usize = amount
            .parse()
            .map_err(|_| LangError::ModifierSyntax(format!("invalid expand amount '{}'", amount)))?;
        if amount == 0 {
            return Err(LangError::ModifierSyntax(
                "expand amount must be at least 1".to_string(),
            ));
        }
        Expand::amount(amount)
    };

    Ok(Modifier::with_expand(expand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_modifier() {
        let (modifier, rest) = parse_row_modifier("plain text").unwrap();
        assert_eq!(modifier, Modifier::default());
        assert_eq!(rest, "plain text");
    }

    #[test]
    fn test_expand_with_amount() {
        let (modifier, rest) = parse_row_modifier("![[expand=3]]Item").unwrap();
        assert_eq!(modifier.expand, Some(Expand::amount(3)));
        assert_eq!(rest, "Item");
    }

    #[test]
    fn test_infinite_expand() {
        let (modifier, rest) = parse_row_modifier("![[expand]]=SUM(A1, B1)").unwrap();
        let expand = modifier.expand.unwrap();
        assert!(expand.is_infinite());
        assert_eq!(rest, "=SUM(A1, B1)");
    }

    #[test]
    fn test_unknown_modifier() {
        let err = parse_row_modifier("![[bold]]x").unwrap_err();
        assert_eq!(err.to_string(), "invalid modifier: unknown modifier 'bold'");
    }

    #[test]
    fn test_unterminated_modifier() {
        let err = parse_row_modifier("![[expand").unwrap_err();
        assert!(err.to_string().contains("unterminated modifier"));
    }

    #[test]
    fn test_zero_expand_rejected() {
        assert!(parse_row_modifier("![[expand=0]]").is_err());
    }
}
