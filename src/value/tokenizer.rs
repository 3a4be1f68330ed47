//! logos-based tokenizer for attribute values.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `12px` as [`Token::Dimension`] beats `12` + `px`)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Our ordering ensures:
//! - `#ff00aa` matches [`Token::HexColor`] as a single token
//! - `50%` and `1.5em` match [`Token::Dimension`], not `Number` + `Ident`

use logos::Logos;

/// Value token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Hex color: `#fff`, `#ff00aa`, `#ff00aa80`.
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// Number with a unit suffix: `100%`, `12.5em`, `200px`.
    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)(px|%|em|rem|ex|cm|mm|in|pt|pc|vw|vh|vmin|vmax)")]
    Dimension,

    /// Plain number, possibly negative or fractional.
    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)")]
    Number,

    /// Identifier: function names (`rgb`, `hsv`), keywords.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,

    /// `,`
    #[token(",")]
    Comma,
}

/// Tokenize a value string into `(Token, slice)` pairs.
///
/// Returns `None` if any part of the input fails to lex; values are short and
/// a single stray character makes the whole value invalid.
pub fn tokenize(input: &str) -> Option<Vec<(Token, &str)>> {
    Token::lexer(input)
        .spanned()
        .map(|(result, span)| result.ok().map(|token| (token, &input[span])))
        .collect()
}

/// Split a dimension slice like `"12.5em"` into its number and unit parts.
pub(crate) fn split_dimension(text: &str) -> (&str, &str) {
    let at = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(text.len());
    text.split_at(at)
}
