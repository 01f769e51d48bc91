//! logos-based selector tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `:visible` as PseudoClass beats `:` + Ident)
//! 2. For equal length matches, earlier-defined variants win
//!
//! BEM names such as `custom-select__option--value` lex as a single
//! [`Token::Ident`].

use logos::Logos;

/// Selector token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// Pseudo-class: `:visible`, `:focus`, `:disabled`, etc.
    #[regex(r":[a-zA-Z][a-zA-Z0-9_-]*")]
    PseudoClass,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Identifier: tag names, class names, ids, attribute names.
    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    // ── Single-character punctuation ─────────────────────────────────

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,

    /// `#`
    #[token("#")]
    Hash,

    /// `*`
    #[token("*")]
    Star,

    /// `>`
    #[token(">")]
    GreaterThan,

    /// `[`
    #[token("[")]
    BracketOpen,

    /// `]`
    #[token("]")]
    BracketClose,

    /// `=`
    #[token("=")]
    Equals,
}

impl Token {
    /// Whether this token can begin a compound selector.
    pub fn starts_compound(&self) -> bool {
        matches!(
            self,
            Token::Ident
                | Token::Hash
                | Token::Dot
                | Token::Star
                | Token::PseudoClass
                | Token::BracketOpen
        )
    }
}

/// Tokenize a selector string into a vector of `(Token, String)` pairs.
///
/// Input that fails to lex is skipped.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    let lexer = Token::lexer(input);
    lexer
        .spanned()
        .filter_map(|(result, span)| {
            result.ok().map(|token| (token, input[span].to_string()))
        })
        .collect()
}
