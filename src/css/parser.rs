//! Recursive descent selector parser.
//!
//! Parses selector text into a [`SelectorList`]. Uses the logos-based
//! tokenizer from [`crate::css::tokenizer`]; byte spans decide whether two
//! tokens belong to the same compound selector.

use logos::Logos;

use crate::css::model::*;
use crate::css::tokenizer::Token;

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectorError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("unknown pseudo-class ':{0}'")]
    UnknownPseudoClass(String),
    #[error("empty selector")]
    Empty,
}

/// A positioned token with byte-level span information for whitespace detection.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    /// Index in the token stream (for error reporting).
    pos: usize,
    /// Byte offset where this token starts in the source.
    byte_start: usize,
    /// Byte offset where this token ends in the source.
    byte_end: usize,
}

/// Tokenize input using logos with span information preserved.
fn tokenize_with_spans(input: &str) -> Vec<PToken> {
    let lexer = Token::lexer(input);
    let mut tokens = Vec::new();
    let mut idx = 0;

    for (result, span) in lexer.spanned() {
        if let Ok(token) = result {
            tokens.push(PToken {
                text: input[span.clone()].to_string(),
                token,
                pos: idx,
                byte_start: span.start,
                byte_end: span.end,
            });
            idx += 1;
        }
    }

    tokens
}

/// Parse a comma-separated selector group such as
/// `.custom-select__option:visible, select > option:selected`.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorError> {
    let tokens = tokenize_with_spans(input);
    if tokens.is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut parser = Parser { tokens, cursor: 0 };
    let mut selectors = vec![parser.parse_selector()?];

    while parser.peek().is_some_and(|t| t.token == Token::Comma) {
        parser.advance();
        selectors.push(parser.parse_selector()?);
    }

    if let Some(tok) = parser.peek() {
        return Err(SelectorError::UnexpectedToken {
            position: tok.pos,
            message: format!("unexpected {:?} '{}'", tok.token, tok.text),
        });
    }

    Ok(SelectorList { selectors })
}

/// Recursive descent parser state.
struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn current_pos(&self) -> usize {
        self.peek().map(|t| t.pos).unwrap_or(self.tokens.len())
    }

    /// Returns `true` if the current token is immediately adjacent (no whitespace)
    /// to the previous token.
    fn is_adjacent(&self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = &self.tokens[self.cursor - 1];
        match self.peek() {
            Some(curr) => curr.byte_start == prev.byte_end,
            None => false,
        }
    }

    /// Parse a single selector: a sequence of compound selectors with combinators.
    fn parse_selector(&mut self) -> Result<Selector, SelectorError> {
        let mut parts = vec![SelectorPart::Compound(self.parse_compound_selector()?)];

        loop {
            match self.peek() {
                Some(t) if t.token == Token::GreaterThan => {
                    self.advance();
                    parts.push(SelectorPart::Combinator(Combinator::Child));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                // A selector-starting token that was not absorbed by the previous
                // compound is separated by whitespace: descendant combinator.
                Some(t) if t.token.starts_compound() => {
                    parts.push(SelectorPart::Combinator(Combinator::Descendant));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                _ => break,
            }
        }

        Ok(Selector { parts })
    }

    /// Parse a compound selector: simple selectors with no whitespace between
    /// them, e.g. `button.custom-select__option:visible`.
    fn parse_compound_selector(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::new();

        match self.peek() {
            Some(t) if t.token == Token::Ident => {
                let name = t.text.clone();
                self.advance();
                compound.push(SelectorComponent::Type(name));
            }
            Some(t) if t.token == Token::Star => {
                self.advance();
                compound.push(SelectorComponent::Universal);
            }
            Some(t) if t.token.starts_compound() => {
                compound.push(self.parse_simple()?);
            }
            Some(t) => {
                return Err(SelectorError::UnexpectedToken {
                    position: t.pos,
                    message: format!("expected selector, got {:?} '{}'", t.token, t.text),
                });
            }
            None => return Err(SelectorError::UnexpectedEof("expected selector".into())),
        }

        while self.is_adjacent() {
            match self.peek() {
                Some(t)
                    if matches!(
                        t.token,
                        Token::Dot | Token::Hash | Token::PseudoClass | Token::BracketOpen
                    ) =>
                {
                    compound.push(self.parse_simple()?);
                }
                _ => break,
            }
        }

        Ok(compound)
    }

    /// Parse one class, id, attribute or pseudo-class component.
    fn parse_simple(&mut self) -> Result<SelectorComponent, SelectorError> {
        let tok = self
            .advance()
            .ok_or_else(|| SelectorError::UnexpectedEof("expected selector part".into()))?;
        match tok.token {
            Token::Dot => Ok(SelectorComponent::Class(self.expect_name("class name after '.'")?)),
            Token::Hash => Ok(SelectorComponent::Id(self.expect_name("id after '#'")?)),
            Token::PseudoClass => {
                let name = &tok.text[1..];
                PseudoClass::from_name(name)
                    .map(SelectorComponent::PseudoClass)
                    .ok_or_else(|| SelectorError::UnknownPseudoClass(name.to_string()))
            }
            Token::BracketOpen => self.parse_attribute(),
            other => Err(SelectorError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected selector part, got {:?} '{}'", other, tok.text),
            }),
        }
    }

    /// Parse the rest of `[name]` or `[name=value]` after the opening bracket.
    fn parse_attribute(&mut self) -> Result<SelectorComponent, SelectorError> {
        let name = self.expect_name("attribute name after '['")?;
        let value = match self.peek().map(|t| &t.token) {
            Some(Token::Equals) => {
                self.advance();
                let tok = self
                    .advance()
                    .ok_or_else(|| SelectorError::UnexpectedEof("expected attribute value".into()))?;
                let value = match tok.token {
                    Token::Ident => tok.text,
                    Token::StringLiteral | Token::StringLiteralSingle => {
                        tok.text[1..tok.text.len() - 1].to_string()
                    }
                    other => {
                        return Err(SelectorError::UnexpectedToken {
                            position: tok.pos,
                            message: format!("expected attribute value, got {:?}", other),
                        })
                    }
                };
                Some(value)
            }
            _ => None,
        };

        match self.advance() {
            Some(tok) if tok.token == Token::BracketClose => {
                Ok(SelectorComponent::Attribute { name, value })
            }
            Some(tok) => Err(SelectorError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected ']', got {:?} '{}'", tok.token, tok.text),
            }),
            None => Err(SelectorError::UnexpectedEof("expected ']'".into())),
        }
    }

    fn expect_name(&mut self, what: &str) -> Result<String, SelectorError> {
        let position = self.current_pos();
        match self.advance() {
            Some(tok) if tok.token == Token::Ident => Ok(tok.text),
            Some(tok) => Err(SelectorError::UnexpectedToken {
                position,
                message: format!("expected {what}, got {:?} '{}'", tok.token, tok.text),
            }),
            None => Err(SelectorError::UnexpectedEof(format!("expected {what}"))),
        }
    }
}
