// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use logos::Logos;
use pqm_ast::token::{Token, TokenKind};
use pqm_ast::{TokenPosition, TokenRange};
use thiserror::Error;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Raw token type for logos - values and coordinates are attached in a
/// second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
enum RawToken {
    // === Keywords ===
    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("each")]
    Each,
    #[token("section")]
    Section,
    #[token("shared")]
    Shared,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("error")]
    Error,
    #[token("try")]
    Try,
    #[token("otherwise")]
    Otherwise,
    #[token("meta")]
    Meta,
    #[token("as")]
    As,
    #[token("is")]
    Is,
    #[token("type")]
    Type,
    #[token("optional")]
    Optional,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,
    #[regex(r#""([^"]|"")*""#)]
    Text,

    // === Identifiers ===
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r#"#"([^"]|"")*""#)]
    QuotedIdent,

    // === Operators ===
    #[token("=>")]
    FatArrow,
    #[token("<>")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("&")]
    Ampersand,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("@")]
    At,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
}

/// A lexical error.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Absolute code-unit offset of the offending input.
    pub offset: usize,
}

impl LexError {
    fn unexpected_char(ch: char, offset: usize) -> Self {
        Self { kind: LexErrorKind::UnexpectedChar { ch }, offset }
    }

    fn unterminated_text(offset: usize) -> Self {
        Self { kind: LexErrorKind::UnterminatedText, offset }
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char },

    #[error("unterminated text literal")]
    UnterminatedText,
}

/// The result of tokenizing: tokens plus any collected errors.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The lexer for M source code.
pub struct Lexer<'a> {
    source: &'a str,
    /// Code-unit offset of the start of each line. line_starts[0] is 0.
    line_starts: Vec<u32>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { source, line_starts, errors: Vec::new() }
    }

    pub fn tokenize(mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => convert_token(raw, slice),
                Err(()) => {
                    let rest = &self.source[span.start..];
                    if rest.starts_with('"') || rest.starts_with("#\"") {
                        // The string runs to end of input; no further
                        // tokens can follow it.
                        self.errors.push(LexError::unterminated_text(span.start));
                        break;
                    }
                    let ch = rest.chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, span.start));
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                range: TokenRange::new(
                    self.position_at(span.start),
                    self.position_at(span.end),
                ),
            });
        }

        let end = self.position_at(self.source.len());
        tokens.push(Token {
            kind: TokenKind::Eof,
            range: TokenRange::new(end, end),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Convert an absolute code-unit offset to a token boundary.
    fn position_at(&self, offset: usize) -> TokenPosition {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        TokenPosition::new(
            line_idx as u32,
            offset - self.line_starts[line_idx],
            offset,
        )
    }
}

/// Convert a raw logos token to our TokenKind, extracting carried text.
fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Let => TokenKind::Let,
        RawToken::In => TokenKind::In,
        RawToken::Each => TokenKind::Each,
        RawToken::Section => TokenKind::Section,
        RawToken::Shared => TokenKind::Shared,
        RawToken::If => TokenKind::If,
        RawToken::Then => TokenKind::Then,
        RawToken::Else => TokenKind::Else,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::Error => TokenKind::Error,
        RawToken::Try => TokenKind::Try,
        RawToken::Otherwise => TokenKind::Otherwise,
        RawToken::Meta => TokenKind::Meta,
        RawToken::As => TokenKind::As,
        RawToken::Is => TokenKind::Is,
        RawToken::Type => TokenKind::Type,
        RawToken::Optional => TokenKind::Optional,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::Number => TokenKind::Number(slice.to_string()),
        // Strip the surrounding quotes and collapse the "" escape.
        RawToken::Text => TokenKind::Text(unescape(&slice[1..slice.len() - 1])),
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
        RawToken::QuotedIdent => TokenKind::QuotedIdent(unescape(&slice[2..slice.len() - 1])),
        RawToken::FatArrow => TokenKind::FatArrow,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Ampersand => TokenKind::Ampersand,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::At => TokenKind::At,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semi => TokenKind::Semi,
    }
}

fn unescape(inner: &str) -> String {
    inner.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let result = Lexer::new(source).tokenize();
        assert!(result.is_ok(), "lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("let x = 1 in x"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eq,
                TokenKind::Number("1".to_string()),
                TokenKind::In,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn underscore_is_an_identifier() {
        assert_eq!(
            kinds("each _"),
            vec![TokenKind::Each, TokenKind::Ident("_".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn quoted_identifier_keeps_inner_text() {
        assert_eq!(
            kinds(r#"#"Total ""Sales"""#),
            vec![TokenKind::QuotedIdent("Total \"Sales\"".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn text_literal_unescapes() {
        assert_eq!(
            kinds(r#""a""b" & "c""#),
            vec![
                TokenKind::Text("a\"b".to_string()),
                TokenKind::Ampersand,
                TokenKind::Text("c".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("1 2.5 0xFF 1e3 .25"),
            vec![
                TokenKind::Number("1".to_string()),
                TokenKind::Number("2.5".to_string()),
                TokenKind::Number("0xFF".to_string()),
                TokenKind::Number("1e3".to_string()),
                TokenKind::Number(".25".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("1 // trailing\n/* block\ncomment */ 2"),
            vec![
                TokenKind::Number("1".to_string()),
                TokenKind::Number("2".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn coordinates_track_lines_and_columns() {
        let result = Lexer::new("let\n  x = 1\nin x").tokenize();
        assert!(result.is_ok());
        let tok = |i: usize| result.tokens[i].range.start;

        // "let" at (0, 0), offset 0
        assert_eq!(tok(0), TokenPosition::new(0, 0, 0));
        // "x" at (1, 2), offset 6
        assert_eq!(tok(1), TokenPosition::new(1, 2, 6));
        // "=" at (1, 4), offset 8
        assert_eq!(tok(2), TokenPosition::new(1, 4, 8));
        // "1" at (1, 6), offset 10
        assert_eq!(tok(3), TokenPosition::new(1, 6, 10));
        // "in" at (2, 0), offset 12
        assert_eq!(tok(4), TokenPosition::new(2, 0, 12));
        // end coordinates are exclusive
        assert_eq!(result.tokens[0].range.end, TokenPosition::new(0, 3, 3));
    }

    #[test]
    fn unexpected_character_is_collected() {
        let result = Lexer::new("1 $ 2").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0].kind, LexErrorKind::UnexpectedChar { ch: '$' }));
        // Lexing continued past the bad character.
        assert_eq!(result.tokens.len(), 3); // 1, 2, Eof
    }

    #[test]
    fn unterminated_text_stops_the_scan() {
        let result = Lexer::new("x = \"abc").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0].kind, LexErrorKind::UnterminatedText));
    }
}
