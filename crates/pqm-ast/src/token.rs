//! Token definitions for the lexer.

use crate::position::TokenRange;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TokenRange,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(String),
    Text(String),
    True,
    False,
    Null,

    // Identifiers. Quoted identifiers (`#"col name"`) keep their inner text.
    Ident(String),
    QuotedIdent(String),

    // Keywords
    Let,
    In,
    Each,
    Section,
    Shared,
    If,
    Then,
    Else,
    And,
    Or,
    Not,
    Error,
    Try,
    Otherwise,
    Meta,
    As,
    Is,
    Type,
    Optional,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Ampersand,
    Eq,
    NotEq,     // <>
    Lt,
    Gt,
    LtEq,
    GtEq,
    At,
    FatArrow,  // =>

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semi,

    Eof,
}

impl TokenKind {
    /// Human-readable name for error messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number '{}'", n),
            TokenKind::Text(_) => "text literal".to_string(),
            TokenKind::True => "'true'".to_string(),
            TokenKind::False => "'false'".to_string(),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::QuotedIdent(name) => format!("identifier #\"{}\"", name),
            TokenKind::Let => "'let'".to_string(),
            TokenKind::In => "'in'".to_string(),
            TokenKind::Each => "'each'".to_string(),
            TokenKind::Section => "'section'".to_string(),
            TokenKind::Shared => "'shared'".to_string(),
            TokenKind::If => "'if'".to_string(),
            TokenKind::Then => "'then'".to_string(),
            TokenKind::Else => "'else'".to_string(),
            TokenKind::And => "'and'".to_string(),
            TokenKind::Or => "'or'".to_string(),
            TokenKind::Not => "'not'".to_string(),
            TokenKind::Error => "'error'".to_string(),
            TokenKind::Try => "'try'".to_string(),
            TokenKind::Otherwise => "'otherwise'".to_string(),
            TokenKind::Meta => "'meta'".to_string(),
            TokenKind::As => "'as'".to_string(),
            TokenKind::Is => "'is'".to_string(),
            TokenKind::Type => "'type'".to_string(),
            TokenKind::Optional => "'optional'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Ampersand => "'&'".to_string(),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::NotEq => "'<>'".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::LtEq => "'<='".to_string(),
            TokenKind::GtEq => "'>='".to_string(),
            TokenKind::At => "'@'".to_string(),
            TokenKind::FatArrow => "'=>'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Semi => "';'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }

    /// The source text this token stands for: the carried spelling for
    /// names and literals, the fixed lexeme for keywords, operators, and
    /// delimiters. `None` only for `Eof`.
    pub fn literal_text(&self) -> Option<&str> {
        match self {
            TokenKind::Number(s) | TokenKind::Text(s) | TokenKind::Ident(s) | TokenKind::QuotedIdent(s) => {
                Some(s)
            }
            TokenKind::True => Some("true"),
            TokenKind::False => Some("false"),
            TokenKind::Null => Some("null"),
            TokenKind::Let => Some("let"),
            TokenKind::In => Some("in"),
            TokenKind::Each => Some("each"),
            TokenKind::Section => Some("section"),
            TokenKind::Shared => Some("shared"),
            TokenKind::If => Some("if"),
            TokenKind::Then => Some("then"),
            TokenKind::Else => Some("else"),
            TokenKind::And => Some("and"),
            TokenKind::Or => Some("or"),
            TokenKind::Not => Some("not"),
            TokenKind::Error => Some("error"),
            TokenKind::Try => Some("try"),
            TokenKind::Otherwise => Some("otherwise"),
            TokenKind::Meta => Some("meta"),
            TokenKind::As => Some("as"),
            TokenKind::Is => Some("is"),
            TokenKind::Type => Some("type"),
            TokenKind::Optional => Some("optional"),
            TokenKind::Plus => Some("+"),
            TokenKind::Minus => Some("-"),
            TokenKind::Star => Some("*"),
            TokenKind::Slash => Some("/"),
            TokenKind::Ampersand => Some("&"),
            TokenKind::Eq => Some("="),
            TokenKind::NotEq => Some("<>"),
            TokenKind::Lt => Some("<"),
            TokenKind::Gt => Some(">"),
            TokenKind::LtEq => Some("<="),
            TokenKind::GtEq => Some(">="),
            TokenKind::At => Some("@"),
            TokenKind::FatArrow => Some("=>"),
            TokenKind::LParen => Some("("),
            TokenKind::RParen => Some(")"),
            TokenKind::LBracket => Some("["),
            TokenKind::RBracket => Some("]"),
            TokenKind::LBrace => Some("{"),
            TokenKind::RBrace => Some("}"),
            TokenKind::Comma => Some(","),
            TokenKind::Semi => Some(";"),
            TokenKind::Eof => None,
        }
    }

    /// Whether this token can serve as a generalized identifier (record
    /// field names and section member names admit keywords).
    pub fn is_generalized_ident(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::QuotedIdent(_)
                | TokenKind::Let
                | TokenKind::In
                | TokenKind::Each
                | TokenKind::Section
                | TokenKind::Shared
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Error
                | TokenKind::Try
                | TokenKind::Otherwise
                | TokenKind::Meta
                | TokenKind::As
                | TokenKind::Is
                | TokenKind::Type
                | TokenKind::Optional
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }
}
