//! Lexer for the Power Query / M formula language.
//!
//! Tokenizes source text into a stream of tokens carrying
//! `(line, column, code_unit)` coordinates for the parser.

mod lexer;

pub use lexer::{LexError, LexErrorKind, LexResult, Lexer};
