//! oinkc-lex - Lexical analyzer
//!
//! Transforms Oink source text into a token stream. The lexer is a state
//! machine over UTF-8 input: from the initial state it resolves newlines,
//! whitespace, multi-character ASCII punctuation (longest first), emoji
//! tokens (longest first), single-character punctuation, and the starts of
//! identifiers and numbers; dedicated states absorb identifiers, numbers,
//! line comments and block comments.
//!
//! Tokenization is deterministic and fails fast: the first character no
//! rule accepts aborts lexing with a position-carrying error.

pub mod cursor;
mod lexer;
pub mod token;

mod edge_cases;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
