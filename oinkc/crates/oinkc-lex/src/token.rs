//! Token model.
//!
//! A token is a kind from a closed enumeration plus the literal lexeme and
//! the 1-indexed line/column where it starts.

use std::fmt;

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Types
    /// 🐽 - 16-bit integer type
    I16Type,
    /// 🐷 - 32-bit integer type
    I32Type,
    /// 🐗 - 64-bit integer type
    I64Type,
    /// "wow" - boolean type
    Bool,

    // Mutability markers
    /// 😀 - mutable declaration
    Mut,
    /// 😭 - immutable declaration
    Const,

    // Control flow
    /// "SAVE"
    If,
    /// "HURT"
    Elif,
    /// "KILL"
    Else,
    /// "OINK"
    While,
    /// "..." - opens and closes a return expression
    Return,

    // Arithmetic operators
    /// ❤️
    Plus,
    /// 💔
    Minus,
    /// 💞
    Multiply,
    /// 💕
    Divide,

    // Comparison operators
    /// 🌸🌸
    Equals,
    /// 💩🌸
    NotEquals,
    /// >
    Greater,
    /// <
    Less,
    /// 🌸>
    GreaterEqual,
    /// 🌸<
    LessEqual,

    // Logical operators
    /// 💩
    Not,
    /// "hru"
    And,
    /// "bruh"
    Or,

    // Literals
    /// "LOVE"
    True,
    /// "HATE"
    False,
    /// Digit run, optionally with a leading minus
    Number,
    /// Identifier: letters and the `&` sigil
    Variable,

    // Punctuation
    /// @
    Assignment,
    /// ** - both the opening and the closing grouping token
    Bracket,
    /// #
    SimpleLineBorder,
    /// #~
    MoodLineBorderStart,
    /// ~#
    MoodLineBorderEnd,
    /// 🐖🐖🐖
    BlockBorder,
    /// 🐖
    VariableBorder,

    // Structure
    Newline,
    TheEnd,

    // Recognized but discarded; never present in the token stream.
    /// 👀 - line comment opener
    Comment,
    /// 👀👀👀 - block comment delimiter
    MultilineComment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A lexical unit with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The literal text of the token as it appears in the source.
    pub lexeme: String,
    /// 1-indexed line where the token starts.
    pub line: u32,
    /// 1-indexed column where the token starts.
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

/// Maps a finished identifier lexeme to its keyword kind, if it is one.
pub fn keyword_from_ident(text: &str) -> Option<TokenKind> {
    match text {
        "SAVE" => Some(TokenKind::If),
        "HURT" => Some(TokenKind::Elif),
        "KILL" => Some(TokenKind::Else),
        "OINK" => Some(TokenKind::While),
        "LOVE" => Some(TokenKind::True),
        "HATE" => Some(TokenKind::False),
        "wow" => Some(TokenKind::Bool),
        "hru" => Some(TokenKind::And),
        "bruh" => Some(TokenKind::Or),
        _ => None,
    }
}
