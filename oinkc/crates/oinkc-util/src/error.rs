//! Core error types shared by all compiler stages.
//!
//! One taxonomy covers the whole pipeline: every stage raises a
//! [`CompileError`] carrying the kind of failure, a pre-formatted message
//! and the 1-indexed source position the message refers to.

use thiserror::Error;

/// Classification of a compilation failure.
///
/// The lexer raises the character-level kinds, the parser the token- and
/// structure-level kinds, and the semantic analyzer the name- and
/// type-level kinds. The code generator raises nothing: it only runs on
/// programs the analyzer accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character no lexer rule accepts (stray symbol, unknown emoji).
    UnexpectedCharacter,
    /// A lexeme that entered the number state but is not a digit run.
    MalformedNumber,
    /// A token of the wrong kind where the grammar demands a specific one.
    UnexpectedToken,
    /// A structurally broken program: empty, missing return, content after
    /// the return line, mismatched mood borders, `elif`/`else` without
    /// `if`, unpaired bracket, unclosed code block.
    StructuralError,
    /// A variable referenced before any live scope declares it.
    UndeclaredVariable,
    /// A declaration of a name that is already live.
    Redeclaration,
    /// An assignment to a variable declared with the immutable marker.
    ImmutableAssignment,
    /// A variable used in its own initializer, or `x @ x`.
    SelfAssignment,
    /// Any type-rule violation.
    TypeMismatch,
}

/// A single fatal diagnostic with source position.
///
/// The message is fully formatted at the raise site; `line` and `column`
/// are kept as structured fields so callers (and tests) do not have to
/// parse them back out of the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-indexed source line the diagnostic refers to.
    pub line: u32,
    /// 1-indexed column, when the failure points at a single position.
    pub column: Option<u32>,
}

impl CompileError {
    pub fn unexpected_character(c: char, line: u32, column: u32) -> Self {
        Self {
            kind: ErrorKind::UnexpectedCharacter,
            message: format!(
                "unexpected character '{}' at line {}, column {}",
                c, line, column
            ),
            line,
            column: Some(column),
        }
    }

    pub fn malformed_number(lexeme: &str, line: u32, column: u32) -> Self {
        Self {
            kind: ErrorKind::MalformedNumber,
            message: format!(
                "'{}' is not a correct number (line {}, column {})",
                lexeme, line, column
            ),
            line,
            column: Some(column),
        }
    }

    pub fn unexpected_token(expected: &str, found: &str, line: u32, column: u32) -> Self {
        Self {
            kind: ErrorKind::UnexpectedToken,
            message: format!(
                "expected {} but found {} at line {}, column {}",
                expected, found, line, column
            ),
            line,
            column: Some(column),
        }
    }

    pub fn structural(message: impl Into<String>, line: u32) -> Self {
        Self {
            kind: ErrorKind::StructuralError,
            message: message.into(),
            line,
            column: None,
        }
    }

    pub fn undeclared_variable(name: &str, line: u32) -> Self {
        Self {
            kind: ErrorKind::UndeclaredVariable,
            message: format!("variable '{}' is not declared (line {})", name, line),
            line,
            column: None,
        }
    }

    pub fn redeclaration(name: &str, line: u32) -> Self {
        Self {
            kind: ErrorKind::Redeclaration,
            message: format!("variable '{}' is already declared (line {})", name, line),
            line,
            column: None,
        }
    }

    pub fn immutable_assignment(name: &str, line: u32) -> Self {
        Self {
            kind: ErrorKind::ImmutableAssignment,
            message: format!(
                "cannot assign to immutable variable '{}' (line {})",
                name, line
            ),
            line,
            column: None,
        }
    }

    pub fn self_assignment(name: &str, line: u32) -> Self {
        Self {
            kind: ErrorKind::SelfAssignment,
            message: format!(
                "'{}' cannot be assigned from itself (line {})",
                name, line
            ),
            line,
            column: None,
        }
    }

    pub fn type_mismatch(message: impl Into<String>, line: u32) -> Self {
        Self {
            kind: ErrorKind::TypeMismatch,
            message: message.into(),
            line,
            column: None,
        }
    }
}

/// Result alias used across the compiler crates.
pub type Result<T> = std::result::Result<T, CompileError>;
