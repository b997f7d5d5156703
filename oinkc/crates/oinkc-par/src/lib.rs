//! oinkc-par - Parser (syntactic analyzer)
//!
//! Hand-written recursive descent over the token stream with a single
//! token of lookahead, plus an explicit two-token peek at the three places
//! where a line border must be disambiguated (block close, `HURT` line,
//! `KILL` line).
//!
//! The parser carries one piece of contextual state: `in_mood_line`, set
//! when a line opens with `#~` and cleared when the matching `~#` closes
//! it. Mood inversion is applied here, so the AST already encodes the
//! inverted semantics: arithmetic and comparison operators are replaced
//! by their inverses, boolean literals are swapped, and the condition of
//! a `SAVE`/`OINK` parsed on a mood line is wrapped in a logical not.

pub mod ast;
pub mod types;

mod expr;
mod stmt;

mod edge_cases;

use oinkc_lex::{Token, TokenKind};
use oinkc_util::{CompileError, Result};

use ast::{Expr, ExprKind, NodeId, Program, Return, Stmt};

/// Recursive-descent parser for the Oink token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,

    /// Next scope id to mint; blocks are numbered from 1 in closing order.
    next_scope_id: u32,

    /// Next expression node id to mint.
    next_node_id: u32,

    /// True between a `#~` line opening and its `~#` close.
    in_mood_line: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            next_scope_id: 1,
            next_node_id: 0,
            in_mood_line: false,
        }
    }

    /// Parses a complete program.
    ///
    /// A program is a sequence of statement lines followed by exactly one
    /// return line; anything after the return line is an error.
    pub fn parse_program(mut self) -> Result<Program> {
        let statements = self.parse_statements()?;
        let return_stmt = self.parse_program_return()?;
        self.check_program_end()?;

        Ok(Program {
            statements,
            return_stmt,
        })
    }

    fn parse_statements(&mut self) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();

        loop {
            match self.peek(0) {
                Some(t) if t.kind == TokenKind::TheEnd => {
                    return Err(if statements.is_empty() {
                        CompileError::structural(
                            "program cannot be empty: there is nothing to compile",
                            t.line,
                        )
                    } else {
                        CompileError::structural(
                            "program must end with a return line: # ... expr ... #",
                            t.line,
                        )
                    });
                },
                None => {
                    return Err(CompileError::structural(
                        "program must end with a return line: # ... expr ... #",
                        self.last_line(),
                    ));
                },
                _ => {},
            }

            self.open_line();

            if self.peek_kind(0) == Some(TokenKind::Return) {
                break;
            }

            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok(statements)
    }

    fn parse_program_return(&mut self) -> Result<Return> {
        let return_stmt = self.parse_return()?;
        self.expect_line_end()?;
        Ok(return_stmt)
    }

    fn check_program_end(&mut self) -> Result<()> {
        match self.peek(0) {
            Some(t) if t.kind != TokenKind::TheEnd => Err(CompileError::structural(
                format!(
                    "nothing may follow the return line, but line {} continues with '{}'",
                    t.line, t.lexeme
                ),
                t.line,
            )),
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    pub(crate) fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.peek(offset).map(|t| t.kind)
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it has the expected kind, errors
    /// otherwise.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        match self.peek(0) {
            Some(t) if t.kind == kind => Ok(self.advance().expect("peeked token exists")),
            Some(t) => Err(CompileError::unexpected_token(
                &kind.to_string(),
                &format!("{} ('{}')", t.kind, t.lexeme),
                t.line,
                t.column,
            )),
            None => Err(self.eof_error(&kind.to_string())),
        }
    }

    pub(crate) fn eof_error(&self, expected: &str) -> CompileError {
        CompileError::unexpected_token(expected, "end of input", self.last_line(), 1)
    }

    fn last_line(&self) -> u32 {
        self.tokens.last().map(|t| t.line).unwrap_or(1)
    }

    // ------------------------------------------------------------------
    // Line borders and mood state
    // ------------------------------------------------------------------

    /// Consumes a line-opening border if one is present, entering mood
    /// state for `#~`.
    pub(crate) fn open_line(&mut self) {
        match self.peek_kind(0) {
            Some(TokenKind::MoodLineBorderStart) => {
                self.in_mood_line = true;
                self.pos += 1;
            },
            Some(TokenKind::SimpleLineBorder) => {
                self.pos += 1;
            },
            _ => {},
        }
    }

    /// Consumes the line-closing border matching how the line was opened,
    /// then the newline (or end of input).
    pub(crate) fn expect_line_end(&mut self) -> Result<()> {
        if self.in_mood_line {
            match self.peek(0) {
                Some(t) if t.kind == TokenKind::MoodLineBorderEnd => {
                    self.pos += 1;
                    self.in_mood_line = false;
                },
                Some(t) => {
                    return Err(CompileError::structural(
                        format!(
                            "mood line opened with '#~' must close with '~#', not '{}' (line {})",
                            t.lexeme, t.line
                        ),
                        t.line,
                    ));
                },
                None => return Err(self.eof_error("'~#'")),
            }
        } else {
            match self.peek(0) {
                Some(t) if t.kind == TokenKind::SimpleLineBorder => {
                    self.pos += 1;
                },
                Some(t) if t.kind == TokenKind::MoodLineBorderEnd => {
                    return Err(CompileError::structural(
                        format!(
                            "'~#' closes a mood line, but line {} was not opened with '#~'",
                            t.line
                        ),
                        t.line,
                    ));
                },
                Some(t) => {
                    return Err(CompileError::unexpected_token(
                        "SimpleLineBorder",
                        &format!("{} ('{}')", t.kind, t.lexeme),
                        t.line,
                        t.column,
                    ));
                },
                None => return Err(self.eof_error("'#'")),
            }
        }

        self.expect_newline_or_end()
    }

    fn expect_newline_or_end(&mut self) -> Result<()> {
        match self.peek(0) {
            Some(t) if t.kind == TokenKind::Newline => {
                self.pos += 1;
                Ok(())
            },
            Some(t) if t.kind == TokenKind::TheEnd => Ok(()),
            Some(t) => Err(CompileError::unexpected_token(
                "a newline",
                &format!("{} ('{}')", t.kind, t.lexeme),
                t.line,
                t.column,
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn in_mood_line(&self) -> bool {
        self.in_mood_line
    }

    // ------------------------------------------------------------------
    // Node construction
    // ------------------------------------------------------------------

    pub(crate) fn mint_scope_id(&mut self) -> u32 {
        let id = self.next_scope_id;
        self.next_scope_id += 1;
        id
    }

    pub(crate) fn mk_expr(&mut self, line: u32, kind: ExprKind) -> Expr {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        Expr { id, line, kind }
    }
}
