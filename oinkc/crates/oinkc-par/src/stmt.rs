//! Statement and block parsing.

use oinkc_lex::TokenKind;
use oinkc_util::{CompileError, Result};

use crate::ast::{
    Assignment, CodeBlock, Declaration, ElifBlock, Expr, ExprKind, IfStmt, Return, Stmt, WhileStmt,
};
use crate::types::{DataType, UnaryOp, FALSE_LITERAL};
use crate::Parser;

impl Parser {
    /// Parses one statement line.
    ///
    /// Returns `None` for a stray block border, which is consumed without
    /// producing a statement. `SAVE`/`OINK` consume their own line
    /// endings (through their block parsing); everything else is followed
    /// by the shared line-close handling here.
    pub(crate) fn parse_statement(&mut self) -> Result<Option<Stmt>> {
        let token = match self.peek(0) {
            Some(t) => t.clone(),
            None => return Err(self.eof_error("a statement")),
        };

        let (statement, consumes_own_line_end) = match token.kind {
            TokenKind::Mut | TokenKind::Const => {
                (Some(Stmt::Decl(self.parse_declaration()?)), false)
            },
            TokenKind::VariableBorder => (Some(Stmt::Assign(self.parse_assignment()?)), false),
            TokenKind::If => (Some(Stmt::If(self.parse_if_statement()?)), true),
            TokenKind::While => (Some(Stmt::While(self.parse_while_statement()?)), true),
            TokenKind::BlockBorder => {
                self.advance();
                (None, false)
            },
            TokenKind::Elif => {
                return Err(CompileError::structural(
                    format!(
                        "'HURT' (elif) without a preceding 'SAVE' (if) at line {}",
                        token.line
                    ),
                    token.line,
                ));
            },
            TokenKind::Else => {
                return Err(CompileError::structural(
                    format!(
                        "'KILL' (else) without a preceding 'SAVE' (if) at line {}",
                        token.line
                    ),
                    token.line,
                ));
            },
            _ => {
                return Err(CompileError::unexpected_token(
                    "a declaration, an assignment, or a control-flow statement",
                    &format!("{} ('{}')", token.kind, token.lexeme),
                    token.line,
                    token.column,
                ));
            },
        };

        if !consumes_own_line_end {
            self.expect_line_end()?;
        }
        Ok(statement)
    }

    fn parse_declaration(&mut self) -> Result<Declaration> {
        let mutability = self.advance().expect("declaration starts with a marker");
        let mutable = mutability.kind == TokenKind::Mut;

        let ty = self.parse_type()?;

        self.expect(TokenKind::VariableBorder)?;
        let name_token = self.expect(TokenKind::Variable)?;
        self.expect(TokenKind::VariableBorder)?;

        let init = if self.peek_kind(0) == Some(TokenKind::Assignment) {
            self.advance();
            self.parse_expression()?
        } else {
            self.default_for_type(ty, name_token.line)
        };

        Ok(Declaration {
            name: name_token.lexeme,
            init,
            mutable,
            ty,
            line: name_token.line,
        })
    }

    fn parse_type(&mut self) -> Result<DataType> {
        let token = match self.advance() {
            Some(t) => t,
            None => return Err(self.eof_error("a type (🐽, 🐷, 🐗 or wow)")),
        };
        match token.kind {
            TokenKind::I16Type => Ok(DataType::I16),
            TokenKind::I32Type => Ok(DataType::I32),
            TokenKind::I64Type => Ok(DataType::I64),
            TokenKind::Bool => Ok(DataType::Bool),
            _ => Err(CompileError::unexpected_token(
                "a type (🐽, 🐷, 🐗 or wow)",
                &format!("{} ('{}')", token.kind, token.lexeme),
                token.line,
                token.column,
            )),
        }
    }

    fn parse_assignment(&mut self) -> Result<Assignment> {
        self.expect(TokenKind::VariableBorder)?;
        let name_token = self.expect(TokenKind::Variable)?;
        self.expect(TokenKind::VariableBorder)?;
        self.expect(TokenKind::Assignment)?;
        let value = self.parse_expression()?;

        Ok(Assignment {
            name: name_token.lexeme,
            value,
            line: name_token.line,
        })
    }

    fn parse_if_statement(&mut self) -> Result<IfStmt> {
        let if_token = self.expect(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let then_block = self.parse_code_block()?;

        let mut elif_blocks = Vec::new();
        while self.peek_is_elif() {
            elif_blocks.push(self.parse_elif_block()?);
        }

        let else_block = self.try_parse_else_block()?;

        Ok(IfStmt {
            condition,
            then_block,
            elif_blocks,
            else_block,
            line: if_token.line,
        })
    }

    fn parse_elif_block(&mut self) -> Result<ElifBlock> {
        self.open_line();
        let elif_token = self.expect(TokenKind::Elif)?;
        let condition = self.parse_condition()?;
        let block = self.parse_code_block()?;

        Ok(ElifBlock {
            condition,
            block,
            line: elif_token.line,
        })
    }

    fn parse_while_statement(&mut self) -> Result<WhileStmt> {
        let while_token = self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_code_block()?;

        Ok(WhileStmt {
            condition,
            body,
            line: while_token.line,
        })
    }

    /// Parses a branch/loop condition, negating it on a mood line.
    fn parse_condition(&mut self) -> Result<Expr> {
        let condition = self.parse_expression()?;
        if self.in_mood_line() {
            let line = condition.line;
            Ok(self.mk_expr(
                line,
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(condition),
                },
            ))
        } else {
            Ok(condition)
        }
    }

    /// True when the next line opens with a border followed by `HURT`.
    fn peek_is_elif(&self) -> bool {
        matches!(
            self.peek_kind(0),
            Some(TokenKind::SimpleLineBorder | TokenKind::MoodLineBorderStart)
        ) && self.peek_kind(1) == Some(TokenKind::Elif)
    }

    /// Consumes and parses a `KILL` block when the next line carries one.
    fn try_parse_else_block(&mut self) -> Result<Option<CodeBlock>> {
        let is_else = matches!(
            self.peek_kind(0),
            Some(TokenKind::SimpleLineBorder | TokenKind::MoodLineBorderStart)
        ) && self.peek_kind(1) == Some(TokenKind::Else);

        if !is_else {
            return Ok(None);
        }

        self.open_line();
        self.expect(TokenKind::Else)?;
        let block = self.parse_code_block()?;
        Ok(Some(block))
    }

    /// Parses a `🐖🐖🐖`-delimited block.
    ///
    /// On entry the current line (the condition line) is still open; its
    /// close is consumed first, then the opening border line, the
    /// contents, and the closing border line.
    fn parse_code_block(&mut self) -> Result<CodeBlock> {
        self.expect_line_end()?;
        self.open_line();
        self.expect_block_border()?;
        self.expect_line_end()?;

        let (statements, return_stmt) = self.parse_block_contents()?;

        self.open_line();
        self.expect_block_border()?;
        self.expect_line_end()?;

        let scope_id = self.mint_scope_id();
        Ok(CodeBlock {
            statements,
            return_stmt,
            scope_id,
        })
    }

    fn expect_block_border(&mut self) -> Result<()> {
        match self.peek(0) {
            Some(t) if t.kind == TokenKind::BlockBorder => {
                self.advance();
                Ok(())
            },
            Some(t) => Err(CompileError::structural(
                format!(
                    "every code block opens and closes with a '🐖🐖🐖' line, but line {} has '{}'",
                    t.line, t.lexeme
                ),
                t.line,
            )),
            None => Err(self.eof_error("'🐖🐖🐖'")),
        }
    }

    fn parse_block_contents(&mut self) -> Result<(Vec<Stmt>, Option<Return>)> {
        let mut statements = Vec::new();
        let mut return_stmt = None;

        loop {
            let token = match self.peek(0) {
                Some(t) => t,
                None => {
                    return Err(CompileError::structural(
                        "code block must be closed with 🐖🐖🐖",
                        self.tokens.last().map(|t| t.line).unwrap_or(1),
                    ));
                },
            };
            if token.kind == TokenKind::TheEnd {
                return Err(CompileError::structural(
                    "code block must be closed with 🐖🐖🐖",
                    token.line,
                ));
            }

            // Two-token peek: a border line whose next token is 🐖🐖🐖 is
            // the closing delimiter of this block, not another statement.
            if matches!(
                token.kind,
                TokenKind::SimpleLineBorder | TokenKind::MoodLineBorderStart
            ) && self.peek_kind(1) == Some(TokenKind::BlockBorder)
            {
                break;
            }

            self.open_line();

            if self.peek_kind(0) == Some(TokenKind::Return) {
                return_stmt = Some(self.parse_return()?);
                self.expect_line_end()?;
                break;
            }

            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok((statements, return_stmt))
    }

    pub(crate) fn parse_return(&mut self) -> Result<Return> {
        self.expect(TokenKind::Return)?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Return)?;
        Ok(Return { expr })
    }

    fn default_for_type(&mut self, ty: DataType, line: u32) -> Expr {
        match ty {
            DataType::Bool => self.mk_expr(
                line,
                ExprKind::Boolean {
                    text: FALSE_LITERAL.to_string(),
                },
            ),
            DataType::I16 | DataType::I32 | DataType::I64 => self.mk_expr(
                line,
                ExprKind::Number {
                    text: "0".to_string(),
                },
            ),
        }
    }
}
