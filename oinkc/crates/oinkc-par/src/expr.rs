//! Expression parsing.
//!
//! Precedence, loosest to tightest: `bruh` (or), `hru` (and), comparison
//! (non-associative, at most one per expression), additive,
//! multiplicative, unary `💩`, primary. Mood inversion happens as
//! operators and boolean literals are read, so the returned tree already
//! carries the effective semantics.

use oinkc_lex::TokenKind;
use oinkc_util::{CompileError, Result};

use crate::ast::{Expr, ExprKind};
use crate::types::{Operator, UnaryOp, FALSE_LITERAL, TRUE_LITERAL};
use crate::Parser;

/// Maps an operator token to its [`Operator`], if it is one.
fn operator_for(kind: TokenKind) -> Option<Operator> {
    match kind {
        TokenKind::Plus => Some(Operator::Plus),
        TokenKind::Minus => Some(Operator::Minus),
        TokenKind::Multiply => Some(Operator::Multiply),
        TokenKind::Divide => Some(Operator::Divide),
        TokenKind::Equals => Some(Operator::Equals),
        TokenKind::NotEquals => Some(Operator::NotEquals),
        TokenKind::Greater => Some(Operator::Greater),
        TokenKind::Less => Some(Operator::Less),
        TokenKind::GreaterEqual => Some(Operator::GreaterEqual),
        TokenKind::LessEqual => Some(Operator::LessEqual),
        TokenKind::And => Some(Operator::And),
        TokenKind::Or => Some(Operator::Or),
        _ => None,
    }
}

impl Parser {
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_logical_and()?;

        while self.peek_kind(0) == Some(TokenKind::Or) {
            self.advance();
            let right = self.parse_logical_and()?;
            left = self.mk_binary(left, Operator::Or, right);
        }

        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_comparison()?;

        while self.peek_kind(0) == Some(TokenKind::And) {
            self.advance();
            let right = self.parse_comparison()?;
            left = self.mk_binary(left, Operator::And, right);
        }

        Ok(left)
    }

    /// Comparison is non-associative: at most one per expression level.
    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;

        if let Some(op) = self.peek_operator(Operator::is_comparison) {
            self.advance();
            let op = self.apply_mood(op);
            let right = self.parse_additive()?;
            left = self.mk_binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;

        while let Some(op) =
            self.peek_operator(|op| matches!(op, Operator::Plus | Operator::Minus))
        {
            self.advance();
            let op = self.apply_mood(op);
            let right = self.parse_multiplicative()?;
            left = self.mk_binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        while let Some(op) =
            self.peek_operator(|op| matches!(op, Operator::Multiply | Operator::Divide))
        {
            self.advance();
            let op = self.apply_mood(op);
            let right = self.parse_unary()?;
            left = self.mk_binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.peek_kind(0) == Some(TokenKind::Not) {
            let not_token = self.advance().expect("peeked token exists");
            let operand = self.parse_unary()?;
            return Ok(self.mk_expr(
                not_token.line,
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
            ));
        }

        self.parse_value()
    }

    fn parse_value(&mut self) -> Result<Expr> {
        let token = match self.advance() {
            Some(t) => t,
            None => return Err(self.eof_error("a number, a variable, or a boolean")),
        };

        match token.kind {
            TokenKind::Number => Ok(self.mk_expr(
                token.line,
                ExprKind::Number {
                    text: token.lexeme,
                },
            )),
            TokenKind::VariableBorder => {
                let name_token = self.expect(TokenKind::Variable)?;
                self.expect(TokenKind::VariableBorder)?;
                Ok(self.mk_expr(
                    name_token.line,
                    ExprKind::Ident {
                        name: name_token.lexeme,
                    },
                ))
            },
            TokenKind::True | TokenKind::False => {
                let mut text = token.lexeme;
                if self.in_mood_line() {
                    text = if text == TRUE_LITERAL {
                        FALSE_LITERAL.to_string()
                    } else {
                        TRUE_LITERAL.to_string()
                    };
                }
                Ok(self.mk_expr(token.line, ExprKind::Boolean { text }))
            },
            TokenKind::Bracket => {
                let expr = self.parse_expression()?;
                self.expect_bracket_close()?;
                Ok(expr)
            },
            _ => Err(CompileError::unexpected_token(
                "a number, a variable, or a boolean",
                &format!("{} ('{}')", token.kind, token.lexeme),
                token.line,
                token.column,
            )),
        }
    }

    fn expect_bracket_close(&mut self) -> Result<()> {
        match self.peek(0) {
            Some(t) if t.kind == TokenKind::Bracket => {
                self.advance();
                Ok(())
            },
            Some(t) => Err(CompileError::structural(
                format!(
                    "bracket opened with '**' is never closed; line {} continues with '{}'",
                    t.line, t.lexeme
                ),
                t.line,
            )),
            None => Err(self.eof_error("'**'")),
        }
    }

    /// Peeks the next token as an operator in the given class.
    fn peek_operator(&self, class: impl Fn(Operator) -> bool) -> Option<Operator> {
        let op = operator_for(self.peek_kind(0)?)?;
        if class(op) {
            Some(op)
        } else {
            None
        }
    }

    /// Applies mood inversion to an operator read on a mood line.
    fn apply_mood(&self, op: Operator) -> Operator {
        if self.in_mood_line() {
            op.inverted()
        } else {
            op
        }
    }

    fn mk_binary(&mut self, left: Expr, op: Operator, right: Expr) -> Expr {
        let line = left.line;
        self.mk_expr(
            line,
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ExprKind, Stmt};
    use crate::types::Operator;
    use crate::Parser;
    use oinkc_lex::Lexer;

    fn parse(source: &str) -> crate::ast::Program {
        let tokens = Lexer::new(source).tokenize().expect("source should lex");
        Parser::new(tokens).parse_program().expect("source should parse")
    }

    /// Parses `# 😀 🐷 🐖x🐖 @ <expr> #` and returns the initializer.
    fn parse_init(expr: &str) -> crate::ast::Expr {
        let source = format!("# 😀 🐷 🐖x🐖 @ {} #\n# ... 🐖x🐖 ... #", expr);
        let program = parse(&source);
        match &program.statements[0] {
            Stmt::Decl(decl) => decl.init.clone(),
            _ => panic!("expected a declaration"),
        }
    }

    fn binary_op(expr: &crate::ast::Expr) -> Operator {
        match &expr.kind {
            ExprKind::Binary { op, .. } => *op,
            other => panic!("expected a binary node, got {:?}", other),
        }
    }

    #[test]
    fn test_addition_is_left_associative() {
        let expr = parse_init("1 ❤️ 2 ❤️ 3");
        let ExprKind::Binary { left, op, right } = &expr.kind else { panic!() };
        assert_eq!(*op, Operator::Plus);
        assert!(matches!(&right.kind, ExprKind::Number { text } if text == "3"));
        assert_eq!(binary_op(left), Operator::Plus);
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = parse_init("1 ❤️ 2 💞 3");
        let ExprKind::Binary { left, op, right } = &expr.kind else { panic!() };
        assert_eq!(*op, Operator::Plus);
        assert!(matches!(&left.kind, ExprKind::Number { text } if text == "1"));
        assert_eq!(binary_op(right), Operator::Multiply);
    }

    #[test]
    fn test_brackets_override_precedence() {
        let expr = parse_init("** 1 ❤️ 2 ** 💞 3");
        let ExprKind::Binary { left, op, .. } = &expr.kind else { panic!() };
        assert_eq!(*op, Operator::Multiply);
        assert_eq!(binary_op(left), Operator::Plus);
    }

    #[test]
    fn test_comparison_above_additive() {
        let expr = parse_init("1 ❤️ 2 > 3");
        let ExprKind::Binary { left, op, right } = &expr.kind else { panic!() };
        assert_eq!(*op, Operator::Greater);
        assert_eq!(binary_op(left), Operator::Plus);
        assert!(matches!(&right.kind, ExprKind::Number { text } if text == "3"));
    }

    #[test]
    fn test_logical_precedence() {
        // hru binds tighter than bruh
        let expr = parse_init("LOVE bruh HATE hru LOVE");
        let ExprKind::Binary { op, right, .. } = &expr.kind else { panic!() };
        assert_eq!(*op, Operator::Or);
        assert_eq!(binary_op(right), Operator::And);
    }

    #[test]
    fn test_unary_not_chains() {
        let expr = parse_init("💩 💩 LOVE");
        let ExprKind::Unary { operand, .. } = &expr.kind else { panic!() };
        assert!(matches!(&operand.kind, ExprKind::Unary { .. }));
    }

    #[test]
    fn test_mood_line_inverts_arithmetic() {
        let expr = {
            let source = "#~ 😀 🐷 🐖x🐖 @ 10 ❤️ 5 ~#\n# ... 🐖x🐖 ... #";
            let program = parse(source);
            match &program.statements[0] {
                Stmt::Decl(decl) => decl.init.clone(),
                _ => panic!(),
            }
        };
        assert_eq!(binary_op(&expr), Operator::Minus);
    }

    #[test]
    fn test_mood_line_swaps_booleans() {
        let source = "#~ 😀 wow 🐖f🐖 @ LOVE ~#\n# ... 1 ... #";
        let program = parse(source);
        let Stmt::Decl(decl) = &program.statements[0] else { panic!() };
        assert!(matches!(&decl.init.kind, ExprKind::Boolean { text } if text == "HATE"));
    }

    #[test]
    fn test_mood_inversion_is_an_involution_on_the_ast() {
        let moody = parse("#~ 😀 🐷 🐖x🐖 @ 10 ❤️ 5 💞 2 ~#\n# ... 🐖x🐖 ... #");
        let plain = parse("# 😀 🐷 🐖x🐖 @ 10 💔 5 💕 2 #\n# ... 🐖x🐖 ... #");
        assert_eq!(moody, plain);
    }

    #[test]
    fn test_mood_condition_is_negated() {
        let source = "\
#~ SAVE 🐖x🐖 > 5 ~#
# 🐖🐖🐖 #
# 🐖x🐖 @ 1 #
# 🐖🐖🐖 #
# ... 🐖x🐖 ... #";
        // declare x first so the program also analyzes cleanly elsewhere
        let full = format!("# 😀 🐷 🐖x🐖 @ 7 #\n{}", source);
        let program = parse(&full);
        let Stmt::If(if_stmt) = &program.statements[1] else { panic!() };
        let ExprKind::Unary { operand, .. } = &if_stmt.condition.kind else {
            panic!("mood condition must be wrapped in a logical not");
        };
        // the comparison itself is inverted as well: > becomes <=
        assert_eq!(binary_op(operand), Operator::LessEqual);
    }

    #[test]
    fn test_comparison_is_non_associative() {
        // a > b > c does not parse as a chain; the second '>' stops the
        // expression and the parser then rejects it as a line close.
        let source = "# 😀 wow 🐖x🐖 @ 1 > 2 > 3 #\n# ... 1 ... #";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let err = Parser::new(tokens).parse_program().unwrap_err();
        assert_eq!(err.kind, oinkc_util::ErrorKind::UnexpectedToken);
    }
}
