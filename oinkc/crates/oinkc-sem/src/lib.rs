//! oinkc-sem - Semantic analyzer
//!
//! A single post-parse walk over the AST that checks declarations and
//! scoping, mutability, and the type rules. On success it returns a
//! [`TypeMap`]: the inferred type of every expression node, keyed by the
//! parser-minted node id. The code generator reads the map instead of
//! re-running any checks; in particular every arithmetic binary node has
//! its result type recorded before emission starts.

pub mod scope;

mod edge_cases;

use oinkc_par::ast::{
    Assignment, CodeBlock, Declaration, Expr, ExprKind, IfStmt, NodeId, Program, Stmt, WhileStmt,
};
use oinkc_par::types::{DataType, UnaryOp};
use oinkc_util::{CompileError, Result};
use rustc_hash::FxHashMap;

use scope::ScopeStack;

/// Inferred type of every expression node, keyed by node identity.
pub type TypeMap = FxHashMap<NodeId, DataType>;

/// Infers the type of an integer literal from its magnitude.
///
/// Text that does not fit even a 128-bit parse is treated as `i64`; the
/// generator copies literal text verbatim either way.
pub fn literal_type(text: &str) -> DataType {
    match text.parse::<i128>() {
        Ok(value) if (-32_768..=32_767).contains(&value) => DataType::I16,
        Ok(value) if (-(1_i128 << 31)..(1_i128 << 31)).contains(&value) => DataType::I32,
        _ => DataType::I64,
    }
}

/// True when a value of `source` type may initialize or be assigned to a
/// variable of `target` type: identical types, or integer widening.
pub fn assignment_compatible(source: DataType, target: DataType) -> bool {
    if source == target {
        return true;
    }
    source.is_integer() && target.is_integer() && source.bit_width() < target.bit_width()
}

/// The semantic analysis walk.
pub struct SemanticAnalyzer {
    scopes: ScopeStack,

    /// Name currently being initialized; referencing it is an error.
    currently_initializing: Option<String>,

    types: TypeMap,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            currently_initializing: None,
            types: TypeMap::default(),
        }
    }

    /// Checks the whole program and returns the expression type map.
    pub fn analyze(mut self, program: &Program) -> Result<TypeMap> {
        for statement in &program.statements {
            self.analyze_stmt(statement)?;
        }
        self.analyze_expr(&program.return_stmt.expr)?;
        Ok(self.types)
    }

    fn analyze_stmt(&mut self, statement: &Stmt) -> Result<()> {
        match statement {
            Stmt::Decl(decl) => self.analyze_declaration(decl),
            Stmt::Assign(assign) => self.analyze_assignment(assign),
            Stmt::If(if_stmt) => self.analyze_if(if_stmt),
            Stmt::While(while_stmt) => self.analyze_while(while_stmt),
        }
    }

    fn analyze_declaration(&mut self, decl: &Declaration) -> Result<()> {
        if !self.scopes.declare(&decl.name, decl.ty, decl.mutable) {
            return Err(CompileError::redeclaration(&decl.name, decl.line));
        }

        self.currently_initializing = Some(decl.name.clone());
        let init_ty = self.analyze_expr(&decl.init)?;
        self.currently_initializing = None;

        if !assignment_compatible(init_ty, decl.ty) {
            return Err(CompileError::type_mismatch(
                format!(
                    "cannot initialize '{}' of type {} with a {} value (line {})",
                    decl.name, decl.ty, init_ty, decl.line
                ),
                decl.line,
            ));
        }

        Ok(())
    }

    fn analyze_assignment(&mut self, assign: &Assignment) -> Result<()> {
        let binding = self
            .scopes
            .lookup(&assign.name)
            .ok_or_else(|| CompileError::undeclared_variable(&assign.name, assign.line))?;

        if !binding.mutable {
            return Err(CompileError::immutable_assignment(&assign.name, assign.line));
        }

        // The static self-assignment rule is the narrow form: only a bare
        // `x @ x` is rejected here. `x` on the RHS of a larger expression
        // is an ordinary read.
        if assign.value.is_bare_ident(&assign.name) {
            return Err(CompileError::self_assignment(&assign.name, assign.line));
        }

        let value_ty = self.analyze_expr(&assign.value)?;

        if !assignment_compatible(value_ty, binding.ty) {
            return Err(CompileError::type_mismatch(
                format!(
                    "cannot assign a {} value to '{}' of type {} (line {})",
                    value_ty, assign.name, binding.ty, assign.line
                ),
                assign.line,
            ));
        }

        Ok(())
    }

    fn analyze_if(&mut self, if_stmt: &IfStmt) -> Result<()> {
        self.check_condition(&if_stmt.condition, if_stmt.line, "SAVE")?;
        self.analyze_block(&if_stmt.then_block)?;

        for elif_block in &if_stmt.elif_blocks {
            self.check_condition(&elif_block.condition, elif_block.line, "HURT")?;
            self.analyze_block(&elif_block.block)?;
        }

        if let Some(else_block) = &if_stmt.else_block {
            self.analyze_block(else_block)?;
        }

        Ok(())
    }

    fn analyze_while(&mut self, while_stmt: &WhileStmt) -> Result<()> {
        self.check_condition(&while_stmt.condition, while_stmt.line, "OINK")?;
        self.analyze_block(&while_stmt.body)
    }

    fn check_condition(&mut self, condition: &Expr, line: u32, keyword: &str) -> Result<()> {
        let ty = self.analyze_expr(condition)?;
        if ty != DataType::Bool {
            return Err(CompileError::type_mismatch(
                format!(
                    "{} condition must be bool, found {} (line {})",
                    keyword, ty, line
                ),
                line,
            ));
        }
        Ok(())
    }

    fn analyze_block(&mut self, block: &CodeBlock) -> Result<()> {
        self.scopes.enter_scope();
        for statement in &block.statements {
            self.analyze_stmt(statement)?;
        }
        if let Some(return_stmt) = &block.return_stmt {
            self.analyze_expr(&return_stmt.expr)?;
        }
        self.scopes.exit_scope();
        Ok(())
    }

    /// Infers the type of an expression, recording it in the type map.
    fn analyze_expr(&mut self, expr: &Expr) -> Result<DataType> {
        let ty = match &expr.kind {
            ExprKind::Number { text } => literal_type(text),
            ExprKind::Boolean { .. } => DataType::Bool,
            ExprKind::Ident { name } => {
                if self.currently_initializing.as_deref() == Some(name.as_str()) {
                    return Err(CompileError::self_assignment(name, expr.line));
                }
                self.scopes
                    .lookup(name)
                    .ok_or_else(|| CompileError::undeclared_variable(name, expr.line))?
                    .ty
            },
            ExprKind::Binary { left, op, right } => {
                let left_ty = self.analyze_expr(left)?;
                let right_ty = self.analyze_expr(right)?;

                if op.is_comparison() {
                    if (left_ty == DataType::Bool) != (right_ty == DataType::Bool) {
                        return Err(CompileError::type_mismatch(
                            format!(
                                "cannot compare {} with {} using {} (line {})",
                                left_ty, right_ty, op, expr.line
                            ),
                            expr.line,
                        ));
                    }
                    DataType::Bool
                } else if op.is_logical() {
                    if left_ty != DataType::Bool || right_ty != DataType::Bool {
                        return Err(CompileError::type_mismatch(
                            format!("{} requires bool operands (line {})", op, expr.line),
                            expr.line,
                        ));
                    }
                    DataType::Bool
                } else {
                    if left_ty == DataType::Bool || right_ty == DataType::Bool {
                        return Err(CompileError::type_mismatch(
                            format!("cannot use {} on bool operands (line {})", op, expr.line),
                            expr.line,
                        ));
                    }
                    DataType::widen(left_ty, right_ty)
                }
            },
            ExprKind::Unary { op: UnaryOp::Not, operand } => {
                let operand_ty = self.analyze_expr(operand)?;
                if operand_ty != DataType::Bool {
                    return Err(CompileError::type_mismatch(
                        format!("💩 applies only to bool, found {} (line {})", operand_ty, expr.line),
                        expr.line,
                    ));
                }
                DataType::Bool
            },
        };

        self.types.insert(expr.id, ty);
        Ok(ty)
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
