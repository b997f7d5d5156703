//! AST node definitions.
//!
//! The tree is a plain owned structure with no back-edges; passes walk it
//! by pattern matching on the variants. Every node records the 1-indexed
//! source line of its first significant token, and every expression node
//! carries a parser-minted [`NodeId`] so later passes can attach
//! information in side tables instead of mutating the tree.

use crate::types::{DataType, Operator, UnaryOp};

/// Identity of an expression node, minted monotonically by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// AST root: the statements of the program and its final return line.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub return_stmt: Return,
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Decl(Declaration),
    Assign(Assignment),
    If(IfStmt),
    While(WhileStmt),
}

/// Variable declaration, e.g. `😀 🐷 🐖x🐖 @ 42`.
///
/// A declaration without an initializer gets a synthesized default:
/// `0` for the integer types, `HATE` for booleans.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub init: Expr,
    pub mutable: bool,
    pub ty: DataType,
    pub line: u32,
}

/// Assignment to an existing variable, e.g. `🐖x🐖 @ 7`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub value: Expr,
    pub line: u32,
}

/// `SAVE` statement with optional `HURT` chain and `KILL` block.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: CodeBlock,
    pub elif_blocks: Vec<ElifBlock>,
    pub else_block: Option<CodeBlock>,
    pub line: u32,
}

/// One `HURT` arm; only reachable from an [`IfStmt`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElifBlock {
    pub condition: Expr,
    pub block: CodeBlock,
    pub line: u32,
}

/// `OINK` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: CodeBlock,
    pub line: u32,
}

/// A `🐖🐖🐖`-delimited block with its own lexical scope.
///
/// `scope_id` is minted monotonically from 1 in the order blocks close.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub statements: Vec<Stmt>,
    pub return_stmt: Option<Return>,
    pub scope_id: u32,
}

/// `... expr ...` return line.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub expr: Expr,
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub line: u32,
    pub kind: ExprKind,
}

/// Expression payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal; the digit text is kept verbatim.
    Number { text: String },
    /// Boolean literal, spelled `LOVE` or `HATE`.
    Boolean { text: String },
    /// Variable reference.
    Ident { name: String },
    /// Binary operation. Mood inversion already happened in the parser,
    /// so the operator here is the effective one.
    Binary {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    /// Unary operation (`💩`).
    Unary { op: UnaryOp, operand: Box<Expr> },
}

impl Expr {
    /// True when this expression is a bare reference to `name`.
    pub fn is_bare_ident(&self, name: &str) -> bool {
        matches!(&self.kind, ExprKind::Ident { name: n } if n == name)
    }
}
