//! oinkc-gen - LLVM-IR code generator
//!
//! Walks the analyzed AST and emits a textual LLVM-IR module: a fixed
//! prelude declaring `printf` and the `@printResult` helper, followed by
//! a single `define i32 @main()` holding the translated program.
//!
//! Values live in SSA registers only; there is no `alloca`. Each source
//! variable owns a base register `%name`, and every further definition
//! (assignment or merge phi) mints the next version `%name.N`. Branch
//! merges and loop headers reconcile versions with phi nodes, so the
//! emitted module passes the IR verifier.

mod llvm;

pub use llvm::CodeGenerator;
