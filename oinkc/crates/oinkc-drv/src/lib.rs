//! oinkc-drv - Compiler driver
//!
//! Orchestrates the pipeline: lexer, parser, semantic analyzer, code
//! generator. The core entry point is [`compile`], a pure function from
//! source text to a textual LLVM-IR module (or the first diagnostic).
//! [`Session`] wraps it with the file I/O and output selection the
//! `oinkc` binary needs; the core stages never touch the filesystem.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use oinkc_gen::CodeGenerator;
use oinkc_lex::Lexer;
use oinkc_par::Parser;
use oinkc_sem::SemanticAnalyzer;
use oinkc_util::CompileError;

/// Compiles Oink source text into a textual LLVM-IR module.
///
/// Fails fast: the first error of any stage is returned unchanged.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    tracing::debug!(tokens = tokens.len(), "lexed source");

    let program = Parser::new(tokens).parse_program()?;
    tracing::debug!(statements = program.statements.len(), "parsed program");

    let types = SemanticAnalyzer::new().analyze(&program)?;
    tracing::debug!(expressions = types.len(), "analyzed program");

    let module = CodeGenerator::new(types).generate(&program);
    tracing::debug!(bytes = module.len(), "emitted module");
    Ok(module)
}

/// What the driver writes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// The token stream, debug-printed.
    Tokens,
    /// The AST, debug-printed.
    Ast,
    /// The LLVM-IR module (default).
    Ir,
}

/// One driver invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input source file.
    pub input: PathBuf,

    /// Output path; stdout when absent.
    pub output: Option<PathBuf>,

    /// Which artifact to write.
    pub emit: Emit,
}

/// A configured compiler run.
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads the input, runs the requested stages, writes the output.
    pub fn run(&self) -> anyhow::Result<()> {
        let source = fs::read_to_string(&self.config.input)
            .with_context(|| format!("cannot read {}", self.config.input.display()))?;

        let output = match self.config.emit {
            Emit::Tokens => {
                let tokens = Lexer::new(&source).tokenize()?;
                format!("{:#?}\n", tokens)
            },
            Emit::Ast => {
                let tokens = Lexer::new(&source).tokenize()?;
                let program = Parser::new(tokens).parse_program()?;
                format!("{:#?}\n", program)
            },
            Emit::Ir => compile(&source)?,
        };

        match &self.config.output {
            Some(path) => fs::write(path, output)
                .with_context(|| format!("cannot write {}", path.display()))?,
            None => print!("{}", output),
        }

        Ok(())
    }
}
