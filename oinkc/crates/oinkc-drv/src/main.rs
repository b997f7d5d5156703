//! `oinkc` - command-line front door of the Oink compiler.

use std::path::PathBuf;
use std::process;

use clap::{Parser as ClapParser, ValueEnum};
use oinkc_drv::{Config, Emit, Session};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "oinkc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Oink compiler - compile .oink programs to LLVM IR", long_about = None)]
struct Cli {
    /// Input .oink source file
    input: PathBuf,

    /// Output path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Which artifact to emit
    #[arg(long, value_enum, default_value = "ir")]
    emit: EmitArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmitArg {
    /// Token stream (lexer output)
    Tokens,
    /// Abstract syntax tree (parser output)
    Ast,
    /// LLVM-IR module
    Ir,
}

impl From<EmitArg> for Emit {
    fn from(arg: EmitArg) -> Self {
        match arg {
            EmitArg::Tokens => Emit::Tokens,
            EmitArg::Ast => Emit::Ast,
            EmitArg::Ir => Emit::Ir,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Session::new(Config {
        input: cli.input,
        output: cli.output,
        emit: cli.emit.into(),
    });

    if let Err(e) = session.run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
