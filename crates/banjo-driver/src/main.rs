//! `banjo` — a thin CLI shell around the compiler core (spec.md §6).
//!
//! Wires the pipeline together for manual inspection and testing; this is
//! deliberately not a production CLI (the option surface is just `-emit`),
//! each form calling straight into a library function and printing its
//! result or error.

mod emit;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use banjo_core::SourceId;
use banjo_diagnostics::Diagnostics;
use banjo_sema::driver;
use banjo_syntax::ast::Context;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum EmitForm {
    /// One token per line.
    Tokens,
    /// Pretty-printed elaborated IR.
    Banjo,
    /// Hand off to the code-generator collaborator (the default).
    #[default]
    Llvm,
}

#[derive(Parser)]
#[command(name = "banjo", bin_name = "banjo")]
#[command(about = "Lex, parse, and elaborate banjo source files")]
struct Cli {
    /// Source files to translate.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// What to emit: `tokens`, `banjo`, or `llvm`.
    #[arg(long = "emit", default_value = "llvm", value_name = "FORM")]
    emit: EmitForm,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut translation_failed = false;
    for path in &cli.inputs {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("banjo: cannot read {}: {e}", path.display());
                return usage_error();
            }
        };

        let mut ctx = Context::new();
        let source_id = SourceId::from_raw(0);
        let diags = match cli.emit {
            EmitForm::Tokens => emit::tokens(&mut ctx, &source, source_id),
            EmitForm::Banjo => emit::banjo_ir(&mut ctx, &source, source_id),
            EmitForm::Llvm => emit::llvm(&mut ctx, &source, source_id),
        };

        if diags.has_errors() {
            translation_failed = true;
        }
        print_diagnostics(&diags, &source, path);
    }

    if translation_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_diagnostics(diags: &Diagnostics, source: &str, path: &PathBuf) {
    if diags.is_empty() {
        return;
    }
    eprintln!("{}:", path.display());
    eprint!("{}", diags.printer(source).render());
}

/// Exit codes are 0 success, 1 translation error, negative on usage error
/// (spec.md §6) — `ExitCode` has no negative representation, so this uses
/// the largest byte value as the conventional stand-in other drivers use
/// for "negative" on platforms without signed process exit codes.
fn usage_error() -> ExitCode {
    ExitCode::from(255)
}
