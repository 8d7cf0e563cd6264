//=====================================================
// File: main.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: QuillScript CLI entry point
// Objective: Command-line interface for executing .qls scripts with
//            configuration discovery, logging and strict-mode exit codes
//=====================================================

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use quillscript::{Interpreter, InterpreterConfig, SourceFile, logging};

#[derive(Debug, ClapParser)]
#[command(
    name = "quill",
    about = "Runs a QuillScript (.qls) file line by line.",
    version
)]
struct Args {
    /// Path to the QuillScript source file.
    script: PathBuf,

    /// Configuration file (defaults to quill.toml next to the script).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable ANSI colors in error reports.
    #[arg(long)]
    no_color: bool,

    /// Override the maximum function/lambda call depth.
    #[arg(long)]
    max_call_depth: Option<usize>,

    /// Exit with status 1 if any line reported an error.
    #[arg(long)]
    strict: bool,

    /// Log every executed line to stderr (equivalent to QUILL_LOG=trace).
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init(if args.trace { "trace" } else { "warn" }, !args.no_color);

    let (mut config, config_path) =
        InterpreterConfig::discover(args.config.as_deref(), &args.script)?;
    if args.no_color {
        config.color = false;
    }
    if let Some(depth) = args.max_call_depth {
        config.max_call_depth = depth;
    }
    config.strict |= args.strict;
    tracing::debug!(?config, ?config_path, "configuration resolved");

    let source = SourceFile::load(&args.script)
        .with_context(|| format!("failed to read {}", args.script.display()))?;
    tracing::debug!(path = ?source.path, items = source.items.len(), "script loaded");

    let strict = config.strict;
    let mut interpreter = Interpreter::new(config);
    let summary = interpreter.run(&source);
    tracing::debug!(
        executed = summary.executed,
        errors = summary.errors,
        "run finished"
    );

    if strict && !summary.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
