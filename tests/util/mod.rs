#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::{Command, ExitStatus};

use assert_cmd::cargo::CommandCargoExt;
use quillscript::{CollectingSink, Diagnostic, Interpreter, InterpreterConfig, RunSummary};
use tempfile::tempdir;

/// Everything one in-process run produced.
pub struct RunOutput {
    pub stdout: String,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: RunSummary,
}

pub fn run_qls_source(src: &str) -> RunOutput {
    run_qls_source_with(src, InterpreterConfig::default())
}

pub fn run_qls_source_with(src: &str, config: InterpreterConfig) -> RunOutput {
    let sink = CollectingSink::new();
    let mut interpreter = Interpreter::with_output(Vec::new(), Box::new(sink.clone()), config);
    let summary = interpreter.run_source(src);
    RunOutput {
        stdout: String::from_utf8(interpreter.into_output()).expect("utf8 output"),
        diagnostics: sink.diagnostics(),
        summary,
    }
}

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

/// Write `src` to a temp script and run the `quill` binary on it.
pub fn run_quill(src: &str, extra_args: &[&str]) -> CommandOutput {
    let dir = tempdir().expect("create temp dir");
    let script_path = dir.path().join("script.qls");
    fs::write(&script_path, src).expect("write script");
    run_quill_file(&script_path, extra_args)
}

pub fn run_quill_file(path: &Path, extra_args: &[&str]) -> CommandOutput {
    let mut command = Command::cargo_bin("quill").expect("quill binary");
    command.arg(path).args(extra_args).env_remove("QUILL_LOG");
    let output = command.output().expect("failed to run quill");
    CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status,
    }
}
