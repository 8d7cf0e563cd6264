//=====================================================
// File: interpreter/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: QuillScript interpreter context
// Objective: Own the variable table and function registry for one run,
//            dispatch classified statements, and report per-line failures
//=====================================================

pub mod diagnostics;
pub mod errors;

use std::io::{self, Write};

use tracing::{debug, trace, warn};

use crate::config::InterpreterConfig;
use crate::eval::ExpressionEvaluator;
use crate::functions::{FunctionRegistry, LineExecutor};
use crate::parser::Statement;
use crate::print::PrintResolver;
use crate::runtime::VariableStore;
use crate::source::{Item, SourceFile};

pub use diagnostics::{CollectingSink, Diagnostic, ErrorSink, TerminalReporter};
pub use errors::{CallableKind, ErrorCode, RuntimeError, runtime_error_code};

/// Outcome of running a whole source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Top-level items that completed without error.
    pub executed: usize,
    /// Items that failed and were reported to the sink.
    pub errors: usize,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

pub struct Interpreter<W: Write = io::Stdout> {
    variables: VariableStore,
    functions: FunctionRegistry,
    out: W,
    sink: Box<dyn ErrorSink>,
    config: InterpreterConfig,
    call_depth: usize,
}

impl Interpreter<io::Stdout> {
    /// Prints to stdout and reports to stderr, as the `quill` binary does.
    pub fn new(config: InterpreterConfig) -> Self {
        let sink = TerminalReporter::stderr(config.color, config.suggestions);
        Self::with_output(io::stdout(), Box::new(sink), config)
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W, sink: Box<dyn ErrorSink>, config: InterpreterConfig) -> Self {
        Self {
            variables: VariableStore::new(),
            functions: FunctionRegistry::new(),
            out,
            sink,
            config,
            call_depth: 0,
        }
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    //=====================================================
    // Section 1.0 - Program Execution
    //=====================================================

    /// Execute every item; a failing item is reported and the run moves on.
    pub fn run(&mut self, source: &SourceFile) -> RunSummary {
        let mut summary = RunSummary::default();
        for item in &source.items {
            match self.execute_item(item) {
                Ok(()) => summary.executed += 1,
                Err(error) => {
                    let line = item.line();
                    debug!(line = line.number, %error, "statement failed");
                    self.sink
                        .report(Diagnostic::from_error(line.number, &line.text, &error));
                    summary.errors += 1;
                }
            }
        }
        if let Err(error) = self.out.flush() {
            warn!(%error, "failed to flush output");
        }
        summary
    }

    pub fn run_source(&mut self, text: &str) -> RunSummary {
        self.run(&SourceFile::parse(text))
    }

    pub fn execute_item(&mut self, item: &Item) -> Result<(), RuntimeError> {
        match item {
            Item::Line(line) => self.execute(&line.text, line.number),
            Item::FunctionDef {
                name, params, body, ..
            } => {
                self.functions.define_function(name, params, body.clone());
                Ok(())
            }
            Item::Malformed { error, .. } => Err(error.clone()),
        }
    }

    //=====================================================
    // Section 2.0 - Statement Dispatch
    //=====================================================

    pub fn execute_statement(&mut self, line: &str) -> Result<(), RuntimeError> {
        match Statement::classify(line)? {
            Statement::Assign { name, value } => self.variables.assign(name, value),
            Statement::Print { content } => self.print(content),
            Statement::LambdaDef { name, params, body } => {
                self.functions.define_lambda(name, params, body);
                Ok(())
            }
            Statement::Call { name, args } => {
                let args: Vec<String> = args.into_iter().map(str::to_string).collect();
                self.call_function(name, &args)
            }
            // Headers only reach here from a function body; top-level blocks
            // are aggregated by the line source.
            Statement::FunctionHeader { name, .. } => {
                Err(RuntimeError::NestedFunction(name.to_string()))
            }
            Statement::BlockEnd => Err(RuntimeError::UnexpectedBlockEnd),
        }
    }

    /// Resolve print content and write it as one output line.
    pub fn print(&mut self, content: &str) -> Result<(), RuntimeError> {
        let mut evaluator = ExpressionEvaluator::new(&self.variables, &self.functions)
            .with_depth(self.call_depth, self.config.max_call_depth);
        let text = PrintResolver::new(&mut evaluator).resolve(content)?;
        writeln!(self.out, "{text}").map_err(|err| RuntimeError::Output(err.to_string()))
    }

    /// Run a function's body with its parameters substituted by `args`.
    pub fn call_function(&mut self, name: &str, args: &[String]) -> Result<(), RuntimeError> {
        let function = self.functions.function(name)?;
        if self.call_depth >= self.config.max_call_depth {
            warn!(function = name, depth = self.call_depth, "call depth limit reached");
            return Err(RuntimeError::RecursionLimit(self.config.max_call_depth));
        }
        self.call_depth += 1;
        let result = function.invoke(args, self);
        self.call_depth -= 1;
        result
    }
}

impl<W: Write> LineExecutor for Interpreter<W> {
    fn execute(&mut self, line: &str, line_number: usize) -> Result<(), RuntimeError> {
        trace!(line_number, line, depth = self.call_depth, "execute");
        self.execute_statement(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Value;

    fn interpreter() -> (Interpreter<Vec<u8>>, CollectingSink) {
        let sink = CollectingSink::new();
        let interp = Interpreter::with_output(
            Vec::new(),
            Box::new(sink.clone()),
            InterpreterConfig::default(),
        );
        (interp, sink)
    }

    fn stdout(interp: Interpreter<Vec<u8>>) -> String {
        String::from_utf8(interp.into_output()).expect("utf8 output")
    }

    #[test]
    fn assignment_then_print() {
        let (mut interp, sink) = interpreter();
        let summary = interp.run_source("x = 5\nprint({x})\n");
        assert_eq!(summary, RunSummary { executed: 2, errors: 0 });
        assert!(sink.is_empty());
        assert_eq!(stdout(interp), "5\n");
    }

    #[test]
    fn functions_reenter_statement_dispatch() {
        let (mut interp, sink) = interpreter();
        interp.run_source(
            "fn greet(name, times) {\n\
             print(\"Hello {name} x{times}\")\n\
             last = name\n\
             }\n\
             greet(\"Ada\", 2)\n\
             print(last)\n",
        );
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert_eq!(stdout(interp), "Hello Ada x2\nAda\n");
    }

    #[test]
    fn function_body_failure_is_reported_once_against_the_call() {
        let (mut interp, sink) = interpreter();
        let summary = interp.run_source(
            "fn broken() {\nprint(\"before\")\nprint({missing})\nprint(\"after\")\n}\nbroken()\nprint(\"next\")\n",
        );
        assert_eq!(summary.errors, 1);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics[0].line, 6);
        assert_eq!(diagnostics[0].source, "broken()");
        assert_eq!(diagnostics[0].code, ErrorCode::Resolution);
        assert_eq!(stdout(interp), "before\nnext\n");
    }

    #[test]
    fn recursion_is_bounded() {
        let sink = CollectingSink::new();
        let config = InterpreterConfig {
            max_call_depth: 8,
            ..InterpreterConfig::default()
        };
        let mut interp = Interpreter::with_output(Vec::new(), Box::new(sink.clone()), config);
        interp.run_source("fn loop_forever() {\nloop_forever()\n}\nloop_forever()\n");
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Maximum call depth of 8 exceeded"));
    }

    #[test]
    fn stray_block_end_and_unknown_lines_are_reported() {
        let (mut interp, sink) = interpreter();
        let summary = interp.run_source("}\n???\nx = 1\n");
        assert_eq!(summary, RunSummary { executed: 1, errors: 2 });
        assert_eq!(sink.diagnostics()[1].code, ErrorCode::Syntax);
        assert_eq!(interp.variables().lookup("x").unwrap(), &Value::Integer(1));
    }

    #[test]
    fn lambdas_defined_inside_functions_are_global() {
        let (mut interp, sink) = interpreter();
        interp.run_source(
            "fn setup(k) {\nscale(n) => n * k\n}\nsetup(3)\nprint({scale(5)})\n",
        );
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert!(interp.functions().has_lambda("scale"));
        assert_eq!(stdout(interp), "15\n");
    }
}

//=====================================================
// End of file
//=====================================================
