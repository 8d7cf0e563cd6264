//=====================================================
// File: lib.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: QuillScript library main interface
// Objective: Export the line source, statement classifier, evaluation core
//            and interpreter context for the quill binary and embedders
//=====================================================

pub mod config;
pub mod eval;
pub mod functions;
pub mod interpreter;
pub mod logging;
pub mod parser;
pub mod print;
pub mod runtime;
pub mod source;

pub use config::InterpreterConfig;
pub use eval::{Evaluated, ExpressionEvaluator, format_number};
pub use functions::{Function, FunctionRegistry, Lambda, LineExecutor};
pub use interpreter::{
    CollectingSink, Diagnostic, ErrorCode, ErrorSink, Interpreter, RunSummary, RuntimeError,
    TerminalReporter,
};
pub use print::PrintResolver;
pub use runtime::{Value, VariableStore};
pub use source::{Item, SourceFile, SourceLine};

//=====================================================
// End of file
//=====================================================
