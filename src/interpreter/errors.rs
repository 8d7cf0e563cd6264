//=====================================================
// File: interpreter/errors.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: QuillScript runtime error model
// Objective: Define every failure the evaluation core can raise, with stable
//            error codes and a suggestion line for the terminal reporter
//=====================================================

use std::fmt;

use thiserror::Error;

/// Which kind of callable an arity check was performed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    Lambda,
}

impl fmt::Display for CallableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallableKind::Function => f.write_str("Function"),
            CallableKind::Lambda => f.write_str("Lambda"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("Undefined function: {0}")]
    UndefinedFunction(String),
    #[error("Undefined lambda: {0}")]
    UndefinedLambda(String),
    #[error("Undefined lambda or function: {0}")]
    UndefinedCallable(String),
    #[error("Function '{0}' cannot be used as a value; functions do not return values")]
    FunctionNotAValue(String),
    #[error("{kind} '{name}' expects {expected} arguments but got {found}")]
    ArityMismatch {
        kind: CallableKind,
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Type mismatch in '{context}': expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Index out of bounds: {index} (array '{name}' has {len} elements)")]
    IndexOutOfBounds {
        name: String,
        index: i64,
        len: usize,
    },
    #[error("Key not found in dictionary '{name}': {key}")]
    KeyNotFound { name: String, key: String },
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
    #[error("Invalid dictionary format: {0}")]
    InvalidDictionaryFormat(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Maximum call depth of {0} exceeded")]
    RecursionLimit(usize),
    #[error("Expression nesting deeper than {0} levels")]
    ExpressionTooDeep(usize),
    #[error("Lambda '{lambda}' received a non-finite argument ({value})")]
    NonFiniteArgument { lambda: String, value: f64 },
    #[error("Unknown command or syntax")]
    UnknownStatement(String),
    #[error("Function '{0}' is missing its closing '}}'")]
    UnterminatedFunction(String),
    #[error("Unexpected '}}' outside of a function body")]
    UnexpectedBlockEnd,
    #[error("Nested function definitions are not supported: {0}")]
    NestedFunction(String),
    #[error("In function '{function}', line '{line}': {source}")]
    InFunction {
        function: String,
        line: String,
        #[source]
        source: Box<RuntimeError>,
    },
    #[error("Failed to write output: {0}")]
    Output(String),
}

impl RuntimeError {
    pub fn type_mismatch(
        context: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        RuntimeError::TypeMismatch {
            context: context.into(),
            expected,
            found,
        }
    }

    pub fn arity(kind: CallableKind, name: &str, expected: usize, found: usize) -> Self {
        RuntimeError::ArityMismatch {
            kind,
            name: name.to_string(),
            expected,
            found,
        }
    }

    /// The innermost error, looking through function-body wrappers.
    pub fn root(&self) -> &RuntimeError {
        match self {
            RuntimeError::InFunction { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn code(&self) -> ErrorCode {
        runtime_error_code(self)
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        match self.root() {
            RuntimeError::InvalidExpression(_) => {
                Some("Ensure the expression inside '{}' is valid.")
            }
            RuntimeError::InvalidDictionaryFormat(_) => {
                Some("Dictionaries are written as {\"key\": 1, \"other\": 2}.")
            }
            RuntimeError::UndefinedVariable(_) => {
                Some("Assign the variable before it is used, e.g. `name = value`.")
            }
            RuntimeError::UndefinedLambda(_) | RuntimeError::UndefinedCallable(_) => {
                Some("Define a lambda first, e.g. `square(n) => n * n`.")
            }
            RuntimeError::UndefinedFunction(_) => {
                Some("Define the function with `fn name(params) {` ... `}` before calling it.")
            }
            RuntimeError::FunctionNotAValue(_) => {
                Some("Call functions as statements; only lambdas produce values.")
            }
            RuntimeError::ArityMismatch { .. } => {
                Some("Pass exactly as many arguments as the definition declares.")
            }
            RuntimeError::UnknownStatement(_) => Some(
                "Supported statements: assignment, print(...), fn definitions, calls and lambdas.",
            ),
            RuntimeError::RecursionLimit(_) => {
                Some("Raise `max_call_depth` in quill.toml or remove the unbounded recursion.")
            }
            RuntimeError::ExpressionTooDeep(_) => {
                Some("Split the expression into smaller lambdas or intermediate variables.")
            }
            RuntimeError::NonFiniteArgument { .. } => {
                Some("Keep intermediate results within floating-point range.")
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Syntax,
    Resolution,
    TypeMismatch,
    InvalidOperation,
    RuntimePanic,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Syntax => "E001",
            ErrorCode::Resolution => "E002",
            ErrorCode::TypeMismatch => "E003",
            ErrorCode::InvalidOperation => "E004",
            ErrorCode::RuntimePanic => "E005",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn runtime_error_code(error: &RuntimeError) -> ErrorCode {
    match error {
        RuntimeError::InvalidExpression(_)
        | RuntimeError::InvalidDictionaryFormat(_)
        | RuntimeError::UnknownStatement(_)
        | RuntimeError::UnterminatedFunction(_)
        | RuntimeError::UnexpectedBlockEnd
        | RuntimeError::NestedFunction(_) => ErrorCode::Syntax,
        RuntimeError::UndefinedVariable(_)
        | RuntimeError::UndefinedFunction(_)
        | RuntimeError::UndefinedLambda(_)
        | RuntimeError::UndefinedCallable(_) => ErrorCode::Resolution,
        RuntimeError::TypeMismatch { .. } | RuntimeError::FunctionNotAValue(_) => {
            ErrorCode::TypeMismatch
        }
        RuntimeError::ArityMismatch { .. }
        | RuntimeError::IndexOutOfBounds { .. }
        | RuntimeError::KeyNotFound { .. }
        | RuntimeError::NonFiniteArgument { .. }
        | RuntimeError::DivisionByZero => ErrorCode::InvalidOperation,
        RuntimeError::RecursionLimit(_)
        | RuntimeError::ExpressionTooDeep(_)
        | RuntimeError::Output(_) => ErrorCode::RuntimePanic,
        RuntimeError::InFunction { source, .. } => runtime_error_code(source),
    }
}


//=====================================================
// End of file
//=====================================================
