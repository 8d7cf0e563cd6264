//==============================================
// File: tests/error_codes.rs
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Verify runtime error codes
// Objective: Ensure every error category maps to its E00x code and suggestion
//==============================================

use quillscript::interpreter::{CallableKind, RuntimeError};
use quillscript::parser::Statement;
use quillscript::{Diagnostic, Value};

#[test]
fn unknown_statement_uses_e001() {
    let err = Statement::classify("this is not quill").expect_err("should fail");
    assert_eq!(err.code().as_str(), "E001");
}

#[test]
fn malformed_dictionary_uses_e001() {
    let err = Value::from_literal("{\"a\" 1}").expect_err("should fail");
    assert!(matches!(err, RuntimeError::InvalidDictionaryFormat(_)));
    assert_eq!(err.code().as_str(), "E001");
}

#[test]
fn undefined_names_use_e002() {
    for err in [
        RuntimeError::UndefinedVariable("v".into()),
        RuntimeError::UndefinedFunction("f".into()),
        RuntimeError::UndefinedLambda("l".into()),
        RuntimeError::UndefinedCallable("c".into()),
    ] {
        assert_eq!(err.code().as_str(), "E002", "{err}");
    }
}

#[test]
fn type_errors_use_e003() {
    let err = RuntimeError::type_mismatch("x", "array", "integer");
    assert_eq!(err.code().as_str(), "E003");
    assert_eq!(
        err.to_string(),
        "Type mismatch in 'x': expected array, found integer"
    );
}

#[test]
fn diagnostics_carry_code_and_suggestion() {
    let err = RuntimeError::arity(CallableKind::Function, "greet", 1, 0);
    let diagnostic = Diagnostic::from_error(9, "greet()", &err);
    assert_eq!(diagnostic.code.as_str(), "E004");
    assert_eq!(diagnostic.message, "Function 'greet' expects 1 arguments but got 0");
    assert!(diagnostic.suggestion.is_some());
}
