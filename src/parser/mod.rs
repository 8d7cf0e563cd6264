//=============================================
// File: parser/mod.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: QuillScript statement classifier
// Objective: Match a source line against the statement shapes and extract
//            the pieces each core entry point needs
//=============================================

use once_cell::sync::Lazy;
use regex::Regex;

use crate::interpreter::RuntimeError;

//=============================================
//            Section 1: Statement Shapes
//=============================================

static FUNCTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^fn\s+(\w+)\s*\(([^)]*)\)\s*\{$").expect("function header regex"));
static PRINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^print\s*\((.*)\)$").expect("print regex"));
static LAMBDA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\s*\(([^)]*)\)\s*=>\s*(.+)$").expect("lambda regex"));
static ASSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\s*=\s*(.*)$").expect("assignment regex"));
static CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)\s*\((.*)\)$").expect("call regex"));

/// One classified statement line, borrowing from the line text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    FunctionHeader { name: &'a str, params: &'a str },
    Print { content: &'a str },
    LambdaDef { name: &'a str, params: &'a str, body: &'a str },
    Assign { name: &'a str, value: &'a str },
    Call { name: &'a str, args: Vec<&'a str> },
    BlockEnd,
}

impl<'a> Statement<'a> {
    //Function: classify
    //Purpose: Route a trimmed line to the first matching statement shape
    //Inputs: line: &str
    //Returns: Result<Statement, RuntimeError>
    pub fn classify(line: &'a str) -> Result<Statement<'a>, RuntimeError> {
        if line == "}" {
            return Ok(Statement::BlockEnd);
        }
        if let Some((name, params)) = function_header(line) {
            return Ok(Statement::FunctionHeader { name, params });
        }
        if let Some(caps) = PRINT.captures(line) {
            return Ok(Statement::Print {
                content: group(&caps, 1).trim(),
            });
        }
        if let Some(caps) = LAMBDA.captures(line) {
            return Ok(Statement::LambdaDef {
                name: group(&caps, 1),
                params: group(&caps, 2),
                body: group(&caps, 3).trim(),
            });
        }
        if let Some(caps) = ASSIGN.captures(line) {
            return Ok(Statement::Assign {
                name: group(&caps, 1),
                value: group(&caps, 2).trim(),
            });
        }
        if let Some(caps) = CALL.captures(line) {
            let name = group(&caps, 1);
            let args = split_arguments(group(&caps, 2));
            if args.iter().any(|arg| arg.is_empty()) {
                return Err(RuntimeError::InvalidExpression(format!(
                    "empty argument in call to '{name}'"
                )));
            }
            return Ok(Statement::Call { name, args });
        }
        Err(RuntimeError::UnknownStatement(line.to_string()))
    }
}

/// `fn name(params) {` header match, shared with the line source.
pub fn function_header(line: &str) -> Option<(&str, &str)> {
    let caps = FUNCTION_HEADER.captures(line)?;
    Some((group(&caps, 1), group(&caps, 2)))
}

fn group<'a>(caps: &regex::Captures<'a>, index: usize) -> &'a str {
    caps.get(index).map_or("", |m| m.as_str())
}

//=============================================
//            Section 2: Argument Splitting
//=============================================

/// Split call arguments on top-level commas.
///
/// Commas nested inside parentheses, brackets, braces or double-quoted strings
/// do not split, so `f(g(1, 2), "a, b")` yields two arguments. Each argument is
/// trimmed; a blank list yields no arguments.
pub fn split_arguments(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '(' | '[' | '{' if !in_string => depth += 1,
            ')' | ']' | '}' if !in_string => depth -= 1,
            ',' if !in_string && depth == 0 => {
                args.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(text[start..].trim());
    args
}


//=============================================
// End of file
//=============================================
