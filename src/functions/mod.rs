//=====================================================
// File: functions/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Function and lambda registry for QuillScript
// Objective: Store procedures and single-expression lambdas, substitute
//            arguments into their bodies, and dispatch execution/evaluation
//=====================================================

use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;
use tracing::debug;

use crate::interpreter::{CallableKind, RuntimeError};
use crate::source::SourceLine;

//=====================================================
// Section 1.0 - Line Execution Seam
//=====================================================

/// Runs one statement line. Supplied by the interpreter that owns the registry,
/// so function bodies can re-enter statement dispatch.
pub trait LineExecutor {
    fn execute(&mut self, line: &str, line_number: usize) -> Result<(), RuntimeError>;
}

//=====================================================
// Section 2.0 - Parameter Substitution
//=====================================================

/// Whole-word, single-pass replacement of parameter names.
///
/// Every parameter is matched by one alternation, so text introduced by an
/// argument is never substituted again. This is textual, not hygienic: a body
/// that mentions a global with the same name as a parameter sees the argument.
#[derive(Debug, Clone)]
struct Substitution {
    params: Vec<String>,
    pattern: Option<Regex>,
}

impl Substitution {
    fn new(params: Vec<String>) -> Self {
        let pattern = if params.is_empty() {
            None
        } else {
            let alternation = params
                .iter()
                .map(|param| regex::escape(param))
                .collect::<Vec<_>>()
                .join("|");
            // Every name goes through regex::escape, so the pattern always compiles.
            Regex::new(&format!(r"\b(?:{alternation})\b")).ok()
        };
        Self { params, pattern }
    }

    fn apply(&self, text: &str, args: &[String]) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let name = &caps[0];
                self.params
                    .iter()
                    .position(|param| param == name)
                    .map(|i| args[i].clone())
                    .unwrap_or_else(|| name.to_string())
            })
            .into_owned()
    }
}

/// Split a comma-separated parameter list, trimming names and dropping empties.
pub fn parse_parameters(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(str::to_string)
        .collect()
}

//=====================================================
// Section 3.0 - Callables
//=====================================================

/// A named multi-statement procedure. Runs for side effects, returns nothing.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub body: Vec<SourceLine>,
    substitution: Substitution,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<SourceLine>) -> Self {
        Self {
            name: name.into(),
            body,
            substitution: Substitution::new(params),
        }
    }

    pub fn params(&self) -> &[String] {
        &self.substitution.params
    }

    /// Body lines with every parameter replaced by its argument text.
    pub fn substituted_body(&self, args: &[String]) -> Result<Vec<SourceLine>, RuntimeError> {
        self.check_arity(args.len())?;
        Ok(self
            .body
            .iter()
            .map(|line| SourceLine::new(line.number, self.substitution.apply(&line.text, args)))
            .collect())
    }

    /// Substitute and execute each body line in order. The first failing line
    /// aborts the call.
    pub fn invoke(
        &self,
        args: &[String],
        executor: &mut dyn LineExecutor,
    ) -> Result<(), RuntimeError> {
        debug!(function = %self.name, ?args, "calling function");
        for line in self.substituted_body(args)? {
            executor
                .execute(&line.text, line.number)
                .map_err(|source| RuntimeError::InFunction {
                    function: self.name.clone(),
                    line: line.text.clone(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    fn check_arity(&self, found: usize) -> Result<(), RuntimeError> {
        let expected = self.params().len();
        if expected != found {
            return Err(RuntimeError::arity(
                CallableKind::Function,
                &self.name,
                expected,
                found,
            ));
        }
        Ok(())
    }
}

/// A named pure expression over numeric parameters.
#[derive(Debug, Clone)]
pub struct Lambda {
    pub name: String,
    pub body: String,
    substitution: Substitution,
}

impl Lambda {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            substitution: Substitution::new(params),
        }
    }

    pub fn params(&self) -> &[String] {
        &self.substitution.params
    }

    /// The body with each parameter replaced by its argument's decimal text.
    pub fn substituted_body(&self, args: &[f64]) -> Result<String, RuntimeError> {
        let expected = self.params().len();
        if expected != args.len() {
            return Err(RuntimeError::arity(
                CallableKind::Lambda,
                &self.name,
                expected,
                args.len(),
            ));
        }
        if let Some(value) = args.iter().copied().find(|arg| !arg.is_finite()) {
            return Err(RuntimeError::NonFiniteArgument {
                lambda: self.name.clone(),
                value,
            });
        }
        let args: Vec<String> = args.iter().map(|arg| format!("{arg}")).collect();
        Ok(self.substitution.apply(&self.body, &args))
    }
}

//=====================================================
// Section 4.0 - Registry
//=====================================================

/// Functions and lambdas live in separate namespaces; one name may denote both.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Rc<Function>>,
    lambdas: HashMap<String, Lambda>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_function(&mut self, name: &str, params: &str, body: Vec<SourceLine>) {
        let params = parse_parameters(params);
        debug!(name, ?params, lines = body.len(), "function defined");
        self.functions
            .insert(name.to_string(), Rc::new(Function::new(name, params, body)));
    }

    pub fn define_lambda(&mut self, name: &str, params: &str, body: &str) {
        let params = parse_parameters(params);
        debug!(name, ?params, body, "lambda defined");
        self.lambdas
            .insert(name.to_string(), Lambda::new(name, params, body.trim()));
    }

    /// Shared handle to a function, so the caller can execute it while the
    /// registry itself is borrowed mutably elsewhere.
    pub fn function(&self, name: &str) -> Result<Rc<Function>, RuntimeError> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction(name.to_string()))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn has_lambda(&self, name: &str) -> bool {
        self.lambdas.contains_key(name)
    }

    pub fn call_function(
        &self,
        name: &str,
        args: &[String],
        executor: &mut dyn LineExecutor,
    ) -> Result<(), RuntimeError> {
        self.function(name)?.invoke(args, executor)
    }

    pub fn evaluate_lambda<F>(
        &self,
        name: &str,
        args: &[f64],
        mut evaluate: F,
    ) -> Result<f64, RuntimeError>
    where
        F: FnMut(&str) -> Result<f64, RuntimeError>,
    {
        let lambda = self
            .lambdas
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedLambda(name.to_string()))?;
        let expression = lambda.substituted_body(args)?;
        debug!(lambda = name, ?args, %expression, "evaluating lambda");
        evaluate(&expression)
    }

    /// Value position: only lambdas produce numbers.
    pub fn evaluate_lambda_or_function<F>(
        &self,
        name: &str,
        args: &[f64],
        evaluate: F,
    ) -> Result<f64, RuntimeError>
    where
        F: FnMut(&str) -> Result<f64, RuntimeError>,
    {
        if self.has_lambda(name) {
            return self.evaluate_lambda(name, args, evaluate);
        }
        if self.has_function(name) {
            return Err(RuntimeError::FunctionNotAValue(name.to_string()));
        }
        Err(RuntimeError::UndefinedCallable(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(usize, String)>,
        fail_on: Option<String>,
    }

    impl LineExecutor for Recorder {
        fn execute(&mut self, line: &str, line_number: usize) -> Result<(), RuntimeError> {
            if self.fail_on.as_deref() == Some(line) {
                return Err(RuntimeError::UndefinedVariable("boom".into()));
            }
            self.lines.push((line_number, line.to_string()));
            Ok(())
        }
    }

    fn body(lines: &[&str]) -> Vec<SourceLine> {
        lines
            .iter()
            .enumerate()
            .map(|(i, text)| SourceLine::new(i + 2, *text))
            .collect()
    }

    #[test]
    fn parameters_are_trimmed_and_empties_dropped() {
        assert_eq!(parse_parameters(" a, b ,, c "), vec!["a", "b", "c"]);
        assert!(parse_parameters("  ").is_empty());
    }

    #[test]
    fn function_body_is_substituted_line_by_line() {
        let mut registry = FunctionRegistry::new();
        registry.define_function(
            "greet",
            "name, count",
            body(&["print({name})", "total = count", "print({names})"]),
        );
        let mut recorder = Recorder::default();
        registry
            .call_function("greet", &["\"Ada\"".into(), "3".into()], &mut recorder)
            .unwrap();
        assert_eq!(
            recorder.lines,
            vec![
                (2, "print({\"Ada\"})".to_string()),
                (3, "total = 3".to_string()),
                (4, "print({names})".to_string()),
            ]
        );
    }

    #[test]
    fn substitution_is_single_pass() {
        let mut registry = FunctionRegistry::new();
        registry.define_function("swap", "a, b", body(&["print(a b)"]));
        let mut recorder = Recorder::default();
        registry
            .call_function("swap", &["b".into(), "a".into()], &mut recorder)
            .unwrap();
        assert_eq!(recorder.lines[0].1, "print(b a)");
    }

    #[test]
    fn function_arity_is_checked() {
        let mut registry = FunctionRegistry::new();
        registry.define_function("hello", "", body(&["print(\"hi\")"]));
        let mut recorder = Recorder::default();
        registry.call_function("hello", &[], &mut recorder).unwrap();
        assert_eq!(recorder.lines.len(), 1);

        let err = registry
            .call_function("hello", &["1".into()], &mut recorder)
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::ArityMismatch { expected: 0, found: 1, .. }
        ));
    }

    #[test]
    fn failing_body_line_aborts_the_call() {
        let mut registry = FunctionRegistry::new();
        registry.define_function("f", "", body(&["one", "two", "three"]));
        let mut recorder = Recorder {
            fail_on: Some("two".into()),
            ..Recorder::default()
        };
        let err = registry.call_function("f", &[], &mut recorder).unwrap_err();
        assert_eq!(recorder.lines.len(), 1);
        assert!(matches!(err, RuntimeError::InFunction { ref line, .. } if line == "two"));
    }

    #[test]
    fn undefined_function() {
        let registry = FunctionRegistry::new();
        let mut recorder = Recorder::default();
        assert_eq!(
            registry.call_function("nope", &[], &mut recorder),
            Err(RuntimeError::UndefinedFunction("nope".into()))
        );
    }

    #[test]
    fn lambda_substitutes_decimal_text() {
        let mut registry = FunctionRegistry::new();
        registry.define_lambda("scale", "n, nn", "n * nn + n");
        let mut seen = String::new();
        let result = registry
            .evaluate_lambda("scale", &[2.5, 4.0], |expr| {
                seen = expr.to_string();
                Ok(1.0)
            })
            .unwrap();
        assert_eq!(result, 1.0);
        assert_eq!(seen, "2.5 * 4 + 2.5");
    }

    #[test]
    fn lambda_errors() {
        let mut registry = FunctionRegistry::new();
        registry.define_lambda("square", "n", "n * n");
        registry.define_function("show", "", Vec::new());

        let never = |_: &str| -> Result<f64, RuntimeError> { unreachable!() };
        assert!(matches!(
            registry.evaluate_lambda("square", &[], never),
            Err(RuntimeError::ArityMismatch { kind: CallableKind::Lambda, .. })
        ));
        assert_eq!(
            registry.evaluate_lambda("show", &[], never),
            Err(RuntimeError::UndefinedLambda("show".into()))
        );
        assert_eq!(
            registry.evaluate_lambda_or_function("show", &[], never),
            Err(RuntimeError::FunctionNotAValue("show".into()))
        );
        assert_eq!(
            registry.evaluate_lambda_or_function("ghost", &[], never),
            Err(RuntimeError::UndefinedCallable("ghost".into()))
        );
        assert!(matches!(
            registry.evaluate_lambda("square", &[f64::INFINITY], never),
            Err(RuntimeError::NonFiniteArgument { ref lambda, .. }) if lambda == "square"
        ));
        assert!(matches!(
            registry.evaluate_lambda("square", &[f64::NAN], never),
            Err(RuntimeError::NonFiniteArgument { .. })
        ));
    }

    #[test]
    fn same_name_can_be_function_and_lambda() {
        let mut registry = FunctionRegistry::new();
        registry.define_lambda("area", "r", "r * r");
        registry.define_function("area", "r", body(&["print({area(r)})"]));
        assert!(registry.has_lambda("area"));
        assert!(registry.has_function("area"));
        let value = registry
            .evaluate_lambda_or_function("area", &[3.0], |expr| {
                assert_eq!(expr, "3 * 3");
                Ok(9.0)
            })
            .unwrap();
        assert_eq!(value, 9.0);
    }
}

//=====================================================
// End of file
//=====================================================
