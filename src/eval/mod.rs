//=====================================================
// File: eval/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Expression evaluation for placeholders and lambda bodies
// Objective: Recursive-descent evaluation of substituted fragments with
//            variable, index, key and lambda-call resolution
//=====================================================

pub mod tokenizer;

use tracing::warn;

use crate::functions::FunctionRegistry;
use crate::interpreter::RuntimeError;
use crate::runtime::{Value, VariableStore};

use self::tokenizer::{TokenKind, Tokenizer};

/// Distance from an integer under which a computed number prints as that integer.
pub const INTEGER_TOLERANCE: f64 = 1e-9;

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Nesting allowed across one evaluation, lambda bodies included.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

//=====================================================
// Section 1.0 - Results
//=====================================================

/// Result of evaluating one fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    /// Computed by arithmetic or a lambda; printed with the tolerance rule.
    Number(f64),
    /// A string literal or array element.
    Text(String),
    /// A variable or map entry referenced directly; printed with its own rendering.
    Value(Value),
}

impl Evaluated {
    pub fn render(&self) -> String {
        match self {
            Evaluated::Number(number) => format_number(*number),
            Evaluated::Text(text) => text.clone(),
            Evaluated::Value(value) => value.render(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Evaluated::Number(_) => "number",
            Evaluated::Text(_) => "string",
            Evaluated::Value(value) => value.type_name(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Evaluated::Number(number) => Some(*number),
            Evaluated::Value(value) => value.as_number(),
            Evaluated::Text(_) => None,
        }
    }
}

/// Near-integers print without a decimal point; everything else gets six digits.
pub fn format_number(number: f64) -> String {
    let rounded = number.round();
    if (number - rounded).abs() < INTEGER_TOLERANCE {
        if rounded.abs() < i64::MAX as f64 {
            // Through i64 so that -0.0 prints as "0".
            format!("{}", rounded as i64)
        } else {
            format!("{rounded:.0}")
        }
    } else {
        format!("{number:.6}")
    }
}

//=====================================================
// Section 2.0 - Evaluator
//=====================================================

/// Evaluates fully substituted fragments against the run's variables and
/// callables. Holds shared borrows only; evaluation never mutates state.
pub struct ExpressionEvaluator<'a> {
    variables: &'a VariableStore,
    functions: &'a FunctionRegistry,
    depth: usize,
    max_depth: usize,
    expr_depth: usize,
}

static EOF: TokenKind = TokenKind::Eof;

struct Cursor<'t> {
    fragment: &'t str,
    tokens: Vec<TokenKind>,
    position: usize,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> &TokenKind {
        self.tokens.get(self.position).unwrap_or(&EOF)
    }

    fn advance(&mut self) -> TokenKind {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), RuntimeError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    fn invalid(&self) -> RuntimeError {
        RuntimeError::InvalidExpression(self.fragment.to_string())
    }
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(variables: &'a VariableStore, functions: &'a FunctionRegistry) -> Self {
        Self {
            variables,
            functions,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            expr_depth: 0,
        }
    }

    /// Start counting from an existing call depth (e.g. inside a function body).
    pub fn with_depth(mut self, depth: usize, max_depth: usize) -> Self {
        self.depth = depth;
        self.max_depth = max_depth;
        self
    }

    pub fn evaluate(&mut self, fragment: &str) -> Result<Evaluated, RuntimeError> {
        let fragment = fragment.trim();
        if let Some(text) = string_literal(fragment) {
            return Ok(Evaluated::Text(text.to_string()));
        }
        if fragment.is_empty() {
            return Err(RuntimeError::InvalidExpression(fragment.to_string()));
        }

        let tokens = Tokenizer::new(fragment).tokenize()?;
        let mut cursor = Cursor {
            fragment,
            tokens,
            position: 0,
        };
        let result = self.expression(&mut cursor)?;
        if cursor.peek() != &TokenKind::Eof {
            return Err(cursor.invalid());
        }
        Ok(result)
    }

    pub fn evaluate_number(&mut self, fragment: &str) -> Result<f64, RuntimeError> {
        let result = self.evaluate(fragment)?;
        result
            .as_number()
            .ok_or_else(|| RuntimeError::type_mismatch(fragment.trim(), "number", result.type_name()))
    }

    fn enter_expression(&mut self) -> Result<(), RuntimeError> {
        if self.expr_depth >= MAX_EXPRESSION_DEPTH {
            warn!(depth = self.expr_depth, "expression nesting limit reached");
            return Err(RuntimeError::ExpressionTooDeep(MAX_EXPRESSION_DEPTH));
        }
        self.expr_depth += 1;
        Ok(())
    }

    fn exit_expression(&mut self) {
        if self.expr_depth > 0 {
            self.expr_depth -= 1;
        }
    }

    // expr := term (('+' | '-') term)*
    fn expression(&mut self, cursor: &mut Cursor<'_>) -> Result<Evaluated, RuntimeError> {
        self.enter_expression()?;
        let result = self.sum(cursor);
        self.exit_expression();
        result
    }

    fn sum(&mut self, cursor: &mut Cursor<'_>) -> Result<Evaluated, RuntimeError> {
        let mut left = self.term(cursor)?;
        loop {
            let op = match cursor.peek() {
                TokenKind::Plus | TokenKind::Minus => cursor.advance(),
                _ => return Ok(left),
            };
            let right = self.term(cursor)?;
            let (a, b) = numeric_operands(cursor, &left, &right)?;
            left = Evaluated::Number(if op == TokenKind::Plus { a + b } else { a - b });
        }
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self, cursor: &mut Cursor<'_>) -> Result<Evaluated, RuntimeError> {
        let mut left = self.unary(cursor)?;
        loop {
            let op = match cursor.peek() {
                TokenKind::Star | TokenKind::Slash | TokenKind::Percent => cursor.advance(),
                _ => return Ok(left),
            };
            let right = self.unary(cursor)?;
            let (a, b) = numeric_operands(cursor, &left, &right)?;
            let value = match op {
                TokenKind::Star => a * b,
                _ if b == 0.0 => return Err(RuntimeError::DivisionByZero),
                TokenKind::Slash => a / b,
                _ => a % b,
            };
            left = Evaluated::Number(value);
        }
    }

    fn unary(&mut self, cursor: &mut Cursor<'_>) -> Result<Evaluated, RuntimeError> {
        match cursor.peek() {
            TokenKind::Minus | TokenKind::Plus => {
                let negate = cursor.advance() == TokenKind::Minus;
                self.enter_expression()?;
                let operand = self.unary(cursor);
                self.exit_expression();
                let operand = operand?;
                let value = operand.as_number().ok_or_else(|| {
                    RuntimeError::type_mismatch(cursor.fragment, "number", operand.type_name())
                })?;
                Ok(Evaluated::Number(if negate { -value } else { value }))
            }
            _ => self.primary(cursor),
        }
    }

    fn primary(&mut self, cursor: &mut Cursor<'_>) -> Result<Evaluated, RuntimeError> {
        match cursor.advance() {
            TokenKind::Number(number) => Ok(Evaluated::Number(number)),
            TokenKind::String(text) => Ok(Evaluated::Text(text)),
            TokenKind::LeftParen => {
                let inner = self.expression(cursor)?;
                cursor.expect(&TokenKind::RightParen)?;
                Ok(inner)
            }
            TokenKind::Identifier(name) => match cursor.peek() {
                TokenKind::LeftParen => {
                    cursor.advance();
                    self.call(cursor, &name)
                }
                TokenKind::LeftBracket => {
                    cursor.advance();
                    self.access(cursor, &name)
                }
                _ => Ok(Evaluated::Value(self.variables.lookup(&name)?.clone())),
            },
            _ => Err(cursor.invalid()),
        }
    }

    // `name(args)`: arguments are full sub-expressions, so nested calls with
    // commas split correctly.
    fn call(&mut self, cursor: &mut Cursor<'_>, name: &str) -> Result<Evaluated, RuntimeError> {
        let mut args = Vec::new();
        if !cursor.eat(&TokenKind::RightParen) {
            loop {
                let arg = self.expression(cursor)?;
                let number = arg.as_number().ok_or_else(|| {
                    RuntimeError::type_mismatch(name, "number", arg.type_name())
                })?;
                args.push(number);
                if cursor.eat(&TokenKind::Comma) {
                    continue;
                }
                cursor.expect(&TokenKind::RightParen)?;
                break;
            }
        }

        let functions = self.functions;
        let value = functions.evaluate_lambda_or_function(name, &args, |body| self.nested(body))?;
        Ok(Evaluated::Number(value))
    }

    // `name[index]` on arrays, `name["key"]` on maps.
    fn access(&mut self, cursor: &mut Cursor<'_>, name: &str) -> Result<Evaluated, RuntimeError> {
        let negative = cursor.eat(&TokenKind::Minus);
        let result = match cursor.advance() {
            TokenKind::Number(index) if index.fract() == 0.0 && index <= i64::MAX as f64 => {
                let index = if negative { -(index as i64) } else { index as i64 };
                Evaluated::Text(self.variables.index(name, index)?.to_string())
            }
            TokenKind::String(key) if !negative => {
                Evaluated::Value(Value::Integer(self.variables.key(name, &key)?))
            }
            _ => return Err(cursor.invalid()),
        };
        cursor.expect(&TokenKind::RightBracket)?;
        Ok(result)
    }

    fn nested(&mut self, body: &str) -> Result<f64, RuntimeError> {
        if self.depth >= self.max_depth {
            warn!(depth = self.depth, "lambda recursion limit reached");
            return Err(RuntimeError::RecursionLimit(self.max_depth));
        }
        self.depth += 1;
        let result = self.evaluate_number(body);
        self.depth -= 1;
        result
    }
}

fn numeric_operands(
    cursor: &Cursor<'_>,
    left: &Evaluated,
    right: &Evaluated,
) -> Result<(f64, f64), RuntimeError> {
    let a = left
        .as_number()
        .ok_or_else(|| RuntimeError::type_mismatch(cursor.fragment, "number", left.type_name()))?;
    let b = right
        .as_number()
        .ok_or_else(|| RuntimeError::type_mismatch(cursor.fragment, "number", right.type_name()))?;
    Ok((a, b))
}

/// A fragment that is exactly one double-quoted string.
fn string_literal(fragment: &str) -> Option<&str> {
    let inner = fragment.strip_prefix('"')?.strip_suffix('"')?;
    (!inner.contains('"')).then_some(inner)
}


//=====================================================
// End of file
//=====================================================
