//=====================================================
// File: eval/tokenizer.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Tokenizer for substituted expression fragments
// Objective: Split a placeholder or lambda body into numbers, strings,
//            identifiers, operators and delimiters
//=====================================================

use crate::interpreter::RuntimeError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    String(String),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Eof,
}

pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Vec<char>,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<TokenKind>, RuntimeError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.position += 1;
                continue;
            }
            let token = if ch.is_ascii_digit()
                || (ch == '.' && self.peek_char().is_some_and(|c| c.is_ascii_digit()))
            {
                self.handle_number()?
            } else if ch.is_alphabetic() || ch == '_' {
                self.handle_identifier()
            } else if ch == '"' {
                self.handle_string()?
            } else {
                self.position += 1;
                match ch {
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '%' => TokenKind::Percent,
                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    '[' => TokenKind::LeftBracket,
                    ']' => TokenKind::RightBracket,
                    ',' => TokenKind::Comma,
                    _ => return Err(self.invalid()),
                }
            };
            tokens.push(token);
        }
        tokens.push(TokenKind::Eof);
        Ok(tokens)
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn invalid(&self) -> RuntimeError {
        RuntimeError::InvalidExpression(self.input.to_string())
    }

    fn handle_number(&mut self) -> Result<TokenKind, RuntimeError> {
        let mut number = String::new();
        let mut seen_dot = false;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                number.push(ch);
            } else {
                break;
            }
            self.position += 1;
        }

        // Exponent only when a digit follows, so `2e` stays an error.
        if matches!(self.current_char(), Some('e' | 'E')) {
            let mut lookahead = self.position + 1;
            if matches!(self.chars.get(lookahead), Some('+' | '-')) {
                lookahead += 1;
            }
            if self.chars.get(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                number.extend(&self.chars[self.position..lookahead]);
                self.position = lookahead;
                while let Some(ch) = self.current_char().filter(|c| c.is_ascii_digit()) {
                    number.push(ch);
                    self.position += 1;
                }
            }
        }

        if self
            .current_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            return Err(self.invalid());
        }

        number
            .parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| self.invalid())
    }

    fn handle_identifier(&mut self) -> TokenKind {
        let start = self.position;
        while self
            .current_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.position += 1;
        }
        TokenKind::Identifier(self.chars[start..self.position].iter().collect())
    }

    fn handle_string(&mut self) -> Result<TokenKind, RuntimeError> {
        self.position += 1;
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch == '"' {
                let text = self.chars[start..self.position].iter().collect();
                self.position += 1;
                return Ok(TokenKind::String(text));
            }
            self.position += 1;
        }
        Err(self.invalid())
    }
}


//=====================================================
// End of file
//=====================================================
