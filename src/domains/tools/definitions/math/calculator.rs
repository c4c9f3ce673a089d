//! Arithmetic expression evaluator.
//!
//! Input is first reduced to digits, `+ - * / % ^ ( ) .` and whitespace, then
//! parsed with the usual precedence ladder:
//!
//! ```text
//! xor      := additive ('^' additive)*
//! additive := term (('+' | '-') term)*
//! term     := unary (('*' | '/' | '%') unary)*
//! unary    := ('+' | '-')+ primary | power
//! power    := primary ('**' unary)?
//! primary  := number | '(' xor ')'
//! ```
//!
//! `^` is a bitwise xor over 32-bit integers. A signed operand directly left
//! of `**` is ambiguous and rejected, as are `++` and `--`.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{grouped, number, to_int32};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition::new(
        "calculator",
        CATEGORY,
        "Evaluate mathematical expressions safely",
        json!({
            "type": "object",
            "properties": {
                "expression": { "type": "string", "description": "Math expression, e.g. '2 + 2 * 10'" }
            },
            "required": ["expression"]
        }),
        calculator,
    )]
}

#[derive(Debug, Deserialize)]
struct CalculatorParams {
    expression: String,
}

fn calculator(params: CalculatorParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let sanitized: String = params
        .expression
        .chars()
        .filter(|c| c.is_ascii_digit() || "+-*/().%^".contains(*c) || c.is_whitespace())
        .collect();

    match evaluate(&sanitized) {
        Some(result) => Ok(json!({
            "expression": params.expression,
            "result": number(result),
            "formatted": grouped(result),
        })),
        None => Ok(json!({
            "expression": params.expression,
            "error": "Invalid expression",
        })),
    }
}

/// Evaluate a sanitized expression; `None` on any syntax error.
pub(crate) fn evaluate(source: &str) -> Option<f64> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.xor()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    Some(value)
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Pow,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
}

fn tokenize(source: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i < chars.len() && chars[i] == '.' {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                if literal == "." {
                    return None;
                }
                // Legacy octal-looking literals such as `07` are not accepted.
                let int_part = literal.split('.').next().unwrap_or_default();
                if int_part.len() > 1 && int_part.starts_with('0') {
                    return None;
                }
                // A number may not run straight into another literal (`1.2.3`).
                if chars.get(i).is_some_and(|c| c.is_ascii_digit() || *c == '.') {
                    return None;
                }
                tokens.push(Token::Num(literal.parse().ok()?));
            }
            '+' | '-' if next == Some(c) => return None,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' if next == Some('*') => {
                tokens.push(Token::Pow);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ => return None,
        }
    }
    Some(tokens)
}

// ============================================================================
// Parser
// ============================================================================

/// Deepest nesting of parentheses, unary signs and exponents accepted.
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Run `parse` one nesting level deeper, failing past `MAX_DEPTH`.
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Option<f64>) -> Option<f64> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn xor(&mut self) -> Option<f64> {
        let mut value = self.additive()?;
        while self.eat(Token::Caret) {
            let rhs = self.additive()?;
            value = f64::from(to_int32(value) ^ to_int32(rhs));
        }
        Some(value)
    }

    fn additive(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat(Token::Plus) {
                value += self.term()?;
            } else if self.eat(Token::Minus) {
                value -= self.term()?;
            } else {
                return Some(value);
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        loop {
            if self.eat(Token::Star) {
                value *= self.unary()?;
            } else if self.eat(Token::Slash) {
                value /= self.unary()?;
            } else if self.eat(Token::Percent) {
                value %= self.unary()?;
            } else {
                return Some(value);
            }
        }
    }

    fn unary(&mut self) -> Option<f64> {
        if !matches!(self.peek(), Some(Token::Plus | Token::Minus)) {
            return self.power();
        }
        let value = self.signed()?;
        if self.peek() == Some(Token::Pow) {
            return None;
        }
        Some(value)
    }

    fn signed(&mut self) -> Option<f64> {
        if self.eat(Token::Minus) {
            return Some(-self.nested(Self::signed)?);
        }
        if self.eat(Token::Plus) {
            return self.nested(Self::signed);
        }
        self.primary()
    }

    fn power(&mut self) -> Option<f64> {
        let base = self.primary()?;
        if self.eat(Token::Pow) {
            let exponent = self.nested(Self::unary)?;
            return Some(base.powf(exponent));
        }
        Some(base)
    }

    fn primary(&mut self) -> Option<f64> {
        match self.peek()? {
            Token::Num(value) => {
                self.pos += 1;
                Some(value)
            }
            Token::LParen => {
                self.pos += 1;
                let value = self.nested(Self::xor)?;
                self.eat(Token::RParen).then_some(value)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
