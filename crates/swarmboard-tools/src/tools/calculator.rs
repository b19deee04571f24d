//! Calculator tool - Evaluate an arithmetic expression

use super::{parse_params, to_output};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use swarmboard_domain::{Tool, ToolError, ToolSpec};

/// Parameters for the calculator
#[derive(Debug, Deserialize)]
pub struct CalculatorParams {
    /// Expression using `+ - * / % ^`, parentheses and decimal numbers
    pub expression: String,
}

/// Result of an evaluation
#[derive(Debug, Serialize)]
struct CalculatorResult {
    expression: String,
    result: f64,
}

/// Arithmetic evaluator
#[derive(Debug, Clone)]
pub struct Calculator {
    spec: ToolSpec,
}

impl Calculator {
    /// Create the calculator tool
    pub fn new() -> Self {
        let spec = ToolSpec::new(
            "calculator",
            "Evaluate an arithmetic expression such as (2 + 3) * 4 / 5",
            json!({
                "type": "object",
                "properties": {"expression": {"type": "string"}},
                "required": ["expression"]
            }),
        )
        .with_capabilities(["arithmetic"])
        .with_domain("math");
        Self { spec }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for Calculator {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, input: Value) -> Result<Value, ToolError> {
        let params: CalculatorParams = parse_params(input)?;
        let result = evaluate(&params.expression)?;
        to_output(CalculatorResult {
            expression: params.expression,
            result,
        })
    }
}

/// Evaluate an expression
///
/// Grammar, lowest precedence first:
///
/// ```text
/// expr   = term (('+' | '-') term)*
/// term   = power (('*' | '/' | '%') power)*
/// power  = unary ('^' power)?
/// unary  = '-' unary | atom
/// atom   = number | '(' expr ')'
/// ```
fn evaluate(expression: &str) -> Result<f64, ToolError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(ToolError::InvalidInput("empty expression".to_string()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(ToolError::InvalidInput(format!(
            "unexpected token at position {}",
            parser.pos
        )));
    }
    if !value.is_finite() {
        return Err(ToolError::ExecutionFailed("result is not a finite number".to_string()));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
    Open,
    Close,
}

fn tokenize(expression: &str) -> Result<Vec<Token>, ToolError> {
    let mut tokens = Vec::new();
    let mut chars = expression.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(idx, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = idx + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &expression[start..end];
                let number = literal
                    .parse()
                    .map_err(|_| ToolError::InvalidInput(format!("invalid number `{}`", literal)))?;
                tokens.push(Token::Number(number));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ')' => {
                tokens.push(Token::Close);
                chars.next();
            }
            other => {
                return Err(ToolError::InvalidInput(format!("unsupported character `{}`", other)));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn expr(&mut self) -> Result<f64, ToolError> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ToolError> {
        let mut value = self.power()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek() {
            self.pos += 1;
            let rhs = self.power()?;
            if op != '*' && rhs == 0.0 {
                return Err(ToolError::ExecutionFailed("division by zero".to_string()));
            }
            value = match op {
                '*' => value * rhs,
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn power(&mut self) -> Result<f64, ToolError> {
        let base = self.unary()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.power()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<f64, ToolError> {
        if let Some(Token::Op('-')) = self.peek() {
            self.pos += 1;
            return Ok(-self.unary()?);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<f64, ToolError> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.pos += 1;
                Ok(n)
            }
            Some(Token::Open) => {
                self.pos += 1;
                let value = self.expr()?;
                if self.peek() != Some(Token::Close) {
                    return Err(ToolError::InvalidInput("missing closing parenthesis".to_string()));
                }
                self.pos += 1;
                Ok(value)
            }
            _ => Err(ToolError::InvalidInput(format!(
                "expected a number or `(` at position {}",
                self.pos
            ))),
        }
    }
}
