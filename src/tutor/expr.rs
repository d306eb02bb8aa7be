//! Arithmetic expression evaluator for the tutor.
//!
//! Numbers, `+ - * /`, unary minus and parentheses. Input is tokenized and
//! parsed; nothing is ever executed.

use std::fmt;
use thiserror::Error;

use crate::utils::FoodScoutError;

/// Deepest run of parentheses and unary signs the parser will descend into
pub const MAX_DEPTH: usize = 256;

/// Evaluation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExprError {
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Expression nested too deeply (limit {0})")]
    TooDeep(usize),
}

impl From<ExprError> for FoodScoutError {
    fn from(err: ExprError) -> Self {
        FoodScoutError::Tutor(err.to_string())
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    pub fn apply(self, left: f64, right: f64) -> Result<f64, ExprError> {
        match self {
            Self::Add => Ok(left + right),
            Self::Sub => Ok(left - right),
            Self::Mul => Ok(left * right),
            Self::Div if right == 0.0 => Err(ExprError::DivisionByZero),
            Self::Div => Ok(left / right),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Token types for lexing.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Op(Operator),
    LParen,
    RParen,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", format_number(*n)),
            Token::Op(op) => write!(f, "{}", op),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| ExprError::InvalidNumber(text.clone()))?;
            tokens.push(Token::Number(value));
            continue;
        }

        let token = match c {
            '+' => Token::Op(Operator::Add),
            '-' => Token::Op(Operator::Sub),
            '*' => Token::Op(Operator::Mul),
            '/' => Token::Op(Operator::Div),
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(ExprError::UnexpectedChar(other)),
        };
        tokens.push(token);
        i += 1;
    }

    tokens.push(Token::Eof);
    Ok(tokens)
}

/// Evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);
    let value = parser.parse_additive()?;

    match parser.current() {
        Token::Eof => Ok(value),
        other => Err(ExprError::UnexpectedToken(other.to_string())),
    }
}

/// Render a result the way a person writes it: `6`, not `6.0`
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        // Avoids printing "-0"
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn parse_additive(&mut self) -> Result<f64, ExprError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current() {
                Token::Op(op @ (Operator::Add | Operator::Sub)) => *op,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = op.apply(left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<f64, ExprError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current() {
                Token::Op(op @ (Operator::Mul | Operator::Div)) => *op,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = op.apply(left, right)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<f64, ExprError> {
        let negate = match self.current() {
            Token::Op(Operator::Sub) => true,
            Token::Op(Operator::Add) => false,
            _ => return self.parse_primary(),
        };
        self.advance();

        self.descend()?;
        let value = self.parse_unary()?;
        self.ascend();

        Ok(if negate { -value } else { value })
    }

    fn parse_primary(&mut self) -> Result<f64, ExprError> {
        match self.current().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(n)
            }
            Token::LParen => {
                self.advance();
                self.descend()?;
                let value = self.parse_additive()?;
                self.ascend();
                match self.current() {
                    Token::RParen => {
                        self.advance();
                        Ok(value)
                    }
                    Token::Eof => Err(ExprError::UnexpectedEnd),
                    other => Err(ExprError::UnexpectedToken(other.to_string())),
                }
            }
            Token::Eof => Err(ExprError::UnexpectedEnd),
            other => Err(ExprError::UnexpectedToken(other.to_string())),
        }
    }
}
