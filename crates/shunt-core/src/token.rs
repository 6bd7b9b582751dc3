//! Tokens shared by the lexer, converter and evaluator.

use std::fmt;

use crate::operand::Operand;
use crate::operator::{BinaryOperator, Operator};

/// An atomic lexical unit.
///
/// The lexer produces tokens in infix order; the converter only reorders
/// them and never changes their content.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Operand(Operand),
    Operator(Operator),
    LeftParen,
    RightParen,
    ArgumentSeparator,
}

impl Token {
    pub fn real(value: f64) -> Self {
        Token::Operand(Operand::Real(value))
    }

    pub fn variable(symbol: impl Into<String>) -> Self {
        Token::Operand(Operand::variable(symbol))
    }

    pub fn binary(op: BinaryOperator) -> Self {
        Token::Operator(Operator::Binary(op))
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            Token::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn is_left_paren(&self) -> bool {
        matches!(self, Token::LeftParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(operand) => write!(f, "{}", operand),
            Token::Operator(op) => write!(f, "{}", op),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::ArgumentSeparator => f.write_str(","),
        }
    }
}

/// Space-separated rendering of a token sequence, e.g. `3.00 4.00 +`.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
