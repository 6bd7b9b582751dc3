//! Shunt Core Library
//!
//! This crate parses infix arithmetic expressions and evaluates them through
//! three stages: lexing, shunting-yard conversion to postfix, and postfix
//! evaluation against a caller-owned variable environment.

pub mod calculator;
pub mod converter;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod operand;
pub mod operator;
pub mod token;

pub use calculator::{evaluate, to_postfix, Calculator};
pub use environment::Environment;
pub use error::{ConversionError, Error, EvaluationError, ParenthesesError, Result};
pub use evaluator::render_infix;
pub use lexer::{normalize_signs, tokenize, Lexer};
pub use operand::Operand;
pub use operator::{BinaryOperator, Function, Operator, Priority};
pub use token::Token;
