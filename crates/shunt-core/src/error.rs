//! Error types for every stage of the evaluation pipeline.
//!
//! Each variant is also a [`miette::Diagnostic`] with a stable code, so
//! callers can report errors uniformly without matching on them.

use miette::Diagnostic;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any failure raised while lexing, converting or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum Error {
    #[error("unrecognised character encountered while parsing: {0}")]
    #[diagnostic(
        code(shunt::lex::unrecognized_character),
        help("expressions may contain digits, letters, '_', '.', '+ - * / ^ =', parentheses and ','")
    )]
    UnrecognizedCharacter(char),

    #[error("unrecognised operation: {0}")]
    #[diagnostic(
        code(shunt::lex::unrecognized_operator),
        help("type `functions` on the command line to list the supported functions")
    )]
    UnrecognizedOperator(String),

    #[error("invalid numeric literal: {0}")]
    #[diagnostic(code(shunt::lex::invalid_number))]
    InvalidNumber(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ImproperParentheses(#[from] ParenthesesError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Conversion(#[from] ConversionError),

    #[error("the number of operands expected for {operator} is {expected}, found {actual}")]
    #[diagnostic(code(shunt::eval::arity))]
    Arity {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Unbalanced, misordered or empty parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
pub enum ParenthesesError {
    #[error("closing parenthesis occurs before opening parenthesis")]
    #[diagnostic(code(shunt::lex::parentheses))]
    ClosedBeforeOpened,

    #[error("empty parentheses pair")]
    #[diagnostic(code(shunt::lex::parentheses))]
    Empty,

    #[error("unbalanced parentheses, closing parenthesis missing")]
    #[diagnostic(code(shunt::lex::parentheses))]
    Unclosed,

    #[error("mismatched parentheses, missing opening parenthesis")]
    #[diagnostic(code(shunt::convert::parentheses))]
    MissingOpening,

    #[error("mismatched parentheses")]
    #[diagnostic(code(shunt::convert::parentheses))]
    Mismatched,
}

/// Structural problems found while reordering tokens into postfix form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
pub enum ConversionError {
    #[error("either argument separator (,) is misplaced, or parentheses are unbalanced")]
    #[diagnostic(
        code(shunt::convert::misplaced_separator),
        help("',' may only appear inside the argument list of a function")
    )]
    MisplacedSeparator,
}

/// Failures of the math itself or of a malformed postfix sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EvaluationError {
    #[error("cannot calculate square root of a negative real number")]
    #[diagnostic(code(shunt::eval::domain))]
    NegativeSquareRoot,

    #[error("cannot calculate logarithm of a negative real number")]
    #[diagnostic(code(shunt::eval::domain))]
    NegativeLogarithm,

    #[error("variable {0} is not initialized")]
    #[diagnostic(
        code(shunt::eval::unbound_variable),
        help("assign a value first, e.g. `x = 1`")
    )]
    UnboundVariable(String),

    #[error("assignment only works for variables")]
    #[diagnostic(code(shunt::eval::assignment))]
    AssignmentToNonVariable,

    #[error("too many operands, there might be an operator (or more) missing")]
    #[diagnostic(code(shunt::eval::too_many_operands))]
    TooManyOperands,

    #[error("internal error, no operands left on the stack")]
    #[diagnostic(code(shunt::eval::no_operands))]
    NoOperands,

    #[error("unexpected token in postfix sequence: {0}")]
    #[diagnostic(code(shunt::eval::unexpected_token))]
    UnexpectedToken(String),
}
