//! Stack machine over postfix token sequences.

use crate::environment::Environment;
use crate::error::{Error, EvaluationError, Result};
use crate::operand::Operand;
use crate::token::Token;

/// Evaluate a postfix sequence, consuming it.
///
/// Returns `None` for an empty sequence. Operators receive their operands in
/// the order they were written, even though they come off the stack in
/// reverse.
pub fn evaluate(tokens: Vec<Token>, env: &mut Environment) -> Result<Option<Operand>> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut stack: Vec<Operand> = Vec::new();
    for token in tokens {
        match token {
            Token::Operand(operand) => stack.push(operand),
            Token::Operator(op) => {
                let operands = take_operands(&mut stack, op.arity(), op.symbol())?;
                stack.push(op.evaluate(&operands, env)?);
            }
            other => {
                return Err(EvaluationError::UnexpectedToken(other.to_string()).into());
            }
        }
    }

    single_result(stack).map(Some)
}

/// Rebuild a fully parenthesized infix string from a postfix sequence.
///
/// Nothing is evaluated and no variables are read.
pub fn render_infix(tokens: &[Token]) -> Result<Option<String>> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut stack: Vec<String> = Vec::new();
    for token in tokens {
        match token {
            Token::Operand(operand) => stack.push(operand.to_string()),
            Token::Operator(op) => {
                let operands = take_operands(&mut stack, op.arity(), op.symbol())?;
                let rendered = op.format_with(operands.as_slice())?;
                if op.is_function() {
                    stack.push(rendered);
                } else {
                    stack.push(format!("({})", rendered));
                }
            }
            other => {
                return Err(EvaluationError::UnexpectedToken(other.to_string()).into());
            }
        }
    }

    let rendered = single_result(stack)?;
    // drop the redundant outer pair
    let rendered = match rendered.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) if !tokens.last().is_some_and(is_function_token) => inner.to_string(),
        _ => rendered,
    };
    Ok(Some(rendered))
}

fn is_function_token(token: &Token) -> bool {
    token.as_operator().is_some_and(|op| op.is_function())
}

/// Pop the top `arity` items, keeping them in left-to-right order.
fn take_operands<T>(stack: &mut Vec<T>, arity: usize, symbol: &str) -> Result<Vec<T>> {
    if stack.len() < arity {
        return Err(Error::Arity {
            operator: symbol.to_string(),
            expected: arity,
            actual: stack.len(),
        });
    }
    Ok(stack.split_off(stack.len() - arity))
}

fn single_result<T>(mut stack: Vec<T>) -> Result<T> {
    match stack.len() {
        0 => Err(EvaluationError::NoOperands.into()),
        1 => stack.pop().ok_or_else(|| EvaluationError::NoOperands.into()),
        _ => Err(EvaluationError::TooManyOperands.into()),
    }
}
