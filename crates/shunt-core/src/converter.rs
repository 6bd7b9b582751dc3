//! Infix to postfix conversion (shunting-yard).

use tracing::debug;

use crate::error::{ConversionError, ParenthesesError, Result};
use crate::token::{render, Token};

/// Reorder infix `tokens` into postfix order.
///
/// Functions are pushed without any precedence comparison and are released
/// as soon as their closing parenthesis is seen. A binary operator only pops
/// operators of strictly greater priority, so operators of equal priority
/// are emitted in reverse order of appearance.
pub fn convert(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Operand(_) => output.push(token),
            Token::Operator(op) if op.is_function() => stack.push(token),
            Token::Operator(op) => {
                while let Some(top) = stack.last().and_then(Token::as_operator) {
                    if top.priority() <= op.priority() {
                        break;
                    }
                    output.extend(stack.pop());
                }
                stack.push(token);
            }
            Token::ArgumentSeparator => {
                pop_until_left_paren(&mut stack, &mut output)
                    .ok_or(ConversionError::MisplacedSeparator)?;
            }
            Token::LeftParen => stack.push(token),
            Token::RightParen => {
                pop_until_left_paren(&mut stack, &mut output)
                    .ok_or(ParenthesesError::MissingOpening)?;
                stack.pop();
                // the argument list of a function just closed
                if stack.last().and_then(Token::as_operator).is_some_and(|op| op.is_function()) {
                    output.extend(stack.pop());
                }
            }
        }
    }

    while let Some(token) = stack.pop() {
        if matches!(token, Token::LeftParen | Token::RightParen) {
            return Err(ParenthesesError::Mismatched.into());
        }
        output.push(token);
    }

    debug!(postfix = %render(&output), "converted to postfix");
    Ok(output)
}

/// Move operators to `output` until a `(` is on top of `stack`.
///
/// Returns `None` if the stack ran empty first. The `(` itself stays.
fn pop_until_left_paren(stack: &mut Vec<Token>, output: &mut Vec<Token>) -> Option<()> {
    loop {
        match stack.last() {
            None => return None,
            Some(Token::LeftParen) => return Some(()),
            Some(_) => output.extend(stack.pop()),
        }
    }
}
