//! Evaluation sessions.

use tracing::debug;

use crate::converter::convert;
use crate::environment::Environment;
use crate::error::Result;
use crate::evaluator;
use crate::lexer::tokenize;
use crate::operand::Operand;
use crate::token::Token;

/// Run the whole pipeline on `input` against `env`.
///
/// A result that is a bare variable must be bound; it is read here so that
/// evaluating an unknown name reports an error instead of echoing it.
pub fn evaluate(input: &str, env: &mut Environment) -> Result<Option<Operand>> {
    debug!(input, "evaluating expression");
    let result = evaluator::evaluate(convert(tokenize(input)?)?, env)?;
    if let Some(operand @ Operand::Variable(_)) = &result {
        operand.value(env)?;
    }
    Ok(result)
}

/// Lex and convert `input` without evaluating it.
pub fn to_postfix(input: &str) -> Result<Vec<Token>> {
    convert(tokenize(input)?)
}

/// One evaluation session with its own variable bindings.
///
/// Sessions never share state, so several can run side by side.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    env: Environment,
}

impl Calculator {
    /// Create a session whose environment holds the named constants.
    pub fn new() -> Self {
        Self::with_environment(Environment::new())
    }

    pub fn with_environment(env: Environment) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn evaluate(&mut self, input: &str) -> Result<Option<Operand>> {
        evaluate(input, &mut self.env)
    }

    /// Evaluate `input` and format the result for display.
    ///
    /// Literals print with two decimals and bound variables as `x = 1.00`.
    pub fn evaluate_to_string(&mut self, input: &str) -> Result<Option<String>> {
        let result = self.evaluate(input)?;
        Ok(result.map(|operand| operand.display(&self.env).to_string()))
    }

    /// Evaluate `input` down to a plain number.
    pub fn evaluate_to_value(&mut self, input: &str) -> Result<Option<f64>> {
        match self.evaluate(input)? {
            Some(operand) => operand.value(&self.env).map(Some),
            None => Ok(None),
        }
    }
}
