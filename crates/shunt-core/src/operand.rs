//! Operands: numeric literals and variable references.

use std::fmt;

use crate::environment::Environment;
use crate::error::{EvaluationError, Result};

/// A value-producing token.
///
/// Operands are immutable. Every operation returns a new [`Operand::Real`];
/// a [`Operand::Variable`] looks its value up in the environment each time it
/// is used and then defers to the `Real` behaviour.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Real(f64),
    Variable(String),
}

impl Operand {
    pub fn variable(symbol: impl Into<String>) -> Self {
        Operand::Variable(symbol.into())
    }

    /// The numeric value of this operand.
    ///
    /// Fails for a variable without a binding; unset variables are not zero.
    pub fn value(&self, env: &Environment) -> Result<f64> {
        match self {
            Operand::Real(value) => Ok(*value),
            Operand::Variable(symbol) => env
                .get(symbol)
                .ok_or_else(|| EvaluationError::UnboundVariable(symbol.clone()).into()),
        }
    }

    /// The variable name, if this operand is a variable reference.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Operand::Variable(symbol) => Some(symbol),
            Operand::Real(_) => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Operand::Variable(_))
    }

    fn resolved(&self, env: &Environment) -> Result<Operand> {
        self.value(env).map(Operand::Real)
    }

    fn unary(
        &self,
        env: &Environment,
        op: impl FnOnce(f64) -> Result<f64, EvaluationError>,
    ) -> Result<Operand> {
        match self {
            Operand::Real(value) => Ok(Operand::Real(op(*value)?)),
            Operand::Variable(_) => self.resolved(env)?.unary(env, op),
        }
    }

    fn binary(
        &self,
        other: &Operand,
        env: &Environment,
        op: impl FnOnce(f64, f64) -> f64,
    ) -> Result<Operand> {
        match self {
            Operand::Real(value) => Ok(Operand::Real(op(*value, other.value(env)?))),
            Operand::Variable(_) => self.resolved(env)?.binary(other, env, op),
        }
    }

    pub fn add(&self, addend: &Operand, env: &Environment) -> Result<Operand> {
        self.binary(addend, env, |a, b| a + b)
    }

    pub fn multiply(&self, multiplicand: &Operand, env: &Environment) -> Result<Operand> {
        self.binary(multiplicand, env, |a, b| a * b)
    }

    /// Division follows IEEE semantics, so dividing by zero yields an infinity.
    pub fn divide(&self, divisor: &Operand, env: &Environment) -> Result<Operand> {
        self.binary(divisor, env, |a, b| a / b)
    }

    pub fn pow(&self, exponent: &Operand, env: &Environment) -> Result<Operand> {
        self.binary(exponent, env, f64::powf)
    }

    pub fn abs(&self, env: &Environment) -> Result<Operand> {
        self.unary(env, |v| Ok(v.abs()))
    }

    pub fn sqrt(&self, env: &Environment) -> Result<Operand> {
        self.unary(env, |v| {
            if v < 0.0 {
                return Err(EvaluationError::NegativeSquareRoot);
            }
            Ok(v.sqrt())
        })
    }

    pub fn sine(&self, env: &Environment) -> Result<Operand> {
        self.unary(env, |v| Ok(v.sin()))
    }

    pub fn cosine(&self, env: &Environment) -> Result<Operand> {
        self.unary(env, |v| Ok(v.cos()))
    }

    pub fn tangent(&self, env: &Environment) -> Result<Operand> {
        self.unary(env, |v| Ok(v.tan()))
    }

    pub fn exp(&self, env: &Environment) -> Result<Operand> {
        self.unary(env, |v| Ok(v.exp()))
    }

    /// Natural logarithm. Zero maps to negative infinity.
    pub fn log(&self, env: &Environment) -> Result<Operand> {
        self.unary(env, |v| {
            if v < 0.0 {
                return Err(EvaluationError::NegativeLogarithm);
            }
            Ok(v.ln())
        })
    }

    /// Display form that includes the current value of a bound variable.
    pub fn display<'a>(&'a self, env: &'a Environment) -> BoundDisplay<'a> {
        BoundDisplay { operand: self, env }
    }
}

/// Literals print with two decimals, variables print their symbol.
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Real(value) => write!(f, "{:.2}", value),
            Operand::Variable(symbol) => f.write_str(symbol),
        }
    }
}

/// Returned by [`Operand::display`].
pub struct BoundDisplay<'a> {
    operand: &'a Operand,
    env: &'a Environment,
}

impl fmt::Display for BoundDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Operand::Variable(symbol) => match self.env.get(symbol) {
                Some(value) => write!(f, "{} = {:.2}", symbol, value),
                None => f.write_str(symbol),
            },
            real => write!(f, "{}", real),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const EPS: f64 = 1e-12;

    fn real(value: f64) -> Operand {
        Operand::Real(value)
    }

    #[test]
    fn test_real_arithmetic() {
        let env = Environment::empty();
        let a = real(7.5);
        let b = real(-2.0);
        assert_eq!(a.add(&b, &env).unwrap(), real(5.5));
        assert_eq!(a.multiply(&b, &env).unwrap(), real(-15.0));
        assert_eq!(a.divide(&b, &env).unwrap(), real(-3.75));
        assert_eq!(real(2.0).pow(&real(10.0), &env).unwrap(), real(1024.0));
    }

    #[test]
    fn test_divide_by_zero_is_infinite() {
        let env = Environment::empty();
        let result = real(1.0).divide(&real(0.0), &env).unwrap();
        assert_eq!(result.value(&env).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_variable_resolves_on_use() {
        let mut env = Environment::empty();
        let x = Operand::variable("x");
        env.bind("x", 3.0);
        assert_eq!(x.multiply(&real(2.0), &env).unwrap(), real(6.0));
        env.bind("x", 4.0);
        assert_eq!(x.multiply(&real(2.0), &env).unwrap(), real(8.0));
        // right-hand side variables resolve as well
        assert_eq!(real(1.0).add(&x, &env).unwrap(), real(5.0));
    }

    #[test]
    fn test_unbound_variable_fails() {
        let env = Environment::empty();
        let err = Operand::variable("nope").sine(&env).unwrap_err();
        assert_eq!(
            err,
            Error::Evaluation(EvaluationError::UnboundVariable("nope".into()))
        );
    }

    #[test]
    fn test_functions() {
        let env = Environment::new();
        let pi = Operand::variable("pi");
        assert!(pi.sine(&env).unwrap().value(&env).unwrap().abs() < EPS);
        assert!((pi.cosine(&env).unwrap().value(&env).unwrap() + 1.0).abs() < EPS);
        assert!(real(0.0).tangent(&env).unwrap().value(&env).unwrap().abs() < EPS);
        assert_eq!(real(-4.0).abs(&env).unwrap(), real(4.0));
        assert_eq!(real(16.0).sqrt(&env).unwrap(), real(4.0));
        assert_eq!(real(0.0).exp(&env).unwrap(), real(1.0));
        let e = Operand::variable("e");
        assert!((e.log(&env).unwrap().value(&env).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_domain_errors() {
        let env = Environment::empty();
        assert_eq!(
            real(-1.0).sqrt(&env).unwrap_err(),
            Error::Evaluation(EvaluationError::NegativeSquareRoot)
        );
        assert_eq!(
            real(-0.5).log(&env).unwrap_err(),
            Error::Evaluation(EvaluationError::NegativeLogarithm)
        );
        assert_eq!(
            real(0.0).log(&env).unwrap().value(&env).unwrap(),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_display() {
        let mut env = Environment::empty();
        assert_eq!(real(3.14159).to_string(), "3.14");
        assert_eq!(real(-1.0).to_string(), "-1.00");

        let x = Operand::variable("x");
        assert_eq!(x.to_string(), "x");
        assert_eq!(x.display(&env).to_string(), "x");
        env.bind("x", 5.0);
        assert_eq!(x.display(&env).to_string(), "x = 5.00");
        assert_eq!(real(2.5).display(&env).to_string(), "2.50");
    }
}
