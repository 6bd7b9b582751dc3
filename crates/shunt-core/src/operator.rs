//! Binary operators and prefix functions.

use std::fmt;

use tracing::debug;

use crate::environment::Environment;
use crate::error::{Error, EvaluationError, Result};
use crate::operand::Operand;

/// Precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Assignment,
    Additive,
    Multiplicative,
    Exponential,
    Functional,
}

/// Infix operators taking two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Multiply,
    Divide,
    Power,
    Assign,
}

/// Prefix functions taking one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Abs,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
}

/// An operator token: either an infix binary operator or a prefix function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Binary(BinaryOperator),
    Function(Function),
}

const ALL: [Operator; 12] = [
    Operator::Binary(BinaryOperator::Assign),
    Operator::Binary(BinaryOperator::Add),
    Operator::Binary(BinaryOperator::Multiply),
    Operator::Binary(BinaryOperator::Divide),
    Operator::Binary(BinaryOperator::Power),
    Operator::Function(Function::Abs),
    Operator::Function(Function::Sqrt),
    Operator::Function(Function::Sin),
    Operator::Function(Function::Cos),
    Operator::Function(Function::Tan),
    Operator::Function(Function::Exp),
    Operator::Function(Function::Log),
];

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Assign => "=",
        }
    }

    pub fn priority(self) -> Priority {
        match self {
            BinaryOperator::Assign => Priority::Assignment,
            BinaryOperator::Add => Priority::Additive,
            BinaryOperator::Multiply | BinaryOperator::Divide => Priority::Multiplicative,
            BinaryOperator::Power => Priority::Exponential,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BinaryOperator::Add => "Addition",
            BinaryOperator::Multiply => "Multiplication",
            BinaryOperator::Divide => "Division",
            BinaryOperator::Power => "Exponentiation",
            BinaryOperator::Assign => "Assignment to a variable",
        }
    }

    fn apply(self, lhs: &Operand, rhs: &Operand, env: &mut Environment) -> Result<Operand> {
        match self {
            BinaryOperator::Add => lhs.add(rhs, env),
            BinaryOperator::Multiply => lhs.multiply(rhs, env),
            BinaryOperator::Divide => lhs.divide(rhs, env),
            BinaryOperator::Power => lhs.pow(rhs, env),
            BinaryOperator::Assign => {
                let Some(symbol) = lhs.symbol() else {
                    return Err(EvaluationError::AssignmentToNonVariable.into());
                };
                let value = rhs.value(env)?;
                debug!(symbol, value, "binding variable");
                env.bind(symbol, value);
                Ok(Operand::Real(value))
            }
        }
    }
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Abs => "abs",
            Function::Sqrt => "sqrt",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Exp => "exp",
            Function::Log => "log",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Function::Abs => "Absolute value",
            Function::Sqrt => "Square root",
            Function::Sin => "Sine",
            Function::Cos => "Cosine",
            Function::Tan => "Tangent",
            Function::Exp => "Exponential",
            Function::Log => "Natural logarithm",
        }
    }

    fn apply(self, operand: &Operand, env: &Environment) -> Result<Operand> {
        match self {
            Function::Abs => operand.abs(env),
            Function::Sqrt => operand.sqrt(env),
            Function::Sin => operand.sine(env),
            Function::Cos => operand.cosine(env),
            Function::Tan => operand.tangent(env),
            Function::Exp => operand.exp(env),
            Function::Log => operand.log(env),
        }
    }
}

impl Operator {
    /// Every known operator, binary operators first.
    pub fn all() -> &'static [Operator] {
        &ALL
    }

    /// Find the operator or function spelled `symbol`.
    pub fn lookup(symbol: &str) -> Option<Operator> {
        ALL.iter().copied().find(|op| op.symbol() == symbol)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Binary(op) => op.symbol(),
            Operator::Function(function) => function.name(),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Operator::Binary(_) => 2,
            Operator::Function(_) => 1,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Operator::Binary(op) => op.priority(),
            Operator::Function(_) => Priority::Functional,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operator::Binary(op) => op.description(),
            Operator::Function(function) => function.description(),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Operator::Function(_))
    }

    /// Fail unless exactly `count` operands were supplied.
    pub fn check(&self, count: usize) -> Result<()> {
        if count != self.arity() {
            return Err(Error::Arity {
                operator: self.symbol().to_string(),
                expected: self.arity(),
                actual: count,
            });
        }
        Ok(())
    }

    /// Apply the operator to `operands`, given in left-to-right order.
    ///
    /// Only assignment writes to `env`.
    pub fn evaluate(&self, operands: &[Operand], env: &mut Environment) -> Result<Operand> {
        self.check(operands.len())?;
        match (self, operands) {
            (Operator::Binary(op), [lhs, rhs]) => op.apply(lhs, rhs, env),
            (Operator::Function(function), [operand]) => function.apply(operand, env),
            _ => unreachable!("arity checked above"),
        }
    }

    /// Render an application of this operator: `a + b` or `(sin a)`.
    pub fn format_with<T: fmt::Display>(&self, operands: &[T]) -> Result<String> {
        self.check(operands.len())?;
        if let [lhs, rhs] = operands {
            return Ok(format!("{} {} {}", lhs, self.symbol(), rhs));
        }
        let mut rendered = format!("({}", self.symbol());
        for operand in operands {
            rendered.push(' ');
            rendered.push_str(&operand.to_string());
        }
        rendered.push(')');
        Ok(rendered)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
