//! Lexer for infix expressions.
//!
//! Lexing happens in two passes. [`normalize_signs`] first rewrites every
//! minus sign textually, then [`Lexer`] scans the result with `logos` and
//! assembles [`Token`]s, inserting implicit multiplications and validating
//! parentheses on the way.

use std::sync::LazyLock;

use logos::Logos;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::{Error, ParenthesesError, Result};
use crate::operand::Operand;
use crate::operator::{BinaryOperator, Operator};
use crate::token::Token;

static OPEN_PLUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\+").expect("static pattern compiles"));
static LEADING_PLUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\+").expect("static pattern compiles"));

/// Raw lexeme kinds recognised in normalized input.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"\s+")]
pub enum Lexeme {
    // Numeric runs; '-' only survives normalization as part of "-1"
    #[regex(r"[0-9.\-]+")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[token("+")]
    Plus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("^")]
    Caret,

    #[token("=")]
    Equals,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,
}

/// Rewrite subtraction and negation as addition of a negated product.
///
/// Every `-` becomes `+-1*`, a `+` right after `(` is dropped, and so is a
/// leading `+`. The pass is purely textual:
///
/// * `3-2` becomes `3+-1*2`
/// * `-x` becomes `-1*x`
/// * `(-x)` becomes `(-1*x)`
/// * `2^-1` becomes `2^+-1*1`
pub fn normalize_signs(input: &str) -> String {
    let rewritten = input.replace('-', "+-1*");
    let rewritten = OPEN_PLUS.replace_all(&rewritten, "(");
    LEADING_PLUS.replace(&rewritten, "").into_owned()
}

/// Normalize and tokenize `input`.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let normalized = normalize_signs(input);
    debug!(%normalized, "normalized input");
    Lexer::new(&normalized).tokenize()
}

/// Token assembler over already normalized source.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, Lexeme>,
    tokens: Vec<Token>,
    /// An identifier is a function name if `(` follows, a variable otherwise.
    pending_identifier: Option<&'a str>,
    depth: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: Lexeme::lexer(source),
            tokens: Vec::new(),
            pending_identifier: None,
            depth: 0,
        }
    }

    /// Consume the source and return the tokens in infix order.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        while let Some(next) = self.inner.next() {
            let text = self.inner.slice();
            let Ok(lexeme) = next else {
                let ch = text.chars().next().unwrap_or_default();
                return Err(Error::UnrecognizedCharacter(ch));
            };

            if lexeme != Lexeme::LParen {
                self.flush_identifier();
            }

            match lexeme {
                Lexeme::Number => {
                    let value = text
                        .parse::<f64>()
                        .map_err(|_| Error::InvalidNumber(text.to_string()))?;
                    self.push(Token::real(value));
                }
                Lexeme::Identifier => {
                    // 2x => 2 * x
                    if self.last_is_literal() {
                        self.push(Token::binary(BinaryOperator::Multiply));
                    }
                    self.pending_identifier = Some(text);
                }
                Lexeme::Plus => {
                    // unary plus, e.g. from "2*-3" => "2*+-1*3"
                    if !self.expects_operand() {
                        self.push(Token::binary(BinaryOperator::Add));
                    }
                }
                Lexeme::Star => self.push(Token::binary(BinaryOperator::Multiply)),
                Lexeme::Slash => self.push(Token::binary(BinaryOperator::Divide)),
                Lexeme::Caret => self.push(Token::binary(BinaryOperator::Power)),
                Lexeme::Equals => self.push(Token::binary(BinaryOperator::Assign)),
                Lexeme::LParen => self.open_paren()?,
                Lexeme::RParen => self.close_paren()?,
                Lexeme::Comma => self.push(Token::ArgumentSeparator),
            }
        }

        if self.depth != 0 {
            return Err(ParenthesesError::Unclosed.into());
        }
        self.flush_identifier();
        Ok(self.tokens)
    }

    fn push(&mut self, token: Token) {
        trace!(%token, "token");
        self.tokens.push(token);
    }

    fn flush_identifier(&mut self) {
        if let Some(name) = self.pending_identifier.take() {
            self.push(Token::variable(name));
        }
    }

    fn last_is_literal(&self) -> bool {
        matches!(self.tokens.last(), Some(Token::Operand(Operand::Real(_))))
    }

    fn expects_operand(&self) -> bool {
        matches!(
            self.tokens.last(),
            None | Some(Token::Operator(_) | Token::LeftParen | Token::ArgumentSeparator)
        )
    }

    fn open_paren(&mut self) -> Result<()> {
        self.depth += 1;
        if let Some(name) = self.pending_identifier.take() {
            // sin( cos( ...
            let function = Operator::lookup(name)
                .filter(Operator::is_function)
                .ok_or_else(|| Error::UnrecognizedOperator(name.to_string()))?;
            self.push(Token::Operator(function));
        } else if matches!(
            self.tokens.last(),
            Some(Token::Operand(Operand::Real(_)) | Token::RightParen)
        ) {
            // 3(...) and (...)(...)
            self.push(Token::binary(BinaryOperator::Multiply));
        }
        self.push(Token::LeftParen);
        Ok(())
    }

    fn close_paren(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(ParenthesesError::ClosedBeforeOpened.into());
        }
        self.depth -= 1;
        if self.tokens.last() == Some(&Token::LeftParen) {
            return Err(ParenthesesError::Empty.into());
        }
        self.push(Token::RightParen);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Function;
    use crate::token::render;
    use insta::assert_snapshot;

    fn lex(input: &str) -> String {
        render(&tokenize(input).unwrap())
    }

    #[test]
    fn test_normalize_signs() {
        assert_eq!(normalize_signs("3-2"), "3+-1*2");
        assert_eq!(normalize_signs("-x"), "-1*x");
        assert_eq!(normalize_signs("(-x)"), "(-1*x)");
        assert_eq!(normalize_signs("2^-1"), "2^+-1*1");
        assert_eq!(normalize_signs("x=-5"), "x=+-1*5");
        assert_eq!(normalize_signs("+3"), "3");
    }

    #[test]
    fn test_normalize_signs_tolerates_whitespace() {
        assert_eq!(normalize_signs("  - 4"), "-1* 4");
        assert_eq!(normalize_signs("( -y)"), "(-1*y)");
    }

    #[test]
    fn test_simple_expression() {
        let tokens = tokenize("3+4*2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::real(3.0),
                Token::binary(BinaryOperator::Add),
                Token::real(4.0),
                Token::binary(BinaryOperator::Multiply),
                Token::real(2.0),
            ]
        );
    }

    #[test]
    fn test_subtraction_becomes_negated_product() {
        assert_snapshot!(lex("10-3"), @"10.00 + -1.00 * 3.00");
        assert_snapshot!(lex("-x"), @"-1.00 * x");
        assert_snapshot!(lex("2*(-3)"), @"2.00 * ( -1.00 * 3.00 )");
    }

    #[test]
    fn test_unary_plus_after_operator_is_dropped() {
        assert_snapshot!(lex("x=-5"), @"x = -1.00 * 5.00");
        assert_snapshot!(lex("2*-3"), @"2.00 * -1.00 * 3.00");
        assert_snapshot!(lex("2*+3"), @"2.00 * 3.00");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_snapshot!(lex("2x"), @"2.00 * x");
        assert_snapshot!(lex("2(3)"), @"2.00 * ( 3.00 )");
        assert_snapshot!(lex("(1)(2)"), @"( 1.00 ) * ( 2.00 )");
        assert_snapshot!(lex("2sin(x)"), @"2.00 * sin ( x )");
        // a closing parenthesis followed by a name is not multiplied
        assert_snapshot!(lex("(1)x"), @"( 1.00 ) x");
    }

    #[test]
    fn test_identifiers() {
        let tokens = tokenize("x_1+Foo2").unwrap();
        assert_eq!(tokens[0], Token::variable("x_1"));
        assert_eq!(tokens[2], Token::variable("Foo2"));
    }

    #[test]
    fn test_function_before_paren() {
        let tokens = tokenize("sqrt(16)").unwrap();
        assert_eq!(tokens[0], Token::Operator(Operator::Function(Function::Sqrt)));
        assert_eq!(tokens[1], Token::LeftParen);
    }

    #[test]
    fn test_whitespace_separates_tokens() {
        assert_snapshot!(lex("1 2"), @"1.00 2.00");
        assert_snapshot!(lex(" 1 +  2 "), @"1.00 + 2.00");
        assert_snapshot!(lex("sin (x)"), @"sin ( x )");
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            tokenize("foo(1)").unwrap_err(),
            Error::UnrecognizedOperator("foo".into())
        );
    }

    #[test]
    fn test_unrecognized_character() {
        assert_eq!(
            tokenize("1 % 2").unwrap_err(),
            Error::UnrecognizedCharacter('%')
        );
    }

    #[test]
    fn test_invalid_number() {
        assert_eq!(
            tokenize("1.2.3").unwrap_err(),
            Error::InvalidNumber("1.2.3".into())
        );
    }

    #[test]
    fn test_parentheses_errors() {
        assert_eq!(
            tokenize("(1+2").unwrap_err(),
            Error::ImproperParentheses(ParenthesesError::Unclosed)
        );
        assert_eq!(
            tokenize("1)+(2").unwrap_err(),
            Error::ImproperParentheses(ParenthesesError::ClosedBeforeOpened)
        );
        assert_eq!(
            tokenize("1+()").unwrap_err(),
            Error::ImproperParentheses(ParenthesesError::Empty)
        );
        assert_eq!(
            tokenize("sin()").unwrap_err(),
            Error::ImproperParentheses(ParenthesesError::Empty)
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }
}
