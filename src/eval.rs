use miette::{Diagnostic, Error};
use thiserror::Error;

use crate::{
    convert::EmptyExpressionError,
    lex::{Token, TokenKind},
    stack::Stack,
};

#[derive(Error, Debug, Diagnostic)]
#[error("operator `{operator}` is missing an operand")]
#[diagnostic(help("every operator needs a value on each side, e.g. `3 + 4`"))]
pub struct InsufficientOperandsError {
    pub operator: String,
}

#[derive(Error, Debug, Diagnostic)]
#[error("division by zero")]
#[diagnostic(help("the divisor evaluates to zero; adjust the expression"))]
pub struct DivisionByZeroError;

#[derive(Error, Debug, Diagnostic)]
#[error("malformed expression")]
#[diagnostic(help("{leftover} values were left over with no operator to combine them"))]
pub struct MalformedExpressionError {
    pub leftover: usize,
}

#[derive(Error, Debug, Diagnostic)]
#[error("token `{token}` is not valid in a postfix sequence")]
#[diagnostic(help("postfix sequences contain only numbers and operators"))]
pub struct InvalidTokenError {
    pub token: String,
}

/// Evaluate a postfix token sequence with a single left-to-right pass over
/// an operand stack.
pub fn evaluate(postfix: &[Token<'_>]) -> Result<f64, Error> {
    if postfix.is_empty() {
        return Err(EmptyExpressionError.into());
    }

    let mut operands = Stack::new();

    for token in postfix {
        let op = match token.kind {
            TokenKind::Number(n) => {
                operands.push(n);
                continue;
            }
            TokenKind::LeftParen | TokenKind::RightParen => {
                // The converter never emits parentheses; reaching this arm
                // means the input bypassed it.
                debug_assert!(false, "parenthesis token in postfix input");
                return Err(InvalidTokenError {
                    token: token.literal.to_string(),
                }
                .into());
            }
            op => op,
        };

        // The top of the stack was pushed last, so it is the right operand.
        let (Some(b), Some(a)) = (operands.pop(), operands.pop()) else {
            return Err(InsufficientOperandsError {
                operator: token.literal.to_string(),
            }
            .into());
        };

        let value = match op {
            TokenKind::Plus => a + b,
            TokenKind::Minus => a - b,
            TokenKind::Star => a * b,
            TokenKind::Slash => {
                if b == 0.0 {
                    return Err(DivisionByZeroError.into());
                }
                a / b
            }
            TokenKind::Caret => a.powf(b),
            _ => unreachable!(),
        };
        operands.push(value);
    }

    let leftover = operands.len();
    match operands.pop() {
        Some(value) if leftover == 1 => Ok(value),
        _ => Err(MalformedExpressionError { leftover }.into()),
    }
}
