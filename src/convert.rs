//! Infix to postfix conversion with the shunting-yard algorithm.

use miette::{Diagnostic, Error};
use thiserror::Error;

use crate::{
    lex::{Token, TokenKind},
    stack::Stack,
};

#[derive(Error, Debug, Diagnostic)]
#[error("empty expression")]
#[diagnostic(help("enter at least one number, e.g. `3 + 4 * 2`"))]
pub struct EmptyExpressionError;

#[derive(Error, Debug, Diagnostic)]
#[error("mismatched parentheses")]
#[diagnostic(help("every `(` must have a matching `)`"))]
pub struct MismatchedParenthesesError;

/// Binding strength of an operator kind; parentheses and numbers have none.
pub fn precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Plus | TokenKind::Minus => Some(1),
        TokenKind::Star | TokenKind::Slash => Some(2),
        TokenKind::Caret => Some(3),
        TokenKind::Number(_) | TokenKind::LeftParen | TokenKind::RightParen => None,
    }
}

/// Snapshot of the converter state taken after one input token was
/// processed. The stack is recorded bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep<'src> {
    pub token: Token<'src>,
    pub output: Vec<Token<'src>>,
    pub stack: Vec<Token<'src>>,
}

pub fn convert<'src>(tokens: &[Token<'src>]) -> Result<Vec<Token<'src>>, Error> {
    shunt(tokens, None)
}

/// Same conversion, additionally returning a per-token trace of the output
/// and operator stack for step-by-step display.
pub fn convert_with_trace<'src>(
    tokens: &[Token<'src>],
) -> Result<(Vec<Token<'src>>, Vec<TraceStep<'src>>), Error> {
    let mut trace = Vec::with_capacity(tokens.len());
    let postfix = shunt(tokens, Some(&mut trace))?;
    Ok((postfix, trace))
}

fn shunt<'src>(
    tokens: &[Token<'src>],
    mut trace: Option<&mut Vec<TraceStep<'src>>>,
) -> Result<Vec<Token<'src>>, Error> {
    if tokens.is_empty() {
        return Err(EmptyExpressionError.into());
    }

    let mut output = Vec::with_capacity(tokens.len());
    let mut stack = Stack::new();

    for &token in tokens {
        match token.kind {
            TokenKind::Number(_) => output.push(token),
            TokenKind::LeftParen => stack.push(token),
            TokenKind::RightParen => loop {
                match stack.pop() {
                    Some(Token {
                        kind: TokenKind::LeftParen,
                        ..
                    }) => break,
                    Some(op) => output.push(op),
                    None => return Err(MismatchedParenthesesError.into()),
                }
            },
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Caret => {
                // `>=` pops operators of equal rank too, so every operator,
                // `^` included, groups left to right: 2^3^2 is (2^3)^2.
                let rank = precedence(token.kind);
                while let Some(top) = stack.peek().copied() {
                    if precedence(top.kind) < rank {
                        break;
                    }
                    stack.pop();
                    output.push(top);
                }
                stack.push(token);
            }
        }

        if let Some(log) = trace.as_mut() {
            log.push(TraceStep {
                token,
                output: output.clone(),
                stack: stack.iter().copied().collect(),
            });
        }
    }

    while let Some(op) = stack.pop() {
        if matches!(op.kind, TokenKind::LeftParen) {
            return Err(MismatchedParenthesesError.into());
        }
        output.push(op);
    }

    Ok(output)
}
