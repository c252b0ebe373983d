//! Stack-based expression calculator: infix text is tokenized, converted to
//! postfix order with the shunting-yard algorithm, and evaluated. Each stage
//! is a pure function of its input, so the pipeline is reentrant and safe to
//! call from any number of threads.

pub mod convert;
pub mod eval;
pub mod history;
pub mod lex;
pub mod stack;

use miette::Error;

pub use convert::{TraceStep, convert, convert_with_trace};
pub use eval::evaluate;
pub use history::{History, HistoryEntry};
pub use lex::{Lexer, Token, TokenKind, tokenize};

/// Run the full pipeline on an infix expression, returning the postfix
/// sequence together with the evaluated result. The first failing stage
/// aborts the run and its error is passed through unchanged.
pub fn run(text: &str) -> Result<(Vec<Token<'_>>, f64), Error> {
    let tokens = tokenize(text)?;
    let postfix = convert(&tokens)?;
    let result = evaluate(&postfix)?;
    Ok((postfix, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{EmptyExpressionError, MismatchedParenthesesError};
    use crate::eval::DivisionByZeroError;
    use crate::lex::InvalidCharacterError;

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let (postfix, result) = run("3 + 4 * 2").unwrap();
        assert_eq!(history::render(&postfix), "3 4 2 * +");
        assert_eq!(result, 11.0);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let (postfix, result) = run("3 + 4 * (2 - 1)").unwrap();
        assert_eq!(history::render(&postfix), "3 4 2 1 - * +");
        assert_eq!(result, 7.0);
    }

    #[test]
    fn test_unbalanced_parenthesis_fails_the_run() {
        let e = run("(1 + 2").unwrap_err();
        assert!(e.downcast_ref::<MismatchedParenthesesError>().is_some());
    }

    #[test]
    fn test_division_by_zero_fails_the_run() {
        let e = run("5 / 0").unwrap_err();
        assert!(e.downcast_ref::<DivisionByZeroError>().is_some());
    }

    #[test]
    fn test_power_is_left_associative() {
        let (postfix, result) = run("2 ^ 3 ^ 2").unwrap();
        assert_eq!(history::render(&postfix), "2 3 ^ 2 ^");
        assert_eq!(result, 64.0);
    }

    #[test]
    fn test_empty_and_blank_input_fail_the_run() {
        for text in ["", "   "] {
            let e = run(text).unwrap_err();
            assert!(
                e.downcast_ref::<EmptyExpressionError>().is_some(),
                "expected empty-expression failure for {text:?}"
            );
        }
    }

    #[test]
    fn test_fractional_literals_evaluate() {
        let (_, result) = run("3.5 + 2").unwrap();
        assert_eq!(result, 5.5);
    }

    #[test]
    fn test_unknown_character_fails_the_run() {
        let e = run("3 $ 4").unwrap_err();
        assert!(e.downcast_ref::<InvalidCharacterError>().is_some());
    }

    #[test]
    fn test_repeated_runs_agree() {
        let (first_postfix, first_result) = run("8 / (4 - 2) ^ 2").unwrap();
        let (second_postfix, second_result) = run("8 / (4 - 2) ^ 2").unwrap();
        assert_eq!(first_postfix, second_postfix);
        assert_eq!(first_result, second_result);
        assert_eq!(first_result, 2.0);
    }
}
