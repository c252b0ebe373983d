use std::fmt::Display;

use miette::{Diagnostic, Error, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("unexpected character '{token}'")]
#[diagnostic(help("expressions may contain numbers, `+ - * / ^` and parentheses"))]
pub struct InvalidCharacterError {
    #[source_code]
    src: NamedSource<String>,

    #[label("this character")]
    bad_bit: SourceSpan,

    pub token: char,
}

#[derive(Error, Debug, Diagnostic)]
#[error("invalid numeric literal `{literal}`")]
#[diagnostic(help("a number may contain at most one decimal point"))]
pub struct InvalidNumberError {
    #[source_code]
    src: NamedSource<String>,

    #[label("this literal")]
    bad_bit: SourceSpan,

    pub literal: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub literal: &'src str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Number(f64),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The literal slice is the surface form for every kind; for numbers
        // it keeps the spelling the user typed (`3` stays `3`, `3.50` stays
        // `3.50`).
        write!(f, "{}", self.literal)
    }
}

pub struct Lexer<'src> {
    whole: &'src str,
    rest: &'src str,
    byte: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Lexer {
            whole: input,
            rest: input,
            byte: 0,
        }
    }
}

/// Collect the whole token sequence up front. The first scan failure is
/// returned as-is and no partial sequence survives it.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, Error> {
    Lexer::new(input).collect()
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let literal = &self.rest[..c.len_utf8()];
            let cur = self.rest;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            let process = |kind: TokenKind| Some(Ok(Token { kind, literal }));

            match c {
                '(' => return process(TokenKind::LeftParen),
                ')' => return process(TokenKind::RightParen),
                '+' => return process(TokenKind::Plus),
                '-' => return process(TokenKind::Minus),
                '*' => return process(TokenKind::Star),
                '/' => return process(TokenKind::Slash),
                '^' => return process(TokenKind::Caret),
                '0'..='9' | '.' => {
                    let first_non_digit = cur
                        .find(|c| !matches!(c, '0'..='9' | '.'))
                        .unwrap_or(cur.len());

                    let literal = &cur[..first_non_digit];

                    let extra_bytes = literal.len() - c.len_utf8();
                    self.byte += extra_bytes;
                    self.rest = &self.rest[extra_bytes..];

                    let n = match literal.parse() {
                        Ok(n) => n,
                        Err(_) => {
                            return Some(Err(InvalidNumberError {
                                src: NamedSource::new("expression", self.whole.to_string()),
                                bad_bit: SourceSpan::from(self.byte - literal.len()..self.byte),
                                literal: literal.to_string(),
                            }
                            .into()));
                        }
                    };

                    return Some(Ok(Token {
                        kind: TokenKind::Number(n),
                        literal,
                    }));
                }
                ' ' | '\r' | '\t' | '\n' => continue, // Skip whitespace
                c => {
                    return Some(Err(InvalidCharacterError {
                        src: NamedSource::new("expression", self.whole.to_string()),
                        bad_bit: SourceSpan::from(self.byte - c.len_utf8()..self.byte),
                        token: c,
                    }
                    .into()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizes_operators_and_parentheses() {
        let tokens = tokenize("3 + 4 * (2 - 1)").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Number(3.0),
                TokenKind::Plus,
                TokenKind::Number(4.0),
                TokenKind::Star,
                TokenKind::LeftParen,
                TokenKind::Number(2.0),
                TokenKind::Minus,
                TokenKind::Number(1.0),
                TokenKind::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenizes_without_spaces() {
        let tokens = tokenize("12+34/5").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Number(12.0),
                TokenKind::Plus,
                TokenKind::Number(34.0),
                TokenKind::Slash,
                TokenKind::Number(5.0),
            ]
        );
    }

    #[test]
    fn test_number_literal_keeps_its_spelling() {
        let tokens = tokenize("3.50 ^ 2").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number(3.5));
        assert_eq!(tokens[0].literal, "3.50");
        assert_eq!(tokens[2].literal, "2");
    }

    #[test]
    fn test_fractional_literal_without_leading_digit() {
        let tokens = tokenize(".5 + 2").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number(0.5));
    }

    #[test]
    fn test_unknown_character_is_rejected() {
        let e = tokenize("3 $ 4").unwrap_err();
        let invalid = e.downcast_ref::<InvalidCharacterError>().unwrap();
        assert_eq!(invalid.token, '$');
    }

    #[test]
    fn test_double_decimal_point_is_rejected() {
        let e = tokenize("1.2.3 + 4").unwrap_err();
        let invalid = e.downcast_ref::<InvalidNumberError>().unwrap();
        assert_eq!(invalid.literal, "1.2.3");
    }

    #[test]
    fn test_blank_input_yields_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" \t  ").unwrap().is_empty());
    }
}
