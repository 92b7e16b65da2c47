//! Tokenizers for the path data and transform attribute mini-languages

use logos::Logos;

use crate::error::Span;

fn number(lex: &mut logos::Lexer<'_, PathToken>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn transform_number(lex: &mut logos::Lexer<'_, TransformToken>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Tokens of the `d` and `points` attributes.
///
/// A sign always starts a new number, so `10-5` lexes as `10` and `-5`, and a
/// second decimal point does too (`.5.5` is `.5` and `.5`).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r,]+")]
pub enum PathToken {
    #[regex(r"[A-Za-z]", |lex| lex.slice().chars().next())]
    Command(char),

    #[regex(r"[-+]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][-+]?[0-9]+)?", number)]
    Number(f64),
}

/// Tokens of the `transform` attribute
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r,]+")]
pub enum TransformToken {
    #[regex(r"[A-Za-z][A-Za-z0-9]*", |lex| lex.slice().to_string())]
    Name(String),

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[regex(r"[-+]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][-+]?[0-9]+)?", transform_number)]
    Number(f64),
}

/// Path tokens with their spans; unlexable input is returned as `Err(span)`
pub fn lex_path(input: &str) -> impl Iterator<Item = Result<(PathToken, Span), Span>> + '_ {
    PathToken::lexer(input)
        .spanned()
        .map(|(tok, span)| tok.map(|t| (t, span.clone())).map_err(|_| span))
}

pub fn lex_transform(input: &str) -> impl Iterator<Item = Result<(TransformToken, Span), Span>> + '_ {
    TransformToken::lexer(input)
        .spanned()
        .map(|(tok, span)| tok.map(|t| (t, span.clone())).map_err(|_| span))
}

/// Every number in `input`, skipping anything else.
///
/// Used for lists such as `points` and `viewBox`.
pub fn numbers(input: &str) -> Vec<f64> {
    PathToken::lexer(input)
        .filter_map(|tok| match tok {
            Ok(PathToken::Number(n)) => Some(n),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_tokens(input: &str) -> Vec<PathToken> {
        lex_path(input).filter_map(|t| t.ok()).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_glued_negative_numbers_split() {
        assert_eq!(
            path_tokens("M10-5L3.5-.5"),
            vec![
                PathToken::Command('M'),
                PathToken::Number(10.0),
                PathToken::Number(-5.0),
                PathToken::Command('L'),
                PathToken::Number(3.5),
                PathToken::Number(-0.5),
            ]
        );
    }

    #[test]
    fn test_exponent_and_repeated_decimal_point() {
        assert_eq!(
            path_tokens("1e2 .5.5"),
            vec![
                PathToken::Number(100.0),
                PathToken::Number(0.5),
                PathToken::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_transform_tokens() {
        let tokens: Vec<_> = lex_transform("translate(10, -2) rotate(45)")
            .filter_map(|t| t.ok())
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                TransformToken::Name("translate".to_string()),
                TransformToken::ParenOpen,
                TransformToken::Number(10.0),
                TransformToken::Number(-2.0),
                TransformToken::ParenClose,
                TransformToken::Name("rotate".to_string()),
                TransformToken::ParenOpen,
                TransformToken::Number(45.0),
                TransformToken::ParenClose,
            ]
        );
    }

    #[test]
    fn test_numbers_ignores_other_tokens() {
        assert_eq!(numbers("0 0,100 50"), vec![0.0, 0.0, 100.0, 50.0]);
        assert_eq!(numbers("10,20 30"), vec![10.0, 20.0, 30.0]);
    }
}
