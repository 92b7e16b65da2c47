//! `transform` attribute grammar
//!
//! A list of function calls such as `translate(10 20) rotate(45 5 5)`,
//! composed left to right by post-multiplication.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::{GraphicsError, Result, Span};
use crate::geometry::{Point, Transform};

use super::lexer::{lex_transform, TransformToken};

#[derive(Debug, Clone, PartialEq)]
struct TransformCall {
    name: String,
    args: Vec<f64>,
    span: Span,
}

fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> Span {
    e.start()..e.end()
}

fn transform_list_parser<'a, I>(
) -> impl Parser<'a, I, Vec<TransformCall>, extra::Err<Rich<'a, TransformToken>>> + Clone
where
    I: ValueInput<'a, Token = TransformToken, Span = SimpleSpan>,
{
    let name = select! {
        TransformToken::Name(n) => n,
    };

    let number = select! {
        TransformToken::Number(n) => n,
    };

    let args = number
        .repeated()
        .collect::<Vec<f64>>()
        .delimited_by(
            just(TransformToken::ParenOpen),
            just(TransformToken::ParenClose),
        );

    name.then(args)
        .map_with(|(name, args), e| TransformCall {
            name,
            args,
            span: span_range(&e.span()),
        })
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

/// Parse a transform list into one matrix.
///
/// Spans in errors are relative to `input`.
pub fn parse_transform(input: &str) -> Result<Transform> {
    let len = input.len();
    let mut tokens = Vec::new();
    for item in lex_transform(input) {
        match item {
            Ok((tok, span)) => tokens.push((tok, SimpleSpan::from(span))),
            Err(span) => {
                return Err(GraphicsError::UnsupportedTransform {
                    name: input[span.clone()].to_string(),
                    span,
                })
            }
        }
    }

    let token_stream =
        Stream::from_iter(tokens.into_iter()).map((len..len).into(), |(t, s): (_, _)| (t, s));

    let calls = transform_list_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            let span = errs
                .first()
                .map(|e| span_range(e.span()))
                .unwrap_or(0..len);
            GraphicsError::UnsupportedTransform {
                name: input.get(span.clone()).unwrap_or(input).trim().to_string(),
                span,
            }
        })?;

    let mut transform = Transform::IDENTITY;
    for call in &calls {
        transform = transform * call_transform(call)?;
    }
    Ok(transform)
}

fn call_transform(call: &TransformCall) -> Result<Transform> {
    let unsupported = || GraphicsError::UnsupportedTransform {
        name: format!("{}({} arguments)", call.name, call.args.len()),
        span: call.span.clone(),
    };
    let t = match (call.name.as_str(), call.args.as_slice()) {
        ("matrix", &[a, b, c, d, e, f]) => Transform::new(a, b, c, d, e, f),
        ("translate", &[x]) => Transform::translate(x, 0.0),
        ("translate", &[x, y]) => Transform::translate(x, y),
        ("scale", &[x]) => Transform::scale(x, x),
        ("scale", &[x, y]) => Transform::scale(x, y),
        ("rotate", &[angle]) => Transform::rotate(angle),
        ("rotate", &[angle, cx, cy]) => Transform::rotate_about(angle, Point::new(cx, cy)),
        ("matrix" | "translate" | "scale" | "rotate", _) => {
            return Err(unsupported())
        }
        _ => {
            return Err(GraphicsError::UnsupportedTransform {
                name: call.name.clone(),
                span: call.span.clone(),
            })
        }
    };
    Ok(t)
}
