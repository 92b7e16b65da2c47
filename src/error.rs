//! Error types for parsing, geometry and drawing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum GraphicsError {
    /// An XML element the reader has no mapping for
    #[error("SVG element <{name}> is not supported")]
    UnsupportedElement { name: String, span: Span },

    /// A path data command letter outside the supported set
    #[error("path command '{command}' is not supported")]
    UnsupportedPathCommand { command: char, span: Span },

    /// A transform function that cannot be interpreted
    #[error("cannot transform with '{name}'")]
    UnsupportedTransform { name: String, span: Span },

    /// A `url(#id)` or `href` that names nothing usable
    #[error("invalid reference '#{id}': {reason}")]
    InvalidReference {
        id: String,
        reason: String,
        span: Span,
    },

    /// Containment test on a path that is not a plain polygon
    #[error("cannot test containment: {0}")]
    UnsupportedShape(String),

    /// Operation not available for this shape or op
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Inversion of a singular matrix
    #[error("transform is not invertible (determinant is zero)")]
    DegenerateTransform,

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = GraphicsError> = std::result::Result<T, E>;

impl GraphicsError {
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedOperation(what.into())
    }

    pub fn invalid_reference(id: impl Into<String>, reason: impl Into<String>, span: Span) -> Self {
        Self::InvalidReference {
            id: id.into(),
            reason: reason.into(),
            span,
        }
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UnsupportedElement { span, .. }
            | Self::UnsupportedPathCommand { span, .. }
            | Self::UnsupportedTransform { span, .. }
            | Self::InvalidReference { span, .. } => Some(span),
            _ => None,
        }
    }

    /// Replace the span with the range of the XML node the error was raised for.
    ///
    /// Path data and transform lists are parsed from attribute values, so their
    /// spans start out relative to the attribute text.
    pub(crate) fn at(mut self, node_span: Span) -> Self {
        match &mut self {
            Self::UnsupportedElement { span, .. }
            | Self::UnsupportedPathCommand { span, .. }
            | Self::UnsupportedTransform { span, .. }
            | Self::InvalidReference { span, .. } => *span = node_span,
            _ => {}
        }
        self
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span().cloned() else {
            return format!("{}: {}", filename, self);
        };
        let message = self.to_string();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, message),
        }
    }
}
