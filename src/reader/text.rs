//! `<text>` and `<tspan>` content

use roxmltree::Node;

use crate::geometry::{Point, Rect};
use crate::scene::{Text, TextSpan};
use crate::style::FontOverride;

use super::style::{font_override, Declarations, StyleState};
use super::units::{first_of_list, parse_length};
use super::ReadContext;

/// Collapse whitespace runs to one space, as `xml:space="default"` does
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Drop whitespace-only spans at either end, then trim the outer sides of the
/// first and last remaining spans
pub(crate) fn trim_spans(spans: &mut Vec<TextSpan>) {
    while spans.first().is_some_and(|s| s.text.trim().is_empty()) {
        spans.remove(0);
    }
    while spans.last().is_some_and(|s| s.text.trim().is_empty()) {
        spans.pop();
    }
    if let Some(first) = spans.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = spans.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
}

fn coordinate(node: Node<'_, '_>, name: &str, ppi: f64) -> Option<f64> {
    node.attribute(name)
        .map(first_of_list)
        .filter(|v| !v.is_empty())
        .map(|v| parse_length(v, ppi))
}

impl<'a, 'input> ReadContext<'a, 'input> {
    /// Build a text element; `None` when it holds no text
    pub(crate) fn read_text(&self, node: Node<'a, 'input>, style: &StyleState) -> Option<Text> {
        let ppi = self.config.pixels_per_inch;
        let origin = Point::new(
            coordinate(node, "x", ppi).unwrap_or(0.0),
            coordinate(node, "y", ppi).unwrap_or(0.0),
        );

        let mut spans = Vec::new();
        for child in node.children() {
            if child.is_text() {
                if let Some(text) = child.text() {
                    spans.push(TextSpan::new(collapse_whitespace(text)));
                }
            } else if child.has_tag_name("tspan") {
                spans.push(self.read_tspan(child, origin));
            }
        }
        trim_spans(&mut spans);
        if spans.is_empty() {
            return None;
        }

        let frame = Rect::new(origin.x, origin.y, 0.0, 0.0);
        let mut text = Text::new(String::new(), frame, style.font.clone());
        text.alignment = style.alignment;
        text.spans = spans;
        Some(text)
    }

    fn read_tspan(&self, node: Node<'a, 'input>, origin: Point) -> TextSpan {
        let ppi = self.config.pixels_per_inch;
        let decls = Declarations::from_node(node);
        let font: FontOverride = font_override(&decls, ppi);

        let x = coordinate(node, "x", ppi);
        let y = coordinate(node, "y", ppi);
        let position = (x.is_some() || y.is_some())
            .then(|| Point::new(x.unwrap_or(origin.x), y.unwrap_or(origin.y)));

        let content: String = node
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        TextSpan {
            text: collapse_whitespace(&content),
            font,
            position,
        }
    }
}
