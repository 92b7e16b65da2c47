//! Presentation attributes and inline `style` declarations
//!
//! Both sources are parsed into one declaration set. Each declaration carries
//! the rank of its source and a key keeps the value from the highest rank, so
//! `style="fill:red"` beats `fill="blue"` on the same element. Resolution then
//! walks the keys in a fixed order on top of the inherited state.

use std::collections::HashMap;

use roxmltree::Node;

use crate::error::Result;
use crate::style::{
    font::parse_font_weight, Brush, Color, Font, FontOverride, FontStyle, Pen, TextAlignment,
};

use super::units::{parse_length, parse_number};
use super::ReadContext;

/// Keys read from presentation attributes
const STYLE_KEYS: [&str; 14] = [
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "stroke-dasharray",
    "fill",
    "fill-opacity",
    "opacity",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "text-anchor",
    "stop-color",
    "stop-opacity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Specificity {
    Attribute,
    InlineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Declaration<'a> {
    /// `None` for a declaration with an empty value
    pub value: Option<&'a str>,
    pub rank: Specificity,
}

/// Merged declarations of one element
#[derive(Debug, Clone, Default)]
pub(crate) struct Declarations<'a> {
    entries: HashMap<&'a str, Declaration<'a>>,
}

impl<'a> Declarations<'a> {
    pub fn from_node(node: Node<'a, '_>) -> Self {
        let mut decls = Self::default();
        for key in STYLE_KEYS {
            if let Some(value) = node.attribute(key) {
                decls.insert(key, value, Specificity::Attribute);
            }
        }
        if let Some(style) = node.attribute("style") {
            decls.insert_inline(style);
        }
        decls
    }

    /// Parse `key: value; key: value`
    pub fn insert_inline(&mut self, style: &'a str) {
        for item in style.split(';') {
            let Some((key, value)) = item.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if !key.is_empty() {
                self.insert(key, value, Specificity::InlineStyle);
            }
        }
    }

    /// Last writer wins among declarations of equal or higher rank
    pub fn insert(&mut self, key: &'a str, value: &'a str, rank: Specificity) {
        let value = value.trim();
        let decl = Declaration {
            value: (!value.is_empty()).then_some(value),
            rank,
        };
        match self.entries.get(key) {
            Some(existing) if existing.rank > rank => {}
            _ => {
                self.entries.insert(key, decl);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.entries.get(key).and_then(|d| d.value)
    }
}

/// Pen, brush and font handed down from ancestors
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StyleState {
    pub pen: Option<Pen>,
    pub brush: Option<Brush>,
    pub font: Font,
    pub alignment: TextAlignment,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            pen: None,
            brush: Some(Brush::Solid(Color::BLACK)),
            font: Font::default(),
            alignment: TextAlignment::Left,
        }
    }
}

/// Set a new color, keeping the old alpha unless the old color was opaque
fn merge_color(current: Color, new: Color) -> Color {
    if current.alpha == 1.0 {
        new
    } else {
        new.with_alpha(current.alpha)
    }
}

/// Apply an opacity: replaces an opaque alpha, multiplies a translucent one
fn apply_opacity(color: Color, opacity: f64) -> Color {
    if color.alpha == 1.0 {
        color.with_alpha(opacity)
    } else {
        color.with_alpha(color.alpha * opacity)
    }
}

fn parse_dash_array(value: &str, pixels_per_inch: f64) -> Option<Vec<f64>> {
    if value == "none" {
        return None;
    }
    let dashes: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| parse_length(s, pixels_per_inch))
        .collect();
    (!dashes.is_empty()).then_some(dashes)
}

/// Font settings the declarations set explicitly
pub(crate) fn font_override(decls: &Declarations<'_>, pixels_per_inch: f64) -> FontOverride {
    FontOverride {
        family: decls
            .get("font-family")
            .map(|f| f.trim_matches(|c| c == '\'' || c == '"').to_string()),
        size: decls
            .get("font-size")
            .map(|s| parse_length(s, pixels_per_inch)),
        weight: decls.get("font-weight").and_then(parse_font_weight),
        style: decls.get("font-style").and_then(FontStyle::parse),
    }
}

impl<'a, 'input> ReadContext<'a, 'input> {
    /// Resolve the style of `node` on top of `inherited`
    pub(crate) fn resolve_style(
        &mut self,
        node: Node<'a, 'input>,
        inherited: &StyleState,
    ) -> Result<StyleState> {
        let decls = Declarations::from_node(node);
        let ppi = self.config.pixels_per_inch;
        let mut state = inherited.clone();
        let opacity = decls.get("opacity").map(parse_number);

        let mut stroke_none = false;
        if let Some(stroke) = decls.get("stroke") {
            if stroke == "none" {
                state.pen = None;
                stroke_none = true;
            } else if let Some(color) = Color::parse(stroke) {
                state.pen = Some(match state.pen.take() {
                    Some(pen) => Pen {
                        color: merge_color(pen.color, color),
                        ..pen
                    },
                    None => Pen::new(color, 1.0),
                });
            } else {
                log::warn!("ignoring unsupported stroke '{}'", stroke);
            }
        }

        if let Some(width) = decls.get("stroke-width") {
            if !stroke_none {
                let pen = state.pen.get_or_insert_with(Pen::default);
                pen.width = parse_length(width, ppi);
            }
        }

        if let Some(dashes) = decls.get("stroke-dasharray") {
            if let Some(pen) = state.pen.as_mut() {
                pen.dash_pattern = parse_dash_array(dashes, ppi);
            }
        }

        let stroke_opacity = decls.get("stroke-opacity").map(parse_number).or(opacity);
        if let (Some(alpha), Some(pen)) = (stroke_opacity, state.pen.as_mut()) {
            pen.color = apply_opacity(pen.color, alpha);
        }

        if let Some(fill) = decls.get("fill") {
            if fill == "none" {
                state.brush = None;
            } else if let Some(id) = gradient_url(fill) {
                let gradient = self.resolve_gradient(id, node.range())?;
                state.brush = Some(Brush::Gradient(gradient));
            } else if let Some(color) = Color::parse(fill) {
                state.brush = Some(match state.brush {
                    Some(Brush::Solid(current)) => Brush::Solid(merge_color(current, color)),
                    _ => Brush::Solid(color),
                });
            } else {
                log::warn!("ignoring unsupported fill '{}'", fill);
            }
        }

        let fill_opacity = decls.get("fill-opacity").map(parse_number).or(opacity);
        if let (Some(alpha), Some(Brush::Solid(color))) = (fill_opacity, state.brush.as_mut()) {
            *color = apply_opacity(*color, alpha);
        }

        state.font = font_override(&decls, ppi).apply(&state.font);
        if let Some(alignment) = decls.get("text-anchor").and_then(TextAlignment::from_text_anchor) {
            state.alignment = alignment;
        }

        Ok(state)
    }
}

/// The id inside `url(#id)`
pub(crate) fn gradient_url(value: &str) -> Option<&str> {
    let inner = value.trim().strip_prefix("url(")?.strip_suffix(')')?;
    let inner = inner.trim().trim_matches(|c| c == '\'' || c == '"');
    inner.strip_prefix('#').filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_style_outranks_attribute() {
        let doc = roxmltree::Document::parse(
            r#"<rect fill="blue" stroke="red" style="fill: green; stroke-width:3"/>"#,
        )
        .unwrap();
        let decls = Declarations::from_node(doc.root_element());
        assert_eq!(decls.get("fill"), Some("green"));
        assert_eq!(decls.get("stroke"), Some("red"));
        assert_eq!(decls.get("stroke-width"), Some("3"));
    }

    #[test]
    fn test_only_presentation_keys_are_collected() {
        let doc = roxmltree::Document::parse(r#"<rect color="red" display="none" fill="blue"/>"#)
            .unwrap();
        let decls = Declarations::from_node(doc.root_element());
        assert_eq!(decls.get("color"), None);
        assert_eq!(decls.get("display"), None);
        assert_eq!(decls.get("fill"), Some("blue"));
        assert_eq!(decls.entries.len(), 1);
    }

    #[test]
    fn test_attribute_does_not_override_inline() {
        let mut decls = Declarations::default();
        decls.insert("fill", "green", Specificity::InlineStyle);
        decls.insert("fill", "blue", Specificity::Attribute);
        assert_eq!(decls.get("fill"), Some("green"));
        decls.insert("fill", "red", Specificity::InlineStyle);
        assert_eq!(decls.get("fill"), Some("red"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let mut decls = Declarations::default();
        decls.insert_inline("fill: ; stroke:red;;junk");
        assert_eq!(decls.get("fill"), None);
        assert_eq!(decls.get("stroke"), Some("red"));
    }

    #[test]
    fn test_opacity_rule_is_asymmetric() {
        // Opaque colors take the opacity as their alpha
        assert_eq!(apply_opacity(Color::BLACK, 0.5).alpha, 0.5);
        // Translucent colors are multiplied
        assert_eq!(apply_opacity(Color::BLACK.with_alpha(0.5), 0.5).alpha, 0.25);
    }

    #[test]
    fn test_gradient_url() {
        assert_eq!(gradient_url("url(#grad)"), Some("grad"));
        assert_eq!(gradient_url(" url( '#g2' ) "), Some("g2"));
        assert_eq!(gradient_url("url()"), None);
        assert_eq!(gradient_url("red"), None);
    }

    #[test]
    fn test_dash_array() {
        assert_eq!(parse_dash_array("4 2", 160.0), Some(vec![4.0, 2.0]));
        assert_eq!(parse_dash_array("none", 160.0), None);
    }
}
