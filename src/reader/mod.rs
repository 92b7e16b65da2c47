//! SVG reader
//!
//! Turns an SVG document into a [`Graphic`]. The document is parsed with
//! `roxmltree`; every element with an `id` is indexed up front so gradients and
//! `<use>` targets may be referenced before they are defined. Errors raised
//! for an element carry the byte range of that element in the source.

pub mod lexer;
pub mod path_data;
pub mod style;
pub mod text;
pub mod transform;
pub mod units;

mod gradient;

pub use path_data::parse_path_data;
pub use transform::parse_transform;

use std::collections::HashMap;

use roxmltree::{Document, Node, ParsingOptions};
use serde::Deserialize;

use crate::error::{GraphicsError, Result};
use crate::geometry::{Point, Rect, Size, Transform};
use crate::path::PathOp;
use crate::scene::{
    Element, ElementCommon, Ellipse, ForeignObject, Graphic, Group, Line, Path, Rectangle,
};
use crate::style::GradientId;

use self::style::StyleState;
use self::units::{is_percentage, parse_length};

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Attributes that make a `<switch>` child conditional
const CONDITIONAL_ATTRIBUTES: [&str; 3] =
    ["requiredFeatures", "requiredExtensions", "systemLanguage"];

/// Reader settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Resolution used to convert physical units (`in`, `cm`, `mm`, `pt`, `pc`)
    pub pixels_per_inch: f64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            pixels_per_inch: 160.0,
        }
    }
}

impl ReaderConfig {
    pub fn with_pixels_per_inch(mut self, pixels_per_inch: f64) -> Self {
        self.pixels_per_inch = pixels_per_inch;
        self
    }
}

/// Reads SVG text into a [`Graphic`]
#[derive(Debug, Clone, Default)]
pub struct SvgReader {
    config: ReaderConfig,
}

impl SvgReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Parse a whole document.
    ///
    /// The first structural error aborts the read; malformed numbers do not
    /// and read as 0.
    pub fn read(&self, source: &str) -> Result<Graphic> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(source, options)?;
        let root = doc.root_element();
        if !root.has_tag_name("svg") {
            return Err(GraphicsError::UnsupportedElement {
                name: root.tag_name().name().to_string(),
                span: root.range(),
            });
        }

        let mut ctx = ReadContext::new(&doc, self.config);
        ctx.read_size(root);
        let style = ctx.resolve_style(root, &StyleState::default())?;
        let children = ctx.read_children(root, &style)?;
        ctx.graphic.children = children;

        log::debug!(
            "read graphic {}x{} with {} top-level elements and {} gradients",
            ctx.graphic.size.width,
            ctx.graphic.size.height,
            ctx.graphic.children.len(),
            ctx.graphic.gradients.len()
        );
        Ok(ctx.graphic)
    }
}

/// Fragment id named by `xlink:href` or `href`
pub(crate) fn href<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((XLINK_NS, "href"))
        .or_else(|| node.attribute("href"))
        .map(|v| v.trim().trim_start_matches('#'))
        .filter(|id| !id.is_empty())
}

/// State of one read
pub(crate) struct ReadContext<'a, 'input> {
    pub(crate) config: ReaderConfig,
    /// Every element with an id; the first one wins on duplicates
    pub(crate) defs: HashMap<&'a str, Node<'a, 'input>>,
    /// Gradients already added to the graphic, by definition id
    pub(crate) gradient_ids: HashMap<&'a str, GradientId>,
    pub(crate) graphic: Graphic,
    /// `<use>` targets being expanded, innermost last
    use_stack: Vec<&'a str>,
}

impl<'a, 'input> ReadContext<'a, 'input> {
    fn new(doc: &'a Document<'input>, config: ReaderConfig) -> Self {
        let mut defs = HashMap::new();
        for node in doc.descendants().filter(|n| n.is_element()) {
            if let Some(id) = node.attribute("id") {
                defs.entry(id).or_insert(node);
            }
        }
        log::debug!("indexed {} elements by id", defs.len());
        Self {
            config,
            defs,
            gradient_ids: HashMap::new(),
            graphic: Graphic::default(),
            use_stack: Vec::new(),
        }
    }

    /// Nominal size and view box of the root element
    fn read_size(&mut self, root: Node<'a, 'input>) {
        let ppi = self.config.pixels_per_inch;
        let view_box = root
            .attribute("viewBox")
            .or_else(|| root.attribute("viewPort"))
            .map(lexer::numbers)
            .and_then(|n| match n.as_slice() {
                &[x, y, w, h] => Some(Rect::new(x, y, w, h)),
                _ => None,
            });

        // Percentages are fractions of the view box
        let dimension = |name: &str, reference: Option<f64>| {
            root.attribute(name).map(|v| {
                let length = parse_length(v, ppi);
                if is_percentage(v) {
                    length * reference.unwrap_or(0.0)
                } else {
                    length
                }
            })
        };
        let width = dimension("width", view_box.map(|v| v.width));
        let height = dimension("height", view_box.map(|v| v.height));

        let size = Size::new(
            width.or(view_box.map(|v| v.width)).unwrap_or(0.0),
            height.or(view_box.map(|v| v.height)).unwrap_or(0.0),
        );
        self.graphic.size = size;
        self.graphic.view_box = view_box.unwrap_or_else(|| Rect::from_size(size));
    }

    fn read_children(
        &mut self,
        parent: Node<'a, 'input>,
        inherited: &StyleState,
    ) -> Result<Vec<Element>> {
        let mut elements = Vec::new();
        for child in parent.children().filter(|n| n.is_element()) {
            self.read_element(child, inherited, &mut elements)?;
        }
        Ok(elements)
    }

    fn read_element(
        &mut self,
        node: Node<'a, 'input>,
        inherited: &StyleState,
        out: &mut Vec<Element>,
    ) -> Result<()> {
        match node.tag_name().name() {
            "title" | "desc" => self.read_description(node),
            "defs" | "namedview" | "metadata" | "image" | "pgf" | "linearGradient"
            | "radialGradient" => {}
            "switch" => {
                for child in node.children().filter(|n| n.is_element()) {
                    if CONDITIONAL_ATTRIBUTES
                        .iter()
                        .any(|a| child.has_attribute(*a))
                    {
                        continue;
                    }
                    self.read_element(child, inherited, out)?;
                }
            }
            "use" => self.read_use(node, inherited, out)?,
            _ => {
                if let Some(element) = self.read_shape(node, inherited)? {
                    out.push(element);
                }
            }
        }
        Ok(())
    }

    /// `<title>` and `<desc>` directly under the root describe the graphic
    fn read_description(&mut self, node: Node<'a, 'input>) {
        let is_top_level = node.parent_element().is_some_and(|p| p.has_tag_name("svg"));
        if !is_top_level {
            return;
        }
        let text: String = node
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        let text = text.trim().to_string();
        match node.tag_name().name() {
            "title" => self.graphic.title = Some(text),
            _ => self.graphic.description = Some(text),
        }
    }

    /// Expand `<use>` into a copy of its target read with the use site's style
    fn read_use(
        &mut self,
        node: Node<'a, 'input>,
        inherited: &StyleState,
        out: &mut Vec<Element>,
    ) -> Result<()> {
        let Some(id) = href(node) else {
            log::warn!("ignoring <use> without a reference");
            return Ok(());
        };
        let Some(target) = self.defs.get(id).copied() else {
            return Err(GraphicsError::invalid_reference(
                id,
                "no element has this id",
                node.range(),
            ));
        };
        if self.use_stack.contains(&id) {
            return Err(GraphicsError::invalid_reference(
                id,
                "<use> contains itself",
                node.range(),
            ));
        }

        let style = self.resolve_style(node, inherited)?;
        self.use_stack.push(id);
        let result = self.read_element(target, &style, out);
        self.use_stack.pop();
        result
    }

    fn read_shape(
        &mut self,
        node: Node<'a, 'input>,
        inherited: &StyleState,
    ) -> Result<Option<Element>> {
        let name = node.tag_name().name();
        let style = self.resolve_style(node, inherited)?;
        let ppi = self.config.pixels_per_inch;
        let len = |attr: &str| {
            node.attribute(attr)
                .map(|v| parse_length(v, ppi))
                .unwrap_or(0.0)
        };

        let mut element: Element = match name {
            "rect" => {
                let frame = Rect::new(len("x"), len("y"), len("width"), len("height"));
                let rx = node.attribute("rx").map(|_| len("rx"));
                let ry = node.attribute("ry").map(|_| len("ry"));
                let corner = match (rx, ry) {
                    (Some(rx), Some(ry)) => Size::new(rx, ry),
                    (Some(r), None) | (None, Some(r)) => Size::uniform(r),
                    (None, None) => Size::ZERO,
                };
                Rectangle::new(frame).with_corner(corner).into()
            }
            "ellipse" => {
                let (cx, cy, rx, ry) = (len("cx"), len("cy"), len("rx"), len("ry"));
                Ellipse::new(Rect::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry)).into()
            }
            "circle" => Ellipse::circle(Point::new(len("cx"), len("cy")), len("r")).into(),
            "line" => Line::new(
                Point::new(len("x1"), len("y1")),
                Point::new(len("x2"), len("y2")),
            )
            .into(),
            "path" => {
                let data = node.attribute("d").unwrap_or("");
                let operations = parse_path_data(data).map_err(|e| e.at(node.range()))?;
                if operations.is_empty() {
                    return Ok(None);
                }
                Path::new(operations).into()
            }
            "polygon" | "polyline" => {
                let numbers = lexer::numbers(node.attribute("points").unwrap_or(""));
                let mut operations: Vec<PathOp> = numbers
                    .chunks_exact(2)
                    .enumerate()
                    .map(|(i, xy)| {
                        let point = Point::new(xy[0], xy[1]);
                        if i == 0 {
                            PathOp::MoveTo(point)
                        } else {
                            PathOp::LineTo(point)
                        }
                    })
                    .collect();
                if operations.is_empty() {
                    return Ok(None);
                }
                if name == "polygon" {
                    operations.push(PathOp::ClosePath);
                }
                Path::new(operations).into()
            }
            "g" => Group::new(self.read_children(node, &style)?).into(),
            "text" => match self.read_text(node, &style) {
                Some(text) => text.into(),
                None => return Ok(None),
            },
            "foreignObject" => ForeignObject::new(
                Point::new(len("x"), len("y")),
                Size::new(len("width"), len("height")),
            )
            .into(),
            _ => {
                return Err(GraphicsError::UnsupportedElement {
                    name: name.to_string(),
                    span: node.range(),
                })
            }
        };

        let transform = match node.attribute("transform") {
            Some(value) => parse_transform(value).map_err(|e| e.at(node.range()))?,
            None => Transform::IDENTITY,
        };
        *element.common_mut() = ElementCommon {
            id: node.attribute("id").map(str::to_string),
            transform,
            pen: style.pen,
            brush: style.brush,
        };
        Ok(Some(element))
    }
}

/// Read `source` with the default settings
pub fn read_svg(source: &str) -> Result<Graphic> {
    SvgReader::new().read(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Brush, Color};

    fn read(source: &str) -> Graphic {
        read_svg(source).unwrap()
    }

    #[test]
    fn test_size_from_view_box() {
        let g = read(r#"<svg viewBox="0 0 200 100"/>"#);
        assert_eq!(g.size, Size::new(200.0, 100.0));
        assert_eq!(g.view_box, Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_percentage_size_scales_view_box() {
        let g = read(r#"<svg width="50%" height="100%" viewBox="0 0 200 100"/>"#);
        assert_eq!(g.size, Size::new(100.0, 100.0));
    }

    #[test]
    fn test_view_port_and_missing_view_box() {
        let g = read(r#"<svg viewPort="1 2 3 4"/>"#);
        assert_eq!(g.view_box, Rect::new(1.0, 2.0, 3.0, 4.0));

        let g = read(r#"<svg width="1in" height="2in"/>"#);
        assert_eq!(g.size, Size::new(160.0, 320.0));
        assert_eq!(g.view_box, Rect::new(0.0, 0.0, 160.0, 320.0));
    }

    #[test]
    fn test_root_style_defaults() {
        let g = read(r#"<svg><rect width="1" height="1"/></svg>"#);
        let rect = &g.children[0];
        assert_eq!(rect.pen(), None);
        assert_eq!(rect.brush(), Some(&Brush::Solid(Color::BLACK)));
    }

    #[test]
    fn test_href_prefers_xlink() {
        let doc = Document::parse(
            r##"<use xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="#a" href="#b"/>"##,
        )
        .unwrap();
        assert_eq!(href(doc.root_element()), Some("a"));

        let doc = Document::parse(r##"<use href=" #b"/>"##).unwrap();
        assert_eq!(href(doc.root_element()), Some("b"));
    }

    #[test]
    fn test_root_must_be_svg() {
        assert!(matches!(
            read_svg("<html/>"),
            Err(GraphicsError::UnsupportedElement { name, .. }) if name == "html"
        ));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(read_svg("<svg>"), Err(GraphicsError::Xml(_))));
    }

    #[test]
    fn test_ppi_config() {
        let reader = SvgReader::with_config(ReaderConfig::default().with_pixels_per_inch(96.0));
        let g = reader.read(r#"<svg width="1in" height="1in"/>"#).unwrap();
        assert_eq!(g.size, Size::new(96.0, 96.0));
    }
}
