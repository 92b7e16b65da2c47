//! SVG writer
//!
//! Serializes a [`Graphic`] in two passes. The first walks every element and
//! gives each distinct gradient handle an id (`linearGradient-N` or
//! `radialGradient-N`, one counter from 1) and a `<defs>` entry; the second
//! emits the elements, referring to gradients by those ids.

pub mod config;

pub use config::WriterConfig;

use std::collections::HashMap;
use std::io;

use crate::error::{GraphicsError, Result};
use crate::geometry::Transform;
use crate::path::PathOp;
use crate::scene::{Element, Graphic, Text, TextSpan};
use crate::style::{
    font::FONT_WEIGHT_NORMAL, Brush, FontStyle, Gradient, GradientId, GradientStop, Pen,
};

/// Writes a [`Graphic`] as SVG text
#[derive(Debug, Clone, Default)]
pub struct SvgWriter {
    config: WriterConfig,
}

impl SvgWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Serialize to a string.
    ///
    /// Fails when an element refers to a gradient the graphic does not hold.
    pub fn write(&self, graphic: &Graphic) -> Result<String> {
        let mut builder = SvgBuilder::new(&self.config, graphic);
        builder.collect_gradients()?;
        builder.build()
    }

    pub fn write_to(&self, graphic: &Graphic, out: &mut impl io::Write) -> Result<()> {
        let text = self.write(graphic)?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }
}

/// Serialize `graphic` with the default settings
pub fn write_svg(graphic: &Graphic) -> Result<String> {
    SvgWriter::new().write(graphic)
}

struct SvgBuilder<'g> {
    config: &'g WriterConfig,
    graphic: &'g Graphic,
    /// Gradient handle to its id in `<defs>`
    gradient_names: HashMap<GradientId, String>,
    defs: Vec<String>,
    out: String,
    indent: usize,
}

impl<'g> SvgBuilder<'g> {
    fn new(config: &'g WriterConfig, graphic: &'g Graphic) -> Self {
        Self {
            config,
            graphic,
            gradient_names: HashMap::new(),
            defs: Vec::new(),
            out: String::new(),
            indent: 0,
        }
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            " ".repeat(self.indent * self.config.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &'static str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn line(&mut self, text: &str) {
        let indent = self.indent_str();
        self.out.push_str(&indent);
        self.out.push_str(text);
        self.out.push_str(self.newline());
    }

    /// First pass: name every gradient reachable from an element brush
    fn collect_gradients(&mut self) -> Result<()> {
        let mut handles = Vec::new();
        self.graphic.visit(|element| {
            if let Some(Brush::Gradient(id)) = element.brush() {
                handles.push(*id);
            }
        });

        let mut counter = 0;
        for handle in handles {
            if self.gradient_names.contains_key(&handle) {
                continue;
            }
            let gradient = self.graphic.gradients.get(handle).ok_or_else(|| {
                GraphicsError::invalid_reference(
                    handle.to_string(),
                    "gradient is not stored in the graphic",
                    0..0,
                )
            })?;
            counter += 1;
            let name = match gradient {
                Gradient::Linear(_) => format!("linearGradient-{}", counter),
                Gradient::Radial(_) => format!("radialGradient-{}", counter),
            };
            self.defs.push(gradient_def(&name, gradient));
            self.gradient_names.insert(handle, name);
        }
        log::debug!("writing {} gradient definitions", self.defs.len());
        Ok(())
    }

    fn build(mut self) -> Result<String> {
        let graphic = self.graphic;
        if self.config.standalone {
            self.line(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        }
        let vb = graphic.view_box;
        self.line(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}px" height="{}px" viewBox="{} {} {} {}">"#,
            graphic.size.width, graphic.size.height, vb.x, vb.y, vb.width, vb.height
        ));
        self.indent += 1;

        if let Some(title) = &graphic.title {
            self.line(&format!("<title>{}</title>", escape_xml(title)));
        }
        if let Some(description) = &graphic.description {
            self.line(&format!("<desc>{}</desc>", escape_xml(description)));
        }

        if self.defs.is_empty() {
            self.line("<defs/>");
        } else {
            self.line("<defs>");
            self.indent += 1;
            let defs = std::mem::take(&mut self.defs);
            for def in &defs {
                for def_line in def.lines() {
                    self.line(def_line);
                }
            }
            self.indent -= 1;
            self.line("</defs>");
        }

        for element in &graphic.children {
            self.write_element(element)?;
        }

        self.indent -= 1;
        self.line("</svg>");
        Ok(self.out)
    }

    /// `id`, stroke, fill and transform attributes shared by every element
    fn common_attributes(&self, element: &Element) -> Result<String> {
        let mut attrs = String::new();
        if let Some(id) = element.id() {
            attrs.push_str(&format!(r#" id="{}""#, escape_xml(id)));
        }
        attrs.push_str(&pen_attributes(element.pen()));
        match element.brush() {
            None => attrs.push_str(r#" fill="none""#),
            Some(Brush::Solid(color)) => {
                attrs.push_str(&format!(r#" fill="{}""#, color.to_hex()));
                if color.alpha < 1.0 {
                    attrs.push_str(&format!(r#" fill-opacity="{}""#, color.alpha));
                }
            }
            Some(Brush::Gradient(handle)) => {
                let name = self.gradient_names.get(handle).ok_or_else(|| {
                    GraphicsError::invalid_reference(
                        handle.to_string(),
                        "gradient was not collected",
                        0..0,
                    )
                })?;
                attrs.push_str(&format!(r#" fill="url(#{})""#, name));
            }
        }
        let transform = element.transform();
        if !transform.is_identity() {
            attrs.push_str(&format!(r#" transform="{}""#, matrix(transform)));
        }
        Ok(attrs)
    }

    /// Second pass: one element and its children
    fn write_element(&mut self, element: &Element) -> Result<()> {
        let common = self.common_attributes(element)?;
        match element {
            Element::Rectangle(rect) => {
                let f = rect.frame;
                let mut geometry = format!(
                    r#" x="{}" y="{}" width="{}" height="{}""#,
                    f.x, f.y, f.width, f.height
                );
                if rect.corner.width != 0.0 || rect.corner.height != 0.0 {
                    geometry.push_str(&format!(
                        r#" rx="{}" ry="{}""#,
                        rect.corner.width, rect.corner.height
                    ));
                }
                self.line(&format!("<rect{}{}/>", common, geometry));
            }
            Element::Ellipse(ellipse) => {
                let c = ellipse.frame.center();
                self.line(&format!(
                    r#"<ellipse{} cx="{}" cy="{}" rx="{}" ry="{}"/>"#,
                    common,
                    c.x,
                    c.y,
                    ellipse.frame.width / 2.0,
                    ellipse.frame.height / 2.0
                ));
            }
            Element::Line(line) => {
                self.line(&format!(
                    r#"<line{} x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                    common, line.start.x, line.start.y, line.end.x, line.end.y
                ));
            }
            Element::Path(path) => {
                self.line(&format!(
                    r#"<path{} d="{}"/>"#,
                    common,
                    path_data(&path.operations)
                ));
            }
            Element::Text(text) => {
                let open = format!("<text{}{}>", common, text_attributes(text));
                let spans: String = text.spans.iter().map(span_markup).collect();
                self.line(&format!("{}{}</text>", open, spans));
            }
            Element::Group(group) => {
                let mut open = format!("<g{}", common);
                if group.opacity != 1.0 {
                    open.push_str(&format!(r#" opacity="{}""#, group.opacity));
                }
                if group.children.is_empty() {
                    self.line(&format!("{}/>", open));
                    return Ok(());
                }
                self.line(&format!("{}>", open));
                self.indent += 1;
                for child in &group.children {
                    self.write_element(child)?;
                }
                self.indent -= 1;
                self.line("</g>");
            }
            Element::ForeignObject(object) => {
                self.line(&format!(
                    r#"<foreignObject{} x="{}" y="{}" width="{}" height="{}"/>"#,
                    common,
                    object.position.x,
                    object.position.y,
                    object.size.width,
                    object.size.height
                ));
            }
        }
        Ok(())
    }
}

fn pen_attributes(pen: Option<&Pen>) -> String {
    let Some(pen) = pen else {
        return r#" stroke="none""#.to_string();
    };
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{}" stroke-opacity="{}""#,
        pen.color.to_hex(),
        pen.width,
        pen.color.alpha
    );
    if let Some(dashes) = pen.dash_pattern.as_ref().filter(|d| !d.is_empty()) {
        let dashes: Vec<String> = dashes.iter().map(|d| d.to_string()).collect();
        attrs.push_str(&format!(r#" stroke-dasharray="{}""#, dashes.join(" ")));
    }
    attrs
}

fn matrix(t: &Transform) -> String {
    format!("matrix({} {} {} {} {} {})", t.a, t.b, t.c, t.d, t.e, t.f)
}

/// Path data using absolute `M`, `L`, `C`, `A` and `Z`
pub fn path_data(operations: &[PathOp]) -> String {
    operations
        .iter()
        .map(|op| match op {
            PathOp::MoveTo(p) => format!("M {} {}", p.x, p.y),
            PathOp::LineTo(p) => format!("L {} {}", p.x, p.y),
            PathOp::CurveTo {
                control1,
                control2,
                point,
            } => format!(
                "C {} {} {} {} {} {}",
                control1.x, control1.y, control2.x, control2.y, point.x, point.y
            ),
            PathOp::ArcTo {
                radius,
                large_arc,
                sweep_clockwise,
                point,
            } => format!(
                "A {} {} 0 {} {} {} {}",
                radius.width,
                radius.height,
                u8::from(*large_arc),
                u8::from(*sweep_clockwise),
                point.x,
                point.y
            ),
            PathOp::ClosePath => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_attributes(text: &Text) -> String {
    let font = &text.font;
    let mut attrs = format!(
        r#" x="{}" y="{}" font-family="{}" font-size="{}""#,
        text.frame.x,
        text.frame.y,
        escape_xml(&font.family),
        font.size
    );
    if font.weight != FONT_WEIGHT_NORMAL {
        attrs.push_str(&format!(r#" font-weight="{}""#, font.weight));
    }
    if font.style != FontStyle::Normal {
        attrs.push_str(&format!(r#" font-style="{}""#, font.style.as_str()));
    }
    attrs.push_str(&format!(
        r#" text-anchor="{}""#,
        text.alignment.text_anchor()
    ));
    attrs
}

fn span_markup(span: &TextSpan) -> String {
    let mut attrs = String::new();
    if let Some(p) = span.position {
        attrs.push_str(&format!(r#" x="{}" y="{}""#, p.x, p.y));
    }
    if let Some(family) = &span.font.family {
        attrs.push_str(&format!(r#" font-family="{}""#, escape_xml(family)));
    }
    if let Some(size) = span.font.size {
        attrs.push_str(&format!(r#" font-size="{}""#, size));
    }
    if let Some(weight) = span.font.weight {
        attrs.push_str(&format!(r#" font-weight="{}""#, weight));
    }
    if let Some(style) = span.font.style {
        attrs.push_str(&format!(r#" font-style="{}""#, style.as_str()));
    }
    format!("<tspan{}>{}</tspan>", attrs, escape_xml(&span.text))
}

fn gradient_def(name: &str, gradient: &Gradient) -> String {
    let (open, units, stops) = match gradient {
        Gradient::Linear(g) => (
            format!(
                r#"<linearGradient id="{}" x1="{}" y1="{}" x2="{}" y2="{}""#,
                name, g.start.x, g.start.y, g.end.x, g.end.y
            ),
            g.absolute,
            &g.stops,
        ),
        Gradient::Radial(g) => (
            format!(
                r#"<radialGradient id="{}" cx="{}" cy="{}" fx="{}" fy="{}" r="{}""#,
                name, g.center.x, g.center.y, g.focus.x, g.focus.y, g.radius.width
            ),
            g.absolute,
            &g.stops,
        ),
    };
    let tag = match gradient {
        Gradient::Linear(_) => "linearGradient",
        Gradient::Radial(_) => "radialGradient",
    };
    let mut def = open;
    if units {
        def.push_str(r#" gradientUnits="userSpaceOnUse""#);
    }
    if stops.is_empty() {
        def.push_str("/>");
        return def;
    }
    def.push('>');
    // Stops are public and may have been pushed out of order
    let mut sorted: Vec<&GradientStop> = stops.iter().collect();
    sorted.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    for stop in sorted {
        def.push('\n');
        def.push_str("  ");
        def.push_str(&stop_markup(stop));
    }
    def.push_str(&format!("\n</{}>", tag));
    def
}

fn stop_markup(stop: &GradientStop) -> String {
    format!(
        r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
        stop.offset,
        stop.color.to_hex(),
        stop.color.alpha
    )
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect, Size};
    use crate::scene::{Ellipse, Group, Path, Rectangle};
    use crate::style::{Color, LinearGradient};

    fn compact() -> SvgWriter {
        SvgWriter::with_config(WriterConfig::new().with_pretty_print(false))
    }

    #[test]
    fn test_header_and_root() {
        let graphic = Graphic::new(Size::new(100.0, 50.0));
        let svg = write_svg(&graphic).unwrap();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n"));
        assert!(svg.contains(r#"width="100px" height="50px" viewBox="0 0 100 50""#));
        assert!(svg.contains("<defs/>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_not_standalone_omits_declaration() {
        let writer = SvgWriter::with_config(WriterConfig::new().with_standalone(false));
        let svg = writer.write(&Graphic::new(Size::new(1.0, 1.0))).unwrap();
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn test_style_attributes() {
        let mut graphic = Graphic::new(Size::new(10.0, 10.0));
        graphic.push(
            Element::from(Rectangle::new(Rect::new(1.0, 2.0, 3.0, 4.0)))
                .with_id("r")
                .with_pen(Pen::new(Color::rgb(1.0, 0.0, 0.0), 2.0))
                .with_brush(Color::BLACK.with_alpha(0.5)),
        );
        let svg = compact().write(&graphic).unwrap();
        assert!(svg.contains(
            r##"<rect id="r" stroke="#FF0000" stroke-width="2" stroke-opacity="1" fill="#000000" fill-opacity="0.5" x="1" y="2" width="3" height="4"/>"##
        ));
    }

    #[test]
    fn test_no_pen_no_brush() {
        let mut graphic = Graphic::new(Size::new(10.0, 10.0));
        graphic.push(Ellipse::circle(Point::new(5.0, 5.0), 2.0));
        let svg = compact().write(&graphic).unwrap();
        assert!(svg.contains(
            r#"<ellipse stroke="none" fill="none" cx="5" cy="5" rx="2" ry="2"/>"#
        ));
    }

    #[test]
    fn test_transform_matrix() {
        let mut graphic = Graphic::new(Size::new(10.0, 10.0));
        graphic.push(
            Element::from(Rectangle::new(Rect::new(0.0, 0.0, 1.0, 1.0)))
                .with_transform(Transform::translate(3.0, 4.0)),
        );
        let svg = compact().write(&graphic).unwrap();
        assert!(svg.contains(r#"transform="matrix(1 0 0 1 3 4)""#));
    }

    #[test]
    fn test_shared_gradient_written_once() {
        let mut graphic = Graphic::new(Size::new(10.0, 10.0));
        let brush = graphic.gradient_brush(Gradient::Linear(
            LinearGradient::default()
                .with_stop(1.0, Color::WHITE)
                .with_stop(0.0, Color::BLACK),
        ));
        let mut group = Group::default();
        group.push(Element::from(Rectangle::new(Rect::new(0.0, 0.0, 1.0, 1.0))).with_brush(brush));
        graphic.push(group);
        graphic.push(Element::from(Ellipse::circle(Point::ZERO, 1.0)).with_brush(brush));

        let svg = compact().write(&graphic).unwrap();
        assert_eq!(svg.matches("<linearGradient ").count(), 1);
        assert_eq!(svg.matches(r#"fill="url(#linearGradient-1)""#).count(), 2);
        let black = svg.find(r#"offset="0""#).unwrap();
        let white = svg.find(r#"offset="1""#).unwrap();
        assert!(black < white);
    }

    #[test]
    fn test_unsorted_stops_are_written_in_order() {
        let mut gradient = LinearGradient::default();
        gradient.stops.push(GradientStop::new(0.75, Color::WHITE));
        gradient.stops.push(GradientStop::new(0.25, Color::BLACK));
        gradient.stops.push(GradientStop::new(0.5, Color::rgb(1.0, 0.0, 0.0)));
        let mut graphic = Graphic::new(Size::new(10.0, 10.0));
        let brush = graphic.gradient_brush(Gradient::Linear(gradient));
        graphic.push(Element::from(Rectangle::new(Rect::new(0.0, 0.0, 1.0, 1.0))).with_brush(brush));

        let svg = compact().write(&graphic).unwrap();
        let first = svg.find(r#"offset="0.25""#).unwrap();
        let second = svg.find(r#"offset="0.5""#).unwrap();
        let third = svg.find(r#"offset="0.75""#).unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_missing_gradient_is_an_error() {
        let mut graphic = Graphic::new(Size::new(10.0, 10.0));
        graphic.push(
            Element::from(Rectangle::new(Rect::new(0.0, 0.0, 1.0, 1.0)))
                .with_brush(Brush::Gradient(GradientId(7))),
        );
        assert!(matches!(
            write_svg(&graphic),
            Err(GraphicsError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_path_data() {
        let mut path = Path::new(Vec::new());
        path.move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(10.0, 0.0))
            .arc_to(Size::new(5.0, 5.0), false, true, Point::new(10.0, 10.0))
            .close();
        assert_eq!(
            path_data(&path.operations),
            "M 0 0 L 10 0 A 5 5 0 0 1 10 10 Z"
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
