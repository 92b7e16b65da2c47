//! Scene graph nodes

use crate::geometry::{Point, Rect, Size, Transform};
use crate::path::PathOp;
use crate::style::{Brush, Font, FontOverride, Pen, TextAlignment};

/// State shared by every element kind
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementCommon {
    pub id: Option<String>,
    pub transform: Transform,
    pub pen: Option<Pen>,
    pub brush: Option<Brush>,
}

impl ElementCommon {
    pub fn new(pen: Option<Pen>, brush: Option<Brush>) -> Self {
        Self {
            pen,
            brush,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub common: ElementCommon,
    pub frame: Rect,
    /// Corner radii; zero for square corners
    pub corner: Size,
}

impl Rectangle {
    pub fn new(frame: Rect) -> Self {
        Self {
            common: ElementCommon::default(),
            frame,
            corner: Size::ZERO,
        }
    }

    pub fn with_corner(mut self, corner: Size) -> Self {
        self.corner = corner;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub common: ElementCommon,
    pub frame: Rect,
}

impl Ellipse {
    pub fn new(frame: Rect) -> Self {
        Self {
            common: ElementCommon::default(),
            frame,
        }
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(Rect::new(
            center.x - radius,
            center.y - radius,
            2.0 * radius,
            2.0 * radius,
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub common: ElementCommon,
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            common: ElementCommon::default(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub common: ElementCommon,
    pub operations: Vec<PathOp>,
}

impl Path {
    pub fn new(operations: Vec<PathOp>) -> Self {
        Self {
            common: ElementCommon::default(),
            operations,
        }
    }

    pub fn move_to(&mut self, point: Point) -> &mut Self {
        self.operations.push(PathOp::MoveTo(point));
        self
    }

    pub fn line_to(&mut self, point: Point) -> &mut Self {
        self.operations.push(PathOp::LineTo(point));
        self
    }

    pub fn curve_to(&mut self, control1: Point, control2: Point, point: Point) -> &mut Self {
        self.operations.push(PathOp::CurveTo {
            control1,
            control2,
            point,
        });
        self
    }

    pub fn arc_to(
        &mut self,
        radius: Size,
        large_arc: bool,
        sweep_clockwise: bool,
        point: Point,
    ) -> &mut Self {
        self.operations.push(PathOp::ArcTo {
            radius,
            large_arc,
            sweep_clockwise,
            point,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.operations.push(PathOp::ClosePath);
        self
    }
}

/// A run of text sharing one font override
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextSpan {
    pub text: String,
    pub font: FontOverride,
    /// Absolute start position, when the span was placed explicitly
    pub position: Option<Point>,
}

impl TextSpan {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub common: ElementCommon,
    /// Layout box; the origin is the baseline start of the first span
    pub frame: Rect,
    pub font: Font,
    pub alignment: TextAlignment,
    pub spans: Vec<TextSpan>,
}

impl Text {
    pub fn new(text: impl Into<String>, frame: Rect, font: Font) -> Self {
        Self {
            common: ElementCommon::default(),
            frame,
            font,
            alignment: TextAlignment::Left,
            spans: vec![TextSpan::new(text)],
        }
    }

    /// All span text joined together
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub common: ElementCommon,
    pub children: Vec<Element>,
    pub opacity: f64,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            common: ElementCommon::default(),
            children: Vec::new(),
            opacity: 1.0,
        }
    }
}

impl Group {
    pub fn new(children: Vec<Element>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    pub fn push(&mut self, child: impl Into<Element>) {
        self.children.push(child.into());
    }
}

/// Embedded content the scene cannot draw itself
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignObject {
    pub common: ElementCommon,
    pub position: Point,
    pub size: Size,
}

impl ForeignObject {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            common: ElementCommon::default(),
            position,
            size,
        }
    }
}

/// A node of the scene graph
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Path(Path),
    Text(Text),
    Group(Group),
    ForeignObject(ForeignObject),
}

macro_rules! impl_element_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Element {
                fn from(value: $variant) -> Self {
                    Element::$variant(value)
                }
            }
        )*
    };
}

impl_element_from!(Rectangle, Ellipse, Line, Path, Text, Group, ForeignObject);

impl Element {
    pub fn common(&self) -> &ElementCommon {
        match self {
            Element::Rectangle(e) => &e.common,
            Element::Ellipse(e) => &e.common,
            Element::Line(e) => &e.common,
            Element::Path(e) => &e.common,
            Element::Text(e) => &e.common,
            Element::Group(e) => &e.common,
            Element::ForeignObject(e) => &e.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut ElementCommon {
        match self {
            Element::Rectangle(e) => &mut e.common,
            Element::Ellipse(e) => &mut e.common,
            Element::Line(e) => &mut e.common,
            Element::Path(e) => &mut e.common,
            Element::Text(e) => &mut e.common,
            Element::Group(e) => &mut e.common,
            Element::ForeignObject(e) => &mut e.common,
        }
    }

    /// Element kind as a lowercase word, for messages
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Rectangle(_) => "rectangle",
            Element::Ellipse(_) => "ellipse",
            Element::Line(_) => "line",
            Element::Path(_) => "path",
            Element::Text(_) => "text",
            Element::Group(_) => "group",
            Element::ForeignObject(_) => "foreign object",
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.common().id.as_deref()
    }

    pub fn transform(&self) -> &Transform {
        &self.common().transform
    }

    pub fn pen(&self) -> Option<&Pen> {
        self.common().pen.as_ref()
    }

    pub fn brush(&self) -> Option<&Brush> {
        self.common().brush.as_ref()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.common_mut().id = Some(id.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.common_mut().transform = transform;
        self
    }

    pub fn with_pen(mut self, pen: Pen) -> Self {
        self.common_mut().pen = Some(pen);
        self
    }

    pub fn with_brush(mut self, brush: impl Into<Brush>) -> Self {
        self.common_mut().brush = Some(brush.into());
        self
    }

    /// Call `f` on this element and every descendant, parents first
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        f(self);
        if let Element::Group(group) = self {
            for child in &group.children {
                child.visit(f);
            }
        }
    }
}
