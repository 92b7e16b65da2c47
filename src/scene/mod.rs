//! Scene graph: elements, the graphic root, sampling and drawing

pub mod draw;
pub mod element;
pub mod graphic;
pub mod sampling;

pub use draw::resolve_brush;
pub use element::{
    Element, ElementCommon, Ellipse, ForeignObject, Group, Line, Path, Rectangle, Text, TextSpan,
};
pub use graphic::Graphic;
