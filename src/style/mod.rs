//! Style model: colors, pens, brushes, gradients and fonts

pub mod brush;
pub mod color;
pub mod font;
pub mod pen;

pub use brush::{
    Brush, Gradient, GradientArena, GradientId, GradientStop, LinearGradient, RadialGradient,
};
pub use color::Color;
pub use font::{Font, FontOverride, FontStyle, TextAlignment};
pub use pen::Pen;
