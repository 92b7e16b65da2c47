//! Drawing surface abstraction
//!
//! The scene graph draws itself onto anything implementing [`Canvas`].
//! Rasterizing backends live outside this crate; [`GraphicCanvas`] records the
//! calls back into a [`Graphic`](crate::scene::Graphic).

pub mod cache;
pub mod platform;
pub mod recorder;
pub mod state;

pub use cache::DrawCache;
pub use platform::{HeadlessPlatform, Image, ImageCanvas, Platform};
pub use recorder::GraphicCanvas;
pub use state::CanvasState;

use crate::error::Result;
use crate::geometry::{Rect, Size, Transform};
use crate::path::PathOp;
use crate::style::{Color, Font, LinearGradient, Pen, RadialGradient, TextAlignment};

/// Measured extent of a run of text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl TextMetrics {
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// A brush with its gradient already looked up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint<'a> {
    Solid(Color),
    Linear(&'a LinearGradient),
    Radial(&'a RadialGradient),
}

/// Drawing target.
///
/// State changes nest: every `save_state` must be matched by one
/// `restore_state`. Use [`CanvasState`] rather than pairing them by hand.
pub trait Canvas {
    fn save_state(&mut self) -> Result<()>;
    fn restore_state(&mut self) -> Result<()>;

    /// Concatenate `transform` onto the current transform
    fn transform(&mut self, transform: &Transform) -> Result<()>;

    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics;

    fn draw_text(
        &mut self,
        text: &str,
        frame: Rect,
        font: &Font,
        alignment: TextAlignment,
        pen: Option<&Pen>,
        brush: Option<Paint<'_>>,
    ) -> Result<()>;

    fn draw_path(
        &mut self,
        operations: &[PathOp],
        pen: Option<&Pen>,
        brush: Option<Paint<'_>>,
    ) -> Result<()>;

    fn draw_rectangle(
        &mut self,
        frame: Rect,
        corner: Size,
        pen: Option<&Pen>,
        brush: Option<Paint<'_>>,
    ) -> Result<()>;

    fn draw_ellipse(
        &mut self,
        frame: Rect,
        pen: Option<&Pen>,
        brush: Option<Paint<'_>>,
    ) -> Result<()>;

    fn draw_image(&mut self, image: &dyn Image, frame: Rect, alpha: f64) -> Result<()>;
}
