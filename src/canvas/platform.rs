//! Platform capabilities: text metrics and image I/O
//!
//! The scene graph never reaches for a global platform. Anything that needs
//! text measurement or images takes a `&dyn Platform` explicitly.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::sync::Arc;

use crate::error::{GraphicsError, Result};
use crate::geometry::Size;
use crate::style::{Color, Font};

use super::{Canvas, TextMetrics};

/// A decoded bitmap
pub trait Image: Send + Sync {
    /// Size in points (pixels divided by scale)
    fn size(&self) -> Size;
    fn scale(&self) -> f64;
    fn save_as_png(&self, out: &mut dyn Write) -> Result<()>;
}

/// A canvas that rasterizes into a new image
pub trait ImageCanvas: Canvas {
    fn size(&self) -> Size;
    fn scale(&self) -> f64;
    fn into_image(self: Box<Self>) -> Result<Arc<dyn Image>>;
}

pub trait Platform {
    fn name(&self) -> &str;
    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics;
    fn create_image_canvas(
        &self,
        size: Size,
        scale: f64,
        transparency: bool,
    ) -> Result<Box<dyn ImageCanvas>>;
    fn load_image(&self, source: &mut dyn Read) -> Result<Arc<dyn Image>>;
    /// Build an image from row-major colors, `width` pixels per row
    fn create_image(&self, colors: &[Color], width: usize, scale: f64) -> Result<Arc<dyn Image>>;
    fn open_write(&self, path: &std::path::Path) -> Result<Box<dyn Write>>;
}

/// In-memory RGBA image
#[derive(Debug, Clone, PartialEq)]
pub struct PixelImage {
    pub colors: Vec<Color>,
    pub width: usize,
    pub scale: f64,
}

impl PixelImage {
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.colors.len() / self.width
        }
    }
}

impl Image for PixelImage {
    fn size(&self) -> Size {
        Size::new(
            self.width as f64 / self.scale,
            self.height() as f64 / self.scale,
        )
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn save_as_png(&self, _out: &mut dyn Write) -> Result<()> {
        Err(GraphicsError::unsupported("PNG encoding without a platform backend"))
    }
}

/// Platform for running without a graphics backend.
///
/// Text is measured with fixed per-character proportions of the font size.
/// Rasterizing and image decoding are not available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPlatform;

impl HeadlessPlatform {
    const CHAR_WIDTH: f64 = 0.6;
    const ASCENT: f64 = 0.8;
    const DESCENT: f64 = 0.2;
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &str {
        "headless"
    }

    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f64 * font.size * Self::CHAR_WIDTH,
            ascent: font.size * Self::ASCENT,
            descent: font.size * Self::DESCENT,
        }
    }

    fn create_image_canvas(
        &self,
        _size: Size,
        _scale: f64,
        _transparency: bool,
    ) -> Result<Box<dyn ImageCanvas>> {
        Err(GraphicsError::unsupported("image canvas on the headless platform"))
    }

    fn load_image(&self, _source: &mut dyn Read) -> Result<Arc<dyn Image>> {
        Err(GraphicsError::unsupported("image decoding on the headless platform"))
    }

    fn create_image(&self, colors: &[Color], width: usize, scale: f64) -> Result<Arc<dyn Image>> {
        if width == 0 || colors.len() % width != 0 {
            return Err(GraphicsError::unsupported(format!(
                "{} pixels do not form rows of width {}",
                colors.len(),
                width
            )));
        }
        Ok(Arc::new(PixelImage {
            colors: colors.to_vec(),
            width,
            scale,
        }))
    }

    fn open_write(&self, path: &std::path::Path) -> Result<Box<dyn Write>> {
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
