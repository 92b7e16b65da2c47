//! Vector Scene - A vector-graphics document model with an SVG reader and writer
//!
//! This library provides a scene graph of drawable shapes, a geometry kernel
//! for transforms, sampling and bounding boxes, and conversion from and to SVG.
//!
//! # Example
//!
//! ```rust
//! use vector_scene::{read_svg, write_svg};
//!
//! let graphic = read_svg(r#"<svg width="100" height="50"><rect width="10" height="10"/></svg>"#).unwrap();
//! assert_eq!(graphic.children.len(), 1);
//!
//! let svg = write_svg(&graphic).unwrap();
//! assert!(svg.contains("<rect"));
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod path;
pub mod reader;
pub mod scene;
pub mod style;
pub mod writer;

pub use canvas::{Canvas, CanvasState, DrawCache, GraphicCanvas, HeadlessPlatform, Platform};
pub use config::{Settings, SettingsError};
pub use error::{GraphicsError, Result, Span};
pub use geometry::{Point, Rect, Size, Transform};
pub use path::{PathOp, SampleConfig};
pub use reader::{read_svg, ReaderConfig, SvgReader};
pub use scene::{Element, Graphic};
pub use style::{Brush, Color, Font, Gradient, Pen};
pub use writer::{write_svg, SvgWriter, WriterConfig};

/// Read SVG source and write it back out with the given settings
///
/// # Example
///
/// ```rust
/// use vector_scene::{convert, Settings};
///
/// let svg = convert(r#"<svg viewBox="0 0 10 10"><circle r="2"/></svg>"#, &Settings::default()).unwrap();
/// assert!(svg.contains(r#"<ellipse"#));
/// ```
pub fn convert(source: &str, settings: &Settings) -> Result<String> {
    let graphic = SvgReader::with_config(settings.reader).read(source)?;
    SvgWriter::with_config(settings.writer.clone()).write(&graphic)
}

/// One-line description of the graphic's bounding box.
///
/// The outline is also sampled with `sampling`. Failing to sample, such as for
/// arcs or foreign objects, is logged as a warning and does not fail the
/// summary.
pub fn bounds_summary(graphic: &Graphic, sampling: &SampleConfig) -> Result<String> {
    let bounds = graphic.bounding_box()?;
    match graphic.edge_samples(sampling) {
        Ok(runs) => log::info!("outline sampled into {} runs", runs.len()),
        Err(e) => log::warn!("outline could not be sampled: {}", e),
    }
    Ok(format!(
        "x={} y={} width={} height={}\n",
        bounds.x, bounds.y, bounds.width, bounds.height
    ))
}
