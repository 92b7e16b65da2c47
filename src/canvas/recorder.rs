//! Canvas that records draw calls as scene graph elements

use crate::error::{GraphicsError, Result};
use crate::geometry::{Rect, Size, Transform};
use crate::path::PathOp;
use crate::scene::{Element, ElementCommon, Ellipse, Graphic, Path, Rectangle, Text, TextSpan};
use crate::style::{Brush, Font, Gradient, Pen, TextAlignment};

use super::{Canvas, Image, Paint, Platform, TextMetrics};

/// Builds a [`Graphic`] out of draw calls.
///
/// `transform` composes onto a current transform that is stamped onto every
/// element recorded afterwards. Nested state is not tracked, so
/// `save_state`/`restore_state` fail rather than lose a transform.
pub struct GraphicCanvas<'a> {
    graphic: Graphic,
    current_transform: Transform,
    platform: &'a dyn Platform,
}

impl<'a> GraphicCanvas<'a> {
    pub fn new(size: Size, platform: &'a dyn Platform) -> Self {
        Self {
            graphic: Graphic::new(size),
            current_transform: Transform::IDENTITY,
            platform,
        }
    }

    pub fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    pub fn into_graphic(self) -> Graphic {
        self.graphic
    }

    pub fn current_transform(&self) -> Transform {
        self.current_transform
    }

    fn common(&mut self, pen: Option<&Pen>, brush: Option<Paint<'_>>) -> ElementCommon {
        let brush = brush.map(|paint| self.record_paint(paint));
        ElementCommon {
            id: None,
            transform: self.current_transform,
            pen: pen.cloned(),
            brush,
        }
    }

    /// Store gradients in the recorded graphic, reusing equal ones
    fn record_paint(&mut self, paint: Paint<'_>) -> Brush {
        let gradient = match paint {
            Paint::Solid(color) => return Brush::Solid(color),
            Paint::Linear(g) => Gradient::Linear(g.clone()),
            Paint::Radial(g) => Gradient::Radial(g.clone()),
        };
        Brush::Gradient(self.graphic.gradients.intern(gradient))
    }

    fn record(&mut self, element: impl Into<Element>) {
        self.graphic.children.push(element.into());
    }
}

impl Canvas for GraphicCanvas<'_> {
    fn save_state(&mut self) -> Result<()> {
        Err(GraphicsError::unsupported("save_state on a recording canvas"))
    }

    fn restore_state(&mut self) -> Result<()> {
        Err(GraphicsError::unsupported("restore_state on a recording canvas"))
    }

    fn transform(&mut self, transform: &Transform) -> Result<()> {
        self.current_transform = self.current_transform * *transform;
        Ok(())
    }

    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics {
        self.platform.measure_text(text, font)
    }

    fn draw_text(
        &mut self,
        text: &str,
        frame: Rect,
        font: &Font,
        alignment: TextAlignment,
        pen: Option<&Pen>,
        brush: Option<Paint<'_>>,
    ) -> Result<()> {
        let common = self.common(pen, brush);
        self.record(Text {
            common,
            frame,
            font: font.clone(),
            alignment,
            spans: vec![TextSpan::new(text)],
        });
        Ok(())
    }

    fn draw_path(
        &mut self,
        operations: &[PathOp],
        pen: Option<&Pen>,
        brush: Option<Paint<'_>>,
    ) -> Result<()> {
        let common = self.common(pen, brush);
        self.record(Path {
            common,
            operations: operations.to_vec(),
        });
        Ok(())
    }

    fn draw_rectangle(
        &mut self,
        frame: Rect,
        corner: Size,
        pen: Option<&Pen>,
        brush: Option<Paint<'_>>,
    ) -> Result<()> {
        let common = self.common(pen, brush);
        self.record(Rectangle {
            common,
            frame,
            corner,
        });
        Ok(())
    }

    fn draw_ellipse(
        &mut self,
        frame: Rect,
        pen: Option<&Pen>,
        brush: Option<Paint<'_>>,
    ) -> Result<()> {
        let common = self.common(pen, brush);
        self.record(Ellipse { common, frame });
        Ok(())
    }

    fn draw_image(&mut self, _image: &dyn Image, _frame: Rect, _alpha: f64) -> Result<()> {
        Err(GraphicsError::unsupported("draw_image on a recording canvas"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::HeadlessPlatform;
    use crate::geometry::Point;
    use crate::style::{Color, LinearGradient};

    #[test]
    fn test_records_shapes_in_order() {
        let platform = HeadlessPlatform;
        let mut canvas = GraphicCanvas::new(Size::new(50.0, 50.0), &platform);
        canvas
            .draw_rectangle(
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Size::ZERO,
                None,
                Some(Paint::Solid(Color::WHITE)),
            )
            .unwrap();
        canvas
            .draw_ellipse(Rect::new(5.0, 5.0, 10.0, 10.0), Some(&Pen::default()), None)
            .unwrap();
        let graphic = canvas.into_graphic();
        assert_eq!(graphic.children.len(), 2);
        assert_eq!(graphic.children[0].kind(), "rectangle");
        assert_eq!(graphic.children[1].kind(), "ellipse");
        assert!(graphic.children[1].brush().is_none());
    }

    #[test]
    fn test_transform_applies_to_later_elements() {
        let platform = HeadlessPlatform;
        let mut canvas = GraphicCanvas::new(Size::new(50.0, 50.0), &platform);
        canvas.draw_ellipse(Rect::new(0.0, 0.0, 1.0, 1.0), None, None).unwrap();
        canvas.transform(&Transform::translate(5.0, 0.0)).unwrap();
        canvas.transform(&Transform::scale(2.0, 2.0)).unwrap();
        canvas.draw_ellipse(Rect::new(0.0, 0.0, 1.0, 1.0), None, None).unwrap();
        let graphic = canvas.into_graphic();
        assert!(graphic.children[0].transform().is_identity());
        let t = graphic.children[1].transform();
        assert_eq!(t.transform_point(Point::new(1.0, 1.0)), Point::new(7.0, 2.0));
    }

    #[test]
    fn test_state_stack_is_unsupported() {
        let platform = HeadlessPlatform;
        let mut canvas = GraphicCanvas::new(Size::new(1.0, 1.0), &platform);
        assert!(matches!(canvas.save_state(), Err(GraphicsError::UnsupportedOperation(_))));
        assert!(matches!(canvas.restore_state(), Err(GraphicsError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_gradients_are_interned() {
        let platform = HeadlessPlatform;
        let mut canvas = GraphicCanvas::new(Size::new(10.0, 10.0), &platform);
        let gradient = LinearGradient::default()
            .with_stop(0.0, Color::BLACK)
            .with_stop(1.0, Color::WHITE);
        for _ in 0..2 {
            canvas
                .draw_rectangle(
                    Rect::new(0.0, 0.0, 1.0, 1.0),
                    Size::ZERO,
                    None,
                    Some(Paint::Linear(&gradient)),
                )
                .unwrap();
        }
        let graphic = canvas.into_graphic();
        assert_eq!(graphic.gradients.len(), 1);
        assert_eq!(graphic.children[0].brush(), graphic.children[1].brush());
    }

    #[test]
    fn test_measure_text_uses_platform() {
        let platform = HeadlessPlatform;
        let canvas = GraphicCanvas::new(Size::new(10.0, 10.0), &platform);
        let m = canvas.measure_text("ab", &Font::new("mono", 10.0));
        assert_eq!(m.width, 12.0);
    }
}
