//! Drawing the scene graph onto a canvas

use crate::canvas::{Canvas, CanvasState, Paint, Platform};
use crate::error::{GraphicsError, Result};
use crate::geometry::{Point, Rect};
use crate::path::PathOp;
use crate::style::{Brush, Gradient, GradientArena};

use super::element::{Element, Text};
use super::graphic::Graphic;

/// Look up the gradient behind a brush
pub fn resolve_brush<'a>(brush: &Brush, gradients: &'a GradientArena) -> Result<Paint<'a>> {
    match brush {
        Brush::Solid(color) => Ok(Paint::Solid(*color)),
        Brush::Gradient(id) => match gradients.get(*id) {
            Some(Gradient::Linear(g)) => Ok(Paint::Linear(g)),
            Some(Gradient::Radial(g)) => Ok(Paint::Radial(g)),
            None => Err(GraphicsError::invalid_reference(
                id.to_string(),
                "gradient is not stored in this graphic",
                0..0,
            )),
        },
    }
}

impl Element {
    /// Draw onto `canvas`.
    ///
    /// A non-identity transform is applied inside a saved canvas state, which is
    /// restored even when drawing fails.
    pub fn draw(&self, canvas: &mut dyn Canvas, gradients: &GradientArena) -> Result<()> {
        let transform = self.transform();
        if transform.is_identity() {
            return self.draw_local(canvas, gradients);
        }
        let mut state = CanvasState::save(canvas)?;
        state.transform(transform)?;
        self.draw_local(&mut *state, gradients)
    }

    fn draw_local(&self, canvas: &mut dyn Canvas, gradients: &GradientArena) -> Result<()> {
        let pen = self.pen();
        let brush = self
            .brush()
            .map(|b| resolve_brush(b, gradients))
            .transpose()?;
        match self {
            Element::Rectangle(rect) => canvas.draw_rectangle(rect.frame, rect.corner, pen, brush),
            Element::Ellipse(ellipse) => canvas.draw_ellipse(ellipse.frame, pen, brush),
            Element::Line(line) => {
                let ops = [PathOp::MoveTo(line.start), PathOp::LineTo(line.end)];
                canvas.draw_path(&ops, pen, None)
            }
            Element::Path(path) => canvas.draw_path(&path.operations, pen, brush),
            Element::Text(text) => draw_text(text, canvas, brush),
            Element::Group(group) => {
                for child in &group.children {
                    child.draw(canvas, gradients)?;
                }
                Ok(())
            }
            Element::ForeignObject(_) => {
                Err(GraphicsError::unsupported("drawing a foreign object"))
            }
        }
    }
}

/// Spans are drawn one after another along the baseline, each starting where
/// the previous one ended unless it carries its own position
fn draw_text(text: &Text, canvas: &mut dyn Canvas, brush: Option<Paint<'_>>) -> Result<()> {
    let pen = text.common.pen.as_ref();
    let mut cursor = text.frame.top_left();
    for span in &text.spans {
        let font = span.font.apply(&text.font);
        if let Some(position) = span.position {
            cursor = position;
        }
        let frame = Rect::new(cursor.x, cursor.y, text.frame.width, text.frame.height);
        canvas.draw_text(&span.text, frame, &font, text.alignment, pen, brush)?;
        let metrics = canvas.measure_text(&span.text, &font);
        cursor = Point::new(cursor.x + metrics.width, cursor.y);
    }
    Ok(())
}

impl Text {
    /// Frame the text occupies, measured with `platform`.
    ///
    /// The top of the frame sits one ascent above the baseline origin.
    pub fn measure(&self, platform: &dyn Platform) -> Rect {
        let mut cursor = self.frame.top_left();
        let mut ascent: f64 = 0.0;
        let mut descent: f64 = 0.0;
        let mut left = cursor.x;
        let mut right = cursor.x;
        for span in &self.spans {
            let font = span.font.apply(&self.font);
            if let Some(position) = span.position {
                cursor = position;
            }
            let metrics = platform.measure_text(&span.text, &font);
            left = left.min(cursor.x);
            right = right.max(cursor.x + metrics.width);
            ascent = ascent.max(metrics.ascent);
            descent = descent.max(metrics.descent);
            cursor = Point::new(cursor.x + metrics.width, cursor.y);
        }
        let baseline = self.frame.y;
        Rect::new(left, baseline - ascent, right - left, ascent + descent)
    }
}

impl Graphic {
    /// Draw every child with the view box mapped onto the graphic's size
    pub fn draw(&self, canvas: &mut dyn Canvas) -> Result<()> {
        let transform = self.transform();
        if transform.is_identity() {
            return self.draw_children(canvas);
        }
        let mut state = CanvasState::save(canvas)?;
        state.transform(&transform)?;
        self.draw_children(&mut *state)
    }

    fn draw_children(&self, canvas: &mut dyn Canvas) -> Result<()> {
        for child in &self.children {
            child.draw(canvas, &self.gradients)?;
        }
        Ok(())
    }
}
