//! Root of the scene graph

use crate::error::Result;
use crate::geometry::{BoundsBuilder, Rect, Size, Transform};
use crate::path::{EdgeSamples, SampleConfig};
use crate::style::{Brush, Gradient, GradientArena, GradientId};

use super::element::Element;

/// A document: top-level elements, their gradients, and the mapping from the
/// view box onto the nominal size
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graphic {
    pub size: Size,
    pub view_box: Rect,
    pub title: Option<String>,
    pub description: Option<String>,
    pub children: Vec<Element>,
    pub gradients: GradientArena,
}

impl Graphic {
    /// Empty graphic whose view box matches its size
    pub fn new(size: Size) -> Self {
        Self {
            size,
            view_box: Rect::from_size(size),
            ..Self::default()
        }
    }

    pub fn with_view_box(mut self, view_box: Rect) -> Self {
        self.view_box = view_box;
        self
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.children.push(element.into());
    }

    pub fn add_gradient(&mut self, gradient: Gradient) -> GradientId {
        self.gradients.add(gradient)
    }

    /// Brush referring to a new gradient stored in this graphic
    pub fn gradient_brush(&mut self, gradient: Gradient) -> Brush {
        Brush::Gradient(self.add_gradient(gradient))
    }

    /// Maps view box coordinates onto `(0, 0, size)`.
    ///
    /// Identity when either the size or the view box has a zero dimension.
    pub fn transform(&self) -> Transform {
        if self.size.is_degenerate() || self.view_box.size().is_degenerate() {
            return Transform::IDENTITY;
        }
        Transform::stretch_fill_rect(&self.view_box, &Rect::from_size(self.size))
    }

    /// Union of the children's bounds, in view box coordinates
    pub fn bounding_box(&self) -> Result<Rect> {
        let mut builder = BoundsBuilder::new();
        for child in &self.children {
            if let Some(r) = child.bounds()? {
                builder.add_rect(&r);
            }
        }
        Ok(builder.build().unwrap_or_default())
    }

    /// Edge samples of every child, in view box coordinates
    pub fn edge_samples(&self, config: &SampleConfig) -> Result<Vec<EdgeSamples>> {
        let mut all = Vec::new();
        for child in &self.children {
            all.extend(child.edge_samples(config)?);
        }
        Ok(all)
    }

    /// Call `f` on every element in document order
    pub fn visit<'a>(&'a self, mut f: impl FnMut(&'a Element)) {
        for child in &self.children {
            child.visit(&mut f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::scene::element::{Group, Rectangle};

    #[test]
    fn test_transform_stretches_view_box() {
        let g = Graphic::new(Size::new(200.0, 100.0)).with_view_box(Rect::new(0.0, 0.0, 20.0, 20.0));
        let t = g.transform();
        assert_eq!(t.transform_point(Point::new(20.0, 20.0)), Point::new(200.0, 100.0));
    }

    #[test]
    fn test_degenerate_size_gives_identity() {
        let g = Graphic::new(Size::new(0.0, 100.0)).with_view_box(Rect::new(0.0, 0.0, 20.0, 20.0));
        assert!(g.transform().is_identity());
        let g = Graphic::new(Size::new(10.0, 100.0)).with_view_box(Rect::new(0.0, 0.0, 0.0, 20.0));
        assert!(g.transform().is_identity());
    }

    #[test]
    fn test_bounding_box_skips_empty_groups() {
        let mut g = Graphic::new(Size::new(100.0, 100.0));
        g.push(Group::default());
        g.push(Rectangle::new(Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert_eq!(g.bounding_box().unwrap(), Rect::new(10.0, 10.0, 5.0, 5.0));
    }
}
