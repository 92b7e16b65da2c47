//! Geometry kernel: value types and affine transforms
//!
//! Pure math with no dependencies on the rest of the crate.

pub mod transform;
pub mod types;

pub use transform::Transform;
pub use types::{Point, Rect, Size};

/// Incremental axis-aligned bounding box.
///
/// The builder starts empty. The first point seeds a zero-size rectangle at
/// that point, so the origin never leaks into the result the way it would when
/// starting from `Rect::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsBuilder {
    rect: Option<Rect>,
}

impl BoundsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: Point) {
        self.rect = Some(match self.rect {
            Some(r) => r.union_point(point),
            None => Rect::from_origin_size(point, Size::ZERO),
        });
    }

    pub fn add_points(&mut self, points: impl IntoIterator<Item = Point>) {
        for p in points {
            self.add_point(p);
        }
    }

    pub fn add_rect(&mut self, rect: &Rect) {
        self.rect = Some(match self.rect {
            Some(r) => r.union(rect),
            None => *rect,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    /// The accumulated box, `None` if nothing was added
    pub fn build(&self) -> Option<Rect> {
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder() {
        assert!(BoundsBuilder::new().build().is_none());
    }

    #[test]
    fn test_single_point_is_zero_size() {
        let mut b = BoundsBuilder::new();
        b.add_point(Point::new(5.0, -3.0));
        assert_eq!(b.build(), Some(Rect::new(5.0, -3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_points_far_from_origin() {
        let mut b = BoundsBuilder::new();
        b.add_points([Point::new(10.0, 10.0), Point::new(20.0, 15.0), Point::new(12.0, 30.0)]);
        assert_eq!(b.build(), Some(Rect::new(10.0, 10.0, 10.0, 20.0)));
    }

    #[test]
    fn test_union_matches_envelope_in_any_order() {
        let points = [
            Point::new(3.0, 1.0),
            Point::new(-2.0, 7.0),
            Point::new(5.0, -4.0),
            Point::new(0.0, 0.5),
        ];
        let mut forward = BoundsBuilder::new();
        forward.add_points(points);
        let mut backward = BoundsBuilder::new();
        backward.add_points(points.iter().rev().copied());
        assert_eq!(forward.build(), backward.build());
        assert_eq!(forward.build(), Some(Rect::new(-2.0, -4.0, 7.0, 11.0)));
    }
}
