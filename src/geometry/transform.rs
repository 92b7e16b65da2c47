//! 2D affine transforms.
//!
//! A [`Transform`] holds the six free parameters of the matrix
//!
//! ```text
//! | a  c  e |
//! | b  d  f |
//! | 0  0  1 |
//! ```
//!
//! so a point maps to `(a*x + c*y + e, b*x + d*y + f)`.
//!
//! ## Composition order
//!
//! `t1 * t2` is the ordinary matrix product: the result applies `t2` first and
//! `t1` second. Nested groups therefore compose as `parent * child`, and a
//! transform list such as `translate(10) scale(2)` reads left to right as
//! `translate * scale` (scale is applied to the point first).
//!
//! ## Rotation convention
//!
//! Angles are in degrees and follow the SVG convention: with the y axis
//! pointing down, positive angles turn clockwise on screen.

use std::ops::Mul;

use crate::error::{GraphicsError, Result};

use super::types::{Point, Rect};
use super::BoundsBuilder;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin, in degrees
    pub fn rotate(angle_degrees: f64) -> Self {
        let radians = angle_degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation about `center`: `translate(center) * rotate * translate(-center)`
    pub fn rotate_about(angle_degrees: f64, center: Point) -> Self {
        Self::translate(center.x, center.y)
            * Self::rotate(angle_degrees)
            * Self::translate(-center.x, -center.y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse matrix.
    ///
    /// Fails with [`GraphicsError::DegenerateTransform`] for singular matrices.
    pub fn invert(&self) -> Result<Transform> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(GraphicsError::DegenerateTransform);
        }
        let inv = 1.0 / det;
        Ok(Transform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Transform a rectangle using the "loose bounds" approach.
    ///
    /// Axis alignment is not preserved by rotation or skew, so all four corners
    /// are mapped and their bounding box is returned.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let mut builder = BoundsBuilder::new();
        for corner in rect.corners() {
            builder.add_point(self.transform_point(corner));
        }
        builder.build().unwrap_or(*rect)
    }

    /// Map `src` onto `dst`, scaling each axis independently
    pub fn stretch_fill_rect(src: &Rect, dst: &Rect) -> Transform {
        Transform::translate(dst.x, dst.y)
            * Transform::scale(dst.width / src.width, dst.height / src.height)
            * Transform::translate(-src.x, -src.y)
    }

    /// Map `src` into `dst` with one uniform scale (the smaller of the two axis
    /// scales), centering the result inside `dst`
    pub fn aspect_fill_rect(src: &Rect, dst: &Rect) -> Transform {
        let scale = (dst.width / src.width).min(dst.height / src.height);
        let offset_x = dst.x + (dst.width - src.width * scale) / 2.0;
        let offset_y = dst.y + (dst.height - src.height * scale) / 2.0;
        Transform::translate(offset_x, offset_y)
            * Transform::scale(scale, scale)
            * Transform::translate(-src.x, -src.y)
    }

    /// True when every parameter is within `epsilon` of `other`'s
    pub fn approx_eq(&self, other: &Transform, epsilon: f64) -> bool {
        (self.a - other.a).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
            && (self.c - other.c).abs() <= epsilon
            && (self.d - other.d).abs() <= epsilon
            && (self.e - other.e).abs() <= epsilon
            && (self.f - other.f).abs() <= epsilon
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point_near(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < EPS && (actual.y - expected.y).abs() < EPS,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_transform_point() {
        let t = Transform::new(2.0, 0.0, 0.0, 3.0, 10.0, 20.0);
        assert_eq!(t.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 23.0));
    }

    #[test]
    fn test_composition_applies_right_operand_first() {
        let t = Transform::translate(10.0, 0.0) * Transform::scale(2.0, 2.0);
        // scale first: (1,1) -> (2,2), then translate -> (12,2)
        assert_eq!(t.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));

        let u = Transform::scale(2.0, 2.0) * Transform::translate(10.0, 0.0);
        assert_eq!(u.transform_point(Point::new(1.0, 1.0)), Point::new(22.0, 2.0));
    }

    #[test]
    fn test_rotate_90_clockwise() {
        let t = Transform::rotate(90.0);
        assert_point_near(t.transform_point(Point::new(1.0, 0.0)), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_rotate_about_center() {
        let t = Transform::rotate_about(180.0, Point::new(5.0, 5.0));
        assert_point_near(t.transform_point(Point::new(0.0, 0.0)), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_invert_round_trip() {
        let t = Transform::new(2.0, 1.0, -1.0, 3.0, 5.0, -7.0);
        let inv = t.invert().unwrap();
        let p = Point::new(3.5, -2.25);
        assert_point_near(inv.transform_point(t.transform_point(p)), p);
        assert!(inv.invert().unwrap().approx_eq(&t, EPS));
        assert!((t * inv).approx_eq(&Transform::IDENTITY, EPS));
    }

    #[test]
    fn test_invert_singular_fails() {
        let t = Transform::scale(0.0, 1.0);
        assert!(matches!(t.invert(), Err(GraphicsError::DegenerateTransform)));
        let skew = Transform::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        assert!(matches!(skew.invert(), Err(GraphicsError::DegenerateTransform)));
    }

    #[test]
    fn test_transform_rect_rotated() {
        let t = Transform::rotate(45.0);
        let r = t.transform_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
        let half_diag = 10.0 / std::f64::consts::SQRT_2;
        assert!((r.x + half_diag).abs() < EPS);
        assert!((r.width - 2.0 * half_diag).abs() < EPS);
        assert!((r.height - 2.0 * half_diag).abs() < EPS);
    }

    #[test]
    fn test_stretch_fill_rect() {
        let t = Transform::stretch_fill_rect(
            &Rect::new(10.0, 10.0, 100.0, 50.0),
            &Rect::new(0.0, 0.0, 200.0, 200.0),
        );
        assert_point_near(t.transform_point(Point::new(10.0, 10.0)), Point::ZERO);
        assert_point_near(t.transform_point(Point::new(110.0, 60.0)), Point::new(200.0, 200.0));
    }

    #[test]
    fn test_aspect_fill_rect_centers() {
        let t = Transform::aspect_fill_rect(
            &Rect::new(0.0, 0.0, 100.0, 50.0),
            &Rect::new(0.0, 0.0, 200.0, 200.0),
        );
        // Uniform scale 2, 100px of vertical slack split evenly
        assert_point_near(t.transform_point(Point::ZERO), Point::new(0.0, 50.0));
        assert_point_near(t.transform_point(Point::new(100.0, 50.0)), Point::new(200.0, 150.0));
    }
}
