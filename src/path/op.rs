//! Individual path commands and their geometry

use crate::error::{GraphicsError, Result};
use crate::geometry::{Point, Size, Transform};

use super::SampleConfig;

/// One command of a path.
///
/// Ops are interpreted against the walking state of their path: the start of
/// the current subpath (where `ClosePath` returns to) and the point where the
/// previous op ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    CurveTo {
        control1: Point,
        control2: Point,
        point: Point,
    },
    /// Elliptical arc. The x-axis rotation of the source syntax is not kept.
    ArcTo {
        radius: Size,
        large_arc: bool,
        sweep_clockwise: bool,
        point: Point,
    },
    ClosePath,
}

impl PathOp {
    pub fn name(&self) -> &'static str {
        match self {
            PathOp::MoveTo(_) => "MoveTo",
            PathOp::LineTo(_) => "LineTo",
            PathOp::CurveTo { .. } => "CurveTo",
            PathOp::ArcTo { .. } => "ArcTo",
            PathOp::ClosePath => "ClosePath",
        }
    }

    /// Where the pen rests after this op
    pub fn end_point(&self, subpath_start: Point) -> Point {
        match self {
            PathOp::MoveTo(p) | PathOp::LineTo(p) => *p,
            PathOp::CurveTo { point, .. } | PathOp::ArcTo { point, .. } => *point,
            PathOp::ClosePath => subpath_start,
        }
    }

    /// First control point for a smooth continuation (`S`) after this op.
    ///
    /// Curves reflect their second control point through their end point; any
    /// other op yields its own end point.
    pub fn continue_curve_control_point(&self, subpath_start: Point) -> Point {
        match self {
            PathOp::CurveTo {
                control2, point, ..
            } => control2.reflect_around(*point),
            other => other.end_point(subpath_start),
        }
    }

    /// Polyline approximation of this op, endpoints included.
    ///
    /// `MoveTo` yields its single point. Arcs are not sampled.
    pub fn sample(
        &self,
        subpath_start: Point,
        previous: Point,
        config: &SampleConfig,
    ) -> Result<Vec<Point>> {
        match self {
            PathOp::MoveTo(p) => Ok(vec![*p]),
            PathOp::LineTo(p) => Ok(sample_line(previous, *p, config)),
            PathOp::ClosePath => Ok(sample_line(previous, subpath_start, config)),
            PathOp::CurveTo {
                control1,
                control2,
                point,
            } => Ok(sample_curve(previous, *control1, *control2, *point, config)),
            PathOp::ArcTo { .. } => Err(GraphicsError::unsupported("sampling an ArcTo")),
        }
    }

    /// Shortest distance from `point` to this op's untransformed geometry
    pub fn distance_to(&self, subpath_start: Point, previous: Point, point: Point) -> Result<f64> {
        match self {
            PathOp::MoveTo(p) => Ok(point.distance(*p)),
            PathOp::LineTo(p) => Ok(point.distance_to_segment(previous, *p)),
            PathOp::ClosePath => Ok(point.distance_to_segment(previous, subpath_start)),
            PathOp::CurveTo { .. } => {
                let samples = self.sample(subpath_start, previous, &SampleConfig::default())?;
                Ok(distance_to_polyline(&samples, point))
            }
            PathOp::ArcTo { .. } => Err(GraphicsError::unsupported("distance to an ArcTo")),
        }
    }

    /// This op with every point mapped through `transform`
    pub fn transformed(&self, transform: &Transform) -> Result<PathOp> {
        let map = |p: &Point| transform.transform_point(*p);
        Ok(match self {
            PathOp::MoveTo(p) => PathOp::MoveTo(map(p)),
            PathOp::LineTo(p) => PathOp::LineTo(map(p)),
            PathOp::CurveTo {
                control1,
                control2,
                point,
            } => PathOp::CurveTo {
                control1: map(control1),
                control2: map(control2),
                point: map(point),
            },
            PathOp::ArcTo { .. } => {
                return Err(GraphicsError::unsupported("transforming an ArcTo"))
            }
            PathOp::ClosePath => PathOp::ClosePath,
        })
    }
}

/// Sample count clamped into the configured range, never fewer than two.
///
/// An unbounded estimate (a zero tolerance) takes the maximum; NaN takes the
/// minimum.
pub(crate) fn clamp_samples(estimate: f64, config: &SampleConfig) -> usize {
    let max = config.max_samples.max(config.min_samples);
    let n = if estimate == f64::INFINITY {
        max
    } else if estimate.is_finite() && estimate > 0.0 {
        estimate.round() as usize
    } else {
        0
    };
    n.clamp(config.min_samples, max).max(2)
}

pub(crate) fn sample_line(from: Point, to: Point, config: &SampleConfig) -> Vec<Point> {
    let n = clamp_samples(from.distance(to) / config.tolerance, config);
    let last = (n - 1) as f64;
    (0..n).map(|i| from.lerp(to, i as f64 / last)).collect()
}

fn sample_curve(p0: Point, p1: Point, p2: Point, p3: Point, config: &SampleConfig) -> Vec<Point> {
    let n = clamp_samples(3.0 * p0.distance(p3) / config.tolerance, config);
    let last = (n - 1) as f64;
    (0..n)
        .map(|i| cubic_bezier(p0, p1, p2, p3, i as f64 / last))
        .collect()
}

/// Evaluate a cubic Bezier with the Bernstein basis
pub(crate) fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    Point::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    )
}

/// Minimum distance to the segments of a polyline
pub(crate) fn distance_to_polyline(points: &[Point], point: Point) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point.distance_to_segment(w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SampleConfig {
        SampleConfig::default()
    }

    #[test]
    fn test_end_points() {
        let start = Point::new(1.0, 1.0);
        assert_eq!(
            PathOp::LineTo(Point::new(2.0, 3.0)).end_point(start),
            Point::new(2.0, 3.0)
        );
        assert_eq!(PathOp::ClosePath.end_point(start), start);
    }

    #[test]
    fn test_line_sample_count() {
        // 10px at tolerance 0.5 -> 20 samples
        let op = PathOp::LineTo(Point::new(10.0, 0.0));
        let samples = op.sample(Point::ZERO, Point::ZERO, &cfg()).unwrap();
        assert_eq!(samples.len(), 20);
        assert_eq!(samples[0], Point::ZERO);
        assert_eq!(*samples.last().unwrap(), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_sample_count_is_clamped() {
        let long = PathOp::LineTo(Point::new(1000.0, 0.0));
        assert_eq!(long.sample(Point::ZERO, Point::ZERO, &cfg()).unwrap().len(), 100);

        // Zero-length segments still produce both ends
        let short = PathOp::LineTo(Point::ZERO);
        assert_eq!(short.sample(Point::ZERO, Point::ZERO, &cfg()).unwrap().len(), 2);
    }

    #[test]
    fn test_zero_tolerance_takes_max_samples() {
        let config = SampleConfig {
            tolerance: 0.0,
            ..cfg()
        };
        let op = PathOp::LineTo(Point::new(10.0, 0.0));
        assert_eq!(op.sample(Point::ZERO, Point::ZERO, &config).unwrap().len(), 100);
        assert_eq!(clamp_samples(f64::NAN, &config), 2);
    }

    #[test]
    fn test_curve_samples_hit_endpoints() {
        let op = PathOp::CurveTo {
            control1: Point::new(0.0, 10.0),
            control2: Point::new(10.0, 10.0),
            point: Point::new(10.0, 0.0),
        };
        let samples = op.sample(Point::ZERO, Point::ZERO, &cfg()).unwrap();
        assert_eq!(samples.len(), 60);
        assert_eq!(samples[0], Point::ZERO);
        assert_eq!(*samples.last().unwrap(), Point::new(10.0, 0.0));
        // Symmetric curve peaks at t = 0.5 with height 7.5
        let mid = cubic_bezier(
            Point::ZERO,
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            0.5,
        );
        assert_eq!(mid, Point::new(5.0, 7.5));
    }

    #[test]
    fn test_arc_operations_are_unsupported() {
        let arc = PathOp::ArcTo {
            radius: Size::new(40.0, 40.0),
            large_arc: false,
            sweep_clockwise: false,
            point: Point::new(125.0, 125.0),
        };
        let start = Point::new(100.0, 100.0);
        assert!(matches!(
            arc.sample(start, start, &cfg()),
            Err(GraphicsError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            arc.transformed(&Transform::IDENTITY),
            Err(GraphicsError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            arc.distance_to(start, start, Point::ZERO),
            Err(GraphicsError::UnsupportedOperation(_))
        ));
        // The end point is still known
        assert_eq!(arc.end_point(start), Point::new(125.0, 125.0));
    }

    #[test]
    fn test_close_distance_uses_closing_segment() {
        let start = Point::ZERO;
        let prev = Point::new(10.0, 0.0);
        let d = PathOp::ClosePath
            .distance_to(start, prev, Point::new(5.0, 2.0))
            .unwrap();
        assert_eq!(d, 2.0);
    }

    #[test]
    fn test_continue_curve_control_point() {
        let curve = PathOp::CurveTo {
            control1: Point::new(0.0, 10.0),
            control2: Point::new(8.0, 10.0),
            point: Point::new(10.0, 0.0),
        };
        assert_eq!(
            curve.continue_curve_control_point(Point::ZERO),
            Point::new(12.0, -10.0)
        );
        let line = PathOp::LineTo(Point::new(3.0, 4.0));
        assert_eq!(
            line.continue_curve_control_point(Point::ZERO),
            Point::new(3.0, 4.0)
        );
    }

    #[test]
    fn test_transformed_curve() {
        let op = PathOp::CurveTo {
            control1: Point::new(1.0, 0.0),
            control2: Point::new(2.0, 0.0),
            point: Point::new(3.0, 0.0),
        };
        let moved = op.transformed(&Transform::translate(0.0, 5.0)).unwrap();
        assert_eq!(
            moved,
            PathOp::CurveTo {
                control1: Point::new(1.0, 5.0),
                control2: Point::new(2.0, 5.0),
                point: Point::new(3.0, 5.0),
            }
        );
    }
}
