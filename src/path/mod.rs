//! Path operation model
//!
//! A path is a plain `[PathOp]` slice. The functions here walk it while
//! tracking the subpath start and the previous end point each op needs.

pub mod op;

pub use op::PathOp;

use serde::Deserialize;

use crate::error::{GraphicsError, Result};
use crate::geometry::{Point, Transform};

/// Tuning for edge sampling
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Target spacing between samples along a segment
    pub tolerance: f64,
    pub min_samples: usize,
    pub max_samples: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.5,
            min_samples: 2,
            max_samples: 100,
        }
    }
}

/// Polyline approximation of one connected run of an outline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeSamples {
    pub points: Vec<Point>,
}

impl EdgeSamples {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn transformed(&self, transform: &Transform) -> EdgeSamples {
        EdgeSamples::new(
            self.points
                .iter()
                .map(|p| transform.transform_point(*p))
                .collect(),
        )
    }
}

/// Visit each op together with its subpath start and previous point
pub fn walk(ops: &[PathOp]) -> impl Iterator<Item = (&PathOp, Point, Point)> {
    ops.iter().scan((Point::ZERO, Point::ZERO), |(start, prev), op| {
        let item = (op, *start, *prev);
        if let PathOp::MoveTo(p) = op {
            *start = *p;
        }
        *prev = op.end_point(*start);
        Some(item)
    })
}

/// Sample every op, one `EdgeSamples` per subpath.
///
/// A `MoveTo` starts a new run; a `ClosePath` ends the current one.
pub fn sample(ops: &[PathOp], config: &SampleConfig) -> Result<Vec<EdgeSamples>> {
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for (op, start, prev) in walk(ops) {
        if matches!(op, PathOp::MoveTo(_)) && !current.is_empty() {
            runs.push(EdgeSamples::new(std::mem::take(&mut current)));
        }
        current.extend(op.sample(start, prev, config)?);
        if matches!(op, PathOp::ClosePath) {
            runs.push(EdgeSamples::new(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        runs.push(EdgeSamples::new(current));
    }
    Ok(runs)
}

/// Minimum distance from `point` to any op, in the path's own coordinates
pub fn distance_to(ops: &[PathOp], point: Point) -> Result<f64> {
    let mut best = f64::INFINITY;
    for (op, start, prev) in walk(ops) {
        best = best.min(op.distance_to(start, prev, point)?);
    }
    Ok(best)
}

/// Even-odd containment over the single polygon made of every `MoveTo` and
/// `LineTo` vertex, in order.
///
/// Subpaths are not separated: consecutive subpaths are joined by an edge and
/// the last vertex closes back to the first. Only `MoveTo`, `LineTo` and
/// `ClosePath` are understood.
pub fn contains(ops: &[PathOp], point: Point) -> Result<bool> {
    let mut vertices: Vec<Point> = Vec::new();
    for op in ops {
        match op {
            PathOp::MoveTo(p) | PathOp::LineTo(p) => vertices.push(*p),
            PathOp::ClosePath => {}
            other => {
                return Err(GraphicsError::UnsupportedShape(format!(
                    "path contains a {}",
                    other.name()
                )))
            }
        }
    }
    if vertices.len() < 3 {
        return Ok(false);
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (pi, pj) = (vertices[i], vertices[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    Ok(inside)
}

/// Map every op through `transform`
pub fn transform_ops(ops: &[PathOp], transform: &Transform) -> Result<Vec<PathOp>> {
    ops.iter().map(|op| op.transformed(transform)).collect()
}
