//! Edge sampling, bounding boxes and hit testing
//!
//! "Local" results are in the element's own coordinates. The unqualified
//! versions have the element's transform applied, i.e. they are in the
//! coordinate space of the parent.

use std::f64::consts::PI;

use crate::error::{GraphicsError, Result};
use crate::geometry::{BoundsBuilder, Point, Rect};
use crate::path::op::{clamp_samples, distance_to_polyline, sample_line};
use crate::path::{self, EdgeSamples, SampleConfig};

use super::element::{Element, Ellipse, Path, Rectangle};

impl Element {
    /// Polyline outline of this element in parent coordinates
    pub fn edge_samples(&self, config: &SampleConfig) -> Result<Vec<EdgeSamples>> {
        let local = self.local_edge_samples(config)?;
        let transform = self.transform();
        if transform.is_identity() {
            return Ok(local);
        }
        Ok(local.iter().map(|s| s.transformed(transform)).collect())
    }

    /// Polyline outline of this element in its own coordinates
    pub fn local_edge_samples(&self, config: &SampleConfig) -> Result<Vec<EdgeSamples>> {
        match self {
            Element::Rectangle(rect) => Ok(vec![rectangle_samples(rect, config)]),
            Element::Ellipse(ellipse) => Ok(vec![ellipse_samples(ellipse, config)]),
            Element::Line(line) => Ok(vec![EdgeSamples::new(sample_line(
                line.start, line.end, config,
            ))]),
            Element::Path(p) => path::sample(&p.operations, config),
            Element::Group(group) => {
                let mut all = Vec::new();
                for child in &group.children {
                    all.extend(child.edge_samples(config)?);
                }
                Ok(all)
            }
            Element::Text(_) => Err(GraphicsError::unsupported("edge samples of text")),
            Element::ForeignObject(_) => {
                Err(GraphicsError::unsupported("edge samples of a foreign object"))
            }
        }
    }

    /// Bounds in the element's own coordinates.
    ///
    /// An empty group has an empty (default) rectangle.
    pub fn local_bounding_box(&self) -> Result<Rect> {
        Ok(self.local_bounds()?.unwrap_or_default())
    }

    /// Bounds in parent coordinates, using the transformed corners of the
    /// local bounds
    pub fn bounding_box(&self) -> Result<Rect> {
        Ok(self.bounds()?.unwrap_or_default())
    }

    /// `None` when there is nothing to bound, such as an empty group
    pub(crate) fn bounds(&self) -> Result<Option<Rect>> {
        let local = self.local_bounds()?;
        Ok(local.map(|r| self.transform().transform_rect(&r)))
    }

    fn local_bounds(&self) -> Result<Option<Rect>> {
        match self {
            Element::Rectangle(rect) => Ok(Some(rect.frame)),
            Element::Ellipse(ellipse) => Ok(Some(ellipse.frame)),
            Element::Line(line) => Ok(Some(Rect::from_corners(line.start, line.end))),
            Element::Path(p) => {
                let mut builder = BoundsBuilder::new();
                for run in path::sample(&p.operations, &SampleConfig::default())? {
                    builder.add_points(run.points);
                }
                Ok(builder.build())
            }
            Element::ForeignObject(fo) => Ok(Some(Rect::from_origin_size(fo.position, fo.size))),
            Element::Group(group) => {
                let mut builder = BoundsBuilder::new();
                for child in &group.children {
                    if let Some(r) = child.bounds()? {
                        builder.add_rect(&r);
                    }
                }
                Ok(builder.build())
            }
            Element::Text(_) => Err(GraphicsError::unsupported("bounding box of text")),
        }
    }

    /// Distance from a point in parent coordinates to this element's outline
    pub fn distance_to(&self, point: Point) -> Result<f64> {
        let local = self.transform().invert()?.transform_point(point);
        match self {
            Element::Path(p) => path::distance_to(&p.operations, local),
            Element::Group(group) => {
                let mut best = f64::INFINITY;
                for child in &group.children {
                    best = best.min(child.distance_to(local)?);
                }
                Ok(best)
            }
            _ => {
                let samples = self.local_edge_samples(&SampleConfig::default())?;
                Ok(samples
                    .iter()
                    .map(|s| distance_to_polyline(&s.points, local))
                    .fold(f64::INFINITY, f64::min))
            }
        }
    }
}

impl Path {
    /// Even-odd containment of a point given in parent coordinates
    pub fn contains(&self, point: Point) -> Result<bool> {
        let local = self.common.transform.invert()?.transform_point(point);
        path::contains(&self.operations, local)
    }

    /// Distance from a point given in parent coordinates
    pub fn distance_to(&self, point: Point) -> Result<f64> {
        let local = self.common.transform.invert()?.transform_point(point);
        path::distance_to(&self.operations, local)
    }
}

fn rectangle_samples(rect: &Rectangle, config: &SampleConfig) -> EdgeSamples {
    let corners = rect.frame.corners();
    let mut points = Vec::new();
    for i in 0..4 {
        let edge = sample_line(corners[i], corners[(i + 1) % 4], config);
        // Skip the first point of later edges, it repeats the previous end
        let skip = usize::from(i > 0);
        points.extend(edge.into_iter().skip(skip));
    }
    EdgeSamples::new(points)
}

fn ellipse_samples(ellipse: &Ellipse, config: &SampleConfig) -> EdgeSamples {
    let frame = ellipse.frame;
    let center = frame.center();
    let (rx, ry) = (frame.width / 2.0, frame.height / 2.0);
    // Ramanujan's perimeter approximation
    let perimeter = PI * (3.0 * (rx + ry) - ((3.0 * rx + ry) * (rx + 3.0 * ry)).sqrt());
    let n = clamp_samples(perimeter / config.tolerance, config).max(3);
    let points = (0..=n)
        .map(|i| {
            let angle = 2.0 * PI * (i % n) as f64 / n as f64;
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        })
        .collect();
    EdgeSamples::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Size, Transform};
    use crate::scene::element::{ForeignObject, Group, Line, Text};
    use crate::style::Font;

    #[test]
    fn test_group_bbox_with_translation() {
        let rect = Rectangle::new(Rect::new(-10.0, -20.0, 100.0, 200.0));
        let group = Element::from(Group::new(vec![rect.into()]))
            .with_transform(Transform::translate(500.0, 0.0));
        let bbox = group.bounding_box().unwrap();
        assert_eq!(bbox.left(), 490.0);
        assert_eq!(bbox.right(), 590.0);
        assert_eq!(bbox.top(), -20.0);
        assert_eq!(bbox.bottom(), 180.0);
    }

    #[test]
    fn test_empty_group_bbox_is_default() {
        let group = Element::from(Group::default());
        assert_eq!(group.bounding_box().unwrap(), Rect::default());
    }

    #[test]
    fn test_rotated_rect_uses_loose_bounds() {
        let el = Element::from(Rectangle::new(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .with_transform(Transform::rotate(45.0));
        let bbox = el.bounding_box().unwrap();
        assert!((bbox.width - 200f64.sqrt()).abs() < 1e-9);
        assert_eq!(el.local_bounding_box().unwrap(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_ellipse_samples_are_closed() {
        let el = Element::from(Ellipse::circle(Point::new(10.0, 10.0), 5.0));
        let runs = el.edge_samples(&SampleConfig::default()).unwrap();
        let pts = &runs[0].points;
        assert_eq!(pts.first(), pts.last());
        for p in pts {
            assert!((p.distance(Point::new(10.0, 10.0)) - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_line_distance() {
        let el = Element::from(Line::new(Point::ZERO, Point::new(10.0, 0.0)));
        assert!((el.distance_to(Point::new(5.0, 4.0)).unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_and_foreign_object_are_not_sampled() {
        let text = Element::from(Text::new("hi", Rect::default(), Font::default()));
        assert!(matches!(
            text.edge_samples(&SampleConfig::default()),
            Err(GraphicsError::UnsupportedOperation(_))
        ));
        assert!(text.bounding_box().is_err());
        let fo = Element::from(ForeignObject::new(Point::new(1.0, 2.0), Size::new(3.0, 4.0)));
        assert!(fo.edge_samples(&SampleConfig::default()).is_err());
        assert_eq!(fo.bounding_box().unwrap(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_path_contains_inverse_transforms() {
        let mut p = Path::default();
        p.move_to(Point::ZERO)
            .line_to(Point::new(10.0, 0.0))
            .line_to(Point::new(10.0, 10.0))
            .line_to(Point::new(0.0, 10.0))
            .close();
        p.common.transform = Transform::translate(100.0, 0.0);
        assert!(p.contains(Point::new(105.0, 5.0)).unwrap());
        assert!(!p.contains(Point::new(5.0, 5.0)).unwrap());
        assert_eq!(p.distance_to(Point::new(105.0, -2.0)).unwrap(), 2.0);
    }

    #[test]
    fn test_singular_transform_distance_fails() {
        let el = Element::from(Line::new(Point::ZERO, Point::new(1.0, 0.0)))
            .with_transform(Transform::scale(0.0, 0.0));
        assert!(matches!(
            el.distance_to(Point::ZERO),
            Err(GraphicsError::DegenerateTransform)
        ));
    }
}
