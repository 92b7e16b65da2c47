//! Gradient definitions and `href` inheritance
//!
//! A gradient may name a parent through `xlink:href`. The parent is resolved
//! first; the child's explicit attributes are written over it and the child's
//! stops are added on top of the inherited ones.

use roxmltree::Node;

use crate::error::{GraphicsError, Result, Span};
use crate::geometry::{Point, Size};
use crate::style::{Color, Gradient, GradientId, GradientStop, LinearGradient, RadialGradient};

use super::style::Declarations;
use super::units::{parse_length, parse_number};
use super::{href, ReadContext};

impl<'a, 'input> ReadContext<'a, 'input> {
    /// Handle for the gradient with `id`, resolving it on first use.
    ///
    /// Every `url(#id)` naming the same definition shares one handle.
    pub(crate) fn resolve_gradient(&mut self, id: &'a str, span: Span) -> Result<GradientId> {
        if let Some(handle) = self.gradient_ids.get(id) {
            return Ok(*handle);
        }
        let mut chain = Vec::new();
        let gradient = self.gradient_definition(id, span, &mut chain)?;
        let handle = self.graphic.add_gradient(gradient);
        log::debug!("resolved gradient '{}' as {}", id, handle);
        self.gradient_ids.insert(id, handle);
        Ok(handle)
    }

    fn gradient_definition(
        &self,
        id: &'a str,
        span: Span,
        chain: &mut Vec<&'a str>,
    ) -> Result<Gradient> {
        let Some(node) = self.defs.get(id).copied() else {
            return Err(GraphicsError::invalid_reference(
                id,
                "no element has this id",
                span,
            ));
        };
        if chain.contains(&id) {
            return Err(GraphicsError::invalid_reference(
                id,
                "gradient inherits from itself",
                span,
            ));
        }

        chain.push(id);
        let parent = match href(node) {
            Some(parent_id) => Some(self.gradient_definition(parent_id, node.range(), chain)?),
            None => None,
        };
        chain.pop();

        let ppi = self.config.pixels_per_inch;
        match node.tag_name().name() {
            "linearGradient" => Ok(Gradient::Linear(linear_gradient(node, parent, ppi))),
            "radialGradient" => Ok(Gradient::Radial(radial_gradient(node, parent, ppi))),
            other => Err(GraphicsError::invalid_reference(
                id,
                format!("<{}> is not a gradient", other),
                span,
            )),
        }
    }
}

/// Units and stops every parent passes down, whatever its kind
fn inherited_units(parent: Option<&Gradient>) -> (bool, Vec<GradientStop>) {
    match parent {
        Some(Gradient::Linear(g)) => (g.absolute, g.stops.clone()),
        Some(Gradient::Radial(g)) => (g.absolute, g.stops.clone()),
        None => (false, Vec::new()),
    }
}

fn gradient_units(node: Node<'_, '_>, inherited: bool) -> bool {
    match node.attribute("gradientUnits") {
        Some("userSpaceOnUse") => true,
        Some("objectBoundingBox") => false,
        _ => inherited,
    }
}

fn coordinate(node: Node<'_, '_>, name: &str, ppi: f64) -> Option<f64> {
    node.attribute(name).map(|v| parse_length(v, ppi))
}

fn linear_gradient(node: Node<'_, '_>, parent: Option<Gradient>, ppi: f64) -> LinearGradient {
    let (absolute, stops) = inherited_units(parent.as_ref());
    let mut gradient = match parent {
        Some(Gradient::Linear(g)) => g,
        _ => LinearGradient::default(),
    };
    gradient.absolute = gradient_units(node, absolute);
    gradient.stops = stops;

    if let Some(x) = coordinate(node, "x1", ppi) {
        gradient.start.x = x;
    }
    if let Some(y) = coordinate(node, "y1", ppi) {
        gradient.start.y = y;
    }
    if let Some(x) = coordinate(node, "x2", ppi) {
        gradient.end.x = x;
    }
    if let Some(y) = coordinate(node, "y2", ppi) {
        gradient.end.y = y;
    }

    for stop in stops_of(node) {
        gradient.add_stop(stop.offset, stop.color);
    }
    gradient
}

fn radial_gradient(node: Node<'_, '_>, parent: Option<Gradient>, ppi: f64) -> RadialGradient {
    let (absolute, stops) = inherited_units(parent.as_ref());
    let mut gradient = match parent {
        Some(Gradient::Radial(g)) => g,
        _ => RadialGradient::default(),
    };
    gradient.absolute = gradient_units(node, absolute);
    gradient.stops = stops;

    let cx = coordinate(node, "cx", ppi);
    let cy = coordinate(node, "cy", ppi);
    if let Some(x) = cx {
        gradient.center.x = x;
    }
    if let Some(y) = cy {
        gradient.center.y = y;
    }
    // The focus follows the center unless given
    gradient.focus = Point::new(
        coordinate(node, "fx", ppi)
            .or(cx)
            .unwrap_or(gradient.focus.x),
        coordinate(node, "fy", ppi)
            .or(cy)
            .unwrap_or(gradient.focus.y),
    );
    if let Some(r) = coordinate(node, "r", ppi) {
        gradient.radius = Size::uniform(r);
    }

    for stop in stops_of(node) {
        gradient.add_stop(stop.offset, stop.color);
    }
    gradient
}

/// The `<stop>` children, in document order
fn stops_of<'a>(node: Node<'a, '_>) -> impl Iterator<Item = GradientStop> + 'a {
    node.children()
        .filter(|n| n.has_tag_name("stop"))
        .map(read_stop)
}

fn read_stop(node: Node<'_, '_>) -> GradientStop {
    let decls = Declarations::from_node(node);
    let offset = match node.attribute("offset") {
        Some(v) if v.trim().ends_with('%') => parse_number(v.trim().trim_end_matches('%')) * 0.01,
        Some(v) => parse_number(v),
        None => 0.0,
    };
    let mut color = match decls.get("stop-color") {
        Some(value) => Color::parse(value).unwrap_or_else(|| {
            log::warn!("ignoring unsupported stop-color '{}'", value);
            Color::BLACK
        }),
        None => Color::BLACK,
    };
    if let Some(opacity) = decls.get("stop-opacity").map(parse_number) {
        color = color.with_alpha(color.alpha * opacity);
    }
    GradientStop::new(offset.clamp(0.0, 1.0), color)
}
