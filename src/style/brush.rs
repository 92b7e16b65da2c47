//! Brushes and gradients
//!
//! Gradients are stored once in a [`GradientArena`] owned by the graphic and
//! referenced from brushes by [`GradientId`]. Two elements that share a
//! gradient share the handle, which is what the writer deduplicates on.

use std::fmt;

use crate::geometry::{Point, Size};

use super::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Insert keeping stops sorted by offset; equal offsets keep insertion order
fn insert_sorted(stops: &mut Vec<GradientStop>, stop: GradientStop) {
    let index = stops.partition_point(|s| s.offset <= stop.offset);
    stops.insert(index, stop);
}

/// Color at `offset`, interpolating between the surrounding stops
fn color_at(stops: &[GradientStop], offset: f64) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::CLEAR;
    };
    if offset <= first.offset {
        return first.color;
    }
    if offset >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if offset >= lo.offset && offset <= hi.offset {
            let span = hi.offset - lo.offset;
            if span <= 0.0 {
                return hi.color;
            }
            return lo.color.lerp(&hi.color, (offset - lo.offset) / span);
        }
    }
    last.color
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    /// Coordinates are in user space rather than fractions of the shape bounds
    pub absolute: bool,
    pub stops: Vec<GradientStop>,
}

impl Default for LinearGradient {
    fn default() -> Self {
        Self {
            start: Point::ZERO,
            end: Point::new(1.0, 0.0),
            absolute: false,
            stops: Vec::new(),
        }
    }
}

impl LinearGradient {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    pub fn add_stop(&mut self, offset: f64, color: Color) {
        insert_sorted(&mut self.stops, GradientStop::new(offset, color));
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.add_stop(offset, color);
        self
    }

    pub fn color_at(&self, offset: f64) -> Color {
        color_at(&self.stops, offset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub focus: Point,
    pub radius: Size,
    pub absolute: bool,
    pub stops: Vec<GradientStop>,
}

impl Default for RadialGradient {
    fn default() -> Self {
        Self {
            center: Point::new(0.5, 0.5),
            focus: Point::new(0.5, 0.5),
            radius: Size::uniform(0.5),
            absolute: false,
            stops: Vec::new(),
        }
    }
}

impl RadialGradient {
    pub fn new(center: Point, radius: Size) -> Self {
        Self {
            center,
            focus: center,
            radius,
            ..Self::default()
        }
    }

    pub fn add_stop(&mut self, offset: f64, color: Color) {
        insert_sorted(&mut self.stops, GradientStop::new(offset, color));
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.add_stop(offset, color);
        self
    }

    pub fn color_at(&self, offset: f64) -> Color {
        color_at(&self.stops, offset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Gradient {
    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear(g) => &g.stops,
            Gradient::Radial(g) => &g.stops,
        }
    }
}

/// Handle into a [`GradientArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GradientId(pub(crate) usize);

impl GradientId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for GradientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gradient#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientArena {
    gradients: Vec<Gradient>,
}

impl GradientArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, gradient: Gradient) -> GradientId {
        self.gradients.push(gradient);
        GradientId(self.gradients.len() - 1)
    }

    /// Reuse the handle of an equal gradient if one is already stored
    pub fn intern(&mut self, gradient: Gradient) -> GradientId {
        match self.gradients.iter().position(|g| *g == gradient) {
            Some(index) => GradientId(index),
            None => self.add(gradient),
        }
    }

    pub fn get(&self, id: GradientId) -> Option<&Gradient> {
        self.gradients.get(id.0)
    }

    pub fn get_mut(&mut self, id: GradientId) -> Option<&mut Gradient> {
        self.gradients.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GradientId, &Gradient)> {
        self.gradients
            .iter()
            .enumerate()
            .map(|(i, g)| (GradientId(i), g))
    }
}

/// How the interior of a shape is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    Solid(Color),
    Gradient(GradientId),
}

impl Brush {
    pub fn solid(color: Color) -> Self {
        Brush::Solid(color)
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_stay_sorted() {
        let g = LinearGradient::default()
            .with_stop(1.0, Color::WHITE)
            .with_stop(0.0, Color::BLACK)
            .with_stop(0.5, Color::rgb(1.0, 0.0, 0.0));
        let offsets: Vec<f64> = g.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_color_at_interpolates() {
        let g = LinearGradient::default()
            .with_stop(0.0, Color::BLACK)
            .with_stop(1.0, Color::WHITE);
        assert_eq!(g.color_at(0.5), Color::rgb(0.5, 0.5, 0.5));
        assert_eq!(g.color_at(-1.0), Color::BLACK);
        assert_eq!(g.color_at(2.0), Color::WHITE);
        assert_eq!(LinearGradient::default().color_at(0.3), Color::CLEAR);
    }

    #[test]
    fn test_arena_intern_reuses_equal_gradients() {
        let mut arena = GradientArena::new();
        let a = arena.intern(Gradient::Radial(RadialGradient::default()));
        let b = arena.intern(Gradient::Radial(RadialGradient::default()));
        let c = arena.add(Gradient::Radial(RadialGradient::default()));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(arena.len(), 2);
    }
}
