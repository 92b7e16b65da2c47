//! Path data (`d` attribute) parsing

use crate::error::{GraphicsError, Result, Span};
use crate::geometry::{Point, Size};
use crate::path::PathOp;

use super::lexer::{lex_path, PathToken};

struct PathDataParser {
    tokens: Vec<(PathToken, Span)>,
    pos: usize,
    ops: Vec<PathOp>,
    /// End point of the last op that was not a close
    current: Point,
    subpath_start: Point,
}

impl PathDataParser {
    /// Next number, or 0 when the arguments run out
    fn number(&mut self) -> f64 {
        match self.tokens.get(self.pos) {
            Some((PathToken::Number(n), _)) => {
                self.pos += 1;
                *n
            }
            _ => {
                log::trace!("path data is missing an argument, using 0");
                0.0
            }
        }
    }

    fn point(&mut self, relative: bool) -> Point {
        let x = self.number();
        let y = self.number();
        if relative {
            self.current + Point::new(x, y)
        } else {
            Point::new(x, y)
        }
    }

    fn flag(&mut self) -> bool {
        self.number() != 0.0
    }

    fn push(&mut self, op: PathOp) {
        if !matches!(op, PathOp::ClosePath) {
            self.current = op.end_point(self.subpath_start);
        }
        self.ops.push(op);
    }

    fn parse(mut self) -> Result<Vec<PathOp>> {
        let mut last_command: Option<char> = None;

        while let Some((token, span)) = self.tokens.get(self.pos).cloned() {
            let command = match token {
                PathToken::Command(c) => {
                    self.pos += 1;
                    c
                }
                // More arguments repeat the previous command; a moveto repeats
                // as a lineto
                PathToken::Number(_) => match last_command {
                    Some('M') => 'L',
                    Some('m') => 'l',
                    Some('Z' | 'z') | None => {
                        let command = last_command.unwrap_or('?');
                        return Err(GraphicsError::UnsupportedPathCommand { command, span });
                    }
                    Some(c) => c,
                },
            };
            let relative = command.is_ascii_lowercase();

            match command.to_ascii_uppercase() {
                'M' => {
                    let p = self.point(relative);
                    self.subpath_start = p;
                    self.push(PathOp::MoveTo(p));
                }
                'L' => {
                    let p = self.point(relative);
                    self.push(PathOp::LineTo(p));
                }
                'H' => {
                    let x = self.number();
                    let x = if relative { self.current.x + x } else { x };
                    self.push(PathOp::LineTo(Point::new(x, self.current.y)));
                }
                'V' => {
                    let y = self.number();
                    let y = if relative { self.current.y + y } else { y };
                    self.push(PathOp::LineTo(Point::new(self.current.x, y)));
                }
                'C' => {
                    let control1 = self.point(relative);
                    let control2 = self.point(relative);
                    let point = self.point(relative);
                    self.push(PathOp::CurveTo {
                        control1,
                        control2,
                        point,
                    });
                }
                'S' => {
                    let control1 = match self.ops.last() {
                        Some(prev) => prev.continue_curve_control_point(self.subpath_start),
                        None => self.current,
                    };
                    let control2 = self.point(relative);
                    let point = self.point(relative);
                    self.push(PathOp::CurveTo {
                        control1,
                        control2,
                        point,
                    });
                }
                'A' => {
                    let rx = self.number();
                    let ry = self.number();
                    let _x_axis_rotation = self.number();
                    let large_arc = self.flag();
                    let sweep_clockwise = self.flag();
                    let point = self.point(relative);
                    self.push(PathOp::ArcTo {
                        radius: Size::new(rx.abs(), ry.abs()),
                        large_arc,
                        sweep_clockwise,
                        point,
                    });
                }
                'Z' => self.push(PathOp::ClosePath),
                _ => {
                    return Err(GraphicsError::UnsupportedPathCommand { command, span });
                }
            }
            last_command = Some(command);
        }
        Ok(self.ops)
    }
}

/// Parse SVG path data into ops.
///
/// Spans in errors are relative to `data`.
pub fn parse_path_data(data: &str) -> Result<Vec<PathOp>> {
    let mut tokens = Vec::new();
    for item in lex_path(data) {
        match item {
            Ok(token) => tokens.push(token),
            Err(span) => {
                let command = data[span.clone()].chars().next().unwrap_or('?');
                return Err(GraphicsError::UnsupportedPathCommand { command, span });
            }
        }
    }
    PathDataParser {
        tokens,
        pos: 0,
        ops: Vec::new(),
        current: Point::ZERO,
        subpath_start: Point::ZERO,
    }
    .parse()
}
