//! Annotation shape model.
//!
//! Six shape kinds share one stroke style. Coordinates are stored in logical
//! space and never normalized: a rectangle dragged up and to the left keeps
//! `start` below-right of `end`, and every consumer derives min/max itself.

use std::fmt;

use framekit_core::{Color, Point, Rect, ShapeError};

/// Field-less discriminant of a [`ShapeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Line,
    Rect,
    Circle,
    Blur,
    Free,
    Angle,
}

impl ShapeType {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Line => "line",
            ShapeType::Rect => "rect",
            ShapeType::Circle => "circle",
            ShapeType::Blur => "blur",
            ShapeType::Free => "free",
            ShapeType::Angle => "angle",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometry of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Straight segment.
    Line { start: Point, end: Point },
    /// Axis-aligned box, corners in any order.
    Rect { start: Point, end: Point },
    /// `start` is the center, `end` any point on the circumference.
    Circle { start: Point, end: Point },
    /// Ellipse inscribed in the box spanned by `start` and `end`.
    Blur { start: Point, end: Point },
    /// Freehand polyline.
    Free { points: Vec<Point> },
    /// Vertex `p1` with up to two ray endpoints.
    Angle {
        p1: Point,
        p2: Option<Point>,
        p3: Option<Point>,
    },
}

/// A committed or in-progress annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub color: Color,
    /// Stroke width in screen pixels at zoom 1.
    pub width: f64,
}

impl Shape {
    pub fn new(kind: ShapeKind, color: Color, width: f64) -> Self {
        Self { kind, color, width }
    }

    pub fn line(start: Point, end: Point, color: Color, width: f64) -> Self {
        Self::new(ShapeKind::Line { start, end }, color, width)
    }

    pub fn rect(start: Point, end: Point, color: Color, width: f64) -> Self {
        Self::new(ShapeKind::Rect { start, end }, color, width)
    }

    pub fn circle(center: Point, edge: Point, color: Color, width: f64) -> Self {
        Self::new(
            ShapeKind::Circle {
                start: center,
                end: edge,
            },
            color,
            width,
        )
    }

    pub fn blur(start: Point, end: Point, color: Color, width: f64) -> Self {
        Self::new(ShapeKind::Blur { start, end }, color, width)
    }

    pub fn free(points: Vec<Point>, color: Color, width: f64) -> Self {
        Self::new(ShapeKind::Free { points }, color, width)
    }

    /// Full three-point angle measurement.
    pub fn angle(vertex: Point, a: Point, b: Point, color: Color, width: f64) -> Self {
        Self::new(
            ShapeKind::Angle {
                p1: vertex,
                p2: Some(a),
                p3: Some(b),
            },
            color,
            width,
        )
    }

    /// Starts a drag-drawn shape of the given type at `pos`.
    ///
    /// Two-point kinds begin with `start == end`, freehand with one point.
    /// Angles are not drag-drawn and yield a vertex-only angle.
    pub fn begin(shape_type: ShapeType, pos: Point, color: Color, width: f64) -> Self {
        let kind = match shape_type {
            ShapeType::Line => ShapeKind::Line {
                start: pos,
                end: pos,
            },
            ShapeType::Rect => ShapeKind::Rect {
                start: pos,
                end: pos,
            },
            ShapeType::Circle => ShapeKind::Circle {
                start: pos,
                end: pos,
            },
            ShapeType::Blur => ShapeKind::Blur {
                start: pos,
                end: pos,
            },
            ShapeType::Free => ShapeKind::Free { points: vec![pos] },
            ShapeType::Angle => ShapeKind::Angle {
                p1: pos,
                p2: None,
                p3: None,
            },
        };
        Self::new(kind, color, width)
    }

    pub fn shape_type(&self) -> ShapeType {
        match &self.kind {
            ShapeKind::Line { .. } => ShapeType::Line,
            ShapeKind::Rect { .. } => ShapeType::Rect,
            ShapeKind::Circle { .. } => ShapeType::Circle,
            ShapeKind::Blur { .. } => ShapeType::Blur,
            ShapeKind::Free { .. } => ShapeType::Free,
            ShapeKind::Angle { .. } => ShapeType::Angle,
        }
    }

    /// Extends a drag-drawn shape to `pos`: freehand appends, two-point kinds
    /// move their end. Angles ignore drag updates.
    pub fn extend_to(&mut self, pos: Point) {
        match &mut self.kind {
            ShapeKind::Line { end, .. }
            | ShapeKind::Rect { end, .. }
            | ShapeKind::Circle { end, .. }
            | ShapeKind::Blur { end, .. } => *end = pos,
            ShapeKind::Free { points } => points.push(pos),
            ShapeKind::Angle { .. } => {}
        }
    }

    /// Every defining point, in storage order.
    pub fn points(&self) -> Vec<Point> {
        match &self.kind {
            ShapeKind::Line { start, end }
            | ShapeKind::Rect { start, end }
            | ShapeKind::Circle { start, end }
            | ShapeKind::Blur { start, end } => vec![*start, *end],
            ShapeKind::Free { points } => points.clone(),
            ShapeKind::Angle { p1, p2, p3 } => {
                std::iter::once(*p1).chain(*p2).chain(*p3).collect()
            }
        }
    }

    /// Radius of a circle, `None` for other kinds.
    pub fn radius(&self) -> Option<f64> {
        match &self.kind {
            ShapeKind::Circle { start, end } => Some(start.distance_to(end)),
            _ => None,
        }
    }

    /// Logical-space bounding box, `None` for an empty freehand stroke.
    pub fn bounds(&self) -> Option<Rect> {
        if let ShapeKind::Circle { start, .. } = &self.kind {
            let r = self.radius().unwrap_or(0.0);
            return Some(Rect::new(start.x - r, start.y - r, 2.0 * r, 2.0 * r));
        }
        let points = self.points();
        let first = points.first()?;
        let (min, max) = points.iter().fold((*first, *first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Rect::from_corners(min, max))
    }

    /// Moves every point by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match &mut self.kind {
            ShapeKind::Line { start, end }
            | ShapeKind::Rect { start, end }
            | ShapeKind::Circle { start, end }
            | ShapeKind::Blur { start, end } => {
                *start = start.offset(dx, dy);
                *end = end.offset(dx, dy);
            }
            ShapeKind::Free { points } => {
                for p in points.iter_mut() {
                    *p = p.offset(dx, dy);
                }
            }
            ShapeKind::Angle { p1, p2, p3 } => {
                *p1 = p1.offset(dx, dy);
                for p in [p2, p3].into_iter().flatten() {
                    *p = p.offset(dx, dy);
                }
            }
        }
    }

    /// Reports geometry that renders oddly or not at all.
    ///
    /// The renderer and editing engine tolerate all of these; callers log.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ShapeError::InvalidWidth { width: self.width });
        }
        if let ShapeKind::Free { points } = &self.kind {
            if points.is_empty() {
                return Err(ShapeError::EmptyPath);
            }
        }
        if self.points().iter().any(|p| !p.is_finite()) {
            return Err(ShapeError::NonFiniteCoordinate {
                shape: self.shape_type().name(),
            });
        }
        Ok(())
    }
}
