//! Shape editing engine.
//!
//! Hit testing, handle derivation and handle-drag updates for annotation
//! shapes. Everything here is a pure function of its inputs; the surface owns
//! the shape list and decides what to do with the results.
//!
//! All positions are in logical space. Tolerances are specified in screen
//! pixels and divided by the zoom level so that grabbing a shape feels the
//! same at every magnification.

use smallvec::SmallVec;

use framekit_core::constants::{
    FREE_HANDLE_SCALE, HIT_RADIUS, MIN_HANDLE_RADIUS, RECT_HIT_PADDING_FACTOR,
};
use framekit_core::geometry::{distance, distance_to_segment, point_in_rect, Point, Rect};

use crate::model::{Shape, ShapeKind};

/// Identifies a draggable control point on a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleId {
    /// Line start
    Start,
    /// Line end
    End,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    /// Circle center (moves the whole circle)
    Center,
    /// Circle radius point
    Edge,
    /// Angle vertex
    P1,
    P2,
    P3,
    /// Freehand translate handle at the centroid
    Move,
}

/// A handle as presented to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub id: HandleId,
    pub position: Point,
    /// Grab radius in logical units.
    pub radius: f64,
}

impl Handle {
    fn new(id: HandleId, position: Point, radius: f64) -> Self {
        Self {
            id,
            position,
            radius,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, pos: Point) -> bool {
        distance(pos, self.position) <= self.radius
    }
}

/// Handles of one shape. No kind has more than four.
pub type Handles = SmallVec<[Handle; 4]>;

/// Hit tolerance in logical units for the given zoom level.
pub fn hit_tolerance(zoom: f64) -> f64 {
    HIT_RADIUS / zoom
}

/// Handle grab radius in logical units, never below [`MIN_HANDLE_RADIUS`].
pub fn handle_radius(zoom: f64) -> f64 {
    (HIT_RADIUS / zoom).max(MIN_HANDLE_RADIUS)
}

/// Derives the handles of `shape` at the given zoom level.
///
/// Handles are returned in a fixed order per kind, which is also the order
/// [`hit_test_handle`] checks them in.
pub fn handles_for_shape(shape: &Shape, zoom: f64) -> Handles {
    let r = handle_radius(zoom);
    let mut handles = Handles::new();

    match &shape.kind {
        ShapeKind::Line { start, end } => {
            handles.push(Handle::new(HandleId::Start, *start, r));
            handles.push(Handle::new(HandleId::End, *end, r));
        }
        ShapeKind::Rect { start, end } | ShapeKind::Blur { start, end } => {
            // Stored coordinates, not `Rect` extents, so a handle sits exactly
            // on the values a drag back onto it writes
            let (min_x, max_x) = (start.x.min(end.x), start.x.max(end.x));
            let (min_y, max_y) = (start.y.min(end.y), start.y.max(end.y));
            handles.push(Handle::new(HandleId::TopLeft, Point::new(min_x, min_y), r));
            handles.push(Handle::new(HandleId::TopRight, Point::new(max_x, min_y), r));
            handles.push(Handle::new(HandleId::BottomRight, Point::new(max_x, max_y), r));
            handles.push(Handle::new(HandleId::BottomLeft, Point::new(min_x, max_y), r));
        }
        ShapeKind::Circle { start, end } => {
            handles.push(Handle::new(HandleId::Center, *start, r));
            // center + r * (cos θ, sin θ) along start->end is exactly `end`
            handles.push(Handle::new(HandleId::Edge, *end, r));
        }
        ShapeKind::Angle { p1, p2, p3 } => {
            handles.push(Handle::new(HandleId::P1, *p1, r));
            if let Some(p2) = p2 {
                handles.push(Handle::new(HandleId::P2, *p2, r));
            }
            if let Some(p3) = p3 {
                handles.push(Handle::new(HandleId::P3, *p3, r));
            }
        }
        ShapeKind::Free { points } => {
            if let Some(c) = Point::centroid(points) {
                handles.push(Handle::new(HandleId::Move, c, r * FREE_HANDLE_SCALE));
            }
        }
    }

    handles
}

/// Returns the first handle of `shape` whose circle contains `pos`.
pub fn hit_test_handle(pos: Point, shape: &Shape, zoom: f64) -> Option<HandleId> {
    handles_for_shape(shape, zoom)
        .iter()
        .find(|h| h.contains(pos))
        .map(|h| h.id)
}

/// Tests whether `pos` touches the body of `shape`.
///
/// Rectangles use a doubled padding around their box, blur regions a single
/// one, circles only register on the ring (the interior is a miss).
pub fn hit_test_shape(pos: Point, shape: &Shape, zoom: f64) -> bool {
    let tol = hit_tolerance(zoom);

    match &shape.kind {
        ShapeKind::Line { start, end } => distance_to_segment(pos, *start, *end) <= tol,
        ShapeKind::Rect { start, end } => point_in_rect(
            pos,
            &Rect::from_corners(*start, *end),
            tol * RECT_HIT_PADDING_FACTOR,
        ),
        ShapeKind::Blur { start, end } => {
            point_in_rect(pos, &Rect::from_corners(*start, *end), tol)
        }
        ShapeKind::Circle { start, end } => {
            let radius = distance(*start, *end);
            (distance(pos, *start) - radius).abs() <= tol
        }
        ShapeKind::Angle { p1, p2, p3 } => [p2, p3]
            .into_iter()
            .flatten()
            .any(|p| distance_to_segment(pos, *p1, *p) <= tol),
        ShapeKind::Free { points } => {
            let on_segment = points
                .windows(2)
                .any(|w| distance_to_segment(pos, w[0], w[1]) <= tol);
            on_segment || points.first().is_some_and(|p| distance(pos, *p) <= tol)
        }
    }
}

/// Index of the topmost shape under `pos`.
///
/// Later shapes paint on top, so the scan runs back to front.
pub fn find_shape_at_pos(pos: Point, shapes: &[Shape], zoom: f64) -> Option<usize> {
    shapes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, s)| hit_test_shape(pos, s, zoom))
        .map(|(i, _)| i)
}

/// Returns a copy of `shape` with `handle` dragged to `new_pos`.
///
/// Rectangle and blur corners are rebuilt from the current normalized box:
/// the dragged corner goes to `new_pos` and the opposite corner stays where
/// it was, whatever order `start` and `end` were stored in. A handle that
/// does not belong to the shape's kind leaves it unchanged.
pub fn update_shape_with_handle(shape: &Shape, handle: HandleId, new_pos: Point) -> Shape {
    let mut updated = shape.clone();

    match &mut updated.kind {
        ShapeKind::Line { start, end } => match handle {
            HandleId::Start => *start = new_pos,
            HandleId::End => *end = new_pos,
            _ => {}
        },
        ShapeKind::Rect { start, end } | ShapeKind::Blur { start, end } => {
            drag_corner(start, end, handle, new_pos);
        }
        ShapeKind::Circle { start, end } => match handle {
            HandleId::Center => {
                let dx = new_pos.x - start.x;
                let dy = new_pos.y - start.y;
                *start = new_pos;
                *end = end.offset(dx, dy);
            }
            HandleId::Edge => *end = new_pos,
            _ => {}
        },
        ShapeKind::Angle { p1, p2, p3 } => match handle {
            HandleId::P1 => *p1 = new_pos,
            HandleId::P2 if p2.is_some() => *p2 = Some(new_pos),
            HandleId::P3 if p3.is_some() => *p3 = Some(new_pos),
            _ => {}
        },
        ShapeKind::Free { points } => {
            if handle == HandleId::Move {
                if let Some(c) = Point::centroid(points) {
                    let (dx, dy) = (new_pos.x - c.x, new_pos.y - c.y);
                    for p in points.iter_mut() {
                        *p = p.offset(dx, dy);
                    }
                }
            }
        }
    }

    updated
}

/// Moves one corner of the box spanned by `start`/`end`.
///
/// Each corner is made of one x and one y coordinate, owned by whichever of
/// the two stored points currently holds that extreme. Only those two fields
/// are rewritten, so the opposite corner is untouched and a drag back onto
/// the handle's own position is an exact no-op.
fn drag_corner(start: &mut Point, end: &mut Point, handle: HandleId, new_pos: Point) {
    let (takes_min_x, takes_min_y) = match handle {
        HandleId::TopLeft => (true, true),
        HandleId::TopRight => (false, true),
        HandleId::BottomRight => (false, false),
        HandleId::BottomLeft => (true, false),
        _ => return,
    };

    // Ties give the min role to `start` and the max role to `end`
    let start_is_min_x = start.x <= end.x;
    let start_is_min_y = start.y <= end.y;

    if takes_min_x == start_is_min_x {
        start.x = new_pos.x;
    } else {
        end.x = new_pos.x;
    }
    if takes_min_y == start_is_min_y {
        start.y = new_pos.y;
    } else {
        end.y = new_pos.y;
    }
}
