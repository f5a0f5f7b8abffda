use framekit_annotate::editing::{handles_for_shape, update_shape_with_handle, HandleId};
use framekit_annotate::model::{Shape, ShapeKind};
use framekit_annotate::viewport::Viewport;
use framekit_core::{Color, Point};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn any_shape() -> impl Strategy<Value = Shape> {
    let c = Color::default();
    prop_oneof![
        (point(), point()).prop_map(move |(a, b)| Shape::line(a, b, c, 3.0)),
        (point(), point()).prop_map(move |(a, b)| Shape::rect(a, b, c, 3.0)),
        (point(), point()).prop_map(move |(a, b)| Shape::circle(a, b, c, 3.0)),
        (point(), point()).prop_map(move |(a, b)| Shape::blur(a, b, c, 3.0)),
        // Integer-valued points keep the centroid exact
        prop::collection::vec((-500i32..500, -500i32..500), 1..4).prop_map(move |pts| {
            let pts = pts
                .into_iter()
                .map(|(x, y)| Point::new(x as f64 * 4.0, y as f64 * 4.0))
                .collect();
            Shape::free(pts, c, 3.0)
        }),
        (point(), prop::option::of(point()), prop::option::of(point())).prop_map(
            move |(p1, p2, p3)| Shape::new(ShapeKind::Angle { p1, p2, p3 }, c, 3.0)
        ),
    ]
}

const CORNERS: [HandleId; 4] = [
    HandleId::TopLeft,
    HandleId::TopRight,
    HandleId::BottomRight,
    HandleId::BottomLeft,
];

/// Exact (min, max) corners of a rect or blur shape.
fn extremes(shape: &Shape) -> (Point, Point) {
    match &shape.kind {
        ShapeKind::Rect { start, end } | ShapeKind::Blur { start, end } => corners(*start, *end),
        other => panic!("not a box shape: {:?}", other),
    }
}

fn corners(a: Point, b: Point) -> (Point, Point) {
    (
        Point::new(a.x.min(b.x), a.y.min(b.y)),
        Point::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Corner opposite to `handle` of the box spanned by `(min, max)`.
fn opposite((min, max): (Point, Point), handle: HandleId) -> Point {
    match handle {
        HandleId::TopLeft => max,
        HandleId::TopRight => Point::new(min.x, max.y),
        HandleId::BottomRight => min,
        _ => Point::new(max.x, min.y),
    }
}

#[test]
fn test_every_orientation_and_corner() {
    let c = Color::default();
    let (lo, hi) = (Point::new(10.0, 20.0), Point::new(70.0, 90.0));
    let orientations = [
        (lo, hi),
        (hi, lo),
        (Point::new(lo.x, hi.y), Point::new(hi.x, lo.y)),
        (Point::new(hi.x, lo.y), Point::new(lo.x, hi.y)),
    ];
    let target = Point::new(40.0, 50.0);

    for (start, end) in orientations {
        for shape in [Shape::rect(start, end, c, 3.0), Shape::blur(start, end, c, 3.0)] {
            let before = extremes(&shape);
            for corner in CORNERS {
                let fixed = opposite(before, corner);
                let after = extremes(&update_shape_with_handle(&shape, corner, target));
                assert_eq!(
                    after,
                    corners(target, fixed),
                    "{:?} from {:?}/{:?}",
                    corner,
                    start,
                    end
                );
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_null_drag_is_identity(shape in any_shape(), zoom in 1.0f64..4.0) {
        for handle in handles_for_shape(&shape, zoom) {
            let same = update_shape_with_handle(&shape, handle.id, handle.position);
            prop_assert_eq!(&same, &shape, "handle {:?}", handle.id);
        }
    }

    #[test]
    fn prop_corner_drag_keeps_opposite_corner(
        start in point(),
        end in point(),
        target in point(),
        blur in any::<bool>(),
        corner in 0usize..4,
    ) {
        let c = Color::default();
        let shape = if blur {
            Shape::blur(start, end, c, 3.0)
        } else {
            Shape::rect(start, end, c, 3.0)
        };
        let handle = CORNERS[corner];
        let fixed = opposite(extremes(&shape), handle);
        let after = extremes(&update_shape_with_handle(&shape, handle, target));
        prop_assert_eq!(after, corners(target, fixed));
    }

    #[test]
    fn prop_zoom_round_trip(
        zoom in prop::sample::select(vec![1.0f64, 2.5, 4.0]),
        pan_x in -300.0f64..300.0,
        pan_y in -300.0f64..300.0,
        sx in 0.0f64..1280.0,
        sy in 0.0f64..720.0,
    ) {
        let mut vp = Viewport::new(1280.0, 720.0);
        vp.set_zoom(zoom);
        vp.set_pan(pan_x, pan_y);
        let logical = vp.screen_to_logical(sx, sy);
        let (rx, ry) = vp.logical_to_screen(&logical);
        prop_assert!((rx - sx).abs() < 1e-6);
        prop_assert!((ry - sy).abs() < 1e-6);
    }
}
