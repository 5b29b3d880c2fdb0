//! Editable plot shapes
//!
//! Shape vertices are stored in data (axes) coordinates. Hit testing and
//! interactive edits happen in surface pixels, so those methods take the
//! current transforms as closures.

use plume_core::Point;

use crate::surface::HitTest;

/// What the user may do with a shape
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub selectable: bool,
    pub movable: bool,
    pub resizable: bool,
    pub rotatable: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities::new(true, true, true, true);
    pub const LOCKED: Capabilities = Capabilities::new(false, false, false, false);

    pub const fn new(selectable: bool, movable: bool, resizable: bool, rotatable: bool) -> Self {
        Self {
            selectable,
            movable,
            resizable,
            rotatable,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle; vertices are the four corners in order
    Rectangle,
    /// Polyline, or polygon when `closed`
    Polygon { closed: bool },
    Segment,
    /// Single point
    Marker,
}

impl ShapeKind {
    pub fn default_capabilities(self) -> Capabilities {
        match self {
            ShapeKind::Rectangle | ShapeKind::Segment => Capabilities::new(true, true, true, false),
            ShapeKind::Polygon { .. } => Capabilities::ALL,
            // A marker moves by dragging its only handle.
            ShapeKind::Marker => Capabilities::new(true, true, true, false),
        }
    }

    fn is_closed(self) -> bool {
        match self {
            ShapeKind::Rectangle => true,
            ShapeKind::Polygon { closed } => closed,
            ShapeKind::Segment | ShapeKind::Marker => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    points: Vec<Point>,
    pub caps: Capabilities,
    pub visible: bool,
    pub z: i32,
    pub title: String,
}

impl Shape {
    fn with_points(kind: ShapeKind, points: Vec<Point>) -> Self {
        Self {
            kind,
            points,
            caps: kind.default_capabilities(),
            visible: true,
            z: 0,
            title: String::new(),
        }
    }

    /// Rectangle spanning two opposite corners
    pub fn rectangle(p0: Point, p2: Point) -> Self {
        Self::with_points(
            ShapeKind::Rectangle,
            vec![
                p0,
                Point::new(p2.x, p0.y),
                p2,
                Point::new(p0.x, p2.y),
            ],
        )
    }

    pub fn polygon(points: Vec<Point>, closed: bool) -> Self {
        Self::with_points(ShapeKind::Polygon { closed }, points)
    }

    pub fn segment(a: Point, b: Point) -> Self {
        Self::with_points(ShapeKind::Segment, vec![a, b])
    }

    pub fn marker(p: Point) -> Self {
        Self::with_points(ShapeKind::Marker, vec![p])
    }

    pub fn with_caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn add_point(&mut self, p: Point) -> usize {
        self.points.push(p);
        self.points.len() - 1
    }

    pub fn remove_last_point(&mut self) -> Option<Point> {
        self.points.pop()
    }

    /// Mean of the vertices
    pub fn center(&self) -> Point {
        if self.points.is_empty() {
            return Point::ZERO;
        }
        let n = self.points.len() as f32;
        let sum = self
            .points
            .iter()
            .fold(Point::ZERO, |acc, p| acc + *p);
        Point::new(sum.x / n, sum.y / n)
    }

    /// Move vertex `handle` to `pos` (data coordinates).
    ///
    /// Rectangles stay axis-aligned: the neighbouring corners follow. With
    /// `ctrl` a rectangle corner is constrained to keep the shape square in
    /// data units.
    pub fn move_point_to(&mut self, handle: usize, pos: Point, ctrl: bool) {
        if handle >= self.points.len() {
            return;
        }
        if self.kind != ShapeKind::Rectangle || self.points.len() != 4 {
            self.points[handle] = pos;
            return;
        }

        let opposite = self.points[(handle + 2) % 4];
        let pos = if ctrl {
            let dx = pos.x - opposite.x;
            let dy = pos.y - opposite.y;
            let side = dx.abs().max(dy.abs());
            Point::new(
                opposite.x + side.copysign(dx),
                opposite.y + side.copysign(dy),
            )
        } else {
            pos
        };
        let (x0, y0, x1, y1) = match handle {
            0 => (pos.x, pos.y, opposite.x, opposite.y),
            1 => (opposite.x, pos.y, pos.x, opposite.y),
            2 => (opposite.x, opposite.y, pos.x, pos.y),
            _ => (pos.x, opposite.y, opposite.x, pos.y),
        };
        self.points = vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ];
    }

    /// Translate every vertex so that `old` lands on `new` (data coordinates)
    pub fn move_shape(&mut self, old: Point, new: Point) {
        let delta = new - old;
        for p in &mut self.points {
            *p = *p + delta;
        }
    }

    /// Rotate about the center by `angle` radians, in surface space
    pub fn rotate_local(
        &mut self,
        angle: f32,
        to_canvas: impl Fn(Point) -> Point,
        to_axes: impl Fn(Point) -> Point,
    ) {
        let center = to_canvas(self.center());
        for p in &mut self.points {
            *p = to_axes(to_canvas(*p).rotate_about(center, angle));
        }
    }

    /// Hit test `pos` against the outline (surface coordinates).
    pub fn hit_test(&self, pos: Point, to_canvas: impl Fn(Point) -> Point) -> HitTest {
        let pts: Vec<Point> = self.points.iter().map(|p| to_canvas(*p)).collect();
        let Some(first) = pts.first().copied() else {
            return HitTest::miss();
        };

        let (handle, _) = pts.iter().enumerate().fold((0, f32::MAX), |best, (i, p)| {
            let d = pos.distance(*p);
            if d < best.1 {
                (i, d)
            } else {
                best
            }
        });

        let mut distance = pos.distance(first);
        for pair in pts.windows(2) {
            distance = distance.min(pos.distance_to_segment(pair[0], pair[1]));
        }
        let closed = self.kind.is_closed() && pts.len() > 2;
        if closed {
            if let Some(last) = pts.last() {
                distance = distance.min(pos.distance_to_segment(*last, first));
            }
        }

        HitTest {
            distance,
            handle: Some(handle),
            inside: closed && point_in_polygon(pos, &pts),
            other: None,
        }
    }
}

/// Even-odd rule containment test
pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    let mut inside = false;
    let mut j = poly.len().wrapping_sub(1);
    for i in 0..poly.len() {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
