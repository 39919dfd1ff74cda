//! Page-pixel geometry: points, text boxes and bubble polygons.

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A 2D point in page-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Largest coordinate magnitude accepted from fields or panel files.
///
/// Sums and differences of in-range values stay far from `i32` overflow.
pub const COORD_LIMIT: i32 = 1 << 24;

impl Point {
    /// The `(0, 0)` pointer sentinel.
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this is the `(0, 0)` sentinel.
    pub fn is_origin(&self) -> bool {
        *self == Self::ORIGIN
    }

    /// Whether both coordinates lie within [`COORD_LIMIT`].
    pub fn in_range(&self) -> bool {
        let range = -COORD_LIMIT..=COORD_LIMIT;
        range.contains(&self.x) && range.contains(&self.y)
    }

    /// Parse an `"x,y"` pair as written into the coordinate input fields.
    ///
    /// Returns `None` when either half is missing, not an integer, or out
    /// of range.
    pub fn parse_pair(s: &str) -> Option<Self> {
        let (x, y) = s.trim().split_once(',')?;
        let x = x.trim().parse().ok()?;
        let y = y.trim().parse().ok()?;
        Some(Self::new(x, y)).filter(Point::in_range)
    }

    /// Format as the `"x,y"` pair the input fields hold.
    pub fn to_pair(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextBox {
    /// Top-left corner X coordinate
    pub x: i32,
    /// Top-left corner Y coordinate
    pub y: i32,
    /// Width of the box
    pub width: i32,
    /// Height of the box
    pub height: i32,
}

impl TextBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a box from its top-left corner and a `(width, height)` pair.
    pub fn from_position_size(position: Point, size: Point) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Create a box spanning two corner points, whichever order they come in.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        let width = (p1.x - p2.x).abs();
        let height = (p1.y - p2.y).abs();
        Self::new(x, y, width, height)
    }

    /// A box only counts as placed once both spans are positive and all
    /// four values are in range.
    pub fn is_placed(&self) -> bool {
        self.width > 0 && self.height > 0 && self.in_range()
    }

    pub fn in_range(&self) -> bool {
        self.top_left().in_range() && self.size().in_range()
    }

    /// Center point, rounded toward the top-left like integer division.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// Same box shifted so that `origin` becomes `(0, 0)`.
    pub fn translated(&self, origin: Point) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }
}

/// A closed polygon; the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polygon {
    /// The vertices in drawing order.
    pub vertices: Vec<Point>,
}

impl Polygon {
    /// The four corners of `rect` pulled inward by `margin`, clockwise from
    /// the top-left.
    pub fn inset_rect(rect: &TextBox, margin: i32) -> Self {
        let left = rect.x + margin;
        let right = rect.x + rect.width - margin;
        let top = rect.y + margin;
        let bottom = rect.y + rect.height - margin;
        Self {
            vertices: vec![
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ],
        }
    }

    /// Insert `points` so that the first of them lands at `index`.
    pub fn splice(&mut self, index: usize, points: [Point; 2]) {
        let index = index.min(self.vertices.len());
        self.vertices.splice(index..index, points);
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices formatted for an SVG `points` attribute.
    pub fn to_svg_points(&self) -> String {
        self.vertices
            .iter()
            .map(Point::to_pair)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
