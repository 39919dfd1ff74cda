//! Speech-bubble outline placement.
//!
//! A bubble outline is a text box inset by half the stroke width. When the
//! slot has a pointer, one edge gets a two-point detour: a point `notch_depth`
//! in from the nearest corner and the pointer itself. The edge is chosen from
//! which side of the box center the pointer lies on and whether the pointer
//! is further away vertically or horizontally.

use serde::{Deserialize, Serialize};

use crate::model::{Point, Polygon, TextBox};

/// How a pointer exactly on the diagonal (`dx == dy`) is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// `dy > dx` picks a horizontal edge; a diagonal pointer gets no tail.
    Strict,
    /// `dy >= dx` picks a horizontal edge; a diagonal pointer (including one
    /// at the box center) gets a top or bottom tail.
    #[default]
    VerticalWins,
}

impl TieBreak {
    fn vertical_dominant(self, dx: i32, dy: i32) -> bool {
        match self {
            TieBreak::Strict => dy > dx,
            TieBreak::VerticalWins => dy >= dx,
        }
    }
}

/// Which edge the tail leaves from, and toward which end of that edge.
///
/// The first half of the name is the edge, the second the corner end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleCase {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
    RightTop,
    RightBottom,
    LeftTop,
    LeftBottom,
}

impl BubbleCase {
    /// Classify a pointer relative to a box center.
    ///
    /// Returns `None` only for a diagonal pointer under [`TieBreak::Strict`].
    pub fn classify(center: Point, pointer: Point, tie_break: TieBreak) -> Option<Self> {
        let dx = (pointer.x - center.x).abs();
        let dy = (pointer.y - center.y).abs();
        let right = pointer.x > center.x;
        let bottom = pointer.y > center.y;

        if tie_break.vertical_dominant(dx, dy) {
            Some(match (bottom, right) {
                (true, false) => BubbleCase::BottomLeft,
                (true, true) => BubbleCase::BottomRight,
                (false, true) => BubbleCase::TopRight,
                (false, false) => BubbleCase::TopLeft,
            })
        } else if dx > dy {
            Some(match (right, bottom) {
                (true, false) => BubbleCase::RightTop,
                (true, true) => BubbleCase::RightBottom,
                (false, false) => BubbleCase::LeftTop,
                (false, true) => BubbleCase::LeftBottom,
            })
        } else {
            None
        }
    }
}

/// Computes bubble outlines for text boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubblePlacer {
    /// Inset applied to every side, half the outline stroke.
    pub stroke_margin: i32,
    /// Distance of the tail's edge point from the nearest corner.
    pub notch_depth: i32,
    pub tie_break: TieBreak,
}

impl BubblePlacer {
    pub fn new(stroke_margin: i32, notch_depth: i32, tie_break: TieBreak) -> Self {
        Self {
            stroke_margin,
            notch_depth,
            tie_break,
        }
    }

    /// Outline for `rect` in coordinates local to `origin`.
    ///
    /// `rect` and `pointer` are page coordinates. A missing or out-of-range
    /// pointer, or the `(0, 0)` sentinel, yields the plain four-corner
    /// outline.
    pub fn place(&self, rect: &TextBox, pointer: Option<Point>, origin: Point) -> Polygon {
        let local = rect.translated(origin);
        let mut poly = Polygon::inset_rect(&local, self.stroke_margin);

        let Some(pointer) = pointer.filter(|p| !p.is_origin() && p.in_range()) else {
            return poly;
        };
        let target = pointer - origin;

        let Some(case) = BubbleCase::classify(local.center(), target, self.tie_break) else {
            log::debug!("Pointer {:?} on the diagonal of {:?}, no tail", pointer, rect);
            return poly;
        };

        let left = local.x + self.stroke_margin;
        let right = local.x + local.width - self.stroke_margin;
        let top = local.y + self.stroke_margin;
        let bottom = local.y + local.height - self.stroke_margin;
        let notch = self.notch_depth;

        // Vertex order is TL, TR, BR, BL; each index is the insertion point
        // after the corner that starts the edge being notched. Pointers below
        // the center always leave from the bottom edge, even when the
        // horizontal distance dominates.
        let (index, points) = match case {
            BubbleCase::BottomLeft | BubbleCase::LeftBottom => {
                (3, [Point::new(left + notch, bottom), target])
            }
            BubbleCase::BottomRight | BubbleCase::RightBottom => {
                (3, [target, Point::new(right - notch, bottom)])
            }
            BubbleCase::TopRight => (1, [Point::new(right - notch, top), target]),
            BubbleCase::TopLeft => (1, [target, Point::new(left + notch, top)]),
            BubbleCase::RightTop => (2, [target, Point::new(right, top + notch)]),
            BubbleCase::LeftTop => (4, [Point::new(left, top + notch), target]),
        };
        poly.splice(index, points);
        poly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGIN: i32 = 4;
    const NOTCH: i32 = 10;

    fn placer(tie_break: TieBreak) -> BubblePlacer {
        BubblePlacer::new(MARGIN, NOTCH, tie_break)
    }

    fn rect() -> TextBox {
        TextBox::new(100, 100, 200, 100)
    }

    fn base_corners() -> Vec<Point> {
        vec![
            Point::new(104, 104),
            Point::new(296, 104),
            Point::new(296, 196),
            Point::new(104, 196),
        ]
    }

    #[test]
    fn test_no_pointer_gives_inset_rect() {
        let poly = placer(TieBreak::Strict).place(&rect(), None, Point::ORIGIN);
        assert_eq!(poly.vertices, base_corners());
    }

    #[test]
    fn test_origin_sentinel_gives_inset_rect() {
        let poly = placer(TieBreak::Strict).place(&rect(), Some(Point::ORIGIN), Point::ORIGIN);
        assert_eq!(poly.vertices, base_corners());
    }

    #[test]
    fn test_pointer_below_center_notches_bottom_edge() {
        // Center is (200, 150); pointer straight below the bottom edge
        let pointer = Point::new(200, 260);
        let poly = placer(TieBreak::Strict).place(&rect(), Some(pointer), Point::ORIGIN);

        assert_eq!(poly.len(), 6);
        assert_eq!(
            BubbleCase::classify(rect().center(), pointer, TieBreak::Strict),
            Some(BubbleCase::BottomLeft)
        );
        let notch = poly.vertices[3];
        assert_eq!(notch.y, 196);
        assert!(notch.x > 104 && notch.x < 296, "notch inside the bottom edge");
        assert_eq!(poly.vertices[4], pointer);
    }

    #[test]
    fn test_left_right_swap_flips_bottom_case() {
        let p = placer(TieBreak::Strict);
        let left = p.place(&rect(), Some(Point::new(180, 300)), Point::ORIGIN);
        let right = p.place(&rect(), Some(Point::new(220, 300)), Point::ORIGIN);

        assert_eq!(left.vertices[3], Point::new(104 + NOTCH, 196));
        assert_eq!(left.vertices[4], Point::new(180, 300));
        assert_eq!(right.vertices[3], Point::new(220, 300));
        assert_eq!(right.vertices[4], Point::new(296 - NOTCH, 196));

        for poly in [&left, &right] {
            let corners: Vec<Point> = poly
                .vertices
                .iter()
                .copied()
                .filter(|v| base_corners().contains(v))
                .collect();
            assert_eq!(corners, base_corners());
        }
    }

    #[test]
    fn test_all_eight_cases() {
        let center = rect().center();
        // Pointer and where it lands in the spliced outline
        let cases = [
            (Point::new(190, 300), BubbleCase::BottomLeft, 4),
            (Point::new(210, 300), BubbleCase::BottomRight, 3),
            (Point::new(210, 0), BubbleCase::TopRight, 2),
            (Point::new(190, 0), BubbleCase::TopLeft, 1),
            (Point::new(500, 140), BubbleCase::RightTop, 2),
            (Point::new(500, 160), BubbleCase::RightBottom, 3),
            (Point::new(-100, 140), BubbleCase::LeftTop, 5),
            (Point::new(-100, 160), BubbleCase::LeftBottom, 4),
        ];
        for (pointer, expected, at) in cases {
            assert_eq!(
                BubbleCase::classify(center, pointer, TieBreak::Strict),
                Some(expected),
                "pointer {:?}",
                pointer
            );
            let poly = placer(TieBreak::Strict).place(&rect(), Some(pointer), Point::ORIGIN);
            assert_eq!(poly.len(), 6);
            assert_eq!(poly.vertices[at], pointer, "case {:?}", expected);
        }
    }

    #[test]
    fn test_right_edge_tail_order() {
        let pointer = Point::new(500, 140);
        let poly = placer(TieBreak::Strict).place(&rect(), Some(pointer), Point::ORIGIN);
        assert_eq!(
            poly.vertices,
            vec![
                Point::new(104, 104),
                Point::new(296, 104),
                pointer,
                Point::new(296, 104 + NOTCH),
                Point::new(296, 196),
                Point::new(104, 196),
            ]
        );
    }

    #[test]
    fn test_far_side_pointer_below_center_uses_bottom_edge() {
        let p = placer(TieBreak::Strict);

        let right = Point::new(500, 160);
        assert_eq!(
            p.place(&rect(), Some(right), Point::ORIGIN).vertices,
            vec![
                Point::new(104, 104),
                Point::new(296, 104),
                Point::new(296, 196),
                right,
                Point::new(296 - NOTCH, 196),
                Point::new(104, 196),
            ]
        );

        let left = Point::new(-100, 160);
        assert_eq!(
            p.place(&rect(), Some(left), Point::ORIGIN).vertices,
            vec![
                Point::new(104, 104),
                Point::new(296, 104),
                Point::new(296, 196),
                Point::new(104 + NOTCH, 196),
                left,
                Point::new(104, 196),
            ]
        );
    }

    #[test]
    fn test_tie_break_on_diagonal() {
        let center = rect().center();
        let diagonal = Point::new(center.x + 30, center.y + 30);

        assert_eq!(BubbleCase::classify(center, diagonal, TieBreak::Strict), None);
        assert_eq!(
            BubbleCase::classify(center, diagonal, TieBreak::VerticalWins),
            Some(BubbleCase::BottomRight)
        );

        let strict = placer(TieBreak::Strict).place(&rect(), Some(diagonal), Point::ORIGIN);
        assert_eq!(strict.len(), 4);
        let inclusive = placer(TieBreak::VerticalWins).place(&rect(), Some(diagonal), Point::ORIGIN);
        assert_eq!(inclusive.len(), 6);
    }

    #[test]
    fn test_pointer_at_center() {
        let center = rect().center();
        assert_eq!(
            BubbleCase::classify(center, center, TieBreak::VerticalWins),
            Some(BubbleCase::TopLeft)
        );
    }

    #[test]
    fn test_coordinates_are_panel_local() {
        let origin = Point::new(100, 100);
        let pointer = Point::new(200, 260);
        let poly = placer(TieBreak::Strict).place(&rect(), Some(pointer), origin);
        assert_eq!(poly.vertices[0], Point::new(4, 4));
        assert_eq!(poly.vertices[4], Point::new(100, 160));
    }
}
