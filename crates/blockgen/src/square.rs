//! Square drawing constraint in projected map coordinates.

use foundation::bounds::Aabb2;
use foundation::math::Vec2;

/// Forces a drag between two points into a square no larger than
/// `max_side`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SquareConstraint {
    pub max_side: f64,
}

/// The constrained square: `first` is the drag anchor, `second` the opposite
/// corner after snapping.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawnSquare {
    pub first: Vec2,
    pub second: Vec2,
    pub side: f64,
    pub direction_x: f64,
    pub direction_y: f64,
}

impl SquareConstraint {
    pub fn new(max_side: f64) -> Self {
        Self { max_side }
    }

    /// Side = min(larger drag axis, `max_side`); each axis keeps the sign of
    /// its drag delta, a zero delta counting as positive.
    pub fn constrain(&self, first: Vec2, second: Vec2) -> DrawnSquare {
        let dx = second.x - first.x;
        let dy = second.y - first.y;
        let side = dx.abs().max(dy.abs()).min(self.max_side);
        let direction_x = direction(dx);
        let direction_y = direction(dy);
        DrawnSquare {
            first,
            second: Vec2::new(first.x + side * direction_x, first.y + side * direction_y),
            side,
            direction_x,
            direction_y,
        }
    }
}

fn direction(delta: f64) -> f64 {
    if delta < 0.0 { -1.0 } else { 1.0 }
}

impl DrawnSquare {
    /// Closed ring: anchor, along x, opposite corner, along y, anchor.
    pub fn ring(&self) -> [Vec2; 5] {
        let (f, s) = (self.first, self.second);
        [f, Vec2::new(s.x, f.y), s, Vec2::new(f.x, s.y), f]
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::from_corners(self.first, self.second)
    }
}

/// Closed ring around a projected box, same winding as [`DrawnSquare::ring`].
pub fn rectangle_ring(bounds: &Aabb2) -> [Vec2; 5] {
    let min = bounds.min_corner();
    let max = bounds.max_corner();
    [
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        min,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drags() -> Vec<(Vec2, Vec2)> {
        let anchors = [
            Vec2::new(0.0, 0.0),
            Vec2::new(915_000.5, 5_780_000.25),
            Vec2::new(-12_345.0, 678.0),
        ];
        let deltas = [
            (0.0, 0.0),
            (10.0, 3.0),
            (-3.0, 10.0),
            (-40_000.0, -1.0),
            (7.5, -7.5),
            (0.0, -250.0),
            (16_000.0, 15_999.0),
        ];
        anchors
            .iter()
            .flat_map(|&a| deltas.iter().map(move |&(dx, dy)| (a, a + Vec2::new(dx, dy))))
            .collect()
    }

    #[test]
    fn result_is_a_bounded_square() {
        let c = SquareConstraint::new(15_000.0);
        for (first, second) in drags() {
            let sq = c.constrain(first, second);
            let dx = (sq.second.x - sq.first.x).abs();
            let dy = (sq.second.y - sq.first.y).abs();
            assert!((dx - dy).abs() < 1e-6, "{first:?} -> {second:?}");
            assert!(sq.side <= 15_000.0);
            assert_eq!(sq.first, first);
        }
    }

    #[test]
    fn side_follows_the_larger_axis() {
        let c = SquareConstraint::new(100.0);
        let sq = c.constrain(Vec2::new(0.0, 0.0), Vec2::new(-30.0, 12.0));
        assert_eq!(sq.side, 30.0);
        assert_eq!(sq.second, Vec2::new(-30.0, 30.0));
    }

    #[test]
    fn side_is_capped() {
        let c = SquareConstraint::new(100.0);
        let sq = c.constrain(Vec2::new(5.0, 5.0), Vec2::new(5.0, -900.0));
        assert_eq!(sq.side, 100.0);
        assert_eq!(sq.second, Vec2::new(105.0, -95.0));
    }

    #[test]
    fn zero_drag_is_a_point() {
        let c = SquareConstraint::new(100.0);
        let sq = c.constrain(Vec2::new(1.0, 2.0), Vec2::new(1.0, 2.0));
        assert_eq!(sq.side, 0.0);
        assert_eq!((sq.direction_x, sq.direction_y), (1.0, 1.0));
        assert_eq!(sq.bounds().max_dimension(), 0.0);
    }

    #[test]
    fn ring_is_closed_and_matches_bounds() {
        let sq = SquareConstraint::new(50.0).constrain(Vec2::new(0.0, 0.0), Vec2::new(-20.0, -5.0));
        let ring = sq.ring();
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[2], sq.second);

        let bounds = sq.bounds();
        assert_eq!(bounds.min, [-20.0, -20.0]);
        assert_eq!(bounds.max, [0.0, 0.0]);
        assert_eq!(rectangle_ring(&bounds)[2], Vec2::new(0.0, 0.0));
    }
}
