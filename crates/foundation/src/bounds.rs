use crate::math::Vec2;

/// Axis-aligned bounding box in a projected plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Smallest box containing both points, in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Aabb2 {
            min: [a.x.min(b.x), a.y.min(b.y)],
            max: [a.x.max(b.x), a.y.max(b.y)],
        }
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn max_dimension(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn min_corner(&self) -> Vec2 {
        Vec2::new(self.min[0], self.min[1])
    }

    pub fn max_corner(&self) -> Vec2 {
        Vec2::new(self.max[0], self.max[1])
    }
}
