/// Earth-centered, Earth-fixed Cartesian coordinates (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ecef {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Ecef {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line (chord) distance, not the distance along the surface.
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::Ecef;

    #[test]
    fn distance_is_euclidean() {
        let a = Ecef::new(1.0, 2.0, 3.0);
        let b = Ecef::new(4.0, 6.0, 3.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
        assert_eq!(a.distance(a), 0.0);
    }
}
