//! Geographic bounding boxes.

use crate::bounds::Aabb2;
use crate::math::{LonLat, lonlat_to_mercator, mercator_to_lonlat};

/// Number of decimal places kept by [`GeoExtent::normalize`] (about 1.1 m at
/// the equator).
pub const EXTENT_DECIMALS: i32 = 5;

/// Axis-aligned geographic bounding box in degrees.
///
/// Values are plain data; use [`GeoExtent::is_valid`] / [`GeoExtent::normalize`]
/// before trusting one that came from user input or a share link.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoExtent {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoExtent {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// All fields finite, non-empty, and within global lon/lat bounds.
    pub fn is_valid(&self) -> bool {
        let fields = [self.west, self.south, self.east, self.north];
        if !fields.iter().all(|v| v.is_finite()) {
            return false;
        }
        if self.west >= self.east || self.south >= self.north {
            return false;
        }
        self.west >= -180.0 && self.east <= 180.0 && self.south >= -90.0 && self.north <= 90.0
    }

    /// Round every field to [`EXTENT_DECIMALS`] places, or `None` when the
    /// extent is invalid before or after rounding.
    pub fn normalize(&self) -> Option<GeoExtent> {
        if !self.is_valid() {
            return None;
        }
        let rounded = GeoExtent {
            west: round_decimals(self.west),
            south: round_decimals(self.south),
            east: round_decimals(self.east),
            north: round_decimals(self.north),
        };
        rounded.is_valid().then_some(rounded)
    }

    pub fn south_west(&self) -> LonLat {
        LonLat::new(self.west, self.south)
    }

    pub fn north_east(&self) -> LonLat {
        LonLat::new(self.east, self.north)
    }

    /// Corners counter-clockwise starting at the south-west.
    pub fn corners(&self) -> [LonLat; 4] {
        [
            LonLat::new(self.west, self.south),
            LonLat::new(self.east, self.south),
            LonLat::new(self.east, self.north),
            LonLat::new(self.west, self.north),
        ]
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// Reproject a Web Mercator box into degrees.
    ///
    /// Mercator is monotonic on both axes, so the corners bound the result.
    pub fn from_projected(bounds: &Aabb2) -> GeoExtent {
        let sw = mercator_to_lonlat(bounds.min_corner());
        let ne = mercator_to_lonlat(bounds.max_corner());
        GeoExtent::new(sw.lon, sw.lat, ne.lon, ne.lat)
    }

    pub fn to_projected(&self) -> Aabb2 {
        Aabb2::from_corners(
            lonlat_to_mercator(self.south_west()),
            lonlat_to_mercator(self.north_east()),
        )
    }
}

// Decimal round-trip through the shortest representation, so that
// `round_decimals(round_decimals(x)) == round_decimals(x)` holds exactly.
fn round_decimals(v: f64) -> f64 {
    let text = format!("{:.*}", EXTENT_DECIMALS as usize, v);
    text.parse().unwrap_or(v)
}
