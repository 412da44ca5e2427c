//! Spherical Web Mercator (EPSG:3857) <-> geographic degrees (EPSG:4326).
//!
//! The 2D map draws in Web Mercator meters; everything downstream of the draw
//! interaction works in degrees.

use super::{LonLat, Vec2, WGS84_A};

/// Web Mercator sphere radius (meters).
pub const WEB_MERCATOR_RADIUS: f64 = WGS84_A;

/// Half the width of the projected world (meters).
pub const WEB_MERCATOR_HALF_EXTENT: f64 = std::f64::consts::PI * WEB_MERCATOR_RADIUS;

/// Latitude at which the projected world becomes square.
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Project geographic degrees onto the Web Mercator plane.
///
/// Latitudes beyond [`WEB_MERCATOR_MAX_LAT`] are clamped.
pub fn lonlat_to_mercator(p: LonLat) -> Vec2 {
    let lat = p.lat.clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT);
    let x = WEB_MERCATOR_RADIUS * p.lon.to_radians();
    let y = WEB_MERCATOR_RADIUS
        * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
            .tan()
            .ln();
    Vec2::new(x, y)
}

/// Inverse of [`lonlat_to_mercator`].
pub fn mercator_to_lonlat(p: Vec2) -> LonLat {
    let lon = (p.x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (p.y / WEB_MERCATOR_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    LonLat::new(lon, lat)
}
