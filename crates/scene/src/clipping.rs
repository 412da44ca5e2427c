use foundation::math::Ecef;

use crate::components::Color;

/// Globe clipping polygon.
///
/// With `inverse` set, everything *outside* the polygon is hidden, which is
/// how the terrain is cut down to the block's square.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPolygon {
    pub positions: Vec<Ecef>,
    pub inverse: bool,
    pub edge_color: Color,
    pub edge_width: f64,
}

impl ClipPolygon {
    pub fn inverse(positions: Vec<Ecef>) -> Self {
        Self {
            positions,
            inverse: true,
            edge_color: Color::WHITE,
            edge_width: 2.0,
        }
    }
}
