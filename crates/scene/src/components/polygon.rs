use foundation::math::Ecef;

/// Linear RGBA color, components in `0..=1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// A filled polygon entity.
///
/// With `per_position_height` the ring is rendered at each vertex's own
/// height instead of being draped on the terrain, which is what makes a
/// vertical wall possible.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonEntity {
    pub name: String,
    pub positions: Vec<Ecef>,
    pub color: Color,
    pub per_position_height: bool,
}

impl PolygonEntity {
    pub fn new(name: impl Into<String>, positions: Vec<Ecef>, color: Color) -> Self {
        Self {
            name: name.into(),
            positions,
            color,
            per_position_height: true,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_renderable(&self) -> bool {
        self.positions.len() >= 3
            && self
                .positions
                .iter()
                .all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
    }
}
