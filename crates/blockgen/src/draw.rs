//! The 2D map capability and the events it produces.

use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use runtime::Frame;

/// Commands the engine sends to the 2D map.
///
/// Coordinates are projected Web Mercator meters.
pub trait DrawSurface {
    /// Enable or disable the square-drawing interaction.
    fn set_active(&mut self, active: bool);

    /// Cancel a drawing gesture in progress.
    fn abort_drawing(&mut self);

    /// Remove every drawn shape.
    fn clear_shapes(&mut self);

    /// Show `ring` as the current square, replacing any previous one.
    fn show_square(&mut self, ring: &[Vec2; 5]);

    /// Fit the map view to `bounds`.
    fn fit_extent(&mut self, bounds: &Aabb2);

    /// Resize the map panel, in pixels.
    fn set_panel_size(&mut self, size: [f64; 2]);

    /// Re-measure the map after a layout change.
    fn update_size(&mut self);
}

/// Input from the map and its panel, in arrival order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MapEvent {
    DrawStart,
    /// The pointer moved while drawing; used for the live preview.
    DrawMove { anchor: Vec2, cursor: Vec2 },
    DrawEnd { anchor: Vec2, cursor: Vec2 },
    DrawAbort,
    /// A pointer went down outside the map panel.
    PointerDownOutside,
    PanelResized { requested: [f64; 2], viewport: [f64; 2] },
    AnimationFrame(Frame),
}
