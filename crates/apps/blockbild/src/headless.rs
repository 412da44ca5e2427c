use blockgen::DrawSurface;
use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use tracing::debug;

/// A map without a screen: remembers what it would display.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    pub active: bool,
    pub square: Option<[Vec2; 5]>,
    pub view: Option<Aabb2>,
    pub panel_size: Option<[f64; 2]>,
    pub relayouts: u32,
}

impl DrawSurface for HeadlessMap {
    fn set_active(&mut self, active: bool) {
        debug!(active, "draw interaction");
        self.active = active;
    }

    fn abort_drawing(&mut self) {
        debug!("drawing aborted");
    }

    fn clear_shapes(&mut self) {
        self.square = None;
    }

    fn show_square(&mut self, ring: &[Vec2; 5]) {
        self.square = Some(*ring);
    }

    fn fit_extent(&mut self, bounds: &Aabb2) {
        debug!(?bounds, "map view fitted");
        self.view = Some(*bounds);
    }

    fn set_panel_size(&mut self, size: [f64; 2]) {
        self.panel_size = Some(size);
    }

    fn update_size(&mut self) {
        self.relayouts += 1;
    }
}
