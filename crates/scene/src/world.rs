use tokio::sync::oneshot;
use tracing::debug;

use crate::camera::{CameraLock, CameraView};
use crate::clipping::ClipPolygon;
use crate::components::{PolygonEntity, Visibility};
use crate::entity::EntityId;
use crate::surface::{SceneError, SceneSurface};
use foundation::handles::Handle;

/// How the in-memory world answers visibility transitions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransitionMode {
    /// Complete every transition as soon as it is requested.
    #[default]
    Immediate,
    /// Hold the completion signal until [`World::finish_transition`] is
    /// called (or forever), like a renderer that drops its transition event.
    Manual,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    polygon: Option<PolygonEntity>,
}

/// In-memory scene surface.
///
/// Keeps exactly what a viewer would show: polygon entities, the clipping
/// polygon, viewer visibility and camera state. Entity slots are reused with
/// a bumped generation so stale ids never alias a new entity.
#[derive(Debug, Default)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
    clipping: Option<ClipPolygon>,
    viewer: Visibility,
    globe_shown: bool,
    camera: Option<CameraView>,
    camera_lock: Option<CameraLock>,
    transition_mode: TransitionMode,
    pending_transition: Option<oneshot::Sender<()>>,
    transitions_requested: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transition_mode(mode: TransitionMode) -> Self {
        Self {
            transition_mode: mode,
            ..Self::default()
        }
    }

    pub fn entity_count(&self) -> usize {
        self.slots.iter().filter(|s| s.polygon.is_some()).count()
    }

    pub fn polygon(&self, id: EntityId) -> Option<&PolygonEntity> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.polygon.as_ref()
    }

    /// Live polygons in slot order.
    pub fn polygons(&self) -> Vec<(EntityId, &PolygonEntity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let polygon = slot.polygon.as_ref()?;
                Some((EntityId(Handle::new(idx as u32, slot.generation)), polygon))
            })
            .collect()
    }

    pub fn clipping(&self) -> Option<&ClipPolygon> {
        self.clipping.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.viewer.visible
    }

    pub fn globe_shown(&self) -> bool {
        self.globe_shown
    }

    pub fn camera(&self) -> Option<CameraView> {
        self.camera
    }

    pub fn camera_lock(&self) -> Option<CameraLock> {
        self.camera_lock
    }

    pub fn transitions_requested(&self) -> u32 {
        self.transitions_requested
    }

    /// Fire the held completion signal in [`TransitionMode::Manual`].
    ///
    /// Returns `false` if nothing was pending or the waiter already gave up.
    pub fn finish_transition(&mut self) -> bool {
        match self.pending_transition.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

impl SceneSurface for World {
    fn add_polygon(&mut self, polygon: PolygonEntity) -> Result<EntityId, SceneError> {
        if !polygon.is_renderable() {
            return Err(SceneError::InvalidGeometry(format!(
                "{} ({} vertices)",
                polygon.name,
                polygon.vertex_count()
            )));
        }

        let id = match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.polygon = Some(polygon);
                EntityId(Handle::new(idx, slot.generation))
            }
            None => {
                let idx = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    polygon: Some(polygon),
                });
                EntityId(Handle::new(idx, 0))
            }
        };
        Ok(id)
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return false;
        };
        if slot.generation != id.generation() || slot.polygon.is_none() {
            return false;
        }
        slot.polygon = None;
        self.free.push(id.index());
        true
    }

    fn set_clipping(&mut self, clip: Option<ClipPolygon>) {
        self.clipping = clip;
    }

    fn request_visibility(&mut self, visible: bool) -> Option<oneshot::Receiver<()>> {
        if self.viewer.visible == visible {
            return None;
        }
        self.viewer = Visibility::from_flag(visible);
        self.transitions_requested += 1;

        let (tx, rx) = oneshot::channel();
        match self.transition_mode {
            TransitionMode::Immediate => {
                let _ = tx.send(());
            }
            TransitionMode::Manual => {
                debug!(visible, "holding visibility transition");
                self.pending_transition = Some(tx);
            }
        }
        Some(rx)
    }

    fn show_globe(&mut self, show: bool) {
        self.globe_shown = show;
    }

    fn look_at(&mut self, view: CameraView) {
        self.camera = Some(view);
    }

    fn lock_camera(&mut self, lock: CameraLock) {
        self.camera_lock = Some(lock);
    }
}

#[cfg(test)]
mod tests {
    use super::{TransitionMode, World};
    use crate::camera::{CameraLock, CameraView, HeadingPitchRange};
    use crate::clipping::ClipPolygon;
    use crate::components::{Color, PolygonEntity};
    use crate::surface::{SceneError, SceneSurface};
    use foundation::math::Ecef;
    use pretty_assertions::assert_eq;

    fn square(name: &str) -> PolygonEntity {
        PolygonEntity::new(
            name,
            vec![
                Ecef::new(0.0, 0.0, 0.0),
                Ecef::new(1.0, 0.0, 0.0),
                Ecef::new(1.0, 1.0, 0.0),
                Ecef::new(0.0, 1.0, 0.0),
            ],
            Color::WHITE,
        )
    }

    #[test]
    fn add_and_remove_polygons() {
        let mut world = World::new();
        let a = world.add_polygon(square("a")).expect("add a");
        let b = world.add_polygon(square("b")).expect("add b");
        assert_eq!(world.entity_count(), 2);
        assert_eq!(world.polygon(b).map(|p| p.name.as_str()), Some("b"));

        assert!(world.remove_entity(a));
        assert!(!world.remove_entity(a));
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.polygons().len(), 1);
    }

    #[test]
    fn reused_slots_do_not_alias_stale_ids() {
        let mut world = World::new();
        let old = world.add_polygon(square("old")).expect("add");
        world.remove_entity(old);
        let new = world.add_polygon(square("new")).expect("add");

        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());
        assert!(world.polygon(old).is_none());
        assert!(!world.remove_entity(old));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn rejects_degenerate_polygons() {
        let mut world = World::new();
        let mut p = square("bad");
        p.positions.truncate(2);
        let err = world.add_polygon(p).unwrap_err();
        assert!(matches!(err, SceneError::InvalidGeometry(_)));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn visibility_requests_only_on_change() {
        let mut world = World::new();
        assert!(world.is_visible());
        assert!(world.request_visibility(true).is_none());

        let mut rx = world.request_visibility(false).expect("transition");
        assert!(rx.try_recv().is_ok());
        assert!(!world.is_visible());
        assert_eq!(world.transitions_requested(), 1);
    }

    #[test]
    fn manual_transitions_hold_the_signal() {
        let mut world = World::with_transition_mode(TransitionMode::Manual);
        let mut rx = world.request_visibility(false).expect("transition");
        assert!(rx.try_recv().is_err());
        assert!(world.finish_transition());
        assert!(rx.try_recv().is_ok());
        assert!(!world.finish_transition());
    }

    #[test]
    fn records_clipping_and_camera() {
        let mut world = World::new();
        world.set_clipping(Some(ClipPolygon::inverse(vec![Ecef::new(1.0, 2.0, 3.0)])));
        assert!(world.clipping().expect("clip").inverse);
        world.set_clipping(None);
        assert!(world.clipping().is_none());

        let view = CameraView {
            target: Ecef::new(1.0, 2.0, 3.0),
            offset: HeadingPitchRange::from_degrees(0.0, -45.0, 10.0),
        };
        world.look_at(view);
        world.lock_camera(CameraLock::orbit_only(500.0, 30.0));
        world.show_globe(true);
        assert_eq!(world.camera(), Some(view));
        assert_eq!(world.camera_lock().map(|l| l.max_zoom_distance), Some(30.0));
        assert!(world.globe_shown());
    }
}
