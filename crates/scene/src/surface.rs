//! The rendering capability the block engine drives.
//!
//! A surface owns the actual viewer (globe, terrain, entities, camera). The
//! engine only issues commands through this trait, so a real renderer and the
//! in-memory [`crate::World`] are interchangeable.

use tokio::sync::oneshot;

use crate::camera::{CameraLock, CameraView};
use crate::clipping::ClipPolygon;
use crate::components::PolygonEntity;
use crate::entity::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The polygon has too few vertices or a non-finite position.
    InvalidGeometry(String),
    /// The surface refused the entity for a reason of its own.
    Rejected(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::InvalidGeometry(msg) => write!(f, "invalid polygon geometry: {msg}"),
            SceneError::Rejected(msg) => write!(f, "scene rejected entity: {msg}"),
        }
    }
}

impl std::error::Error for SceneError {}

pub trait SceneSurface {
    fn add_polygon(&mut self, polygon: PolygonEntity) -> Result<EntityId, SceneError>;

    /// Returns `true` if the entity existed.
    fn remove_entity(&mut self, id: EntityId) -> bool;

    /// Replace the globe clipping polygon; `None` removes clipping.
    fn set_clipping(&mut self, clip: Option<ClipPolygon>);

    /// Start a visual transition to `visible`.
    ///
    /// Returns `None` when the viewer is already in that state. Otherwise the
    /// receiver completes when the transition has finished; a surface may
    /// never complete it, so callers must bound the wait.
    fn request_visibility(&mut self, visible: bool) -> Option<oneshot::Receiver<()>>;

    fn show_globe(&mut self, show: bool);

    fn look_at(&mut self, view: CameraView);

    fn lock_camera(&mut self, lock: CameraLock);
}
