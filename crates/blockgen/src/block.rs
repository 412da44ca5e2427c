//! The generation pipeline and the block it leaves in the scene.

use std::time::Duration;

use foundation::GeoExtent;
use scene::{ClipPolygon, EntityId, SceneSurface};
use tracing::{debug, info, warn};

use crate::altitude::derive_base_altitude;
use crate::camera::plan_camera;
use crate::error::BlockError;
use crate::segments::interpolate_segments;
use crate::terrain::{TerrainSampler, sample_segments};
use crate::wall::{WallPolygon, build_walls};

/// The walls currently in the scene and the extent they were built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub extent: GeoExtent,
    pub base_altitude: f64,
    pub walls: Vec<WallPolygon>,
    pub entities: Vec<EntityId>,
}

/// How a viewer show/hide wait ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransitionEnd {
    AlreadyThere,
    Finished,
    TimedOut,
}

/// Ask the viewer to become `visible` and wait for it, at most `fallback`.
///
/// A surface that drops its completion sender counts as finished.
pub async fn wait_for_visibility<S: SceneSurface + ?Sized>(
    scene: &mut S,
    visible: bool,
    fallback: Duration,
) -> TransitionEnd {
    let Some(done) = scene.request_visibility(visible) else {
        return TransitionEnd::AlreadyThere;
    };
    match tokio::time::timeout(fallback, done).await {
        Ok(_) => TransitionEnd::Finished,
        Err(_) => {
            debug!(visible, "viewer transition did not report back in time");
            TransitionEnd::TimedOut
        }
    }
}

/// Inverse clip around the extent corners, so only the block's square of
/// terrain stays visible.
pub fn clip_polygon_for(extent: &GeoExtent) -> ClipPolygon {
    ClipPolygon::inverse(
        extent
            .corners()
            .iter()
            .map(|c| c.to_geodetic(0.0).to_ecef())
            .collect(),
    )
}

/// Owns the scene and terrain capabilities and the block built with them.
///
/// At most one block exists at a time; a new one replaces the old only once
/// its terrain has been sampled.
pub struct BlockRenderer<S, T> {
    scene: S,
    terrain: T,
    block: Option<Block>,
    revealed: bool,
    fidelity: u32,
    visibility_fallback: Duration,
}

impl<S: SceneSurface, T: TerrainSampler> BlockRenderer<S, T> {
    pub fn new(scene: S, terrain: T, fidelity: u32, visibility_fallback: Duration) -> Self {
        Self {
            scene,
            terrain,
            block: None,
            revealed: false,
            fidelity: fidelity.max(1),
            visibility_fallback,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    /// `true` once the first block has been shown and the globe revealed.
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Replace the current block with one for `extent`.
    ///
    /// The viewer is hidden for the duration and always shown again, whether
    /// generation succeeded or not. Returns the normalized extent actually
    /// built. On error the previous block is left untouched.
    pub async fn generate(&mut self, extent: &GeoExtent) -> Result<GeoExtent, BlockError> {
        let extent = extent.normalize().ok_or(BlockError::InvalidExtent)?;

        wait_for_visibility(&mut self.scene, false, self.visibility_fallback).await;
        let result = self.rebuild(&extent).await;
        wait_for_visibility(&mut self.scene, true, self.visibility_fallback).await;

        result.map(|()| extent)
    }

    async fn rebuild(&mut self, extent: &GeoExtent) -> Result<(), BlockError> {
        let segments = interpolate_segments(extent, self.fidelity);
        let sampled = sample_segments(&self.terrain, segments).await?;
        let base_altitude = derive_base_altitude(&sampled);
        let built = build_walls(&sampled, base_altitude);

        self.clear();
        self.scene.set_clipping(Some(clip_polygon_for(extent)));

        let mut walls = Vec::with_capacity(built.len());
        let mut entities = Vec::with_capacity(built.len());
        for wall in built {
            match self.scene.add_polygon(wall.to_entity()) {
                Ok(id) => {
                    entities.push(id);
                    walls.push(wall);
                }
                Err(err) => warn!(edge = wall.edge.label(), "wall not added: {err}"),
            }
        }
        info!(
            west = extent.west,
            south = extent.south,
            east = extent.east,
            north = extent.north,
            base_altitude,
            walls = walls.len(),
            "block generated"
        );
        self.block = Some(Block {
            extent: *extent,
            base_altitude,
            walls,
            entities,
        });

        match plan_camera(extent, &self.terrain).await {
            Ok(plan) => plan.apply(&mut self.scene),
            Err(err) => warn!("keeping the current camera: {err}"),
        }

        if !self.revealed {
            self.revealed = true;
            self.scene.show_globe(true);
        }
        Ok(())
    }

    /// Remove the current block's entities and the terrain clipping.
    pub fn clear(&mut self) {
        if let Some(block) = self.block.take() {
            for id in block.entities {
                if !self.scene.remove_entity(id) {
                    debug!(index = id.index(), "wall entity already gone");
                }
            }
        }
        self.scene.set_clipping(None);
    }
}
