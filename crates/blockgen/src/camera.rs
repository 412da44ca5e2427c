//! Camera framing for a freshly generated block.

use foundation::GeoExtent;
use foundation::math::{Ecef, LonLat};
use scene::{CameraLock, CameraView, HeadingPitchRange, SceneSurface};

use crate::error::BlockError;
use crate::terrain::{SampledPoint, TerrainSampler};

pub const CAMERA_HEADING_DEG: f64 = 0.0;
pub const CAMERA_PITCH_DEG: f64 = -45.0;
/// Initial camera range as a multiple of the extent diagonal.
pub const ZOOM_RANGE_FACTOR: f64 = 1.5;
pub const MIN_ZOOM_DISTANCE: f64 = 500.0;
/// Furthest zoom-out as a multiple of the initial range.
pub const MAX_ZOOM_FACTOR: f64 = 3.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPlan {
    pub view: CameraView,
    pub lock: CameraLock,
}

impl CameraPlan {
    pub fn apply<S: SceneSurface + ?Sized>(&self, scene: &mut S) {
        scene.look_at(self.view);
        scene.lock_camera(self.lock);
    }
}

/// Chord distance between the south-west and north-east corners at height
/// zero.
pub fn extent_diagonal(extent: &GeoExtent) -> f64 {
    let sw = extent.south_west().to_geodetic(0.0).to_ecef();
    let ne = extent.north_east().to_geodetic(0.0).to_ecef();
    sw.distance(ne)
}

/// Frame `extent` around its sampled center. An unknown center height
/// counts as zero.
pub fn plan_for(extent: &GeoExtent, center: SampledPoint) -> CameraPlan {
    let target: Ecef = center
        .position
        .to_geodetic(center.known_height().unwrap_or(0.0))
        .to_ecef();
    let range = extent_diagonal(extent) * ZOOM_RANGE_FACTOR;

    CameraPlan {
        view: CameraView {
            target,
            offset: HeadingPitchRange::from_degrees(CAMERA_HEADING_DEG, CAMERA_PITCH_DEG, range),
        },
        lock: CameraLock::orbit_only(MIN_ZOOM_DISTANCE, range * MAX_ZOOM_FACTOR),
    }
}

/// Sample the terrain at the extent center and plan the framing.
pub async fn plan_camera<T: TerrainSampler + ?Sized>(
    extent: &GeoExtent,
    terrain: &T,
) -> Result<CameraPlan, BlockError> {
    let center: LonLat = extent.center();
    let sampled = terrain
        .sample_most_detailed(vec![center])
        .await
        .map_err(|e| BlockError::CameraFraming(e.to_string()))?;
    let point = sampled
        .first()
        .copied()
        .ok_or_else(|| BlockError::CameraFraming("no sample for the extent center".into()))?;
    Ok(plan_for(extent, point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTerrain;
    use pretty_assertions::assert_eq;

    fn extent() -> GeoExtent {
        GeoExtent::new(8.0, 46.0, 8.01, 46.01)
    }

    #[test]
    fn diagonal_of_a_small_box() {
        // ~770 m east-west, ~1110 m north-south at 46 deg.
        let d = extent_diagonal(&extent());
        assert!((1300.0..1400.0).contains(&d), "{d}");
    }

    #[test]
    fn plan_uses_fixed_angles_and_scaled_range() {
        let e = extent();
        let plan = plan_for(&e, SampledPoint::new(e.center(), Some(1200.0)));
        let range = extent_diagonal(&e) * 1.5;

        assert_eq!(plan.view.offset.heading_rad, 0.0);
        assert!((plan.view.offset.pitch_rad + std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert_eq!(plan.view.offset.range_m, range);
        assert_eq!(plan.lock.min_zoom_distance, 500.0);
        assert_eq!(plan.lock.max_zoom_distance, range * 3.0);
        assert!(!plan.lock.enable_pan && !plan.lock.enable_tilt);
        assert_eq!(
            plan.view.target,
            e.center().to_geodetic(1200.0).to_ecef()
        );
    }

    #[test]
    fn unknown_center_height_targets_the_ellipsoid() {
        let e = extent();
        let plan = plan_for(&e, SampledPoint::new(e.center(), None));
        assert_eq!(plan.view.target, e.center().to_geodetic(0.0).to_ecef());
    }

    #[tokio::test]
    async fn sampling_failure_is_a_framing_error() {
        let terrain = ScriptedTerrain::flat(10.0);
        terrain.set_center_fails(true);
        assert!(matches!(
            plan_camera(&extent(), &terrain).await,
            Err(BlockError::CameraFraming(_))
        ));
    }

    #[tokio::test]
    async fn plan_samples_the_center_once() {
        let terrain = ScriptedTerrain::flat(10.0);
        let plan = plan_camera(&extent(), &terrain).await.expect("plan");
        assert_eq!(terrain.requests(), vec![1]);
        assert_eq!(plan.view.target, extent().center().to_geodetic(10.0).to_ecef());
    }
}
