use foundation::math::Ecef;

/// Camera offset relative to a target, in the target's local frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeadingPitchRange {
    /// Radians clockwise from north.
    pub heading_rad: f64,
    /// Radians; negative looks down.
    pub pitch_rad: f64,
    /// Distance from the target (meters).
    pub range_m: f64,
}

impl HeadingPitchRange {
    pub fn from_degrees(heading_deg: f64, pitch_deg: f64, range_m: f64) -> Self {
        Self {
            heading_rad: heading_deg.to_radians(),
            pitch_rad: pitch_deg.to_radians(),
            range_m,
        }
    }
}

/// A look-at framing: the camera orbits `target` at `offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraView {
    pub target: Ecef,
    pub offset: HeadingPitchRange,
}

/// Constraints on the interactive camera controller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraLock {
    pub enable_pan: bool,
    pub enable_tilt: bool,
    pub min_zoom_distance: f64,
    pub max_zoom_distance: f64,
}

impl CameraLock {
    /// Orbit-only camera: no panning or tilting, zoom bounded.
    pub fn orbit_only(min_zoom_distance: f64, max_zoom_distance: f64) -> Self {
        Self {
            enable_pan: false,
            enable_tilt: false,
            min_zoom_distance,
            max_zoom_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraLock, HeadingPitchRange};

    #[test]
    fn degrees_are_converted() {
        let hpr = HeadingPitchRange::from_degrees(0.0, -45.0, 100.0);
        assert_eq!(hpr.heading_rad, 0.0);
        assert!((hpr.pitch_rad + std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert_eq!(hpr.range_m, 100.0);
    }

    #[test]
    fn orbit_only_lock_keeps_zoom_bounds() {
        let lock = CameraLock::orbit_only(500.0, 9000.0);
        assert!(!lock.enable_pan);
        assert!(!lock.enable_tilt);
        assert_eq!(lock.min_zoom_distance, 500.0);
        assert_eq!(lock.max_zoom_distance, 9000.0);
    }
}
