use std::env;
use std::time::Duration;

use foundation::math::LonLat;

/// Margin kept between the map panel and the viewport edge (pixels).
pub const PANEL_VIEWPORT_MARGIN: f64 = 32.0;

/// Size limits for the 2D map panel (pixels).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanelBounds {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Default for PanelBounds {
    fn default() -> Self {
        Self {
            min_width: 220.0,
            max_width: 880.0,
            min_height: 140.0,
            max_height: 880.0,
        }
    }
}

impl PanelBounds {
    /// Clamp a requested `[width, height]` to the bounds.
    ///
    /// The maxima shrink with the viewport (minus a margin) but never below
    /// the minima.
    pub fn clamp(&self, requested: [f64; 2], viewport: [f64; 2]) -> [f64; 2] {
        let max_width = self
            .max_width
            .min(viewport[0] - PANEL_VIEWPORT_MARGIN)
            .max(self.min_width);
        let max_height = self
            .max_height
            .min(viewport[1] - PANEL_VIEWPORT_MARGIN)
            .max(self.min_height);
        [
            requested[0].clamp(self.min_width, max_width),
            requested[1].clamp(self.min_height, max_height),
        ]
    }
}

/// Static engine policy, loaded once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Interpolation intervals per wall edge.
    pub fidelity: u32,
    /// Largest square side, in projected map units (meters).
    pub max_square_size: f64,
    /// Drags whose bounding box stays below this are treated as taps.
    pub draw_min_size: f64,
    pub default_center: LonLat,
    pub default_zoom: f64,
    pub panel: PanelBounds,
    /// Upper bound on waiting for a viewer show/hide transition.
    pub visibility_fallback: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fidelity: 100,
            max_square_size: 15_000.0,
            draw_min_size: 25.0,
            default_center: LonLat::new(8.2275, 46.8182),
            default_zoom: 8.0,
            panel: PanelBounds::default(),
            visibility_fallback: Duration::from_millis(320),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `BLOCKBILD_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    ///
    /// Unparseable values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let f64_var = |key: &str, default: f64| -> f64 {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
        };
        let u64_var = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let fidelity = u64_var("BLOCKBILD_FIDELITY", d.fidelity as u64)
            .clamp(1, u32::MAX as u64) as u32;

        Self {
            fidelity,
            max_square_size: f64_var("BLOCKBILD_MAX_SQUARE_SIZE", d.max_square_size).max(0.0),
            draw_min_size: f64_var("BLOCKBILD_DRAW_MIN_SIZE", d.draw_min_size).max(0.0),
            default_center: LonLat::new(
                f64_var("BLOCKBILD_DEFAULT_LON", d.default_center.lon),
                f64_var("BLOCKBILD_DEFAULT_LAT", d.default_center.lat),
            ),
            default_zoom: f64_var("BLOCKBILD_DEFAULT_ZOOM", d.default_zoom),
            panel: d.panel,
            visibility_fallback: Duration::from_millis(u64_var(
                "BLOCKBILD_VISIBILITY_FALLBACK_MS",
                d.visibility_fallback.as_millis() as u64,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, PanelBounds};
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_published_app() {
        let c = EngineConfig::default();
        assert_eq!(c.fidelity, 100);
        assert_eq!(c.max_square_size, 15_000.0);
        assert_eq!(c.draw_min_size, 25.0);
        assert_eq!(c.visibility_fallback, Duration::from_millis(320));
    }

    #[test]
    fn lookup_overrides_and_ignores_garbage() {
        let c = EngineConfig::from_lookup(lookup(&[
            ("BLOCKBILD_FIDELITY", "12"),
            ("BLOCKBILD_MAX_SQUARE_SIZE", "not a number"),
            ("BLOCKBILD_DRAW_MIN_SIZE", " 40 "),
            ("BLOCKBILD_VISIBILITY_FALLBACK_MS", "50"),
        ]));
        assert_eq!(c.fidelity, 12);
        assert_eq!(c.max_square_size, 15_000.0);
        assert_eq!(c.draw_min_size, 40.0);
        assert_eq!(c.visibility_fallback, Duration::from_millis(50));
    }

    #[test]
    fn fidelity_is_at_least_one() {
        let c = EngineConfig::from_lookup(lookup(&[("BLOCKBILD_FIDELITY", "0")]));
        assert_eq!(c.fidelity, 1);
    }

    #[test]
    fn panel_clamps_to_bounds_and_viewport() {
        let p = PanelBounds::default();
        assert_eq!(p.clamp([100.0, 100.0], [1920.0, 1080.0]), [220.0, 140.0]);
        assert_eq!(p.clamp([2000.0, 2000.0], [1920.0, 1080.0]), [880.0, 880.0]);
        assert_eq!(p.clamp([700.0, 700.0], [600.0, 500.0]), [568.0, 468.0]);
        // A tiny viewport never pushes the maximum below the minimum.
        assert_eq!(p.clamp([500.0, 500.0], [100.0, 100.0]), [220.0, 140.0]);
    }
}
