//! Base altitude for the block floor.

use crate::segments::Edges;
use crate::terrain::SampledPoint;

/// Share of the height range added below the lowest sample.
pub const BASE_BUFFER_RATIO: f64 = 0.2;

/// Stand-in for unknown heights when aggregating the range.
pub const UNKNOWN_HEIGHT_FOR_AGGREGATION: f64 = 0.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeightRange {
    pub min: f64,
    pub max: f64,
}

impl HeightRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `min - span * BASE_BUFFER_RATIO`.
    pub fn base_altitude(&self) -> f64 {
        self.min - self.span() * BASE_BUFFER_RATIO
    }
}

/// Height range over every sampled point of every edge, or `None` if there
/// are no points at all.
pub fn height_range(segments: &Edges<Vec<SampledPoint>>) -> Option<HeightRange> {
    segments
        .iter()
        .flat_map(|(_, points)| points.iter())
        .map(|p| p.known_height().unwrap_or(UNKNOWN_HEIGHT_FOR_AGGREGATION))
        .fold(None, |range: Option<HeightRange>, h| {
            Some(match range {
                Some(r) => HeightRange {
                    min: r.min.min(h),
                    max: r.max.max(h),
                },
                None => HeightRange { min: h, max: h },
            })
        })
}

/// Floor altitude a little below the lowest terrain point. Zero when nothing
/// was sampled.
pub fn derive_base_altitude(segments: &Edges<Vec<SampledPoint>>) -> f64 {
    height_range(segments)
        .map(|r| r.base_altitude())
        .unwrap_or(0.0)
}
