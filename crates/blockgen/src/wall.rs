//! Wall polygons: terrain profile on top, flat floor at the base altitude.

use foundation::math::{Ecef, LonLat};
use scene::components::{Color, PolygonEntity};
use tracing::warn;

use crate::error::BlockError;
use crate::segments::{Edge, Edges};
use crate::terrain::SampledPoint;

pub const WALL_COLOR: Color = Color::new(0.5, 0.45, 0.3, 1.0);
pub const WALL_NAME_PREFIX: &str = "Blockbild Wall";

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WallVertex {
    pub position: LonLat,
    /// Meters above the ellipsoid.
    pub height: f64,
}

impl WallVertex {
    pub fn to_ecef(self) -> Ecef {
        self.position.to_geodetic(self.height).to_ecef()
    }
}

/// A vertical wall along one edge.
///
/// `vertices` holds the top profile in edge order followed by the same
/// positions in reverse at the base altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct WallPolygon {
    pub edge: Edge,
    pub name: String,
    pub vertices: Vec<WallVertex>,
}

impl WallPolygon {
    pub fn top(&self) -> &[WallVertex] {
        &self.vertices[..self.vertices.len() / 2]
    }

    pub fn bottom(&self) -> &[WallVertex] {
        &self.vertices[self.vertices.len() / 2..]
    }

    pub fn positions(&self) -> Vec<Ecef> {
        self.vertices.iter().map(|v| v.to_ecef()).collect()
    }

    pub fn to_entity(&self) -> PolygonEntity {
        PolygonEntity::new(self.name.clone(), self.positions(), WALL_COLOR)
    }
}

pub fn wall_name(edge: Edge) -> String {
    format!("{WALL_NAME_PREFIX} {}", edge.title())
}

/// Build the wall for one edge.
///
/// Points without a usable height sit at `base_altitude`.
pub fn build_wall(
    edge: Edge,
    segment: &[SampledPoint],
    base_altitude: f64,
) -> Result<WallPolygon, BlockError> {
    let fail = |reason: String| BlockError::WallConstruction { edge, reason };

    if segment.len() < 2 {
        return Err(fail(format!("{} sample(s), need at least 2", segment.len())));
    }
    if !base_altitude.is_finite() {
        return Err(fail(format!("base altitude {base_altitude} is not finite")));
    }
    if let Some(bad) = segment.iter().find(|p| !p.position.is_finite()) {
        return Err(fail(format!("non-finite position {:?}", bad.position)));
    }

    let top = segment.iter().map(|p| WallVertex {
        position: p.position,
        height: p.known_height().unwrap_or(base_altitude),
    });
    let bottom = segment.iter().rev().map(|p| WallVertex {
        position: p.position,
        height: base_altitude,
    });

    Ok(WallPolygon {
        edge,
        name: wall_name(edge),
        vertices: top.chain(bottom).collect(),
    })
}

/// Build every wall that can be built. Failures are logged and skipped.
pub fn build_walls(segments: &Edges<Vec<SampledPoint>>, base_altitude: f64) -> Vec<WallPolygon> {
    segments
        .iter()
        .filter_map(|(edge, points)| match build_wall(edge, points, base_altitude) {
            Ok(wall) => Some(wall),
            Err(err) => {
                warn!("{err}");
                None
            }
        })
        .collect()
}
