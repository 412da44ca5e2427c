//! JSON summary of a session, printed by the command line.

use blockgen::{Block, WallPolygon};
use foundation::GeoExtent;
use scene::CameraView;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ExtentReport {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl From<GeoExtent> for ExtentReport {
    fn from(e: GeoExtent) -> Self {
        Self {
            west: e.west,
            south: e.south,
            east: e.east,
            north: e.north,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WallReport {
    pub name: String,
    pub vertices: usize,
    pub top_min: f64,
    pub top_max: f64,
}

impl From<&WallPolygon> for WallReport {
    fn from(wall: &WallPolygon) -> Self {
        let (top_min, top_max) = wall
            .top()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.height), hi.max(v.height))
            });
        Self {
            name: wall.name.clone(),
            vertices: wall.vertices.len(),
            top_min,
            top_max,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlockReport {
    pub extent: ExtentReport,
    pub base_altitude: f64,
    pub walls: Vec<WallReport>,
}

impl From<&Block> for BlockReport {
    fn from(block: &Block) -> Self {
        Self {
            extent: block.extent.into(),
            base_altitude: block.base_altitude,
            walls: block.walls.iter().map(WallReport::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CameraReport {
    pub heading_deg: f64,
    pub pitch_deg: f64,
    pub range_m: f64,
}

impl From<CameraView> for CameraReport {
    fn from(view: CameraView) -> Self {
        Self {
            heading_deg: view.offset.heading_rad.to_degrees(),
            pitch_deg: view.offset.pitch_rad.to_degrees(),
            range_m: view.offset.range_m,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub status: &'static str,
    pub message: &'static str,
    pub phases: Vec<String>,
    pub block: Option<BlockReport>,
    pub camera: Option<CameraReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}
