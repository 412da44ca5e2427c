//! Block generation engine.
//!
//! Turns a square drawn on a 2D map into a four-walled relief block on a 3D
//! terrain viewer. The viewer, the map and the terrain provider are reached
//! through the [`scene::SceneSurface`], [`DrawSurface`] and [`TerrainSampler`]
//! traits; everything else (geometry, sampling coordination, the session
//! state machine) lives here.

pub mod altitude;
pub mod block;
pub mod camera;
pub mod config;
pub mod coordinator;
pub mod draw;
pub mod error;
pub mod segments;
pub mod session;
pub mod square;
pub mod terrain;
pub mod wall;

#[cfg(test)]
mod testing;

pub use altitude::*;
pub use block::*;
pub use camera::*;
pub use config::*;
pub use coordinator::*;
pub use draw::*;
pub use error::*;
pub use segments::*;
pub use session::*;
pub use square::*;
pub use terrain::*;
pub use wall::*;
