//! Offline terrain providers for the command line.

use std::time::Duration;

use blockgen::{BoxFuture, SampledPoint, TerrainError, TerrainSampler};
use clap::ValueEnum;
use foundation::math::LonLat;
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TerrainKind {
    /// Deterministic alpine-looking relief.
    Synthetic,
    /// Constant height everywhere.
    Flat,
}

/// Procedural terrain: a few overlapping ridges, no data over the sea
/// (negative lat/lon sums) so unknown heights show up too.
#[derive(Debug, Clone)]
pub struct SyntheticTerrain {
    latency: Duration,
}

impl SyntheticTerrain {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn height_at(p: LonLat) -> Option<f64> {
        if p.lon + p.lat < 0.0 {
            return None;
        }
        let (x, y) = (p.lon.to_radians() * 400.0, p.lat.to_radians() * 400.0);
        let ridges = (x.sin() * y.cos()).abs() * 1800.0
            + (2.3 * x + 0.7 * y).sin() * 350.0
            + (5.1 * y - 1.3 * x).cos() * 120.0;
        Some(600.0 + ridges)
    }
}

impl TerrainSampler for SyntheticTerrain {
    fn ready(&self) -> BoxFuture<'_, Result<(), TerrainError>> {
        Box::pin(async { Ok(()) })
    }

    fn sample_most_detailed(
        &self,
        points: Vec<LonLat>,
    ) -> BoxFuture<'_, Result<Vec<SampledPoint>, TerrainError>> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            debug!(points = points.len(), "synthetic terrain sampled");
            Ok(points
                .into_iter()
                .map(|p| SampledPoint::new(p, Self::height_at(p)))
                .collect())
        })
    }
}

#[derive(Debug, Copy, Clone)]
pub struct FlatTerrain {
    pub height: f64,
}

impl TerrainSampler for FlatTerrain {
    fn ready(&self) -> BoxFuture<'_, Result<(), TerrainError>> {
        Box::pin(async { Ok(()) })
    }

    fn sample_most_detailed(
        &self,
        points: Vec<LonLat>,
    ) -> BoxFuture<'_, Result<Vec<SampledPoint>, TerrainError>> {
        let height = self.height;
        Box::pin(async move {
            Ok(points
                .into_iter()
                .map(|p| SampledPoint::new(p, Some(height)))
                .collect())
        })
    }
}

/// Either provider behind one type, so the coordinator is built once.
#[derive(Debug, Clone)]
pub enum CliTerrain {
    Synthetic(SyntheticTerrain),
    Flat(FlatTerrain),
}

impl CliTerrain {
    pub fn new(kind: TerrainKind, flat_height: f64, latency: Duration) -> Self {
        match kind {
            TerrainKind::Synthetic => CliTerrain::Synthetic(SyntheticTerrain::new(latency)),
            TerrainKind::Flat => CliTerrain::Flat(FlatTerrain {
                height: flat_height,
            }),
        }
    }
}

impl TerrainSampler for CliTerrain {
    fn ready(&self) -> BoxFuture<'_, Result<(), TerrainError>> {
        match self {
            CliTerrain::Synthetic(t) => t.ready(),
            CliTerrain::Flat(t) => t.ready(),
        }
    }

    fn sample_most_detailed(
        &self,
        points: Vec<LonLat>,
    ) -> BoxFuture<'_, Result<Vec<SampledPoint>, TerrainError>> {
        match self {
            CliTerrain::Synthetic(t) => t.sample_most_detailed(points),
            CliTerrain::Flat(t) => t.sample_most_detailed(points),
        }
    }
}
