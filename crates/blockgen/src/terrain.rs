//! The terrain capability and joint sampling of the four edges.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use foundation::math::LonLat;
use futures_util::future::try_join4;
use tracing::debug;

use crate::segments::{Edge, Edges};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainError {
    message: String,
}

impl TerrainError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for TerrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TerrainError {}

/// A position with the terrain height found there, if any.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SampledPoint {
    pub position: LonLat,
    /// Meters above the ellipsoid. `None` when the provider had no data.
    pub height: Option<f64>,
}

impl SampledPoint {
    pub fn new(position: LonLat, height: Option<f64>) -> Self {
        Self { position, height }
    }

    /// The height if present and finite.
    pub fn known_height(&self) -> Option<f64> {
        self.height.filter(|h| h.is_finite())
    }
}

pub trait TerrainSampler: Send + Sync {
    /// Resolves once the provider can answer sampling requests.
    fn ready(&self) -> BoxFuture<'_, Result<(), TerrainError>>;

    /// Sample the most detailed terrain available at every point.
    ///
    /// The result must have the same length and order as `points`.
    fn sample_most_detailed(
        &self,
        points: Vec<LonLat>,
    ) -> BoxFuture<'_, Result<Vec<SampledPoint>, TerrainError>>;
}

impl<T: TerrainSampler + ?Sized> TerrainSampler for Arc<T> {
    fn ready(&self) -> BoxFuture<'_, Result<(), TerrainError>> {
        (**self).ready()
    }

    fn sample_most_detailed(
        &self,
        points: Vec<LonLat>,
    ) -> BoxFuture<'_, Result<Vec<SampledPoint>, TerrainError>> {
        (**self).sample_most_detailed(points)
    }
}

/// Sample all four edges concurrently.
///
/// Fails as a whole if any edge fails or comes back with the wrong number of
/// points; nothing partial is returned.
pub async fn sample_segments<T: TerrainSampler + ?Sized>(
    terrain: &T,
    segments: Edges<Vec<LonLat>>,
) -> Result<Edges<Vec<SampledPoint>>, TerrainError> {
    let Edges {
        south,
        east,
        north,
        west,
    } = segments;

    let (south, east, north, west) = try_join4(
        sample_edge(terrain, Edge::South, south),
        sample_edge(terrain, Edge::East, east),
        sample_edge(terrain, Edge::North, north),
        sample_edge(terrain, Edge::West, west),
    )
    .await?;

    Ok(Edges {
        south,
        east,
        north,
        west,
    })
}

async fn sample_edge<T: TerrainSampler + ?Sized>(
    terrain: &T,
    edge: Edge,
    points: Vec<LonLat>,
) -> Result<Vec<SampledPoint>, TerrainError> {
    let expected = points.len();
    let sampled = terrain
        .sample_most_detailed(points)
        .await
        .map_err(|e| TerrainError::new(format!("{edge} edge: {e}")))?;
    if sampled.len() != expected {
        return Err(TerrainError::new(format!(
            "{edge} edge: expected {expected} samples, got {}",
            sampled.len()
        )));
    }
    debug!(edge = edge.label(), points = expected, "edge sampled");
    Ok(sampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::interpolate_segments;
    use crate::testing::ScriptedTerrain;
    use foundation::GeoExtent;
    use pretty_assertions::assert_eq;

    fn extent() -> GeoExtent {
        GeoExtent::new(8.0, 46.0, 8.01, 46.01)
    }

    #[tokio::test]
    async fn samples_every_edge_in_order() {
        let terrain = ScriptedTerrain::flat(420.0);
        let segments = interpolate_segments(&extent(), 5);
        let expected = segments.clone();

        let sampled = sample_segments(&terrain, segments).await.expect("sampled");
        for (edge, points) in sampled.iter() {
            let positions: Vec<LonLat> = points.iter().map(|p| p.position).collect();
            assert_eq!(&positions, expected.get(edge));
            assert!(points.iter().all(|p| p.height == Some(420.0)));
        }
    }

    #[tokio::test]
    async fn edges_are_sampled_concurrently() {
        let terrain = ScriptedTerrain::flat(0.0);
        sample_segments(&terrain, interpolate_segments(&extent(), 3))
            .await
            .expect("sampled");
        assert_eq!(terrain.requests().len(), 4);
        assert_eq!(terrain.max_in_flight(), 4);
    }

    #[tokio::test]
    async fn one_failing_edge_fails_the_whole_set() {
        let terrain = ScriptedTerrain::flat(0.0);
        terrain.set_sampling_fails(true);
        let err = sample_segments(&terrain, interpolate_segments(&extent(), 3))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("edge"));
    }

    #[tokio::test]
    async fn short_answers_are_rejected() {
        let terrain = ScriptedTerrain::flat(0.0).dropping_last_sample();
        let err = sample_segments(&terrain, interpolate_segments(&extent(), 3))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expected 4 samples, got 3"));
    }

    #[test]
    fn non_finite_heights_are_unknown() {
        let p = SampledPoint::new(LonLat::new(0.0, 0.0), Some(f64::NAN));
        assert_eq!(p.known_height(), None);
        assert_eq!(SampledPoint::new(p.position, Some(3.0)).known_height(), Some(3.0));
    }
}
