//! Wall edges and their interpolated sample points.

use foundation::GeoExtent;
use foundation::math::LonLat;

/// One side of the block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Edge {
    South,
    East,
    North,
    West,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::South, Edge::East, Edge::North, Edge::West];

    pub fn label(self) -> &'static str {
        match self {
            Edge::South => "south",
            Edge::East => "east",
            Edge::North => "north",
            Edge::West => "west",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Edge::South => "South",
            Edge::East => "East",
            Edge::North => "North",
            Edge::West => "West",
        }
    }

    /// Start and end corner, walking the box counter-clockwise from the
    /// south-west corner.
    fn endpoints(self, extent: &GeoExtent) -> (LonLat, LonLat) {
        let [sw, se, ne, nw] = extent.corners();
        match self {
            Edge::South => (sw, se),
            Edge::East => (se, ne),
            Edge::North => (ne, nw),
            Edge::West => (nw, sw),
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edges<T> {
    pub south: T,
    pub east: T,
    pub north: T,
    pub west: T,
}

impl<T> Edges<T> {
    pub fn get(&self, edge: Edge) -> &T {
        match edge {
            Edge::South => &self.south,
            Edge::East => &self.east,
            Edge::North => &self.north,
            Edge::West => &self.west,
        }
    }

    /// Edges in south, east, north, west order.
    pub fn iter(&self) -> impl Iterator<Item = (Edge, &T)> {
        Edge::ALL.into_iter().map(move |edge| (edge, self.get(edge)))
    }

    pub fn map<U>(self, mut f: impl FnMut(Edge, T) -> U) -> Edges<U> {
        Edges {
            south: f(Edge::South, self.south),
            east: f(Edge::East, self.east),
            north: f(Edge::North, self.north),
            west: f(Edge::West, self.west),
        }
    }
}

/// `fidelity + 1` evenly spaced points along each edge of `extent`, both
/// corners included.
///
/// A fidelity of zero is treated as one.
pub fn interpolate_segments(extent: &GeoExtent, fidelity: u32) -> Edges<Vec<LonLat>> {
    let steps = fidelity.max(1);
    let edge_points = |edge: Edge| {
        let (start, end) = edge.endpoints(extent);
        (0..=steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                LonLat::new(
                    start.lon + (end.lon - start.lon) * t,
                    start.lat + (end.lat - start.lat) * t,
                )
            })
            .collect::<Vec<_>>()
    };

    Edges {
        south: edge_points(Edge::South),
        east: edge_points(Edge::East),
        north: edge_points(Edge::North),
        west: edge_points(Edge::West),
    }
}
