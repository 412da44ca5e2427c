//! Test doubles for the map and terrain capabilities.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use foundation::bounds::Aabb2;
use foundation::math::{LonLat, Vec2};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::draw::DrawSurface;
use crate::terrain::{BoxFuture, SampledPoint, TerrainError, TerrainSampler};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    SetActive(bool),
    Abort,
    Clear,
    ShowSquare([Vec2; 5]),
    Fit(Aabb2),
    PanelSize([f64; 2]),
    UpdateSize,
}

/// Records every command; optionally opens a gate when a gesture is aborted.
#[derive(Debug, Default)]
pub struct RecordingDraw {
    pub calls: Vec<DrawCall>,
    pub active: bool,
    pub release_on_abort: Option<Arc<Semaphore>>,
}

impl RecordingDraw {
    pub fn count(&self, call: &DrawCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl DrawSurface for RecordingDraw {
    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.calls.push(DrawCall::SetActive(active));
    }

    fn abort_drawing(&mut self) {
        self.calls.push(DrawCall::Abort);
        if let Some(gate) = &self.release_on_abort {
            gate.add_permits(64);
        }
    }

    fn clear_shapes(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn show_square(&mut self, ring: &[Vec2; 5]) {
        self.calls.push(DrawCall::ShowSquare(*ring));
    }

    fn fit_extent(&mut self, bounds: &Aabb2) {
        self.calls.push(DrawCall::Fit(*bounds));
    }

    fn set_panel_size(&mut self, size: [f64; 2]) {
        self.calls.push(DrawCall::PanelSize(size));
    }

    fn update_size(&mut self) {
        self.calls.push(DrawCall::UpdateSize);
    }
}

type HeightFn = dyn Fn(LonLat) -> Option<f64> + Send + Sync;

/// Terrain with a height function and switchable failures.
pub struct ScriptedTerrain {
    heights: Box<HeightFn>,
    ready_fails: bool,
    sampling_fails: AtomicBool,
    center_fails: AtomicBool,
    drop_last: bool,
    gate: Option<Arc<Semaphore>>,
    requests: Mutex<Vec<usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTerrain {
    pub fn new(heights: impl Fn(LonLat) -> Option<f64> + Send + Sync + 'static) -> Self {
        Self {
            heights: Box::new(heights),
            ready_fails: false,
            sampling_fails: AtomicBool::new(false),
            center_fails: AtomicBool::new(false),
            drop_last: false,
            gate: None,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn flat(height: f64) -> Self {
        Self::new(move |_| Some(height))
    }

    /// Gentle slopes between roughly 400 and 1400 m.
    pub fn hills() -> Self {
        Self::new(|p| Some(900.0 + 500.0 * (p.lon * 40.0).sin() * (p.lat * 40.0).cos()))
    }

    pub fn never_ready(mut self) -> Self {
        self.ready_fails = true;
        self
    }

    pub fn dropping_last_sample(mut self) -> Self {
        self.drop_last = true;
        self
    }

    /// Hold multi-point requests until `gate` has permits.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_sampling_fails(&self, fails: bool) {
        self.sampling_fails.store(fails, Ordering::SeqCst);
    }

    /// Fail single-point requests only (the camera center sample).
    pub fn set_center_fails(&self, fails: bool) {
        self.center_fails.store(fails, Ordering::SeqCst);
    }

    /// Sizes of every sampling request, in call order.
    pub fn requests(&self) -> Vec<usize> {
        self.requests.lock().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl TerrainSampler for ScriptedTerrain {
    fn ready(&self) -> BoxFuture<'_, Result<(), TerrainError>> {
        Box::pin(async move {
            if self.ready_fails {
                return Err(TerrainError::new("terrain provider failed to load"));
            }
            Ok(())
        })
    }

    fn sample_most_detailed(
        &self,
        points: Vec<LonLat>,
    ) -> BoxFuture<'_, Result<Vec<SampledPoint>, TerrainError>> {
        Box::pin(async move {
            self.requests.lock().push(points.len());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if points.len() > 1
                && let Some(gate) = &self.gate
            {
                let _permit = gate
                    .acquire()
                    .await
                    .map_err(|e| TerrainError::new(e.to_string()))?;
            }
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.sampling_fails.load(Ordering::SeqCst) {
                return Err(TerrainError::new("tile request failed"));
            }
            if points.len() == 1 && self.center_fails.load(Ordering::SeqCst) {
                return Err(TerrainError::new("center tile missing"));
            }

            let mut sampled: Vec<SampledPoint> = points
                .into_iter()
                .map(|p| SampledPoint::new(p, (self.heights)(p)))
                .collect();
            if self.drop_last {
                sampled.pop();
            }
            Ok(sampled)
        })
    }
}
