//! Event loop tying the map, the session and the block renderer together.

use foundation::GeoExtent;
use runtime::FrameCoalescer;
use scene::SceneSurface;
use share::{ShareConfig, build_share_url};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::block::{Block, BlockRenderer};
use crate::config::{EngineConfig, PanelBounds};
use crate::draw::{DrawSurface, MapEvent};
use crate::error::BlockError;
use crate::session::{DrawEndOutcome, DrawStartOutcome, Phase, Session};
use crate::square::{SquareConstraint, rectangle_ring};
use crate::terrain::TerrainSampler;

/// The map side of the session: everything map events touch.
///
/// Kept apart from the renderer so events can be handled while a generation
/// holds the renderer.
struct MapController<D> {
    draw: D,
    session: Session,
    square: SquareConstraint,
    panel: PanelBounds,
    relayout: FrameCoalescer,
}

impl<D: DrawSurface> MapController<D> {
    /// Handle one event. Returns the extent to generate when a drag was
    /// accepted; the session is then already in Generating.
    fn dispatch(&mut self, event: MapEvent) -> Option<GeoExtent> {
        match event {
            MapEvent::DrawStart => match self.session.draw_start() {
                DrawStartOutcome::Started => self.draw.clear_shapes(),
                DrawStartOutcome::Rejected => self.draw.abort_drawing(),
                DrawStartOutcome::Ignored => {}
            },
            MapEvent::DrawMove { anchor, cursor } => {
                if self.session.phase() == Phase::Drawing {
                    let square = self.square.constrain(anchor, cursor);
                    self.draw.show_square(&square.ring());
                }
            }
            MapEvent::DrawEnd { anchor, cursor } => {
                let square = self.square.constrain(anchor, cursor);
                match self.session.draw_end(&square) {
                    DrawEndOutcome::Generate(extent) => {
                        self.draw.show_square(&square.ring());
                        self.draw.set_active(false);
                        return Some(extent);
                    }
                    DrawEndOutcome::Discarded | DrawEndOutcome::Invalid => {
                        self.draw.clear_shapes()
                    }
                    DrawEndOutcome::Ignored => {}
                }
            }
            MapEvent::DrawAbort => {
                if self.session.draw_abort() {
                    self.draw.clear_shapes();
                }
            }
            MapEvent::PointerDownOutside => {
                if self.session.phase() == Phase::Drawing {
                    self.draw.abort_drawing();
                    if self.session.draw_abort() {
                        self.draw.clear_shapes();
                    }
                }
            }
            MapEvent::PanelResized {
                requested,
                viewport,
            } => {
                let size = self.panel.clamp(requested, viewport);
                self.draw.set_panel_size(size);
                self.relayout.request();
            }
            MapEvent::AnimationFrame(frame) => {
                if self.relayout.on_frame(frame) {
                    self.draw.update_size();
                }
            }
        }
        None
    }

    fn finish(&mut self, outcome: &Result<GeoExtent, BlockError>) {
        match outcome {
            Ok(_) => {}
            Err(BlockError::InvalidExtent) => warn!("generation skipped: invalid extent"),
            Err(err) => error!("generation failed: {err}"),
        }
        self.session.finish_generation(outcome);
        if !self.session.is_fatal() {
            self.draw.set_active(true);
        }
    }
}

/// Owns one session end to end.
pub struct Coordinator<D, S, T> {
    map: MapController<D>,
    renderer: BlockRenderer<S, T>,
}

impl<D: DrawSurface, S: SceneSurface, T: TerrainSampler> Coordinator<D, S, T> {
    pub fn new(config: &EngineConfig, draw: D, scene: S, terrain: T) -> Self {
        Self {
            map: MapController {
                draw,
                session: Session::new(config.draw_min_size),
                square: SquareConstraint::new(config.max_square_size),
                panel: config.panel,
                relayout: FrameCoalescer::new(),
            },
            renderer: BlockRenderer::new(
                scene,
                terrain,
                config.fidelity,
                config.visibility_fallback,
            ),
        }
    }

    pub fn session(&self) -> &Session {
        &self.map.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.map.session
    }

    pub fn draw(&self) -> &D {
        &self.map.draw
    }

    pub fn scene(&self) -> &S {
        self.renderer.scene()
    }

    pub fn block(&self) -> Option<&Block> {
        self.renderer.block()
    }

    /// Wait for the terrain provider, then apply the share link if any.
    ///
    /// A provider that fails to load leaves the session permanently in the
    /// error state with drawing disabled. A shared extent that cannot be
    /// generated is logged and otherwise ignored.
    pub async fn initialize(&mut self, share: Option<ShareConfig>) -> Result<(), BlockError> {
        self.map.draw.set_active(false);
        self.map.relayout.request();

        if let Err(err) = self.renderer.terrain().ready().await {
            error!("terrain provider failed: {err}");
            self.map.session.fail_fatally();
            return Err(BlockError::SessionFailed);
        }
        info!("terrain provider ready");
        self.map.draw.set_active(true);

        if let Some(share) = share {
            self.map.session.apply_share_options(share.hide_map);
            if let Err(err) = self.bootstrap_extent(share.extent).await {
                warn!("shared extent not generated: {err}");
            }
        }
        Ok(())
    }

    /// Show `extent` on the map and generate its block, as if it had been
    /// drawn. A gesture in progress is aborted first.
    pub async fn bootstrap_extent(&mut self, extent: GeoExtent) -> Result<GeoExtent, BlockError> {
        let extent = extent.normalize().ok_or(BlockError::InvalidExtent)?;
        let was_drawing = self.map.session.phase() == Phase::Drawing;
        self.map.session.begin_generation()?;

        let bounds = extent.to_projected();
        let draw = &mut self.map.draw;
        if was_drawing {
            draw.abort_drawing();
        }
        draw.clear_shapes();
        draw.show_square(&rectangle_ring(&bounds));
        draw.fit_extent(&bounds);
        draw.set_active(false);

        let outcome = self.renderer.generate(&extent).await;
        self.map.finish(&outcome);
        outcome
    }

    /// Handle one event to completion, generating inline if it asks for it.
    pub async fn handle_event(&mut self, event: MapEvent) {
        if let Some(extent) = self.map.dispatch(event) {
            let outcome = self.renderer.generate(&extent).await;
            self.map.finish(&outcome);
        }
    }

    /// Process events until the channel closes.
    ///
    /// Events arriving during a generation are handled while it is pending,
    /// so draw attempts are rejected immediately rather than queued.
    pub async fn run(&mut self, events: &mut mpsc::Receiver<MapEvent>) {
        while let Some(event) = events.recv().await {
            if let Some(extent) = self.map.dispatch(event) {
                self.generate_while_listening(extent, events).await;
            }
        }
    }

    async fn generate_while_listening(
        &mut self,
        extent: GeoExtent,
        events: &mut mpsc::Receiver<MapEvent>,
    ) {
        let Self { map, renderer } = self;
        let outcome = {
            let generation = renderer.generate(&extent);
            tokio::pin!(generation);
            loop {
                tokio::select! {
                    outcome = &mut generation => break outcome,
                    Some(event) = events.recv() => {
                        // Generating: starts are rejected and ends ignored,
                        // so this never yields another extent.
                        if map.dispatch(event).is_some() {
                            warn!("unexpected generation request while generating");
                        }
                    }
                }
            }
        };
        map.finish(&outcome);
    }

    /// Link to the current block, or `None` when sharing is unavailable.
    pub fn share_url(&self, base_url: &str) -> Option<String> {
        let payload = self.map.session.share_payload()?;
        match build_share_url(base_url, &payload) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!("share link not built: {err}");
                None
            }
        }
    }
}
