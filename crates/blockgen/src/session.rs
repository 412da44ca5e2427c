//! Session state machine: Idle, Drawing and Generating.

use foundation::GeoExtent;
use runtime::Journal;
use share::SharePayload;
use tracing::debug;

use crate::error::BlockError;
use crate::square::DrawnSquare;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Drawing,
    Generating,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Drawing => "drawing",
            Phase::Generating => "generating",
        }
    }
}

/// What the panel header tells the user.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelStatus {
    Idle,
    Drawing,
    Generating,
    Error,
}

impl PanelStatus {
    pub fn message(self) -> &'static str {
        match self {
            PanelStatus::Idle => "Draw Area (Tap or click and drag)",
            PanelStatus::Drawing => "Release to build the block",
            PanelStatus::Generating => "Generating 3D Block...",
            PanelStatus::Error => "Something went wrong. Refresh the page.",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PanelStatus::Idle => "idle",
            PanelStatus::Drawing => "drawing",
            PanelStatus::Generating => "generating",
            PanelStatus::Error => "error",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawStartOutcome {
    /// Drawing began; the previous shape should be cleared.
    Started,
    /// A generation is running; the gesture must be aborted.
    Rejected,
    /// The session is dead.
    Ignored,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawEndOutcome {
    /// Too small to be a drag; back to Idle.
    Discarded,
    /// The square does not map to a valid extent; back to Idle.
    Invalid,
    /// Generating has been entered for this normalized extent.
    Generate(GeoExtent),
    /// Not drawing, or the session is dead.
    Ignored,
}

/// Everything the coordinator knows about the user's session.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    status: PanelStatus,
    current_extent: Option<GeoExtent>,
    challenge_mode: bool,
    hide_map: bool,
    has_generated_block: bool,
    fatal: bool,
    draw_min_size: f64,
    journal: Journal,
}

impl Session {
    pub fn new(draw_min_size: f64) -> Self {
        Self {
            phase: Phase::Idle,
            status: PanelStatus::Idle,
            current_extent: None,
            challenge_mode: false,
            hide_map: false,
            has_generated_block: false,
            fatal: false,
            draw_min_size,
            journal: Journal::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> PanelStatus {
        self.status
    }

    pub fn current_extent(&self) -> Option<GeoExtent> {
        self.current_extent
    }

    pub fn is_challenge_mode(&self) -> bool {
        self.challenge_mode
    }

    pub fn hide_map(&self) -> bool {
        self.hide_map
    }

    pub fn has_generated_block(&self) -> bool {
        self.has_generated_block
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Phase transitions (`"phase"`) and status changes (`"status"`), in order.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn draw_start(&mut self) -> DrawStartOutcome {
        if self.fatal {
            return DrawStartOutcome::Ignored;
        }
        if self.phase == Phase::Generating {
            debug!("draw attempt rejected while generating");
            self.journal.record("rejected", "draw start during generation");
            return DrawStartOutcome::Rejected;
        }
        self.enter(Phase::Drawing);
        self.set_status(PanelStatus::Drawing);
        DrawStartOutcome::Started
    }

    /// Finish a drag with its constrained square. Accepted from Idle as well
    /// as Drawing.
    pub fn draw_end(&mut self, square: &DrawnSquare) -> DrawEndOutcome {
        if self.fatal || self.phase == Phase::Generating {
            return DrawEndOutcome::Ignored;
        }

        let bounds = square.bounds();
        if bounds.max_dimension() < self.draw_min_size {
            debug!(size = bounds.max_dimension(), "drag below threshold");
            self.enter(Phase::Idle);
            self.set_status(PanelStatus::Idle);
            return DrawEndOutcome::Discarded;
        }

        match GeoExtent::from_projected(&bounds).normalize() {
            Some(extent) => {
                self.enter(Phase::Generating);
                self.set_status(PanelStatus::Generating);
                DrawEndOutcome::Generate(extent)
            }
            None => {
                self.enter(Phase::Idle);
                self.set_status(PanelStatus::Idle);
                DrawEndOutcome::Invalid
            }
        }
    }

    /// Returns `true` if the shape should be cleared.
    pub fn draw_abort(&mut self) -> bool {
        if self.fatal || self.phase == Phase::Generating {
            return false;
        }
        self.enter(Phase::Idle);
        self.set_status(PanelStatus::Idle);
        true
    }

    /// Enter Generating outside of a drawing gesture (share links).
    pub fn begin_generation(&mut self) -> Result<(), BlockError> {
        if self.fatal {
            return Err(BlockError::SessionFailed);
        }
        if self.phase == Phase::Generating {
            return Err(BlockError::Busy);
        }
        self.enter(Phase::Generating);
        self.set_status(PanelStatus::Generating);
        Ok(())
    }

    /// Leave Generating with the pipeline's outcome.
    pub fn finish_generation(&mut self, outcome: &Result<GeoExtent, BlockError>) {
        if self.phase != Phase::Generating {
            return;
        }
        self.enter(Phase::Idle);
        match outcome {
            Ok(extent) => {
                self.current_extent = Some(*extent);
                self.has_generated_block = true;
                self.set_status(PanelStatus::Idle);
            }
            Err(BlockError::InvalidExtent) => self.set_status(PanelStatus::Idle),
            Err(_) => self.set_status(PanelStatus::Error),
        }
    }

    /// The terrain never became ready: stop reacting for good.
    pub fn fail_fatally(&mut self) {
        self.fatal = true;
        self.enter(Phase::Idle);
        self.set_status(PanelStatus::Error);
    }

    /// Opened from a share link: remember the option, and hide the map and
    /// sharing when it was requested.
    pub fn apply_share_options(&mut self, hide_map: bool) {
        self.hide_map = hide_map;
        self.challenge_mode = hide_map;
        if hide_map {
            self.journal.record("mode", "challenge");
        }
    }

    /// Toggle the hide-map option for links created from now on.
    pub fn set_hide_map(&mut self, hide_map: bool) {
        self.hide_map = hide_map;
    }

    pub fn can_share(&self) -> bool {
        self.current_extent.is_some() && !self.challenge_mode
    }

    pub fn share_payload(&self) -> Option<SharePayload> {
        if !self.can_share() {
            return None;
        }
        Some(SharePayload {
            extent: self.current_extent?,
            hide_map: self.hide_map,
        })
    }

    fn enter(&mut self, next: Phase) {
        if self.phase == next {
            return;
        }
        let message = format!("{} -> {}", self.phase.label(), next.label());
        debug!(transition = %message, "phase");
        self.journal.record("phase", message);
        self.phase = next;
    }

    fn set_status(&mut self, status: PanelStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        self.journal.record("status", status.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::SquareConstraint;
    use foundation::math::{LonLat, Vec2, lonlat_to_mercator};
    use pretty_assertions::assert_eq;

    fn square(size: f64) -> DrawnSquare {
        let anchor = lonlat_to_mercator(LonLat::new(8.0, 46.0));
        SquareConstraint::new(15_000.0).constrain(anchor, anchor + Vec2::new(size, size))
    }

    #[test]
    fn full_cycle() {
        let mut s = Session::new(25.0);
        assert_eq!(s.draw_start(), DrawStartOutcome::Started);
        assert_eq!(s.status(), PanelStatus::Drawing);

        let DrawEndOutcome::Generate(extent) = s.draw_end(&square(1000.0)) else {
            panic!("expected generation");
        };
        assert_eq!(s.phase(), Phase::Generating);
        assert_eq!(s.status().message(), "Generating 3D Block...");

        s.finish_generation(&Ok(extent));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.current_extent(), Some(extent));
        assert!(s.has_generated_block());
        assert_eq!(
            s.journal().messages("phase"),
            vec!["idle -> drawing", "drawing -> generating", "generating -> idle"]
        );
    }

    #[test]
    fn extent_from_draw_end_is_normalized() {
        let mut s = Session::new(25.0);
        let DrawEndOutcome::Generate(extent) = s.draw_end(&square(1000.0)) else {
            panic!("expected generation");
        };
        assert_eq!(extent.normalize(), Some(extent));
        assert!((extent.west - 8.0).abs() < 1e-5);
        assert!((extent.south - 46.0).abs() < 1e-5);
    }

    #[test]
    fn small_drags_are_discarded() {
        let mut s = Session::new(25.0);
        s.draw_start();
        assert_eq!(s.draw_end(&square(24.0)), DrawEndOutcome::Discarded);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.journal().messages("phase"), vec!["idle -> drawing", "drawing -> idle"]);
    }

    #[test]
    fn drawing_is_never_entered_while_generating() {
        let mut s = Session::new(25.0);
        s.begin_generation().expect("begin");
        assert_eq!(s.draw_start(), DrawStartOutcome::Rejected);
        assert_eq!(s.draw_end(&square(1000.0)), DrawEndOutcome::Ignored);
        assert!(!s.draw_abort());
        assert_eq!(s.begin_generation(), Err(BlockError::Busy));
        assert_eq!(s.phase(), Phase::Generating);
        assert!(!s.journal().messages("phase").contains(&"generating -> drawing"));
    }

    #[test]
    fn abort_returns_to_idle() {
        let mut s = Session::new(25.0);
        s.draw_start();
        assert!(s.draw_abort());
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.status(), PanelStatus::Idle);
    }

    #[test]
    fn failures_set_the_error_status_except_invalid_extents() {
        let mut s = Session::new(25.0);
        s.begin_generation().expect("begin");
        s.finish_generation(&Err(BlockError::InvalidExtent));
        assert_eq!(s.status(), PanelStatus::Idle);

        s.begin_generation().expect("begin");
        s.finish_generation(&Err(BlockError::TerrainUnavailable("down".into())));
        assert_eq!(s.status(), PanelStatus::Error);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.current_extent(), None);
    }

    #[test]
    fn fatal_sessions_ignore_everything() {
        let mut s = Session::new(25.0);
        s.fail_fatally();
        assert_eq!(s.status(), PanelStatus::Error);
        assert_eq!(s.draw_start(), DrawStartOutcome::Ignored);
        assert_eq!(s.draw_end(&square(1000.0)), DrawEndOutcome::Ignored);
        assert_eq!(s.begin_generation(), Err(BlockError::SessionFailed));
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn challenge_mode_disables_sharing() {
        let extent = GeoExtent::new(8.0, 46.0, 8.01, 46.01);
        let mut s = Session::new(25.0);
        assert!(!s.can_share());

        s.begin_generation().expect("begin");
        s.finish_generation(&Ok(extent));
        s.set_hide_map(true);
        assert_eq!(s.share_payload(), Some(SharePayload { extent, hide_map: true }));

        s.apply_share_options(true);
        assert!(s.is_challenge_mode());
        assert!(!s.can_share());
        assert_eq!(s.share_payload(), None);
    }
}
