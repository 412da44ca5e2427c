use crate::frame::Frame;

/// Collapses any number of requests made between two frames into a single
/// action on the next frame.
///
/// Used for map relayouts: repeated relayouts within a frame are redundant.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameCoalescer {
    pending: bool,
    last_fired: Option<u64>,
    fired: u64,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for the action to run on the next frame.
    ///
    /// Returns `true` only for the request that actually scheduled it.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Returns `true` if the caller should perform the action during `frame`.
    ///
    /// Fires at most once per frame index, even if requested again from
    /// within the same frame.
    pub fn on_frame(&mut self, frame: Frame) -> bool {
        if !self.pending || self.last_fired == Some(frame.index) {
            return false;
        }
        self.pending = false;
        self.last_fired = Some(frame.index);
        self.fired += 1;
        true
    }

    /// Number of times the action has fired.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}
