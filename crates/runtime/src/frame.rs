/// One tick of the host's animation-frame clock.
///
/// The host delivers these in order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Host timestamp at the start of the frame (milliseconds).
    pub timestamp_ms: f64,
}

impl Frame {
    pub fn new(index: u64, timestamp_ms: f64) -> Self {
        Self {
            index,
            timestamp_ms,
        }
    }

    /// The following frame, `dt_ms` later.
    pub fn next(self, dt_ms: f64) -> Self {
        Self::new(self.index + 1, self.timestamp_ms + dt_ms)
    }
}
