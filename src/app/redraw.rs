use std::time::{Duration, Instant};

/// Whether a frame is owed, and when the next animation frame may be drawn.
pub(crate) struct RedrawPacer {
    dirty: bool,
    last_frame: Instant,
    frame_interval: Duration,
}

impl RedrawPacer {
    pub(crate) fn new(now: Instant, frame_interval: Duration) -> Self {
        Self {
            dirty: true,
            last_frame: now,
            frame_interval,
        }
    }

    pub(crate) fn mark(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn dirty_flag(&mut self) -> &mut bool {
        &mut self.dirty
    }

    /// Animations redraw at `frame_interval`, not on every wake.
    pub(crate) fn animation_frame_due(&self, animating: bool, now: Instant) -> bool {
        animating && now.saturating_duration_since(self.last_frame) >= self.frame_interval
    }

    pub(crate) fn drawn(&mut self, now: Instant) {
        self.dirty = false;
        self.last_frame = now;
    }
}
