use std::time::{Duration, Instant};

use crate::config::DragConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDecision {
    Commit(SwipeDirection),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    start_x: f64,
    current_x: f64,
    start_time: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SnapBack {
    from_offset: f64,
    started: Instant,
}

/// Turns horizontal pointer movement into commit-or-cancel swipes.
#[derive(Debug, Clone)]
pub struct DragRecognizer {
    config: DragConfig,
    active: Option<ActiveDrag>,
    snap_back: Option<SnapBack>,
}

impl DragRecognizer {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            active: None,
            snap_back: None,
        }
    }

    /// Starts tracking unless a navigation is still resolving.
    pub fn begin(&mut self, x: f64, now: Instant, transitioning: bool) -> bool {
        if transitioning {
            return false;
        }
        self.snap_back = None;
        self.active = Some(ActiveDrag {
            start_x: x,
            current_x: x,
            start_time: now,
        });
        true
    }

    /// Updates the pointer and returns the opacity for the current layer.
    pub fn update(&mut self, x: f64, viewport_width_px: f64) -> Option<f64> {
        let active = self.active.as_mut()?;
        active.current_x = x;
        Some(self.opacity(viewport_width_px))
    }

    pub fn opacity(&self, viewport_width_px: f64) -> f64 {
        let Some(active) = self.active else {
            return 1.0;
        };
        let half = (viewport_width_px / 2.0).max(1.0);
        let delta = (active.current_x - active.start_x).abs();
        (1.0 - delta / half).max(self.config.min_opacity)
    }

    /// Ends the gesture. Velocity is checked before distance; both are strict.
    pub fn release(&mut self, now: Instant) -> Option<DragDecision> {
        let active = self.active.take()?;
        let delta_x = active.current_x - active.start_x;
        let elapsed_ms = now
            .saturating_duration_since(active.start_time)
            .as_secs_f64()
            * 1000.0;
        let velocity = if elapsed_ms > 0.0 {
            delta_x / elapsed_ms
        } else {
            0.0
        };

        let commit = velocity.abs() > self.config.flick_velocity_px_per_ms
            || delta_x.abs() > self.config.distance_threshold_px;
        if commit && delta_x != 0.0 {
            let direction = if delta_x < 0.0 {
                SwipeDirection::Next
            } else {
                SwipeDirection::Previous
            };
            return Some(DragDecision::Commit(direction));
        }

        if delta_x != 0.0 {
            self.snap_back = Some(SnapBack {
                from_offset: delta_x,
                started: now,
            });
        }
        Some(DragDecision::Cancel)
    }

    /// Abandons the gesture without a decision (e.g. focus moved away).
    pub fn reset(&mut self) {
        self.active = None;
        self.snap_back = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_snapping_back(&self) -> bool {
        self.snap_back.is_some()
    }

    /// Horizontal offset of the current layer in pixels, including the
    /// snap-back animation after a cancel.
    pub fn offset_px(&self, now: Instant) -> f64 {
        if let Some(active) = self.active {
            return active.current_x - active.start_x;
        }
        let Some(snap) = self.snap_back else {
            return 0.0;
        };
        let duration = Duration::from_millis(self.config.snap_back_ms);
        let elapsed = now.saturating_duration_since(snap.started);
        if duration.is_zero() || elapsed >= duration {
            return 0.0;
        }
        let remaining = 1.0 - elapsed.as_secs_f64() / duration.as_secs_f64();
        snap.from_offset * remaining
    }

    /// Drops a finished snap-back. Returns whether an animation is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(snap) = self.snap_back
            && now.saturating_duration_since(snap.started)
                >= Duration::from_millis(self.config.snap_back_ms)
        {
            self.snap_back = None;
        }
        self.snap_back.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{DragDecision, DragRecognizer, SwipeDirection};
    use crate::config::DragConfig;

    fn slow_release(distance: f64) -> Option<DragDecision> {
        let mut drag = DragRecognizer::new(DragConfig::default());
        let start = Instant::now();
        assert!(drag.begin(500.0, start, false));
        drag.update(500.0 + distance, 1000.0);
        drag.release(start + Duration::from_secs(10))
    }

    #[test]
    fn distance_threshold_is_strict() {
        assert_eq!(slow_release(-100.0), Some(DragDecision::Cancel));
        assert_eq!(
            slow_release(-100.01),
            Some(DragDecision::Commit(SwipeDirection::Next))
        );
        assert_eq!(
            slow_release(100.01),
            Some(DragDecision::Commit(SwipeDirection::Previous))
        );
    }

    #[test]
    fn fast_flick_commits_below_distance_threshold() {
        let mut drag = DragRecognizer::new(DragConfig::default());
        let start = Instant::now();
        drag.begin(300.0, start, false);
        drag.update(260.0, 1000.0);

        assert_eq!(
            drag.release(start + Duration::from_millis(50)),
            Some(DragDecision::Commit(SwipeDirection::Next))
        );
    }

    #[test]
    fn drag_does_not_start_during_transition() {
        let mut drag = DragRecognizer::new(DragConfig::default());
        assert!(!drag.begin(10.0, Instant::now(), true));
        assert_eq!(drag.update(200.0, 1000.0), None);
        assert_eq!(drag.release(Instant::now()), None);
    }

    #[test]
    fn opacity_follows_distance_with_floor() {
        let mut drag = DragRecognizer::new(DragConfig::default());
        drag.begin(500.0, Instant::now(), false);

        let opacity = drag.update(400.0, 1000.0).expect("drag should be active");
        assert!((opacity - 0.8).abs() < 1e-9);
        let opacity = drag.update(0.0, 1000.0).expect("drag should be active");
        assert_eq!(opacity, 0.3);
    }

    #[test]
    fn cancel_snaps_back_over_configured_duration() {
        let mut drag = DragRecognizer::new(DragConfig::default());
        let start = Instant::now();
        drag.begin(500.0, start, false);
        drag.update(460.0, 1000.0);
        let released = start + Duration::from_secs(1);
        assert_eq!(drag.release(released), Some(DragDecision::Cancel));

        assert_eq!(drag.offset_px(released), -40.0);
        let midway = drag.offset_px(released + Duration::from_millis(125));
        assert!((midway + 20.0).abs() < 0.5);
        assert!(drag.tick(released + Duration::from_millis(100)));
        assert!(!drag.tick(released + Duration::from_millis(250)));
        assert_eq!(drag.offset_px(released + Duration::from_millis(300)), 0.0);
    }
}
