use std::time::{Duration, Instant};

use tracing::debug;

use crate::catalog::Dataset;
use crate::config::NavigationConfig;

use super::navigator::{LoadRequest, Navigator};

/// Carousel over featured works, falling back to the whole dataset.
#[derive(Debug, Clone)]
pub struct HeroCarousel {
    items: Vec<usize>,
    navigator: Navigator,
    autoplay: bool,
    autoplay_interval: Duration,
    last_advance: Instant,
}

impl HeroCarousel {
    pub fn new(dataset: &Dataset, config: &NavigationConfig, now: Instant) -> Self {
        let featured = dataset.featured_indices();
        let items = if featured.is_empty() {
            debug!("no featured works; hero uses the full dataset");
            dataset.all_indices()
        } else {
            featured
        };
        Self {
            items,
            navigator: Navigator::new(
                Duration::from_millis(config.crossfade_ms),
                config.ken_burns,
            ),
            autoplay: config.autoplay,
            autoplay_interval: Duration::from_millis(config.autoplay_interval_ms.max(1)),
            last_advance: now,
        }
    }

    /// Number of works in the carousel, known before `start`.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Issues the initial load at `position` (clamped).
    pub fn start(&mut self, position: usize, now: Instant) -> Option<LoadRequest> {
        self.last_advance = now;
        self.navigator.open(self.items.clone(), position)
    }

    pub fn next(&mut self) -> Option<LoadRequest> {
        self.stop_autoplay();
        self.navigator.next()
    }

    pub fn previous(&mut self) -> Option<LoadRequest> {
        self.stop_autoplay();
        self.navigator.previous()
    }

    pub fn go_to(&mut self, position: usize) -> Option<LoadRequest> {
        self.stop_autoplay();
        self.navigator.go_to(position)
    }

    pub fn retry(&mut self) -> Option<LoadRequest> {
        self.navigator.retry()
    }

    /// Advances when autoplay is on and the interval has elapsed.
    pub fn autoplay_tick(&mut self, now: Instant) -> Option<LoadRequest> {
        if !self.autoplay_due(now) {
            return None;
        }
        let request = self.navigator.next()?;
        self.last_advance = now;
        Some(request)
    }

    pub fn autoplay_due(&self, now: Instant) -> bool {
        self.autoplay
            && self.navigator.len() > 1
            && !self.navigator.is_transitioning()
            && now.saturating_duration_since(self.last_advance) >= self.autoplay_interval
    }

    /// Restarts the autoplay interval after a completed navigation.
    pub fn mark_advanced(&mut self, now: Instant) {
        self.last_advance = now;
    }

    pub fn stop_autoplay(&mut self) {
        if self.autoplay {
            debug!("hero autoplay stopped by manual navigation");
        }
        self.autoplay = false;
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.autoplay
    }

    /// Works adjacent to the current one, for cache warm-up.
    pub fn preload_targets(&self) -> Vec<usize> {
        let current = self.navigator.current_work();
        let mut targets = Vec::with_capacity(2);
        for offset in [1, -1] {
            if let Some(work) = self.navigator.neighbor(offset)
                && Some(work) != current
                && !targets.contains(&work)
            {
                targets.push(work);
            }
        }
        targets
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }
}
