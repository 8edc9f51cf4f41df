use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::AppResult;

use super::frame::RgbaFrame;
use super::layers::CrossfadeLayers;

/// A load the caller must issue for an accepted navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub attempt: u64,
    pub work: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Navigated { from: usize, to: usize },
    Failed { position: usize, message: String },
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub position: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingNavigation {
    position: usize,
    attempt: u64,
}

/// Index controller over one ordered list of dataset indices.
///
/// At most one navigation is in flight; requests made meanwhile are dropped.
#[derive(Debug, Clone)]
pub struct Navigator {
    items: Vec<usize>,
    current: usize,
    pending: Option<PendingNavigation>,
    next_attempt: u64,
    failure: Option<LoadFailure>,
    layers: CrossfadeLayers,
}

impl Navigator {
    pub fn new(fade: Duration, ken_burns: bool) -> Self {
        Self {
            items: Vec::new(),
            current: 0,
            pending: None,
            next_attempt: 1,
            failure: None,
            layers: CrossfadeLayers::new(fade, ken_burns),
        }
    }

    /// Replaces the list and loads `start` (clamped). Any in-flight load becomes stale.
    pub fn open(&mut self, items: Vec<usize>, start: usize) -> Option<LoadRequest> {
        self.items = items;
        self.pending = None;
        self.failure = None;
        self.current = start.min(self.items.len().saturating_sub(1));
        self.go_to(self.current)
    }

    pub fn go_to(&mut self, position: usize) -> Option<LoadRequest> {
        if self.is_transitioning() {
            debug!(position, "navigation dropped: transition in flight");
            return None;
        }
        let work = *self.items.get(position)?;
        let attempt = self.next_attempt;
        self.next_attempt = self.next_attempt.saturating_add(1);
        self.pending = Some(PendingNavigation { position, attempt });
        self.failure = None;
        self.layers.begin(work);
        debug!(position, work, attempt, "navigation accepted");
        Some(LoadRequest { attempt, work })
    }

    pub fn next(&mut self) -> Option<LoadRequest> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        self.go_to((self.current + 1) % len)
    }

    pub fn previous(&mut self) -> Option<LoadRequest> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        self.go_to((self.current + len - 1) % len)
    }

    /// Re-issues the target of the last failed load.
    pub fn retry(&mut self) -> Option<LoadRequest> {
        let position = self.failure.as_ref()?.position;
        self.go_to(position)
    }

    pub fn complete(
        &mut self,
        attempt: u64,
        result: AppResult<RgbaFrame>,
        now: Instant,
    ) -> NavigationOutcome {
        let Some(pending) = self.pending.filter(|pending| pending.attempt == attempt) else {
            debug!(attempt, "stale load result discarded");
            return NavigationOutcome::Stale;
        };
        self.pending = None;
        match result {
            Ok(frame) => {
                let from = self.current;
                self.current = pending.position;
                self.layers.reveal(frame, now);
                NavigationOutcome::Navigated {
                    from,
                    to: pending.position,
                }
            }
            Err(err) => {
                self.layers.abandon();
                let message = err.brief();
                self.failure = Some(LoadFailure {
                    position: pending.position,
                    message: message.clone(),
                });
                NavigationOutcome::Failed {
                    position: pending.position,
                    message,
                }
            }
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn items(&self) -> &[usize] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_work(&self) -> Option<usize> {
        self.items.get(self.current).copied()
    }

    /// Work at a wrapped offset from the current position.
    pub fn neighbor(&self, offset: isize) -> Option<usize> {
        let len = self.items.len() as isize;
        if len == 0 {
            return None;
        }
        let position = (self.current as isize + offset).rem_euclid(len) as usize;
        self.items.get(position).copied()
    }

    pub fn pending_work(&self) -> Option<usize> {
        self.pending
            .and_then(|pending| self.items.get(pending.position).copied())
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        self.failure.as_ref()
    }

    pub fn layers(&self) -> &CrossfadeLayers {
        &self.layers
    }

    /// 1-based "i / n".
    pub fn counter(&self) -> String {
        if self.items.is_empty() {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.current + 1, self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{LoadRequest, NavigationOutcome, Navigator};
    use crate::error::AppError;
    use crate::gallery::frame::solid_frame;

    fn navigator() -> Navigator {
        Navigator::new(Duration::from_millis(400), false)
    }

    fn settle(nav: &mut Navigator, request: Option<LoadRequest>) -> NavigationOutcome {
        let request = request.expect("navigation should be accepted");
        nav.complete(request.attempt, Ok(solid_frame(1, 1, 0)), Instant::now())
    }

    #[test]
    fn wraps_around_at_both_ends() {
        let mut nav = navigator();
        let request = nav.open(vec![10, 11, 12], 0);
        settle(&mut nav, request);

        let request = nav.previous();
        assert_eq!(request.map(|request| request.work), Some(12));
        assert_eq!(
            settle(&mut nav, request),
            NavigationOutcome::Navigated { from: 0, to: 2 }
        );

        let request = nav.next();
        assert_eq!(request.map(|request| request.work), Some(10));
        settle(&mut nav, request);
        assert_eq!(nav.current_index(), 0);
        assert_eq!(nav.counter(), "1 / 3");
    }

    #[test]
    fn second_request_while_transitioning_is_dropped() {
        let mut nav = navigator();
        let request = nav.open(vec![0, 1, 2], 0);
        settle(&mut nav, request);

        let first = nav.go_to(1).expect("first request should be accepted");
        assert!(nav.is_transitioning());
        assert_eq!(nav.go_to(2), None);
        assert_eq!(nav.next(), None);

        nav.complete(first.attempt, Ok(solid_frame(1, 1, 0)), Instant::now());
        assert_eq!(nav.current_index(), 1);
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn out_of_range_go_to_is_ignored() {
        let mut nav = navigator();
        let request = nav.open(vec![0, 1], 0);
        settle(&mut nav, request);

        assert_eq!(nav.go_to(2), None);
        assert!(!nav.is_transitioning());
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn failure_keeps_index_and_retry_reissues_target() {
        let mut nav = navigator();
        let request = nav.open(vec![0, 1, 2], 0);
        settle(&mut nav, request);

        let request = nav.next().expect("next should be accepted");
        let outcome = nav.complete(
            request.attempt,
            Err(AppError::load_timeout("b.jpg", 10_000)),
            Instant::now(),
        );
        assert!(matches!(outcome, NavigationOutcome::Failed { position: 1, .. }));
        assert_eq!(nav.current_index(), 0);
        assert!(!nav.is_transitioning());
        assert_eq!(
            nav.failure().map(|failure| failure.message.as_str()),
            Some("image load timed out")
        );
        assert_eq!(nav.layers().visible().work, Some(0));

        let retry = nav.retry().expect("retry should re-issue the target");
        assert_eq!(retry.work, 1);
        assert_ne!(retry.attempt, request.attempt);
        assert!(nav.failure().is_none());
    }

    #[test]
    fn stale_attempts_are_discarded() {
        let mut nav = navigator();
        let old = nav.open(vec![0, 1], 0).expect("open should load");
        let fresh = nav.open(vec![5, 6], 1).expect("reopen should load");

        assert_eq!(
            nav.complete(old.attempt, Ok(solid_frame(1, 1, 0)), Instant::now()),
            NavigationOutcome::Stale
        );
        assert!(nav.is_transitioning());
        assert_eq!(fresh.work, 6);
        assert_eq!(
            nav.complete(fresh.attempt, Ok(solid_frame(1, 1, 0)), Instant::now()),
            NavigationOutcome::Navigated { from: 1, to: 1 }
        );
    }

    #[test]
    fn open_clamps_start_and_neighbors_wrap() {
        let mut nav = navigator();
        let request = nav.open(vec![4, 5, 6], 9);
        assert_eq!(request.map(|request| request.work), Some(6));
        assert_eq!(nav.neighbor(1), Some(4));
        assert_eq!(nav.neighbor(-1), Some(5));
        assert_eq!(nav.open(Vec::new(), 0), None);
        assert_eq!(nav.counter(), "0 / 0");
    }
}
