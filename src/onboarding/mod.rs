use std::time::{Duration, Instant};

use tracing::debug;

use crate::app::{AppState, Notice, Screen};
use crate::event::{AppEvent, ViewKind};
use crate::extension::Extension;
use crate::prefs::{PreferenceStore, now_epoch_ms};

pub const TIP_TEXT: &str = "Tip: press ←/→ or drag to browse, g for the gallery, : to search";
pub const GALLERY_TOAST_TEXT: &str = "Gallery: f filters by year, / searches, [ ] change page";
pub const LIGHTBOX_HINT_TEXT: &str = "Press z to zoom, i for details, Esc to close";

/// First-run notices backed by the preference store.
#[derive(Debug)]
pub struct OnboardingState {
    prefs: PreferenceStore,
    notice_ttl: Duration,
    /// The first hero outcome settles the startup image, whether it loaded or failed.
    startup_settled: bool,
}

impl OnboardingState {
    pub fn new(prefs: PreferenceStore, notice_ttl: Duration) -> Self {
        Self {
            prefs,
            notice_ttl,
            startup_settled: false,
        }
    }

    /// Shows the tip unless the user already navigated in an earlier session.
    pub fn show_initial_tip(&self, app: &mut AppState) {
        app.notices.tip = !self.prefs.has_seen_tip();
    }

    fn on_event(&mut self, event: &AppEvent, app: &mut AppState, now: Instant) {
        match event {
            AppEvent::Navigated {
                view: ViewKind::Hero,
                ..
            }
            | AppEvent::LoadFailed {
                view: ViewKind::Hero,
                ..
            } if !self.startup_settled => {
                self.startup_settled = true;
            }
            AppEvent::Navigated { .. } => {
                app.notices.tip = false;
                if self.prefs.mark_tip_seen() {
                    debug!("onboarding tip dismissed");
                }
            }
            AppEvent::ScreenChanged {
                to: Screen::Grid, ..
            } => {
                if self.prefs.take_gallery_toast() {
                    app.notices.toast = Some(Notice::new(GALLERY_TOAST_TEXT, now + self.notice_ttl));
                }
            }
            AppEvent::ScreenChanged {
                to: Screen::Lightbox,
                ..
            } => {
                if self.prefs.take_lightbox_hint(now_epoch_ms()) {
                    app.notices.hint = Some(Notice::new(LIGHTBOX_HINT_TEXT, now + self.notice_ttl));
                }
            }
            AppEvent::ScreenChanged { from: Screen::Lightbox, .. } => {
                app.notices.hint = None;
            }
            _ => {}
        }
    }
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self::new(PreferenceStore::in_memory(), Duration::from_millis(3_000))
    }
}

pub struct OnboardingExtension;

impl Extension for OnboardingExtension {
    type State = OnboardingState;

    fn init_state() -> Self::State {
        OnboardingState::default()
    }

    fn handle_event(state: &mut Self::State, event: &AppEvent, app: &mut AppState) {
        state.on_event(event, app, Instant::now());
    }

    fn on_background(_state: &mut Self::State, app: &mut AppState) -> bool {
        app.notices.expire(Instant::now())
    }
}
