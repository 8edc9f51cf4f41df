use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::{Dataset, WorkAction};
use crate::command::ActionId;
use crate::config::Config;
use crate::event::ViewKind;
use crate::gallery::{DragRecognizer, GridView, HeroCarousel, Lightbox, Navigator};
use crate::palette::PaletteKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Hero,
    Grid,
    Lightbox,
}

impl Screen {
    pub fn id(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Grid => "gallery",
            Self::Lightbox => "lightbox",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteRequest {
    Open {
        kind: PaletteKind,
        seed: Option<String>,
    },
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
}

/// A transient message drawn over the current screen until `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn new(text: impl Into<String>, expires_at: Instant) -> Self {
        Self {
            text: text.into(),
            expires_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoticeState {
    pub tip: bool,
    pub toast: Option<Notice>,
    pub hint: Option<Notice>,
}

impl NoticeState {
    /// Drops expired notices; true when something disappeared.
    pub fn expire(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for slot in [&mut self.toast, &mut self.hint] {
            if slot.as_ref().is_some_and(|notice| notice.expires_at <= now) {
                *slot = None;
                changed = true;
            }
        }
        changed
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [&self.toast, &self.hint]
            .into_iter()
            .flatten()
            .map(|notice| notice.expires_at)
            .min()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub hero: HeroCarousel,
    pub grid: GridView,
    pub lightbox: Lightbox,
    pub drag: DragRecognizer,
    pub screen: Screen,
    /// Screen the lightbox returns to when closed.
    pub return_screen: Screen,
    pub mode: Mode,
    pub status: StatusState,
    pub notices: NoticeState,
    /// Last written `?image=N`; empty until the first hero navigation.
    pub location: String,
    pub contact_email: String,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, config: &Config, now: Instant) -> Self {
        let hero = HeroCarousel::new(&dataset, &config.navigation, now);
        let grid = GridView::new(&dataset, &config.grid);
        let lightbox = Lightbox::new(
            Duration::from_millis(config.navigation.crossfade_ms),
            config.zoom.clone(),
        );
        Self {
            dataset,
            hero,
            grid,
            lightbox,
            drag: DragRecognizer::new(config.drag.clone()),
            screen: Screen::Hero,
            return_screen: Screen::Hero,
            mode: Mode::Normal,
            status: StatusState::default(),
            notices: NoticeState::default(),
            location: String::new(),
            contact_email: config.contact.email.clone(),
        }
    }

    /// The navigation context that owns the visible image, if any.
    pub fn active_view(&self) -> Option<ViewKind> {
        match self.screen {
            Screen::Hero => Some(ViewKind::Hero),
            Screen::Lightbox => Some(ViewKind::Lightbox),
            Screen::Grid => None,
        }
    }

    pub fn navigator(&self, view: ViewKind) -> &Navigator {
        match view {
            ViewKind::Hero => self.hero.navigator(),
            ViewKind::Lightbox => self.lightbox.navigator(),
        }
    }

    pub fn navigator_mut(&mut self, view: ViewKind) -> &mut Navigator {
        match view {
            ViewKind::Hero => self.hero.navigator_mut(),
            ViewKind::Lightbox => self.lightbox.navigator_mut(),
        }
    }

    /// Work the user is looking at: the displayed image, or the selected tile in the grid.
    pub fn focused_work(&self) -> Option<usize> {
        match self.active_view() {
            Some(view) => self.navigator(view).current_work(),
            None => self.grid.selected_work(),
        }
    }

    pub fn action_for(&self, work: usize) -> WorkAction {
        self.dataset
            .get(work)
            .map(|work| WorkAction::for_work(work, &self.contact_email))
            .unwrap_or(WorkAction::Hidden)
    }

    /// Re-derives whether the lightbox offers an action control for its current work.
    pub fn refresh_lightbox_action(&mut self) {
        let available = self
            .lightbox
            .navigator()
            .current_work()
            .is_some_and(|work| self.action_for(work).is_interactive());
        self.lightbox.set_action_available(available);
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::with_dataset(crate::catalog::dataset::sample_dataset())
    }

    #[cfg(test)]
    pub(crate) fn with_dataset(dataset: Dataset) -> Self {
        Self::new(Arc::new(dataset), &Config::default(), Instant::now())
    }
}
