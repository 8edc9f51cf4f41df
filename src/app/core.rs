use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::catalog::Dataset;
use crate::command::CommandEffect;
use crate::config::Config;
use crate::error::AppResult;
use crate::extension::ExtensionHost;
use crate::gallery::{DefaultImageFetcher, ImageCache, ImageFetcher, LoadSlot, LoadWorker};
use crate::history::parse_image_param;
use crate::onboarding::OnboardingState;
use crate::palette::{PaletteManager, PaletteRegistry};
use crate::prefs::PreferenceStore;
use crate::presenter::{ImagePresenter, PresenterKind, create_presenter};

use super::state::{AppState, PaletteRequest};

pub struct RenderSubsystem {
    pub presenter: Box<dyn ImagePresenter>,
}

pub struct LoadSubsystem {
    pub worker: LoadWorker,
    pub cache: ImageCache,
}

#[derive(Default)]
pub struct ExtensionSubsystem {
    pub host: ExtensionHost,
}

#[derive(Default)]
pub struct PaletteSubsystem {
    pub registry: PaletteRegistry,
    pub manager: PaletteManager,
    pub pending_requests: VecDeque<PaletteRequest>,
}

/// Pointer state that outlives a single mouse event.
#[derive(Debug, Default)]
pub struct PointerState {
    /// Last cell of a pan gesture on the zoomed lightbox image.
    pub pan_anchor: Option<(u16, u16)>,
}

#[derive(Default)]
pub struct InteractionSubsystem {
    pub extensions: ExtensionSubsystem,
    pub palette: PaletteSubsystem,
    pub pointer: PointerState,
}

/// Application context: dataset views, workers, presenter and config, built once.
pub struct App {
    pub state: AppState,
    pub render: RenderSubsystem,
    pub loads: LoadSubsystem,
    pub interaction: InteractionSubsystem,
    pub config: Config,
}

impl App {
    pub fn new(dataset: Dataset, config: Config, prefs: PreferenceStore) -> AppResult<Self> {
        let timeout = Duration::from_millis(config.navigation.load_timeout_ms);
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(DefaultImageFetcher::new(timeout)?);
        Self::with_fetcher(dataset, config, prefs, fetcher, PresenterKind::RatatuiImage)
    }

    pub fn with_fetcher(
        dataset: Dataset,
        config: Config,
        prefs: PreferenceStore,
        fetcher: Arc<dyn ImageFetcher>,
        presenter_kind: PresenterKind,
    ) -> AppResult<Self> {
        let presenter = create_presenter(presenter_kind, &config.cache)?;
        let worker = LoadWorker::new(
            fetcher,
            Duration::from_millis(config.navigation.load_timeout_ms),
            config.runtime.worker_threads,
        );
        let cache = ImageCache::new(
            config.cache.image_max_entries,
            config.cache.image_memory_budget_bytes(),
        );
        let state = AppState::new(Arc::new(dataset), &config, Instant::now());
        info!(works = state.dataset.len(), "app initialized");
        let onboarding =
            OnboardingState::new(prefs, Duration::from_millis(config.runtime.toast_ms));

        Ok(Self {
            state,
            render: RenderSubsystem { presenter },
            loads: LoadSubsystem { worker, cache },
            interaction: InteractionSubsystem {
                extensions: ExtensionSubsystem {
                    host: ExtensionHost::with_onboarding(onboarding),
                },
                palette: PaletteSubsystem::default(),
                pointer: PointerState::default(),
            },
            config,
        })
    }

    /// Reads the startup location once and issues the first hero load.
    pub fn start(&mut self, location: &str) {
        let now = Instant::now();
        let position = parse_image_param(location, self.state.hero.len());
        debug!(location, position, "hero starting");
        let request = self.state.hero.start(position, now);
        self.interaction
            .extensions
            .host
            .show_initial_tip(&mut self.state);
        if let Some(request) = request {
            self.apply_effects(vec![CommandEffect::Load {
                slot: LoadSlot::Hero,
                request,
            }]);
        }
    }
}
