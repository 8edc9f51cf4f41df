use std::process::{Command as ProcessCommand, Stdio};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::Dataset;
use crate::catalog::display::hero_announcement;
use crate::command::{ActionId, CommandEffect, announce_lightbox};
use crate::error::{AppError, AppResult};
use crate::event::{AppEvent, ViewKind};
use crate::gallery::{LoadRequest, LoadResultEvent, LoadSlot, LoadTicket, NavigationOutcome};

use super::core::{App, LoadSubsystem};
use super::state::Screen;

impl LoadSubsystem {
    /// Starts the load for an accepted navigation. Cached frames resolve
    /// through the same result path as fetched ones.
    pub(crate) fn start(&mut self, dataset: &Dataset, slot: LoadSlot, request: LoadRequest) {
        let ticket = LoadTicket {
            slot,
            attempt: request.attempt,
        };
        if let Some(frame) = self.cache.get_cloned(request.work) {
            debug!(work = request.work, ?slot, "image served from cache");
            self.worker.resolve_ready(ticket, request.work, frame);
            return;
        }
        match dataset.image_source(request.work) {
            Some(source) => {
                self.worker.request(ticket, request.work, source);
            }
            None => {
                self.worker.resolve_failed(
                    ticket,
                    request.work,
                    AppError::invalid_argument(format!("work {} has no image", request.work)),
                );
            }
        }
    }

    pub(crate) fn preload(&mut self, dataset: &Dataset, works: &[usize]) -> usize {
        let mut started = 0;
        for &work in works {
            if self.cache.contains(work) {
                continue;
            }
            if let Some(source) = dataset.image_source(work)
                && self.worker.preload(work, source)
            {
                started += 1;
            }
        }
        started
    }
}

impl App {
    pub(crate) fn apply_effects(&mut self, effects: Vec<CommandEffect>) {
        for effect in effects {
            match effect {
                CommandEffect::Load { slot, request } => {
                    self.loads.start(&self.state.dataset, slot, request);
                }
                CommandEffect::CancelLoads(slot) => {
                    let canceled = self.loads.worker.cancel_slot(slot);
                    if canceled > 0 {
                        debug!(?slot, canceled, "pending loads canceled");
                    }
                }
                CommandEffect::OpenLink(target) => self.open_link(&target),
            }
        }
    }

    /// Feeds a load result to the navigator that issued it.
    pub(crate) fn handle_load_result(&mut self, event: LoadResultEvent, now: Instant) -> Vec<AppEvent> {
        let LoadResultEvent {
            ticket,
            work,
            result,
            elapsed,
            ..
        } = event;
        if let Ok(frame) = &result {
            self.loads.cache.insert(work, frame.clone());
        }

        let view = match ticket.slot {
            LoadSlot::Hero => ViewKind::Hero,
            LoadSlot::Lightbox => ViewKind::Lightbox,
            LoadSlot::Preload => {
                if let Err(err) = &result {
                    debug!(work, error = %err, "preload failed");
                }
                return Vec::new();
            }
        };

        match self
            .state
            .navigator_mut(view)
            .complete(ticket.attempt, result, now)
        {
            NavigationOutcome::Navigated { from, to } => {
                info!(
                    ?view,
                    from,
                    to,
                    work,
                    elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "navigation completed"
                );
                self.on_navigated(view, now);
                vec![AppEvent::Navigated {
                    view,
                    from,
                    to,
                    work,
                }]
            }
            NavigationOutcome::Failed { position, message } => {
                warn!(?view, position, work, %message, "image load failed");
                self.state.status.last_action_id = Some(ActionId::LoadImage);
                self.state.status.message = format!("{message} (press r to retry)");
                vec![AppEvent::LoadFailed {
                    view,
                    position,
                    message,
                }]
            }
            NavigationOutcome::Stale => Vec::new(),
        }
    }

    fn on_navigated(&mut self, view: ViewKind, now: Instant) {
        self.state.status.last_action_id = Some(ActionId::LoadImage);
        match view {
            ViewKind::Hero => {
                self.state.hero.mark_advanced(now);
                if self.state.screen == Screen::Hero
                    && let Some(work) = self
                        .state
                        .hero
                        .navigator()
                        .current_work()
                        .and_then(|work| self.state.dataset.get(work))
                {
                    self.state.status.message = hero_announcement(work);
                }
                if self.config.navigation.preload_neighbors {
                    let targets = self.state.hero.preload_targets();
                    self.loads.preload(&self.state.dataset, &targets);
                }
            }
            ViewKind::Lightbox => {
                self.state.refresh_lightbox_action();
                if self.state.screen == Screen::Lightbox {
                    announce_lightbox(&mut self.state);
                }
                if self.config.navigation.preload_neighbors {
                    let navigator = self.state.lightbox.navigator();
                    let current = navigator.current_work();
                    let targets = [navigator.neighbor(1), navigator.neighbor(-1)]
                        .into_iter()
                        .flatten()
                        .filter(|work| Some(*work) != current)
                        .collect::<Vec<_>>();
                    self.loads.preload(&self.state.dataset, &targets);
                }
            }
        }
    }

    fn open_link(&mut self, target: &str) {
        match spawn_opener(&self.config.contact.opener, target) {
            Ok(program) => {
                info!(%program, "outbound link opened");
            }
            Err(err) => {
                warn!(error = %err, "failed to open outbound link");
                self.state.status.message = format!("could not open link: {}", err.brief());
            }
        }
    }
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Program and leading arguments of the opener; blank means the platform default.
fn opener_command(opener: &str) -> (String, Vec<String>) {
    let opener = match opener.trim() {
        "" => default_opener(),
        configured => configured,
    };
    let mut parts = opener.split_whitespace().map(str::to_string);
    let program = parts.next().unwrap_or_else(|| default_opener().to_string());
    (program, parts.collect())
}

/// Runs the opener detached from the terminal; the TUI keeps stdio.
fn spawn_opener(opener: &str, target: &str) -> AppResult<String> {
    let (program, args) = opener_command(opener);
    ProcessCommand::new(&program)
        .args(&args)
        .arg(target)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| AppError::io_with_context(err, format!("failed to run {program}")))?;
    Ok(program)
}
