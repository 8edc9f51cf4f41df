use crossterm::event::KeyEvent;
use tracing::{debug, warn};

use crate::command::{ActionId, Command, CommandDispatchResult, dispatch, drain_background_events};
use crate::error::AppResult;
use crate::event::AppEvent;
use crate::input::keymap::{KeyContext, KeymapPreset, map_key_to_command_with_preset};
use crate::palette::{PaletteKeyResult, PaletteSubmitEffect, PaletteView};

use super::core::InteractionSubsystem;
use super::state::{AppState, Mode, PaletteRequest};

#[derive(Debug, Clone, Default)]
pub(crate) struct KeyEventOutcome {
    pub redraw: bool,
    /// The palette popup went away; stale cells must be cleared.
    pub clear_terminal: bool,
    pub quit_requested: bool,
    pub command: Option<Command>,
}

impl KeyEventOutcome {
    fn palette_closed(closed: bool, command: Option<Command>) -> Self {
        Self {
            redraw: closed,
            clear_terminal: closed,
            quit_requested: false,
            command,
        }
    }
}

impl InteractionSubsystem {
    /// Routes a key press: the open palette swallows everything, otherwise the
    /// screen keymap decides.
    pub(crate) fn handle_key_event(
        &mut self,
        state: &mut AppState,
        key: KeyEvent,
        preset: KeymapPreset,
    ) -> AppResult<KeyEventOutcome> {
        if state.mode == Mode::Palette {
            let result = self
                .palette
                .manager
                .handle_key(&self.palette.registry, state, key)?;
            return Ok(match result {
                PaletteKeyResult::Consumed { redraw } => KeyEventOutcome {
                    redraw,
                    ..KeyEventOutcome::default()
                },
                PaletteKeyResult::CloseRequested { session_id } => {
                    KeyEventOutcome::palette_closed(self.close_palette_session(state, session_id), None)
                }
                PaletteKeyResult::Submit { session_id, effect } => {
                    let closed = self.close_palette_session(state, session_id);
                    let command = match effect {
                        PaletteSubmitEffect::Dispatch(command) if closed => Some(command),
                        _ => None,
                    };
                    KeyEventOutcome::palette_closed(closed, command)
                }
            });
        }

        let context = KeyContext {
            mode: state.mode,
            screen: state.screen,
            zoomed: state.lightbox.zoom().is_active(),
        };
        let command = map_key_to_command_with_preset(key, context, preset);

        Ok(match command {
            Some(Command::Quit) => KeyEventOutcome {
                quit_requested: true,
                ..KeyEventOutcome::default()
            },
            command => KeyEventOutcome {
                command,
                ..KeyEventOutcome::default()
            },
        })
    }

    pub(crate) fn drain_background_events(&mut self, state: &mut AppState) -> bool {
        drain_background_events(state, &mut self.extensions.host)
    }

    pub(crate) fn palette_view(&self) -> Option<PaletteView> {
        self.palette.manager.view()
    }

    fn close_palette_session(&mut self, state: &mut AppState, session_id: u64) -> bool {
        let closed = self.palette.manager.close_if_matches(session_id);
        if closed {
            state.mode = Mode::Normal;
        }
        closed
    }

    /// Applies queued open/close requests. Returns whether anything visible changed.
    pub(crate) fn apply_palette_requests(&mut self, state: &mut AppState) -> bool {
        let mut changed = false;
        while let Some(request) = self.palette.pending_requests.pop_front() {
            match request {
                PaletteRequest::Open { kind, seed } => {
                    state.status.last_action_id = Some(ActionId::OpenPalette);
                    let opened =
                        self.palette
                            .manager
                            .open(&self.palette.registry, state, kind, seed);
                    match opened {
                        Ok(()) => {
                            debug!(kind = kind.id(), "palette opened");
                            state.mode = Mode::Palette;
                            state.status.message = format!("palette opened: {}", kind.id());
                            changed = true;
                        }
                        Err(err) => {
                            warn!(kind = kind.id(), error = %err, "palette failed to open");
                            state.status.message = format!("failed to open palette: {err}");
                        }
                    }
                }
                PaletteRequest::Close if self.palette.manager.close() => {
                    debug!("palette closed");
                    state.mode = Mode::Normal;
                    state.status.last_action_id = Some(ActionId::ClosePalette);
                    state.status.message = "palette closed".to_string();
                    changed = true;
                }
                PaletteRequest::Close => {}
            }
        }

        if state.mode == Mode::Palette && !self.palette.manager.is_open() {
            state.mode = Mode::Normal;
            changed = true;
        }
        changed
    }

    pub(crate) fn dispatch_command(
        &mut self,
        state: &mut AppState,
        command: Command,
    ) -> AppResult<CommandDispatchResult> {
        dispatch(
            state,
            command,
            &mut self.extensions.host,
            &mut self.palette.pending_requests,
        )
    }

    pub(crate) fn handle_app_event(&mut self, state: &mut AppState, event: &AppEvent) {
        if let AppEvent::Navigated { work, .. } = event {
            state.grid.mark_current(*work);
        }
        self.extensions.host.handle_event(event, state);
    }
}
