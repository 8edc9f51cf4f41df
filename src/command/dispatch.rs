use std::collections::VecDeque;

use crate::app::{AppState, PaletteRequest, Screen};
use crate::error::AppResult;
use crate::event::{AppEvent, ViewKind};
use crate::extension::ExtensionHost;
use crate::gallery::{LightboxControl, LoadSlot};
use crate::palette::PaletteKind;

use super::core::{
    ActivateTarget, activate_target, cancel, grid_move, grid_search, issue_navigation,
    move_focus, next_page, open_lightbox, pan, prev_page, retry, run_action, set_filter, step,
    toggle_gallery, toggle_info, toggle_zoom, zoom_by_key, zoom_reset,
};
use super::types::{ActionId, Command, CommandEffect, CommandOutcome};

#[derive(Debug, Clone)]
pub struct CommandDispatchResult {
    pub outcome: CommandOutcome,
    pub emitted_events: Vec<AppEvent>,
    pub effects: Vec<CommandEffect>,
}

pub fn dispatch(
    app: &mut AppState,
    cmd: Command,
    extension_host: &mut ExtensionHost,
    palette_requests: &mut VecDeque<PaletteRequest>,
) -> AppResult<CommandDispatchResult> {
    let prev_screen = app.screen;
    let action_id = cmd.action_id();
    let mut effects = Vec::new();

    let outcome = match cmd {
        Command::Next => step(app, true, &mut effects),
        Command::Prev => step(app, false, &mut effects),
        Command::ToggleGallery => toggle_gallery(app),
        Command::OpenPalette { kind, seed } => {
            palette_requests.push_back(PaletteRequest::Open { kind, seed });
            app.status.last_action_id = Some(ActionId::OpenPalette);
            app.status.message = "opening palette".to_string();
            CommandOutcome::Applied
        }
        Command::ClosePalette => {
            palette_requests.push_back(PaletteRequest::Close);
            app.status.last_action_id = Some(ActionId::ClosePalette);
            app.status.message = "closing palette".to_string();
            CommandOutcome::Applied
        }
        Command::OpenSearch => open_search(app, palette_requests),
        Command::OpenLightbox { items, index } => open_lightbox(app, items, index, &mut effects),
        Command::SetFilter { key } => set_filter(app, key),
        Command::GridSearch { term } => grid_search(app, &term),
        Command::NextPage => next_page(app),
        Command::PrevPage => prev_page(app),
        Command::GridMove { direction } => grid_move(app, direction),
        Command::ToggleZoom => toggle_zoom(app),
        Command::ZoomIn => zoom_by_key(app, true),
        Command::ZoomOut => zoom_by_key(app, false),
        Command::ZoomReset => zoom_reset(app),
        Command::Pan { dx, dy } => pan(app, dx, dy),
        Command::ToggleInfo => toggle_info(app),
        Command::FocusNext => move_focus(app, true),
        Command::FocusPrev => move_focus(app, false),
        Command::Activate => activate(app, &mut effects),
        Command::RunAction => run_action(app, &mut effects),
        Command::Retry => retry(app, &mut effects),
        Command::HistoryBack => history_step(app, extension_host, true, &mut effects),
        Command::HistoryForward => history_step(app, extension_host, false, &mut effects),
        Command::Cancel => cancel(app, palette_requests, &mut effects),
        Command::Quit => {
            app.status.last_action_id = Some(ActionId::Quit);
            app.status.message = "quit requested".to_string();
            CommandOutcome::QuitRequested
        }
    };

    let mut emitted_events = collect_transition_events(app, prev_screen);
    emitted_events.push(AppEvent::CommandExecuted {
        id: action_id,
        outcome,
    });

    Ok(CommandDispatchResult {
        outcome,
        emitted_events,
        effects,
    })
}

pub fn drain_background_events(app: &mut AppState, extension_host: &mut ExtensionHost) -> bool {
    extension_host.drain_background(app)
}

fn open_search(
    app: &mut AppState,
    palette_requests: &mut VecDeque<PaletteRequest>,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::Search);
    let request = if app.screen == Screen::Grid {
        let term = app.grid.term();
        PaletteRequest::Open {
            kind: PaletteKind::GridSearch,
            seed: (!term.is_empty()).then(|| term.to_string()),
        }
    } else {
        PaletteRequest::Open {
            kind: PaletteKind::Works,
            seed: None,
        }
    };
    palette_requests.push_back(request);
    app.status.message = "search".to_string();
    CommandOutcome::Applied
}

fn activate(app: &mut AppState, effects: &mut Vec<CommandEffect>) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::Activate);
    match activate_target(app) {
        ActivateTarget::OpenLightbox { items, index } => open_lightbox(app, items, index, effects),
        ActivateTarget::Control(LightboxControl::Close) => {
            app.lightbox.close();
            app.screen = app.return_screen;
            effects.push(CommandEffect::CancelLoads(LoadSlot::Lightbox));
            app.status.message = "lightbox closed".to_string();
            CommandOutcome::Applied
        }
        ActivateTarget::Control(LightboxControl::Previous) => step(app, false, effects),
        ActivateTarget::Control(LightboxControl::Next) => step(app, true, effects),
        ActivateTarget::Control(LightboxControl::Info) => toggle_info(app),
        ActivateTarget::Control(LightboxControl::Action) => run_action(app, effects),
        ActivateTarget::Nothing => {
            app.status.message = "nothing selected".to_string();
            CommandOutcome::Noop
        }
    }
}

/// Location history restores hero positions, so a traversal always lands on the hero.
fn history_step(
    app: &mut AppState,
    extension_host: &mut ExtensionHost,
    back: bool,
    effects: &mut Vec<CommandEffect>,
) -> CommandOutcome {
    app.status.last_action_id = Some(if back {
        ActionId::HistoryBack
    } else {
        ActionId::HistoryForward
    });
    let request = if back {
        extension_host.history_back(app)
    } else {
        extension_host.history_forward(app)
    };
    let Some(request) = request else {
        app.status.message = if app.hero.navigator().is_transitioning() {
            "still loading".to_string()
        } else if back {
            "no earlier location".to_string()
        } else {
            "no later location".to_string()
        };
        return CommandOutcome::Noop;
    };
    if app.screen == Screen::Lightbox {
        app.lightbox.close();
        effects.push(CommandEffect::CancelLoads(LoadSlot::Lightbox));
    }
    app.screen = Screen::Hero;
    issue_navigation(app, ViewKind::Hero, Some(request), effects)
}

fn collect_transition_events(app: &AppState, prev_screen: Screen) -> Vec<AppEvent> {
    let mut events = Vec::new();
    if app.screen != prev_screen {
        events.push(AppEvent::ScreenChanged {
            from: prev_screen,
            to: app.screen,
        });
    }
    events
}
