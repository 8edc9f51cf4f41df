use std::collections::VecDeque;

use tracing::{debug, info};

use crate::app::{AppState, Mode, PaletteRequest, Screen};
use crate::catalog::display::lightbox_announcement;
use crate::event::ViewKind;
use crate::gallery::zoom::ZOOM_ANNOUNCEMENT;
use crate::gallery::{EscapeOutcome, FilterKey, GridMove, LightboxControl, LoadRequest, LoadSlot};

use super::types::{ActionId, CommandEffect, CommandOutcome};

pub(crate) fn step(
    app: &mut AppState,
    forward: bool,
    effects: &mut Vec<CommandEffect>,
) -> CommandOutcome {
    let action_id = if forward { ActionId::Next } else { ActionId::Prev };
    app.status.last_action_id = Some(action_id);

    let Some(view) = app.active_view() else {
        return if forward { next_page(app) } else { prev_page(app) };
    };
    let request = match (view, forward) {
        (ViewKind::Hero, true) => app.hero.next(),
        (ViewKind::Hero, false) => app.hero.previous(),
        (ViewKind::Lightbox, true) => app.lightbox.navigator_mut().next(),
        (ViewKind::Lightbox, false) => app.lightbox.navigator_mut().previous(),
    };
    issue_navigation(app, view, request, effects)
}

pub(crate) fn retry(app: &mut AppState, effects: &mut Vec<CommandEffect>) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::Retry);
    let Some(view) = app.active_view() else {
        app.status.message = "nothing to retry".to_string();
        return CommandOutcome::Noop;
    };
    if app.navigator(view).failure().is_none() {
        app.status.message = "nothing to retry".to_string();
        return CommandOutcome::Noop;
    }
    let request = match view {
        ViewKind::Hero => app.hero.retry(),
        ViewKind::Lightbox => app.lightbox.navigator_mut().retry(),
    };
    issue_navigation(app, view, request, effects)
}

/// Turns an accepted navigation into a load effect; a dropped one into a status note.
pub(crate) fn issue_navigation(
    app: &mut AppState,
    view: ViewKind,
    request: Option<LoadRequest>,
    effects: &mut Vec<CommandEffect>,
) -> CommandOutcome {
    let Some(request) = request else {
        app.status.message = if app.navigator(view).is_transitioning() {
            "still loading".to_string()
        } else {
            "nothing to show".to_string()
        };
        return CommandOutcome::Noop;
    };
    app.status.message = match app.dataset.get(request.work) {
        Some(work) => format!("loading {}", work.title),
        None => "loading".to_string(),
    };
    effects.push(CommandEffect::Load {
        slot: slot_for(view),
        request,
    });
    CommandOutcome::Applied
}

pub(crate) fn slot_for(view: ViewKind) -> LoadSlot {
    match view {
        ViewKind::Hero => LoadSlot::Hero,
        ViewKind::Lightbox => LoadSlot::Lightbox,
    }
}

pub(crate) fn toggle_gallery(app: &mut AppState) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::ToggleGallery);
    match app.screen {
        Screen::Grid => {
            app.screen = Screen::Hero;
            app.status.message = "hero".to_string();
        }
        Screen::Hero => {
            app.screen = Screen::Grid;
            app.status.message = grid_summary(app);
        }
        Screen::Lightbox => {
            app.lightbox.close();
            app.screen = Screen::Grid;
            app.status.message = grid_summary(app);
        }
    }
    CommandOutcome::Applied
}

pub(crate) fn open_lightbox(
    app: &mut AppState,
    items: Vec<usize>,
    index: usize,
    effects: &mut Vec<CommandEffect>,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::OpenLightbox);
    if items.is_empty() {
        app.status.message = "nothing to open".to_string();
        return CommandOutcome::Noop;
    }
    if app.screen != Screen::Lightbox {
        app.return_screen = app.screen;
    }
    effects.push(CommandEffect::CancelLoads(LoadSlot::Lightbox));
    let request = app.lightbox.open(items, index);
    app.screen = Screen::Lightbox;
    app.refresh_lightbox_action();
    if let Some(work) = app
        .lightbox
        .navigator()
        .current_work()
        .and_then(|work| app.dataset.get(work))
    {
        debug!(work = %work.id, "lightbox opened");
    }
    issue_navigation(app, ViewKind::Lightbox, request, effects)
}

/// Esc: palette first, then the lightbox chain, then the gallery.
pub(crate) fn cancel(
    app: &mut AppState,
    palette_requests: &mut VecDeque<PaletteRequest>,
    effects: &mut Vec<CommandEffect>,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::Cancel);
    if app.mode == Mode::Palette {
        palette_requests.push_back(PaletteRequest::Close);
        app.status.message = "closing palette".to_string();
        return CommandOutcome::Applied;
    }

    match app.screen {
        Screen::Lightbox => match app.lightbox.escape() {
            EscapeOutcome::ExitedZoom => {
                app.status.message = "zoom off".to_string();
                CommandOutcome::Applied
            }
            EscapeOutcome::CollapsedInfo => {
                app.status.message = "details hidden".to_string();
                CommandOutcome::Applied
            }
            EscapeOutcome::Closed => {
                effects.push(CommandEffect::CancelLoads(LoadSlot::Lightbox));
                app.screen = app.return_screen;
                app.status.message = "lightbox closed".to_string();
                CommandOutcome::Applied
            }
            EscapeOutcome::Ignored => CommandOutcome::Noop,
        },
        Screen::Grid => {
            app.screen = Screen::Hero;
            app.status.message = "hero".to_string();
            CommandOutcome::Applied
        }
        Screen::Hero => {
            app.status.message.clear();
            CommandOutcome::Noop
        }
    }
}

pub(crate) fn set_filter(app: &mut AppState, key: FilterKey) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::SetFilter);
    app.grid.set_filter(&app.dataset, key);
    app.screen = Screen::Grid;
    app.status.message = grid_summary(app);
    CommandOutcome::Applied
}

pub(crate) fn grid_search(app: &mut AppState, term: &str) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::GridSearch);
    app.grid.search(&app.dataset, term);
    app.screen = Screen::Grid;
    app.status.message = grid_summary(app);
    CommandOutcome::Applied
}

pub(crate) fn next_page(app: &mut AppState) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::NextPage);
    if !app.grid.next_page() {
        app.status.message = format!(
            "already at last page ({}/{})",
            app.grid.page(),
            app.grid.page_count()
        );
        return CommandOutcome::Noop;
    }
    app.status.message = format!("page {}/{}", app.grid.page(), app.grid.page_count());
    CommandOutcome::Applied
}

pub(crate) fn prev_page(app: &mut AppState) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::PrevPage);
    if !app.grid.prev_page() {
        app.status.message = "already at first page (1)".to_string();
        return CommandOutcome::Noop;
    }
    app.status.message = format!("page {}/{}", app.grid.page(), app.grid.page_count());
    CommandOutcome::Applied
}

pub(crate) fn grid_move(app: &mut AppState, direction: GridMove) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::GridMove);
    let before = app.grid.selection();
    app.grid.move_selection(direction);
    if app.grid.selection() == before {
        return CommandOutcome::Noop;
    }
    if let Some(work) = app.grid.selected_work().and_then(|work| app.dataset.get(work)) {
        app.status.message = work.title.clone();
    }
    CommandOutcome::Applied
}

/// Zoom and the info panel belong to the lightbox; elsewhere they are no-ops.
pub(crate) fn lightbox_only(app: &mut AppState, action_id: ActionId) -> bool {
    app.status.last_action_id = Some(action_id);
    if app.screen == Screen::Lightbox {
        return true;
    }
    app.status.message = "open a work to use this".to_string();
    false
}

pub(crate) fn toggle_zoom(app: &mut AppState) -> CommandOutcome {
    if !lightbox_only(app, ActionId::ToggleZoom) {
        return CommandOutcome::Noop;
    }
    let zoom = app.lightbox.zoom_mut();
    zoom.toggle();
    app.status.message = if zoom.is_active() {
        ZOOM_ANNOUNCEMENT.to_string()
    } else {
        "zoom off".to_string()
    };
    CommandOutcome::Applied
}

pub(crate) fn zoom_by_key(app: &mut AppState, zoom_in: bool) -> CommandOutcome {
    let action_id = if zoom_in { ActionId::ZoomIn } else { ActionId::ZoomOut };
    if !lightbox_only(app, action_id) {
        return CommandOutcome::Noop;
    }
    let zoom = app.lightbox.zoom_mut();
    if !zoom.is_active() {
        zoom.enter();
    } else if !zoom.key_zoom(zoom_in) {
        app.status.message = format!("zoom unchanged ({:.1}x)", zoom.scale());
        return CommandOutcome::Noop;
    }
    app.status.message = format!("zoom {:.1}x", app.lightbox.zoom().scale());
    CommandOutcome::Applied
}

pub(crate) fn zoom_wheel(app: &mut AppState, zoom_in: bool) -> CommandOutcome {
    let action_id = if zoom_in { ActionId::ZoomIn } else { ActionId::ZoomOut };
    if !lightbox_only(app, action_id) {
        return CommandOutcome::Noop;
    }
    let zoom = app.lightbox.zoom_mut();
    let changed = if zoom.is_active() {
        zoom.wheel(zoom_in)
    } else {
        zoom_in && zoom.enter()
    };
    if !changed {
        return CommandOutcome::Noop;
    }
    app.status.message = format!("zoom {:.1}x", app.lightbox.zoom().scale());
    CommandOutcome::Applied
}

pub(crate) fn zoom_reset(app: &mut AppState) -> CommandOutcome {
    if !lightbox_only(app, ActionId::ZoomReset) || !app.lightbox.zoom().is_active() {
        return CommandOutcome::Noop;
    }
    app.lightbox.zoom_mut().reset();
    app.status.message = format!("zoom {:.1}x", app.lightbox.zoom().scale());
    CommandOutcome::Applied
}

pub(crate) fn pan(app: &mut AppState, dx: i8, dy: i8) -> CommandOutcome {
    if !lightbox_only(app, ActionId::Pan) {
        return CommandOutcome::Noop;
    }
    if app.lightbox.zoom_mut().pan_step(dx, dy) {
        CommandOutcome::Applied
    } else {
        CommandOutcome::Noop
    }
}

pub(crate) fn toggle_info(app: &mut AppState) -> CommandOutcome {
    if !lightbox_only(app, ActionId::ToggleInfo) {
        return CommandOutcome::Noop;
    }
    let expanded = app.lightbox.toggle_info();
    app.status.message = if expanded { "details shown" } else { "details hidden" }.to_string();
    CommandOutcome::Applied
}

pub(crate) fn move_focus(app: &mut AppState, forward: bool) -> CommandOutcome {
    let action_id = if forward { ActionId::FocusNext } else { ActionId::FocusPrev };
    if !lightbox_only(app, action_id) {
        return CommandOutcome::Noop;
    }
    let control = if forward {
        app.lightbox.focus_next()
    } else {
        app.lightbox.focus_previous()
    };
    app.status.message = format!("focus: {}", control.label());
    CommandOutcome::Applied
}

/// What Enter acts on in the current screen.
pub(crate) fn activate_target(app: &AppState) -> ActivateTarget {
    match app.screen {
        Screen::Hero => ActivateTarget::OpenLightbox {
            items: app.hero.navigator().items().to_vec(),
            index: app.hero.navigator().current_index(),
        },
        Screen::Grid => match app.grid.open_selected() {
            Some((items, index)) => ActivateTarget::OpenLightbox { items, index },
            None => ActivateTarget::Nothing,
        },
        Screen::Lightbox => ActivateTarget::Control(app.lightbox.focused()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ActivateTarget {
    OpenLightbox { items: Vec<usize>, index: usize },
    Control(LightboxControl),
    Nothing,
}

pub(crate) fn run_action(app: &mut AppState, effects: &mut Vec<CommandEffect>) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::RunAction);
    let Some(work) = app.focused_work() else {
        app.status.message = "no work selected".to_string();
        return CommandOutcome::Noop;
    };
    let action = app.action_for(work);
    let Some(target) = action.target() else {
        app.status.message = match action.label() {
            Some(label) => label.to_string(),
            None => "no action for this work".to_string(),
        };
        return CommandOutcome::Noop;
    };
    info!(work, action = ?action.label(), "opening outbound action");
    effects.push(CommandEffect::OpenLink(target.to_string()));
    app.status.message = format!("opening {}", action.label().unwrap_or("link"));
    CommandOutcome::Applied
}

pub(crate) fn announce_lightbox(app: &mut AppState) {
    if let Some(work) = app
        .lightbox
        .navigator()
        .current_work()
        .and_then(|work| app.dataset.get(work))
    {
        app.status.message = lightbox_announcement(work);
    }
}

fn grid_summary(app: &AppState) -> String {
    let count = app.grid.items().len();
    let noun = if count == 1 { "work" } else { "works" };
    if app.grid.term().is_empty() {
        format!("{} \u{2022} {count} {noun}", app.grid.filter().label())
    } else {
        format!(
            "{} \u{2022} \"{}\" \u{2022} {count} {noun}",
            app.grid.filter().label(),
            app.grid.term()
        )
    }
}
