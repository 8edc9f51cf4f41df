use std::time::Instant;

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, Screen};
use crate::catalog::dataset::sample_dataset;
use crate::command::{ActionId, Command, zoom_wheel};

use super::super::view_ops::RenderFramePlan;
use super::{Headless, next_result, quiet_config, stub_app};

const ROW: u16 = 10;

fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row: ROW,
        modifiers: KeyModifiers::NONE,
    }
}

/// Presses at `from`, drags to `to` and releases there, all at `now`.
fn gesture(app: &mut App, session: &Headless, from: u16, to: u16, now: Instant) -> Option<Command> {
    let mut redraw = false;
    let pressed = app.handle_mouse_event(
        mouse(MouseEventKind::Down(MouseButton::Left), from),
        session,
        &mut redraw,
        now,
    );
    assert_eq!(pressed, None);
    let dragged = app.handle_mouse_event(
        mouse(MouseEventKind::Drag(MouseButton::Left), to),
        session,
        &mut redraw,
        now,
    );
    assert_eq!(dragged, None);
    app.handle_mouse_event(
        mouse(MouseEventKind::Up(MouseButton::Left), to),
        session,
        &mut redraw,
        now,
    )
}

async fn started_hero() -> App {
    let mut app = stub_app(sample_dataset(), quiet_config());
    app.start("");
    let result = next_result(&mut app).await;
    app.handle_load_result(result, Instant::now());
    app
}

#[tokio::test]
async fn long_drags_on_hero_commit_swipes_both_ways() {
    let mut app = started_hero().await;
    let session = Headless::new(100, 30).expect("test terminal should initialize");
    let now = Instant::now();

    assert_eq!(gesture(&mut app, &session, 70, 20, now), Some(Command::Next));
    assert_eq!(app.state.status.last_action_id, Some(ActionId::Swipe));
    assert_eq!(gesture(&mut app, &session, 20, 70, now), Some(Command::Prev));
    assert!(!app.state.drag.is_dragging());
}

#[tokio::test]
async fn short_drag_snaps_back_without_command() {
    let mut app = started_hero().await;
    let session = Headless::new(100, 30).expect("test terminal should initialize");
    let now = Instant::now();

    assert_eq!(gesture(&mut app, &session, 50, 48, now), None);
    assert!(app.state.drag.is_snapping_back());
}

#[tokio::test]
async fn press_is_refused_while_hero_is_transitioning() {
    let mut app = stub_app(sample_dataset(), quiet_config());
    app.start("");
    assert!(app.state.hero.navigator().is_transitioning());
    let session = Headless::new(100, 30).expect("test terminal should initialize");

    let mut redraw = false;
    let now = Instant::now();
    let pressed = app.handle_mouse_event(
        mouse(MouseEventKind::Down(MouseButton::Left), 70),
        &session,
        &mut redraw,
        now,
    );
    assert_eq!(pressed, None);
    assert!(!app.state.drag.is_dragging());
    assert!(!redraw);

    let released = app.handle_mouse_event(
        mouse(MouseEventKind::Up(MouseButton::Left), 10),
        &session,
        &mut redraw,
        now,
    );
    assert_eq!(released, None);
}

#[tokio::test]
async fn dragging_left_slides_in_the_next_work() {
    let mut app = started_hero().await;
    let mut session = Headless::new(100, 30).expect("test terminal should initialize");
    let now = Instant::now();
    let mut redraw = false;
    app.handle_mouse_event(
        mouse(MouseEventKind::Down(MouseButton::Left), 80),
        &session,
        &mut redraw,
        now,
    );
    app.handle_mouse_event(
        mouse(MouseEventKind::Drag(MouseButton::Left), 40),
        &session,
        &mut redraw,
        now,
    );
    assert!(redraw);

    let next = app
        .state
        .hero
        .navigator()
        .neighbor(1)
        .expect("hero should have a next work");
    let preview = app.neighbor_preview(now).expect("drag should reveal a neighbour");
    assert_eq!(preview.work, next);
    assert_eq!(preview.pixels, None);

    app.render
        .render_frame(
            &mut app.state,
            &mut session,
            RenderFramePlan {
                palette_view: None,
                preview: Some(preview),
                now,
            },
        )
        .expect("render should succeed");
    let title = &app.state.dataset.get(next).expect("work should exist").title;
    assert!(session.text().contains(title.as_str()));
}

#[tokio::test]
async fn zoomed_lightbox_pans_where_unzoomed_one_swipes() {
    let mut app = stub_app(sample_dataset(), quiet_config());
    let session = Headless::new(100, 30).expect("test terminal should initialize");
    let dispatch = app
        .interaction
        .dispatch_command(
            &mut app.state,
            Command::OpenLightbox {
                items: vec![0, 1, 2],
                index: 0,
            },
        )
        .expect("lightbox should open");
    app.apply_effects(dispatch.effects);
    let result = next_result(&mut app).await;
    app.handle_load_result(result, Instant::now());
    assert_eq!(app.state.screen, Screen::Lightbox);

    let now = Instant::now();
    assert_eq!(gesture(&mut app, &session, 70, 20, now), Some(Command::Next));

    zoom_wheel(&mut app.state, true);
    assert!(!app.state.lightbox.accepts_swipe());
    let before = app.state.lightbox.zoom().crop_rect();

    assert_eq!(gesture(&mut app, &session, 50, 40, now), None);
    assert!(!app.state.drag.is_dragging());
    assert!(app.interaction.pointer.pan_anchor.is_none());
    assert_ne!(app.state.lightbox.zoom().crop_rect(), before);
}
