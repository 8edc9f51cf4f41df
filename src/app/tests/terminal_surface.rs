use std::time::{Duration, Instant};

use ratatui::layout::{Rect, Size};
use ratatui::widgets::Paragraph;

use crate::catalog::dataset::sample_dataset;
use crate::command::Command;
use crate::config::Config;

use super::super::terminal_session::TerminalSurface;
use super::super::view_ops::RenderFramePlan;
use super::{Headless, stub_app};

#[test]
fn headless_surface_reports_size_and_draws() {
    let mut session = Headless::new(80, 24).expect("test terminal should initialize");
    let size = session.size().expect("size should resolve");
    assert_eq!(size, Size::new(80, 24));

    session.clear().expect("clear should succeed");
    session
        .draw(|frame| {
            frame.render_widget(Paragraph::new("ok"), Rect::new(0, 0, 2, 1));
        })
        .expect("draw should succeed");
}

#[tokio::test]
async fn hero_frame_shows_loading_until_image_arrives() {
    let mut app = stub_app(sample_dataset(), Config::default());
    let mut session = Headless::new(100, 30).expect("test terminal should initialize");
    app.start("");

    let palette_view = app.interaction.palette_view();
    app.render
        .render_frame(
            &mut app.state,
            &mut session,
            RenderFramePlan {
                palette_view,
                preview: None,
                now: Instant::now(),
            },
        )
        .expect("render should succeed");

    let text = session.text();
    assert!(text.contains("folio | hero"));
    assert!(text.contains("Loading Dawn Harbor"));
    assert!(text.contains("Dawn Harbor"));
}

#[tokio::test]
async fn gallery_frame_lists_tiles_after_toggle() {
    let mut app = stub_app(sample_dataset(), Config::default());
    let mut session = Headless::new(100, 40).expect("test terminal should initialize");
    app.start("");
    let dispatch = app
        .interaction
        .dispatch_command(&mut app.state, Command::ToggleGallery)
        .expect("gallery toggle should dispatch");
    app.apply_effects(dispatch.effects);

    app.render
        .render_frame(
            &mut app.state,
            &mut session,
            RenderFramePlan {
                palette_view: None,
                preview: None,
                now: Instant::now() + Duration::from_millis(5),
            },
        )
        .expect("render should succeed");

    let text = session.text();
    assert!(text.contains("5 works"));
    assert!(text.contains("Ocean Depths"));
    assert!(text.contains("All"));
}
