use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::config::CacheConfig;
use crate::error::{AppError, AppResult};
use crate::gallery::frame::solid_frame;
use crate::gallery::{CropRect, RgbaFrame};

use super::factory::create_presenter;
use super::protocol_cache::{DEFAULT_MAX_ENTRIES, ProtocolCache, ProtocolKey, ProtocolSlot};
use super::ratatui::RatatuiImagePresenter;
use super::terminal_cell::cell_size_from_window_metrics;
use super::traits::{FrameKey, ImagePresenter, PresenterKind, Viewport};


fn frame() -> RgbaFrame {
    solid_frame(4, 4, 200)
}

fn viewport(width: u16, height: u16) -> Viewport {
    Viewport {
        x: 0,
        y: 0,
        width,
        height,
    }
}

fn cache_key(work: usize) -> ProtocolKey {
    ProtocolKey {
        frame: FrameKey::plain(work),
        viewport: viewport(80, 24),
    }
}

/// Renders once into a fresh test terminal and returns the presenter's result.
fn render_once(presenter: &mut RatatuiImagePresenter) -> AppResult<bool> {
    let mut terminal =
        Terminal::new(TestBackend::new(20, 10)).expect("test terminal should initialize");
    let mut result = Ok(false);
    terminal
        .draw(|frame| result = presenter.render(frame, Rect::new(1, 1, 12, 7)))
        .expect("draw should pass");
    result
}

fn render_until_drawn(presenter: &mut RatatuiImagePresenter) -> bool {
    for _ in 0..80 {
        if render_once(presenter).expect("render should pass") {
            return true;
        }
        presenter.drain_background_events();
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn factory_builds_ratatui_presenter_with_configured_limits() {
    let cache = CacheConfig {
        frame_max_entries: 5,
        ..CacheConfig::default()
    };
    let presenter = create_presenter(PresenterKind::RatatuiImage, &cache)
        .expect("ratatui presenter should be selectable");
    assert!(presenter.status_label().starts_with("ratatui-image/"));
    assert!(presenter.cell_px().is_some());

    let presenter = RatatuiImagePresenter::with_cache_limits(5, 2048);
    assert_eq!(presenter.cache.limits(), (5, 2048));
}

#[test]
fn preparing_the_same_variant_twice_hits_the_cache() {
    let mut presenter = RatatuiImagePresenter::new();
    for _ in 0..2 {
        presenter
            .prepare(FrameKey::plain(0), &frame(), viewport(80, 24))
            .expect("prepare should pass");
    }
    assert_eq!(presenter.cache_len(), 1);
    assert!(presenter.cache_hit_rate() > 0.0);
}

#[test]
fn crop_and_dim_variants_are_cached_separately() {
    let mut presenter = RatatuiImagePresenter::new();
    let plain = FrameKey::plain(0);
    let variants = [
        plain,
        FrameKey {
            dim_step: 4,
            ..plain
        },
        FrameKey {
            crop: CropRect::around(2.0, 0.5, 0.5),
            ..plain
        },
    ];
    for key in variants {
        presenter
            .prepare(key, &frame(), viewport(80, 24))
            .expect("prepare should pass");
    }
    assert_eq!(presenter.cache_len(), 3);
}

#[test]
fn prepared_image_is_drawn_once_encoded() {
    let mut presenter = RatatuiImagePresenter::new();
    presenter
        .prepare(FrameKey::plain(0), &frame(), viewport(12, 7))
        .expect("prepare should pass");

    assert!(render_until_drawn(&mut presenter));
    assert!(presenter.last_encode_duration().is_some());
    assert!(!presenter.has_pending_work());
}

#[test]
fn previous_image_stays_up_while_next_variant_encodes() {
    let mut presenter = RatatuiImagePresenter::new();
    presenter
        .prepare(FrameKey::plain(0), &frame(), viewport(12, 7))
        .expect("prepare should pass");
    assert!(render_until_drawn(&mut presenter));

    let next = ProtocolKey {
        frame: FrameKey::plain(1),
        viewport: viewport(12, 7),
    };
    presenter
        .prepare(next.frame, &solid_frame(4, 4, 10), next.viewport)
        .expect("prepare should pass");
    if let Some(slot) = presenter.cache.slot_mut(&next) {
        *slot = ProtocolSlot::Encoding;
    }

    assert!(render_once(&mut presenter).expect("render should pass"));
}

#[test]
fn pending_work_clears_after_encode_finishes() {
    let mut presenter = RatatuiImagePresenter::new();
    presenter
        .prepare(FrameKey::plain(1), &frame(), viewport(12, 7))
        .expect("prepare should pass");
    assert!(!presenter.has_pending_work());

    let _ = render_once(&mut presenter);
    let deadline = Instant::now() + Duration::from_secs(2);
    while presenter.has_pending_work() && Instant::now() < deadline {
        presenter.drain_background_events();
        thread::sleep(Duration::from_millis(5));
    }
    assert!(!presenter.has_pending_work());
}

#[test]
fn failed_current_entry_surfaces_an_error() {
    let mut presenter = RatatuiImagePresenter::new();
    let key = ProtocolKey {
        frame: FrameKey::plain(2),
        viewport: viewport(12, 7),
    };
    presenter
        .prepare(key.frame, &frame(), key.viewport)
        .expect("prepare should pass");
    if let Some(slot) = presenter.cache.slot_mut(&key) {
        *slot = ProtocolSlot::Failed;
    }

    let err = render_once(&mut presenter).expect_err("failed entry should surface an error");
    assert!(matches!(err, AppError::Unsupported(_)));
}

#[test]
fn stopped_worker_marks_entry_failed() {
    let mut presenter = RatatuiImagePresenter::new();
    let key = ProtocolKey {
        frame: FrameKey::plain(7),
        viewport: viewport(12, 7),
    };
    presenter
        .prepare(key.frame, &frame(), key.viewport)
        .expect("prepare should pass");
    presenter.shutdown_worker();

    let err = render_once(&mut presenter).expect_err("stopped worker should surface an error");
    assert!(matches!(err, AppError::Unsupported(_)));
    assert!(matches!(
        presenter.cache.slot_mut(&key),
        Some(ProtocolSlot::Failed)
    ));
}

#[test]
fn clear_current_stops_drawing() {
    let mut presenter = RatatuiImagePresenter::new();
    presenter
        .prepare(FrameKey::plain(0), &frame(), viewport(12, 7))
        .expect("prepare should pass");
    presenter.clear_current();
    assert!(!render_once(&mut presenter).expect("render should pass"));
}

#[test]
fn slot_access_does_not_refresh_lru_order() {
    let mut cache = ProtocolCache::default();
    for work in 0..DEFAULT_MAX_ENTRIES {
        cache.insert(cache_key(work), frame(), 1, false);
    }
    assert!(cache.slot_mut(&cache_key(0)).is_some());
    cache.insert(cache_key(DEFAULT_MAX_ENTRIES), frame(), 1, false);

    assert!(cache.entries.peek(&cache_key(0)).is_none());
    assert!(cache.entries.peek(&cache_key(1)).is_some());
}

#[test]
fn eviction_at_capacity_keeps_byte_accounting() {
    let mut cache = ProtocolCache::default();
    for work in 0..DEFAULT_MAX_ENTRIES {
        cache.insert(cache_key(work), frame(), 16, false);
    }
    cache.insert(cache_key(DEFAULT_MAX_ENTRIES), frame(), 20, false);

    assert_eq!(cache.len(), DEFAULT_MAX_ENTRIES);
    assert_eq!(cache.used_bytes(), (DEFAULT_MAX_ENTRIES - 1) * 16 + 20);
}

#[test]
fn pending_source_shares_its_pixel_buffer() {
    let mut cache = ProtocolCache::default();
    let source = frame();
    cache.insert(cache_key(0), source.clone(), source.byte_len(), false);

    let Some(ProtocolSlot::Pending(stored)) = cache.slot_mut(&cache_key(0)) else {
        panic!("expected pending source");
    };
    assert!(Arc::ptr_eq(&source.pixels, &stored.pixels));
}

#[test]
fn oversize_frames_need_force_and_then_stand_alone() {
    let mut cache = ProtocolCache::new(8, 32);
    cache.insert(cache_key(0), frame(), 16, false);

    assert!(!cache.insert(cache_key(1), frame(), 64, false));
    assert!(cache.slot_mut(&cache_key(0)).is_some());

    assert!(cache.insert(cache_key(1), frame(), 64, true));
    assert_eq!(cache.len(), 1);
    assert!(cache.slot_mut(&cache_key(0)).is_none());

    // A lone oversize frame is not pushed out by an unforced preload.
    assert!(!cache.insert(cache_key(2), frame(), 16, false));
    assert!(cache.slot_mut(&cache_key(1)).is_some());
}

#[test]
fn cell_size_comes_from_window_metrics() {
    assert_eq!(cell_size_from_window_metrics(1920, 1080, 240, 60), Some((8, 18)));
    assert_eq!(cell_size_from_window_metrics(0, 1080, 240, 60), None);
    assert_eq!(cell_size_from_window_metrics(1920, 1080, 0, 60), None);
    assert_eq!(cell_size_from_window_metrics(10, 10, 240, 60), None);
}
