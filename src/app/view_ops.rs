use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Clear;

use crate::command::ActionId;
use crate::error::AppResult;
use crate::event::ViewKind;
use crate::gallery::RgbaFrame;
use crate::gallery::frame::opacity_step;
use crate::palette::PaletteView;
use crate::presenter::{FrameKey, Viewport};
use crate::ui;

use super::core::{App, RenderSubsystem};
use super::state::{AppState, Screen};
use super::terminal_session::TerminalSurface;

const DEFAULT_CELL_SIZE_PX: (u16, u16) = (10, 20);

pub(super) struct RenderFramePlan {
    pub(super) palette_view: Option<PaletteView>,
    pub(super) preview: Option<NeighborPreview>,
    pub(super) now: Instant,
}

/// The neighbour a drag is pulling into view, with its pixels when cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NeighborPreview {
    pub(crate) work: usize,
    pub(crate) pixels: Option<RgbaFrame>,
}

/// Where the image of the active view is drawn, before any drag offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenAreas {
    pub(crate) viewer: Rect,
    pub(crate) image: Rect,
}

pub(crate) fn resolved_cell_size_px(cell_px: Option<(u16, u16)>) -> (u16, u16) {
    match cell_px {
        Some((width, height)) if width > 0 && height > 0 => (width, height),
        _ => DEFAULT_CELL_SIZE_PX,
    }
}

pub(crate) fn screen_areas(area: Rect, state: &AppState) -> ScreenAreas {
    let layout = ui::split_layout(area, state.active_view().is_some());
    let image = match state.screen {
        Screen::Lightbox => ui::lightbox_regions(layout.viewer, state.lightbox.info_expanded()).image,
        Screen::Hero | Screen::Grid => layout.viewer,
    };
    ScreenAreas {
        viewer: layout.viewer,
        image,
    }
}

impl App {
    pub(crate) fn current_areas<S: TerminalSurface>(session: &S, state: &AppState) -> Option<ScreenAreas> {
        let size = session.size().ok()?;
        let areas = screen_areas(Rect::new(0, 0, size.width, size.height), state);
        (areas.viewer.width > 0 && areas.viewer.height > 0).then_some(areas)
    }

    pub(crate) fn cell_size_px(&self) -> (u16, u16) {
        resolved_cell_size_px(self.render.presenter.cell_px())
    }

    /// Next work while the image is dragged left, previous while dragged right.
    pub(crate) fn neighbor_preview(&self, now: Instant) -> Option<NeighborPreview> {
        let offset = self.state.drag.offset_px(now);
        if offset.abs() < 0.5 {
            return None;
        }
        let navigator = self.state.navigator(self.state.active_view()?);
        let work = navigator.neighbor(if offset < 0.0 { 1 } else { -1 })?;
        if navigator.current_work() == Some(work) {
            return None;
        }
        Some(NeighborPreview {
            work,
            pixels: self.loads.cache.peek_cloned(work),
        })
    }
}

#[derive(Default)]
struct ImageDrawResult {
    pending: bool,
    error: Option<String>,
}

impl RenderSubsystem {
    pub(super) fn render_frame(
        &mut self,
        state: &mut AppState,
        session: &mut impl TerminalSurface,
        plan: RenderFramePlan,
    ) -> AppResult<bool> {
        let RenderFramePlan {
            palette_view,
            preview,
            now,
        } = plan;
        let label = self.presenter.status_label();
        let cell_px = resolved_cell_size_px(self.presenter.cell_px());
        let mut result = ImageDrawResult::default();

        session.draw(|frame| {
            let layout = ui::split_layout(frame.area(), state.active_view().is_some());
            // Clear first so overlays never leave stale cells behind after a screen change.
            frame.render_widget(Clear, layout.viewer);
            ui::draw_chrome(frame, layout, state, &label);

            match state.active_view() {
                None => {
                    self.presenter.clear_current();
                    ui::draw_grid(frame, layout.viewer, state);
                }
                Some(view) => {
                    ui::draw_work_info(frame, layout.info, state, view);
                    let mut image_area = layout.viewer;
                    if view == ViewKind::Lightbox {
                        let regions =
                            ui::lightbox_regions(layout.viewer, state.lightbox.info_expanded());
                        ui::draw_lightbox_controls(frame, regions.controls, &state.lightbox);
                        if let Some(panel) = regions.panel {
                            ui::draw_info_panel(frame, panel, state);
                        }
                        image_area = regions.image;
                    }
                    result = self.draw_view_image(frame, state, view, image_area, cell_px, now);
                    if let Some(preview) = preview.as_ref() {
                        draw_preview_strip(frame, state, image_area, cell_px, preview, now);
                    }
                }
            }

            ui::draw_notices(frame, layout.viewer, &state.notices);
            if let Some(view) = palette_view.as_ref() {
                ui::draw_palette_overlay(frame, layout.viewer, view);
            }
        })?;

        if let Some(err) = result.error {
            state.status.last_action_id = Some(ActionId::LoadImage);
            state.status.message = format!("display error: {err}");
        }
        Ok(result.pending)
    }

    fn draw_view_image(
        &mut self,
        frame: &mut Frame<'_>,
        state: &AppState,
        view: ViewKind,
        image_area: Rect,
        cell_px: (u16, u16),
        now: Instant,
    ) -> ImageDrawResult {
        let mut result = ImageDrawResult::default();
        let navigator = state.navigator(view);
        let layers = navigator.layers();
        let layer = layers.visible();

        let (Some(work), Some(source)) = (layer.work, layer.frame.as_ref()) else {
            self.presenter.clear_current();
            if let Some(title) = navigator
                .pending_work()
                .and_then(|work| state.dataset.get(work))
                .map(|work| work.title.as_str())
            {
                ui::draw_loading_overlay(frame, image_area, title);
            }
            if let Some(failure) = navigator.failure() {
                ui::draw_error_overlay(frame, image_area, &failure.message);
            }
            return result;
        };

        let crop = match view {
            ViewKind::Hero => layer.ken_burns_crop(now),
            ViewKind::Lightbox => state.lightbox.zoom().crop_rect(),
        };
        let width_px = f64::from(image_area.width) * f64::from(cell_px.0);
        let drag_opacity = state.drag.opacity(width_px);
        let fade = f64::from(layers.fade_progress(now));
        let key = FrameKey {
            work,
            crop,
            dim_step: opacity_step(fade * drag_opacity),
        };

        let offset_cells = (state.drag.offset_px(now) / f64::from(cell_px.0)).round() as i32;
        let draw_area = ui::shifted_rect(image_area, offset_cells, image_area);
        if draw_area.width == 0 {
            return result;
        }

        if let Err(err) = self.presenter.prepare(key, source, Viewport::from(draw_area)) {
            result.error = Some(err.brief());
            return result;
        }
        match self.presenter.render(frame, draw_area) {
            Ok(true) => {}
            Ok(false) => {
                result.pending = true;
                if let Some(work) = state.dataset.get(work) {
                    ui::draw_loading_overlay(frame, image_area, &work.title);
                }
            }
            Err(err) => result.error = Some(err.brief()),
        }

        if let Some(failure) = navigator.failure() {
            ui::draw_error_overlay(frame, image_area, &failure.message);
        }
        result
    }
}

fn draw_preview_strip(
    frame: &mut Frame<'_>,
    state: &AppState,
    image_area: Rect,
    cell_px: (u16, u16),
    preview: &NeighborPreview,
    now: Instant,
) {
    let Some(work) = state.dataset.get(preview.work) else {
        return;
    };
    let offset_cells = (state.drag.offset_px(now) / f64::from(cell_px.0)).round() as i32;
    ui::draw_neighbor_strip(
        frame,
        image_area,
        offset_cells,
        ui::NeighborStrip {
            title: &work.title,
            pixels: preview.pixels.as_ref(),
        },
    );
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::app::{AppState, Screen};

    use super::{resolved_cell_size_px, screen_areas};

    #[test]
    fn cell_size_falls_back_for_missing_or_zero_metrics() {
        assert_eq!(resolved_cell_size_px(Some((9, 18))), (9, 18));
        assert_eq!(resolved_cell_size_px(Some((0, 18))), (10, 20));
        assert_eq!(resolved_cell_size_px(None), (10, 20));
    }

    #[test]
    fn lightbox_image_area_shrinks_for_info_panel() {
        let mut state = AppState::for_tests();
        let area = Rect::new(0, 0, 120, 40);
        let hero = screen_areas(area, &state);
        assert_eq!(hero.image, hero.viewer);

        state.screen = Screen::Lightbox;
        let collapsed = screen_areas(area, &state);
        assert_eq!(collapsed.image.width, collapsed.viewer.width);
        assert_eq!(collapsed.image.height, collapsed.viewer.height - 1);

        state.lightbox.toggle_info();
        let expanded = screen_areas(area, &state);
        assert!(expanded.image.width < expanded.viewer.width);
    }
}
