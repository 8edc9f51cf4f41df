use ratatui::Frame;
use ratatui::layout::Rect;

use crate::error::AppResult;
use crate::gallery::{CropRect, RgbaFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKind {
    RatatuiImage,
}

/// Terminal cell rectangle an image is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl From<Rect> for Viewport {
    fn from(area: Rect) -> Self {
        Self {
            x: area.x,
            y: area.y,
            width: area.width.max(1),
            height: area.height.max(1),
        }
    }
}

/// One displayable variant of a decoded artwork: which image, which region of
/// it, and how far it is dimmed (tenths, 10 is full brightness).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub work: usize,
    pub crop: CropRect,
    pub dim_step: u8,
}

impl FrameKey {
    pub fn plain(work: usize) -> Self {
        Self {
            work,
            crop: CropRect::FULL,
            dim_step: 10,
        }
    }
}

pub trait ImagePresenter {
    /// Queries the terminal for a graphics protocol. Called once the alternate
    /// screen is up; a failed query keeps the halfblocks fallback.
    fn initialize_terminal(&mut self) -> AppResult<()> {
        Ok(())
    }

    /// Footer label, e.g. `ratatui-image/kitty`.
    fn status_label(&self) -> String;

    /// Pixel size of one terminal cell when known.
    fn cell_px(&self) -> Option<(u16, u16)> {
        None
    }

    /// Makes `key` the image drawn by the next `render`. `source` is the
    /// undimmed, uncropped decode; the variant is derived off the UI thread.
    fn prepare(&mut self, key: FrameKey, source: &RgbaFrame, viewport: Viewport) -> AppResult<()>;

    /// Forgets the prepared image, e.g. while the grid is on screen.
    fn clear_current(&mut self) {}

    /// Draws the prepared image, or the last one that finished encoding while
    /// it is still pending. Returns false when nothing could be drawn.
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) -> AppResult<bool>;

    fn has_pending_work(&self) -> bool {
        false
    }

    fn drain_background_events(&mut self) -> bool {
        false
    }
}
