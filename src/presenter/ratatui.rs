use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Clear;
use ratatui_image::StatefulImage;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::gallery::{CropRect, RgbaFrame};

use super::encode::{EncodeJob, EncodeOutcome, EncodeWorker, fit_mode};
use super::image_ops::fit_within;
use super::protocol_cache::{
    DEFAULT_BUDGET_BYTES, DEFAULT_MAX_ENTRIES, ProtocolCache, ProtocolKey, ProtocolSlot,
};
use super::terminal_cell::{picker_with_resolved_cell_size, protocol_type_label};
use super::traits::{FrameKey, ImagePresenter, Viewport};

const ENCODE_FAILED: &str = "failed to encode terminal image";

/// Presenter backed by `ratatui-image`. Encoding runs on a worker thread; the
/// UI thread only draws protocols that are already built.
pub struct RatatuiImagePresenter {
    picker: Picker,
    protocol_label: &'static str,
    queried: bool,
    pub(crate) cache: ProtocolCache,
    current: Option<ProtocolKey>,
    /// Last key drawn from a ready protocol; stays up while `current` encodes.
    on_screen: Option<ProtocolKey>,
    generation: u64,
    last_encode: Option<Duration>,
    worker: EncodeWorker,
}

impl Default for RatatuiImagePresenter {
    fn default() -> Self {
        Self::with_cache_limits(DEFAULT_MAX_ENTRIES, DEFAULT_BUDGET_BYTES)
    }
}

impl RatatuiImagePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_limits(max_entries: usize, budget_bytes: usize) -> Self {
        Self {
            picker: Picker::halfblocks(),
            protocol_label: "halfblocks",
            queried: false,
            cache: ProtocolCache::new(max_entries, budget_bytes),
            current: None,
            on_screen: None,
            generation: 0,
            last_encode: None,
            worker: EncodeWorker::spawn(),
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_hit_rate(&self) -> f64 {
        self.cache.hit_rate()
    }

    pub fn last_encode_duration(&self) -> Option<Duration> {
        self.last_encode
    }

    pub(crate) fn shutdown_worker(&mut self) {
        self.worker.shutdown();
    }

    /// Applies finished and superseded encodes. True when the current image changed.
    fn apply_encode_outcomes(&mut self) -> bool {
        let mut current_changed = false;
        while let Some(outcome) = self.worker.try_next() {
            let key = match outcome {
                EncodeOutcome::Finished {
                    key,
                    protocol,
                    elapsed,
                } => {
                    self.last_encode = Some(elapsed);
                    if let Some(slot) = self.cache.slot_mut(&key) {
                        *slot = match protocol {
                            Some(protocol) => ProtocolSlot::Ready(protocol),
                            None => {
                                warn!(work = key.frame.work, "terminal encode failed");
                                ProtocolSlot::Failed
                            }
                        };
                    }
                    key
                }
                EncodeOutcome::Superseded { key, source } => {
                    if let Some(slot) = self.cache.slot_mut(&key) {
                        *slot = ProtocolSlot::Pending(source);
                    }
                    key
                }
            };
            current_changed |= self.current == Some(key);
        }
        current_changed
    }

    /// Starts encoding `key` if its source is still pending. False when the
    /// worker could not take the job.
    fn ensure_encoding(&mut self, key: ProtocolKey, area: Rect) -> bool {
        let cell_px = self.picker.font_size();
        let Some(slot) = self.cache.slot_mut(&key) else {
            return true;
        };
        if !matches!(slot, ProtocolSlot::Pending(_)) {
            return true;
        }
        let ProtocolSlot::Pending(source) = std::mem::replace(slot, ProtocolSlot::Encoding) else {
            return true;
        };

        let (width, height) = cropped_size(&source, key.frame.crop);
        let job = EncodeJob {
            key,
            picker: self.picker.clone(),
            source,
            area: centered_fit_area(width, height, cell_px, area),
            generation: self.generation,
        };
        if self.worker.submit(job) {
            return true;
        }
        if let Some(slot) = self.cache.slot_mut(&key) {
            *slot = ProtocolSlot::Failed;
        }
        false
    }

    /// Draws `key` if its protocol is ready.
    fn draw_ready(&mut self, frame: &mut Frame<'_>, area: Rect, key: ProtocolKey) -> AppResult<bool> {
        let Some(slot) = self.cache.slot_mut(&key) else {
            return Ok(false);
        };
        let ProtocolSlot::Ready(protocol) = slot else {
            return Ok(false);
        };
        let size = protocol.size_for(fit_mode(), area);
        let target = center_rect_within(area, size.width, size.height);
        frame.render_widget(Clear, target);
        frame.render_stateful_widget(
            StatefulImage::<StatefulProtocol>::default().resize(fit_mode()),
            target,
            &mut **protocol,
        );
        if let Some(Err(_)) = protocol.last_encoding_result() {
            *slot = ProtocolSlot::Failed;
            return Err(AppError::unsupported(ENCODE_FAILED));
        }
        Ok(true)
    }
}

impl ImagePresenter for RatatuiImagePresenter {
    fn initialize_terminal(&mut self) -> AppResult<()> {
        if self.queried {
            return Ok(());
        }
        self.queried = true;

        match Picker::from_query_stdio() {
            Ok(picker) => {
                let protocol_type = picker.protocol_type();
                self.protocol_label = protocol_type_label(protocol_type);
                self.picker = picker_with_resolved_cell_size(picker, protocol_type);
                // Anything encoded so far used the halfblocks picker.
                self.cache.clear();
                self.current = None;
                self.on_screen = None;
                debug!(protocol = self.protocol_label, "terminal graphics detected");
            }
            Err(err) => debug!(error = ?err, "graphics query failed; using halfblocks"),
        }
        Ok(())
    }

    fn status_label(&self) -> String {
        format!("ratatui-image/{}", self.protocol_label)
    }

    fn cell_px(&self) -> Option<(u16, u16)> {
        Some(self.picker.font_size())
    }

    fn prepare(&mut self, key: FrameKey, source: &RgbaFrame, viewport: Viewport) -> AppResult<()> {
        self.apply_encode_outcomes();
        let key = ProtocolKey {
            frame: key,
            viewport,
        };
        if !self.cache.touch(&key) {
            self.cache.insert(key, source.clone(), source.byte_len(), true);
        }
        if self.current != Some(key) {
            self.generation = self.generation.wrapping_add(1);
            self.current = Some(key);
        }
        Ok(())
    }

    fn clear_current(&mut self) {
        self.current = None;
        self.on_screen = None;
    }

    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) -> AppResult<bool> {
        self.apply_encode_outcomes();
        let Some(key) = self.current else {
            return Ok(false);
        };
        if area.is_empty() {
            return Ok(false);
        }

        if !self.ensure_encoding(key, area) {
            return Err(AppError::unsupported(ENCODE_FAILED));
        }
        if self.draw_ready(frame, area, key)? {
            self.on_screen = Some(key);
            return Ok(true);
        }
        if matches!(self.cache.slot_mut(&key), Some(ProtocolSlot::Failed)) {
            return Err(AppError::unsupported(ENCODE_FAILED));
        }

        match self.on_screen {
            Some(previous) if previous != key => self.draw_ready(frame, area, previous),
            _ => Ok(false),
        }
    }

    fn has_pending_work(&self) -> bool {
        self.cache.any_encoding()
    }

    fn drain_background_events(&mut self) -> bool {
        self.apply_encode_outcomes()
    }
}

impl Drop for RatatuiImagePresenter {
    fn drop(&mut self) {
        self.worker.shutdown();
    }
}

/// Pixel size of the crop region; crop fields are thousandths of the source.
fn cropped_size(frame: &RgbaFrame, crop: CropRect) -> (u32, u32) {
    let part = |fraction: u16, total: u32| {
        ((u64::from(fraction) * u64::from(total)) / 1000).max(1) as u32
    };
    (part(crop.width, frame.width), part(crop.height, frame.height))
}

/// Cell rectangle inside `area` that an image of the given pixel size fills
/// when scaled to fit.
fn centered_fit_area(width_px: u32, height_px: u32, cell_px: (u16, u16), area: Rect) -> Rect {
    if area.is_empty() {
        return area;
    }
    let cell_w = u32::from(cell_px.0.max(1));
    let cell_h = u32::from(cell_px.1.max(1));
    let (fit_w, fit_h) = fit_within(
        width_px,
        height_px,
        u32::from(area.width) * cell_w,
        u32::from(area.height) * cell_h,
    )
    .unwrap_or((width_px, height_px));

    let cells = |px: u32, cell: u32, max: u16| px.div_ceil(cell).clamp(1, u32::from(max)) as u16;
    center_rect_within(
        area,
        cells(fit_w, cell_w, area.width),
        cells(fit_h, cell_h, area.height),
    )
}

fn center_rect_within(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.clamp(1, area.width.max(1));
    let height = height.clamp(1, area.height.max(1));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}
