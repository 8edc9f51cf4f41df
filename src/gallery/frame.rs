use std::io::Cursor;
use std::sync::Arc;

use image::ImageReader;

use crate::error::{AppError, AppResult};

/// Decoded RGBA8 pixels shared between the cache, layers and the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl RgbaFrame {
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels_to_vec(&self) -> Vec<u8> {
        self.pixels.as_ref().to_vec()
    }

    pub fn decode(locator: &str, bytes: &[u8]) -> AppResult<Self> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|source| AppError::image_load(locator, source))?
            .decode()
            .map_err(|source| AppError::image_load(locator, source))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            pixels: image.into_raw().into(),
        })
    }
}

/// Normalized source region in thousandths of the image size.
///
/// Integer units keep the region usable as part of an encode cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CropRect {
    pub const FULL: Self = Self {
        x: 0,
        y: 0,
        width: 1000,
        height: 1000,
    };

    pub fn is_full(self) -> bool {
        self == Self::FULL
    }

    /// Region of `1/scale` of the image centred on `(center_x, center_y)`,
    /// shifted as needed to stay inside the image.
    pub fn around(scale: f32, center_x: f32, center_y: f32) -> Self {
        if !scale.is_finite() || scale <= 1.0 {
            return Self::FULL;
        }
        let size = ((1000.0 / scale).round() as u16).clamp(1, 1000);
        let half = f32::from(size) / 2.0;
        let place = |center: f32| -> u16 {
            let center = center.clamp(0.0, 1.0) * 1000.0;
            let origin = (center - half).round().clamp(0.0, f32::from(1000 - size));
            origin as u16
        };
        Self {
            x: place(center_x),
            y: place(center_y),
            width: size,
            height: size,
        }
    }
}

pub(crate) fn crop_frame(frame: &RgbaFrame, crop: CropRect) -> RgbaFrame {
    if crop.is_full() || frame.width == 0 || frame.height == 0 {
        return frame.clone();
    }
    let scale = |value: u16, total: u32| -> u32 {
        ((u64::from(value) * u64::from(total)) / 1000) as u32
    };
    let origin_x = scale(crop.x, frame.width).min(frame.width.saturating_sub(1));
    let origin_y = scale(crop.y, frame.height).min(frame.height.saturating_sub(1));
    let copy_width = scale(crop.width, frame.width)
        .max(1)
        .min(frame.width - origin_x);
    let copy_height = scale(crop.height, frame.height)
        .max(1)
        .min(frame.height - origin_y);

    let src_stride = frame.width as usize * 4;
    let row_bytes = copy_width as usize * 4;
    let mut pixels = Vec::with_capacity(row_bytes * copy_height as usize);
    for row in 0..copy_height as usize {
        let start = (origin_y as usize + row) * src_stride + origin_x as usize * 4;
        pixels.extend_from_slice(&frame.pixels[start..start + row_bytes]);
    }

    RgbaFrame {
        width: copy_width,
        height: copy_height,
        pixels: pixels.into(),
    }
}

/// Opacity quantized to tenths so drag dimming reuses encoded frames.
pub fn opacity_step(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 10.0).round() as u8
}

pub(crate) fn dim_frame(frame: &RgbaFrame, step: u8) -> RgbaFrame {
    if step >= 10 {
        return frame.clone();
    }
    let factor = u16::from(step);
    let mut pixels = frame.pixels_to_vec();
    for pixel in pixels.chunks_exact_mut(4) {
        for channel in &mut pixel[..3] {
            *channel = ((u16::from(*channel) * factor) / 10) as u8;
        }
    }
    RgbaFrame {
        width: frame.width,
        height: frame.height,
        pixels: pixels.into(),
    }
}

#[cfg(test)]
pub(crate) fn solid_frame(width: u32, height: u32, value: u8) -> RgbaFrame {
    RgbaFrame {
        width,
        height,
        pixels: vec![value; width as usize * height as usize * 4].into(),
    }
}
