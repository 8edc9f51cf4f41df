use fast_image_resize as fr;
use image::{DynamicImage, RgbaImage};
use ratatui::layout::Rect;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::error::{AppError, AppResult};
use crate::gallery::RgbaFrame;
use crate::gallery::frame::{crop_frame, dim_frame};

use super::traits::FrameKey;

const DOWNSCALE_FILTER: fr::FilterType = fr::FilterType::CatmullRom;

/// Builds the pixels for one presenter variant: crop, shrink to what `area`
/// can show, then dim. Dimming last touches the fewest pixels.
pub(crate) fn derive_variant(
    source: &RgbaFrame,
    key: FrameKey,
    area: Rect,
    cell_px: (u16, u16),
) -> AppResult<RgbaFrame> {
    let cropped = crop_frame(source, key.crop);
    let limit = area_limit_px(area, cell_px);
    let shrunk = match fit_within(cropped.width, cropped.height, limit.0, limit.1) {
        Some((width, height)) => resize(&cropped, width, height)?,
        None => cropped,
    };
    Ok(dim_frame(&shrunk, key.dim_step))
}

pub(crate) fn to_protocol(picker: &Picker, frame: RgbaFrame) -> AppResult<StatefulProtocol> {
    let RgbaFrame {
        width,
        height,
        pixels,
    } = frame;
    let image = RgbaImage::from_raw(width, height, pixels.to_vec())
        .ok_or_else(|| AppError::invalid_argument("frame buffer does not match its size"))?;
    Ok(picker.new_resize_protocol(DynamicImage::ImageRgba8(image)))
}

fn area_limit_px(area: Rect, cell_px: (u16, u16)) -> (u32, u32) {
    (
        u32::from(area.width.max(1)) * u32::from(cell_px.0.max(1)),
        u32::from(area.height.max(1)) * u32::from(cell_px.1.max(1)),
    )
}

/// Largest size with the source aspect ratio inside the limit, or None when
/// the source already fits. Never upscales.
pub(crate) fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> Option<(u32, u32)> {
    if [width, height, max_width, max_height].contains(&0) {
        return None;
    }
    if width <= max_width && height <= max_height {
        return None;
    }
    let (width, height) = (u64::from(width), u64::from(height));
    let (max_width, max_height) = (u64::from(max_width), u64::from(max_height));
    // Compare max_width/width against max_height/height without floats.
    let (fit_width, fit_height) = if max_width * height <= max_height * width {
        (max_width, (height * max_width / width).clamp(1, max_height))
    } else {
        ((width * max_height / height).clamp(1, max_width), max_height)
    };
    Some((fit_width as u32, fit_height as u32))
}

fn resize(frame: &RgbaFrame, width: u32, height: u32) -> AppResult<RgbaFrame> {
    let src = fr::images::Image::from_vec_u8(
        frame.width,
        frame.height,
        frame.pixels_to_vec(),
        fr::PixelType::U8x4,
    )
    .map_err(|_| AppError::invalid_argument("frame buffer does not match its size"))?;
    let mut dst = fr::images::Image::new(width, height, fr::PixelType::U8x4);
    fr::Resizer::new()
        .resize(
            &src,
            &mut dst,
            &fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(DOWNSCALE_FILTER)),
        )
        .map_err(|err| AppError::unsupported(format!("image downscale failed: {err}")))?;
    Ok(RgbaFrame {
        width,
        height,
        pixels: dst.into_vec().into(),
    })
}
