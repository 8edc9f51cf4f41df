use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::gallery::RgbaFrame;

use super::layout::shifted_rect;
use super::text::fit_width;

const UPPER_HALF: &str = "▀";

/// Neighbouring work revealed beside a dragged image.
#[derive(Debug, Clone, Copy)]
pub struct NeighborStrip<'a> {
    pub title: &'a str,
    pub pixels: Option<&'a RgbaFrame>,
}

/// Slides the neighbour in from the edge the image is dragged away from.
/// `offset` is the drag in cells: negative reveals the next work at the right
/// edge, positive the previous work at the left edge.
pub fn draw_neighbor_strip(
    frame: &mut Frame<'_>,
    image_area: Rect,
    offset: i32,
    strip: NeighborStrip<'_>,
) {
    let width = i32::from(image_area.width);
    if offset == 0 || width == 0 {
        return;
    }
    let canvas_shift = if offset < 0 {
        width + offset
    } else {
        offset - width
    };
    let visible = shifted_rect(image_area, canvas_shift, image_area);
    if visible.width == 0 || visible.height == 0 {
        return;
    }

    frame.render_widget(Clear, visible);
    match strip.pixels {
        Some(pixels) => {
            let canvas_x = i32::from(image_area.x) + canvas_shift;
            paint_halfblocks(frame.buffer_mut(), image_area, canvas_x, visible, pixels);
        }
        None => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray));
            let inner = block.inner(visible);
            frame.render_widget(block, visible);
            if inner.width == 0 || inner.height == 0 {
                return;
            }
            let middle = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
            frame.render_widget(
                Paragraph::new(fit_width(strip.title, usize::from(inner.width)).into_owned())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Gray)),
                middle,
            );
        }
    }
}

/// Paints the part of `pixels` that falls inside `visible`. The artwork is
/// fitted to a canvas the size of `image_area` starting at column `canvas_x`.
/// Each cell carries two vertically stacked pixels.
fn paint_halfblocks(
    buf: &mut Buffer,
    image_area: Rect,
    canvas_x: i32,
    visible: Rect,
    pixels: &RgbaFrame,
) {
    if pixels.width == 0 || pixels.height == 0 {
        return;
    }
    let canvas_w = f64::from(image_area.width);
    let canvas_h = f64::from(image_area.height) * 2.0;
    let scale = (canvas_w / f64::from(pixels.width)).min(canvas_h / f64::from(pixels.height));
    let pad_x = (canvas_w - f64::from(pixels.width) * scale) / 2.0;
    let pad_y = (canvas_h - f64::from(pixels.height) * scale) / 2.0;

    let sample = |column: f64, row: f64| -> Color {
        let sx = (column + 0.5 - pad_x) / scale;
        let sy = (row + 0.5 - pad_y) / scale;
        if sx < 0.0 || sy < 0.0 || sx >= f64::from(pixels.width) || sy >= f64::from(pixels.height) {
            return Color::Reset;
        }
        let idx = (sy as usize * pixels.width as usize + sx as usize) * 4;
        match pixels.pixels.get(idx..idx + 3) {
            Some(&[r, g, b]) => Color::Rgb(r, g, b),
            _ => Color::Reset,
        }
    };

    for y in visible.top()..visible.bottom() {
        let row = f64::from(y - image_area.y) * 2.0;
        for x in visible.left()..visible.right() {
            let column = f64::from(i32::from(x) - canvas_x);
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(UPPER_HALF)
                    .set_fg(sample(column, row))
                    .set_bg(sample(column, row + 1.0));
            }
        }
    }
}
