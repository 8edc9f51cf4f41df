use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub header: Rect,
    pub viewer: Rect,
    /// Title, meta and action rows under the image. Empty on the grid screen.
    pub info: Rect,
    pub status: Rect,
}

pub const INFO_ROWS: u16 = 3;

pub fn split_layout(area: Rect, show_info: bool) -> UiLayout {
    let info_height = if show_info { INFO_ROWS } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(info_height),
            Constraint::Length(1),
        ])
        .split(area);

    UiLayout {
        header: chunks[0],
        viewer: chunks[1],
        info: chunks[2],
        status: chunks[3],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// `area` moved horizontally by `offset` cells and clipped to `bounds`.
pub(crate) fn shifted_rect(area: Rect, offset: i32, bounds: Rect) -> Rect {
    let left = i32::from(area.x) + offset;
    let right = left + i32::from(area.width);
    let clipped_left = left.max(i32::from(bounds.x));
    let clipped_right = right.min(i32::from(bounds.right()));
    if clipped_right <= clipped_left {
        return Rect::new(bounds.x, area.y, 0, area.height);
    }
    Rect::new(
        clipped_left as u16,
        area.y,
        (clipped_right - clipped_left) as u16,
        area.height,
    )
}
