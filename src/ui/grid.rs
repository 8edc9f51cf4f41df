use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::AppState;
use crate::catalog::display::meta_line;
use crate::gallery::grid::filter_keys;
use crate::gallery::{GridView, PageEntry};

use super::text::fit_width;

const MIN_TILE_HEIGHT: u16 = 4;
const MAX_TILE_HEIGHT: u16 = 7;
const CURRENT_MARKER: &str = "● ";

struct GridRegions {
    filter_bar: Rect,
    tiles: Rect,
    pager: Rect,
}

fn grid_regions(area: Rect) -> GridRegions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
    GridRegions {
        filter_bar: chunks[0],
        tiles: chunks[1],
        pager: chunks[2],
    }
}

/// Tile rectangles in row-major order. Rows that do not fit are left out.
pub(crate) fn tile_rects(area: Rect, columns: usize, count: usize) -> Vec<Rect> {
    let columns = columns.max(1);
    if count == 0 || area.width == 0 || area.height == 0 {
        return Vec::new();
    }
    let rows = count.div_ceil(columns) as u16;
    let tile_height = (area.height / rows.max(1)).clamp(MIN_TILE_HEIGHT, MAX_TILE_HEIGHT);
    let tile_width = area.width / columns as u16;
    if tile_width == 0 {
        return Vec::new();
    }

    (0..count)
        .map_while(|offset| {
            let row = (offset / columns) as u16;
            let column = (offset % columns) as u16;
            let y = area.y + row * tile_height;
            (y + tile_height <= area.bottom())
                .then(|| Rect::new(area.x + column * tile_width, y, tile_width, tile_height))
        })
        .collect()
}

/// Page offset of the tile under a click at (`x`, `y`) inside `viewer`.
pub fn tile_at(viewer: Rect, grid: &GridView, x: u16, y: u16) -> Option<usize> {
    let regions = grid_regions(viewer);
    tile_rects(regions.tiles, grid.columns(), grid.page_items().len())
        .iter()
        .position(|rect| {
            x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
        })
}

pub fn draw_grid(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    if area.width == 0 || area.height < 3 {
        return;
    }
    let regions = grid_regions(area);
    draw_filter_bar(frame, regions.filter_bar, app);

    let grid = &app.grid;
    let items = grid.page_items();
    if items.is_empty() {
        let message = if grid.term().is_empty() {
            "No works in this year".to_string()
        } else {
            format!("No works match \"{}\"", grid.term())
        };
        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
            regions.tiles,
        );
    }

    let rects = tile_rects(regions.tiles, grid.columns(), items.len());
    for (offset, (rect, index)) in rects.iter().zip(items).enumerate() {
        draw_tile(frame, *rect, app, *index, offset == grid.selection());
    }

    draw_pager(frame, regions.pager, grid);
}

fn draw_filter_bar(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    let active = app.grid.filter();
    let mut spans = vec![Span::raw(" ")];
    for key in filter_keys(&app.dataset) {
        let style = if key == active {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", key.label()), style));
        spans.push(Span::raw(" "));
    }
    if !app.grid.term().is_empty() {
        spans.push(Span::styled(
            format!("| search: {}", app.grid.term()),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_tile(frame: &mut Frame<'_>, area: Rect, app: &AppState, index: usize, selected: bool) {
    let Some(work) = app.dataset.get(index) else {
        return;
    };
    let border = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title_style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let room = usize::from(inner.width);
    let title = if app.grid.is_current(index) {
        Line::from(vec![
            Span::styled(CURRENT_MARKER, Style::default().fg(Color::Yellow)),
            Span::styled(
                fit_width(&work.title, room.saturating_sub(CURRENT_MARKER.width())).into_owned(),
                title_style,
            ),
        ])
    } else {
        Line::from(Span::styled(fit_width(&work.title, room).into_owned(), title_style))
    };
    let lines = vec![
        title,
        Line::from(Span::styled(
            fit_width(&meta_line(work), room).into_owned(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            work.effective_availability().label(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_pager(frame: &mut Frame<'_>, area: Rect, grid: &GridView) {
    let entries = grid.page_window();
    if entries.is_empty() {
        return;
    }
    let mut spans = vec![Span::raw("‹ ")];
    for entry in entries {
        match entry {
            PageEntry::Page(page) if page == grid.page() => spans.push(Span::styled(
                format!("{page}"),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            PageEntry::Page(page) => spans.push(Span::styled(
                format!("{page}"),
                Style::default().fg(Color::Gray),
            )),
            PageEntry::Ellipsis => spans.push(Span::raw("…")),
        }
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw("›"));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
