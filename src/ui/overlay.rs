use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::NoticeState;
use crate::onboarding::TIP_TEXT;

use super::layout::centered_rect;
use super::text::{display_width, fit_width};

/// Clears a centered box of at most `width` x `height` inside `area`, frames
/// it, and returns the inner area. None when there is no room to draw.
fn framed_popup(
    frame: &mut Frame<'_>,
    area: Rect,
    (width, height): (u16, u16),
    title: Option<&str>,
    color: Color,
) -> Option<Rect> {
    if area.is_empty() {
        return None;
    }
    let popup = centered_rect(area, area.width.min(width), area.height.min(height));
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    if let Some(title) = title {
        block = block.title(format!(" {title} "));
    }
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    (!inner.is_empty()).then_some(inner)
}

fn centered_lines(frame: &mut Frame<'_>, area: Rect, lines: Vec<Line<'_>>) {
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

pub fn draw_loading_overlay(frame: &mut Frame<'_>, area: Rect, title: &str) {
    let Some(inner) = framed_popup(frame, area, (40, 3), None, Color::Yellow) else {
        return;
    };
    let room = usize::from(inner.width).saturating_sub(11);
    let text = format!("Loading {}...", fit_width(title, room));
    centered_lines(frame, inner, vec![Line::raw(text)]);
}

/// Failed-load panel. The previous image, if any, stays underneath.
pub fn draw_error_overlay(frame: &mut Frame<'_>, area: Rect, message: &str) {
    let Some(inner) = framed_popup(frame, area, (52, 5), Some("Image unavailable"), Color::Red)
    else {
        return;
    };
    centered_lines(
        frame,
        inner,
        vec![
            Line::raw(message.to_string()),
            Line::raw("press r to retry").fg(Color::DarkGray),
        ],
    );
}

/// Onboarding tip, lightbox hint and toast, stacked upward from the bottom of `area`.
pub fn draw_notices(frame: &mut Frame<'_>, area: Rect, notices: &NoticeState) {
    let texts = [
        notices.tip.then_some(TIP_TEXT),
        notices.hint.as_ref().map(|hint| hint.text.as_str()),
        notices.toast.as_ref().map(|toast| toast.text.as_str()),
    ];

    let mut bottom = area.bottom();
    for text in texts.into_iter().flatten().rev() {
        if area.width < 5 || bottom < area.y + 3 {
            break;
        }
        let text = fit_width(text, usize::from(area.width - 4));
        let width = display_width(&text) as u16 + 4;
        let popup = Rect::new(area.x + (area.width - width) / 2, bottom - 3, width, 3);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text.into_owned())
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray))),
            popup,
        );
        bottom -= 3;
    }
}

/// Whole-screen replacement shown when the dataset cannot be loaded.
pub fn draw_dataset_error(frame: &mut Frame<'_>, message: &str) {
    let area = frame.area();
    let Some(inner) = framed_popup(frame, area, (70, 8), Some("folio"), Color::Red) else {
        return;
    };
    centered_lines(
        frame,
        inner,
        vec![
            Line::raw("Failed to load portfolio. Please check the dataset file.")
                .style(Style::default().add_modifier(Modifier::BOLD)),
            Line::default(),
            Line::raw(message.to_string()),
            Line::default(),
            Line::raw("press q to quit").fg(Color::DarkGray),
        ],
    );
}
