use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::catalog::display::detail_rows;
use crate::gallery::Lightbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightboxRegions {
    pub image: Rect,
    pub controls: Rect,
    pub panel: Option<Rect>,
}

/// Splits the viewer into image, control row and the optional info panel.
pub fn lightbox_regions(viewer: Rect, info_expanded: bool) -> LightboxRegions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(viewer);
    let controls = rows[1];
    if !info_expanded || viewer.width < 40 {
        return LightboxRegions {
            image: rows[0],
            controls,
            panel: None,
        };
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[0]);
    LightboxRegions {
        image: columns[0],
        controls,
        panel: Some(columns[1]),
    }
}

pub fn draw_lightbox_controls(frame: &mut Frame<'_>, area: Rect, lightbox: &Lightbox) {
    if area.height == 0 {
        return;
    }
    let focused = lightbox.focused();
    let mut spans = Vec::new();
    for control in lightbox.controls() {
        let style = if control == focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", control.label()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

pub fn draw_info_panel(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    let Some(work) = app
        .lightbox
        .navigator()
        .current_work()
        .and_then(|index| app.dataset.get(index))
    else {
        return;
    };
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", work.title),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let rows = detail_rows(work);
    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            " No further details.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for row in rows {
        lines.push(Line::raw(""));
        if let Some(label) = row.label {
            lines.push(Line::from(Span::styled(
                format!(" {label}"),
                Style::default().fg(Color::Cyan),
            )));
        }
        lines.push(Line::raw(format!(" {}", row.text)));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
