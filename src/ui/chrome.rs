use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, Mode, Screen};
use crate::catalog::display::{full_meta_line, meta_line};
use crate::event::ViewKind;

use super::layout::UiLayout;

fn key_hints(app: &AppState) -> &'static str {
    if app.mode == Mode::Palette {
        return "enter select | esc close";
    }
    match app.screen {
        Screen::Hero => "←/→ browse | enter open | g gallery | ctrl-k works | q quit",
        Screen::Grid => "arrows move | [/] page | f filter | / search | enter open",
        Screen::Lightbox if app.lightbox.zoom().is_active() => {
            "arrows pan | +/- zoom | 0 reset | esc exit zoom"
        }
        Screen::Lightbox => "←/→ browse | z zoom | i info | tab focus | esc close",
    }
}

pub fn draw_chrome(frame: &mut Frame<'_>, layout: UiLayout, app: &AppState, presenter: &str) {
    draw_header(frame, layout.header, app, presenter);
    draw_status(frame, layout.status, app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &AppState, presenter: &str) {
    if area.height == 0 {
        return;
    }
    let mut spans = vec![
        Span::styled(" folio ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("| {} ", app.screen.id()),
            Style::default().fg(Color::Gray),
        ),
    ];
    if let Some(view) = app.active_view() {
        spans.push(Span::raw(format!("| {} ", app.navigator(view).counter())));
    } else {
        spans.push(Span::raw(format!(
            "| {} works | page {}/{} ",
            app.grid.items().len(),
            app.grid.page(),
            app.grid.page_count()
        )));
    }
    if app.screen == Screen::Hero && app.hero.autoplay_enabled() {
        spans.push(Span::styled("| autoplay ", Style::default().fg(Color::DarkGray)));
    }
    if app.screen == Screen::Lightbox && app.lightbox.zoom().is_active() {
        spans.push(Span::raw(format!(
            "| zoom {:.1}x ",
            app.lightbox.zoom().scale()
        )));
    }
    if app.mode == Mode::Palette {
        spans.push(Span::styled("| PALETTE ", Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if !presenter.is_empty() && area.width > 40 {
        frame.render_widget(
            Paragraph::new(format!("{presenter} "))
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }
}

fn draw_status(frame: &mut Frame<'_>, area: Rect, app: &AppState) {
    if area.height == 0 {
        return;
    }
    let text = if app.status.message.is_empty() {
        key_hints(app).to_string()
    } else {
        app.status.message.clone()
    };
    frame.render_widget(
        Paragraph::new(format!(" {text}")).style(Style::default().fg(Color::Gray)),
        area,
    );
    if !app.location.is_empty() {
        frame.render_widget(
            Paragraph::new(format!("{} ", app.location))
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }
}

/// Title, meta and action rows for the work shown by `view`.
pub fn draw_work_info(frame: &mut Frame<'_>, area: Rect, app: &AppState, view: ViewKind) {
    if area.height == 0 {
        return;
    }
    let navigator = app.navigator(view);
    let Some(index) = navigator.current_work() else {
        return;
    };
    let Some(work) = app.dataset.get(index) else {
        return;
    };

    let meta = match view {
        ViewKind::Hero => meta_line(work),
        ViewKind::Lightbox => full_meta_line(work),
    };
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", work.title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {meta}"),
            Style::default().fg(Color::Gray),
        )),
    ];

    let action = app.action_for(index);
    if let Some(label) = action.label() {
        let style = if action.is_interactive() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let hint = if action.is_interactive() { "  (a)" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!(" {label}"), style),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}
