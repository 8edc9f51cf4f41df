use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::palette::PaletteView;

use super::layout::centered_rect;
use super::text::fit_width;

const PROMPT: &str = " > ";
const SELECTED_BG: Color = Color::Rgb(45, 45, 50);

/// Centered popup with the input row, an optional hint row and the candidates.
pub fn draw_palette_overlay(frame: &mut Frame<'_>, area: Rect, view: &PaletteView) {
    if area.is_empty() {
        return;
    }
    let popup = centered_rect(area, area.width.min(72), area.height.clamp(7, 24));
    let block = Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    if inner.height < 3 {
        return;
    }

    let hint = view.assistive_text.as_deref().filter(|text| !text.is_empty());
    let [input_row, rule_row, hint_row, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(u16::from(hint.is_some())),
        Constraint::Min(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(input_line(&view.input, view.cursor, usize::from(inner.width))),
        input_row,
    );
    frame.render_widget(
        Paragraph::new("─".repeat(usize::from(inner.width))).fg(Color::DarkGray),
        rule_row,
    );
    if let Some(hint) = hint {
        frame.render_widget(
            Paragraph::new(format!("   {hint}")).fg(Color::DarkGray),
            hint_row,
        );
    }

    let label_room = usize::from(inner.width).saturating_sub(3);
    let items = view.items.iter().map(|item| {
        let mut spans = vec![Span::raw(fit_width(&item.label, label_room).into_owned())];
        if let Some(detail) = &item.detail {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(detail.clone(), Style::default().fg(Color::DarkGray)));
        }
        ListItem::new(Line::from(spans))
    });
    let list = List::new(items)
        .highlight_symbol(" ┃ ")
        .highlight_spacing(ratatui::widgets::HighlightSpacing::Always)
        .highlight_style(Style::default().bg(SELECTED_BG));
    // ListState scrolls the window so the selection stays visible.
    let mut state = ListState::default().with_selected(
        (!view.items.is_empty()).then(|| view.selected_idx.min(view.items.len() - 1)),
    );
    frame.render_stateful_widget(list, list_area, &mut state);
}

/// Prompt plus the visible slice of the input, with a reversed cell as the
/// caret. `cursor` is in display columns; the text scrolls to keep it shown.
pub(crate) fn input_line(input: &str, cursor: usize, width: usize) -> Line<'static> {
    let room = width.saturating_sub(PROMPT.len()).max(1);
    let scroll = cursor.saturating_sub(room - 1);
    let mut spans = vec![Span::styled(PROMPT, Style::default().fg(Color::White))];
    let mut column = 0;
    let mut caret_drawn = false;
    for ch in input.chars() {
        let start = column;
        column += ch.width().unwrap_or(0);
        if start < scroll {
            continue;
        }
        if column - scroll > room {
            break;
        }
        let at_caret = start == cursor;
        caret_drawn |= at_caret;
        let span = Span::raw(ch.to_string());
        spans.push(if at_caret { span.reversed() } else { span });
    }
    if !caret_drawn {
        spans.push(Span::raw(" ").reversed());
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::style::Modifier;

    use crate::palette::{PaletteItemView, PaletteKind, PaletteView};

    use super::{draw_palette_overlay, input_line};

    fn view(input: &str, cursor: usize, selected_idx: usize, count: usize) -> PaletteView {
        PaletteView {
            title: "Search artworks".to_string(),
            kind: PaletteKind::Works,
            input: input.to_string(),
            cursor,
            assistive_text: Some("Enter: open  Esc: close".to_string()),
            items: (0..count)
                .map(|idx| PaletteItemView {
                    label: format!("Work {idx}"),
                    detail: Some("2024".to_string()),
                    selected: idx == selected_idx,
                })
                .collect(),
            selected_idx,
        }
    }

    fn render(view: &PaletteView, width: u16, height: u16) -> String {
        let mut terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test terminal should initialize");
        terminal
            .draw(|frame| draw_palette_overlay(frame, Rect::new(0, 0, width, height), view))
            .expect("draw should pass");
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..height {
            for x in 0..width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn is_caret(line: &ratatui::text::Line<'_>, idx: usize) -> bool {
        line.spans[idx].style.add_modifier.contains(Modifier::REVERSED)
    }

    #[test]
    fn caret_sits_on_the_character_at_the_cursor() {
        let line = input_line("abc", 1, 12);
        assert_eq!(line.spans[2].content.as_ref(), "b");
        assert!(is_caret(&line, 2));
        assert!(!is_caret(&line, 1));
    }

    #[test]
    fn caret_at_end_is_a_trailing_block() {
        let line = input_line("abc", 3, 12);
        assert_eq!(line.spans.len(), 5);
        assert_eq!(line.spans[4].content.as_ref(), " ");
        assert!(is_caret(&line, 4));
    }

    #[test]
    fn long_input_scrolls_to_keep_the_caret_visible() {
        let line = input_line("abcdefghij", 10, 8);
        let shown: String = line.spans[1..].iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(shown, "ghij ");
    }

    #[test]
    fn wide_characters_render_without_panic() {
        let text = render(&view("あい", 2, 0, 1), 30, 10);
        assert!(text.contains("Work 0"));
    }

    #[test]
    fn overlay_shows_title_hint_and_details() {
        let text = render(&view("wo", 2, 0, 3), 50, 12);
        assert!(text.contains("Search artworks"));
        assert!(text.contains("Enter: open"));
        assert!(text.contains("Work 1  2024"));
    }

    #[test]
    fn selection_below_the_fold_is_scrolled_into_view() {
        let text = render(&view("", 0, 19, 20), 50, 12);
        assert!(text.contains("Work 19"));
        assert!(!text.contains("Work 0 "));
    }
}
