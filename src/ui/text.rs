use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Terminal columns `text` occupies.
pub(crate) fn display_width(text: &str) -> usize {
    text.width()
}

/// Cuts `text` to at most `max` columns on a grapheme boundary, marking the
/// cut with `…`.
pub(crate) fn fit_width(text: &str, max: usize) -> Cow<'_, str> {
    if text.width() <= max {
        return Cow::Borrowed(text);
    }
    if max == 0 {
        return Cow::Borrowed("");
    }
    let mut fitted = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width + 1 > max {
            break;
        }
        fitted.push_str(grapheme);
        used += width;
    }
    fitted.push('…');
    Cow::Owned(fitted)
}

#[cfg(test)]
mod tests {
    use super::{display_width, fit_width};

    #[test]
    fn short_text_is_borrowed_unchanged() {
        assert_eq!(fit_width("Dawn", 10), "Dawn");
        assert_eq!(fit_width("Dawn", 0), "");
    }

    #[test]
    fn long_text_is_cut_by_columns_with_ellipsis() {
        assert_eq!(fit_width("Ocean Depths", 6), "Ocean…");
        assert_eq!(fit_width("あいう", 5), "あい…");
        assert_eq!(display_width("あいう"), 6);
    }

    #[test]
    fn combining_marks_stay_with_their_base() {
        let text = "Cafe\u{301} au lait";
        assert_eq!(fit_width(text, 5), "Cafe\u{301}…");
    }
}
