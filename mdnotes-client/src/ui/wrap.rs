use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `text` in terminal cells.
pub fn text_width(text: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(text)).unwrap_or(u16::MAX)
}

/// Break styled lines into rows of at most `width` cells, at character
/// boundaries. A row always takes at least one character, so a zero width
/// still terminates.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let mut rows = Vec::new();

    for line in lines {
        let line_style = line.style;
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut used = 0usize;

        for span in line.spans {
            let mut piece = String::new();
            for ch in span.content.chars() {
                let w = ch.width().unwrap_or(0);
                if used + w > width && used > 0 {
                    if !piece.is_empty() {
                        row.push(Span::styled(std::mem::take(&mut piece), span.style));
                    }
                    rows.push(Line::from(std::mem::take(&mut row)).style(line_style));
                    used = 0;
                }
                piece.push(ch);
                used += w;
            }
            if !piece.is_empty() {
                row.push(Span::styled(piece, span.style));
            }
        }

        rows.push(Line::from(row).style(line_style));
    }

    rows
}

/// Row and column just past the last character of wrapped `rows`.
pub fn end_position(rows: &[Line<'_>], width: u16) -> (u16, u16) {
    let last = rows.len().saturating_sub(1);
    let row = u16::try_from(last).unwrap_or(u16::MAX);
    let col = rows.last().map_or(0, |line| {
        u16::try_from(line.width()).unwrap_or(u16::MAX)
    });

    if width > 0 && col >= width {
        (row.saturating_add(1), 0)
    } else {
        (row, col)
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Style, Stylize};

    use super::*;

    fn texts(rows: &[Line<'_>]) -> Vec<String> {
        rows.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn long_line_breaks_at_width() {
        let rows = wrap_lines(vec![Line::raw("abcdefgh"), Line::raw("")], 3);

        assert_eq!(texts(&rows), vec!["abc", "def", "gh", ""]);
    }

    #[test]
    fn styles_survive_a_break() {
        let rows = wrap_lines(vec![Line::from(vec!["ab".bold(), "cd".into()])], 3);

        assert_eq!(texts(&rows), vec!["abc", "d"]);
        assert_eq!(rows[0].spans[0].style, Style::default().bold());
        assert_eq!(rows[1].spans[0].content, "d");
    }

    #[test]
    fn wide_characters_count_two_cells() {
        let rows = wrap_lines(vec![Line::raw("日本語")], 4);

        assert_eq!(texts(&rows), vec!["日本", "語"]);
        assert_eq!(text_width("日本"), 4);
    }

    #[test]
    fn cursor_moves_to_next_row_after_full_row() {
        let rows = wrap_lines(vec![Line::raw("abcdef")], 3);
        assert_eq!(end_position(&rows, 3), (2, 0));

        let rows = wrap_lines(vec![Line::raw("abcd")], 3);
        assert_eq!(end_position(&rows, 3), (1, 1));
    }

    #[test]
    fn zero_width_still_terminates() {
        let rows = wrap_lines(vec![Line::raw("ab")], 0);

        assert_eq!(texts(&rows), vec!["a", "b"]);
    }
}
