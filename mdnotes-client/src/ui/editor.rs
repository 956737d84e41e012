use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph, Wrap},
};

use super::{
    Focus, focused_border,
    preview::preview_lines,
    wrap::{end_position, text_width, wrap_lines},
};
use crate::{
    keymap::{Action, KeyChord, Keymap, ShortcutId},
    state::NotesState,
};

/// Title field above two panes: raw markdown on the left, live preview on
/// the right.
///
/// The save shortcut exists only while the view is mounted. The input pane
/// scrolls to keep the cursor in view; the preview stays pinned to the end of
/// the document unless scrolled back.
#[derive(Debug, Default)]
pub struct EditorView {
    shortcuts: Vec<ShortcutId>,
    input_scroll: u16,
    preview_back: u16,
}

impl EditorView {
    pub fn mount(&mut self, keymap: &mut Keymap) {
        if self.is_mounted() {
            return;
        }
        self.shortcuts = vec![
            keymap.register(KeyChord::ctrl('s'), Action::Save),
            keymap.register(KeyChord::new(KeyCode::Char('s'), KeyModifiers::SUPER), Action::Save),
        ];
    }

    pub fn unmount(&mut self, keymap: &mut Keymap) {
        for id in self.shortcuts.drain(..) {
            keymap.unregister(id);
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.shortcuts.is_empty()
    }

    pub const fn input_scroll(&self) -> u16 {
        self.input_scroll
    }

    /// Move the preview `rows` further away from the end of the document.
    pub const fn scroll_preview_up(&mut self, rows: u16) {
        self.preview_back = self.preview_back.saturating_add(rows);
    }

    pub const fn scroll_preview_down(&mut self, rows: u16) {
        self.preview_back = self.preview_back.saturating_sub(rows);
    }

    /// Pin the preview to the end of the document again.
    pub const fn follow_end(&mut self) {
        self.preview_back = 0;
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &NotesState, focus: Focus) {
        let [title_area, panes_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
        let [input_area, preview_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(panes_area);

        let title = if state.buffer.title.is_empty() {
            Line::styled("Note title", Style::default().fg(Color::DarkGray))
        } else {
            Line::styled(
                state.buffer.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )
        };
        frame.render_widget(
            Paragraph::new(title).block(
                Block::bordered()
                    .title(" Title ")
                    .border_style(focused_border(focus == Focus::Title)),
            ),
            title_area,
        );

        let cursor = self.render_input(frame, input_area, state, focus);
        self.render_preview(frame, preview_area, state);

        match focus {
            Focus::Title => {
                let x = title_area
                    .x
                    .saturating_add(1)
                    .saturating_add(text_width(&state.buffer.title));
                frame.set_cursor_position((
                    x.min(title_area.right().saturating_sub(2)),
                    title_area.y.saturating_add(1),
                ));
            }
            Focus::Content => frame.set_cursor_position(cursor),
            Focus::Search | Focus::List => {}
        }
    }

    /// Draws the input pane and returns where the cursor belongs in it.
    fn render_input(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &NotesState,
        focus: Focus,
    ) -> (u16, u16) {
        let block = Block::bordered()
            .title(" Markdown Input ")
            .border_style(focused_border(focus == Focus::Content));
        let inner = block.inner(area);

        if state.buffer.content.is_empty() {
            self.input_scroll = 0;
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from("# Start typing..."),
                    Line::default(),
                    Line::from("Use markdown to format your content."),
                ])
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: false })
                .block(block),
                area,
            );
            return (inner.x, inner.y);
        }

        let lines = state
            .buffer
            .content
            .split('\n')
            .map(|line| Line::raw(line.to_string()))
            .collect();
        let rows = wrap_lines(lines, inner.width);
        let (row, col) = end_position(&rows, inner.width);

        // same rule as keeping an editor's cursor line on screen
        if row < self.input_scroll {
            self.input_scroll = row;
        } else if inner.height > 0 && row >= self.input_scroll.saturating_add(inner.height) {
            self.input_scroll = row.saturating_add(1) - inner.height;
        }

        frame.render_widget(
            Paragraph::new(rows)
                .scroll((self.input_scroll, 0))
                .block(block),
            area,
        );

        let x = inner.x.saturating_add(col);
        let y = inner.y.saturating_add(row - self.input_scroll);
        (
            x.min(inner.right().saturating_sub(1)),
            y.min(inner.bottom().saturating_sub(1)),
        )
    }

    fn render_preview(&mut self, frame: &mut Frame, area: Rect, state: &NotesState) {
        let block = Block::bordered().title(" Live Preview ");
        let inner = block.inner(area);

        let rows = wrap_lines(preview_lines(&state.buffer.preview()), inner.width);
        let total = u16::try_from(rows.len()).unwrap_or(u16::MAX);
        let max_scroll = total.saturating_sub(inner.height);
        self.preview_back = self.preview_back.min(max_scroll);

        frame.render_widget(
            Paragraph::new(rows)
                .scroll((max_scroll - self.preview_back, 0))
                .block(block),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use ratatui::{Terminal, backend::TestBackend, layout::Position};

    // 84x27: input pane inner area is x 1..41, y 4..26; preview inner is x 43..83
    const INPUT_COLS: std::ops::Range<usize> = 1..41;
    const PREVIEW_COLS: std::ops::Range<usize> = 43..83;

    fn draw(editor: &mut EditorView, content: &str) -> (Vec<String>, Position) {
        let mut state = NotesState::new();
        state.buffer.content = content.to_string();
        let mut terminal = Terminal::new(TestBackend::new(84, 27)).unwrap();

        terminal
            .draw(|frame| editor.render(frame, frame.area(), &state, Focus::Content))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        let rows = buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect();
        (rows, terminal.get_cursor_position().unwrap())
    }

    fn pane(rows: &[String], cols: std::ops::Range<usize>) -> String {
        rows.iter()
            .map(|row| row.chars().skip(cols.start).take(cols.len()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    #[test]
    fn mount_registers_save_and_unmount_removes_it() {
        let mut keymap = Keymap::default();
        let mut editor = EditorView::default();

        editor.mount(&mut keymap);
        assert_eq!(keymap.resolve(&ctrl_s()), Some(Action::Save));
        assert_eq!(
            keymap.resolve(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::SUPER)),
            Some(Action::Save)
        );

        editor.unmount(&mut keymap);
        assert_eq!(keymap.resolve(&ctrl_s()), None);
        assert!(!editor.is_mounted());
    }

    #[test]
    fn remounting_does_not_leak_listeners() {
        let mut keymap = Keymap::default();
        let mut editor = EditorView::default();

        for _ in 0..3 {
            editor.mount(&mut keymap);
            editor.mount(&mut keymap);
            assert_eq!(keymap.bound_to(Action::Save), 2);
            editor.unmount(&mut keymap);
            assert_eq!(keymap.bound_to(Action::Save), 0);
        }
    }

    #[test]
    fn input_follows_the_line_being_typed() {
        let content = (0..60)
            .map(|i| format!("line{i:02}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut editor = EditorView::default();

        let (rows, cursor) = draw(&mut editor, &content);
        let input = pane(&rows, INPUT_COLS);

        assert!(input.contains("line59"), "{input}");
        assert!(!input.contains("line00"), "{input}");
        assert_eq!(editor.input_scroll(), 38);
        assert_eq!(cursor, Position::new(7, 25));
        assert!(rows[25].contains("line59"));
    }

    #[test]
    fn cursor_lands_after_soft_wrapped_text() {
        let mut editor = EditorView::default();

        let (_, cursor) = draw(&mut editor, &"x".repeat(100));

        assert_eq!(cursor, Position::new(21, 6));
        assert_eq!(editor.input_scroll(), 0);
    }

    #[test]
    fn preview_shows_the_end_until_scrolled_back() {
        let content = (0..60)
            .map(|i| format!("para{i:02}"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let mut editor = EditorView::default();

        let (rows, _) = draw(&mut editor, &content);
        let preview = pane(&rows, PREVIEW_COLS);
        assert!(preview.contains("para59"), "{preview}");
        assert!(!preview.contains("para00"), "{preview}");

        editor.scroll_preview_up(u16::MAX);
        let (rows, _) = draw(&mut editor, &content);
        let preview = pane(&rows, PREVIEW_COLS);
        assert!(preview.contains("para00"), "{preview}");
        assert!(!preview.contains("para59"), "{preview}");

        editor.follow_end();
        let (rows, _) = draw(&mut editor, &content);
        assert!(pane(&rows, PREVIEW_COLS).contains("para59"));
    }

    #[test]
    fn long_title_keeps_cursor_inside_the_field() {
        let mut state = NotesState::new();
        state.buffer.title = "t".repeat(usize::from(u16::MAX) + 10);
        let mut editor = EditorView::default();
        let mut terminal = Terminal::new(TestBackend::new(84, 27)).unwrap();

        terminal
            .draw(|frame| editor.render(frame, frame.area(), &state, Focus::Title))
            .unwrap();

        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(82, 1));
    }
}
