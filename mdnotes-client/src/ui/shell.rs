use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, ListState, Paragraph},
};

use super::{Focus, editor::EditorView, focused_border, wrap::text_width};
use crate::{
    api::Note,
    notification::NotificationKind,
    state::{Mode, NotesState},
};

const SIDEBAR_WIDTH: u16 = 36;

/// Sidebar with search and note list, the editor, a status bar, and the
/// notification and delete-confirmation overlays.
#[derive(Debug, Default)]
pub struct ShellView {
    list: ListState,
}

impl ShellView {
    /// Index of the highlighted entry in the filtered list.
    pub fn cursor(&self) -> usize {
        self.list.selected().unwrap_or(0)
    }

    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.list.select(None);
            return;
        }
        let next = self.cursor().saturating_add_signed(delta).min(len - 1);
        self.list.select(Some(next));
    }

    fn clamp_cursor(&mut self, len: usize) {
        match len {
            0 => self.list.select(None),
            _ => self.list.select(Some(self.cursor().min(len - 1))),
        }
    }

    /// Cancel the notification timer so nothing fires after the shell is gone.
    pub fn teardown(&mut self, state: &mut NotesState) {
        state.notifier.cancel();
        self.list.select(None);
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        state: &NotesState,
        focus: Focus,
        editor: &mut EditorView,
    ) {
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .areas(frame.area());
        let [search_area, list_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(sidebar);
        let [editor_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(main);

        render_search(frame, search_area, state, focus);
        self.render_list(frame, list_area, state, focus);
        editor.render(frame, editor_area, state, focus);
        render_status(frame, status_area, state);

        if state.confirm_delete.is_some() && state.confirm_delete == state.selected {
            render_confirmation(frame, status_area);
        }
        render_notification(frame, state);
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, state: &NotesState, focus: Focus) {
        let block = Block::bordered()
            .title(" Ctrl+N New Note ")
            .border_style(focused_border(focus == Focus::List));

        if state.loading {
            frame.render_widget(
                Paragraph::new("⟳ Loading notes...").block(block),
                area,
            );
            return;
        }

        let notes = state.filtered();
        if notes.is_empty() {
            frame.render_widget(Paragraph::new("📭 No notes found").block(block), area);
            return;
        }

        self.clamp_cursor(notes.len());
        let items: Vec<ListItem> = notes
            .iter()
            .map(|note| list_item(note, state.selected == Some(note.id)))
            .collect();
        let highlight = if focus == Focus::List {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };

        frame.render_stateful_widget(
            List::new(items).block(block).highlight_style(highlight),
            area,
            &mut self.list,
        );
    }
}

fn render_search(frame: &mut Frame, area: Rect, state: &NotesState, focus: Focus) {
    let text = if state.search.is_empty() {
        Line::styled("Search notes...", Style::default().fg(Color::DarkGray))
    } else {
        Line::from(state.search.clone())
    };
    frame.render_widget(
        Paragraph::new(text).block(
            Block::bordered()
                .title(" 📝 Notes ")
                .border_style(focused_border(focus == Focus::Search)),
        ),
        area,
    );

    if focus == Focus::Search {
        let x = area.x.saturating_add(1).saturating_add(text_width(&state.search));
        frame.set_cursor_position((
            x.min(area.right().saturating_sub(2)),
            area.y.saturating_add(1),
        ));
    }
}

fn list_item(note: &Note, selected: bool) -> ListItem<'static> {
    let title_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    ListItem::new(vec![
        Line::styled(note.title.clone(), title_style),
        Line::styled(format_date(note), Style::default().fg(Color::DarkGray)),
    ])
}

/// Creation date as "Mon D, YYYY" in local time.
pub fn format_date(note: &Note) -> String {
    note.created_at
        .with_timezone(&Local)
        .format("%b %-d, %Y")
        .to_string()
}

fn render_status(frame: &mut Frame, area: Rect, state: &NotesState) {
    let mode = match state.mode() {
        Mode::Editing(_) => Span::styled("● Editing Mode", Style::default().fg(Color::Green)),
        Mode::Composing => Span::styled("● Create New", Style::default().fg(Color::Blue)),
    };
    let save = if state.saving {
        Span::styled("⟳ Saving...", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("Ctrl+S Save Note")
    };

    let mut spans = vec![mode, Span::raw("   "), save];
    if state.selected.is_some() {
        spans.push(Span::raw("   Ctrl+D Delete"));
    }
    spans.push(Span::styled(
        "   Tab Switch field   Ctrl+Q Quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::bordered()),
        area,
    );
}

fn render_confirmation(frame: &mut Frame, status_area: Rect) {
    let width = 30_u16.min(status_area.width);
    let area = Rect {
        x: status_area.right().saturating_sub(width),
        y: status_area.y.saturating_sub(3),
        width,
        height: 3,
    };
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Confirm delete? "),
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw("/"),
            Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
        ]))
        .block(Block::bordered().border_style(Style::default().fg(Color::Red))),
        area,
    );
}

fn render_notification(frame: &mut Frame, state: &NotesState) {
    let Some(notification) = state.notifier.current() else {
        return;
    };

    let (icon, color) = match notification.kind {
        NotificationKind::Success => ("✓", Color::Green),
        NotificationKind::Error => ("✕", Color::Red),
    };
    let text = format!(" {icon} {} ", notification.message);
    let screen = frame.area();
    let width = u16::try_from(text.chars().count() + 2)
        .unwrap_or(u16::MAX)
        .min(screen.width);
    let area = Rect {
        x: screen.right().saturating_sub(width + 1),
        y: screen.y + 1,
        width,
        height: 3_u16.min(screen.height),
    };

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::White).bg(color))
            .block(Block::bordered().border_style(Style::default().fg(color))),
        area,
    );
}
