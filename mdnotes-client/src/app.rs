use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{DefaultTerminal, Frame};

use crate::{
    api::NotesApi,
    keymap::{Action, Keymap},
    state::NotesState,
    ui::{Focus, editor::EditorView, shell::ShellView},
};

const TICK: Duration = Duration::from_millis(250);
const PREVIEW_PAGE: u16 = 10;

/// Work that needs the server. Everything else is handled synchronously in
/// [`App::handle_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Save,
    Remove(i64),
    Refresh,
    Quit,
}

pub struct App {
    pub state: NotesState,
    pub keymap: Keymap,
    pub focus: Focus,
    editor: EditorView,
    shell: ShellView,
    running: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Builds the app with the editor mounted.
    pub fn new() -> Self {
        let mut keymap = Keymap::with_defaults();
        let mut editor = EditorView::default();
        editor.mount(&mut keymap);

        Self {
            state: NotesState::new(),
            keymap,
            focus: Focus::Title,
            editor,
            shell: ShellView::default(),
            running: true,
        }
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Unmount the views, releasing their shortcuts and timers.
    pub fn teardown(&mut self) {
        self.editor.unmount(&mut self.keymap);
        self.shell.teardown(&mut self.state);
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        self.shell
            .render(frame, &self.state, self.focus, &mut self.editor);
    }

    pub fn tick(&mut self, now: Instant) {
        self.state.notifier.expire(now);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        // the confirmation is modal
        if let Some(id) = self.state.confirm_delete {
            match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => return Some(Command::Remove(id)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.state.cancel_delete(),
                _ => {}
            }
            return None;
        }

        if let Some(action) = self.keymap.resolve(&key) {
            return self.apply(action);
        }

        match key.code {
            KeyCode::PageUp => {
                self.editor.scroll_preview_up(PREVIEW_PAGE);
                return None;
            }
            KeyCode::PageDown => {
                self.editor.scroll_preview_down(PREVIEW_PAGE);
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => self.edit_search(key),
            Focus::List => return self.navigate_list(key),
            Focus::Title => {
                if key.code == KeyCode::Enter {
                    self.focus = Focus::Content;
                } else {
                    edit_line(&mut self.state.buffer.title, key);
                }
            }
            Focus::Content => {
                self.editor.follow_end();
                if key.code == KeyCode::Enter {
                    self.state.buffer.content.push('\n');
                } else {
                    edit_line(&mut self.state.buffer.content, key);
                }
            }
        }
        None
    }

    fn apply(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Save => return Some(Command::Save),
            Action::Refresh => return Some(Command::Refresh),
            Action::Quit => return Some(Command::Quit),
            Action::NewNote => {
                self.state.start_new();
                self.focus = Focus::Title;
            }
            Action::ToggleDelete => self.state.toggle_delete_confirmation(),
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
        }
        None
    }

    fn edit_search(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Enter => self.focus = Focus::List,
            KeyCode::Esc => self.state.search.clear(),
            _ => edit_line(&mut self.state.search, key),
        }
    }

    fn navigate_list(&mut self, key: KeyEvent) -> Option<Command> {
        let len = self.state.filtered().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.shell.move_cursor(-1, len),
            KeyCode::Down | KeyCode::Char('j') => self.shell.move_cursor(1, len),
            KeyCode::Enter => {
                let chosen = self
                    .state
                    .filtered()
                    .get(self.shell.cursor())
                    .map(|note| (*note).clone());
                if let Some(note) = chosen {
                    self.state.select(&note);
                    self.focus = Focus::Content;
                }
            }
            KeyCode::Char('/') => self.focus = Focus::Search,
            _ => {}
        }
        None
    }

    pub async fn execute(&mut self, api: &dyn NotesApi, command: Command) {
        match command {
            Command::Save => self.state.save(api).await,
            Command::Remove(id) => self.state.remove(api, id).await,
            Command::Refresh => self.state.fetch_all(api).await,
            Command::Quit => self.running = false,
        }
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal, api: &dyn NotesApi) -> Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        self.state.fetch_all(api).await;

        while self.running {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
                && let Some(command) = self.handle_key(key)
            {
                if command == Command::Save {
                    // the request blocks the loop, so draw the indicator first
                    if self.state.begin_save() {
                        terminal.draw(|frame| self.draw(frame))?;
                        self.state.submit(api).await;
                    }
                } else {
                    self.execute(api, command).await;
                }
            }

            self.tick(Instant::now());
        }

        Ok(())
    }
}

/// Single-line editing shared by the search, title and content fields.
fn edit_line(text: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) =>
        {
            text.push(c);
        }
        KeyCode::Backspace => {
            text.pop();
        }
        _ => {}
    }
}

/// Run the terminal client until the user quits.
pub async fn run(api: &dyn NotesApi) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = App::new();

    let result = app.event_loop(&mut terminal, api).await;

    app.teardown();
    ratatui::restore();
    result
}
