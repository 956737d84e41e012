use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key chord asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    NewNote,
    ToggleDelete,
    Refresh,
    FocusNext,
    FocusPrev,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Letters match in either case, since terminals report Ctrl+Shift+S as 'S'.
    fn matches(&self, event: &KeyEvent) -> bool {
        let code_matches = match (self.code, event.code) {
            (KeyCode::Char(want), KeyCode::Char(got)) => want.eq_ignore_ascii_case(&got),
            (want, got) => want == got,
        };
        code_matches && event.modifiers.contains(self.modifiers)
    }
}

/// Handle returned by [`Keymap::register`], needed to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortcutId(u64);

/// Registry of active key chords. Views register their shortcuts when they
/// mount and unregister them when they unmount.
#[derive(Debug, Default)]
pub struct Keymap {
    bindings: Vec<(ShortcutId, KeyChord, Action)>,
    next_id: u64,
}

impl Keymap {
    /// Shell-wide bindings that live as long as the application.
    pub fn with_defaults() -> Self {
        let mut keymap = Self::default();
        keymap.register(KeyChord::ctrl('n'), Action::NewNote);
        keymap.register(KeyChord::ctrl('d'), Action::ToggleDelete);
        keymap.register(KeyChord::ctrl('r'), Action::Refresh);
        keymap.register(KeyChord::ctrl('q'), Action::Quit);
        keymap.register(KeyChord::ctrl('c'), Action::Quit);
        keymap.register(KeyChord::new(KeyCode::Tab, KeyModifiers::NONE), Action::FocusNext);
        keymap.register(KeyChord::new(KeyCode::BackTab, KeyModifiers::NONE), Action::FocusPrev);
        keymap
    }

    pub fn register(&mut self, chord: KeyChord, action: Action) -> ShortcutId {
        self.next_id += 1;
        let id = ShortcutId(self.next_id);
        self.bindings.push((id, chord, action));
        id
    }

    pub fn unregister(&mut self, id: ShortcutId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|(binding, _, _)| *binding != id);
        self.bindings.len() != before
    }

    /// The most recently registered binding wins.
    pub fn resolve(&self, event: &KeyEvent) -> Option<Action> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        self.bindings
            .iter()
            .rev()
            .find(|(_, chord, _)| chord.matches(event))
            .map(|(_, _, action)| *action)
    }

    pub fn bound_to(&self, action: Action) -> usize {
        self.bindings.iter().filter(|(_, _, a)| *a == action).count()
    }
}
