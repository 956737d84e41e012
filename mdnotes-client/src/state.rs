//! Client-side note state and the operations that sync it with the server.
//!
//! The list is always refetched after a mutation; nothing is patched locally.

use crate::{
    api::{Note, NoteDraft, NotesApi},
    markdown::{self, Preview},
    notification::{NotificationKind, Notifier},
};

/// Whether the buffer holds a new note or an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Composing,
    Editing(i64),
}

/// The title and content being written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    pub title: String,
    pub content: String,
}

impl Buffer {
    pub fn preview(&self) -> Preview {
        markdown::render(&self.content)
    }

    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    fn draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct NotesState {
    pub notes: Vec<Note>,
    pub selected: Option<i64>,
    pub buffer: Buffer,
    pub search: String,
    pub loading: bool,
    pub saving: bool,
    pub confirm_delete: Option<i64>,
    pub notifier: Notifier,
}

impl NotesState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub const fn mode(&self) -> Mode {
        match self.selected {
            Some(id) => Mode::Editing(id),
            None => Mode::Composing,
        }
    }

    /// Notes whose title contains the search text, ignoring case.
    pub fn filtered(&self) -> Vec<&Note> {
        let needle = self.search.to_lowercase();
        self.notes
            .iter()
            .filter(|note| note.title.to_lowercase().contains(&needle))
            .collect()
    }

    pub async fn fetch_all(&mut self, api: &dyn NotesApi) {
        self.loading = true;
        match api.fetch_all().await {
            Ok(notes) => {
                tracing::debug!("fetched {} notes", notes.len());
                self.notes = notes;
            }
            Err(e) => {
                tracing::warn!("failed to fetch notes: {}", e);
                self.notifier
                    .show("Failed to fetch notes", NotificationKind::Error);
            }
        }
        self.loading = false;
    }

    /// Validate the buffer and raise the `saving` flag. Returns false, making
    /// no call, when a save is already running or a field is blank.
    pub fn begin_save(&mut self) -> bool {
        if self.saving {
            return false;
        }
        if !self.buffer.is_complete() {
            self.notifier
                .show("Title and content are required", NotificationKind::Error);
            return false;
        }
        self.saving = true;
        true
    }

    pub async fn save(&mut self, api: &dyn NotesApi) {
        if self.begin_save() {
            self.submit(api).await;
        }
    }

    /// Send the buffer after [`begin_save`](Self::begin_save) accepted it.
    pub async fn submit(&mut self, api: &dyn NotesApi) {
        if !self.saving {
            return;
        }

        let draft = self.buffer.draft();
        let result = match self.selected {
            Some(id) => api
                .update(id, &draft)
                .await
                .map(|_| "Note updated successfully"),
            None => api
                .create(&draft)
                .await
                .map(|_| "Note created successfully"),
        };
        self.saving = false;

        match result {
            Ok(message) => {
                self.notifier.show(message, NotificationKind::Success);
                self.buffer = Buffer::default();
                self.selected = None;
                self.fetch_all(api).await;
            }
            Err(e) => {
                tracing::warn!("failed to save note: {}", e);
                self.notifier
                    .show("Failed to save note", NotificationKind::Error);
            }
        }
    }

    pub async fn remove(&mut self, api: &dyn NotesApi, id: i64) {
        match api.delete(id).await {
            Ok(()) => {
                self.notifier
                    .show("Note deleted successfully", NotificationKind::Success);
                self.confirm_delete = None;
                if self.selected == Some(id) {
                    self.buffer = Buffer::default();
                    self.selected = None;
                }
                self.fetch_all(api).await;
            }
            Err(e) => {
                tracing::warn!("failed to delete note {}: {}", id, e);
                self.notifier
                    .show("Failed to delete note", NotificationKind::Error);
            }
        }
    }

    pub fn select(&mut self, note: &Note) {
        self.selected = Some(note.id);
        self.buffer = Buffer {
            title: note.title.clone(),
            content: note.content.clone(),
        };
        self.confirm_delete = None;
    }

    pub fn start_new(&mut self) {
        self.selected = None;
        self.buffer = Buffer::default();
        self.confirm_delete = None;
    }

    /// Show or hide the delete confirmation for the selected note.
    pub fn toggle_delete_confirmation(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        self.confirm_delete = match self.confirm_delete {
            Some(pending) if pending == id => None,
            _ => Some(id),
        };
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::api::ClientError;

    /// In-memory server double. `fail` makes every call return an error.
    #[derive(Default)]
    struct FakeApi {
        notes: Mutex<Vec<Note>>,
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeApi {
        fn with_notes(titles: &[&str]) -> Self {
            let api = Self::default();
            {
                let mut notes = api.notes.lock().unwrap();
                for (i, title) in titles.iter().enumerate() {
                    notes.push(note(i as i64 + 1, title));
                }
            }
            api
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(ClientError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    message: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn note(id: i64, title: &str) -> Note {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Note {
            id,
            title: title.to_string(),
            content: format!("content of {title}"),
            created_at: at,
            updated_at: at,
        }
    }

    #[async_trait]
    impl NotesApi for FakeApi {
        async fn fetch_all(&self) -> Result<Vec<Note>, ClientError> {
            self.record("fetch".to_string())?;
            Ok(self.notes.lock().unwrap().clone())
        }

        async fn create(&self, draft: &NoteDraft) -> Result<Note, ClientError> {
            self.record(format!("create {}", draft.title))?;
            let mut notes = self.notes.lock().unwrap();
            let mut created = note(notes.len() as i64 + 1, &draft.title);
            created.content.clone_from(&draft.content);
            notes.insert(0, created.clone());
            Ok(created)
        }

        async fn update(&self, id: i64, draft: &NoteDraft) -> Result<Note, ClientError> {
            self.record(format!("update {id} {}", draft.title))?;
            let mut notes = self.notes.lock().unwrap();
            let existing = notes.iter_mut().find(|n| n.id == id).ok_or_else(|| {
                ClientError::Status {
                    status: reqwest::StatusCode::NOT_FOUND,
                    message: "Note not found".to_string(),
                }
            })?;
            existing.title.clone_from(&draft.title);
            existing.content.clone_from(&draft.content);
            Ok(existing.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), ClientError> {
            self.record(format!("delete {id}"))?;
            self.notes.lock().unwrap().retain(|n| n.id != id);
            Ok(())
        }
    }

    fn message(state: &NotesState) -> Option<(&str, NotificationKind)> {
        state
            .notifier
            .current()
            .map(|n| (n.message.as_str(), n.kind))
    }

    #[tokio::test]
    async fn fetch_replaces_list_and_clears_loading() {
        let api = FakeApi::with_notes(&["A", "B"]);
        let mut state = NotesState::new();
        assert!(state.loading);

        state.fetch_all(&api).await;

        assert_eq!(state.notes.len(), 2);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_list() {
        let mut state = NotesState::new();
        state.notes = vec![note(1, "kept")];

        state.fetch_all(&FakeApi::failing()).await;

        assert_eq!(state.notes.len(), 1);
        assert!(!state.loading);
        assert_eq!(
            message(&state),
            Some(("Failed to fetch notes", NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn save_with_blank_fields_makes_no_call() {
        let api = FakeApi::default();
        let mut state = NotesState::new();
        state.buffer.title = "   ".to_string();
        state.buffer.content = "body".to_string();

        state.save(&api).await;

        assert!(api.calls().is_empty());
        assert_eq!(
            message(&state),
            Some(("Title and content are required", NotificationKind::Error))
        );
        assert_eq!(state.buffer.content, "body");
    }

    #[tokio::test]
    async fn save_new_note_creates_and_returns_to_composing() {
        let api = FakeApi::default();
        let mut state = NotesState::new();
        state.buffer.title = "A".to_string();
        state.buffer.content = "hi".to_string();

        state.save(&api).await;

        assert_eq!(api.calls(), vec!["create A", "fetch"]);
        assert_eq!(state.mode(), Mode::Composing);
        assert_eq!(state.buffer, Buffer::default());
        assert_eq!(state.notes.len(), 1);
        assert!(!state.saving);
        assert_eq!(
            message(&state),
            Some(("Note created successfully", NotificationKind::Success))
        );
    }

    #[tokio::test]
    async fn save_selected_note_updates_it() {
        let api = FakeApi::with_notes(&["A"]);
        let mut state = NotesState::new();
        state.fetch_all(&api).await;
        let first = state.notes[0].clone();
        state.select(&first);
        state.buffer.title = "A2".to_string();

        state.save(&api).await;

        assert_eq!(api.calls(), vec!["fetch", "update 1 A2", "fetch"]);
        assert_eq!(state.notes[0].title, "A2");
        assert_eq!(state.mode(), Mode::Composing);
        assert_eq!(
            message(&state),
            Some(("Note updated successfully", NotificationKind::Success))
        );
    }

    #[tokio::test]
    async fn failed_save_keeps_buffer_and_selection() {
        let api = FakeApi::failing();
        let mut state = NotesState::new();
        state.select(&note(4, "A"));
        state.buffer.content = "edited".to_string();

        state.save(&api).await;

        assert_eq!(state.mode(), Mode::Editing(4));
        assert_eq!(state.buffer.content, "edited");
        assert!(!state.saving);
        assert_eq!(
            message(&state),
            Some(("Failed to save note", NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn save_is_ignored_while_saving() {
        let api = FakeApi::default();
        let mut state = NotesState::new();
        state.buffer.title = "A".to_string();
        state.buffer.content = "hi".to_string();
        state.saving = true;

        state.save(&api).await;

        assert!(api.calls().is_empty());
    }

    #[test]
    fn begin_save_rejects_blank_buffer_without_raising_flag() {
        let mut state = NotesState::new();
        state.buffer.title = "A".to_string();

        assert!(!state.begin_save());
        assert!(!state.saving);
        assert_eq!(
            message(&state),
            Some(("Title and content are required", NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn second_save_is_refused_until_submit_finishes() {
        let api = FakeApi::default();
        let mut state = NotesState::new();
        state.buffer.title = "A".to_string();
        state.buffer.content = "hi".to_string();

        assert!(state.begin_save());
        assert!(state.saving);
        assert!(!state.begin_save());

        state.submit(&api).await;

        assert!(!state.saving);
        assert_eq!(api.calls(), vec!["create A", "fetch"]);
    }

    #[tokio::test]
    async fn submit_without_begin_save_does_nothing() {
        let api = FakeApi::default();
        let mut state = NotesState::new();
        state.buffer.title = "A".to_string();
        state.buffer.content = "hi".to_string();

        state.submit(&api).await;

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn removing_selected_note_resets_buffer() {
        let api = FakeApi::with_notes(&["A", "B"]);
        let mut state = NotesState::new();
        state.fetch_all(&api).await;
        let first = state.notes[0].clone();
        state.select(&first);
        state.toggle_delete_confirmation();
        assert_eq!(state.confirm_delete, Some(first.id));

        state.remove(&api, first.id).await;

        assert_eq!(state.confirm_delete, None);
        assert_eq!(state.mode(), Mode::Composing);
        assert_eq!(state.buffer, Buffer::default());
        assert_eq!(state.notes.len(), 1);
    }

    #[tokio::test]
    async fn removing_other_note_keeps_selection() {
        let api = FakeApi::with_notes(&["A", "B"]);
        let mut state = NotesState::new();
        state.fetch_all(&api).await;
        let first = state.notes[0].clone();
        state.select(&first);

        state.remove(&api, 2).await;

        assert_eq!(state.mode(), Mode::Editing(first.id));
        assert_eq!(state.buffer.title, "A");
    }

    #[tokio::test]
    async fn failed_remove_notifies_and_keeps_state() {
        let mut state = NotesState::new();
        state.select(&note(1, "A"));
        state.toggle_delete_confirmation();

        state.remove(&FakeApi::failing(), 1).await;

        assert_eq!(state.mode(), Mode::Editing(1));
        assert_eq!(state.confirm_delete, Some(1));
        assert_eq!(
            message(&state),
            Some(("Failed to delete note", NotificationKind::Error))
        );
    }

    #[test]
    fn select_and_start_new_drive_the_mode() {
        let mut state = NotesState::new();
        assert_eq!(state.mode(), Mode::Composing);

        state.select(&note(3, "A"));
        state.toggle_delete_confirmation();
        assert_eq!(state.mode(), Mode::Editing(3));
        assert_eq!(state.buffer.content, "content of A");

        state.select(&note(5, "B"));
        assert_eq!(state.mode(), Mode::Editing(5));
        assert_eq!(state.confirm_delete, None);

        state.toggle_delete_confirmation();
        state.start_new();
        assert_eq!(state.mode(), Mode::Composing);
        assert_eq!(state.buffer, Buffer::default());
        assert_eq!(state.confirm_delete, None);
    }

    #[test]
    fn delete_confirmation_toggles_and_needs_selection() {
        let mut state = NotesState::new();
        state.toggle_delete_confirmation();
        assert_eq!(state.confirm_delete, None);

        state.select(&note(2, "A"));
        state.toggle_delete_confirmation();
        assert_eq!(state.confirm_delete, Some(2));
        state.toggle_delete_confirmation();
        assert_eq!(state.confirm_delete, None);

        state.toggle_delete_confirmation();
        state.cancel_delete();
        assert_eq!(state.confirm_delete, None);
    }

    #[test]
    fn search_filters_titles_ignoring_case() {
        let mut state = NotesState::new();
        state.notes = vec![note(1, "Groceries"), note(2, "Work Plan")];

        for needle in ["gro", "GRO", "Gro"] {
            state.search = needle.to_string();
            let titles: Vec<&str> = state.filtered().iter().map(|n| n.title.as_str()).collect();
            assert_eq!(titles, vec!["Groceries"]);
        }

        state.search.clear();
        assert_eq!(state.filtered().len(), 2);
    }

    #[test]
    fn buffer_preview_follows_content() {
        let mut buffer = Buffer::default();
        assert_eq!(buffer.preview(), Preview::Placeholder);

        buffer.content = "# Hi".to_string();
        let Preview::Document(blocks) = buffer.preview() else {
            panic!("expected a rendered document");
        };
        assert!(matches!(
            &blocks[0],
            markdown::Block::Heading { level: 1, spans } if markdown::plain_text(spans) == "Hi"
        ));

        buffer.content.clear();
        assert_eq!(buffer.preview(), Preview::Placeholder);
    }
}
