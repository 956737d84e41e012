use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use super::{NoteStore, StoreError};
use crate::models::Note;

#[derive(Default)]
struct Inner {
    next_id: i64,
    notes: BTreeMap<i64, Note>,
}

/// Store kept in process memory, selected with a `memory://` DSN.
#[derive(Default)]
pub struct MemoryNoteStore {
    inner: RwLock<Inner>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Wall-clock time, pushed forward when the clock has not moved past `after`.
fn now_after(after: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match after {
        Some(prev) if now <= prev => prev + TimeDelta::microseconds(1),
        _ => now,
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn create(&self, title: String, content: String) -> Result<Note, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let latest = inner.notes.values().map(|note| note.created_at).max();
        let now = now_after(latest);
        let note = Note {
            id: inner.next_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        };
        inner.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        let inner = self.inner.read().await;
        let mut notes: Vec<Note> = inner.notes.values().cloned().collect();
        notes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(notes)
    }

    async fn replace(
        &self,
        id: i64,
        title: String,
        content: String,
    ) -> Result<Option<Note>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(note) = inner.notes.get_mut(&id) else {
            return Ok(None);
        };

        note.title = title;
        note.content = content;
        note.updated_at = now_after(Some(note.updated_at));

        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.notes.remove(&id).is_some())
    }
}
