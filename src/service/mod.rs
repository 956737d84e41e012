use std::sync::Arc;

use crate::{
    dto::{NoteRequest, NoteResponse},
    error::ApiError,
    repository::NoteStore,
};

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

/// Both fields present and non-empty.
fn validate(request: NoteRequest) -> Result<(String, String), ApiError> {
    match (request.title, request.content) {
        (Some(title), Some(content)) if !title.is_empty() && !content.is_empty() => {
            Ok((title, content))
        }
        _ => Err(ApiError::required_fields()),
    }
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn create_note(&self, request: NoteRequest) -> Result<NoteResponse, ApiError> {
        let (title, content) = validate(request)?;
        let note = self.store.create(title, content).await?;

        tracing::debug!("created note {}", note.id);
        Ok(note.into())
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ApiError> {
        let notes = self.store.list().await?;
        Ok(notes.into_iter().map(NoteResponse::from).collect())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: NoteRequest,
    ) -> Result<NoteResponse, ApiError> {
        let (title, content) = validate(request)?;

        self.store
            .replace(id, title, content)
            .await?
            .map(NoteResponse::from)
            .ok_or(ApiError::NotFound)
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        if self.store.delete(id).await? {
            tracing::debug!("deleted note {}", id);
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }
}
