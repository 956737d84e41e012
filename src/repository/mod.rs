mod embedded;
mod memory;
mod postgres;

pub use memory::MemoryNoteStore;
pub use postgres::PgNoteStore;

use async_trait::async_trait;

use crate::models::Note;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("{0}")]
    Migration(#[from] refinery::Error),
}

/// Persistent collection of notes keyed by id.
///
/// Not-found is not an error: `replace` yields `None` and `delete` yields
/// `false` when no record carries the id.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create(&self, title: String, content: String) -> Result<Note, StoreError>;

    /// All notes, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Note>, StoreError>;

    async fn replace(
        &self,
        id: i64,
        title: String,
        content: String,
    ) -> Result<Option<Note>, StoreError>;

    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
