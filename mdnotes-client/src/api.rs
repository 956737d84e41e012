use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title and content sent on create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
}

/// Operations the client needs from the notes server.
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Note>, ClientError>;

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ClientError>;

    async fn update(&self, id: i64, draft: &NoteDraft) -> Result<Note, ClientError>;

    async fn delete(&self, id: i64) -> Result<(), ClientError>;
}

#[derive(Clone)]
pub struct HttpNotesApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNotesApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn note_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

/// Pass successful responses through, turn the rest into `ClientError::Status`
/// carrying the server's `{error}` message when it sent one.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    tracing::warn!("notes server answered {}: {}", status, message);
    Err(ClientError::Status { status, message })
}

#[async_trait]
impl NotesApi for HttpNotesApi {
    async fn fetch_all(&self) -> Result<Vec<Note>, ClientError> {
        let response = self.client.get(&self.base_url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ClientError> {
        let response = self.client.post(&self.base_url).json(draft).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update(&self, id: i64, draft: &NoteDraft) -> Result<Note, ClientError> {
        let response = self
            .client
            .put(self.note_url(id))
            .json(draft)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let response = self.client.delete(self.note_url(id)).send().await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_reads_camel_case_fields() {
        let json = r#"{
            "id": 7,
            "title": "A",
            "content": "hi",
            "createdAt": "2026-01-02T03:04:05Z",
            "updatedAt": "2026-01-02T03:04:06Z"
        }"#;

        let note: Note = serde_json::from_str(json).unwrap();

        assert_eq!(note.id, 7);
        assert_eq!(note.title, "A");
        assert!(note.updated_at > note.created_at);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpNotesApi::new("http://localhost:5000/api/notes/").unwrap();

        assert_eq!(api.base_url(), "http://localhost:5000/api/notes");
        assert_eq!(api.note_url(3), "http://localhost:5000/api/notes/3");
    }

    #[test]
    fn status_error_shows_server_message() {
        let err = ClientError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            message: "Note not found".to_string(),
        };

        assert_eq!(err.to_string(), "server answered 404 Not Found: Note not found");
    }
}
