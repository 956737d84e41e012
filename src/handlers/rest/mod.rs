use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{ErrorResponse, MessageResponse, NoteRequest, NoteResponse},
    error::ApiError,
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, get_all_notes, update_note, delete_note),
    components(schemas(NoteResponse, NoteRequest, MessageResponse, ErrorResponse)),
    tags(
        (name = "notes", description = "Markdown notes API")
    )
)]
pub struct ApiDoc;

/// Log and render a failed request. Only store failures are server-side problems.
fn failure(action: &str, e: ApiError) -> Response {
    match &e {
        ApiError::Store(_) => tracing::error!("failed to {}: {}", action, e),
        _ => tracing::debug!("rejected request to {}: {}", action, e),
    }
    e.into_response()
}

/// A body that is not valid JSON is treated like one missing its fields.
fn payload(body: Result<Json<NoteRequest>, JsonRejection>) -> Result<NoteRequest, ApiError> {
    body.map(|Json(request)| request).map_err(|rejection| {
        tracing::debug!("unreadable note body: {}", rejection);
        ApiError::required_fields()
    })
}

/// Ids are integers; any other path segment cannot name a note.
fn note_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Title or content missing", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Response {
    let result = async { service.create_note(payload(body)?).await }.await;

    match result {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => failure("create note", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "All notes, newest first", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => failure("list notes", e),
    }
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note replaced", body = NoteResponse),
        (status = 400, description = "Title or content missing", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Response {
    // validation comes first, an unparsable id with a bad body is still a 400
    let result = async {
        let request = payload(body)?;
        service.update_note(note_id(&id)?, request).await
    }
    .await;

    match result {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => failure("update note", e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    let result = async { service.delete_note(note_id(&id)?).await }.await;

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Note deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => failure("delete note", e),
    }
}
