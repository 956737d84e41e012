pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use handlers::rest;
use service::NoteService;

pub const NOTES_PATH: &str = "/api/notes";

/// The full HTTP surface: notes API, Swagger UI and a liveness root.
pub fn router(service: Arc<NoteService>) -> Router {
    let notes_router = Router::new()
        .route(
            NOTES_PATH,
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route(
            &format!("{NOTES_PATH}/{{id}}"),
            put(rest::update_note).delete(rest::delete_note),
        )
        .with_state(service);

    Router::new()
        .route("/", get(root))
        .merge(notes_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Notes API is running").into_response()
}
