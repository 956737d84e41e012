use std::sync::Arc;

use mdnotes_server::{
    config::{self, StoreKind},
    repository::{MemoryNoteStore, NoteStore, PgNoteStore},
    router,
    service::NoteService,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Successfully loaded server config");

    let store_kind = cfg.store_kind().unwrap_or_else(|e| {
        tracing::error!("{e}");
        panic!("{e}");
    });

    // Store creation and migration
    let store: Arc<dyn NoteStore> = match store_kind {
        StoreKind::Postgres(dsn) => {
            let mut store = PgNoteStore::connect(&dsn).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                panic!("failed to establish database connection: {e}");
            });
            store.migrate().await.unwrap_or_else(|e| {
                tracing::error!("Failed to migrate database: {e}");
                panic!("failed to migrate database: {e}");
            });
            tracing::info!("Database connected");
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, notes will not survive a restart");
            Arc::new(MemoryNoteStore::new())
        }
    };

    // Service creation
    let service = Arc::new(NoteService::new(store));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to port {}: {e}", cfg.port);
            panic!("failed to bind to port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Server running, listening on {}", addr),
        Err(e) => tracing::warn!("Server running, local address unavailable: {e}"),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}
