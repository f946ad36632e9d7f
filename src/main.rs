mod adapters;
mod application;
mod domain;
mod services;

use std::sync::Arc;

use adapters::{
    controllers::{file_controller::FileController, health_controller::HealthController},
    repositories::{MemoryFileRepository, PgFileRepository},
    state::AppState,
};
use application::{
    repositories::file_repository::FileRepository,
    services::{FileService, UrlTransformer},
};
use axum::{
    routing::{get, post},
    Router,
};
use services::FsBlobStore;
use tower_http::cors::{Any, CorsLayer};

async fn hello_world() -> &'static str {
    "cloudshare-service"
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    let storage_root = std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "uploads".to_string());

    let public_base_url =
        std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

    // Explicit development-only identity fallback; unset means requests
    // without an X-Owner-Id header are rejected.
    let anonymous_owner = std::env::var("ANONYMOUS_OWNER_ID").ok();
    if let Some(ref owner) = anonymous_owner {
        tracing::warn!(
            "Anonymous access enabled: requests without an owner resolve to '{}'",
            owner
        );
    }

    // Configure CORS
    let cors = if let Ok(allowed_origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
        // Parse comma-separated origins
        let origins: Vec<_> = allowed_origins
            .split(',')
            .map(|s| s.trim().parse().expect("Invalid CORS origin"))
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow all origins if not specified (only for development)
        CorsLayer::permissive()
    };

    // Storage-root initialization happens here, once, before first use.
    let blob_store = FsBlobStore::new(&storage_root);
    blob_store
        .init()
        .await
        .expect("ERROR: Failed to create the storage root directory");
    tracing::info!("Storage root ready at {}", storage_root);

    let (file_repository, metadata_backend): (Arc<dyn FileRepository>, &str) =
        match std::env::var("DATABASE_URL") {
            Ok(database_url) => {
                tracing::info!("Connecting to PostgreSQL...");
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(std::time::Duration::from_secs(30))
                    .connect(&database_url)
                    .await
                    .expect("ERROR: Failed to connect to PostgreSQL database. Check DATABASE_URL and network connectivity.");
                tracing::info!("Database connection established");
                (Arc::new(PgFileRepository::new(pool)), "postgres")
            }
            Err(_) => {
                tracing::warn!(
                    "DATABASE_URL not set, using in-memory metadata store; records will not survive a restart"
                );
                (Arc::new(MemoryFileRepository::new()), "memory")
            }
        };

    let file_service = Arc::new(FileService::new(
        file_repository,
        Arc::new(blob_store),
        UrlTransformer::new(&public_base_url),
    ));

    let app_state = AppState {
        file_service,
        anonymous_owner,
        storage_root,
        metadata_backend: metadata_backend.to_string(),
    };

    let router = Router::new()
        .route("/", get(hello_world))
        .route("/api/v1/health", get(HealthController::health_check))
        .route(
            "/api/v1/files",
            post(FileController::upload_file).get(FileController::list_files),
        )
        .route(
            "/api/v1/files/{file_id}",
            get(FileController::get_file_metadata).delete(FileController::delete_file),
        )
        .route(
            "/api/v1/files/{file_id}/view",
            get(FileController::view_file),
        )
        .route(
            "/api/v1/files/{file_id}/toggle-public",
            axum::routing::patch(FileController::toggle_public),
        )
        .route(
            "/api/v1/files/{file_id}/rename",
            axum::routing::patch(FileController::rename_file),
        )
        .route(
            "/api/v1/public/files",
            get(FileController::list_public_files),
        )
        .layer(cors)
        .with_state(app_state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
