use std::sync::Arc;

use crate::application::services::FileService;

#[derive(Clone)]
pub struct AppState {
    pub file_service: Arc<FileService>,
    /// Explicit development-only fallback identity. When `None`, requests
    /// without an owner header are rejected.
    pub anonymous_owner: Option<String>,
    pub storage_root: String,
    pub metadata_backend: String,
}
