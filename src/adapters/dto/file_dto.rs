use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::file::FileView;

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub size: u64,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub url: String,
}

impl From<FileView> for FileResponse {
    fn from(view: FileView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            content_type: view.content_type,
            size: view.size,
            owner_id: view.owner_id,
            is_public: view.is_public,
            created_at: view.created_at,
            url: view.url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameFileRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ViewFileQuery {
    #[serde(default)]
    pub download: bool,
}
