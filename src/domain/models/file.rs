use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata record describing one uploaded file.
///
/// `storage_key` is the physical blob name inside the storage root. It is an
/// internal detail and must never cross the service boundary; outward-facing
/// code works with [`FileView`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub storage_key: String,
    pub owner_id: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Outward projection of a [`FileRecord`] produced by the URL transformer.
///
/// Carries a retrieval URL derived from the record id and, by construction,
/// has no `storage_key` field to leak.
#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    pub id: Uuid,
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub owner_id: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub url: String,
}
