use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::file::FileRecord;

/// Partial view of a [`FileRecord`] used for repository writes.
///
/// `None` fields are left untouched on update. `owner_id` and `created_at`
/// are accepted only on create; repositories never update them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileRecordDTO {
    #[serde(default)]
    pub id: Uuid,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub storage_key: Option<String>,
    pub owner_id: Option<String>,
    pub is_public: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl FileRecordDTO {
    pub fn for_update(id: Uuid) -> Self {
        FileRecordDTO {
            id,
            ..Default::default()
        }
    }
}

impl From<FileRecord> for FileRecordDTO {
    fn from(value: FileRecord) -> Self {
        FileRecordDTO {
            id: value.id,
            name: Some(value.name),
            content_type: value.content_type,
            size: Some(value.size),
            storage_key: Some(value.storage_key),
            owner_id: Some(value.owner_id),
            is_public: Some(value.is_public),
            created_at: Some(value.created_at),
        }
    }
}

impl From<FileRecordDTO> for FileRecord {
    fn from(value: FileRecordDTO) -> Self {
        FileRecord {
            id: value.id,
            name: value.name.unwrap_or_default(),
            content_type: value.content_type,
            size: value.size.unwrap_or(0),
            storage_key: value.storage_key.unwrap_or_default(),
            owner_id: value.owner_id.unwrap_or_default(),
            is_public: value.is_public.unwrap_or(false),
            created_at: value.created_at.unwrap_or_else(Utc::now),
        }
    }
}
