use std::{
    collections::HashMap,
    sync::RwLock,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::{
        dto::file_record_dto::FileRecordDTO, error::ApplicationError,
        repositories::file_repository::FileRepository,
    },
    domain::models::file::FileRecord,
};

/// In-process metadata store. Used when no DATABASE_URL is configured and by
/// the test suite; records do not survive a restart.
#[derive(Default)]
pub struct MemoryFileRepository {
    records: RwLock<HashMap<Uuid, FileRecord>>,
}

impl MemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn create(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
        let mut record = record;
        record.id = Uuid::new_v4();
        let record: FileRecord = record.into();

        let mut records = self.records.write().unwrap();
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        let records = self.records.read().unwrap();
        records.get(&id).cloned().ok_or(ApplicationError::NotFound)
    }

    async fn update(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
        let mut records = self.records.write().unwrap();
        let stored = records
            .get_mut(&record.id)
            .ok_or(ApplicationError::NotFound)?;

        // owner_id and created_at are write-once and never part of an update.
        if let Some(name) = record.name {
            stored.name = name;
        }
        if let Some(content_type) = record.content_type {
            stored.content_type = Some(content_type);
        }
        if let Some(size) = record.size {
            stored.size = size;
        }
        if let Some(storage_key) = record.storage_key {
            stored.storage_key = storage_key;
        }
        if let Some(is_public) = record.is_public {
            stored.is_public = is_public;
        }

        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        let mut records = self.records.write().unwrap();
        records.remove(&id).ok_or(ApplicationError::NotFound)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<FileRecord>, ApplicationError> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list_by_owner_and_name(
        &self,
        owner_id: &str,
        fragment: &str,
    ) -> Result<Vec<FileRecord>, ApplicationError> {
        let fragment = fragment.to_lowercase();
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .filter(|record| {
                record.owner_id == owner_id && record.name.to_lowercase().contains(&fragment)
            })
            .cloned()
            .collect())
    }

    async fn list_public(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .filter(|record| record.is_public)
            .cloned()
            .collect())
    }
}
