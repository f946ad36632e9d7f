use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::{dto::file_record_dto::FileRecordDTO, error::ApplicationError},
    domain::models::file::FileRecord,
};

/// Metadata store for file records, keyed by record id.
///
/// Implementations assign the id on `create`; callers never pick it. A
/// missing record surfaces as [`ApplicationError::NotFound`].
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn create(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError>;
    async fn get(&self, id: Uuid) -> Result<FileRecord, ApplicationError>;
    /// Partial update keyed by `record.id`. `owner_id` and `created_at` are
    /// write-once and ignored here even when set.
    async fn update(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError>;
    async fn delete(&self, id: Uuid) -> Result<FileRecord, ApplicationError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<FileRecord>, ApplicationError>;
    /// Case-insensitive substring match on the display name.
    async fn list_by_owner_and_name(
        &self,
        owner_id: &str,
        fragment: &str,
    ) -> Result<Vec<FileRecord>, ApplicationError>;
    async fn list_public(&self) -> Result<Vec<FileRecord>, ApplicationError>;
}
