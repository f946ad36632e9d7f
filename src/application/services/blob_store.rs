use async_trait::async_trait;

use crate::application::error::ApplicationError;

/// Raw blob storage, addressed by store-generated keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `content` under a fresh collision-resistant key derived from
    /// the sanitized `original_name` and returns that key. Fails with
    /// [`ApplicationError::InvalidName`] on path-traversal names.
    async fn put(&self, original_name: &str, content: &[u8]) -> Result<String, ApplicationError>;
    async fn get(&self, storage_key: &str) -> Result<Vec<u8>, ApplicationError>;
    /// Removes the blob if present. Absence is not an error.
    async fn delete(&self, storage_key: &str) -> Result<(), ApplicationError>;
}
