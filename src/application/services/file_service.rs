use std::sync::Arc;

use chrono::Utc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    application::{
        dto::file_record_dto::FileRecordDTO, error::ApplicationError,
        repositories::file_repository::FileRepository,
    },
    domain::models::file::FileView,
};

use super::{blob_store::BlobStore, url_transformer::UrlTransformer};

/// Orchestrates the blob store and the metadata repository.
///
/// Owns every invariant of the upload/retrieve/rename/toggle/delete
/// lifecycle: name sanitation, metadata/disk consistency, and the rule that
/// records only leave this service through the URL transformer.
pub struct FileService {
    files: Arc<dyn FileRepository>,
    blobs: Arc<dyn BlobStore>,
    urls: UrlTransformer,
}

impl FileService {
    pub fn new(
        files: Arc<dyn FileRepository>,
        blobs: Arc<dyn BlobStore>,
        urls: UrlTransformer,
    ) -> Self {
        Self { files, blobs, urls }
    }

    pub async fn upload(
        &self,
        content: Vec<u8>,
        declared_name: &str,
        declared_type: Option<String>,
        owner_id: &str,
    ) -> Result<FileView, ApplicationError> {
        let display_name = clean_display_name(declared_name)?;

        let storage_key = self.blobs.put(declared_name, &content).await?;

        let record = FileRecordDTO {
            name: Some(display_name),
            content_type: declared_type,
            size: Some(content.len() as u64),
            storage_key: Some(storage_key.clone()),
            owner_id: Some(owner_id.to_string()),
            is_public: Some(false),
            created_at: Some(Utc::now()),
            ..Default::default()
        };

        let created = match self.files.create(record).await {
            Ok(created) => created,
            Err(e) => {
                // The blob write already landed; reclaim it so a metadata
                // failure does not leave an orphan on disk.
                if let Err(cleanup) = self.blobs.delete(&storage_key).await {
                    warn!(
                        "Could not clean up blob {} after failed metadata create: {:?}",
                        storage_key, cleanup
                    );
                }
                return Err(e);
            }
        };

        Ok(self.urls.transform(created))
    }

    /// Owner's files, newest first. The ordering is part of the contract;
    /// clients render the result directly.
    pub async fn list(
        &self,
        owner_id: &str,
        name_filter: Option<&str>,
    ) -> Result<Vec<FileView>, ApplicationError> {
        let mut records = match name_filter {
            Some(fragment) if !fragment.trim().is_empty() => {
                self.files
                    .list_by_owner_and_name(owner_id, fragment.trim())
                    .await?
            }
            _ => self.files.list_by_owner(owner_id).await?,
        };

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records
            .into_iter()
            .map(|record| self.urls.transform(record))
            .collect())
    }

    pub async fn list_public(&self) -> Result<Vec<FileView>, ApplicationError> {
        let mut records = self.files.list_public().await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records
            .into_iter()
            .map(|record| self.urls.transform(record))
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<FileView, ApplicationError> {
        let record = self.files.get(id).await?;
        Ok(self.urls.transform(record))
    }

    pub async fn retrieve(&self, id: Uuid) -> Result<(FileView, Vec<u8>), ApplicationError> {
        let record = self.files.get(id).await?;

        let content = match self.blobs.get(&record.storage_key).await {
            Ok(content) => content,
            Err(ApplicationError::NotFound) => {
                // Metadata exists but the blob is gone. Surface the
                // inconsistency instead of masking it.
                error!("Blob {} missing for live record {}", record.storage_key, id);
                return Err(ApplicationError::NotFound);
            }
            Err(e) => return Err(e),
        };

        Ok((self.urls.transform(record), content))
    }

    pub async fn toggle_visibility(&self, id: Uuid) -> Result<FileView, ApplicationError> {
        let record = self.files.get(id).await?;

        let mut update = FileRecordDTO::for_update(id);
        update.is_public = Some(!record.is_public);

        let updated = self.files.update(update).await?;
        Ok(self.urls.transform(updated))
    }

    /// Changes the display name only; the storage key is never recomputed
    /// from the new name.
    pub async fn rename(&self, id: Uuid, new_name: &str) -> Result<FileView, ApplicationError> {
        if new_name.trim().is_empty() {
            return Err(ApplicationError::InvalidName(
                "new name must not be empty".to_string(),
            ));
        }

        self.files.get(id).await?;

        let mut update = FileRecordDTO::for_update(id);
        update.name = Some(new_name.trim().to_string());

        let updated = self.files.update(update).await?;
        Ok(self.urls.transform(updated))
    }

    /// Physical delete first, metadata delete unconditionally after. A failed
    /// physical delete is logged and non-fatal: an orphaned blob beats an
    /// undeletable record.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApplicationError> {
        let record = self.files.get(id).await?;

        if let Err(e) = self.blobs.delete(&record.storage_key).await {
            warn!(
                "Could not delete blob {} for file {}: {:?}",
                record.storage_key, id, e
            );
        }

        self.files.delete(id).await?;
        Ok(())
    }
}

/// Reduces a declared upload name to a display name: final path component,
/// trimmed, with traversal segments rejected outright.
fn clean_display_name(declared_name: &str) -> Result<String, ApplicationError> {
    if declared_name
        .split(['/', '\\'])
        .any(|segment| segment == "..")
    {
        return Err(ApplicationError::InvalidName(format!(
            "name contains a path-traversal segment: {}",
            declared_name
        )));
    }

    let base = declared_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(declared_name)
        .trim();

    if base.is_empty() {
        return Err(ApplicationError::InvalidName(
            "name must not be empty".to_string(),
        ));
    }

    Ok(base.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        adapters::repositories::MemoryFileRepository, domain::models::file::FileRecord,
        services::FsBlobStore,
    };

    async fn service_with_root() -> (FileService, TempDir) {
        let root = TempDir::new().unwrap();
        let blobs = FsBlobStore::new(root.path());
        blobs.init().await.unwrap();

        let service = FileService::new(
            Arc::new(MemoryFileRepository::new()),
            Arc::new(blobs),
            UrlTransformer::new("http://localhost:8080"),
        );
        (service, root)
    }

    #[tokio::test]
    async fn upload_then_retrieve_round_trips_content() {
        let (service, _root) = service_with_root().await;

        let uploaded = service
            .upload(
                b"hello blob".to_vec(),
                "notes.txt",
                Some("text/plain".to_string()),
                "owner-a",
            )
            .await
            .unwrap();

        assert_eq!(uploaded.name, "notes.txt");
        assert_eq!(uploaded.size, 10);
        assert!(!uploaded.is_public);

        let (view, content) = service.retrieve(uploaded.id).await.unwrap();
        assert_eq!(content, b"hello blob");
        assert_eq!(view.id, uploaded.id);
        assert_eq!(view.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn upload_rejects_path_traversal_and_writes_nothing() {
        let (service, root) = service_with_root().await;

        let result = service
            .upload(b"pwned".to_vec(), "../../etc/passwd", None, "owner-a")
            .await;

        assert!(matches!(result, Err(ApplicationError::InvalidName(_))));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn list_is_owner_scoped_and_newest_first() {
        let (service, _root) = service_with_root().await;

        for name in ["first.txt", "second.txt", "third.txt"] {
            service
                .upload(b"x".to_vec(), name, None, "owner-a")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        service
            .upload(b"y".to_vec(), "other.txt", None, "owner-b")
            .await
            .unwrap();

        let files = service.list("owner-a", None).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names, ["third.txt", "second.txt", "first.txt"]);
        assert!(files.iter().all(|f| f.owner_id == "owner-a"));
    }

    #[tokio::test]
    async fn list_filters_by_name_case_insensitively() {
        let (service, _root) = service_with_root().await;

        service
            .upload(b"x".to_vec(), "Quarterly-Report.pdf", None, "owner-a")
            .await
            .unwrap();
        service
            .upload(b"x".to_vec(), "holiday.jpg", None, "owner-a")
            .await
            .unwrap();

        let files = service.list("owner-a", Some("report")).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "Quarterly-Report.pdf");
    }

    #[tokio::test]
    async fn toggle_twice_restores_visibility() {
        let (service, _root) = service_with_root().await;

        let uploaded = service
            .upload(b"x".to_vec(), "file.bin", None, "owner-a")
            .await
            .unwrap();

        let once = service.toggle_visibility(uploaded.id).await.unwrap();
        assert!(once.is_public);

        let twice = service.toggle_visibility(uploaded.id).await.unwrap();
        assert_eq!(twice.is_public, uploaded.is_public);
    }

    #[tokio::test]
    async fn toggled_public_files_show_up_in_public_listing() {
        let (service, _root) = service_with_root().await;

        let shared = service
            .upload(b"x".to_vec(), "shared.txt", None, "owner-a")
            .await
            .unwrap();
        service
            .upload(b"x".to_vec(), "private.txt", None, "owner-a")
            .await
            .unwrap();

        service.toggle_visibility(shared.id).await.unwrap();

        let public = service.list_public().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, shared.id);
    }

    #[tokio::test]
    async fn rename_keeps_id_and_stored_content() {
        let (service, _root) = service_with_root().await;

        let uploaded = service
            .upload(b"payload".to_vec(), "before.txt", None, "owner-a")
            .await
            .unwrap();

        let renamed = service.rename(uploaded.id, "after.txt").await.unwrap();
        assert_eq!(renamed.id, uploaded.id);
        assert_eq!(renamed.name, "after.txt");

        let (view, content) = service.retrieve(uploaded.id).await.unwrap();
        assert_eq!(view.name, "after.txt");
        assert_eq!(content, b"payload");
    }

    #[tokio::test]
    async fn rename_rejects_empty_name() {
        let (service, _root) = service_with_root().await;

        let uploaded = service
            .upload(b"x".to_vec(), "file.txt", None, "owner-a")
            .await
            .unwrap();

        let result = service.rename(uploaded.id, "   ").await;
        assert!(matches!(result, Err(ApplicationError::InvalidName(_))));
    }

    #[tokio::test]
    async fn delete_is_final_for_retrieve_and_rename() {
        let (service, root) = service_with_root().await;

        let uploaded = service
            .upload(b"x".to_vec(), "gone.txt", None, "owner-a")
            .await
            .unwrap();

        service.delete(uploaded.id).await.unwrap();

        assert!(matches!(
            service.retrieve(uploaded.id).await,
            Err(ApplicationError::NotFound)
        ));
        assert!(matches!(
            service.rename(uploaded.id, "back.txt").await,
            Err(ApplicationError::NotFound)
        ));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn two_uploads_with_the_same_name_get_distinct_blobs() {
        let (service, root) = service_with_root().await;

        let first = service
            .upload(b"one".to_vec(), "same.txt", None, "owner-a")
            .await
            .unwrap();
        let second = service
            .upload(b"two".to_vec(), "same.txt", None, "owner-a")
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 2);

        let (_, content) = service.retrieve(first.id).await.unwrap();
        assert_eq!(content, b"one");
        let (_, content) = service.retrieve(second.id).await.unwrap();
        assert_eq!(content, b"two");
    }

    struct FailingRepository;

    #[async_trait]
    impl FileRepository for FailingRepository {
        async fn create(&self, _: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
            Err(ApplicationError::DatabaseError("create failed".to_string()))
        }
        async fn get(&self, _: Uuid) -> Result<FileRecord, ApplicationError> {
            Err(ApplicationError::NotFound)
        }
        async fn update(&self, _: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
            Err(ApplicationError::NotFound)
        }
        async fn delete(&self, _: Uuid) -> Result<FileRecord, ApplicationError> {
            Err(ApplicationError::NotFound)
        }
        async fn list_by_owner(&self, _: &str) -> Result<Vec<FileRecord>, ApplicationError> {
            Ok(Vec::new())
        }
        async fn list_by_owner_and_name(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Vec<FileRecord>, ApplicationError> {
            Ok(Vec::new())
        }
        async fn list_public(&self) -> Result<Vec<FileRecord>, ApplicationError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn failed_metadata_create_reclaims_the_blob() {
        let root = TempDir::new().unwrap();
        let blobs = FsBlobStore::new(root.path());
        blobs.init().await.unwrap();

        let service = FileService::new(
            Arc::new(FailingRepository),
            Arc::new(blobs),
            UrlTransformer::new("http://localhost:8080"),
        );

        let result = service
            .upload(b"x".to_vec(), "doomed.txt", None, "owner-a")
            .await;

        assert!(matches!(result, Err(ApplicationError::DatabaseError(_))));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
