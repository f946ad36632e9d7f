use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::{error::ApplicationError, services::BlobStore},
    services::error::StorageError,
};

/// Blob store over a single local filesystem root.
///
/// Keys are `{uuid}_{sanitized-name}`, so two uploads with the same declared
/// name never collide and a key never contains a path separator.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Creates the storage root. Called once by the composition root before
    /// the store is used.
    pub async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn sanitize_name(original_name: &str) -> Result<String, StorageError> {
        if original_name
            .split(['/', '\\'])
            .any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidName(format!(
                "name contains a path-traversal segment: {}",
                original_name
            )));
        }

        let base = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(original_name)
            .trim();

        if base.is_empty() {
            return Err(StorageError::InvalidName(
                "name must not be empty".to_string(),
            ));
        }

        let safe = base
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>();

        Ok(safe)
    }

    /// Keys are store-generated, but never follow one outside the root.
    fn resolve(&self, storage_key: &str) -> Result<PathBuf, StorageError> {
        if storage_key.is_empty()
            || storage_key.contains('/')
            || storage_key.contains('\\')
            || storage_key == ".."
        {
            return Err(StorageError::InvalidName(format!(
                "storage key escapes the storage root: {}",
                storage_key
            )));
        }

        Ok(self.root.join(storage_key))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, original_name: &str, content: &[u8]) -> Result<String, ApplicationError> {
        let safe_name = Self::sanitize_name(original_name)?;
        let storage_key = format!("{}_{}", Uuid::new_v4(), safe_name);

        let path = self.resolve(&storage_key)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(StorageError::from)?;

        Ok(storage_key)
    }

    async fn get(&self, storage_key: &str) -> Result<Vec<u8>, ApplicationError> {
        let path = self.resolve(storage_key)?;

        match tokio::fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()).into())
            }
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    async fn delete(&self, storage_key: &str) -> Result<(), ApplicationError> {
        let path = self.resolve(storage_key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Idempotent: a missing blob is already deleted.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn store() -> (FsBlobStore, TempDir) {
        let root = TempDir::new().unwrap();
        let store = FsBlobStore::new(root.path());
        store.init().await.unwrap();
        (store, root)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let (store, _root) = store().await;

        let key = store.put("photo.jpg", b"jpeg bytes").await.unwrap();
        let content = store.get(&key).await.unwrap();

        assert_eq!(content, b"jpeg bytes");
        assert!(key.ends_with("_photo.jpg"));
    }

    #[tokio::test]
    async fn same_name_gets_distinct_keys() {
        let (store, _root) = store().await;

        let first = store.put("dup.txt", b"a").await.unwrap();
        let second = store.put("dup.txt", b"b").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.get(&first).await.unwrap(), b"a");
        assert_eq!(store.get(&second).await.unwrap(), b"b");
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let (store, root) = store().await;

        for name in ["../../etc/passwd", "..\\..\\boot.ini", ".."] {
            let result = store.put(name, b"x").await;
            assert!(matches!(result, Err(ApplicationError::InvalidName(_))));
        }

        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn names_with_directories_are_flattened() {
        let (store, root) = store().await;

        let key = store.put("album/cover art.png", b"png").await.unwrap();

        assert!(key.ends_with("_cover_art.png"));
        // The blob lands directly inside the root, no subdirectory.
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 1);
        assert!(root.path().join(&key).is_file());
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let (store, _root) = store().await;

        let result = store.get("no-such-key").await;
        assert!(matches!(result, Err(ApplicationError::NotFound)));
    }

    #[tokio::test]
    async fn get_refuses_keys_with_separators() {
        let (store, _root) = store().await;

        let result = store.get("../outside").await;
        assert!(matches!(result, Err(ApplicationError::InvalidName(_))));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (store, _root) = store().await;

        let key = store.put("once.txt", b"x").await.unwrap();
        store.delete(&key).await.unwrap();
        store.delete(&key).await.unwrap();

        assert!(matches!(
            store.get(&key).await,
            Err(ApplicationError::NotFound)
        ));
    }
}
