mod error;
mod fs_blob_store;

pub use error::StorageError;
pub use fs_blob_store::FsBlobStore;
