mod blob_store;
mod file_service;
mod url_transformer;

pub use blob_store::BlobStore;
pub use file_service::FileService;
pub use url_transformer::UrlTransformer;
