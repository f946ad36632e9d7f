#[derive(Debug)]
pub enum ApplicationError {
    /// Display or storage name is empty or contains a path-traversal segment.
    InvalidName(String),
    NotFound,
    /// Read/write failure against the blob store.
    StorageFailure(String),
    /// Metadata repository failure.
    DatabaseError(String),
    BadRequest(String),
    Unauthorized,
}
