use async_trait::async_trait;

use crate::errors::StorageError;

/// Bucket holding the uploaded image files.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Removes the object stored under `file_url`. A URL that points
    /// outside the bucket is ignored.
    async fn remove_object(&self, file_url: &str) -> Result<(), StorageError>;
}
