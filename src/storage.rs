mod errors;
mod internal;
mod memory;

use async_trait::async_trait;
use tokio::io::AsyncRead;
use crate::data::{ModifiedTime, NoteContent};
use crate::key::NoteKey;

pub use errors::StorageError;
pub use internal::{NoteStorage, NoteStorageImpl};
pub use memory::MemoryBackend;

/// Key-addressed blob storage.
///
/// Every successful `put` must leave the note with an mtime strictly later
/// than the one it replaced, and readers must never see a partial write.
#[async_trait]
pub trait NoteBackend: Send + Sync {
    async fn stat(&self, key: &NoteKey) -> Result<ModifiedTime, StorageError>;

    async fn get(&self, key: &NoteKey) -> Result<NoteContent, StorageError>;

    async fn put(
        &self,
        key: &NoteKey,
        content: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ModifiedTime, StorageError>;

    async fn delete(&self, key: &NoteKey) -> Result<(), StorageError>;

    async fn exists(&self, key: &NoteKey) -> Result<bool, StorageError> {
        match self.stat(key).await {
            Ok(_) => Ok(true),
            Err(StorageError::NoteNotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
