use std::collections::HashMap;
use std::io::Cursor;
use std::time::{Duration, SystemTime};
use async_trait::async_trait;
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::RwLock;

use crate::data::{ModifiedTime, NoteContent};
use crate::key::NoteKey;
use crate::storage::errors::StorageError;
use crate::storage::NoteBackend;

const MIN_MTIME_STEP: Duration = Duration::from_nanos(1);

#[derive(Debug)]
struct StoredNote {
    contents: Vec<u8>,
    mtime: ModifiedTime,
}

/// Volatile backend, everything is lost on restart.
#[derive(Debug)]
pub struct MemoryBackend {
    notes: RwLock<HashMap<NoteKey, StoredNote>>,
    max_note_len: u64,
}

impl MemoryBackend {
    pub fn new(max_note_size: u64) -> MemoryBackend {
        MemoryBackend {
            notes: RwLock::new(HashMap::new()),
            max_note_len: max_note_size,
        }
    }
}

#[async_trait]
impl NoteBackend for MemoryBackend {
    async fn stat(&self, key: &NoteKey) -> Result<ModifiedTime, StorageError> {
        self.notes.read().await
            .get(key)
            .map(|note| note.mtime)
            .ok_or(StorageError::NoteNotFound)
    }

    async fn get(&self, key: &NoteKey) -> Result<NoteContent, StorageError> {
        let notes = self.notes.read().await;
        let note = notes.get(key).ok_or(StorageError::NoteNotFound)?;
        Ok(
            NoteContent {
                reader: Box::pin(Cursor::new(note.contents.clone())),
                size: note.contents.len() as u64,
                mtime: note.mtime,
            }
        )
    }

    async fn put(
        &self,
        key: &NoteKey,
        content: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ModifiedTime, StorageError> {
        // read outside of the lock, a slow client must not block everyone
        let mut contents = Vec::new();
        content
            .take(self.max_note_len + 1)
            .read_to_end(&mut contents)
            .await?;
        if contents.len() as u64 > self.max_note_len {
            debug!("note {key} exceeds {} bytes", self.max_note_len);
            return Err(StorageError::TooBig);
        }

        let mut notes = self.notes.write().await;
        let now = SystemTime::now();
        let mtime = match notes.get(key) {
            Some(previous) if now <= previous.mtime => previous.mtime + MIN_MTIME_STEP,
            _ => now,
        };
        trace!("storing {} bytes for note {key}", contents.len());
        notes.insert(key.clone(), StoredNote { contents, mtime });
        Ok(mtime)
    }

    async fn delete(&self, key: &NoteKey) -> Result<(), StorageError> {
        self.notes.write().await
            .remove(key)
            .map(|_| ())
            .ok_or(StorageError::NoteNotFound)
    }
}
