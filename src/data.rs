use std::fmt::{Debug, Formatter};
use std::pin::Pin;
use std::time::SystemTime;
use tokio::io::AsyncRead;

pub type ModifiedTime = SystemTime;

pub type ContentReader = Pin<Box<dyn AsyncRead + Send>>;

/// Stored note body together with the mtime of the same version.
pub struct NoteContent {
    pub reader: ContentReader,
    pub size: u64,
    pub mtime: ModifiedTime,
}

impl Debug for NoteContent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteContent")
            .field("size", &self.size)
            .field("mtime", &self.mtime)
            .finish_non_exhaustive()
    }
}
