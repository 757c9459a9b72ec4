use std::path::Path;
use std::time::SystemTime;
use async_trait::async_trait;
use tokio::{fs, io};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use crate::data::ContentReader;
use crate::key::make_key;

const TMP_SUFFIX_LENGTH: usize = 12;

#[async_trait]
pub trait NoteStorageIo: Send + Sync {
    async fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    async fn create_dir(&self, path: &Path) -> io::Result<()>;

    async fn open_file(&self, path: &Path) -> io::Result<OpenFile>;

    /// Copies at most `limit` bytes of `data` into a new file at `path`.
    async fn write_file(
        &self,
        path: &Path,
        data: &mut (dyn AsyncRead + Send + Unpin),
        limit: u64,
    ) -> io::Result<WrittenFile>;

    async fn set_mtime(&self, path: &Path, mtime: SystemTime) -> io::Result<()>;

    async fn rename_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn generate_tmp_suffix(&self) -> String;
}

#[derive(Clone, Copy, Debug)]
pub struct Metadata {
    pub is_dir: bool,
    pub mtime: SystemTime,
}

pub struct OpenFile {
    pub file: ContentReader,
    pub size: u64,
    pub mtime: SystemTime,
}

#[derive(Clone, Copy, Debug)]
pub struct WrittenFile {
    pub size: u64,
    pub mtime: SystemTime,
}

#[derive(Debug)]
pub struct ProductionNoteStorageIo;

impl ProductionNoteStorageIo {
    pub fn new() -> Self {
        ProductionNoteStorageIo
    }
}

#[async_trait]
impl NoteStorageIo for ProductionNoteStorageIo {
    async fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let meta = fs::metadata(path).await?;
        Ok(Metadata {
            is_dir: meta.is_dir(),
            mtime: meta.modified()?,
        })
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path).await
    }

    async fn open_file(&self, path: &Path) -> io::Result<OpenFile> {
        let file = fs::File::open(path).await?;
        // stat the open handle: a concurrent rename cannot skew it
        let metadata = file.metadata().await?;
        if metadata.is_dir() {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(
            OpenFile {
                file: Box::pin(file),
                size: metadata.len(),
                mtime: metadata.modified()?,
            }
        )
    }

    async fn write_file(
        &self,
        path: &Path,
        data: &mut (dyn AsyncRead + Send + Unpin),
        limit: u64,
    ) -> io::Result<WrittenFile> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        let size = io::copy(&mut data.take(limit), &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        let metadata = file.metadata().await?;
        Ok(
            WrittenFile {
                size,
                mtime: metadata.modified()?,
            }
        )
    }

    async fn set_mtime(&self, path: &Path, mtime: SystemTime) -> io::Result<()> {
        let path = path.to_owned();
        tokio::task
            ::spawn_blocking(move ||
                std::fs::File::options()
                    .write(true)
                    .open(path)?
                    .set_modified(mtime)
            )
            .await
            .map_err(io::Error::other)?
    }

    async fn rename_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to).await
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }

    fn generate_tmp_suffix(&self) -> String {
        make_key(&mut rand::rng(), TMP_SUFFIX_LENGTH).to_string()
    }
}
