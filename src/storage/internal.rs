use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use async_trait::async_trait;
use log::{debug, error, trace};
use tokio::io;
use tokio::io::AsyncRead;

use crate::config::app_config::AppConfig;
use crate::data::{ModifiedTime, NoteContent};
use crate::key::NoteKey;
use crate::lib_constants::{MTIME_BUMP_STEPS, NOTES_DIRECTORY_PATH};
use crate::storage::errors::StorageError;
use crate::storage::NoteBackend;

use io_trait::NoteStorageIo;
use io_trait::ProductionNoteStorageIo;

mod io_trait;
#[cfg(test)] mod tests;

const TMP_FILENAME_INFIX: &str = ".tmp.";

pub type NoteStorage = NoteStorageImpl<ProductionNoteStorageIo>;

/// Filesystem backend: one file per key, mtime kept by the filesystem.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct NoteStorageImpl<Io: NoteStorageIo> {
    io: Io,
    basedir: PathBuf,
    max_note_len: u64,
}

impl NoteStorage {
    pub async fn new(
        app_config: &AppConfig,
    ) -> Result<NoteStorage, StorageError> {
        Self::new_internal(
            Self::get_notes_dir(&app_config.data_directory),
            app_config.max_note_size,
            ProductionNoteStorageIo::new(),
        ).await
    }

    pub fn get_notes_dir(data_directory: &Path) -> PathBuf {
        data_directory.join(NOTES_DIRECTORY_PATH)
    }
}

#[allow(private_bounds)]
impl<Io: NoteStorageIo> NoteStorageImpl<Io> {
    async fn new_internal(
        notes_dir: PathBuf,
        max_note_size: u64,
        io: Io,
    ) -> Result<NoteStorageImpl<Io>, StorageError> {
        debug!(
            "creating note storage at \"{}\"",
            notes_dir.display(),
        );
        match io.metadata(&notes_dir).await {
            Ok(meta) if meta.is_dir => {},
            Ok(_) => return Err(StorageError::DataDirNotInitialized),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let data_dir_exists = match notes_dir.parent() {
                    Some(parent) => io.metadata(parent).await
                        .map(|meta| meta.is_dir)
                        .unwrap_or(false),
                    None => false,
                };
                if !data_dir_exists {
                    return Err(StorageError::DataDirNotInitialized);
                }
                debug!("creating notes directory \"{}\"", notes_dir.display());
                io.create_dir(&notes_dir).await?;
            },
            Err(e) => return Err(e.into()),
        }
        Ok(NoteStorageImpl {
            io,
            basedir: notes_dir,
            max_note_len: max_note_size,
        })
    }

    fn get_note_path(&self, key: &NoteKey) -> PathBuf {
        self.basedir.join(key.as_str())
    }

    fn get_note_tmp_path(&self, key: &NoteKey) -> PathBuf {
        self.basedir
            .join(
                key.to_string() +
                    TMP_FILENAME_INFIX +
                    &self.io.generate_tmp_suffix()
            )
    }

    async fn remove_tmp_file(&self, tmp_path: &Path, key: &NoteKey) {
        match self.io.remove_file(tmp_path).await {
            Ok(()) => {},
            Err(e) if e.kind() == ErrorKind::NotFound => {},
            Err(e) => error!(
                "failed to remove tmp file \"{}\" for note {key}: {e}",
                tmp_path.display(),
            ),
        }
    }

    // coarse filesystem timestamps may not reflect a small step
    async fn bump_mtime_past(
        &self,
        path: &Path,
        previous: SystemTime,
    ) -> io::Result<SystemTime> {
        for step in MTIME_BUMP_STEPS {
            self.io.set_mtime(path, previous + step).await?;
            let recorded = self.io.metadata(path).await?.mtime;
            trace!(
                "bumped mtime of \"{}\" by {step:?}, recorded {recorded:?}",
                path.display(),
            );
            if recorded > previous {
                return Ok(recorded);
            }
        }
        Err(io::Error::other("filesystem does not record a newer modification time"))
    }

    async fn write_tmp(
        &self,
        key: &NoteKey,
        tmp_path: &Path,
        content: &mut (dyn AsyncRead + Send + Unpin),
        previous_mtime: Option<SystemTime>,
    ) -> Result<ModifiedTime, StorageError> {
        let written = self.io
            .write_file(tmp_path, content, self.max_note_len + 1)
            .await?;
        trace!(
            "wrote {} bytes for note {key} to \"{}\"",
            written.size,
            tmp_path.display(),
        );
        if written.size > self.max_note_len {
            debug!("note {key} exceeds {} bytes", self.max_note_len);
            return Err(StorageError::TooBig);
        }
        Ok(
            match previous_mtime {
                Some(previous) if written.mtime <= previous =>
                    self.bump_mtime_past(tmp_path, previous).await?,
                _ => written.mtime,
            }
        )
    }
}

#[async_trait]
impl<Io: NoteStorageIo> NoteBackend for NoteStorageImpl<Io> {
    async fn stat(&self, key: &NoteKey) -> Result<ModifiedTime, StorageError> {
        let path = self.get_note_path(key);
        trace!("stat note {key} at \"{}\"", path.display());
        match self.io.metadata(&path).await {
            Ok(meta) if !meta.is_dir => Ok(meta.mtime),
            Ok(_) => Err(StorageError::NoteNotFound),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NoteNotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, key: &NoteKey) -> Result<NoteContent, StorageError> {
        let path = self.get_note_path(key);
        debug!("reading note {key} at \"{}\"", path.display());
        let file = self.io
            .open_file(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NoteNotFound,
                _ => StorageError::Io(e),
            })?;
        Ok(
            NoteContent {
                reader: file.file,
                size: file.size,
                mtime: file.mtime,
            }
        )
    }

    async fn put(
        &self,
        key: &NoteKey,
        content: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<ModifiedTime, StorageError> {
        let path = self.get_note_path(key);
        debug!("writing note {key} to \"{}\"", path.display());
        let previous_mtime = match self.io.metadata(&path).await {
            Ok(meta) => Some(meta.mtime),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        let tmp_path = self.get_note_tmp_path(key);
        trace!("tmp filename for note {key}: \"{}\"", tmp_path.display());
        let mtime = match self.write_tmp(key, &tmp_path, content, previous_mtime).await {
            Ok(mtime) => mtime,
            Err(e) => {
                self.remove_tmp_file(&tmp_path, key).await;
                return Err(e);
            },
        };
        trace!("renaming tmp file \"{}\" for note {key}", tmp_path.display());
        if let Err(e) = self.io.rename_file(&tmp_path, &path).await {
            error!(
                "failed to rename tmp file \"{}\" for note {key}: {e}",
                tmp_path.display(),
            );
            self.remove_tmp_file(&tmp_path, key).await;
            return Err(e.into());
        }
        Ok(mtime)
    }

    async fn delete(&self, key: &NoteKey) -> Result<(), StorageError> {
        let path = self.get_note_path(key);
        debug!("deleting note {key} at \"{}\"", path.display());
        self.io
            .remove_file(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NoteNotFound,
                _ => StorageError::Io(e),
            })
    }
}
