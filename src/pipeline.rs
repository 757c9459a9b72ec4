mod errors;

use std::sync::Arc;
use log::{debug, info, trace};
use tokio::io::AsyncRead;
use tokio::task::spawn_blocking;
use crate::concurrency::{check_read, check_write, ETag, ReadDecision};
use crate::data::{ModifiedTime, NoteContent};
use crate::key::{KeyGenerator, NoteKey};
use crate::lib_constants::MAX_KEY_GENERATION_ATTEMPTS;
use crate::oracle::PasswordOracle;
use crate::storage::NoteBackend;

pub use errors::JotError;

pub type Body<'a> = &'a mut (dyn AsyncRead + Send + Unpin);

/// Orchestrates every request kind over the oracle and the backend.
pub struct Jot {
    oracle: Arc<dyn PasswordOracle>,
    backend: Box<dyn NoteBackend>,
    key_generator: Box<dyn KeyGenerator>,
}

#[derive(Clone, Copy, Debug)]
pub struct ReadRequest<'a> {
    pub key: &'a str,
    pub if_none_match: Option<&'a str>,
}

#[derive(Clone, Copy, Debug)]
pub struct WriteRequest<'a> {
    pub key: &'a str,
    pub password: &'a str,
    pub if_match: Option<&'a str>,
}

#[derive(Debug)]
pub struct CreatedNote {
    pub key: NoteKey,
    pub password: String,
}

#[derive(Debug)]
pub enum ReadOutcome {
    NotModified {
        etag: ETag,
    },
    Loaded {
        etag: ETag,
        content: NoteContent,
    },
}

impl Jot {
    pub fn new(
        oracle: Arc<dyn PasswordOracle>,
        backend: Box<dyn NoteBackend>,
        key_generator: Box<dyn KeyGenerator>,
    ) -> Self {
        Jot {
            oracle,
            backend,
            key_generator,
        }
    }

    pub async fn create(&self, body: Body<'_>) -> Result<CreatedNote, JotError> {
        let key = self.generate_unused_key().await?;
        let password = self.derive_password(&key).await?;
        self.backend
            .put(&key, body)
            .await
            .map_err(|e| JotError::from_storage(&key, e))?;
        info!("created note {key}");
        Ok(CreatedNote { key, password })
    }

    pub async fn read(&self, request: ReadRequest<'_>) -> Result<ReadOutcome, JotError> {
        let key = parse_key(request.key)?;
        let etag = self.current_etag(&key).await?;
        if check_read(&etag, request.if_none_match) == ReadDecision::NotModified {
            debug!("note {key} not modified since {etag}");
            return Ok(ReadOutcome::NotModified { etag });
        }
        let content = self.backend
            .get(&key)
            .await
            .map_err(|e| JotError::from_storage(&key, e))?;
        trace!("loaded {} bytes of note {key}", content.size);
        // the stat may be stale by now, tag the version actually sent
        Ok(
            ReadOutcome::Loaded {
                etag: make_etag(content.mtime)?,
                content,
            }
        )
    }

    pub async fn update(
        &self,
        request: WriteRequest<'_>,
        body: Body<'_>,
    ) -> Result<ETag, JotError> {
        let key = self.authorize_write(request).await?;
        let mtime = self.backend
            .put(&key, body)
            .await
            .map_err(|e| JotError::from_storage(&key, e))?;
        info!("updated note {key}");
        make_etag(mtime)
    }

    pub async fn delete(&self, request: WriteRequest<'_>) -> Result<(), JotError> {
        let key = self.authorize_write(request).await?;
        self.backend
            .delete(&key)
            .await
            .map_err(|e| JotError::from_storage(&key, e))?;
        info!("deleted note {key}");
        Ok(())
    }

    async fn generate_unused_key(&self) -> Result<NoteKey, JotError> {
        for _ in 0..MAX_KEY_GENERATION_ATTEMPTS {
            let key = self.key_generator.generate();
            let exists = self.backend
                .exists(&key)
                .await
                .map_err(|e| JotError::from_storage(&key, e))?;
            if !exists {
                return Ok(key);
            }
            debug!("generated key {key} is taken, retrying");
        }
        Err(
            JotError::unknown(
                "could not allocate a key",
                format!("{MAX_KEY_GENERATION_ATTEMPTS} generated keys in a row were taken"),
            )
        )
    }

    // password first: the answer must not depend on whether the note exists
    async fn authorize_write(&self, request: WriteRequest<'_>) -> Result<NoteKey, JotError> {
        if !self.check_password(request.key, request.password).await? {
            debug!("invalid password for note {:?}", request.key);
            return Err(JotError::InvalidPassword);
        }
        trace!("password accepted for note {:?}", request.key);
        let key = parse_key(request.key)?;
        let etag = self.current_etag(&key).await?;
        check_write(&etag, request.if_match).map_err(|_| {
            debug!("precondition failed for note {key}, current version {etag}");
            JotError::PreconditionFailed
        })?;
        Ok(key)
    }

    // argon2 rounds are too heavy for the executor threads
    async fn derive_password(&self, key: &NoteKey) -> Result<String, JotError> {
        let oracle = self.oracle.clone();
        let key = key.as_str().to_owned();
        let password = spawn_blocking(move || oracle.generate(&key))
            .await
            .map_err(|e| JotError::unknown("password derivation failure", e))??;
        Ok(password)
    }

    async fn check_password(&self, key: &str, supplied: &str) -> Result<bool, JotError> {
        let oracle = self.oracle.clone();
        let key = key.to_owned();
        let supplied = supplied.to_owned();
        let matches = spawn_blocking(move || oracle.is_match(&key, &supplied))
            .await
            .map_err(|e| JotError::unknown("password derivation failure", e))??;
        Ok(matches)
    }

    async fn current_etag(&self, key: &NoteKey) -> Result<ETag, JotError> {
        let mtime = self.backend
            .stat(key)
            .await
            .map_err(|e| JotError::from_storage(key, e))?;
        make_etag(mtime)
    }
}

fn parse_key(key: &str) -> Result<NoteKey, JotError> {
    key.parse().map_err(|e| {
        debug!("rejecting key {key:?}: {e}");
        JotError::NotFound(key.to_owned())
    })
}

fn make_etag(mtime: ModifiedTime) -> Result<ETag, JotError> {
    ETag::from_mtime(mtime).map_err(|e| JotError::unknown("cannot render etag", e))
}
