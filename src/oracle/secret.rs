use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::{fs, io};
use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process-wide secret from which every note password is derived.
///
/// Loaded once at startup and never written back or logged.
pub struct SecretMaterial {
    master_password: MasterPassword,
    seed: Box<[u8]>,
}

impl SecretMaterial {
    pub fn new(master_password: MasterPassword, seed: impl Into<Box<[u8]>>) -> Self {
        SecretMaterial {
            master_password,
            seed: seed.into(),
        }
    }

    pub fn load(
        master_password: MasterPassword,
        seed_path: &Path,
    ) -> Result<Self, SecretLoadError> {
        let seed = Base64
            ::decode_vec(
                fs::read_to_string(seed_path)?
                    .trim_ascii_end()
            )
            .map_err(SecretLoadError::SeedDecode)?;
        if seed.is_empty() {
            return Err(SecretLoadError::EmptySeed);
        }
        Ok(SecretMaterial::new(master_password, seed))
    }

    pub fn master_password(&self) -> &str {
        &self.master_password.0
    }

    pub fn seed(&self) -> &[u8] {
        &self.seed
    }
}

impl Debug for SecretMaterial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretMaterial")
            .field("master_password", &self.master_password)
            .field("seed", &format_args!("<{} bytes>", self.seed.len()))
            .finish()
    }
}

#[derive(Clone, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MasterPassword(String);

impl MasterPassword {
    pub fn new(password: impl Into<String>) -> Self {
        MasterPassword(password.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for MasterPassword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterPassword(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum SecretLoadError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode seed: {0}")]
    SeedDecode(base64ct::Error),

    #[error("seed file is empty")]
    EmptySeed,
}
