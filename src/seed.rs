use std::fs::OpenOptions;
use std::io;
use std::io::Write;
#[cfg(unix)] use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use base64ct::{Base64, Encoding};
use rand::RngCore;
use thiserror::Error;
use crate::lib_constants::SEED_LENGTH;

#[cfg(unix)] const SEED_FILE_MODE: u32 = 0o600;

#[derive(Debug, Error)]
pub enum MakeSeedError {
    #[error("seed file already exists")]
    AlreadyExists,

    #[error("failed writing generated seed: {0}")]
    Io(#[from] io::Error),
}

/// Writes a freshly generated seed to `seed_path`.
///
/// Never overwrites an existing file: replacing the seed invalidates every
/// password handed out so far.
pub fn make_seed(seed_path: &Path) -> Result<(), MakeSeedError> {
    let mut seed = [0u8; SEED_LENGTH];
    rand::rng().fill_bytes(&mut seed);
    let mut options = OpenOptions::new();
    #[cfg(unix)] options.mode(SEED_FILE_MODE);
    let mut file = options
        .write(true)
        .create_new(true)
        .open(seed_path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => MakeSeedError::AlreadyExists,
            _ => MakeSeedError::Io(e),
        })?;
    file.write_all((Base64::encode_string(&seed) + "\n").as_bytes())?;
    file.sync_all()?;
    Ok(())
}

/// Generates the seed unless one exists already, returns whether it did.
pub fn ensure_seed(seed_path: &Path) -> Result<bool, MakeSeedError> {
    match make_seed(seed_path) {
        Ok(()) => Ok(true),
        Err(MakeSeedError::AlreadyExists) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use crate::oracle::{MasterPassword, SecretMaterial};
    use super::*;

    #[test]
    fn generated_seed_is_loadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("seed.b64");
        make_seed(path.path()).unwrap();
        let secret = SecretMaterial::load(MasterPassword::new("pw"), path.path())
            .unwrap();
        assert_eq!(secret.seed().len(), SEED_LENGTH);
    }

    #[test]
    fn refuses_to_overwrite_seed() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("seed.b64");
        path.write_str("AAECAwQFBgc=\n").unwrap();
        let err = make_seed(path.path()).unwrap_err();
        assert!(matches!(err, MakeSeedError::AlreadyExists), "wrong error: {err:?}");
        path.assert("AAECAwQFBgc=\n");
    }

    #[cfg(unix)]
    #[test]
    fn seed_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.child("seed.b64");
        make_seed(path.path()).unwrap();
        let mode = std::fs::metadata(path.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn ensure_seed_keeps_existing_seed() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("seed.b64");
        assert!(ensure_seed(path.path()).unwrap());
        let generated = std::fs::read_to_string(path.path()).unwrap();
        assert!(!ensure_seed(path.path()).unwrap());
        path.assert(generated.as_str());
    }

    #[test]
    fn ensure_seed_reports_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = ensure_seed(&dir.path().join("missing").join("seed.b64")).unwrap_err();
        assert!(matches!(err, MakeSeedError::Io(_)), "wrong error: {err:?}");
    }
}
