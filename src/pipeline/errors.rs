use std::error::Error;
use rocket::http::Status;
use thiserror::Error;
use crate::oracle::OracleError;
use crate::storage::StorageError;

type Cause = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum JotError {
    #[error("invalid password")]
    InvalidPassword,

    #[error("could not find jot under key: {0}")]
    NotFound(String),

    #[error("etag mismatch")]
    PreconditionFailed,

    #[error("jot too large")]
    TooBig,

    #[error("not implemented")]
    NotImplemented,

    #[error("{message}: {cause}")]
    Unknown {
        message: &'static str,
        cause: Cause,
    },
}

impl JotError {
    pub fn unknown(message: &'static str, cause: impl Into<Cause>) -> Self {
        JotError::Unknown {
            message,
            cause: cause.into(),
        }
    }

    pub(super) fn from_storage(key: &str, e: StorageError) -> Self {
        match e {
            StorageError::NoteNotFound => JotError::NotFound(key.to_owned()),
            StorageError::TooBig => JotError::TooBig,
            e => JotError::unknown("storage failure", e),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            JotError::InvalidPassword => Status::Unauthorized,
            JotError::NotFound(_) => Status::NotFound,
            JotError::PreconditionFailed => Status::PreconditionFailed,
            JotError::TooBig => Status::PayloadTooLarge,
            JotError::NotImplemented => Status::NotImplemented,
            JotError::Unknown { .. } => Status::InternalServerError,
        }
    }

    /// What the client gets to see, the cause of an `Unknown` stays server-side.
    pub fn public_message(&self) -> String {
        match self {
            JotError::Unknown { message, .. } => (*message).to_owned(),
            e => e.to_string(),
        }
    }
}

impl From<OracleError> for JotError {
    fn from(e: OracleError) -> Self {
        JotError::unknown("password derivation failure", e)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(JotError::InvalidPassword.status().code, 401);
        assert_eq!(JotError::NotFound("k".into()).status().code, 404);
        assert_eq!(JotError::PreconditionFailed.status().code, 412);
        assert_eq!(JotError::TooBig.status().code, 413);
        assert_eq!(JotError::NotImplemented.status().code, 501);
        assert_eq!(JotError::unknown("oops", io::Error::other("disk")).status().code, 500);
    }

    #[test]
    fn public_messages() {
        assert_eq!(JotError::InvalidPassword.public_message(), "invalid password");
        assert_eq!(
            JotError::NotFound("abc12".into()).public_message(),
            "could not find jot under key: abc12",
        );
        assert_eq!(JotError::PreconditionFailed.public_message(), "etag mismatch");
    }

    #[test]
    fn unknown_hides_cause() {
        let e = JotError::unknown("storage failure", io::Error::other("/var/jot/notes: EIO"));
        assert_eq!(e.public_message(), "storage failure");
        assert!(e.to_string().contains("EIO"));
    }

    #[test]
    fn storage_errors_are_classified() {
        assert!(matches!(
            JotError::from_storage("k", StorageError::NoteNotFound),
            JotError::NotFound(key) if key == "k",
        ));
        assert!(matches!(JotError::from_storage("k", StorageError::TooBig), JotError::TooBig));
        assert!(matches!(
            JotError::from_storage("k", StorageError::Io(io::Error::other("x"))),
            JotError::Unknown { .. },
        ));
    }
}
