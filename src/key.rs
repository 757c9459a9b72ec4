mod generator;

use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use thiserror::Error;
use crate::lib_constants::MAX_KEY_LENGTH;

pub use generator::{make_key, KeyGenerator, ProductionKeyGenerator};

pub(crate) const KEY_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

/// Identifier of a stored note.
///
/// Only URL-safe characters are accepted, so a key is always a single
/// path segment and a plain file name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NoteKey(String);

#[derive(Debug, Error, Eq, PartialEq)]
pub enum NoteKeyParseError {
    #[error("key is empty")]
    Empty,

    #[error("key is longer than {MAX_KEY_LENGTH} characters")]
    TooLong,

    #[error("key contains a forbidden character {0:?}")]
    ForbiddenCharacter(char),
}

impl NoteKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_alphabet_unchecked(key: String) -> Self {
        debug_assert!(NoteKey::validate(&key).is_ok());
        NoteKey(key)
    }

    fn validate(s: &str) -> Result<(), NoteKeyParseError> {
        if s.is_empty() {
            return Err(NoteKeyParseError::Empty);
        }
        if s.len() > MAX_KEY_LENGTH {
            return Err(NoteKeyParseError::TooLong);
        }
        match s.chars().find(|c| !c.is_ascii() || !KEY_ALPHABET.contains(&(*c as u8))) {
            Some(c) => Err(NoteKeyParseError::ForbiddenCharacter(c)),
            None => Ok(()),
        }
    }
}

impl FromStr for NoteKey {
    type Err = NoteKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteKey::validate(s)?;
        Ok(NoteKey(s.to_owned()))
    }
}

impl Deref for NoteKey {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0[..]
    }
}

impl AsRef<str> for NoteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for NoteKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
