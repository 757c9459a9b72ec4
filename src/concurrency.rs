use std::fmt::{Display, Formatter};
use log::trace;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use crate::data::ModifiedTime;

/// Version token of a note, the RFC 3339 UTC rendering of its mtime.
///
/// Never parsed back: clients echo it and it is compared as an opaque string.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ETag(String);

impl ETag {
    pub fn from_mtime(mtime: ModifiedTime) -> Result<ETag, time::error::Format> {
        OffsetDateTime::from(mtime)
            .format(&Rfc3339)
            .map(ETag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for ETag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadDecision {
    NotModified,
    Load,
}

#[derive(Debug, Error)]
#[error("etag mismatch")]
pub struct PreconditionFailed;

/// `If-None-Match` on reads: anything but an exact match means a full read.
pub fn check_read(current: &ETag, if_none_match: Option<&str>) -> ReadDecision {
    match supplied(if_none_match) {
        Some(tag) if tag == current.as_str() => ReadDecision::NotModified,
        Some(tag) => {
            trace!("if-none-match {tag:?} differs from {current}");
            ReadDecision::Load
        },
        None => ReadDecision::Load,
    }
}

/// `If-Match` on writes: any supplied value that is not an exact match fails.
pub fn check_write(
    current: &ETag,
    if_match: Option<&str>,
) -> Result<(), PreconditionFailed> {
    match supplied(if_match) {
        Some(tag) if tag != current.as_str() => {
            trace!("if-match {tag:?} differs from {current}");
            Err(PreconditionFailed)
        },
        _ => Ok(()),
    }
}

fn supplied(header: Option<&str>) -> Option<&str> {
    header.filter(|h| !h.is_empty())
}
