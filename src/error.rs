//! Error types for walking
//!
//! Two tiers: [`WalkError`] is returned when a walk cannot be started at all,
//! [`EntryError`] travels inline on an [`Entry`](crate::Entry) and never stops
//! the walk.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to start a walk. No stream is produced.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot access '{}': {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("failed to start walker thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Operation that failed for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOp {
    Stat,
    ReadDir,
    ReadLink,
}

impl fmt::Display for EntryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryOp::Stat => "stat",
            EntryOp::ReadDir => "read directory",
            EntryOp::ReadLink => "read link",
        };
        f.write_str(s)
    }
}

/// Per-entry failure, carried on the entry it belongs to.
#[derive(Error, Debug)]
#[error("{op} failed: {source}")]
pub struct EntryError {
    op: EntryOp,
    #[source]
    source: io::Error,
}

impl EntryError {
    pub fn new(op: EntryOp, source: io::Error) -> Self {
        Self { op, source }
    }

    pub fn op(&self) -> EntryOp {
        self.op
    }

    pub fn io_error(&self) -> &io::Error {
        &self.source
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}
