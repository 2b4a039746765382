//! Error type shared by every drawpad module.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while encoding, storing or syncing drawings.
#[derive(Debug, Error)]
pub enum Error {
    /// A persisted payload (file or blob) could not be parsed.
    #[error("failed to decode {what}: {reason}")]
    Deserialization { what: &'static str, reason: String },

    /// The record store rejected a row operation.
    #[error("record store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Reading or writing a payload file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Login or account creation was refused by the backend.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The cloud backend failed a document or blob operation.
    #[error("remote backend error: {0}")]
    Remote(String),

    #[error("no user is signed in")]
    NotSignedIn,

    /// The drawing has never been saved locally, so it has no id to sync under.
    #[error("drawing has not been saved yet")]
    NotPersisted,

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("persistence guard was closed")]
    GuardClosed,
}

impl Error {
    pub(crate) fn decode(what: &'static str, reason: impl ToString) -> Self {
        Error::Deserialization {
            what,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by a corrupt payload rather than the environment.
    pub fn is_corrupt_payload(&self) -> bool {
        matches!(self, Error::Deserialization { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
