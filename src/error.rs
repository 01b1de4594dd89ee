//! Error taxonomy shared by the store, the applier and the collector.
//!
//! Variants map one-to-one onto the failure kinds the CLI reports:
//! - NotFound        — no batch / file matches a request;
//! - CorruptMetadata — metadata.json missing or unparsable for a targeted batch;
//! - Io              — copy/write/remove failure (carries path + operation);
//! - InvalidInput    — malformed arguments (empty edit set, empty path, bad root).

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("corrupt metadata for batch {batch}: {reason}")]
    CorruptMetadata { batch: String, reason: String },

    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Error::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(batch: &str, reason: impl Into<String>) -> Self {
        Error::CorruptMetadata {
            batch: batch.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_corrupt_metadata(&self) -> bool {
        matches!(self, Error::CorruptMetadata { .. })
    }
}

/// `.io_context("copy", &path)?` — attach the operation and path to a raw io::Error.
pub(crate) trait IoContext<T> {
    fn io_context(self, op: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::result::Result<T, io::Error> {
    fn io_context(self, op: &'static str, path: &Path) -> Result<T> {
        self.map_err(|e| Error::io(op, path, e))
    }
}
