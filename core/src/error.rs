use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the index and its corpus loader.
#[derive(Error, Debug)]
pub enum Error {
    /// The source file does not exist, or the identifier is not in the index.
    #[error("'{}' was not found", .path.display())]
    NotFound { path: PathBuf },

    /// Any other failure while reading a source.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IDF requested for a term that no document contains (log10(N / 0)).
    #[error("document frequency of term '{term}' is zero")]
    ZeroDocumentFrequency { term: String },

    /// IDF requested while the index holds no documents.
    #[error("the index is empty")]
    EmptyIndex,
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
