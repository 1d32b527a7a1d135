use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// A chapter page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP {status} for {path}")]
    Status { path: String, status: StatusCode },

    #[error("request for {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { source, .. } => source.status(),
            FetchError::Client(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

/// Failure of a single chapter. The harvest logs it and moves on.
#[derive(Debug, Error)]
pub enum ChapterError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not inspect {}: {source}", path.display())]
    Inspect { path: PathBuf, source: io::Error },

    #[error("could not write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Failure that stops the whole harvest.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("could not create book directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}
