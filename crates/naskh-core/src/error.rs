//! Error types for Naskh

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Write admission
    #[error("writes only accepted on primary node")]
    WriteRejected,

    // Key errors
    #[error("key not found")]
    KeyNotFound,

    #[error("key is required")]
    KeyRequired,

    // Replication protocol errors
    #[error("malformed replication command: {0}")]
    MalformedCommand(String),

    // Storage errors
    #[error("storage backend error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// HTTP status code this error maps to at the API boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::WriteRejected | Error::KeyRequired | Error::MalformedCommand(_) => 400,
            Error::KeyNotFound => 404,
            Error::Storage(_) | Error::Io(_) | Error::Other(_) => 500,
        }
    }
}
