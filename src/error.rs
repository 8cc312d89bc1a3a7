//! Error types for the document desk.

use crate::types::DocumentId;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem-level errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Merge engine errors
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Nothing to merge: no source documents given")]
    EmptyInput,

    #[error("Source document {path:?} is unreadable: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("Invalid merge destination: {0}")]
    InvalidDestination(String),

    #[error("Unknown merge format: {0}")]
    UnknownFormat(String),

    #[error("Merge output could not be assembled: {0}")]
    Format(String),

    #[error("Merge I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors of the document operations (list, fetch, rename, delete, move, merge)
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Target file already exists: {0:?}")]
    Conflict(PathBuf),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Merge failed: {0}")]
    MergeError(#[from] MergeError),
}

impl From<std::io::Error> for DocumentError {
    fn from(err: std::io::Error) -> Self {
        DocumentError::StorageError(StorageError::IoError(err))
    }
}

/// Top-level errors surfaced by the binary and the server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("{0}")]
    DocumentError(#[from] DocumentError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::DocumentError(DocumentError::StorageError(err))
    }
}
