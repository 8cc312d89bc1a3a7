//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, DocumentError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::DocumentError(DocumentError::NotFound(id)) => {
            format!("No document with id {} (it may have been renamed, moved or deleted)", id)
        }
        ApiError::DocumentError(DocumentError::Conflict(path)) => {
            format!("A file named {:?} already exists", path)
        }
        other => other.to_string(),
    }
}
