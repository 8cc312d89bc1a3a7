//! Directory index: one live scan of a managed directory

use crate::document::id::document_id;
use crate::error::StorageError;
use crate::types::DocumentEntry;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Name prefix of in-flight files (merge output, cross-device moves).
/// They are never documents and never listed.
pub const STAGING_PREFIX: &str = ".scandesk-";

/// Scan `dir` and map each regular file to (name, id)
///
/// Only the directory's own entries are visited; subdirectories and symbolic
/// links are excluded, and so are staging files named with `STAGING_PREFIX`.
/// Entries come back sorted by name, but the set may change between two
/// calls and callers must not depend on positions.
/// An unreadable or missing directory is an error, an empty one is not.
pub fn scan(dir: &Path) -> Result<Vec<DocumentEntry>, StorageError> {
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .max_depth(1)
        .sort_by_file_name();

    let mut entries = Vec::new();

    for entry in walker {
        let entry = entry.map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to read directory {:?}: {}", dir, e),
            ))
        })?;

        if entry.depth() == 0 {
            if !entry.file_type().is_dir() {
                return Err(StorageError::InvalidPath(format!(
                    "Not a directory: {:?}",
                    dir
                )));
            }
            continue;
        }

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = ?entry.path(), "Skipping document with non UTF-8 name");
            continue;
        };

        if name.starts_with(STAGING_PREFIX) {
            debug!(name, "Skipping staging file");
            continue;
        }

        entries.push(DocumentEntry {
            name: name.to_string(),
            id: document_id(&dir.join(name)),
        });
    }

    Ok(entries)
}
