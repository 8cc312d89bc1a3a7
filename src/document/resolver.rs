//! Document resolver: identifiers back to directory entries

use crate::document::index::scan;
use crate::error::StorageError;
use crate::types::{DocumentEntry, DocumentId};
use std::path::Path;
use tracing::debug;

/// Resolve a single identifier against a fresh scan of `dir`
///
/// Returns `Ok(None)` when nothing in the directory hashes to `id`; an absent
/// document is an expected race, not an error. Should two files ever share an
/// identifier, the first in scan order wins.
pub fn resolve_one(dir: &Path, id: &DocumentId) -> Result<Option<DocumentEntry>, StorageError> {
    let entries = scan(dir)?;
    let found = entries.into_iter().find(|entry| entry.id == *id);
    if found.is_none() {
        debug!(id = %id, dir = ?dir, "Document not found");
    }
    Ok(found)
}

/// Resolve many identifiers against one scan of `dir`, in caller order
///
/// Identifiers without a match are omitted. Repeated identifiers are resolved
/// independently, so a document listed twice appears twice.
pub fn resolve_many_ordered(
    dir: &Path,
    ids: &[DocumentId],
) -> Result<Vec<DocumentEntry>, StorageError> {
    let entries = scan(dir)?;
    Ok(select_ordered(&entries, ids))
}

/// Pick entries from one listing in the order given by `ids`
pub fn select_ordered(entries: &[DocumentEntry], ids: &[DocumentId]) -> Vec<DocumentEntry> {
    ids.iter()
        .filter_map(|id| {
            let found = entries.iter().find(|entry| entry.id == *id);
            if found.is_none() {
                debug!(id = %id, "Skipping unresolved document");
            }
            found.cloned()
        })
        .collect()
}
