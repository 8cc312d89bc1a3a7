//! Document Store
//!
//! Mutation and read operations over the two managed directories. The
//! filesystem is the only state: every operation re-scans, resolves the
//! identifier, then acts on the resolved file. Structural conflicts (an
//! occupied target name) fail loudly; vanished identifiers resolve to
//! `NotFound` or, inside a merge, are skipped.

use crate::document::index::STAGING_PREFIX;
use crate::document::path::{bare_name, resolve_directory};
use crate::document::{document_id, resolve_many_ordered, resolve_one, scan};
use crate::error::{DocumentError, StorageError};
use crate::merge::MergeEngine;
use crate::types::{DocumentEntry, DocumentId, Location};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Body of a rename request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// Body of a merge request: identifiers in merge order plus a destination name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub ids: Vec<DocumentId>,
    pub name: String,
}

/// Result of a merge request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new document was created from `sources`, in that order
    Merged {
        entry: DocumentEntry,
        sources: Vec<String>,
    },
    /// None of the requested identifiers resolved; nothing was written
    Skipped,
}

/// Raw document content with its current name
#[derive(Debug, Clone)]
pub struct DocumentContent {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub struct DocumentStore {
    inbox: PathBuf,
    output: PathBuf,
    engine: MergeEngine,
}

impl DocumentStore {
    /// Create a store over `inbox` and `output`, both resolved to absolute paths
    pub fn new(inbox: &Path, output: &Path, engine: MergeEngine) -> Result<Self, StorageError> {
        Ok(Self {
            inbox: resolve_directory(inbox)?,
            output: resolve_directory(output)?,
            engine,
        })
    }

    pub fn dir(&self, location: Location) -> &Path {
        match location {
            Location::Inbox => &self.inbox,
            Location::Output => &self.output,
        }
    }

    pub fn engine(&self) -> &MergeEngine {
        &self.engine
    }

    /// List the regular files of one directory with their identifiers
    pub fn list(&self, location: Location) -> Result<Vec<DocumentEntry>, DocumentError> {
        Ok(scan(self.dir(location))?)
    }

    /// Resolve `id` in `location` to its entry and absolute path
    pub fn locate(
        &self,
        location: Location,
        id: &DocumentId,
    ) -> Result<(DocumentEntry, PathBuf), DocumentError> {
        let dir = self.dir(location);
        let entry = resolve_one(dir, id)?.ok_or(DocumentError::NotFound(*id))?;
        let path = dir.join(&entry.name);
        Ok((entry, path))
    }

    /// Read an inbox document's bytes
    pub fn fetch(&self, id: &DocumentId) -> Result<DocumentContent, DocumentError> {
        let (entry, path) = self.locate(Location::Inbox, id)?;
        let bytes = fs::read(&path).map_err(|e| not_found_or(e, id))?;
        Ok(DocumentContent {
            name: entry.name,
            bytes,
        })
    }

    /// Rename an inbox document; its identifier changes with its path
    pub fn rename(&self, id: &DocumentId, new_name: &str) -> Result<DocumentEntry, DocumentError> {
        let new_name = bare_name(new_name).map_err(invalid_request)?;
        let (entry, source) = self.locate(Location::Inbox, id)?;
        let target = self.inbox.join(&new_name);

        ensure_vacant(&target)?;
        fs::rename(&source, &target).map_err(|e| not_found_or(e, id))?;

        info!(from = %entry.name, to = %new_name, "Renamed document");
        Ok(DocumentEntry {
            id: document_id(&target),
            name: new_name,
        })
    }

    /// Delete an inbox document
    pub fn delete(&self, id: &DocumentId) -> Result<(), DocumentError> {
        let (entry, path) = self.locate(Location::Inbox, id)?;
        if !path.exists() {
            return Err(DocumentError::NotFound(*id));
        }
        fs::remove_file(&path).map_err(|e| not_found_or(e, id))?;

        info!(name = %entry.name, "Deleted document");
        Ok(())
    }

    /// Move an inbox document to the output directory, keeping its name
    pub fn move_to_output(&self, id: &DocumentId) -> Result<DocumentEntry, DocumentError> {
        let (entry, source) = self.locate(Location::Inbox, id)?;
        let target = self.output.join(&entry.name);

        ensure_vacant(&target)?;
        match fs::rename(&source, &target) {
            Ok(()) => {}
            Err(e) if is_cross_device(&e) => copy_then_remove(&source, &self.output, &target)?,
            Err(e) => return Err(not_found_or(e, id)),
        }

        info!(name = %entry.name, "Moved document to output directory");
        Ok(DocumentEntry {
            id: document_id(&target),
            name: entry.name,
        })
    }

    /// Merge inbox documents, in request order, into a new inbox document
    ///
    /// Identifiers that no longer resolve are skipped. When none resolve the
    /// request is a no-op.
    pub fn merge(&self, request: &MergeRequest) -> Result<MergeOutcome, DocumentError> {
        if request.ids.is_empty() {
            return Err(DocumentError::InvalidRequest(
                "merge needs at least one document id".to_string(),
            ));
        }
        if request.name.trim().is_empty() {
            return Err(DocumentError::InvalidRequest(
                "merge needs a destination name".to_string(),
            ));
        }
        let name = bare_name(&request.name).map_err(invalid_request)?;

        let resolved = resolve_many_ordered(&self.inbox, &request.ids)?;
        if resolved.is_empty() {
            info!(requested = request.ids.len(), "No merge sources resolved; nothing merged");
            return Ok(MergeOutcome::Skipped);
        }
        if resolved.len() < request.ids.len() {
            info!(
                requested = request.ids.len(),
                resolved = resolved.len(),
                "Skipping unresolved merge sources"
            );
        }

        let target = self.inbox.join(&name);
        ensure_vacant(&target)?;

        let sources: Vec<PathBuf> = resolved.iter().map(|e| self.inbox.join(&e.name)).collect();
        let created = self.engine.merge(&sources, &self.inbox, &name)?;

        Ok(MergeOutcome::Merged {
            entry: DocumentEntry {
                id: document_id(&created),
                name,
            },
            sources: resolved.into_iter().map(|e| e.name).collect(),
        })
    }
}

fn ensure_vacant(target: &Path) -> Result<(), DocumentError> {
    // symlink_metadata: a dangling link still occupies the name
    if fs::symlink_metadata(target).is_ok() {
        warn!(target = ?target, "Target file already exists");
        return Err(DocumentError::Conflict(target.to_path_buf()));
    }
    Ok(())
}

fn invalid_request(err: StorageError) -> DocumentError {
    DocumentError::InvalidRequest(err.to_string())
}

/// A file that disappears between resolution and action is a lost race, not an IO fault
fn not_found_or(err: std::io::Error, id: &DocumentId) -> DocumentError {
    if err.kind() == ErrorKind::NotFound {
        DocumentError::NotFound(*id)
    } else {
        DocumentError::from(err)
    }
}

#[cfg(unix)]
fn is_cross_device(err: &std::io::Error) -> bool {
    // EXDEV
    err.raw_os_error() == Some(18)
}

#[cfg(not(unix))]
fn is_cross_device(_err: &std::io::Error) -> bool {
    false
}

/// Move across filesystems: stage a copy in the target directory, publish it
/// without clobbering, then drop the source. The copy is withdrawn if the
/// source cannot be removed.
fn copy_then_remove(source: &Path, target_dir: &Path, target: &Path) -> Result<(), DocumentError> {
    let staged = tempfile::Builder::new()
        .prefix(&format!("{}move-", STAGING_PREFIX))
        .suffix(".tmp")
        .tempfile_in(target_dir)?;
    fs::copy(source, staged.path())?;
    staged.persist_noclobber(target).map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            DocumentError::Conflict(target.to_path_buf())
        } else {
            DocumentError::from(e.error)
        }
    })?;

    if let Err(e) = fs::remove_file(source) {
        if let Err(rollback) = fs::remove_file(target) {
            warn!(
                source = ?source,
                target = ?target,
                error = %rollback,
                "Could not withdraw copied document; it now exists in both directories"
            );
        }
        return Err(e.into());
    }
    Ok(())
}
