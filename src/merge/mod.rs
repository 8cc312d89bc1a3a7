//! Merge engine
//!
//! Combines already-resolved source files, in the order given, into one new
//! document. Output is staged in a hidden temporary file inside the
//! destination directory and renamed into place once complete, so the
//! destination name never refers to a partially written document.
//!
//! The engine knows nothing about identifiers and does not decide overwrite
//! policy; callers check for an existing destination first.

pub mod concat;
pub mod pdf;

pub use concat::ConcatFormat;
pub use pdf::PdfFormat;

use crate::document::index::STAGING_PREFIX;
use crate::document::path::bare_name;
use crate::error::MergeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A source file read into memory, ready to be combined
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Output format of a merge
///
/// Implementations receive every source in merge order and write the combined
/// document to `out`. A source that cannot be interpreted in this format is
/// reported as `MergeError::SourceUnreadable` naming that source.
pub trait MergeFormat: Send + Sync {
    fn name(&self) -> &'static str;

    fn combine(&self, sources: &[SourceDocument], out: &mut dyn Write) -> Result<(), MergeError>;
}

/// Configurable selection of a merge format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeFormatKind {
    /// Page-level PDF merge
    #[default]
    Pdf,
    /// Plain byte concatenation
    Concat,
}

impl MergeFormatKind {
    pub fn build(self) -> Arc<dyn MergeFormat> {
        match self {
            MergeFormatKind::Pdf => Arc::new(PdfFormat),
            MergeFormatKind::Concat => Arc::new(ConcatFormat),
        }
    }
}

impl FromStr for MergeFormatKind {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(MergeFormatKind::Pdf),
            "concat" => Ok(MergeFormatKind::Concat),
            other => Err(MergeError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for MergeFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeFormatKind::Pdf => f.write_str("pdf"),
            MergeFormatKind::Concat => f.write_str("concat"),
        }
    }
}

/// Ordered merge of resolved files into a managed directory
#[derive(Clone)]
pub struct MergeEngine {
    format: Arc<dyn MergeFormat>,
}

impl MergeEngine {
    pub fn new(format: Arc<dyn MergeFormat>) -> Self {
        Self { format }
    }

    pub fn from_kind(kind: MergeFormatKind) -> Self {
        Self::new(kind.build())
    }

    pub fn format_name(&self) -> &'static str {
        self.format.name()
    }

    /// Merge `sources` in order into `dir/destination`
    ///
    /// `destination` is reduced to its base name. Every source is read before
    /// anything is written; the first unreadable one aborts the merge with no
    /// output. Returns the path of the created document.
    pub fn merge(
        &self,
        sources: &[PathBuf],
        dir: &Path,
        destination: &str,
    ) -> Result<PathBuf, MergeError> {
        if sources.is_empty() {
            return Err(MergeError::EmptyInput);
        }
        let name =
            bare_name(destination).map_err(|e| MergeError::InvalidDestination(e.to_string()))?;
        let final_path = dir.join(&name);
        let started = Instant::now();

        let documents = sources
            .iter()
            .map(|path| {
                debug!(source = ?path, "Reading merge source");
                fs::read(path)
                    .map(|bytes| SourceDocument {
                        path: path.clone(),
                        bytes,
                    })
                    .map_err(|e| MergeError::SourceUnreadable {
                        path: path.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Removed on drop unless persisted below.
        let mut staged = tempfile::Builder::new()
            .prefix(&format!("{}merge-", STAGING_PREFIX))
            .suffix(".tmp")
            .tempfile_in(dir)?;

        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            self.format.combine(&documents, &mut writer)?;
            writer.flush()?;
        }
        staged.as_file().sync_all()?;

        staged
            .persist(&final_path)
            .map_err(|e| MergeError::IoError(e.error))?;

        info!(
            destination = ?final_path,
            sources = documents.len(),
            format = self.format.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Merged documents"
        );

        Ok(final_path)
    }
}

impl fmt::Debug for MergeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeEngine")
            .field("format", &self.format.name())
            .finish()
    }
}
