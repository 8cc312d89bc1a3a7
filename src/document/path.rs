//! Path helpers: bare-name sanitisation and managed directory resolution

use crate::error::StorageError;
use std::path::{Path, PathBuf};

/// Reduce a caller-supplied name to a bare file name
///
/// Any directory component is stripped (`"../x/out.pdf"` becomes `"out.pdf"`),
/// so a document can never be written outside its managed directory.
/// Names with no usable final component (`""`, `"."`, `".."`, `"/"`) are rejected.
pub fn bare_name(name: &str) -> Result<String, StorageError> {
    if name.contains('\0') {
        return Err(StorageError::InvalidPath(format!(
            "File name contains a NUL byte: {:?}",
            name
        )));
    }

    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .ok_or_else(|| StorageError::InvalidPath(format!("Not a file name: {:?}", name)))?;

    Ok(base.to_string())
}

/// Resolve a managed directory to an absolute path
///
/// Existing directories are canonicalised (dunce keeps Windows paths free of
/// the `\\?\` prefix). Missing ones are joined onto the current directory so
/// that identifiers are still computed over absolute paths; the first scan
/// then reports the missing directory.
pub fn resolve_directory(dir: &Path) -> Result<PathBuf, StorageError> {
    if let Ok(canonical) = dunce::canonicalize(dir) {
        return Ok(canonical);
    }
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(dir))
}
