//! Document identifier computation using BLAKE3
//!
//! DocumentId = BLAKE3-XOF(path)[0..64]
//!
//! The identifier covers the absolute path string only, never file content,
//! so listing a directory costs no file reads. A rename or a move changes
//! the path and therefore the identifier.

use crate::types::{DocumentId, DOCUMENT_ID_LEN};
use blake3::Hasher;
use std::path::Path;

/// Compute the identifier of the document at `path`
pub fn document_id(path: &Path) -> DocumentId {
    id_from_bytes(path.as_os_str().as_encoded_bytes())
}

/// Compute an identifier from a path string. Total over any input.
pub fn id_from_path_str(path: &str) -> DocumentId {
    id_from_bytes(path.as_bytes())
}

fn id_from_bytes(path: &[u8]) -> DocumentId {
    let mut hasher = Hasher::new();
    hasher.update(path);

    let mut out = [0u8; DOCUMENT_ID_LEN];
    hasher.finalize_xof().fill(&mut out);
    DocumentId::from_bytes(out)
}
