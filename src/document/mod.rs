//! Document addressing
//!
//! Documents are flat regular files in a managed directory, addressed by a
//! digest of their absolute path. Nothing is cached: every lookup re-scans
//! the directory and recomputes identifiers.

pub mod id;
pub mod index;
pub mod path;
pub mod resolver;

pub use id::document_id;
pub use index::scan;
pub use resolver::{resolve_many_ordered, resolve_one};
