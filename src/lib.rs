//! Scandesk: Inbox/Output Document Desk
//!
//! Manages flat directories of scanned documents. Documents are addressed by
//! a digest of their absolute path, recomputed on every scan, and can be
//! renamed, deleted, moved to the output directory or merged in a caller
//! chosen order. A REST API exposes the same operations.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod merge;
pub mod merge_set;
pub mod server;
pub mod store;
pub mod types;
