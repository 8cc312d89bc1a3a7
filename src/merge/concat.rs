//! Byte-level concatenation

use crate::error::MergeError;
use crate::merge::{MergeFormat, SourceDocument};
use std::io::Write;

/// Writes each source's bytes back to back, in merge order
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatFormat;

impl MergeFormat for ConcatFormat {
    fn name(&self) -> &'static str {
        "concat"
    }

    fn combine(&self, sources: &[SourceDocument], out: &mut dyn Write) -> Result<(), MergeError> {
        for source in sources {
            out.write_all(&source.bytes)?;
        }
        Ok(())
    }
}
