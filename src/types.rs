//! Core types for the document desk.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Width of a document identifier in bytes (512 bits)
pub const DOCUMENT_ID_LEN: usize = 64;

/// DocumentId: deterministic digest of a document's absolute path
///
/// Rendered as 128 lowercase hex characters on the wire. The id is never
/// stored; it is recomputed from the path on every directory scan.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; DOCUMENT_ID_LEN]);

impl DocumentId {
    pub fn from_bytes(bytes: [u8; DOCUMENT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DOCUMENT_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full ids are unwieldy in logs; the prefix is enough to tell them apart.
        write!(f, "DocumentId({}..)", &self.to_hex()[..16])
    }
}

/// Error returned when a string is not a well-formed document id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed document id: {0}")]
pub struct MalformedId(pub String);

impl FromStr for DocumentId {
    type Err = MalformedId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; DOCUMENT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| MalformedId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of a directory index: a regular file and its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub name: String,
    pub id: DocumentId,
}

/// The two managed directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Inbox,
    Output,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Inbox => f.write_str("inbox"),
            Location::Output => f.write_str("output"),
        }
    }
}
