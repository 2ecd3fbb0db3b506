//! # Snapshot Format
//!
//! Binary serialization of a whole lexicon.
//!
//! Format: Header (5 bytes) + postcard-serialized lexicon.
//! - 4 bytes: Magic ("LEXI")
//! - 1 byte: Version
//!
//! Decoding checks, in order, before a single entity is materialized:
//! 1. the data holds at least a header
//! 2. the data does not exceed `MAX_SNAPSHOT_SIZE`
//! 3. magic bytes and version match
//!
//! A decoded lexicon must then pass the integrity audit.
//!
//! All maps are `BTreeMap`s, so save -> load -> save is bit-exact. The orphan
//! policy is runtime configuration and is not part of the snapshot.

use crate::primitives::{FORMAT_VERSION, HEADER_LEN, MAGIC_BYTES, MAX_SNAPSHOT_SIZE};
use crate::{Lexicon, LexiconError};

// =============================================================================
// FILE HEADER
// =============================================================================

/// The header preceding every snapshot payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    /// Check magic bytes and version.
    pub fn validate(&self) -> Result<(), LexiconError> {
        if &self.magic != MAGIC_BYTES {
            return Err(LexiconError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(LexiconError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let [m0, m1, m2, m3] = self.magic;
        [m0, m1, m2, m3, self.version]
    }

    /// Read a header from the front of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LexiconError> {
        match bytes {
            [m0, m1, m2, m3, version, ..] => Ok(Self {
                magic: [*m0, *m1, *m2, *m3],
                version: *version,
            }),
            _ => Err(LexiconError::DeserializationError(
                "Header too short".to_string(),
            )),
        }
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a lexicon to bytes (header + payload). No file I/O.
pub fn lexicon_to_bytes(lexicon: &Lexicon) -> Result<Vec<u8>, LexiconError> {
    let payload = postcard::to_stdvec(lexicon)
        .map_err(|e| LexiconError::SerializationError(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN.saturating_add(payload.len()));
    bytes.extend_from_slice(&SnapshotHeader::new().to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Deserialize a lexicon from bytes. No file I/O.
///
/// The result carries the default orphan policy.
pub fn lexicon_from_bytes(bytes: &[u8]) -> Result<Lexicon, LexiconError> {
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(LexiconError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = bytes.get(HEADER_LEN..).unwrap_or_default();
    let lexicon: Lexicon = postcard::from_bytes(payload).map_err(|e| {
        LexiconError::DeserializationError(format!("Failed to decode lexicon data: {e}"))
    })?;

    lexicon.validated()
}

// =============================================================================
// TESTS
// =============================================================================
