//! # Formats
//!
//! Byte-level encodings of a whole lexicon. File I/O stays in the app layer.

pub mod persistence;

pub use persistence::{SnapshotHeader, lexicon_from_bytes, lexicon_to_bytes};
