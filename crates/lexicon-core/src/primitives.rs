//! # Fixed Constants
//!
//! Compiled-in constants for the snapshot format and the read API.

/// Magic bytes for the lexicon snapshot header.
///
/// - File Header = Magic Bytes ("LEXI") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"LEXI";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 1;

/// Length of the snapshot header in bytes.
pub const HEADER_LEN: usize = 5;

/// Maximum accepted snapshot size, checked before any decoding starts.
pub const MAX_SNAPSHOT_SIZE: usize = 256 * 1024 * 1024; // 256 MB

/// Default number of rows returned by listing commands.
pub const DEFAULT_LIST_LIMIT: usize = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_magic_plus_version() {
        assert_eq!(HEADER_LEN, MAGIC_BYTES.len() + 1);
    }

    #[test]
    fn limits_are_positive() {
        const { assert!(DEFAULT_LIST_LIMIT > 0) };
        const { assert!(MAX_SNAPSHOT_SIZE > HEADER_LEN) };
    }
}
