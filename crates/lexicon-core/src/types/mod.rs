//! # Core Type Definitions
//!
//! This module contains the vocabulary shared by every layer of the store:
//! - Kind-tagged identifiers (`EntryId`, `LanguageId`, `KeywordId`, `NoteId`,
//!   `UsageId`, `CollectionId`) and their runtime sum `EntityRef`
//! - Timestamps and creation/modification `Metadata`
//! - The `Tracked` wrapper actually held by the entity store
//! - Error types (`LexiconError`)
//!
//! The entity values themselves live in [`entity`].
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

pub mod entity;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use entity::{Entry, EntryCollection, Keyword, Language, MergeValue, Note, Usage};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Declares a `u64` newtype identifier for one entity kind.
///
/// Identifiers of different kinds are distinct types, so an `EntryId` can
/// never be handed to an operation expecting a `LanguageId`.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident => $variant:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw identifier value.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for EntityRef {
            fn from(id: $name) -> Self {
                EntityRef::$variant(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a vocabulary entry.
    EntryId => Entry, "entry"
);
entity_id!(
    /// Identifier of a language.
    LanguageId => Language, "language"
);
entity_id!(
    /// Identifier of a keyword (tag).
    KeywordId => Keyword, "keyword"
);
entity_id!(
    /// Identifier of a free-text note.
    NoteId => Note, "note"
);
entity_id!(
    /// Identifier of a usage example.
    UsageId => Usage, "usage"
);
entity_id!(
    /// Identifier of an entry collection.
    CollectionId => Collection, "collection"
);

/// The six entity kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Entry,
    Language,
    Keyword,
    Note,
    Usage,
    Collection,
}

impl EntityKind {
    /// All kinds, in declaration order.
    pub const ALL: [EntityKind; 6] = [
        Self::Entry,
        Self::Language,
        Self::Keyword,
        Self::Note,
        Self::Usage,
        Self::Collection,
    ];

    /// Stable lowercase name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Language => "language",
            Self::Keyword => "keyword",
            Self::Note => "note",
            Self::Usage => "usage",
            Self::Collection => "collection",
        }
    }

    /// Build a reference of this kind from a raw identifier.
    #[must_use]
    pub const fn with_id(self, raw: u64) -> EntityRef {
        match self {
            Self::Entry => EntityRef::Entry(EntryId(raw)),
            Self::Language => EntityRef::Language(LanguageId(raw)),
            Self::Keyword => EntityRef::Keyword(KeywordId(raw)),
            Self::Note => EntityRef::Note(NoteId(raw)),
            Self::Usage => EntityRef::Usage(UsageId(raw)),
            Self::Collection => EntityRef::Collection(CollectionId(raw)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "entry" | "entries" => Ok(Self::Entry),
            "language" | "languages" => Ok(Self::Language),
            "keyword" | "keywords" => Ok(Self::Keyword),
            "note" | "notes" => Ok(Self::Note),
            "usage" | "usages" => Ok(Self::Usage),
            "collection" | "collections" => Ok(Self::Collection),
            other => Err(LexiconError::UnknownKind(other.to_string())),
        }
    }
}

/// A kind-tagged reference to any entity.
///
/// Used where the kind is only known at runtime: generic delete, orphan
/// checks, integrity reports and error values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
    Entry(EntryId),
    Language(LanguageId),
    Keyword(KeywordId),
    Note(NoteId),
    Usage(UsageId),
    Collection(CollectionId),
}

impl EntityRef {
    /// The kind of the referenced entity.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Entry(_) => EntityKind::Entry,
            Self::Language(_) => EntityKind::Language,
            Self::Keyword(_) => EntityKind::Keyword,
            Self::Note(_) => EntityKind::Note,
            Self::Usage(_) => EntityKind::Usage,
            Self::Collection(_) => EntityKind::Collection,
        }
    }

    /// The raw identifier, without its kind.
    #[must_use]
    pub const fn raw(self) -> u64 {
        match self {
            Self::Entry(id) => id.0,
            Self::Language(id) => id.0,
            Self::Keyword(id) => id.0,
            Self::Note(id) => id.0,
            Self::Usage(id) => id.0,
            Self::Collection(id) => id.0,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.raw())
    }
}

impl FromStr for EntityRef {
    type Err = LexiconError;

    /// Parse the `kind:id` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, raw) = s
            .split_once(':')
            .ok_or_else(|| LexiconError::InvalidReference(s.to_string()))?;
        let kind: EntityKind = kind.trim().parse()?;
        let raw: u64 = raw
            .trim()
            .parse()
            .map_err(|_| LexiconError::InvalidReference(s.to_string()))?;
        Ok(kind.with_id(raw))
    }
}

// =============================================================================
// TIME & METADATA
// =============================================================================

/// A point in time, in milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Create a timestamp from epoch milliseconds.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Get the epoch milliseconds.
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }
}

/// Creation and modification times of a stored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub created: Timestamp,
    pub modified: Timestamp,
}

impl Metadata {
    /// Fresh metadata: `created == modified == now`.
    #[must_use]
    pub const fn new(now: Timestamp) -> Self {
        Self {
            created: now,
            modified: now,
        }
    }

    /// Record a modification. `modified` never moves backwards.
    pub fn touch(&mut self, now: Timestamp) {
        self.modified = self.modified.max(now);
    }

    /// Fold another entity's metadata into this one:
    /// earliest creation, latest modification.
    pub fn absorb(&mut self, other: &Metadata) {
        self.created = self.created.min(other.created);
        self.modified = self.modified.max(other.modified);
    }
}

/// The unit held by the entity store: a value plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracked<E> {
    pub value: E,
    pub metadata: Metadata,
}

impl<E> Tracked<E> {
    /// Wrap a freshly created value.
    #[must_use]
    pub const fn new(value: E, now: Timestamp) -> Self {
        Self {
            value,
            metadata: Metadata::new(now),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Lexicon store.
///
/// The first group are invariant violations: the caller asked for something
/// the store's preconditions forbid. A failed call never leaves a partial
/// write behind. The remaining variants belong to the snapshot and CLI layers.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The referenced entity does not exist.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityRef),

    /// An entity with this identifier already exists.
    #[error("Duplicate identifier: {0}")]
    DuplicateId(EntityRef),

    /// An edge or merge would relate an entity to itself.
    #[error("Entity cannot be related to itself: {0}")]
    SelfReference(EntityRef),

    /// A reorder position lies outside the list.
    #[error("Position {position} out of range for list of length {len}")]
    InvalidPosition { position: usize, len: usize },

    /// An entity kind name could not be parsed.
    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),

    /// An edge kind name could not be parsed.
    #[error("Unknown edge kind: {0}")]
    UnknownEdge(String),

    /// A `kind:id` reference could not be parsed.
    #[error("Invalid entity reference: {0}")]
    InvalidReference(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_touch_never_moves_backwards() {
        let mut meta = Metadata::new(Timestamp(100));
        meta.touch(Timestamp(50));
        assert_eq!(meta.modified, Timestamp(100));

        meta.touch(Timestamp(200));
        assert_eq!(meta.modified, Timestamp(200));
        assert_eq!(meta.created, Timestamp(100));
    }

    #[test]
    fn metadata_absorb_takes_min_created_max_modified() {
        let mut survivor = Metadata {
            created: Timestamp(10),
            modified: Timestamp(20),
        };
        let incoming = Metadata {
            created: Timestamp(5),
            modified: Timestamp(15),
        };
        survivor.absorb(&incoming);
        assert_eq!(survivor.created, Timestamp(5));
        assert_eq!(survivor.modified, Timestamp(20));
    }

    #[test]
    fn entity_ref_display_roundtrip() {
        let reference = EntityRef::from(UsageId(7));
        assert_eq!(reference.to_string(), "usage:7");
        assert_eq!("usage:7".parse::<EntityRef>().ok(), Some(reference));
        assert_eq!(EntryId(3).to_string(), "entry:3");
    }

    #[test]
    fn entity_ref_rejects_garbage() {
        assert!("entry".parse::<EntityRef>().is_err());
        assert!("entry:abc".parse::<EntityRef>().is_err());
        assert!(matches!(
            "planet:1".parse::<EntityRef>(),
            Err(LexiconError::UnknownKind(_))
        ));
    }

    #[test]
    fn ids_order_deterministically() {
        let mut ids = vec![EntryId(3), EntryId(1), EntryId(2)];
        ids.sort();
        assert_eq!(ids, vec![EntryId(1), EntryId(2), EntryId(3)]);
    }
}
