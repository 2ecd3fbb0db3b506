//! # lexicon-core
//!
//! The relational entity store behind the Lexicon personal dictionary.
//!
//! Six entity kinds (entries, languages, keywords, notes, usage examples and
//! entry collections) live in per-kind arenas. Their relationships live in a
//! denormalized graph where every edge is stored on both of its sides. The
//! [`Lexicon`] value is the only writer of either store and keeps the two
//! consistent across create, connect, disconnect, reorder, cascading delete
//! and merge.
//!
//! ## Architectural Constraints
//!
//! The store:
//! - Is a plain owned value: no global state, no interior mutability
//! - Is synchronous and performs no I/O; file handling lives in the app
//! - Never invents identifiers or timestamps; callers supply both
//! - Uses `BTreeMap`/`BTreeSet` exclusively, so iteration and snapshots are
//!   deterministic

// =============================================================================
// MODULES
// =============================================================================

pub mod cascade;
pub mod clock;
pub mod expansion;
pub mod formats;
pub mod integrity;
pub mod lexicon;
pub mod merge;
pub mod orphan;
pub mod primitives;
pub mod query;
pub mod relations;
pub mod stats;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CollectionId, EntityKind, EntityRef, Entry, EntryCollection, EntryId, Keyword, KeywordId,
    Language, LanguageId, LexiconError, MergeValue, Metadata, Note, NoteId, Timestamp, Tracked,
    Usage, UsageId,
};

// =============================================================================
// RE-EXPORTS: Store, Graph, Queries
// =============================================================================

pub use clock::{Clock, FixedClock, SequentialIds, SystemClock};
pub use expansion::{CollectionExpansion, EntryExpansion, KeywordExpansion, UsageExpansion};
pub use integrity::{Violation, verify};
pub use lexicon::{Detached, Lexicon};
pub use orphan::{OrphanPolicy, ProposedRemoval};
pub use query::{Query, Row, order};
pub use relations::{
    CollectionRelations, EdgeKind, EntryList, EntryRelations, KeywordRelations,
    LanguageRelations, NoteRelations, NoteTarget, RelationGraph, UsageRelations,
};
pub use stats::LexiconStats;
pub use store::{Entity, EntityStore, EntityTables};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{SnapshotHeader, lexicon_from_bytes, lexicon_to_bytes};
