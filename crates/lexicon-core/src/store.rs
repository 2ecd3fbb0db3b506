//! # Entity Store
//!
//! Keyed storage of `Tracked` values, one arena per entity kind.
//!
//! The store knows nothing about relationships. Deleting through it alone
//! would leave dangling edges behind, so only the `Lexicon` (which also owns
//! the relationship graph) calls the mutating primitives.
//! All data structures use `BTreeMap` for deterministic ordering.

use crate::types::{
    CollectionId, Entry, EntityKind, EntityRef, EntryCollection, EntryId, Keyword, KeywordId,
    Language, LanguageId, LexiconError, Note, NoteId, Timestamp, Tracked, Usage, UsageId,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// ENTITY TRAIT
// =============================================================================

/// Links an entity value type to its identifier type and to its arena.
///
/// This is what lets `create`/`read`/`update` be written once for all six
/// kinds while keeping identifiers statically typed.
pub trait Entity: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned {
    /// The identifier type of this kind.
    type Id: Copy
        + Ord
        + fmt::Debug
        + fmt::Display
        + Into<EntityRef>
        + Serialize
        + DeserializeOwned;

    /// The kind tag.
    const KIND: EntityKind;

    /// The arena holding values of this kind.
    fn table(tables: &EntityTables) -> &EntityStore<Self>;

    /// Mutable access to the arena holding values of this kind.
    fn table_mut(tables: &mut EntityTables) -> &mut EntityStore<Self>;
}

macro_rules! impl_entity {
    ($value:ty, $id:ty, $kind:ident, $field:ident) => {
        impl Entity for $value {
            type Id = $id;
            const KIND: EntityKind = EntityKind::$kind;

            fn table(tables: &EntityTables) -> &EntityStore<Self> {
                &tables.$field
            }

            fn table_mut(tables: &mut EntityTables) -> &mut EntityStore<Self> {
                &mut tables.$field
            }
        }
    };
}

impl_entity!(Entry, EntryId, Entry, entries);
impl_entity!(Language, LanguageId, Language, languages);
impl_entity!(Keyword, KeywordId, Keyword, keywords);
impl_entity!(Note, NoteId, Note, notes);
impl_entity!(Usage, UsageId, Usage, usages);
impl_entity!(EntryCollection, CollectionId, Collection, collections);

// =============================================================================
// ENTITY STORE
// =============================================================================

/// Arena of tracked values for one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EntityStore<E: Entity> {
    items: BTreeMap<E::Id, Tracked<E>>,
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl<E: Entity> EntityStore<E> {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new value with `created == modified == now`.
    ///
    /// Fails with `DuplicateId` if the identifier is already taken.
    pub fn create(&mut self, id: E::Id, value: E, now: Timestamp) -> Result<(), LexiconError> {
        if self.items.contains_key(&id) {
            return Err(LexiconError::DuplicateId(id.into()));
        }
        self.items.insert(id, Tracked::new(value, now));
        Ok(())
    }

    /// Read a tracked value. No side effects.
    #[must_use]
    pub fn read(&self, id: E::Id) -> Option<&Tracked<E>> {
        self.items.get(&id)
    }

    /// Apply `setter` to the stored value in place.
    ///
    /// Metadata is left alone; bumping `modified` is the caller's job
    /// (see [`EntityStore::touch`]).
    pub fn update<F>(&mut self, id: E::Id, setter: F) -> Result<(), LexiconError>
    where
        F: FnOnce(&mut E),
    {
        let tracked = self
            .items
            .get_mut(&id)
            .ok_or_else(|| LexiconError::EntityNotFound(id.into()))?;
        setter(&mut tracked.value);
        Ok(())
    }

    /// Record a modification at `now`.
    pub fn touch(&mut self, id: E::Id, now: Timestamp) -> Result<(), LexiconError> {
        let tracked = self
            .items
            .get_mut(&id)
            .ok_or_else(|| LexiconError::EntityNotFound(id.into()))?;
        tracked.metadata.touch(now);
        Ok(())
    }

    /// Remove and return a tracked value.
    pub fn delete(&mut self, id: E::Id) -> Result<Tracked<E>, LexiconError> {
        self.items
            .remove(&id)
            .ok_or_else(|| LexiconError::EntityNotFound(id.into()))
    }

    /// Replace a tracked value wholesale. Used by merge after folding.
    pub(crate) fn replace(&mut self, id: E::Id, tracked: Tracked<E>) -> Result<(), LexiconError> {
        let slot = self
            .items
            .get_mut(&id)
            .ok_or_else(|| LexiconError::EntityNotFound(id.into()))?;
        *slot = tracked;
        Ok(())
    }

    /// Check whether an identifier is live.
    #[must_use]
    pub fn contains(&self, id: E::Id) -> bool {
        self.items.contains_key(&id)
    }

    /// Number of live values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All live identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = E::Id> + '_ {
        self.items.keys().copied()
    }

    /// All live values in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (E::Id, &Tracked<E>)> + '_ {
        self.items.iter().map(|(id, tracked)| (*id, tracked))
    }

    /// Highest identifier in use, if any.
    #[must_use]
    pub fn max_id(&self) -> Option<E::Id> {
        self.items.keys().next_back().copied()
    }
}

// =============================================================================
// ENTITY TABLES
// =============================================================================

/// One arena per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityTables {
    pub entries: EntityStore<Entry>,
    pub languages: EntityStore<Language>,
    pub keywords: EntityStore<Keyword>,
    pub notes: EntityStore<Note>,
    pub usages: EntityStore<Usage>,
    pub collections: EntityStore<EntryCollection>,
}

impl EntityTables {
    /// Create empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed access to the arena of `E`.
    #[must_use]
    pub fn get<E: Entity>(&self) -> &EntityStore<E> {
        E::table(self)
    }

    /// Typed mutable access to the arena of `E`.
    pub fn get_mut<E: Entity>(&mut self) -> &mut EntityStore<E> {
        E::table_mut(self)
    }

    /// Whether a reference of any kind resolves.
    #[must_use]
    pub fn contains(&self, reference: EntityRef) -> bool {
        match reference {
            EntityRef::Entry(id) => self.entries.contains(id),
            EntityRef::Language(id) => self.languages.contains(id),
            EntityRef::Keyword(id) => self.keywords.contains(id),
            EntityRef::Note(id) => self.notes.contains(id),
            EntityRef::Usage(id) => self.usages.contains(id),
            EntityRef::Collection(id) => self.collections.contains(id),
        }
    }

    /// Fail with `EntityNotFound` unless the reference resolves.
    pub fn require(&self, reference: impl Into<EntityRef>) -> Result<(), LexiconError> {
        let reference = reference.into();
        if self.contains(reference) {
            Ok(())
        } else {
            Err(LexiconError::EntityNotFound(reference))
        }
    }

    /// Number of live values of one kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Entry => self.entries.len(),
            EntityKind::Language => self.languages.len(),
            EntityKind::Keyword => self.keywords.len(),
            EntityKind::Note => self.notes.len(),
            EntityKind::Usage => self.usages.len(),
            EntityKind::Collection => self.collections.len(),
        }
    }

    /// Highest raw identifier in use across every kind.
    #[must_use]
    pub fn max_raw_id(&self) -> Option<u64> {
        [
            self.entries.max_id().map(|id| id.0),
            self.languages.max_id().map(|id| id.0),
            self.keywords.max_id().map(|id| id.0),
            self.notes.max_id().map(|id| id.0),
            self.usages.max_id().map(|id| id.0),
            self.collections.max_id().map(|id| id.0),
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

// =============================================================================
// TESTS
// =============================================================================
