//! # Lexicon
//!
//! The `Lexicon` bundles the entity store and the relationship graph and is
//! the only code path that writes either of them.
//!
//! Every mutation validates its identifiers before the first write, so a
//! call that returns an error leaves the store exactly as it found it.
//!
//! The API is split across:
//! - this module: construction, create, read, update
//! - [`link`]: connect, disconnect and reorder
//! - [`read`]: query specializations per kind and per edge
//! - `cascade`, `merge`, `orphan`, `integrity`, `expansion`: the remaining
//!   operations, each in its own crate-level module

pub mod link;
pub mod read;

use crate::orphan::OrphanPolicy;
use crate::relations::RelationGraph;
use crate::store::{Entity, EntityTables};
use crate::types::{
    CollectionId, EntityRef, Entry, EntryCollection, EntryId, Keyword, KeywordId, Language,
    LanguageId, LexiconError, Note, NoteId, Timestamp, Tracked, Usage, UsageId,
};
use serde::{Deserialize, Serialize};

pub use link::Detached;

/// The relational entity store of a personal dictionary.
///
/// A plain owned value: no interior mutability, no I/O. Callers that share
/// it must serialize mutations behind a single writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    pub(crate) entities: EntityTables,
    pub(crate) relations: RelationGraph,
    /// Runtime behavior, not data: never written to a snapshot.
    #[serde(skip)]
    pub(crate) policy: OrphanPolicy,
}

impl Lexicon {
    /// Create an empty lexicon with the default orphan policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the orphan policy, builder style.
    #[must_use]
    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_orphan_policy(&mut self, policy: OrphanPolicy) {
        self.policy = policy;
    }

    #[must_use]
    pub fn orphan_policy(&self) -> &OrphanPolicy {
        &self.policy
    }

    /// Read-only access to the entity arenas.
    #[must_use]
    pub fn entities(&self) -> &EntityTables {
        &self.entities
    }

    /// Read-only access to the relationship graph.
    #[must_use]
    pub fn relations(&self) -> &RelationGraph {
        &self.relations
    }

    /// Whether the referenced entity is live.
    #[must_use]
    pub fn contains(&self, reference: impl Into<EntityRef>) -> bool {
        self.entities.contains(reference.into())
    }

    /// Smallest raw identifier greater than every identifier in use.
    ///
    /// Seeds `SequentialIds` after a snapshot is loaded.
    #[must_use]
    pub fn next_free_id(&self) -> u64 {
        self.entities
            .max_raw_id()
            .map_or(1, |max| max.saturating_add(1))
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    /// Store a new entity with fresh metadata and an empty relationship record.
    pub fn create<E: Entity>(
        &mut self,
        id: E::Id,
        value: E,
        now: Timestamp,
    ) -> Result<(), LexiconError> {
        E::table_mut(&mut self.entities).create(id, value, now)?;
        self.relations.insert(id.into());
        tracing::trace!(kind = %E::KIND, %id, "created");
        Ok(())
    }

    pub fn create_entry(
        &mut self,
        id: EntryId,
        value: Entry,
        now: Timestamp,
    ) -> Result<(), LexiconError> {
        self.create(id, value, now)
    }

    pub fn create_language(
        &mut self,
        id: LanguageId,
        value: Language,
        now: Timestamp,
    ) -> Result<(), LexiconError> {
        self.create(id, value, now)
    }

    pub fn create_keyword(
        &mut self,
        id: KeywordId,
        value: Keyword,
        now: Timestamp,
    ) -> Result<(), LexiconError> {
        self.create(id, value, now)
    }

    pub fn create_note(
        &mut self,
        id: NoteId,
        value: Note,
        now: Timestamp,
    ) -> Result<(), LexiconError> {
        self.create(id, value, now)
    }

    pub fn create_usage(
        &mut self,
        id: UsageId,
        value: Usage,
        now: Timestamp,
    ) -> Result<(), LexiconError> {
        self.create(id, value, now)
    }

    pub fn create_collection(
        &mut self,
        id: CollectionId,
        value: EntryCollection,
        now: Timestamp,
    ) -> Result<(), LexiconError> {
        self.create(id, value, now)
    }

    /// Create an entry and connect it to `languages`, in order.
    ///
    /// The languages are validated before the entry is stored.
    pub fn create_entry_in(
        &mut self,
        id: EntryId,
        value: Entry,
        now: Timestamp,
        languages: &[LanguageId],
    ) -> Result<(), LexiconError> {
        for language in languages {
            self.entities.require(*language)?;
        }
        self.create(id, value, now)?;
        for language in languages {
            self.relations.connect_entry_language(id, *language);
        }
        Ok(())
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Read any kind of entity by its typed identifier.
    #[must_use]
    pub fn read<E: Entity>(&self, id: E::Id) -> Option<&Tracked<E>> {
        E::table(&self.entities).read(id)
    }

    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&Tracked<Entry>> {
        self.entities.entries.read(id)
    }

    #[must_use]
    pub fn language(&self, id: LanguageId) -> Option<&Tracked<Language>> {
        self.entities.languages.read(id)
    }

    #[must_use]
    pub fn keyword(&self, id: KeywordId) -> Option<&Tracked<Keyword>> {
        self.entities.keywords.read(id)
    }

    #[must_use]
    pub fn note(&self, id: NoteId) -> Option<&Tracked<Note>> {
        self.entities.notes.read(id)
    }

    #[must_use]
    pub fn usage(&self, id: UsageId) -> Option<&Tracked<Usage>> {
        self.entities.usages.read(id)
    }

    #[must_use]
    pub fn collection(&self, id: CollectionId) -> Option<&Tracked<EntryCollection>> {
        self.entities.collections.read(id)
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    /// Apply `setter` to a stored value. Metadata is not changed; call
    /// [`Lexicon::touch`] to record the modification.
    pub fn update<E, F>(&mut self, id: E::Id, setter: F) -> Result<(), LexiconError>
    where
        E: Entity,
        F: FnOnce(&mut E),
    {
        E::table_mut(&mut self.entities).update(id, setter)
    }

    /// Record a modification of any entity at `now`.
    pub fn touch(&mut self, reference: EntityRef, now: Timestamp) -> Result<(), LexiconError> {
        match reference {
            EntityRef::Entry(id) => self.entities.entries.touch(id, now),
            EntityRef::Language(id) => self.entities.languages.touch(id, now),
            EntityRef::Keyword(id) => self.entities.keywords.touch(id, now),
            EntityRef::Note(id) => self.entities.notes.touch(id, now),
            EntityRef::Usage(id) => self.entities.usages.touch(id, now),
            EntityRef::Collection(id) => self.entities.collections.touch(id, now),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_registers_entity_and_record() {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_entry(EntryId(1), Entry::new("cat"), Timestamp(5))
            .expect("create");

        assert!(lexicon.contains(EntryId(1)));
        assert!(lexicon.relations().contains(EntityRef::Entry(EntryId(1))));
        let tracked = lexicon.entry(EntryId(1)).expect("entry");
        assert_eq!(tracked.metadata.created, Timestamp(5));
        assert_eq!(tracked.metadata.modified, Timestamp(5));
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_keyword(KeywordId(1), Keyword::new("animals"), Timestamp(1))
            .expect("create");
        let result = lexicon.create_keyword(KeywordId(1), Keyword::new("food"), Timestamp(2));

        assert!(matches!(result, Err(LexiconError::DuplicateId(_))));
        assert_eq!(
            lexicon.keyword(KeywordId(1)).map(|k| k.value.title.as_str()),
            Some("animals")
        );
    }

    #[test]
    fn create_entry_in_validates_languages_first() {
        let mut lexicon = Lexicon::new();
        let result = lexicon.create_entry_in(
            EntryId(1),
            Entry::new("cat"),
            Timestamp(1),
            &[LanguageId(9)],
        );

        assert!(matches!(result, Err(LexiconError::EntityNotFound(_))));
        assert!(!lexicon.contains(EntryId(1)));
    }

    #[test]
    fn create_entry_in_connects_languages_in_order() {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_language(LanguageId(1), Language::new("en", "English"), Timestamp(1))
            .expect("create");
        lexicon
            .create_language(LanguageId(2), Language::new("es", "Spanish"), Timestamp(1))
            .expect("create");
        lexicon
            .create_entry_in(
                EntryId(3),
                Entry::new("chat"),
                Timestamp(2),
                &[LanguageId(2), LanguageId(1)],
            )
            .expect("create");

        assert_eq!(
            lexicon.relations().entry(EntryId(3)).map(|r| r.languages.clone()),
            Some(vec![LanguageId(2), LanguageId(1)])
        );
        assert!(
            lexicon
                .relations()
                .language(LanguageId(1))
                .is_some_and(|r| r.entries.contains(&EntryId(3)))
        );
    }

    #[test]
    fn update_leaves_metadata_and_touch_bumps_it() {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_entry(EntryId(1), Entry::new("colour"), Timestamp(10))
            .expect("create");

        lexicon
            .update::<Entry, _>(EntryId(1), |entry| entry.spelling = "color".to_string())
            .expect("update");
        let tracked = lexicon.entry(EntryId(1)).expect("entry");
        assert_eq!(tracked.value.spelling, "color");
        assert_eq!(tracked.metadata.modified, Timestamp(10));

        lexicon
            .touch(EntityRef::Entry(EntryId(1)), Timestamp(20))
            .expect("touch");
        assert_eq!(
            lexicon.entry(EntryId(1)).map(|t| t.metadata.modified),
            Some(Timestamp(20))
        );
    }

    #[test]
    fn next_free_id_spans_all_kinds() {
        let mut lexicon = Lexicon::new();
        assert_eq!(lexicon.next_free_id(), 1);

        lexicon
            .create_note(NoteId(7), Note::new("irregular"), Timestamp(1))
            .expect("create");
        lexicon
            .create_entry(EntryId(3), Entry::new("go"), Timestamp(1))
            .expect("create");
        assert_eq!(lexicon.next_free_id(), 8);
    }
}
