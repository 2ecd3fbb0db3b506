//! # Cascading Delete
//!
//! Deleting an entity removes its value, strips every reference to it from
//! every record of every kind that can hold one, and drops its own record.
//! Related entities are never deleted along with it; they merely lose the
//! edge.

use crate::lexicon::Lexicon;
use crate::types::{
    CollectionId, EntityRef, Entry, EntryCollection, EntryId, Keyword, KeywordId, Language,
    LanguageId, LexiconError, Note, NoteId, Tracked, Usage, UsageId,
};
use tracing::debug;

impl Lexicon {
    /// Delete an entry and every reference to it.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<Tracked<Entry>, LexiconError> {
        let removed = self.entities.entries.delete(id)?;
        self.relations.strip_entry(id);
        self.relations.remove(id.into());
        debug!(entity = %id, "cascading delete");
        Ok(removed)
    }

    pub fn delete_language(&mut self, id: LanguageId) -> Result<Tracked<Language>, LexiconError> {
        let removed = self.entities.languages.delete(id)?;
        self.relations.strip_language(id);
        self.relations.remove(id.into());
        debug!(entity = %id, "cascading delete");
        Ok(removed)
    }

    pub fn delete_keyword(&mut self, id: KeywordId) -> Result<Tracked<Keyword>, LexiconError> {
        let removed = self.entities.keywords.delete(id)?;
        self.relations.strip_keyword(id);
        self.relations.remove(id.into());
        debug!(entity = %id, "cascading delete");
        Ok(removed)
    }

    pub fn delete_note(&mut self, id: NoteId) -> Result<Tracked<Note>, LexiconError> {
        let removed = self.entities.notes.delete(id)?;
        self.relations.strip_note(id);
        self.relations.remove(id.into());
        debug!(entity = %id, "cascading delete");
        Ok(removed)
    }

    pub fn delete_usage(&mut self, id: UsageId) -> Result<Tracked<Usage>, LexiconError> {
        let removed = self.entities.usages.delete(id)?;
        self.relations.strip_usage(id);
        self.relations.remove(id.into());
        debug!(entity = %id, "cascading delete");
        Ok(removed)
    }

    pub fn delete_collection(
        &mut self,
        id: CollectionId,
    ) -> Result<Tracked<EntryCollection>, LexiconError> {
        let removed = self.entities.collections.delete(id)?;
        self.relations.strip_collection(id);
        self.relations.remove(id.into());
        debug!(entity = %id, "cascading delete");
        Ok(removed)
    }

    /// Delete any kind of entity.
    pub fn delete(&mut self, reference: EntityRef) -> Result<(), LexiconError> {
        match reference {
            EntityRef::Entry(id) => self.delete_entry(id).map(drop),
            EntityRef::Language(id) => self.delete_language(id).map(drop),
            EntityRef::Keyword(id) => self.delete_keyword(id).map(drop),
            EntityRef::Note(id) => self.delete_note(id).map(drop),
            EntityRef::Usage(id) => self.delete_usage(id).map(drop),
            EntityRef::Collection(id) => self.delete_collection(id).map(drop),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use crate::relations::NoteTarget;
    use crate::types::Timestamp;

    #[test]
    fn deleting_translation_empties_other_side() {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_entry(EntryId(1), Entry::new("cat"), Timestamp(1))
            .expect("create");
        lexicon
            .create_entry(EntryId(2), Entry::new("gato"), Timestamp(1))
            .expect("create");
        lexicon
            .connect_translation(EntryId(1), EntryId(2), true)
            .expect("connect");

        let removed = lexicon.delete_entry(EntryId(2)).expect("delete");

        assert_eq!(removed.value.spelling, "gato");
        assert!(lexicon.translations_of(EntryId(1), &Query::new()).is_empty());
        assert!(lexicon.entry(EntryId(2)).is_none());
        assert!(lexicon.contains(EntryId(1)));
    }

    #[test]
    fn deleting_owner_releases_note() {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_usage(UsageId(1), Usage::new("I run"), Timestamp(1))
            .expect("create");
        lexicon
            .create_note(NoteId(2), Note::new("first person"), Timestamp(1))
            .expect("create");
        lexicon.connect_usage_note(UsageId(1), NoteId(2)).expect("connect");

        lexicon.delete(EntityRef::Usage(UsageId(1))).expect("delete");

        assert!(lexicon.contains(NoteId(2)));
        assert_ne!(lexicon.note_target(NoteId(2)), Some(NoteTarget::Usage(UsageId(1))));
        assert!(lexicon.is_orphan(EntityRef::Note(NoteId(2))));
    }

    #[test]
    fn deleting_language_keeps_entries() {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_language(LanguageId(1), Language::new("en", "English"), Timestamp(1))
            .expect("create");
        lexicon
            .create_entry_in(EntryId(2), Entry::new("cat"), Timestamp(1), &[LanguageId(1)])
            .expect("create");

        lexicon.delete_language(LanguageId(1)).expect("delete");

        assert!(lexicon.contains(EntryId(2)));
        assert!(lexicon.languages_of(EntryId(2), &Query::new()).is_empty());
    }

    #[test]
    fn deleting_missing_entity_fails_cleanly() {
        let mut lexicon = Lexicon::new();
        assert!(matches!(
            lexicon.delete(EntityRef::Collection(CollectionId(3))),
            Err(LexiconError::EntityNotFound(_))
        ));
    }
}
