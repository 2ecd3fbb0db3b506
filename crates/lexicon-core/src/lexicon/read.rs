//! # Read API
//!
//! Specializations of the generic [`Query`] pipeline: one per kind (whole
//! arena scan) and one per edge side (adjacency list of one entity). An
//! unknown owner simply yields no rows.

use super::Lexicon;
use crate::query::{Query, Row};
use crate::relations::NoteTarget;
use crate::store::Entity;
use crate::types::{
    CollectionId, Entry, EntryCollection, EntryId, Keyword, KeywordId, Language, LanguageId, Note,
    NoteId, Tracked, Usage, UsageId,
};

impl Lexicon {
    /// Run `query` over `ids`, resolving them in the arena of kind `E`.
    pub fn resolve<'a, E: Entity>(
        &'a self,
        ids: impl IntoIterator<Item = E::Id>,
        query: &Query<E>,
    ) -> Vec<Row<'a, E::Id, E>> {
        let table = E::table(&self.entities);
        query.run(ids, |id| table.read(id))
    }

    // =========================================================================
    // WHOLE-KIND SCANS
    // =========================================================================

    pub fn entries(&self, query: &Query<Entry>) -> Vec<Row<'_, EntryId, Entry>> {
        self.resolve(self.entities.entries.ids(), query)
    }

    pub fn languages(&self, query: &Query<Language>) -> Vec<Row<'_, LanguageId, Language>> {
        self.resolve(self.entities.languages.ids(), query)
    }

    pub fn keywords(&self, query: &Query<Keyword>) -> Vec<Row<'_, KeywordId, Keyword>> {
        self.resolve(self.entities.keywords.ids(), query)
    }

    pub fn notes(&self, query: &Query<Note>) -> Vec<Row<'_, NoteId, Note>> {
        self.resolve(self.entities.notes.ids(), query)
    }

    pub fn usages(&self, query: &Query<Usage>) -> Vec<Row<'_, UsageId, Usage>> {
        self.resolve(self.entities.usages.ids(), query)
    }

    pub fn collections(
        &self,
        query: &Query<EntryCollection>,
    ) -> Vec<Row<'_, CollectionId, EntryCollection>> {
        self.resolve(self.entities.collections.ids(), query)
    }

    // =========================================================================
    // PER ENTRY
    // =========================================================================

    pub fn languages_of(
        &self,
        entry: EntryId,
        query: &Query<Language>,
    ) -> Vec<Row<'_, LanguageId, Language>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.languages.iter().copied()), query)
    }

    /// Entries this entry translates to, in user order.
    pub fn translations_of(
        &self,
        entry: EntryId,
        query: &Query<Entry>,
    ) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.translations.iter().copied()), query)
    }

    /// Entries that translate to this one without being translated back.
    pub fn back_translations_of(
        &self,
        entry: EntryId,
        query: &Query<Entry>,
    ) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.back_translations.iter().copied()), query)
    }

    pub fn roots_of(&self, entry: EntryId, query: &Query<Entry>) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.roots.iter().copied()), query)
    }

    pub fn derived_of(
        &self,
        entry: EntryId,
        query: &Query<Entry>,
    ) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.derived.iter().copied()), query)
    }

    pub fn see_also_of(
        &self,
        entry: EntryId,
        query: &Query<Entry>,
    ) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.see_also.iter().copied()), query)
    }

    pub fn usages_of(&self, entry: EntryId, query: &Query<Usage>) -> Vec<Row<'_, UsageId, Usage>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.usages.iter().copied()), query)
    }

    pub fn keywords_of(
        &self,
        entry: EntryId,
        query: &Query<Keyword>,
    ) -> Vec<Row<'_, KeywordId, Keyword>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.keywords.iter().copied()), query)
    }

    pub fn notes_of(&self, entry: EntryId, query: &Query<Note>) -> Vec<Row<'_, NoteId, Note>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.notes.iter().copied()), query)
    }

    pub fn collections_of(
        &self,
        entry: EntryId,
        query: &Query<EntryCollection>,
    ) -> Vec<Row<'_, CollectionId, EntryCollection>> {
        let ids = self.relations.entry(entry).into_iter();
        self.resolve(ids.flat_map(|r| r.collections.iter().copied()), query)
    }

    // =========================================================================
    // PER LANGUAGE / KEYWORD / COLLECTION / USAGE / NOTE
    // =========================================================================

    pub fn entries_in_language(
        &self,
        language: LanguageId,
        query: &Query<Entry>,
    ) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.language(language).into_iter();
        self.resolve(ids.flat_map(|r| r.entries.iter().copied()), query)
    }

    pub fn usages_in_language(
        &self,
        language: LanguageId,
        query: &Query<Usage>,
    ) -> Vec<Row<'_, UsageId, Usage>> {
        let ids = self.relations.language(language).into_iter();
        self.resolve(ids.flat_map(|r| r.usages.iter().copied()), query)
    }

    /// Entries tagged with a keyword, in user order.
    pub fn matches_of(
        &self,
        keyword: KeywordId,
        query: &Query<Entry>,
    ) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.keyword(keyword).into_iter();
        self.resolve(ids.flat_map(|r| r.matches.iter().copied()), query)
    }

    pub fn collection_entries(
        &self,
        collection: CollectionId,
        query: &Query<Entry>,
    ) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.collection(collection).into_iter();
        self.resolve(ids.flat_map(|r| r.entries.iter().copied()), query)
    }

    /// Entries a usage example illustrates.
    pub fn usage_entries(
        &self,
        usage: UsageId,
        query: &Query<Entry>,
    ) -> Vec<Row<'_, EntryId, Entry>> {
        let ids = self.relations.usage(usage).into_iter();
        self.resolve(ids.flat_map(|r| r.uses.iter().copied()), query)
    }

    pub fn usage_languages(
        &self,
        usage: UsageId,
        query: &Query<Language>,
    ) -> Vec<Row<'_, LanguageId, Language>> {
        let ids = self.relations.usage(usage).into_iter();
        self.resolve(ids.flat_map(|r| r.languages.iter().copied()), query)
    }

    /// The owner of a note, if it has one.
    #[must_use]
    pub fn note_target(&self, note: NoteId) -> Option<NoteTarget> {
        self.relations.note(note).and_then(|r| r.target)
    }

    /// The note attached to a usage, if any.
    #[must_use]
    pub fn usage_note(&self, usage: UsageId) -> Option<(NoteId, &Tracked<Note>)> {
        let note = self.relations.usage(usage).and_then(|r| r.note)?;
        self.entities.notes.read(note).map(|tracked| (note, tracked))
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Entries whose spelling matches, ignoring case and surrounding spaces.
    pub fn find_entries_by_spelling(&self, spelling: &str) -> Vec<Row<'_, EntryId, Entry>> {
        let needle = spelling.trim().to_lowercase();
        self.entries(
            &Query::new()
                .filter(move |tracked: &Tracked<Entry>| {
                    tracked.value.spelling.trim().to_lowercase() == needle
                }),
        )
    }

    /// The first language with this code, ignoring case.
    #[must_use]
    pub fn find_language_by_code(&self, code: &str) -> Option<Row<'_, LanguageId, Language>> {
        let needle = code.trim().to_lowercase();
        self.languages(
            &Query::new()
                .filter(move |tracked: &Tracked<Language>| {
                    tracked.value.code.trim().to_lowercase() == needle
                })
                .limit(1),
        )
        .into_iter()
        .next()
    }

    /// The first keyword with this title, ignoring case.
    #[must_use]
    pub fn find_keyword_by_title(&self, title: &str) -> Option<Row<'_, KeywordId, Keyword>> {
        let needle = title.trim().to_lowercase();
        self.keywords(
            &Query::new()
                .filter(move |tracked: &Tracked<Keyword>| {
                    tracked.value.title.trim().to_lowercase() == needle
                })
                .limit(1),
        )
        .into_iter()
        .next()
    }
}

// =============================================================================
// TESTS
// =============================================================================
