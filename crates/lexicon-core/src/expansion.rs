//! # Expansions
//!
//! Read models pairing one value with its resolved neighbours, the shape a
//! detail view or a JSON dump wants. Related lists keep the stored order
//! (user order for ordered fields, id order for sets).

use crate::lexicon::Lexicon;
use crate::query::{Query, Row};
use crate::types::{
    CollectionId, Entry, EntryCollection, EntryId, Keyword, KeywordId, Language, LanguageId, Note,
    NoteId, Tracked, Usage, UsageId,
};
use serde::Serialize;

/// An entry with everything it relates to.
#[derive(Debug, Clone, Serialize)]
pub struct EntryExpansion<'a> {
    pub id: EntryId,
    pub entry: &'a Tracked<Entry>,
    pub languages: Vec<Row<'a, LanguageId, Language>>,
    pub translations: Vec<Row<'a, EntryId, Entry>>,
    pub back_translations: Vec<Row<'a, EntryId, Entry>>,
    pub roots: Vec<Row<'a, EntryId, Entry>>,
    pub derived: Vec<Row<'a, EntryId, Entry>>,
    pub see_also: Vec<Row<'a, EntryId, Entry>>,
    pub usages: Vec<Row<'a, UsageId, Usage>>,
    pub keywords: Vec<Row<'a, KeywordId, Keyword>>,
    pub notes: Vec<Row<'a, NoteId, Note>>,
    pub collections: Vec<Row<'a, CollectionId, EntryCollection>>,
}

/// A usage example with the entries it illustrates.
#[derive(Debug, Clone, Serialize)]
pub struct UsageExpansion<'a> {
    pub id: UsageId,
    pub usage: &'a Tracked<Usage>,
    pub entries: Vec<Row<'a, EntryId, Entry>>,
    pub languages: Vec<Row<'a, LanguageId, Language>>,
    pub note: Option<Row<'a, NoteId, Note>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordExpansion<'a> {
    pub id: KeywordId,
    pub keyword: &'a Tracked<Keyword>,
    pub matches: Vec<Row<'a, EntryId, Entry>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionExpansion<'a> {
    pub id: CollectionId,
    pub collection: &'a Tracked<EntryCollection>,
    pub entries: Vec<Row<'a, EntryId, Entry>>,
}

impl Lexicon {
    /// Expand an entry, or `None` if it does not exist.
    #[must_use]
    pub fn expand_entry(&self, id: EntryId) -> Option<EntryExpansion<'_>> {
        let entry = self.entry(id)?;
        Some(EntryExpansion {
            id,
            entry,
            languages: self.languages_of(id, &Query::new()),
            translations: self.translations_of(id, &Query::new()),
            back_translations: self.back_translations_of(id, &Query::new()),
            roots: self.roots_of(id, &Query::new()),
            derived: self.derived_of(id, &Query::new()),
            see_also: self.see_also_of(id, &Query::new()),
            usages: self.usages_of(id, &Query::new()),
            keywords: self.keywords_of(id, &Query::new()),
            notes: self.notes_of(id, &Query::new()),
            collections: self.collections_of(id, &Query::new()),
        })
    }

    #[must_use]
    pub fn expand_usage(&self, id: UsageId) -> Option<UsageExpansion<'_>> {
        let usage = self.usage(id)?;
        Some(UsageExpansion {
            id,
            usage,
            entries: self.usage_entries(id, &Query::new()),
            languages: self.usage_languages(id, &Query::new()),
            note: self.usage_note(id),
        })
    }

    #[must_use]
    pub fn expand_keyword(&self, id: KeywordId) -> Option<KeywordExpansion<'_>> {
        let keyword = self.keyword(id)?;
        Some(KeywordExpansion {
            id,
            keyword,
            matches: self.matches_of(id, &Query::new()),
        })
    }

    #[must_use]
    pub fn expand_collection(&self, id: CollectionId) -> Option<CollectionExpansion<'_>> {
        let collection = self.collection(id)?;
        Some(CollectionExpansion {
            id,
            collection,
            entries: self.collection_entries(id, &Query::new()),
        })
    }
}
