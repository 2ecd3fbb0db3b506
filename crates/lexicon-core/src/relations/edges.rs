//! # Edge Primitives
//!
//! One connect/disconnect pair per edge kind. Every primitive updates both
//! sides of its edge before returning, so no caller ever observes a
//! half-written edge. Identifiers are assumed to be validated by the caller
//! (the `Lexicon`); these functions never fail.
//!
//! Ordered sides append at the end on connect and are idempotent.
//! Disconnects return whether either side changed.

use super::{NoteTarget, RelationGraph, push_unique, remove_item};
use crate::types::{CollectionId, EntryId, KeywordId, LanguageId, NoteId, UsageId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The edge kinds of the relationship graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Entry ↔ Language.
    EntryLanguage,
    /// Entry ↔ Entry, bidirectional by default.
    Translation,
    /// Entry → root Entry (the root sees it as derived).
    Root,
    /// Entry ↔ Entry, symmetric.
    SeeAlso,
    /// Entry ↔ Usage.
    EntryUsage,
    /// Entry ↔ Keyword.
    EntryKeyword,
    /// Entry ↔ Note.
    EntryNote,
    /// Entry ↔ EntryCollection.
    EntryCollection,
    /// Usage ↔ Language.
    UsageLanguage,
    /// Usage ↔ Note.
    UsageNote,
}

impl EdgeKind {
    /// All edge kinds, in declaration order.
    pub const ALL: [EdgeKind; 10] = [
        Self::EntryLanguage,
        Self::Translation,
        Self::Root,
        Self::SeeAlso,
        Self::EntryUsage,
        Self::EntryKeyword,
        Self::EntryNote,
        Self::EntryCollection,
        Self::UsageLanguage,
        Self::UsageNote,
    ];

    /// Stable snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EntryLanguage => "entry_language",
            Self::Translation => "translation",
            Self::Root => "root",
            Self::SeeAlso => "see_also",
            Self::EntryUsage => "entry_usage",
            Self::EntryKeyword => "entry_keyword",
            Self::EntryNote => "entry_note",
            Self::EntryCollection => "entry_collection",
            Self::UsageLanguage => "usage_language",
            Self::UsageNote => "usage_note",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeKind {
    type Err = crate::LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| crate::LexiconError::UnknownEdge(s.to_string()))
    }
}

impl RelationGraph {
    // =========================================================================
    // ENTRY ↔ LANGUAGE
    // =========================================================================

    pub fn connect_entry_language(&mut self, entry: EntryId, language: LanguageId) {
        push_unique(&mut self.entry_mut(entry).languages, language);
        self.language_mut(language).entries.insert(entry);
    }

    pub fn disconnect_entry_language(&mut self, entry: EntryId, language: LanguageId) -> bool {
        let listed = remove_item(&mut self.entry_mut(entry).languages, &language);
        let held = self.language_mut(language).entries.remove(&entry);
        listed | held
    }

    // =========================================================================
    // ENTRY ↔ ENTRY (TRANSLATION)
    // =========================================================================

    /// Record `to` as a translation of `from`.
    ///
    /// Bidirectional: each side lists the other in `translations`.
    /// One-directional: `to` records `from` in `back_translations` only.
    pub fn connect_translation(&mut self, from: EntryId, to: EntryId, bidirectional: bool) {
        push_unique(&mut self.entry_mut(from).translations, to);
        let target = self.entry_mut(to);
        if bidirectional {
            push_unique(&mut target.translations, from);
            target.back_translations.remove(&from);
            self.entry_mut(from).back_translations.remove(&to);
        } else if target.translations.contains(&from) {
            // `to` already translated to `from`: the pair is now mutual.
            self.entry_mut(from).back_translations.remove(&to);
        } else {
            target.back_translations.insert(from);
        }
    }

    pub fn disconnect_translation(
        &mut self,
        from: EntryId,
        to: EntryId,
        bidirectional: bool,
    ) -> bool {
        let source = self.entry_mut(from);
        let mut changed = remove_item(&mut source.translations, &to);
        if bidirectional {
            changed |= source.back_translations.remove(&to);
        }

        let target = self.entry_mut(to);
        changed |= target.back_translations.remove(&from);
        if bidirectional {
            changed |= remove_item(&mut target.translations, &from);
        } else if changed && target.translations.contains(&from) {
            // `to` still translates to `from`: keep the implicit direction.
            self.entry_mut(from).back_translations.insert(to);
        }
        changed
    }

    // =========================================================================
    // ENTRY → ROOT / DERIVED
    // =========================================================================

    pub fn connect_root(&mut self, entry: EntryId, root: EntryId) {
        push_unique(&mut self.entry_mut(entry).roots, root);
        self.entry_mut(root).derived.insert(entry);
    }

    pub fn disconnect_root(&mut self, entry: EntryId, root: EntryId) -> bool {
        let listed = remove_item(&mut self.entry_mut(entry).roots, &root);
        let held = self.entry_mut(root).derived.remove(&entry);
        listed | held
    }

    // =========================================================================
    // ENTRY ↔ ENTRY (SEE ALSO)
    // =========================================================================

    pub fn connect_see_also(&mut self, a: EntryId, b: EntryId) {
        push_unique(&mut self.entry_mut(a).see_also, b);
        push_unique(&mut self.entry_mut(b).see_also, a);
    }

    pub fn disconnect_see_also(&mut self, a: EntryId, b: EntryId) -> bool {
        let forward = remove_item(&mut self.entry_mut(a).see_also, &b);
        let backward = remove_item(&mut self.entry_mut(b).see_also, &a);
        forward | backward
    }

    // =========================================================================
    // ENTRY ↔ USAGE
    // =========================================================================

    pub fn connect_entry_usage(&mut self, entry: EntryId, usage: UsageId) {
        push_unique(&mut self.entry_mut(entry).usages, usage);
        self.usage_mut(usage).uses.insert(entry);
    }

    pub fn disconnect_entry_usage(&mut self, entry: EntryId, usage: UsageId) -> bool {
        let listed = remove_item(&mut self.entry_mut(entry).usages, &usage);
        let held = self.usage_mut(usage).uses.remove(&entry);
        listed | held
    }

    // =========================================================================
    // ENTRY ↔ KEYWORD
    // =========================================================================

    pub fn connect_entry_keyword(&mut self, entry: EntryId, keyword: KeywordId) {
        self.entry_mut(entry).keywords.insert(keyword);
        push_unique(&mut self.keyword_mut(keyword).matches, entry);
    }

    pub fn disconnect_entry_keyword(&mut self, entry: EntryId, keyword: KeywordId) -> bool {
        let held = self.entry_mut(entry).keywords.remove(&keyword);
        let listed = remove_item(&mut self.keyword_mut(keyword).matches, &entry);
        held | listed
    }

    // =========================================================================
    // ENTRY ↔ NOTE
    // =========================================================================

    /// Attach `note` to `entry`, detaching it from any previous owner first.
    pub fn connect_entry_note(&mut self, entry: EntryId, note: NoteId) {
        if self.note_mut(note).target != Some(NoteTarget::Entry(entry)) {
            self.detach_note(note);
        }
        push_unique(&mut self.entry_mut(entry).notes, note);
        self.note_mut(note).target = Some(NoteTarget::Entry(entry));
    }

    pub fn disconnect_entry_note(&mut self, entry: EntryId, note: NoteId) -> bool {
        let mut changed = remove_item(&mut self.entry_mut(entry).notes, &note);
        let record = self.note_mut(note);
        if record.target == Some(NoteTarget::Entry(entry)) {
            record.target = None;
            changed = true;
        }
        changed
    }

    // =========================================================================
    // ENTRY ↔ COLLECTION
    // =========================================================================

    pub fn connect_entry_collection(&mut self, entry: EntryId, collection: CollectionId) {
        push_unique(&mut self.collection_mut(collection).entries, entry);
        self.entry_mut(entry).collections.insert(collection);
    }

    pub fn disconnect_entry_collection(
        &mut self,
        entry: EntryId,
        collection: CollectionId,
    ) -> bool {
        let listed = remove_item(&mut self.collection_mut(collection).entries, &entry);
        let held = self.entry_mut(entry).collections.remove(&collection);
        listed | held
    }

    // =========================================================================
    // USAGE ↔ LANGUAGE
    // =========================================================================

    pub fn connect_usage_language(&mut self, usage: UsageId, language: LanguageId) {
        push_unique(&mut self.usage_mut(usage).languages, language);
        self.language_mut(language).usages.insert(usage);
    }

    pub fn disconnect_usage_language(&mut self, usage: UsageId, language: LanguageId) -> bool {
        let listed = remove_item(&mut self.usage_mut(usage).languages, &language);
        let held = self.language_mut(language).usages.remove(&usage);
        listed | held
    }

    // =========================================================================
    // USAGE ↔ NOTE
    // =========================================================================

    /// Attach `note` to `usage`. A usage holds one note: a previous note is
    /// released, and `note` is detached from any previous owner.
    pub fn connect_usage_note(&mut self, usage: UsageId, note: NoteId) {
        let previous = self.usage_mut(usage).note;
        if let Some(previous) = previous
            && previous != note
        {
            self.detach_note(previous);
        }
        if self.note_mut(note).target != Some(NoteTarget::Usage(usage)) {
            self.detach_note(note);
        }
        self.usage_mut(usage).note = Some(note);
        self.note_mut(note).target = Some(NoteTarget::Usage(usage));
    }

    pub fn disconnect_usage_note(&mut self, usage: UsageId, note: NoteId) -> bool {
        let mut changed = false;
        let record = self.usage_mut(usage);
        if record.note == Some(note) {
            record.note = None;
            changed = true;
        }
        let record = self.note_mut(note);
        if record.target == Some(NoteTarget::Usage(usage)) {
            record.target = None;
            changed = true;
        }
        changed
    }

    /// Release a note from whatever owns it, on both sides.
    fn detach_note(&mut self, note: NoteId) {
        let owner = self.note_mut(note).target.take();
        match owner {
            Some(NoteTarget::Entry(entry)) => {
                remove_item(&mut self.entry_mut(entry).notes, &note);
            }
            Some(NoteTarget::Usage(usage)) => {
                let record = self.usage_mut(usage);
                if record.note == Some(note) {
                    record.note = None;
                }
            }
            None => {}
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
