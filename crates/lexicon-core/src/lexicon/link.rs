//! # Connect, Disconnect, Reorder
//!
//! Validated wrappers over the graph primitives. Each wrapper checks that
//! every identifier is live (and that entry-to-entry edges are not self
//! edges) before delegating, so the primitives can stay infallible.
//!
//! Disconnects report the entities the [`OrphanPolicy`] pruned. The side
//! checked for pruning is always the second argument of the disconnect
//! (the translation target, the root, the keyword, the note, and so on).
//!
//! [`OrphanPolicy`]: crate::orphan::OrphanPolicy

use super::Lexicon;
use crate::relations::{EdgeKind, EntryList};
use crate::types::{
    CollectionId, EntityRef, EntryId, KeywordId, LanguageId, LexiconError, NoteId, UsageId,
};
use serde::Serialize;
use tracing::debug;

/// Outcome of a disconnect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detached {
    /// Entities deleted because the disconnect left them orphaned.
    pub pruned: Vec<EntityRef>,
}

impl Detached {
    /// True when nothing beyond the edge itself was removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.pruned.is_empty()
    }
}

fn distinct(a: EntryId, b: EntryId) -> Result<(), LexiconError> {
    if a == b {
        return Err(LexiconError::SelfReference(a.into()));
    }
    Ok(())
}

fn mismatch(edge: EdgeKind, a: EntityRef, b: EntityRef) -> LexiconError {
    LexiconError::InvalidReference(format!("{edge} cannot join {a} and {b}"))
}

impl Lexicon {
    fn require_pair(
        &self,
        a: impl Into<EntityRef>,
        b: impl Into<EntityRef>,
    ) -> Result<(), LexiconError> {
        self.entities.require(a)?;
        self.entities.require(b)
    }

    /// Apply the orphan policy to the detached side of a disconnect. Nothing
    /// is pruned when the disconnect found no edge to remove.
    fn settle(
        &mut self,
        edge: EdgeKind,
        detached: EntityRef,
        removed: bool,
    ) -> Result<Detached, LexiconError> {
        let mut report = Detached::default();
        if removed && self.policy.prunes(edge) && self.is_orphan(detached) {
            debug!(%edge, entity = %detached, "pruning orphan");
            self.delete(detached)?;
            report.pruned.push(detached);
        }
        Ok(report)
    }

    // =========================================================================
    // CONNECT
    // =========================================================================

    pub fn connect_entry_language(
        &mut self,
        entry: EntryId,
        language: LanguageId,
    ) -> Result<(), LexiconError> {
        self.require_pair(entry, language)?;
        self.relations.connect_entry_language(entry, language);
        Ok(())
    }

    /// Record `to` as a translation of `from`; see
    /// [`RelationGraph::connect_translation`](crate::relations::RelationGraph::connect_translation).
    pub fn connect_translation(
        &mut self,
        from: EntryId,
        to: EntryId,
        bidirectional: bool,
    ) -> Result<(), LexiconError> {
        distinct(from, to)?;
        self.require_pair(from, to)?;
        self.relations.connect_translation(from, to, bidirectional);
        Ok(())
    }

    pub fn connect_root(&mut self, entry: EntryId, root: EntryId) -> Result<(), LexiconError> {
        distinct(entry, root)?;
        self.require_pair(entry, root)?;
        self.relations.connect_root(entry, root);
        Ok(())
    }

    pub fn connect_see_also(&mut self, a: EntryId, b: EntryId) -> Result<(), LexiconError> {
        distinct(a, b)?;
        self.require_pair(a, b)?;
        self.relations.connect_see_also(a, b);
        Ok(())
    }

    pub fn connect_entry_usage(
        &mut self,
        entry: EntryId,
        usage: UsageId,
    ) -> Result<(), LexiconError> {
        self.require_pair(entry, usage)?;
        self.relations.connect_entry_usage(entry, usage);
        Ok(())
    }

    pub fn connect_entry_keyword(
        &mut self,
        entry: EntryId,
        keyword: KeywordId,
    ) -> Result<(), LexiconError> {
        self.require_pair(entry, keyword)?;
        self.relations.connect_entry_keyword(entry, keyword);
        Ok(())
    }

    pub fn connect_entry_note(&mut self, entry: EntryId, note: NoteId) -> Result<(), LexiconError> {
        self.require_pair(entry, note)?;
        self.relations.connect_entry_note(entry, note);
        Ok(())
    }

    pub fn connect_entry_collection(
        &mut self,
        entry: EntryId,
        collection: CollectionId,
    ) -> Result<(), LexiconError> {
        self.require_pair(entry, collection)?;
        self.relations.connect_entry_collection(entry, collection);
        Ok(())
    }

    pub fn connect_usage_language(
        &mut self,
        usage: UsageId,
        language: LanguageId,
    ) -> Result<(), LexiconError> {
        self.require_pair(usage, language)?;
        self.relations.connect_usage_language(usage, language);
        Ok(())
    }

    pub fn connect_usage_note(&mut self, usage: UsageId, note: NoteId) -> Result<(), LexiconError> {
        self.require_pair(usage, note)?;
        self.relations.connect_usage_note(usage, note);
        Ok(())
    }

    // =========================================================================
    // DISCONNECT
    // =========================================================================

    pub fn disconnect_entry_language(
        &mut self,
        entry: EntryId,
        language: LanguageId,
    ) -> Result<Detached, LexiconError> {
        self.require_pair(entry, language)?;
        let removed = self.relations.disconnect_entry_language(entry, language);
        self.settle(EdgeKind::EntryLanguage, language.into(), removed)
    }

    pub fn disconnect_translation(
        &mut self,
        from: EntryId,
        to: EntryId,
        bidirectional: bool,
    ) -> Result<Detached, LexiconError> {
        distinct(from, to)?;
        self.require_pair(from, to)?;
        let removed = self.relations.disconnect_translation(from, to, bidirectional);
        self.settle(EdgeKind::Translation, to.into(), removed)
    }

    pub fn disconnect_root(
        &mut self,
        entry: EntryId,
        root: EntryId,
    ) -> Result<Detached, LexiconError> {
        distinct(entry, root)?;
        self.require_pair(entry, root)?;
        let removed = self.relations.disconnect_root(entry, root);
        self.settle(EdgeKind::Root, root.into(), removed)
    }

    pub fn disconnect_see_also(&mut self, a: EntryId, b: EntryId) -> Result<Detached, LexiconError> {
        distinct(a, b)?;
        self.require_pair(a, b)?;
        let removed = self.relations.disconnect_see_also(a, b);
        self.settle(EdgeKind::SeeAlso, b.into(), removed)
    }

    pub fn disconnect_entry_usage(
        &mut self,
        entry: EntryId,
        usage: UsageId,
    ) -> Result<Detached, LexiconError> {
        self.require_pair(entry, usage)?;
        let removed = self.relations.disconnect_entry_usage(entry, usage);
        self.settle(EdgeKind::EntryUsage, usage.into(), removed)
    }

    pub fn disconnect_entry_keyword(
        &mut self,
        entry: EntryId,
        keyword: KeywordId,
    ) -> Result<Detached, LexiconError> {
        self.require_pair(entry, keyword)?;
        let removed = self.relations.disconnect_entry_keyword(entry, keyword);
        self.settle(EdgeKind::EntryKeyword, keyword.into(), removed)
    }

    pub fn disconnect_entry_note(
        &mut self,
        entry: EntryId,
        note: NoteId,
    ) -> Result<Detached, LexiconError> {
        self.require_pair(entry, note)?;
        let removed = self.relations.disconnect_entry_note(entry, note);
        self.settle(EdgeKind::EntryNote, note.into(), removed)
    }

    pub fn disconnect_entry_collection(
        &mut self,
        entry: EntryId,
        collection: CollectionId,
    ) -> Result<Detached, LexiconError> {
        self.require_pair(entry, collection)?;
        let removed = self.relations.disconnect_entry_collection(entry, collection);
        self.settle(EdgeKind::EntryCollection, collection.into(), removed)
    }

    pub fn disconnect_usage_language(
        &mut self,
        usage: UsageId,
        language: LanguageId,
    ) -> Result<Detached, LexiconError> {
        self.require_pair(usage, language)?;
        let removed = self.relations.disconnect_usage_language(usage, language);
        self.settle(EdgeKind::UsageLanguage, language.into(), removed)
    }

    pub fn disconnect_usage_note(
        &mut self,
        usage: UsageId,
        note: NoteId,
    ) -> Result<Detached, LexiconError> {
        self.require_pair(usage, note)?;
        let removed = self.relations.disconnect_usage_note(usage, note);
        self.settle(EdgeKind::UsageNote, note.into(), removed)
    }

    // =========================================================================
    // DISPATCH BY EDGE KIND
    // =========================================================================

    /// Connect two entities by edge kind, for callers that only know kinds at
    /// runtime. `bidirectional` is only consulted for translations.
    pub fn link(
        &mut self,
        edge: EdgeKind,
        a: EntityRef,
        b: EntityRef,
        bidirectional: bool,
    ) -> Result<(), LexiconError> {
        use EntityRef as R;
        match (edge, a, b) {
            (EdgeKind::EntryLanguage, R::Entry(e), R::Language(l)) => {
                self.connect_entry_language(e, l)
            }
            (EdgeKind::Translation, R::Entry(from), R::Entry(to)) => {
                self.connect_translation(from, to, bidirectional)
            }
            (EdgeKind::Root, R::Entry(e), R::Entry(root)) => self.connect_root(e, root),
            (EdgeKind::SeeAlso, R::Entry(x), R::Entry(y)) => self.connect_see_also(x, y),
            (EdgeKind::EntryUsage, R::Entry(e), R::Usage(u)) => self.connect_entry_usage(e, u),
            (EdgeKind::EntryKeyword, R::Entry(e), R::Keyword(k)) => {
                self.connect_entry_keyword(e, k)
            }
            (EdgeKind::EntryNote, R::Entry(e), R::Note(n)) => self.connect_entry_note(e, n),
            (EdgeKind::EntryCollection, R::Entry(e), R::Collection(c)) => {
                self.connect_entry_collection(e, c)
            }
            (EdgeKind::UsageLanguage, R::Usage(u), R::Language(l)) => {
                self.connect_usage_language(u, l)
            }
            (EdgeKind::UsageNote, R::Usage(u), R::Note(n)) => self.connect_usage_note(u, n),
            _ => Err(mismatch(edge, a, b)),
        }
    }

    /// Disconnect two entities by edge kind.
    pub fn unlink(
        &mut self,
        edge: EdgeKind,
        a: EntityRef,
        b: EntityRef,
        bidirectional: bool,
    ) -> Result<Detached, LexiconError> {
        use EntityRef as R;
        match (edge, a, b) {
            (EdgeKind::EntryLanguage, R::Entry(e), R::Language(l)) => {
                self.disconnect_entry_language(e, l)
            }
            (EdgeKind::Translation, R::Entry(from), R::Entry(to)) => {
                self.disconnect_translation(from, to, bidirectional)
            }
            (EdgeKind::Root, R::Entry(e), R::Entry(root)) => self.disconnect_root(e, root),
            (EdgeKind::SeeAlso, R::Entry(x), R::Entry(y)) => self.disconnect_see_also(x, y),
            (EdgeKind::EntryUsage, R::Entry(e), R::Usage(u)) => {
                self.disconnect_entry_usage(e, u)
            }
            (EdgeKind::EntryKeyword, R::Entry(e), R::Keyword(k)) => {
                self.disconnect_entry_keyword(e, k)
            }
            (EdgeKind::EntryNote, R::Entry(e), R::Note(n)) => self.disconnect_entry_note(e, n),
            (EdgeKind::EntryCollection, R::Entry(e), R::Collection(c)) => {
                self.disconnect_entry_collection(e, c)
            }
            (EdgeKind::UsageLanguage, R::Usage(u), R::Language(l)) => {
                self.disconnect_usage_language(u, l)
            }
            (EdgeKind::UsageNote, R::Usage(u), R::Note(n)) => self.disconnect_usage_note(u, n),
            _ => Err(mismatch(edge, a, b)),
        }
    }

    // =========================================================================
    // REORDER
    // =========================================================================

    /// Move positions `from` of one of an entry's ordered fields to offset
    /// `to`. Returns `Ok(false)` when the order did not change.
    pub fn move_entry_list(
        &mut self,
        entry: EntryId,
        list: EntryList,
        from: &[usize],
        to: usize,
    ) -> Result<bool, LexiconError> {
        self.entities.require(entry)?;
        self.relations.move_entry_list(entry, list, from, to)
    }

    pub fn move_keyword_matches(
        &mut self,
        keyword: KeywordId,
        from: &[usize],
        to: usize,
    ) -> Result<bool, LexiconError> {
        self.entities.require(keyword)?;
        self.relations.move_keyword_matches(keyword, from, to)
    }

    pub fn move_collection_entries(
        &mut self,
        collection: CollectionId,
        from: &[usize],
        to: usize,
    ) -> Result<bool, LexiconError> {
        self.entities.require(collection)?;
        self.relations.move_collection_entries(collection, from, to)
    }

    pub fn move_usage_languages(
        &mut self,
        usage: UsageId,
        from: &[usize],
        to: usize,
    ) -> Result<bool, LexiconError> {
        self.entities.require(usage)?;
        self.relations.move_usage_languages(usage, from, to)
    }
}

// =============================================================================
// TESTS
// =============================================================================
