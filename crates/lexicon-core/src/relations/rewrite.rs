//! # Reference Rewriting
//!
//! Whole-graph passes used by cascading delete and merge.
//!
//! The `strip_*` passes remove every reference to an identifier from every
//! record of every kind that can hold one. They deliberately scan all records
//! instead of following the victim's own adjacency, so a reference is removed
//! even if the two sides of an edge had somehow drifted apart. Each pass
//! lists, field by field, every place its kind can appear; a field missing
//! here is a dangling reference later.
//!
//! The `rehome_*` passes replace every reference to one identifier by a
//! reference to another (merge keeps third-party edges pointing at the
//! surviving entity).

use super::{
    NoteTarget, RelationGraph, remove_item, replace_in_list, replace_in_set,
};
use crate::types::{CollectionId, EntryId, KeywordId, LanguageId, NoteId, UsageId};

impl RelationGraph {
    // =========================================================================
    // STRIP (CASCADING DELETE)
    // =========================================================================

    /// Remove `id` from Entry.{translations, back_translations, roots,
    /// derived, see_also}, Keyword.matches, Language.entries, Note.target,
    /// Usage.uses and EntryCollection.entries.
    pub fn strip_entry(&mut self, id: EntryId) {
        for record in self.entries.values_mut() {
            record.forget_entry(id);
        }
        for record in self.keywords.values_mut() {
            remove_item(&mut record.matches, &id);
        }
        for record in self.languages.values_mut() {
            record.entries.remove(&id);
        }
        for record in self.notes.values_mut() {
            if record.target == Some(NoteTarget::Entry(id)) {
                record.target = None;
            }
        }
        for record in self.usages.values_mut() {
            record.uses.remove(&id);
        }
        for record in self.collections.values_mut() {
            remove_item(&mut record.entries, &id);
        }
    }

    /// Remove `id` from Entry.languages and Usage.languages.
    pub fn strip_language(&mut self, id: LanguageId) {
        for record in self.entries.values_mut() {
            remove_item(&mut record.languages, &id);
        }
        for record in self.usages.values_mut() {
            remove_item(&mut record.languages, &id);
        }
    }

    /// Remove `id` from Entry.keywords.
    pub fn strip_keyword(&mut self, id: KeywordId) {
        for record in self.entries.values_mut() {
            record.keywords.remove(&id);
        }
    }

    /// Remove `id` from Entry.notes and Usage.note.
    pub fn strip_note(&mut self, id: NoteId) {
        for record in self.entries.values_mut() {
            remove_item(&mut record.notes, &id);
        }
        for record in self.usages.values_mut() {
            if record.note == Some(id) {
                record.note = None;
            }
        }
    }

    /// Remove `id` from Entry.usages, Language.usages and Note.target.
    pub fn strip_usage(&mut self, id: UsageId) {
        for record in self.entries.values_mut() {
            remove_item(&mut record.usages, &id);
        }
        for record in self.languages.values_mut() {
            record.usages.remove(&id);
        }
        for record in self.notes.values_mut() {
            if record.target == Some(NoteTarget::Usage(id)) {
                record.target = None;
            }
        }
    }

    /// Remove `id` from Entry.collections.
    pub fn strip_collection(&mut self, id: CollectionId) {
        for record in self.entries.values_mut() {
            record.collections.remove(&id);
        }
    }

    // =========================================================================
    // REHOME (MERGE)
    // =========================================================================

    /// Point every reference to entry `old` at entry `new`, then drop any
    /// self reference `new` gained in the process.
    pub fn rehome_entry(&mut self, old: EntryId, new: EntryId) {
        for record in self.entries.values_mut() {
            replace_in_list(&mut record.translations, old, new);
            replace_in_set(&mut record.back_translations, &old, new);
            replace_in_list(&mut record.roots, old, new);
            replace_in_set(&mut record.derived, &old, new);
            replace_in_list(&mut record.see_also, old, new);
            record.settle_back_translations();
        }
        for record in self.keywords.values_mut() {
            replace_in_list(&mut record.matches, old, new);
        }
        for record in self.languages.values_mut() {
            replace_in_set(&mut record.entries, &old, new);
        }
        for record in self.notes.values_mut() {
            if record.target == Some(NoteTarget::Entry(old)) {
                record.target = Some(NoteTarget::Entry(new));
            }
        }
        for record in self.usages.values_mut() {
            replace_in_set(&mut record.uses, &old, new);
        }
        for record in self.collections.values_mut() {
            replace_in_list(&mut record.entries, old, new);
        }
        if let Some(record) = self.entries.get_mut(&new) {
            record.forget_entry(new);
        }
    }

    /// Point every reference to language `old` at language `new`.
    pub fn rehome_language(&mut self, old: LanguageId, new: LanguageId) {
        for record in self.entries.values_mut() {
            replace_in_list(&mut record.languages, old, new);
        }
        for record in self.usages.values_mut() {
            replace_in_list(&mut record.languages, old, new);
        }
    }

    /// Point every reference to keyword `old` at keyword `new`.
    pub fn rehome_keyword(&mut self, old: KeywordId, new: KeywordId) {
        for record in self.entries.values_mut() {
            replace_in_set(&mut record.keywords, &old, new);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityRef;

    #[test]
    fn strip_entry_reaches_every_kind() {
        let mut graph = RelationGraph::new();
        for reference in [
            EntityRef::Entry(EntryId(1)),
            EntityRef::Entry(EntryId(2)),
            EntityRef::Language(LanguageId(1)),
            EntityRef::Keyword(KeywordId(1)),
            EntityRef::Note(NoteId(1)),
            EntityRef::Usage(UsageId(1)),
            EntityRef::Collection(CollectionId(1)),
        ] {
            graph.insert(reference);
        }
        let victim = EntryId(1);
        graph.connect_translation(victim, EntryId(2), true);
        graph.connect_root(EntryId(2), victim);
        graph.connect_see_also(victim, EntryId(2));
        graph.connect_entry_language(victim, LanguageId(1));
        graph.connect_entry_keyword(victim, KeywordId(1));
        graph.connect_entry_note(victim, NoteId(1));
        graph.connect_entry_usage(victim, UsageId(1));
        graph.connect_entry_collection(victim, CollectionId(1));

        graph.strip_entry(victim);
        graph.remove(EntityRef::Entry(victim));

        let leftovers: Vec<_> = graph
            .all_references()
            .filter(|(_, target)| *target == EntityRef::Entry(victim))
            .collect();
        assert!(leftovers.is_empty(), "dangling: {:?}", leftovers);
        assert!(graph.entry(EntryId(2)).is_some_and(|r| r.is_empty()));
    }

    #[test]
    fn rehome_entry_keeps_position_and_drops_self_loops() {
        let mut graph = RelationGraph::new();
        for id in 1..=4 {
            graph.insert(EntityRef::Entry(EntryId(id)));
        }
        graph.insert(EntityRef::Collection(CollectionId(1)));
        graph.connect_entry_collection(EntryId(3), CollectionId(1));
        graph.connect_entry_collection(EntryId(2), CollectionId(1));
        graph.connect_entry_collection(EntryId(4), CollectionId(1));
        graph.connect_translation(EntryId(1), EntryId(2), true);

        graph.rehome_entry(EntryId(2), EntryId(1));

        assert_eq!(
            graph.collection(CollectionId(1)).map(|r| r.entries.clone()),
            Some(vec![EntryId(3), EntryId(1), EntryId(4)])
        );
        assert!(
            graph
                .entry(EntryId(1))
                .is_some_and(|r| !r.translations.contains(&EntryId(1)))
        );
    }

    #[test]
    fn strip_language_clears_entries_and_usages() {
        let mut graph = RelationGraph::new();
        graph.insert(EntityRef::Entry(EntryId(1)));
        graph.insert(EntityRef::Usage(UsageId(1)));
        graph.insert(EntityRef::Language(LanguageId(1)));
        graph.connect_entry_language(EntryId(1), LanguageId(1));
        graph.connect_usage_language(UsageId(1), LanguageId(1));

        graph.strip_language(LanguageId(1));

        assert!(graph.entry(EntryId(1)).is_some_and(|r| r.languages.is_empty()));
        assert!(graph.usage(UsageId(1)).is_some_and(|r| r.languages.is_empty()));
    }
}
