//! # Relationship Graph
//!
//! Denormalized adjacency lists for every entity in the store.
//!
//! Each live entity owns exactly one relationship record for its kind. Every
//! edge is stored on both of its sides, and the primitives in [`edges`] always
//! update both sides in a single call. Ordered fields are `Vec`s that never
//! hold duplicates; unordered fields are `BTreeSet`s; one-to-one and
//! single-owner back-pointers are `Option`s.
//!
//! Submodules:
//! - [`edges`]: connect/disconnect primitives, one pair per edge kind
//! - [`rewrite`]: exhaustive strip (cascading delete) and re-home (merge) passes
//! - [`reorder`]: "move subset to offset" over ordered fields

pub mod edges;
pub mod reorder;
pub mod rewrite;

use crate::types::{
    CollectionId, EntityRef, EntryId, KeywordId, LanguageId, NoteId, UsageId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub use edges::EdgeKind;
pub use reorder::{EntryList, move_positions};

// =============================================================================
// LIST HELPERS
// =============================================================================

/// Append `item` unless already present. Returns whether the list changed.
pub(crate) fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) -> bool {
    if list.contains(&item) {
        return false;
    }
    list.push(item);
    true
}

/// Remove every occurrence of `item`. Returns whether the list changed.
pub(crate) fn remove_item<T: PartialEq>(list: &mut Vec<T>, item: &T) -> bool {
    let before = list.len();
    list.retain(|x| x != item);
    list.len() != before
}

/// Replace `old` by `new` in place, or drop `old` when `new` is already listed.
pub(crate) fn replace_in_list<T: PartialEq + Copy>(list: &mut Vec<T>, old: T, new: T) {
    if !list.contains(&old) {
        return;
    }
    if list.contains(&new) {
        list.retain(|x| *x != old);
    } else {
        for item in list.iter_mut().filter(|item| **item == old) {
            *item = new;
        }
    }
}

/// Replace `old` by `new` in a set.
pub(crate) fn replace_in_set<T: Ord>(set: &mut BTreeSet<T>, old: &T, new: T) {
    if set.remove(old) {
        set.insert(new);
    }
}

/// Append every incoming item not already present, keeping incoming order.
fn append_missing<T: PartialEq + Copy>(list: &mut Vec<T>, incoming: &[T]) {
    for item in incoming {
        push_unique(list, *item);
    }
}

// =============================================================================
// RELATIONSHIP SETS
// =============================================================================

/// Owner of a note: notes hang off exactly one entry or one usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoteTarget {
    Entry(EntryId),
    Usage(UsageId),
}

impl From<NoteTarget> for EntityRef {
    fn from(target: NoteTarget) -> Self {
        match target {
            NoteTarget::Entry(id) => EntityRef::Entry(id),
            NoteTarget::Usage(id) => EntityRef::Usage(id),
        }
    }
}

/// Outgoing edges of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRelations {
    pub languages: Vec<LanguageId>,
    pub translations: Vec<EntryId>,
    /// Entries that translate *to* this one without being translated back.
    pub back_translations: BTreeSet<EntryId>,
    pub roots: Vec<EntryId>,
    pub derived: BTreeSet<EntryId>,
    pub see_also: Vec<EntryId>,
    pub usages: Vec<UsageId>,
    pub keywords: BTreeSet<KeywordId>,
    pub notes: Vec<NoteId>,
    pub collections: BTreeSet<CollectionId>,
}

impl EntryRelations {
    /// True when no edge of any kind is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.is_empty_ignoring_languages()
    }

    /// True when nothing but languages is recorded.
    #[must_use]
    pub fn is_empty_ignoring_languages(&self) -> bool {
        self.translations.is_empty()
            && self.back_translations.is_empty()
            && self.roots.is_empty()
            && self.derived.is_empty()
            && self.see_also.is_empty()
            && self.usages.is_empty()
            && self.keywords.is_empty()
            && self.notes.is_empty()
            && self.collections.is_empty()
    }

    /// Every foreign reference held by this record.
    #[must_use]
    pub fn references(&self) -> Vec<EntityRef> {
        let mut refs = Vec::new();
        refs.extend(self.languages.iter().copied().map(EntityRef::from));
        refs.extend(self.translations.iter().copied().map(EntityRef::from));
        refs.extend(self.back_translations.iter().copied().map(EntityRef::from));
        refs.extend(self.roots.iter().copied().map(EntityRef::from));
        refs.extend(self.derived.iter().copied().map(EntityRef::from));
        refs.extend(self.see_also.iter().copied().map(EntityRef::from));
        refs.extend(self.usages.iter().copied().map(EntityRef::from));
        refs.extend(self.keywords.iter().copied().map(EntityRef::from));
        refs.extend(self.notes.iter().copied().map(EntityRef::from));
        refs.extend(self.collections.iter().copied().map(EntityRef::from));
        refs
    }

    /// Union `incoming` into `self`: lists keep their order and gain missing
    /// ids at the end, sets are unioned.
    pub fn absorb(&mut self, incoming: &EntryRelations) {
        append_missing(&mut self.languages, &incoming.languages);
        append_missing(&mut self.translations, &incoming.translations);
        self.back_translations
            .extend(incoming.back_translations.iter().copied());
        append_missing(&mut self.roots, &incoming.roots);
        self.derived.extend(incoming.derived.iter().copied());
        append_missing(&mut self.see_also, &incoming.see_also);
        append_missing(&mut self.usages, &incoming.usages);
        self.keywords.extend(incoming.keywords.iter().copied());
        append_missing(&mut self.notes, &incoming.notes);
        self.collections.extend(incoming.collections.iter().copied());
    }

    /// Drop every entry-to-entry edge pointing at `id`.
    pub(crate) fn forget_entry(&mut self, id: EntryId) {
        remove_item(&mut self.translations, &id);
        self.back_translations.remove(&id);
        remove_item(&mut self.roots, &id);
        self.derived.remove(&id);
        remove_item(&mut self.see_also, &id);
    }

    /// A back translation that this entry also translates to is a
    /// bidirectional pair; keep it in `translations` only.
    pub(crate) fn settle_back_translations(&mut self) {
        let Self {
            translations,
            back_translations,
            ..
        } = self;
        back_translations.retain(|id| !translations.contains(id));
    }
}

/// Outgoing edges of a language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRelations {
    pub entries: BTreeSet<EntryId>,
    pub usages: BTreeSet<UsageId>,
}

impl LanguageRelations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.usages.is_empty()
    }

    #[must_use]
    pub fn references(&self) -> Vec<EntityRef> {
        let mut refs: Vec<EntityRef> = self.entries.iter().copied().map(EntityRef::from).collect();
        refs.extend(self.usages.iter().copied().map(EntityRef::from));
        refs
    }

    pub fn absorb(&mut self, incoming: &LanguageRelations) {
        self.entries.extend(incoming.entries.iter().copied());
        self.usages.extend(incoming.usages.iter().copied());
    }
}

/// Outgoing edges of a keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRelations {
    pub matches: Vec<EntryId>,
}

impl KeywordRelations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[must_use]
    pub fn references(&self) -> Vec<EntityRef> {
        self.matches.iter().copied().map(EntityRef::from).collect()
    }

    pub fn absorb(&mut self, incoming: &KeywordRelations) {
        append_missing(&mut self.matches, &incoming.matches);
    }
}

/// Outgoing edge of a note: its owner, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRelations {
    pub target: Option<NoteTarget>,
}

impl NoteRelations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target.is_none()
    }

    #[must_use]
    pub fn references(&self) -> Vec<EntityRef> {
        self.target.map(EntityRef::from).into_iter().collect()
    }
}

/// Outgoing edges of a usage example.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRelations {
    pub uses: BTreeSet<EntryId>,
    pub languages: Vec<LanguageId>,
    pub note: Option<NoteId>,
}

impl UsageRelations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.is_empty_ignoring_languages()
    }

    #[must_use]
    pub fn is_empty_ignoring_languages(&self) -> bool {
        self.uses.is_empty() && self.note.is_none()
    }

    #[must_use]
    pub fn references(&self) -> Vec<EntityRef> {
        let mut refs: Vec<EntityRef> = self.uses.iter().copied().map(EntityRef::from).collect();
        refs.extend(self.languages.iter().copied().map(EntityRef::from));
        refs.extend(self.note.map(EntityRef::from));
        refs
    }
}

/// Outgoing edges of an entry collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRelations {
    pub entries: Vec<EntryId>,
}

impl CollectionRelations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn references(&self) -> Vec<EntityRef> {
        self.entries.iter().copied().map(EntityRef::from).collect()
    }
}

// =============================================================================
// RELATION GRAPH
// =============================================================================

/// The relationship graph: one record per live entity, per kind.
///
/// Uses `BTreeMap` exclusively for deterministic ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationGraph {
    pub(crate) entries: BTreeMap<EntryId, EntryRelations>,
    pub(crate) languages: BTreeMap<LanguageId, LanguageRelations>,
    pub(crate) keywords: BTreeMap<KeywordId, KeywordRelations>,
    pub(crate) notes: BTreeMap<NoteId, NoteRelations>,
    pub(crate) usages: BTreeMap<UsageId, UsageRelations>,
    pub(crate) collections: BTreeMap<CollectionId, CollectionRelations>,
}

impl RelationGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty record for a newly created entity.
    pub fn insert(&mut self, reference: EntityRef) {
        match reference {
            EntityRef::Entry(id) => {
                self.entries.entry(id).or_default();
            }
            EntityRef::Language(id) => {
                self.languages.entry(id).or_default();
            }
            EntityRef::Keyword(id) => {
                self.keywords.entry(id).or_default();
            }
            EntityRef::Note(id) => {
                self.notes.entry(id).or_default();
            }
            EntityRef::Usage(id) => {
                self.usages.entry(id).or_default();
            }
            EntityRef::Collection(id) => {
                self.collections.entry(id).or_default();
            }
        }
    }

    /// Drop an entity's own record. Other records are not touched; see
    /// [`rewrite`] for the passes that strip references to it.
    pub fn remove(&mut self, reference: EntityRef) {
        match reference {
            EntityRef::Entry(id) => {
                self.entries.remove(&id);
            }
            EntityRef::Language(id) => {
                self.languages.remove(&id);
            }
            EntityRef::Keyword(id) => {
                self.keywords.remove(&id);
            }
            EntityRef::Note(id) => {
                self.notes.remove(&id);
            }
            EntityRef::Usage(id) => {
                self.usages.remove(&id);
            }
            EntityRef::Collection(id) => {
                self.collections.remove(&id);
            }
        }
    }

    /// Whether a record exists for the reference.
    #[must_use]
    pub fn contains(&self, reference: EntityRef) -> bool {
        match reference {
            EntityRef::Entry(id) => self.entries.contains_key(&id),
            EntityRef::Language(id) => self.languages.contains_key(&id),
            EntityRef::Keyword(id) => self.keywords.contains_key(&id),
            EntityRef::Note(id) => self.notes.contains_key(&id),
            EntityRef::Usage(id) => self.usages.contains_key(&id),
            EntityRef::Collection(id) => self.collections.contains_key(&id),
        }
    }

    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&EntryRelations> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn language(&self, id: LanguageId) -> Option<&LanguageRelations> {
        self.languages.get(&id)
    }

    #[must_use]
    pub fn keyword(&self, id: KeywordId) -> Option<&KeywordRelations> {
        self.keywords.get(&id)
    }

    #[must_use]
    pub fn note(&self, id: NoteId) -> Option<&NoteRelations> {
        self.notes.get(&id)
    }

    #[must_use]
    pub fn usage(&self, id: UsageId) -> Option<&UsageRelations> {
        self.usages.get(&id)
    }

    #[must_use]
    pub fn collection(&self, id: CollectionId) -> Option<&CollectionRelations> {
        self.collections.get(&id)
    }

    /// Every foreign reference held by an entity's record.
    #[must_use]
    pub fn references_of(&self, reference: EntityRef) -> Vec<EntityRef> {
        match reference {
            EntityRef::Entry(id) => self.entry(id).map(EntryRelations::references),
            EntityRef::Language(id) => self.language(id).map(LanguageRelations::references),
            EntityRef::Keyword(id) => self.keyword(id).map(KeywordRelations::references),
            EntityRef::Note(id) => self.note(id).map(NoteRelations::references),
            EntityRef::Usage(id) => self.usage(id).map(UsageRelations::references),
            EntityRef::Collection(id) => {
                self.collection(id).map(CollectionRelations::references)
            }
        }
        .unwrap_or_default()
    }

    /// Every entity that owns a record, in kind then id order.
    pub fn all_owners(&self) -> impl Iterator<Item = EntityRef> + '_ {
        self.entries
            .keys()
            .copied()
            .map(EntityRef::from)
            .chain(self.languages.keys().copied().map(EntityRef::from))
            .chain(self.keywords.keys().copied().map(EntityRef::from))
            .chain(self.notes.keys().copied().map(EntityRef::from))
            .chain(self.usages.keys().copied().map(EntityRef::from))
            .chain(self.collections.keys().copied().map(EntityRef::from))
    }

    /// Every stored reference in the graph, as `(owner, referenced)` pairs.
    pub fn all_references(&self) -> impl Iterator<Item = (EntityRef, EntityRef)> + '_ {
        self.all_owners().flat_map(move |owner| {
            self.references_of(owner)
                .into_iter()
                .map(move |target| (owner, target))
        })
    }

    /// Total number of stored adjacency items (both sides of every edge).
    #[must_use]
    pub fn adjacency_count(&self) -> usize {
        self.all_references().count()
    }

    // Mutable record access for the edge primitives. Records always exist for
    // validated ids; `or_default` keeps these paths panic-free regardless.

    pub(crate) fn entry_mut(&mut self, id: EntryId) -> &mut EntryRelations {
        self.entries.entry(id).or_default()
    }

    pub(crate) fn language_mut(&mut self, id: LanguageId) -> &mut LanguageRelations {
        self.languages.entry(id).or_default()
    }

    pub(crate) fn keyword_mut(&mut self, id: KeywordId) -> &mut KeywordRelations {
        self.keywords.entry(id).or_default()
    }

    pub(crate) fn note_mut(&mut self, id: NoteId) -> &mut NoteRelations {
        self.notes.entry(id).or_default()
    }

    pub(crate) fn usage_mut(&mut self, id: UsageId) -> &mut UsageRelations {
        self.usages.entry(id).or_default()
    }

    pub(crate) fn collection_mut(&mut self, id: CollectionId) -> &mut CollectionRelations {
        self.collections.entry(id).or_default()
    }
}

// =============================================================================
// TESTS
// =============================================================================
