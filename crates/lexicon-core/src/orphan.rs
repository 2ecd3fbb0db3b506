//! # Orphan Check
//!
//! An entity is an orphan when its relationship record holds nothing,
//! languages aside: an entry or usage that only names its languages is still
//! an orphan. The check is a pure query; pruning is decided by the
//! [`OrphanPolicy`] the `Lexicon` applies after a disconnect.

use crate::lexicon::Lexicon;
use crate::relations::{
    CollectionRelations, EdgeKind, EntryRelations, KeywordRelations, LanguageRelations,
    NoteRelations, NoteTarget, UsageRelations, remove_item,
};
use crate::types::EntityRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// POLICY
// =============================================================================

/// Which edge kinds prune the detached side once it is left orphaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanPolicy {
    prune: BTreeSet<EdgeKind>,
}

impl Default for OrphanPolicy {
    /// Dropping a translation deletes the translated entry once nothing else
    /// holds on to it.
    fn default() -> Self {
        Self::pruning([EdgeKind::Translation])
    }
}

impl OrphanPolicy {
    /// Never prune.
    #[must_use]
    pub fn keep_all() -> Self {
        Self {
            prune: BTreeSet::new(),
        }
    }

    /// Prune on exactly these edge kinds.
    #[must_use]
    pub fn pruning(edges: impl IntoIterator<Item = EdgeKind>) -> Self {
        Self {
            prune: edges.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn prunes(&self, edge: EdgeKind) -> bool {
        self.prune.contains(&edge)
    }

    /// The pruning edge kinds, in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKind> + '_ {
        self.prune.iter().copied()
    }
}

// =============================================================================
// PROPOSED REMOVAL
// =============================================================================

/// An edge the caller is about to remove from the entity being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedRemoval {
    pub edge: EdgeKind,
    /// The other endpoint of the edge.
    pub other: EntityRef,
}

impl ProposedRemoval {
    #[must_use]
    pub const fn new(edge: EdgeKind, other: EntityRef) -> Self {
        Self { edge, other }
    }
}

fn without_entry_edge(record: &EntryRelations, removal: ProposedRemoval) -> EntryRelations {
    let mut record = record.clone();
    match (removal.edge, removal.other) {
        (EdgeKind::EntryLanguage, EntityRef::Language(id)) => {
            remove_item(&mut record.languages, &id);
        }
        (EdgeKind::Translation, EntityRef::Entry(id)) => {
            remove_item(&mut record.translations, &id);
            record.back_translations.remove(&id);
        }
        (EdgeKind::Root, EntityRef::Entry(id)) => {
            remove_item(&mut record.roots, &id);
            record.derived.remove(&id);
        }
        (EdgeKind::SeeAlso, EntityRef::Entry(id)) => {
            remove_item(&mut record.see_also, &id);
        }
        (EdgeKind::EntryUsage, EntityRef::Usage(id)) => {
            remove_item(&mut record.usages, &id);
        }
        (EdgeKind::EntryKeyword, EntityRef::Keyword(id)) => {
            record.keywords.remove(&id);
        }
        (EdgeKind::EntryNote, EntityRef::Note(id)) => {
            remove_item(&mut record.notes, &id);
        }
        (EdgeKind::EntryCollection, EntityRef::Collection(id)) => {
            record.collections.remove(&id);
        }
        _ => {}
    }
    record
}

fn without_language_edge(record: &LanguageRelations, removal: ProposedRemoval) -> LanguageRelations {
    let mut record = record.clone();
    match (removal.edge, removal.other) {
        (EdgeKind::EntryLanguage, EntityRef::Entry(id)) => {
            record.entries.remove(&id);
        }
        (EdgeKind::UsageLanguage, EntityRef::Usage(id)) => {
            record.usages.remove(&id);
        }
        _ => {}
    }
    record
}

fn without_keyword_edge(record: &KeywordRelations, removal: ProposedRemoval) -> KeywordRelations {
    let mut record = record.clone();
    if let (EdgeKind::EntryKeyword, EntityRef::Entry(id)) = (removal.edge, removal.other) {
        remove_item(&mut record.matches, &id);
    }
    record
}

fn without_note_edge(record: &NoteRelations, removal: ProposedRemoval) -> NoteRelations {
    let detached = match (removal.edge, removal.other) {
        (EdgeKind::EntryNote, EntityRef::Entry(id)) => Some(NoteTarget::Entry(id)),
        (EdgeKind::UsageNote, EntityRef::Usage(id)) => Some(NoteTarget::Usage(id)),
        _ => None,
    };
    let mut record = record.clone();
    if detached.is_some() && record.target == detached {
        record.target = None;
    }
    record
}

fn without_usage_edge(record: &UsageRelations, removal: ProposedRemoval) -> UsageRelations {
    let mut record = record.clone();
    match (removal.edge, removal.other) {
        (EdgeKind::EntryUsage, EntityRef::Entry(id)) => {
            record.uses.remove(&id);
        }
        (EdgeKind::UsageLanguage, EntityRef::Language(id)) => {
            remove_item(&mut record.languages, &id);
        }
        (EdgeKind::UsageNote, EntityRef::Note(id)) if record.note == Some(id) => {
            record.note = None;
        }
        _ => {}
    }
    record
}

fn without_collection_edge(
    record: &CollectionRelations,
    removal: ProposedRemoval,
) -> CollectionRelations {
    let mut record = record.clone();
    if let (EdgeKind::EntryCollection, EntityRef::Entry(id)) = (removal.edge, removal.other) {
        remove_item(&mut record.entries, &id);
    }
    record
}

// =============================================================================
// CHECK
// =============================================================================

impl Lexicon {
    /// Whether the entity currently holds no relationship besides languages.
    ///
    /// Entities that are not live are never orphans.
    #[must_use]
    pub fn is_orphan(&self, entity: EntityRef) -> bool {
        self.would_orphan(entity, None)
    }

    /// Whether the entity would be an orphan once `removal` is applied.
    ///
    /// Pure: the check works on a copy of the record.
    #[must_use]
    pub fn would_orphan(&self, entity: EntityRef, removal: Option<ProposedRemoval>) -> bool {
        if !self.entities.contains(entity) {
            return false;
        }
        let graph = &self.relations;
        match entity {
            EntityRef::Entry(id) => graph.entry(id).is_none_or(|record| match removal {
                Some(removal) => without_entry_edge(record, removal).is_empty_ignoring_languages(),
                None => record.is_empty_ignoring_languages(),
            }),
            EntityRef::Language(id) => graph.language(id).is_none_or(|record| match removal {
                Some(removal) => without_language_edge(record, removal).is_empty(),
                None => record.is_empty(),
            }),
            EntityRef::Keyword(id) => graph.keyword(id).is_none_or(|record| match removal {
                Some(removal) => without_keyword_edge(record, removal).is_empty(),
                None => record.is_empty(),
            }),
            EntityRef::Note(id) => graph.note(id).is_none_or(|record| match removal {
                Some(removal) => without_note_edge(record, removal).is_empty(),
                None => record.is_empty(),
            }),
            EntityRef::Usage(id) => graph.usage(id).is_none_or(|record| match removal {
                Some(removal) => without_usage_edge(record, removal).is_empty_ignoring_languages(),
                None => record.is_empty_ignoring_languages(),
            }),
            EntityRef::Collection(id) => graph.collection(id).is_none_or(|record| match removal {
                Some(removal) => without_collection_edge(record, removal).is_empty(),
                None => record.is_empty(),
            }),
        }
    }

    /// Every live entity that is currently an orphan, in kind then id order.
    #[must_use]
    pub fn orphans(&self) -> Vec<EntityRef> {
        let entities = &self.entities;
        entities
            .entries
            .ids()
            .map(EntityRef::from)
            .chain(entities.languages.ids().map(EntityRef::from))
            .chain(entities.keywords.ids().map(EntityRef::from))
            .chain(entities.notes.ids().map(EntityRef::from))
            .chain(entities.usages.ids().map(EntityRef::from))
            .chain(entities.collections.ids().map(EntityRef::from))
            .filter(|entity| self.is_orphan(*entity))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
