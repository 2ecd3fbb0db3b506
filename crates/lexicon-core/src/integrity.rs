//! # Integrity Audit
//!
//! Whole-store verification, used after loading a snapshot or an import and
//! by the property tests. A store produced only through the `Lexicon` API
//! never reports a violation.
//!
//! Checked:
//! - every live entity has a relationship record and every record belongs to
//!   a live entity
//! - every foreign identifier references a live entity
//! - every edge is present on both of its sides
//! - ordered fields hold no duplicates and entries never relate to themselves
//! - a translation is never also listed as a back translation

use crate::lexicon::Lexicon;
use crate::relations::{EdgeKind, NoteTarget, RelationGraph};
use crate::types::{EntityRef, EntryId, LexiconError};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// A live entity without a relationship record.
    MissingRecord { entity: EntityRef },
    /// A relationship record for an entity that does not exist.
    StrayRecord { entity: EntityRef },
    /// A reference to an entity that does not exist.
    Dangling { owner: EntityRef, target: EntityRef },
    /// An edge recorded on `owner` but not on `target`.
    OneSided {
        edge: EdgeKind,
        owner: EntityRef,
        target: EntityRef,
    },
    /// The same id listed twice in an ordered field.
    Duplicate {
        edge: EdgeKind,
        owner: EntityRef,
        target: EntityRef,
    },
    /// An entry related to itself.
    SelfEdge { edge: EdgeKind, entry: EntryId },
    /// `other` is listed in both `translations` and `back_translations`.
    StaleBackTranslation { entry: EntryId, other: EntryId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRecord { entity } => write!(f, "{entity} has no relationship record"),
            Self::StrayRecord { entity } => write!(f, "relationship record for missing {entity}"),
            Self::Dangling { owner, target } => write!(f, "{owner} references missing {target}"),
            Self::OneSided {
                edge,
                owner,
                target,
            } => write!(f, "{edge} edge {owner} -> {target} is missing its other side"),
            Self::Duplicate {
                edge,
                owner,
                target,
            } => write!(f, "{owner} lists {target} twice in {edge}"),
            Self::SelfEdge { edge, entry } => write!(f, "{entry} has a {edge} edge to itself"),
            Self::StaleBackTranslation { entry, other } => {
                write!(f, "{entry} lists {other} as both translation and back translation")
            }
        }
    }
}

fn duplicates<T: Ord + Copy>(list: &[T]) -> Vec<T> {
    let mut seen = BTreeSet::new();
    list.iter().copied().filter(|item| !seen.insert(*item)).collect()
}

/// Collects violations while walking the graph.
struct Audit<'a> {
    graph: &'a RelationGraph,
    found: Vec<Violation>,
}

impl Audit<'_> {
    fn expect(&mut self, holds: bool, edge: EdgeKind, owner: EntityRef, target: EntityRef) {
        if !holds {
            self.found.push(Violation::OneSided {
                edge,
                owner,
                target,
            });
        }
    }

    fn no_duplicates<T>(&mut self, list: &[T], edge: EdgeKind, owner: EntityRef)
    where
        T: Ord + Copy + Into<EntityRef>,
    {
        for target in duplicates(list) {
            self.found.push(Violation::Duplicate {
                edge,
                owner,
                target: target.into(),
            });
        }
    }

    fn entries(&mut self) {
        let graph = self.graph;
        for (&id, record) in &graph.entries {
            let owner = EntityRef::Entry(id);
            self.no_duplicates(&record.languages, EdgeKind::EntryLanguage, owner);
            self.no_duplicates(&record.translations, EdgeKind::Translation, owner);
            self.no_duplicates(&record.roots, EdgeKind::Root, owner);
            self.no_duplicates(&record.see_also, EdgeKind::SeeAlso, owner);
            self.no_duplicates(&record.usages, EdgeKind::EntryUsage, owner);
            self.no_duplicates(&record.notes, EdgeKind::EntryNote, owner);

            let self_edges = [
                (EdgeKind::Translation, record.translations.contains(&id)),
                (EdgeKind::Translation, record.back_translations.contains(&id)),
                (EdgeKind::Root, record.roots.contains(&id)),
                (EdgeKind::Root, record.derived.contains(&id)),
                (EdgeKind::SeeAlso, record.see_also.contains(&id)),
            ];
            for (edge, _) in self_edges.into_iter().filter(|(_, found)| *found) {
                self.found.push(Violation::SelfEdge { edge, entry: id });
            }

            for &language in &record.languages {
                let holds = graph
                    .language(language)
                    .is_some_and(|r| r.entries.contains(&id));
                self.expect(holds, EdgeKind::EntryLanguage, owner, language.into());
            }
            for &other in &record.translations {
                let holds = graph.entry(other).is_some_and(|r| {
                    r.translations.contains(&id) || r.back_translations.contains(&id)
                });
                self.expect(holds, EdgeKind::Translation, owner, other.into());
            }
            for &other in &record.back_translations {
                if record.translations.contains(&other) {
                    self.found
                        .push(Violation::StaleBackTranslation { entry: id, other });
                }
                let holds = graph
                    .entry(other)
                    .is_some_and(|r| r.translations.contains(&id));
                self.expect(holds, EdgeKind::Translation, owner, other.into());
            }
            for &root in &record.roots {
                let holds = graph.entry(root).is_some_and(|r| r.derived.contains(&id));
                self.expect(holds, EdgeKind::Root, owner, root.into());
            }
            for &derived in &record.derived {
                let holds = graph.entry(derived).is_some_and(|r| r.roots.contains(&id));
                self.expect(holds, EdgeKind::Root, owner, derived.into());
            }
            for &other in &record.see_also {
                let holds = graph.entry(other).is_some_and(|r| r.see_also.contains(&id));
                self.expect(holds, EdgeKind::SeeAlso, owner, other.into());
            }
            for &usage in &record.usages {
                let holds = graph.usage(usage).is_some_and(|r| r.uses.contains(&id));
                self.expect(holds, EdgeKind::EntryUsage, owner, usage.into());
            }
            for &keyword in &record.keywords {
                let holds = graph
                    .keyword(keyword)
                    .is_some_and(|r| r.matches.contains(&id));
                self.expect(holds, EdgeKind::EntryKeyword, owner, keyword.into());
            }
            for &note in &record.notes {
                let holds = graph
                    .note(note)
                    .is_some_and(|r| r.target == Some(NoteTarget::Entry(id)));
                self.expect(holds, EdgeKind::EntryNote, owner, note.into());
            }
            for &collection in &record.collections {
                let holds = graph
                    .collection(collection)
                    .is_some_and(|r| r.entries.contains(&id));
                self.expect(holds, EdgeKind::EntryCollection, owner, collection.into());
            }
        }
    }

    fn languages(&mut self) {
        let graph = self.graph;
        for (&id, record) in &graph.languages {
            let owner = EntityRef::Language(id);
            for &entry in &record.entries {
                let holds = graph.entry(entry).is_some_and(|r| r.languages.contains(&id));
                self.expect(holds, EdgeKind::EntryLanguage, owner, entry.into());
            }
            for &usage in &record.usages {
                let holds = graph.usage(usage).is_some_and(|r| r.languages.contains(&id));
                self.expect(holds, EdgeKind::UsageLanguage, owner, usage.into());
            }
        }
    }

    fn keywords(&mut self) {
        let graph = self.graph;
        for (&id, record) in &graph.keywords {
            let owner = EntityRef::Keyword(id);
            self.no_duplicates(&record.matches, EdgeKind::EntryKeyword, owner);
            for &entry in &record.matches {
                let holds = graph.entry(entry).is_some_and(|r| r.keywords.contains(&id));
                self.expect(holds, EdgeKind::EntryKeyword, owner, entry.into());
            }
        }
    }

    fn notes(&mut self) {
        let graph = self.graph;
        for (&id, record) in &graph.notes {
            let owner = EntityRef::Note(id);
            match record.target {
                Some(NoteTarget::Entry(entry)) => {
                    let holds = graph.entry(entry).is_some_and(|r| r.notes.contains(&id));
                    self.expect(holds, EdgeKind::EntryNote, owner, entry.into());
                }
                Some(NoteTarget::Usage(usage)) => {
                    let holds = graph.usage(usage).is_some_and(|r| r.note == Some(id));
                    self.expect(holds, EdgeKind::UsageNote, owner, usage.into());
                }
                None => {}
            }
        }
    }

    fn usages(&mut self) {
        let graph = self.graph;
        for (&id, record) in &graph.usages {
            let owner = EntityRef::Usage(id);
            self.no_duplicates(&record.languages, EdgeKind::UsageLanguage, owner);
            for &entry in &record.uses {
                let holds = graph.entry(entry).is_some_and(|r| r.usages.contains(&id));
                self.expect(holds, EdgeKind::EntryUsage, owner, entry.into());
            }
            for &language in &record.languages {
                let holds = graph.language(language).is_some_and(|r| r.usages.contains(&id));
                self.expect(holds, EdgeKind::UsageLanguage, owner, language.into());
            }
            if let Some(note) = record.note {
                let holds = graph
                    .note(note)
                    .is_some_and(|r| r.target == Some(NoteTarget::Usage(id)));
                self.expect(holds, EdgeKind::UsageNote, owner, note.into());
            }
        }
    }

    fn collections(&mut self) {
        let graph = self.graph;
        for (&id, record) in &graph.collections {
            let owner = EntityRef::Collection(id);
            self.no_duplicates(&record.entries, EdgeKind::EntryCollection, owner);
            for &entry in &record.entries {
                let holds = graph.entry(entry).is_some_and(|r| r.collections.contains(&id));
                self.expect(holds, EdgeKind::EntryCollection, owner, entry.into());
            }
        }
    }
}

/// Audit a whole lexicon. Violations come back sorted and deduplicated.
#[must_use]
pub fn verify(lexicon: &Lexicon) -> Vec<Violation> {
    let entities = &lexicon.entities;
    let graph = &lexicon.relations;
    let mut audit = Audit {
        graph,
        found: Vec::new(),
    };

    let live = entities
        .entries
        .ids()
        .map(EntityRef::from)
        .chain(entities.languages.ids().map(EntityRef::from))
        .chain(entities.keywords.ids().map(EntityRef::from))
        .chain(entities.notes.ids().map(EntityRef::from))
        .chain(entities.usages.ids().map(EntityRef::from))
        .chain(entities.collections.ids().map(EntityRef::from));
    for entity in live {
        if !graph.contains(entity) {
            audit.found.push(Violation::MissingRecord { entity });
        }
    }

    let recorded: BTreeSet<EntityRef> = graph.all_owners().collect();
    for &entity in &recorded {
        if !entities.contains(entity) {
            audit.found.push(Violation::StrayRecord { entity });
        }
    }

    for (owner, target) in graph.all_references() {
        if !entities.contains(target) {
            audit.found.push(Violation::Dangling { owner, target });
        }
    }

    audit.entries();
    audit.languages();
    audit.keywords();
    audit.notes();
    audit.usages();
    audit.collections();

    let mut found = audit.found;
    found.sort();
    found.dedup();
    found
}

impl Lexicon {
    /// Audit this lexicon; see [`verify`].
    #[must_use]
    pub fn verify(&self) -> Vec<Violation> {
        verify(self)
    }

    /// Accept a lexicon from an untrusted source only if it passes the audit.
    pub fn validated(self) -> Result<Self, LexiconError> {
        let violations = self.verify();
        match violations.first() {
            None => Ok(self),
            Some(first) => Err(LexiconError::DeserializationError(format!(
                "{} integrity violation(s), first: {first}",
                violations.len()
            ))),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
