//! # Statistics
//!
//! Counts for status reporting. Computed on demand with linear scans.

use crate::lexicon::Lexicon;
use crate::types::EntityKind;
use serde::{Deserialize, Serialize};

/// Entity and edge counts of a lexicon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconStats {
    pub entries: usize,
    pub languages: usize,
    pub keywords: usize,
    pub notes: usize,
    pub usages: usize,
    pub collections: usize,
    /// Stored adjacency items; a two-sided edge counts twice.
    pub adjacency_items: usize,
    /// Live entities that currently relate to nothing but languages.
    pub orphans: usize,
}

impl LexiconStats {
    /// Compute statistics for a lexicon.
    #[must_use]
    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        let entities = lexicon.entities();
        Self {
            entries: entities.count(EntityKind::Entry),
            languages: entities.count(EntityKind::Language),
            keywords: entities.count(EntityKind::Keyword),
            notes: entities.count(EntityKind::Note),
            usages: entities.count(EntityKind::Usage),
            collections: entities.count(EntityKind::Collection),
            adjacency_items: lexicon.relations().adjacency_count(),
            orphans: lexicon.orphans().len(),
        }
    }

    /// Total number of live entities.
    #[must_use]
    pub fn total_entities(&self) -> usize {
        self.entries
            .saturating_add(self.languages)
            .saturating_add(self.keywords)
            .saturating_add(self.notes)
            .saturating_add(self.usages)
            .saturating_add(self.collections)
    }
}

impl Lexicon {
    #[must_use]
    pub fn stats(&self) -> LexiconStats {
        LexiconStats::from_lexicon(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entry, EntryId, Language, LanguageId, Timestamp};

    #[test]
    fn counts_entities_and_both_edge_sides() {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_language(LanguageId(1), Language::new("en", "English"), Timestamp(1))
            .expect("create");
        lexicon
            .create_entry_in(EntryId(2), Entry::new("cat"), Timestamp(1), &[LanguageId(1)])
            .expect("create");

        let stats = lexicon.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.languages, 1);
        assert_eq!(stats.total_entities(), 2);
        assert_eq!(stats.adjacency_items, 2);
        // The entry only has a language.
        assert_eq!(stats.orphans, 1);
    }

    #[test]
    fn empty_lexicon_is_all_zero() {
        assert_eq!(Lexicon::new().stats(), LexiconStats::default());
    }
}
