//! # Merge
//!
//! Folds an incoming entity into an existing one of the same kind:
//!
//! 1. scalar fields: first non-empty value wins, the survivor going first
//! 2. metadata: earliest creation, latest modification
//! 3. relationships: survivor order first, incoming ids appended when
//!    missing, sets unioned
//! 4. every third-party reference to the incoming id is re-pointed at the
//!    survivor, and self edges produced by the fold are dropped
//! 5. the incoming entity goes through the cascading delete path
//!
//! Everything is validated before the first write.

use crate::lexicon::Lexicon;
use crate::store::Entity;
use crate::types::{
    EntityRef, Entry, EntryId, Keyword, KeywordId, Language, LanguageId, LexiconError,
    MergeValue,
};
use tracing::debug;

impl Lexicon {
    /// Fold the value and metadata of `incoming` into `existing`, leaving the
    /// relationship graph alone.
    fn fold_value<E>(&mut self, incoming: E::Id, existing: E::Id) -> Result<(), LexiconError>
    where
        E: Entity + MergeValue,
    {
        if incoming == existing {
            return Err(LexiconError::SelfReference(incoming.into()));
        }
        let table = E::table_mut(&mut self.entities);
        let folded = table
            .read(incoming)
            .cloned()
            .ok_or_else(|| LexiconError::EntityNotFound(incoming.into()))?;
        let mut survivor = table
            .read(existing)
            .cloned()
            .ok_or_else(|| LexiconError::EntityNotFound(existing.into()))?;

        survivor.value.merge_from(&folded.value);
        survivor.metadata.absorb(&folded.metadata);
        table.replace(existing, survivor)
    }

    /// Merge entry `incoming` into entry `existing`. `incoming` no longer
    /// resolves afterwards.
    pub fn merge_entries(&mut self, incoming: EntryId, existing: EntryId) -> Result<(), LexiconError> {
        self.fold_value::<Entry>(incoming, existing)?;

        if let Some(relations) = self.relations.entry(incoming).cloned() {
            self.relations.entry_mut(existing).absorb(&relations);
        }
        self.relations.rehome_entry(incoming, existing);
        self.delete_entry(incoming)?;

        debug!(from = %incoming, into = %existing, "merged entries");
        Ok(())
    }

    /// Merge language `incoming` into language `existing`.
    pub fn merge_languages(
        &mut self,
        incoming: LanguageId,
        existing: LanguageId,
    ) -> Result<(), LexiconError> {
        self.fold_value::<Language>(incoming, existing)?;

        if let Some(relations) = self.relations.language(incoming).cloned() {
            self.relations.language_mut(existing).absorb(&relations);
        }
        self.relations.rehome_language(incoming, existing);
        self.delete_language(incoming)?;

        debug!(from = %incoming, into = %existing, "merged languages");
        Ok(())
    }

    /// Merge keyword `incoming` into keyword `existing`.
    pub fn merge_keywords(
        &mut self,
        incoming: KeywordId,
        existing: KeywordId,
    ) -> Result<(), LexiconError> {
        self.fold_value::<Keyword>(incoming, existing)?;

        if let Some(relations) = self.relations.keyword(incoming).cloned() {
            self.relations.keyword_mut(existing).absorb(&relations);
        }
        self.relations.rehome_keyword(incoming, existing);
        self.delete_keyword(incoming)?;

        debug!(from = %incoming, into = %existing, "merged keywords");
        Ok(())
    }

    /// Merge `incoming` into `existing` by reference. Both must be of the
    /// same mergeable kind: entries, languages or keywords.
    pub fn merge(&mut self, incoming: EntityRef, existing: EntityRef) -> Result<(), LexiconError> {
        match (incoming, existing) {
            (EntityRef::Entry(a), EntityRef::Entry(b)) => self.merge_entries(a, b),
            (EntityRef::Language(a), EntityRef::Language(b)) => self.merge_languages(a, b),
            (EntityRef::Keyword(a), EntityRef::Keyword(b)) => self.merge_keywords(a, b),
            (a, b) if a.kind() != b.kind() => Err(LexiconError::InvalidReference(format!(
                "cannot merge {a} into {b}: kinds differ"
            ))),
            (a, _) => Err(LexiconError::InvalidReference(format!(
                "{} cannot be merged; only entries, languages and keywords can",
                a.kind()
            ))),
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
    use crate::types::{EntityRef, Timestamp, Usage, UsageId};

    fn two_runs() -> Lexicon {
        let mut lexicon = Lexicon::new();
        lexicon
            .create_language(LanguageId(1), Language::new("en", "English"), Timestamp(1))
            .expect("create");
        lexicon
            .create_entry_in(
                EntryId(2),
                Entry::new("run").with_definition("move fast"),
                Timestamp(20),
                &[LanguageId(1)],
            )
            .expect("create");
        lexicon
            .create_entry_in(
                EntryId(3),
                Entry::new("run").with_pronunciation("/rʌn/"),
                Timestamp(10),
                &[LanguageId(1)],
            )
            .expect("create");
        lexicon
    }

    #[test]
    fn merge_keeps_shared_language_once() {
        let mut lexicon = two_runs();
        lexicon.merge_entries(EntryId(3), EntryId(2)).expect("merge");

        assert!(lexicon.entry(EntryId(3)).is_none());
        let languages: Vec<_> = lexicon
            .languages_of(EntryId(2), &Query::new())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(languages, vec![LanguageId(1)]);
        assert_eq!(
            lexicon.relations().language(LanguageId(1)).map(|r| r.entries.len()),
            Some(1)
        );
    }

    #[test]
    fn merge_fills_empty_fields_and_widens_metadata() {
        let mut lexicon = two_runs();
        lexicon
            .touch(EntityRef::Entry(EntryId(3)), Timestamp(50))
            .expect("touch");
        lexicon.merge_entries(EntryId(3), EntryId(2)).expect("merge");

        let survivor = lexicon.entry(EntryId(2)).expect("survivor");
        assert_eq!(survivor.value.definition, "move fast");
        assert_eq!(survivor.value.pronunciation, "/rʌn/");
        assert_eq!(survivor.metadata.created, Timestamp(10));
        assert_eq!(survivor.metadata.modified, Timestamp(50));
    }

    #[test]
    fn third_party_edges_follow_the_survivor() {
        let mut lexicon = two_runs();
        lexicon
            .create_entry(EntryId(4), Entry::new("correr"), Timestamp(1))
            .expect("create");
        lexicon
            .connect_translation(EntryId(4), EntryId(3), true)
            .expect("connect");
        lexicon.connect_root(EntryId(2), EntryId(3)).expect("connect");

        lexicon.merge_entries(EntryId(3), EntryId(2)).expect("merge");

        assert_eq!(
            lexicon.relations().entry(EntryId(4)).map(|r| r.translations.clone()),
            Some(vec![EntryId(2)])
        );
        let survivor = lexicon.relations().entry(EntryId(2)).expect("record");
        assert_eq!(survivor.translations, vec![EntryId(4)]);
        // The root edge between the two merged entries collapses.
        assert!(survivor.roots.is_empty());
        assert!(survivor.derived.is_empty());
        assert!(
            lexicon
                .relations()
                .all_references()
                .all(|(_, target)| target != EntityRef::Entry(EntryId(3)))
        );
    }

    #[test]
    fn merge_into_self_is_rejected() {
        let mut lexicon = two_runs();
        assert!(matches!(
            lexicon.merge_entries(EntryId(2), EntryId(2)),
            Err(LexiconError::SelfReference(_))
        ));
        assert!(matches!(
            lexicon.merge_entries(EntryId(9), EntryId(2)),
            Err(LexiconError::EntityNotFound(_))
        ));
        assert!(lexicon.contains(EntryId(2)));
    }

    #[test]
    fn language_merge_rehomes_entries_and_usages() {
        let mut lexicon = two_runs();
        lexicon
            .create_language(LanguageId(5), Language::new("EN", ""), Timestamp(0))
            .expect("create");
        lexicon
            .create_usage(UsageId(6), Usage::new("I run"), Timestamp(1))
            .expect("create");
        lexicon
            .connect_usage_language(UsageId(6), LanguageId(5))
            .expect("connect");

        lexicon.merge_languages(LanguageId(5), LanguageId(1)).expect("merge");

        assert!(lexicon.language(LanguageId(5)).is_none());
        assert_eq!(
            lexicon.relations().usage(UsageId(6)).map(|r| r.languages.clone()),
            Some(vec![LanguageId(1)])
        );
        assert!(
            lexicon
                .relations()
                .language(LanguageId(1))
                .is_some_and(|r| r.usages.contains(&UsageId(6)))
        );
        assert_eq!(
            lexicon.language(LanguageId(1)).map(|l| l.metadata.created),
            Some(Timestamp(0))
        );
    }

    #[test]
    fn keyword_merge_unions_matches() {
        let mut lexicon = two_runs();
        lexicon
            .create_keyword(KeywordId(7), Keyword::new("motion"), Timestamp(1))
            .expect("create");
        lexicon
            .create_keyword(KeywordId(8), Keyword::new("Motion"), Timestamp(1))
            .expect("create");
        lexicon.connect_entry_keyword(EntryId(2), KeywordId(7)).expect("connect");
        lexicon.connect_entry_keyword(EntryId(3), KeywordId(8)).expect("connect");
        lexicon.connect_entry_keyword(EntryId(2), KeywordId(8)).expect("connect");

        lexicon.merge_keywords(KeywordId(8), KeywordId(7)).expect("merge");

        assert_eq!(
            lexicon.relations().keyword(KeywordId(7)).map(|r| r.matches.clone()),
            Some(vec![EntryId(2), EntryId(3)])
        );
        assert!(
            lexicon
                .relations()
                .entry(EntryId(3))
                .is_some_and(|r| r.keywords.contains(&KeywordId(7)))
        );
    }

    #[test]
    fn merge_by_reference_dispatches_on_kind() {
        let mut lexicon = two_runs();

        assert!(matches!(
            lexicon.merge(EntityRef::Entry(EntryId(3)), EntityRef::Language(LanguageId(1))),
            Err(LexiconError::InvalidReference(_))
        ));
        assert!(matches!(
            lexicon.merge(EntityRef::Usage(UsageId(8)), EntityRef::Usage(UsageId(9))),
            Err(LexiconError::InvalidReference(_))
        ));

        lexicon
            .merge(EntityRef::Entry(EntryId(3)), EntityRef::Entry(EntryId(2)))
            .expect("merge");
        assert!(!lexicon.contains(EntryId(3)));
        assert!(lexicon.verify().is_empty());
    }
}
