//! # Scenario Tiers (T0-T4)
//!
//! End-to-end behavior of the store, driven only through the public API.
//! Every tier finishes with an integrity audit.
//!
//! ## Tiers
//! - T0: Create and Read
//! - T1: Edge Symmetry
//! - T2: Cascading Delete
//! - T3: Merge
//! - T4: Reorder and Orphans

use lexicon_core::{
    EdgeKind, EntityRef, Entry, EntryId, EntryList, Keyword, KeywordId, Language, LanguageId,
    Lexicon, LexiconError, Note, NoteId, OrphanPolicy, ProposedRemoval, Query, Row, SequentialIds,
    Timestamp, Usage, UsageId, order,
};

fn assert_clean(lexicon: &Lexicon) {
    let violations = lexicon.verify();
    assert!(violations.is_empty(), "integrity violations: {violations:?}");
}

fn spellings(rows: &[Row<'_, EntryId, Entry>]) -> Vec<String> {
    rows.iter()
        .map(|(_, tracked)| tracked.value.spelling.clone())
        .collect()
}

/// English "cat" and Spanish "gato", translated both ways.
fn cat_and_gato() -> (Lexicon, EntryId, EntryId) {
    let mut ids = SequentialIds::default();
    let mut lexicon = Lexicon::new();
    let en: LanguageId = ids.next_id();
    let es: LanguageId = ids.next_id();
    lexicon
        .create_language(en, Language::new("en", "English"), Timestamp(1))
        .expect("create en");
    lexicon
        .create_language(es, Language::new("es", "Spanish"), Timestamp(1))
        .expect("create es");

    let cat: EntryId = ids.next_id();
    let gato: EntryId = ids.next_id();
    lexicon
        .create_entry_in(cat, Entry::new("cat"), Timestamp(2), &[en])
        .expect("create cat");
    lexicon
        .create_entry_in(gato, Entry::new("gato"), Timestamp(3), &[es])
        .expect("create gato");
    lexicon
        .connect_translation(cat, gato, true)
        .expect("connect translation");
    (lexicon, cat, gato)
}

// =============================================================================
// TIER T0: CREATE AND READ
// =============================================================================

mod t0_create_and_read {
    use super::*;

    /// T0.1: Created values read back with creation metadata.
    #[test]
    fn created_value_reads_back() {
        let (lexicon, cat, _) = cat_and_gato();
        let tracked = lexicon.entry(cat).expect("cat");

        assert_eq!(tracked.value.spelling, "cat");
        assert_eq!(tracked.metadata.created, Timestamp(2));
        assert_eq!(tracked.metadata.modified, Timestamp(2));
        assert_clean(&lexicon);
    }

    /// T0.2: Duplicate identifiers are rejected without side effects.
    #[test]
    fn duplicate_identifier_rejected() {
        let (mut lexicon, cat, _) = cat_and_gato();
        let before = lexicon.clone();

        let result = lexicon.create_entry(cat, Entry::new("dog"), Timestamp(9));

        assert!(matches!(result, Err(LexiconError::DuplicateId(_))));
        assert_eq!(lexicon, before);
    }

    /// T0.3: Whole-kind scans honor sort, reverse and limit.
    #[test]
    fn whole_kind_scan() {
        let (lexicon, _, _) = cat_and_gato();
        let rows = lexicon.entries(&Query::new().sort_by(order::by_created).reversed().limit(1));

        assert_eq!(spellings(&rows), vec!["gato"]);
    }

    /// T0.4: Ids seeded from a loaded store never collide.
    #[test]
    fn next_free_id_seeds_sequence() {
        let (mut lexicon, _, _) = cat_and_gato();
        let mut ids = SequentialIds::starting_at(lexicon.next_free_id());

        let dog: EntryId = ids.next_id();
        lexicon
            .create_entry(dog, Entry::new("dog"), Timestamp(4))
            .expect("fresh id");
        assert_clean(&lexicon);
    }
}

// =============================================================================
// TIER T1: EDGE SYMMETRY
// =============================================================================

mod t1_edge_symmetry {
    use super::*;

    /// T1.1: A bidirectional translation is visible from both sides.
    #[test]
    fn translation_visible_from_both_sides() {
        let (lexicon, cat, gato) = cat_and_gato();

        assert_eq!(
            spellings(&lexicon.translations_of(cat, &Query::new())),
            vec!["gato"]
        );
        assert_eq!(
            spellings(&lexicon.translations_of(gato, &Query::new())),
            vec!["cat"]
        );
        assert_clean(&lexicon);
    }

    /// T1.2: A one-directional translation shows up as a back translation.
    #[test]
    fn one_directional_translation() {
        let (mut lexicon, cat, _) = cat_and_gato();
        let michi = EntryId(lexicon.next_free_id());
        lexicon
            .create_entry(michi, Entry::new("michi"), Timestamp(5))
            .expect("create");
        lexicon
            .connect_translation(michi, cat, false)
            .expect("connect");

        assert!(lexicon.translations_of(cat, &Query::new()).iter().all(|(id, _)| *id != michi));
        assert_eq!(
            spellings(&lexicon.back_translations_of(cat, &Query::new())),
            vec!["michi"]
        );
        assert_clean(&lexicon);
    }

    /// T1.3: Connecting twice keeps one adjacency item per side.
    #[test]
    fn connect_is_idempotent() {
        let (mut lexicon, cat, gato) = cat_and_gato();
        let before = lexicon.relations().adjacency_count();

        lexicon.connect_translation(cat, gato, true).expect("again");
        lexicon.connect_see_also(cat, gato).expect("see also");
        lexicon.connect_see_also(gato, cat).expect("see also reversed");

        assert_eq!(lexicon.relations().adjacency_count(), before + 2);
        assert_clean(&lexicon);
    }

    /// T1.4: A note has exactly one owner.
    #[test]
    fn note_moves_to_new_owner() {
        let (mut lexicon, cat, gato) = cat_and_gato();
        let note = NoteId(lexicon.next_free_id());
        lexicon
            .create_note(note, Note::new("pet"), Timestamp(5))
            .expect("create");
        lexicon.connect_entry_note(cat, note).expect("connect");
        lexicon.connect_entry_note(gato, note).expect("reconnect");

        assert!(lexicon.notes_of(cat, &Query::new()).is_empty());
        assert_eq!(lexicon.notes_of(gato, &Query::new()).len(), 1);
        assert_clean(&lexicon);
    }
}

// =============================================================================
// TIER T2: CASCADING DELETE
// =============================================================================

mod t2_cascading_delete {
    use super::*;

    /// T2.1: Deleting "gato" empties translations-of("cat").
    #[test]
    fn deleting_target_empties_translations() {
        let (mut lexicon, cat, gato) = cat_and_gato();

        lexicon.delete_entry(gato).expect("delete");

        assert!(lexicon.translations_of(cat, &Query::new()).is_empty());
        assert!(lexicon.entry(gato).is_none());
        assert_clean(&lexicon);
    }

    /// T2.2: No record of any kind references a deleted entry.
    #[test]
    fn no_reference_survives() {
        let (mut lexicon, cat, gato) = cat_and_gato();
        let next = lexicon.next_free_id();
        let (keyword, usage, note) = (KeywordId(next), UsageId(next + 1), NoteId(next + 2));
        lexicon
            .create_keyword(keyword, Keyword::new("animals"), Timestamp(5))
            .expect("create");
        lexicon
            .create_usage(usage, Usage::new("el gato duerme"), Timestamp(5))
            .expect("create");
        lexicon
            .create_note(note, Note::new("masculine"), Timestamp(5))
            .expect("create");
        lexicon.connect_entry_keyword(gato, keyword).expect("connect");
        lexicon.connect_entry_usage(gato, usage).expect("connect");
        lexicon.connect_entry_note(gato, note).expect("connect");
        lexicon.connect_root(cat, gato).expect("connect");

        lexicon.delete(EntityRef::Entry(gato)).expect("delete");

        assert!(
            lexicon
                .relations()
                .all_references()
                .all(|(_, target)| target != EntityRef::Entry(gato))
        );
        // Neighbours survive and only lose the edge.
        assert!(lexicon.contains(keyword));
        assert!(lexicon.contains(usage));
        assert!(lexicon.is_orphan(EntityRef::Note(note)));
        assert_clean(&lexicon);
    }
}

// =============================================================================
// TIER T3: MERGE
// =============================================================================

mod t3_merge {
    use super::*;

    /// T3.1: Two "run" entries sharing "en" merge into one with `{en}` once.
    #[test]
    fn merge_runs_sharing_language() {
        let mut lexicon = Lexicon::new();
        let en = LanguageId(1);
        lexicon
            .create_language(en, Language::new("en", "English"), Timestamp(1))
            .expect("create");
        lexicon
            .create_entry_in(EntryId(2), Entry::new("run"), Timestamp(2), &[en])
            .expect("create");
        lexicon
            .create_entry_in(EntryId(3), Entry::new("run"), Timestamp(3), &[en])
            .expect("create");

        let duplicates = lexicon.find_entries_by_spelling("run");
        assert_eq!(duplicates.len(), 2);

        lexicon.merge_entries(EntryId(3), EntryId(2)).expect("merge");

        assert!(lexicon.entry(EntryId(3)).is_none());
        let languages: Vec<LanguageId> = lexicon
            .languages_of(EntryId(2), &Query::new())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(languages, vec![en]);
        assert_eq!(lexicon.entries_in_language(en, &Query::new()).len(), 1);
        assert_clean(&lexicon);
    }

    /// T3.2: Translations of both merged entries end up on the survivor.
    #[test]
    fn merge_unions_translations() {
        let (mut lexicon, cat, gato) = cat_and_gato();
        let chat = EntryId(lexicon.next_free_id());
        let gata = EntryId(chat.value() + 1);
        lexicon
            .create_entry(chat, Entry::new("chat"), Timestamp(5))
            .expect("create");
        lexicon
            .create_entry(gata, Entry::new("gata"), Timestamp(5))
            .expect("create");
        lexicon.connect_translation(gata, chat, true).expect("connect");

        lexicon.merge_entries(gata, gato).expect("merge");

        let mut translations: Vec<EntryId> = lexicon
            .translations_of(gato, &Query::new())
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        translations.sort();
        assert_eq!(translations, vec![cat, chat]);
        assert_eq!(
            spellings(&lexicon.translations_of(chat, &Query::new())),
            vec!["gato"]
        );
        assert_clean(&lexicon);
    }

    /// T3.3: Merging an entity into itself is refused.
    #[test]
    fn merge_into_self_refused() {
        let (mut lexicon, cat, _) = cat_and_gato();
        assert!(matches!(
            lexicon.merge_entries(cat, cat),
            Err(LexiconError::SelfReference(_))
        ));
    }
}

// =============================================================================
// TIER T4: REORDER AND ORPHANS
// =============================================================================

mod t4_reorder_and_orphans {
    use super::*;

    /// T4.1: `[en, es, fr]` with move([0], 3) yields `[es, fr, en]`.
    #[test]
    fn move_first_language_to_end() {
        let mut lexicon = Lexicon::new();
        let codes = [(1, "en"), (2, "es"), (3, "fr")];
        for (id, code) in codes {
            lexicon
                .create_language(LanguageId(id), Language::new(code, code), Timestamp(1))
                .expect("create");
        }
        lexicon
            .create_entry_in(
                EntryId(4),
                Entry::new("ok"),
                Timestamp(1),
                &[LanguageId(1), LanguageId(2), LanguageId(3)],
            )
            .expect("create");

        let changed = lexicon
            .move_entry_list(EntryId(4), EntryList::Languages, &[0], 3)
            .expect("move");

        assert!(changed);
        let order: Vec<String> = lexicon
            .languages_of(EntryId(4), &Query::new())
            .into_iter()
            .map(|(_, tracked)| tracked.value.code.clone())
            .collect();
        assert_eq!(order, vec!["es", "fr", "en"]);
        assert_clean(&lexicon);
    }

    /// T4.2: Out-of-range moves fail and leave the order alone.
    #[test]
    fn out_of_range_move_rejected() {
        let (mut lexicon, cat, _) = cat_and_gato();
        let result = lexicon.move_entry_list(cat, EntryList::Translations, &[1], 0);

        assert!(matches!(
            result,
            Err(LexiconError::InvalidPosition { position: 1, len: 1 })
        ));
    }

    /// T4.3: A note whose only edge is removed is an orphan and deletes cleanly.
    #[test]
    fn orphaned_note_deletes_cleanly() {
        let (mut lexicon, cat, _) = cat_and_gato();
        let note = NoteId(lexicon.next_free_id());
        lexicon
            .create_note(note, Note::new("also a verb"), Timestamp(5))
            .expect("create");
        lexicon.connect_entry_note(cat, note).expect("connect");

        let removal = ProposedRemoval::new(EdgeKind::EntryNote, EntityRef::Entry(cat));
        assert!(lexicon.would_orphan(EntityRef::Note(note), Some(removal)));
        assert!(!lexicon.is_orphan(EntityRef::Note(note)));

        let report = lexicon.disconnect_entry_note(cat, note).expect("disconnect");
        assert!(report.is_clean());
        assert!(lexicon.is_orphan(EntityRef::Note(note)));

        lexicon.delete_note(note).expect("delete");
        assert!(!lexicon.contains(note));
        assert_clean(&lexicon);
    }

    /// T4.4: Dropping the last translation prunes the target by default.
    #[test]
    fn default_policy_prunes_translation_target() {
        let (mut lexicon, cat, gato) = cat_and_gato();

        let report = lexicon
            .disconnect_translation(cat, gato, true)
            .expect("disconnect");

        assert_eq!(report.pruned, vec![EntityRef::Entry(gato)]);
        assert!(lexicon.contains(cat));
        assert_clean(&lexicon);
    }

    /// T4.5: With pruning off the target survives as an orphan.
    #[test]
    fn keep_all_policy_keeps_target() {
        let (lexicon, cat, gato) = cat_and_gato();
        let mut lexicon = lexicon.with_orphan_policy(OrphanPolicy::keep_all());

        let report = lexicon
            .disconnect_translation(cat, gato, true)
            .expect("disconnect");

        assert!(report.is_clean());
        assert!(lexicon.is_orphan(EntityRef::Entry(gato)));
        assert_eq!(lexicon.orphans().len(), 2);
        assert_clean(&lexicon);
    }
}
