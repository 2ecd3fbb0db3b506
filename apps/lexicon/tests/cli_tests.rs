//! Integration tests for the CLI: each test drives commands against a
//! snapshot in a temporary directory and inspects the saved lexicon.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use lexicon::cli::{Cli, execute};
use lexicon_core::{
    EntityRef, EntryId, LanguageId, Lexicon, LexiconError, NoteId, Query, lexicon_from_bytes,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// HELPERS
// =============================================================================

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lexicon.toml"), "default_limit = 10\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn database(&self) -> PathBuf {
        self.path("test.lexi")
    }

    fn run(&self, args: &[&str]) -> Result<(), LexiconError> {
        let database = self.database();
        let config = self.path("lexicon.toml");
        let mut argv = vec![
            "lexicon",
            "--quiet",
            "--database",
            database.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ];
        argv.extend_from_slice(args);
        execute(Cli::try_parse_from(argv).unwrap())
    }

    fn lexicon(&self) -> Lexicon {
        read_snapshot(&self.database())
    }

    /// en, es, "cat" (entry:2) in en and "gato" (entry:4) in es, translated.
    fn with_cat_and_gato() -> Self {
        let sandbox = Self::new();
        sandbox.run(&["init"]).unwrap();
        sandbox.run(&["add-language", "en", "--title", "English"]).unwrap();
        sandbox.run(&["add-entry", "cat", "--language", "en"]).unwrap();
        sandbox.run(&["add-language", "es", "--title", "Spanish"]).unwrap();
        sandbox.run(&["add-entry", "gato", "--language", "es"]).unwrap();
        sandbox
            .run(&["link", "translation", "entry:2", "entry:4"])
            .unwrap();
        sandbox
    }
}

fn read_snapshot(path: &Path) -> Lexicon {
    lexicon_from_bytes(&std::fs::read(path).unwrap()).unwrap()
}

// =============================================================================
// INIT / CREATE
// =============================================================================

#[test]
fn test_init_refuses_to_overwrite() {
    let sandbox = Sandbox::new();
    sandbox.run(&["init"]).unwrap();

    assert!(sandbox.run(&["init"]).is_err());
    assert!(sandbox.run(&["init", "--force"]).is_ok());
}

#[test]
fn test_add_commands_allocate_fresh_ids() {
    let sandbox = Sandbox::with_cat_and_gato();
    let lexicon = sandbox.lexicon();

    assert_eq!(lexicon.language(LanguageId(1)).unwrap().value.code, "en");
    assert_eq!(lexicon.entry(EntryId(2)).unwrap().value.spelling, "cat");
    assert_eq!(lexicon.entry(EntryId(4)).unwrap().value.spelling, "gato");
    assert!(lexicon.verify().is_empty());
}

#[test]
fn test_unknown_language_code_rejected_without_saving() {
    let sandbox = Sandbox::with_cat_and_gato();
    let before = std::fs::read(sandbox.database()).unwrap();

    assert!(sandbox.run(&["add-entry", "chat", "--language", "fr"]).is_err());
    assert_eq!(std::fs::read(sandbox.database()).unwrap(), before);
}

#[test]
fn test_duplicate_language_code_rejected() {
    let sandbox = Sandbox::with_cat_and_gato();
    assert!(sandbox.run(&["add-language", "en"]).is_err());
}

#[test]
fn test_add_note_attaches_to_entry() {
    let sandbox = Sandbox::with_cat_and_gato();
    sandbox
        .run(&["add-note", "also a jazz fan", "--entry", "entry:2"])
        .unwrap();

    let lexicon = sandbox.lexicon();
    let notes = lexicon.notes_of(EntryId(2), &Query::new());
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].1.value.text, "also a jazz fan");
}

// =============================================================================
// EDGES
// =============================================================================

#[test]
fn test_link_is_bidirectional_by_default() {
    let sandbox = Sandbox::with_cat_and_gato();
    let lexicon = sandbox.lexicon();

    assert_eq!(lexicon.translations_of(EntryId(2), &Query::new()).len(), 1);
    assert_eq!(lexicon.translations_of(EntryId(4), &Query::new()).len(), 1);
}

#[test]
fn test_one_way_link_records_back_translation() {
    let sandbox = Sandbox::with_cat_and_gato();
    sandbox.run(&["add-entry", "michi"]).unwrap();
    sandbox
        .run(&["link", "translation", "entry:5", "entry:2", "--one-way"])
        .unwrap();

    let lexicon = sandbox.lexicon();
    assert_eq!(lexicon.back_translations_of(EntryId(2), &Query::new()).len(), 1);
    assert!(lexicon.translations_of(EntryId(2), &Query::new()).iter().all(|(id, _)| *id != EntryId(5)));
}

#[test]
fn test_unlink_prunes_orphaned_translation_target() {
    let sandbox = Sandbox::with_cat_and_gato();
    sandbox
        .run(&["unlink", "translation", "entry:2", "entry:4"])
        .unwrap();

    let lexicon = sandbox.lexicon();
    assert!(lexicon.contains(EntryId(2)));
    assert!(!lexicon.contains(EntryId(4)));
}

#[test]
fn test_unlink_of_absent_translation_keeps_entry() {
    let sandbox = Sandbox::with_cat_and_gato();
    sandbox.run(&["add-entry", "perro"]).unwrap();
    sandbox
        .run(&["unlink", "translation", "entry:2", "entry:5"])
        .unwrap();

    let lexicon = sandbox.lexicon();
    assert!(lexicon.contains(EntryId(5)));
    assert_eq!(lexicon.translations_of(EntryId(2), &Query::new()).len(), 1);
}

#[test]
fn test_config_policy_can_disable_pruning() {
    let sandbox = Sandbox::with_cat_and_gato();
    std::fs::write(sandbox.path("lexicon.toml"), "[orphan_policy]\nprune = []\n").unwrap();
    sandbox
        .run(&["unlink", "translation", "entry:2", "entry:4"])
        .unwrap();

    let lexicon = sandbox.lexicon();
    assert!(lexicon.contains(EntryId(4)));
    assert!(lexicon.is_orphan(EntityRef::Entry(EntryId(4))));
}

#[test]
fn test_link_kind_mismatch_rejected() {
    let sandbox = Sandbox::with_cat_and_gato();
    assert!(sandbox.run(&["link", "translation", "entry:2", "language:1"]).is_err());
    assert!(sandbox.run(&["link", "cousin", "entry:2", "entry:4"]).is_err());
}

#[test]
fn test_move_reorders_languages() {
    let sandbox = Sandbox::new();
    for code in ["en", "es", "fr"] {
        sandbox.run(&["add-language", code]).unwrap();
    }
    sandbox
        .run(&["add-entry", "ok", "-l", "en", "-l", "es", "-l", "fr"])
        .unwrap();
    sandbox
        .run(&["move", "entry:4", "languages", "--from", "0", "--to", "3"])
        .unwrap();

    let lexicon = sandbox.lexicon();
    let codes: Vec<String> = lexicon
        .languages_of(EntryId(4), &Query::new())
        .into_iter()
        .map(|(_, tracked)| tracked.value.code.clone())
        .collect();
    assert_eq!(codes, vec!["es", "fr", "en"]);
}

// =============================================================================
// DELETE / MERGE
// =============================================================================

#[test]
fn test_delete_cascades() {
    let sandbox = Sandbox::with_cat_and_gato();
    sandbox.run(&["delete", "entry:4"]).unwrap();

    let lexicon = sandbox.lexicon();
    assert!(lexicon.translations_of(EntryId(2), &Query::new()).is_empty());
    assert!(lexicon.verify().is_empty());
}

#[test]
fn test_delete_missing_entity_fails() {
    let sandbox = Sandbox::with_cat_and_gato();
    assert!(sandbox.run(&["delete", "note:99"]).is_err());
}

#[test]
fn test_merge_entries_sharing_language() {
    let sandbox = Sandbox::new();
    sandbox.run(&["add-language", "en"]).unwrap();
    sandbox.run(&["add-entry", "run", "-l", "en"]).unwrap();
    sandbox
        .run(&["add-entry", "run", "-l", "en", "--definition", "move fast"])
        .unwrap();
    sandbox.run(&["merge", "entry:3", "entry:2"]).unwrap();

    let lexicon = sandbox.lexicon();
    assert!(!lexicon.contains(EntryId(3)));
    let survivor = lexicon.entry(EntryId(2)).unwrap();
    assert_eq!(survivor.value.definition, "move fast");
    assert_eq!(lexicon.languages_of(EntryId(2), &Query::new()).len(), 1);
}

#[test]
fn test_merge_across_kinds_rejected() {
    let sandbox = Sandbox::with_cat_and_gato();
    assert!(sandbox.run(&["merge", "entry:2", "language:1"]).is_err());
    assert!(sandbox.run(&["merge", "note:1", "note:2"]).is_err());
}

// =============================================================================
// READ COMMANDS
// =============================================================================

#[test]
fn test_read_commands_succeed() {
    let sandbox = Sandbox::with_cat_and_gato();
    sandbox
        .run(&["add-note", "feline", "--entry", "entry:4"])
        .unwrap();

    assert!(sandbox.run(&["status"]).is_ok());
    assert!(sandbox.run(&["--json-mode", "status"]).is_ok());
    assert!(sandbox.run(&["check"]).is_ok());
    assert!(sandbox.run(&["list", "entries", "--sort", "text", "--reverse"]).is_ok());
    assert!(sandbox.run(&["list", "languages", "--contains", "E"]).is_ok());
    assert!(sandbox.run(&["show", "entry:2"]).is_ok());
    assert!(sandbox.run(&["--json-mode", "show", "en"]).is_ok());
    assert!(sandbox.run(&["show", &NoteId(5).to_string()]).is_ok());
}

#[test]
fn test_list_rejects_unknown_sort_key() {
    let sandbox = Sandbox::with_cat_and_gato();
    assert!(sandbox.run(&["list", "entries", "--sort", "colour"]).is_err());
    assert!(sandbox.run(&["list", "pets"]).is_err());
}

#[test]
fn test_show_missing_entity_fails() {
    let sandbox = Sandbox::with_cat_and_gato();
    assert!(matches!(
        sandbox.run(&["show", "entry:42"]),
        Err(LexiconError::EntityNotFound(_))
    ));
}

// =============================================================================
// EXPORT / IMPORT
// =============================================================================

#[test]
fn test_export_import_roundtrip() {
    let sandbox = Sandbox::with_cat_and_gato();
    let export = sandbox.path("dump.json");
    let export_arg = export.to_str().unwrap();
    sandbox.run(&["export", "--output", export_arg]).unwrap();
    let original = sandbox.lexicon();

    assert!(sandbox.run(&["import", "--input", export_arg]).is_err());
    sandbox.run(&["import", "--input", export_arg, "--force"]).unwrap();

    assert_eq!(sandbox.lexicon(), original);
    assert!(sandbox.run(&["check", "--input", export_arg]).is_ok());
}

#[test]
fn test_import_rejects_broken_export() {
    let sandbox = Sandbox::with_cat_and_gato();
    let export = sandbox.path("dump.json");
    let export_arg = export.to_str().unwrap();
    sandbox.run(&["export", "--output", export_arg]).unwrap();

    // Drop gato's side of the translation.
    let mut json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&export).unwrap()).unwrap();
    json["relations"]["entries"]["4"]["translations"] = serde_json::json!([]);
    std::fs::write(&export, serde_json::to_vec(&json).unwrap()).unwrap();

    assert!(sandbox.run(&["check", "--input", export_arg]).is_err());
    assert!(
        sandbox
            .run(&["import", "--input", export_arg, "--force"])
            .is_err()
    );
    assert!(sandbox.lexicon().contains(EntryId(4)));
}
