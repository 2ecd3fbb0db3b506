//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every mutating command loads the snapshot, applies its changes and writes
//! the snapshot back only if all of them succeeded.

use crate::config::Settings;
use lexicon_core::{
    Clock, EdgeKind, EntityKind, EntityRef, Entity, Entry, EntryCollection, EntryId, EntryList,
    Keyword, Language, LanguageId, Lexicon, LexiconError, Note, Query, Row, SequentialIds,
    SystemClock, Timestamp, Tracked, Usage, UsageId, Violation, lexicon_from_bytes,
    lexicon_to_bytes, order,
    primitives::MAX_SNAPSHOT_SIZE,
};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for JSON import (500 MB).
const MAX_IMPORT_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), LexiconError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| LexiconError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(LexiconError::DeserializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path and make sure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, LexiconError> {
    let canonical = path.canonicalize().map_err(|e| {
        LexiconError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(LexiconError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path against its (existing) parent directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, LexiconError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        LexiconError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(LexiconError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| LexiconError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

/// Parse `kind:id` (or a bare id) and require it to be of `kind`.
fn reference_of(text: &str, kind: EntityKind) -> Result<EntityRef, LexiconError> {
    let reference = match text.trim().parse::<u64>() {
        Ok(raw) => kind.with_id(raw),
        Err(_) => text.parse::<EntityRef>()?,
    };
    if reference.kind() != kind {
        return Err(LexiconError::InvalidReference(format!(
            "expected a {kind} reference, got '{text}'"
        )));
    }
    Ok(reference)
}

fn entry_arg(text: &str) -> Result<EntryId, LexiconError> {
    match reference_of(text, EntityKind::Entry)? {
        EntityRef::Entry(id) => Ok(id),
        other => Err(LexiconError::InvalidReference(other.to_string())),
    }
}

fn usage_arg(text: &str) -> Result<UsageId, LexiconError> {
    match reference_of(text, EntityKind::Usage)? {
        EntityRef::Usage(id) => Ok(id),
        other => Err(LexiconError::InvalidReference(other.to_string())),
    }
}

/// A language given as `language:id`, a bare id, or a code.
fn language_arg(lexicon: &Lexicon, text: &str) -> Result<LanguageId, LexiconError> {
    if let Ok(EntityRef::Language(id)) = reference_of(text, EntityKind::Language) {
        return Ok(id);
    }
    lexicon
        .find_language_by_code(text)
        .map(|(id, _)| id)
        .ok_or_else(|| LexiconError::InvalidReference(format!("unknown language '{text}'")))
}

/// Any entity as `kind:id`; a bare language code is accepted too.
fn endpoint_arg(lexicon: &Lexicon, text: &str) -> Result<EntityRef, LexiconError> {
    match text.parse::<EntityRef>() {
        Ok(reference) => Ok(reference),
        Err(e) => lexicon
            .find_language_by_code(text)
            .map(|(id, _)| EntityRef::Language(id))
            .ok_or(e),
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json(value: &impl Serialize) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Report a successful mutation.
fn report(settings: &Settings, quiet: bool, action: &str, subject: impl Display) {
    if settings.json_mode {
        let mut object = serde_json::Map::new();
        object.insert(action.to_string(), subject.to_string().into());
        print_json(&object);
    } else if !quiet {
        println!("{} {}", capitalize(action), subject);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The human-readable text of a value, used by `list`, `show` and `--contains`.
pub trait Described {
    fn text(&self) -> &str;
}

impl Described for Entry {
    fn text(&self) -> &str {
        &self.spelling
    }
}

impl Described for Language {
    fn text(&self) -> &str {
        &self.code
    }
}

impl Described for Keyword {
    fn text(&self) -> &str {
        &self.title
    }
}

impl Described for Note {
    fn text(&self) -> &str {
        &self.text
    }
}

impl Described for Usage {
    fn text(&self) -> &str {
        &self.text
    }
}

impl Described for EntryCollection {
    fn text(&self) -> &str {
        &self.title
    }
}

/// One line of `list` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedRow {
    pub reference: String,
    pub text: String,
    pub created: Timestamp,
    pub modified: Timestamp,
}

impl ListedRow {
    fn from_row<E: Entity + Described>((id, tracked): Row<'_, E::Id, E>) -> Self {
        let reference: EntityRef = id.into();
        Self {
            reference: reference.to_string(),
            text: tracked.value.text().to_string(),
            created: tracked.metadata.created,
            modified: tracked.metadata.modified,
        }
    }
}

fn print_rows<E: Entity + Described>(label: &str, rows: &[Row<'_, E::Id, E>]) {
    if rows.is_empty() {
        return;
    }
    println!("{label}:");
    for (id, tracked) in rows {
        let reference: EntityRef = (*id).into();
        println!("  {:<16} {}", reference.to_string(), tracked.value.text());
    }
}

// =============================================================================
// INIT / STATUS / CHECK
// =============================================================================

/// Initialize a new snapshot.
pub fn cmd_init(settings: &Settings, force: bool) -> Result<(), LexiconError> {
    if settings.database.exists() && !force {
        return Err(LexiconError::IoError(
            "Database already exists. Use --force to overwrite.".to_string(),
        ));
    }

    save_lexicon(&Lexicon::new(), &settings.database)?;
    if settings.json_mode {
        print_json(&serde_json::json!({ "initialized": settings.database.to_string_lossy() }));
    } else {
        println!("Initialized new lexicon at {:?}", settings.database);
    }
    Ok(())
}

/// Show entity and edge counts.
pub fn cmd_status(settings: &Settings) -> Result<(), LexiconError> {
    let lexicon = load_lexicon(settings)?;
    let stats = lexicon.stats();

    if settings.json_mode {
        let output = serde_json::json!({
            "database": settings.database.to_string_lossy(),
            "entries": stats.entries,
            "languages": stats.languages,
            "keywords": stats.keywords,
            "notes": stats.notes,
            "usages": stats.usages,
            "collections": stats.collections,
            "adjacency_items": stats.adjacency_items,
            "orphans": stats.orphans,
            "pruned_edges": lexicon.orphan_policy().edges().map(EdgeKind::name).collect::<Vec<_>>(),
        });
        print_json(&output);
        return Ok(());
    }

    println!("Lexicon Status");
    println!("==============");
    println!("Database: {:?}", settings.database);
    println!();
    println!("Entries:     {}", stats.entries);
    println!("Languages:   {}", stats.languages);
    println!("Keywords:    {}", stats.keywords);
    println!("Notes:       {}", stats.notes);
    println!("Usages:      {}", stats.usages);
    println!("Collections: {}", stats.collections);
    println!("Adjacency:   {}", stats.adjacency_items);
    println!("Orphans:     {}", stats.orphans);

    Ok(())
}

/// Audit integrity and list orphans.
///
/// Without `input` the snapshot is checked (loading already rejects a broken
/// one); with `input` a JSON export is audited without importing it.
pub fn cmd_check(settings: &Settings, input: Option<&Path>) -> Result<(), LexiconError> {
    let lexicon = match input {
        Some(path) => read_json_export(path)?,
        None => load_lexicon(settings)?,
    };
    let violations: Vec<Violation> = lexicon.verify();
    let orphans = lexicon.orphans();

    if settings.json_mode {
        print_json(&serde_json::json!({
            "ok": violations.is_empty(),
            "violations": violations,
            "orphans": orphans.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }));
    } else {
        if violations.is_empty() {
            println!("Integrity: OK");
        } else {
            println!("Integrity: {} violation(s)", violations.len());
            for violation in &violations {
                println!("  {violation}");
            }
        }
        if !orphans.is_empty() {
            println!("Orphans:");
            for orphan in &orphans {
                println!("  {orphan}");
            }
        }
    }

    match violations.first() {
        None => Ok(()),
        Some(first) => Err(LexiconError::DeserializationError(format!(
            "{} integrity violation(s), first: {first}",
            violations.len()
        ))),
    }
}

// =============================================================================
// CREATE COMMANDS
// =============================================================================

pub fn cmd_add_language(
    settings: &Settings,
    quiet: bool,
    code: &str,
    title: &str,
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    if lexicon.find_language_by_code(code).is_some() {
        return Err(LexiconError::InvalidReference(format!(
            "language '{code}' already exists"
        )));
    }

    let id: LanguageId = fresh_ids(&lexicon).next_id();
    lexicon.create_language(id, Language::new(code, title), SystemClock.now())?;
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "created", id);
    Ok(())
}

pub fn cmd_add_entry(
    settings: &Settings,
    quiet: bool,
    spelling: &str,
    pronunciation: &str,
    definition: &str,
    languages: &[String],
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let languages = languages
        .iter()
        .map(|text| language_arg(&lexicon, text))
        .collect::<Result<Vec<_>, _>>()?;

    let id: EntryId = fresh_ids(&lexicon).next_id();
    let entry = Entry::new(spelling)
        .with_pronunciation(pronunciation)
        .with_definition(definition);
    lexicon.create_entry_in(id, entry, SystemClock.now(), &languages)?;
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "created", id);
    Ok(())
}

pub fn cmd_add_keyword(
    settings: &Settings,
    quiet: bool,
    title: &str,
    entries: &[String],
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let id = fresh_ids(&lexicon).next_id();
    lexicon.create_keyword(id, Keyword::new(title), SystemClock.now())?;
    for entry in entries {
        lexicon.connect_entry_keyword(entry_arg(entry)?, id)?;
    }
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "created", id);
    Ok(())
}

pub fn cmd_add_note(
    settings: &Settings,
    quiet: bool,
    text: &str,
    entry: Option<&str>,
    usage: Option<&str>,
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let id = fresh_ids(&lexicon).next_id();
    lexicon.create_note(id, Note::new(text), SystemClock.now())?;
    match (entry, usage) {
        (Some(entry), _) => lexicon.connect_entry_note(entry_arg(entry)?, id)?,
        (None, Some(usage)) => lexicon.connect_usage_note(usage_arg(usage)?, id)?,
        (None, None) => tracing::warn!("Note {} has no owner and is an orphan", id),
    }
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "created", id);
    Ok(())
}

pub fn cmd_add_usage(
    settings: &Settings,
    quiet: bool,
    text: &str,
    entries: &[String],
    languages: &[String],
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let languages = languages
        .iter()
        .map(|text| language_arg(&lexicon, text))
        .collect::<Result<Vec<_>, _>>()?;

    let id = fresh_ids(&lexicon).next_id();
    lexicon.create_usage(id, Usage::new(text), SystemClock.now())?;
    for entry in entries {
        lexicon.connect_entry_usage(entry_arg(entry)?, id)?;
    }
    for language in languages {
        lexicon.connect_usage_language(id, language)?;
    }
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "created", id);
    Ok(())
}

pub fn cmd_add_collection(
    settings: &Settings,
    quiet: bool,
    title: &str,
    entries: &[String],
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let id = fresh_ids(&lexicon).next_id();
    lexicon.create_collection(id, EntryCollection::new(title), SystemClock.now())?;
    for entry in entries {
        lexicon.connect_entry_collection(entry_arg(entry)?, id)?;
    }
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "created", id);
    Ok(())
}

// =============================================================================
// EDGE COMMANDS
// =============================================================================

/// Connect two entities by edge kind.
pub fn cmd_link(
    settings: &Settings,
    quiet: bool,
    edge: &str,
    from: &str,
    to: &str,
    bidirectional: bool,
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let edge: EdgeKind = edge.parse()?;
    let (from, to) = (endpoint_arg(&lexicon, from)?, endpoint_arg(&lexicon, to)?);

    lexicon.link(edge, from, to, bidirectional)?;
    touch_both(&mut lexicon, from, to)?;
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "linked", format!("{from} -[{edge}]-> {to}"));
    Ok(())
}

/// Disconnect two entities and report what the orphan policy pruned.
pub fn cmd_unlink(
    settings: &Settings,
    edge: &str,
    from: &str,
    to: &str,
    bidirectional: bool,
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let edge: EdgeKind = edge.parse()?;
    let (from, to) = (endpoint_arg(&lexicon, from)?, endpoint_arg(&lexicon, to)?);

    let detached = lexicon.unlink(edge, from, to, bidirectional)?;
    for survivor in [from, to] {
        if lexicon.contains(survivor) {
            lexicon.touch(survivor, SystemClock.now())?;
        }
    }
    save_lexicon(&lexicon, &settings.database)?;

    for pruned in &detached.pruned {
        tracing::info!("Pruned orphaned {}", pruned);
    }
    if settings.json_mode {
        print_json(&serde_json::json!({
            "unlinked": format!("{from} -[{edge}]-> {to}"),
            "pruned": detached.pruned.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }));
    } else {
        println!("Unlinked {from} -[{edge}]-> {to}");
        for pruned in &detached.pruned {
            println!("Pruned orphan {pruned}");
        }
    }
    Ok(())
}

/// Reorder one of an entry's ordered fields.
pub fn cmd_move(
    settings: &Settings,
    quiet: bool,
    entry: &str,
    list: &str,
    from: &[usize],
    to: usize,
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let entry = entry_arg(entry)?;
    let list: EntryList = list.parse()?;

    let changed = lexicon.move_entry_list(entry, list, from, to)?;
    if changed {
        lexicon.touch(entry.into(), SystemClock.now())?;
        save_lexicon(&lexicon, &settings.database)?;
        report(settings, quiet, "moved", format!("{entry} {list:?}"));
    } else {
        report(settings, quiet, "unchanged", format!("{entry} {list:?}"));
    }
    Ok(())
}

fn touch_both(lexicon: &mut Lexicon, a: EntityRef, b: EntityRef) -> Result<(), LexiconError> {
    let now = SystemClock.now();
    lexicon.touch(a, now)?;
    lexicon.touch(b, now)
}

// =============================================================================
// DELETE / MERGE
// =============================================================================

pub fn cmd_delete(settings: &Settings, quiet: bool, reference: &str) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let reference: EntityRef = reference.parse()?;

    lexicon.delete(reference)?;
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "deleted", reference);
    Ok(())
}

/// Merge two entities of the same kind.
///
/// The survivor is then touched at the current time, which replaces the
/// later of the two `modified` stamps the merge itself keeps.
pub fn cmd_merge(
    settings: &Settings,
    quiet: bool,
    incoming: &str,
    existing: &str,
) -> Result<(), LexiconError> {
    let mut lexicon = load_lexicon(settings)?;
    let incoming = endpoint_arg(&lexicon, incoming)?;
    let existing = endpoint_arg(&lexicon, existing)?;

    lexicon.merge(incoming, existing)?;
    lexicon.touch(existing, SystemClock.now())?;
    save_lexicon(&lexicon, &settings.database)?;

    report(settings, quiet, "merged", format!("{incoming} into {existing}"));
    Ok(())
}

// =============================================================================
// LIST / SHOW
// =============================================================================

/// Options of the `list` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub sort: Option<String>,
    pub reverse: bool,
    pub limit: Option<usize>,
    pub contains: Option<String>,
}

/// Build the query for `list` and run it over the whole kind.
pub fn scan<E>(
    lexicon: &Lexicon,
    options: &ListOptions,
    default_limit: usize,
) -> Result<Vec<ListedRow>, LexiconError>
where
    E: Entity + Described + 'static,
{
    let mut query: Query<E> = Query::new();

    if let Some(needle) = &options.contains {
        let needle = needle.to_lowercase();
        query = query.filter(move |tracked: &Tracked<E>| {
            tracked.value.text().to_lowercase().contains(&needle)
        });
    }

    query = match options.sort.as_deref() {
        None => query,
        Some("created") => query.sort_by(order::by_created),
        Some("modified") => query.sort_by(order::by_modified),
        Some("text") => query.sort_by(|a: &Tracked<E>, b: &Tracked<E>| {
            a.value
                .text()
                .to_lowercase()
                .cmp(&b.value.text().to_lowercase())
        }),
        Some(other) => {
            return Err(LexiconError::InvalidReference(format!(
                "unknown sort key '{other}' (use created, modified or text)"
            )));
        }
    };
    if options.reverse {
        query = query.reversed();
    }
    query = query.limit(options.limit.unwrap_or(default_limit));

    let rows = lexicon.resolve(E::table(lexicon.entities()).ids(), &query);
    Ok(rows.into_iter().map(ListedRow::from_row::<E>).collect())
}

/// List all entities of one kind.
pub fn cmd_list(settings: &Settings, kind: &str, options: &ListOptions) -> Result<(), LexiconError> {
    let lexicon = load_lexicon(settings)?;
    let kind: EntityKind = kind.parse()?;
    let limit = settings.default_limit;

    let rows = match kind {
        EntityKind::Entry => scan::<Entry>(&lexicon, options, limit)?,
        EntityKind::Language => scan::<Language>(&lexicon, options, limit)?,
        EntityKind::Keyword => scan::<Keyword>(&lexicon, options, limit)?,
        EntityKind::Note => scan::<Note>(&lexicon, options, limit)?,
        EntityKind::Usage => scan::<Usage>(&lexicon, options, limit)?,
        EntityKind::Collection => scan::<EntryCollection>(&lexicon, options, limit)?,
    };

    if settings.json_mode {
        print_json(&rows);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No {kind} found");
    }
    for row in &rows {
        println!("{:<16} {}", row.reference, row.text);
    }
    Ok(())
}

/// Show one entity with its neighbours.
pub fn cmd_show(settings: &Settings, reference: &str) -> Result<(), LexiconError> {
    let lexicon = load_lexicon(settings)?;
    let reference = endpoint_arg(&lexicon, reference)?;
    let missing = || LexiconError::EntityNotFound(reference);
    let json = settings.json_mode;

    match reference {
        EntityRef::Entry(id) => {
            let expansion = lexicon.expand_entry(id).ok_or_else(missing)?;
            if json {
                print_json(&expansion);
                return Ok(());
            }
            let entry = &expansion.entry.value;
            println!("{} {}", id, entry.spelling);
            if !entry.pronunciation.is_empty() {
                println!("  /{}/", entry.pronunciation);
            }
            if !entry.definition.is_empty() {
                println!("  {}", entry.definition);
            }
            print_rows("Languages", &expansion.languages);
            print_rows("Translations", &expansion.translations);
            print_rows("Translated from", &expansion.back_translations);
            print_rows("Roots", &expansion.roots);
            print_rows("Derived", &expansion.derived);
            print_rows("See also", &expansion.see_also);
            print_rows("Usages", &expansion.usages);
            print_rows("Keywords", &expansion.keywords);
            print_rows("Notes", &expansion.notes);
            print_rows("Collections", &expansion.collections);
        }
        EntityRef::Usage(id) => {
            let expansion = lexicon.expand_usage(id).ok_or_else(missing)?;
            if json {
                print_json(&expansion);
                return Ok(());
            }
            println!("{} {}", id, expansion.usage.value.text);
            print_rows("Entries", &expansion.entries);
            print_rows("Languages", &expansion.languages);
            if let Some((note, tracked)) = expansion.note {
                println!("Note:\n  {:<16} {}", note.to_string(), tracked.value.text);
            }
        }
        EntityRef::Keyword(id) => {
            let expansion = lexicon.expand_keyword(id).ok_or_else(missing)?;
            if json {
                print_json(&expansion);
                return Ok(());
            }
            println!("{} {}", id, expansion.keyword.value.title);
            print_rows("Matches", &expansion.matches);
        }
        EntityRef::Collection(id) => {
            let expansion = lexicon.expand_collection(id).ok_or_else(missing)?;
            if json {
                print_json(&expansion);
                return Ok(());
            }
            println!("{} {}", id, expansion.collection.value.title);
            print_rows("Entries", &expansion.entries);
        }
        EntityRef::Language(id) => {
            let language = lexicon.language(id).ok_or_else(missing)?;
            let entries = lexicon.entries_in_language(id, &Query::new().sort_by(order::by_spelling));
            let usages = lexicon.usages_in_language(id, &Query::new());
            if json {
                print_json(&serde_json::json!({
                    "id": id,
                    "language": language,
                    "entries": entries,
                    "usages": usages,
                }));
                return Ok(());
            }
            println!("{} {} ({})", id, language.value.code, language.value.title);
            print_rows("Entries", &entries);
            print_rows("Usages", &usages);
        }
        EntityRef::Note(id) => {
            let note = lexicon.note(id).ok_or_else(missing)?;
            let owner = lexicon.note_target(id).map(EntityRef::from);
            if json {
                print_json(&serde_json::json!({
                    "id": id,
                    "note": note,
                    "owner": owner.map(|owner| owner.to_string()),
                }));
                return Ok(());
            }
            println!("{} {}", id, note.value.text);
            match owner {
                Some(owner) => println!("Attached to {owner}"),
                None => println!("Not attached"),
            }
        }
    }
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT
// =============================================================================

/// Export the lexicon as JSON.
pub fn cmd_export(settings: &Settings, output: &Path) -> Result<(), LexiconError> {
    let validated_output = validate_output_path(output)?;
    let lexicon = load_lexicon(settings)?;

    let data = serde_json::to_vec_pretty(&lexicon)
        .map_err(|e| LexiconError::SerializationError(e.to_string()))?;
    std::fs::write(&validated_output, &data)
        .map_err(|e| LexiconError::IoError(format!("Write file: {}", e)))?;

    if settings.json_mode {
        print_json(&serde_json::json!({
            "exported": validated_output.to_string_lossy(),
            "bytes": data.len(),
        }));
    } else {
        println!("Exported {} bytes to {:?}", data.len(), validated_output);
    }
    Ok(())
}

/// Replace the snapshot with an audited JSON export.
pub fn cmd_import(settings: &Settings, input: &Path, force: bool) -> Result<(), LexiconError> {
    let imported = read_json_export(input)?
        .validated()?
        .with_orphan_policy(settings.policy.clone());

    let current = load_lexicon(settings)?;
    if current.stats().total_entities() > 0 && !force {
        return Err(LexiconError::IoError(
            "Database is not empty. Use --force to replace it.".to_string(),
        ));
    }

    save_lexicon(&imported, &settings.database)?;

    let stats = imported.stats();
    if settings.json_mode {
        print_json(&serde_json::json!({
            "imported": stats.total_entities(),
            "adjacency_items": stats.adjacency_items,
        }));
    } else {
        println!(
            "Imported lexicon: {} entities, {} adjacency items",
            stats.total_entities(),
            stats.adjacency_items
        );
    }
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Identifier source seeded past every id already in use.
fn fresh_ids(lexicon: &Lexicon) -> SequentialIds {
    SequentialIds::starting_at(lexicon.next_free_id())
}

/// Decode a JSON export without auditing it.
fn read_json_export(path: &Path) -> Result<Lexicon, LexiconError> {
    let validated_path = validate_file_path(path)?;
    validate_file_size(&validated_path, MAX_IMPORT_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| LexiconError::IoError(format!("Read file: {}", e)))?;
    serde_json::from_slice(&data)
        .map_err(|e| LexiconError::DeserializationError(format!("Invalid JSON export: {}", e)))
}

/// Load the snapshot, or start empty if the file does not exist yet.
pub fn load_lexicon(settings: &Settings) -> Result<Lexicon, LexiconError> {
    let path = &settings.database;
    if !path.exists() {
        tracing::debug!("No snapshot at {:?}; starting empty", path);
        return Ok(Lexicon::new().with_orphan_policy(settings.policy.clone()));
    }

    validate_file_size(path, MAX_SNAPSHOT_SIZE as u64)?;
    let data = std::fs::read(path)
        .map_err(|e| LexiconError::IoError(format!("Read db: {}", e)))?;
    let lexicon = lexicon_from_bytes(&data)?;
    tracing::debug!("Loaded {} bytes from {:?}", data.len(), path);

    Ok(lexicon.with_orphan_policy(settings.policy.clone()))
}

/// Write the snapshot.
pub fn save_lexicon(lexicon: &Lexicon, path: &Path) -> Result<(), LexiconError> {
    let data = lexicon_to_bytes(lexicon)?;
    std::fs::write(path, &data).map_err(|e| LexiconError::IoError(format!("Write db: {}", e)))?;
    tracing::debug!("Saved {} bytes to {:?}", data.len(), path);
    Ok(())
}
