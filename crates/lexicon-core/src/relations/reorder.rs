//! # Reordering
//!
//! "Move a subset of a list to an offset": the elements at the source
//! positions are lifted out as a block, keeping their relative order, and
//! reinserted at the destination. The destination is expressed against the
//! original list; the effective insertion index is the destination minus the
//! number of lifted positions in front of it.
//!
//! The multiset of the list never changes.

use super::RelationGraph;
use crate::types::{CollectionId, EntryId, KeywordId, LexiconError, UsageId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The ordered relationship fields of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryList {
    Languages,
    Translations,
    Roots,
    SeeAlso,
    Usages,
    Notes,
}

impl std::str::FromStr for EntryList {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "languages" => Ok(Self::Languages),
            "translations" => Ok(Self::Translations),
            "roots" => Ok(Self::Roots),
            "see_also" => Ok(Self::SeeAlso),
            "usages" => Ok(Self::Usages),
            "notes" => Ok(Self::Notes),
            _ => Err(LexiconError::InvalidReference(s.to_string())),
        }
    }
}

/// Move the elements at `from` so they start at offset `to`.
///
/// Returns `Ok(false)` (and leaves the list untouched) when the resulting
/// order equals the current one. Any source position `>= len`, or a
/// destination `> len`, is rejected before anything moves.
pub fn move_positions<T>(list: &mut Vec<T>, from: &[usize], to: usize) -> Result<bool, LexiconError> {
    let len = list.len();
    if to > len {
        return Err(LexiconError::InvalidPosition { position: to, len });
    }
    if let Some(&position) = from.iter().find(|&&position| position >= len) {
        return Err(LexiconError::InvalidPosition { position, len });
    }

    let sources: BTreeSet<usize> = from.iter().copied().collect();
    if sources.is_empty() {
        return Ok(false);
    }

    let (lifted, rest): (Vec<usize>, Vec<usize>) = (0..len).partition(|i| sources.contains(i));
    let insert_at = to
        .saturating_sub(sources.range(..to).count())
        .min(rest.len());

    let order: Vec<usize> = rest[..insert_at]
        .iter()
        .chain(lifted.iter())
        .chain(rest[insert_at..].iter())
        .copied()
        .collect();

    if order.iter().enumerate().all(|(i, &index)| i == index) {
        return Ok(false);
    }

    let mut slots: Vec<Option<T>> = list.drain(..).map(Some).collect();
    let reordered: Vec<T> = order
        .into_iter()
        .filter_map(|index| slots.get_mut(index).and_then(Option::take))
        .collect();
    *list = reordered;
    Ok(true)
}

impl RelationGraph {
    /// Reorder one of an entry's ordered fields.
    pub fn move_entry_list(
        &mut self,
        entry: EntryId,
        list: EntryList,
        from: &[usize],
        to: usize,
    ) -> Result<bool, LexiconError> {
        let record = self.entry_mut(entry);
        match list {
            EntryList::Languages => move_positions(&mut record.languages, from, to),
            EntryList::Translations => move_positions(&mut record.translations, from, to),
            EntryList::Roots => move_positions(&mut record.roots, from, to),
            EntryList::SeeAlso => move_positions(&mut record.see_also, from, to),
            EntryList::Usages => move_positions(&mut record.usages, from, to),
            EntryList::Notes => move_positions(&mut record.notes, from, to),
        }
    }

    /// Reorder the entries a keyword matches.
    pub fn move_keyword_matches(
        &mut self,
        keyword: KeywordId,
        from: &[usize],
        to: usize,
    ) -> Result<bool, LexiconError> {
        move_positions(&mut self.keyword_mut(keyword).matches, from, to)
    }

    /// Reorder the entries of a collection.
    pub fn move_collection_entries(
        &mut self,
        collection: CollectionId,
        from: &[usize],
        to: usize,
    ) -> Result<bool, LexiconError> {
        move_positions(&mut self.collection_mut(collection).entries, from, to)
    }

    /// Reorder the languages of a usage.
    pub fn move_usage_languages(
        &mut self,
        usage: UsageId,
        from: &[usize],
        to: usize,
    ) -> Result<bool, LexiconError> {
        move_positions(&mut self.usage_mut(usage).languages, from, to)
    }
}

// =============================================================================
// TESTS
// =============================================================================
