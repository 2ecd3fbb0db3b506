//! # Entity Values
//!
//! The scalar payload of each of the six entity kinds. Relationships are not
//! stored here; they live in the relationship graph (`crate::relations`).

use serde::{Deserialize, Serialize};

/// Folding of an incoming value into a surviving one during a merge.
///
/// The rule is first-non-empty-wins: a field that is empty on the survivor
/// takes the incoming value, a non-empty field is kept as is.
pub trait MergeValue {
    /// Fold `incoming` into `self`.
    fn merge_from(&mut self, incoming: &Self);
}

/// Copy `incoming` into `field` only if `field` is empty.
fn fill_if_empty(field: &mut String, incoming: &str) {
    if field.trim().is_empty() && !incoming.trim().is_empty() {
        *field = incoming.to_string();
    }
}

// =============================================================================
// ENTRY
// =============================================================================

/// A vocabulary entry: one spelling in one or more languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    pub spelling: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub definition: String,
}

impl Entry {
    /// Create an entry with only a spelling.
    #[must_use]
    pub fn new(spelling: impl Into<String>) -> Self {
        Self {
            spelling: spelling.into(),
            ..Self::default()
        }
    }

    /// Builder-style pronunciation setter.
    #[must_use]
    pub fn with_pronunciation(mut self, pronunciation: impl Into<String>) -> Self {
        self.pronunciation = pronunciation.into();
        self
    }

    /// Builder-style definition setter.
    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }
}

impl MergeValue for Entry {
    fn merge_from(&mut self, incoming: &Self) {
        fill_if_empty(&mut self.spelling, &incoming.spelling);
        fill_if_empty(&mut self.pronunciation, &incoming.pronunciation);
        fill_if_empty(&mut self.definition, &incoming.definition);
    }
}

// =============================================================================
// LANGUAGE
// =============================================================================

/// A language entries and usages can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Language {
    /// Short code such as `"en"` or `"pt-BR"`.
    pub code: String,
    /// Display title such as `"English"`.
    #[serde(default)]
    pub title: String,
}

impl Language {
    #[must_use]
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
        }
    }
}

impl MergeValue for Language {
    fn merge_from(&mut self, incoming: &Self) {
        fill_if_empty(&mut self.code, &incoming.code);
        fill_if_empty(&mut self.title, &incoming.title);
    }
}

// =============================================================================
// KEYWORD
// =============================================================================

/// A free-form tag matched against entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Keyword {
    pub title: String,
}

impl Keyword {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl MergeValue for Keyword {
    fn merge_from(&mut self, incoming: &Self) {
        fill_if_empty(&mut self.title, &incoming.title);
    }
}

// =============================================================================
// NOTE / USAGE / COLLECTION
// =============================================================================

/// A free-text note attached to an entry or a usage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
}

impl Note {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// An example sentence showing one or more entries in use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub text: String,
}

impl Usage {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A user-curated, ordered list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryCollection {
    pub title: String,
}

impl EntryCollection {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
