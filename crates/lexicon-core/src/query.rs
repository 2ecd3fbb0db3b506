//! # Query Engine
//!
//! One generic read pipeline, parameterized over the entity kind:
//!
//! 1. resolve every candidate id to its tracked value, dropping ids that no
//!    longer resolve
//! 2. keep the values accepted by the predicate, if any
//! 3. stable-sort with the comparator, if any (equal keys keep input order)
//! 4. reverse if asked, then truncate to the limit
//!
//! Every higher-level read ("translations of X sorted by modification time",
//! "all entries") is this pipeline over one adjacency list or over a whole
//! arena; see the read API on `Lexicon`.

use crate::types::Tracked;
use std::cmp::Ordering;
use std::fmt;

/// Predicate over a tracked value.
pub type Predicate<E> = Box<dyn Fn(&Tracked<E>) -> bool>;

/// Comparator over two tracked values.
pub type Comparator<E> = Box<dyn Fn(&Tracked<E>, &Tracked<E>) -> Ordering>;

/// A resolved query row: the id and its current tracked value.
pub type Row<'a, I, E> = (I, &'a Tracked<E>);

/// Filter, sort and limit settings for one entity kind.
pub struct Query<E> {
    filter: Option<Predicate<E>>,
    sort: Option<Comparator<E>>,
    reverse: bool,
    limit: Option<usize>,
}

impl<E> Default for Query<E> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            reverse: false,
            limit: None,
        }
    }
}

impl<E> fmt::Debug for Query<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filtered", &self.filter.is_some())
            .field("sorted", &self.sort.is_some())
            .field("reverse", &self.reverse)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<E> Query<E> {
    /// A query that returns every candidate in input order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only values for which `predicate` holds.
    #[must_use]
    pub fn filter(mut self, predicate: impl Fn(&Tracked<E>) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Stable-sort with `comparator`.
    #[must_use]
    pub fn sort_by(
        mut self,
        comparator: impl Fn(&Tracked<E>, &Tracked<E>) -> Ordering + 'static,
    ) -> Self {
        self.sort = Some(Box::new(comparator));
        self
    }

    /// Reverse the (sorted) result before the limit is applied.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.reverse = !self.reverse;
        self
    }

    /// Keep at most `limit` rows.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the pipeline over `ids`, resolving each with `resolve`.
    pub fn run<'a, I, R>(&self, ids: impl IntoIterator<Item = I>, resolve: R) -> Vec<Row<'a, I, E>>
    where
        R: Fn(I) -> Option<&'a Tracked<E>>,
        I: Copy,
    {
        let mut rows: Vec<Row<'a, I, E>> = ids
            .into_iter()
            .filter_map(|id| resolve(id).map(|tracked| (id, tracked)))
            .filter(|(_, tracked)| self.filter.as_ref().is_none_or(|keep| keep(*tracked)))
            .collect();

        if let Some(compare) = &self.sort {
            rows.sort_by(|a, b| compare(a.1, b.1));
        }
        if self.reverse {
            rows.reverse();
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        rows
    }
}

/// Ready-made comparators.
pub mod order {
    use crate::types::{Entry, EntryCollection, Keyword, Language, Tracked};
    use std::cmp::Ordering;

    /// Oldest first.
    pub fn by_created<E>(a: &Tracked<E>, b: &Tracked<E>) -> Ordering {
        a.metadata.created.cmp(&b.metadata.created)
    }

    /// Least recently modified first.
    pub fn by_modified<E>(a: &Tracked<E>, b: &Tracked<E>) -> Ordering {
        a.metadata.modified.cmp(&b.metadata.modified)
    }

    /// Case-insensitive spelling order.
    pub fn by_spelling(a: &Tracked<Entry>, b: &Tracked<Entry>) -> Ordering {
        a.value
            .spelling
            .to_lowercase()
            .cmp(&b.value.spelling.to_lowercase())
    }

    /// Language code order.
    pub fn by_code(a: &Tracked<Language>, b: &Tracked<Language>) -> Ordering {
        a.value.code.cmp(&b.value.code)
    }

    /// Values with a display title.
    pub trait Titled {
        fn title(&self) -> &str;
    }

    impl Titled for Language {
        fn title(&self) -> &str {
            &self.title
        }
    }

    impl Titled for Keyword {
        fn title(&self) -> &str {
            &self.title
        }
    }

    impl Titled for EntryCollection {
        fn title(&self) -> &str {
            &self.title
        }
    }

    /// Case-insensitive title order.
    pub fn by_title<E: Titled>(a: &Tracked<E>, b: &Tracked<E>) -> Ordering {
        a.value
            .title()
            .to_lowercase()
            .cmp(&b.value.title().to_lowercase())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entry, EntryId, Timestamp};
    use std::collections::BTreeMap;

    fn sample() -> BTreeMap<EntryId, Tracked<Entry>> {
        let mut items = BTreeMap::new();
        items.insert(EntryId(1), Tracked::new(Entry::new("cat"), Timestamp(30)));
        items.insert(EntryId(2), Tracked::new(Entry::new("dog"), Timestamp(10)));
        items.insert(EntryId(3), Tracked::new(Entry::new("ant"), Timestamp(20)));
        items.insert(EntryId(4), Tracked::new(Entry::new("bee"), Timestamp(10)));
        items
    }

    fn ids<E>(rows: &[Row<'_, EntryId, E>]) -> Vec<EntryId> {
        rows.iter().map(|(id, _)| *id).collect()
    }

    #[test]
    fn unresolved_ids_are_dropped() {
        let items = sample();
        let rows = Query::new().run([EntryId(9), EntryId(2)], |id| items.get(&id));
        assert_eq!(ids(&rows), vec![EntryId(2)]);
    }

    #[test]
    fn no_comparator_keeps_input_order() {
        let items = sample();
        let rows = Query::new().run([EntryId(3), EntryId(1), EntryId(2)], |id| items.get(&id));
        assert_eq!(ids(&rows), vec![EntryId(3), EntryId(1), EntryId(2)]);
    }

    #[test]
    fn sort_is_stable() {
        let items = sample();
        // 2 and 4 share a timestamp; input order decides between them.
        let rows = Query::new()
            .sort_by(order::by_created)
            .run([EntryId(4), EntryId(1), EntryId(2), EntryId(3)], |id| {
                items.get(&id)
            });
        assert_eq!(
            ids(&rows),
            vec![EntryId(4), EntryId(2), EntryId(3), EntryId(1)]
        );
    }

    #[test]
    fn filter_reverse_and_limit_compose() {
        let items = sample();
        let rows = Query::new()
            .filter(|tracked: &Tracked<Entry>| tracked.value.spelling != "dog")
            .sort_by(order::by_spelling)
            .reversed()
            .limit(2)
            .run(items.keys().copied(), |id| items.get(&id));
        assert_eq!(ids(&rows), vec![EntryId(1), EntryId(4)]);
    }

    #[test]
    fn limit_zero_is_empty() {
        let items = sample();
        let rows = Query::new()
            .limit(0)
            .run(items.keys().copied(), |id| items.get(&id));
        assert!(rows.is_empty());
    }
}
