//! # Collaborators
//!
//! The store never invents identifiers or reads the wall clock itself; every
//! create and touch receives them from the caller. This module holds the
//! small sources callers typically plug in.

use crate::types::Timestamp;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // Clocks set before 1970 collapse to the epoch.
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Timestamp(millis)
    }
}

/// A clock that always answers the same instant. Handy for tests and replays.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Monotonic identifier source.
///
/// Raw ids are shared across kinds, so one counter serves the whole store.
/// Seed it with `Lexicon::next_free_id` after loading a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Start handing out ids at `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Take the next raw id.
    pub fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    /// Take the next id, typed for the kind being created.
    pub fn next_id<I: From<u64>>(&mut self) -> I {
        I::from(self.next_raw())
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}
