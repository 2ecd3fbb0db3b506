//! # lexicon
//!
//! Command-line front end for the Lexicon personal dictionary. The store
//! itself lives in `lexicon-core`; this crate owns the snapshot file, the
//! optional `lexicon.toml`, id allocation and the wall clock.

pub mod cli;
pub mod config;
