//! Static vocabularies used by the tagger and normalizer.
//!
//! Everything here is built once on first use and never mutated.

pub mod designators;
pub mod states;
pub mod suffixes;

pub use suffixes::{SuffixEntry, SuffixLexicon};
