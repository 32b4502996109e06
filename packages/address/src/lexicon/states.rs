//! US state and territory lookup tables.
//!
//! Provides mappings between full state names, two-letter USPS
//! abbreviations, and the dense numeric state codes used by the import
//! pipeline. Codes are contiguous from `0` (`AK`) to `61` (`AA`) and are
//! *not* FIPS codes.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// A single state, district, territory, or armed-forces region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    /// Two-letter USPS abbreviation.
    pub abbreviation: &'static str,
    /// Full name. `None` for the armed-forces mail regions.
    pub name: Option<&'static str>,
    /// Dense numeric code.
    pub code: u8,
}

const fn state(abbreviation: &'static str, name: &'static str, code: u8) -> StateInfo {
    StateInfo {
        abbreviation,
        name: Some(name),
        code,
    }
}

const fn region(abbreviation: &'static str, code: u8) -> StateInfo {
    StateInfo {
        abbreviation,
        name: None,
        code,
    }
}

/// All known states, ordered by code.
pub const STATES: &[StateInfo] = &[
    state("AK", "Alaska", 0),
    state("AL", "Alabama", 1),
    state("AR", "Arkansas", 2),
    state("AZ", "Arizona", 3),
    state("CA", "California", 4),
    state("CO", "Colorado", 5),
    state("CT", "Connecticut", 6),
    state("DC", "District of Columbia", 7),
    state("DE", "Delaware", 8),
    state("FL", "Florida", 9),
    state("GA", "Georgia", 10),
    state("HI", "Hawaii", 11),
    state("IA", "Iowa", 12),
    state("ID", "Idaho", 13),
    state("IL", "Illinois", 14),
    state("IN", "Indiana", 15),
    state("KS", "Kansas", 16),
    state("KY", "Kentucky", 17),
    state("LA", "Louisiana", 18),
    state("MA", "Massachusetts", 19),
    state("MD", "Maryland", 20),
    state("ME", "Maine", 21),
    state("MI", "Michigan", 22),
    state("MN", "Minnesota", 23),
    state("MO", "Missouri", 24),
    state("MS", "Mississippi", 25),
    state("MT", "Montana", 26),
    state("NC", "North Carolina", 27),
    state("ND", "North Dakota", 28),
    state("NE", "Nebraska", 29),
    state("NH", "New Hampshire", 30),
    state("NJ", "New Jersey", 31),
    state("NM", "New Mexico", 32),
    state("NV", "Nevada", 33),
    state("NY", "New York", 34),
    state("OH", "Ohio", 35),
    state("OK", "Oklahoma", 36),
    state("OR", "Oregon", 37),
    state("PA", "Pennsylvania", 38),
    state("RI", "Rhode Island", 39),
    state("SC", "South Carolina", 40),
    state("SD", "South Dakota", 41),
    state("TN", "Tennessee", 42),
    state("TX", "Texas", 43),
    state("UT", "Utah", 44),
    state("VA", "Virginia", 45),
    state("VT", "Vermont", 46),
    state("WA", "Washington", 47),
    state("WI", "Wisconsin", 48),
    state("WV", "West Virginia", 49),
    state("WY", "Wyoming", 50),
    state("AS", "American Samoa", 51),
    state("FM", "Federated States of Micronesia", 52),
    state("GU", "Guam", 53),
    state("MH", "Marshall Islands", 54),
    state("MP", "Northern Mariana Islands", 55),
    state("PW", "Palau", 56),
    state("PR", "Puerto Rico", 57),
    state("VI", "Virgin Islands", 58),
    region("AE", 59),
    region("AP", 60),
    region("AA", 61),
];

static BY_ABBREVIATION: LazyLock<BTreeMap<&'static str, &'static StateInfo>> =
    LazyLock::new(|| STATES.iter().map(|s| (s.abbreviation, s)).collect());

/// Keyed by lower-cased full name.
static BY_NAME: LazyLock<BTreeMap<String, &'static StateInfo>> = LazyLock::new(|| {
    STATES
        .iter()
        .filter_map(|s| s.name.map(|name| (name.to_lowercase(), s)))
        .collect()
});

/// Longest full name, in words. Used by the tagger to bound how far back
/// it looks for a state name.
pub const MAX_NAME_WORDS: usize = 4;

fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Looks up a state by full name, ignoring case and extra whitespace.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static StateInfo> {
    BY_NAME.get(&name_key(name)).copied()
}

/// Looks up a state by two-letter abbreviation, ignoring case.
#[must_use]
pub fn by_abbreviation(abbreviation: &str) -> Option<&'static StateInfo> {
    BY_ABBREVIATION
        .get(abbreviation.trim().to_uppercase().as_str())
        .copied()
}

/// Maps a full state name to its two-letter abbreviation.
#[must_use]
pub fn abbreviation_for_name(name: &str) -> Option<&'static str> {
    by_name(name).map(|s| s.abbreviation)
}

/// Maps a two-letter abbreviation to the full state name.
#[must_use]
pub fn name_for_abbreviation(abbreviation: &str) -> Option<&'static str> {
    by_abbreviation(abbreviation).and_then(|s| s.name)
}

/// Maps a two-letter abbreviation to its numeric code.
#[must_use]
pub fn code_for_abbreviation(abbreviation: &str) -> Option<u8> {
    by_abbreviation(abbreviation).map(|s| s.code)
}

/// Maps a numeric code back to its abbreviation.
#[must_use]
pub fn abbreviation_for_code(code: u8) -> Option<&'static str> {
    STATES.get(usize::from(code)).map(|s| s.abbreviation)
}

/// Maps either a full name or an abbreviation to the numeric code.
///
/// Returns `None` when the value is in neither table.
#[must_use]
pub fn full_state_to_code(state: &str) -> Option<u8> {
    by_name(state)
        .or_else(|| by_abbreviation(state))
        .map(|s| s.code)
}
