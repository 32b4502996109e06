//! Directional, unit, box, and country vocabularies.
//!
//! All terms are lower-case, matching the output of address cleaning.

/// Directional words and abbreviations.
const DIRECTIONALS: &[&str] = &[
    "n",
    "s",
    "e",
    "w",
    "ne",
    "nw",
    "se",
    "sw",
    "north",
    "south",
    "east",
    "west",
    "northeast",
    "northwest",
    "southeast",
    "southwest",
];

/// Secondary unit designators (USPS Publication 28, Appendix C2).
const OCCUPANCY_TYPES: &[&str] = &[
    "apt",
    "apartment",
    "bldg",
    "building",
    "bsmt",
    "basement",
    "dept",
    "department",
    "fl",
    "floor",
    "frnt",
    "front",
    "hngr",
    "hangar",
    "lbby",
    "lobby",
    "lot",
    "lowr",
    "lower",
    "ofc",
    "office",
    "ph",
    "penthouse",
    "pier",
    "rear",
    "rm",
    "room",
    "side",
    "slip",
    "spc",
    "space",
    "ste",
    "suite",
    "trlr",
    "trailer",
    "unit",
    "uppr",
    "upper",
];

/// Street types that precede a route number (`highway 50`, `route 66`).
const PRE_TYPES: &[&str] = &[
    "highway",
    "hwy",
    "route",
    "rte",
    "interstate",
    "state road",
    "county road",
    "farm to market",
];

/// Trailing country designators.
pub const COUNTRY_NAMES: &[&str] = &[
    "united states of america",
    "united states",
    "usa",
    "us",
];

/// Returns `true` for a directional word or abbreviation.
#[must_use]
pub fn is_directional(token: &str) -> bool {
    DIRECTIONALS.contains(&token)
}

/// Returns `true` for a secondary unit designator.
#[must_use]
pub fn is_occupancy_type(token: &str) -> bool {
    OCCUPANCY_TYPES.contains(&token)
}

/// Returns the number of tokens a route-style pre-type spans at the
/// start of `tokens`, or `None` if `tokens` does not start with one.
#[must_use]
pub fn pre_type_len(tokens: &[&str]) -> Option<usize> {
    PRE_TYPES
        .iter()
        .map(|p| p.split(' ').collect::<Vec<_>>())
        .filter(|words| tokens.len() >= words.len() && tokens[..words.len()] == words[..])
        .map(|words| words.len())
        .max()
}
