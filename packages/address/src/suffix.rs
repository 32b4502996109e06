//! Fuzzy street suffix resolution.
//!
//! Maps a possibly abbreviated or misspelled street suffix (`"ave"`,
//! `"blvd"`, `"strt"`) to its canonical form (`"avenue"`, `"boulevard"`,
//! `"street"`) using [`crate::similarity::weighted_ratio`] against every
//! alternate spelling in a [`SuffixLexicon`].
//!
//! See the URISA address standard and USPS Publication 28 for the
//! vocabulary this is matched against.

use crate::lexicon::SuffixLexicon;
use crate::similarity::weighted_ratio;

/// Default similarity threshold. A candidate must score strictly above it.
pub const DEFAULT_SUFFIX_THRESHOLD: f64 = 97.0;

/// Expands a street suffix token to its canonical form.
///
/// The token is lower-cased first. A token that already is a canonical
/// suffix is returned as-is without scoring. Otherwise every entry is
/// scored by the best [`weighted_ratio`] of the token against its
/// alternates; entries scoring strictly above `threshold` are
/// candidates and the highest-scoring one wins.
///
/// Ties between equally scored entries go to the entry that comes first
/// in the lexicon's iteration order. This is a weak tie-break; callers
/// that need a different policy should supply their own lexicon order.
///
/// When nothing clears the threshold the lower-cased token is returned
/// unchanged. Never fails.
#[must_use]
pub fn expand_suffix(token: &str, lexicon: &SuffixLexicon, threshold: f64) -> String {
    let value = token.trim().to_lowercase();

    if lexicon.contains_canonical(&value) {
        return value;
    }

    let mut best: Option<(&str, f64)> = None;

    for entry in lexicon.iter() {
        let score = entry
            .alternates
            .iter()
            .map(|alt| weighted_ratio(&value, alt))
            .fold(0.0_f64, f64::max);

        if score <= threshold {
            continue;
        }

        // Strictly greater keeps the first-seen entry on ties.
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((entry.canonical.as_str(), score));
        }
    }

    match best {
        Some((canonical, score)) => {
            log::trace!("expand_suffix: {value:?} -> {canonical:?} (score {score:.1})");
            canonical.to_string()
        }
        None => {
            log::trace!("expand_suffix: {value:?} unchanged (no candidate above {threshold})");
            value
        }
    }
}
