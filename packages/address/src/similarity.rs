//! String similarity scoring for fuzzy suffix matching.
//!
//! All scores are on a `0.0..=100.0` scale. The building block is the
//! normalized Indel similarity from `rapidfuzz`; the token and partial
//! variants compose it the same way the common "fuzz" family of scorers
//! does, and [`weighted_ratio`] picks the best of them according to the
//! length ratio of the two inputs.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

/// Weight applied to token-based scores in [`weighted_ratio`].
const UNBASE_SCALE: f64 = 0.95;

/// Length ratio below which [`weighted_ratio`] skips partial matching.
const PARTIAL_LENGTH_RATIO: f64 = 1.5;

/// Length ratio above which partial scores are heavily discounted.
const LONG_LENGTH_RATIO: f64 = 8.0;

/// Normalized Indel similarity of two strings.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_non_empty(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}

/// [`ratio`] after sorting the whitespace-separated tokens of both
/// inputs.
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Compares the token intersection of both inputs against each side's
/// remainder. A non-empty intersection where one side has no remainder
/// scores 100.
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let sect: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = sect.join(" ");
    let combined_ab = join_non_empty(&sect, &diff_ab.join(" "));
    let combined_ba = join_non_empty(&sect, &diff_ba.join(" "));

    let mut best = ratio(&combined_ab, &combined_ba);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect, &combined_ab))
            .max(ratio(&sect, &combined_ba));
    }
    best
}

/// Best [`ratio`] between the shorter input and any equally long window
/// of the longer one, including windows clipped at either end.
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return 0.0;
    }

    let score = |window: &[char]| {
        indel::normalized_similarity(short.iter().copied(), window.iter().copied()) * 100.0
    };

    let mut best = 0.0_f64;

    // Windows hanging off the start and end of the longer string.
    for len in 1..short.len() {
        best = best.max(score(&long[..len]));
        best = best.max(score(&long[long.len() - len..]));
    }

    for start in 0..=long.len() - short.len() {
        best = best.max(score(&long[start..start + short.len()]));
        if best >= 100.0 {
            break;
        }
    }

    best
}

/// [`partial_ratio`] after sorting tokens.
#[must_use]
pub fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Weighted combination of the scorers above.
///
/// Inputs of similar length are compared whole (plain and
/// token-based); inputs of very different length fall back to partial
/// matching with a discount so a short token contained in a long one
/// never scores a perfect 100. Empty input scores 0.
#[must_use]
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let end = ratio(a, b);

    if len_ratio < PARTIAL_LENGTH_RATIO {
        let token = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return end.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < LONG_LENGTH_RATIO {
        0.9
    } else {
        0.6
    };

    end.max(partial_ratio(a, b) * partial_scale)
        .max(partial_token_sort_ratio(a, b) * UNBASE_SCALE * partial_scale)
}
