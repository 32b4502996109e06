//! Casing and punctuation helpers shared by cleaning and normalization.

use regex::Regex;
use std::sync::LazyLock;

/// ASCII punctuation other than the hyphen.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:punct:]&&[^\-]]").expect("valid regex"));

/// Removes ASCII punctuation except hyphens. Characters are deleted, not
/// replaced with spaces.
#[must_use]
pub fn strip_punctuation(input: &str) -> String {
    PUNCTUATION_RE.replace_all(input, "").into_owned()
}

/// Title-cases `input`: a letter that follows a non-letter (or starts
/// the string) is upper-cased, every other letter is lower-cased.
///
/// Digits count as non-letters, so `"4b"` becomes `"4B"` and `"3rd"`
/// becomes `"3Rd"`. Callers that need ordinals preserved must skip
/// those values.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_letter = false;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }

    out
}
