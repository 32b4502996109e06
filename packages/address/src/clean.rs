//! Raw address text preprocessing.
//!
//! Free-form input arrives with arbitrary punctuation, casing, and line
//! breaks:
//! - `"123 Test St.,\nTestville, TX 12345"`
//! - `"  123   TEST ST  TESTVILLE TX  "`
//!
//! [`clean_address`] reduces all of these to the single-spaced,
//! lower-case form the tagger expects.

use regex::Regex;
use std::sync::LazyLock;

use crate::text::strip_punctuation;

/// Regex for runs of carriage returns / line feeds.
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("valid regex"));

/// Regex for runs of whitespace.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Cleans raw address text for tagging.
///
/// 1. Strip punctuation except hyphens
/// 2. Replace line breaks with a space
/// 3. Collapse whitespace
/// 4. Trim and lower-case
#[must_use]
pub fn clean_address(raw: &str) -> String {
    let no_punct = strip_punctuation(raw);
    let single_line = LINE_BREAK_RE.replace_all(&no_punct, " ");
    WHITESPACE_RE
        .replace_all(&single_line, " ")
        .trim()
        .to_lowercase()
}
