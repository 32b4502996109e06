#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! US address normalization.
//!
//! Turns free-form address text into labeled components and a set of
//! canonical composite strings:
//!
//! 1. **Cleaning** ([`clean`]): punctuation, line breaks, whitespace,
//!    casing.
//! 2. **Tagging** ([`tagger`]): an [`AddressTagger`] labels each span.
//!    [`RuleTagger`] is the built-in implementation.
//! 3. **Suffix expansion** ([`suffix`]): the tagged street suffix is
//!    fuzzy-matched against the USPS [`lexicon`] and replaced with its
//!    canonical spelling (`"st"` becomes `"street"`).
//! 4. **Normalization** ([`normalize`]): postal code, state code, and the
//!    `FullStreetName` / `FullAddress` family of derived fields.
//!
//! [`AddressNormalizer`] wires the four steps together.

pub mod clean;
pub mod config;
pub mod lexicon;
pub mod normalize;
pub mod similarity;
pub mod suffix;
pub mod tagger;
pub mod text;

use std::sync::Arc;

pub use config::NormalizationConfig;
pub use lexicon::SuffixLexicon;
pub use normalize::NormalizeError;
pub use suffix::{DEFAULT_SUFFIX_THRESHOLD, expand_suffix};
pub use tagger::{AddressTagger, RuleTagger, parse_address};

use nominatim_import_address_models::{
    AddressLabel, AddressType, NormalizedAddress, RawAddressRecord, TaggedAddress,
};

/// Tagger, lexicon, and settings bundled for repeated use.
///
/// Cheap to clone; the tagger is shared behind an [`Arc`] and the lexicon
/// is a `'static` table.
#[derive(Clone)]
pub struct AddressNormalizer {
    tagger: Arc<dyn AddressTagger>,
    lexicon: &'static SuffixLexicon,
    config: NormalizationConfig,
}

impl std::fmt::Debug for AddressNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressNormalizer")
            .field("lexicon_len", &self.lexicon.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for AddressNormalizer {
    fn default() -> Self {
        Self::new(NormalizationConfig::default())
    }
}

impl AddressNormalizer {
    /// Creates a normalizer using [`RuleTagger`] and the USPS suffix
    /// lexicon.
    #[must_use]
    pub fn new(config: NormalizationConfig) -> Self {
        Self {
            tagger: Arc::new(RuleTagger),
            lexicon: SuffixLexicon::usps(),
            config,
        }
    }

    /// Replaces the tagger.
    #[must_use]
    pub fn with_tagger(mut self, tagger: Arc<dyn AddressTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    /// Replaces the suffix lexicon used for expansion.
    #[must_use]
    pub const fn with_lexicon(mut self, lexicon: &'static SuffixLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    /// Cleans, tags, and suffix-expands `raw` without normalizing.
    #[must_use]
    pub fn parse(&self, raw: &str) -> TaggedAddress {
        parse_address(raw, self.tagger.as_ref(), self.lexicon, &self.config)
    }

    /// Parses and normalizes `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError`] if the tagged components lack a street,
    /// house number, or recognizable state.
    pub fn normalize(&self, raw: &str) -> Result<(NormalizedAddress, AddressType), NormalizeError> {
        let tagged = self.parse(raw);
        let normalized = normalize::normalize(&tagged.components)?;
        log::debug!(
            "normalize: {raw:?} -> {:?} ({})",
            normalized.full_address,
            tagged.address_type
        );
        Ok((normalized, tagged.address_type))
    }

    /// Normalizes a structured record.
    ///
    /// Only [`RawAddressRecord::street_line`] goes through the tagger. City,
    /// state, postcode and country already have their own fields and are
    /// labeled directly, overriding anything the tagger found.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError`] if the street line lacks a street or
    /// house number, or the record's state is missing or unknown.
    pub fn normalize_record(
        &self,
        record: &RawAddressRecord,
    ) -> Result<(NormalizedAddress, AddressType), NormalizeError> {
        let mut tagged = self.parse(&record.street_line());

        for (label, value) in [
            (AddressLabel::PlaceName, &record.city),
            (AddressLabel::StateName, &record.state),
            (AddressLabel::ZipCode, &record.postcode),
            (AddressLabel::CountryName, &record.country),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                tagged.components.insert(label, value);
            }
        }

        let normalized = normalize::normalize(&tagged.components)?;
        log::debug!(
            "normalize_record: {:?} -> {:?} ({})",
            record.full_address_string(),
            normalized.full_address,
            tagged.address_type
        );
        Ok((normalized, tagged.address_type))
    }
}
