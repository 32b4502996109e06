#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared address types for the nominatim import toolchain.
//!
//! This crate contains only data types and simple conversions. It has no
//! heavyweight dependencies (no regex, no fuzzy matching, no I/O). The
//! normalization logic that produces and consumes these types lives in
//! `nominatim_import_address`.

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// An incoming address record, as supplied by a caller of the import
/// service.
///
/// House numbers and postcodes are accepted as either JSON strings or
/// JSON numbers and are always stored as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAddressRecord {
    /// House number (e.g., `"123"`, `"12B"`).
    #[serde(deserialize_with = "string_or_number")]
    pub housenumber: String,
    /// Street line as entered (e.g., `"Test St"`).
    pub street: String,
    /// Postal code (5 or 9 digits, possibly hyphenated).
    #[serde(deserialize_with = "string_or_number")]
    pub postcode: String,
    /// City name.
    pub city: String,
    /// State name or two-letter abbreviation.
    pub state: String,
    /// Latitude (WGS84).
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Short-form latitude. Takes precedence over `latitude` when both
    /// `lat` and `lon` are set.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Short-form longitude. Takes precedence over `longitude` when both
    /// `lat` and `lon` are set.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Country name.
    #[serde(default = "default_country")]
    pub country: String,
    /// ISO country code, lower-cased.
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Address category (e.g., `"residential"`).
    #[serde(default = "default_addresstype")]
    pub addresstype: String,
    /// Building type (e.g., `"apartment"`).
    #[serde(default = "default_buildingtype")]
    pub buildingtype: String,
    /// Map-data category for the entry.
    #[serde(default = "default_category")]
    pub category: String,
    /// Whether the resulting entry should be visible.
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_country() -> String {
    "US".to_string()
}

fn default_country_code() -> String {
    "us".to_string()
}

fn default_addresstype() -> String {
    "residential".to_string()
}

fn default_buildingtype() -> String {
    "apartment".to_string()
}

fn default_category() -> String {
    "place".to_string()
}

const fn default_true() -> bool {
    true
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Unsigned(n) => n.to_string(),
        StringOrNumber::Signed(n) => n.to_string(),
    })
}

impl RawAddressRecord {
    /// Creates a record with the required fields and default values for
    /// everything else. Coordinates are stored in the long-form
    /// `latitude`/`longitude` fields.
    #[must_use]
    pub fn new(
        housenumber: impl Into<String>,
        street: impl Into<String>,
        postcode: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            housenumber: housenumber.into(),
            street: street.into(),
            postcode: postcode.into(),
            city: city.into(),
            state: state.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            lat: None,
            lon: None,
            country: default_country(),
            country_code: default_country_code(),
            addresstype: default_addresstype(),
            buildingtype: default_buildingtype(),
            category: default_category(),
            visible: true,
        }
    }

    /// House number and street, the only part of a record that needs
    /// tagging.
    #[must_use]
    pub fn street_line(&self) -> String {
        format!("{} {}", self.housenumber.trim(), self.street.trim())
            .trim()
            .to_string()
    }

    /// One-line form of the whole record, for logs and error messages.
    #[must_use]
    pub fn full_address_string(&self) -> String {
        format!(
            "{} {}, {}, {}, {} {}",
            self.housenumber, self.street, self.city, self.state, self.country, self.postcode
        )
    }
}

/// A component label produced by an address tagger.
///
/// The string forms match the labels of the US address tagging
/// vocabulary (`AddressNumber`, `StreetNamePostType`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AddressLabel {
    /// House number.
    AddressNumber,
    /// Directional before the street name (`N` in `N Main St`).
    StreetNamePreDirectional,
    /// Street type before the street name (`Highway` in `Highway 50`).
    StreetNamePreType,
    /// Base street name.
    StreetName,
    /// Street suffix (`St`, `Ave`).
    StreetNamePostType,
    /// Directional after the street name (`NW` in `Pennsylvania Ave NW`).
    StreetNamePostDirectional,
    /// Secondary unit designator (`Apt`, `Suite`).
    OccupancyType,
    /// Secondary unit identifier (`4B`).
    OccupancyIdentifier,
    /// `PO Box` designator.
    #[serde(rename = "USPSBoxType")]
    #[strum(serialize = "USPSBoxType")]
    UspsBoxType,
    /// `PO Box` number.
    #[serde(rename = "USPSBoxID")]
    #[strum(serialize = "USPSBoxID")]
    UspsBoxId,
    /// Separator between the two streets of an intersection.
    IntersectionSeparator,
    /// Street name of the second street of an intersection.
    SecondStreetName,
    /// Street suffix of the second street of an intersection.
    SecondStreetNamePostType,
    /// City or town.
    PlaceName,
    /// State name or abbreviation.
    StateName,
    /// Postal code.
    ZipCode,
    /// Country.
    CountryName,
}

/// Classification of a tagged address string.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AddressType {
    /// A house number on a street.
    #[serde(rename = "Street Address")]
    #[strum(serialize = "Street Address")]
    StreetAddress,
    /// A post office box.
    #[serde(rename = "PO Box")]
    #[strum(serialize = "PO Box")]
    PoBox,
    /// Two crossing streets.
    Intersection,
    /// The tagger could not confidently classify the address.
    Ambiguous,
}

/// Ordered mapping from component label to value.
///
/// Order reflects parse order and is preserved by every operation, so
/// flattened representations come out in the order the tagger saw the
/// tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledAddressComponents {
    entries: Vec<(AddressLabel, String)>,
}

impl LabeledAddressComponents {
    /// Creates an empty component list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the value for `label`, if present.
    #[must_use]
    pub fn get(&self, label: AddressLabel) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value for `label` when present and non-blank.
    #[must_use]
    pub fn get_non_empty(&self, label: AddressLabel) -> Option<&str> {
        self.get(label).filter(|v| !v.trim().is_empty())
    }

    /// Returns `true` if `label` is present.
    #[must_use]
    pub fn contains(&self, label: AddressLabel) -> bool {
        self.entries.iter().any(|(l, _)| *l == label)
    }

    /// Sets `label` to `value`. An existing label keeps its position;
    /// a new label is appended.
    pub fn insert(&mut self, label: AddressLabel, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            slot.1 = value;
        } else {
            self.entries.push((label, value));
        }
    }

    /// Iterates over `(label, value)` pairs in parse order.
    pub fn iter(&self) -> impl Iterator<Item = (AddressLabel, &str)> {
        self.entries.iter().map(|(l, v)| (*l, v.as_str()))
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Joins all values with single spaces, in parse order.
    #[must_use]
    pub fn to_flat_string(&self) -> String {
        self.entries
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<(AddressLabel, String)> for LabeledAddressComponents {
    fn from_iter<T: IntoIterator<Item = (AddressLabel, String)>>(iter: T) -> Self {
        let mut components = Self::new();
        for (label, value) in iter {
            components.insert(label, value);
        }
        components
    }
}

/// Output of an address tagger: labeled components plus a
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedAddress {
    /// Labeled components in parse order.
    pub components: LabeledAddressComponents,
    /// How the tagger classified the whole string.
    pub address_type: AddressType,
}

/// A fully normalized address.
///
/// Wraps the tagger's components (never modified) together with the
/// derived fields computed from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    /// Tagger output the derived fields were computed from.
    pub components: LabeledAddressComponents,
    /// Postal code, reformatted to `NNNNN-NNNN` when it had 9 digits.
    pub zip_code: Option<String>,
    /// Dense numeric state code.
    pub state_code: u8,
    /// Directionals, types, and base name joined (e.g., `"N Main Street"`).
    pub full_street_name: String,
    /// House number plus [`Self::full_street_name`].
    pub street_num_and_name: String,
    /// Unit designator (e.g., `"Apt 4B"`, `"#12"`).
    pub secondary_address: Option<String>,
    /// Human-readable single-line address.
    pub full_address: String,
    /// [`Self::full_address`] without punctuation (hyphens kept).
    pub full_searchable: String,
    /// [`Self::full_address`] without the unit designator.
    pub osm_searchable: String,
}

impl NormalizedAddress {
    /// Flattens the address into an ordered list of `(key, value)` pairs:
    /// the original component labels in parse order (with `ZipCode`
    /// carrying the formatted postal code) followed by the derived
    /// fields.
    #[must_use]
    pub fn to_flat_map(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .components
            .iter()
            .map(|(label, value)| {
                let value = match (label, &self.zip_code) {
                    (AddressLabel::ZipCode, Some(zip)) => zip.clone(),
                    _ => value.to_string(),
                };
                (label.to_string(), value)
            })
            .collect();

        out.push(("StateCode".to_string(), self.state_code.to_string()));
        out.push(("FullStreetName".to_string(), self.full_street_name.clone()));
        out.push((
            "StreetNumAndName".to_string(),
            self.street_num_and_name.clone(),
        ));
        if let Some(secondary) = &self.secondary_address {
            out.push(("SecondaryAddress".to_string(), secondary.clone()));
        }
        out.push(("FullAddress".to_string(), self.full_address.clone()));
        out.push(("FullSearchable".to_string(), self.full_searchable.clone()));
        out.push(("OsmSearchable".to_string(), self.osm_searchable.clone()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(pairs: &[(AddressLabel, &str)]) -> LabeledAddressComponents {
        pairs
            .iter()
            .map(|(l, v)| (*l, (*v).to_string()))
            .collect()
    }

    #[test]
    fn insert_keeps_position_of_existing_label() {
        let mut c = components(&[
            (AddressLabel::AddressNumber, "123"),
            (AddressLabel::StreetName, "test"),
            (AddressLabel::StreetNamePostType, "st"),
        ]);
        c.insert(AddressLabel::StreetNamePostType, "street");
        c.insert(AddressLabel::PlaceName, "testville");

        let labels: Vec<AddressLabel> = c.iter().map(|(l, _)| l).collect();
        assert_eq!(
            labels,
            vec![
                AddressLabel::AddressNumber,
                AddressLabel::StreetName,
                AddressLabel::StreetNamePostType,
                AddressLabel::PlaceName,
            ]
        );
        assert_eq!(c.get(AddressLabel::StreetNamePostType), Some("street"));
    }

    #[test]
    fn flat_string_follows_parse_order() {
        let c = components(&[
            (AddressLabel::AddressNumber, "123"),
            (AddressLabel::StreetName, "test"),
            (AddressLabel::StreetNamePostType, "street"),
            (AddressLabel::PlaceName, "testville"),
            (AddressLabel::StateName, "tx"),
            (AddressLabel::ZipCode, "12345"),
        ]);
        assert_eq!(c.to_flat_string(), "123 test street testville tx 12345");
    }

    #[test]
    fn get_non_empty_skips_blank_values() {
        let c = components(&[(AddressLabel::OccupancyIdentifier, "  ")]);
        assert!(c.contains(AddressLabel::OccupancyIdentifier));
        assert_eq!(c.get_non_empty(AddressLabel::OccupancyIdentifier), None);
    }

    #[test]
    fn label_display_matches_tagger_vocabulary() {
        assert_eq!(AddressLabel::StreetNamePostType.to_string(), "StreetNamePostType");
        assert_eq!(AddressLabel::UspsBoxId.to_string(), "USPSBoxID");
        assert_eq!(
            "USPSBoxType".parse::<AddressLabel>().unwrap(),
            AddressLabel::UspsBoxType
        );
    }

    #[test]
    fn address_type_display() {
        assert_eq!(AddressType::StreetAddress.to_string(), "Street Address");
        assert_eq!(AddressType::PoBox.to_string(), "PO Box");
        assert_eq!(AddressType::Ambiguous.as_ref(), "Ambiguous");
    }

    #[test]
    fn record_defaults_and_numeric_fields() {
        let record: RawAddressRecord = serde_json::from_str(
            r#"{
                "housenumber": 123,
                "street": "Test St",
                "postcode": 12345,
                "city": "Testville",
                "state": "TX",
                "lat": 30.0,
                "lon": -95.0
            }"#,
        )
        .unwrap();

        assert_eq!(record.housenumber, "123");
        assert_eq!(record.postcode, "12345");
        assert_eq!(record.country, "US");
        assert_eq!(record.country_code, "us");
        assert_eq!(record.addresstype, "residential");
        assert_eq!(record.buildingtype, "apartment");
        assert_eq!(record.category, "place");
        assert!(record.visible);
        assert_eq!(record.latitude, None);
        assert_eq!(record.lat, Some(30.0));
    }

    #[test]
    fn full_address_string_includes_all_parts() {
        let record = RawAddressRecord::new("123", "Test St", "12345", "Testville", "TX", 30.0, -95.0);
        assert_eq!(
            record.full_address_string(),
            "123 Test St, Testville, TX, US 12345"
        );
    }

    #[test]
    fn street_line_leaves_out_city() {
        let record = RawAddressRecord::new(" 1 ", "Broadway ", "84060", "Park City", "UT", 0.0, 0.0);
        assert_eq!(record.street_line(), "1 Broadway");

        let record = RawAddressRecord::new("", "Broadway", "84060", "Park City", "UT", 0.0, 0.0);
        assert_eq!(record.street_line(), "Broadway");
    }

    #[test]
    fn flat_map_appends_derived_fields() {
        let normalized = NormalizedAddress {
            components: components(&[
                (AddressLabel::AddressNumber, "123"),
                (AddressLabel::StreetName, "test"),
                (AddressLabel::ZipCode, "123456789"),
            ]),
            zip_code: Some("12345-6789".to_string()),
            state_code: 43,
            full_street_name: "Test".to_string(),
            street_num_and_name: "123 Test".to_string(),
            secondary_address: None,
            full_address: "123 Test, TX 12345-6789".to_string(),
            full_searchable: "123 Test TX 12345-6789".to_string(),
            osm_searchable: "123 Test, TX 12345-6789".to_string(),
        };

        let map = normalized.to_flat_map();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "AddressNumber",
                "StreetName",
                "ZipCode",
                "StateCode",
                "FullStreetName",
                "StreetNumAndName",
                "FullAddress",
                "FullSearchable",
                "OsmSearchable",
            ]
        );
        assert_eq!(map[2].1, "12345-6789");
        assert_eq!(map[3].1, "43");
    }
}
