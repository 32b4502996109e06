//! Turns a normalized address into its two map nodes.
//!
//! Every record yields a primary node carrying the full `addr:*` tag set
//! and a place node at the same location whose `addr:street` is
//! re-keyed to `addr:place`, so the address is searchable both as a
//! street address and as a named place.

use nominatim_import_address_models::{AddressLabel, NormalizedAddress, RawAddressRecord};
use nominatim_import_entry_models::{GeoEntry, INITIAL_VERSION, Location, Tag, TagKey};

const STREET_KEY: &str = "addr:street";
const PLACE_KEY: &str = "addr:place";

/// The taggable values of one record after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressModel {
    /// Tagged house number, upper-cased (`"12B"`).
    pub housenumber: String,
    /// `FullStreetName`, with the suffix expanded.
    pub street: String,
    /// `SecondaryAddress` (`"Apt 4B"`, `"#12"`), if the street line had one.
    pub unit: Option<String>,
    /// Postcode as supplied by the record.
    pub postcode: String,
    /// City as supplied by the record.
    pub city: String,
    /// State as supplied by the record.
    pub state: String,
    /// Country as supplied by the record.
    pub country: String,
    /// Node position. [`Location::unknown`] (`0, 0`) when the record had
    /// no coordinates.
    pub location: Location,
}

impl AddressModel {
    /// Takes house number, street, and unit from the normalized address
    /// and everything else from the raw record.
    #[must_use]
    pub fn from_normalized(record: &RawAddressRecord, normalized: &NormalizedAddress) -> Self {
        let housenumber = normalized
            .components
            .get_non_empty(AddressLabel::AddressNumber)
            .unwrap_or(&record.housenumber)
            .trim()
            .to_uppercase();

        Self {
            housenumber,
            street: normalized.full_street_name.clone(),
            unit: normalized.secondary_address.clone(),
            postcode: record.postcode.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
            country: record.country.clone(),
            location: resolve_location(record),
        }
    }

    /// Value for one allow-listed key, if set.
    #[must_use]
    pub fn value(&self, key: TagKey) -> Option<&str> {
        let value = match key {
            TagKey::Housenumber => &self.housenumber,
            TagKey::Street => &self.street,
            TagKey::Unit => self.unit.as_ref()?,
            TagKey::Postcode => &self.postcode,
            TagKey::City => &self.city,
            TagKey::State => &self.state,
            TagKey::Country => &self.country,
        };
        Some(value.as_str()).filter(|v| !v.trim().is_empty())
    }

    /// `addr:*` tags in [`TagKey::ALL`] order. Empty values are skipped.
    #[must_use]
    pub fn tags(&self) -> Vec<Tag> {
        TagKey::ALL
            .iter()
            .filter_map(|&key| self.value(key).map(|v| Tag::new(key.osm_key(), v)))
            .collect()
    }
}

/// Picks the record's coordinates. `lon`/`lat` win over
/// `longitude`/`latitude`; a record with neither pair gets
/// [`Location::unknown`].
#[must_use]
pub fn resolve_location(record: &RawAddressRecord) -> Location {
    match (record.lon, record.lat, record.longitude, record.latitude) {
        (Some(lon), Some(lat), _, _) | (_, _, Some(lon), Some(lat)) => Location::new(lon, lat),
        _ => Location::unknown(),
    }
}

/// Builds the `(primary, place)` node pair.
///
/// The primary node gets `base_id`; the place node is a copy with id
/// `base_id + 1` and its first `addr:street` tag renamed to
/// `addr:place`.
#[must_use]
pub fn assemble(
    model: &AddressModel,
    base_id: i64,
    user: &str,
    timestamp: &str,
) -> (GeoEntry, GeoEntry) {
    let primary = GeoEntry {
        id: base_id,
        timestamp: timestamp.to_string(),
        user: user.to_string(),
        version: INITIAL_VERSION,
        visible: true,
        location: model.location,
        tags: model.tags(),
    };

    let mut place = primary.clone();
    place.id = base_id + 1;
    if let Some(tag) = place.tags.iter_mut().find(|t| t.key == STREET_KEY) {
        tag.key = PLACE_KEY.to_string();
    }

    (primary, place)
}

#[cfg(test)]
mod tests {
    use nominatim_import_address_models::LabeledAddressComponents;

    use super::*;

    fn record() -> RawAddressRecord {
        RawAddressRecord::new("123b", "Test St", "12345", "Testville", "TX", 30.27, -97.74)
    }

    fn normalized() -> NormalizedAddress {
        let components: LabeledAddressComponents = [
            (AddressLabel::AddressNumber, "123b"),
            (AddressLabel::StreetName, "test"),
            (AddressLabel::StreetNamePostType, "street"),
        ]
        .into_iter()
        .map(|(l, v)| (l, v.to_string()))
        .collect();

        NormalizedAddress {
            components,
            zip_code: Some("12345".to_string()),
            state_code: 43,
            full_street_name: "Test Street".to_string(),
            street_num_and_name: "123B Test Street".to_string(),
            secondary_address: None,
            full_address: "123B Test Street, Testville, TX 12345".to_string(),
            full_searchable: "123B Test Street Testville TX 12345".to_string(),
            osm_searchable: "123B Test Street, Testville, TX 12345".to_string(),
        }
    }

    fn keys(entry: &GeoEntry) -> Vec<&str> {
        entry.tags.iter().map(|t| t.key.as_str()).collect()
    }

    #[test]
    fn model_uses_normalized_street() {
        let model = AddressModel::from_normalized(&record(), &normalized());
        assert_eq!(model.housenumber, "123B");
        assert_eq!(model.street, "Test Street");
        assert_eq!(model.unit, None);
        assert_eq!(model.postcode, "12345");
        assert_eq!(model.country, "US");
        assert_eq!(model.location, Location::new(-97.74, 30.27));
    }

    #[test]
    fn model_takes_unit_from_secondary_address() {
        let normalized = NormalizedAddress {
            secondary_address: Some("Apt 4B".to_string()),
            ..normalized()
        };
        let model = AddressModel::from_normalized(&record(), &normalized);
        assert_eq!(model.unit.as_deref(), Some("Apt 4B"));
        assert_eq!(model.value(TagKey::Unit), Some("Apt 4B"));
    }

    #[test]
    fn tags_follow_allow_list_order() {
        let mut model = AddressModel::from_normalized(&record(), &normalized());
        model.unit = Some("Apt 4B".to_string());
        let (primary, _) = assemble(&model, 1, "osm_imports", "2024-01-01T00:00:00Z");
        assert_eq!(
            keys(&primary),
            vec![
                "addr:housenumber",
                "addr:street",
                "addr:unit",
                "addr:postcode",
                "addr:city",
                "addr:state",
                "addr:country",
            ]
        );
    }

    #[test]
    fn skips_missing_unit_and_empty_values() {
        let mut model = AddressModel::from_normalized(&record(), &normalized());
        model.city = "  ".to_string();
        let tags = model.tags();
        assert!(tags.iter().all(|t| t.key != "addr:unit" && t.key != "addr:city"));
        assert_eq!(tags.len(), 5);
    }

    #[test]
    fn builds_primary_and_place_pair() {
        let model = AddressModel::from_normalized(&record(), &normalized());
        let (primary, place) = assemble(&model, 500, "osm_imports", "2024-01-01T00:00:00Z");

        assert_eq!(primary.id, 500);
        assert_eq!(place.id, 501);
        assert_eq!(primary.version, 1);
        assert!(primary.visible);
        assert_eq!(primary.user, "osm_imports");
        assert_eq!(primary.location, place.location);
        assert_eq!(primary.timestamp, place.timestamp);

        assert_eq!(primary.tag("addr:street"), Some("Test Street"));
        assert_eq!(primary.tag("addr:place"), None);
        assert_eq!(place.tag("addr:place"), Some("Test Street"));
        assert_eq!(place.tag("addr:street"), None);

        // Same position in the list, only the key changes.
        assert_eq!(keys(&place)[1], "addr:place");
        assert_eq!(primary.tags.len(), place.tags.len());
        for (a, b) in primary.tags.iter().zip(&place.tags) {
            assert_eq!(a.value, b.value);
        }
    }

    #[test]
    fn resolves_short_form_coordinates_first() {
        let mut r = record();
        r.lat = Some(1.5);
        r.lon = Some(2.5);
        assert_eq!(resolve_location(&r), Location::new(2.5, 1.5));

        // An incomplete short-form pair falls back to the long form.
        r.lat = None;
        assert_eq!(resolve_location(&r), Location::new(-97.74, 30.27));
    }

    #[test]
    fn missing_coordinates_use_sentinel() {
        let mut r = record();
        r.latitude = None;
        r.longitude = None;
        let location = resolve_location(&r);
        assert!(location.is_unknown());
    }
}
