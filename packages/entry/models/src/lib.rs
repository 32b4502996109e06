#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map-data node types and import service request/response shapes.
//!
//! A [`GeoEntry`] is one OSM-style node: an id, a location, some
//! metadata, and an ordered list of `addr:*` [`Tag`]s. Every imported
//! address record produces two of them (a primary node and a place node).

use nominatim_import_address_models::RawAddressRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Node metadata version assigned to freshly imported entries.
pub const INITIAL_VERSION: u32 = 1;

/// Address attributes allowed to become tags, in emission order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TagKey {
    Housenumber,
    Street,
    Unit,
    Postcode,
    City,
    State,
    Country,
}

impl TagKey {
    /// Every allowed key, in emission order.
    pub const ALL: [Self; 7] = [
        Self::Housenumber,
        Self::Street,
        Self::Unit,
        Self::Postcode,
        Self::City,
        Self::State,
        Self::Country,
    ];

    /// The namespaced OSM key, e.g. `addr:housenumber`.
    #[must_use]
    pub fn osm_key(self) -> String {
        format!("addr:{self}")
    }
}

/// A single `k=v` attribute on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// The `(0, 0)` placeholder used when a record carries no
    /// coordinates.
    #[must_use]
    pub const fn unknown() -> Self {
        Self { lon: 0.0, lat: 0.0 }
    }

    /// Returns `true` for the `(0, 0)` placeholder.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unknown(&self) -> bool {
        self.lon == 0.0 && self.lat == 0.0
    }
}

/// One map-data node ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEntry {
    pub id: i64,
    /// UTC, `YYYY-MM-DDTHH:MM:SSZ`.
    pub timestamp: String,
    pub user: String,
    pub version: u32,
    pub visible: bool,
    pub location: Location,
    pub tags: Vec<Tag>,
}

impl GeoEntry {
    /// Returns the value of the first tag with `key`.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }
}

/// Body of an import request: one record or a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryInput {
    Batch(Vec<RawAddressRecord>),
    Single(Box<RawAddressRecord>),
}

impl EntryInput {
    /// Flattens either shape into a list, preserving order.
    #[must_use]
    pub fn into_records(self) -> Vec<RawAddressRecord> {
        match self {
            Self::Batch(records) => records,
            Self::Single(record) => vec![*record],
        }
    }
}

impl From<RawAddressRecord> for EntryInput {
    fn from(record: RawAddressRecord) -> Self {
        Self::Single(Box::new(record))
    }
}

impl From<Vec<RawAddressRecord>> for EntryInput {
    fn from(records: Vec<RawAddressRecord>) -> Self {
        Self::Batch(records)
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub status: u16,
    pub filename: String,
}

impl ImportResponse {
    #[must_use]
    pub const fn ok(filename: String) -> Self {
        Self {
            status: 200,
            filename,
        }
    }
}
