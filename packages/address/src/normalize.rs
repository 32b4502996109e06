//! Composite field construction from tagged components.
//!
//! [`normalize`] reads a [`LabeledAddressComponents`] snapshot and derives
//! the canonical string forms used downstream:
//! - `FullStreetName`: `"N Main Street"`
//! - `StreetNumAndName`: `"500 N Main Street"`
//! - `SecondaryAddress`: `"Apt 4B"` / `"#12"`
//! - `FullAddress`: `"500 N Main Street, Apt 4B, Springfield, IL 62701"`
//! - `FullSearchable`: `FullAddress` without punctuation
//! - `OsmSearchable`: `FullAddress` without the unit
//!
//! The input is never modified and every output is a pure function of it
//! (plus the static state tables), so normalizing the same snapshot twice
//! always yields the same strings.

use nominatim_import_address_models::{AddressLabel, LabeledAddressComponents, NormalizedAddress};

use crate::lexicon::states;
use crate::text::{strip_punctuation, title_case};

/// Errors from [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The state is neither a known full name nor a known abbreviation.
    #[error("Unrecognized state: {state:?}")]
    UnrecognizedState {
        /// The state value as tagged.
        state: String,
    },

    /// A component needed to build the derived fields is absent.
    #[error("Missing address component: {label}")]
    MissingComponent {
        /// The missing label.
        label: AddressLabel,
    },
}

fn require(
    components: &LabeledAddressComponents,
    label: AddressLabel,
) -> Result<&str, NormalizeError> {
    components
        .get_non_empty(label)
        .map(str::trim)
        .ok_or(NormalizeError::MissingComponent { label })
}

/// Reformats a 9-digit postal code as `NNNNN-NNNN`. Anything else is
/// returned unchanged.
#[must_use]
pub fn format_zip(zip: &str) -> String {
    if zip.len() == 9 && zip.chars().all(|c| c.is_ascii_digit()) {
        format!("{}-{}", &zip[..5], &zip[5..])
    } else {
        zip.to_string()
    }
}

/// Resolves a tagged state value to its numeric code.
///
/// Values longer than two characters are treated as full names
/// (matched after title-casing, ignoring case); shorter values are
/// upper-cased and treated as abbreviations.
///
/// # Errors
///
/// Returns [`NormalizeError::UnrecognizedState`] if the value is in
/// neither table.
pub fn state_code(state: &str) -> Result<u8, NormalizeError> {
    let trimmed = state.trim();
    let code = if trimmed.chars().count() > 2 {
        states::by_name(&title_case(trimmed)).map(|s| s.code)
    } else {
        states::code_for_abbreviation(&trimmed.to_uppercase())
    };

    code.ok_or_else(|| NormalizeError::UnrecognizedState {
        state: state.to_string(),
    })
}

/// Joins the present street parts with single spaces.
///
/// Directionals are upper-cased, types and the base name title-cased.
/// A base name starting with a digit (`"5th"`) is left as tagged.
#[must_use]
pub fn build_street_name(components: &LabeledAddressComponents) -> String {
    let part = |label| components.get_non_empty(label).map(str::trim);

    let name = part(AddressLabel::StreetName).map(|n| {
        if n.starts_with(|c: char| c.is_ascii_digit()) {
            n.to_string()
        } else {
            title_case(n)
        }
    });

    [
        part(AddressLabel::StreetNamePreDirectional).map(str::to_uppercase),
        part(AddressLabel::StreetNamePreType).map(title_case),
        name,
        part(AddressLabel::StreetNamePostType).map(title_case),
        part(AddressLabel::StreetNamePostDirectional).map(str::to_uppercase),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .trim()
    .to_string()
}

/// Builds the unit designator: `"<Type> <Id>"` or `"#<Id>"`,
/// title-cased. `None` when there is no occupancy identifier.
#[must_use]
pub fn build_secondary(components: &LabeledAddressComponents) -> Option<String> {
    let identifier = components
        .get_non_empty(AddressLabel::OccupancyIdentifier)?
        .trim();

    let designator = match components.get_non_empty(AddressLabel::OccupancyType) {
        Some(kind) => format!("{} {identifier}", kind.trim()),
        None => format!("#{identifier}"),
    };

    Some(title_case(&designator))
}

/// `"<street>, [<unit>, ][<City>, ]<STATE>[ <ZIP>]"`, trimmed.
fn compose_address(
    street_num_and_name: &str,
    secondary: Option<&str>,
    city: Option<&str>,
    state: &str,
    zip: Option<&str>,
) -> String {
    let mut out = format!("{street_num_and_name}, ");
    for part in [secondary, city].into_iter().flatten() {
        out.push_str(part);
        out.push_str(", ");
    }
    out.push_str(state);
    if let Some(zip) = zip {
        out.push(' ');
        out.push_str(zip);
    }
    out.trim().to_string()
}

/// Derives all composite fields from a tagged address.
///
/// # Errors
///
/// * [`NormalizeError::MissingComponent`] if `StateName`, `StreetName`,
///   or `AddressNumber` is absent
/// * [`NormalizeError::UnrecognizedState`] if the state is unknown
pub fn normalize(
    components: &LabeledAddressComponents,
) -> Result<NormalizedAddress, NormalizeError> {
    let zip_code = components
        .get_non_empty(AddressLabel::ZipCode)
        .map(|z| format_zip(z.trim()));

    let state = require(components, AddressLabel::StateName)?;
    let state_code = state_code(state)?;

    require(components, AddressLabel::StreetName)?;
    let full_street_name = build_street_name(components);

    let number = require(components, AddressLabel::AddressNumber)?;
    let street_num_and_name = format!("{} {full_street_name}", number.to_uppercase());

    let secondary_address = build_secondary(components);

    let city = components
        .get_non_empty(AddressLabel::PlaceName)
        .map(|c| title_case(c.trim()));
    let state_upper = state.to_uppercase();

    let full_address = compose_address(
        &street_num_and_name,
        secondary_address.as_deref(),
        city.as_deref(),
        &state_upper,
        zip_code.as_deref(),
    );
    let full_searchable = strip_punctuation(&full_address).trim().to_string();
    let osm_searchable = compose_address(
        &street_num_and_name,
        None,
        city.as_deref(),
        &state_upper,
        zip_code.as_deref(),
    );

    Ok(NormalizedAddress {
        components: components.clone(),
        zip_code,
        state_code,
        full_street_name,
        street_num_and_name,
        secondary_address,
        full_address,
        full_searchable,
        osm_searchable,
    })
}
