//! Address tagging boundary.
//!
//! An [`AddressTagger`] turns a cleaned, lower-case address string into
//! labeled components plus a classification. The normalizer only ever
//! talks to this trait, so a statistical tagger can replace the
//! [`RuleTagger`] without touching anything downstream.

use nominatim_import_address_models::{
    AddressLabel, AddressType, LabeledAddressComponents, TaggedAddress,
};

use crate::clean::clean_address;
use crate::config::NormalizationConfig;
use crate::lexicon::designators::{self, COUNTRY_NAMES};
use crate::lexicon::{SuffixLexicon, states};
use crate::suffix::expand_suffix;

/// Splits a cleaned address string into labeled components.
pub trait AddressTagger: Send + Sync {
    /// Tags `text`, which has already been through
    /// [`clean_address`]. Input the tagger cannot make sense of is
    /// reported as [`AddressType::Ambiguous`], never as an error.
    fn tag(&self, text: &str) -> TaggedAddress;
}

/// Deterministic rule-based tagger for US addresses.
///
/// Works outside-in: postal code, country, and state are peeled off the
/// end, the house number, directionals, and street are read from the
/// front, and whatever is left in between is the place name.
///
/// Known limitations: a street name that itself contains a suffix word
/// (`"lake shore dr"`) is split at the first suffix, and a city that
/// starts with a full directional word can be read as a
/// post-directional.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTagger;

fn starts_with_digit(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_zip(token: &str) -> bool {
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    match token.split_once('-') {
        Some((five, four)) => {
            five.len() == 5 && four.len() == 4 && all_digits(five) && all_digits(four)
        }
        None => (token.len() == 5 || token.len() == 9) && all_digits(token),
    }
}

fn is_abbreviated_directional(token: &str) -> bool {
    token.len() <= 2 && designators::is_directional(token)
}

/// Number of trailing tokens forming a country name, if any.
fn country_len(tokens: &[&str]) -> Option<usize> {
    COUNTRY_NAMES
        .iter()
        .map(|name| name.split(' ').collect::<Vec<_>>())
        .find(|words| {
            tokens.len() > words.len() && tokens[tokens.len() - words.len()..] == words[..]
        })
        .map(|words| words.len())
}

/// Collects `(start token index, label, value)` triples and sorts them
/// back into parse order at the end.
struct Labels(Vec<(usize, AddressLabel, String)>);

impl Labels {
    fn push(&mut self, start: usize, label: AddressLabel, tokens: &[&str]) {
        self.0.push((start, label, tokens.join(" ")));
    }

    fn has(&self, label: AddressLabel) -> bool {
        self.0.iter().any(|(_, l, _)| *l == label)
    }

    fn into_components(mut self) -> LabeledAddressComponents {
        self.0.sort_by_key(|(start, _, _)| *start);
        self.0.into_iter().map(|(_, l, v)| (l, v)).collect()
    }
}

impl RuleTagger {
    /// Peels postal code, country, and state off the end of `tokens`.
    /// Returns the index where the remaining prefix ends.
    fn tag_trailing(tokens: &[&str], labels: &mut Labels) -> usize {
        let lexicon = SuffixLexicon::usps();
        let mut end = tokens.len();
        let mut trailer_seen = false;

        loop {
            if end > 1 && !labels.has(AddressLabel::ZipCode) && is_zip(tokens[end - 1]) {
                labels.push(end - 1, AddressLabel::ZipCode, &tokens[end - 1..end]);
                end -= 1;
                trailer_seen = true;
                continue;
            }
            if !labels.has(AddressLabel::CountryName)
                && let Some(n) = country_len(&tokens[..end])
            {
                labels.push(end - n, AddressLabel::CountryName, &tokens[end - n..end]);
                end -= n;
                trailer_seen = true;
                continue;
            }
            break;
        }

        for n in (1..=states::MAX_NAME_WORDS).rev() {
            if n < end && states::by_name(&tokens[end - n..end].join(" ")).is_some() {
                labels.push(end - n, AddressLabel::StateName, &tokens[end - n..end]);
                return end - n;
            }
        }

        if end > 1 {
            let last = tokens[end - 1];
            // "ct", "la", "pr" are also street suffixes; only trust them as
            // a state when something trailed them.
            if last.len() == 2
                && states::by_abbreviation(last).is_some()
                && (trailer_seen || !lexicon.is_suffix(last))
            {
                labels.push(end - 1, AddressLabel::StateName, &tokens[end - 1..end]);
                return end - 1;
            }
        }

        // Unknown states are still labeled so normalization can reject
        // them: any free two-letter word, or any free word right before a
        // postal code or country.
        if end > 2 {
            let last = tokens[end - 1];
            let free_word = last.chars().all(|c| c.is_ascii_alphabetic())
                && !lexicon.is_suffix(last)
                && !designators::is_directional(last)
                && !designators::is_occupancy_type(last);
            if free_word && (last.len() == 2 || trailer_seen) {
                labels.push(end - 1, AddressLabel::StateName, &tokens[end - 1..end]);
                return end - 1;
            }
        }

        end
    }

    /// Tags `po box 123 ...`. Returns `None` if `tokens` is not a box.
    fn tag_box(tokens: &[&str], end: usize, labels: &mut Labels) -> Option<()> {
        let box_len = [&["po", "box"][..], &["p", "o", "box"][..], &["pobox"][..], &["box"][..]]
            .iter()
            .find(|words| end > words.len() && tokens[..words.len()] == words[..])
            .map(|words| words.len())?;

        labels.push(0, AddressLabel::UspsBoxType, &tokens[..box_len]);
        labels.push(box_len, AddressLabel::UspsBoxId, &tokens[box_len..=box_len]);
        if box_len + 1 < end {
            labels.push(box_len + 1, AddressLabel::PlaceName, &tokens[box_len + 1..end]);
        }
        Some(())
    }

    /// Tags `<street> and <street> [place]`. Returns `None` if `tokens`
    /// is not an intersection.
    fn tag_intersection(tokens: &[&str], end: usize, labels: &mut Labels) -> Option<()> {
        if starts_with_digit(tokens.first()?) {
            return None;
        }
        let sep = tokens[..end].iter().position(|t| *t == "and")?;
        if sep == 0 || sep + 1 >= end {
            return None;
        }

        let lexicon = SuffixLexicon::usps();

        let first = &tokens[..sep];
        match first.split_last() {
            Some((suffix, name)) if !name.is_empty() && lexicon.is_suffix(suffix) => {
                labels.push(0, AddressLabel::StreetName, name);
                labels.push(
                    sep - 1,
                    AddressLabel::StreetNamePostType,
                    std::slice::from_ref(suffix),
                );
            }
            _ => labels.push(0, AddressLabel::StreetName, first),
        }

        labels.push(sep, AddressLabel::IntersectionSeparator, &tokens[sep..=sep]);

        let second_start = sep + 1;
        let mut pos = second_start;
        match (second_start + 1..end).find(|&i| lexicon.is_suffix(tokens[i])) {
            Some(i) => {
                labels.push(second_start, AddressLabel::SecondStreetName, &tokens[second_start..i]);
                labels.push(i, AddressLabel::SecondStreetNamePostType, &tokens[i..=i]);
                pos = i + 1;
            }
            None => {
                labels.push(second_start, AddressLabel::SecondStreetName, &tokens[pos..=pos]);
                pos += 1;
            }
        }

        if pos < end {
            labels.push(pos, AddressLabel::PlaceName, &tokens[pos..end]);
        }
        Some(())
    }

    fn tag_street(tokens: &[&str], end: usize, labels: &mut Labels) {
        let lexicon = SuffixLexicon::usps();
        let mut pos = 0;

        if pos < end && starts_with_digit(tokens[pos]) {
            labels.push(pos, AddressLabel::AddressNumber, &tokens[pos..=pos]);
            pos += 1;
        }

        if pos + 1 < end && designators::is_directional(tokens[pos]) {
            labels.push(pos, AddressLabel::StreetNamePreDirectional, &tokens[pos..=pos]);
            pos += 1;
        }

        let mut street_typed = false;

        if let Some(n) = designators::pre_type_len(&tokens[pos..end])
            && pos + n < end
            && starts_with_digit(tokens[pos + n])
        {
            labels.push(pos, AddressLabel::StreetNamePreType, &tokens[pos..pos + n]);
            pos += n;
            labels.push(pos, AddressLabel::StreetName, &tokens[pos..=pos]);
            pos += 1;
            street_typed = true;
        } else if pos < end {
            let street_start = pos;
            let unit_start = (street_start..end)
                .find(|&i| designators::is_occupancy_type(tokens[i]))
                .unwrap_or(end);

            match (street_start + 1..unit_start).find(|&i| lexicon.is_suffix(tokens[i])) {
                Some(i) => {
                    labels.push(street_start, AddressLabel::StreetName, &tokens[street_start..i]);
                    labels.push(i, AddressLabel::StreetNamePostType, &tokens[i..=i]);
                    pos = i + 1;
                    street_typed = true;
                }
                None => {
                    labels.push(pos, AddressLabel::StreetName, &tokens[pos..=pos]);
                    pos += 1;
                }
            }
        }

        if street_typed && pos < end {
            let token = tokens[pos];
            let followed_by_unit_or_end =
                pos + 1 == end || designators::is_occupancy_type(tokens[pos + 1]);
            if is_abbreviated_directional(token)
                || (designators::is_directional(token) && followed_by_unit_or_end)
            {
                labels.push(pos, AddressLabel::StreetNamePostDirectional, &tokens[pos..=pos]);
                pos += 1;
            }
        }

        if pos + 1 < end && designators::is_occupancy_type(tokens[pos]) {
            labels.push(pos, AddressLabel::OccupancyType, &tokens[pos..=pos]);
            labels.push(pos + 1, AddressLabel::OccupancyIdentifier, &tokens[pos + 1..pos + 2]);
            pos += 2;
        } else if pos + 1 < end && starts_with_digit(tokens[pos]) {
            // A bare number between the street and the city is a unit
            // whose "#" was stripped during cleaning.
            labels.push(pos, AddressLabel::OccupancyIdentifier, &tokens[pos..=pos]);
            pos += 1;
        }

        if pos < end {
            labels.push(pos, AddressLabel::PlaceName, &tokens[pos..end]);
        }
    }
}

impl AddressTagger for RuleTagger {
    fn tag(&self, text: &str) -> TaggedAddress {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut labels = Labels(Vec::new());

        if tokens.is_empty() {
            return TaggedAddress {
                components: LabeledAddressComponents::new(),
                address_type: AddressType::Ambiguous,
            };
        }

        let end = Self::tag_trailing(&tokens, &mut labels);

        let address_type = if Self::tag_box(&tokens, end, &mut labels).is_some() {
            AddressType::PoBox
        } else if Self::tag_intersection(&tokens, end, &mut labels).is_some() {
            AddressType::Intersection
        } else {
            Self::tag_street(&tokens, end, &mut labels);
            if labels.has(AddressLabel::AddressNumber) && labels.has(AddressLabel::StreetName) {
                AddressType::StreetAddress
            } else {
                AddressType::Ambiguous
            }
        };

        TaggedAddress {
            components: labels.into_components(),
            address_type,
        }
    }
}

/// Cleans `raw`, tags it, and (when enabled) expands the street suffix.
///
/// The expanded suffix replaces the tagger's `StreetNamePostType` value
/// in place; all other components are stored exactly as tagged.
#[must_use]
pub fn parse_address(
    raw: &str,
    tagger: &dyn AddressTagger,
    lexicon: &SuffixLexicon,
    config: &NormalizationConfig,
) -> TaggedAddress {
    let cleaned = clean_address(raw);
    let mut tagged = tagger.tag(&cleaned);

    if config.expand_street_suffix
        && let Some(post_type) = tagged.components.get(AddressLabel::StreetNamePostType)
    {
        let expanded = expand_suffix(post_type, lexicon, config.suffix_threshold);
        tagged
            .components
            .insert(AddressLabel::StreetNamePostType, expanded);
    }

    log::debug!(
        "parse_address: {cleaned:?} -> {} ({} components)",
        tagged.address_type,
        tagged.components.len()
    );

    tagged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> TaggedAddress {
        RuleTagger.tag(text)
    }

    fn pairs(tagged: &TaggedAddress) -> Vec<(AddressLabel, &str)> {
        tagged.components.iter().collect()
    }

    #[test]
    fn tags_full_street_address() {
        let tagged = tag("123 test st testville tx 12345 usa");
        assert_eq!(tagged.address_type, AddressType::StreetAddress);
        assert_eq!(
            pairs(&tagged),
            vec![
                (AddressLabel::AddressNumber, "123"),
                (AddressLabel::StreetName, "test"),
                (AddressLabel::StreetNamePostType, "st"),
                (AddressLabel::PlaceName, "testville"),
                (AddressLabel::StateName, "tx"),
                (AddressLabel::ZipCode, "12345"),
                (AddressLabel::CountryName, "usa"),
            ]
        );
    }

    #[test]
    fn tags_country_before_zip() {
        let tagged = tag("123 test st testville tx us 12345");
        assert_eq!(tagged.components.get(AddressLabel::CountryName), Some("us"));
        assert_eq!(tagged.components.get(AddressLabel::ZipCode), Some("12345"));
        assert_eq!(tagged.components.get(AddressLabel::StateName), Some("tx"));
        assert_eq!(tagged.components.get(AddressLabel::PlaceName), Some("testville"));
    }

    #[test]
    fn tags_multi_word_state_and_city() {
        let tagged = tag("500 n main st apt 4b winston-salem north carolina 271011234");
        assert_eq!(
            pairs(&tagged),
            vec![
                (AddressLabel::AddressNumber, "500"),
                (AddressLabel::StreetNamePreDirectional, "n"),
                (AddressLabel::StreetName, "main"),
                (AddressLabel::StreetNamePostType, "st"),
                (AddressLabel::OccupancyType, "apt"),
                (AddressLabel::OccupancyIdentifier, "4b"),
                (AddressLabel::PlaceName, "winston-salem"),
                (AddressLabel::StateName, "north carolina"),
                (AddressLabel::ZipCode, "271011234"),
            ]
        );
    }

    #[test]
    fn tags_post_directional() {
        let tagged = tag("1600 pennsylvania ave nw washington dc 20500");
        assert_eq!(
            tagged.components.get(AddressLabel::StreetNamePostDirectional),
            Some("nw")
        );
        assert_eq!(tagged.components.get(AddressLabel::PlaceName), Some("washington"));
        assert_eq!(tagged.components.get(AddressLabel::StateName), Some("dc"));
    }

    #[test]
    fn tags_route_pre_type() {
        let tagged = tag("4200 county road 5 springfield il");
        assert_eq!(
            tagged.components.get(AddressLabel::StreetNamePreType),
            Some("county road")
        );
        assert_eq!(tagged.components.get(AddressLabel::StreetName), Some("5"));
        assert_eq!(tagged.components.get(AddressLabel::PlaceName), Some("springfield"));
    }

    #[test]
    fn tags_street_without_suffix() {
        let tagged = tag("1 broadway new york ny 10004");
        assert_eq!(tagged.address_type, AddressType::StreetAddress);
        assert_eq!(tagged.components.get(AddressLabel::StreetName), Some("broadway"));
        assert_eq!(tagged.components.get(AddressLabel::PlaceName), Some("new york"));
        assert_eq!(tagged.components.get(AddressLabel::StateName), Some("ny"));
    }

    #[test]
    fn tags_bare_unit_number() {
        let tagged = tag("123 main st 12 springfield il");
        assert_eq!(
            tagged.components.get(AddressLabel::OccupancyIdentifier),
            Some("12")
        );
        assert_eq!(tagged.components.get(AddressLabel::OccupancyType), None);
    }

    #[test]
    fn suffix_like_state_needs_trailer() {
        // "ct" ends the string with nothing after it: it is the suffix.
        let tagged = tag("12 oak ct");
        assert_eq!(tagged.components.get(AddressLabel::StateName), None);
        assert_eq!(tagged.components.get(AddressLabel::StreetNamePostType), Some("ct"));

        let tagged = tag("12 oak st hartford ct 06103");
        assert_eq!(tagged.components.get(AddressLabel::StateName), Some("ct"));
    }

    #[test]
    fn tags_unknown_state_before_zip() {
        let tagged = tag("1 main st testville atlantis 12345");
        assert_eq!(tagged.components.get(AddressLabel::StateName), Some("atlantis"));
        assert_eq!(tagged.components.get(AddressLabel::PlaceName), Some("testville"));
        assert_eq!(tagged.components.get(AddressLabel::ZipCode), Some("12345"));
    }

    #[test]
    fn tags_unknown_two_letter_state() {
        let tagged = tag("1 main st testville zz");
        assert_eq!(tagged.components.get(AddressLabel::StateName), Some("zz"));

        // A trailing suffix or directional is never taken for a state.
        assert_eq!(tag("12 elm dr").components.get(AddressLabel::StateName), None);
        assert_eq!(tag("12 elm st nw").components.get(AddressLabel::StateName), None);
    }

    #[test]
    fn tags_po_box() {
        let tagged = tag("po box 123 austin tx 78701");
        assert_eq!(tagged.address_type, AddressType::PoBox);
        assert_eq!(tagged.components.get(AddressLabel::UspsBoxType), Some("po box"));
        assert_eq!(tagged.components.get(AddressLabel::UspsBoxId), Some("123"));
        assert_eq!(tagged.components.get(AddressLabel::PlaceName), Some("austin"));
    }

    #[test]
    fn tags_intersection() {
        let tagged = tag("main st and 1st ave chicago il");
        assert_eq!(tagged.address_type, AddressType::Intersection);
        assert_eq!(
            pairs(&tagged),
            vec![
                (AddressLabel::StreetName, "main"),
                (AddressLabel::StreetNamePostType, "st"),
                (AddressLabel::IntersectionSeparator, "and"),
                (AddressLabel::SecondStreetName, "1st"),
                (AddressLabel::SecondStreetNamePostType, "ave"),
                (AddressLabel::PlaceName, "chicago"),
                (AddressLabel::StateName, "il"),
            ]
        );
    }

    #[test]
    fn classifies_missing_house_number_as_ambiguous() {
        assert_eq!(tag("main st springfield il").address_type, AddressType::Ambiguous);
        assert_eq!(tag("").address_type, AddressType::Ambiguous);
        assert!(tag("").components.is_empty());
    }

    #[test]
    fn parse_address_expands_suffix() {
        let tagged = parse_address(
            "123 Test St., Testville, TX 12345",
            &RuleTagger,
            SuffixLexicon::usps(),
            &NormalizationConfig::default(),
        );
        assert_eq!(
            tagged.components.get(AddressLabel::StreetNamePostType),
            Some("street")
        );
        assert_eq!(tagged.components.get(AddressLabel::StreetName), Some("test"));
    }

    #[test]
    fn parse_address_can_skip_expansion() {
        let config = NormalizationConfig {
            expand_street_suffix: false,
            ..NormalizationConfig::default()
        };
        let tagged = parse_address(
            "123 Test St, Testville, TX",
            &RuleTagger,
            SuffixLexicon::usps(),
            &config,
        );
        assert_eq!(
            tagged.components.get(AddressLabel::StreetNamePostType),
            Some("st")
        );
    }
}
