//! Listing search filter.
//!
//! Every field is optional; supplied fields are combined with logical AND by
//! the repository. Empty query values count as not supplied, and `all` is the
//! "no filter" value for purpose and category.

use crate::dates::parse_date;
use crate::types::Timestamp;

/// Query value meaning "any purpose/category".
pub const FILTER_ALL: &str = "all";

/// Parsed `/listings` query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Case-insensitive substring of `location`.
    pub location: Option<String>,
    /// Case-insensitive substring of `title`.
    pub title: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub listing_type: Option<String>,
    pub purpose: Option<String>,
    pub category: Option<String>,
    /// Matches listings carrying any of these amenities.
    pub amenities: Vec<String>,
    /// Listing must be marked available (set when either date was supplied).
    pub require_available: bool,
    /// Availability window must start on or before this instant.
    pub available_from: Option<Timestamp>,
    /// Availability window must end on or after this instant.
    pub available_until: Option<Timestamp>,
}

impl ListingFilter {
    /// Build a filter from raw query pairs, preserving repeated keys.
    ///
    /// Unparseable price bounds and dates are ignored rather than matching
    /// nothing; a supplied-but-unparseable date still requires availability.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let last = |key: &str| -> Option<String> {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let not_all = |value: Option<String>| value.filter(|v| v != FILTER_ALL);
        let price = |key: &str| {
            last(key)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|p| p.is_finite())
        };

        let amenities = crate::listing::normalize_amenities(
            pairs
                .iter()
                .filter(|(k, _)| k == "amenities" || k == "amenities[]")
                .map(|(_, v)| v.as_str()),
        );

        let start_raw = last("startDate");
        let end_raw = last("endDate");

        Self {
            location: last("location"),
            title: last("q"),
            min_price: price("minPrice"),
            max_price: price("maxPrice"),
            listing_type: last("type"),
            purpose: not_all(last("purpose")),
            category: not_all(last("category")),
            amenities,
            require_available: start_raw.is_some() || end_raw.is_some(),
            available_from: start_raw.as_deref().and_then(parse_date),
            available_until: end_raw.as_deref().and_then(parse_date),
        }
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Escape `%`, `_` and `\` so user text is matched literally by `ILIKE`.
///
/// # Examples
///
/// ```
/// use wanderlust_core::filter::like_pattern;
/// assert_eq!(like_pattern("new york"), "%new york%");
/// assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
/// ```
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_query_is_empty_filter() {
        assert!(ListingFilter::from_query_pairs(&[]).is_empty());
    }

    #[test]
    fn blank_values_are_ignored() {
        let f = ListingFilter::from_query_pairs(&pairs(&[
            ("location", ""),
            ("q", "  "),
            ("minPrice", ""),
            ("startDate", ""),
        ]));
        assert!(f.is_empty());
    }

    #[test]
    fn text_and_price_fields_are_parsed() {
        let f = ListingFilter::from_query_pairs(&pairs(&[
            ("location", "Malibu"),
            ("q", "beach"),
            ("minPrice", "100"),
            ("maxPrice", "175.5"),
            ("type", "stay"),
        ]));
        assert_eq!(f.location.as_deref(), Some("Malibu"));
        assert_eq!(f.title.as_deref(), Some("beach"));
        assert_eq!(f.min_price, Some(100.0));
        assert_eq!(f.max_price, Some(175.5));
        assert_eq!(f.listing_type.as_deref(), Some("stay"));
        assert!(!f.require_available);
    }

    #[test]
    fn all_disables_purpose_and_category() {
        let f = ListingFilter::from_query_pairs(&pairs(&[
            ("purpose", "all"),
            ("category", "all"),
        ]));
        assert!(f.is_empty());

        let f = ListingFilter::from_query_pairs(&pairs(&[("category", "villa")]));
        assert_eq!(f.category.as_deref(), Some("villa"));
    }

    #[test]
    fn repeated_amenities_are_collected() {
        let f = ListingFilter::from_query_pairs(&pairs(&[
            ("amenities", "WiFi"),
            ("amenities", "Gym"),
        ]));
        assert_eq!(f.amenities, vec!["WiFi".to_string(), "Gym".to_string()]);
    }

    #[test]
    fn scalar_amenity_is_a_one_item_list() {
        let f = ListingFilter::from_query_pairs(&pairs(&[("amenities", "Parking")]));
        assert_eq!(f.amenities, vec!["Parking".to_string()]);
    }

    #[test]
    fn any_date_requires_availability() {
        let f = ListingFilter::from_query_pairs(&pairs(&[("endDate", "2024-06-01")]));
        assert!(f.require_available);
        assert!(f.available_from.is_none());
        assert!(f.available_until.is_some());
    }

    #[test]
    fn unparseable_bounds_are_dropped() {
        let f = ListingFilter::from_query_pairs(&pairs(&[
            ("minPrice", "cheap"),
            ("startDate", "someday"),
        ]));
        assert_eq!(f.min_price, None);
        assert!(f.require_available);
        assert_eq!(f.available_from, None);
    }

    #[test]
    fn like_pattern_wraps_plain_text() {
        assert_eq!(like_pattern("loft"), "%loft%");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
