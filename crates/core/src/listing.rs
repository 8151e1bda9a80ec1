//! Listing enumerations, form normalization and validation.
//!
//! Listing forms arrive as flat `(name, value)` pairs from a multipart body.
//! Field names may use the nested `listing[field]` convention or the bare
//! field name; both resolve to the same field. [`ListingDraft::from_fields`]
//! turns those pairs into a validated, normalized draft that the repository
//! layer writes as-is.

use crate::dates::parse_date;
use crate::error::CoreError;
use crate::types::Timestamp;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Image shown for listings without an uploaded picture.
pub const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1749460396807-b065b6694f02?q=80&w=879&auto=format&fit=crop&ixlib=rb-4.1.0&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D";

/// Maximum length of a listing title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Listing type assigned on create when none is given.
pub const DEFAULT_LISTING_TYPE: &str = "stay";

/// Purpose assigned on create when none is given.
pub const DEFAULT_PURPOSE: &str = "general";

/// Category assigned on create when none is given.
pub const DEFAULT_CATEGORY: &str = "apartment";

/// All valid listing type values.
pub const VALID_LISTING_TYPES: &[&str] = &["stay", "experience", "restaurant"];

/// All valid listing purpose values.
pub const VALID_PURPOSES: &[&str] = &[
    "parking",
    "night-stay",
    "permanent-rental",
    "godowns",
    "tuition-coaching",
    "shops-commercial",
    "co-working",
    "general",
];

/// All valid listing category values.
pub const VALID_CATEGORIES: &[&str] = &[
    "apartment",
    "house",
    "villa",
    "condo",
    "studio",
    "room",
    "office",
    "shop",
    "warehouse",
    "other",
];

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

fn validate_enum(kind: &str, value: &str, valid: &[&str]) -> Result<(), CoreError> {
    if valid.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {kind} '{value}'. Must be one of: {}",
            valid.join(", ")
        )))
    }
}

/// Validate a listing type string.
pub fn validate_listing_type(value: &str) -> Result<(), CoreError> {
    validate_enum("listing type", value, VALID_LISTING_TYPES)
}

/// Validate a listing purpose string.
pub fn validate_purpose(value: &str) -> Result<(), CoreError> {
    validate_enum("purpose", value, VALID_PURPOSES)
}

/// Validate a listing category string.
pub fn validate_category(value: &str) -> Result<(), CoreError> {
    validate_enum("category", value, VALID_CATEGORIES)
}

/// Coerce a submitted price to a number.
///
/// Anything that does not parse to a finite number, including an empty or
/// missing field, becomes `0.0`.
///
/// # Examples
///
/// ```
/// use wanderlust_core::listing::coerce_price;
/// assert_eq!(coerce_price(Some(" 150 ")), 150.0);
/// assert_eq!(coerce_price(Some("cheap")), 0.0);
/// assert_eq!(coerce_price(None), 0.0);
/// ```
pub fn coerce_price(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

/// Resolve the image URL to display, falling back to [`DEFAULT_IMAGE_URL`].
pub fn display_image_url(url: Option<&str>) -> &str {
    match url {
        Some(u) if !u.is_empty() => u,
        _ => DEFAULT_IMAGE_URL,
    }
}

/* --------------------------------------------------------------------------
Form fields
-------------------------------------------------------------------------- */

/// Strip the `listing[...]` wrapper from a form field name.
fn field_key(name: &str) -> &str {
    name.strip_prefix("listing[")
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(name)
}

/// Flat view over submitted form pairs, keyed by normalized field name.
#[derive(Debug, Default, Clone)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Last submitted value for a field, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(name, _)| field_key(name) == key)
            .map(|(_, value)| value.as_str())
    }

    /// Last submitted value, trimmed, with empty strings treated as absent.
    pub fn non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Every submitted value for a field, in submission order.
    ///
    /// `amenities`, `amenities[]` and `listing[amenities]` all count as the
    /// same field, so a scalar submission and a repeated one both produce a
    /// list.
    pub fn all(&self, key: &str) -> Vec<&str> {
        let array_key = format!("{key}[]");
        self.pairs
            .iter()
            .filter(|(name, _)| {
                let k = field_key(name);
                k == key || k == array_key
            })
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// Normalize submitted amenities: comma-separated entries are split, then
/// trimmed, non-empty, de-duplicated, order kept.
pub fn normalize_amenities<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut amenities: Vec<String> = Vec::new();
    for value in values.into_iter().flat_map(|v| v.split(',')) {
        let value = value.trim();
        if !value.is_empty() && !amenities.iter().any(|a| a == value) {
            amenities.push(value.to_string());
        }
    }
    amenities
}

fn parse_coordinate(
    fields: &FormFields,
    key: &str,
    limit: f64,
) -> Result<Option<f64>, CoreError> {
    let Some(raw) = fields.non_empty(key) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(Some(v)),
        _ => Err(CoreError::Validation(format!(
            "Invalid {key} '{raw}'. Must be a number between -{limit} and {limit}"
        ))),
    }
}

fn parse_optional_date(fields: &FormFields, key: &str) -> Result<Option<Timestamp>, CoreError> {
    match fields.non_empty(key) {
        None => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| CoreError::Validation(format!("Invalid {key} '{raw}'"))),
    }
}

fn parse_checkbox(fields: &FormFields, key: &str) -> Option<bool> {
    fields.non_empty(key).map(|v| {
        matches!(
            v.to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        )
    })
}

/* --------------------------------------------------------------------------
ListingDraft
-------------------------------------------------------------------------- */

/// Normalized listing input shared by create and update.
///
/// Enumeration fields are `None` when not submitted: create falls back to
/// the defaults, update keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub location: Option<String>,
    pub country: Option<String>,
    pub listing_type: Option<String>,
    pub purpose: Option<String>,
    pub category: Option<String>,
    pub amenities: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub availability_start: Option<Timestamp>,
    pub availability_end: Option<Timestamp>,
    pub available: Option<bool>,
}

impl ListingDraft {
    /// Build a draft from submitted form fields.
    ///
    /// Fails with [`CoreError::Validation`] when the title is missing or too
    /// long, an enumeration value is unknown, a coordinate is out of range, or
    /// an availability date is unparseable or inverted.
    pub fn from_fields(fields: &FormFields) -> Result<Self, CoreError> {
        let title = fields
            .non_empty("title")
            .ok_or_else(|| CoreError::Validation("Title is required".to_string()))?;
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(CoreError::Validation(format!(
                "Title must be at most {MAX_TITLE_LENGTH} characters"
            )));
        }

        let listing_type = fields.non_empty("type");
        if let Some(ref t) = listing_type {
            validate_listing_type(t)?;
        }
        let purpose = fields.non_empty("purpose");
        if let Some(ref p) = purpose {
            validate_purpose(p)?;
        }
        let category = fields.non_empty("category");
        if let Some(ref c) = category {
            validate_category(c)?;
        }

        let availability_start = parse_optional_date(fields, "availability_start")?;
        let availability_end = parse_optional_date(fields, "availability_end")?;
        if let (Some(start), Some(end)) = (availability_start, availability_end) {
            if end < start {
                return Err(CoreError::Validation(
                    "Availability end must not be before its start".to_string(),
                ));
            }
        }

        Ok(Self {
            title,
            description: fields.non_empty("description"),
            price: coerce_price(fields.get("price")),
            location: fields.non_empty("location"),
            country: fields.non_empty("country"),
            listing_type,
            purpose,
            category,
            amenities: normalize_amenities(fields.all("amenities")),
            latitude: parse_coordinate(fields, "lat", 90.0)?,
            longitude: parse_coordinate(fields, "lng", 180.0)?,
            availability_start,
            availability_end,
            available: parse_checkbox(fields, "available"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    // -- coerce_price --------------------------------------------------------

    #[test]
    fn price_parses_decimals() {
        assert_eq!(coerce_price(Some("99.5")), 99.5);
    }

    #[test]
    fn invalid_price_becomes_zero() {
        assert_eq!(coerce_price(Some("")), 0.0);
        assert_eq!(coerce_price(Some("12abc")), 0.0);
        assert_eq!(coerce_price(Some("NaN")), 0.0);
        assert_eq!(coerce_price(Some("inf")), 0.0);
    }

    // -- FormFields ----------------------------------------------------------

    #[test]
    fn nested_and_bare_names_resolve_to_same_field() {
        let f = fields(&[("listing[title]", "Loft"), ("country", "USA")]);
        assert_eq!(f.get("title"), Some("Loft"));
        assert_eq!(f.get("country"), Some("USA"));
    }

    #[test]
    fn last_value_wins_for_scalars() {
        let f = fields(&[("available", "false"), ("available", "true")]);
        assert_eq!(f.get("available"), Some("true"));
    }

    // -- amenities -----------------------------------------------------------

    #[test]
    fn scalar_amenity_becomes_single_item_list() {
        let f = fields(&[("listing[title]", "A"), ("listing[amenities]", "WiFi")]);
        let draft = ListingDraft::from_fields(&f).unwrap();
        assert_eq!(draft.amenities, vec!["WiFi".to_string()]);
    }

    #[test]
    fn repeated_amenities_become_list() {
        let f = fields(&[
            ("listing[title]", "A"),
            ("amenities", "WiFi"),
            ("amenities", "Kitchen"),
            ("amenities[]", "Parking"),
        ]);
        let draft = ListingDraft::from_fields(&f).unwrap();
        assert_eq!(draft.amenities, vec!["WiFi", "Kitchen", "Parking"]);
    }

    #[test]
    fn amenities_are_trimmed_and_deduplicated() {
        assert_eq!(
            normalize_amenities([" WiFi ", "", "WiFi", "Gym"]),
            vec!["WiFi".to_string(), "Gym".to_string()]
        );
    }

    #[test]
    fn typed_amenities_are_split_on_commas() {
        let f = fields(&[
            ("listing[title]", "A"),
            ("amenities", "WiFi"),
            ("amenities", "Ocean View"),
            ("listing[amenities]", "Hot Tub, Ocean View,,Sauna"),
        ]);
        let draft = ListingDraft::from_fields(&f).unwrap();
        assert_eq!(draft.amenities, vec!["WiFi", "Ocean View", "Hot Tub", "Sauna"]);
    }

    #[test]
    fn no_amenities_gives_empty_list() {
        let draft = ListingDraft::from_fields(&fields(&[("title", "A")])).unwrap();
        assert!(draft.amenities.is_empty());
    }

    // -- ListingDraft --------------------------------------------------------

    #[test]
    fn full_form_is_normalized() {
        let f = fields(&[
            ("listing[title]", " Cozy Beach House "),
            ("listing[description]", "Ocean views"),
            ("listing[price]", "150"),
            ("listing[location]", "Malibu"),
            ("listing[country]", "USA"),
            ("listing[type]", "stay"),
            ("listing[purpose]", "night-stay"),
            ("listing[category]", "house"),
            ("listing[lat]", "34.03"),
            ("listing[lng]", "-118.78"),
            ("listing[availability_start]", "2024-01-01"),
            ("listing[availability_end]", "2024-12-31"),
            ("listing[available]", "on"),
        ]);
        let draft = ListingDraft::from_fields(&f).unwrap();
        assert_eq!(draft.title, "Cozy Beach House");
        assert_eq!(draft.price, 150.0);
        assert_eq!(draft.listing_type.as_deref(), Some("stay"));
        assert_eq!(draft.purpose.as_deref(), Some("night-stay"));
        assert_eq!(draft.category.as_deref(), Some("house"));
        assert_eq!(draft.latitude, Some(34.03));
        assert_eq!(draft.longitude, Some(-118.78));
        assert!(draft.availability_start.is_some());
        assert_eq!(draft.available, Some(true));
    }

    #[test]
    fn missing_optional_fields_are_none() {
        let draft = ListingDraft::from_fields(&fields(&[("title", "A")])).unwrap();
        assert_eq!(draft.description, None);
        assert_eq!(draft.price, 0.0);
        assert_eq!(draft.listing_type, None);
        assert_eq!(draft.available, None);
    }

    #[test]
    fn missing_title_rejected() {
        assert_matches!(
            ListingDraft::from_fields(&fields(&[("price", "10")])),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unknown_type_rejected() {
        assert_matches!(
            ListingDraft::from_fields(&fields(&[("title", "A"), ("type", "castle")])),
            Err(CoreError::Validation(msg)) if msg.contains("castle")
        );
    }

    #[test]
    fn unknown_category_rejected() {
        assert!(
            ListingDraft::from_fields(&fields(&[("title", "A"), ("category", "igloo")])).is_err()
        );
    }

    #[test]
    fn out_of_range_latitude_rejected() {
        assert!(ListingDraft::from_fields(&fields(&[("title", "A"), ("lat", "91")])).is_err());
    }

    #[test]
    fn inverted_availability_rejected() {
        let f = fields(&[
            ("title", "A"),
            ("availability_start", "2024-05-01"),
            ("availability_end", "2024-04-01"),
        ]);
        assert!(ListingDraft::from_fields(&f).is_err());
    }

    #[test]
    fn unchecked_availability_is_false() {
        let f = fields(&[("title", "A"), ("available", "false")]);
        assert_eq!(ListingDraft::from_fields(&f).unwrap().available, Some(false));
    }

    // -- display_image_url ---------------------------------------------------

    #[test]
    fn empty_image_url_falls_back_to_default() {
        assert_eq!(display_image_url(Some("")), DEFAULT_IMAGE_URL);
        assert_eq!(display_image_url(None), DEFAULT_IMAGE_URL);
        assert_eq!(display_image_url(Some("/uploads/a.jpg")), "/uploads/a.jpg");
    }
}
