//! Listing pages: index with filters, detail, create/edit forms, map.

use maud::{html, Markup};
use reqwest::Url;
use wanderlust_core::filter::{ListingFilter, FILTER_ALL};
use wanderlust_core::listing::{
    display_image_url, VALID_CATEGORIES, VALID_LISTING_TYPES, VALID_PURPOSES,
};
use wanderlust_db::models::listing::Listing;
use wanderlust_db::models::review::ReviewWithAuthor;

use super::{format_date, format_price, layout};
use crate::middleware::context::ViewContext;

/// Amenities offered as filter checkboxes and form suggestions.
pub const COMMON_AMENITIES: &[&str] = &[
    "WiFi",
    "Kitchen",
    "Parking",
    "Pool",
    "Gym",
    "Fireplace",
    "Air Conditioning",
    "Pet Friendly",
];

/// `night-stay` -> `Night stay`.
fn humanize(value: &str) -> String {
    let spaced = value.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn stars(rating: f64) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

/// Compact card used by the index and "my listings" pages.
pub fn listing_card(listing: &Listing) -> Markup {
    html! {
        a.listing-card href={ "/listings/" (listing.id) } {
            img src=(display_image_url(listing.image_url.as_deref())) alt=(listing.title);
            div.card-body {
                h3 { (listing.title) }
                @if let Some(location) = &listing.location {
                    p.location { (location) @if let Some(country) = &listing.country { ", " (country) } }
                }
                p.price { "$" (format_price(listing.price)) " / night" }
                @if listing.total_reviews > 0 {
                    p.rating { (stars(listing.average_rating)) " " (listing.average_rating) " (" (listing.total_reviews) ")" }
                }
            }
        }
    }
}

/* --------------------------------------------------------------------------
Index
-------------------------------------------------------------------------- */

fn filter_form(filter: &ListingFilter) -> Markup {
    let selected_type = filter.listing_type.as_deref().unwrap_or("");
    let selected_purpose = filter.purpose.as_deref().unwrap_or(FILTER_ALL);
    let selected_category = filter.category.as_deref().unwrap_or(FILTER_ALL);

    html! {
        form.filters method="get" action="/listings" {
            input type="search" name="q" placeholder="Search titles" value=[filter.title.as_deref()];
            input type="text" name="location" placeholder="Location" value=[filter.location.as_deref()];
            input type="number" name="minPrice" min="0" placeholder="Min price" value=[filter.min_price];
            input type="number" name="maxPrice" min="0" placeholder="Max price" value=[filter.max_price];
            select name="type" {
                option value="" selected[selected_type.is_empty()] { "Any type" }
                @for t in VALID_LISTING_TYPES {
                    option value=(t) selected[selected_type == *t] { (humanize(t)) }
                }
            }
            select name="purpose" {
                option value=(FILTER_ALL) selected[selected_purpose == FILTER_ALL] { "Any purpose" }
                @for p in VALID_PURPOSES {
                    option value=(p) selected[selected_purpose == *p] { (humanize(p)) }
                }
            }
            select name="category" {
                option value=(FILTER_ALL) selected[selected_category == FILTER_ALL] { "Any category" }
                @for c in VALID_CATEGORIES {
                    option value=(c) selected[selected_category == *c] { (humanize(c)) }
                }
            }
            fieldset.amenities {
                legend { "Amenities" }
                @for a in COMMON_AMENITIES {
                    label {
                        input type="checkbox" name="amenities" value=(a)
                            checked[filter.amenities.iter().any(|x| x == a)];
                        " " (a)
                    }
                }
            }
            label { "From " input type="date" name="startDate" value=[filter.available_from.as_ref().map(format_date)]; }
            label { "Until " input type="date" name="endDate" value=[filter.available_until.as_ref().map(format_date)]; }
            button type="submit" { "Search" }
            a href="/listings" { "Clear" }
        }
    }
}

pub fn index(ctx: &ViewContext, listings: &[Listing], filter: &ListingFilter) -> Markup {
    layout(
        ctx,
        "Explore",
        html! {
            h1 { "Explore listings" }
            (filter_form(filter))
            @if listings.is_empty() {
                p.empty {
                    @if filter.is_empty() { "No listings yet." } @else { "No listings match your filters." }
                }
            }
            div.listing-grid {
                @for listing in listings {
                    (listing_card(listing))
                }
            }
        },
    )
}

/* --------------------------------------------------------------------------
Show
-------------------------------------------------------------------------- */

/// Detail page data beyond the listing row itself.
pub struct ShowPage<'a> {
    pub listing: &'a Listing,
    pub reviews: &'a [ReviewWithAuthor],
    /// Show edit and delete controls.
    pub can_manage: bool,
    pub maps_api_key: Option<&'a str>,
}

pub fn show(ctx: &ViewContext, page: &ShowPage<'_>) -> Markup {
    let listing = page.listing;
    let current_user_id = ctx.current_user.as_ref().map(|u| u.id);
    let already_reviewed = current_user_id
        .is_some_and(|id| page.reviews.iter().any(|r| r.user_id == id));

    layout(
        ctx,
        &listing.title,
        html! {
            article.listing {
                h1 { (listing.title) }
                img.hero src=(display_image_url(listing.image_url.as_deref())) alt=(listing.title);
                p.meta {
                    span.type { (humanize(&listing.listing_type)) }
                    " · " span.category { (humanize(&listing.category)) }
                    " · " span.purpose { (humanize(&listing.purpose)) }
                }
                @if let Some(description) = &listing.description {
                    p.description { (description) }
                }
                p.price { "$" (format_price(listing.price)) " / night" }
                @if let Some(location) = &listing.location {
                    p.location {
                        (location)
                        @if let Some(country) = &listing.country { ", " (country) }
                        " " a href={ "/listings/" (listing.id) "/map" } { "View map" }
                    }
                }
                @if !listing.amenities.is_empty() {
                    ul.amenities {
                        @for amenity in &listing.amenities { li { (amenity) } }
                    }
                }
                p.availability {
                    @if !listing.available {
                        "Currently unavailable"
                    } @else if let (Some(start), Some(end)) = (&listing.availability_start, &listing.availability_end) {
                        "Available " (format_date(start)) " to " (format_date(end))
                    } @else {
                        "Available"
                    }
                }
                p.rating {
                    @if listing.total_reviews > 0 {
                        (stars(listing.average_rating)) " " (listing.average_rating)
                        " from " (listing.total_reviews)
                        @if listing.total_reviews == 1 { " review" } @else { " reviews" }
                    } @else {
                        "No reviews yet"
                    }
                }

                @if page.can_manage {
                    div.actions {
                        a.btn href={ "/listings/" (listing.id) "/edit" } { "Edit" }
                        form method="post" action={ "/listings/" (listing.id) "?_method=DELETE" } {
                            button.btn-danger type="submit" { "Delete" }
                        }
                    }
                }
            }

            @if ctx.is_signed_in() {
                section.booking {
                    h2 { "Book this place" }
                    form method="post" action="/bookings" {
                        input type="hidden" name="listingId" value=(listing.id);
                        label { "Check in " input type="date" name="startDate" required; }
                        label { "Check out " input type="date" name="endDate" required; }
                        button type="submit" { "Reserve" }
                    }
                }
            } @else {
                p { a href="/login" { "Log in" } " to book or review this listing." }
            }

            section.reviews {
                h2 { "Reviews" }
                @if ctx.is_signed_in() && !already_reviewed {
                    form.review-form method="post" action={ "/listings/" (listing.id) "/reviews" } {
                        label for="rating" { "Rating" }
                        select id="rating" name="rating" {
                            @for r in (1..=5).rev() {
                                option value=(r) { (r) }
                            }
                        }
                        label for="review" { "Review" }
                        textarea id="review" name="review" required {}
                        button type="submit" { "Submit review" }
                    }
                }
                @for review in page.reviews {
                    div.review {
                        p.author { (review.author_name) " · " (format_date(&review.created_at)) }
                        p.stars { (stars(f64::from(review.rating))) }
                        p { (review.comment) }
                        @if current_user_id == Some(review.user_id) {
                            form method="post" action={ "/listings/" (listing.id) "/reviews/" (review.id) "?_method=DELETE" } {
                                button.btn-link type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }

            @if let (Some(key), Some((lat, lng))) = (page.maps_api_key, listing.coordinates()) {
                section.map {
                    (map_embed(key, &format!("{lat},{lng}")))
                }
            }
        },
    )
}

/* --------------------------------------------------------------------------
Forms
-------------------------------------------------------------------------- */

fn listing_form(action: &str, listing: Option<&Listing>, submit: &str) -> Markup {
    let current = |f: fn(&Listing) -> Option<String>| listing.and_then(f);
    let selected_type = listing.map_or("stay", |l| l.listing_type.as_str());
    let selected_purpose = listing.map_or("general", |l| l.purpose.as_str());
    let selected_category = listing.map_or("apartment", |l| l.category.as_str());
    let stored: &[String] = listing.map_or(&[], |l| l.amenities.as_slice());
    let mut amenity_choices: Vec<&str> = COMMON_AMENITIES.to_vec();
    for extra in stored {
        if !amenity_choices.contains(&extra.as_str()) {
            amenity_choices.push(extra);
        }
    }
    let available = listing.map_or(true, |l| l.available);

    html! {
        form.listing-form method="post" action=(action) enctype="multipart/form-data" {
            label { "Title" input type="text" name="listing[title]" required value=[current(|l| Some(l.title.clone()))]; }
            label { "Description" textarea name="listing[description]" { (current(|l| l.description.clone()).unwrap_or_default()) } }
            label { "Image" input type="file" name="image" accept="image/*"; }
            label { "Price per night" input type="number" name="listing[price]" min="0" step="any" value=[current(|l| Some(l.price.to_string()))]; }
            label { "Location" input type="text" name="listing[location]" value=[current(|l| l.location.clone())]; }
            label { "Country" input type="text" name="listing[country]" value=[current(|l| l.country.clone())]; }
            label { "Latitude" input type="number" name="listing[lat]" step="any" value=[current(|l| l.latitude.map(|v| v.to_string()))]; }
            label { "Longitude" input type="number" name="listing[lng]" step="any" value=[current(|l| l.longitude.map(|v| v.to_string()))]; }
            label {
                "Type"
                select name="listing[type]" {
                    @for t in VALID_LISTING_TYPES {
                        option value=(t) selected[selected_type == *t] { (humanize(t)) }
                    }
                }
            }
            label {
                "Purpose"
                select name="listing[purpose]" {
                    @for p in VALID_PURPOSES {
                        option value=(p) selected[selected_purpose == *p] { (humanize(p)) }
                    }
                }
            }
            label {
                "Category"
                select name="listing[category]" {
                    @for c in VALID_CATEGORIES {
                        option value=(c) selected[selected_category == *c] { (humanize(c)) }
                    }
                }
            }
            fieldset.amenities {
                legend { "Amenities" }
                @for a in &amenity_choices {
                    label {
                        input type="checkbox" name="amenities" value=(a)
                            checked[stored.iter().any(|x| x == a)];
                        " " (a)
                    }
                }
                label {
                    "Other amenities (comma separated)"
                    input type="text" name="listing[amenities]" placeholder="Hot Tub, Sauna";
                }
            }
            label { "Available from" input type="date" name="listing[availability_start]" value=[listing.and_then(|l| l.availability_start.as_ref().map(format_date))]; }
            label { "Available until" input type="date" name="listing[availability_end]" value=[listing.and_then(|l| l.availability_end.as_ref().map(format_date))]; }
            // The hidden field is overridden by the checkbox when it is ticked.
            input type="hidden" name="listing[available]" value="false";
            label { input type="checkbox" name="listing[available]" value="true" checked[available]; " Available for booking" }
            button type="submit" { (submit) }
        }
    }
}

pub fn new_form(ctx: &ViewContext) -> Markup {
    layout(
        ctx,
        "New listing",
        html! {
            h1 { "Create a new listing" }
            (listing_form("/listings", None, "Create listing"))
        },
    )
}

pub fn edit_form(ctx: &ViewContext, listing: &Listing) -> Markup {
    let action = format!("/listings/{}?_method=PUT", listing.id);
    layout(
        ctx,
        "Edit listing",
        html! {
            h1 { "Edit " (listing.title) }
            img.preview src=(display_image_url(listing.image_url.as_deref())) alt=(listing.title);
            (listing_form(&action, Some(listing), "Save changes"))
        },
    )
}

/* --------------------------------------------------------------------------
Map
-------------------------------------------------------------------------- */

fn map_embed(key: &str, query: &str) -> Markup {
    let src = Url::parse_with_params(
        "https://www.google.com/maps/embed/v1/place",
        &[("key", key), ("q", query)],
    )
    .map(String::from)
    .unwrap_or_default();

    html! {
        iframe.map-embed src=(src) width="600" height="450" loading="lazy" allowfullscreen {}
    }
}

pub fn map(ctx: &ViewContext, listing: &Listing, maps_api_key: Option<&str>) -> Markup {
    let query = match listing.coordinates() {
        Some((lat, lng)) => Some(format!("{lat},{lng}")),
        None => match (&listing.location, &listing.country) {
            (Some(location), Some(country)) => Some(format!("{location}, {country}")),
            (Some(location), None) => Some(location.clone()),
            _ => None,
        },
    };

    layout(
        ctx,
        &format!("{} map", listing.title),
        html! {
            h1 { (listing.title) }
            @match (maps_api_key, query) {
                (Some(key), Some(query)) => {
                    (map_embed(key, &query))
                }
                (None, _) => {
                    p.map-unavailable { "Maps are not configured on this server." }
                }
                (_, None) => {
                    p.map-unavailable { "This listing has no location to show." }
                }
            }
            a href={ "/listings/" (listing.id) } { "Back to listing" }
        },
    )
}
