use maud::{html, Markup};
use wanderlust_core::listing::display_image_url;
use wanderlust_db::models::booking::BookingWithListing;
use wanderlust_db::models::listing::Listing;

use super::listings::listing_card;
use super::{format_date, format_price, layout};
use crate::middleware::context::ViewContext;

pub fn my_bookings(ctx: &ViewContext, bookings: &[BookingWithListing]) -> Markup {
    layout(
        ctx,
        "My bookings",
        html! {
            h1 { "My bookings" }
            @if bookings.is_empty() {
                p.empty { "You have no bookings yet." }
            }
            @for booking in bookings {
                div.booking {
                    img src=(display_image_url(booking.listing_image_url.as_deref())) alt=(booking.listing_title);
                    h2 { a href={ "/listings/" (booking.listing_id) } { (booking.listing_title) } }
                    @if let Some(location) = &booking.listing_location {
                        p.location { (location) }
                    }
                    p.dates { (format_date(&booking.start_date)) " to " (format_date(&booking.end_date)) }
                    p.total { "Total: $" (format_price(booking.total_price)) }
                    span.status { (booking.status) }
                }
            }
        },
    )
}

pub fn my_listings(ctx: &ViewContext, listings: &[Listing]) -> Markup {
    layout(
        ctx,
        "My listings",
        html! {
            h1 { "My listings" }
            @if listings.is_empty() {
                p.empty { "You are not hosting anything yet. " a href="/listings/new" { "Add a listing" } }
            }
            div.listing-grid {
                @for listing in listings {
                    (listing_card(listing))
                }
            }
        },
    )
}
