//! Server-rendered HTML views built with `maud`.
//!
//! Every page goes through [`layout`], which renders the navigation for the
//! current user and the flash messages taken from the session.

use axum::http::StatusCode;
use maud::{html, Markup, DOCTYPE};
use wanderlust_core::types::Timestamp;

use crate::middleware::context::ViewContext;
use crate::session::{Flash, FlashKind};

pub mod account;
pub mod auth;
pub mod listings;

/// Wrap a page body in the site chrome.
pub fn layout(ctx: &ViewContext, title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Wanderlust" }
            }
            body {
                (navbar(ctx))
                main.container {
                    (flash_messages(&ctx.flashes))
                    (body)
                }
                footer { small { "Wanderlust" } }
            }
        }
    }
}

fn navbar(ctx: &ViewContext) -> Markup {
    html! {
        nav.navbar {
            a.brand href="/listings" { "Wanderlust" }
            a href="/listings" { "Explore" }
            @if let Some(user) = &ctx.current_user {
                a href="/listings/new" { "Add listing" }
                a href="/mylistings" { "My listings" }
                a href="/mybookings" { "My bookings" }
                span.user { (user.name) }
                a href="/logout" { "Log out" }
            } @else {
                a href="/register" { "Sign up" }
                a href="/login" { "Log in" }
            }
        }
    }
}

fn flash_messages(flashes: &[Flash]) -> Markup {
    html! {
        @for flash in flashes {
            @match flash.kind {
                FlashKind::Success => {
                    div.alert.alert-success role="alert" { (flash.message) }
                }
                FlashKind::Error => {
                    div.alert.alert-danger role="alert" { (flash.message) }
                }
            }
        }
    }
}

/// Standalone error page; rendered without a session.
pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let body = html! {
        h1 { (status.as_u16()) " " (status.canonical_reason().unwrap_or("Error")) }
        p.error-message { (message) }
        a href="/listings" { "Back to listings" }
    };
    layout(&ViewContext::default(), "Error", body)
}

/// `2024-01-04` style date.
pub fn format_date(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Price with thousands separators and no trailing `.00`.
pub fn format_price(price: f64) -> String {
    // Round to whole cents first so fractions like .999 carry into the units.
    let total_cents = (price * 100.0).round() as i64;
    let whole = total_cents.unsigned_abs() / 100;
    let cents = total_cents.unsigned_abs() % 100;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if total_cents < 0 { "-" } else { "" };
    if cents == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_are_grouped() {
        assert_eq!(format_price(150.0), "150");
        assert_eq!(format_price(1500.0), "1,500");
        assert_eq!(format_price(1234567.5), "1,234,567.50");
        assert_eq!(format_price(0.0), "0");
    }

    #[test]
    fn prices_round_to_whole_cents() {
        assert_eq!(format_price(1.999), "2");
        assert_eq!(format_price(999.996), "1,000");
        assert_eq!(format_price(19.989), "19.99");
        assert_eq!(format_price(0.05), "0.05");
        assert_eq!(format_price(-0.5), "-0.50");
    }

    #[test]
    fn flashes_render_with_their_kind() {
        let ctx = ViewContext {
            current_user: None,
            flashes: vec![
                Flash {
                    kind: FlashKind::Success,
                    message: "Welcome!".into(),
                },
                Flash {
                    kind: FlashKind::Error,
                    message: "<b>bad</b>".into(),
                },
            ],
        };
        let page = layout(&ctx, "Test", html! { p { "body" } }).into_string();
        assert!(page.contains(r#"class="alert alert-success""#));
        assert!(page.contains("Welcome!"));
        // Messages are escaped.
        assert!(page.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn anonymous_nav_offers_login() {
        let page = layout(&ViewContext::default(), "T", html! {}).into_string();
        assert!(page.contains(r#"href="/login""#));
        assert!(!page.contains("Log out"));
    }

    #[test]
    fn error_page_shows_status() {
        let page = error_page(StatusCode::NOT_FOUND, "Listing with id 3 not found").into_string();
        assert!(page.contains("404 Not Found"));
        assert!(page.contains("Listing with id 3 not found"));
    }
}
