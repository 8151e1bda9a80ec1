use maud::{html, Markup};

use super::layout;
use crate::middleware::context::ViewContext;

pub fn register(ctx: &ViewContext) -> Markup {
    layout(
        ctx,
        "Sign up",
        html! {
            h1 { "Sign up for Wanderlust" }
            form method="post" action="/register" {
                label for="name" { "Name" }
                input id="name" type="text" name="name" required;
                label for="email" { "Email" }
                input id="email" type="email" name="email" required;
                label for="password" { "Password" }
                input id="password" type="password" name="password" required;
                button type="submit" { "Sign up" }
            }
            p { "Already have an account? " a href="/login" { "Log in" } }
        },
    )
}

pub fn login(ctx: &ViewContext) -> Markup {
    layout(
        ctx,
        "Log in",
        html! {
            h1 { "Log in" }
            form method="post" action="/login" {
                label for="email" { "Email" }
                input id="email" type="email" name="email" required;
                label for="password" { "Password" }
                input id="password" type="password" name="password" required;
                button type="submit" { "Log in" }
            }
            p { "New here? " a href="/register" { "Sign up" } }
        },
    )
}
