//! Navigation guard: titles and auth redirects.

use super::table::{ResolvedRoute, encode_query_value};

pub const APP_NAME: &str = "Is It Live";

/// Outcome of running the guard against one resolved route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Document title for `route`: its meta title, else its name.
#[must_use]
pub fn page_title(route: &ResolvedRoute) -> String {
    let title = route.meta.title.unwrap_or_else(|| route.name.as_str());
    format!("{title} | {APP_NAME}")
}

#[must_use]
pub fn evaluate(route: &ResolvedRoute, authenticated: bool) -> GuardDecision {
    if route.meta.requires_auth && !authenticated {
        return GuardDecision::Redirect(format!("/login?redirect={}", encode_query_value(&route.full_path)));
    }
    if route.meta.guest && authenticated {
        return GuardDecision::Redirect("/dashboard".to_owned());
    }
    GuardDecision::Allow
}
