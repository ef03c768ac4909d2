//! Static route table and path matching.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::form_urlencoded;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Login,
    Register,
    Dashboard,
    SiteDetail,
    UserProfile,
    Settings,
    NotFound,
}

impl RouteName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Dashboard => "Dashboard",
            Self::SiteDetail => "SiteDetail",
            Self::UserProfile => "UserProfile",
            Self::Settings => "Settings",
            Self::NotFound => "NotFound",
        }
    }
}

/// Per-route flags read by the guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: Option<&'static str>,
    pub requires_auth: bool,
    /// Only reachable while signed out.
    pub guest: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// `/`-separated segments; `:name` captures one segment.
    Path(&'static str),
    /// Matches anything no earlier route matched.
    CatchAll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDef {
    pub name: RouteName,
    pub pattern: Pattern,
    pub meta: RouteMeta,
}

const fn route(name: RouteName, path: &'static str, title: &'static str) -> RouteDef {
    RouteDef {
        name,
        pattern: Pattern::Path(path),
        meta: RouteMeta { title: Some(title), requires_auth: false, guest: false },
    }
}

const fn guest(mut def: RouteDef) -> RouteDef {
    def.meta.guest = true;
    def
}

const fn requires_auth(mut def: RouteDef) -> RouteDef {
    def.meta.requires_auth = true;
    def
}

/// Matched in order; the catch-all must stay last.
pub const ROUTES: &[RouteDef] = &[
    route(RouteName::Home, "/", "Home"),
    guest(route(RouteName::Login, "/login", "Login")),
    guest(route(RouteName::Register, "/register", "Register")),
    requires_auth(route(RouteName::Dashboard, "/dashboard", "Dashboard")),
    route(RouteName::SiteDetail, "/site/:id", "Site Details"),
    route(RouteName::UserProfile, "/user/:username", "User Profile"),
    requires_auth(route(RouteName::Settings, "/settings", "Settings")),
    RouteDef {
        name: RouteName::NotFound,
        pattern: Pattern::CatchAll,
        meta: RouteMeta { title: Some("404 Not Found"), requires_auth: false, guest: false },
    },
];

/// Static path of a parameterless route.
#[must_use]
pub fn path_of(name: RouteName) -> Option<&'static str> {
    ROUTES.iter().find(|r| r.name == name).and_then(|r| match r.pattern {
        Pattern::Path(path) if !path.contains(':') => Some(path),
        _ => None,
    })
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// A location matched against the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: RouteName,
    pub meta: RouteMeta,
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    /// Path plus query string, as navigated to.
    pub full_path: String,
}

impl ResolvedRoute {
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// First value of query parameter `key`.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Where to go after signing in from this route: the `redirect` query
    /// parameter when it names an in-app path, else the dashboard.
    #[must_use]
    pub fn redirect_target(&self) -> String {
        self.query_value("redirect")
            .filter(|r| r.starts_with('/') && !r.starts_with("//"))
            .map_or_else(|| "/dashboard".to_owned(), str::to_owned)
    }
}

/// Match `href` (path, optional query, optional fragment) against [`ROUTES`].
#[must_use]
pub fn resolve(href: &str) -> ResolvedRoute {
    let without_hash = href.split_once('#').map_or(href, |(before, _)| before);
    let (raw_path, raw_query) = without_hash.split_once('?').unwrap_or((without_hash, ""));
    let path = if raw_path.is_empty() { "/".to_owned() } else { raw_path.to_owned() };
    let query = parse_query(raw_query);
    let full_path = if raw_query.is_empty() { path.clone() } else { format!("{path}?{raw_query}") };

    for def in ROUTES {
        let params = match def.pattern {
            Pattern::Path(pattern) => match match_path(pattern, &path) {
                Some(params) => params,
                None => continue,
            },
            Pattern::CatchAll => BTreeMap::new(),
        };
        return ResolvedRoute { name: def.name, meta: def.meta, path, params, query, full_path };
    }

    // The table ends with a catch-all, so this is only reached if it is removed.
    ResolvedRoute {
        name: RouteName::NotFound,
        meta: RouteMeta::default(),
        path,
        params: BTreeMap::new(),
        query,
        full_path,
    }
}

fn match_path(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.insert(name.to_owned(), decode_segment(actual));
        } else if !expected.eq_ignore_ascii_case(actual) {
            return None;
        }
    }
    Some(params)
}

fn parse_query(raw: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Unreserved characters plus `/`, `:` and `@`, which stay readable in a
/// redirect target.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b':')
    .remove(b'@');

#[must_use]
pub fn encode_query_value(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_VALUE).to_string()
}

fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
