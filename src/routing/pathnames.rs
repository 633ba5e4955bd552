//! Path alias table: route key × locale → literal URL path.
//!
//! The table is built once at startup from [`PathTable::canonical`] and
//! shared read-only by the request handler, the page renderer and the
//! sitemap generator. Construction validates the table, so a gap or a
//! collision is a startup error rather than a runtime 404.

use crate::i18n::Locale;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Logical, locale-independent name of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteKey {
    Home,
    About,
}

impl RouteKey {
    pub const ALL: [RouteKey; 2] = [RouteKey::Home, RouteKey::About];

    /// Locale-independent path naming the route (e.g., "/about").
    pub fn logical_path(&self) -> &'static str {
        match self {
            RouteKey::Home => "/",
            RouteKey::About => "/about",
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.logical_path())
    }
}

/// Configuration defects in the path alias table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("route {route} has no path for locale {locale}")]
    MissingAlias { route: RouteKey, locale: Locale },

    #[error("route {route} is declared more than once")]
    DuplicateRoute { route: RouteKey },

    #[error("path '{path}' of route {route} in {locale} must start with '/'")]
    MalformedPath {
        route: RouteKey,
        locale: Locale,
        path: String,
    },

    #[error("routes {first} and {second} both use '{path}' in {locale}")]
    DuplicateAlias {
        first: RouteKey,
        second: RouteKey,
        locale: Locale,
        path: String,
    },
}

/// Validated route key × locale → path table.
#[derive(Debug, Clone)]
pub struct PathTable {
    /// Routes in declaration order with their per-locale paths
    routes: Vec<(RouteKey, HashMap<Locale, String>)>,
}

impl PathTable {
    /// Build and validate a table.
    ///
    /// Every route must define a path for every supported locale, every path
    /// must start with `/`, and within one locale no two routes may share a
    /// path.
    pub fn new(entries: Vec<(RouteKey, Vec<(Locale, &str)>)>) -> Result<Self, RoutingError> {
        let mut routes: Vec<(RouteKey, HashMap<Locale, String>)> = Vec::new();

        for (route, aliases) in entries {
            if routes.iter().any(|(existing, _)| *existing == route) {
                return Err(RoutingError::DuplicateRoute { route });
            }

            let mut paths = HashMap::new();
            for (locale, path) in aliases {
                if !path.starts_with('/') {
                    return Err(RoutingError::MalformedPath {
                        route,
                        locale,
                        path: path.to_string(),
                    });
                }
                paths.insert(locale, normalize_path(path));
            }

            if let Some(locale) = Locale::all().find(|l| !paths.contains_key(l)) {
                return Err(RoutingError::MissingAlias { route, locale });
            }

            for locale in Locale::all() {
                let path = &paths[&locale];
                if let Some((first, _)) = routes.iter().find(|(_, other)| &other[&locale] == path) {
                    return Err(RoutingError::DuplicateAlias {
                        first: *first,
                        second: route,
                        locale,
                        path: path.clone(),
                    });
                }
            }

            routes.push((route, paths));
        }

        Ok(Self { routes })
    }

    /// The site's route table.
    pub fn canonical() -> Result<Self, RoutingError> {
        let about = [
            ("de-DE", "/ueber-uns"),
            ("de-CH", "/ueber-uns"),
            ("de-AT", "/ueber-uns"),
            ("en-US", "/about"),
            ("en-GB", "/about"),
            ("es-ES", "/sobre-nosotros"),
            ("tr-TR", "/hakkimizda"),
            ("sq-AL", "/rreth-nesh"),
            ("it-IT", "/chi-siamo"),
            ("fr-FR", "/a-propos"),
            ("hr-HR", "/o-nama"),
            ("bs-BA", "/o-nama"),
            ("ar-SA", "/عنّا"),
        ];

        let about = about
            .into_iter()
            .filter_map(|(tag, path)| Locale::parse(tag).map(|locale| (locale, path)))
            .collect();

        Self::new(vec![
            (RouteKey::Home, Locale::all().map(|l| (l, "/")).collect()),
            (RouteKey::About, about),
        ])
    }

    /// Routes in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = RouteKey> + '_ {
        self.routes.iter().map(|(route, _)| *route)
    }

    /// Path of `route` in `locale`, if the table defines one.
    pub fn path(&self, route: RouteKey, locale: Locale) -> Option<&str> {
        self.routes
            .iter()
            .find(|(key, _)| *key == route)
            .and_then(|(_, paths)| paths.get(&locale))
            .map(String::as_str)
    }

    /// Path of `route` in `locale`.
    ///
    /// # Panics
    /// Panics if `route` was not declared. Every declared route has a path
    /// for every locale once `new` has succeeded.
    pub fn path_for(&self, route: RouteKey, locale: Locale) -> &str {
        self.path(route, locale)
            .expect("validated path table covers every route and locale")
    }

    /// Locale-prefixed link target, e.g. `/de-DE/ueber-uns`; home is `/de-DE`.
    pub fn href(&self, route: RouteKey, locale: Locale) -> String {
        match self.path_for(route, locale) {
            "/" => format!("/{}", locale.tag()),
            path => format!("/{}{}", locale.tag(), path),
        }
    }

    /// Locales that define a path for `route`, in registry order.
    pub fn locales_for(&self, route: RouteKey) -> Vec<Locale> {
        Locale::all()
            .filter(|locale| self.path(route, *locale).is_some())
            .collect()
    }

    /// Reverse lookup: which route does `path` name in `locale`?
    ///
    /// Exact match after normalisation; `None` means "page not found".
    pub fn route_for(&self, path: &str, locale: Locale) -> Option<RouteKey> {
        let path = normalize_path(path);
        self.routes
            .iter()
            .find(|(_, paths)| paths.get(&locale).is_some_and(|p| *p == path))
            .map(|(route, _)| *route)
    }

    /// Reverse lookup across locales for paths without a locale prefix.
    ///
    /// Tries `preferred`, then the default locale, then every locale in
    /// registry order.
    pub fn find_any(&self, path: &str, preferred: Option<Locale>) -> Option<(Locale, RouteKey)> {
        let candidates = preferred
            .into_iter()
            .chain(std::iter::once(Locale::default_locale()))
            .chain(Locale::all());

        for locale in candidates {
            if let Some(route) = self.route_for(path, locale) {
                return Some((locale, route));
            }
        }
        None
    }
}

/// Percent-decode a request path once. Paths that do not decode to UTF-8
/// are kept as they are.
pub fn decode_path(path: &str) -> String {
    urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Ensure a leading `/` and drop trailing slashes (except for the root).
/// The path must already be decoded; `%` sequences are compared literally.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Percent-encode each segment of `path` so it is safe in a `Location`
/// header.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> PathTable {
        PathTable::canonical().expect("canonical table is valid")
    }

    fn locale(tag: &str) -> Locale {
        Locale::from_tag(tag).unwrap()
    }

    // ==================== Forward Lookup Tests ====================

    #[test]
    fn test_forward_lookup() {
        let table = table();
        assert_eq!(table.path_for(RouteKey::About, Locale::DE_DE), "/ueber-uns");
        assert_eq!(table.path_for(RouteKey::About, locale("it-IT")), "/chi-siamo");
        assert_eq!(table.path_for(RouteKey::About, Locale::AR_SA), "/عنّا");
        assert_eq!(table.path_for(RouteKey::Home, Locale::FR_FR), "/");
    }

    #[test]
    fn test_href() {
        let table = table();
        assert_eq!(table.href(RouteKey::Home, Locale::FR_FR), "/fr-FR");
        assert_eq!(table.href(RouteKey::About, Locale::FR_FR), "/fr-FR/a-propos");
    }

    #[test]
    fn test_every_route_covers_default_locale() {
        let table = table();
        for route in table.routes() {
            let locales = table.locales_for(route);
            assert!(!locales.is_empty());
            assert!(locales.contains(&Locale::default_locale()));
        }
    }

    // ==================== Reverse Lookup Tests ====================

    #[test]
    fn test_reverse_lookup() {
        let table = table();
        assert_eq!(table.route_for("/ueber-uns", locale("de-AT")), Some(RouteKey::About));
        assert_eq!(table.route_for("/", Locale::DE_DE), Some(RouteKey::Home));
    }

    #[test]
    fn test_reverse_lookup_is_locale_specific() {
        let table = table();
        assert_eq!(table.route_for("/about", Locale::DE_DE), None);
        assert_eq!(table.route_for("/ueber-uns", Locale::EN_US), None);
    }

    #[test]
    fn test_reverse_lookup_trailing_slash() {
        let table = table();
        assert_eq!(table.route_for("/about/", Locale::EN_GB), Some(RouteKey::About));
        assert_eq!(table.route_for("/عنّا", Locale::AR_SA), Some(RouteKey::About));
    }

    #[test]
    fn test_reverse_lookup_does_not_decode() {
        let table = table();
        assert_eq!(table.route_for("/%61bout", Locale::EN_US), None);
        assert_eq!(table.route_for("/%D8%B9%D9%86%D9%91%D8%A7", Locale::AR_SA), None);
        assert_eq!(table.find_any("/%75eber-uns", None), None);
    }

    #[test]
    fn test_reverse_lookup_is_exact() {
        let table = table();
        assert_eq!(table.route_for("/about/team", Locale::EN_US), None);
        assert_eq!(table.route_for("/abou", Locale::EN_US), None);
    }

    #[test]
    fn test_find_any_picks_first_locale_in_registry_order() {
        let table = table();
        assert_eq!(
            table.find_any("/ueber-uns", None),
            Some((Locale::DE_DE, RouteKey::About))
        );
        assert_eq!(
            table.find_any("/o-nama", None),
            Some((locale("hr-HR"), RouteKey::About))
        );
    }

    #[test]
    fn test_find_any_prefers_given_locale() {
        let table = table();
        assert_eq!(
            table.find_any("/ueber-uns", Some(locale("de-CH"))),
            Some((locale("de-CH"), RouteKey::About))
        );
        assert_eq!(
            table.find_any("/o-nama", Some(locale("bs-BA"))),
            Some((locale("bs-BA"), RouteKey::About))
        );
        // Preferred locale without the alias falls through to the default
        assert_eq!(
            table.find_any("/about", Some(Locale::FR_FR)),
            Some((Locale::EN_US, RouteKey::About))
        );
    }

    #[test]
    fn test_find_any_miss() {
        assert_eq!(table().find_any("/xx-XX/about", None), None);
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_missing_alias_is_rejected() {
        let err = PathTable::new(vec![(RouteKey::Home, vec![(Locale::EN_US, "/")])]).unwrap_err();
        assert_eq!(
            err,
            RoutingError::MissingAlias {
                route: RouteKey::Home,
                locale: Locale::DE_DE
            }
        );
    }

    #[test]
    fn test_duplicate_alias_is_rejected() {
        let err = PathTable::new(vec![
            (RouteKey::Home, Locale::all().map(|l| (l, "/")).collect()),
            (RouteKey::About, Locale::all().map(|l| (l, "/")).collect()),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            RoutingError::DuplicateAlias {
                first: RouteKey::Home,
                second: RouteKey::About,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let err = PathTable::new(vec![
            (RouteKey::Home, Locale::all().map(|l| (l, "/")).collect()),
            (RouteKey::Home, Locale::all().map(|l| (l, "/home")).collect()),
        ])
        .unwrap_err();
        assert_eq!(err, RoutingError::DuplicateRoute { route: RouteKey::Home });
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let err = PathTable::new(vec![(
            RouteKey::About,
            Locale::all().map(|l| (l, "about")).collect(),
        )])
        .unwrap_err();
        assert!(matches!(err, RoutingError::MalformedPath { .. }));
        assert!(err.to_string().contains("must start with '/'"));
    }

    // ==================== Path Helper Tests ====================

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("/about/"), "/about");
        assert_eq!(normalize_path("about"), "/about");
        assert_eq!(normalize_path("/%61bout"), "/%61bout");
    }

    #[test]
    fn test_decode_path_decodes_once() {
        assert_eq!(decode_path("/%D8%B9%D9%86%D9%91%D8%A7"), "/عنّا");
        assert_eq!(decode_path("/%2561bout"), "/%61bout");
        assert_eq!(decode_path("/%FF"), "/%FF");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("/de-DE/ueber-uns"), "/de-DE/ueber-uns");
        assert_eq!(encode_path("/ar-SA/عنّا"), "/ar-SA/%D8%B9%D9%86%D9%91%D8%A7");
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_forward_then_reverse_round_trips(
            route_idx in 0usize..RouteKey::ALL.len(),
            locale_idx in 0usize..13,
        ) {
            let table = table();
            let route = RouteKey::ALL[route_idx];
            let locale = Locale::all().nth(locale_idx).unwrap();

            let path = table.path_for(route, locale).to_string();
            prop_assert_eq!(table.route_for(&path, locale), Some(route));
        }
    }
}
