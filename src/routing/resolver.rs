//! Locale resolution for incoming requests.
//!
//! The leading path segment selects the locale when it names a supported
//! one. Anything else belongs to the default locale as a literal path, so
//! resolution never fails.

use crate::i18n::{Locale, LocaleRegistry};
use crate::routing::pathnames::{decode_path, normalize_path};

/// Result of splitting a request path into locale and localized path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub locale: Locale,

    /// Path below the locale segment (`/` when empty), or the full path
    /// when no segment was consumed
    pub path: String,

    /// Whether the first segment was a supported locale
    pub prefixed: bool,

    /// Whether the locale segment was already in canonical casing.
    /// Always `true` when `prefixed` is `false`.
    pub canonical: bool,
}

/// Split `raw_path` into its locale and the path below it.
///
/// `raw_path` is percent-decoded exactly once here; everything downstream
/// compares the decoded path literally.
pub fn resolve_path(raw_path: &str) -> ResolvedPath {
    let path = normalize_path(&decode_path(raw_path));
    let rest = &path[1..];
    let (segment, remainder) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    match Locale::parse(segment) {
        Some(locale) => ResolvedPath {
            locale,
            path: normalize_path(remainder),
            prefixed: true,
            canonical: segment == locale.tag(),
        },
        None => ResolvedPath {
            locale: Locale::default_locale(),
            path,
            prefixed: false,
            canonical: true,
        },
    }
}

/// Pick the locale for a request that carries no locale segment.
///
/// Order: a valid preference cookie, then the best `Accept-Language` match,
/// then the default locale.
pub fn negotiate(cookie: Option<&str>, accept_language: Option<&str>) -> Locale {
    cookie
        .and_then(Locale::parse)
        .or_else(|| accept_language.and_then(match_accept_language))
        .unwrap_or_else(Locale::default_locale)
}

/// Best supported locale for an `Accept-Language` header.
///
/// Ranges are tried by descending q-value (ties keep header order). Each
/// range matches a locale exactly, or failing that by its primary language
/// (`de` or `de-LI` → the first German locale in the registry).
pub fn match_accept_language(header: &str) -> Option<Locale> {
    let registry = LocaleRegistry::get();

    for (range, _) in parse_accept_language(header) {
        if let Some(locale) = Locale::parse(&range) {
            return Some(locale);
        }

        let language = range.split('-').next().unwrap_or(&range);
        if let Some(config) = registry.first_with_language(language) {
            return Locale::parse(config.tag);
        }
    }
    None
}

/// Parse an `Accept-Language` header into `(range, q)` pairs sorted by
/// descending q. Wildcards, empty ranges and `q=0` entries are dropped.
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let mut ranges: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let range = pieces.next()?.trim();
            if range.is_empty() || range == "*" {
                return None;
            }

            let q = pieces
                .find_map(|param| param.trim().strip_prefix("q="))
                .map(|q| q.trim().parse::<f32>().unwrap_or(0.0))
                .unwrap_or(1.0);

            (q > 0.0).then(|| (range.to_string(), q))
        })
        .collect();

    // sort_by is stable, so equal weights keep header order
    ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== resolve_path Tests ====================

    #[test]
    fn test_resolve_prefixed_path() {
        let resolved = resolve_path("/de-DE/ueber-uns");
        assert_eq!(resolved.locale, Locale::DE_DE);
        assert_eq!(resolved.path, "/ueber-uns");
        assert!(resolved.prefixed);
        assert!(resolved.canonical);
    }

    #[test]
    fn test_resolve_locale_root() {
        for raw in ["/fr-FR", "/fr-FR/"] {
            let resolved = resolve_path(raw);
            assert_eq!(resolved.locale, Locale::FR_FR);
            assert_eq!(resolved.path, "/");
        }
    }

    #[test]
    fn test_resolve_non_canonical_casing() {
        let resolved = resolve_path("/en-gb/about");
        assert_eq!(resolved.locale, Locale::EN_GB);
        assert!(resolved.prefixed);
        assert!(!resolved.canonical);
    }

    #[test]
    fn test_resolve_unknown_segment_falls_back_to_default() {
        let resolved = resolve_path("/xx-XX/about");
        assert_eq!(resolved.locale, Locale::default_locale());
        assert_eq!(resolved.path, "/xx-XX/about");
        assert!(!resolved.prefixed);
    }

    #[test]
    fn test_resolve_unprefixed_alias() {
        let resolved = resolve_path("/ueber-uns");
        assert_eq!(resolved.locale, Locale::EN_US);
        assert_eq!(resolved.path, "/ueber-uns");
        assert!(!resolved.prefixed);
    }

    #[test]
    fn test_resolve_root() {
        let resolved = resolve_path("/");
        assert_eq!(resolved.locale, Locale::EN_US);
        assert_eq!(resolved.path, "/");
        assert!(!resolved.prefixed);
    }

    #[test]
    fn test_resolve_decodes_exactly_once() {
        let resolved = resolve_path("/ar-SA/%D8%B9%D9%86%D9%91%D8%A7");
        assert_eq!(resolved.locale, Locale::AR_SA);
        assert_eq!(resolved.path, "/عنّا");

        let resolved = resolve_path("/en-US/%2561bout");
        assert_eq!(resolved.path, "/%61bout");
    }

    #[test]
    fn test_resolve_retired_tag_is_not_a_locale() {
        assert!(!resolve_path("/en-UK/about").prefixed);
    }

    // ==================== negotiate Tests ====================

    #[test]
    fn test_cookie_wins() {
        assert_eq!(negotiate(Some("fr-FR"), Some("de-DE")), Locale::FR_FR);
    }

    #[test]
    fn test_invalid_cookie_is_ignored() {
        assert_eq!(negotiate(Some("xx-XX"), Some("de-DE")), Locale::DE_DE);
    }

    #[test]
    fn test_nothing_gives_default() {
        assert_eq!(negotiate(None, None), Locale::EN_US);
        assert_eq!(negotiate(None, Some("ja-JP, zh;q=0.8")), Locale::EN_US);
    }

    // ==================== Accept-Language Tests ====================

    #[test]
    fn test_parse_accept_language_orders_by_q() {
        let parsed = parse_accept_language("fr;q=0.5, de-DE, en;q=0.8");
        let ranges: Vec<_> = parsed.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(ranges, vec!["de-DE", "en", "fr"]);
    }

    #[test]
    fn test_parse_accept_language_drops_wildcard_and_zero() {
        let parsed = parse_accept_language("*, it-IT;q=0, es");
        assert_eq!(parsed, vec![("es".to_string(), 1.0)]);
    }

    #[test]
    fn test_parse_accept_language_keeps_order_on_ties() {
        let parsed = parse_accept_language("tr, sq");
        assert_eq!(parsed[0].0, "tr");
        assert_eq!(parsed[1].0, "sq");
    }

    #[test]
    fn test_match_exact_tag() {
        assert_eq!(match_accept_language("en-GB,en;q=0.9"), Some(Locale::EN_GB));
    }

    #[test]
    fn test_match_by_language() {
        assert_eq!(match_accept_language("de"), Some(Locale::DE_DE));
        assert_eq!(match_accept_language("fr-CA"), Some(Locale::FR_FR));
    }

    #[test]
    fn test_match_prefers_higher_q_language_over_later_exact_tag() {
        assert_eq!(match_accept_language("fr-CH, en-US;q=0.5"), Some(Locale::FR_FR));
    }

    #[test]
    fn test_match_none() {
        assert_eq!(match_accept_language("ja"), None);
        assert_eq!(match_accept_language(""), None);
    }
}
