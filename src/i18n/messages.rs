//! Message bundles: translated strings per locale.
//!
//! Bundles are JSON files (`{dir}/{locale}.json`) holding a nested object
//! namespaced by page and section. On load every bundle is flattened into
//! dot-separated keys, so `{"HomePage": {"meta": {"title": "…"}}}` is looked
//! up as `HomePage.meta.title`.

use crate::i18n::{Locale, MessageMetrics};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading message bundles. All of them are startup
/// configuration defects.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("failed to read message bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in message bundle for {locale}: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    #[error("message bundle for {locale} must be a JSON object at the top level")]
    NotAnObject { locale: Locale },

    #[error("message bundle for {locale} has a non-string value at '{key}'")]
    InvalidValue { locale: Locale, key: String },

    #[error("no message bundle for supported locale {locale}")]
    MissingBundle { locale: Locale },
}

/// The flattened strings of one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBundle {
    locale: Locale,
    entries: BTreeMap<String, String>,
}

impl MessageBundle {
    /// Parse a bundle from its JSON source.
    pub fn from_json_str(locale: Locale, source: &str) -> Result<Self, MessageError> {
        let value: Value =
            serde_json::from_str(source).map_err(|source| MessageError::Parse { locale, source })?;

        let Value::Object(map) = value else {
            return Err(MessageError::NotAnObject { locale });
        };

        let mut entries = BTreeMap::new();
        for (key, value) in map {
            flatten(locale, key, value, &mut entries)?;
        }

        Ok(Self { locale, entries })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(
    locale: Locale,
    prefix: String,
    value: Value,
    entries: &mut BTreeMap<String, String>,
) -> Result<(), MessageError> {
    match value {
        Value::String(text) => {
            entries.insert(prefix, text);
            Ok(())
        }
        Value::Object(map) => {
            for (key, value) in map {
                flatten(locale, format!("{}.{}", prefix, key), value, entries)?;
            }
            Ok(())
        }
        _ => Err(MessageError::InvalidValue {
            locale,
            key: prefix,
        }),
    }
}

/// One bundle per supported locale plus lookup counters.
#[derive(Debug)]
pub struct MessageCatalog {
    bundles: HashMap<Locale, MessageBundle>,
    metrics: MessageMetrics,
}

impl MessageCatalog {
    /// Load `{dir}/{tag}.json` for every supported locale.
    pub fn load_dir(dir: &Path) -> Result<Self, MessageError> {
        let mut bundles = Vec::new();

        for locale in Locale::all() {
            let path = dir.join(format!("{}.json", locale.tag()));
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(MessageError::MissingBundle { locale });
                }
                Err(source) => return Err(MessageError::Io { path, source }),
            };

            let bundle = MessageBundle::from_json_str(locale, &source)?;
            debug!("Loaded {} messages for {}", bundle.len(), locale);
            bundles.push(bundle);
        }

        Self::from_bundles(bundles)
    }

    /// Build a catalog from already parsed bundles.
    ///
    /// Fails if any supported locale has no bundle.
    pub fn from_bundles(bundles: Vec<MessageBundle>) -> Result<Self, MessageError> {
        let bundles: HashMap<Locale, MessageBundle> =
            bundles.into_iter().map(|b| (b.locale(), b)).collect();

        if let Some(locale) = Locale::all().find(|l| !bundles.contains_key(l)) {
            return Err(MessageError::MissingBundle { locale });
        }

        Ok(Self {
            bundles,
            metrics: MessageMetrics::default(),
        })
    }

    pub fn bundle(&self, locale: Locale) -> &MessageBundle {
        // from_bundles guarantees a bundle for every locale
        &self.bundles[&locale]
    }

    pub fn metrics(&self) -> &MessageMetrics {
        &self.metrics
    }

    /// Look up `key` for `locale`.
    ///
    /// Falls back to the default locale's string, then to the key itself.
    /// Every fallback is logged and counted.
    pub fn translate(&self, locale: Locale, key: &str) -> String {
        if let Some(text) = self.bundle(locale).get(key) {
            self.metrics.record_hit();
            return text.to_string();
        }

        let default = Locale::default_locale();
        if locale != default {
            if let Some(text) = self.bundle(default).get(key) {
                warn!("Missing message '{}' for {}, using {}", key, locale, default);
                self.metrics.record_fallback();
                return text.to_string();
            }
        }

        warn!("Missing message '{}' in every bundle", key);
        self.metrics.record_miss();
        key.to_string()
    }

    /// Look up `key` and substitute `{name}` placeholders.
    pub fn translate_with(&self, locale: Locale, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.translate(locale, key), args)
    }

    /// Translator bound to one locale, for page rendering.
    pub fn translator(&self, locale: Locale) -> Translator<'_> {
        Translator {
            catalog: self,
            locale,
        }
    }
}

/// Replace every `{name}` in `template` with its value from `args`.
/// Placeholders without a value are left untouched.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}

/// A catalog view fixed to one locale.
#[derive(Clone, Copy)]
pub struct Translator<'a> {
    catalog: &'a MessageCatalog,
    locale: Locale,
}

impl<'a> Translator<'a> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.catalog.translate(self.locale, key)
    }

    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.catalog.translate_with(self.locale, key, args)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal bundles for every locale: the default locale gets an extra
    /// key so fallback paths can be exercised.
    pub(crate) fn test_catalog() -> MessageCatalog {
        let bundles = Locale::all()
            .map(|locale| {
                let source = if locale == Locale::default_locale() {
                    r#"{"Page": {"title": "Title", "greeting": "Hello {name}"}, "Only": {"default": "Default only"}}"#
                        .to_string()
                } else {
                    format!(
                        r#"{{"Page": {{"title": "Title {}", "greeting": "Hi {{name}}"}}}}"#,
                        locale.tag()
                    )
                };
                MessageBundle::from_json_str(locale, &source).unwrap()
            })
            .collect();
        MessageCatalog::from_bundles(bundles).unwrap()
    }

    // ==================== Bundle Parsing Tests ====================

    #[test]
    fn test_flatten_nested_keys() {
        let bundle = MessageBundle::from_json_str(
            Locale::EN_US,
            r#"{"HomePage": {"title": "Home", "meta": {"title": "Welcome"}}}"#,
        )
        .unwrap();

        assert_eq!(bundle.get("HomePage.title"), Some("Home"));
        assert_eq!(bundle.get("HomePage.meta.title"), Some("Welcome"));
        assert_eq!(bundle.get("HomePage.meta"), None);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_keys_are_sorted() {
        let bundle =
            MessageBundle::from_json_str(Locale::EN_US, r#"{"b": "2", "a": {"z": "1"}}"#).unwrap();
        let keys: Vec<_> = bundle.keys().collect();
        assert_eq!(keys, vec!["a.z", "b"]);
    }

    #[test]
    fn test_non_string_leaf_is_rejected() {
        let err = MessageBundle::from_json_str(Locale::FR_FR, r#"{"Page": {"count": 3}}"#)
            .unwrap_err();
        assert!(matches!(err, MessageError::InvalidValue { ref key, .. } if key == "Page.count"));
        assert!(err.to_string().contains("fr-FR"));
    }

    #[test]
    fn test_top_level_array_is_rejected() {
        let err = MessageBundle::from_json_str(Locale::FR_FR, r#"["a"]"#).unwrap_err();
        assert!(matches!(err, MessageError::NotAnObject { .. }));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = MessageBundle::from_json_str(Locale::FR_FR, "{").unwrap_err();
        assert!(matches!(err, MessageError::Parse { .. }));
    }

    // ==================== Catalog Tests ====================

    #[test]
    fn test_from_bundles_requires_every_locale() {
        let only_default =
            vec![MessageBundle::from_json_str(Locale::EN_US, r#"{"a": "b"}"#).unwrap()];
        let err = MessageCatalog::from_bundles(only_default).unwrap_err();
        assert!(matches!(err, MessageError::MissingBundle { locale } if locale == Locale::DE_DE));
    }

    #[test]
    fn test_translate_hit() {
        let catalog = test_catalog();
        assert_eq!(catalog.translate(Locale::FR_FR, "Page.title"), "Title fr-FR");
        assert_eq!(catalog.metrics().hits(), 1);
    }

    #[test]
    fn test_translate_falls_back_to_default_locale() {
        let catalog = test_catalog();
        assert_eq!(catalog.translate(Locale::DE_DE, "Only.default"), "Default only");
        assert_eq!(catalog.metrics().fallbacks(), 1);
    }

    #[test]
    fn test_translate_missing_everywhere_returns_key() {
        let catalog = test_catalog();
        assert_eq!(catalog.translate(Locale::DE_DE, "Nope.key"), "Nope.key");
        assert_eq!(catalog.translate(Locale::EN_US, "Nope.key"), "Nope.key");
        assert_eq!(catalog.metrics().misses(), 2);
    }

    #[test]
    fn test_translate_with_placeholder() {
        let catalog = test_catalog();
        assert_eq!(
            catalog.translate_with(Locale::EN_US, "Page.greeting", &[("name", "Ada")]),
            "Hello Ada"
        );
    }

    #[test]
    fn test_translator_is_bound_to_locale() {
        let catalog = test_catalog();
        let t = catalog.translator(Locale::AR_SA);
        assert_eq!(t.locale(), Locale::AR_SA);
        assert_eq!(t.t("Page.title"), "Title ar-SA");
        assert_eq!(t.t_with("Page.greeting", &[("name", "Omar")]), "Hi Omar");
    }

    // ==================== Interpolation Tests ====================

    #[test]
    fn test_interpolate_leaves_unknown_placeholders() {
        assert_eq!(interpolate("{a} and {b}", &[("a", "x")]), "x and {b}");
    }

    #[test]
    fn test_interpolate_repeated_placeholder() {
        assert_eq!(interpolate("{a}{a}", &[("a", "1")]), "11");
    }

    // ==================== Directory Loading Tests ====================

    #[test]
    fn test_load_dir_missing_bundle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("de-DE.json"), r#"{"a": "b"}"#).unwrap();

        let err = MessageCatalog::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, MessageError::MissingBundle { locale } if locale.tag() == "de-CH"));
    }

    #[test]
    fn test_load_dir_all_present() {
        let dir = tempfile::tempdir().unwrap();
        for locale in Locale::all() {
            std::fs::write(
                dir.path().join(format!("{}.json", locale.tag())),
                r#"{"Page": {"title": "t"}}"#,
            )
            .unwrap();
        }

        let catalog = MessageCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.bundle(Locale::AR_SA).get("Page.title"), Some("t"));
    }
}
